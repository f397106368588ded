//! Request cardinality validation.

use crate::errors::DropdownError;
use crate::types::{DropdownDetection, DropdownKind};

/// Whether the classified control can hold several selected values at once.
///
/// Native list controls must say so explicitly through their `multiple`
/// marker; popup selects never can; autocompletes always can.
pub fn supports_multiple(detection: &DropdownDetection) -> bool {
    match detection.kind {
        DropdownKind::NativeSelect => detection.multiple,
        DropdownKind::PopupSelect => false,
        DropdownKind::Autocomplete => true,
    }
}

/// Reject structurally impossible requests before any document mutation.
pub fn validate(
    label: &str,
    detection: &DropdownDetection,
    requested: usize,
) -> Result<(), DropdownError> {
    if requested == 0 {
        return Err(DropdownError::EmptyValues(label.to_string()));
    }
    if requested > 1 && !supports_multiple(detection) {
        return Err(DropdownError::MultiValueUnsupported {
            label: label.to_string(),
            kind: detection.kind,
            requested,
        });
    }
    Ok(())
}
