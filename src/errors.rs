use crate::driver::DriverError;

/// Errors surfaced by the dropdown engine.
///
/// Classification and validation failures are fatal: they indicate a
/// structurally wrong request and abort the whole operation. Per-value
/// selection failures never appear here — they are recorded in the
/// [`SelectionResult`](crate::SelectionResult) map instead.
#[derive(Debug, thiserror::Error)]
pub enum DropdownError {
    /// No label node or field root could be resolved for the given label.
    #[error("element not found: {0}")]
    NotFound(String),

    /// Strict mode only: more than one candidate field root matched the label.
    #[error("ambiguous label '{label}': {candidates} candidate field roots matched")]
    Ambiguous { label: String, candidates: usize },

    /// The requested value list was empty.
    #[error("no values requested for '{0}'")]
    EmptyValues(String),

    /// More than one value was requested against a single-valued widget.
    #[error("'{label}' ({kind}) does not support selecting {requested} values")]
    MultiValueUnsupported {
        label: String,
        kind: crate::DropdownKind,
        requested: usize,
    },

    /// The option popup never became visible within the wait budget.
    #[error("timed out waiting for the option popup of '{0}' to become visible")]
    SelectionTimeout(String),

    /// A driver primitive failed outside the locally-caught scan/select paths.
    #[error(transparent)]
    Driver(#[from] DriverError),
}
