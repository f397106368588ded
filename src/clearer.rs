//! Removing existing selections, per widget kind.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::driver::UiDriver;
use crate::errors::DropdownError;
use crate::selector::Selector;
use crate::types::{DropdownDetection, DropdownKind};

/// Upper bound on chip-removal iterations. Chip clicks can be flaky; once the
/// guard is exhausted the clear stops quietly, since a best-effort clear
/// followed by selection is an acceptable degraded outcome.
const CHIP_GUARD: usize = 50;

fn chip_button_selector() -> Selector {
    Selector::Chain(vec![
        Selector::Class("chip".to_string()),
        Selector::Any(vec![
            Selector::Tag("button".to_string()),
            Selector::Role("button".to_string()),
        ]),
    ])
}

fn chip_remove_fallback() -> Selector {
    Selector::Class("chip-remove".to_string())
}

pub struct Clearer {
    driver: Arc<dyn UiDriver>,
}

impl Clearer {
    pub fn new(driver: Arc<dyn UiDriver>) -> Self {
        Self { driver }
    }

    /// Remove the control's current selection(s).
    #[instrument(level = "debug", skip(self, detection), fields(kind = %detection.kind))]
    pub async fn clear(&self, detection: &DropdownDetection) -> Result<(), DropdownError> {
        match detection.kind {
            DropdownKind::NativeSelect => {
                if let Some(native) = detection.native_control.as_ref() {
                    self.driver.clear_selection(native).await?;
                }
                Ok(())
            }
            // Picking a new value through the popup implicitly replaces the
            // old one.
            DropdownKind::PopupSelect => Ok(()),
            DropdownKind::Autocomplete => self.clear_chips(detection).await,
        }
    }

    /// Click away "selected value" chips one at a time until none remain or
    /// the guard bound is hit.
    async fn clear_chips(&self, detection: &DropdownDetection) -> Result<(), DropdownError> {
        for iteration in 0..CHIP_GUARD {
            let Some(chip) = self.next_chip(detection).await else {
                debug!(iterations = iteration, "all chips removed");
                return Ok(());
            };
            if let Err(e) = self.driver.click(&chip).await {
                debug!(error = %e, "chip removal click failed");
            }
        }
        warn!(guard = CHIP_GUARD, "chip-removal guard exhausted, leaving remaining chips");
        Ok(())
    }

    /// The first chip-removal control still present, via the chip/button
    /// structure or the dedicated remove-button class.
    async fn next_chip(&self, detection: &DropdownDetection) -> Option<crate::driver::ElementRef> {
        for selector in [chip_button_selector(), chip_remove_fallback()] {
            match self.driver.locate(Some(&detection.root), &selector).await {
                Ok(chips) if !chips.is_empty() => return chips.into_iter().next(),
                Ok(_) => continue,
                Err(e) => {
                    debug!(error = %e, "chip lookup failed");
                    return None;
                }
            }
        }
        None
    }
}
