//! Per-kind selection procedures.
//!
//! Dispatch is an exhaustive match over [`DropdownKind`], so adding a kind
//! forces every arm to be written. Each arm treats open/dismiss as a paired
//! scope: whatever happens between opening a popup and reporting the outcome,
//! the popup gets its dismissal signal before the result leaves this module.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::clock::Sleeper;
use crate::driver::{ElementRef, UiDriver};
use crate::errors::DropdownError;
use crate::overlay::OverlaySession;
use crate::scanner::VirtualizedScanner;
use crate::types::{DropdownDetection, DropdownKind, PopupHandle, ScanConfig};

/// Delay after typing into an autocomplete, letting the host filter re-render.
const FILTER_SETTLE: Duration = Duration::from_millis(200);

pub struct SelectionStrategy {
    driver: Arc<dyn UiDriver>,
    sleeper: Arc<dyn Sleeper>,
    overlay: OverlaySession,
    scanner: VirtualizedScanner,
    scan_config: ScanConfig,
}

impl SelectionStrategy {
    pub fn new(
        driver: Arc<dyn UiDriver>,
        sleeper: Arc<dyn Sleeper>,
        scan_config: ScanConfig,
    ) -> Self {
        let overlay = OverlaySession::new(driver.clone(), sleeper.clone());
        let scanner = VirtualizedScanner::new(driver.clone(), sleeper.clone());
        Self {
            driver,
            sleeper,
            overlay,
            scanner,
            scan_config,
        }
    }

    /// Attempt to select one value on an already-classified control.
    ///
    /// `Ok(false)` means the value could not be selected this attempt (absent
    /// option, transient driver glitch); the retry layer above decides whether
    /// to try again. Only popup-visibility timeouts surface as errors.
    #[instrument(level = "debug", skip(self, detection), fields(kind = %detection.kind))]
    pub async fn select_value(
        &self,
        label: &str,
        detection: &DropdownDetection,
        value: &str,
        case_sensitive: bool,
    ) -> Result<bool, DropdownError> {
        match detection.kind {
            DropdownKind::NativeSelect => self.select_native(detection, value).await,
            DropdownKind::PopupSelect => {
                self.select_popup(label, detection, value, case_sensitive)
                    .await
            }
            DropdownKind::Autocomplete => {
                self.select_autocomplete(label, detection, value, case_sensitive)
                    .await
            }
        }
    }

    /// Like [`select_value`](Self::select_value), but folds "option absent"
    /// into the error channel so the retry layer treats it as a failed
    /// attempt.
    pub async fn select_once(
        &self,
        label: &str,
        detection: &DropdownDetection,
        value: &str,
        case_sensitive: bool,
    ) -> Result<(), DropdownError> {
        if self
            .select_value(label, detection, value, case_sensitive)
            .await?
        {
            Ok(())
        } else {
            Err(DropdownError::NotFound(format!(
                "option '{value}' not found in '{label}'"
            )))
        }
    }

    /// Native list controls select by visible text in a single driver call; no
    /// popup lifecycle is involved and success is whatever the set-operation
    /// reports.
    async fn select_native(
        &self,
        detection: &DropdownDetection,
        value: &str,
    ) -> Result<bool, DropdownError> {
        let Some(native) = detection.native_control.as_ref() else {
            return Ok(false);
        };
        match self.driver.select_text(native, value).await {
            Ok(()) => Ok(true),
            Err(e) => {
                debug!(value, error = %e, "native select-by-text rejected");
                Ok(false)
            }
        }
    }

    /// Popup selects never filter by typing; the only way to the option is
    /// through the scanner.
    async fn select_popup(
        &self,
        label: &str,
        detection: &DropdownDetection,
        value: &str,
        case_sensitive: bool,
    ) -> Result<bool, DropdownError> {
        let popup = self.overlay.open(label, &detection.trigger).await?;

        let found = self
            .scanner
            .find(&popup, value, case_sensitive, &self.scan_config)
            .await
            .unwrap_or(None);
        let committed = match found {
            Some(option) => self.commit(&option, value).await,
            None => false,
        };

        self.overlay.dismiss(&popup).await;
        Ok(committed)
    }

    /// Autocompletes get three chances, cheapest first: the options already
    /// rendered, the host's own typed filtering, and finally a full scroll
    /// scan of the virtualized list.
    async fn select_autocomplete(
        &self,
        label: &str,
        detection: &DropdownDetection,
        value: &str,
        case_sensitive: bool,
    ) -> Result<bool, DropdownError> {
        let Some(input) = detection.input.as_ref() else {
            return Ok(false);
        };
        let mut popup = self.overlay.open(label, input).await?;

        let rendered_only = ScanConfig::rendered_only();
        let mut found = self
            .scanner
            .find(&popup, value, case_sensitive, &rendered_only)
            .await
            .unwrap_or(None);

        if found.is_none() {
            if let Some(filtered) = self.filter_by_typing(label, input, value).await {
                popup = filtered;
                found = self
                    .scanner
                    .find(&popup, value, case_sensitive, &rendered_only)
                    .await
                    .unwrap_or(None);
            }
        }

        if found.is_none() {
            found = self
                .scanner
                .find(&popup, value, case_sensitive, &self.scan_config)
                .await
                .unwrap_or(None);
        }

        let committed = match found {
            Some(option) => self.commit(&option, value).await,
            None => false,
        };

        self.overlay.dismiss(&popup).await;
        Ok(committed)
    }

    /// Type the full target value so the host narrows the list itself, then
    /// re-acquire the popup (typing can tear down and re-render the overlay).
    async fn filter_by_typing(
        &self,
        label: &str,
        input: &ElementRef,
        value: &str,
    ) -> Option<PopupHandle> {
        if self.driver.fill(input, "").await.is_err() {
            return None;
        }
        if self.driver.type_text(input, value).await.is_err() {
            return None;
        }
        self.sleeper.sleep(FILTER_SETTLE).await;

        match self.overlay.await_popup(label).await {
            Ok(popup) => Some(popup),
            Err(e) => {
                debug!(label, error = %e, "popup gone after typed filtering");
                None
            }
        }
    }

    /// Click the matched option. A failed commit click is a per-attempt
    /// failure, not an error.
    async fn commit(&self, option: &ElementRef, value: &str) -> bool {
        match self.driver.click(option).await {
            Ok(()) => {
                debug!(value, "option clicked");
                true
            }
            Err(e) => {
                warn!(value, error = %e, "click on matched option failed");
                false
            }
        }
    }
}
