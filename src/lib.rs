//! Uniform dropdown resolution for UI-automation test drivers
//!
//! Rendered forms grow dropdowns in at least three incompatible shapes: native
//! list controls, popup-menu single-selects, and filterable multi-selects with
//! virtualized option lists. This crate layers one selection/clearing protocol
//! over all of them: classify the widget by label proximity, validate request
//! cardinality, clear existing selections, then locate and click each requested
//! option, scrolling through lazily-rendered lists and retrying around flaky
//! timing along the way.
//!
//! The underlying driver (element query, click, type, scroll) is consumed
//! through the [`UiDriver`] capability trait; any automation backend that can
//! implement those primitives can sit underneath.
//!
//! ```no_run
//! use std::sync::Arc;
//! use dropkit::{DropdownSession, SelectOptions, UiDriver};
//!
//! # async fn demo(driver: Arc<dyn UiDriver>) -> Result<(), dropkit::DropdownError> {
//! let session = DropdownSession::new(driver);
//! let result = session
//!     .set_dropdown("Country", &["Germany"], &SelectOptions::default())
//!     .await?;
//! assert!(result.succeeded("Germany"));
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, instrument};

pub mod cardinality;
pub mod classify;
pub mod clearer;
pub mod clock;
pub mod driver;
pub mod errors;
pub mod matcher;
pub mod overlay;
pub mod retry;
pub mod scanner;
pub mod selector;
pub mod strategy;
#[cfg(test)]
mod tests;
pub mod types;

pub use clock::{NoopSleeper, Sleeper, TokioSleeper};
pub use driver::{DriverError, ElementRef, UiDriver};
pub use errors::DropdownError;
pub use selector::Selector;
pub use types::{
    DropdownDetection, DropdownKind, PopupHandle, ScanConfig, SelectOptions, SelectionResult,
};

use classify::WidgetClassifier;
use clearer::Clearer;
use overlay::OverlaySession;
use scanner::VirtualizedScanner;
use strategy::SelectionStrategy;

/// The main entry point for dropdown automation.
///
/// One session wraps one driver; every operation re-resolves its label from
/// scratch against the live document, so sessions stay valid across document
/// mutations. Operations run one at a time: which popup is "the open one" is
/// ambient state of the whole document, so callers running several fields in
/// parallel must serialize externally.
pub struct DropdownSession {
    driver: Arc<dyn UiDriver>,
    sleeper: Arc<dyn Sleeper>,
    scan_config: ScanConfig,
}

impl DropdownSession {
    pub fn new(driver: Arc<dyn UiDriver>) -> Self {
        Self {
            driver,
            sleeper: Arc::new(TokioSleeper),
            scan_config: ScanConfig::default(),
        }
    }

    /// Replace the sleep dependency; tests use this to run without real time.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Tune virtualized-list scanning.
    pub fn with_scan_config(mut self, config: ScanConfig) -> Self {
        self.scan_config = config;
        self
    }

    /// Select `values` on the dropdown labelled `label`.
    ///
    /// An empty value list returns [`SelectionResult::AllFailed`] without
    /// touching the document. Classification and cardinality errors are fatal;
    /// per-value failures are recorded in the result map and the remaining
    /// values are still attempted, so a batch can partially succeed.
    #[instrument(level = "debug", skip(self, options))]
    pub async fn set_dropdown(
        &self,
        label: &str,
        values: &[&str],
        options: &SelectOptions,
    ) -> Result<SelectionResult, DropdownError> {
        if values.is_empty() {
            debug!(label, "no values requested");
            return Ok(SelectionResult::AllFailed);
        }

        let detection = self.detect(label, options).await?;
        cardinality::validate(label, &detection, values.len())?;

        let clearer = Clearer::new(self.driver.clone());
        retry::with_retries(
            || clearer.clear(&detection),
            options.effective_retries(),
            options.retry_delay(),
            self.sleeper.as_ref(),
        )
        .await?;

        let strategy = SelectionStrategy::new(
            self.driver.clone(),
            self.sleeper.clone(),
            self.scan_config.clone(),
        );

        let mut outcomes: BTreeMap<String, bool> = BTreeMap::new();
        for value in values {
            let attempt = retry::with_retries(
                || strategy.select_once(label, &detection, value, options.case_sensitive),
                options.effective_retries(),
                options.retry_delay(),
                self.sleeper.as_ref(),
            )
            .await;

            let selected = attempt.is_ok();
            debug!(label, value, selected, "value attempted");
            outcomes.insert((*value).to_string(), selected);
        }

        Ok(SelectionResult::from_outcomes(outcomes))
    }

    /// Remove the current selection(s) from the dropdown labelled `label`.
    #[instrument(level = "debug", skip(self, options))]
    pub async fn clear_dropdown(
        &self,
        label: &str,
        options: &SelectOptions,
    ) -> Result<(), DropdownError> {
        let detection = self.detect(label, options).await?;
        let clearer = Clearer::new(self.driver.clone());
        retry::with_retries(
            || clearer.clear(&detection),
            options.effective_retries(),
            options.retry_delay(),
            self.sleeper.as_ref(),
        )
        .await
    }

    /// Enumerate the option texts the dropdown offers, scrolling through the
    /// whole virtualized list where necessary.
    #[instrument(level = "debug", skip(self, options))]
    pub async fn dropdown_options(
        &self,
        label: &str,
        options: &SelectOptions,
    ) -> Result<Vec<String>, DropdownError> {
        let detection = self.detect(label, options).await?;

        if let Some(native) = detection.native_control.as_ref() {
            let option_els = self
                .driver
                .locate(Some(native), &Selector::Tag("option".to_string()))
                .await?;
            let mut texts = Vec::with_capacity(option_els.len());
            for el in option_els {
                texts.push(self.driver.inner_text(&el).await?.trim().to_string());
            }
            return Ok(texts);
        }

        let overlay = OverlaySession::new(self.driver.clone(), self.sleeper.clone());
        let scanner = VirtualizedScanner::new(self.driver.clone(), self.sleeper.clone());

        let popup = overlay.open(label, &detection.trigger).await?;
        let texts = scanner.collect(&popup, &self.scan_config).await;
        overlay.dismiss(&popup).await;
        texts
    }

    /// Classify the dropdown without interacting with it; handy for harnesses
    /// deciding how to drive a field.
    #[instrument(level = "debug", skip(self, options))]
    pub async fn dropdown_kind(
        &self,
        label: &str,
        options: &SelectOptions,
    ) -> Result<DropdownKind, DropdownError> {
        Ok(self.detect(label, options).await?.kind)
    }

    /// Classification is redone from scratch on every operation; detections
    /// are intentionally never cached across calls.
    async fn detect(
        &self,
        label: &str,
        options: &SelectOptions,
    ) -> Result<DropdownDetection, DropdownError> {
        WidgetClassifier::new(self.driver.clone(), options.strict)
            .detect(label)
            .await
    }
}

impl Clone for DropdownSession {
    fn clone(&self) -> Self {
        Self {
            driver: self.driver.clone(),
            sleeper: self.sleeper.clone(),
            scan_config: self.scan_config.clone(),
        }
    }
}
