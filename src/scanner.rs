//! Incremental scanning of virtualized option lists.
//!
//! Lazily-rendered lists materialize only a visible window of option elements;
//! the target may not exist in the document yet. The scanner alternates
//! between matching the currently rendered window and advancing the
//! container's scroll offset by a fixed step, until the offset stops moving,
//! the iteration bound is hit, or a match turns up.
//!
//! The scanner never reopens a popup: keeping the popup alive is the caller's
//! concern, searching within it is ours.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::clock::Sleeper;
use crate::driver::{ElementRef, UiDriver};
use crate::errors::DropdownError;
use crate::matcher::texts_equal;
use crate::selector::Selector;
use crate::types::{PopupHandle, ScanConfig};

pub(crate) fn option_selector() -> Selector {
    Selector::Any(vec![
        Selector::Role("option".to_string()),
        Selector::Tag("li".to_string()),
    ])
}

pub struct VirtualizedScanner {
    driver: Arc<dyn UiDriver>,
    sleeper: Arc<dyn Sleeper>,
}

impl VirtualizedScanner {
    pub fn new(driver: Arc<dyn UiDriver>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { driver, sleeper }
    }

    /// Search the popup for an option whose text equals `target`.
    ///
    /// Returns `Ok(None)` when the list is exhausted or the iteration bound is
    /// reached without a match. Driver-primitive failures mid-scan are treated
    /// as "no match this attempt" rather than propagated; the retry layer above
    /// decides the final disposition.
    pub async fn find(
        &self,
        popup: &PopupHandle,
        target: &str,
        case_sensitive: bool,
        config: &ScanConfig,
    ) -> Result<Option<ElementRef>, DropdownError> {
        let mut previous_offset: Option<f64> = None;

        for iteration in 0..config.max_iterations {
            if let Some(hit) = self.match_rendered(popup, target, case_sensitive).await {
                debug!(target, iteration, "option matched");
                return Ok(Some(hit));
            }
            if iteration + 1 == config.max_iterations {
                break;
            }

            let Ok(offset) = self.driver.scroll_top(&popup.container).await else {
                return Ok(None);
            };
            if previous_offset == Some(offset) {
                // Scroll position stabilized: the list is exhausted.
                debug!(target, iteration, offset, "scroll stabilized without match");
                return Ok(None);
            }
            previous_offset = Some(offset);

            if self
                .driver
                .scroll_by(&popup.container, config.scroll_step_px)
                .await
                .is_err()
            {
                return Ok(None);
            }
            self.sleeper.sleep(config.settle).await;
        }

        debug!(target, "iteration bound reached without match");
        Ok(None)
    }

    /// Enumerate every option text the popup can render, scrolling through the
    /// whole virtualized list. Texts are returned trimmed, in encounter order,
    /// deduplicated.
    pub async fn collect(
        &self,
        popup: &PopupHandle,
        config: &ScanConfig,
    ) -> Result<Vec<String>, DropdownError> {
        let mut seen: Vec<String> = Vec::new();
        let mut previous_offset: Option<f64> = None;

        for iteration in 0..config.max_iterations {
            for text in self.rendered_texts(popup).await {
                if !seen.contains(&text) {
                    seen.push(text);
                }
            }
            if iteration + 1 == config.max_iterations {
                break;
            }

            let Ok(offset) = self.driver.scroll_top(&popup.container).await else {
                break;
            };
            if previous_offset == Some(offset) {
                break;
            }
            previous_offset = Some(offset);

            if self
                .driver
                .scroll_by(&popup.container, config.scroll_step_px)
                .await
                .is_err()
            {
                break;
            }
            self.sleeper.sleep(config.settle).await;
        }

        Ok(seen)
    }

    /// Match against the currently rendered window only.
    async fn match_rendered(
        &self,
        popup: &PopupHandle,
        target: &str,
        case_sensitive: bool,
    ) -> Option<ElementRef> {
        let options = self
            .driver
            .locate(Some(&popup.container), &option_selector())
            .await
            .unwrap_or_default();
        trace!(rendered = options.len(), "checking rendered options");

        for option in options {
            let Ok(text) = self.driver.inner_text(&option).await else {
                continue;
            };
            if texts_equal(&text, target, case_sensitive) {
                return Some(option);
            }
        }
        None
    }

    async fn rendered_texts(&self, popup: &PopupHandle) -> Vec<String> {
        let options = self
            .driver
            .locate(Some(&popup.container), &option_selector())
            .await
            .unwrap_or_default();

        let mut texts = Vec::with_capacity(options.len());
        for option in options {
            if let Ok(text) = self.driver.inner_text(&option).await {
                texts.push(text.trim().to_string());
            }
        }
        texts
    }
}
