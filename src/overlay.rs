//! Popup lifecycle as an explicit session object.
//!
//! Which overlay is "the open one" is an ambient property of the whole
//! document, not of any single call. [`OverlaySession`] makes that state
//! explicit: it owns opening the popup for one widget and dismissing it again,
//! and strategies route every exit path (success or failure) through
//! [`OverlaySession::dismiss`] so no open overlay leaks into the next field
//! interaction.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::clock::Sleeper;
use crate::driver::{ElementRef, UiDriver};
use crate::errors::DropdownError;
use crate::selector::Selector;
use crate::types::PopupHandle;

/// How long an opened widget gets to render its popup.
const POPUP_WAIT: Duration = Duration::from_millis(2000);

/// Poll interval while waiting for the popup container to appear.
const POPUP_POLL: Duration = Duration::from_millis(50);

/// Budget for the popup to disappear after the dismissal signal.
const DISMISS_WAIT: Duration = Duration::from_millis(500);

pub(crate) fn popup_selector() -> Selector {
    Selector::Any(vec![
        Selector::Role("listbox".to_string()),
        Selector::Role("menu".to_string()),
        Selector::Class("dropdown-popup".to_string()),
    ])
}

pub struct OverlaySession {
    driver: Arc<dyn UiDriver>,
    sleeper: Arc<dyn Sleeper>,
}

impl OverlaySession {
    pub fn new(driver: Arc<dyn UiDriver>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { driver, sleeper }
    }

    /// Click the widget's trigger and wait for its option popup to render.
    ///
    /// Fails with [`DropdownError::SelectionTimeout`] when no visible popup
    /// container appears within the wait budget.
    pub async fn open(
        &self,
        label: &str,
        trigger: &ElementRef,
    ) -> Result<PopupHandle, DropdownError> {
        self.driver.click(trigger).await?;
        self.await_popup(label).await
    }

    /// Wait for a visible popup container without interacting first; used when
    /// the widget was opened by focusing/typing rather than a trigger click.
    pub async fn await_popup(&self, label: &str) -> Result<PopupHandle, DropdownError> {
        let selector = popup_selector();
        let mut waited = Duration::ZERO;
        loop {
            let candidates = match self.driver.locate(None, &selector).await {
                Ok(els) => els,
                Err(_) => Vec::new(),
            };
            for el in candidates {
                if self.driver.is_visible(&el).await.unwrap_or(false) {
                    debug!(label, popup = %el, "popup visible");
                    return Ok(PopupHandle { container: el });
                }
            }
            if waited >= POPUP_WAIT {
                return Err(DropdownError::SelectionTimeout(label.to_string()));
            }
            self.sleeper.sleep(POPUP_POLL).await;
            waited += POPUP_POLL;
        }
    }

    /// Best-effort dismissal of the open popup.
    ///
    /// A single escape-equivalent signal is sent regardless of widget kind. If
    /// the popup is still visible afterwards that is logged and swallowed: a
    /// lingering overlay is observable in traces but must not fail a selection
    /// that already committed.
    pub async fn dismiss(&self, popup: &PopupHandle) {
        if let Err(e) = self.driver.press_key("Escape").await {
            warn!(error = %e, "dismissal keypress failed");
            return;
        }
        if self
            .driver
            .wait_hidden(&popup.container, DISMISS_WAIT)
            .await
            .is_err()
        {
            warn!(popup = %popup.container, "popup still visible after dismissal signal");
        }
    }
}
