//! The capability interface consumed from the underlying UI-automation driver.
//!
//! The dropdown engine never talks to a document directly; every query, click,
//! keystroke and scroll goes through [`UiDriver`]. Implementations adapt a real
//! driver (a browser automation session, an accessibility engine, ...) or, in
//! tests, an in-memory document tree.

use std::time::Duration;

use crate::selector::Selector;

/// Opaque handle to one element in the driven document.
///
/// The engine treats the inner id as meaningless; only the driver that issued
/// the handle can resolve it. Handles may go stale as the document mutates, in
/// which case driver calls fail with [`DriverError::StaleElement`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Failures reported by driver primitives.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("no element matched {0}")]
    NoMatch(String),

    #[error("stale element handle: {0}")]
    StaleElement(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("operation not supported by this element: {0}")]
    Unsupported(String),

    #[error("driver failure: {0}")]
    Backend(String),
}

/// The narrow set of primitives the engine needs from a UI-automation driver.
///
/// Every call is a single round-trip against the live document and returns
/// binary success/failure; the engine layers waiting, retrying and matching on
/// top. A `scope` of `None` means "search the whole document".
#[async_trait::async_trait]
pub trait UiDriver: Send + Sync {
    /// Find all elements matching a selector, in document order.
    async fn locate(
        &self,
        scope: Option<&ElementRef>,
        selector: &Selector,
    ) -> Result<Vec<ElementRef>, DriverError>;

    /// The direct parent of an element, or `None` at the document root.
    async fn parent(&self, element: &ElementRef) -> Result<Option<ElementRef>, DriverError>;

    async fn click(&self, element: &ElementRef) -> Result<(), DriverError>;

    async fn hover(&self, element: &ElementRef) -> Result<(), DriverError>;

    /// Type text into a focusable element, key by key, appending to its value.
    async fn type_text(&self, element: &ElementRef, text: &str) -> Result<(), DriverError>;

    /// Replace an input's value wholesale.
    async fn fill(&self, element: &ElementRef, text: &str) -> Result<(), DriverError>;

    async fn attribute(
        &self,
        element: &ElementRef,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    /// The element's rendered text content, untrimmed.
    async fn inner_text(&self, element: &ElementRef) -> Result<String, DriverError>;

    /// Serialized subtree of the element, used only for failure diagnostics.
    async fn outer_html(&self, element: &ElementRef) -> Result<String, DriverError>;

    /// Whether the element is currently rendered and visible.
    async fn is_visible(&self, element: &ElementRef) -> Result<bool, DriverError>;

    /// Block until the element is visible, up to `timeout`.
    async fn wait_visible(
        &self,
        element: &ElementRef,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    /// Block until the element is hidden or detached, up to `timeout`.
    async fn wait_hidden(
        &self,
        element: &ElementRef,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    /// Current vertical scroll offset of a scrollable container.
    async fn scroll_top(&self, container: &ElementRef) -> Result<f64, DriverError>;

    /// Advance a container's vertical scroll offset by `delta` pixels.
    async fn scroll_by(&self, container: &ElementRef, delta: f64) -> Result<(), DriverError>;

    /// Send a key press to the document (e.g. `"Escape"` to dismiss overlays).
    async fn press_key(&self, key: &str) -> Result<(), DriverError>;

    /// Select an option on a native list control by its visible text.
    async fn select_text(&self, element: &ElementRef, text: &str) -> Result<(), DriverError>;

    /// Reset a native list control to an empty selection.
    async fn clear_selection(&self, element: &ElementRef) -> Result<(), DriverError>;
}
