//! Value types shared across the engine.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::driver::ElementRef;

/// The recognized dropdown shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropdownKind {
    /// A standard native list control.
    NativeSelect,
    /// A popup-menu-style single-select opened by clicking a trigger.
    PopupSelect,
    /// A filterable multi-select with a typeable input and chip indicators.
    Autocomplete,
}

impl DropdownKind {
    /// Whether this kind can hold more than one selected value at once.
    ///
    /// Native list controls report their own capability through an explicit
    /// `multiple` marker, checked by the classifier; this is the kind-level
    /// baseline.
    pub fn multi_by_default(&self) -> bool {
        matches!(self, DropdownKind::Autocomplete)
    }
}

impl std::fmt::Display for DropdownKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DropdownKind::NativeSelect => "native select",
            DropdownKind::PopupSelect => "popup select",
            DropdownKind::Autocomplete => "autocomplete",
        };
        write!(f, "{s}")
    }
}

/// One classified dropdown, scoped to a single engine invocation.
///
/// Detections are never cached across calls: the same label may resolve to
/// different elements as the document mutates, so classification is redone
/// from scratch every time.
#[derive(Debug, Clone)]
pub struct DropdownDetection {
    pub kind: DropdownKind,
    /// The field root: smallest container scoping the whole logical control.
    pub root: ElementRef,
    /// The element clicked to open the control.
    pub trigger: ElementRef,
    /// The typeable input, present for `Autocomplete` only.
    pub input: Option<ElementRef>,
    /// The native list element, present for `NativeSelect` only.
    pub native_control: Option<ElementRef>,
    /// Whether the control advertises multi-selection support.
    pub multiple: bool,
}

/// Per-call configuration for selection and clearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectOptions {
    /// Compare option texts case-sensitively.
    pub case_sensitive: bool,
    /// Attempts per clear/select operation; values below 1 are treated as 1.
    pub retries: u32,
    /// Fixed delay between attempts, in milliseconds.
    pub retry_timeout_ms: u64,
    /// Fail with `Ambiguous` when a label matches more than one field root.
    pub strict: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            retries: 2,
            retry_timeout_ms: 1000,
            strict: true,
        }
    }
}

impl SelectOptions {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_timeout_ms)
    }

    pub fn effective_retries(&self) -> u32 {
        self.retries.max(1)
    }
}

/// Tuning for the virtualized-list scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Hard bound on scroll iterations.
    pub max_iterations: usize,
    /// Fixed scroll advance per iteration, in pixels.
    pub scroll_step_px: f64,
    /// Settle interval after each scroll, letting the host re-render.
    pub settle: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            scroll_step_px: 250.0,
            settle: Duration::from_millis(150),
        }
    }
}

impl ScanConfig {
    /// A config that inspects only the currently rendered window, no scrolling.
    pub fn rendered_only() -> Self {
        Self {
            max_iterations: 1,
            ..Self::default()
        }
    }
}

/// Transient handle to the currently open option-list container.
///
/// Valid only until the widget closes or is reopened; never persisted.
#[derive(Debug, Clone)]
pub struct PopupHandle {
    pub container: ElementRef,
}

/// Outcome of a `set_dropdown` call.
///
/// Either every requested value failed, or a per-value map with at least one
/// successful entry. Failed entries stay in the map so callers can see partial
/// success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionResult {
    /// Every requested value failed to select. Serializes as JSON `false`.
    AllFailed,
    /// Per-value outcome; contains at least one `true` entry.
    PerValue(BTreeMap<String, bool>),
}

impl SelectionResult {
    /// Build a result from per-value outcomes, collapsing an all-false map
    /// into `AllFailed` to uphold the at-least-one-success invariant.
    pub fn from_outcomes(outcomes: BTreeMap<String, bool>) -> Self {
        if outcomes.values().any(|ok| *ok) {
            SelectionResult::PerValue(outcomes)
        } else {
            SelectionResult::AllFailed
        }
    }

    /// Whether at least one requested value was selected.
    pub fn any_succeeded(&self) -> bool {
        matches!(self, SelectionResult::PerValue(_))
    }

    /// Whether the given value was selected.
    pub fn succeeded(&self, value: &str) -> bool {
        match self {
            SelectionResult::AllFailed => false,
            SelectionResult::PerValue(map) => map.get(value).copied().unwrap_or(false),
        }
    }
}

impl Serialize for SelectionResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            SelectionResult::AllFailed => serializer.serialize_bool(false),
            SelectionResult::PerValue(map) => map.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_false_outcomes_collapse_into_all_failed() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert("a".to_string(), false);
        outcomes.insert("b".to_string(), false);
        assert_eq!(
            SelectionResult::from_outcomes(outcomes),
            SelectionResult::AllFailed
        );
    }

    #[test]
    fn partial_success_keeps_failed_entries_in_the_map() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert("a".to_string(), true);
        outcomes.insert("b".to_string(), false);
        let result = SelectionResult::from_outcomes(outcomes);
        assert!(result.any_succeeded());
        assert!(result.succeeded("a"));
        assert!(!result.succeeded("b"));
    }

    #[test]
    fn selection_result_serializes_as_false_or_map() {
        let failed = serde_json::to_value(SelectionResult::AllFailed).unwrap();
        assert_eq!(failed, serde_json::json!(false));

        let mut outcomes = BTreeMap::new();
        outcomes.insert("Germany".to_string(), true);
        outcomes.insert("Atlantis".to_string(), false);
        let partial = serde_json::to_value(SelectionResult::from_outcomes(outcomes)).unwrap();
        assert_eq!(
            partial,
            serde_json::json!({"Germany": true, "Atlantis": false})
        );
    }

    #[test]
    fn select_options_defaults_match_the_documented_contract() {
        let opts = SelectOptions::default();
        assert!(opts.case_sensitive);
        assert_eq!(opts.retries, 2);
        assert_eq!(opts.retry_timeout_ms, 1000);
        assert!(opts.strict);
    }

    #[test]
    fn select_options_deserialize_with_camel_case_and_defaults() {
        let opts: SelectOptions =
            serde_json::from_str(r#"{"caseSensitive": false, "retries": 5}"#).unwrap();
        assert!(!opts.case_sensitive);
        assert_eq!(opts.retries, 5);
        assert_eq!(opts.retry_timeout_ms, 1000);
        assert!(opts.strict);
    }

    #[test]
    fn retries_below_one_are_clamped() {
        let opts = SelectOptions {
            retries: 0,
            ..Default::default()
        };
        assert_eq!(opts.effective_retries(), 1);
    }
}
