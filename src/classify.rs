//! Widget-kind detection by label proximity.
//!
//! Given a human-visible label, the classifier resolves the field root (the
//! smallest container scoping the logical control) and decides which of the
//! three recognized dropdown shapes lives inside it. Classification runs from
//! scratch on every call; detections are never reused across invocations.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::driver::{ElementRef, UiDriver};
use crate::errors::DropdownError;
use crate::selector::Selector;
use crate::types::{DropdownDetection, DropdownKind};

/// Levels of ancestry walked when resolving a field root from a label node.
const MAX_ANCESTOR_DEPTH: usize = 10;

/// Characters of serialized subtree included in classification diagnostics.
const DIAGNOSTIC_HTML_LIMIT: usize = 500;

fn interactive_selector() -> Selector {
    Selector::Any(vec![
        Selector::Tag("select".to_string()),
        Selector::Tag("input".to_string()),
        Selector::Tag("textarea".to_string()),
        Selector::Role("combobox".to_string()),
        Selector::Tag("button".to_string()),
        Selector::Role("button".to_string()),
    ])
}

fn clickable_selector() -> Selector {
    Selector::Any(vec![
        Selector::Tag("button".to_string()),
        Selector::Role("button".to_string()),
        Selector::attr("tabindex"),
    ])
}

fn autocomplete_input_selector() -> Selector {
    Selector::All(vec![
        Selector::Tag("input".to_string()),
        Selector::Any(vec![
            Selector::Role("combobox".to_string()),
            Selector::attr("aria-autocomplete"),
        ]),
    ])
}

/// Class names that mark a form-group-like container around a label.
const FORM_GROUP_CLASSES: &[&str] = &["form-group", "form-field", "field", "form-item"];

pub struct WidgetClassifier {
    driver: Arc<dyn UiDriver>,
    strict: bool,
}

impl WidgetClassifier {
    pub fn new(driver: Arc<dyn UiDriver>, strict: bool) -> Self {
        Self { driver, strict }
    }

    /// Resolve and classify the dropdown behind `label`.
    ///
    /// Fails with [`DropdownError::NotFound`] when no field root resolves, or
    /// [`DropdownError::Ambiguous`] in strict mode when the label matches more
    /// than one candidate root.
    #[instrument(level = "debug", skip(self))]
    pub async fn detect(&self, label: &str) -> Result<DropdownDetection, DropdownError> {
        let mut roots = self.candidate_roots(label).await?;

        if roots.is_empty() {
            return Err(DropdownError::NotFound(format!(
                "no field root resolved for label '{label}'"
            )));
        }
        if roots.len() > 1 {
            if self.strict {
                return Err(DropdownError::Ambiguous {
                    label: label.to_string(),
                    candidates: roots.len(),
                });
            }
            warn!(
                label,
                candidates = roots.len(),
                "ambiguous label, picking first candidate root"
            );
        }
        let root = roots.remove(0);

        self.classify_root(label, root).await
    }

    /// Ordered detection inside the field root, first success wins.
    ///
    /// The typeable combobox check runs strictly before the popup-trigger
    /// fallback: "any clickable thing" is the least specific heuristic and
    /// would otherwise shadow the more precise matches.
    async fn classify_root(
        &self,
        label: &str,
        root: ElementRef,
    ) -> Result<DropdownDetection, DropdownError> {
        // 1. Native list control.
        let natives = self
            .driver
            .locate(Some(&root), &Selector::Tag("select".to_string()))
            .await?;
        if let Some(native) = natives.into_iter().next() {
            let multiple = self
                .driver
                .attribute(&native, "multiple")
                .await
                .unwrap_or(None)
                .is_some();
            debug!(label, multiple, "classified as native select");
            return Ok(DropdownDetection {
                kind: DropdownKind::NativeSelect,
                root,
                trigger: native.clone(),
                input: None,
                native_control: Some(native),
                multiple,
            });
        }

        // 2. Typeable input with an autocomplete/combobox marker.
        let inputs = self
            .driver
            .locate(Some(&root), &autocomplete_input_selector())
            .await?;
        if let Some(input) = inputs.into_iter().next() {
            debug!(label, "classified as autocomplete");
            return Ok(DropdownDetection {
                kind: DropdownKind::Autocomplete,
                root,
                trigger: input.clone(),
                input: Some(input),
                native_control: None,
                multiple: true,
            });
        }

        // 3. Popup trigger role, falling back to any clickable descendant.
        let mut triggers = self
            .driver
            .locate(Some(&root), &Selector::attr("aria-haspopup"))
            .await?;
        if triggers.is_empty() {
            triggers = self.driver.locate(Some(&root), &clickable_selector()).await?;
        }
        if let Some(trigger) = triggers.into_iter().next() {
            debug!(label, "classified as popup select");
            return Ok(DropdownDetection {
                kind: DropdownKind::PopupSelect,
                root,
                trigger,
                input: None,
                native_control: None,
                multiple: false,
            });
        }

        let snippet: String = self
            .driver
            .outer_html(&root)
            .await
            .unwrap_or_else(|_| String::from("<unserializable subtree>"))
            .chars()
            .take(DIAGNOSTIC_HTML_LIMIT)
            .collect();
        Err(DropdownError::NotFound(format!(
            "field root for '{label}' contains no recognizable dropdown: {snippet}"
        )))
    }

    /// Resolve candidate field roots for a label, deduplicated, in the order
    /// the fallback chain produced them.
    async fn candidate_roots(&self, label: &str) -> Result<Vec<ElementRef>, DropdownError> {
        let label_nodes = self.resolve_label_nodes(label).await?;

        let mut roots: Vec<ElementRef> = Vec::new();
        for node in label_nodes {
            if let Some(root) = self.field_root_of(&node).await? {
                if !roots.contains(&root) {
                    roots.push(root);
                }
            }
        }
        Ok(roots)
    }

    /// Ordered label-node fallback: explicit `label` elements, then text nodes
    /// inside a form-group-like container, then any visible text match.
    async fn resolve_label_nodes(&self, label: &str) -> Result<Vec<ElementRef>, DropdownError> {
        // 1. Explicit label elements. A `for` attribute wins outright: the
        //    associated control is the most precise anchor available.
        let labels = self
            .driver
            .locate(
                None,
                &Selector::All(vec![
                    Selector::Tag("label".to_string()),
                    Selector::Text(label.to_string()),
                ]),
            )
            .await?;
        if !labels.is_empty() {
            let mut anchors = Vec::new();
            for node in labels {
                match self.driver.attribute(&node, "for").await.unwrap_or(None) {
                    Some(target_id) if !target_id.is_empty() => {
                        let controls = self
                            .driver
                            .locate(None, &Selector::attr_eq("id", &target_id))
                            .await?;
                        match controls.into_iter().next() {
                            Some(control) => anchors.push(control),
                            None => anchors.push(node),
                        }
                    }
                    _ => anchors.push(node),
                }
            }
            return Ok(anchors);
        }

        // 2. Text nodes whose ancestry contains a form-group-like container.
        let text_nodes = self
            .driver
            .locate(None, &Selector::Text(label.to_string()))
            .await?;
        let mut grouped = Vec::new();
        for node in &text_nodes {
            if self.form_group_ancestor(node).await?.is_some() {
                grouped.push(node.clone());
            }
        }
        if !grouped.is_empty() {
            return Ok(grouped);
        }

        // 3. Visible-text fallback.
        let mut visible = Vec::new();
        for node in text_nodes {
            if self.driver.is_visible(&node).await.unwrap_or(false) {
                visible.push(node);
            }
        }
        Ok(visible)
    }

    /// Nearest ancestor of `node` that contains an interactive descendant.
    async fn field_root_of(
        &self,
        node: &ElementRef,
    ) -> Result<Option<ElementRef>, DropdownError> {
        let mut current = node.clone();
        for _ in 0..MAX_ANCESTOR_DEPTH {
            let Some(parent) = self.driver.parent(&current).await? else {
                return Ok(None);
            };
            let interactive = self
                .driver
                .locate(Some(&parent), &interactive_selector())
                .await?;
            if !interactive.is_empty() {
                return Ok(Some(parent));
            }
            current = parent;
        }
        Ok(None)
    }

    async fn form_group_ancestor(
        &self,
        node: &ElementRef,
    ) -> Result<Option<ElementRef>, DropdownError> {
        let mut current = node.clone();
        for _ in 0..MAX_ANCESTOR_DEPTH {
            let Some(parent) = self.driver.parent(&current).await? else {
                return Ok(None);
            };
            let class_list = self
                .driver
                .attribute(&parent, "class")
                .await
                .unwrap_or(None)
                .unwrap_or_default();
            if class_list
                .split_whitespace()
                .any(|c| FORM_GROUP_CLASSES.contains(&c))
            {
                return Ok(Some(parent));
            }
            current = parent;
        }
        Ok(None)
    }
}
