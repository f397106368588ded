use std::sync::Arc;

use super::fake_driver::FakeDocBuilder;
use crate::classify::WidgetClassifier;
use crate::errors::DropdownError;
use crate::types::DropdownKind;

#[tokio::test]
async fn classifies_native_select_via_explicit_label_association() {
    let driver = FakeDocBuilder::new()
        .native_select("Region", &["North", "South"], false)
        .build();

    let detection = WidgetClassifier::new(driver, true)
        .detect("Region")
        .await
        .expect("detection");

    assert_eq!(detection.kind, DropdownKind::NativeSelect);
    assert!(detection.native_control.is_some());
    assert!(!detection.multiple);
}

#[tokio::test]
async fn native_select_multiple_marker_is_detected() {
    let driver = FakeDocBuilder::new()
        .native_select("Tags", &["a", "b"], true)
        .build();

    let detection = WidgetClassifier::new(driver, true)
        .detect("Tags")
        .await
        .expect("detection");

    assert_eq!(detection.kind, DropdownKind::NativeSelect);
    assert!(detection.multiple);
}

#[tokio::test]
async fn classifies_popup_select_by_trigger_role() {
    let driver = FakeDocBuilder::new()
        .popup_select("Status", &["Active", "Closed"])
        .build();

    let detection = WidgetClassifier::new(driver, true)
        .detect("Status")
        .await
        .expect("detection");

    assert_eq!(detection.kind, DropdownKind::PopupSelect);
    assert!(detection.input.is_none());
    assert!(detection.native_control.is_none());
}

#[tokio::test]
async fn classifies_autocomplete_before_popup_fallback() {
    // The input would also satisfy the "any clickable descendant" fallback;
    // the combobox marker must win.
    let driver = FakeDocBuilder::new()
        .autocomplete("Country", &["Germany", "France"], 10)
        .build();

    let detection = WidgetClassifier::new(driver, true)
        .detect("Country")
        .await
        .expect("detection");

    assert_eq!(detection.kind, DropdownKind::Autocomplete);
    assert!(detection.input.is_some());
    assert!(detection.multiple);
}

#[tokio::test]
async fn unknown_label_is_not_found() {
    let driver = FakeDocBuilder::new()
        .popup_select("Status", &["Active"])
        .build();

    let err = WidgetClassifier::new(driver, true)
        .detect("Nonexistent")
        .await
        .expect_err("should fail");

    assert!(matches!(err, DropdownError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_labels_fail_in_strict_mode() {
    let driver = FakeDocBuilder::new()
        .popup_select("Status", &["Active"])
        .popup_select("Status", &["Open"])
        .build();

    let err = WidgetClassifier::new(driver, true)
        .detect("Status")
        .await
        .expect_err("should be ambiguous");

    match err {
        DropdownError::Ambiguous { label, candidates } => {
            assert_eq!(label, "Status");
            assert_eq!(candidates, 2);
        }
        other => panic!("expected Ambiguous, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_labels_pick_first_candidate_when_lenient() {
    let driver = FakeDocBuilder::new()
        .popup_select("Status", &["Active"])
        .popup_select("Status", &["Open"])
        .build();

    let detection = WidgetClassifier::new(driver, false)
        .detect("Status")
        .await
        .expect("lenient detection");

    assert_eq!(detection.kind, DropdownKind::PopupSelect);
}

#[tokio::test]
async fn detections_are_recomputed_per_call() {
    let driver = FakeDocBuilder::new()
        .native_select("Region", &["North"], false)
        .build();

    let classifier = WidgetClassifier::new(driver.clone(), true);
    let first = classifier.detect("Region").await.expect("first");
    let second = classifier.detect("Region").await.expect("second");

    // Same document, so the same elements resolve; the point is that the
    // second call went back to the document rather than a cache.
    assert_eq!(first.root, second.root);
    assert!(driver.calls() > 0);
}
