//! End-to-end behaviour of the manager with real input sources and rules.

use std::sync::{Arc, Mutex};

use formguard_adapters::{
    EmailRule, LengthRule, MemoryTextField, MemoryTextView, NonEmptyRule, ObservableObject,
    PatternRule,
};
use formguard_core::prelude::*;

fn id(s: &str) -> Option<UnitId> {
    Some(UnitId::new(s).unwrap())
}

#[test]
fn empty_field_becomes_valid_when_typed_into() {
    let manager = ValidationManager::new();
    let field = Arc::new(MemoryTextField::new());

    manager
        .register_text_field(field.clone(), vec![Arc::new(NonEmptyRule::new())], id("name"))
        .unwrap();
    assert!(!manager.is_valid());

    field.set_text("Ada");
    assert!(manager.is_valid());
    assert!(manager.status().unwrap().unit("name").unwrap().errors.is_empty());

    field.set_text("");
    assert!(!manager.is_valid());
    let status = manager.status().unwrap();
    assert!(status.unit("name").unwrap().errors.contains_key("non-empty"));
}

#[test]
fn one_invalid_unit_fails_the_form_until_removed() {
    let manager = ValidationManager::new();
    let a = Arc::new(MemoryTextField::with_text("ada@example.com"));
    let b = Arc::new(MemoryTextView::new());

    manager
        .register_text_field(a.clone(), vec![Arc::new(EmailRule::new())], id("a"))
        .unwrap();
    manager
        .register_text_view(b.clone(), vec![Arc::new(LengthRule::min(10))], id("b"))
        .unwrap();
    a.set_text("ada@example.com");
    b.set_text("short");

    let status = manager.status().unwrap();
    assert!(!status.overall_valid);
    assert!(status.unit("a").unwrap().is_valid);
    assert!(!status.unit("b").unwrap().is_valid);

    manager.remove_unit_for_identifier("b").unwrap();
    assert!(manager.is_valid());
    assert!(!manager.status().unwrap().contains("b"));

    // The removed view no longer drives the manager.
    assert_eq!(b.subscriber_count(), 0);
    b.set_text("x");
    assert!(manager.is_valid());
}

#[test]
fn object_source_validates_on_its_own_event() {
    let manager = ValidationManager::new();
    let object = Arc::new(ObservableObject::new(""));
    let event = EventName::new("profile-changed").unwrap();

    manager
        .register_object(
            object.clone(),
            vec![Arc::new(NonEmptyRule::new())],
            "profile-changed",
            id("profile"),
        )
        .unwrap();

    object.set_content("filled");
    assert!(!manager.is_valid(), "silent update must not revalidate");

    object.post(&event);
    assert!(manager.is_valid());
}

#[test]
fn observers_see_each_edit() {
    let manager = ValidationManager::new();
    let field = Arc::new(MemoryTextField::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    manager.subscribe(move |status: &AggregatedStatus| {
        sink.lock().unwrap().push(status.overall_valid);
    });

    manager
        .register_text_field(field.clone(), vec![Arc::new(NonEmptyRule::new())], id("f"))
        .unwrap();
    field.set_text("x");
    field.set_text("");

    assert_eq!(*seen.lock().unwrap(), vec![false, true, false]);
}

#[test]
fn json_payload_uses_camel_case() {
    let manager = ValidationManager::new();
    let field = Arc::new(MemoryTextField::new());
    manager
        .register_text_field(field.clone(), vec![Arc::new(NonEmptyRule::new())], id("f"))
        .unwrap();
    field.set_text("");

    let json = serde_json::to_value(manager.status().unwrap()).unwrap();
    assert_eq!(json["overallValid"], false);
    assert_eq!(json["perUnit"]["f"]["isValid"], false);
    assert_eq!(json["perUnit"]["f"]["errors"]["non-empty"]["code"], "empty");
}

#[test]
fn rules_sharing_a_name_report_every_failure() {
    let manager = ValidationManager::new();
    let field = Arc::new(MemoryTextField::new());
    let rules: Vec<Arc<dyn ValidationRule>> = vec![
        Arc::new(PatternRule::new("^a").unwrap()),
        Arc::new(PatternRule::new("z$").unwrap()),
        Arc::new(LengthRule::min(5)),
        Arc::new(LengthRule::max(1)),
    ];
    manager
        .register_text_field(field.clone(), rules, id("code"))
        .unwrap();

    field.set_text("bbb");

    let status = manager.status().unwrap();
    let errors = &status.unit("code").unwrap().errors;
    assert_eq!(errors.len(), 4);
    assert_eq!(errors["pattern"].code, "no-match");
    assert_eq!(errors["pattern#2"].code, "no-match");
    assert_eq!(errors["length"].code, "too-short");
    assert_eq!(errors["length#2"].code, "too-long");
}
