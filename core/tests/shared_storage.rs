use ppl_core::storage::MemoryStore;
use ppl_core::subjects::{self, StudySource, SubjectId, ERRORS_SUBJECT_ID};
use ppl_core::theme::{self, EffectiveTheme, Headless, SharedScheme, ThemeController, ThemeMode};
use ppl_core::{errors, ErrorStore, KeyValueStore};
use std::rc::Rc;

#[test]
fn errors_and_theme_share_one_store_under_separate_keys() {
    let store = Rc::new(MemoryStore::new());
    let errors = ErrorStore::new(Rc::clone(&store));
    let mut controller = ThemeController::initialize(Rc::clone(&store), Headless, SharedScheme::default());

    errors.add(SubjectId::Meteorology, "Q1");
    controller.set_mode(ThemeMode::Dark);
    errors.clear();

    assert_eq!(store.raw(theme::STORAGE_KEY).as_deref(), Some("dark"));
    assert_eq!(store.raw(errors::STORAGE_KEY).as_deref(), Some("[]"));
    assert_eq!(controller.effective_theme(), EffectiveTheme::Dark);
}

#[test]
fn second_writer_duplicates_are_healed_on_next_read() {
    let store = Rc::new(MemoryStore::new());
    let first = ErrorStore::new(Rc::clone(&store));
    first.add(SubjectId::Navigation, "Q7");

    // Another tab appends without checking for the existing pair.
    let raw = store.get(errors::STORAGE_KEY).unwrap().unwrap();
    let doubled = raw.replacen(']', r#",{"subjectId":"06-navigacija","questionId":"Q7"}]"#, 1);
    store.set(errors::STORAGE_KEY, &doubled).unwrap();

    let second = ErrorStore::new(Rc::clone(&store));
    assert_eq!(second.count(), 1);
    assert_eq!(
        store.raw(errors::STORAGE_KEY).as_deref(),
        Some(r#"[{"subjectId":"06-navigacija","questionId":"Q7"}]"#)
    );
}

#[test]
fn review_session_covers_every_subject_with_errors() {
    let errors = ErrorStore::new(MemoryStore::new());
    errors.add(SubjectId::AirLaw, "A1");
    errors.add(SubjectId::Communications, "K3");
    errors.add(SubjectId::AirLaw, "A2");

    let grouped = errors.group_by_subject();
    let with_errors: Vec<&str> = subjects::all()
        .iter()
        .filter(|s| grouped.contains_key(&s.id))
        .map(|s| s.title)
        .collect();
    assert_eq!(with_errors, vec!["Vazduhoplovni propisi", "Komunikacije"]);

    let source: StudySource = ERRORS_SUBJECT_ID.parse().unwrap();
    assert_eq!(source, StudySource::AllErrors);
    assert_eq!(errors.count(), grouped.values().map(|q| q.len()).sum::<usize>());
}
