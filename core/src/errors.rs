//! Tracking of wrong answers across subjects.
//!
//! The whole collection lives under one storage key as a JSON array and is
//! rewritten on every change. Loads repair the collection in place: malformed
//! elements are dropped and duplicate pairs collapse to their first occurrence,
//! since another process writing the same key can leave duplicates behind.

use crate::storage::KeyValueStore;
use crate::subjects::SubjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

pub const STORAGE_KEY: &str = "ppl.errors.v1";

/// Upper bound on stored entries. Anything past it is dropped on load and
/// refused on add.
pub const MAX_ERROR_ITEMS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorItem {
    pub subject_id: SubjectId,
    pub question_id: String,
}

impl ErrorItem {
    pub fn new(subject_id: SubjectId, question_id: impl Into<String>) -> Self {
        Self {
            subject_id,
            question_id: question_id.into(),
        }
    }

    fn matches(&self, subject_id: SubjectId, question_id: &str) -> bool {
        self.subject_id == subject_id && self.question_id == question_id
    }
}

pub type ErrorsBySubject = BTreeMap<SubjectId, BTreeSet<String>>;

pub struct ErrorStore<S> {
    store: S,
}

impl<S: KeyValueStore> ErrorStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every recorded error, deduplicated, in stored order.
    pub fn get_all(&self) -> Vec<ErrorItem> {
        let items = self.load_raw();
        let loaded = items.len();

        let mut seen = HashSet::new();
        let mut uniq: Vec<ErrorItem> = items
            .into_iter()
            .filter(|it| seen.insert((it.subject_id, it.question_id.clone())))
            .collect();
        uniq.truncate(MAX_ERROR_ITEMS);

        if uniq.len() != loaded {
            debug!(loaded, kept = uniq.len(), "repairing stored error collection");
            self.save_raw(&uniq);
        }
        uniq
    }

    /// Records a wrong answer. Does nothing if the pair is already recorded.
    pub fn add(&self, subject_id: SubjectId, question_id: &str) {
        let mut items = self.get_all();
        if items.iter().any(|it| it.matches(subject_id, question_id)) {
            return;
        }
        if items.len() >= MAX_ERROR_ITEMS {
            warn!(%subject_id, question_id, "error collection is full; not recording");
            return;
        }
        items.push(ErrorItem::new(subject_id, question_id));
        self.save_raw(&items);
    }

    pub fn remove(&self, subject_id: SubjectId, question_id: &str) {
        let items: Vec<ErrorItem> = self
            .get_all()
            .into_iter()
            .filter(|it| !it.matches(subject_id, question_id))
            .collect();
        self.save_raw(&items);
    }

    pub fn clear(&self) {
        self.save_raw(&[]);
    }

    pub fn count(&self) -> usize {
        self.get_all().len()
    }

    pub fn group_by_subject(&self) -> ErrorsBySubject {
        let mut map = ErrorsBySubject::new();
        for ErrorItem { subject_id, question_id } in self.get_all() {
            map.entry(subject_id).or_default().insert(question_id);
        }
        map
    }

    pub fn contains(&self, subject_id: SubjectId, question_id: &str) -> bool {
        self.get_all()
            .iter()
            .any(|it| it.matches(subject_id, question_id))
    }

    pub fn count_for(&self, subject_id: SubjectId) -> usize {
        self.get_all()
            .iter()
            .filter(|it| it.subject_id == subject_id)
            .count()
    }

    fn load_raw(&self) -> Vec<ErrorItem> {
        let raw = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read error collection");
                return Vec::new();
            }
        };

        let elements = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(elements)) => elements,
            Ok(_) => {
                debug!("stored error collection is not an array; ignoring");
                return Vec::new();
            }
            Err(e) => {
                debug!(error = %e, "stored error collection is not valid JSON; ignoring");
                return Vec::new();
            }
        };

        elements
            .into_iter()
            .filter_map(|el| serde_json::from_value::<ErrorItem>(el).ok())
            .collect()
    }

    fn save_raw(&self, items: &[ErrorItem]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "could not serialize error collection");
                return;
            }
        };
        if let Err(e) = self.store.set(STORAGE_KEY, &json) {
            warn!(error = %e, "dropping error collection write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, Unavailable};

    const MET: SubjectId = SubjectId::Meteorology;
    const NAV: SubjectId = SubjectId::Navigation;

    fn store_with(raw: &str) -> ErrorStore<MemoryStore> {
        let mem = MemoryStore::new();
        mem.set(STORAGE_KEY, raw).unwrap();
        ErrorStore::new(mem)
    }

    #[test]
    fn empty_storage_has_no_errors() {
        let errors = ErrorStore::new(MemoryStore::new());
        assert!(errors.get_all().is_empty());
        assert_eq!(errors.count(), 0);
        assert!(errors.group_by_subject().is_empty());
    }

    #[test]
    fn add_is_idempotent() {
        let errors = ErrorStore::new(MemoryStore::new());
        errors.add(MET, "Q1");
        let after_first = errors.get_all();
        let writes = errors.store.write_count();

        errors.add(MET, "Q1");
        assert_eq!(errors.get_all(), after_first);
        assert_eq!(errors.count(), 1);
        assert_eq!(errors.store.write_count(), writes);
    }

    #[test]
    fn duplicates_are_collapsed_and_rewritten_on_load() {
        let errors = store_with(
            r#"[{"subjectId":"05-meteorologija","questionId":"Q1"},
                {"subjectId":"06-navigacija","questionId":"Q2"},
                {"subjectId":"05-meteorologija","questionId":"Q1"}]"#,
        );

        let all = errors.get_all();
        assert_eq!(all, vec![ErrorItem::new(MET, "Q1"), ErrorItem::new(NAV, "Q2")]);

        let rewritten: Vec<ErrorItem> =
            serde_json::from_str(&errors.store.raw(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(rewritten, all);
    }

    #[test]
    fn clean_load_does_not_write() {
        let errors = store_with(r#"[{"subjectId":"05-meteorologija","questionId":"Q1"}]"#);
        let writes = errors.store.write_count();
        assert_eq!(errors.count(), 1);
        assert_eq!(errors.store.write_count(), writes);
    }

    #[test]
    fn add_then_remove_restores_count() {
        let errors = ErrorStore::new(MemoryStore::new());
        errors.add(NAV, "Q9");
        let before = errors.count();

        errors.add(MET, "Q1");
        errors.remove(MET, "Q1");

        assert_eq!(errors.count(), before);
        assert!(!errors.contains(MET, "Q1"));
        assert!(errors.contains(NAV, "Q9"));
    }

    #[test]
    fn remove_of_missing_pair_still_persists() {
        let errors = ErrorStore::new(MemoryStore::new());
        errors.remove(MET, "nope");
        assert_eq!(errors.store.raw(STORAGE_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn malformed_elements_are_dropped() {
        let errors = store_with(
            r#"[{"subjectId":"05-meteorologija"},
                {"questionId":"Q1"},
                {"subjectId":"06-navigacija","questionId":"Q2"}]"#,
        );
        assert_eq!(errors.get_all(), vec![ErrorItem::new(NAV, "Q2")]);
    }

    #[test]
    fn wrong_types_and_unknown_subjects_are_dropped() {
        let errors = store_with(
            r#"[null, 7, "x", [],
                {"subjectId":"99-nepoznato","questionId":"Q1"},
                {"subjectId":"05-meteorologija","questionId":12},
                {"subjectId":"05-meteorologija","questionId":"Q3","extra":true}]"#,
        );
        assert_eq!(errors.get_all(), vec![ErrorItem::new(MET, "Q3")]);

        errors.add(NAV, "Q4");
        let raw = errors.store.raw(STORAGE_KEY).unwrap();
        assert!(!raw.contains("extra"));
    }

    #[test]
    fn unparseable_storage_reads_as_empty() {
        for raw in ["not json", "{\"subjectId\":\"05-meteorologija\"}", "42", ""] {
            assert!(store_with(raw).get_all().is_empty(), "{raw}");
        }
    }

    #[test]
    fn groups_questions_by_subject() {
        let errors = ErrorStore::new(MemoryStore::new());
        errors.add(MET, "Q1");
        errors.add(MET, "Q2");
        errors.add(NAV, "Q3");

        let grouped = errors.group_by_subject();
        let expected: ErrorsBySubject = [
            (MET, BTreeSet::from(["Q1".to_string(), "Q2".to_string()])),
            (NAV, BTreeSet::from(["Q3".to_string()])),
        ]
        .into_iter()
        .collect();
        assert_eq!(grouped, expected);
        assert_eq!(errors.count_for(MET), 2);
        assert_eq!(errors.count_for(SubjectId::AirLaw), 0);
    }

    #[test]
    fn clear_empties_the_collection() {
        let errors = ErrorStore::new(MemoryStore::new());
        errors.add(MET, "Q1");
        errors.add(NAV, "Q2");
        errors.clear();
        assert_eq!(errors.count(), 0);
    }

    #[test]
    fn quota_failures_drop_the_write() {
        let errors = ErrorStore::new(MemoryStore::with_quota(60));
        errors.add(MET, "Q1");
        assert_eq!(errors.count(), 1);

        errors.add(NAV, "a-question-id-long-enough-to-blow-the-quota");
        assert_eq!(errors.get_all(), vec![ErrorItem::new(MET, "Q1")]);
    }

    #[test]
    fn unavailable_storage_acts_empty() {
        let errors = ErrorStore::new(Unavailable);
        errors.add(MET, "Q1");
        errors.remove(MET, "Q1");
        errors.clear();
        assert_eq!(errors.count(), 0);
    }

    #[test]
    fn load_truncates_past_the_cap() {
        let items: Vec<ErrorItem> = (0..MAX_ERROR_ITEMS + 5)
            .map(|i| ErrorItem::new(MET, format!("Q{i}")))
            .collect();
        let errors = store_with(&serde_json::to_string(&items).unwrap());

        assert_eq!(errors.count(), MAX_ERROR_ITEMS);
        assert!(!errors.contains(MET, &format!("Q{MAX_ERROR_ITEMS}")));

        errors.add(NAV, "overflow");
        assert!(!errors.contains(NAV, "overflow"));
    }
}
