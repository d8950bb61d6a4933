//! Study state for PPL exam preparation: recorded wrong answers, the subject
//! registry and the theme preference, all kept in a string key-value store.

pub mod errors;
pub mod observable;
pub mod storage;
pub mod subjects;
pub mod theme;

pub use errors::{ErrorItem, ErrorStore, ErrorsBySubject};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use subjects::{StudySource, Subject, SubjectId};
pub use theme::{EffectiveTheme, ThemeController, ThemeMode};
