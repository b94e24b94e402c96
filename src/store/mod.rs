/// Persistence layer for annotations and volume notes
///
/// This module owns the on-disk record format and the two flat-file stores:
/// - Line codec for the delimited record format (record.rs)
/// - Per-page label records, one shared file (annotations.rs)
/// - Per-book free-text notes, one shared file (notes.rs)
///
/// Both stores are stateless per call: every operation reads the whole
/// backing file, mutates the records in memory, and rewrites the file.

pub mod annotations;
pub mod notes;
pub mod record;

pub use annotations::{Annotation, AnnotationStore};
pub use notes::VolumeNoteStore;
