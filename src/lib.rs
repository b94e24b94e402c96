/// Annotation and progress tracking for plain-text book libraries
///
/// A library root holds one folder per book, one `.txt` file per page. Each
/// page carries at most one label from a user-configured set, and each book
/// one free-text volume note. Labels and notes live in two flat delimited
/// files; completion percentages are derived on demand, never stored.

pub mod error;
pub mod library;
pub mod settings;
pub mod store;

pub use error::{AnnotatorError, Result};
