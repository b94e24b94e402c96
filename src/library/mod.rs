/// Library browsing module
///
/// This module handles everything derived from the library root:
/// - Book folder and page file enumeration (scan.rs)
/// - Completion percentages (completion.rs)
/// - Listing joins, search filtering, pagination (index.rs)
/// - External metadata resolution from a delimited file (metadata.rs)

pub mod completion;
pub mod index;
pub mod metadata;
pub mod scan;

pub use index::BookSummary;
pub use metadata::MetadataMap;
