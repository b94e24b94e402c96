/// Library listings
///
/// Joins the scanned book folders with annotation counts, completion
/// percentages, and the optional metadata mapping, then layers search
/// filtering and fixed-size pagination on top. All inputs are supplied by
/// the caller; this module does no I/O beyond delegating to the scanner and
/// the annotation store.
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{AnnotatorError, Result};
use crate::library::metadata::MetadataMap;
use crate::library::{completion, scan};
use crate::store::{Annotation, AnnotationStore};

/// One book as shown in the listing: identity, derived completion, and the
/// externally supplied display attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSummary {
    pub book_id: String,
    /// Total `.txt` pages on disk
    pub page_count: usize,
    /// Pages with a non-empty annotation
    pub labeled_count: usize,
    /// round(100 * labeled / total)
    pub completion: u8,
    /// Empty for books absent from the metadata file; never an error
    pub metadata: BTreeMap<String, String>,
}

/// Join book folders with their completion percentages.
///
/// The annotation file is read once for the whole listing, then grouped by
/// book, rather than re-read per folder.
pub fn with_completion(
    root: &Path,
    books: &[String],
    annotations: &AnnotationStore,
) -> Result<Vec<BookSummary>> {
    let mut labeled_by_book: HashMap<&str, usize> = HashMap::new();
    let rows = annotations.list_all()?;
    for Annotation { book_id, .. } in &rows {
        *labeled_by_book.entry(book_id.as_str()).or_default() += 1;
    }

    books
        .iter()
        .map(|book_id| {
            let page_count = scan::list_pages(&root.join(book_id))?.len();
            let labeled_count = labeled_by_book.get(book_id.as_str()).copied().unwrap_or(0);
            Ok(BookSummary {
                book_id: book_id.clone(),
                page_count,
                labeled_count,
                completion: completion::percentage(labeled_count, page_count),
                metadata: BTreeMap::new(),
            })
        })
        .collect()
}

/// Attach metadata to each book. Books missing from the mapping keep an
/// empty attribute map.
pub fn with_metadata(books: &mut [BookSummary], metadata: &MetadataMap) {
    for book in books {
        if let Some(attributes) = metadata.get(&book.book_id) {
            book.metadata = attributes.clone();
        }
    }
}

/// Case-insensitive substring filter over the folder name or any metadata
/// value. An empty term returns the input unchanged, in the same order.
pub fn search(books: Vec<BookSummary>, term: &str) -> Vec<BookSummary> {
    if term.is_empty() {
        return books;
    }

    let needle = term.to_lowercase();
    books
        .into_iter()
        .filter(|book| {
            book.book_id.to_lowercase().contains(&needle)
                || book
                    .metadata
                    .values()
                    .any(|value| value.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Fixed-size window over a listing, 1-based page numbers.
///
/// An out-of-range page number yields an empty slice; erroring on explicit
/// user input is the presentation boundary's job (`validate_page_number`).
pub fn paginate<T>(items: &[T], page_size: usize, page_number: usize) -> &[T] {
    if page_size == 0 || page_number == 0 {
        return &[];
    }
    let start = (page_number - 1) * page_size;
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// Number of listing pages needed for `count` items.
pub fn page_count(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Check an explicitly supplied page number against the valid range.
/// This is the only place a page number turns into an error.
pub fn validate_page_number(given: i64, total_pages: usize) -> Result<usize> {
    if given < 1 || given as usize > total_pages.max(1) {
        return Err(AnnotatorError::Validation {
            given,
            max: total_pages.max(1),
        });
    }
    Ok(given as usize)
}

/// Index of the first page without an annotation, in page order.
pub fn first_unannotated(pages: &[String], annotations: &[Annotation]) -> Option<usize> {
    pages
        .iter()
        .position(|page| !annotations.iter().any(|a| &a.page == page))
}

/// Pages whose file-name ordinal falls within `from..=to`. Pages that do not
/// follow the numeric naming convention never match a range.
pub fn pages_in_range<'a>(pages: &'a [String], from: u32, to: u32) -> Vec<&'a str> {
    pages
        .iter()
        .filter(|page| {
            scan::page_ordinal(page).map_or(false, |ordinal| ordinal >= from && ordinal <= to)
        })
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn summary(book_id: &str, metadata: &[(&str, &str)]) -> BookSummary {
        BookSummary {
            book_id: book_id.to_string(),
            page_count: 0,
            labeled_count: 0,
            completion: 0,
            metadata: metadata
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_listing_scenario() {
        // Library: A has 3 pages (1 annotated), B has none, C has 2 (both annotated)
        let root = TempDir::new().unwrap();
        for (book, pages) in [
            ("A", vec!["00000001.txt", "00000002.txt", "00000003.txt"]),
            ("B", vec![]),
            ("C", vec!["00000001.txt", "00000002.txt"]),
        ] {
            let dir = root.path().join(book);
            std::fs::create_dir_all(&dir).unwrap();
            for page in pages {
                std::fs::write(dir.join(page), "text").unwrap();
            }
        }

        let store = AnnotationStore::new(root.path().join("annotations.csv"));
        store.upsert("A", "00000002.txt", "Core").unwrap();
        store.upsert("C", "00000001.txt", "Front").unwrap();
        store.upsert("C", "00000002.txt", "Back").unwrap();

        let books = scan::list_books(root.path()).unwrap();
        assert_eq!(books, vec!["A", "C"]);

        let summaries = with_completion(root.path(), &books, &store).unwrap();
        assert_eq!(summaries[0].completion, 33);
        assert_eq!(summaries[1].completion, 100);
        assert_eq!(
            completion::library_percentage(&[(1, 3), (2, 2)]),
            60
        );
    }

    #[test]
    fn test_metadata_join_defaults_to_empty() {
        let mut books = vec![summary("A", &[]), summary("B", &[])];
        let mut map = MetadataMap::new();
        map.insert(
            "A".to_string(),
            [("title".to_string(), "On Margins".to_string())].into(),
        );

        with_metadata(&mut books, &map);
        assert_eq!(books[0].metadata["title"], "On Margins");
        assert!(books[1].metadata.is_empty());
    }

    #[test]
    fn test_search_empty_term_is_identity() {
        let books = vec![summary("zeta", &[]), summary("alpha", &[])];
        let found = search(books.clone(), "");
        assert_eq!(found, books);
    }

    #[test]
    fn test_search_matches_id_and_metadata() {
        let books = vec![
            summary("mdp.001", &[("title", "Field Notes")]),
            summary("mdp.002", &[("title", "City Atlas")]),
        ];

        let by_metadata = search(books.clone(), "field");
        assert_eq!(by_metadata.len(), 1);
        assert_eq!(by_metadata[0].book_id, "mdp.001");

        let by_id = search(books, "002");
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].book_id, "mdp.002");
    }

    #[test]
    fn test_pagination_windows() {
        let items: Vec<usize> = (0..25).collect();
        assert_eq!(paginate(&items, 10, 1), (0..10).collect::<Vec<_>>());
        assert_eq!(paginate(&items, 10, 3), (20..25).collect::<Vec<_>>());
        assert!(paginate(&items, 10, 4).is_empty());
        assert_eq!(page_count(25, 10), 3);
    }

    #[test]
    fn test_page_number_validation_at_the_boundary() {
        assert_eq!(validate_page_number(2, 3).unwrap(), 2);
        assert!(matches!(
            validate_page_number(4, 3),
            Err(AnnotatorError::Validation { given: 4, max: 3 })
        ));
        assert!(validate_page_number(0, 3).is_err());
    }

    #[test]
    fn test_first_unannotated_and_ranges() {
        let pages: Vec<String> = ["00000001.txt", "00000002.txt", "00000003.txt"]
            .iter()
            .map(|p| p.to_string())
            .collect();
        let annotations = vec![Annotation {
            book_id: "A".to_string(),
            page: "00000001.txt".to_string(),
            label: "Front".to_string(),
        }];

        assert_eq!(first_unannotated(&pages, &annotations), Some(1));
        assert_eq!(
            pages_in_range(&pages, 2, 3),
            vec!["00000002.txt", "00000003.txt"]
        );
    }
}
