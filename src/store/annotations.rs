/// Per-page annotation store
///
/// One shared flat file holds every `bookId,pageFileName,label` row across
/// the whole library. The store keeps at most one row per (book, page) key:
/// an upsert replaces the matching row in place, never appends a duplicate,
/// and an upsert with an empty label removes the row entirely.
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::store::record;

/// The single active label for one page of one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Book folder name
    pub book_id: String,
    /// Page file name within the book folder (e.g. "00000042.txt")
    pub page: String,
    /// One of the configured labels; never empty for a stored row
    pub label: String,
}

/// File-scoped, stateless-per-call store for annotation rows.
///
/// Every operation is a one-shot read-the-whole-file, mutate-in-memory,
/// rewrite-the-whole-file sequence. There is no locking: two writers on the
/// same file race, last writer wins. Acceptable for a single interactive
/// user, which is what this tool is for.
pub struct AnnotationStore {
    path: PathBuf,
}

impl AnnotationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AnnotationStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every row in the backing file, in file order.
    pub fn list_all(&self) -> Result<Vec<Annotation>> {
        self.load()
    }

    /// Rows for one book, in file order (not sorted by page).
    pub fn list(&self, book_id: &str) -> Result<Vec<Annotation>> {
        let mut rows = self.load()?;
        rows.retain(|a| a.book_id == book_id);
        Ok(rows)
    }

    /// Set or clear the label for one page.
    ///
    /// A non-empty label replaces the existing row for the key in place, or
    /// appends a new row if none exists. An empty label removes the row;
    /// clearing an already-absent row rewrites the file unchanged (no-op).
    pub fn upsert(&self, book_id: &str, page: &str, label: &str) -> Result<()> {
        self.upsert_many(book_id, std::slice::from_ref(&page), label)
    }

    /// Set or clear the label for several pages of one book in a single
    /// load/rewrite cycle. Backs range annotation and "mark all" bulk
    /// actions without one full-file rewrite per page.
    pub fn upsert_many(&self, book_id: &str, pages: &[&str], label: &str) -> Result<()> {
        let mut rows = self.load()?;

        for page in pages {
            if label.is_empty() {
                rows.retain(|a| !(a.book_id == book_id && a.page == *page));
            } else if let Some(index) = rows
                .iter()
                .position(|a| a.book_id == book_id && a.page == *page)
            {
                rows[index].label = label.to_string();
            } else {
                rows.push(Annotation {
                    book_id: book_id.to_string(),
                    page: page.to_string(),
                    label: label.to_string(),
                });
            }
        }

        self.rewrite(&rows)
    }

    fn load(&self) -> Result<Vec<Annotation>> {
        let records = record::load_records(&self.path, record::ANNOTATION_ARITY)?;
        Ok(records
            .into_iter()
            .map(|mut fields| {
                let label = fields.pop().unwrap_or_default();
                let page = fields.pop().unwrap_or_default();
                let book_id = fields.pop().unwrap_or_default();
                Annotation { book_id, page, label }
            })
            .collect())
    }

    fn rewrite(&self, rows: &[Annotation]) -> Result<()> {
        let records: Vec<Vec<String>> = rows
            .iter()
            .map(|a| vec![a.book_id.clone(), a.page.clone(), a.label.clone()])
            .collect();
        record::rewrite_records(&self.path, &records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> AnnotationStore {
        AnnotationStore::new(dir.path().join("annotations.csv"))
    }

    #[test]
    fn test_upsert_replaces_instead_of_appending() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.upsert("bookA", "00000001.txt", "Front").unwrap();
        store.upsert("bookA", "00000002.txt", "Core").unwrap();
        store.upsert("bookA", "00000001.txt", "Back").unwrap();

        let rows = store.list("bookA").unwrap();
        assert_eq!(rows.len(), 2);
        // Replaced in place, so the row keeps its original position
        assert_eq!(rows[0].page, "00000001.txt");
        assert_eq!(rows[0].label, "Back");
        assert_eq!(rows[1].label, "Core");
    }

    #[test]
    fn test_empty_label_clears_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.upsert("bookA", "00000001.txt", "Front").unwrap();
        store.upsert("bookA", "00000001.txt", "").unwrap();
        assert!(store.list("bookA").unwrap().is_empty());

        // Clearing again is a no-op, not an error
        store.upsert("bookA", "00000001.txt", "").unwrap();
        assert!(store.list("bookA").unwrap().is_empty());
    }

    #[test]
    fn test_list_is_scoped_to_one_book() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.upsert("bookA", "00000001.txt", "Front").unwrap();
        store.upsert("bookB", "00000001.txt", "Core").unwrap();

        let rows = store.list("bookB").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].book_id, "bookB");
        assert_eq!(store.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_upsert_many_single_rewrite_semantics() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.upsert("bookA", "00000002.txt", "Front").unwrap();
        store
            .upsert_many("bookA", &["00000001.txt", "00000002.txt", "00000003.txt"], "Core")
            .unwrap();

        let rows = store.list("bookA").unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|a| a.label == "Core"));
    }

    #[test]
    fn test_missing_file_is_an_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_bad_line_does_not_block_the_rest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("annotations.csv");
        std::fs::write(&path, "bookA,00000001.txt,Front\ngarbage\n").unwrap();

        let store = AnnotationStore::new(&path);
        assert_eq!(store.list("bookA").unwrap().len(), 1);

        // The malformed line is dropped on the next rewrite
        store.upsert("bookA", "00000002.txt", "Core").unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "bookA,00000001.txt,Front\nbookA,00000002.txt,Core\n");
    }
}
