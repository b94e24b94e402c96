/// Per-book volume notes
///
/// One shared flat file of `bookId,note` rows, one row per book at most.
/// A blank note means "no note" and is physically removed from the file,
/// never stored as an empty value. The backing file is distinct from the
/// annotation file; the two schemas share nothing but the delimiter.
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::store::record;

pub struct VolumeNoteStore {
    path: PathBuf,
}

impl VolumeNoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        VolumeNoteStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The note for one book, or None when no row exists.
    pub fn get(&self, book_id: &str) -> Result<Option<String>> {
        let rows = record::load_records(&self.path, record::NOTE_ARITY)?;
        Ok(rows
            .into_iter()
            .find(|fields| fields[0] == book_id)
            .map(|mut fields| fields.swap_remove(1)))
    }

    /// Save the note for one book, replacing any existing row.
    ///
    /// A blank or whitespace-only note behaves exactly like `clear`.
    pub fn save(&self, book_id: &str, note: &str) -> Result<()> {
        if note.trim().is_empty() {
            return self.clear(book_id);
        }

        let mut rows = record::load_records(&self.path, record::NOTE_ARITY)?;
        if let Some(index) = rows.iter().position(|fields| fields[0] == book_id) {
            rows[index][1] = note.to_string();
        } else {
            rows.push(vec![book_id.to_string(), note.to_string()]);
        }
        record::rewrite_records(&self.path, &rows)
    }

    /// Remove the note row for one book. Clearing an absent note is a no-op.
    pub fn clear(&self, book_id: &str) -> Result<()> {
        let mut rows = record::load_records(&self.path, record::NOTE_ARITY)?;
        rows.retain(|fields| fields[0] != book_id);
        record::rewrite_records(&self.path, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> VolumeNoteStore {
        VolumeNoteStore::new(dir.path().join("volume_notes.csv"))
    }

    #[test]
    fn test_save_then_get() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("bookA", "binding damaged").unwrap();
        assert_eq!(store.get("bookA").unwrap().as_deref(), Some("binding damaged"));
        assert_eq!(store.get("bookB").unwrap(), None);
    }

    #[test]
    fn test_save_replaces_the_single_row() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("bookA", "first pass").unwrap();
        store.save("bookA", "second pass").unwrap();

        assert_eq!(store.get("bookA").unwrap().as_deref(), Some("second pass"));
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.lines().count(), 1);
    }

    #[test]
    fn test_blank_note_acts_as_clear() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("bookA", "keep me").unwrap();
        store.save("bookA", "   ").unwrap();

        assert_eq!(store.get("bookA").unwrap(), None);
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn test_clear_only_touches_one_book() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("bookA", "note a").unwrap();
        store.save("bookB", "note b").unwrap();
        store.clear("bookA").unwrap();

        assert_eq!(store.get("bookA").unwrap(), None);
        assert_eq!(store.get("bookB").unwrap().as_deref(), Some("note b"));
    }
}
