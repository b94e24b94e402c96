/// Library scanning
///
/// A library root is a directory of immediate-child book folders; a book
/// folder holds one `.txt` file per page. Everything here is recomputed from
/// the filesystem on each call, so there is no cache to go stale, and no
/// protection against the files changing underneath us between calls.
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

const PAGE_EXTENSION: &str = "txt";

/// Book folders directly under `root` that contain at least one page file,
/// sorted by folder name. Folders without any page file are excluded
/// entirely rather than listed at 0%.
pub fn list_books(root: &Path) -> Result<Vec<String>> {
    let mut books = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }
        if list_pages(entry.path())?.is_empty() {
            continue;
        }
        books.push(entry.file_name().to_string_lossy().to_string());
    }

    books.sort();
    log::debug!("found {} books under {}", books.len(), root.display());
    Ok(books)
}

/// Page file names inside one book folder, sorted. The file name encodes the
/// page ordinal (zero-padded number + extension), so a name sort is a page
/// sort. Non-`.txt` files are ignored.
pub fn list_pages(book_dir: &Path) -> Result<Vec<String>> {
    let mut pages = Vec::new();

    for entry in fs::read_dir(book_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().map_or(false, |ext| ext == PAGE_EXTENSION) {
            pages.push(entry.file_name().to_string_lossy().to_string());
        }
    }

    pages.sort();
    Ok(pages)
}

/// Absolute path of one page file.
pub fn page_path(root: &Path, book_id: &str, page: &str) -> PathBuf {
    root.join(book_id).join(page)
}

/// Raw text of one page, loaded on demand and never cached.
pub fn read_page(root: &Path, book_id: &str, page: &str) -> Result<String> {
    Ok(fs::read_to_string(page_path(root, book_id, page))?)
}

/// The numeric ordinal encoded in a page file name ("00000042.txt" -> 42).
/// None for names that do not follow the convention.
pub fn page_ordinal(page: &str) -> Option<u32> {
    Path::new(page)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_book(root: &Path, name: &str, pages: &[&str]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for page in pages {
            fs::write(dir.join(page), "page text").unwrap();
        }
    }

    #[test]
    fn test_folders_without_pages_are_excluded() {
        let root = TempDir::new().unwrap();
        make_book(root.path(), "bookC", &["00000001.txt", "00000002.txt"]);
        make_book(root.path(), "bookA", &["00000001.txt"]);
        make_book(root.path(), "bookB", &[]);
        make_book(root.path(), "bookD", &["cover.jpg"]);
        fs::write(root.path().join("stray.txt"), "not a book").unwrap();

        let books = list_books(root.path()).unwrap();
        assert_eq!(books, vec!["bookA", "bookC"]);
    }

    #[test]
    fn test_pages_are_sorted_and_filtered() {
        let root = TempDir::new().unwrap();
        make_book(
            root.path(),
            "bookA",
            &["00000003.txt", "00000001.txt", "notes.md", "00000002.txt"],
        );

        let pages = list_pages(&root.path().join("bookA")).unwrap();
        assert_eq!(pages, vec!["00000001.txt", "00000002.txt", "00000003.txt"]);
    }

    #[test]
    fn test_page_ordinal() {
        assert_eq!(page_ordinal("00000042.txt"), Some(42));
        assert_eq!(page_ordinal("7.txt"), Some(7));
        assert_eq!(page_ordinal("cover.txt"), None);
    }

    #[test]
    fn test_read_page() {
        let root = TempDir::new().unwrap();
        make_book(root.path(), "bookA", &["00000001.txt"]);

        let text = read_page(root.path(), "bookA", "00000001.txt").unwrap();
        assert_eq!(text, "page text");
    }
}
