/// External book metadata
///
/// Metadata comes from a user-supplied delimited file with a header row; the
/// user picks which column holds the book id (the folder name). The rest of
/// the crate only ever sees the resolved `bookId -> {column -> value}` map.
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{AnnotatorError, Result};

/// Resolved metadata: book id to its flat attribute mapping.
pub type MetadataMap = HashMap<String, BTreeMap<String, String>>;

/// Column names from the metadata file's header row, in file order. Used by
/// the configuration flow to let the user pick the book-id column and the
/// display fields.
pub fn csv_columns(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)?;
    Ok(reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect())
}

/// Load the full metadata mapping keyed by the chosen id column.
///
/// Rows with an empty id cell are skipped. A later row with the same id
/// overwrites an earlier one.
pub fn load_metadata(path: &Path, id_column: &str) -> Result<MetadataMap> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let id_index = headers
        .iter()
        .position(|h| h == id_column)
        .ok_or_else(|| {
            AnnotatorError::Configuration(format!(
                "book id column '{}' not found in {}",
                id_column,
                path.display()
            ))
        })?;

    let mut map = MetadataMap::new();
    for row in reader.records() {
        let row = row?;
        let book_id = row.get(id_index).unwrap_or("").trim();
        if book_id.is_empty() {
            continue;
        }

        let attributes: BTreeMap<String, String> = headers
            .iter()
            .zip(row.iter())
            .map(|(column, value)| (column.clone(), value.to_string()))
            .collect();
        map.insert(book_id.to_string(), attributes);
    }

    log::debug!("loaded metadata for {} books from {}", map.len(), path.display());
    Ok(map)
}
