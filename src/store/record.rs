/// Flat-file record codec
///
/// Records are comma-separated lines with a fixed field count per record
/// kind: annotation rows carry 3 fields, note rows carry 2. A line is split
/// on the first `arity - 1` commas, so commas embedded in the last field
/// survive a round trip. Commas in earlier fields are NOT escaped; that
/// matches the files already on disk, and changing it would be a wire-format
/// break for whoever owns them.
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{AnnotatorError, Result};

/// Field count of an annotation row: `bookId,pageFileName,label`
pub const ANNOTATION_ARITY: usize = 3;

/// Field count of a volume-note row: `bookId,note`
pub const NOTE_ARITY: usize = 2;

/// Decode one line into exactly `arity` fields.
///
/// Returns a plain reason string; callers attach file/line context.
pub fn decode(line: &str, arity: usize) -> std::result::Result<Vec<String>, String> {
    let fields: Vec<String> = line.splitn(arity, ',').map(str::to_string).collect();
    if fields.len() < arity {
        return Err(format!(
            "expected {} comma-separated fields, found {}",
            arity,
            fields.len()
        ));
    }
    Ok(fields)
}

/// Encode fields back into one line. Inverse of `decode` for values whose
/// non-final fields contain no comma.
pub fn encode(fields: &[&str]) -> String {
    fields.join(",")
}

/// Load every well-formed record from `path`.
///
/// A missing file is an empty store, not an error. Blank lines are skipped
/// silently; malformed lines are skipped with a warning so one bad record
/// never blocks access to the rest of the file.
pub fn load_records(path: &Path, arity: usize) -> Result<Vec<Vec<String>>> {
    if !path.exists() {
        log::debug!("{} does not exist yet, treating as empty", path.display());
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(path)?;
    let mut records = Vec::new();

    for (index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match decode(line, arity) {
            Ok(fields) => records.push(fields),
            Err(reason) => {
                let err = AnnotatorError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason,
                };
                log::warn!("skipping record: {}", err);
            }
        }
    }

    Ok(records)
}

/// Rewrite the whole file from the in-memory record set.
///
/// Writes a sibling temp file and renames it over the target, so the file
/// on disk is either its previous content or the fully-new content. There
/// is no journaling beyond that; a crash between write and rename leaves
/// the old file intact.
pub fn rewrite_records(path: &Path, records: &[Vec<String>]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    for record in records {
        let fields: Vec<&str> = record.iter().map(String::as_str).collect();
        writeln!(tmp, "{}", encode(&fields))?;
    }
    tmp.persist(path).map_err(|e| e.error)?;

    log::debug!("rewrote {} ({} records)", path.display(), records.len());
    Ok(())
}
