/// Application settings
///
/// Settings persist as a JSON blob in the user's config directory:
/// - Linux: ~/.config/book-annotator/settings.json
/// - macOS: ~/Library/Application Support/book-annotator/settings.json
/// - Windows: %APPDATA%\book-annotator\settings.json
///
/// The stores never read this themselves; the presentation layer loads the
/// blob once per invocation and passes the resolved paths and label set in.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnnotatorError, Result};

/// One metadata column the user chose to display, with its screen label.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MetadataField {
    pub column: String,
    pub label: String,
    /// Show this field on the book cover in listings
    pub display_on_cover: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Root directory of book folders
    pub books_dir: Option<PathBuf>,
    /// Backing file for per-page annotations
    pub annotations_file: Option<PathBuf>,
    /// Backing file for per-book volume notes (distinct from annotations)
    pub notes_file: Option<PathBuf>,
    /// Books per listing page
    pub books_per_page: usize,
    /// Book pages shown per view
    pub pages_per_view: usize,
    /// The fixed label set offered for every page
    pub labels: Vec<String>,
    /// Label used by the "mark all remaining" bulk action
    pub default_label: String,
    /// Optional delimited metadata file
    pub metadata_file: Option<PathBuf>,
    /// Column of the metadata file that holds the book id
    pub book_id_column: String,
    /// Metadata columns to display, in order
    pub metadata_fields: Vec<MetadataField>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            books_dir: None,
            annotations_file: None,
            notes_file: None,
            books_per_page: 10,
            pages_per_view: 5,
            labels: ["Front", "Core", "Back", "Unknown"]
                .iter()
                .map(|l| l.to_string())
                .collect(),
            default_label: "Unknown".to_string(),
            metadata_file: None,
            book_id_column: "htid".to_string(),
            metadata_fields: Vec::new(),
        }
    }
}

impl Settings {
    /// Default on-disk location for the settings blob.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("book-annotator");
        path.push("settings.json");
        path
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Save settings as pretty JSON, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn require_books_dir(&self) -> Result<&Path> {
        self.books_dir
            .as_deref()
            .ok_or_else(|| AnnotatorError::Configuration("books directory is not set".into()))
    }

    pub fn require_annotations_file(&self) -> Result<&Path> {
        self.annotations_file
            .as_deref()
            .ok_or_else(|| AnnotatorError::Configuration("annotations file is not set".into()))
    }

    pub fn require_notes_file(&self) -> Result<&Path> {
        self.notes_file
            .as_deref()
            .ok_or_else(|| AnnotatorError::Configuration("volume notes file is not set".into()))
    }

    /// Reject labels outside the configured set before they reach the store.
    pub fn require_known_label(&self, label: &str) -> Result<()> {
        if self.labels.iter().any(|l| l == label) {
            Ok(())
        } else {
            Err(AnnotatorError::Configuration(format!(
                "label '{}' is not in the configured set ({})",
                label,
                self.labels.join(", ")
            )))
        }
    }
}
