use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use book_annotator::error::Result;
use book_annotator::library::{completion, index, metadata, scan};
use book_annotator::settings::Settings;
use book_annotator::store::{AnnotationStore, VolumeNoteStore};

/// Track reading labels and notes across a library of plain-text books
#[derive(Parser)]
#[command(name = "book-annotator", version)]
struct Cli {
    /// Settings file to use instead of the per-user default location
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show or update the saved settings
    Configure {
        #[arg(long)]
        books_dir: Option<PathBuf>,
        #[arg(long)]
        annotations_file: Option<PathBuf>,
        #[arg(long)]
        notes_file: Option<PathBuf>,
        #[arg(long)]
        books_per_page: Option<usize>,
        #[arg(long)]
        pages_per_view: Option<usize>,
        /// Comma-separated label set, e.g. "Front,Core,Back,Unknown"
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,
        /// Label applied by the `fill` command
        #[arg(long)]
        default_label: Option<String>,
        #[arg(long)]
        metadata_file: Option<PathBuf>,
        /// Metadata column holding the book id (folder name)
        #[arg(long)]
        book_id_column: Option<String>,
    },

    /// List books with completion percentages and cover metadata
    Books {
        /// Case-insensitive filter over folder names and metadata values
        #[arg(long, default_value = "")]
        search: String,
        /// Listing page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: i64,
    },

    /// Show one book's pages with their current labels
    Pages {
        book: String,
        /// View page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: i64,
        /// Print page text, not just labels
        #[arg(long)]
        text: bool,
    },

    /// Set or clear the label on one page, or on a numeric page range
    Annotate {
        book: String,
        /// Page file name (e.g. 00000042.txt); omit when using --from/--to
        page: Option<String>,
        /// Label to apply; omit together with --clear
        #[arg(short, long)]
        label: Option<String>,
        /// First page ordinal of a range
        #[arg(long, requires = "to", conflicts_with = "page")]
        from: Option<u32>,
        /// Last page ordinal of a range (inclusive)
        #[arg(long, requires = "from")]
        to: Option<u32>,
        /// Remove the label instead of setting one
        #[arg(long, conflicts_with = "label")]
        clear: bool,
    },

    /// Mark every unannotated page of a book with the default label
    Fill { book: String },

    /// Show, set, or clear the volume note for a book
    Note {
        book: String,
        text: Option<String>,
        #[arg(long, conflicts_with = "text")]
        clear: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let settings_path = cli.settings.clone().unwrap_or_else(Settings::default_path);

    match run(cli, &settings_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("⚠️  {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, settings_path: &std::path::Path) -> Result<()> {
    let settings = Settings::load(settings_path)?;

    match cli.command {
        Command::Configure {
            books_dir,
            annotations_file,
            notes_file,
            books_per_page,
            pages_per_view,
            labels,
            default_label,
            metadata_file,
            book_id_column,
        } => {
            let mut settings = settings;
            if let Some(v) = books_dir {
                settings.books_dir = Some(v);
            }
            if let Some(v) = annotations_file {
                settings.annotations_file = Some(v);
            }
            if let Some(v) = notes_file {
                settings.notes_file = Some(v);
            }
            if let Some(v) = books_per_page {
                settings.books_per_page = v;
            }
            if let Some(v) = pages_per_view {
                settings.pages_per_view = v;
            }
            if let Some(v) = labels {
                settings.labels = v;
            }
            if let Some(v) = default_label {
                settings.default_label = v;
            }
            if let Some(v) = metadata_file {
                settings.metadata_file = Some(v);
            }
            if let Some(v) = book_id_column {
                settings.book_id_column = v;
            }
            settings.save(settings_path)?;
            println!("✅ Settings saved to {}", settings_path.display());
            show_settings(&settings);
            Ok(())
        }
        Command::Books { search, page } => list_books(&settings, &search, page),
        Command::Pages { book, page, text } => show_pages(&settings, &book, page, text),
        Command::Annotate {
            book,
            page,
            label,
            from,
            to,
            clear,
        } => annotate(
            &settings,
            &book,
            page.as_deref(),
            label.as_deref(),
            from,
            to,
            clear,
        ),
        Command::Fill { book } => fill(&settings, &book),
        Command::Note { book, text, clear } => note(&settings, &book, text.as_deref(), clear),
    }
}

fn show_settings(settings: &Settings) {
    let path_or_unset = |p: &Option<PathBuf>| {
        p.as_ref()
            .map_or("(unset)".to_string(), |p| p.display().to_string())
    };
    println!("  books dir:        {}", path_or_unset(&settings.books_dir));
    println!(
        "  annotations file: {}",
        path_or_unset(&settings.annotations_file)
    );
    println!("  notes file:       {}", path_or_unset(&settings.notes_file));
    println!(
        "  metadata file:    {}",
        path_or_unset(&settings.metadata_file)
    );
    println!("  labels:           {}", settings.labels.join(", "));
    println!("  default label:    {}", settings.default_label);
}

/// The `books` listing: scan, join completion and metadata, filter, window.
fn list_books(settings: &Settings, search: &str, page: i64) -> Result<()> {
    let root = settings.require_books_dir()?;
    let annotations = AnnotationStore::new(settings.require_annotations_file()?);

    let books = scan::list_books(root)?;
    let mut summaries = index::with_completion(root, &books, &annotations)?;

    if let Some(metadata_file) = &settings.metadata_file {
        let map = metadata::load_metadata(metadata_file, &settings.book_id_column)?;
        index::with_metadata(&mut summaries, &map);
    }

    let summaries = index::search(summaries, search);
    let total_pages = index::page_count(summaries.len(), settings.books_per_page);
    let page = index::validate_page_number(page, total_pages)?;
    let window = index::paginate(&summaries, settings.books_per_page, page);

    let cover_fields: Vec<&str> = settings
        .metadata_fields
        .iter()
        .filter(|f| f.display_on_cover)
        .map(|f| f.column.as_str())
        .collect();

    for book in window {
        let mut line = format!(
            "{:<24} {:>3}%  ({}/{} pages)",
            book.book_id, book.completion, book.labeled_count, book.page_count
        );
        for column in &cover_fields {
            if let Some(value) = book.metadata.get(*column) {
                line.push_str(&format!("  {}", value));
            }
        }
        println!("{}", line);
    }

    let counts: Vec<(usize, usize)> = summaries
        .iter()
        .map(|b| (b.labeled_count, b.page_count))
        .collect();
    println!(
        "-- {} books, {}% of the library labeled (listing page {}/{})",
        summaries.len(),
        completion::library_percentage(&counts),
        page,
        total_pages.max(1)
    );
    Ok(())
}

/// The `pages` view: one window of a book's pages with labels and the note.
fn show_pages(settings: &Settings, book: &str, page: i64, text: bool) -> Result<()> {
    let root = settings.require_books_dir()?;
    let annotations = AnnotationStore::new(settings.require_annotations_file()?);
    let notes = VolumeNoteStore::new(settings.require_notes_file()?);

    let pages = scan::list_pages(&root.join(book))?;
    let rows = annotations.list(book)?;

    println!(
        "{}: {}% complete ({}/{} pages)",
        book,
        completion::percentage(rows.len(), pages.len()),
        rows.len(),
        pages.len()
    );
    if let Some(note) = notes.get(book)? {
        println!("note: {}", note);
    }
    if let Some(next) = index::first_unannotated(&pages, &rows) {
        println!("next unannotated: {}", pages[next]);
    }

    let total_views = index::page_count(pages.len(), settings.pages_per_view);
    let page = index::validate_page_number(page, total_views)?;

    for file_name in index::paginate(&pages, settings.pages_per_view, page) {
        let label = rows
            .iter()
            .find(|a| &a.page == file_name)
            .map_or("-", |a| a.label.as_str());
        println!("  {:<16} [{}]", file_name, label);
        if text {
            println!("{}", scan::read_page(root, book, file_name)?);
        }
    }
    println!("-- view {}/{}", page, total_views.max(1));
    Ok(())
}

/// Single-page, range, and clear annotation paths all funnel into the store.
fn annotate(
    settings: &Settings,
    book: &str,
    page: Option<&str>,
    label: Option<&str>,
    from: Option<u32>,
    to: Option<u32>,
    clear: bool,
) -> Result<()> {
    let annotations = AnnotationStore::new(settings.require_annotations_file()?);

    let label = match (label, clear) {
        (Some(label), false) => {
            settings.require_known_label(label)?;
            label
        }
        (None, true) => "",
        _ => {
            return Err(book_annotator::AnnotatorError::Configuration(
                "supply a label, or --clear to remove one".into(),
            ))
        }
    };

    if let (Some(from), Some(to)) = (from, to) {
        let root = settings.require_books_dir()?;
        let pages = scan::list_pages(&root.join(book))?;
        let in_range = index::pages_in_range(&pages, from, to);
        annotations.upsert_many(book, &in_range, label)?;
        println!(
            "✅ {} pages {}-{}: {} updated",
            book,
            from,
            to,
            in_range.len()
        );
    } else {
        let page = page.ok_or_else(|| {
            book_annotator::AnnotatorError::Configuration(
                "supply a page file name, or --from/--to for a range".into(),
            )
        })?;
        annotations.upsert(book, page, label)?;
        if clear {
            println!("✅ {} {}: label cleared", book, page);
        } else {
            println!("✅ {} {}: {}", book, page, label);
        }
    }
    Ok(())
}

/// Mark every page that has no label yet with the configured default label.
fn fill(settings: &Settings, book: &str) -> Result<()> {
    let root = settings.require_books_dir()?;
    let annotations = AnnotationStore::new(settings.require_annotations_file()?);
    settings.require_known_label(&settings.default_label)?;

    let pages = scan::list_pages(&root.join(book))?;
    let rows = annotations.list(book)?;
    let unannotated: Vec<&str> = pages
        .iter()
        .filter(|page| !rows.iter().any(|a| &a.page == *page))
        .map(String::as_str)
        .collect();

    annotations.upsert_many(book, &unannotated, &settings.default_label)?;
    println!(
        "✅ {}: {} pages marked as {}",
        book,
        unannotated.len(),
        settings.default_label
    );
    Ok(())
}

fn note(settings: &Settings, book: &str, text: Option<&str>, clear: bool) -> Result<()> {
    let notes = VolumeNoteStore::new(settings.require_notes_file()?);

    if clear {
        notes.clear(book)?;
        println!("✅ {}: volume note cleared", book);
    } else if let Some(text) = text {
        notes.save(book, text)?;
        println!("✅ {}: volume note saved", book);
    } else {
        match notes.get(book)? {
            Some(note) => println!("{}", note),
            None => println!("(no volume note for {})", book),
        }
    }
    Ok(())
}
