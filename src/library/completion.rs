/// Completion metrics
///
/// Completion is derived, never stored: the share of a book's pages that
/// carry a non-empty annotation, as a rounded integer percentage.

/// Percentage of labeled pages, rounded (not truncated).
///
/// A book with zero pages reports 0%, not 100% and not a division by zero.
pub fn percentage(labeled: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (100.0 * labeled as f64 / total as f64).round() as u8
}

/// Aggregate completion across the whole library: labeled pages over total
/// pages, summed across every book before rounding.
pub fn library_percentage(per_book: &[(usize, usize)]) -> u8 {
    let labeled: usize = per_book.iter().map(|(labeled, _)| labeled).sum();
    let total: usize = per_book.iter().map(|(_, total)| total).sum();
    percentage(labeled, total)
}
