//! Mapping of label indices onto page cells
//!
//! Cells on a page are numbered left-to-right, top-to-bottom from 1.
//! Printing starts at cell `start_label` of the first page and continues on
//! as many following pages as needed.

use crate::settings::Settings;

use super::LayoutError;

/// Zero-based `(row, column)` of the `k`-th label, counting `k` from 1
pub fn row_col(k: usize, rows: u32, columns: u32, start_label: u32) -> (u32, u32) {
    let per_page = rows as usize * columns as usize;
    let on_page = (k + start_label as usize).saturating_sub(2) % per_page;
    let columns = columns as usize;
    ((on_page / columns) as u32, (on_page % columns) as u32)
}

/// Whether a page break follows the label at zero-based index `k`.
///
/// A break follows every label that fills the last cell of its page,
/// except the final label `last_k`, so no trailing blank page is emitted.
pub fn needs_new_page(k: usize, last_k: usize, rows: u32, columns: u32, start_label: u32) -> bool {
    if k == last_k {
        return false;
    }
    let (row, column) = row_col(k + 1, rows, columns, start_label);
    row + 1 == rows && column + 1 == columns
}

/// One-based page holding zero-based cell number `k` of the whole run
pub fn page_number(k: usize, rows: u32, columns: u32) -> usize {
    k / (rows as usize * columns as usize) + 1
}

/// Where one label text goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Zero-based index into the label texts
    pub index: usize,
    pub page: usize,
    pub row: u32,
    pub column: u32,
    /// A page break follows this label
    pub new_page_after: bool,
}

/// Place every text of `texts` according to `settings`.
///
/// Fails with [`LayoutError::EmptyLabel`] when there is nothing but blank
/// text to print and the job is neither a view nor a template.
pub fn place(texts: &[String], settings: &Settings) -> Result<Vec<Placement>, LayoutError> {
    if is_waste_of_labels(texts) && !(settings.view || settings.template) {
        return Err(LayoutError::EmptyLabel);
    }

    let (rows, columns, start) = (settings.rows, settings.columns, settings.start_label);
    let last_k = texts.len().saturating_sub(1);
    let placements: Vec<Placement> = (0..texts.len())
        .map(|k| {
            let (row, column) = row_col(k + 1, rows, columns, start);
            Placement {
                index: k,
                page: page_number(k + start as usize - 1, rows, columns),
                row,
                column,
                new_page_after: needs_new_page(k, last_k, rows, columns, start),
            }
        })
        .collect();

    tracing::debug!(
        labels = placements.len(),
        pages = placements.last().map_or(0, |p| p.page),
        "placed labels"
    );
    Ok(placements)
}

fn is_waste_of_labels(texts: &[String]) -> bool {
    texts.iter().all(|t| t.trim().is_empty())
}
