//! Plain-text rendering of a worksheet
//!
//! The first non-empty row is the header. Columns are right-aligned to their
//! widest cell and separated by two spaces; no row index is printed.

use calamine::{Data, Range};

const COLUMN_GAP: &str = "  ";
const MISSING: &str = "NaN";

/// Render a worksheet range as an aligned text table.
///
/// Returns `None` when the range holds no data at all.
pub fn render_range(range: &Range<Data>) -> Option<String> {
    let rows: Vec<Vec<Option<String>>> = range
        .rows()
        .map(|row| row.iter().map(render_cell).collect())
        .collect();

    render_rows(rows)
}

/// Render pre-converted rows; `None` cells are empty.
pub(crate) fn render_rows(rows: Vec<Vec<Option<String>>>) -> Option<String> {
    let mut rows = rows
        .into_iter()
        .filter(|row| row.iter().any(Option::is_some));

    let header_row = rows.next()?;
    let body: Vec<Vec<Option<String>>> = rows.collect();

    let columns = body
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header_row.len()))
        .max()
        .unwrap_or(0);

    let header: Vec<String> = (0..columns)
        .map(|i| match header_row.get(i) {
            Some(Some(name)) => name.clone(),
            _ => format!("Unnamed: {}", i),
        })
        .collect();

    if body.is_empty() {
        return Some(format!(
            "Empty DataFrame\nColumns: [{}]\nIndex: []",
            header.join(", ")
        ));
    }

    let cells: Vec<Vec<String>> = body
        .into_iter()
        .map(|row| {
            (0..columns)
                .map(|i| {
                    row.get(i)
                        .cloned()
                        .flatten()
                        .unwrap_or_else(|| MISSING.to_string())
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(align_row(&header, &widths));
    for row in &cells {
        lines.push(align_row(row, &widths));
    }

    Some(lines.join("\n"))
}

fn align_row(row: &[String], widths: &[usize]) -> String {
    row.iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
}

fn render_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(true) => Some("True".to_string()),
        Data::Bool(false) => Some("False".to_string()),
        other => Some(other.to_string()),
    }
}
