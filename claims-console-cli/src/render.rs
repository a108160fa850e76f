//! Plain-text rendering for stdout.

use claims_console::table::{PageLink, PageMeta};

/// Left-aligned columns sized to the widest cell.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    println!("{}", format_row(headers.iter().copied(), &widths));
    println!(
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    );
    for row in rows {
        println!("{}", format_row(row.iter().map(String::as_str), &widths));
    }
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn print_page_footer(meta: &PageMeta, item_label: &str) {
    let strip = meta
        .page_strip()
        .into_iter()
        .map(|link| match link {
            PageLink::Page(p) if p == meta.page => format!("[{p}]"),
            PageLink::Page(p) => p.to_string(),
            PageLink::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    println!();
    println!("{}", meta.summary(item_label));
    println!("Page {} of {}: {strip}", meta.page, meta.total_pages);
}

/// `label: value` lines with the labels aligned.
pub fn print_fields(fields: &[(&str, String)]) {
    let width = fields.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (label, value) in fields {
        println!("{label:<width$}  {value}");
    }
}

pub fn active_label(is_active: bool) -> String {
    let label = if is_active { "Active" } else { "Inactive" };
    label.to_string()
}

pub fn or_placeholder(value: Option<impl ToString>) -> String {
    value
        .map(|v| v.to_string())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| claims_console::projection::PLACEHOLDER.to_string())
}
