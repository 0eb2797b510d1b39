//! Terminal rendering of list pages, summaries and toasts.

use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;
use unicase::UniCase;

use crate::query::Page;
use crate::record::Record;
use crate::view::{Column, Summary, Toast, ToastLevel};

/// Longest cell shown before truncation.
const MAX_CELL_WIDTH: usize = 40;

/// Placeholder for absent attributes.
pub const EMPTY_CELL: &str = "-";

pub fn format_status_colored(status: &str) -> String {
    let folded = UniCase::new(status);
    let is = |s: &str| folded == UniCase::new(s);
    if is("paid") || is("available") || is("resolved") || is("arrived") {
        status.green().to_string()
    } else if is("pending") || is("active") || is("booked") {
        status.yellow().to_string()
    } else if is("failed") || is("cancelled") || is("lost") {
        status.red().to_string()
    } else {
        status.to_string()
    }
}

pub fn format_toast(toast: &Toast) -> String {
    match toast.level {
        ToastLevel::Info => toast.message.cyan().to_string(),
        ToastLevel::Success => toast.message.green().to_string(),
        ToastLevel::Warning => toast.message.yellow().to_string(),
        ToastLevel::Error => toast.message.red().to_string(),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
    format!("{cut}...")
}

/// Cell text for one attribute; absent values show as `-`.
pub fn cell_text(record: &Record, path: &str) -> String {
    match record.text(path) {
        Some(text) if !text.trim().is_empty() => truncate(text.trim()),
        _ => EMPTY_CELL.to_string(),
    }
}

/// Render one page as a table followed by a pager line.
pub fn render_page(page: &Page<&Record>, columns: &[Column], status_path: &str) -> String {
    let mut out = String::new();

    if page.items.is_empty() {
        out.push_str("No matching items found.\n");
    } else {
        let mut builder = Builder::default();
        builder.push_record(columns.iter().map(|c| c.header.clone()));
        for record in &page.items {
            builder.push_record(columns.iter().map(|c| {
                let text = cell_text(record, &c.path);
                if c.path == status_path && text != EMPTY_CELL {
                    format_status_colored(&text)
                } else {
                    text
                }
            }));
        }
        let mut table = builder.build();
        table.with(Style::rounded());
        out.push_str(&table.to_string());
        out.push('\n');
    }

    out.push_str(&format_pager(page));
    out
}

/// `Page 2 of 3 (14 items)`, with arrows for available directions.
pub fn format_pager<T>(page: &Page<T>) -> String {
    let prev = if page.has_previous() { "<" } else { " " };
    let next = if page.has_next() { ">" } else { " " };
    let noun = if page.total_items == 1 { "item" } else { "items" };
    format!(
        "{prev} Page {} of {} ({} {noun}) {next}",
        page.current_page, page.total_pages, page.total_items
    )
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Transactions: {}\nTotal amount: {}\nPaid: {}\nPending: {}",
        summary.count,
        format_amount(summary.total),
        format_amount(summary.paid).green(),
        format_amount(summary.pending).yellow(),
    )
}
