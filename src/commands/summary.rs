use serde_json::json;

use super::{open_view, print_json, print_toast};
use crate::display::render_summary;
use crate::error::{RentalError, Result};

/// Print totals for a transaction view
pub async fn cmd_summary(view_name: &str, json: bool) -> Result<()> {
    let opened = open_view(view_name).await?;
    let view = &opened.view;

    let summary = view.summary().ok_or_else(|| {
        RentalError::Validation(format!("{} has no amounts to summarize", view.config().name))
    })?;

    if json {
        return print_json(&json!({
            "view": view.config().name,
            "summary": summary,
        }));
    }

    println!("{}", render_summary(&summary));
    print_toast(view);
    Ok(())
}
