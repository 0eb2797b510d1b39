//! Mutation commands: add, edit, status and rm.
//!
//! All of them fetch the view first so the target can be checked against
//! the current list, then print the resulting toast.

use serde_json::json;
use tracing::info;

use super::{open_view, parse_assignments, print_json, print_toast};
use crate::error::{RentalError, Result};
use crate::record::RecordId;

fn print_outcome(view: &crate::view::ListView, id: Option<&RecordId>, json: bool) -> Result<()> {
    if json {
        let record = id.and_then(|id| view.find(id));
        return print_json(&json!({
            "view": view.config().name,
            "message": view.toast().map(|t| t.message.clone()),
            "record": record,
            "total_items": view.records().len(),
        }));
    }
    print_toast(view);
    Ok(())
}

/// Create a new item from `key=value` assignments
pub async fn cmd_add(view_name: &str, assignments: &[String], json: bool) -> Result<()> {
    let fields = parse_assignments(assignments)?;
    if fields.is_empty() {
        return Err(RentalError::Validation(
            "nothing to add, pass at least one --set key=value".to_string(),
        ));
    }

    let mut opened = open_view(view_name).await?;
    opened.view.create(&opened.api, &opened.session, fields).await?;
    info!(view = %view_name, "item created");
    print_outcome(&opened.view, None, json)
}

/// Apply `key=value` assignments to an existing item
pub async fn cmd_edit(view_name: &str, id: &str, assignments: &[String], json: bool) -> Result<()> {
    let patch = parse_assignments(assignments)?;
    let id = RecordId::new(id);

    let mut opened = open_view(view_name).await?;
    opened.view.edit(&opened.api, &opened.session, &id, patch).await?;
    info!(view = %view_name, %id, "item edited");
    print_outcome(&opened.view, Some(&id), json)
}

/// Change an item's status
pub async fn cmd_status(view_name: &str, id: &str, status: &str, json: bool) -> Result<()> {
    if status.trim().is_empty() {
        return Err(RentalError::Validation("status cannot be empty".to_string()));
    }
    let id = RecordId::new(id);

    let mut opened = open_view(view_name).await?;
    opened
        .view
        .update_status(&opened.api, &opened.session, &id, status.trim())
        .await?;
    info!(view = %view_name, %id, status = %status, "status updated");
    print_outcome(&opened.view, Some(&id), json)
}

/// Delete an item
pub async fn cmd_rm(view_name: &str, id: &str, json: bool) -> Result<()> {
    let id = RecordId::new(id);

    let mut opened = open_view(view_name).await?;
    opened.view.delete(&opened.api, &opened.session, &id).await?;
    info!(view = %view_name, %id, "item deleted");
    print_outcome(&opened.view, None, json)
}
