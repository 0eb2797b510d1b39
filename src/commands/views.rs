use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::print_json;
use crate::config::Config;
use crate::error::Result;
use crate::view::ViewConfig;

/// A row in the views table
#[derive(Tabled)]
struct ViewRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Page size")]
    page_size: usize,
    #[tabled(rename = "Writes")]
    writes: String,
}

fn writes_label(view: &ViewConfig) -> String {
    if !view.is_writable() {
        "read-only".to_string()
    } else if view.admin_writes {
        "admin".to_string()
    } else {
        "signed-in user".to_string()
    }
}

/// List the available views with their configured page sizes
pub fn cmd_views(json: bool) -> Result<()> {
    let config = Config::load()?;
    let views = ViewConfig::all()
        .into_iter()
        .map(|v| config.view(&v.name))
        .collect::<Result<Vec<_>>>()?;

    if json {
        let items: Vec<_> = views
            .iter()
            .map(|v| {
                json!({
                    "name": v.name,
                    "title": v.title,
                    "endpoint": v.endpoint,
                    "page_size": v.page_size,
                    "writable": v.is_writable(),
                    "admin_writes": v.admin_writes,
                })
            })
            .collect();
        return print_json(&json!(items));
    }

    let rows: Vec<ViewRow> = views
        .iter()
        .map(|v| ViewRow {
            name: v.name.clone(),
            title: v.title.clone(),
            endpoint: v.endpoint.clone(),
            page_size: v.page_size,
            writes: writes_label(v),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}
