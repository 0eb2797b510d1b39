use serde_json::json;

use super::{open_view, parse_from, parse_to, print_json, print_toast};
use crate::display::render_page;
use crate::error::Result;
use crate::query::{DateRange, PriceRange, SortPreset};

/// Options for the `ls` command
#[derive(Debug, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: Option<SortPreset>,
    pub page: usize,
    pub json: bool,
}

/// Fetch a view and print one filtered, sorted page of it
pub async fn cmd_ls(view_name: &str, options: ListOptions) -> Result<()> {
    let mut opened = open_view(view_name).await?;
    let view = &mut opened.view;

    if let Some(search) = options.search {
        view.set_query(search)?;
    }
    if let Some(category) = options.category {
        view.set_category(category)?;
    }
    if let Some(status) = options.status {
        view.set_status(status)?;
    }
    if options.from.is_some() || options.to.is_some() {
        let start = options.from.as_deref().map(parse_from).transpose()?;
        let end = options.to.as_deref().map(parse_to).transpose()?;
        view.set_date_range(Some(DateRange::new(start, end)))?;
    }
    if options.min_price.is_some() || options.max_price.is_some() {
        view.set_price_range(Some(PriceRange::new(options.min_price, options.max_price)))?;
    }
    if let Some(preset) = options.sort {
        view.set_sort_preset(preset)?;
    }
    let last = view.visible().total_pages;
    view.jump_to(options.page.clamp(1, last));

    let page = view.visible();

    if options.json {
        return print_json(&json!({
            "view": view.config().name,
            "current_page": page.current_page,
            "total_pages": page.total_pages,
            "total_items": page.total_items,
            "items": page.items,
        }));
    }

    println!(
        "{}",
        render_page(&page, &view.config().columns, &view.config().status_field)
    );
    print_toast(view);
    Ok(())
}
