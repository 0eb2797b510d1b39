use clap::{Parser, Subcommand};

use crate::query::SortPreset;
use crate::view::ViewConfig;

#[derive(Parser)]
#[command(name = "rentalhub")]
#[command(about = "Browse and manage vehicle rental marketplace lists")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the available views
    Views {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch a view and print one page of it
    #[command(visible_alias = "list")]
    Ls {
        /// View name: vehicles, listings, transactions, sales, lost-and-found, wishlist
        #[arg(value_parser = parse_view)]
        view: String,

        /// Case-insensitive text to search for
        #[arg(short, long)]
        search: Option<String>,

        /// Category selector key (default: all)
        #[arg(short, long)]
        category: Option<String>,

        /// Status selector key (default: all)
        #[arg(long)]
        status: Option<String>,

        /// Earliest date, inclusive (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from: Option<String>,

        /// Latest date, inclusive through the end of that day
        #[arg(long)]
        to: Option<String>,

        /// Minimum price, inclusive
        #[arg(long)]
        min_price: Option<f64>,

        /// Maximum price, inclusive
        #[arg(long)]
        max_price: Option<f64>,

        /// Sort: default, date-latest, date-oldest, price-low, price-high
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortPreset>,

        /// Page number, 1-indexed; out of range pages are clamped
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add an item to a view
    Add {
        #[arg(value_parser = parse_view)]
        view: String,

        /// Field assignment, repeatable (e.g. --set title="Lost Keys")
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit fields of an item
    Edit {
        #[arg(value_parser = parse_view)]
        view: String,

        /// Item id
        id: String,

        /// Field assignment, repeatable
        #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
        set: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change the status of an item
    Status {
        #[arg(value_parser = parse_view)]
        view: String,

        /// Item id
        id: String,

        /// New status value
        status: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an item
    #[command(visible_alias = "delete")]
    Rm {
        #[arg(value_parser = parse_view)]
        view: String,

        /// Item id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print amount totals for a transaction view
    Summary {
        #[arg(value_parser = parse_view)]
        view: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the configuration file path
    Path,
}

fn parse_view(s: &str) -> Result<String, String> {
    let name = s.trim().to_lowercase();
    if ViewConfig::NAMES.contains(&name.as_str()) {
        Ok(name)
    } else {
        Err(format!(
            "unknown view '{s}', expected one of: {}",
            ViewConfig::NAMES.join(", ")
        ))
    }
}

fn parse_sort(s: &str) -> Result<SortPreset, String> {
    s.parse::<SortPreset>().map_err(|e| e.to_string())
}
