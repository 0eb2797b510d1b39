//! Command implementations for the `rentalhub` binary.
//!
//! Each command loads the configuration, opens the requested list view
//! against the HTTP collaborator and prints the outcome.

mod config;
mod ls;
mod mutate;
mod summary;
mod views;

pub use config::{cmd_config_path, cmd_config_show};
pub use ls::{ListOptions, cmd_ls};
pub use mutate::{cmd_add, cmd_edit, cmd_rm, cmd_status};
pub use summary::cmd_summary;
pub use views::cmd_views;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::Config;
use crate::display::format_toast;
use crate::error::{RentalError, Result};
use crate::remote::HttpCollaborator;
use crate::session::Session;
use crate::view::ListView;

/// Print a JSON value to stdout
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A loaded view plus what is needed to act on it.
pub(crate) struct OpenView {
    pub view: ListView,
    pub api: HttpCollaborator,
    pub session: Session,
}

/// Load configuration and fetch the named view.
pub(crate) async fn open_view(name: &str) -> Result<OpenView> {
    let config = Config::load()?;
    let view_config = config.view(name)?;
    let api = HttpCollaborator::from_config(&config)?;
    let session = config.session();
    debug!(view = %view_config.name, base = %api.base_url(), "opening view");

    let mut view = ListView::new(view_config);
    view.load(&api, &session).await?;
    Ok(OpenView { view, api, session })
}

/// Print the view's toast, if any.
pub(crate) fn print_toast(view: &ListView) {
    if let Some(toast) = view.toast() {
        println!("{}", format_toast(toast));
    }
}

/// Parse `key=value` assignments into a field map.
///
/// Values that parse as JSON (numbers, booleans, null, arrays, objects and
/// quoted strings) keep their type; anything else is taken as a string.
pub fn parse_assignments(assignments: &[String]) -> Result<Map<String, Value>> {
    let mut fields = Map::new();
    for assignment in assignments {
        let (key, raw) = assignment.split_once('=').ok_or_else(|| {
            RentalError::Validation(format!("expected key=value, got '{assignment}'"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(RentalError::Validation(format!(
                "missing field name in '{assignment}'"
            )));
        }
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        fields.insert(key.to_string(), value);
    }
    Ok(fields)
}

fn parse_date(s: &str) -> Result<Date> {
    s.trim()
        .parse::<Date>()
        .map_err(|e| RentalError::Validation(format!("invalid date '{s}': {e}")))
}

fn utc(date_time: jiff::civil::DateTime, s: &str) -> Result<Timestamp> {
    date_time
        .to_zoned(TimeZone::UTC)
        .map(|z| z.timestamp())
        .map_err(|e| RentalError::Validation(format!("invalid date '{s}': {e}")))
}

/// Start of the given day (UTC), or the instant itself.
pub fn parse_from(s: &str) -> Result<Timestamp> {
    if let Ok(ts) = s.trim().parse::<Timestamp>() {
        return Ok(ts);
    }
    utc(parse_date(s)?.at(0, 0, 0, 0), s)
}

/// Last millisecond of the given day (UTC), or the instant itself.
pub fn parse_to(s: &str) -> Result<Timestamp> {
    if let Ok(ts) = s.trim().parse::<Timestamp>() {
        return Ok(ts);
    }
    utc(parse_date(s)?.at(23, 59, 59, 999_000_000), s)
}
