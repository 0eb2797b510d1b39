#[macro_use]
mod macros;

pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod query;
pub mod record;
pub mod remote;
pub mod session;
pub mod view;

pub use config::Config;
pub use error::{ErrorKind, RentalError, Result};
pub use query::{Criteria, DateRange, FilterSpec, Page, PriceRange, SortKey, SortPreset};
pub use record::{Record, RecordId};
pub use remote::{Collaborator, HttpCollaborator, MemoryCollaborator, WriteMethod, WriteOutcome};
pub use session::{Role, Session};
pub use view::{FetchReason, ListAction, ListView, LoadState, Toast, ToastLevel, ViewConfig};
