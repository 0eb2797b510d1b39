//! List views: one parameterized orchestrator per marketplace screen.

pub mod config;
pub mod list;
pub mod summary;
pub mod toast;

#[cfg(test)]
mod tests;

pub use config::{Column, ViewConfig, WriteRoutes};
pub use list::{FetchReason, FetchTicket, ListAction, ListView, LoadState};
pub use summary::{Summary, summarize};
pub use toast::{Toast, ToastLevel};
