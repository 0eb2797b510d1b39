//! The list view orchestrator.
//!
//! A [`ListView`] owns one screen's record list together with its criteria,
//! sort key, page state, load state and toast slot. Criteria, sort and page
//! changes are applied synchronously through [`ListAction`]s; fetches and
//! mutations go through a [`Collaborator`].
//!
//! Fetches are split into [`ListView::begin_fetch`] and
//! [`ListView::complete_fetch`] so that a driver running several requests at
//! once can drop answers that were superseded: every `begin_fetch` bumps the
//! request generation and completions from an older generation are ignored.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, RentalError, Result};
use crate::query::filter::build_filters;
use crate::query::{
    Criteria, DateRange, Page, PageState, PriceRange, RecordQuery, RecordQueryBuilder, SortField,
    SortKey, SortPreset, paginate,
};
use crate::record::{ID_FIELD, Record, RecordId};
use crate::remote::{Collaborator, WriteMethod, WriteOutcome, resolve_path};
use crate::session::Session;

use super::config::ViewConfig;
use super::summary::{Summary, summarize};
use super::toast::Toast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Why a fetch was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    /// First load of the screen; resets criteria, sort and page.
    Initial,
    /// Explicit refresh; keeps criteria, sort and page.
    Refresh,
    /// Refetch after a mutation hit a record that no longer exists.
    Reconcile,
}

/// Handle for an in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    reason: FetchReason,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reason(&self) -> FetchReason {
        self.reason
    }
}

/// Synchronous changes to the derived list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    SetQuery(String),
    SetCategory(String),
    SetStatus(String),
    SetDateRange(Option<DateRange>),
    SetPriceRange(Option<PriceRange>),
    ResetFilters,
    SetSort(SortKey),
    NextPage,
    PreviousPage,
    JumpTo(usize),
    DismissToast,
}

/// One screen's list state.
#[derive(Debug, Clone)]
pub struct ListView {
    config: ViewConfig,
    records: Vec<Record>,
    criteria: Criteria,
    sort: SortKey,
    page: PageState,
    load: LoadState,
    generation: u64,
    loaded_once: bool,
    toast: Option<Toast>,
    last_error: Option<String>,
}

impl ListView {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            page: PageState::new(config.page_size),
            sort: config.default_sort.clone(),
            config,
            records: Vec::new(),
            criteria: Criteria::default(),
            load: LoadState::Idle,
            generation: 0,
            loaded_once: false,
            toast: None,
            last_error: None,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// The full record list, unfiltered.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn sort(&self) -> &SortKey {
        &self.sort
    }

    pub fn current_page(&self) -> usize {
        self.page.current()
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Error banner text of the last failed fetch.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    // ========================================================================
    // Derived list
    // ========================================================================

    fn query(&self) -> RecordQuery {
        build_filters(&self.criteria, &self.config.filter)
            .into_iter()
            .fold(
                RecordQueryBuilder::new()
                    .with_sort(self.sort.clone(), self.config.sort_fields.clone()),
                |builder, filter| builder.with_filter(filter),
            )
            .build()
    }

    /// Records passing the criteria, in sort order.
    pub fn filtered(&self) -> Vec<&Record> {
        self.query().apply(&self.records)
    }

    /// The current page of the filtered, sorted list.
    pub fn visible(&self) -> Page<&Record> {
        let rows = self.filtered();
        paginate(&rows, self.page.page_size(), self.page.current())
    }

    /// Totals over the full record list.
    pub fn summary(&self) -> Option<Summary> {
        let amount = self.config.amount_field.as_deref()?;
        Some(summarize(&self.records, amount, &self.config.status_field))
    }

    fn clamp_page(&mut self) {
        let len = self.filtered().len();
        self.page.clamp(len);
    }

    // ========================================================================
    // Criteria, sort and navigation
    // ========================================================================

    /// Apply a synchronous change. Invalid criteria are rejected and leave the
    /// view untouched.
    pub fn apply(&mut self, action: ListAction) -> Result<()> {
        match action {
            ListAction::SetQuery(query) => self.update_criteria(|c| c.query = query),
            ListAction::SetCategory(category) => self.update_criteria(|c| c.category = category),
            ListAction::SetStatus(status) => self.update_criteria(|c| c.status = status),
            ListAction::SetDateRange(range) => self.update_criteria(|c| c.date_range = range),
            ListAction::SetPriceRange(range) => self.update_criteria(|c| c.price_range = range),
            ListAction::ResetFilters => self.update_criteria(|c| *c = Criteria::default()),
            ListAction::SetSort(key) => {
                if key.field == SortField::Price && self.config.sort_fields.price.is_none() {
                    return Err(RentalError::Validation(format!(
                        "{} has no price to sort by",
                        self.config.name
                    )));
                }
                self.sort = key;
                self.page.reset();
                self.clamp_page();
                Ok(())
            }
            ListAction::NextPage => {
                self.next_page();
                Ok(())
            }
            ListAction::PreviousPage => {
                self.previous_page();
                Ok(())
            }
            ListAction::JumpTo(page) => {
                self.jump_to(page);
                Ok(())
            }
            ListAction::DismissToast => {
                self.toast = None;
                Ok(())
            }
        }
    }

    fn update_criteria(&mut self, change: impl FnOnce(&mut Criteria)) -> Result<()> {
        let mut next = self.criteria.clone();
        change(&mut next);
        self.config.filter.validate(&next)?;
        self.criteria = next;
        self.page.reset();
        self.clamp_page();
        Ok(())
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> Result<()> {
        self.apply(ListAction::SetQuery(query.into()))
    }

    pub fn set_category(&mut self, category: impl Into<String>) -> Result<()> {
        self.apply(ListAction::SetCategory(category.into()))
    }

    pub fn set_status(&mut self, status: impl Into<String>) -> Result<()> {
        self.apply(ListAction::SetStatus(status.into()))
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) -> Result<()> {
        self.apply(ListAction::SetDateRange(range))
    }

    pub fn set_price_range(&mut self, range: Option<PriceRange>) -> Result<()> {
        self.apply(ListAction::SetPriceRange(range))
    }

    pub fn reset_filters(&mut self) -> Result<()> {
        self.apply(ListAction::ResetFilters)
    }

    pub fn set_sort(&mut self, key: SortKey) -> Result<()> {
        self.apply(ListAction::SetSort(key))
    }

    pub fn set_sort_preset(&mut self, preset: SortPreset) -> Result<()> {
        self.apply(ListAction::SetSort(preset.key()))
    }

    pub fn next_page(&mut self) {
        let len = self.filtered().len();
        self.page.next(len);
    }

    pub fn previous_page(&mut self) {
        self.page.previous();
    }

    /// Out-of-range pages are ignored.
    pub fn jump_to(&mut self, page: usize) {
        let len = self.filtered().len();
        self.page.jump_to(page, len);
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    /// Enter `Loading` and hand out a ticket for the new request generation.
    pub fn begin_fetch(&mut self, reason: FetchReason) -> FetchTicket {
        self.generation += 1;
        self.load = LoadState::Loading;
        debug!(view = %self.config.name, generation = self.generation, ?reason, "fetch started");
        FetchTicket {
            generation: self.generation,
            reason,
        }
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a fetch result. Returns false when the ticket was superseded.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<Record>>) -> bool {
        if !self.is_current(&ticket) {
            debug!(
                view = %self.config.name,
                stale = ticket.generation,
                current = self.generation,
                "discarding stale fetch"
            );
            return false;
        }

        match result {
            Ok(records) => {
                info!(view = %self.config.name, count = records.len(), "list loaded");
                self.records = records;
                self.load = LoadState::Loaded;
                self.last_error = None;
                if ticket.reason == FetchReason::Initial {
                    self.criteria = Criteria::default();
                    self.sort = self.config.default_sort.clone();
                    self.page.reset();
                }
                self.loaded_once = true;
                self.clamp_page();
            }
            Err(err) => self.record_failure(&err),
        }
        true
    }

    fn record_failure(&mut self, err: &RentalError) {
        warn!(view = %self.config.name, error = %err, "fetch failed");
        self.load = LoadState::Failed;
        self.last_error = Some(err.to_string());
        self.toast = Some(Toast::error(format!("Failed to load {}: {err}", self.config.title)));
    }

    async fn fetch<C: Collaborator>(
        &mut self,
        api: &C,
        session: &Session,
        reason: FetchReason,
    ) -> Result<()> {
        let path = resolve_path(&self.config.endpoint, None, session)?;
        let ticket = self.begin_fetch(reason);
        match api.fetch_list(&path, &[], session).await {
            Ok(records) => {
                self.complete_fetch(ticket, Ok(records));
                Ok(())
            }
            Err(err) => {
                if self.is_current(&ticket) {
                    self.record_failure(&err);
                }
                Err(err)
            }
        }
    }

    /// First load of the screen.
    pub async fn load<C: Collaborator>(&mut self, api: &C, session: &Session) -> Result<()> {
        self.fetch(api, session, FetchReason::Initial).await
    }

    /// Refetch, keeping criteria, sort and page.
    pub async fn refresh<C: Collaborator>(&mut self, api: &C, session: &Session) -> Result<()> {
        let reason = if self.loaded_once {
            FetchReason::Refresh
        } else {
            FetchReason::Initial
        };
        self.fetch(api, session, reason).await
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    fn check_mutable(&self, session: &Session) -> Result<()> {
        if !self.loaded_once || matches!(self.load, LoadState::Idle | LoadState::Loading) {
            return Err(RentalError::Validation(format!(
                "{} has not finished loading",
                self.config.title
            )));
        }
        session.check_write(self.config.admin_writes, &self.config.name)
    }

    fn write_route(&self, route: &Option<String>, action: &str) -> Result<String> {
        route.clone().ok_or_else(|| {
            RentalError::Validation(format!("{} does not support {action}", self.config.name))
        })
    }

    fn require_local(&self, id: &RecordId) -> Result<()> {
        if self.find(id).is_none() {
            return Err(RentalError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn send_write<C: Collaborator>(
        &self,
        api: &C,
        session: &Session,
        method: WriteMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<WriteOutcome> {
        info!(view = %self.config.name, %method, path, "sending mutation");
        api.write(method, path, body, session).await
    }

    /// Report a failed mutation; a vanished record triggers a reconciling refetch.
    async fn mutation_failed<C: Collaborator>(
        &mut self,
        api: &C,
        session: &Session,
        action: &str,
        err: RentalError,
    ) -> RentalError {
        warn!(view = %self.config.name, action, error = %err, "mutation failed");
        self.toast = Some(Toast::error(format!("Failed to {action}: {err}")));
        if err.kind() == ErrorKind::NotFound {
            // the refetch reports its own failure through the toast and banner
            if self
                .fetch(api, session, FetchReason::Reconcile)
                .await
                .is_ok()
            {
                self.toast = Some(Toast::error(format!(
                    "Failed to {action}: {err}. The list was refreshed."
                )));
            }
        }
        err
    }

    fn mutation_succeeded(&mut self, message: String) {
        self.clamp_page();
        self.toast = Some(Toast::success(message));
    }

    fn replace(&mut self, record: Record) {
        if let Some(slot) = self.records.iter_mut().find(|r| r.id() == record.id()) {
            *slot = record;
        }
    }

    /// Create a record and append it to the list.
    ///
    /// Views with an owner field stamp the signed-in user's id on the body.
    pub async fn create<C: Collaborator>(
        &mut self,
        api: &C,
        session: &Session,
        mut fields: Map<String, Value>,
    ) -> Result<()> {
        self.check_mutable(session)?;
        let template = self.write_route(&self.config.routes.create, "adding items")?;
        for field in &self.config.required_fields {
            if fields.get(field).is_none_or(is_blank) {
                return Err(RentalError::MissingField(field.clone()));
            }
        }
        if let Some(owner) = &self.config.owner_field {
            let user_id = session.require_user_id()?;
            fields.insert(owner.clone(), Value::String(user_id.to_string()));
        }
        let path = resolve_path(&template, None, session)?;
        let body = Value::Object(fields);

        match self
            .send_write(api, session, WriteMethod::Post, &path, Some(&body))
            .await
        {
            Ok(WriteOutcome::Record(record)) => {
                self.records.push(record);
                self.mutation_succeeded("Item added successfully".to_string());
                Ok(())
            }
            Ok(WriteOutcome::Ack { message }) => {
                // no record came back, so pick it up from the list
                if self.fetch(api, session, FetchReason::Refresh).await.is_ok() {
                    self.mutation_succeeded(
                        message.unwrap_or_else(|| "Item added successfully".to_string()),
                    );
                }
                Ok(())
            }
            Err(err) => Err(self.mutation_failed(api, session, "add item", err).await),
        }
    }

    /// Update attributes of a record.
    pub async fn edit<C: Collaborator>(
        &mut self,
        api: &C,
        session: &Session,
        id: &RecordId,
        patch: Map<String, Value>,
    ) -> Result<()> {
        self.check_mutable(session)?;
        let template = self.write_route(&self.config.routes.edit, "editing")?;
        if patch.is_empty() {
            return Err(RentalError::Validation("nothing to update".to_string()));
        }
        if let Some(new_id) = patch.get(ID_FIELD)
            && !same_id(new_id, id)
        {
            return Err(RentalError::Validation(
                "the record id cannot be changed".to_string(),
            ));
        }
        for field in &self.config.required_fields {
            if patch.get(field).is_some_and(is_blank) {
                return Err(RentalError::MissingField(field.clone()));
            }
        }
        let path = resolve_path(&template, Some(id), session)?;
        let body = Value::Object(patch);

        let outcome = match self.require_local(id) {
            Ok(()) => {
                self.send_write(api, session, WriteMethod::Put, &path, Some(&body))
                    .await
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok(outcome) => {
                match outcome {
                    WriteOutcome::Record(record) if record.id() == id => self.replace(record),
                    _ => {
                        if let (Some(record), Value::Object(patch)) = (
                            self.records.iter_mut().find(|r| r.id() == id),
                            &body,
                        ) {
                            record.merge(patch);
                        }
                    }
                }
                self.mutation_succeeded("Item updated successfully".to_string());
                Ok(())
            }
            Err(err) => Err(self.mutation_failed(api, session, "update item", err).await),
        }
    }

    /// Change a record's status and patch it in place.
    pub async fn update_status<C: Collaborator>(
        &mut self,
        api: &C,
        session: &Session,
        id: &RecordId,
        status: &str,
    ) -> Result<()> {
        self.check_mutable(session)?;
        let template = self.write_route(&self.config.routes.status, "status updates")?;
        let status = status.trim();
        if status.is_empty() {
            return Err(RentalError::MissingField(self.config.status_field.clone()));
        }
        let path = resolve_path(&template, Some(id), session)?;
        let mut body = Map::new();
        body.insert(
            self.config.status_field.clone(),
            Value::String(status.to_string()),
        );
        let body = Value::Object(body);

        let outcome = match self.require_local(id) {
            Ok(()) => {
                self.send_write(api, session, WriteMethod::Put, &path, Some(&body))
                    .await
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok(WriteOutcome::Record(record)) if record.id() == id => {
                self.replace(record);
                self.mutation_succeeded(format!("Status updated to {status}"));
                Ok(())
            }
            Ok(_) => {
                let field = self.config.status_field.clone();
                if let Some(record) = self.records.iter_mut().find(|r| r.id() == id) {
                    record.set(&field, Value::String(status.to_string()));
                }
                self.mutation_succeeded(format!("Status updated to {status}"));
                Ok(())
            }
            Err(err) => Err(self.mutation_failed(api, session, "update status", err).await),
        }
    }

    /// Delete a record, keeping the order of the rest.
    pub async fn delete<C: Collaborator>(
        &mut self,
        api: &C,
        session: &Session,
        id: &RecordId,
    ) -> Result<()> {
        self.check_mutable(session)?;
        let template = self.write_route(&self.config.routes.delete, "deleting")?;
        let path = resolve_path(&template, Some(id), session)?;

        let outcome = match self.require_local(id) {
            Ok(()) => {
                self.send_write(api, session, WriteMethod::Delete, &path, None)
                    .await
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok(_) => {
                self.records.retain(|r| r.id() != id);
                self.mutation_succeeded("Item deleted successfully".to_string());
                Ok(())
            }
            Err(err) => Err(self.mutation_failed(api, session, "delete item", err).await),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn same_id(value: &Value, id: &RecordId) -> bool {
    match value {
        Value::String(s) => s.trim() == id.as_str(),
        Value::Number(n) => n.to_string() == id.as_str(),
        _ => false,
    }
}
