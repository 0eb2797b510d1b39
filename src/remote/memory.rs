//! In-memory collaborator for tests and offline demos.
//!
//! Records live in named tables. Routes map an endpoint prefix to a table:
//! `GET prefix` lists it, `POST prefix` appends, `PUT prefix/<id>` merges and
//! `DELETE prefix/<id>` removes. Several prefixes may share one table, the way
//! `api/lost-and-found/edit` and `api/lost-and-found/resolve` both touch the
//! lost-and-found reports.

use std::collections::{HashMap, VecDeque};
use std::future::{Future, ready};
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{RentalError, Result};
use crate::record::{ID_FIELD, Record, RecordId};
use crate::session::Session;

use super::{Collaborator, WriteMethod, WriteOutcome};

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Record>>,
    routes: Vec<(String, String)>,
    failures: VecDeque<RentalError>,
    acknowledge_only: bool,
    fetch_count: usize,
    writes: Vec<(WriteMethod, String)>,
}

enum Target<'a> {
    Collection(&'a str),
    Item(&'a str, RecordId),
}

impl MemoryState {
    fn route<'a>(&'a self, path: &str) -> Option<Target<'a>> {
        let path = path.trim_matches('/');
        let mut best: Option<(&'a str, Target<'a>)> = None;
        for (prefix, table) in &self.routes {
            let target = if path == prefix.as_str() {
                Target::Collection(table.as_str())
            } else if let Some(rest) = path.strip_prefix(prefix.as_str())
                && let Some(id) = rest.strip_prefix('/')
                && !id.is_empty()
                && !id.contains('/')
            {
                Target::Item(table.as_str(), RecordId::new(id))
            } else {
                continue;
            };
            if best.as_ref().is_none_or(|(p, _)| prefix.len() > p.len()) {
                best = Some((prefix.as_str(), target));
            }
        }
        best.map(|(_, target)| target)
    }

    fn next_id(&self, table: &str) -> u64 {
        self.tables
            .get(table)
            .into_iter()
            .flatten()
            .filter_map(|r| r.id().as_str().parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1)
    }
}

/// Collaborator backed by in-process tables.
#[derive(Default)]
pub struct MemoryCollaborator {
    state: Mutex<MemoryState>,
}

impl MemoryCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` at `path`, which also becomes the write prefix.
    pub fn with_list(self, path: &str, records: Vec<Record>) -> Self {
        let path = path.trim_matches('/').to_string();
        if let Ok(mut state) = self.state.lock() {
            state.tables.insert(path.clone(), records);
            state.routes.push((path.clone(), path));
        }
        self
    }

    /// Route another endpoint prefix to the table served at `list_path`.
    pub fn with_route(self, prefix: &str, list_path: &str) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.routes.push((
                prefix.trim_matches('/').to_string(),
                list_path.trim_matches('/').to_string(),
            ));
        }
        self
    }

    /// Answer writes with bare acknowledgements instead of records.
    pub fn acknowledge_only(self) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.acknowledge_only = true;
        }
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| RentalError::Other("memory collaborator lock poisoned".to_string()))
    }

    /// Fail the next call, read or write, with `err`.
    pub fn fail_next(&self, err: RentalError) {
        if let Ok(mut state) = self.lock() {
            state.failures.push_back(err);
        }
    }

    /// Number of list fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.lock().map(|s| s.fetch_count).unwrap_or_default()
    }

    /// Writes received so far, as method and path.
    pub fn writes(&self) -> Vec<(WriteMethod, String)> {
        self.lock().map(|s| s.writes.clone()).unwrap_or_default()
    }

    /// Current contents of the table served at `list_path`.
    pub fn records(&self, list_path: &str) -> Vec<Record> {
        self.lock()
            .ok()
            .and_then(|s| s.tables.get(list_path.trim_matches('/')).cloned())
            .unwrap_or_default()
    }

    /// Remove a record behind the client's back.
    pub fn remove(&self, list_path: &str, id: &RecordId) -> bool {
        let Ok(mut state) = self.lock() else {
            return false;
        };
        match state.tables.get_mut(list_path.trim_matches('/')) {
            Some(table) => {
                let before = table.len();
                table.retain(|r| r.id() != id);
                table.len() != before
            }
            None => false,
        }
    }

    fn fetch_now(&self, path: &str) -> Result<Vec<Record>> {
        let mut state = self.lock()?;
        state.fetch_count += 1;
        if let Some(err) = state.failures.pop_front() {
            return Err(err);
        }
        let table = match state.route(path) {
            Some(Target::Collection(table)) => table.to_string(),
            _ => return Err(RentalError::NotFound(format!("no list at '{path}'"))),
        };
        debug!(path, "serving list from memory");
        Ok(state.tables.get(&table).cloned().unwrap_or_default())
    }

    fn write_now(
        &self,
        method: WriteMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<WriteOutcome> {
        let mut state = self.lock()?;
        state.writes.push((method, path.to_string()));
        if let Some(err) = state.failures.pop_front() {
            return Err(err);
        }

        let target = match state.route(path) {
            Some(Target::Collection(table)) => (table.to_string(), None),
            Some(Target::Item(table, id)) => (table.to_string(), Some(id)),
            None => return Err(RentalError::NotFound(format!("no endpoint at '{path}'"))),
        };
        let patch: Map<String, Value> = body
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let acknowledge_only = state.acknowledge_only;

        let outcome = match (method, target) {
            (WriteMethod::Post, (table, None)) => {
                let mut fields = patch;
                if !fields.contains_key(ID_FIELD) {
                    fields.insert(ID_FIELD.to_string(), Value::from(state.next_id(&table)));
                }
                let record = Record::from_map(fields)?;
                state
                    .tables
                    .entry(table)
                    .or_default()
                    .push(record.clone());
                record
            }
            (WriteMethod::Put, (table, Some(id))) => {
                let record = state
                    .tables
                    .get_mut(&table)
                    .and_then(|t| t.iter_mut().find(|r| r.id() == &id))
                    .ok_or_else(|| RentalError::NotFound(id.to_string()))?;
                record.merge(&patch);
                record.clone()
            }
            (WriteMethod::Delete, (table, Some(id))) => {
                let rows = state
                    .tables
                    .get_mut(&table)
                    .ok_or_else(|| RentalError::NotFound(id.to_string()))?;
                let position = rows
                    .iter()
                    .position(|r| r.id() == &id)
                    .ok_or_else(|| RentalError::NotFound(id.to_string()))?;
                rows.remove(position);
                return Ok(WriteOutcome::Ack {
                    message: Some("deleted".to_string()),
                });
            }
            _ => {
                return Err(RentalError::Status {
                    status: 405,
                    message: format!("{method} not allowed on '{path}'"),
                });
            }
        };

        if acknowledge_only {
            return Ok(WriteOutcome::Ack { message: None });
        }
        Ok(WriteOutcome::Record(outcome))
    }
}

impl Collaborator for MemoryCollaborator {
    fn fetch_list(
        &self,
        path: &str,
        _query: &[(String, String)],
        _session: &Session,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send {
        ready(self.fetch_now(path))
    }

    fn write(
        &self,
        method: WriteMethod,
        path: &str,
        body: Option<&Value>,
        _session: &Session,
    ) -> impl Future<Output = Result<WriteOutcome>> + Send {
        ready(self.write_now(method, path, body))
    }
}
