//! Query pipeline for list records: filter, then sort, then paginate.
//!
//! [`RecordQuery`] bundles the filters and sort key of one view so the list can
//! be re-derived without touching the network.

pub mod filter;
pub mod paginate;
pub mod sort;

pub use filter::{
    Criteria, DateRange, FilterSpec, PriceRange, RecordFilter, Rule, Selector, SelectorOption,
    filter_records, matches,
};
pub use paginate::{Page, PageState, paginate, total_pages};
pub use sort::{Direction, SortField, SortFields, SortKey, SortPreset, compare, sort_records};

use crate::error::Result;
use crate::record::Record;

/// A built query that can be applied to a record list.
pub struct RecordQuery {
    filters: Vec<Box<dyn RecordFilter>>,
    sort: Option<(SortKey, SortFields)>,
}

impl RecordQuery {
    /// Records passing every filter, sorted, as borrows into `records`.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let mut filtered: Vec<&Record> = records
            .iter()
            .filter(|r| self.filters.iter().all(|f| f.matches(r)))
            .collect();

        if let Some((key, fields)) = &self.sort {
            sort_records(&mut filtered, key, fields);
        }

        filtered
    }
}

/// Query builder for filtering and sorting records
pub struct RecordQueryBuilder {
    filters: Vec<Box<dyn RecordFilter>>,
    sort: Option<(SortKey, SortFields)>,
}

impl RecordQueryBuilder {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            sort: None,
        }
    }

    /// Add a filter to the query (AND composition)
    pub fn with_filter(mut self, filter: Box<dyn RecordFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Validate `criteria` against `spec` and add a filter per active criterion
    pub fn with_criteria(mut self, criteria: &Criteria, spec: &FilterSpec) -> Result<Self> {
        spec.validate(criteria)?;
        self.filters.extend(filter::build_filters(criteria, spec));
        Ok(self)
    }

    pub fn with_sort(mut self, key: SortKey, fields: SortFields) -> Self {
        self.sort = Some((key, fields));
        self
    }

    pub fn build(self) -> RecordQuery {
        RecordQuery {
            filters: self.filters,
            sort: self.sort,
        }
    }
}

impl Default for RecordQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
