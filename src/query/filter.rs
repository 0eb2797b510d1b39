//! Filter predicates for list records.
//!
//! Each active criterion becomes a [`RecordFilter`]; a record is kept when every
//! filter matches. Inactive criteria (blank text, `all` selectors, no range)
//! produce no filter at all, so an empty [`Criteria`] keeps every record.

use jiff::Timestamp;
use unicase::UniCase;

use crate::error::{RentalError, Result};
use crate::record::Record;

/// Selector value meaning "no restriction".
pub const ALL: &str = "all";

fn fold(s: &str) -> String {
    UniCase::new(s).to_folded_case()
}

fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    fold(haystack).contains(&fold(needle))
}

fn eq_case_insensitive(a: &str, b: &str) -> bool {
    UniCase::new(a) == UniCase::new(b)
}

fn selector_active(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !eq_case_insensitive(key, ALL)
}

/// Inclusive instant range. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl DateRange {
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start.is_none_or(|start| ts >= start) && self.end.is_none_or(|end| ts <= end)
    }
}

/// Inclusive price range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }
}

/// User-supplied filter state for one list view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Criteria {
    pub query: String,
    pub category: String,
    pub status: String,
    pub date_range: Option<DateRange>,
    pub price_range: Option<PriceRange>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    /// True when no criterion restricts the list.
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && !selector_active(&self.category)
            && !selector_active(&self.status)
            && self.date_range.is_none_or(|r| r.is_unbounded())
            && self.price_range.is_none_or(|r| r.is_unbounded())
    }
}

/// A predicate a named selector option applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Equals { field: String, value: String },
    NotEquals { field: String, value: String },
}

impl Rule {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Rule::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn not_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Rule::NotEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// An absent attribute never equals anything.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Rule::Equals { field, value } => record
                .text(field)
                .is_some_and(|v| eq_case_insensitive(&v, value)),
            Rule::NotEquals { field, value } => !record
                .text(field)
                .is_some_and(|v| eq_case_insensitive(&v, value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    pub key: String,
    pub rule: Rule,
}

/// Category or status dropdown of a view.
///
/// Declared options win over plain field equality. A selector with neither a
/// field nor a matching option rejects the key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub field: Option<String>,
    pub options: Vec<SelectorOption>,
}

impl Selector {
    /// A selector that accepts nothing but `all`.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, rule: Rule) -> Self {
        self.options.push(SelectorOption {
            key: key.into(),
            rule,
        });
        self
    }

    fn option(&self, key: &str) -> Option<&SelectorOption> {
        self.options
            .iter()
            .find(|o| eq_case_insensitive(&o.key, key))
    }

    pub fn option_keys(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.key.as_str())
    }

    /// Check that `key` is usable; `label` names the selector in the error.
    pub fn validate(&self, label: &str, key: &str) -> Result<()> {
        let key = key.trim();
        if !selector_active(key) || self.option(key).is_some() || self.field.is_some() {
            return Ok(());
        }
        let mut expected: Vec<&str> = vec![ALL];
        expected.extend(self.option_keys());
        Err(RentalError::Validation(format!(
            "unknown {label} '{key}', expected one of: {}",
            expected.join(", ")
        )))
    }

    pub fn matches(&self, record: &Record, key: &str) -> bool {
        let key = key.trim();
        if !selector_active(key) {
            return true;
        }
        if let Some(option) = self.option(key) {
            return option.rule.matches(record);
        }
        match &self.field {
            Some(field) => record
                .text(field)
                .is_some_and(|v| eq_case_insensitive(&v, key)),
            None => false,
        }
    }
}

/// Per-view filter configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub search_fields: Vec<String>,
    pub category: Selector,
    pub status: Selector,
    pub date_field: String,
    pub date_filter_enabled: bool,
    pub price_field: Option<String>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search_fields: Vec::new(),
            category: Selector::none(),
            status: Selector::none(),
            date_field: "createdAt".to_string(),
            date_filter_enabled: false,
            price_field: None,
        }
    }
}

impl FilterSpec {
    /// Reject criteria this view cannot apply.
    pub fn validate(&self, criteria: &Criteria) -> Result<()> {
        self.category.validate("category", &criteria.category)?;
        self.status.validate("status", &criteria.status)?;

        if let Some(range) = criteria.date_range
            && !range.is_unbounded()
        {
            if !self.date_filter_enabled {
                return Err(RentalError::Validation(
                    "this view does not support date filtering".to_string(),
                ));
            }
            if let (Some(start), Some(end)) = (range.start, range.end)
                && start > end
            {
                return Err(RentalError::Validation(
                    "date range start is after its end".to_string(),
                ));
            }
        }

        if let Some(range) = criteria.price_range
            && !range.is_unbounded()
        {
            if self.price_field.is_none() {
                return Err(RentalError::Validation(
                    "this view does not support price filtering".to_string(),
                ));
            }
            if [range.min, range.max].into_iter().flatten().any(|v| !v.is_finite()) {
                return Err(RentalError::Validation(
                    "price bounds must be finite numbers".to_string(),
                ));
            }
            if let (Some(min), Some(max)) = (range.min, range.max)
                && min > max
            {
                return Err(RentalError::Validation(format!(
                    "minimum price {min} is greater than maximum price {max}"
                )));
            }
        }

        Ok(())
    }
}

/// Trait for record filters
pub trait RecordFilter: Send + Sync {
    fn matches(&self, record: &Record) -> bool;
}

/// Case-insensitive substring search over a set of text fields
pub struct TextFilter {
    needle: String,
    fields: Vec<String>,
}

impl TextFilter {
    pub fn new(query: &str, fields: &[String]) -> Self {
        Self {
            needle: query.trim().to_string(),
            fields: fields.to_vec(),
        }
    }
}

/// Searchable text of a record: one line per field, absent fields empty.
pub fn search_text(record: &Record, fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| record.text(f).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n")
}

impl RecordFilter for TextFilter {
    fn matches(&self, record: &Record) -> bool {
        let needle = fold(&self.needle);
        fold(&search_text(record, &self.fields))
            .split('\n')
            .any(|line| line.contains(&needle))
    }
}

/// Category or status dropdown
pub struct SelectorFilter {
    selector: Selector,
    key: String,
}

impl SelectorFilter {
    pub fn new(selector: &Selector, key: &str) -> Self {
        Self {
            selector: selector.clone(),
            key: key.trim().to_string(),
        }
    }
}

impl RecordFilter for SelectorFilter {
    fn matches(&self, record: &Record) -> bool {
        self.selector.matches(record, &self.key)
    }
}

/// Inclusive date window on a timestamp field
pub struct DateRangeFilter {
    field: String,
    range: DateRange,
}

impl DateRangeFilter {
    pub fn new(field: &str, range: DateRange) -> Self {
        Self {
            field: field.to_string(),
            range,
        }
    }
}

impl RecordFilter for DateRangeFilter {
    fn matches(&self, record: &Record) -> bool {
        record
            .timestamp(&self.field)
            .is_some_and(|ts| self.range.contains(ts))
    }
}

/// Inclusive price window on a numeric field
pub struct PriceRangeFilter {
    field: String,
    range: PriceRange,
}

impl PriceRangeFilter {
    pub fn new(field: &str, range: PriceRange) -> Self {
        Self {
            field: field.to_string(),
            range,
        }
    }
}

impl RecordFilter for PriceRangeFilter {
    fn matches(&self, record: &Record) -> bool {
        record
            .number(&self.field)
            .is_some_and(|price| self.range.contains(price))
    }
}

/// Build one filter per active criterion. Does not validate.
pub fn build_filters(criteria: &Criteria, spec: &FilterSpec) -> Vec<Box<dyn RecordFilter>> {
    let mut filters: Vec<Box<dyn RecordFilter>> = Vec::new();

    if !criteria.query.trim().is_empty() {
        filters.push(Box::new(TextFilter::new(
            &criteria.query,
            &spec.search_fields,
        )));
    }
    if selector_active(&criteria.category) {
        filters.push(Box::new(SelectorFilter::new(
            &spec.category,
            &criteria.category,
        )));
    }
    if selector_active(&criteria.status) {
        filters.push(Box::new(SelectorFilter::new(&spec.status, &criteria.status)));
    }
    if let Some(range) = criteria.date_range
        && !range.is_unbounded()
    {
        filters.push(Box::new(DateRangeFilter::new(&spec.date_field, range)));
    }
    if let Some(range) = criteria.price_range
        && !range.is_unbounded()
    {
        match &spec.price_field {
            Some(field) => filters.push(Box::new(PriceRangeFilter::new(field, range))),
            None => filters.push(Box::new(RejectAll)),
        }
    }

    filters
}

/// Stands in for a price range on a view without prices.
struct RejectAll;

impl RecordFilter for RejectAll {
    fn matches(&self, _record: &Record) -> bool {
        false
    }
}

/// Test one record against every active criterion.
pub fn matches(record: &Record, criteria: &Criteria, spec: &FilterSpec) -> bool {
    build_filters(criteria, spec)
        .iter()
        .all(|f| f.matches(record))
}

/// Keep the records matching `criteria`, in input order.
pub fn filter_records<'a>(
    records: &'a [Record],
    criteria: &Criteria,
    spec: &FilterSpec,
) -> Vec<&'a Record> {
    let filters = build_filters(criteria, spec);
    records
        .iter()
        .filter(|r| filters.iter().all(|f| f.matches(r)))
        .collect()
}
