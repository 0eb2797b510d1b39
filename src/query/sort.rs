//! Sort comparator for list records.
//!
//! Values that read as numbers compare numerically and sort ahead of text
//! values, which compare case-insensitively. Records missing the value always
//! sort last.

use std::borrow::Borrow;
use std::cmp::Ordering;

use unicase::UniCase;

use crate::record::Record;

/// Field a list is ordered by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortField {
    /// The view's creation timestamp field.
    Created,
    /// The view's price field.
    Price,
    /// Any dotted attribute path.
    Path(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

/// Field plus direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: Direction,
}

impl Default for SortKey {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: SortField::Created,
            direction: Direction::Descending,
        }
    }
}

impl SortKey {
    pub fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }

    pub fn ascending(path: impl Into<String>) -> Self {
        Self::new(SortField::Path(path.into()), Direction::Ascending)
    }

    pub fn descending(path: impl Into<String>) -> Self {
        Self::new(SortField::Path(path.into()), Direction::Descending)
    }
}

/// Named sort choices offered by the list screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPreset {
    #[default]
    Default,
    DateLatest,
    DateOldest,
    PriceLow,
    PriceHigh,
}

impl SortPreset {
    /// All valid string representations of this enum.
    pub const ALL_STRINGS: &[&str] = &[
        "default",
        "date-latest",
        "date-oldest",
        "price-low",
        "price-high",
    ];

    pub fn key(self) -> SortKey {
        match self {
            SortPreset::Default | SortPreset::DateLatest => SortKey::default(),
            SortPreset::DateOldest => SortKey::new(SortField::Created, Direction::Ascending),
            SortPreset::PriceLow => SortKey::new(SortField::Price, Direction::Ascending),
            SortPreset::PriceHigh => SortKey::new(SortField::Price, Direction::Descending),
        }
    }
}

enum_display_fromstr!(SortPreset, crate::error::RentalError::invalid_sort, {
    Default => "default",
    DateLatest => "date-latest",
    DateOldest => "date-oldest",
    PriceLow => "price-low",
    PriceHigh => "price-high",
});

/// Concrete attribute paths behind [`SortField::Created`] and [`SortField::Price`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortFields {
    pub created: String,
    pub price: Option<String>,
}

impl Default for SortFields {
    fn default() -> Self {
        Self {
            created: "createdAt".to_string(),
            price: None,
        }
    }
}

impl SortFields {
    fn path<'a>(&'a self, field: &'a SortField) -> Option<&'a str> {
        match field {
            SortField::Created => Some(self.created.as_str()),
            SortField::Price => self.price.as_deref(),
            SortField::Path(p) => Some(p.as_str()),
        }
    }
}

enum SortValue {
    Number(f64),
    Text(String),
}

fn sort_value(record: &Record, field: &SortField, fields: &SortFields) -> Option<SortValue> {
    let path = fields.path(field)?;
    if matches!(field, SortField::Created)
        && let Some(ts) = record.timestamp(path)
    {
        return Some(SortValue::Number(ts.as_millisecond() as f64));
    }
    if let Some(n) = record.number(path) {
        return Some(SortValue::Number(n));
    }
    record.text(path).map(SortValue::Text)
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Number(_) => 0,
            SortValue::Text(_) => 1,
        }
    }
}

fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    match (a, b) {
        (SortValue::Number(x), SortValue::Number(y)) => x.total_cmp(y),
        (SortValue::Text(x), SortValue::Text(y)) => UniCase::new(x.as_str())
            .cmp(&UniCase::new(y.as_str()))
            .then_with(|| x.cmp(y)),
        _ => a.rank().cmp(&b.rank()),
    }
}

/// Compare two records under `key`.
///
/// Numbers come before text and missing values go last, in both directions.
/// The direction only reverses the order within a kind.
pub fn compare(a: &Record, b: &Record, key: &SortKey, fields: &SortFields) -> Ordering {
    let va = sort_value(a, &key.field, fields);
    let vb = sort_value(b, &key.field, fields);
    match (va, vb) {
        (Some(x), Some(y)) => x.rank().cmp(&y.rank()).then_with(|| {
            let ord = compare_values(&x, &y);
            match key.direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        }),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort. Works on owned records and on borrowed ones.
pub fn sort_records<R: Borrow<Record>>(records: &mut [R], key: &SortKey, fields: &SortFields) {
    records.sort_by(|a, b| compare(a.borrow(), b.borrow(), key, fields));
}
