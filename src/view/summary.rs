//! Totals shown above the transaction tables.

use serde::Serialize;
use unicase::UniCase;

use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
}

/// Sum `amount_field` over every record, split by `status_field`.
///
/// Missing or unreadable amounts count as 0.
pub fn summarize(records: &[Record], amount_field: &str, status_field: &str) -> Summary {
    let paid = UniCase::new("paid");
    let pending = UniCase::new("pending");

    records.iter().fold(Summary::default(), |mut acc, record| {
        let amount = record.number(amount_field).unwrap_or(0.0);
        acc.count += 1;
        acc.total += amount;
        match record.text(status_field) {
            Some(status) if UniCase::new(status.as_str()) == paid => acc.paid += amount,
            Some(status) if UniCase::new(status.as_str()) == pending => acc.pending += amount,
            _ => {}
        }
        acc
    })
}
