use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive date range chosen by the user; either bound may be unset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    /// A range only filters when both bounds are set
    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }
}

/// Format a timestamp as the UTC calendar date, `YYYY-MM-DD`.
/// The time component is discarded.
pub fn format_utc_date(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}
