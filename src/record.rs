use chrono::{DateTime, FixedOffset};

pub const STATUS_COMPLETED: &str = "COMPLETED";
pub const STATUS_CANCELED: &str = "CANCELED";

/// One normalized row of a ride-history export.
#[derive(Debug, Clone, PartialEq)]
pub struct RideRecord {
    pub begin_time: DateTime<FixedOffset>,
    pub dropoff_time: DateTime<FixedOffset>,

    /// Zero when the drop-off precedes the begin time.
    pub duration_seconds: i64,

    pub fare_amount: f64,
    pub distance: f64,
    pub status: String,
    pub city: String,
    pub product_type: String,
}

impl RideRecord {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }

    pub fn is_canceled(&self) -> bool {
        self.status == STATUS_CANCELED
    }
}
