//! Report rendering for ride statistics.
//!
//! The report is plain text for stdout. The same figures can be logged as
//! JSON at debug level.

use std::fmt::{self, Display};

use anyhow::Result;
use tracing::debug;

use crate::record::RideRecord;
use crate::stats::{RideStats, RideSummary};

pub const NO_DATA_MESSAGE: &str = "No data to process.";

/// A summary paired with the unit label of its distance total.
pub struct Report<'a> {
    summary: &'a RideSummary,
    distance_unit: &'a str,
}

impl<'a> Report<'a> {
    pub fn new(summary: &'a RideSummary, distance_unit: &'a str) -> Self {
        Self {
            summary,
            distance_unit,
        }
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;

        writeln!(f, "Total Money Spent: {:.2}", s.total_money_spent)?;
        writeln!(f, "Total Rides: {}", s.rides.total)?;
        writeln!(f, "  Completed: {}", s.rides.completed)?;
        writeln!(f, "  Canceled: {}", s.rides.canceled)?;

        write_groups(f, "Total Rides per Year", &s.rides_per_year)?;
        write_groups(f, "Total Rides per City", &s.rides_per_city)?;
        write_groups(f, "Total Rides per Month", &s.rides_per_month)?;

        writeln!(
            f,
            "Total Distance ({}): {:.2}",
            self.distance_unit, s.total_distance
        )?;

        write_groups(f, "Rides per Product", &s.rides_per_product)?;

        let t = &s.time_spent;
        writeln!(
            f,
            "Total Time Spent in Rides: {} seconds, {:.2} minutes, {:.2} hours, {:.2} days",
            t.seconds, t.minutes, t.hours, t.days
        )?;
        writeln!(
            f,
            "Shortest Ride (minutes): {}",
            minutes_or_no_data(s.shortest_ride_seconds)
        )?;
        writeln!(
            f,
            "Longest Ride (minutes): {}",
            minutes_or_no_data(s.longest_ride_seconds)
        )
    }
}

/// Renders the full report for a loaded record set.
pub fn generate_report(rides: &[RideRecord], distance_unit: &str) -> String {
    let summary = RideStats::new(rides).summary();
    format_summary(&summary, distance_unit)
}

/// Renders the report, or a single "no data" line when nothing was loaded.
pub fn render_report(rides: Option<&[RideRecord]>, distance_unit: &str) -> String {
    match rides {
        Some(rides) => generate_report(rides, distance_unit),
        None => format!("{NO_DATA_MESSAGE}\n"),
    }
}

/// Writes the report for an already computed summary to stdout.
pub fn print_report(summary: Option<&RideSummary>, distance_unit: &str) {
    match summary {
        Some(summary) => print!("{}", Report::new(summary, distance_unit)),
        None => println!("{NO_DATA_MESSAGE}"),
    }
}

/// Logs a summary as pretty-printed JSON.
pub fn print_json(summary: &RideSummary) -> Result<()> {
    debug!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Formats a summary in report order.
pub fn format_summary(summary: &RideSummary, distance_unit: &str) -> String {
    Report::new(summary, distance_unit).to_string()
}

fn write_groups<K: Display>(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    groups: &[(K, usize)],
) -> fmt::Result {
    writeln!(f, "{title}:")?;
    if groups.is_empty() {
        writeln!(f, "  (none)")?;
    }
    for (key, count) in groups {
        writeln!(f, "  {key}: {count}")?;
    }
    Ok(())
}

fn minutes_or_no_data(seconds: Option<i64>) -> String {
    match seconds {
        Some(seconds) => format!("{:.2}", seconds as f64 / 60.0),
        None => "no data".to_string(),
    }
}
