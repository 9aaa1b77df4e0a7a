use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::Datelike;
use serde::Serialize;

use crate::record::RideRecord;

/// Ride counts by terminal status. Other statuses only count towards `total`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RideCounts {
    pub total: usize,
    pub completed: usize,
    pub canceled: usize,
}

/// Total ride time in several units, each derived from `seconds`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSpent {
    pub seconds: f64,
    pub minutes: f64,
    pub hours: f64,
    pub days: f64,
}

impl TimeSpent {
    pub fn from_seconds(seconds: i64) -> Self {
        let seconds = seconds as f64;
        let minutes = seconds / 60.0;
        let hours = minutes / 60.0;
        let days = hours / 24.0;
        Self {
            seconds,
            minutes,
            hours,
            days,
        }
    }
}

/// Calendar month of a ride's begin time, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Every aggregate in report order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideSummary {
    pub total_money_spent: f64,
    pub rides: RideCounts,
    pub rides_per_year: Vec<(i32, usize)>,
    pub rides_per_city: Vec<(String, usize)>,
    pub rides_per_month: Vec<(YearMonth, usize)>,
    pub total_distance: f64,
    pub rides_per_product: Vec<(String, usize)>,
    pub time_spent: TimeSpent,
    pub shortest_ride_seconds: Option<i64>,
    pub longest_ride_seconds: Option<i64>,
}

/// Read-only queries over a loaded set of rides.
#[derive(Debug, Clone, Copy)]
pub struct RideStats<'a> {
    rides: &'a [RideRecord],
}

impl<'a> RideStats<'a> {
    pub fn new(rides: &'a [RideRecord]) -> Self {
        Self { rides }
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    pub fn total_money_spent(&self) -> f64 {
        self.rides.iter().map(|r| r.fare_amount).sum()
    }

    pub fn total_rides(&self) -> RideCounts {
        let mut counts = RideCounts {
            total: self.rides.len(),
            ..Default::default()
        };

        for ride in self.rides {
            if ride.is_completed() {
                counts.completed += 1;
            } else if ride.is_canceled() {
                counts.canceled += 1;
            }
        }

        counts
    }

    /// Ride count per calendar year of the begin time, oldest first.
    pub fn rides_per_year(&self) -> Vec<(i32, usize)> {
        let mut years: BTreeMap<i32, usize> = BTreeMap::new();
        for ride in self.rides {
            *years.entry(ride.begin_time.year()).or_default() += 1;
        }
        years.into_iter().collect()
    }

    /// Ride count per city, most rides first.
    pub fn rides_per_city(&self) -> Vec<(String, usize)> {
        count_descending(self.rides.iter().map(|r| r.city.as_str()))
    }

    /// Ride count per calendar month of the begin time, oldest first.
    pub fn rides_per_month(&self) -> Vec<(YearMonth, usize)> {
        let mut months: BTreeMap<YearMonth, usize> = BTreeMap::new();
        for ride in self.rides {
            let key = YearMonth {
                year: ride.begin_time.year(),
                month: ride.begin_time.month(),
            };
            *months.entry(key).or_default() += 1;
        }
        months.into_iter().collect()
    }

    pub fn total_distance(&self) -> f64 {
        self.rides.iter().map(|r| r.distance).sum()
    }

    /// Ride count per product type, most rides first.
    pub fn rides_per_product(&self) -> Vec<(String, usize)> {
        count_descending(self.rides.iter().map(|r| r.product_type.as_str()))
    }

    pub fn total_time_spent(&self) -> TimeSpent {
        TimeSpent::from_seconds(self.rides.iter().map(|r| r.duration_seconds).sum())
    }

    /// Shortest duration in seconds, ignoring zero-duration rides.
    pub fn shortest_ride(&self) -> Option<i64> {
        self.rides
            .iter()
            .map(|r| r.duration_seconds)
            .filter(|&d| d != 0)
            .min()
    }

    /// Longest duration in seconds. Zero-duration rides are considered here.
    pub fn longest_ride(&self) -> Option<i64> {
        self.rides.iter().map(|r| r.duration_seconds).max()
    }

    pub fn summary(&self) -> RideSummary {
        RideSummary {
            total_money_spent: self.total_money_spent(),
            rides: self.total_rides(),
            rides_per_year: self.rides_per_year(),
            rides_per_city: self.rides_per_city(),
            rides_per_month: self.rides_per_month(),
            total_distance: self.total_distance(),
            rides_per_product: self.rides_per_product(),
            time_spent: self.total_time_spent(),
            shortest_ride_seconds: self.shortest_ride(),
            longest_ride_seconds: self.longest_ride(),
        }
    }
}

/// Counts keys and orders them by count descending, then key ascending.
fn count_descending<'k>(keys: impl Iterator<Item = &'k str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, n)| (k.to_string(), n))
        .collect();
    counts.sort_by(|(ka, na), (kb, nb)| nb.cmp(na).then_with(|| ka.cmp(kb)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_timestamp, ride_duration};

    fn ride(begin: &str, end: &str, fare: f64, status: &str, city: &str) -> RideRecord {
        let begin_time = parse_timestamp(begin).unwrap();
        let dropoff_time = parse_timestamp(end).unwrap();
        RideRecord {
            duration_seconds: ride_duration(&begin_time, &dropoff_time),
            begin_time,
            dropoff_time,
            fare_amount: fare,
            distance: fare / 2.0,
            status: status.to_string(),
            city: city.to_string(),
            product_type: "UberX".to_string(),
        }
    }

    fn three_rides() -> Vec<RideRecord> {
        vec![
            ride(
                "2019-01-05 10:00:00 +0000 UTC",
                "2019-01-05 10:02:00 +0000 UTC",
                10.0,
                "COMPLETED",
                "A",
            ),
            ride(
                "2019-01-06 10:05:00 +0000 UTC",
                "2019-01-06 10:00:00 +0000 UTC",
                20.0,
                "CANCELED",
                "B",
            ),
            ride(
                "2020-03-01 08:00:00 +0000 UTC",
                "2020-03-01 08:05:00 +0000 UTC",
                5.0,
                "COMPLETED",
                "A",
            ),
        ]
    }

    #[test]
    fn test_three_ride_scenario() {
        let rides = three_rides();
        let stats = RideStats::new(&rides);

        assert_eq!(stats.total_money_spent(), 35.0);
        assert_eq!(
            stats.total_rides(),
            RideCounts {
                total: 3,
                completed: 2,
                canceled: 1
            }
        );
        assert_eq!(
            stats.rides_per_city(),
            vec![("A".to_string(), 2), ("B".to_string(), 1)]
        );
        assert_eq!(stats.shortest_ride(), Some(120));
        assert_eq!(stats.longest_ride(), Some(300));
    }

    #[test]
    fn test_other_statuses_only_count_towards_total() {
        let mut rides = three_rides();
        rides[0].status = "DRIVER_CANCELED".to_string();
        let counts = RideStats::new(&rides).total_rides();

        assert_eq!(counts.total, 3);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.canceled, 1);
    }

    #[test]
    fn test_rides_per_year_and_month_are_chronological() {
        let rides = three_rides();
        let stats = RideStats::new(&rides);

        assert_eq!(stats.rides_per_year(), vec![(2019, 2), (2020, 1)]);
        assert_eq!(
            stats.rides_per_month(),
            vec![
                (YearMonth { year: 2019, month: 1 }, 2),
                (YearMonth { year: 2020, month: 3 }, 1),
            ]
        );
    }

    #[test]
    fn test_grouped_counts_sum_to_total() {
        let rides = three_rides();
        let stats = RideStats::new(&rides);
        let total = stats.total_rides().total;

        let sum = |groups: Vec<usize>| groups.into_iter().sum::<usize>();
        assert_eq!(sum(stats.rides_per_year().into_iter().map(|g| g.1).collect()), total);
        assert_eq!(sum(stats.rides_per_city().into_iter().map(|g| g.1).collect()), total);
        assert_eq!(sum(stats.rides_per_month().into_iter().map(|g| g.1).collect()), total);
        assert_eq!(sum(stats.rides_per_product().into_iter().map(|g| g.1).collect()), total);
    }

    #[test]
    fn test_ties_break_by_key() {
        let mut rides = three_rides();
        rides[2].city = "C".to_string();
        rides[0].city = "Z".to_string();

        assert_eq!(
            RideStats::new(&rides).rides_per_city(),
            vec![
                ("B".to_string(), 1),
                ("C".to_string(), 1),
                ("Z".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_time_spent_conversions() {
        let rides = three_rides();
        let spent = RideStats::new(&rides).total_time_spent();

        assert_eq!(spent.seconds, 420.0);
        assert_eq!(spent.minutes, spent.seconds / 60.0);
        assert_eq!(spent.hours, spent.minutes / 60.0);
        assert_eq!(spent.days, spent.hours / 24.0);
    }

    #[test]
    fn test_total_distance() {
        let rides = three_rides();
        assert_eq!(RideStats::new(&rides).total_distance(), 17.5);
    }

    #[test]
    fn test_zero_duration_only_excluded_from_shortest() {
        let rides = vec![three_rides().remove(1)];
        let stats = RideStats::new(&rides);

        assert_eq!(stats.shortest_ride(), None);
        assert_eq!(stats.longest_ride(), Some(0));
    }

    #[test]
    fn test_empty_set() {
        let stats = RideStats::new(&[]);

        assert!(stats.is_empty());
        assert_eq!(stats.total_money_spent(), 0.0);
        assert_eq!(stats.total_rides(), RideCounts::default());
        assert!(stats.rides_per_year().is_empty());
        assert!(stats.rides_per_city().is_empty());
        assert!(stats.rides_per_month().is_empty());
        assert!(stats.rides_per_product().is_empty());
        assert_eq!(stats.total_time_spent(), TimeSpent::default());
        assert_eq!(stats.shortest_ride(), None);
        assert_eq!(stats.longest_ride(), None);
    }

    #[test]
    fn test_summary_matches_queries() {
        let rides = three_rides();
        let stats = RideStats::new(&rides);
        let summary = stats.summary();

        assert_eq!(summary.rides, stats.total_rides());
        assert_eq!(summary.rides_per_city, stats.rides_per_city());
        assert_eq!(summary.shortest_ride_seconds, Some(120));
        assert_eq!(summary.longest_ride_seconds, Some(300));
    }

    #[test]
    fn test_year_month_display() {
        assert_eq!(YearMonth { year: 2019, month: 3 }.to_string(), "2019-03");
    }
}
