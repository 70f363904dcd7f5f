//! Analytics math: counter sums, percentage rates, and the daily activity window

use std::collections::HashMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days in the dashboard activity series
pub const ACTIVITY_WINDOW_DAYS: u32 = 7;

/// Delivery counters for one campaign, one day, or any aggregate of them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub sent: i64,
    pub delivered: i64,
    pub read: i64,
    pub replied: i64,
}

impl Counters {
    pub fn new(sent: i64, delivered: i64, read: i64, replied: i64) -> Self {
        Self {
            sent,
            delivered,
            read,
            replied,
        }
    }

    pub fn rates(&self) -> Rates {
        Rates {
            delivery_rate: rate(self.delivered, self.sent),
            open_rate: rate(self.read, self.sent),
            response_rate: rate(self.replied, self.sent),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl Add for Counters {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            sent: self.sent + rhs.sent,
            delivered: self.delivered + rhs.delivered,
            read: self.read + rhs.read,
            replied: self.replied + rhs.replied,
        }
    }
}

impl AddAssign for Counters {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Counters {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Percentage rates, one decimal
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rates {
    pub delivery_rate: f64,
    pub open_rate: f64,
    pub response_rate: f64,
}

/// `(numerator / denominator) * 100` rounded to one decimal; 0 when the denominator is not positive.
pub fn rate(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    let pct = numerator as f64 / denominator as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// One point of the activity series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub date: NaiveDate,
    pub sent: i64,
    pub delivered: i64,
    pub read: i64,
    pub replied: i64,
}

impl ActivityPoint {
    fn new(date: NaiveDate, c: Counters) -> Self {
        Self {
            date,
            sent: c.sent,
            delivered: c.delivered,
            read: c.read,
            replied: c.replied,
        }
    }
}

/// First day of a `days`-long window ending on `today` (inclusive).
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today - Duration::days(i64::from(days.max(1)) - 1)
}

/// Build the activity series for the `days` days ending on `today`, oldest first.
///
/// Buckets outside the window are ignored, repeated dates are summed, and
/// days without a bucket are zero.
pub fn fill_activity<I>(today: NaiveDate, days: u32, buckets: I) -> Vec<ActivityPoint>
where
    I: IntoIterator<Item = (NaiveDate, Counters)>,
{
    let start = window_start(today, days);

    let mut by_day: HashMap<NaiveDate, Counters> = HashMap::new();
    for (date, counters) in buckets {
        if date >= start && date <= today {
            *by_day.entry(date).or_default() += counters;
        }
    }

    start
        .iter_days()
        .take(days.max(1) as usize)
        .map(|date| ActivityPoint::new(date, by_day.get(&date).copied().unwrap_or_default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn zero_sent_gives_zero_rates() {
        let rates = Counters::new(0, 5, 3, 1).rates();
        assert_eq!(rates, Rates::default());
    }

    #[test]
    fn delivery_rate_94() {
        let rates = Counters::new(100, 94, 0, 0).rates();
        assert_eq!(rates.delivery_rate, 94.0);
        assert_eq!(rates.open_rate, 0.0);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(rate(1, 3), 33.3);
        assert_eq!(rate(2, 3), 66.7);
        assert_eq!(rate(1, 8), 12.5);
        assert_eq!(rate(0, 7), 0.0);
        assert_eq!(rate(5, -1), 0.0);
    }

    #[test]
    fn sums_counters() {
        let total: Counters = [Counters::new(10, 9, 5, 1), Counters::new(90, 85, 40, 4)]
            .into_iter()
            .sum();
        assert_eq!(total, Counters::new(100, 94, 45, 5));
        assert_eq!(total.rates().response_rate, 5.0);
    }

    #[test]
    fn window_has_seven_points_oldest_first() {
        let series = fill_activity(day("2024-03-10"), ACTIVITY_WINDOW_DAYS, Vec::new());
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, day("2024-03-04"));
        assert_eq!(series[6].date, day("2024-03-10"));
        assert!(series.iter().all(|p| p.sent == 0 && p.read == 0));
    }

    #[test]
    fn buckets_are_placed_and_summed() {
        let buckets = vec![
            (day("2024-03-09"), Counters::new(10, 8, 4, 1)),
            (day("2024-03-09"), Counters::new(5, 5, 1, 0)),
            (day("2024-03-04"), Counters::new(1, 1, 1, 1)),
            // outside the window
            (day("2024-03-03"), Counters::new(99, 99, 99, 99)),
            (day("2024-03-11"), Counters::new(99, 99, 99, 99)),
        ];
        let series = fill_activity(day("2024-03-10"), 7, buckets);

        assert_eq!(series[0].sent, 1);
        assert_eq!(series[5].date, day("2024-03-09"));
        assert_eq!(series[5].sent, 15);
        assert_eq!(series[5].delivered, 13);
        assert_eq!(series[6].sent, 0);
        let total: i64 = series.iter().map(|p| p.sent).sum();
        assert_eq!(total, 16);
    }

    #[test]
    fn crosses_month_boundary() {
        let series = fill_activity(day("2024-03-02"), 7, Vec::new());
        assert_eq!(series[0].date, day("2024-02-25"));
    }

    #[test]
    fn date_serializes_as_iso_day() {
        let point = ActivityPoint::new(day("2024-03-09"), Counters::default());
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["date"], "2024-03-09");
    }
}
