//! Hourly temperature series rebuilt from the forecast samples.
//!
//! The forecast endpoint only gives a reading every three hours or so, while
//! the chart wants one value per hour. Every hour of the selected day gets a
//! slot, and slots without a reading carry the last known temperature forward.

use std::{collections::HashMap, fmt};

use time::{Date, Duration, OffsetDateTime, Time};

pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// One forecast reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSample {
    /// Unix timestamp, in seconds.
    pub timestamp: i64,
    /// Temperature in °C.
    pub temperature: f64,
}

impl ForecastSample {
    pub fn new(timestamp: i64, temperature: f64) -> Self {
        Self {
            timestamp,
            temperature,
        }
    }
}

/// The displayed day, counted from today. Never goes past [`DayOffset::HORIZON`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayOffset(u8);

impl DayOffset {
    pub const TODAY: Self = Self(0);
    /// Last day the forecast reliably covers.
    pub const HORIZON: Self = Self(2);

    pub fn new(days: u8) -> Self {
        Self(days.min(Self::HORIZON.0))
    }

    pub fn days(self) -> u8 {
        self.0
    }

    pub fn is_today(self) -> bool {
        self == Self::TODAY
    }

    pub fn is_horizon(self) -> bool {
        self == Self::HORIZON
    }

    pub fn previous(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    pub fn next(self) -> Self {
        Self::new(self.0 + 1)
    }
}

/// The `[start, end)` unix range of one local day.
///
/// The offset of `now` is kept for the whole range, so on a day where the
/// local offset changes (DST) the window is off by the size of that change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: Date,
    pub start: i64,
    pub end: i64,
}

impl DayWindow {
    /// Local midnight of `now + day`, where "local" is the offset carried by `now`.
    pub fn new(now: OffsetDateTime, day: DayOffset) -> Self {
        let today = now.replace_time(Time::MIDNIGHT);
        let midnight = today
            .checked_add(Duration::days(i64::from(day.days())))
            .unwrap_or(today);
        let start = midnight.unix_timestamp();

        Self {
            date: midnight.date(),
            start,
            end: start + SECONDS_PER_DAY,
        }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        (self.start..self.end).contains(&timestamp)
    }

    pub fn is_covered(&self, samples: &[ForecastSample]) -> bool {
        samples.iter().any(|sample| self.contains(sample.timestamp))
    }
}

/// Hour of the first slot: elapsed hours of today are not displayed.
pub fn first_slot_hour(now: OffsetDateTime, day: DayOffset) -> u8 {
    if day.is_today() {
        now.hour()
    } else {
        0
    }
}

/// Walks forward from `selected` until a day has at least one sample, stopping at the horizon.
pub fn resolve_covered_day(
    samples: &[ForecastSample],
    selected: DayOffset,
    now: OffsetDateTime,
) -> DayOffset {
    let mut day = selected;
    while !day.is_horizon() && !DayWindow::new(now, day).is_covered(samples) {
        day = day.next();
    }
    day
}

/// One label and one rounded temperature per hourly slot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HourlySeries {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl HourlySeries {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Chart coordinates, the slot index on x.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.values
            .iter()
            .enumerate()
            .map(|(slot, value)| [slot as f64, *value as f64])
            .collect()
    }
}

impl fmt::Display for HourlySeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, (label, value)) in self.labels.iter().zip(&self.values).enumerate() {
            if slot > 0 {
                writeln!(f)?;
            }
            write!(f, "{label}  {value}°C")?;
        }
        Ok(())
    }
}

/// Rebuilds the hourly series of `day`.
///
/// A slot with a sample at its exact hour takes that temperature, any other
/// slot repeats the previous one. Before the first match the earliest sample
/// from the start of the day onward is used, and without any sample the slot
/// is 0. The samples may come in any order.
pub fn reconstruct(
    samples: &[ForecastSample],
    day: DayOffset,
    now: OffsetDateTime,
) -> HourlySeries {
    let window = DayWindow::new(now, day);

    let by_timestamp: HashMap<i64, f64> = samples
        .iter()
        .filter(|sample| window.contains(sample.timestamp))
        .map(|sample| (sample.timestamp, sample.temperature))
        .collect();
    let earliest = samples
        .iter()
        .filter(|sample| sample.timestamp >= window.start)
        .min_by_key(|sample| sample.timestamp)
        .map(|sample| sample.temperature);

    let first_hour = first_slot_hour(now, day);
    let mut series = HourlySeries::with_capacity(usize::from(24 - first_hour));
    let mut last_known = None;

    for hour in first_hour..24 {
        let timestamp = window.start + i64::from(hour) * SECONDS_PER_HOUR;
        match by_timestamp.get(&timestamp) {
            Some(&temperature) => last_known = Some(temperature),
            None if last_known.is_none() => last_known = earliest,
            None => (),
        }

        series.labels.push(format!("{hour:02}:00"));
        series.values.push(last_known.map_or(0, round_half_up));
    }

    series
}

/// Nearest integer, halves towards +∞. Non-finite input gives 0.
pub fn round_half_up(value: f64) -> i64 {
    let rounded = (value + 0.5).floor();
    if rounded.is_finite() {
        rounded as i64
    } else {
        0
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use super::*;

    fn at(midnight: OffsetDateTime, hours: i64, temperature: f64) -> ForecastSample {
        ForecastSample::new(
            midnight.unix_timestamp() + hours * SECONDS_PER_HOUR,
            temperature,
        )
    }

    #[test]
    fn slot_count_depends_on_the_day() {
        let now = datetime!(2024-06-01 14:37 +02:00);

        let today = reconstruct(&[], DayOffset::TODAY, now);
        assert_eq!(today.values.len(), 10);
        assert_eq!(today.labels.len(), today.values.len());
        assert_eq!(today.labels.first().map(String::as_str), Some("14:00"));
        assert_eq!(today.labels.last().map(String::as_str), Some("23:00"));

        for day in [DayOffset::new(1), DayOffset::HORIZON] {
            let series = reconstruct(&[], day, now);
            assert_eq!(series.labels.len(), 24);
            assert_eq!(series.values.len(), 24);
            assert_eq!(series.labels[0], "00:00");
        }
    }

    #[test]
    fn one_slot_per_remaining_hour_whatever_the_samples() {
        let midnight = datetime!(2024-06-01 00:00 -05:00);
        let now = datetime!(2024-06-01 09:45 -05:00);
        let samples = [
            at(midnight, -6, 2.0),
            at(midnight, 3, 8.5),
            at(midnight, 12, 15.0),
            at(midnight, 13, 16.0),
            at(midnight, 30, 11.0),
            at(midnight, 75, 4.0),
        ];

        for (day, first_hour) in [(0, 9), (1, 0), (2, 0)] {
            let series = reconstruct(&samples, DayOffset::new(day), now);
            assert_eq!(series.labels.len(), 24 - first_hour, "day {day}");
            assert_eq!(series.values.len(), series.labels.len(), "day {day}");
            assert_eq!(series.labels[0], format!("{first_hour:02}:00"));
        }
    }

    #[test]
    fn empty_samples_are_zero_filled() {
        let now = datetime!(2024-06-01 05:00 UTC);
        for day in 0..=2 {
            let series = reconstruct(&[], DayOffset::new(day), now);
            assert!(series.values.iter().all(|value| *value == 0));
        }
    }

    #[test]
    fn sample_at_day_start_fills_first_slot() {
        let now = datetime!(2024-06-01 18:00 +02:00);
        let tomorrow = datetime!(2024-06-02 00:00 +02:00);
        let samples = [at(tomorrow, 0, 7.6), at(tomorrow, 6, 12.0)];

        let series = reconstruct(&samples, DayOffset::new(1), now);
        assert_eq!(series.values[0], 8);
    }

    #[test]
    fn carries_the_last_known_value_forward() {
        let midnight = datetime!(2024-06-01 00:00 +02:00);
        let now = datetime!(2024-06-01 00:12 +02:00);
        let samples = [at(midnight, 0, 10.0), at(midnight, 3, 13.0)];

        let series = reconstruct(&samples, DayOffset::TODAY, now);
        assert_eq!(series.values.len(), 24);
        assert_eq!(&series.values[..3], &[10, 10, 10]);
        assert!(series.values[3..].iter().all(|value| *value == 13));
    }

    #[test]
    fn seeds_from_the_earliest_sample_regardless_of_order() {
        let midnight = datetime!(2024-06-01 00:00 UTC);
        let now = datetime!(2024-06-01 10:30 UTC);
        let samples = [
            at(midnight, 15, 20.0),
            at(midnight, -3, -5.0),
            at(midnight, 12, 17.0),
            at(midnight, 9, 14.0),
        ];

        let series = reconstruct(&samples, DayOffset::TODAY, now);
        assert_eq!(series.labels[0], "10:00");
        assert_eq!(&series.values[..6], &[14, 14, 17, 17, 17, 20]);
        assert_eq!(series.values.last(), Some(&20));
    }

    #[test]
    fn seed_may_come_from_a_later_day() {
        let midnight = datetime!(2024-06-01 00:00 UTC);
        let now = datetime!(2024-06-01 20:00 UTC);
        let samples = [at(midnight, 27, 6.2)];

        let series = reconstruct(&samples, DayOffset::TODAY, now);
        assert_eq!(series.values, vec![6, 6, 6, 6]);
    }

    #[test]
    fn samples_of_other_days_never_match_a_slot() {
        let midnight = datetime!(2024-06-01 00:00 UTC);
        let now = datetime!(2024-06-01 00:00 UTC);
        let samples = [
            at(midnight, 6, 4.0),
            at(midnight, 24, 30.0),
            at(midnight, 48, 30.0),
        ];

        let series = reconstruct(&samples, DayOffset::TODAY, now);
        assert!(series.values.iter().all(|value| *value == 4));
    }

    #[test]
    fn rounds_halves_up() {
        assert_eq!(round_half_up(12.5), 13);
        assert_eq!(round_half_up(12.49), 12);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(f64::NAN), 0);
        assert_eq!(round_half_up(f64::INFINITY), 0);
    }

    #[test]
    fn skips_today_when_it_has_no_samples() {
        let now = datetime!(2024-06-01 22:00 +02:00);
        let tomorrow = datetime!(2024-06-02 00:00 +02:00);
        let samples = [at(tomorrow, 3, 11.0), at(tomorrow, 6, 12.0)];

        assert_eq!(
            resolve_covered_day(&samples, DayOffset::TODAY, now),
            DayOffset::new(1)
        );
    }

    #[test]
    fn skip_stops_at_the_horizon() {
        let now = datetime!(2024-06-01 08:00 UTC);
        assert_eq!(
            resolve_covered_day(&[], DayOffset::TODAY, now),
            DayOffset::HORIZON
        );

        let far = [at(datetime!(2024-06-10 00:00 UTC), 0, 1.0)];
        assert_eq!(
            resolve_covered_day(&far, DayOffset::TODAY, now),
            DayOffset::HORIZON
        );
    }

    #[test]
    fn skip_never_moves_backward() {
        let midnight = datetime!(2024-06-01 00:00 UTC);
        let now = datetime!(2024-06-01 08:00 UTC);
        let samples = [at(midnight, 9, 1.0), at(midnight, 33, 2.0)];

        assert_eq!(
            resolve_covered_day(&samples, DayOffset::TODAY, now),
            DayOffset::TODAY
        );
        assert_eq!(
            resolve_covered_day(&samples, DayOffset::new(1), now),
            DayOffset::new(1)
        );
        assert_eq!(
            resolve_covered_day(&samples, DayOffset::HORIZON, now),
            DayOffset::HORIZON
        );
    }

    #[test]
    fn day_offset_is_clamped() {
        assert_eq!(DayOffset::new(7), DayOffset::HORIZON);
        assert_eq!(DayOffset::TODAY.previous(), DayOffset::TODAY);
        assert_eq!(DayOffset::HORIZON.next(), DayOffset::HORIZON);
        assert_eq!(DayOffset::TODAY.next().next(), DayOffset::HORIZON);
    }

    #[test]
    fn day_window_follows_the_local_offset() {
        let now = datetime!(2024-06-01 01:30 +02:00);
        let window = DayWindow::new(now, DayOffset::new(1));

        assert_eq!(window.date, time::macros::date!(2024 - 06 - 02));
        assert_eq!(
            window.start,
            datetime!(2024-06-01 22:00 UTC).unix_timestamp()
        );
        assert_eq!(window.end - window.start, SECONDS_PER_DAY);
        assert!(window.contains(window.start));
        assert!(!window.contains(window.end));
    }

    #[test]
    fn display_lists_one_slot_per_line() {
        let midnight = datetime!(2024-06-01 00:00 UTC);
        let now = datetime!(2024-06-01 21:05 UTC);
        let samples = [at(midnight, 21, 3.4), at(midnight, 23, -1.6)];

        let series = reconstruct(&samples, DayOffset::TODAY, now);
        insta::assert_snapshot!(series.to_string(), @r###"
        21:00  3°C
        22:00  3°C
        23:00  -2°C
        "###);
    }
}
