use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::*;

use crate::api::SchedulingError;

/// First raw hour that belongs to the current business day. Raw hours below
/// this (00:00–05:59) display as 24–29 and attach to the previous day.
pub const DAY_ROLLOVER_HOUR: u8 = 6;

/// Exclusive upper bound for display-hour range endpoints (a raw 06:00 end
/// on the following morning normalizes to 30).
pub const DISPLAY_HOUR_MAX: u8 = 30;

/// Hour-of-day on the venue's extended clock.
///
/// The venue treats a business day as running from 06:00 until 05:59 the
/// next morning, so the early-morning hours 0–5 are renumbered 24–29.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DisplayHour(u8);

impl DisplayHour {
    /// Convert a raw wall-clock hour (0–23) to display space.
    pub fn from_raw(raw: u8) -> Result<Self, SchedulingError> {
        if raw >= 24 {
            return Err(SchedulingError::validation(format!(
                "raw hour {} outside [0, 24)",
                raw
            )));
        }
        Ok(Self(if raw < DAY_ROLLOVER_HOUR { raw + 24 } else { raw }))
    }

    /// Construct directly from a display-space value (6–30).
    pub fn from_display(value: u8) -> Result<Self, SchedulingError> {
        if !(DAY_ROLLOVER_HOUR..=DISPLAY_HOUR_MAX).contains(&value) {
            return Err(SchedulingError::validation(format!(
                "display hour {} outside [{}, {}]",
                value, DAY_ROLLOVER_HOUR, DISPLAY_HOUR_MAX
            )));
        }
        Ok(Self(value))
    }

    /// Derive "now" in display space from a venue-local time.
    pub fn from_local(now: NaiveTime) -> Self {
        let raw = now.hour() as u8;
        Self(if raw < DAY_ROLLOVER_HOUR { raw + 24 } else { raw })
    }

    /// Raw display value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Back to the wall-clock hour (0–23).
    pub fn raw_hour(&self) -> u8 {
        if self.0 >= 24 {
            self.0 - 24
        } else {
            self.0
        }
    }

    /// Whether this hour falls in the renumbered late-night band (24–29).
    pub fn is_late_night(&self) -> bool {
        self.0 >= 24
    }
}

impl std::fmt::Display for DisplayHour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

/// The business date a venue-local instant belongs to.
///
/// Instants before the rollover hour (06:00) count toward the previous
/// calendar day, keeping overnight sessions attached to the date they
/// started on.
pub fn business_date(now: NaiveDateTime) -> NaiveDate {
    if (now.hour() as u8) < DAY_ROLLOVER_HOUR {
        now.date().pred_opt().unwrap_or_else(|| now.date())
    } else {
        now.date()
    }
}

/// A half-open `[start, end)` window on the extended clock of one business
/// date. `end > start` always holds after normalization; `end` may exceed 24
/// when the window crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    start: DisplayHour,
    end: DisplayHour,
}

impl TimeRange {
    /// Build a range from already-converted display hours.
    pub fn new(start: DisplayHour, end: DisplayHour) -> Result<Self, SchedulingError> {
        if end.value() <= start.value() {
            return Err(SchedulingError::validation(format!(
                "empty time range: end {} <= start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Convert raw wall-clock endpoints into a normalized display range.
    ///
    /// Both endpoints are remapped; when the converted end does not exceed
    /// the start the window crosses midnight and the end gains a day (+24).
    pub fn normalize(start_raw: u8, end_raw: u8) -> Result<Self, SchedulingError> {
        let start = DisplayHour::from_raw(start_raw)?;
        let mut end = DisplayHour::from_raw(end_raw)?;
        if end.value() <= start.value() {
            let shifted = end.value() + 24;
            if shifted > DISPLAY_HOUR_MAX {
                return Err(SchedulingError::validation(format!(
                    "range ({}, {}) exceeds the business day",
                    start_raw, end_raw
                )));
            }
            end = DisplayHour(shifted);
        }
        Self::new(start, end)
    }

    /// Build a range from display-space values (e.g. `(24, 29)` for the
    /// overnight block).
    pub fn from_display(start: u8, end: u8) -> Result<Self, SchedulingError> {
        Self::new(DisplayHour::from_display(start)?, DisplayHour::from_display(end)?)
    }

    pub fn start(&self) -> DisplayHour {
        self.start
    }

    pub fn end(&self) -> DisplayHour {
        self.end
    }

    /// Whether an instant lies inside this window (inclusive start,
    /// exclusive end).
    pub fn contains(&self, t: DisplayHour) -> bool {
        self.start.value() <= t.value() && t.value() < self.end.value()
    }

    /// Whether this window intersects another.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start.value() < other.end.value() && other.start.value() < self.end.value()
    }

    /// Window length in whole hours.
    pub fn duration_hours(&self) -> u8 {
        self.end.value() - self.start.value()
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_night_hours_shift() {
        for h in 0..6u8 {
            assert_eq!(DisplayHour::from_raw(h).unwrap().value(), h + 24);
        }
    }

    #[test]
    fn test_daytime_hours_unchanged() {
        for h in 6..24u8 {
            assert_eq!(DisplayHour::from_raw(h).unwrap().value(), h);
        }
    }

    #[test]
    fn test_raw_hour_roundtrip() {
        for h in 0..24u8 {
            assert_eq!(DisplayHour::from_raw(h).unwrap().raw_hour(), h);
        }
    }

    #[test]
    fn test_out_of_range_raw_hour() {
        let err = DisplayHour::from_raw(24).unwrap_err();
        assert!(matches!(err, SchedulingError::Validation { .. }));
    }

    #[test]
    fn test_from_local_after_midnight() {
        let t = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        assert_eq!(DisplayHour::from_local(t).value(), 26);
    }

    #[test]
    fn test_from_local_evening() {
        let t = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
        assert_eq!(DisplayHour::from_local(t).value(), 22);
    }

    #[test]
    fn test_business_date_before_rollover() {
        let dt = NaiveDate::from_ymd_opt(2025, 7, 24)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap();
        assert_eq!(business_date(dt), NaiveDate::from_ymd_opt(2025, 7, 23).unwrap());
    }

    #[test]
    fn test_business_date_after_rollover() {
        let dt = NaiveDate::from_ymd_opt(2025, 7, 24)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(business_date(dt), NaiveDate::from_ymd_opt(2025, 7, 24).unwrap());
    }

    #[test]
    fn test_normalize_daytime_range() {
        let range = TimeRange::normalize(9, 11).unwrap();
        assert_eq!(range.start().value(), 9);
        assert_eq!(range.end().value(), 11);
    }

    #[test]
    fn test_normalize_crossing_midnight() {
        // 22:00 to 05:00 → display 22..29
        let range = TimeRange::normalize(22, 5).unwrap();
        assert_eq!(range.start().value(), 22);
        assert_eq!(range.end().value(), 29);
    }

    #[test]
    fn test_normalize_overnight_block() {
        // 00:00 to 05:00 → display 24..29
        let range = TimeRange::normalize(0, 5).unwrap();
        assert_eq!(range.start().value(), 24);
        assert_eq!(range.end().value(), 29);
    }

    #[test]
    fn test_normalize_end_at_rollover() {
        // 23:00 to 06:00 → display 23..30
        let range = TimeRange::normalize(23, 6).unwrap();
        assert_eq!(range.end().value(), 30);
    }

    #[test]
    fn test_normalize_rejects_full_wrap() {
        // 10:00 to 10:00 would need a 24h window; not representable
        assert!(TimeRange::normalize(10, 10).is_err());
    }

    #[test]
    fn test_contains_is_half_open() {
        let range = TimeRange::normalize(9, 11).unwrap();
        assert!(range.contains(DisplayHour::from_raw(9).unwrap()));
        assert!(range.contains(DisplayHour::from_raw(10).unwrap()));
        assert!(!range.contains(DisplayHour::from_raw(11).unwrap()));
    }

    #[test]
    fn test_overlaps() {
        let a = TimeRange::normalize(10, 12).unwrap();
        let b = TimeRange::normalize(11, 13).unwrap();
        let c = TimeRange::normalize(12, 14).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_duration_hours() {
        let range = TimeRange::from_display(24, 29).unwrap();
        assert_eq!(range.duration_hours(), 5);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn display_mapping_law(h in 0u8..24) {
                let d = DisplayHour::from_raw(h).unwrap();
                if h < 6 {
                    prop_assert_eq!(d.value(), h + 24);
                } else {
                    prop_assert_eq!(d.value(), h);
                }
            }

            #[test]
            fn normalized_ranges_are_non_empty(start in 0u8..24, end in 0u8..24) {
                if let Ok(range) = TimeRange::normalize(start, end) {
                    prop_assert!(range.end().value() > range.start().value());
                    prop_assert!(range.end().value() <= DISPLAY_HOUR_MAX);
                }
            }
        }
    }
}
