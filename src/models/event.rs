//! Venue-wide schedule events and the recurring rules that generate them.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::api::SchedulingError;
use crate::define_id_type;
use crate::models::reservation::ReservationId;
use crate::models::time::TimeRange;

define_id_type!(Uuid, ScheduleEventId);

/// Business-hours block category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Opening earlier than regular hours (morning rentals).
    EarlyOpen,
    /// Staying open past regular close into the 24–29 band.
    Overnight,
}

/// Where a schedule event came from.
///
/// Manual events are staff-entered and block automatic generation; auto
/// events may be rewritten or removed by reconciliation and batch jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    Manual,
    Reservation { reservation_id: ReservationId },
    Rule { fingerprint: String },
}

impl Provenance {
    pub fn is_manual(&self) -> bool {
        matches!(self, Provenance::Manual)
    }

    /// Tag string as stored by the surrounding application
    /// (`manual`, `auto:reservation:<id>`, `auto:rule:<fingerprint>`).
    pub fn tag(&self) -> String {
        match self {
            Provenance::Manual => "manual".to_string(),
            Provenance::Reservation { reservation_id } => {
                format!("auto:reservation:{}", reservation_id)
            }
            Provenance::Rule { fingerprint } => format!("auto:rule:{}", fingerprint),
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A venue-wide business-hours block on one date.
///
/// Events are never auto-deleted; removal is an explicit store operation
/// guarded by provenance (manual and locked rows survive bulk replacement).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub id: ScheduleEventId,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub category: EventCategory,
    pub provenance: Provenance,
    /// Staff can pin a manual event so no bulk operation touches it.
    #[serde(default)]
    pub locked: bool,
}

impl ScheduleEvent {
    pub fn new(
        id: ScheduleEventId,
        date: NaiveDate,
        range: TimeRange,
        category: EventCategory,
        provenance: Provenance,
    ) -> Self {
        Self {
            id,
            date,
            range,
            category,
            provenance,
            locked: false,
        }
    }

    /// Whether reconciliation and batch jobs must leave this row alone.
    pub fn is_protected(&self) -> bool {
        self.provenance.is_manual() || self.locked
    }
}

/// Horizon of a recurring rule: stop after N occurrences or at a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    Occurrences(u32),
    Until(NaiveDate),
}

/// A standing rule producing business-hour blocks on matching weekdays,
/// e.g. "every Saturday and Sunday, overnight 24:00–29:00".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub weekdays: Vec<Weekday>,
    pub category: EventCategory,
    pub range: TimeRange,
    pub horizon: Horizon,
}

impl RecurrenceRule {
    /// Validate the rule before any dates are enumerated.
    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.weekdays.is_empty() {
            return Err(SchedulingError::validation(
                "recurrence rule has an empty weekday set",
            ));
        }
        if let Horizon::Occurrences(0) = self.horizon {
            return Err(SchedulingError::validation(
                "recurrence rule has a zero-occurrence horizon",
            ));
        }
        Ok(())
    }

    /// Stable identity of this rule.
    ///
    /// SHA-256 over the canonical JSON of everything but the horizon, so a
    /// rule re-run with a longer horizon still recognizes its own events.
    pub fn fingerprint(&self) -> String {
        #[derive(Serialize)]
        struct Canonical<'a> {
            weekdays: Vec<String>,
            category: &'a EventCategory,
            range: &'a TimeRange,
        }

        let mut weekdays: Vec<String> = self.weekdays.iter().map(|d| d.to_string()).collect();
        weekdays.sort();
        let canonical = Canonical {
            weekdays,
            category: &self.category,
            range: &self.range,
        };
        // Serialization of a plain struct with string keys cannot fail.
        let json = serde_json::to_string(&canonical).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..16].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overnight_rule() -> RecurrenceRule {
        RecurrenceRule {
            weekdays: vec![Weekday::Sat, Weekday::Sun],
            category: EventCategory::Overnight,
            range: TimeRange::from_display(24, 29).unwrap(),
            horizon: Horizon::Occurrences(2),
        }
    }

    #[test]
    fn test_provenance_tags() {
        assert_eq!(Provenance::Manual.tag(), "manual");
        let id = ReservationId::new(Uuid::nil());
        let tag = Provenance::Reservation { reservation_id: id }.tag();
        assert_eq!(tag, format!("auto:reservation:{}", Uuid::nil()));
    }

    #[test]
    fn test_protected_events() {
        let mut event = ScheduleEvent::new(
            ScheduleEventId::new(Uuid::nil()),
            NaiveDate::from_ymd_opt(2025, 7, 23).unwrap(),
            TimeRange::from_display(24, 29).unwrap(),
            EventCategory::Overnight,
            Provenance::Manual,
        );
        assert!(event.is_protected());

        event.provenance = Provenance::Rule {
            fingerprint: "abc".into(),
        };
        assert!(!event.is_protected());

        event.locked = true;
        assert!(event.is_protected());
    }

    #[test]
    fn test_rule_validation() {
        let mut rule = overnight_rule();
        assert!(rule.validate().is_ok());

        rule.weekdays.clear();
        assert!(rule.validate().is_err());

        let mut rule = overnight_rule();
        rule.horizon = Horizon::Occurrences(0);
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_fingerprint_stability() {
        let a = overnight_rule();
        let mut b = overnight_rule();
        assert_eq!(a.fingerprint(), b.fingerprint());

        // Weekday order does not matter
        b.weekdays.reverse();
        assert_eq!(a.fingerprint(), b.fingerprint());

        // Horizon does not change identity
        b.horizon = Horizon::Occurrences(10);
        assert_eq!(a.fingerprint(), b.fingerprint());

        // The block itself does
        b.range = TimeRange::from_display(22, 29).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_length() {
        assert_eq!(overnight_rule().fingerprint().len(), 16);
    }
}
