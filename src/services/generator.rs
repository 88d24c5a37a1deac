//! Schedule event generation.
//!
//! Derives venue-wide business-hour blocks from approved reservations and
//! from standing recurrence rules. Everything returns pure values; the
//! caller persists created events through the store.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{SchedulingError, SchedulingResult};
use crate::models::event::{
    EventCategory, Horizon, Provenance, RecurrenceRule, ScheduleEvent, ScheduleEventId,
};
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::time::TimeRange;

/// What part of the business day a reservation's start falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Regular hours; produces no schedule event.
    Daytime,
    /// Morning rental before regular opening (raw start 06:00–11:59).
    Early,
    /// Late rental past regular close (raw start 22:00+ or before 06:00).
    Overnight,
}

/// Classify a reservation window by its start hour.
///
/// Thresholds follow the venue's slot taxonomy: starts in 6..12 are early
/// rentals, starts at 22 or later (including the 24–29 band) are overnight
/// rentals, everything else is a regular daytime rental.
pub fn classify_slot(range: &TimeRange) -> SlotKind {
    let start = range.start().value();
    if (6..12).contains(&start) {
        SlotKind::Early
    } else if start >= 22 {
        SlotKind::Overnight
    } else {
        SlotKind::Daytime
    }
}

impl SlotKind {
    /// The event category a slot of this kind implies, if any.
    pub fn event_category(&self) -> Option<EventCategory> {
        match self {
            SlotKind::Daytime => None,
            SlotKind::Early => Some(EventCategory::EarlyOpen),
            SlotKind::Overnight => Some(EventCategory::Overnight),
        }
    }
}

/// Derive a schedule event from a newly approved reservation.
///
/// Daytime rentals need no business-hours block and yield `None`. Early and
/// overnight rentals yield one event spanning the reservation's own window,
/// tagged `auto:reservation:<id>`. Passing a reservation in any state other
/// than `approved` is a contract violation by the trigger.
pub fn from_approved_reservation(
    reservation: &Reservation,
) -> SchedulingResult<Option<ScheduleEvent>> {
    if reservation.status != ReservationStatus::Approved {
        return Err(SchedulingError::validation(format!(
            "reservation {} is not approved",
            reservation.id
        )));
    }

    let Some(category) = classify_slot(&reservation.range).event_category() else {
        return Ok(None);
    };

    Ok(Some(ScheduleEvent::new(
        ScheduleEventId::new(Uuid::new_v4()),
        reservation.date,
        reservation.range,
        category,
        Provenance::Reservation {
            reservation_id: reservation.id,
        },
    )))
}

/// Why a candidate date was passed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A staff-entered (or locked) event overlaps the block.
    ManualEvent,
    /// This rule already generated an overlapping event; already satisfied.
    AlreadyGenerated,
    /// Another automatic event overlaps the block.
    OtherAutoEvent,
}

/// A date the generator examined but did not materialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDate {
    pub date: NaiveDate,
    pub reason: SkipReason,
}

/// Result of one recurring-generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub created: Vec<ScheduleEvent>,
    pub skipped: Vec<SkippedDate>,
}

impl GenerationOutcome {
    /// Dates examined in this run, created and skipped alike.
    pub fn occurrences(&self) -> usize {
        self.created.len() + self.skipped.len()
    }
}

/// Materialize a recurrence rule over its horizon.
///
/// Enumerates dates matching the rule's weekday set from `start_date`
/// (inclusive) and produces a candidate event per date, skipping dates with
/// conflicting existing events. Skipped dates count toward an
/// occurrence-based horizon, which is what makes re-running the same rule
/// idempotent: the second run sees its own previous output and skips every
/// date it would otherwise fill.
pub fn generate_recurring_blocks(
    rule: &RecurrenceRule,
    start_date: NaiveDate,
    existing_events: &[ScheduleEvent],
) -> SchedulingResult<GenerationOutcome> {
    rule.validate()?;
    let fingerprint = rule.fingerprint();

    let mut outcome = GenerationOutcome {
        created: Vec::new(),
        skipped: Vec::new(),
    };

    let mut date = start_date;
    loop {
        match rule.horizon {
            Horizon::Occurrences(n) => {
                if outcome.occurrences() >= n as usize {
                    break;
                }
            }
            Horizon::Until(end) => {
                if date > end {
                    break;
                }
            }
        }

        if rule.weekdays.contains(&date.weekday()) {
            match check_date(rule, &fingerprint, date, existing_events) {
                None => outcome.created.push(ScheduleEvent::new(
                    ScheduleEventId::new(Uuid::new_v4()),
                    date,
                    rule.range,
                    rule.category,
                    Provenance::Rule {
                        fingerprint: fingerprint.clone(),
                    },
                )),
                Some(reason) => {
                    log::debug!("rule {}: skipping {} ({:?})", fingerprint, date, reason);
                    outcome.skipped.push(SkippedDate { date, reason });
                }
            }
        }

        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(outcome)
}

fn check_date(
    rule: &RecurrenceRule,
    fingerprint: &str,
    date: NaiveDate,
    existing_events: &[ScheduleEvent],
) -> Option<SkipReason> {
    for event in existing_events {
        if event.date != date || !event.range.overlaps(&rule.range) {
            continue;
        }
        if event.is_protected() {
            return Some(SkipReason::ManualEvent);
        }
        match &event.provenance {
            Provenance::Rule { fingerprint: fp } if fp == fingerprint => {
                return Some(SkipReason::AlreadyGenerated);
            }
            _ => return Some(SkipReason::OtherAutoEvent),
        }
    }
    None
}
