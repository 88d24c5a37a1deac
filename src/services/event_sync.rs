//! Per-date reconciliation of auto-generated events.
//!
//! Approvals and cancellations drift the set of early/overnight
//! reservations over time; this service recomputes what the auto events
//! for a date should look like and emits a plan of create/update/delete
//! actions. The plan is pure; the caller applies it through the store,
//! typically right after a reservation status change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::VenueHours;
use crate::models::event::{
    EventCategory, Provenance, ScheduleEvent, ScheduleEventId,
};
use crate::models::reservation::Reservation;
use crate::models::time::{DisplayHour, TimeRange};
use crate::services::generator::{classify_slot, SlotKind};

/// One persistence step the caller should take.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    Create(ScheduleEvent),
    Update {
        id: ScheduleEventId,
        range: TimeRange,
    },
    Delete {
        id: ScheduleEventId,
    },
}

/// Reconciliation plan for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncPlan {
    pub date: NaiveDate,
    pub actions: Vec<SyncAction>,
}

impl SyncPlan {
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Compute the reconciliation plan for a date.
///
/// For each auto-managed category (early open, overnight):
/// - the desired block is derived from the date's occupying reservations
///   (earliest early start up to regular opening; regular close out to the
///   latest overnight end);
/// - a staff-entered or locked event of the category suppresses all
///   automatic action;
/// - otherwise the existing auto event is updated or deleted to match, and
///   a missing one is created. Duplicate auto events of a category are
///   planned away.
pub fn plan_date_sync(
    date: NaiveDate,
    reservations: &[Reservation],
    events: &[ScheduleEvent],
    hours: &VenueHours,
) -> SyncPlan {
    let mut actions = Vec::new();

    for category in [EventCategory::EarlyOpen, EventCategory::Overnight] {
        plan_category(date, category, reservations, events, hours, &mut actions);
    }

    SyncPlan { date, actions }
}

fn plan_category(
    date: NaiveDate,
    category: EventCategory,
    reservations: &[Reservation],
    events: &[ScheduleEvent],
    hours: &VenueHours,
    actions: &mut Vec<SyncAction>,
) {
    if events
        .iter()
        .any(|e| e.date == date && e.category == category && e.is_protected())
    {
        log::debug!(
            "{}: protected {:?} event present, leaving schedule alone",
            date,
            category
        );
        return;
    }

    let desired = desired_block(date, category, reservations, hours);

    let mut auto_events = events
        .iter()
        .filter(|e| e.date == date && e.category == category && !e.is_protected());

    match (auto_events.next(), desired) {
        (None, None) => {}
        (None, Some((range, source))) => {
            let event = ScheduleEvent::new(
                ScheduleEventId::new(Uuid::new_v4()),
                date,
                range,
                category,
                Provenance::Reservation {
                    reservation_id: source,
                },
            );
            actions.push(SyncAction::Create(event));
        }
        (Some(existing), None) => {
            actions.push(SyncAction::Delete { id: existing.id });
        }
        (Some(existing), Some((range, _))) => {
            if existing.range != range {
                actions.push(SyncAction::Update {
                    id: existing.id,
                    range,
                });
            }
        }
    }

    // A category should have at most one auto event; shed any extras.
    for duplicate in auto_events {
        actions.push(SyncAction::Delete { id: duplicate.id });
    }
}

/// The block a category should span given today's reservations, plus the
/// reservation that pins its outer bound.
fn desired_block(
    date: NaiveDate,
    category: EventCategory,
    reservations: &[Reservation],
    hours: &VenueHours,
) -> Option<(TimeRange, crate::models::reservation::ReservationId)> {
    let kind = match category {
        EventCategory::EarlyOpen => SlotKind::Early,
        EventCategory::Overnight => SlotKind::Overnight,
    };

    let candidates: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| r.date == date && r.is_occupying() && classify_slot(&r.range) == kind)
        .collect();

    match category {
        EventCategory::EarlyOpen => {
            let earliest = candidates.iter().min_by_key(|r| r.range.start())?;
            let close = DisplayHour::from_display(hours.regular_open).ok()?;
            let range = TimeRange::new(earliest.range.start(), close).ok()?;
            Some((range, earliest.id))
        }
        EventCategory::Overnight => {
            let latest = candidates.iter().max_by_key(|r| r.range.end())?;
            let open = DisplayHour::from_display(hours.regular_close).ok()?;
            let range = TimeRange::new(open, latest.range.end()).ok()?;
            Some((range, latest.id))
        }
    }
}
