//! High-level flows that combine the pure engine with a repository.
//!
//! These are the functions the surrounding application calls; each one
//! fetches the snapshot it needs, runs the pure computation, and persists
//! the result through the repository traits.

use chrono::NaiveDate;

use crate::models::reservation::{DeviceId, Reservation, ReservationStatus};
use crate::models::time::DisplayHour;
use crate::services::availability::{compute_status, validate_candidate, StatusReport};
use crate::services::event_sync::{plan_date_sync, SyncAction, SyncPlan};
use crate::services::expiry::{expired_transitions, DeviceTransition, Transition};
use crate::services::generator::GenerationOutcome;
use crate::services::status_cache::StatusCache;
use crate::store::repository::{RepositoryResult, VenueRepository};

/// Book a new reservation: advisory conflict check, then insert.
///
/// The check closes most double bookings early with a useful message, but
/// the insert itself is the authoritative fence — a concurrent booking can
/// still land between the two, and surfaces as `RepositoryError::Conflict`
/// from the insert. Callers should treat both identically.
pub async fn book_reservation<R>(repo: &R, reservation: &Reservation) -> RepositoryResult<()>
where
    R: VenueRepository + ?Sized,
{
    let existing = repo
        .reservations_for_device(
            reservation.device_id,
            reservation.date,
            &ReservationStatus::OCCUPYING,
        )
        .await?;
    validate_candidate(reservation.device_id, &reservation.range, &existing)?;

    repo.insert_reservation(reservation).await
}

/// Current status of one device, optionally through a caller-owned cache.
pub async fn device_status<R>(
    repo: &R,
    device_id: DeviceId,
    date: NaiveDate,
    now: DisplayHour,
    cache: Option<&StatusCache>,
) -> RepositoryResult<StatusReport>
where
    R: VenueRepository + ?Sized,
{
    if let Some(cache) = cache {
        if let Some(status) = cache.get(device_id) {
            return Ok(StatusReport {
                status,
                anomalies: Vec::new(),
            });
        }
    }

    let device = repo.device_by_id(device_id).await?;
    let reservations = repo
        .reservations_for_device(device_id, date, &ReservationStatus::OCCUPYING)
        .await?;
    let report = compute_status(&device, &reservations, now);

    if let Some(cache) = cache {
        cache.insert(device_id, report.status);
    }
    Ok(report)
}

/// Reconcile a date's auto events and persist the resulting plan.
///
/// Returns the plan that was applied so callers can log or audit it.
pub async fn sync_date<R>(
    repo: &R,
    date: NaiveDate,
    hours: &crate::config::VenueHours,
) -> RepositoryResult<SyncPlan>
where
    R: VenueRepository + ?Sized,
{
    let reservations = repo.reservations_for_date(date).await?;
    let events = repo.events_for_date(date).await?;
    let plan = plan_date_sync(date, &reservations, &events, hours);
    apply_sync_plan(repo, &plan).await?;
    Ok(plan)
}

/// Apply a precomputed reconciliation plan.
pub async fn apply_sync_plan<R>(repo: &R, plan: &SyncPlan) -> RepositoryResult<usize>
where
    R: VenueRepository + ?Sized,
{
    for action in &plan.actions {
        match action {
            SyncAction::Create(event) => repo.insert_event(event).await?,
            SyncAction::Update { id, range } => repo.update_event_range(*id, *range).await?,
            SyncAction::Delete { id } => repo.delete_event(*id).await?,
        }
    }
    Ok(plan.actions.len())
}

/// Run the expiry sweep for a date and persist the due transitions.
///
/// Devices released by a completed session are invalidated in the cache so
/// the next status poll recomputes.
pub async fn run_expiry_sweep<R>(
    repo: &R,
    date: NaiveDate,
    now: DisplayHour,
    cache: Option<&StatusCache>,
) -> RepositoryResult<Vec<Transition>>
where
    R: VenueRepository + ?Sized,
{
    let reservations = repo.reservations_for_date(date).await?;
    let transitions = expired_transitions(now, &reservations);

    for transition in &transitions {
        repo.set_reservation_status(transition.reservation_id, transition.to)
            .await?;
        if transition.device == DeviceTransition::Release {
            repo.set_device_status(
                transition.device_id,
                crate::models::reservation::DeviceStatus::Available,
            )
            .await?;
        }
        if let Some(cache) = cache {
            cache.invalidate(transition.device_id);
        }
    }
    Ok(transitions)
}

/// Persist the created events of a recurring-generation run.
pub async fn record_generated_events<R>(
    repo: &R,
    outcome: &GenerationOutcome,
) -> RepositoryResult<usize>
where
    R: VenueRepository + ?Sized,
{
    for event in &outcome.created {
        repo.insert_event(event).await?;
    }
    Ok(outcome.created.len())
}
