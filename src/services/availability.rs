//! Device availability computation.
//!
//! All operations here are pure reads over a snapshot of one device's
//! reservations for one business date. The conflict check is advisory: the
//! authoritative no-double-booking guarantee belongs to the storage layer
//! behind the repository traits (see `store`).

use serde::{Deserialize, Serialize};

use crate::api::SchedulingError;
use crate::models::reservation::{Device, DeviceId, DeviceStatus, Reservation, ReservationId};
use crate::models::time::{DisplayHour, TimeRange};

/// Outcome of a status computation.
///
/// Anomalies are symptoms of already-broken stored data. They never fail
/// the read; the caller logs or alerts on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: DeviceStatus,
    #[serde(default)]
    pub anomalies: Vec<StatusAnomaly>,
}

impl StatusReport {
    fn clean(status: DeviceStatus) -> Self {
        Self {
            status,
            anomalies: Vec::new(),
        }
    }
}

/// A data inconsistency observed while deriving status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusAnomaly {
    /// More than one occupying reservation covered the queried instant.
    /// The first in input order won.
    OverlappingNow {
        winner: ReservationId,
        also_matched: Vec<ReservationId>,
    },
}

/// A pair of occupying reservations whose windows intersect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPair {
    pub device_id: DeviceId,
    pub first: ReservationId,
    pub second: ReservationId,
}

/// Derive a device's status at an instant.
///
/// Stored `maintenance`/`disabled` flags win unconditionally; otherwise the
/// device is `rental` while any occupying reservation covers `now`, else
/// `available`.
pub fn compute_status(
    device: &Device,
    reservations_for_date: &[Reservation],
    now: DisplayHour,
) -> StatusReport {
    if device.status.is_authoritative() {
        return StatusReport::clean(device.status);
    }

    let matched: Vec<&Reservation> = reservations_for_date
        .iter()
        .filter(|r| r.device_id == device.id && r.is_occupying() && r.range.contains(now))
        .collect();

    match matched.split_first() {
        None => StatusReport::clean(DeviceStatus::Available),
        Some((winner, rest)) => {
            let mut report = StatusReport::clean(DeviceStatus::Rental);
            if !rest.is_empty() {
                let also_matched: Vec<ReservationId> = rest.iter().map(|r| r.id).collect();
                log::warn!(
                    "device {}: {} occupying reservations cover {} (winner {})",
                    device.id,
                    matched.len(),
                    now,
                    winner.id
                );
                report.anomalies.push(StatusAnomaly::OverlappingNow {
                    winner: winner.id,
                    also_matched,
                });
            }
            report
        }
    }
}

/// Free display-hour windows for a device inside the operating window.
///
/// Occupied ranges are merged before complementing, so back-to-back and
/// overlapping reservations yield a single gap-free block. Devices under
/// maintenance or disabled have no free ranges at all.
pub fn free_ranges(
    device: &Device,
    reservations_for_date: &[Reservation],
    window: &TimeRange,
) -> Vec<TimeRange> {
    if device.status.is_authoritative() {
        return Vec::new();
    }

    let occupied = merge_occupied(device.id, reservations_for_date, window);

    let mut free = Vec::new();
    let mut cursor = window.start();
    for range in &occupied {
        if range.start() > cursor {
            if let Ok(gap) = TimeRange::new(cursor, range.start()) {
                free.push(gap);
            }
        }
        if range.end() > cursor {
            cursor = range.end();
        }
    }
    if cursor < window.end() {
        if let Ok(gap) = TimeRange::new(cursor, window.end()) {
            free.push(gap);
        }
    }
    free
}

/// Merged, window-clipped union of the device's occupying ranges.
pub fn merge_occupied(
    device_id: DeviceId,
    reservations_for_date: &[Reservation],
    window: &TimeRange,
) -> Vec<TimeRange> {
    let mut clipped: Vec<TimeRange> = reservations_for_date
        .iter()
        .filter(|r| r.device_id == device_id && r.is_occupying())
        .filter_map(|r| clip(&r.range, window))
        .collect();

    clipped.sort_by_key(|r| (r.start(), r.end()));

    let mut merged: Vec<TimeRange> = Vec::new();
    for range in clipped {
        match merged.last_mut() {
            Some(last) if range.start() <= last.end() => {
                if range.end() > last.end() {
                    if let Ok(extended) = TimeRange::new(last.start(), range.end()) {
                        *last = extended;
                    }
                }
            }
            _ => merged.push(range),
        }
    }
    merged
}

fn clip(range: &TimeRange, window: &TimeRange) -> Option<TimeRange> {
    let start = range.start().max(window.start());
    let end = range.end().min(window.end());
    TimeRange::new(start, end).ok()
}

/// All pairs of occupying reservations that double-book a device.
///
/// Read-only: violations are reported, never repaired. Booking flows call
/// this before accepting a new reservation; an empty result is necessary
/// but not sufficient (the final insert may still race and is fenced at
/// the storage layer).
pub fn detect_conflicts(reservations_for_date: &[Reservation]) -> Vec<ConflictPair> {
    let occupying: Vec<&Reservation> = reservations_for_date
        .iter()
        .filter(|r| r.is_occupying())
        .collect();

    let mut conflicts = Vec::new();
    for (i, a) in occupying.iter().enumerate() {
        for b in &occupying[i + 1..] {
            if a.device_id == b.device_id && a.range.overlaps(&b.range) {
                conflicts.push(ConflictPair {
                    device_id: a.device_id,
                    first: a.id,
                    second: b.id,
                });
            }
        }
    }
    conflicts
}

/// Check a proposed booking window against the device's existing
/// occupying reservations.
pub fn validate_candidate(
    device_id: DeviceId,
    proposed: &TimeRange,
    reservations_for_date: &[Reservation],
) -> Result<(), SchedulingError> {
    for r in reservations_for_date {
        if r.device_id == device_id && r.is_occupying() && r.range.overlaps(proposed) {
            return Err(SchedulingError::conflict(format!(
                "proposed range {} overlaps reservation {} ({})",
                proposed, r.id, r.range
            )));
        }
    }
    Ok(())
}
