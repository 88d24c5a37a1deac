//! Expired-reservation sweep.
//!
//! Instead of a cron job, the surrounding application runs this sweep on
//! user actions: given "now" and the date's reservations, it computes the
//! status transitions that are overdue. Checked-in sessions whose window
//! has fully elapsed complete (freeing their device); approved sessions
//! that elapsed without a check-in become no-shows.

use serde::{Deserialize, Serialize};

use crate::models::reservation::{
    DeviceId, Reservation, ReservationId, ReservationStatus,
};
use crate::models::time::DisplayHour;

/// What should happen to the reservation's device, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceTransition {
    /// Release the device back to the floor.
    Release,
    /// No device-side change.
    None,
}

/// One overdue status change for the caller to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub reservation_id: ReservationId,
    pub device_id: DeviceId,
    pub to: ReservationStatus,
    pub device: DeviceTransition,
}

/// Compute the transitions that are due at `now`.
///
/// Only fully elapsed windows transition (`range.end <= now`); a session
/// still inside its window is left alone no matter its state. The result
/// order follows the input order, so repeated sweeps are deterministic.
pub fn expired_transitions(now: DisplayHour, reservations_for_date: &[Reservation]) -> Vec<Transition> {
    let mut transitions = Vec::new();

    for r in reservations_for_date {
        if r.range.end() > now {
            continue;
        }
        match r.status {
            ReservationStatus::CheckedIn => transitions.push(Transition {
                reservation_id: r.id,
                device_id: r.device_id,
                to: ReservationStatus::Completed,
                device: DeviceTransition::Release,
            }),
            ReservationStatus::Approved => transitions.push(Transition {
                reservation_id: r.id,
                device_id: r.device_id,
                to: ReservationStatus::NoShow,
                device: DeviceTransition::None,
            }),
            _ => {}
        }
    }

    if !transitions.is_empty() {
        log::debug!("expiry sweep at {}: {} transitions due", now, transitions.len());
    }
    transitions
}
