//! Devices and reservations as the engine sees them.
//!
//! Both entities are owned by the external store; the engine reads
//! snapshots and returns derived values, never mutating them directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::define_id_type;
use crate::models::time::TimeRange;

define_id_type!(Uuid, DeviceId);
define_id_type!(Uuid, ReservationId);

/// Device status vocabulary.
///
/// `Maintenance` and `Disabled` are authoritative flags set by staff and
/// always win over computed occupancy. `Rental` is only ever produced by
/// the availability calculator, never stored as an input flag by callers
/// that follow the contract (legacy rows carrying it are recomputed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Available,
    Rental,
    Maintenance,
    Disabled,
}

impl DeviceStatus {
    /// Whether this stored status overrides any computed occupancy.
    pub fn is_authoritative(&self) -> bool {
        matches!(self, DeviceStatus::Maintenance | DeviceStatus::Disabled)
    }
}

/// A rentable machine in the venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// Device category (e.g. a cabinet model); owned by the registry.
    pub device_type: String,
    pub status: DeviceStatus,
}

impl Device {
    pub fn new(id: DeviceId, device_type: impl Into<String>, status: DeviceStatus) -> Self {
        Self {
            id,
            device_type: device_type.into(),
            status,
        }
    }
}

/// Reservation lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Approved,
    CheckedIn,
    Completed,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    /// The states that count toward device busy-time, for status-set queries.
    pub const OCCUPYING: [ReservationStatus; 3] = [
        ReservationStatus::Pending,
        ReservationStatus::Approved,
        ReservationStatus::CheckedIn,
    ];

    /// Whether a reservation in this state counts toward device busy-time.
    pub fn is_occupying(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Approved | ReservationStatus::CheckedIn
        )
    }
}

/// A booking of one device for a window on one business date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub device_id: DeviceId,
    /// Business date, venue-local.
    pub date: NaiveDate,
    pub range: TimeRange,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn new(
        id: ReservationId,
        device_id: DeviceId,
        date: NaiveDate,
        range: TimeRange,
        status: ReservationStatus,
    ) -> Self {
        Self {
            id,
            device_id,
            date,
            range,
            status,
        }
    }

    pub fn is_occupying(&self) -> bool {
        self.status.is_occupying()
    }
}
