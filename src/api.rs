//! Public API surface for the scheduling engine.
//!
//! This file consolidates the types callers work with: the error taxonomy,
//! the domain entities and the result types of the service operations.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::event::{
    EventCategory, Horizon, Provenance, RecurrenceRule, ScheduleEvent, ScheduleEventId,
};
pub use crate::models::reservation::{
    Device, DeviceId, DeviceStatus, Reservation, ReservationId, ReservationStatus,
};
pub use crate::models::snapshot::{parse_snapshot_json_str, DateSnapshot};
pub use crate::models::time::{business_date, DisplayHour, TimeRange};

pub use crate::services::availability::{ConflictPair, StatusAnomaly, StatusReport};
pub use crate::services::event_sync::{SyncAction, SyncPlan};
pub use crate::services::expiry::{DeviceTransition, Transition};
pub use crate::services::generator::{GenerationOutcome, SkipReason, SkippedDate, SlotKind};

use serde::{Deserialize, Serialize};

/// Result type for engine operations.
pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Error taxonomy of the engine.
///
/// Every fallible operation returns one of these three kinds so callers can
/// branch without string matching. Anomalies in already-stored data (e.g.
/// two reservations both covering "now") are NOT errors: availability reads
/// resolve them deterministically and surface a flag instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchedulingError {
    /// Malformed input: out-of-range hour, empty recurrence rule, wrong
    /// reservation state for the requested operation.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Overlap detected where the operation requires exclusivity.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// A referenced entity is absent from the supplied snapshot or store.
    #[error("not found: {message}")]
    NotFound { message: String },
}

impl SchedulingError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_branchable() {
        let err = SchedulingError::validation("bad hour");
        assert!(matches!(err, SchedulingError::Validation { .. }));

        let err = SchedulingError::conflict("overlap");
        assert!(matches!(err, SchedulingError::Conflict { .. }));

        let err = SchedulingError::not_found("device");
        assert!(matches!(err, SchedulingError::NotFound { .. }));
    }

    #[test]
    fn test_error_serde_tags() {
        let err = SchedulingError::conflict("double booking");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"kind\":\"conflict\""));
    }
}
