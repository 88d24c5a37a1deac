//! Repository traits and error types for the engine's storage boundary.
//!
//! The engine never constructs or issues queries; the host application
//! implements these narrow contracts over its database. Implementations
//! must provide the authoritative double-booking guarantee: the insert
//! path rejects overlapping occupying reservations even when the advisory
//! `detect_conflicts` check passed moments earlier.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;

use crate::api::SchedulingError;
use crate::models::event::{ScheduleEvent, ScheduleEventId};
use crate::models::reservation::{
    Device, DeviceId, DeviceStatus, Reservation, ReservationId, ReservationStatus,
};
use crate::models::time::TimeRange;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
///
/// Provides additional information about where and why an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "insert_reservation")
    pub operation: Option<String>,
    /// The entity type involved (e.g., "device", "schedule_event")
    pub entity: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether this error is retryable
    pub retryable: bool,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity type.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the entity ID.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Mark this error as retryable.
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Connection or backend availability errors.
    /// These are typically transient and may be retried.
    #[error("Connection error: {message} {context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// Requested entity was not found.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// The write would violate an exclusivity constraint
    /// (double-booked device, duplicate event).
    #[error("Conflict: {message} {context}")]
    Conflict {
        message: String,
        context: ErrorContext,
    },

    /// Data validation failed before or after the storage operation.
    #[error("Data validation error: {message} {context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a not found error with context.
    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a conflict error with context.
    pub fn conflict_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Conflict {
            message: message.into(),
            context,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::ValidationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::ConnectionError { context, .. }
            | Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::ValidationError { context, .. }
            | Self::InternalError { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }
}

impl From<SchedulingError> for RepositoryError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::Validation { message } => RepositoryError::validation(message),
            SchedulingError::Conflict { message } => RepositoryError::conflict(message),
            SchedulingError::NotFound { message } => RepositoryError::not_found(message),
        }
    }
}

/// Queries over the device registry.
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Fetch a device by id.
    async fn device_by_id(&self, id: DeviceId) -> RepositoryResult<Device>;

    /// All devices, in registry order.
    async fn list_devices(&self) -> RepositoryResult<Vec<Device>>;

    /// Persist a status flag change (maintenance toggles, expiry release).
    async fn set_device_status(&self, id: DeviceId, status: DeviceStatus)
        -> RepositoryResult<()>;
}

/// Queries over the reservation store.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// All reservations on a business date, any device, any status.
    async fn reservations_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Reservation>>;

    /// Reservations for one device on a date, restricted to a status set.
    async fn reservations_for_device(
        &self,
        device_id: DeviceId,
        date: NaiveDate,
        statuses: &[ReservationStatus],
    ) -> RepositoryResult<Vec<Reservation>>;

    /// Insert a new reservation.
    ///
    /// Implementations MUST reject inserts whose window overlaps an
    /// existing occupying reservation for the same device and date with
    /// [`RepositoryError::Conflict`]. This is the authoritative guarantee;
    /// the engine's advisory check does not close the race.
    async fn insert_reservation(&self, reservation: &Reservation) -> RepositoryResult<()>;

    /// Persist a reservation status transition.
    async fn set_reservation_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> RepositoryResult<()>;
}

/// Queries over the schedule-event store.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// All schedule events on a date.
    async fn events_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<ScheduleEvent>>;

    /// Insert a new schedule event.
    async fn insert_event(&self, event: &ScheduleEvent) -> RepositoryResult<()>;

    /// Rewrite an event's window.
    async fn update_event_range(
        &self,
        id: ScheduleEventId,
        range: TimeRange,
    ) -> RepositoryResult<()>;

    /// Delete one event. Explicit per-row deletion is allowed for any
    /// provenance; bulk operations are not.
    async fn delete_event(&self, id: ScheduleEventId) -> RepositoryResult<()>;

    /// Replace the auto-generated events of a date with a new set,
    /// returning how many rows were removed. Manual and locked events are
    /// never touched.
    async fn replace_auto_events(
        &self,
        date: NaiveDate,
        events: &[ScheduleEvent],
    ) -> RepositoryResult<usize>;
}

/// Full storage surface the engine's callers need.
pub trait VenueRepository: DeviceRepository + ReservationRepository + EventRepository {}

impl<T: DeviceRepository + ReservationRepository + EventRepository> VenueRepository for T {}
