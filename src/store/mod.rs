//! Storage boundary of the scheduling engine.
//!
//! This module provides abstractions for persistence via the Repository
//! pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Host Application (approval flow, cron triggers, API)   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - fetch, compute, persist  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository.rs)                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │            Memory Repository                  │
//!     │        (tests / local development)            │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The engine itself stays pure; everything async and fallible lives on
//! this side of the boundary. Production deployments implement the traits
//! over their own database and get the same service-layer flows.
//!
//! The authoritative no-double-booking guarantee lives here, not in the
//! engine: `insert_reservation` must reject overlapping occupying windows
//! (the memory backend does; a SQL backend would use an exclusion
//! constraint or serializable transaction).

pub mod repository;
pub mod services;

#[cfg(feature = "memory-store")]
pub mod memory;

#[cfg(feature = "memory-store")]
pub use memory::MemoryRepository;

pub use repository::{
    DeviceRepository, ErrorContext, EventRepository, RepositoryError, RepositoryResult,
    ReservationRepository, VenueRepository,
};
pub use services::{
    apply_sync_plan, book_reservation, device_status, record_generated_events, run_expiry_sweep,
    sync_date,
};
