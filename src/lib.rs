//! # GamePlaza Scheduling Engine
//!
//! Reservation scheduling core for a physical gaming venue.
//!
//! This crate provides the pure scheduling logic behind the GamePlaza
//! reservation system: display-hour time handling, device availability
//! computation, and business-hours schedule generation. The surrounding
//! application (HTTP layer, persistent database, notification delivery)
//! consumes the engine through direct calls and persists its outputs.
//!
//! ## Features
//!
//! - **Time Model**: the venue's extended-hour clock, where 00:00–05:59
//!   display as 24:00–29:59 so overnight sessions stay attached to the
//!   previous business day
//! - **Availability**: device status derivation, free-slot computation and
//!   advisory double-booking detection over reservation snapshots
//! - **Schedule Generation**: auto-derived early-open/overnight business
//!   blocks from approved reservations and recurring rules, with
//!   idempotent batch behavior
//! - **Reconciliation**: pure sync plans that keep auto-generated events in
//!   step with the reservations of a date
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: consolidated public types and the error taxonomy
//! - [`models`]: time model and domain entities (devices, reservations,
//!   schedule events, recurrence rules)
//! - [`services`]: pure business logic over in-memory snapshots
//! - [`store`]: repository traits the host application implements, plus an
//!   in-memory backend for tests and local development
//!
//! Every operation takes a snapshot of external data as input and returns a
//! value; the engine performs no I/O and holds no global state. Concurrency
//! control around persistence (closing the check-then-insert race) belongs
//! to the storage layer behind the [`store`] traits.

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod store;
