//! In-memory repository implementation.
//!
//! This module provides a memory-backed implementation of all repository
//! traits suitable for unit testing and local development. All data lives
//! in HashMaps behind an RwLock, giving fast, deterministic and isolated
//! execution. The insert path enforces the same exclusion constraint a
//! production backend declares on `(device, date, range)`.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::models::event::{ScheduleEvent, ScheduleEventId};
use crate::models::reservation::{
    Device, DeviceId, DeviceStatus, Reservation, ReservationId, ReservationStatus,
};
use crate::models::time::TimeRange;
use crate::store::repository::*;

/// In-memory venue repository.
///
/// # Example
/// ```
/// use gameplaza_sched::store::MemoryRepository;
///
/// let repo = MemoryRepository::new();
/// // Pre-populate with seed helpers, then hand it to the code under test.
/// ```
#[derive(Clone, Default)]
pub struct MemoryRepository {
    data: Arc<RwLock<MemoryData>>,
}

#[derive(Default)]
struct MemoryData {
    devices: HashMap<DeviceId, Device>,
    device_order: Vec<DeviceId>,
    reservations: HashMap<ReservationId, Reservation>,
    reservation_order: Vec<ReservationId>,
    events: HashMap<ScheduleEventId, ScheduleEvent>,
    event_order: Vec<ScheduleEventId>,
}

impl MemoryRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a device, replacing any previous row with the same id.
    pub fn seed_device(&self, device: Device) {
        let mut data = self.data.write().expect("memory store lock poisoned");
        if !data.devices.contains_key(&device.id) {
            data.device_order.push(device.id);
        }
        data.devices.insert(device.id, device);
    }

    /// Seed a reservation without constraint checks (for crafting
    /// inconsistent fixtures on purpose).
    pub fn seed_reservation(&self, reservation: Reservation) {
        let mut data = self.data.write().expect("memory store lock poisoned");
        if !data.reservations.contains_key(&reservation.id) {
            data.reservation_order.push(reservation.id);
        }
        data.reservations.insert(reservation.id, reservation);
    }

    /// Seed a schedule event.
    pub fn seed_event(&self, event: ScheduleEvent) {
        let mut data = self.data.write().expect("memory store lock poisoned");
        if !data.events.contains_key(&event.id) {
            data.event_order.push(event.id);
        }
        data.events.insert(event.id, event);
    }
}

#[async_trait]
impl DeviceRepository for MemoryRepository {
    async fn device_by_id(&self, id: DeviceId) -> RepositoryResult<Device> {
        let data = self.data.read().expect("memory store lock poisoned");
        data.devices.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("device {} not found", id),
                ErrorContext::new("device_by_id")
                    .with_entity("device")
                    .with_entity_id(id),
            )
        })
    }

    async fn list_devices(&self) -> RepositoryResult<Vec<Device>> {
        let data = self.data.read().expect("memory store lock poisoned");
        Ok(data
            .device_order
            .iter()
            .filter_map(|id| data.devices.get(id).cloned())
            .collect())
    }

    async fn set_device_status(
        &self,
        id: DeviceId,
        status: DeviceStatus,
    ) -> RepositoryResult<()> {
        let mut data = self.data.write().expect("memory store lock poisoned");
        match data.devices.get_mut(&id) {
            Some(device) => {
                device.status = status;
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("device {} not found", id),
                ErrorContext::new("set_device_status")
                    .with_entity("device")
                    .with_entity_id(id),
            )),
        }
    }
}

#[async_trait]
impl ReservationRepository for MemoryRepository {
    async fn reservations_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Reservation>> {
        let data = self.data.read().expect("memory store lock poisoned");
        Ok(data
            .reservation_order
            .iter()
            .filter_map(|id| data.reservations.get(id))
            .filter(|r| r.date == date)
            .cloned()
            .collect())
    }

    async fn reservations_for_device(
        &self,
        device_id: DeviceId,
        date: NaiveDate,
        statuses: &[ReservationStatus],
    ) -> RepositoryResult<Vec<Reservation>> {
        let data = self.data.read().expect("memory store lock poisoned");
        Ok(data
            .reservation_order
            .iter()
            .filter_map(|id| data.reservations.get(id))
            .filter(|r| {
                r.device_id == device_id && r.date == date && statuses.contains(&r.status)
            })
            .cloned()
            .collect())
    }

    async fn insert_reservation(&self, reservation: &Reservation) -> RepositoryResult<()> {
        let mut data = self.data.write().expect("memory store lock poisoned");

        if !data.devices.contains_key(&reservation.device_id) {
            return Err(RepositoryError::not_found_with_context(
                format!("device {} not found", reservation.device_id),
                ErrorContext::new("insert_reservation")
                    .with_entity("device")
                    .with_entity_id(reservation.device_id),
            ));
        }
        if data.reservations.contains_key(&reservation.id) {
            return Err(RepositoryError::conflict_with_context(
                format!("reservation {} already exists", reservation.id),
                ErrorContext::new("insert_reservation")
                    .with_entity("reservation")
                    .with_entity_id(reservation.id),
            ));
        }

        // Exclusion constraint: one device, one occupant per window.
        if reservation.is_occupying() {
            let clash = data
                .reservation_order
                .iter()
                .filter_map(|id| data.reservations.get(id))
                .find(|existing| {
                    existing.device_id == reservation.device_id
                        && existing.date == reservation.date
                        && existing.is_occupying()
                        && existing.range.overlaps(&reservation.range)
                });
            if let Some(existing) = clash {
                return Err(RepositoryError::conflict_with_context(
                    format!(
                        "window {} overlaps reservation {} ({})",
                        reservation.range, existing.id, existing.range
                    ),
                    ErrorContext::new("insert_reservation")
                        .with_entity("reservation")
                        .with_entity_id(reservation.id),
                ));
            }
        }

        data.reservation_order.push(reservation.id);
        data.reservations.insert(reservation.id, reservation.clone());
        Ok(())
    }

    async fn set_reservation_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> RepositoryResult<()> {
        let mut data = self.data.write().expect("memory store lock poisoned");
        match data.reservations.get_mut(&id) {
            Some(reservation) => {
                reservation.status = status;
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("reservation {} not found", id),
                ErrorContext::new("set_reservation_status")
                    .with_entity("reservation")
                    .with_entity_id(id),
            )),
        }
    }
}

#[async_trait]
impl EventRepository for MemoryRepository {
    async fn events_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<ScheduleEvent>> {
        let data = self.data.read().expect("memory store lock poisoned");
        Ok(data
            .event_order
            .iter()
            .filter_map(|id| data.events.get(id))
            .filter(|e| e.date == date)
            .cloned()
            .collect())
    }

    async fn insert_event(&self, event: &ScheduleEvent) -> RepositoryResult<()> {
        let mut data = self.data.write().expect("memory store lock poisoned");
        if data.events.contains_key(&event.id) {
            return Err(RepositoryError::conflict_with_context(
                format!("schedule event {} already exists", event.id),
                ErrorContext::new("insert_event")
                    .with_entity("schedule_event")
                    .with_entity_id(event.id),
            ));
        }
        data.event_order.push(event.id);
        data.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn update_event_range(
        &self,
        id: ScheduleEventId,
        range: TimeRange,
    ) -> RepositoryResult<()> {
        let mut data = self.data.write().expect("memory store lock poisoned");
        match data.events.get_mut(&id) {
            Some(event) => {
                event.range = range;
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("schedule event {} not found", id),
                ErrorContext::new("update_event_range")
                    .with_entity("schedule_event")
                    .with_entity_id(id),
            )),
        }
    }

    async fn delete_event(&self, id: ScheduleEventId) -> RepositoryResult<()> {
        let mut data = self.data.write().expect("memory store lock poisoned");
        if data.events.remove(&id).is_none() {
            return Err(RepositoryError::not_found_with_context(
                format!("schedule event {} not found", id),
                ErrorContext::new("delete_event")
                    .with_entity("schedule_event")
                    .with_entity_id(id),
            ));
        }
        data.event_order.retain(|&e| e != id);
        Ok(())
    }

    async fn replace_auto_events(
        &self,
        date: NaiveDate,
        events: &[ScheduleEvent],
    ) -> RepositoryResult<usize> {
        for event in events {
            if event.is_protected() {
                return Err(RepositoryError::validation(format!(
                    "bulk replacement may not introduce protected event {}",
                    event.id
                )));
            }
            if event.date != date {
                return Err(RepositoryError::validation(format!(
                    "event {} is dated {}, replacement covers {}",
                    event.id, event.date, date
                )));
            }
        }

        let mut data = self.data.write().expect("memory store lock poisoned");

        let removable: Vec<ScheduleEventId> = data
            .event_order
            .iter()
            .filter_map(|id| data.events.get(id))
            .filter(|e| e.date == date && !e.is_protected())
            .map(|e| e.id)
            .collect();
        for id in &removable {
            data.events.remove(id);
        }
        data.event_order.retain(|id| !removable.contains(id));

        for event in events {
            data.event_order.push(event.id);
            data.events.insert(event.id, event.clone());
        }

        Ok(removable.len())
    }
}
