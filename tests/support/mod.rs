//! Shared fixtures for the integration suites.
#![allow(dead_code)] // each test binary uses a different subset

use chrono::NaiveDate;
use uuid::Uuid;

use gameplaza_sched::api::{
    Device, DeviceId, DeviceStatus, Reservation, ReservationId, ReservationStatus, TimeRange,
};
use gameplaza_sched::store::MemoryRepository;

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 23).unwrap()
}

pub fn cabinet(status: DeviceStatus) -> Device {
    Device::new(DeviceId::new(Uuid::new_v4()), "cabinet", status)
}

pub fn reservation_on(
    device: &Device,
    date: NaiveDate,
    start_raw: u8,
    end_raw: u8,
    status: ReservationStatus,
) -> Reservation {
    Reservation::new(
        ReservationId::new(Uuid::new_v4()),
        device.id,
        date,
        TimeRange::normalize(start_raw, end_raw).unwrap(),
        status,
    )
}

pub fn reservation(
    device: &Device,
    start_raw: u8,
    end_raw: u8,
    status: ReservationStatus,
) -> Reservation {
    reservation_on(device, test_date(), start_raw, end_raw, status)
}

/// A repository with one available cabinet seeded.
pub fn repo_with_device() -> (MemoryRepository, Device) {
    let repo = MemoryRepository::new();
    let device = cabinet(DeviceStatus::Available);
    repo.seed_device(device.clone());
    (repo, device)
}
