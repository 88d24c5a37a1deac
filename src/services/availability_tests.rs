use chrono::NaiveDate;
use uuid::Uuid;

use crate::api::SchedulingError;
use crate::models::reservation::{
    Device, DeviceId, DeviceStatus, Reservation, ReservationId, ReservationStatus,
};
use crate::models::time::{DisplayHour, TimeRange};
use crate::services::availability::*;

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 23).unwrap()
}

fn test_device(status: DeviceStatus) -> Device {
    Device::new(DeviceId::new(Uuid::new_v4()), "cabinet", status)
}

fn reservation(
    device: &Device,
    start_raw: u8,
    end_raw: u8,
    status: ReservationStatus,
) -> Reservation {
    Reservation::new(
        ReservationId::new(Uuid::new_v4()),
        device.id,
        test_date(),
        TimeRange::normalize(start_raw, end_raw).unwrap(),
        status,
    )
}

fn at(raw_hour: u8) -> DisplayHour {
    DisplayHour::from_raw(raw_hour).unwrap()
}

#[test]
fn test_status_rental_during_reservation() {
    let device = test_device(DeviceStatus::Available);
    let reservations = vec![reservation(&device, 9, 11, ReservationStatus::Approved)];

    let report = compute_status(&device, &reservations, at(10));
    assert_eq!(report.status, DeviceStatus::Rental);
    assert!(report.anomalies.is_empty());
}

#[test]
fn test_status_available_after_reservation() {
    let device = test_device(DeviceStatus::Available);
    let reservations = vec![reservation(&device, 9, 11, ReservationStatus::Approved)];

    let report = compute_status(&device, &reservations, at(12));
    assert_eq!(report.status, DeviceStatus::Available);
}

#[test]
fn test_status_end_hour_is_exclusive() {
    let device = test_device(DeviceStatus::Available);
    let reservations = vec![reservation(&device, 9, 11, ReservationStatus::Approved)];

    let report = compute_status(&device, &reservations, at(11));
    assert_eq!(report.status, DeviceStatus::Available);
}

#[test]
fn test_maintenance_wins_over_occupancy() {
    let device = test_device(DeviceStatus::Maintenance);
    let reservations = vec![reservation(&device, 9, 11, ReservationStatus::CheckedIn)];

    let report = compute_status(&device, &reservations, at(10));
    assert_eq!(report.status, DeviceStatus::Maintenance);
    assert!(report.anomalies.is_empty());
}

#[test]
fn test_disabled_wins_over_occupancy() {
    let device = test_device(DeviceStatus::Disabled);
    let reservations = vec![reservation(&device, 9, 11, ReservationStatus::Approved)];

    let report = compute_status(&device, &reservations, at(10));
    assert_eq!(report.status, DeviceStatus::Disabled);
}

#[test]
fn test_non_occupying_statuses_ignored() {
    let device = test_device(DeviceStatus::Available);
    let reservations = vec![
        reservation(&device, 9, 11, ReservationStatus::Cancelled),
        reservation(&device, 9, 11, ReservationStatus::Completed),
        reservation(&device, 9, 11, ReservationStatus::NoShow),
    ];

    let report = compute_status(&device, &reservations, at(10));
    assert_eq!(report.status, DeviceStatus::Available);
}

#[test]
fn test_overlapping_now_is_soft_anomaly() {
    let device = test_device(DeviceStatus::Available);
    let first = reservation(&device, 9, 12, ReservationStatus::Approved);
    let second = reservation(&device, 10, 13, ReservationStatus::CheckedIn);
    let reservations = vec![first.clone(), second.clone()];

    let report = compute_status(&device, &reservations, at(11));
    assert_eq!(report.status, DeviceStatus::Rental);
    assert_eq!(
        report.anomalies,
        vec![StatusAnomaly::OverlappingNow {
            winner: first.id,
            also_matched: vec![second.id],
        }]
    );
}

#[test]
fn test_other_devices_do_not_count() {
    let device = test_device(DeviceStatus::Available);
    let other = test_device(DeviceStatus::Available);
    let reservations = vec![reservation(&other, 9, 11, ReservationStatus::Approved)];

    let report = compute_status(&device, &reservations, at(10));
    assert_eq!(report.status, DeviceStatus::Available);
}

#[test]
fn test_overnight_reservation_occupies_late_hours() {
    let device = test_device(DeviceStatus::Available);
    // 22:00 to 05:00 → display 22..29
    let reservations = vec![reservation(&device, 22, 5, ReservationStatus::CheckedIn)];

    // 02:00 → display 26, inside the window
    let report = compute_status(&device, &reservations, at(2));
    assert_eq!(report.status, DeviceStatus::Rental);
}

fn window() -> TimeRange {
    TimeRange::from_display(10, 29).unwrap()
}

#[test]
fn test_free_ranges_empty_schedule() {
    let device = test_device(DeviceStatus::Available);
    let free = free_ranges(&device, &[], &window());
    assert_eq!(free, vec![window()]);
}

#[test]
fn test_free_ranges_single_booking() {
    let device = test_device(DeviceStatus::Available);
    let reservations = vec![reservation(&device, 12, 14, ReservationStatus::Approved)];

    let free = free_ranges(&device, &reservations, &window());
    assert_eq!(
        free,
        vec![
            TimeRange::from_display(10, 12).unwrap(),
            TimeRange::from_display(14, 29).unwrap(),
        ]
    );
}

#[test]
fn test_free_ranges_merges_adjacent_bookings() {
    let device = test_device(DeviceStatus::Available);
    let reservations = vec![
        reservation(&device, 12, 14, ReservationStatus::Approved),
        reservation(&device, 14, 16, ReservationStatus::Pending),
    ];

    let free = free_ranges(&device, &reservations, &window());
    assert_eq!(
        free,
        vec![
            TimeRange::from_display(10, 12).unwrap(),
            TimeRange::from_display(16, 29).unwrap(),
        ]
    );
}

#[test]
fn test_free_ranges_booking_at_window_edge() {
    let device = test_device(DeviceStatus::Available);
    // 22:00-05:00 occupies display 22..29, flush with the window end
    let reservations = vec![reservation(&device, 22, 5, ReservationStatus::Approved)];

    let free = free_ranges(&device, &reservations, &window());
    assert_eq!(free, vec![TimeRange::from_display(10, 22).unwrap()]);
}

#[test]
fn test_free_ranges_maintenance_device_has_none() {
    let device = test_device(DeviceStatus::Maintenance);
    let free = free_ranges(&device, &[], &window());
    assert!(free.is_empty());
}

#[test]
fn test_free_ranges_clips_to_window() {
    let device = test_device(DeviceStatus::Available);
    // Early rental 06:00-11:00 starts before the 10..29 window opens
    let reservations = vec![reservation(&device, 6, 11, ReservationStatus::Approved)];

    let free = free_ranges(&device, &reservations, &window());
    assert_eq!(free, vec![TimeRange::from_display(11, 29).unwrap()]);
}

#[test]
fn test_complement_law() {
    let device = test_device(DeviceStatus::Available);
    let reservations = vec![
        reservation(&device, 12, 14, ReservationStatus::Approved),
        reservation(&device, 18, 20, ReservationStatus::CheckedIn),
    ];
    let window = window();

    let free = free_ranges(&device, &reservations, &window);
    let occupied = merge_occupied(device.id, &reservations, &window);

    let covered: u8 = free
        .iter()
        .chain(occupied.iter())
        .map(|r| r.duration_hours())
        .sum();
    assert_eq!(covered, window.duration_hours());

    for f in &free {
        for o in &occupied {
            assert!(!f.overlaps(o), "free {} overlaps occupied {}", f, o);
        }
    }
}

#[test]
fn test_detect_conflicts_reports_overlapping_pair() {
    let device = test_device(DeviceStatus::Available);
    let a = reservation(&device, 10, 12, ReservationStatus::Approved);
    let b = reservation(&device, 11, 13, ReservationStatus::Approved);
    let reservations = vec![a.clone(), b.clone()];

    let conflicts = detect_conflicts(&reservations);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].device_id, device.id);
    assert_eq!(conflicts[0].first, a.id);
    assert_eq!(conflicts[0].second, b.id);
}

#[test]
fn test_detect_conflicts_empty_for_disjoint_ranges() {
    let device = test_device(DeviceStatus::Available);
    let reservations = vec![
        reservation(&device, 10, 12, ReservationStatus::Approved),
        reservation(&device, 12, 14, ReservationStatus::Approved),
    ];

    assert!(detect_conflicts(&reservations).is_empty());
}

#[test]
fn test_detect_conflicts_ignores_cancelled() {
    let device = test_device(DeviceStatus::Available);
    let reservations = vec![
        reservation(&device, 10, 12, ReservationStatus::Approved),
        reservation(&device, 11, 13, ReservationStatus::Cancelled),
    ];

    assert!(detect_conflicts(&reservations).is_empty());
}

#[test]
fn test_detect_conflicts_scoped_per_device() {
    let a = test_device(DeviceStatus::Available);
    let b = test_device(DeviceStatus::Available);
    let reservations = vec![
        reservation(&a, 10, 12, ReservationStatus::Approved),
        reservation(&b, 11, 13, ReservationStatus::Approved),
    ];

    assert!(detect_conflicts(&reservations).is_empty());
}

#[test]
fn test_validate_candidate_rejects_overlap() {
    let device = test_device(DeviceStatus::Available);
    let reservations = vec![reservation(&device, 10, 12, ReservationStatus::Approved)];

    let proposed = TimeRange::normalize(11, 13).unwrap();
    let err = validate_candidate(device.id, &proposed, &reservations).unwrap_err();
    assert!(matches!(err, SchedulingError::Conflict { .. }));
}

#[test]
fn test_validate_candidate_accepts_adjacent() {
    let device = test_device(DeviceStatus::Available);
    let reservations = vec![reservation(&device, 10, 12, ReservationStatus::Approved)];

    let proposed = TimeRange::normalize(12, 14).unwrap();
    assert!(validate_candidate(device.id, &proposed, &reservations).is_ok());
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_ranges() -> impl Strategy<Value = Vec<(u8, u8)>> {
        proptest::collection::vec(
            (10u8..28).prop_flat_map(|s| (Just(s), (s + 1)..29)),
            0..6,
        )
    }

    proptest! {
        #[test]
        fn complement_always_covers_window(ranges in arb_ranges()) {
            let device = test_device(DeviceStatus::Available);
            let reservations: Vec<Reservation> = ranges
                .iter()
                .map(|(s, e)| {
                    Reservation::new(
                        ReservationId::new(Uuid::new_v4()),
                        device.id,
                        test_date(),
                        TimeRange::from_display(*s, *e).unwrap(),
                        ReservationStatus::Approved,
                    )
                })
                .collect();
            let window = TimeRange::from_display(10, 29).unwrap();

            let free = free_ranges(&device, &reservations, &window);
            let occupied = merge_occupied(device.id, &reservations, &window);

            let covered: u8 = free
                .iter()
                .chain(occupied.iter())
                .map(TimeRange::duration_hours)
                .sum();
            prop_assert_eq!(covered, window.duration_hours());

            for f in &free {
                for o in &occupied {
                    prop_assert!(!f.overlaps(o));
                }
            }
        }
    }
}
