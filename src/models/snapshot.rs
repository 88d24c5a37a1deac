// ============================================================================
// Snapshot Parsing Functions
// ============================================================================
//
// Batch jobs and the integration suite feed the engine with JSON snapshots
// of one business date. Parsing validates the payload shape up front and
// fills in a content checksum for change detection.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::event::ScheduleEvent;
use crate::models::reservation::{Device, Reservation};

/// Everything the engine needs to answer questions about one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateSnapshot {
    pub date: NaiveDate,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
    #[serde(default)]
    pub events: Vec<ScheduleEvent>,
    /// SHA-256 of the source JSON; computed when absent.
    #[serde(default)]
    pub checksum: String,
}

impl DateSnapshot {
    /// Reservations belonging to one device, in input order.
    pub fn reservations_for_device(
        &self,
        device_id: crate::models::reservation::DeviceId,
    ) -> Vec<&Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.device_id == device_id)
            .collect()
    }
}

fn validate_input_snapshot(snapshot_json: &str) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(snapshot_json).context("Invalid snapshot JSON")?;
    let has_date = value.as_object().and_then(|obj| obj.get("date")).is_some();
    if !has_date {
        anyhow::bail!("Missing required 'date' field");
    }
    Ok(())
}

/// Parse a date snapshot from a JSON string.
///
/// Reservations in the payload are checked against the snapshot date:
/// a row filed under a different business date means the caller assembled
/// the snapshot wrong, and the whole parse is rejected.
pub fn parse_snapshot_json_str(snapshot_json: &str) -> Result<DateSnapshot> {
    validate_input_snapshot(snapshot_json)?;

    let mut snapshot: DateSnapshot = serde_json::from_str(snapshot_json)
        .context("Failed to deserialize snapshot JSON using Serde")?;

    for reservation in &snapshot.reservations {
        if reservation.date != snapshot.date {
            anyhow::bail!(
                "Reservation {} is dated {} but the snapshot covers {}",
                reservation.id,
                reservation.date,
                snapshot.date
            );
        }
    }
    for event in &snapshot.events {
        if event.date != snapshot.date {
            anyhow::bail!(
                "Schedule event {} is dated {} but the snapshot covers {}",
                event.id,
                event.date,
                snapshot.date
            );
        }
    }

    if snapshot.checksum.is_empty() {
        snapshot.checksum = compute_snapshot_checksum(snapshot_json);
    }

    Ok(snapshot)
}

/// Compute a checksum for the snapshot JSON
fn compute_snapshot_checksum(json_str: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(json_str.as_bytes());
    hex::encode(hasher.finalize())
}
