//! `batch.yaml`: one committed batch of schedule slots.
//!
//! A batch is written exactly once, when a generated schedule is committed, and then read back
//! when slots are listed. Identifiers are canonical record ids assigned at commit time.

use crate::{parse_strict, WireError, WireResult, DATE_FORMAT, TIME_FORMAT};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rotation_ids::RecordId;
use rotation_types::NonEmptyText;
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Domain-level carrier for a committed batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotBatchData {
    pub batch_id: RecordId,
    pub committed_at: DateTime<Utc>,
    pub slots: Vec<SlotRecordData>,
}

/// One persisted slot inside a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotRecordData {
    pub id: RecordId,
    pub department_id: NonEmptyText,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: u32,
    pub booked_count: u32,
}

// ============================================================================
// Public SlotBatch operations
// ============================================================================

/// Slot batch file operations.
pub struct SlotBatch;

impl SlotBatch {
    /// Parses a batch file.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if:
    /// - the YAML does not match the schema,
    /// - an identifier is not a canonical record id,
    /// - a date, time or timestamp does not parse,
    /// - a slot ends before it starts.
    pub fn parse(yaml_text: &str) -> WireResult<SlotBatchData> {
        let wire: SlotBatchWire = parse_strict(yaml_text, "Slot batch")?;
        wire_to_domain(wire)
    }

    /// Renders a batch as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Translation`] if serialisation fails.
    pub fn render(data: &SlotBatchData) -> WireResult<String> {
        serde_yaml::to_string(&domain_to_wire(data))
            .map_err(|e| WireError::Translation(format!("Failed to serialise slot batch: {e}")))
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct SlotBatchWire {
    batch_id: String,
    committed_at: String,
    slots: Vec<SlotRecordWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct SlotRecordWire {
    id: String,
    department_id: String,
    date: String,
    start_time: String,
    end_time: String,
    capacity: u32,
    booked_count: u32,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn record_id(value: &str, field: &str) -> WireResult<RecordId> {
    RecordId::parse(value).map_err(|e| WireError::InvalidId(format!("{field}: {e}")))
}

fn time(value: &str, field: &str) -> WireResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|e| WireError::Translation(format!("{field} '{value}' is not HH:MM: {e}")))
}

fn wire_to_domain(wire: SlotBatchWire) -> WireResult<SlotBatchData> {
    let batch_id = record_id(&wire.batch_id, "batch_id")?;
    let committed_at = DateTime::parse_from_rfc3339(&wire.committed_at)
        .map_err(|e| {
            WireError::Translation(format!(
                "committed_at '{}' is not RFC 3339: {e}",
                wire.committed_at
            ))
        })?
        .with_timezone(&Utc);

    let slots = wire
        .slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            let prefix = format!("slots[{index}]");
            let date = NaiveDate::parse_from_str(&slot.date, DATE_FORMAT).map_err(|e| {
                WireError::Translation(format!("{prefix}.date '{}' is invalid: {e}", slot.date))
            })?;
            let start_time = time(&slot.start_time, &format!("{prefix}.start_time"))?;
            let end_time = time(&slot.end_time, &format!("{prefix}.end_time"))?;
            if end_time <= start_time {
                return Err(WireError::Translation(format!(
                    "{prefix} ends at {} before it starts at {}",
                    slot.end_time, slot.start_time
                )));
            }
            Ok(SlotRecordData {
                id: record_id(&slot.id, &format!("{prefix}.id"))?,
                department_id: NonEmptyText::new(&slot.department_id).map_err(|_| {
                    WireError::InvalidId(format!("{prefix}.department_id cannot be blank"))
                })?,
                date,
                start_time,
                end_time,
                capacity: slot.capacity,
                booked_count: slot.booked_count,
            })
        })
        .collect::<WireResult<Vec<_>>>()?;

    Ok(SlotBatchData {
        batch_id,
        committed_at,
        slots,
    })
}

fn domain_to_wire(data: &SlotBatchData) -> SlotBatchWire {
    SlotBatchWire {
        batch_id: data.batch_id.to_string(),
        committed_at: data.committed_at.to_rfc3339(),
        slots: data
            .slots
            .iter()
            .map(|s| SlotRecordWire {
                id: s.id.to_string(),
                department_id: s.department_id.to_string(),
                date: s.date.format(DATE_FORMAT).to_string(),
                start_time: s.start_time.format(TIME_FORMAT).to_string(),
                end_time: s.end_time.format(TIME_FORMAT).to_string(),
                capacity: s.capacity,
                booked_count: s.booked_count,
            })
            .collect(),
    }
}
