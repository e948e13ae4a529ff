//! On-disk wire formats for rotation scheduling data.
//!
//! This crate owns the exact YAML shapes read and written by the file-backed stores:
//! - `requirements.yaml`: departments plus per-cohort hour requirements
//! - `batch.yaml`: one committed batch of schedule slots
//!
//! Each format has a strict wire struct (unknown keys rejected) and a domain-level carrier that
//! the core crate consumes. Translation between the two validates identifiers, dates and times.
//! Cohort names and hour values are passed through as read; their business rules live in core.

pub mod requirements;
pub mod slot_batch;

pub use requirements::{DepartmentData, RequirementData, RequirementsData, RequirementsFile};
pub use slot_batch::{SlotBatch, SlotBatchData, SlotRecordData};

use serde::de::DeserializeOwned;

/// Calendar dates are exchanged as ISO 8601 (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shift boundaries are exchanged as `HH:MM`.
pub const TIME_FORMAT: &str = "%H:%M";

/// Errors returned by the wire-format crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

pub type WireResult<T> = Result<T, WireError>;

/// Deserialises YAML into `T`, reporting the path of the first field that does not match.
fn parse_strict<T: DeserializeOwned>(yaml_text: &str, what: &str) -> WireResult<T> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    serde_path_to_error::deserialize::<_, T>(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        WireError::Translation(format!("{what} schema mismatch at {path}: {source}"))
    })
}
