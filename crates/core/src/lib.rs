//! # Rotation Core
//!
//! Core business logic for clinical rotation scheduling.
//!
//! This crate turns per-cohort department hour requirements into proposed schedule slots and
//! manages their storage:
//! - [`calendar`]: which days may receive slots
//! - [`generator`]: the deterministic slot allocation algorithm
//! - [`repositories`]: the requirements store and slot persistence, with file-backed adapters
//! - [`service`]: validation, permission checks and orchestration shared by every caller
//!
//! **No API concerns**: HTTP servers, authentication headers and CLI parsing belong in
//! `api-rest`, `api-shared` and `rotation-cli`.

pub mod calendar;
pub mod cohort;
pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod repositories;
pub mod role;
pub mod service;

pub use calendar::{candidate_days, is_blackout_day, DateWindow};
pub use cohort::Cohort;
pub use config::{data_dir_from_env_value, CoreConfig};
pub use error::{ErrorKind, SchedulingError, SchedulingResult};
pub use generator::{
    DepartmentAllocation, DepartmentRequirement, GenerationOutcome, ProposedSlot,
    ScheduleGenerator, Shift,
};
pub use repositories::requirements::{Department, FileRequirementsStore, RequirementsStore};
pub use repositories::slots::{
    CommittedBatch, FileSlotStore, ScheduleSlot, SlotFilter, SlotPersistence,
};
pub use role::Role;
pub use service::{CommitOutcome, GenerationRequest, SchedulingService};

pub use rotation_ids::RecordId;
pub use rotation_types::NonEmptyText;
