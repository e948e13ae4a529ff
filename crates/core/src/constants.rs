//! Constants used throughout the rotation core crate.

/// Length of one shift in hours. Every generated slot represents exactly one shift.
pub const SHIFT_HOURS: u32 = 6;

/// Capacity applied when a department record has no explicit (or a zero) capacity.
pub const DEFAULT_DEPARTMENT_CAPACITY: u32 = 10;

/// Longest date window, in days, a generation request may cover.
pub const MAX_WINDOW_DAYS: i64 = 366;

/// Default directory for rotation data when no explicit directory is configured.
pub const DEFAULT_ROTATION_DATA_DIR: &str = "rotation_data";

/// Filename of the departments/requirements document inside the data directory.
pub const REQUIREMENTS_FILENAME: &str = "requirements.yaml";

/// Directory name for committed slot batches.
pub const SLOTS_DIR_NAME: &str = "slots";

/// Filename of a committed batch inside its sharded batch directory.
pub const BATCH_FILENAME: &str = "batch.yaml";

pub use rotation_wire::{DATE_FORMAT, TIME_FORMAT};
