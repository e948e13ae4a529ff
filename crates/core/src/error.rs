use crate::role::Role;
use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{field} '{value}' is not a valid calendar date (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },
    #[error("end date {end} must not precede start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("role '{0}' may not generate schedules")]
    Forbidden(Role),

    #[error("requirements store unavailable ({path}): {source}", path = path.display())]
    StoreUnavailable {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid requirement record: {0}")]
    InvalidRequirement(String),
    #[error("wire format error: {0}")]
    Wire(#[from] rotation_wire::WireError),
    #[error("failed to read slot data: {0}")]
    FileRead(std::io::Error),

    #[error("failed to create slot storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write slot batch: {0}")]
    FileWrite(std::io::Error),
    #[error(
        "commit failed and cleanup also failed (path: {path}): commit={commit_error}; cleanup={cleanup_error}",
        path = path.display()
    )]
    CleanupAfterCommitFailed {
        path: std::path::PathBuf,
        #[source]
        commit_error: Box<SchedulingError>,
        cleanup_error: std::io::Error,
    },
}

/// Broad classification used by API layers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied bad input; nothing was computed.
    Validation,
    /// The caller's role may not perform the operation.
    Forbidden,
    /// The requirements store or slot storage could not be read.
    Upstream,
    /// Writing failed on our side.
    Internal,
}

impl SchedulingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::InvalidDate { .. } | Self::EndBeforeStart { .. } => {
                ErrorKind::Validation
            }
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::StoreUnavailable { .. }
            | Self::InvalidRequirement(_)
            | Self::Wire(_)
            | Self::FileRead(_) => ErrorKind::Upstream,
            Self::StorageDirCreation(_)
            | Self::FileWrite(_)
            | Self::CleanupAfterCommitFailed { .. } => ErrorKind::Internal,
        }
    }
}

pub type SchedulingResult<T> = std::result::Result<T, SchedulingError>;
