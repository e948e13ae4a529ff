//! Application roles, as far as schedule generation is concerned.

use crate::error::{SchedulingError, SchedulingResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Tutor,
    NursingHead,
    HospitalAdmin,
    Principal,
}

impl Role {
    const ALL: [Role; 5] = [
        Self::Student,
        Self::Tutor,
        Self::NursingHead,
        Self::HospitalAdmin,
        Self::Principal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Tutor => "tutor",
            Self::NursingHead => "nursing_head",
            Self::HospitalAdmin => "hospital_admin",
            Self::Principal => "principal",
        }
    }

    /// Only hospital administrators manage the rotation schedule.
    pub fn may_generate_schedules(self) -> bool {
        matches!(self, Self::HospitalAdmin)
    }

    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidInput`] for unknown role names.
    pub fn parse(input: &str) -> SchedulingResult<Self> {
        let trimmed = input.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == trimmed)
            .ok_or_else(|| SchedulingError::InvalidInput(format!("unknown role '{trimmed}'")))
    }

    pub(crate) fn ensure_may_generate(self) -> SchedulingResult<()> {
        if self.may_generate_schedules() {
            Ok(())
        } else {
            Err(SchedulingError::Forbidden(self))
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
