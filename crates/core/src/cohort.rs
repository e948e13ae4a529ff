//! Student-year cohorts.

use crate::error::{SchedulingError, SchedulingResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A student-year group with its own per-department hour requirements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    First,
    Second,
    Third,
    Fourth,
}

impl Cohort {
    pub const ALL: [Cohort; 4] = [Self::First, Self::Second, Self::Third, Self::Fourth];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
        }
    }

    /// Parses the lowercase cohort name after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidInput`] for blank or unknown names.
    pub fn parse(input: &str) -> SchedulingResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SchedulingError::InvalidInput("cohort is required".into()));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == trimmed)
            .ok_or_else(|| {
                SchedulingError::InvalidInput(format!(
                    "unknown cohort '{trimmed}' (expected first, second, third or fourth)"
                ))
            })
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cohort {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_cohort_name() {
        for cohort in Cohort::ALL {
            assert_eq!(Cohort::parse(cohort.as_str()).unwrap(), cohort);
        }
        assert_eq!(Cohort::parse(" third ").unwrap(), Cohort::Third);
    }

    #[test]
    fn rejects_unknown_and_blank_names() {
        assert!(matches!(
            Cohort::parse("fifth"),
            Err(SchedulingError::InvalidInput(_))
        ));
        assert!(matches!(
            Cohort::parse("Third"),
            Err(SchedulingError::InvalidInput(_))
        ));
        assert!(matches!(
            Cohort::parse("  "),
            Err(SchedulingError::InvalidInput(_))
        ));
    }
}
