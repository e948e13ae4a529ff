//! Clinical rotation schedule generation.
//!
//! Given a cohort's department requirements and a date window, the generator proposes
//! fixed six-hour slots that cover each department's required hours:
//!
//! 1. Collect the window's candidate days (see [`crate::calendar`]).
//! 2. For each requirement, in the order supplied, walk the candidate days from the first,
//!    placing a morning slot per day and, when the department needs more than one slot per day
//!    on average, an afternoon slot on the same day.
//! 3. Concatenate the per-department lists.
//!
//! Generation is a pure function of its inputs. It never touches storage; committing a proposal
//! is the job of [`crate::repositories::slots::SlotPersistence`].

use crate::calendar::{candidate_days, DateWindow};
use crate::cohort::Cohort;
use crate::constants::{DEFAULT_DEPARTMENT_CAPACITY, SHIFT_HOURS, TIME_FORMAT};
use crate::error::{SchedulingError, SchedulingResult};
use crate::NonEmptyText;
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;

// ============================================================================
// SHIFTS
// ============================================================================

/// One of the two fixed daily shift windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    /// 08:00 to 14:00
    Morning,
    /// 14:00 to 20:00
    Afternoon,
}

impl Shift {
    fn start_hour(self) -> u32 {
        match self {
            Self::Morning => 8,
            Self::Afternoon => 14,
        }
    }

    pub fn start_time(self) -> NaiveTime {
        NaiveTime::default() + Duration::hours(i64::from(self.start_hour()))
    }

    pub fn end_time(self) -> NaiveTime {
        NaiveTime::default() + Duration::hours(i64::from(self.start_hour() + SHIFT_HOURS))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
        }
    }

    /// Maps persisted shift boundaries back to a shift, if they match one.
    pub fn from_times(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        [Self::Morning, Self::Afternoon]
            .into_iter()
            .find(|s| s.start_time() == start && s.end_time() == end)
    }
}

// ============================================================================
// INPUT AND OUTPUT TYPES
// ============================================================================

/// Hours a cohort must accrue in one department during the generation window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepartmentRequirement {
    pub department_id: NonEmptyText,
    pub department_name: Option<String>,
    pub cohort: Cohort,
    pub required_hours: f64,
    /// The department's own capacity, if its record carries one.
    pub department_capacity: Option<u32>,
}

impl DepartmentRequirement {
    /// Creates a requirement, rejecting negative or non-finite hours.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidRequirement`] if `required_hours` is negative, NaN or
    /// infinite.
    pub fn new(
        department_id: NonEmptyText,
        cohort: Cohort,
        required_hours: f64,
        department_capacity: Option<u32>,
    ) -> SchedulingResult<Self> {
        if !required_hours.is_finite() || required_hours < 0.0 {
            return Err(SchedulingError::InvalidRequirement(format!(
                "department '{department_id}' ({cohort}) has required_hours {required_hours}; \
                 expected a non-negative number"
            )));
        }
        Ok(Self {
            department_id,
            department_name: None,
            cohort,
            required_hours,
            department_capacity,
        })
    }

    pub fn with_department_name(mut self, name: Option<String>) -> Self {
        self.department_name = name;
        self
    }

    /// Per-slot capacity; an absent or zero department capacity falls back to the default.
    pub fn capacity(&self) -> u32 {
        match self.department_capacity {
            Some(capacity) if capacity > 0 => capacity,
            _ => DEFAULT_DEPARTMENT_CAPACITY,
        }
    }

    /// `ceil(required_hours / 6)`.
    pub fn slots_needed(&self) -> usize {
        // Saturating float-to-int conversion; `new` keeps the value finite and non-negative.
        (self.required_hours / f64::from(SHIFT_HOURS)).ceil() as usize
    }
}

/// A generated, not yet committed, schedule slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProposedSlot {
    pub department_id: NonEmptyText,
    pub date: NaiveDate,
    pub shift: Shift,
    pub capacity: u32,
    pub booked_count: u32,
}

impl ProposedSlot {
    pub fn start_time(&self) -> NaiveTime {
        self.shift.start_time()
    }

    pub fn end_time(&self) -> NaiveTime {
        self.shift.end_time()
    }

    /// `HH:MM` start label as exchanged with persistence.
    pub fn start_label(&self) -> String {
        self.start_time().format(TIME_FORMAT).to_string()
    }

    pub fn end_label(&self) -> String {
        self.end_time().format(TIME_FORMAT).to_string()
    }

    pub fn hours(&self) -> u32 {
        SHIFT_HOURS
    }
}

/// How one department's requirement was met.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DepartmentAllocation {
    pub department_id: NonEmptyText,
    pub slots_needed: usize,
    pub slots_created: usize,
    pub hours_allocated: u64,
}

impl DepartmentAllocation {
    /// True when the window ran out of candidate days before the requirement was met.
    pub fn under_filled(&self) -> bool {
        self.slots_created < self.slots_needed
    }
}

/// Result of one generation run.
///
/// The two empty variants are not failures: the input was valid but there is nothing to
/// schedule, and callers should say so rather than report an error.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Generated {
        slots: Vec<ProposedSlot>,
        allocations: Vec<DepartmentAllocation>,
    },
    NoRequirements {
        cohort: Cohort,
    },
    NoEligibleDays {
        window: DateWindow,
    },
}

impl GenerationOutcome {
    pub fn slots(&self) -> &[ProposedSlot] {
        match self {
            Self::Generated { slots, .. } => slots,
            Self::NoRequirements { .. } | Self::NoEligibleDays { .. } => &[],
        }
    }

    pub fn allocations(&self) -> &[DepartmentAllocation] {
        match self {
            Self::Generated { allocations, .. } => allocations,
            Self::NoRequirements { .. } | Self::NoEligibleDays { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    /// Human-readable summary suitable for a toast or CLI line.
    pub fn message(&self) -> String {
        match self {
            Self::Generated { slots, allocations } => {
                let short = allocations.iter().filter(|a| a.under_filled()).count();
                if short == 0 {
                    format!("Generated {} schedule slots.", slots.len())
                } else {
                    format!(
                        "Generated {} schedule slots; {short} department(s) could not be fully \
                         scheduled in this window.",
                        slots.len()
                    )
                }
            }
            Self::NoRequirements { cohort } => {
                format!("No department requirements found for {cohort} year students.")
            }
            Self::NoEligibleDays { .. } => "No available days found in the date range.".into(),
        }
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

/// Stateless schedule generator shared by the preview and commit paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScheduleGenerator;

impl ScheduleGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Proposes slots for `cohort` over `window`.
    ///
    /// Requirements belonging to other cohorts are ignored. Requirement order is preserved in
    /// the output: all slots of the first department, chronologically, then the next, and so
    /// on. A department may end up with fewer slots than it needs when the window is short;
    /// that is reported through [`DepartmentAllocation::under_filled`], not as an error.
    pub fn generate(
        &self,
        cohort: Cohort,
        requirements: &[DepartmentRequirement],
        window: &DateWindow,
    ) -> GenerationOutcome {
        let matching: Vec<&DepartmentRequirement> =
            requirements.iter().filter(|r| r.cohort == cohort).collect();
        if matching.is_empty() {
            return GenerationOutcome::NoRequirements { cohort };
        }

        let days = candidate_days(window);
        if days.is_empty() {
            return GenerationOutcome::NoEligibleDays { window: *window };
        }

        let mut slots = Vec::new();
        let mut allocations = Vec::with_capacity(matching.len());
        for requirement in matching {
            let department_slots = allocate_department(requirement, &days);
            allocations.push(DepartmentAllocation {
                department_id: requirement.department_id.clone(),
                slots_needed: requirement.slots_needed(),
                slots_created: department_slots.len(),
                hours_allocated: department_slots.len() as u64 * u64::from(SHIFT_HOURS),
            });
            slots.extend(department_slots);
        }

        GenerationOutcome::Generated { slots, allocations }
    }
}

/// Walks `days` for one department. `days` must be non-empty.
fn allocate_department(
    requirement: &DepartmentRequirement,
    days: &[NaiveDate],
) -> Vec<ProposedSlot> {
    let slots_needed = requirement.slots_needed();
    let slots_per_day_max = slots_needed.div_ceil(days.len());
    let capacity = requirement.capacity();

    let slot = |date: NaiveDate, shift: Shift| ProposedSlot {
        department_id: requirement.department_id.clone(),
        date,
        shift,
        capacity,
        booked_count: 0,
    };

    let mut slots = Vec::with_capacity(slots_needed.min(days.len() * 2));
    for &date in days {
        if slots.len() >= slots_needed {
            break;
        }
        slots.push(slot(date, Shift::Morning));
        if slots_per_day_max > 1 && slots.len() < slots_needed {
            slots.push(slot(date, Shift::Afternoon));
        }
    }
    slots
}
