//! Schedule generation orchestration.
//!
//! [`SchedulingService`] ties the requirements store, the generator and slot persistence
//! together. The preview and commit paths share one [`ScheduleGenerator`], so what an
//! administrator previews is exactly what gets committed for the same inputs.

use crate::calendar::DateWindow;
use crate::cohort::Cohort;
use crate::constants::MAX_WINDOW_DAYS;
use crate::error::{SchedulingError, SchedulingResult};
use crate::generator::{DepartmentRequirement, GenerationOutcome, ScheduleGenerator};
use crate::repositories::requirements::RequirementsStore;
use crate::repositories::slots::{CommittedBatch, ScheduleSlot, SlotFilter, SlotPersistence};
use crate::role::Role;

/// A validated generation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub cohort: Cohort,
    pub window: DateWindow,
}

impl GenerationRequest {
    pub fn new(cohort: Cohort, window: DateWindow) -> Self {
        Self { cohort, window }
    }

    /// Validates raw caller input.
    ///
    /// All checks happen here, before any store is touched.
    ///
    /// # Errors
    ///
    /// Returns a validation-kind [`crate::SchedulingError`] if:
    /// - the cohort is blank or unknown,
    /// - a date is blank or not `YYYY-MM-DD`,
    /// - the end date precedes the start date,
    /// - the window covers more than [`MAX_WINDOW_DAYS`] days.
    pub fn parse(cohort: &str, start_date: &str, end_date: &str) -> SchedulingResult<Self> {
        let cohort = Cohort::parse(cohort)?;
        let window = DateWindow::parse(start_date, end_date)?;
        if window.len_days() > MAX_WINDOW_DAYS {
            return Err(SchedulingError::InvalidInput(format!(
                "date window covers {} days; at most {MAX_WINDOW_DAYS} are allowed",
                window.len_days()
            )));
        }
        Ok(Self { cohort, window })
    }
}

/// Result of the commit path.
#[derive(Clone, Debug, PartialEq)]
pub enum CommitOutcome {
    /// Slots were generated and stored as one batch.
    Committed {
        batch: CommittedBatch,
        outcome: GenerationOutcome,
    },
    /// Nothing to store; the outcome says why.
    Nothing(GenerationOutcome),
}

impl CommitOutcome {
    pub fn generation(&self) -> &GenerationOutcome {
        match self {
            Self::Committed { outcome, .. } | Self::Nothing(outcome) => outcome,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Committed { batch, .. } => {
                format!("Committed {} schedule slots.", batch.slots.len())
            }
            Self::Nothing(outcome) => outcome.message(),
        }
    }
}

/// Generates and commits rotation schedules.
#[derive(Clone, Debug)]
pub struct SchedulingService<R, P> {
    requirements: R,
    slots: P,
    generator: ScheduleGenerator,
}

impl<R: RequirementsStore, P: SlotPersistence> SchedulingService<R, P> {
    pub fn new(requirements: R, slots: P) -> Self {
        Self {
            requirements,
            slots,
            generator: ScheduleGenerator::new(),
        }
    }

    pub fn requirements_store(&self) -> &R {
        &self.requirements
    }

    pub fn slot_store(&self) -> &P {
        &self.slots
    }

    /// Proposes a schedule without storing anything.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SchedulingError::Forbidden`] if `role` may not generate schedules, or
    /// the requirements store's error unchanged.
    pub fn preview(
        &self,
        role: Role,
        request: &GenerationRequest,
    ) -> SchedulingResult<GenerationOutcome> {
        role.ensure_may_generate()?;
        let requirements = self.requirements.requirements_for(request.cohort)?;
        let outcome = self
            .generator
            .generate(request.cohort, &requirements, &request.window);
        log_outcome(request, &outcome);
        Ok(outcome)
    }

    /// Generates a schedule and stores it as one batch.
    ///
    /// An empty outcome writes nothing and is returned as [`CommitOutcome::Nothing`].
    ///
    /// # Errors
    ///
    /// As [`Self::preview`], plus any persistence failure.
    pub fn commit(
        &self,
        role: Role,
        request: &GenerationRequest,
    ) -> SchedulingResult<CommitOutcome> {
        let outcome = self.preview(role, request)?;
        if outcome.is_empty() {
            return Ok(CommitOutcome::Nothing(outcome));
        }

        let batch = self.slots.commit(outcome.slots())?;
        tracing::info!(
            cohort = %request.cohort,
            batch_id = %batch.batch_id,
            count = batch.slots.len(),
            "committed schedule slots"
        );
        Ok(CommitOutcome::Committed { batch, outcome })
    }

    /// Committed slots matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the slot store's error unchanged.
    pub fn list_slots(&self, filter: &SlotFilter) -> SchedulingResult<Vec<ScheduleSlot>> {
        self.slots.list(filter)
    }

    /// The requirements the generator would use for `cohort`.
    ///
    /// # Errors
    ///
    /// Returns the requirements store's error unchanged.
    pub fn requirements_for(&self, cohort: Cohort) -> SchedulingResult<Vec<DepartmentRequirement>> {
        self.requirements.requirements_for(cohort)
    }
}

fn log_outcome(request: &GenerationRequest, outcome: &GenerationOutcome) {
    match outcome {
        GenerationOutcome::Generated { slots, allocations } => {
            for allocation in allocations.iter().filter(|a| a.under_filled()) {
                tracing::warn!(
                    department_id = %allocation.department_id,
                    slots_needed = allocation.slots_needed,
                    slots_created = allocation.slots_created,
                    "window too short to meet department requirement"
                );
            }
            tracing::info!(
                cohort = %request.cohort,
                start = %request.window.start(),
                end = %request.window.end(),
                departments = allocations.len(),
                count = slots.len(),
                "generated schedule slots"
            );
        }
        GenerationOutcome::NoRequirements { cohort } => {
            tracing::warn!(%cohort, "no department requirements found for cohort");
        }
        GenerationOutcome::NoEligibleDays { window } => {
            tracing::error!(
                start = %window.start(),
                end = %window.end(),
                "no eligible days in date range"
            );
        }
    }
}
