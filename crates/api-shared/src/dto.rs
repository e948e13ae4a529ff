//! Request and response bodies exchanged over the API.
//!
//! Dates are `YYYY-MM-DD`, shift times `HH:MM`, timestamps RFC 3339.

use rotation_core::constants::TIME_FORMAT;
use rotation_core::{
    Cohort, CommitOutcome, Department, DepartmentAllocation, DepartmentRequirement,
    GenerationOutcome, ProposedSlot, ScheduleSlot,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// Body of the preview and commit endpoints.
///
/// Absent fields deserialise as empty text so they are reported as validation errors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct GenerateScheduleReq {
    /// One of `first`, `second`, `third`, `fourth`.
    pub cohort: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProposedSlotDto {
    pub department_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: u32,
    pub booked_count: u32,
}

impl From<&ProposedSlot> for ProposedSlotDto {
    fn from(slot: &ProposedSlot) -> Self {
        Self {
            department_id: slot.department_id.to_string(),
            date: slot.date.to_string(),
            start_time: slot.start_label(),
            end_time: slot.end_label(),
            capacity: slot.capacity,
            booked_count: slot.booked_count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DepartmentAllocationDto {
    pub department_id: String,
    pub slots_needed: u64,
    pub slots_created: u64,
    pub hours_allocated: u64,
    pub under_filled: bool,
}

impl From<&DepartmentAllocation> for DepartmentAllocationDto {
    fn from(allocation: &DepartmentAllocation) -> Self {
        Self {
            department_id: allocation.department_id.to_string(),
            slots_needed: allocation.slots_needed as u64,
            slots_created: allocation.slots_created as u64,
            hours_allocated: allocation.hours_allocated,
            under_filled: allocation.under_filled(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GenerateScheduleRes {
    /// `generated`, `no_requirements` or `no_eligible_days`.
    pub outcome: String,
    pub message: String,
    pub count: u64,
    pub slots: Vec<ProposedSlotDto>,
    pub departments: Vec<DepartmentAllocationDto>,
}

impl From<&GenerationOutcome> for GenerateScheduleRes {
    fn from(outcome: &GenerationOutcome) -> Self {
        Self {
            outcome: outcome_label(outcome).into(),
            message: outcome.message(),
            count: outcome.slots().len() as u64,
            slots: outcome.slots().iter().map(ProposedSlotDto::from).collect(),
            departments: outcome
                .allocations()
                .iter()
                .map(DepartmentAllocationDto::from)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleSlotDto {
    pub id: String,
    pub batch_id: String,
    pub department_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    /// `morning` or `afternoon`; absent when the stored times match neither shift.
    pub shift: Option<String>,
    pub capacity: u32,
    pub booked_count: u32,
    pub created_at: String,
}

impl From<&ScheduleSlot> for ScheduleSlotDto {
    fn from(slot: &ScheduleSlot) -> Self {
        Self {
            id: slot.id.to_string(),
            batch_id: slot.batch_id.to_string(),
            department_id: slot.department_id.to_string(),
            date: slot.date.to_string(),
            start_time: slot.start_time.format(TIME_FORMAT).to_string(),
            end_time: slot.end_time.format(TIME_FORMAT).to_string(),
            shift: slot.shift().map(|s| s.as_str().to_string()),
            capacity: slot.capacity,
            booked_count: slot.booked_count,
            created_at: slot.created_at.to_rfc3339(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommitScheduleRes {
    /// `committed`, or the generation outcome when nothing was stored.
    pub outcome: String,
    pub message: String,
    pub batch_id: Option<String>,
    pub count: u64,
    pub slots: Vec<ScheduleSlotDto>,
}

impl From<&CommitOutcome> for CommitScheduleRes {
    fn from(outcome: &CommitOutcome) -> Self {
        match outcome {
            CommitOutcome::Committed { batch, .. } => Self {
                outcome: "committed".into(),
                message: outcome.message(),
                batch_id: Some(batch.batch_id.to_string()),
                count: batch.slots.len() as u64,
                slots: batch.slots.iter().map(ScheduleSlotDto::from).collect(),
            },
            CommitOutcome::Nothing(generation) => Self {
                outcome: outcome_label(generation).into(),
                message: outcome.message(),
                batch_id: None,
                count: 0,
                slots: Vec::new(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListSlotsRes {
    pub slots: Vec<ScheduleSlotDto>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RequirementDto {
    pub department_id: String,
    pub department_name: Option<String>,
    pub required_hours: f64,
    pub capacity: u32,
    pub slots_needed: u64,
}

impl From<&DepartmentRequirement> for RequirementDto {
    fn from(requirement: &DepartmentRequirement) -> Self {
        Self {
            department_id: requirement.department_id.to_string(),
            department_name: requirement.department_name.clone(),
            required_hours: requirement.required_hours,
            capacity: requirement.capacity(),
            slots_needed: requirement.slots_needed() as u64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListRequirementsRes {
    pub cohort: String,
    pub requirements: Vec<RequirementDto>,
}

impl ListRequirementsRes {
    pub fn new(cohort: Cohort, requirements: &[DepartmentRequirement]) -> Self {
        Self {
            cohort: cohort.to_string(),
            requirements: requirements.iter().map(RequirementDto::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DepartmentDto {
    pub id: String,
    pub name: Option<String>,
    pub capacity: u32,
}

impl From<&Department> for DepartmentDto {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id.to_string(),
            name: department.name.clone(),
            capacity: department.capacity,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListDepartmentsRes {
    pub departments: Vec<DepartmentDto>,
}

/// Machine-readable name of a generation outcome.
pub fn outcome_label(outcome: &GenerationOutcome) -> &'static str {
    match outcome {
        GenerationOutcome::Generated { .. } => "generated",
        GenerationOutcome::NoRequirements { .. } => "no_requirements",
        GenerationOutcome::NoEligibleDays { .. } => "no_eligible_days",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rotation_core::{DateWindow, NonEmptyText, ScheduleGenerator};

    fn week() -> DateWindow {
        DateWindow::parse("2025-03-03", "2025-03-07").unwrap()
    }

    fn surgery(hours: f64) -> DepartmentRequirement {
        DepartmentRequirement::new(
            NonEmptyText::new("surgery").unwrap(),
            Cohort::Third,
            hours,
            Some(6),
        )
        .unwrap()
        .with_department_name(Some("Surgery".into()))
    }

    #[test]
    fn generated_outcome_maps_to_response() {
        let outcome = ScheduleGenerator::new().generate(Cohort::Third, &[surgery(18.0)], &week());
        let res = GenerateScheduleRes::from(&outcome);

        assert_eq!(res.outcome, "generated");
        assert_eq!(res.count, 3);
        assert_eq!(
            res.slots[0],
            ProposedSlotDto {
                department_id: "surgery".into(),
                date: "2025-03-03".into(),
                start_time: "08:00".into(),
                end_time: "14:00".into(),
                capacity: 6,
                booked_count: 0,
            }
        );
        assert_eq!(res.departments.len(), 1);
        assert!(!res.departments[0].under_filled);
        assert_eq!(res.departments[0].hours_allocated, 18);
    }

    #[test]
    fn empty_outcomes_map_to_labels() {
        let none = ScheduleGenerator::new().generate(Cohort::First, &[surgery(18.0)], &week());
        let res = GenerateScheduleRes::from(&none);
        assert_eq!(res.outcome, "no_requirements");
        assert_eq!(res.count, 0);
        assert!(res.message.contains("first"));

        let sunday = DateWindow::new(
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
        )
        .unwrap();
        let empty = ScheduleGenerator::new().generate(Cohort::Third, &[surgery(18.0)], &sunday);
        assert_eq!(outcome_label(&empty), "no_eligible_days");

        let commit = CommitScheduleRes::from(&CommitOutcome::Nothing(empty));
        assert_eq!(commit.outcome, "no_eligible_days");
        assert_eq!(commit.batch_id, None);
        assert!(commit.slots.is_empty());
    }

    #[test]
    fn requirement_dto_resolves_capacity_and_slots() {
        let dto = RequirementDto::from(&surgery(30.0));
        assert_eq!(dto.capacity, 6);
        assert_eq!(dto.slots_needed, 5);
        assert_eq!(dto.department_name.as_deref(), Some("Surgery"));
    }

    #[test]
    fn request_schema_builds_with_defaults() {
        let (name, schema) = <GenerateScheduleReq as utoipa::ToSchema>::schema();
        assert_eq!(name, "GenerateScheduleReq");
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json["properties"]["cohort"].is_object(), "{json}");
    }

    #[test]
    fn committed_slot_dto_names_its_shift() {
        use rotation_core::{FileSlotStore, SlotPersistence};

        let temp = tempfile::TempDir::new().unwrap();
        let store = FileSlotStore::at(temp.path().join("slots"));
        let outcome = ScheduleGenerator::new().generate(Cohort::Third, &[surgery(30.0)], &week());
        let batch = store.commit(outcome.slots()).unwrap();

        let dto = ScheduleSlotDto::from(&batch.slots[0]);
        assert_eq!(dto.shift.as_deref(), Some("morning"));
        assert_eq!(dto.start_time, "08:00");
        assert_eq!(dto.batch_id, batch.batch_id.to_string());
    }

    #[test]
    fn missing_request_fields_default_to_empty() {
        let req: GenerateScheduleReq = serde_json::from_str(r#"{"cohort":"third"}"#).unwrap();
        assert_eq!(req.cohort, "third");
        assert!(req.start_date.is_empty());
        assert!(req.end_date.is_empty());
    }
}
