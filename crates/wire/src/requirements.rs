//! `requirements.yaml`: departments and their per-cohort hour requirements.
//!
//! ```yaml
//! departments:
//!   - id: surgery
//!     name: Surgery
//!     capacity: 6
//! requirements:
//!   - department_id: surgery
//!     cohort: third
//!     required_hours: 18
//! ```
//!
//! Requirement order is significant: the generator processes departments in file order.

use crate::{parse_strict, WireError, WireResult};
use rotation_types::NonEmptyText;
use serde::Deserialize;
use std::collections::HashSet;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Parsed contents of a requirements file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequirementsData {
    pub departments: Vec<DepartmentData>,
    pub requirements: Vec<RequirementData>,
}

impl RequirementsData {
    /// Looks up a department record by identifier.
    pub fn department(&self, id: &NonEmptyText) -> Option<&DepartmentData> {
        self.departments.iter().find(|d| &d.id == id)
    }
}

/// A hospital department that hosts rotations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepartmentData {
    pub id: NonEmptyText,
    pub name: Option<String>,
    /// Maximum concurrent students per slot; absent when the record has no explicit value.
    pub capacity: Option<u32>,
}

/// Hours a cohort must accrue in one department.
#[derive(Clone, Debug, PartialEq)]
pub struct RequirementData {
    pub department_id: NonEmptyText,
    /// Cohort name exactly as written in the file.
    pub cohort: String,
    pub required_hours: f64,
}

// ============================================================================
// Public RequirementsFile operations
// ============================================================================

/// Requirements file operations.
pub struct RequirementsFile;

impl RequirementsFile {
    /// Parses a requirements file.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if:
    /// - the YAML does not match the schema (unknown keys, wrong types),
    /// - an identifier is blank,
    /// - two departments share an identifier.
    pub fn parse(yaml_text: &str) -> WireResult<RequirementsData> {
        let wire: RequirementsWire = parse_strict(yaml_text, "Requirements file")?;
        wire_to_domain(wire)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RequirementsWire {
    #[serde(default)]
    departments: Vec<DepartmentWire>,
    #[serde(default)]
    requirements: Vec<RequirementWire>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DepartmentWire {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    capacity: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RequirementWire {
    department_id: String,
    cohort: String,
    required_hours: f64,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn non_empty(value: &str, field: &str) -> WireResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|_| WireError::InvalidId(format!("{field} cannot be blank")))
}

fn wire_to_domain(wire: RequirementsWire) -> WireResult<RequirementsData> {
    let mut seen = HashSet::new();
    let mut departments = Vec::with_capacity(wire.departments.len());
    for (index, department) in wire.departments.into_iter().enumerate() {
        let id = non_empty(&department.id, &format!("departments[{index}].id"))?;
        if !seen.insert(id.clone()) {
            return Err(WireError::Translation(format!(
                "duplicate department id '{id}'"
            )));
        }
        departments.push(DepartmentData {
            id,
            name: department.name.filter(|n| !n.trim().is_empty()),
            capacity: department.capacity,
        });
    }

    let requirements = wire
        .requirements
        .into_iter()
        .enumerate()
        .map(|(index, requirement)| {
            Ok(RequirementData {
                department_id: non_empty(
                    &requirement.department_id,
                    &format!("requirements[{index}].department_id"),
                )?,
                cohort: requirement.cohort.trim().to_string(),
                required_hours: requirement.required_hours,
            })
        })
        .collect::<WireResult<Vec<_>>>()?;

    Ok(RequirementsData {
        departments,
        requirements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"departments:
  - id: surgery
    name: Surgery
    capacity: 6
  - id: icu
requirements:
  - department_id: surgery
    cohort: third
    required_hours: 18
  - department_id: icu
    cohort: third
    required_hours: 30.5
"#;

    #[test]
    fn parses_departments_and_requirements_in_file_order() {
        let data = RequirementsFile::parse(SAMPLE).expect("parse requirements");

        assert_eq!(data.departments.len(), 2);
        assert_eq!(data.departments[0].capacity, Some(6));
        assert_eq!(data.departments[1].capacity, None);
        assert_eq!(data.departments[1].name, None);

        let ids: Vec<&str> = data
            .requirements
            .iter()
            .map(|r| r.department_id.as_str())
            .collect();
        assert_eq!(ids, vec!["surgery", "icu"]);
        assert_eq!(data.requirements[1].required_hours, 30.5);
    }

    #[test]
    fn rejects_unknown_keys_with_path() {
        let input = r#"requirements:
  - department_id: surgery
    cohort: third
    required_hours: 18
    shift: night
"#;
        let err = RequirementsFile::parse(input).expect_err("unknown key should fail");
        match err {
            WireError::Translation(msg) => assert!(msg.contains("shift"), "{msg}"),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_wrong_types() {
        let input = r#"requirements:
  - department_id: surgery
    cohort: third
    required_hours: lots
"#;
        let err = RequirementsFile::parse(input).expect_err("wrong type should fail");
        match err {
            WireError::Translation(msg) => assert!(msg.contains("required_hours"), "{msg}"),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_department_id() {
        let input = r#"requirements:
  - department_id: "  "
    cohort: first
    required_hours: 6
"#;
        let err = RequirementsFile::parse(input).expect_err("blank id should fail");
        assert!(matches!(err, WireError::InvalidId(_)));
    }

    #[test]
    fn rejects_duplicate_departments() {
        let input = r#"departments:
  - id: icu
  - id: icu
"#;
        let err = RequirementsFile::parse(input).expect_err("duplicate id should fail");
        match err {
            WireError::Translation(msg) => assert!(msg.contains("duplicate")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_document_sections_default_to_empty() {
        let data = RequirementsFile::parse("departments: []\n").expect("parse");
        assert!(data.requirements.is_empty());
    }

    #[test]
    fn department_lookup_by_id() {
        let data = RequirementsFile::parse(SAMPLE).expect("parse requirements");
        let icu = NonEmptyText::new("icu").unwrap();
        assert!(data.department(&icu).is_some());
        let missing = NonEmptyText::new("oncology").unwrap();
        assert!(data.department(&missing).is_none());
    }
}
