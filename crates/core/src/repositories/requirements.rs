//! Department requirements: the read-only store the generator draws from.

use crate::cohort::Cohort;
use crate::config::CoreConfig;
use crate::constants::DEFAULT_DEPARTMENT_CAPACITY;
use crate::error::{SchedulingError, SchedulingResult};
use crate::generator::DepartmentRequirement;
use crate::NonEmptyText;
use rotation_wire::{RequirementsData, RequirementsFile};
use std::fs;
use std::path::{Path, PathBuf};

/// Source of per-cohort department requirements.
///
/// Implementations return requirements in store order; the generator relies on that order.
pub trait RequirementsStore {
    /// Requirements for `cohort`, each joined with its department's capacity.
    ///
    /// # Errors
    ///
    /// Returns a [`SchedulingError`] classified as upstream when the store cannot be read or
    /// holds invalid records.
    fn requirements_for(&self, cohort: Cohort) -> SchedulingResult<Vec<DepartmentRequirement>>;
}

impl<T: RequirementsStore + ?Sized> RequirementsStore for &T {
    fn requirements_for(&self, cohort: Cohort) -> SchedulingResult<Vec<DepartmentRequirement>> {
        (**self).requirements_for(cohort)
    }
}

/// A configured hospital department.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Department {
    pub id: NonEmptyText,
    pub name: Option<String>,
    /// Per-slot capacity with the default already applied.
    pub capacity: u32,
}

/// Requirements backed by `<data_dir>/requirements.yaml`.
///
/// The file is read on every call, so each generation sees one consistent snapshot and edits
/// take effect without a restart.
#[derive(Clone, Debug)]
pub struct FileRequirementsStore {
    path: PathBuf,
}

impl FileRequirementsStore {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::at(cfg.requirements_file())
    }

    /// Store reading an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every configured department, in file order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`RequirementsStore::requirements_for`].
    pub fn departments(&self) -> SchedulingResult<Vec<Department>> {
        let data = self.load()?;
        Ok(data
            .departments
            .into_iter()
            .map(|d| Department {
                capacity: match d.capacity {
                    Some(c) if c > 0 => c,
                    _ => DEFAULT_DEPARTMENT_CAPACITY,
                },
                id: d.id,
                name: d.name,
            })
            .collect())
    }

    fn load(&self) -> SchedulingResult<RequirementsData> {
        let contents =
            fs::read_to_string(&self.path).map_err(|source| SchedulingError::StoreUnavailable {
                path: self.path.clone(),
                source,
            })?;
        Ok(RequirementsFile::parse(&contents)?)
    }
}

impl RequirementsStore for FileRequirementsStore {
    fn requirements_for(&self, cohort: Cohort) -> SchedulingResult<Vec<DepartmentRequirement>> {
        let data = self.load()?;

        // Every record is validated, whichever cohort was asked for.
        let mut all = Vec::with_capacity(data.requirements.len());
        for record in &data.requirements {
            let record_cohort = Cohort::parse(&record.cohort).map_err(|_| {
                SchedulingError::InvalidRequirement(format!(
                    "department '{}' has unknown cohort '{}'",
                    record.department_id, record.cohort
                ))
            })?;
            let department = data.department(&record.department_id);
            let requirement = DepartmentRequirement::new(
                record.department_id.clone(),
                record_cohort,
                record.required_hours,
                department.and_then(|d| d.capacity),
            )?
            .with_department_name(department.and_then(|d| d.name.clone()));
            all.push((requirement, department.is_some()));
        }

        let mut matching = Vec::new();
        for (requirement, known_department) in all {
            if requirement.cohort != cohort {
                continue;
            }
            if !known_department {
                tracing::warn!(
                    department_id = %requirement.department_id,
                    "requirement references an unknown department; using default capacity"
                );
            }
            matching.push(requirement);
        }

        tracing::debug!(
            %cohort,
            count = matching.len(),
            path = %self.path.display(),
            "loaded department requirements"
        );
        Ok(matching)
    }
}
