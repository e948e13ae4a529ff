//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the stores. Library code
//! never reads environment variables while handling a request.

use crate::constants::{DEFAULT_ROTATION_DATA_DIR, REQUIREMENTS_FILENAME, SLOTS_DIR_NAME};
use crate::error::{SchedulingError, SchedulingResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidInput`] if `data_dir` is not an existing directory.
    pub fn new(data_dir: PathBuf) -> SchedulingResult<Self> {
        if !data_dir.is_dir() {
            return Err(SchedulingError::InvalidInput(format!(
                "rotation data directory {} does not exist or is not a directory",
                data_dir.display()
            )));
        }
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn requirements_file(&self) -> PathBuf {
        self.data_dir.join(REQUIREMENTS_FILENAME)
    }

    pub fn slots_dir(&self) -> PathBuf {
        self.data_dir.join(SLOTS_DIR_NAME)
    }
}

/// Resolve the data directory from an optional environment value.
///
/// `None` or a blank value selects the default `rotation_data`.
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROTATION_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn derives_store_paths() {
        let temp = TempDir::new().unwrap();
        let cfg = CoreConfig::new(temp.path().to_path_buf()).unwrap();

        assert_eq!(cfg.data_dir(), temp.path());
        assert_eq!(cfg.requirements_file(), temp.path().join("requirements.yaml"));
        assert_eq!(cfg.slots_dir(), temp.path().join("slots"));
    }

    #[test]
    fn rejects_missing_data_dir() {
        let temp = TempDir::new().unwrap();
        let err = CoreConfig::new(temp.path().join("absent")).unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidInput(_)));
    }

    #[test]
    fn rejects_file_as_data_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        std::fs::write(&file, "").unwrap();
        assert!(CoreConfig::new(file).is_err());
    }

    #[test]
    fn env_value_defaults_when_absent_or_blank() {
        assert_eq!(data_dir_from_env_value(None), PathBuf::from("rotation_data"));
        assert_eq!(
            data_dir_from_env_value(Some("  ".into())),
            PathBuf::from("rotation_data")
        );
        assert_eq!(
            data_dir_from_env_value(Some(" /srv/rota ".into())),
            PathBuf::from("/srv/rota")
        );
    }
}
