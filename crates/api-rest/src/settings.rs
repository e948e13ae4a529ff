//! Server settings resolved from the environment at startup.

use rotation_core::data_dir_from_env_value;
use std::path::PathBuf;

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerSettings {
    pub addr: String,
    pub data_dir: PathBuf,
    /// When set, every route except `/health` requires a matching `x-api-key` header.
    pub api_key: Option<String>,
}

impl ServerSettings {
    /// Reads `ROTATION_REST_ADDR`, `ROTATION_DATA_DIR` and `ROTATION_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("ROTATION_REST_ADDR").ok(),
            std::env::var("ROTATION_DATA_DIR").ok(),
            std::env::var("ROTATION_API_KEY").ok(),
        )
    }

    pub fn from_values(
        addr: Option<String>,
        data_dir: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            addr: non_blank(addr).unwrap_or_else(|| DEFAULT_REST_ADDR.into()),
            data_dir: data_dir_from_env_value(data_dir),
            api_key: non_blank(api_key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_or_blank_values() {
        let settings = ServerSettings::from_values(None, Some(" ".into()), Some("".into()));
        assert_eq!(settings.addr, "0.0.0.0:3000");
        assert_eq!(settings.data_dir, PathBuf::from("rotation_data"));
        assert_eq!(settings.api_key, None);
    }

    #[test]
    fn explicit_values_win() {
        let settings = ServerSettings::from_values(
            Some("127.0.0.1:8080".into()),
            Some("/srv/rota".into()),
            Some("key".into()),
        );
        assert_eq!(settings.addr, "127.0.0.1:8080");
        assert_eq!(settings.data_dir, PathBuf::from("/srv/rota"));
        assert_eq!(settings.api_key.as_deref(), Some("key"));
    }
}
