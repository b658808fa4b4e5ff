//! Service settings for the HTTP binary.
//!
//! Settings are layered: built-in defaults, then `fleet.toml` in the working
//! directory (or an explicit file), then `FLEET_*` environment variables.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Default settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "fleet.toml";

/// Runtime settings for the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Path to the SQLite work store.
    pub database_path: PathBuf,
    /// Directory holding `engine.yaml` and `compensation/`.
    pub config_dir: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_path: PathBuf::from("fleet.db"),
            config_dir: PathBuf::from("config/lei_13103"),
        }
    }
}

impl ServiceSettings {
    /// Loads settings from the default locations.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads settings, optionally from a specific file instead of
    /// [`DEFAULT_SETTINGS_FILE`].
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load_from(settings_path: Option<&Path>) -> Result<Self, figment::Error> {
        let path = settings_path.unwrap_or(Path::new(DEFAULT_SETTINGS_FILE));

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            // FLEET_BIND_ADDR, FLEET_DATABASE_PATH, FLEET_CONFIG_DIR
            .merge(Env::prefixed("FLEET_"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = ServiceSettings::load_from(Some(&temp.path().join("absent.toml"))).unwrap();

        let defaults = ServiceSettings::default();
        assert_eq!(settings.config_dir, defaults.config_dir);
        assert_eq!(settings.database_path, defaults.database_path);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fleet.toml");
        fs::write(
            &path,
            "bind_addr = \"0.0.0.0:8080\"\ndatabase_path = \"/var/lib/fleet/work.db\"\n",
        )
        .unwrap();

        let settings = ServiceSettings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(settings.database_path, PathBuf::from("/var/lib/fleet/work.db"));
        assert_eq!(settings.config_dir, ServiceSettings::default().config_dir);
    }

    #[test]
    fn test_debug_lists_every_setting() {
        let rendered = format!("{:?}", ServiceSettings::default());
        assert!(rendered.contains("bind_addr: 127.0.0.1:3000"));
        assert!(rendered.contains("database_path"));
        assert!(rendered.contains("config_dir"));
    }

    #[test]
    fn test_invalid_bind_addr_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fleet.toml");
        fs::write(&path, "bind_addr = \"not an address\"\n").unwrap();

        assert!(ServiceSettings::load_from(Some(&path)).is_err());
    }
}
