//! Layered configuration: CLI flags over environment over config file over
//! defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{PlankError, Result};
use crate::storage::SnapshotStore;

/// On-disk shape of `config.toml` under the user config directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Base URL of the tracker API. Absent means local mode.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Override for the snapshot directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Caller-supplied overrides, usually straight from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    /// Skip the remote entirely, even when an API URL is configured.
    pub local: bool,
}

/// The fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Option<String>,
    pub data_dir: PathBuf,
    pub force_local: bool,
}

/// Load the user config file, treating a missing file as defaults.
pub fn load_file_config() -> Result<FileConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(FileConfig::default());
    };
    load_file_config_from(&config_dir.join("plank/config.toml"))
}

/// Load a config file from an explicit path (missing file = defaults).
pub fn load_file_config_from(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| PlankError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str::<FileConfig>(&content).map_err(|source| PlankError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the effective configuration from all layers.
pub fn resolve(overrides: &Overrides) -> Result<Config> {
    let file = load_file_config()?;
    let env_api = env::var("PLANK_API_URL").ok();
    let env_data = env::var("PLANK_DATA_DIR").ok().map(PathBuf::from);

    Ok(resolve_inner(
        overrides,
        env_api,
        env_data,
        file,
        SnapshotStore::default_root(),
    ))
}

/// Core precedence logic, separated from process state for testability.
fn resolve_inner(
    overrides: &Overrides,
    env_api: Option<String>,
    env_data: Option<PathBuf>,
    file: FileConfig,
    default_data_dir: PathBuf,
) -> Config {
    let api_url = overrides
        .api_url
        .clone()
        .or(env_api)
        .or(file.api_url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let data_dir = overrides
        .data_dir
        .clone()
        .or(env_data)
        .or(file.data_dir)
        .unwrap_or(default_data_dir);

    Config {
        api_url,
        data_dir,
        force_local: overrides.local,
    }
}

#[cfg(test)]
mod tests {
    use super::{FileConfig, Overrides, load_file_config_from, resolve_inner};
    use std::path::PathBuf;

    fn defaults() -> PathBuf {
        PathBuf::from("/default/data")
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let cfg = load_file_config_from(&PathBuf::from("/nonexistent/plank/config.toml")).unwrap();
        assert!(cfg.api_url.is_none());
        assert!(cfg.data_dir.is_none());
    }

    #[test]
    fn config_file_parses_both_fields() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"http://localhost:3000\"\ndata_dir = \"/srv/plank\"\n",
        )
        .unwrap();

        let cfg = load_file_config_from(&path).unwrap();
        assert_eq!(cfg.api_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/srv/plank")));
    }

    #[test]
    fn malformed_config_is_a_typed_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = [not toml").unwrap();

        let err = load_file_config_from(&path).unwrap_err();
        assert_eq!(err.code().code(), "E1001");
    }

    #[test]
    fn cli_flag_wins_over_env_and_file() {
        let overrides = Overrides {
            api_url: Some("http://flag:1".to_string()),
            ..Overrides::default()
        };
        let file = FileConfig {
            api_url: Some("http://file:3".to_string()),
            data_dir: None,
        };
        let cfg = resolve_inner(
            &overrides,
            Some("http://env:2".to_string()),
            None,
            file,
            defaults(),
        );
        assert_eq!(cfg.api_url.as_deref(), Some("http://flag:1"));
    }

    #[test]
    fn env_wins_over_file() {
        let file = FileConfig {
            api_url: Some("http://file:3".to_string()),
            data_dir: Some(PathBuf::from("/from/file")),
        };
        let cfg = resolve_inner(
            &Overrides::default(),
            Some("http://env:2".to_string()),
            Some(PathBuf::from("/from/env")),
            file,
            defaults(),
        );
        assert_eq!(cfg.api_url.as_deref(), Some("http://env:2"));
        assert_eq!(cfg.data_dir, PathBuf::from("/from/env"));
    }

    #[test]
    fn blank_api_url_means_local_mode() {
        let file = FileConfig {
            api_url: Some("   ".to_string()),
            data_dir: None,
        };
        let cfg = resolve_inner(&Overrides::default(), None, None, file, defaults());
        assert!(cfg.api_url.is_none());
    }

    #[test]
    fn defaults_apply_when_no_layer_sets_values() {
        let cfg = resolve_inner(
            &Overrides::default(),
            None,
            None,
            FileConfig::default(),
            defaults(),
        );
        assert!(cfg.api_url.is_none());
        assert_eq!(cfg.data_dir, defaults());
        assert!(!cfg.force_local);
    }
}
