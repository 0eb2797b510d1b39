//! Configuration handling.
//!
//! Configuration is stored as YAML in the platform config directory
//! (`RENTALHUB_CONFIG` overrides the path) and includes:
//! - The collaborator API base URL and request timeout
//! - Per-view page size overrides
//! - The signed-in session, whose token may also come from `RENTALHUB_TOKEN`

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RentalError, Result};
use crate::session::{Role, Session};
use crate::view::ViewConfig;

pub const CONFIG_ENV: &str = "RENTALHUB_CONFIG";
pub const TOKEN_ENV: &str = "RENTALHUB_TOKEN";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Page size per view name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub page_sizes: BTreeMap<String, usize>,

    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            request_timeout_secs: default_timeout(),
            page_sizes: BTreeMap::new(),
            session: SessionConfig::default(),
        }
    }
}

/// Signed-in user as stored on disk
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(CONFIG_ENV)
            && !path.trim().is_empty()
        {
            return Ok(PathBuf::from(path));
        }
        ProjectDirs::from("com", "rentalhub", "rentalhub")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .ok_or_else(|| RentalError::Config("could not determine a config directory".to_string()))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml_ng::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml_ng::to_string(self)?)?;
        Ok(())
    }

    /// Reject values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            RentalError::Config(format!("api_base_url '{}' is invalid: {e}", self.api_base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RentalError::Config(format!(
                "api_base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(RentalError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        for (view, size) in &self.page_sizes {
            ViewConfig::by_name(view)
                .map_err(|_| RentalError::Config(format!("page_sizes: unknown view '{view}'")))?;
            if *size == 0 {
                return Err(RentalError::Config(format!(
                    "page_sizes.{view} must be greater than 0"
                )));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Session token from the environment or the config file
    pub fn token(&self) -> Option<String> {
        if let Ok(token) = env::var(TOKEN_ENV)
            && !token.trim().is_empty()
        {
            return Some(token.trim().to_string());
        }
        self.session.token.clone().filter(|t| !t.trim().is_empty())
    }

    /// The configured session; a guest when no user id is set.
    pub fn session(&self) -> Session {
        let mut session = match &self.session.user_id {
            Some(user_id) => {
                let name = self.session.name.clone().unwrap_or_default();
                match self.session.role {
                    Role::Admin => Session::admin(user_id.clone(), name),
                    Role::Customer => Session::user(user_id.clone(), name),
                }
            }
            None => Session::guest(),
        };
        if let Some(token) = self.token() {
            session = session.with_token(token);
        }
        session
    }

    /// Preset `name` with any configured page size applied.
    pub fn view(&self, name: &str) -> Result<ViewConfig> {
        let view = ViewConfig::by_name(name)?;
        Ok(match self.page_sizes.get(&view.name) {
            Some(size) => view.with_page_size(*size),
            None => view,
        })
    }

    /// Copy safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.session.token.is_some() {
            copy.session.token = Some("[REDACTED]".to_string());
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:3000/");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml_ng::from_str("page_sizes:\n  vehicles: 12\n").unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.view("vehicles").unwrap().page_size, 12);
        assert_eq!(config.view("listings").unwrap().page_size, 9);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let zero_page = Config {
            page_sizes: BTreeMap::from([("wishlist".to_string(), 0)]),
            ..Config::default()
        };
        assert!(matches!(zero_page.validate(), Err(RentalError::Config(_))));

        let bad_url = Config {
            api_base_url: "localhost:3000".to_string(),
            ..Config::default()
        };
        assert!(bad_url.validate().is_err());

        let unknown_view = Config {
            page_sizes: BTreeMap::from([("bookings".to_string(), 4)]),
            ..Config::default()
        };
        assert!(unknown_view.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = Config::default();
        config.session.token = Some("tok-123".to_string());
        assert!(!format!("{config:?}").contains("tok-123"));
        assert!(
            !serde_yaml_ng::to_string(&config.redacted())
                .unwrap()
                .contains("tok-123")
        );
    }

    #[test]
    #[serial]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let mut config = Config::default();
        config.session.user_id = Some("7".to_string());
        config.session.role = Role::Admin;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.session().is_admin());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_token_env_takes_precedence() {
        let mut config = Config::default();
        config.session.user_id = Some("7".to_string());
        config.session.token = Some("from-file".to_string());

        unsafe { env::set_var(TOKEN_ENV, "from-env") };
        assert_eq!(config.token().as_deref(), Some("from-env"));
        assert_eq!(config.session().token(), Some("from-env"));

        unsafe { env::remove_var(TOKEN_ENV) };
        assert_eq!(config.token().as_deref(), Some("from-file"));
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        unsafe { env::set_var(CONFIG_ENV, "/tmp/rentalhub-test.yaml") };
        assert_eq!(
            Config::config_path().unwrap(),
            PathBuf::from("/tmp/rentalhub-test.yaml")
        );
        unsafe { env::remove_var(CONFIG_ENV) };
    }
}
