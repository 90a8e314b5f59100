mod basic;
mod fetch;
mod report;

pub use basic::BasicConfig;
pub use fetch::{DEFAULT_USER_AGENT, FetchConfig};
pub use report::ReportConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::RecountError;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Process-wide settings (see `basic` table in recount.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Fetcher settings (see `fetch` table in recount.toml).
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Console report settings (see `report` table in recount.toml).
    #[serde(default)]
    pub report: ReportConfig,
}

pub const DEFAULT_CONFIG_FILE: &str = "recount.toml";
pub const ENV_PREFIX: &str = "RECOUNT_";

impl Config {
    /// Builds a Figment that merges defaults, a TOML file (if present) and
    /// `RECOUNT_`-prefixed environment variables, in that order.
    ///
    /// Nested keys use `__` as separator, e.g. `RECOUNT_FETCH__TIMEOUT_SECS=10`.
    pub fn figment(config_file: &Path) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if config_file.is_file() {
            figment = figment.merge(Toml::file(config_file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates configuration.
    ///
    /// An explicitly requested file must exist; the default `recount.toml` is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, RecountError> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(RecountError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let cfg: Self = Self::figment(&path).extract().map_err(|err| {
            RecountError::Config(format!(
                "failed to extract configuration from {}: {err}",
                path.display()
            ))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), RecountError> {
        self.fetch.validate().map_err(RecountError::Config)
    }
}
