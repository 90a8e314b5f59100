use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Basic (process-wide) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BasicConfig {
    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Env: `RECOUNT_BASIC__LOGLEVEL`. Default: `info`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    /// Reddit data-export archive read when `--archive` is not given.
    /// TOML: `basic.archive_path`. Default: `export.zip`.
    #[serde(default = "default_archive_path")]
    pub archive_path: PathBuf,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            loglevel: default_loglevel(),
            archive_path: default_archive_path(),
        }
    }
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_archive_path() -> PathBuf {
    PathBuf::from("export.zip")
}
