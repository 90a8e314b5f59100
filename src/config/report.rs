use serde::{Deserialize, Serialize};

/// Console report configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Rows shown per ranking.
    /// TOML: `report.top_n`. Default: `5`.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Characters of a comment body kept in `body_preview`.
    /// TOML: `report.body_preview_chars`. Default: `40`.
    #[serde(default = "default_body_preview_chars")]
    pub body_preview_chars: usize,

    /// Cells wider than this are truncated when printed.
    /// TOML: `report.max_cell_width`. Default: `60`.
    #[serde(default = "default_max_cell_width")]
    pub max_cell_width: usize,

    /// Raw rows printed for each table before enrichment.
    /// TOML: `report.preview_rows`. Default: `5`.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            body_preview_chars: default_body_preview_chars(),
            max_cell_width: default_max_cell_width(),
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_top_n() -> usize {
    5
}

fn default_body_preview_chars() -> usize {
    40
}

fn default_max_cell_width() -> usize {
    60
}

fn default_preview_rows() -> usize {
    5
}
