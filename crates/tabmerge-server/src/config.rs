//! Service configuration.

use std::path::PathBuf;

use tabmerge_output::{DEFAULT_MAX_JSON_ROWS, ExportLimits};
use tabmerge_persistence::SinkConfig;
use tabmerge_transform::{FillConfig, JoinConfig, PipelineConfig};

/// Immutable settings, built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Shared secret expected in `X-API-Key`.
    pub api_key: String,
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub default_download_name: String,
    pub max_json_rows: usize,
    pub sqlite_path: PathBuf,
    /// Sink table, also the name of the combined table.
    pub sqlite_table: String,
    pub join: Option<JoinConfig>,
    pub fill: Option<FillConfig>,
}

impl AppConfig {
    /// Configuration with the documented defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            bind_addr: "127.0.0.1:8000".to_string(),
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("db"),
            default_download_name: "df_etl.csv".to_string(),
            max_json_rows: DEFAULT_MAX_JSON_ROWS,
            sqlite_path: PathBuf::from("db/etl.db"),
            sqlite_table: "etl_merged".to_string(),
            join: None,
            fill: None,
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            data_dir: self.data_dir.clone(),
            table_name: self.sqlite_table.clone(),
            join: self.join.clone(),
            fill: self.fill.clone(),
        }
    }

    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig::new(self.sqlite_path.clone(), self.sqlite_table.clone())
    }

    pub fn export_limits(&self) -> ExportLimits {
        ExportLimits {
            max_json_rows: self.max_json_rows,
        }
    }
}
