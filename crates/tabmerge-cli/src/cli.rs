//! CLI argument definitions.
//!
//! Every service setting also reads from its environment variable, and
//! `main` loads `.env` before parsing.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tabmerge_model::ExportFormat;
use tabmerge_persistence::IfExists;
use tabmerge_transform::JoinKind;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "tabmerge",
    version,
    about = "Merge CSV datasets and serve them as CSV, XLSX, JSON or SQLite",
    long_about = "Merge the delimited datasets of a data directory into one table.\n\n\
                  Serve the result over an authenticated HTTP API, or run the merge\n\
                  once and write an export file and/or a SQLite table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging setup from the global flags. `--log-level` beats `-v/-q`,
    /// and either one disables the `RUST_LOG` override.
    pub fn log_config(&self) -> LogConfig {
        let level_filter = self
            .log_level
            .map_or_else(|| self.verbosity.tracing_level_filter(), LevelFilter::from);
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter,
            use_env_filter: !(self.verbosity.is_present() || self.log_level.is_some()),
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the HTTP API.
    Serve(ServeArgs),

    /// List the datasets in the data directory.
    Datasets(DatasetsArgs),

    /// Run the merge once and write the result.
    Run(RunArgs),
}

/// Merge settings shared by `serve` and `run`.
#[derive(Args, Clone)]
pub struct EtlArgs {
    /// Directory holding the input datasets.
    #[arg(long = "data-dir", env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Name of the merged table and of the SQLite table it is written to.
    #[arg(long = "table", env = "SQLITE_TABLE", default_value = "etl_merged")]
    pub table: String,

    /// Join datasets on this column instead of stacking them.
    #[arg(long = "join-key", env = "ETL_JOIN_KEY")]
    pub join_key: Option<String>,

    /// How rows without a match on the join key are treated.
    #[arg(
        long = "join-type",
        env = "ETL_JOIN_TYPE",
        value_enum,
        default_value = "left"
    )]
    pub join_type: JoinTypeArg,

    /// Fill missing values: numeric columns with their median, text with
    /// `--missing-text`.
    #[arg(long = "fill-missing", env = "ETL_FILL_MISSING")]
    pub fill_missing: bool,

    /// Placeholder for missing text values.
    #[arg(long = "missing-text", env = "ETL_MISSING_TEXT", default_value = "unknown")]
    pub missing_text: String,
}

/// Sink and export locations shared by `serve` and `run`.
#[derive(Args, Clone)]
pub struct OutputArgs {
    /// Directory that saved exports are written to.
    #[arg(long = "output-dir", env = "OUTPUT_DIR", default_value = "db")]
    pub output_dir: PathBuf,

    /// File name used for exports when none is requested.
    #[arg(
        long = "download-name",
        env = "DEFAULT_DOWNLOAD_NAME",
        default_value = "df_etl.csv"
    )]
    pub default_download_name: String,

    /// SQLite database file.
    #[arg(long = "sqlite-path", env = "SQLITE_PATH", default_value = "db/etl.db")]
    pub sqlite_path: PathBuf,

    /// Most rows a JSON export may contain.
    #[arg(long = "max-json-rows", env = "MAX_JSON_ROWS", default_value_t = 1000)]
    pub max_json_rows: usize,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Shared secret clients send in `X-API-Key`.
    #[arg(long = "api-key", env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Address to listen on.
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind_addr: String,

    #[command(flatten)]
    pub etl: EtlArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct DatasetsArgs {
    /// Directory holding the input datasets.
    #[arg(long = "data-dir", env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub etl: EtlArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Datasets to merge (default: all). Repeat or separate with commas.
    #[arg(long = "dataset", value_name = "NAME", value_delimiter = ',')]
    pub datasets: Vec<String>,

    /// Export format.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: FormatArg,

    /// Export file path (default: <OUTPUT_DIR>/<DOWNLOAD_NAME>).
    #[arg(long = "output", value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Skip writing the export file.
    #[arg(long = "no-export")]
    pub no_export: bool,

    /// Also write the merged table to SQLite.
    #[arg(long = "persist")]
    pub persist: bool,

    /// What to do when the SQLite table already exists.
    #[arg(long = "if-exists", value_enum, default_value = "replace")]
    pub if_exists: IfExistsArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum JoinTypeArg {
    Left,
    Inner,
}

impl From<JoinTypeArg> for JoinKind {
    fn from(arg: JoinTypeArg) -> Self {
        match arg {
            JoinTypeArg::Left => Self::Left,
            JoinTypeArg::Inner => Self::Inner,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Xlsx,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Self::Csv,
            FormatArg::Xlsx => Self::Xlsx,
            FormatArg::Json => Self::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum IfExistsArg {
    Replace,
    Append,
    Fail,
}

impl From<IfExistsArg> for IfExists {
    fn from(arg: IfExistsArg) -> Self {
        match arg {
            IfExistsArg::Replace => Self::Replace,
            IfExistsArg::Append => Self::Append,
            IfExistsArg::Fail => Self::Fail,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
