use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use tabmerge_ingest::DatasetCatalog;
use tabmerge_model::ExportFormat;
use tabmerge_output::{ExportLimits, export, save_artifact, suggested_file_name};
use tabmerge_persistence::{IfExists, SinkConfig, persist};
use tabmerge_server::{AppConfig, serve};
use tabmerge_transform::{EtlPipeline, EtlRequest, FillConfig, PipelineConfig};
use tracing::info;

use crate::cli::{DatasetsArgs, EtlArgs, OutputArgs, RunArgs, ServeArgs};

/// What an offline run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub table: String,
    pub rows: usize,
    pub columns: usize,
    pub export_path: Option<PathBuf>,
    pub persisted: Option<(PathBuf, usize)>,
}

pub fn pipeline_config(args: &EtlArgs) -> PipelineConfig {
    let mut config = PipelineConfig::new(args.data_dir.clone(), args.table.clone());
    if let Some(key) = args.join_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        config = config.with_join(key, args.join_type.into());
    }
    if args.fill_missing {
        config = config.with_fill(FillConfig {
            missing_text: args.missing_text.clone(),
        });
    }
    config
}

pub fn app_config(args: &ServeArgs) -> AppConfig {
    let pipeline = pipeline_config(&args.etl);
    AppConfig {
        api_key: args.api_key.clone(),
        bind_addr: args.bind_addr.clone(),
        data_dir: pipeline.data_dir,
        output_dir: args.output.output_dir.clone(),
        default_download_name: args.output.default_download_name.clone(),
        max_json_rows: args.output.max_json_rows,
        sqlite_path: args.output.sqlite_path.clone(),
        sqlite_table: pipeline.table_name,
        join: pipeline.join,
        fill: pipeline.fill,
    }
}

fn sink_config(etl: &EtlArgs, output: &OutputArgs) -> SinkConfig {
    SinkConfig::new(output.sqlite_path.clone(), etl.table.clone())
}

pub fn run_serve(args: &ServeArgs) -> Result<()> {
    anyhow::ensure!(!args.api_key.trim().is_empty(), "API key must not be empty");
    let config = app_config(args);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    runtime
        .block_on(serve(config))
        .context("serve HTTP API")
}

pub fn run_datasets(args: &DatasetsArgs) -> Result<()> {
    let catalog = DatasetCatalog::new(args.data_dir.clone());
    let table = datasets_table(&catalog)?;
    println!("{table}");
    Ok(())
}

/// Catalog listing rendered as a table.
pub fn datasets_table(catalog: &DatasetCatalog) -> Result<Table> {
    let entries = catalog
        .list_datasets()
        .with_context(|| format!("list datasets in {}", catalog.root().display()))?;
    let mut table = Table::new();
    table.set_header(vec!["Dataset", "Type", "Size (bytes)"]);
    apply_table_style(&mut table);
    for entry in entries {
        table.add_row(vec![entry.name, entry.ext, entry.size_bytes.to_string()]);
    }
    Ok(table)
}

/// Runs the merge once, then writes the export and/or the SQLite table.
pub fn run_etl(args: &RunArgs) -> Result<RunOutcome> {
    let pipeline = EtlPipeline::new(pipeline_config(&args.etl));
    let mut request = EtlRequest::default();
    if !args.datasets.is_empty() {
        request = request.with_datasets(args.datasets.clone());
    }
    let merged = pipeline.run(&request).context("merge datasets")?;

    let export_path = if args.no_export {
        None
    } else {
        let format = ExportFormat::from(args.format);
        let limits = ExportLimits {
            max_json_rows: args.output.max_json_rows,
        };
        let mut artifact = export(&merged, format, None, &limits)
            .with_context(|| format!("export {format}"))?;
        let path = match &args.output_file {
            Some(path) => {
                std::fs::write(path, &artifact.bytes)
                    .with_context(|| format!("write {}", path.display()))?;
                path.clone()
            }
            None => {
                artifact.file_name = suggested_file_name(
                    None,
                    &args.output.default_download_name,
                    format,
                );
                save_artifact(&artifact, &args.output.output_dir)
                    .context("save export")?
            }
        };
        info!(path = %path.display(), "Wrote export");
        Some(path)
    };

    let persisted = if args.persist {
        let sink = sink_config(&args.etl, &args.output);
        let mode = IfExists::from(args.if_exists);
        let rows = persist(&merged, &sink, mode)
            .with_context(|| format!("write table {} to {}", sink.table, sink.path.display()))?;
        Some((sink.path, rows))
    } else {
        None
    };

    Ok(RunOutcome {
        table: merged.name().to_string(),
        rows: merged.height(),
        columns: merged.width(),
        export_path,
        persisted,
    })
}

pub fn print_outcome(outcome: &RunOutcome) {
    let mut table = Table::new();
    table.set_header(vec!["Table", "Rows", "Columns", "Export", "SQLite"]);
    apply_table_style(&mut table);
    let export = outcome
        .export_path
        .as_ref()
        .map_or_else(|| "-".to_string(), |p| p.display().to_string());
    let sqlite = outcome.persisted.as_ref().map_or_else(
        || "-".to_string(),
        |(path, rows)| format!("{} ({rows} rows)", path.display()),
    );
    table.add_row(vec![
        outcome.table.clone(),
        outcome.rows.to_string(),
        outcome.columns.to_string(),
        export,
        sqlite,
    ]);
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
