//! Offline runs through the parsed command line.

use std::path::Path;

use clap::Parser;
use tabmerge_cli::cli::{Cli, Command, RunArgs};
use tabmerge_cli::commands::{app_config, datasets_table, run_etl};
use tabmerge_ingest::DatasetCatalog;
use tabmerge_transform::JoinKind;
use tempfile::TempDir;

fn write_inputs(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("a.csv"), "id,name\n1,ann\n2,bob\n").unwrap();
    std::fs::write(dir.join("b.csv"), "id,total\n1,3\n").unwrap();
}

fn run_args(args: &[&str]) -> RunArgs {
    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Command::Run(args) => args,
        _ => panic!("expected run subcommand"),
    }
}

#[test]
fn run_writes_export_and_sink() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    write_inputs(&data);
    let data = data.to_string_lossy().to_string();
    let out = dir.path().join("out").to_string_lossy().to_string();
    let db = dir.path().join("etl.db").to_string_lossy().to_string();

    let args = run_args(&[
        "tabmerge",
        "run",
        "--data-dir",
        &data,
        "--output-dir",
        &out,
        "--download-name",
        "merged.csv",
        "--sqlite-path",
        &db,
        "--table",
        "etl_merged",
        "--persist",
    ]);
    let outcome = run_etl(&args).unwrap();

    assert_eq!(outcome.rows, 3);
    assert_eq!(outcome.columns, 3);
    let export = outcome.export_path.unwrap();
    assert_eq!(export, Path::new(&out).join("merged.csv"));
    let text = std::fs::read_to_string(export).unwrap();
    assert_eq!(text.lines().next(), Some("id,name,total"));

    let (path, rows) = outcome.persisted.unwrap();
    assert_eq!(path, Path::new(&db));
    assert_eq!(rows, 3);
}

#[test]
fn run_joins_selected_datasets() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    write_inputs(&data);
    let data = data.to_string_lossy().to_string();
    let file = dir.path().join("merged.json").to_string_lossy().to_string();

    let args = run_args(&[
        "tabmerge",
        "run",
        "--data-dir",
        &data,
        "--join-key",
        "id",
        "--join-type",
        "inner",
        "--dataset",
        "a.csv,b.csv",
        "--format",
        "json",
        "--output",
        &file,
    ]);
    let outcome = run_etl(&args).unwrap();
    assert_eq!(outcome.rows, 1);
    assert!(outcome.persisted.is_none());

    let rows: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(rows[0]["name"], "ann");
    assert_eq!(rows[0]["total"], 3);
}

#[test]
fn serve_args_become_app_config() {
    let cli = Cli::try_parse_from([
        "tabmerge",
        "serve",
        "--api-key",
        "secret",
        "--data-dir",
        "inputs",
        "--join-key",
        " id ",
        "--fill-missing",
        "--max-json-rows",
        "50",
    ])
    .unwrap();
    let Command::Serve(args) = cli.command else {
        panic!("expected serve subcommand");
    };

    let config = app_config(&args);
    assert_eq!(config.api_key, "secret");
    assert_eq!(config.data_dir, Path::new("inputs"));
    assert_eq!(config.max_json_rows, 50);
    let join = config.join.unwrap();
    assert_eq!(join.key, "id");
    assert_eq!(join.kind, JoinKind::Left);
    assert!(config.fill.is_some());
}

#[test]
fn datasets_table_lists_files() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());

    let table = datasets_table(&DatasetCatalog::new(dir.path())).unwrap();
    let rendered = table.to_string();
    assert!(rendered.contains("a.csv"));
    assert!(rendered.contains("b.csv"));
    assert!(rendered.contains(".csv"));
}
