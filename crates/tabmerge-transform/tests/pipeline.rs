//! End-to-end pipeline runs over fixture directories.

use std::path::Path;

use tabmerge_model::{Cell, ScalarKind};
use tabmerge_transform::{
    EtlPipeline, EtlRequest, FillConfig, JoinKind, PipelineConfig, TransformError,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "customers.csv",
        "id,name,region\n1,Ada,north\n2,Linus,south\n3,Grace,\n4,Ken,east\n",
    );
    write(
        dir.path(),
        "orders.csv",
        "id,total,region\n 1 ,10.5,N\n3,7,S\n3,8,S\n9,1,X\n",
    );
    dir
}

#[test]
fn concatenation_sums_row_counts() {
    let dir = fixture();
    let pipeline = EtlPipeline::new(PipelineConfig::new(dir.path(), "etl_merged"));
    let table = pipeline.run(&EtlRequest::default()).unwrap();

    assert_eq!(table.name(), "etl_merged");
    assert_eq!(table.height(), 8);
    assert_eq!(table.column_names(), vec!["id", "name", "region", "total"]);
    assert_eq!(table.kind_of("total"), Some(ScalarKind::Float));
    assert_eq!(table.kind_of("id"), Some(ScalarKind::Integer));
}

#[test]
fn left_join_keeps_base_rows() {
    let dir = fixture();
    let config = PipelineConfig::new(dir.path(), "etl_merged").with_join("id", JoinKind::Left);
    let table = EtlPipeline::new(config)
        .run(&EtlRequest::default())
        .unwrap();

    assert_eq!(table.height(), 4);
    assert_eq!(
        table.column_names(),
        vec!["id", "name", "region", "total", "region_orders"]
    );
    assert_eq!(table.kind_of("id"), Some(ScalarKind::String));

    let totals = table.cells(3).unwrap();
    assert_eq!(totals.get(0), Cell::Float(10.5));
    assert_eq!(totals.get(1), Cell::Null);
    // First matching row wins for duplicated right keys.
    assert_eq!(totals.get(2), Cell::Float(7.0));
}

#[test]
fn inner_join_keeps_matched_rows() {
    let dir = fixture();
    let config = PipelineConfig::new(dir.path(), "etl_merged").with_join("id", JoinKind::Inner);
    let table = EtlPipeline::new(config)
        .run(&EtlRequest::default())
        .unwrap();

    assert_eq!(table.height(), 2);
    let ids = table.cells(0).unwrap();
    assert_eq!(ids.get(0), Cell::Text("1"));
    assert_eq!(ids.get(1), Cell::Text("3"));
}

#[test]
fn missing_join_key_is_malformed() {
    let dir = fixture();
    write(dir.path(), "extra.csv", "code\nA\n");
    let config = PipelineConfig::new(dir.path(), "etl_merged").with_join("id", JoinKind::Left);
    let err = EtlPipeline::new(config)
        .run(&EtlRequest::default())
        .unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn fill_missing_uses_placeholder() {
    let dir = fixture();
    let config = PipelineConfig::new(dir.path(), "etl_merged").with_fill(FillConfig {
        missing_text: "n/a".to_string(),
    });
    let table = EtlPipeline::new(config)
        .run(&EtlRequest::default().with_datasets(vec!["customers.csv".to_string()]))
        .unwrap();

    let regions = table.cells(2).unwrap();
    assert_eq!(regions.get(2), Cell::Text("n/a"));
}

#[test]
fn selection_and_row_limit() {
    let dir = fixture();
    let pipeline = EtlPipeline::new(PipelineConfig::new(dir.path(), "etl_merged"));

    let table = pipeline
        .run(&EtlRequest::default().with_datasets(vec!["orders.csv".to_string()]))
        .unwrap();
    assert_eq!(table.height(), 4);

    let err = pipeline
        .run(&EtlRequest::default().with_row_limit(5))
        .unwrap_err();
    assert!(matches!(
        err,
        TransformError::RowLimitExceeded { rows: 8, limit: 5 }
    ));
}

#[test]
fn unknown_dataset_is_not_found() {
    let dir = fixture();
    let pipeline = EtlPipeline::new(PipelineConfig::new(dir.path(), "etl_merged"));
    let err = pipeline
        .run(&EtlRequest::default().with_datasets(vec!["nope.csv".to_string()]))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn empty_catalog_has_no_datasets() {
    let dir = TempDir::new().unwrap();
    let pipeline = EtlPipeline::new(PipelineConfig::new(dir.path(), "etl_merged"));
    let err = pipeline.run(&EtlRequest::default()).unwrap_err();
    assert!(matches!(err, TransformError::NoDatasets));
}

#[test]
fn describe_reports_kinds_and_rows() {
    let dir = fixture();
    write(dir.path(), "padded.csv", "code,amount,empty\nA, 12 ,\nB,,\n");
    let pipeline = EtlPipeline::new(PipelineConfig::new(dir.path(), "etl_merged"));
    let schema = pipeline.describe("padded.csv").unwrap();

    assert_eq!(schema.rows, 2);
    let kinds: Vec<(&str, ScalarKind)> = schema
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![("code", ScalarKind::String), ("amount", ScalarKind::Integer)]
    );
}
