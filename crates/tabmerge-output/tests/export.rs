//! Export behaviour across formats.

use std::io::Write;

use polars::prelude::{DataType, IntoColumn, NamedFrom, Series, TimeUnit};
use serde_json::json;
use tabmerge_model::{CombinedTable, ExportFormat, Page};
use tabmerge_output::{ExportLimits, OutputError, export, write_csv};
use tempfile::NamedTempFile;

fn sample_table() -> CombinedTable {
    let columns = vec![
        Series::new("id".into(), &[1i64, 2, 3]).into_column(),
        Series::new("score".into(), &[Some(1.5f64), None, Some(2.0)]).into_column(),
        Series::new("name".into(), &["a", "b,c", "say \"hi\""]).into_column(),
        Series::new("flag".into(), &[true, false, true]).into_column(),
    ];
    CombinedTable::from_columns("etl_merged", columns).unwrap()
}

fn numbered_table(rows: i64) -> CombinedTable {
    let ids: Vec<i64> = (0..rows).collect();
    let columns = vec![Series::new("id".into(), ids).into_column()];
    CombinedTable::from_columns("numbers", columns).unwrap()
}

#[test]
fn csv_export_text() {
    let artifact = export(&sample_table(), ExportFormat::Csv, None, &ExportLimits::default()).unwrap();
    assert_eq!(artifact.content_type, "text/csv; charset=utf-8");
    assert_eq!(artifact.file_name, "etl_merged.csv");

    let text = String::from_utf8(artifact.bytes).unwrap();
    insta::assert_snapshot!(text.trim_end(), @r#"
    id,score,name,flag
    1,1.5,a,true
    2,,"b,c",false
    3,2,"say ""hi""",true
    "#);
}

#[test]
fn csv_export_timestamps() {
    // 2024-01-15 08:30:00 and 08:30:00.250 UTC
    let millis = Series::new("at".into(), &[1_705_307_400_000i64, 1_705_307_400_250])
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .unwrap();
    let table = CombinedTable::from_columns("events", vec![millis.into_column()]).unwrap();

    let text = String::from_utf8(write_csv(&table).unwrap()).unwrap();
    assert_eq!(text, "at\n2024-01-15 08:30:00\n2024-01-15 08:30:00.250\n");
}

#[test]
fn exports_are_deterministic() {
    let table = sample_table();
    let limits = ExportLimits::default();
    for format in [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Json] {
        let first = export(&table, format, None, &limits).unwrap();
        let second = export(&table, format, None, &limits).unwrap();
        assert_eq!(first.bytes, second.bytes, "{format} output differs");
        assert!(!first.bytes.is_empty());
    }
}

#[test]
fn xlsx_export_is_a_zip_package() {
    let artifact = export(&sample_table(), ExportFormat::Xlsx, None, &ExportLimits::default()).unwrap();
    assert_eq!(
        artifact.content_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(&artifact.bytes[..2], b"PK");
}

#[test]
fn csv_round_trips_through_reader() {
    let table = sample_table();
    let bytes = write_csv(&table).unwrap();

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    let df = tabmerge_ingest::read_dataset(file.path()).unwrap();

    let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    assert_eq!(names, table.column_names());
    assert_eq!(df.height(), table.height());
}

#[test]
fn json_export_rows() {
    let artifact = export(&sample_table(), ExportFormat::Json, None, &ExportLimits::default()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    assert_eq!(
        value,
        json!([
            {"id": 1, "score": 1.5, "name": "a", "flag": true},
            {"id": 2, "score": null, "name": "b,c", "flag": false},
            {"id": 3, "score": 2.0, "name": "say \"hi\"", "flag": true}
        ])
    );

    // Keys keep column order.
    let text = String::from_utf8(artifact.bytes).unwrap();
    assert!(text.starts_with(r#"[{"id":1,"score":1.5,"name":"a","flag":true}"#));
}

#[test]
fn json_non_finite_floats_are_null() {
    let columns = vec![Series::new("v".into(), &[f64::NAN, f64::INFINITY, 1.0]).into_column()];
    let table = CombinedTable::from_columns("floats", columns).unwrap();
    let artifact = export(&table, ExportFormat::Json, None, &ExportLimits::default()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    assert_eq!(value, json!([{"v": null}, {"v": null}, {"v": 1.0}]));
}

#[test]
fn json_export_respects_row_limit() {
    let table = numbered_table(5);
    let limits = ExportLimits { max_json_rows: 3 };

    let err = export(&table, ExportFormat::Json, None, &limits).unwrap_err();
    assert!(matches!(err, OutputError::RowLimitExceeded { rows: 5, limit: 3 }));

    let err = export(&table, ExportFormat::Json, Some(Page::new(0, 10)), &limits).unwrap_err();
    assert!(matches!(err, OutputError::RowLimitExceeded { rows: 10, limit: 3 }));

    let artifact = export(&table, ExportFormat::Json, Some(Page::new(1, 2)), &limits).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    assert_eq!(value, json!([{"id": 1}, {"id": 2}]));

    // Unbounded formats ignore the cap.
    assert!(export(&table, ExportFormat::Csv, None, &limits).is_ok());
}

#[test]
fn pagination_windows_rows() {
    let table = numbered_table(10);
    let limits = ExportLimits::default();

    let artifact = export(&table, ExportFormat::Csv, Some(Page::new(8, 5)), &limits).unwrap();
    assert_eq!(String::from_utf8(artifact.bytes).unwrap(), "id\n8\n9\n");

    let past_end = export(&table, ExportFormat::Csv, Some(Page::new(50, 5)), &limits).unwrap();
    assert_eq!(String::from_utf8(past_end.bytes).unwrap(), "id\n");
}
