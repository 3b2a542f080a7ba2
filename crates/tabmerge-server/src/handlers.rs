//! Route handlers.

use std::path::PathBuf;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tabmerge_model::{CombinedTable, ExportFormat, Page};
use tabmerge_output::{ExportArtifact, export, save_artifact, suggested_file_name};
use tabmerge_persistence::{IfExists, persist_async};
use tabmerge_transform::{DatasetSchema, EtlRequest};

use crate::error::ApiError;
use crate::state::AppState;

const SAVED_PATH_HEADER: HeaderName = HeaderName::from_static("x-saved-path");
const TOTAL_ROWS_HEADER: HeaderName = HeaderName::from_static("x-total-rows");

#[derive(Debug, Default, Deserialize)]
pub struct DatasetQuery {
    format: Option<String>,
    offset: Option<usize>,
    limit: Option<usize>,
    columns: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    offset: Option<usize>,
    limit: Option<usize>,
    datasets: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    format: Option<String>,
    offset: Option<usize>,
    /// 1-based page number, counted in `limit` rows.
    page: Option<usize>,
    limit: Option<usize>,
    filename: Option<String>,
    #[serde(default)]
    persist: bool,
    datasets: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PersistQuery {
    table: Option<String>,
    if_exists: Option<String>,
    datasets: Option<String>,
}

/// Unwraps a query string, turning parse failures into a JSON 400.
fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Runs synchronous work on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
}

/// Comma separated list; blank entries dropped, empty list means "unset".
fn split_list(raw: Option<&str>) -> Option<Vec<String>> {
    let items: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

fn parse_format(raw: Option<&str>, default: ExportFormat) -> Result<ExportFormat, ApiError> {
    match raw {
        Some(value) => Ok(value.parse::<ExportFormat>()?),
        None => Ok(default),
    }
}

/// Window from `offset`/`limit`; `None` when neither is given.
fn page_from(offset: Option<usize>, limit: Option<usize>, default_limit: usize) -> Option<Page> {
    if offset.is_none() && limit.is_none() {
        return None;
    }
    Some(Page::new(
        offset.unwrap_or(0),
        limit.unwrap_or(default_limit),
    ))
}

/// Window from either `offset` or a 1-based `page` number.
fn download_page(
    offset: Option<usize>,
    page: Option<usize>,
    limit: Option<usize>,
    default_limit: usize,
) -> Result<Option<Page>, ApiError> {
    match (offset, page) {
        (Some(_), Some(_)) => Err(ApiError::BadRequest(
            "use either offset or page, not both".to_string(),
        )),
        (None, Some(0)) => Err(ApiError::BadRequest("page numbers start at 1".to_string())),
        (None, Some(page)) => {
            let limit = limit.unwrap_or(default_limit);
            Ok(Some(Page::new((page - 1).saturating_mul(limit), limit)))
        }
        (offset, None) => Ok(page_from(offset, limit, default_limit)),
    }
}

fn etl_request(datasets: Option<&str>) -> EtlRequest {
    match split_list(datasets) {
        Some(names) => EtlRequest::default().with_datasets(names),
        None => EtlRequest::default(),
    }
}

fn artifact_response(
    artifact: ExportArtifact,
    attachment: bool,
    saved: Option<PathBuf>,
) -> Result<Response, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(artifact.content_type),
    );
    if attachment {
        let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
        let value = HeaderValue::from_str(&disposition)
            .map_err(|e| ApiError::Internal(format!("bad Content-Disposition: {e}")))?;
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Some(path) = saved {
        match HeaderValue::from_str(&path.display().to_string()) {
            Ok(value) => {
                headers.insert(SAVED_PATH_HEADER, value);
            }
            Err(_) => tracing::warn!(path = %path.display(), "Saved path is not a valid header value"),
        }
    }
    Ok((headers, artifact.bytes).into_response())
}

/// `GET /`
pub async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "tabmerge",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": state.uptime_secs(),
    }))
}

/// `GET /datasets`
pub async fn list_datasets(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let pipeline = state.pipeline.clone();
    let entries = blocking(move || Ok(pipeline.catalog().list_datasets()?)).await?;
    Ok(Json(json!({
        "count": entries.len(),
        "datasets": entries,
    })))
}

/// `GET /datasets/{name}/schema`
pub async fn dataset_schema(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DatasetSchema>, ApiError> {
    let pipeline = state.pipeline.clone();
    let schema = blocking(move || Ok(pipeline.describe(&name)?)).await?;
    Ok(Json(schema))
}

/// `GET /datasets/{name}`
///
/// JSON responses are always windowed, defaulting to the first
/// `max_json_rows` rows.
pub async fn dataset_data(
    State(state): State<AppState>,
    Path(name): Path<String>,
    params: Result<Query<DatasetQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = query(params)?;
    let format = parse_format(params.format.as_deref(), ExportFormat::Json)?;
    let limits = state.config.export_limits();
    let page = match format {
        ExportFormat::Json => Some(Page::new(
            params.offset.unwrap_or(0),
            params.limit.unwrap_or(limits.max_json_rows),
        )),
        _ => page_from(params.offset, params.limit, limits.max_json_rows),
    };
    let columns = split_list(params.columns.as_deref());

    let pipeline = state.pipeline.clone();
    let artifact = blocking(move || {
        let mut table = pipeline.load_dataset(&name)?;
        if let Some(columns) = columns {
            table = table.select(&columns)?;
        }
        let mut artifact = export(&table, format, page, &limits)?;
        artifact.file_name = suggested_file_name(None, table.name(), format);
        Ok(artifact)
    })
    .await?;

    let attachment = format != ExportFormat::Json;
    artifact_response(artifact, attachment, None)
}

/// `GET /etl/preview`
pub async fn etl_preview(
    State(state): State<AppState>,
    params: Result<Query<PreviewQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = query(params)?;
    let limits = state.config.export_limits();
    let page = Page::new(
        params.offset.unwrap_or(0),
        params.limit.unwrap_or(limits.max_json_rows),
    );
    let request = etl_request(params.datasets.as_deref());

    let pipeline = state.pipeline.clone();
    let (artifact, total) = blocking(move || {
        let table = pipeline.run(&request)?;
        let artifact = export(&table, ExportFormat::Json, Some(page), &limits)?;
        Ok((artifact, table.height()))
    })
    .await?;

    let mut response = artifact_response(artifact, false, None)?;
    response
        .headers_mut()
        .insert(TOTAL_ROWS_HEADER, HeaderValue::from(total));
    Ok(response)
}

/// `GET /etl/download`
pub async fn etl_download(
    State(state): State<AppState>,
    params: Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = query(params)?;
    // Reject bad formats before any pipeline work.
    let format = parse_format(params.format.as_deref(), ExportFormat::Csv)?;
    let limits = state.config.export_limits();
    let page = download_page(
        params.offset,
        params.page,
        params.limit,
        limits.max_json_rows,
    )?;
    let request = etl_request(params.datasets.as_deref());
    let file_name = suggested_file_name(
        params.filename.as_deref(),
        &state.config.default_download_name,
        format,
    );
    let save_dir = params.persist.then(|| state.config.output_dir.clone());

    let pipeline = state.pipeline.clone();
    let (artifact, saved) = blocking(move || {
        let table = pipeline.run(&request)?;
        let mut artifact = export(&table, format, page, &limits)?;
        artifact.file_name = file_name;
        let saved = match save_dir {
            Some(dir) => Some(save_artifact(&artifact, &dir)?),
            None => None,
        };
        Ok((artifact, saved))
    })
    .await?;

    artifact_response(artifact, true, saved)
}

/// `POST /etl/persist`
pub async fn etl_persist(
    State(state): State<AppState>,
    params: Result<Query<PersistQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let params = query(params)?;
    let mode = match params.if_exists.as_deref() {
        Some(raw) => raw.parse::<IfExists>().map_err(ApiError::BadRequest)?,
        None => IfExists::default(),
    };
    let mut sink = state.config.sink_config();
    if let Some(table) = params.table {
        sink = sink.with_table(table);
    }
    let request = etl_request(params.datasets.as_deref());

    let pipeline = state.pipeline.clone();
    let table: CombinedTable = blocking(move || Ok(pipeline.run(&request)?)).await?;
    let rows = persist_async(table, sink.clone(), mode).await?;

    tracing::info!(rows, table = %sink.table, if_exists = %mode, "Persisted merged table");
    Ok(Json(json!({
        "status": "ok",
        "rows": rows,
        "sqlite_path": sink.path.display().to_string(),
        "table": sink.table,
        "if_exists": mode.as_str(),
    })))
}
