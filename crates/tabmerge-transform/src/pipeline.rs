//! The ETL pipeline: select, load, normalize, merge, fill.

use polars::prelude::DataFrame;
use serde::Serialize;
use tabmerge_ingest::{DatasetCatalog, dataset_stem, read_dataset};
use tabmerge_model::{CombinedTable, TableColumn};

use crate::config::PipelineConfig;
use crate::error::{Result, TransformError};
use crate::merge::{concat_frames, join_frames};
use crate::normalization::{fill_missing, normalize_dataset};

/// Parameters of one pipeline invocation.
#[derive(Debug, Clone, Default)]
pub struct EtlRequest {
    /// Datasets to merge, in order. `None` selects the whole catalog.
    pub datasets: Option<Vec<String>>,
    /// Fail with [`TransformError::RowLimitExceeded`] above this many rows.
    pub row_limit: Option<usize>,
}

impl EtlRequest {
    pub fn with_datasets(mut self, datasets: Vec<String>) -> Self {
        self.datasets = Some(datasets);
        self
    }

    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }
}

/// Columns and row count of one normalized dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSchema {
    pub name: String,
    pub rows: usize,
    pub columns: Vec<TableColumn>,
}

/// Runs merges against the configured data directory.
///
/// Holds no state between runs: every call rescans and rereads the inputs.
#[derive(Debug, Clone)]
pub struct EtlPipeline {
    config: PipelineConfig,
    catalog: DatasetCatalog,
}

impl EtlPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let catalog = DatasetCatalog::new(config.data_dir.clone());
        Self { config, catalog }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    /// Loads, normalizes and merges the requested datasets.
    pub fn run(&self, request: &EtlRequest) -> Result<CombinedTable> {
        let names = match &request.datasets {
            Some(names) => names.clone(),
            None => self.catalog.names()?,
        };
        if names.is_empty() {
            return Err(TransformError::NoDatasets);
        }

        let span = tracing::info_span!(
            "etl",
            datasets = names.len(),
            join = self.config.join_key().unwrap_or("-")
        );
        let _guard = span.enter();

        let key = self.config.join_key();
        let mut frames = Vec::with_capacity(names.len());
        for name in &names {
            let df = self.load_frame(name, key)?;
            tracing::debug!(dataset = %name, rows = df.height(), columns = df.width(), "Loaded dataset");
            frames.push((name.as_str(), df));
        }

        let merged = self.merge(frames)?;
        let merged = match &self.config.fill {
            Some(fill) => fill_missing(merged, fill)?,
            None => merged,
        };
        let table = CombinedTable::from_frame(self.config.table_name.clone(), merged)?;

        if let Some(limit) = request.row_limit
            && table.height() > limit
        {
            return Err(TransformError::RowLimitExceeded {
                rows: table.height(),
                limit,
            });
        }

        tracing::info!(
            rows = table.height(),
            columns = table.width(),
            "Merged datasets"
        );
        Ok(table)
    }

    fn merge(&self, frames: Vec<(&str, DataFrame)>) -> Result<DataFrame> {
        let Some(join) = &self.config.join else {
            return concat_frames(frames.into_iter().map(|(_, df)| df).collect());
        };

        let mut frames = frames.into_iter();
        let Some((_, mut merged)) = frames.next() else {
            return Err(TransformError::NoDatasets);
        };
        for (name, df) in frames {
            merged = join_frames(&merged, &df, &join.key, join.kind, dataset_stem(name))?;
        }
        Ok(merged)
    }

    fn load_frame(&self, name: &str, key: Option<&str>) -> Result<DataFrame> {
        let path = self.catalog.resolve(name)?;
        let df = read_dataset(&path)?;
        normalize_dataset(df, name, key)
    }

    /// One dataset, normalized, as a table named after the file.
    pub fn load_dataset(&self, name: &str) -> Result<CombinedTable> {
        let df = self.load_frame(name, None)?;
        Ok(CombinedTable::from_frame(name, df)?)
    }

    /// Column kinds and row count of one dataset.
    pub fn describe(&self, name: &str) -> Result<DatasetSchema> {
        let table = self.load_dataset(name)?;
        Ok(DatasetSchema {
            name: name.to_string(),
            rows: table.height(),
            columns: table.columns().to_vec(),
        })
    }
}
