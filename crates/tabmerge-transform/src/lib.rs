//! Merge pipeline for tabmerge.
//!
//! Loads the selected datasets, normalizes each one, then merges them into a
//! single [`tabmerge_model::CombinedTable`].
//!
//! # Overview
//!
//! - **Normalization**: trimmed column names, empty columns dropped, text
//!   columns holding only numbers coerced to Int64 or Float64
//! - **Join**: when a join key is configured, every dataset after the first
//!   is joined onto the first (`left` or `inner`)
//! - **Concatenate**: without a join key, rows are stacked over the union of
//!   all columns
//! - **Missing values**: optional median / placeholder filling
//!
//! # Example
//!
//! ```ignore
//! use tabmerge_transform::{EtlPipeline, EtlRequest, PipelineConfig};
//!
//! let pipeline = EtlPipeline::new(PipelineConfig::new("data", "etl_merged"));
//! let table = pipeline.run(&EtlRequest::default())?;
//! println!("{} rows x {} columns", table.height(), table.width());
//! ```

mod config;
mod error;
mod merge;
mod pipeline;

pub mod normalization;

// === Configuration ===
pub use config::{FillConfig, JoinConfig, JoinKind, PipelineConfig};

// === Error Types ===
pub use error::{Result, TransformError};

// === Merge ===
pub use merge::{concat_frames, join_frames};

// === Pipeline ===
pub use pipeline::{DatasetSchema, EtlPipeline, EtlRequest};
