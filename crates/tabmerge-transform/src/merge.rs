//! Row concatenation and key joins of normalized frames.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use polars::prelude::{Column, DataFrame, IdxCa, IdxSize, NewChunkedArray};
use tabmerge_model::ScalarKind;

use crate::config::JoinKind;
use crate::error::{Result, TransformError};

/// Stacks frames over the ordered union of their columns.
///
/// Columns appear in first-seen order. A column absent from a frame is null
/// for that frame's rows. Kinds are reconciled with [`ScalarKind::unify`];
/// frames without rows do not take part in that decision.
pub fn concat_frames(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut order: Vec<String> = Vec::new();
    let mut kinds: BTreeMap<String, Option<ScalarKind>> = BTreeMap::new();

    for df in &frames {
        for column in df.get_columns() {
            let name = column.name().to_string();
            let kind = (df.height() > 0).then(|| ScalarKind::from_dtype(column.dtype()));
            match kinds.get_mut(&name) {
                Some(slot) => {
                    if let Some(kind) = kind {
                        *slot = Some(slot.map_or(kind, |existing| existing.unify(kind)));
                    }
                }
                None => {
                    order.push(name.clone());
                    kinds.insert(name, kind);
                }
            }
        }
    }

    let mut stacked: Option<DataFrame> = None;
    for df in frames {
        let aligned = align_frame(&df, &order, &kinds)?;
        match stacked.as_mut() {
            Some(acc) => {
                acc.vstack_mut(&aligned)?;
            }
            None => stacked = Some(aligned),
        }
    }

    stacked.ok_or(TransformError::NoDatasets)
}

fn align_frame(
    df: &DataFrame,
    order: &[String],
    kinds: &BTreeMap<String, Option<ScalarKind>>,
) -> Result<DataFrame> {
    let height = df.height();
    let mut columns = Vec::with_capacity(order.len());
    for name in order {
        let dtype = kinds
            .get(name)
            .copied()
            .flatten()
            .unwrap_or(ScalarKind::String)
            .dtype();
        let column = match df.column(name) {
            Ok(column) if column.dtype() == &dtype => column.clone(),
            Ok(column) => column.cast(&dtype)?,
            Err(_) => Column::full_null(name.as_str().into(), height, &dtype),
        };
        columns.push(column);
    }
    Ok(DataFrame::new(columns)?)
}

/// Joins `right` onto `base` by the text column `key`.
///
/// Base row order is preserved. For a `left` join every base row is kept and
/// unmatched rows get nulls; for an `inner` join only matched rows are kept.
/// When `right` repeats a key, its first row wins. Non-key columns of `right`
/// whose names are already taken are renamed `<name>_<suffix>`, then
/// `<name>_<suffix>_2` and so on.
pub fn join_frames(
    base: &DataFrame,
    right: &DataFrame,
    key: &str,
    kind: JoinKind,
    suffix: &str,
) -> Result<DataFrame> {
    let right_keys = right.column(key)?.as_materialized_series().str()?;
    let mut first_row: HashMap<&str, IdxSize> = HashMap::new();
    for (row, value) in right_keys.into_iter().enumerate() {
        if let Some(value) = value {
            first_row.entry(value).or_insert(row as IdxSize);
        }
    }

    let base_keys = base.column(key)?.as_materialized_series().str()?;
    let mut base_rows: Vec<IdxSize> = Vec::with_capacity(base.height());
    let mut right_rows: Vec<Option<IdxSize>> = Vec::with_capacity(base.height());
    for (row, value) in base_keys.into_iter().enumerate() {
        let hit = value.and_then(|v| first_row.get(v).copied());
        if kind == JoinKind::Inner && hit.is_none() {
            continue;
        }
        base_rows.push(row as IdxSize);
        right_rows.push(hit);
    }

    let left = base.take(&IdxCa::from_vec("base".into(), base_rows))?;
    let right_idx = IdxCa::from_iter_options("right".into(), right_rows.into_iter());
    let matched = right.drop(key)?.take(&right_idx)?;

    let mut taken: BTreeSet<String> = left
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut incoming = matched.take_columns();
    for column in &mut incoming {
        let name = unique_name(column.name().as_str(), suffix, &taken);
        if name != column.name().as_str() {
            tracing::debug!(from = %column.name(), to = %name, "Renamed conflicting column");
            column.rename(name.as_str().into());
        }
        taken.insert(name);
    }

    Ok(left.hstack(&incoming)?)
}

fn unique_name(name: &str, suffix: &str, taken: &BTreeSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let base = format!("{name}_{suffix}");
    if !taken.contains(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}
