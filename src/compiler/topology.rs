//! Process declarations and process topology rows.
//!
//! Each process yields one declaration row and a group of `~FI_T` rows: one per input and output
//! flow, plus rows carrying its efficiency, cost parameters, bounds and time-varying attributes.
//! Scalar attributes are collected into a [`PendingAttributes`] side-table and written into a
//! single row chosen by [`merge_target`], rather than each getting a row of its own.
use crate::model::Model;
use crate::process::{EFFICIENCY_COLUMN, Process, TimeSeries, TimeVarying};
use crate::table_ir::{Row, Scalar, row};
use crate::units::{DEFAULT_ACTIVITY_UNIT, DEFAULT_CAPACITY_UNIT};
use itertools::Itertools;

/// The row into which a process' scalar attributes are merged
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum MergeTarget {
    /// A dedicated row carrying the scalar efficiency, which also takes the first bound
    EfficiencyRow,
    /// The row for the process' first output flow
    FirstOutputRow,
    /// A row of its own, for processes with neither a scalar efficiency nor an output
    StandaloneRow,
}

/// Choose the row into which a process' scalar attributes are merged.
///
/// A scalar efficiency always gets its own row, so the attributes go there. Otherwise they join
/// the first output flow's row. A process with neither gets a standalone attribute row.
pub fn merge_target(process: &Process) -> MergeTarget {
    let has_scalar_efficiency = process
        .efficiency
        .as_ref()
        .is_some_and(|eff| eff.as_scalar().is_some());

    if has_scalar_efficiency {
        MergeTarget::EfficiencyRow
    } else if !process.outputs.is_empty() {
        MergeTarget::FirstOutputRow
    } else {
        MergeTarget::StandaloneRow
    }
}

/// Scalar attribute values waiting to be written into a row
#[derive(Default, Debug)]
struct PendingAttributes(Vec<(&'static str, f64)>);

impl PendingAttributes {
    fn push(&mut self, column: &'static str, value: f64) {
        self.0.push((column, value));
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Write all pending values into `row`, leaving the side-table empty
    fn merge_into(&mut self, row: &mut Row) {
        for (column, value) in self.0.drain(..) {
            row.insert(column.to_string(), value.into());
        }
    }
}

/// Declaration rows for the model's processes, in declaration order
pub fn process_rows(model: &Model, region: &str) -> Vec<Row> {
    model
        .processes
        .values()
        .map(|process| {
            row! {
                "region" => region,
                "process" => process.id.as_str(),
                "description" => &process.description,
                "sets" => process.sets.join(","),
                "tact" => process.activity_unit.as_deref().unwrap_or(DEFAULT_ACTIVITY_UNIT),
                "tcap" => process.capacity_unit.as_deref().unwrap_or(DEFAULT_CAPACITY_UNIT),
                "primarycg" => process.primary_commodity_group.to_string(),
            }
        })
        .collect()
}

/// The `~FI_T` rows for a single process.
///
/// # Arguments
///
/// * `process` - The process
/// * `region` - Value for the `region` column
///
/// # Returns
///
/// Rows in this order: input flows, output flows, the efficiency or standalone attribute row (if
/// any), remaining bounds, then time-varying attributes.
pub fn topology_rows(process: &Process, region: &str) -> Vec<Row> {
    let base_row = || row!("region" => region, "process" => process.id.as_str());
    let first_output = process.first_output();

    let mut pending = PendingAttributes::default();
    let mut time_varying = Vec::new();
    for (parameter, value) in &process.parameters {
        match value {
            TimeVarying::Scalar(value) => pending.push(parameter.column(), *value),
            TimeVarying::Series(series) => time_varying.push((parameter.column(), series)),
        }
    }
    if let Some(TimeVarying::Series(series)) = &process.efficiency {
        time_varying.push((EFFICIENCY_COLUMN, series));
    }

    let target = merge_target(process);
    let mut bounds = process.bounds.iter();
    let mut rows = Vec::new();

    for flow in &process.inputs {
        let mut row = base_row();
        row.insert("commodity-in".into(), flow.commodity.as_str().into());
        if let Some(share) = flow.share {
            row.insert("share-i".into(), share.into());
        }
        rows.push(row);
    }

    for (i, flow) in process.outputs.iter().enumerate() {
        let mut row = base_row();
        row.insert("commodity-out".into(), flow.commodity.as_str().into());
        if let Some(share) = flow.share {
            row.insert("share-o".into(), share.into());
        }
        if i == 0 && target == MergeTarget::FirstOutputRow {
            pending.merge_into(&mut row);
        }
        rows.push(row);
    }

    match target {
        MergeTarget::EfficiencyRow => {
            let mut row = base_row();
            if let Some(efficiency) = process.efficiency.as_ref().and_then(|e| e.as_scalar()) {
                row.insert(EFFICIENCY_COLUMN.into(), efficiency.into());
            }
            pending.merge_into(&mut row);
            if let Some(bound) = bounds.next() {
                row.insert("limtype".into(), bound.limit.code().into());
                row.insert(bound.kind.column().into(), bound.value.into());
            }
            rows.push(row);
        }
        MergeTarget::StandaloneRow if !pending.is_empty() => {
            let mut row = base_row();
            if let Some(commodity) = process.first_input() {
                row.insert("commodity-in".into(), commodity.as_str().into());
            }
            pending.merge_into(&mut row);
            rows.push(row);
        }
        _ => {}
    }

    for bound in bounds {
        let mut row = base_row();
        if let Some(commodity) = first_output {
            row.insert("commodity-out".into(), commodity.as_str().into());
        }
        row.insert("limtype".into(), bound.limit.code().into());
        row.insert(bound.kind.column().into(), bound.value.into());
        rows.push(row);
    }

    for (column, series) in time_varying {
        let mut anchor = base_row();
        if let Some(commodity) = first_output {
            anchor.insert("commodity-out".into(), commodity.as_str().into());
        }
        rows.extend(expand_time_varying_attr(column, series, &anchor));
    }

    rows
}

/// Expand a time-varying process attribute into year-indexed rows.
///
/// Only the declared years are emitted. Unless the interpolation mode is `none`, they are
/// preceded by a marker row at year 0 holding the mode's code, which tells the downstream tool how
/// to fill in the other years.
///
/// # Arguments
///
/// * `column` - The attribute's column
/// * `series` - The declared values
/// * `anchor` - Columns copied into every row (region, process and commodity reference)
pub fn expand_time_varying_attr(column: &str, series: &TimeSeries, anchor: &Row) -> Vec<Row> {
    let marker = (series.interpolation.code() != -1)
        .then_some((0, Scalar::Int(series.interpolation.code())));
    let values = series
        .values
        .iter()
        .map(|(&year, &value)| (year, Scalar::Float(value)));

    marker
        .into_iter()
        .chain(values)
        .map(|(year, value)| {
            let mut row = anchor.clone();
            row.insert("year".into(), year.into());
            row.insert(column.into(), value);
            row
        })
        .collect_vec()
}
