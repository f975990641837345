//! Code for reading process definitions from a source document.
use crate::commodity::CommodityID;
use crate::process::{
    BoundKind, BoundSpec, Flow, PrimaryCommodityGroup, Process, ProcessBound, ProcessID,
    ProcessMap, ProcessParameter, TimeVarying,
};
use anyhow::{Context, Result, bail, ensure};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Deserialize;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// A process as written in a source document
#[derive(PartialEq, Debug, Deserialize)]
pub struct ProcessRaw {
    name: ProcessID,
    #[serde(default)]
    description: String,
    #[serde(default)]
    sets: Vec<String>,
    primary_commodity_group: Option<String>,
    input: Option<CommodityID>,
    inputs: Option<Vec<Flow>>,
    output: Option<CommodityID>,
    outputs: Option<Vec<Flow>>,
    activity_unit: Option<String>,
    capacity_unit: Option<String>,
    efficiency: Option<TimeVarying>,
    invcost: Option<TimeVarying>,
    fixom: Option<TimeVarying>,
    varom: Option<TimeVarying>,
    life: Option<TimeVarying>,
    cost: Option<TimeVarying>,
    availability_factor: Option<TimeVarying>,
    activity_bound: Option<BoundSpec>,
    cap_bound: Option<BoundSpec>,
    ncap_bound: Option<BoundSpec>,
}

impl ProcessRaw {
    /// Take the value of a parameter, if declared
    fn take_parameter(&mut self, parameter: ProcessParameter) -> Option<TimeVarying> {
        match parameter {
            ProcessParameter::InvestmentCost => self.invcost.take(),
            ProcessParameter::FixedOperatingCost => self.fixom.take(),
            ProcessParameter::VariableOperatingCost => self.varom.take(),
            ProcessParameter::Lifetime => self.life.take(),
            ProcessParameter::Cost => self.cost.take(),
            ProcessParameter::AvailabilityFactor => self.availability_factor.take(),
        }
    }
}

/// Normalise the single-commodity shorthand (e.g. `input: NG`) and the list form into flows
fn normalise_flows(
    process_id: &ProcessID,
    direction: &str,
    single: Option<CommodityID>,
    list: Option<Vec<Flow>>,
) -> Result<Vec<Flow>> {
    match (single, list) {
        (Some(_), Some(_)) => bail!(
            "Process '{process_id}' declares both '{direction}' and '{direction}s'. Use only one."
        ),
        (Some(commodity), None) => Ok(vec![Flow::new(commodity)]),
        (None, Some(flows)) => Ok(flows),
        (None, None) => Ok(Vec::new()),
    }
}

/// Parse and check a process' primary commodity group
fn parse_primary_commodity_group(
    process_id: &ProcessID,
    pcg: Option<&str>,
) -> Result<PrimaryCommodityGroup> {
    let pcg = pcg.with_context(|| {
        format!("Process '{process_id}' is missing required field 'primary_commodity_group'")
    })?;

    PrimaryCommodityGroup::from_str(pcg).ok().with_context(|| {
        format!(
            "Process '{process_id}' has invalid primary_commodity_group '{pcg}'. \
             Must be one of: {}",
            PrimaryCommodityGroup::iter().join(", ")
        )
    })
}

/// Flatten a process' bound specifications into individual bounds, in declaration order
fn collect_bounds(raw: &mut ProcessRaw) -> Vec<ProcessBound> {
    [
        (BoundKind::Activity, raw.activity_bound.take()),
        (BoundKind::Capacity, raw.cap_bound.take()),
        (BoundKind::NewCapacity, raw.ncap_bound.take()),
    ]
    .into_iter()
    .flat_map(|(kind, spec)| {
        spec.unwrap_or_default()
            .into_iter()
            .map(move |(limit, value)| ProcessBound { kind, limit, value })
    })
    .collect()
}

impl TryFrom<ProcessRaw> for Process {
    type Error = anyhow::Error;

    fn try_from(mut raw: ProcessRaw) -> Result<Self> {
        let id = raw.name.clone();
        let primary_commodity_group =
            parse_primary_commodity_group(&id, raw.primary_commodity_group.as_deref())?;
        let inputs = normalise_flows(&id, "input", raw.input.take(), raw.inputs.take())?;
        let outputs = normalise_flows(&id, "output", raw.output.take(), raw.outputs.take())?;

        let parameters: IndexMap<_, _> = ProcessParameter::ALL
            .into_iter()
            .filter_map(|parameter| Some((parameter, raw.take_parameter(parameter)?)))
            .collect();
        let bounds = collect_bounds(&mut raw);

        Ok(Process {
            id,
            description: raw.description,
            sets: raw.sets,
            primary_commodity_group,
            inputs,
            outputs,
            activity_unit: raw.activity_unit,
            capacity_unit: raw.capacity_unit,
            efficiency: raw.efficiency,
            parameters,
            bounds,
        })
    }
}

/// Convert process declarations into a map, checking that names are unique.
///
/// # Arguments
///
/// * `processes` - Processes in declaration order, as written in the source document
///
/// # Returns
///
/// A map of processes, keyed by process ID, or an error.
pub fn read_processes(processes: Vec<ProcessRaw>) -> Result<ProcessMap> {
    let mut map = ProcessMap::with_capacity(processes.len());
    for raw in processes {
        let process = Process::try_from(raw)?;
        let id = process.id.clone();
        ensure!(
            map.insert(id.clone(), process).is_none(),
            "Duplicate process name '{id}'"
        );
    }

    Ok(map)
}
