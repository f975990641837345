//! Scenarios attach year-indexed trajectories to commodities.
use crate::commodity::{CommodityID, CommodityType};
use crate::input::deserialise_year_values;
use crate::interpolation::InterpolationMode;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A scenario trajectory, selected by its `type` field
#[derive(PartialEq, Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scenario {
    /// Exogenous price path for a supply commodity
    CommodityPrice(ScenarioTrajectory),
    /// Projected service demand for a demand commodity
    DemandProjection(ScenarioTrajectory),
}

/// The common fields of every scenario
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct ScenarioTrajectory {
    /// Unique name of the scenario
    pub name: String,
    /// The commodity the trajectory applies to
    pub commodity: CommodityID,
    /// Declared values, keyed by year
    #[serde(deserialize_with = "deserialise_year_values")]
    pub values: BTreeMap<u32, f64>,
    /// How values for other model years are derived
    #[serde(default)]
    pub interpolation: InterpolationMode,
}

impl Scenario {
    /// The trajectory of this scenario
    pub fn trajectory(&self) -> &ScenarioTrajectory {
        match self {
            Self::CommodityPrice(trajectory) | Self::DemandProjection(trajectory) => trajectory,
        }
    }

    /// The name used for this scenario type in source documents
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CommodityPrice(_) => "commodity_price",
            Self::DemandProjection(_) => "demand_projection",
        }
    }

    /// Whether a commodity of the given type may be the target of this scenario
    pub fn accepts_commodity_type(&self, kind: CommodityType) -> bool {
        match self {
            Self::CommodityPrice(_) => kind != CommodityType::Demand,
            Self::DemandProjection(_) => kind == CommodityType::Demand,
        }
    }
}
