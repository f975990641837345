//! User constraints on commodity production and process activity.
use crate::commodity::CommodityID;
use crate::input::deserialise_optional_year_values;
use crate::interpolation::InterpolationMode;
use crate::process::{LimitKind, ProcessID};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A user constraint, selected by its `type` field
#[derive(PartialEq, Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// Limit on total production of an emission commodity
    EmissionCap(EmissionCap),
    /// Limit on the share of a commodity produced by a group of processes
    ActivityShare(ActivityShare),
}

impl Constraint {
    /// The name of the constraint
    pub fn name(&self) -> &str {
        match self {
            Self::EmissionCap(cap) => &cap.name,
            Self::ActivityShare(share) => &share.name,
        }
    }

    /// The commodity the constraint refers to
    pub fn commodity(&self) -> &CommodityID {
        match self {
            Self::EmissionCap(cap) => &cap.commodity,
            Self::ActivityShare(share) => &share.commodity,
        }
    }

    /// The processes the constraint refers to
    pub fn processes(&self) -> &[ProcessID] {
        match self {
            Self::EmissionCap(_) => &[],
            Self::ActivityShare(share) => &share.processes,
        }
    }
}

/// A cap on total production of a commodity in each model year
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct EmissionCap {
    /// Unique name of the constraint
    pub name: String,
    /// The capped commodity
    pub commodity: CommodityID,
    /// A limit applying to every model year
    pub limit: Option<f64>,
    /// Limits for particular years, taking precedence over `limit`
    #[serde(default, deserialize_with = "deserialise_optional_year_values")]
    pub years: Option<BTreeMap<u32, f64>>,
    /// How limits for other model years are derived from `years`
    #[serde(default)]
    pub interpolation: InterpolationMode,
    /// The sense of the limit
    #[serde(default)]
    pub limtype: LimitKind,
}

/// Bounds on the share of a commodity's production coming from a group of processes
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct ActivityShare {
    /// Unique name of the constraint
    pub name: String,
    /// The reference commodity
    pub commodity: CommodityID,
    /// The processes whose combined activity is bounded
    #[serde(default)]
    pub processes: Vec<ProcessID>,
    /// Lower bound on the share (0-1)
    pub minimum_share: Option<f64>,
    /// Upper bound on the share (0-1)
    pub maximum_share: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emission_cap_defaults() {
        let constraint: Constraint = serde_json::from_value(json!({
            "name": "co2_cap",
            "type": "emission_cap",
            "commodity": "CO2",
            "limit": 100.0
        }))
        .unwrap();

        let Constraint::EmissionCap(cap) = &constraint else {
            panic!("Expected an emission cap");
        };
        assert_eq!(cap.limtype, LimitKind::Up);
        assert_eq!(cap.interpolation, InterpolationMode::InterpExtrap);
        assert!(cap.years.is_none());
        assert_eq!(constraint.name(), "co2_cap");
        assert!(constraint.processes().is_empty());
    }

    #[test]
    fn emission_cap_years() {
        let constraint: Constraint = serde_json::from_value(json!({
            "name": "co2_path",
            "type": "emission_cap",
            "commodity": "CO2",
            "years": {"2020": 100.0, "2050": 10.0},
            "limtype": "fx"
        }))
        .unwrap();

        let Constraint::EmissionCap(cap) = constraint else {
            panic!("Expected an emission cap");
        };
        assert_eq!(cap.limtype, LimitKind::Fx);
        assert_eq!(cap.years.unwrap().len(), 2);
    }

    #[test]
    fn activity_share_fields() {
        let constraint: Constraint = serde_json::from_value(json!({
            "name": "renewables",
            "type": "activity_share",
            "commodity": "ELC",
            "processes": ["PP_WIND", "PP_SOLAR"],
            "minimum_share": 0.3
        }))
        .unwrap();

        assert_eq!(constraint.commodity().as_str(), "ELC");
        assert_eq!(constraint.processes().len(), 2);
    }
}
