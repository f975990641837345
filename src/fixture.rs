//! Fixtures for tests

use crate::input::load_model;
use crate::model::Model;
use crate::process::{Flow, PrimaryCommodityGroup, Process};
use indexmap::IndexMap;
use rstest::fixture;
use serde_json::{Value, json};

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
/// A small but complete source document: two regions, a gas import chain feeding a power plant
/// and a residential demand
pub fn source() -> Value {
    json!({
        "model": {
            "name": "MiniSystem",
            "description": "Minimal two-region system",
            "regions": ["REG1", "REG2"],
            "commodities": [
                {"name": "NG", "type": "energy", "unit": "PJ", "description": "Natural gas"},
                {"name": "ELC", "type": "energy", "description": "Electricity"},
                {"name": "CO2", "type": "emission"},
                {"name": "RSD", "type": "demand", "description": "Residential demand"},
                {"name": "STL", "type": "material"}
            ],
            "processes": [
                {
                    "name": "IMP_NG",
                    "description": "Gas import",
                    "sets": ["IMP"],
                    "primary_commodity_group": "NRGO",
                    "output": "NG"
                },
                {
                    "name": "PP_CCGT",
                    "description": "Combined cycle gas turbine",
                    "sets": ["ELE"],
                    "primary_commodity_group": "NRGO",
                    "input": "NG",
                    "outputs": [{"commodity": "ELC"}, {"commodity": "CO2"}],
                    "efficiency": 0.55,
                    "invcost": 800,
                    "fixom": 20,
                    "life": 30,
                    "activity_bound": {"up": 100}
                },
                {
                    "name": "DMD_RSD",
                    "description": "Residential end use",
                    "sets": ["DMD"],
                    "primary_commodity_group": "DEMO",
                    "input": "ELC",
                    "output": "RSD",
                    "varom": 0.5
                }
            ]
        }
    })
}

#[fixture]
/// The model loaded from [`source`]
pub fn model(source: Value) -> Model {
    load_model(&source).unwrap()
}

#[fixture]
/// A bare process converting NG to ELC, with no attributes or bounds
pub fn process() -> Process {
    Process {
        id: "P".into(),
        description: "Test process".into(),
        sets: vec!["ELE".into()],
        primary_commodity_group: PrimaryCommodityGroup::EnergyOutput,
        inputs: vec![Flow::new("NG".into())],
        outputs: vec![Flow::new("ELC".into())],
        activity_unit: None,
        capacity_unit: None,
        efficiency: None,
        parameters: IndexMap::new(),
        bounds: Vec::new(),
    }
}
