//! Checks that references between model entities resolve.
//!
//! Every problem in the model is reported, not just the first. Unresolved names come with a
//! suggestion when a declared name is close enough to be a likely typo.
use super::suggestion;
use crate::model::Model;
use crate::scenario::Scenario;
use crate::units::{ENERGY_UNITS, POWER_UNITS, is_energy_unit, is_power_unit};

/// Check the references in a model.
///
/// # Arguments
///
/// * `model` - The loaded model
///
/// # Returns
///
/// A pair of `(errors, warnings)`. Errors are unresolved references and scenarios targeting the
/// wrong type of commodity. Warnings are unrecognised process units.
pub fn validate_cross_references(model: &Model) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let commodity_names = || model.commodities.keys().map(|id| id.as_str());
    let process_names = || model.processes.keys().map(|id| id.as_str());
    let region_names = || model.regions.iter().map(|id| id.as_str());

    for process in model.processes.values() {
        for (direction, flows) in [("inputs", &process.inputs), ("outputs", &process.outputs)] {
            for (i, flow) in flows.iter().enumerate() {
                let commodity = flow.commodity.as_str();
                if !model.commodities.contains_key(commodity) {
                    errors.push(format!(
                        "Unknown commodity '{commodity}' in process '{}' {direction}[{i}].{}",
                        process.id,
                        suggestion(commodity, commodity_names())
                    ));
                }
            }
        }

        if let Some(unit) = process.activity_unit.as_deref().filter(|u| !is_energy_unit(u)) {
            warnings.push(format!(
                "Process '{}' has activity_unit '{unit}' which is not a recognized energy unit. \
                 Expected one of: {}",
                process.id,
                ENERGY_UNITS.join(", ")
            ));
        }
        if let Some(unit) = process.capacity_unit.as_deref().filter(|u| !is_power_unit(u)) {
            warnings.push(format!(
                "Process '{}' has capacity_unit '{unit}' which is not a recognized power unit. \
                 Expected one of: {}",
                process.id,
                POWER_UNITS.join(", ")
            ));
        }
    }

    for constraint in &model.constraints {
        let commodity = constraint.commodity().as_str();
        if !model.commodities.contains_key(commodity) {
            errors.push(format!(
                "Unknown commodity '{commodity}' in constraint '{}'.{}",
                constraint.name(),
                suggestion(commodity, commodity_names())
            ));
        }

        for process in constraint.processes() {
            if !model.processes.contains_key(process) {
                errors.push(format!(
                    "Unknown process '{process}' in constraint '{}'.{}",
                    constraint.name(),
                    suggestion(process.as_str(), process_names())
                ));
            }
        }
    }

    for (i, link) in model.trade_links.iter().enumerate() {
        for (end, region) in [("origin", &link.origin), ("destination", &link.destination)] {
            if !model.regions.contains(region) {
                errors.push(format!(
                    "Unknown region '{region}' in trade_links[{i}] {end}.{}",
                    suggestion(region.as_str(), region_names())
                ));
            }
        }

        let commodity = link.commodity.as_str();
        if !model.commodities.contains_key(commodity) {
            errors.push(format!(
                "Unknown commodity '{commodity}' in trade_links[{i}].{}",
                suggestion(commodity, commodity_names())
            ));
        }
    }

    for scenario in &model.scenarios {
        let trajectory = scenario.trajectory();
        let commodity = trajectory.commodity.as_str();
        let Some(target) = model.commodities.get(commodity) else {
            errors.push(format!(
                "Unknown commodity '{commodity}' in scenario '{}'.{}",
                trajectory.name,
                suggestion(commodity, commodity_names())
            ));
            continue;
        };

        if !scenario.accepts_commodity_type(target.kind) {
            let expected = match scenario {
                Scenario::DemandProjection(_) => "'demand'".to_string(),
                Scenario::CommodityPrice(_) => "non-demand type".to_string(),
            };
            errors.push(format!(
                "{} scenario '{}' targets commodity '{commodity}' (type '{}'), expected {expected}",
                scenario.type_name(),
                trajectory.name,
                target.kind.name(),
            ));
        }
    }

    (errors, warnings)
}
