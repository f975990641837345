//! Demand projections and commodity price scenarios.
//!
//! Unlike time-varying process attributes, scenario trajectories are expanded here to a value for
//! every model year.
use super::{SCENARIO_SHEET, TFM_DINS_AT};
use crate::interpolation::expand_series_to_years;
use crate::model::Model;
use crate::scenario::{Scenario, ScenarioTrajectory};
use crate::table_ir::{Row, Sheet, Table, TableFile, row};

/// The path of the file for a commodity price scenario
pub fn scenario_file_path(name: &str) -> String {
    format!("SuppXLS/Scen_{name}.xlsx")
}

/// Dense rows for a trajectory, one per model year that has a value
fn trajectory_rows<F>(trajectory: &ScenarioTrajectory, model_years: &[u32], to_row: F) -> Vec<Row>
where
    F: Fn(u32, f64) -> Row,
{
    expand_series_to_years(&trajectory.values, model_years, trajectory.interpolation)
        .into_iter()
        .map(|(year, value)| to_row(year, value))
        .collect()
}

/// `~FI_T` rows holding the projected demand of every demand projection scenario
pub fn demand_projection_rows(model: &Model, region: &str, model_years: &[u32]) -> Vec<Row> {
    model
        .scenarios
        .iter()
        .filter_map(|scenario| match scenario {
            Scenario::DemandProjection(trajectory) => Some(trajectory),
            Scenario::CommodityPrice(_) => None,
        })
        .flat_map(|trajectory| {
            trajectory_rows(trajectory, model_years, |year, value| {
                row! {
                    "region" => region,
                    "commodity" => trajectory.commodity.as_str(),
                    "year" => year,
                    "com_proj" => value,
                }
            })
        })
        .collect()
}

/// One scenario file for each commodity price scenario which has values in the model horizon
pub fn commodity_price_files(model: &Model, region: &str, model_years: &[u32]) -> Vec<TableFile> {
    model
        .scenarios
        .iter()
        .filter_map(|scenario| match scenario {
            Scenario::CommodityPrice(trajectory) => Some(trajectory),
            Scenario::DemandProjection(_) => None,
        })
        .filter_map(|trajectory| {
            let rows = trajectory_rows(trajectory, model_years, |year, value| {
                row! {
                    "region" => region,
                    "cset_cn" => trajectory.commodity.as_str(),
                    "year" => year,
                    "com_cstnet" => value,
                }
            });
            (!rows.is_empty()).then(|| {
                TableFile::new(
                    &scenario_file_path(&trajectory.name),
                    vec![Sheet::new(
                        SCENARIO_SHEET,
                        vec![Table::new(TFM_DINS_AT, rows)],
                    )],
                )
            })
        })
        .collect()
}
