//! User constraints, lowered to rows of the `~UC_T` table.
//!
//! Each constraint is written as left-hand side rows, which give the coefficients of commodity
//! production or process activity, and right-hand side rows, which give the limit.
use super::{UC_CONSTRAINTS_FILE, UC_SHEET, UC_T};
use crate::constraint::{ActivityShare, Constraint, EmissionCap};
use crate::interpolation::expand_series_to_years;
use crate::model::Model;
use crate::process::LimitKind;
use crate::table_ir::{Row, Sheet, Table, TableFile, row};
use indexmap::indexmap;
use std::collections::BTreeMap;

/// The limit of an emission cap for each model year.
///
/// A `years` trajectory takes precedence over a single `limit`. A cap with neither has no limits.
fn emission_cap_limits(cap: &EmissionCap, model_years: &[u32]) -> BTreeMap<u32, f64> {
    match (&cap.years, cap.limit) {
        (Some(years), _) => expand_series_to_years(years, model_years, cap.interpolation),
        (None, Some(limit)) => model_years.iter().map(|&year| (year, limit)).collect(),
        (None, None) => BTreeMap::new(),
    }
}

/// Rows for an emission cap: all left-hand side rows, then all right-hand side rows
fn emission_cap_rows(cap: &EmissionCap, region: &str, model_years: &[u32]) -> Vec<Row> {
    let limits = emission_cap_limits(cap, model_years);
    let description = format!("Emission cap on {}", cap.commodity);
    let base_row = |year: u32| {
        row! {
            "uc_n" => &cap.name,
            "description" => &description,
            "region" => region,
            "year" => year,
        }
    };

    let lhs = limits.keys().map(|&year| {
        let mut row = base_row(year);
        row.insert("commodity".into(), cap.commodity.as_str().into());
        row.insert("side".into(), "LHS".into());
        row.insert("uc_comprd".into(), 1i64.into());
        row
    });
    let rhs = limits.iter().map(|(&year, &limit)| {
        let mut row = base_row(year);
        row.insert("limtype".into(), cap.limtype.code().into());
        row.insert("uc_rhsrt".into(), limit.into());
        row
    });

    lhs.chain(rhs).collect()
}

/// The separate constraints making up an activity share: `(name, limit, share)`.
///
/// When both a minimum and a maximum are given, each becomes its own constraint with a `_LO` or
/// `_UP` suffix.
fn activity_share_bounds(share: &ActivityShare) -> Vec<(String, LimitKind, f64)> {
    let bounds = [
        (LimitKind::Lo, share.minimum_share),
        (LimitKind::Up, share.maximum_share),
    ]
    .into_iter()
    .filter_map(|(limit, value)| Some((limit, value?)))
    .collect::<Vec<_>>();

    let suffixed = bounds.len() > 1;
    bounds
        .into_iter()
        .map(|(limit, value)| {
            let name = if suffixed {
                format!("{}_{}", share.name, limit.code())
            } else {
                share.name.clone()
            };
            (name, limit, value)
        })
        .collect()
}

/// Rows for an activity share constraint.
///
/// The constraint reads `sum(activity) - share * production {>=|<=} 0`, so the target processes
/// get a coefficient of 1 and the reference commodity a coefficient of `-share`.
fn activity_share_rows(share: &ActivityShare, region: &str, model_years: &[u32]) -> Vec<Row> {
    if share.processes.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for (name, limit, value) in activity_share_bounds(share) {
        let sense = match limit {
            LimitKind::Lo => "minimum",
            _ => "maximum",
        };
        let description = format!(
            "Activity share ({sense} {:.0}%) on {}",
            value * 100.0,
            share.commodity
        );

        for &year in model_years {
            let base_row = || {
                row! {
                    "uc_n" => &name,
                    "description" => &description,
                    "region" => region,
                    "year" => year,
                }
            };

            for process in &share.processes {
                let mut row = base_row();
                row.insert("process".into(), process.as_str().into());
                row.insert("side".into(), "LHS".into());
                row.insert("uc_act".into(), 1i64.into());
                rows.push(row);
            }

            let mut row = base_row();
            row.insert("commodity".into(), share.commodity.as_str().into());
            row.insert("side".into(), "LHS".into());
            row.insert("uc_comprd".into(), (-value).into());
            rows.push(row);

            let mut row = base_row();
            row.insert("limtype".into(), limit.code().into());
            row.insert("uc_rhsrt".into(), 0i64.into());
            rows.push(row);
        }
    }

    rows
}

/// The rows for a single constraint
pub fn constraint_rows(constraint: &Constraint, region: &str, model_years: &[u32]) -> Vec<Row> {
    match constraint {
        Constraint::EmissionCap(cap) => emission_cap_rows(cap, region, model_years),
        Constraint::ActivityShare(share) => activity_share_rows(share, region, model_years),
    }
}

/// The user constraints file, if any of the model's constraints produce rows
pub fn constraint_file(model: &Model, region: &str, model_years: &[u32]) -> Option<TableFile> {
    let rows: Vec<_> = model
        .constraints
        .iter()
        .flat_map(|constraint| constraint_rows(constraint, region, model_years))
        .collect();
    if rows.is_empty() {
        return None;
    }

    let mut table = Table::new(UC_T, rows);
    table.uc_sets = Some(indexmap! {
        "R_E".to_string() => "AllRegions".to_string(),
        "T_E".to_string() => String::new(),
    });

    Some(TableFile::new(
        UC_CONSTRAINTS_FILE,
        vec![Sheet::new(UC_SHEET, vec![table])],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::model;
    use crate::table_ir::Scalar;
    use itertools::Itertools;
    use rstest::rstest;
    use serde_json::json;

    const YEARS: [u32; 4] = [2020, 2030, 2040, 2050];

    fn constraint(raw: serde_json::Value) -> Constraint {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn emission_cap_broadcast_limit() {
        let cap = constraint(json!({
            "name": "co2_cap",
            "type": "emission_cap",
            "commodity": "CO2",
            "limit": 50.0
        }));
        let rows = constraint_rows(&cap, "REG1,REG2", &YEARS);
        assert_eq!(rows.len(), 8);
        assert_eq!(
            rows[0],
            row! {
                "uc_n" => "co2_cap",
                "description" => "Emission cap on CO2",
                "region" => "REG1,REG2",
                "year" => 2020u32,
                "commodity" => "CO2",
                "side" => "LHS",
                "uc_comprd" => 1i64,
            }
        );
        assert_eq!(
            rows[7],
            row! {
                "uc_n" => "co2_cap",
                "description" => "Emission cap on CO2",
                "region" => "REG1,REG2",
                "year" => 2050u32,
                "limtype" => "UP",
                "uc_rhsrt" => 50.0,
            }
        );
    }

    #[test]
    fn emission_cap_trajectory() {
        let cap = constraint(json!({
            "name": "co2_cap",
            "type": "emission_cap",
            "commodity": "CO2",
            "limit": 999.0,
            "years": {"2020": 100.0, "2040": 60.0},
            "interpolation": "interp_only",
            "limtype": "fx"
        }));
        let rows = constraint_rows(&cap, "REG1", &YEARS);
        let rhs = rows.iter().filter(|row| row.contains_key("uc_rhsrt")).collect_vec();
        assert_eq!(
            rhs.iter().map(|row| row["uc_rhsrt"].clone()).collect_vec(),
            [Scalar::Float(100.0), Scalar::Float(80.0), Scalar::Float(60.0)]
        );
        assert!(rhs.iter().all(|row| row["limtype"] == Scalar::from("FX")));
    }

    #[test]
    fn emission_cap_without_limit() {
        let cap = constraint(json!({"name": "c", "type": "emission_cap", "commodity": "CO2"}));
        assert!(constraint_rows(&cap, "REG1", &YEARS).is_empty());
    }

    #[test]
    fn activity_share_minimum() {
        let share = constraint(json!({
            "name": "renewable_share",
            "type": "activity_share",
            "commodity": "ELC",
            "processes": ["PP_WIND", "PP_SOLAR"],
            "minimum_share": 0.3
        }));
        let rows = constraint_rows(&share, "REG1", &[2020]);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["process"], Scalar::from("PP_WIND"));
        assert_eq!(rows[0]["uc_act"], Scalar::Int(1));
        assert_eq!(
            rows[2],
            row! {
                "uc_n" => "renewable_share",
                "description" => "Activity share (minimum 30%) on ELC",
                "region" => "REG1",
                "year" => 2020u32,
                "commodity" => "ELC",
                "side" => "LHS",
                "uc_comprd" => -0.3,
            }
        );
        assert_eq!(rows[3]["limtype"], Scalar::from("LO"));
        assert_eq!(rows[3]["uc_rhsrt"], Scalar::Int(0));
    }

    #[test]
    fn activity_share_both_bounds_independent() {
        let share = constraint(json!({
            "name": "gas_share",
            "type": "activity_share",
            "commodity": "ELC",
            "processes": ["PP_CCGT"],
            "minimum_share": 0.1,
            "maximum_share": 0.5
        }));
        let rows = constraint_rows(&share, "REG1", &YEARS);
        assert_eq!(rows.len(), 2 * 4 * 3);

        let names = rows.iter().map(|row| row["uc_n"].to_string()).unique().collect_vec();
        assert_eq!(names, ["gas_share_LO", "gas_share_UP"]);
        let upper = rows
            .iter()
            .filter(|row| row["uc_n"] == Scalar::from("gas_share_UP"))
            .collect_vec();
        assert!(upper.iter().all(|row| row["description"]
            == Scalar::from("Activity share (maximum 50%) on ELC")));
    }

    #[test]
    fn activity_share_without_processes() {
        let share = constraint(json!({
            "name": "s",
            "type": "activity_share",
            "commodity": "ELC",
            "maximum_share": 0.5
        }));
        assert!(constraint_rows(&share, "REG1", &YEARS).is_empty());
    }

    #[rstest]
    fn constraint_file_scope(mut model: Model) {
        assert!(constraint_file(&model, "REG1,REG2", &YEARS).is_none());

        model.constraints = vec![constraint(json!({
            "name": "co2_cap",
            "type": "emission_cap",
            "commodity": "CO2",
            "limit": 50.0
        }))];
        let file = constraint_file(&model, "REG1,REG2", &YEARS).unwrap();
        assert_eq!(file.path, "SuppXLS/Scen_UC_Constraints.xlsx");
        assert_eq!(file.sheets[0].name, "UC_Constraints");

        let table = &file.sheets[0].tables[0];
        assert_eq!(table.tag, "~UC_T");
        let uc_sets = table.uc_sets.as_ref().unwrap();
        assert_eq!(uc_sets["R_E"], "AllRegions");
        assert_eq!(uc_sets["T_E"], "");
    }
}
