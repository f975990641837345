//! Trade link matrices and the synthetic processes that carry traded commodities.
//!
//! Each trade link becomes a process named by [`TradeLink::process_name`]. Links are grouped by
//! commodity and direction into matrix sheets of the trade links file, while the processes'
//! declarations, topology and efficiencies are added to the main process file.
use super::{TRADE_LINKS_FILE, TRADELINKS};
use crate::commodity::CommodityID;
use crate::model::Model;
use crate::table_ir::{Row, Sheet, Table, TableFile, row};
use crate::trade::TradeLink;
use crate::units::DEFAULT_ACTIVITY_UNIT;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

/// Everything produced from a model's trade links
#[derive(Debug, Default, PartialEq)]
pub struct TradeTables {
    /// Declarations of trade processes, for the `~FI_PROCESS` table
    pub process_rows: Vec<Row>,
    /// Topology and efficiency rows of trade processes, for the `~FI_T` table
    pub topology_rows: Vec<Row>,
    /// The trade links file, if the model has any trade links
    pub file: Option<TableFile>,
}

/// Links grouped by commodity and direction, in order of first appearance
fn group_links(links: &[TradeLink]) -> IndexMap<(&CommodityID, bool), Vec<&TradeLink>> {
    let mut groups: IndexMap<_, Vec<_>> = IndexMap::new();
    for link in links {
        groups
            .entry((&link.commodity, link.bidirectional))
            .or_default()
            .push(link);
    }

    groups
}

/// The name of the matrix sheet for a group of links
fn sheet_name(commodity: &CommodityID, bidirectional: bool) -> String {
    let prefix = if bidirectional { "Bi" } else { "Uni" };
    format!("{prefix}_{commodity}")
}

/// The matrix rows for a group of links.
///
/// There is one row per origin region with an outgoing link, sorted by region name. The first
/// column, named after the commodity, holds the origin. Each further column is named after a
/// destination and holds the name of the process linking the two.
fn matrix_rows(commodity: &CommodityID, links: &[&TradeLink]) -> Vec<Row> {
    links
        .iter()
        .map(|link| &link.origin)
        .unique()
        .sorted()
        .map(|origin| {
            let mut row = row!(commodity.as_str() => origin.as_str());
            for link in links.iter().filter(|link| link.origin == *origin) {
                row.insert(link.destination.to_string(), link.process_name().into());
            }
            row
        })
        .collect()
}

/// Compile the model's trade links.
///
/// A process name is declared once, however many links produce it. Bidirectional processes are
/// declared in both the origin and the destination region.
pub fn compile_trade_links(model: &Model) -> TradeTables {
    if model.trade_links.is_empty() {
        return TradeTables::default();
    }

    let unit_of = |commodity: &CommodityID| {
        model
            .commodities
            .get(commodity)
            .map_or(DEFAULT_ACTIVITY_UNIT, |c| c.unit())
    };

    let mut tables = TradeTables::default();
    let mut declared = IndexSet::new();
    let mut sheets = Vec::new();
    for ((commodity, bidirectional), links) in group_links(&model.trade_links) {
        sheets.push(Sheet::new(
            &sheet_name(commodity, bidirectional),
            vec![Table::new(TRADELINKS, matrix_rows(commodity, &links))],
        ));

        for link in links {
            let process = link.process_name();
            if declared.insert(process.clone()) {
                let description = format!(
                    "Trade {} from {} to {}",
                    link.commodity, link.origin, link.destination
                );
                let regions = if bidirectional {
                    vec![&link.origin, &link.destination]
                } else {
                    vec![&link.origin]
                };
                for region in regions {
                    tables.process_rows.push(row! {
                        "region" => region.as_str(),
                        "process" => &process,
                        "description" => &description,
                        "sets" => "IRE",
                        "tact" => unit_of(commodity),
                        "tcap" => "",
                    });
                }

                tables.topology_rows.push(row! {
                    "region" => link.origin.as_str(),
                    "process" => &process,
                    "commodity-out" => commodity.as_str(),
                });
                tables.topology_rows.push(row! {
                    "region" => link.destination.as_str(),
                    "process" => &process,
                    "commodity-in" => commodity.as_str(),
                });
            }

            if let Some(efficiency) = link.efficiency {
                tables.topology_rows.push(row! {
                    "region" => link.origin.as_str(),
                    "process" => &process,
                    "commodity-out" => commodity.as_str(),
                    "eff" => efficiency,
                });
            }
        }
    }

    tables.file = Some(TableFile::new(TRADE_LINKS_FILE, sheets));
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::model;
    use crate::table_ir::Scalar;
    use rstest::rstest;
    use serde_json::json;

    fn with_links(mut model: Model, links: serde_json::Value) -> Model {
        model.trade_links = serde_json::from_value(links).unwrap();
        model
    }

    fn count_with(rows: &[Row], column: &str) -> usize {
        rows.iter().filter(|row| row.contains_key(column)).count()
    }

    #[rstest]
    fn no_links(model: Model) {
        assert_eq!(compile_trade_links(&model), TradeTables::default());
    }

    #[rstest]
    fn bidirectional_link(model: Model) {
        let model = with_links(
            model,
            json!([{"origin": "REG1", "destination": "REG2", "commodity": "ELC"}]),
        );
        let tables = compile_trade_links(&model);

        let process = Scalar::from("T_B_ELC_REG1_REG2_01");
        assert_eq!(tables.process_rows.len(), 2);
        assert!(tables.process_rows.iter().all(|row| row["process"] == process));
        assert_eq!(tables.process_rows[0]["region"], Scalar::from("REG1"));
        assert_eq!(tables.process_rows[1]["region"], Scalar::from("REG2"));
        assert_eq!(tables.process_rows[0]["sets"], Scalar::from("IRE"));
        assert_eq!(
            tables.process_rows[0]["description"],
            Scalar::from("Trade ELC from REG1 to REG2")
        );

        assert_eq!(count_with(&tables.topology_rows, "commodity-out"), 1);
        assert_eq!(count_with(&tables.topology_rows, "commodity-in"), 1);

        let file = tables.file.unwrap();
        assert_eq!(file.path, "SuppXLS/Trades/ScenTrade__Trade_Links.xlsx");
        assert_eq!(file.sheets[0].name, "Bi_ELC");
        assert_eq!(
            file.sheets[0].tables[0].rows,
            [row!("ELC" => "REG1", "REG2" => "T_B_ELC_REG1_REG2_01")]
        );
    }

    #[rstest]
    fn unidirectional_links_grouped(model: Model) {
        let model = with_links(
            model,
            json!([
                {"origin": "REG2", "destination": "REG1", "commodity": "NG", "bidirectional": false},
                {"origin": "REG1", "destination": "REG2", "commodity": "NG", "bidirectional": false,
                 "efficiency": 0.9}
            ]),
        );
        let tables = compile_trade_links(&model);

        // Declared in origin only
        assert_eq!(tables.process_rows.len(), 2);
        assert_eq!(
            tables.topology_rows.last().unwrap(),
            &row! {
                "region" => "REG1",
                "process" => "T_U_NG_REG1_REG2_01",
                "commodity-out" => "NG",
                "eff" => 0.9,
            }
        );

        let file = tables.file.unwrap();
        assert_eq!(file.sheets.len(), 1);
        assert_eq!(file.sheets[0].name, "Uni_NG");
        let rows = &file.sheets[0].tables[0].rows;
        assert_eq!(rows[0]["NG"], Scalar::from("REG1"));
        assert_eq!(rows[1]["NG"], Scalar::from("REG2"));
    }

    #[rstest]
    fn duplicate_links_declared_once(model: Model) {
        let link = json!({"origin": "REG1", "destination": "REG2", "commodity": "ELC"});
        let model = with_links(model, json!([link.clone(), link]));
        let tables = compile_trade_links(&model);
        assert_eq!(tables.process_rows.len(), 2);
        assert_eq!(tables.topology_rows.len(), 2);
    }
}
