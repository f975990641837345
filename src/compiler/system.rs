//! The system settings file: regions, periods, time slices and commodities.
use super::time_slice::{time_slice_rows, year_fraction_rows};
use super::{
    ACTIVEPDEF, BOOKREGIONS_MAP, CURRENCIES, FI_COMM, STARTYEAR, SYS_SETTINGS_FILE, TFM_INS,
    TIMEPERIODS, TIMESLICES,
};
use crate::model::Model;
use crate::table_ir::{Row, Sheet, Table, TableFile, row};

/// The currency written to the currencies table
const CURRENCY: &str = "USD";

/// Build the system settings file for a model
pub fn system_settings_file(model: &Model, region: &str) -> TableFile {
    let mut sheets = vec![
        Sheet::new("SysSets", system_tables(model)),
        Sheet::new(
            "Commodities",
            vec![Table::new(FI_COMM, commodity_rows(model, region))],
        ),
    ];

    let fractions = model
        .time_slices
        .as_ref()
        .map(year_fraction_rows)
        .unwrap_or_default();
    if !fractions.is_empty() {
        sheets.push(Sheet::new("constants", vec![Table::new(TFM_INS, fractions)]));
    }

    TableFile::new(SYS_SETTINGS_FILE, sheets)
}

/// Tables describing the model's regions, periods and time slices
fn system_tables(model: &Model) -> Vec<Table> {
    let bookname = model.parameters.bookname();
    let book_regions = model
        .regions
        .iter()
        .map(|region| row!("bookname" => &bookname, "region" => region.as_str()))
        .collect();
    let periods = model
        .parameters
        .time_periods
        .iter()
        .map(|&length| row!("p" => length))
        .collect();

    let mut tables = vec![
        Table::new(BOOKREGIONS_MAP, book_regions),
        Table::new(STARTYEAR, vec![row!("value" => model.parameters.start_year)]),
        Table::new(ACTIVEPDEF, vec![row!("value" => "P")]),
        Table::new(TIMEPERIODS, periods),
        Table::new(CURRENCIES, vec![row!("currency" => CURRENCY)]),
    ];

    let time_slices = model
        .time_slices
        .as_ref()
        .map(time_slice_rows)
        .unwrap_or_default();
    if !time_slices.is_empty() {
        tables.push(Table::new(TIMESLICES, time_slices));
    }

    tables
}

/// One `~FI_COMM` row per commodity, in declaration order
fn commodity_rows(model: &Model, region: &str) -> Vec<Row> {
    model
        .commodities
        .values()
        .map(|commodity| {
            row! {
                "region" => region,
                "csets" => commodity.kind.cset(),
                "commodity" => commodity.id.as_str(),
                "unit" => commodity.unit(),
            }
        })
        .collect()
}
