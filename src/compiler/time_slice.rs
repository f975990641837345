//! Time slice hierarchy and year-fraction rows.
use crate::table_ir::{Row, row};
use crate::time_slice::TimeSliceDefinition;

/// The `~TIMESLICES` rows for a time slice definition.
///
/// Parent codes of the season and weekly levels come first, each in its own column with the other
/// columns empty. These are followed by one row per leaf time slice, named in the `daynite` column.
pub fn time_slice_rows(time_slices: &TimeSliceDefinition) -> Vec<Row> {
    let seasons = time_slices
        .season_codes()
        .into_iter()
        .map(|code| row!("season" => code, "weekly" => "", "daynite" => ""));
    let weeklies = time_slices
        .weekly_codes()
        .into_iter()
        .map(|code| row!("season" => "", "weekly" => code, "daynite" => ""));
    let leaves = time_slices
        .leaf_names()
        .into_iter()
        .map(|leaf| row!("season" => "", "weekly" => "", "daynite" => leaf));

    seasons.chain(weeklies).chain(leaves).collect()
}

/// Year-fraction rows for the `~TFM_INS` table, applying to all regions
pub fn year_fraction_rows(time_slices: &TimeSliceDefinition) -> Vec<Row> {
    time_slices
        .fractions
        .iter()
        .map(|(leaf, &fraction)| {
            row!("timeslice" => leaf, "attribute" => "YRFR", "allregions" => fraction)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table_ir::Scalar;
    use serde_json::json;

    fn definition() -> TimeSliceDefinition {
        serde_json::from_value(json!({
            "season": [{"code": "S"}, {"code": "W"}],
            "weekly": [{"code": "WD"}],
            "daynite": [{"code": "D"}, {"code": "N"}],
            "fractions": {"SWDD": 0.3, "SWDN": 0.2, "WWDD": 0.3, "WWDN": 0.2}
        }))
        .unwrap()
    }

    #[test]
    fn time_slice_rows_parents_then_leaves() {
        let rows = time_slice_rows(&definition());
        assert_eq!(rows.len(), 2 + 1 + 4);
        assert_eq!(rows[0], row!("season" => "S", "weekly" => "", "daynite" => ""));
        assert_eq!(rows[2], row!("season" => "", "weekly" => "WD", "daynite" => ""));
        assert_eq!(rows[3], row!("season" => "", "weekly" => "", "daynite" => "SWDD"));
        assert_eq!(rows[6]["daynite"], Scalar::from("WWDN"));
    }

    #[test]
    fn year_fraction_rows_broadcast() {
        let rows = year_fraction_rows(&definition());
        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[1],
            row!("timeslice" => "SWDN", "attribute" => "YRFR", "allregions" => 0.2)
        );
    }
}
