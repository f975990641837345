//! Time slices divide each model year into seasons, weekly periods and parts of the day.
use indexmap::IndexMap;
use itertools::iproduct;
use serde::Deserialize;

/// A level of the time slice hierarchy
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct TimeSliceCode {
    /// Short code (one to three upper-case letters)
    pub code: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
}

/// Time slice definition for a model
#[derive(PartialEq, Debug, Deserialize, Clone, Default)]
pub struct TimeSliceDefinition {
    /// Seasons
    #[serde(default)]
    pub season: Vec<TimeSliceCode>,
    /// Weekly periods (e.g. weekday/weekend)
    #[serde(default)]
    pub weekly: Vec<TimeSliceCode>,
    /// Parts of the day
    #[serde(default)]
    pub daynite: Vec<TimeSliceCode>,
    /// Fraction of the year for each leaf time slice, keyed by leaf name
    #[serde(default)]
    pub fractions: IndexMap<String, f64>,
}

/// The codes of one level
fn level_codes(level: &[TimeSliceCode]) -> Vec<&str> {
    level.iter().map(|ts| ts.code.as_str()).collect()
}

/// Use a single empty code in place of an empty level, so that it drops out of the product
fn or_placeholder(codes: Vec<&str>) -> Vec<&str> {
    if codes.is_empty() { vec![""] } else { codes }
}

impl TimeSliceDefinition {
    /// Season codes in declaration order
    pub fn season_codes(&self) -> Vec<&str> {
        level_codes(&self.season)
    }

    /// Weekly codes in declaration order
    pub fn weekly_codes(&self) -> Vec<&str> {
        level_codes(&self.weekly)
    }

    /// Day-night codes in declaration order
    pub fn daynite_codes(&self) -> Vec<&str> {
        level_codes(&self.daynite)
    }

    /// Names of the leaf time slices.
    ///
    /// Each leaf is the concatenation of one code from each level, in season, weekly, daynite
    /// order. A level with no codes contributes nothing to the name.
    pub fn leaf_names(&self) -> Vec<String> {
        iproduct!(
            or_placeholder(self.season_codes()),
            or_placeholder(self.weekly_codes()),
            or_placeholder(self.daynite_codes())
        )
        .map(|(s, w, d)| format!("{s}{w}{d}"))
        .filter(|leaf| !leaf.is_empty())
        .collect()
    }
}
