//! Interpolation and extrapolation of sparse year-indexed trajectories.
//!
//! Trajectories are declared as a handful of `(year, value)` points. Scenario and constraint
//! trajectories are expanded here to one value per model year. Time-varying process attributes are
//! not expanded: they are emitted sparse, with a marker row telling the downstream tool which
//! [`InterpolationMode`] to apply.
use serde_string_enum::DeserializeLabeledStringEnum;
use std::collections::BTreeMap;

/// How values are filled in between and beyond the declared points of a trajectory
#[derive(PartialEq, Eq, Debug, DeserializeLabeledStringEnum, Clone, Copy, Default)]
pub enum InterpolationMode {
    /// Only the declared years have values
    #[string = "none"]
    None,
    /// Interpolate between declared years, but do not extrapolate
    #[string = "interp_only"]
    InterpOnly,
    /// Interpolate, and extrapolate forwards only
    #[string = "interp_extrap_eps"]
    InterpExtrapEps,
    /// Interpolate, and extrapolate in both directions
    #[default]
    #[string = "interp_extrap"]
    InterpExtrap,
    /// Interpolate, and extrapolate backwards only
    #[string = "interp_extrap_back"]
    InterpExtrapBack,
    /// Interpolate, and extrapolate forwards only
    #[string = "interp_extrap_forward"]
    InterpExtrapForward,
}

impl InterpolationMode {
    /// The integer code written into interpolation marker rows
    pub fn code(self) -> i64 {
        match self {
            Self::None => -1,
            Self::InterpOnly => 1,
            Self::InterpExtrapEps => 2,
            Self::InterpExtrap => 3,
            Self::InterpExtrapBack => 4,
            Self::InterpExtrapForward => 5,
        }
    }

    /// Whether years before the first declared point take the first value
    pub fn extrapolates_backward(self) -> bool {
        matches!(self, Self::InterpExtrap | Self::InterpExtrapBack)
    }

    /// Whether years after the last declared point take the last value
    pub fn extrapolates_forward(self) -> bool {
        matches!(
            self,
            Self::InterpExtrap | Self::InterpExtrapForward | Self::InterpExtrapEps
        )
    }
}

/// Expand a sparse trajectory to a value for each model year.
///
/// # Arguments
///
/// * `points` - The declared `(year, value)` points
/// * `model_years` - The years for which values are wanted
/// * `mode` - How to fill in years without a declared point
///
/// # Returns
///
/// A map of year to value. Years which the mode does not cover (e.g. years after the last point
/// with [`InterpolationMode::InterpOnly`]) are omitted.
pub fn expand_series_to_years(
    points: &BTreeMap<u32, f64>,
    model_years: &[u32],
    mode: InterpolationMode,
) -> BTreeMap<u32, f64> {
    model_years
        .iter()
        .filter_map(|&year| Some((year, value_at_year(points, year, mode)?)))
        .collect()
}

/// Get the value of a trajectory at a given year, if the mode defines one
fn value_at_year(points: &BTreeMap<u32, f64>, year: u32, mode: InterpolationMode) -> Option<f64> {
    if let Some(&value) = points.get(&year) {
        return Some(value);
    }
    if mode == InterpolationMode::None {
        return None;
    }

    let before = points.range(..year).next_back();
    let after = points.range(year..).next();
    match (before, after) {
        (Some((&y0, &v0)), Some((&y1, &v1))) => {
            let ratio = f64::from(year - y0) / f64::from(y1 - y0);
            Some(v0 + (v1 - v0) * ratio)
        }
        (None, Some((_, &first))) if mode.extrapolates_backward() => Some(first),
        (Some((_, &last)), None) if mode.extrapolates_forward() => Some(last),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use rstest::rstest;

    const YEARS: [u32; 4] = [2020, 2030, 2040, 2050];

    fn points(points: &[(u32, f64)]) -> BTreeMap<u32, f64> {
        points.iter().copied().collect()
    }

    #[test]
    fn expand_linear_interpolation() {
        let result = expand_series_to_years(
            &points(&[(2020, 100.0), (2050, 160.0)]),
            &YEARS,
            InterpolationMode::InterpExtrap,
        );
        assert_eq!(result.keys().copied().collect::<Vec<_>>(), YEARS);
        for (year, expected) in [(2020, 100.0), (2030, 120.0), (2040, 140.0), (2050, 160.0)] {
            assert!(approx_eq!(f64, result[&year], expected, ulps = 4));
        }
    }

    #[test]
    fn expand_interp_only_no_forward_value() {
        let result = expand_series_to_years(
            &points(&[(2020, 100.0), (2040, 50.0)]),
            &YEARS,
            InterpolationMode::InterpOnly,
        );
        assert_eq!(result.len(), 3);
        assert!(approx_eq!(f64, result[&2030], 75.0));
        assert!(!result.contains_key(&2050));
    }

    #[rstest]
    #[case(InterpolationMode::None, &[2030])]
    #[case(InterpolationMode::InterpOnly, &[2030])]
    #[case(InterpolationMode::InterpExtrapEps, &[2030, 2040, 2050])]
    #[case(InterpolationMode::InterpExtrap, &[2020, 2030, 2040, 2050])]
    #[case(InterpolationMode::InterpExtrapBack, &[2020, 2030])]
    #[case(InterpolationMode::InterpExtrapForward, &[2030, 2040, 2050])]
    fn expand_extrapolation_policy(#[case] mode: InterpolationMode, #[case] expected: &[u32]) {
        let result = expand_series_to_years(&points(&[(2030, 7.0)]), &YEARS, mode);
        assert_eq!(result.keys().copied().collect::<Vec<_>>(), expected);
        assert!(result.values().all(|&value| value == 7.0));
    }

    #[test]
    fn expand_none_keeps_exact_points_only() {
        let result = expand_series_to_years(
            &points(&[(2020, 1.0), (2050, 4.0)]),
            &YEARS,
            InterpolationMode::None,
        );
        assert_eq!(result, points(&[(2020, 1.0), (2050, 4.0)]));
    }

    #[test]
    fn expand_ignores_points_outside_model_years() {
        let result = expand_series_to_years(
            &points(&[(2025, 10.0), (2035, 20.0)]),
            &YEARS,
            InterpolationMode::InterpOnly,
        );
        assert_eq!(result, points(&[(2030, 15.0)]));
    }

    #[rstest]
    #[case(InterpolationMode::None, -1)]
    #[case(InterpolationMode::InterpOnly, 1)]
    #[case(InterpolationMode::InterpExtrapEps, 2)]
    #[case(InterpolationMode::InterpExtrap, 3)]
    #[case(InterpolationMode::InterpExtrapBack, 4)]
    #[case(InterpolationMode::InterpExtrapForward, 5)]
    fn interpolation_codes(#[case] mode: InterpolationMode, #[case] code: i64) {
        assert_eq!(mode.code(), code);
    }
}
