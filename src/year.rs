//! Code for working with years.

/// Derive the representative year of each model period.
///
/// The first period starts in `start_year` and each subsequent period starts when the previous one
/// ends.
///
/// # Arguments
///
/// - `start_year` - The first model year
/// - `time_periods` - The length in years of each period
///
/// # Returns
///
/// One year per period, in ascending order.
pub fn model_years(start_year: u32, time_periods: &[u32]) -> Vec<u32> {
    time_periods
        .iter()
        .scan(start_year, |year, &length| {
            let current = *year;
            *year += length;
            Some(current)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2020, &[10, 10, 10, 10], &[2020, 2030, 2040, 2050])]
    #[case(2015, &[5, 10, 15], &[2015, 2020, 2030])]
    #[case(2020, &[1], &[2020])]
    #[case(2020, &[], &[])]
    fn check_model_years(
        #[case] start_year: u32,
        #[case] time_periods: &[u32],
        #[case] expected: &[u32],
    ) {
        assert_eq!(model_years(start_year, time_periods), expected);
    }
}
