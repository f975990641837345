//! Recognised physical units and the default units applied to commodities and processes.

/// Units recognised for energy quantities (process activity)
pub const ENERGY_UNITS: [&str; 8] = ["GJ", "GWh", "KTOE", "MTOE", "MWh", "PJ", "TJ", "TWh"];

/// Units recognised for power quantities (process capacity)
pub const POWER_UNITS: [&str; 4] = ["GW", "MW", "TW", "kW"];

/// Activity unit used for processes which do not declare one
pub const DEFAULT_ACTIVITY_UNIT: &str = "PJ";

/// Capacity unit used for processes which do not declare one
pub const DEFAULT_CAPACITY_UNIT: &str = "GW";

/// Whether `unit` is a recognised energy unit
pub fn is_energy_unit(unit: &str) -> bool {
    ENERGY_UNITS.contains(&unit)
}

/// Whether `unit` is a recognised power unit
pub fn is_power_unit(unit: &str) -> bool {
    POWER_UNITS.contains(&unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::is_sorted_and_unique;
    use rstest::rstest;

    #[test]
    fn unit_lists_sorted() {
        // Warning messages list the units in this order
        assert!(is_sorted_and_unique(ENERGY_UNITS));
        assert!(is_sorted_and_unique(POWER_UNITS));
    }

    #[rstest]
    #[case("PJ", true)]
    #[case("TWh", true)]
    #[case("pj", false)]
    #[case("GW", false)]
    fn check_is_energy_unit(#[case] unit: &str, #[case] expected: bool) {
        assert_eq!(is_energy_unit(unit), expected);
    }

    #[rstest]
    #[case("GW", true)]
    #[case("kW", true)]
    #[case("PJ", false)]
    fn check_is_power_unit(#[case] unit: &str, #[case] expected: bool) {
        assert_eq!(is_power_unit(unit), expected);
    }
}
