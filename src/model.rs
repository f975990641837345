//! The model represents the static input data provided by the user.
use crate::commodity::CommodityMap;
use crate::constraint::Constraint;
use crate::id::RegionID;
use crate::process::ProcessMap;
use crate::scenario::Scenario;
use crate::time_slice::TimeSliceDefinition;
use crate::trade::TradeLink;
use crate::year::model_years;
use indexmap::IndexSet;
use itertools::Itertools;

pub mod parameters;
pub use parameters::ModelParameters;

/// Model definition
#[derive(Debug, PartialEq, Clone)]
pub struct Model {
    /// Name, description and time periods
    pub parameters: ModelParameters,
    /// Regions, in declaration order
    pub regions: IndexSet<RegionID>,
    /// Commodities, in declaration order
    pub commodities: CommodityMap,
    /// Processes, in declaration order
    pub processes: ProcessMap,
    /// Scenario trajectories
    pub scenarios: Vec<Scenario>,
    /// User constraints
    pub constraints: Vec<Constraint>,
    /// Inter-regional trade links
    pub trade_links: Vec<TradeLink>,
    /// Time slice definition, if the model has sub-annual resolution
    pub time_slices: Option<TimeSliceDefinition>,
}

impl Model {
    /// The representative year of each model period.
    pub fn model_years(&self) -> Vec<u32> {
        model_years(self.parameters.start_year, &self.parameters.time_periods)
    }

    /// All regions as a comma-separated list, for rows which apply everywhere.
    pub fn region_list(&self) -> String {
        self.regions.iter().join(",")
    }
}
