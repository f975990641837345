//! Processes are used for converting between different commodities. The data structures in this
//! module are used to represent these conversions along with the associated costs and bounds.
use crate::commodity::CommodityID;
use crate::id::{define_id_getter, define_id_type};
use crate::input::deserialise_year_values;
use crate::interpolation::InterpolationMode;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

define_id_type! {ProcessID}

/// A map of [`Process`]es, keyed by process ID
pub type ProcessMap = IndexMap<ProcessID, Process>;

/// Represents a process within the model
#[derive(PartialEq, Debug, Clone)]
pub struct Process {
    /// A unique identifier for the process (e.g. PP_CCGT)
    pub id: ProcessID,
    /// A human-readable description for the process (e.g. combined cycle gas turbine)
    pub description: String,
    /// Classification sets for the process (e.g. ELE)
    pub sets: Vec<String>,
    /// Which commodity group defines the process' activity
    pub primary_commodity_group: PrimaryCommodityGroup,
    /// Commodities consumed by the process
    pub inputs: Vec<Flow>,
    /// Commodities produced by the process
    pub outputs: Vec<Flow>,
    /// Unit of activity, if not the default
    pub activity_unit: Option<String>,
    /// Unit of capacity, if not the default
    pub capacity_unit: Option<String>,
    /// Conversion efficiency
    pub efficiency: Option<TimeVarying>,
    /// Cost and technical parameters other than efficiency, in [`ProcessParameter::ALL`] order
    pub parameters: IndexMap<ProcessParameter, TimeVarying>,
    /// Bounds on activity and capacity, in declaration order
    pub bounds: Vec<ProcessBound>,
}
define_id_getter! {Process, ProcessID}

impl Process {
    /// The first output commodity of this process, if it has any outputs
    pub fn first_output(&self) -> Option<&CommodityID> {
        self.outputs.first().map(|flow| &flow.commodity)
    }

    /// The first input commodity of this process, if it has any inputs
    pub fn first_input(&self) -> Option<&CommodityID> {
        self.inputs.first().map(|flow| &flow.commodity)
    }
}

/// A commodity flow into or out of a process
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct Flow {
    /// The commodity flowing
    pub commodity: CommodityID,
    /// The share of this flow within the process' inputs or outputs
    pub share: Option<f64>,
}

impl Flow {
    /// A flow with no share
    pub fn new(commodity: CommodityID) -> Self {
        Self {
            commodity,
            share: None,
        }
    }
}

/// The commodity group driving a process' activity and capacity accounting
#[derive(PartialEq, Eq, Debug, Clone, Copy, Display, EnumString, EnumIter)]
pub enum PrimaryCommodityGroup {
    /// Demand commodities, input side
    #[strum(serialize = "DEMI")]
    DemandInput,
    /// Demand commodities, output side
    #[strum(serialize = "DEMO")]
    DemandOutput,
    /// Material commodities, input side
    #[strum(serialize = "MATI")]
    MaterialInput,
    /// Material commodities, output side
    #[strum(serialize = "MATO")]
    MaterialOutput,
    /// Energy commodities, input side
    #[strum(serialize = "NRGI")]
    EnergyInput,
    /// Energy commodities, output side
    #[strum(serialize = "NRGO")]
    EnergyOutput,
    /// Emission commodities, input side
    #[strum(serialize = "ENVI")]
    EmissionInput,
    /// Emission commodities, output side
    #[strum(serialize = "ENVO")]
    EmissionOutput,
    /// Financial commodities, input side
    #[strum(serialize = "FINI")]
    FinancialInput,
    /// Financial commodities, output side
    #[strum(serialize = "FINO")]
    FinancialOutput,
}

/// A value which is either constant or declared for particular years
#[derive(PartialEq, Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum TimeVarying {
    /// The same value in every year
    Scalar(f64),
    /// Values for particular years
    Series(TimeSeries),
}

impl TimeVarying {
    /// The value, if it is the same in every year
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::Series(_) => None,
        }
    }
}

/// Values declared for particular years, with a rule for the years in between
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct TimeSeries {
    /// The declared values, keyed by year
    #[serde(deserialize_with = "deserialise_year_values")]
    pub values: BTreeMap<u32, f64>,
    /// How the downstream tool fills in other years
    #[serde(default)]
    pub interpolation: InterpolationMode,
}

/// A cost or technical parameter of a process, other than efficiency
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum ProcessParameter {
    /// Investment cost per unit of new capacity
    InvestmentCost,
    /// Fixed operating cost per unit of capacity
    FixedOperatingCost,
    /// Variable operating cost per unit of activity
    VariableOperatingCost,
    /// Technical lifetime in years
    Lifetime,
    /// Import/export price
    Cost,
    /// Fraction of capacity available for activity
    AvailabilityFactor,
}

impl ProcessParameter {
    /// All parameters, in the order their columns are written
    pub const ALL: [ProcessParameter; 6] = [
        Self::InvestmentCost,
        Self::FixedOperatingCost,
        Self::VariableOperatingCost,
        Self::Lifetime,
        Self::Cost,
        Self::AvailabilityFactor,
    ];

    /// The canonical column this parameter is written to
    pub fn column(self) -> &'static str {
        match self {
            Self::InvestmentCost => "ncap_cost",
            Self::FixedOperatingCost => "ncap_fom",
            Self::VariableOperatingCost => "act_cost",
            Self::Lifetime => "ncap_tlife",
            Self::Cost => "ire_price",
            Self::AvailabilityFactor => "ncap_af",
        }
    }
}

/// The canonical column for process efficiency
pub const EFFICIENCY_COLUMN: &str = "eff";

/// What a process bound applies to
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BoundKind {
    /// Annual activity
    Activity,
    /// Installed capacity
    Capacity,
    /// New capacity
    NewCapacity,
}

impl BoundKind {
    /// The canonical column the bound value is written to
    pub fn column(self) -> &'static str {
        match self {
            Self::Activity => "act_bnd",
            Self::Capacity => "cap_bnd",
            Self::NewCapacity => "ncap_bnd",
        }
    }
}

/// The sense of a limit
#[derive(PartialEq, Eq, Hash, Debug, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum LimitKind {
    /// Upper limit
    #[default]
    Up,
    /// Lower limit
    Lo,
    /// Fixed value
    Fx,
}

impl LimitKind {
    /// The code written to `limtype` columns
    pub fn code(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Lo => "LO",
            Self::Fx => "FX",
        }
    }
}

/// The limits declared for one kind of bound, in declaration order
pub type BoundSpec = IndexMap<LimitKind, f64>;

/// A single limit on a process' activity or capacity
#[derive(PartialEq, Debug, Clone)]
pub struct ProcessBound {
    /// What is bounded
    pub kind: BoundKind,
    /// The sense of the limit
    pub limit: LimitKind,
    /// The limit value
    pub value: f64,
}
