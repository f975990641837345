//! Commodities are substances or forms of energy that can be produced and consumed by processes.
use crate::id::{define_id_getter, define_id_type};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;

define_id_type! {CommodityID}

/// A map of [`Commodity`]s, keyed by commodity ID
pub type CommodityMap = IndexMap<CommodityID, Commodity>;

/// A commodity within the model.
///
/// Represents a substance (e.g. CO2) or form of energy (e.g. electricity) that can be produced or
/// consumed by processes.
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct Commodity {
    /// Unique identifier for the commodity (e.g. "ELC")
    #[serde(rename = "name")]
    pub id: CommodityID,
    /// Text description of commodity (e.g. "electricity")
    #[serde(default)]
    pub description: String,
    /// What kind of commodity this is
    #[serde(rename = "type")] // NB: we can't name a field type as it's a reserved keyword
    pub kind: CommodityType,
    /// The unit the commodity is measured in, if it differs from the default for its type
    pub unit: Option<String>,
}
define_id_getter! {Commodity, CommodityID}

impl Commodity {
    /// The unit of this commodity, falling back to the default for its type
    pub fn unit(&self) -> &str {
        self.unit.as_deref().unwrap_or(self.kind.default_unit())
    }
}

/// Commodity type
#[derive(PartialEq, Eq, Debug, DeserializeLabeledStringEnum, Clone, Copy)]
pub enum CommodityType {
    /// A form of energy (e.g. electricity, natural gas)
    #[string = "energy"]
    Energy,
    /// A physical material (e.g. steel)
    #[string = "material"]
    Material,
    /// An emission (e.g. CO2)
    #[string = "emission"]
    Emission,
    /// An end-use service demand
    #[string = "demand"]
    Demand,
}

impl CommodityType {
    /// The unit used for commodities of this type when none is declared
    pub fn default_unit(self) -> &'static str {
        match self {
            Self::Energy | Self::Demand => "PJ",
            Self::Emission | Self::Material => "Mt",
        }
    }

    /// The commodity set code written to the commodity table
    pub fn cset(self) -> &'static str {
        match self {
            Self::Energy => "NRG",
            Self::Material => "MAT",
            Self::Emission => "ENV",
            Self::Demand => "DEM",
        }
    }

    /// The name used for this type in source documents
    pub fn name(self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Material => "material",
            Self::Emission => "emission",
            Self::Demand => "demand",
        }
    }
}
