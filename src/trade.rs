//! Trade links allow a commodity to be exchanged between regions.
use crate::commodity::CommodityID;
use crate::id::RegionID;
use serde::Deserialize;

/// A declared commodity exchange between two regions
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct TradeLink {
    /// The exporting region
    pub origin: RegionID,
    /// The importing region
    pub destination: RegionID,
    /// The traded commodity
    pub commodity: CommodityID,
    /// Whether the commodity can also flow from destination to origin
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
    /// Transmission efficiency
    pub efficiency: Option<f64>,
}

fn default_bidirectional() -> bool {
    true
}

impl TradeLink {
    /// The code for this link's direction, used in process and sheet names
    pub fn direction_code(&self) -> &'static str {
        if self.bidirectional { "B" } else { "U" }
    }

    /// The name of the synthetic process which carries this link's flow
    pub fn process_name(&self) -> String {
        format!(
            "T_{}_{}_{}_{}_01",
            self.direction_code(),
            self.commodity,
            self.origin,
            self.destination
        )
    }
}
