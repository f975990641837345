//! Code for reading in commodity-related data from a source document.
use crate::commodity::{Commodity, CommodityMap};
use anyhow::{Result, ensure};

/// Collect commodity declarations into a map, checking that names are unique.
///
/// # Arguments
///
/// * `commodities` - Commodities in declaration order
///
/// # Returns
///
/// A map containing commodities, keyed by commodity ID, or an error.
pub fn read_commodities(commodities: Vec<Commodity>) -> Result<CommodityMap> {
    let mut map = CommodityMap::with_capacity(commodities.len());
    for commodity in commodities {
        let id = commodity.id.clone();
        ensure!(
            map.insert(id.clone(), commodity).is_none(),
            "Duplicate commodity name '{id}'"
        );
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commodity::CommodityType;
    use crate::fixture::assert_error;

    fn commodity(name: &str) -> Commodity {
        Commodity {
            id: name.into(),
            description: String::new(),
            kind: CommodityType::Energy,
            unit: None,
        }
    }

    #[test]
    fn read_commodities_keeps_order() {
        let map = read_commodities(vec![commodity("NG"), commodity("ELC")]).unwrap();
        assert_eq!(
            map.keys().map(|id| id.as_str()).collect::<Vec<_>>(),
            ["NG", "ELC"]
        );
    }

    #[test]
    fn read_commodities_duplicate() {
        assert_error!(
            read_commodities(vec![commodity("NG"), commodity("NG")]),
            "Duplicate commodity name 'NG'"
        );
    }
}
