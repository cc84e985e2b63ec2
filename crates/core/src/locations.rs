//! Pickup / delivery location types.

use serde::{Deserialize, Serialize};

pub const LOCATION_PICKUP: &str = "pickup";
pub const LOCATION_DELIVERY: &str = "delivery";

/// Whether a location is a pickup or a delivery stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Pickup,
    Delivery,
}

impl LocationType {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Pickup => LOCATION_PICKUP,
            LocationType::Delivery => LOCATION_DELIVERY,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            LOCATION_PICKUP => Some(LocationType::Pickup),
            LOCATION_DELIVERY => Some(LocationType::Delivery),
            _ => None,
        }
    }
}

/// Count pickups and deliveries among a job's location type labels.
///
/// Unknown labels are ignored.
pub fn count_by_type<'a, I>(types: I) -> (usize, usize)
where
    I: IntoIterator<Item = &'a str>,
{
    types
        .into_iter()
        .fold((0, 0), |(pickups, deliveries), t| match LocationType::parse(t) {
            Some(LocationType::Pickup) => (pickups + 1, deliveries),
            Some(LocationType::Delivery) => (pickups, deliveries + 1),
            None => (pickups, deliveries),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_pickups_and_deliveries() {
        let types = ["pickup", "delivery", "delivery", "warehouse"];
        assert_eq!(count_by_type(types), (1, 2));
    }

    #[test]
    fn empty_list_counts_zero() {
        assert_eq!(count_by_type(Vec::<&str>::new()), (0, 0));
    }
}
