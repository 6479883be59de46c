//! Antenna types and their capability table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlacementError;

/// Constants describing one antenna type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntennaSpec {
    /// Coverage radius in metres
    pub range: u64,
    /// Maximum aggregate demand served
    pub capacity: u64,
    /// Activation cost when placed on a building
    pub cost: u64,
    /// Activation cost when placed anywhere else
    pub off_building_cost: u64,
}

impl AntennaSpec {
    /// Squared radius, compared against squared distances.
    pub fn range_sq(&self) -> i64 {
        (self.range * self.range) as i64
    }
}

/// The closed set of antenna types.
///
/// Cost efficiency is not monotonic in range or capacity, so callers that
/// need "the cheapest type that works" must scan [`AntennaType::BY_COST`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AntennaType {
    Nano,
    Spot,
    Density,
    MaxRange,
}

impl AntennaType {
    pub const ALL: [AntennaType; 4] = [
        AntennaType::Nano,
        AntennaType::Spot,
        AntennaType::Density,
        AntennaType::MaxRange,
    ];

    /// All types in ascending order of on-building cost.
    pub const BY_COST: [AntennaType; 4] = [
        AntennaType::Nano,
        AntennaType::Spot,
        AntennaType::Density,
        AntennaType::MaxRange,
    ];

    pub const fn spec(self) -> AntennaSpec {
        match self {
            AntennaType::Nano => AntennaSpec {
                range: 50,
                capacity: 200,
                cost: 5_000,
                off_building_cost: 6_000,
            },
            AntennaType::Spot => AntennaSpec {
                range: 100,
                capacity: 800,
                cost: 15_000,
                off_building_cost: 20_000,
            },
            AntennaType::Density => AntennaSpec {
                range: 150,
                capacity: 5_000,
                cost: 30_000,
                off_building_cost: 50_000,
            },
            AntennaType::MaxRange => AntennaSpec {
                range: 400,
                capacity: 3_500,
                cost: 40_000,
                off_building_cost: 50_000,
            },
        }
    }

    pub const fn range(self) -> u64 {
        self.spec().range
    }

    pub const fn capacity(self) -> u64 {
        self.spec().capacity
    }

    pub const fn cost(self) -> u64 {
        self.spec().cost
    }

    pub fn name(self) -> &'static str {
        match self {
            AntennaType::Nano => "Nano",
            AntennaType::Spot => "Spot",
            AntennaType::Density => "Density",
            AntennaType::MaxRange => "MaxRange",
        }
    }

    /// Largest coverage radius of any type.
    pub fn max_range() -> u64 {
        Self::ALL.iter().map(|t| t.range()).max().unwrap_or(0)
    }

    /// Types able to carry `demand` on their own.
    pub fn able_to_carry(demand: u64) -> impl Iterator<Item = AntennaType> {
        Self::BY_COST
            .into_iter()
            .filter(move |t| t.capacity() >= demand)
    }

    /// Cheapest type whose capacity covers `demand`, ignoring range.
    pub fn cheapest_for_demand(demand: u64) -> Option<AntennaType> {
        Self::able_to_carry(demand).next()
    }
}

impl fmt::Display for AntennaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AntennaType {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AntennaType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| PlacementError::UnknownAntennaType(s.to_string()))
    }
}
