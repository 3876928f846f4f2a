use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vehicle category a rental is priced against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Car,
    Suv,
    Van,
    Minibus,
    Bus,
    Motorbike,
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VehicleType::Car => "CAR",
            VehicleType::Suv => "SUV",
            VehicleType::Van => "VAN",
            VehicleType::Minibus => "MINIBUS",
            VehicleType::Bus => "BUS",
            VehicleType::Motorbike => "MOTORBIKE",
        };
        f.write_str(s)
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CAR" => Ok(VehicleType::Car),
            "SUV" => Ok(VehicleType::Suv),
            "VAN" => Ok(VehicleType::Van),
            "MINIBUS" => Ok(VehicleType::Minibus),
            "BUS" => Ok(VehicleType::Bus),
            "MOTORBIKE" => Ok(VehicleType::Motorbike),
            other => Err(format!("Unknown vehicle type: {}", other)),
        }
    }
}

/// Tour-route classification; MOUNTAIN routes carry a driver terrain surcharge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TourType {
    City,
    Heritage,
    Wildlife,
    Trekking,
    Mountain,
}

impl TourType {
    /// Routes that qualify for the difficult-terrain driver surcharge
    pub fn is_difficult_terrain(&self) -> bool {
        matches!(self, TourType::Mountain)
    }
}

impl fmt::Display for TourType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TourType::City => "CITY",
            TourType::Heritage => "HERITAGE",
            TourType::Wildlife => "WILDLIFE",
            TourType::Trekking => "TREKKING",
            TourType::Mountain => "MOUNTAIN",
        };
        f.write_str(s)
    }
}

impl FromStr for TourType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CITY" => Ok(TourType::City),
            "HERITAGE" => Ok(TourType::Heritage),
            "WILDLIFE" => Ok(TourType::Wildlife),
            "TREKKING" => Ok(TourType::Trekking),
            "MOUNTAIN" => Ok(TourType::Mountain),
            other => Err(format!("Unknown tour type: {}", other)),
        }
    }
}
