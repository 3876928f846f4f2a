use crate::booking::DateRange;
use crate::vehicle::VehicleType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seasonal price multiplier row, scoped by validity window, vehicle types
/// and regions. Empty scope sets act as wildcards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalRate {
    pub id: Uuid,
    pub name: String,
    pub price_multiplier: f64,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub vehicle_types: Vec<VehicleType>,
    pub regions: Vec<String>,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl SeasonalRate {
    /// Validity window overlaps the rental range (null bounds are open-ended)
    pub fn overlaps(&self, range: &DateRange) -> bool {
        let from_ok = self.valid_from.map_or(true, |from| from <= range.end);
        let until_ok = self.valid_until.map_or(true, |until| until >= range.start);
        from_ok && until_ok
    }

    pub fn covers_vehicle(&self, vehicle_type: VehicleType) -> bool {
        self.vehicle_types.is_empty() || self.vehicle_types.contains(&vehicle_type)
    }

    pub fn covers_region(&self, region: &str) -> bool {
        self.regions.is_empty() || self.regions.iter().any(|r| r == region)
    }
}

/// Driver service rate for a tour type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverRate {
    pub id: Uuid,
    pub tour_type: Option<crate::vehicle::TourType>,
    /// Base driver cost per day, NPR
    pub daily_rate: f64,
    pub price_per_km: Option<f64>,
    pub terrain_multiplier: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountValueType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountSource {
    Coupon,
    LongTerm,
}

/// A coupon or long-term discount rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountRule {
    pub id: Uuid,
    pub code: Option<String>,
    pub source: DiscountSource,
    pub value_type: DiscountValueType,
    pub value: f64,
    pub max_discount: Option<f64>,
    pub min_booking_amount: Option<f64>,
    pub min_days: Option<i64>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub per_user_limit: Option<i32>,
    pub vehicle_types: Vec<VehicleType>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl DiscountRule {
    /// Coupon validity is checked against the moment of booking, not the
    /// rental dates
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let from_ok = self.valid_from.map_or(true, |from| from <= now);
        let until_ok = self.valid_until.map_or(true, |until| until >= now);
        from_ok && until_ok
    }

    pub fn covers_vehicle(&self, vehicle_type: VehicleType) -> bool {
        self.vehicle_types.is_empty() || self.vehicle_types.contains(&vehicle_type)
    }
}
