use crate::pricing::{PriceBreakdown, RefundDecision};
use crate::vehicle::{TourType, VehicleType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Rental period, inclusive of both end dates
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Billable rental days; same-day rentals bill one day
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            other => Err(format!("Unknown booking status: {}", other)),
        }
    }
}

/// A vehicle booking with its priced breakdown flattened in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_type: VehicleType,
    pub region: String,
    pub tour_type: Option<TourType>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub number_of_vehicles: u32,
    pub number_of_drivers: u32,
    pub estimated_distance_km: Option<f64>,
    pub coupon_code: Option<String>,
    pub status: BookingStatus,
    #[serde(flatten)]
    pub price: PriceBreakdown,
    pub refund: Option<RefundDecision>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(request: &CreateBookingRequest, price: PriceBreakdown) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            vehicle_type: request.vehicle_type,
            region: request.region.clone(),
            tour_type: request.tour_type,
            start_date: request.start_date,
            end_date: request.end_date,
            number_of_vehicles: request.number_of_vehicles,
            number_of_drivers: request.number_of_drivers,
            estimated_distance_km: request.estimated_distance_km,
            coupon_code: request.coupon_code.clone(),
            status: BookingStatus::Pending,
            price,
            refund: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Cancellations record the refund decision on the booking itself
    pub fn cancel(&mut self, refund: RefundDecision) {
        self.status = BookingStatus::Cancelled;
        self.refund = Some(refund);
        self.updated_at = Utc::now();
    }
}

fn default_vehicle_count() -> u32 {
    1
}

/// Payload for creating (or quoting) a booking. The daily vehicle rate and
/// the region/tour tags are resolved by the caller from the vehicle record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub user_id: Uuid,
    pub vehicle_type: VehicleType,
    pub region: String,
    #[serde(default)]
    pub tour_type: Option<TourType>,
    pub price_per_day: f64,
    #[serde(default = "default_vehicle_count")]
    pub number_of_vehicles: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub number_of_drivers: u32,
    #[serde(default)]
    pub estimated_distance_km: Option<f64>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub advance_amount: f64,
}

impl CreateBookingRequest {
    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}
