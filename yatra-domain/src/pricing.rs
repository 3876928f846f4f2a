use crate::config::{DiscountSource, DiscountValueType};
use serde::{Deserialize, Serialize};

/// One discount line applied to a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub source: DiscountSource,
    pub value_type: DiscountValueType,
    /// Configured value (percent or fixed NPR, per value_type)
    pub value: f64,
    /// Amount actually deducted, NPR
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Full price breakdown for a booking, flattened onto the booking record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub vehicle_base_amount: f64,
    pub seasonal_multiplier: f64,
    pub driver_total_amount: Option<f64>,
    pub distance_charge: f64,
    pub terrain_charge: f64,
    pub applied_discounts: Vec<AppliedDiscount>,
    pub discount_amount: f64,
    pub gross_amount: f64,
    pub total_price: f64,
    pub advance_amount: f64,
    pub remaining_amount: f64,
}

/// Refund tier for a cancellation, keyed by days of notice before start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefundPolicy {
    #[serde(rename = "CANCEL_7_DAYS_BEFORE")]
    Cancel7DaysBefore,
    #[serde(rename = "CANCEL_3_TO_6_DAYS")]
    Cancel3To6Days,
    #[serde(rename = "CANCEL_1_TO_2_DAYS")]
    Cancel1To2Days,
    #[serde(rename = "NO_REFUND")]
    NoRefund,
}

impl std::str::FromStr for RefundPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CANCEL_7_DAYS_BEFORE" => Ok(RefundPolicy::Cancel7DaysBefore),
            "CANCEL_3_TO_6_DAYS" => Ok(RefundPolicy::Cancel3To6Days),
            "CANCEL_1_TO_2_DAYS" => Ok(RefundPolicy::Cancel1To2Days),
            "NO_REFUND" => Ok(RefundPolicy::NoRefund),
            other => Err(format!("Unknown refund policy: {}", other)),
        }
    }
}

impl RefundPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefundPolicy::Cancel7DaysBefore => "CANCEL_7_DAYS_BEFORE",
            RefundPolicy::Cancel3To6Days => "CANCEL_3_TO_6_DAYS",
            RefundPolicy::Cancel1To2Days => "CANCEL_1_TO_2_DAYS",
            RefundPolicy::NoRefund => "NO_REFUND",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundDecision {
    pub refund_percentage: i32,
    pub refund_amount: f64,
    pub reason: String,
    pub policy: RefundPolicy,
}
