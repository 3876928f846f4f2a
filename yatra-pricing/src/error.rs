use yatra_core::StoreError;
use yatra_domain::VehicleType;

/// Coupon rejection reasons. Each is terminal: the whole price computation
/// aborts and the message goes back to the customer verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiscountError {
    #[error("Invalid or expired coupon code.")]
    InvalidOrExpiredCoupon,

    #[error("This coupon has reached its usage limit.")]
    UsageLimitReached,

    #[error("You have already used this coupon {limit} time(s). Per-user limit reached.")]
    PerUserLimitReached { limit: i32 },

    #[error("Minimum booking amount of NPR {minimum} required for this coupon.")]
    MinimumAmountNotMet { minimum: f64 },

    #[error("Minimum {days} days required for this coupon.")]
    MinimumDaysNotMet { days: i64 },

    #[error("This coupon is not applicable for {vehicle_type} vehicle type.")]
    VehicleTypeMismatch { vehicle_type: VehicleType },
}

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error(transparent)]
    Discount(#[from] DiscountError),

    #[error("Pricing data unavailable: {0}")]
    Store(#[from] StoreError),
}
