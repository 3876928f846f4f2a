use async_trait::async_trait;
use uuid::Uuid;
use yatra_domain::{Booking, DiscountRule, DriverRate, RefundDecision, SeasonalRate, TourType};

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Read access to admin-maintained pricing configuration.
/// The pricing components filter and rank the returned rows themselves so
/// the selection policy stays testable against in-memory data.
#[async_trait]
pub trait PricingConfigStore: Send + Sync {
    async fn active_seasonal_rates(&self) -> Result<Vec<SeasonalRate>, StoreError>;

    async fn active_driver_rate(
        &self,
        tour_type: Option<TourType>,
    ) -> Result<Option<DriverRate>, StoreError>;

    /// Active COUPON rule with this exact code, if any
    async fn find_coupon(&self, code: &str) -> Result<Option<DiscountRule>, StoreError>;

    /// Active LONG_TERM rules, highest min_days first
    async fn active_long_term_discounts(&self) -> Result<Vec<DiscountRule>, StoreError>;
}

/// Read access to prior bookings, for per-user coupon limits
#[async_trait]
pub trait BookingHistory: Send + Sync {
    /// Number of the user's non-cancelled bookings carrying this coupon code
    async fn count_coupon_uses(&self, user_id: Uuid, code: &str) -> Result<i64, StoreError>;
}

/// Outcome of a booking commit. The coupon counter is consumed with a
/// conditional increment inside the same transaction as the insert, so a
/// capped coupon can lose the race here even after passing the engine's
/// pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    CouponExhausted,
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create_booking(&self, booking: &Booking) -> Result<CreateOutcome, StoreError>;

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    async fn cancel_booking(&self, id: Uuid, refund: &RefundDecision) -> Result<(), StoreError>;
}
