use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;
use yatra_core::{
    BookingHistory, BookingStore, CreateOutcome, PricingConfigStore, StoreError,
};
use yatra_domain::{
    Booking, BookingStatus, DiscountRule, DiscountSource, DriverRate, RefundDecision,
    SeasonalRate, TourType,
};

/// In-memory pricing configuration, for tests and local development
#[derive(Default)]
pub struct InMemoryConfigStore {
    seasonal: Mutex<Vec<SeasonalRate>>,
    drivers: Mutex<Vec<DriverRate>>,
    discounts: Mutex<Vec<DiscountRule>>,
}

impl InMemoryConfigStore {
    pub fn add_seasonal(&self, rate: SeasonalRate) {
        self.seasonal.lock().unwrap().push(rate);
    }

    pub fn add_driver(&self, rate: DriverRate) {
        self.drivers.lock().unwrap().push(rate);
    }

    pub fn add_discount(&self, rule: DiscountRule) {
        self.discounts.lock().unwrap().push(rule);
    }
}

#[async_trait]
impl PricingConfigStore for InMemoryConfigStore {
    async fn active_seasonal_rates(&self) -> Result<Vec<SeasonalRate>, StoreError> {
        Ok(self
            .seasonal
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect())
    }

    async fn active_driver_rate(
        &self,
        tour_type: Option<TourType>,
    ) -> Result<Option<DriverRate>, StoreError> {
        let rates = self.drivers.lock().unwrap();
        let mut candidates: Vec<_> = rates
            .iter()
            .filter(|r| r.is_active && (r.tour_type.is_none() || r.tour_type == tour_type))
            .cloned()
            .collect();
        // Exact tour-type match beats the generic rate
        candidates.sort_by(|a, b| {
            b.tour_type
                .is_some()
                .cmp(&a.tour_type.is_some())
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(candidates.into_iter().next())
    }

    async fn find_coupon(&self, code: &str) -> Result<Option<DiscountRule>, StoreError> {
        Ok(self
            .discounts
            .lock()
            .unwrap()
            .iter()
            .find(|r| {
                r.is_active
                    && r.source == DiscountSource::Coupon
                    && r.code.as_deref() == Some(code)
            })
            .cloned())
    }

    async fn active_long_term_discounts(&self) -> Result<Vec<DiscountRule>, StoreError> {
        let mut rules: Vec<_> = self
            .discounts
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_active && r.source == DiscountSource::LongTerm)
            .cloned()
            .collect();
        rules.sort_by(|a, b| b.min_days.cmp(&a.min_days));
        Ok(rules)
    }
}

/// In-memory booking store. Coupon capacity is tracked per code so the
/// commit-time conditional decrement behaves like the Postgres counter.
#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: Mutex<HashMap<Uuid, Booking>>,
    coupon_capacity: Mutex<HashMap<String, i32>>,
}

impl InMemoryBookingStore {
    /// Cap the remaining uses of a coupon; codes without an entry are
    /// unlimited
    pub fn set_coupon_capacity(&self, code: &str, remaining: i32) {
        self.coupon_capacity
            .lock()
            .unwrap()
            .insert(code.to_string(), remaining);
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create_booking(&self, booking: &Booking) -> Result<CreateOutcome, StoreError> {
        if let Some(code) = &booking.coupon_code {
            let mut capacity = self.coupon_capacity.lock().unwrap();
            if let Some(remaining) = capacity.get_mut(code) {
                if *remaining <= 0 {
                    return Ok(CreateOutcome::CouponExhausted);
                }
                *remaining -= 1;
            }
        }

        self.bookings
            .lock()
            .unwrap()
            .insert(booking.id, booking.clone());
        Ok(CreateOutcome::Created)
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.lock().unwrap().get(&id).cloned())
    }

    async fn cancel_booking(&self, id: Uuid, refund: &RefundDecision) -> Result<(), StoreError> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.get_mut(&id) {
            Some(booking) => {
                booking.cancel(refund.clone());
                Ok(())
            }
            None => Err(format!("Booking not found: {}", id).into()),
        }
    }
}

#[async_trait]
impl BookingHistory for InMemoryBookingStore {
    async fn count_coupon_uses(&self, user_id: Uuid, code: &str) -> Result<i64, StoreError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| {
                b.user_id == user_id
                    && b.coupon_code.as_deref() == Some(code)
                    && b.status != BookingStatus::Cancelled
            })
            .count() as i64)
    }
}
