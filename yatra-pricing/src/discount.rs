use crate::error::{DiscountError, PricingError};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use yatra_core::{BookingHistory, Clock, PricingConfigStore};
use yatra_domain::{AppliedDiscount, DiscountSource, DiscountValueType, VehicleType};

/// Rental length at which the long-term tier starts being considered
pub const LONG_TERM_THRESHOLD_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
pub struct DiscountOutcome {
    pub discounts: Vec<AppliedDiscount>,
    pub total_discount: f64,
}

/// Resolves and stacks the discounts applicable to a gross amount.
///
/// Coupon eligibility gates are fail-fast: the first violated gate aborts
/// the whole computation with a customer-facing message. The engine never
/// mutates `usage_count`; consuming the coupon is the committing caller's
/// responsibility, done atomically with the booking insert.
pub struct DiscountEngine {
    store: Arc<dyn PricingConfigStore>,
    history: Arc<dyn BookingHistory>,
    clock: Arc<dyn Clock>,
}

impl DiscountEngine {
    pub fn new(
        store: Arc<dyn PricingConfigStore>,
        history: Arc<dyn BookingHistory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            history,
            clock,
        }
    }

    pub async fn compute(
        &self,
        gross_amount: f64,
        duration_days: i64,
        coupon_code: Option<&str>,
        user_id: Uuid,
        vehicle_type: VehicleType,
    ) -> Result<DiscountOutcome, PricingError> {
        let mut discounts = Vec::new();
        let mut total_discount = 0.0;

        if let Some(code) = coupon_code {
            if let Some(line) = self
                .apply_coupon(code, gross_amount, duration_days, user_id, vehicle_type)
                .await?
            {
                total_discount += line.amount;
                discounts.push(line);
            }
        }

        // The long-term tier stacks on top of any coupon
        if duration_days >= LONG_TERM_THRESHOLD_DAYS {
            if let Some(line) = self.apply_long_term(gross_amount, duration_days).await? {
                total_discount += line.amount;
                discounts.push(line);
            }
        }

        Ok(DiscountOutcome {
            discounts,
            total_discount,
        })
    }

    async fn apply_coupon(
        &self,
        code: &str,
        gross_amount: f64,
        duration_days: i64,
        user_id: Uuid,
        vehicle_type: VehicleType,
    ) -> Result<Option<AppliedDiscount>, PricingError> {
        let now = self.clock.now();
        let rule = match self.store.find_coupon(code).await? {
            Some(rule) if rule.is_valid_at(now) => rule,
            _ => return Err(DiscountError::InvalidOrExpiredCoupon.into()),
        };

        if let Some(limit) = rule.usage_limit {
            if rule.usage_count >= limit {
                return Err(DiscountError::UsageLimitReached.into());
            }
        }

        if let Some(limit) = rule.per_user_limit {
            let uses = self.history.count_coupon_uses(user_id, code).await?;
            if uses >= i64::from(limit) {
                return Err(DiscountError::PerUserLimitReached { limit }.into());
            }
        }

        if let Some(minimum) = rule.min_booking_amount {
            if gross_amount < minimum {
                return Err(DiscountError::MinimumAmountNotMet { minimum }.into());
            }
        }

        if let Some(days) = rule.min_days {
            if duration_days < days {
                return Err(DiscountError::MinimumDaysNotMet { days }.into());
            }
        }

        if !rule.covers_vehicle(vehicle_type) {
            return Err(DiscountError::VehicleTypeMismatch { vehicle_type }.into());
        }

        let amount = match rule.value_type {
            DiscountValueType::Percentage => {
                let raw = gross_amount * rule.value / 100.0;
                match rule.max_discount {
                    Some(cap) => raw.min(cap),
                    None => raw,
                }
            }
            // Fixed coupons pay out verbatim; no cap applies
            DiscountValueType::Fixed => rule.value,
        };

        if amount > 0.0 {
            tracing::debug!(code, amount, "Coupon discount applied");
            Ok(Some(AppliedDiscount {
                source: DiscountSource::Coupon,
                value_type: rule.value_type,
                value: rule.value,
                amount,
                code: rule.code.clone(),
            }))
        } else {
            Ok(None)
        }
    }

    /// Highest qualifying min_days threshold wins
    async fn apply_long_term(
        &self,
        gross_amount: f64,
        duration_days: i64,
    ) -> Result<Option<AppliedDiscount>, PricingError> {
        let rules = self.store.active_long_term_discounts().await?;
        let best = rules
            .into_iter()
            .filter(|r| r.min_days.map_or(false, |d| d <= duration_days))
            .max_by_key(|r| r.min_days.unwrap_or(0));

        let Some(rule) = best else {
            return Ok(None);
        };
        if rule.value <= 0.0 {
            return Ok(None);
        }

        let amount = match rule.value_type {
            DiscountValueType::Percentage => gross_amount * rule.value / 100.0,
            DiscountValueType::Fixed => rule.value,
        };

        tracing::debug!(amount, days = duration_days, "Long-term discount applied");
        Ok(Some(AppliedDiscount {
            source: DiscountSource::LongTerm,
            value_type: rule.value_type,
            value: rule.value,
            amount,
            code: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use yatra_core::{FixedClock, StoreError};
    use yatra_domain::DiscountRule;
    use yatra_store::memory::InMemoryConfigStore;

    /// History stub returning a fixed prior-use count
    struct FixedHistory(i64);

    #[async_trait]
    impl BookingHistory for FixedHistory {
        async fn count_coupon_uses(&self, _user_id: Uuid, _code: &str) -> Result<i64, StoreError> {
            Ok(self.0)
        }
    }

    fn coupon(code: &str, value_type: DiscountValueType, value: f64) -> DiscountRule {
        DiscountRule {
            id: Uuid::new_v4(),
            code: Some(code.to_string()),
            source: DiscountSource::Coupon,
            value_type,
            value,
            max_discount: None,
            min_booking_amount: None,
            min_days: None,
            usage_limit: None,
            usage_count: 0,
            per_user_limit: None,
            vehicle_types: vec![],
            valid_from: None,
            valid_until: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn long_term(min_days: i64, value: f64) -> DiscountRule {
        DiscountRule {
            id: Uuid::new_v4(),
            code: None,
            source: DiscountSource::LongTerm,
            value_type: DiscountValueType::Percentage,
            value,
            max_discount: None,
            min_booking_amount: None,
            min_days: Some(min_days),
            usage_limit: None,
            usage_count: 0,
            per_user_limit: None,
            vehicle_types: vec![],
            valid_from: None,
            valid_until: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn engine_with(store: InMemoryConfigStore, prior_uses: i64) -> DiscountEngine {
        DiscountEngine::new(
            Arc::new(store),
            Arc::new(FixedHistory(prior_uses)),
            Arc::new(FixedClock(Utc::now())),
        )
    }

    fn expect_rejection(result: Result<DiscountOutcome, PricingError>) -> DiscountError {
        match result {
            Err(PricingError::Discount(e)) => e,
            other => panic!("expected discount rejection, got {:?}", other.map(|o| o.total_discount)),
        }
    }

    #[tokio::test]
    async fn test_percentage_coupon_without_cap() {
        let store = InMemoryConfigStore::default();
        store.add_discount(coupon("SAVE10", DiscountValueType::Percentage, 10.0));
        let engine = engine_with(store, 0);

        let outcome = engine
            .compute(1000.0, 3, Some("SAVE10"), Uuid::new_v4(), VehicleType::Car)
            .await
            .unwrap();
        assert_eq!(outcome.total_discount, 100.0);
        assert_eq!(outcome.discounts.len(), 1);
        assert_eq!(outcome.discounts[0].source, DiscountSource::Coupon);
        assert_eq!(outcome.discounts[0].code.as_deref(), Some("SAVE10"));
    }

    #[tokio::test]
    async fn test_percentage_coupon_capped_at_max_discount() {
        let store = InMemoryConfigStore::default();
        let mut rule = coupon("SAVE10", DiscountValueType::Percentage, 10.0);
        rule.max_discount = Some(50.0);
        store.add_discount(rule);
        let engine = engine_with(store, 0);

        let outcome = engine
            .compute(1000.0, 3, Some("SAVE10"), Uuid::new_v4(), VehicleType::Car)
            .await
            .unwrap();
        assert_eq!(outcome.total_discount, 50.0);
    }

    #[tokio::test]
    async fn test_fixed_coupon_ignores_cap() {
        let store = InMemoryConfigStore::default();
        let mut rule = coupon("FLAT500", DiscountValueType::Fixed, 500.0);
        rule.max_discount = Some(100.0);
        store.add_discount(rule);
        let engine = engine_with(store, 0);

        let outcome = engine
            .compute(1000.0, 3, Some("FLAT500"), Uuid::new_v4(), VehicleType::Car)
            .await
            .unwrap();
        assert_eq!(outcome.total_discount, 500.0);
    }

    #[tokio::test]
    async fn test_unknown_coupon_rejected() {
        let engine = engine_with(InMemoryConfigStore::default(), 0);

        let err = expect_rejection(
            engine
                .compute(1000.0, 3, Some("NOPE"), Uuid::new_v4(), VehicleType::Car)
                .await,
        );
        assert_eq!(err, DiscountError::InvalidOrExpiredCoupon);
    }

    #[tokio::test]
    async fn test_expired_coupon_rejected() {
        let store = InMemoryConfigStore::default();
        let mut rule = coupon("OLD", DiscountValueType::Percentage, 10.0);
        rule.valid_until = Some(Utc::now() - Duration::days(1));
        store.add_discount(rule);
        let engine = engine_with(store, 0);

        let err = expect_rejection(
            engine
                .compute(1000.0, 3, Some("OLD"), Uuid::new_v4(), VehicleType::Car)
                .await,
        );
        assert_eq!(err, DiscountError::InvalidOrExpiredCoupon);
    }

    #[tokio::test]
    async fn test_usage_limit_gate() {
        let store = InMemoryConfigStore::default();
        let mut rule = coupon("CAPPED", DiscountValueType::Percentage, 10.0);
        rule.usage_limit = Some(100);
        rule.usage_count = 100;
        store.add_discount(rule);
        let engine = engine_with(store, 0);

        let err = expect_rejection(
            engine
                .compute(1000.0, 3, Some("CAPPED"), Uuid::new_v4(), VehicleType::Car)
                .await,
        );
        assert_eq!(err, DiscountError::UsageLimitReached);
    }

    #[tokio::test]
    async fn test_per_user_limit_gate() {
        let store = InMemoryConfigStore::default();
        let mut rule = coupon("ONCE", DiscountValueType::Percentage, 10.0);
        rule.per_user_limit = Some(1);
        store.add_discount(rule);
        let engine = engine_with(store, 1);

        let err = expect_rejection(
            engine
                .compute(1000.0, 3, Some("ONCE"), Uuid::new_v4(), VehicleType::Car)
                .await,
        );
        assert_eq!(err, DiscountError::PerUserLimitReached { limit: 1 });
    }

    #[tokio::test]
    async fn test_minimum_amount_gate() {
        let store = InMemoryConfigStore::default();
        let mut rule = coupon("BIGSPEND", DiscountValueType::Percentage, 10.0);
        rule.min_booking_amount = Some(5000.0);
        store.add_discount(rule);
        let engine = engine_with(store, 0);

        let err = expect_rejection(
            engine
                .compute(1000.0, 3, Some("BIGSPEND"), Uuid::new_v4(), VehicleType::Car)
                .await,
        );
        assert_eq!(err, DiscountError::MinimumAmountNotMet { minimum: 5000.0 });
    }

    #[tokio::test]
    async fn test_minimum_days_gate() {
        let store = InMemoryConfigStore::default();
        let mut rule = coupon("WEEKLY", DiscountValueType::Percentage, 10.0);
        rule.min_days = Some(5);
        store.add_discount(rule);
        let engine = engine_with(store, 0);

        let err = expect_rejection(
            engine
                .compute(1000.0, 3, Some("WEEKLY"), Uuid::new_v4(), VehicleType::Car)
                .await,
        );
        assert_eq!(err, DiscountError::MinimumDaysNotMet { days: 5 });
    }

    #[tokio::test]
    async fn test_vehicle_type_gate() {
        let store = InMemoryConfigStore::default();
        let mut rule = coupon("CARONLY", DiscountValueType::Percentage, 10.0);
        rule.vehicle_types = vec![VehicleType::Car];
        store.add_discount(rule);
        let engine = engine_with(store, 0);

        let err = expect_rejection(
            engine
                .compute(1000.0, 3, Some("CARONLY"), Uuid::new_v4(), VehicleType::Bus)
                .await,
        );
        assert_eq!(
            err,
            DiscountError::VehicleTypeMismatch {
                vehicle_type: VehicleType::Bus
            }
        );
    }

    #[tokio::test]
    async fn test_long_term_discount_at_ten_days() {
        let store = InMemoryConfigStore::default();
        store.add_discount(long_term(7, 5.0));
        let engine = engine_with(store, 0);

        let outcome = engine
            .compute(2000.0, 10, None, Uuid::new_v4(), VehicleType::Car)
            .await
            .unwrap();
        assert_eq!(outcome.total_discount, 100.0);
        assert_eq!(outcome.discounts.len(), 1);
        assert_eq!(outcome.discounts[0].source, DiscountSource::LongTerm);
    }

    #[tokio::test]
    async fn test_long_term_never_applies_under_seven_days() {
        let store = InMemoryConfigStore::default();
        store.add_discount(long_term(7, 5.0));
        let engine = engine_with(store, 0);

        for days in 1..LONG_TERM_THRESHOLD_DAYS {
            let outcome = engine
                .compute(2000.0, days, None, Uuid::new_v4(), VehicleType::Car)
                .await
                .unwrap();
            assert!(
                outcome.discounts.is_empty(),
                "long-term applied at {} days",
                days
            );
        }
    }

    #[tokio::test]
    async fn test_highest_qualifying_long_term_threshold_wins() {
        let store = InMemoryConfigStore::default();
        store.add_discount(long_term(7, 5.0));
        store.add_discount(long_term(14, 8.0));
        store.add_discount(long_term(30, 12.0));
        let engine = engine_with(store, 0);

        let outcome = engine
            .compute(1000.0, 15, None, Uuid::new_v4(), VehicleType::Car)
            .await
            .unwrap();
        assert_eq!(outcome.discounts[0].value, 8.0);
        assert_eq!(outcome.total_discount, 80.0);
    }

    #[tokio::test]
    async fn test_coupon_and_long_term_stack_additively() {
        let store = InMemoryConfigStore::default();
        store.add_discount(coupon("SAVE10", DiscountValueType::Percentage, 10.0));
        store.add_discount(long_term(7, 5.0));
        let engine = engine_with(store, 0);

        let outcome = engine
            .compute(2000.0, 10, Some("SAVE10"), Uuid::new_v4(), VehicleType::Car)
            .await
            .unwrap();
        assert_eq!(outcome.discounts.len(), 2);
        // 10% coupon + 5% long-term, both against the same gross
        assert_eq!(outcome.total_discount, 200.0 + 100.0);
    }

    #[tokio::test]
    async fn test_no_coupon_skips_straight_to_long_term() {
        let engine = engine_with(InMemoryConfigStore::default(), 0);

        let outcome = engine
            .compute(1000.0, 3, None, Uuid::new_v4(), VehicleType::Car)
            .await
            .unwrap();
        assert!(outcome.discounts.is_empty());
        assert_eq!(outcome.total_discount, 0.0);
    }
}
