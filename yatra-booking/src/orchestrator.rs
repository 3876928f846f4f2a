use std::sync::Arc;
use tracing::info;
use yatra_core::{BookingHistory, Clock, PricingConfigStore};
use yatra_domain::{CreateBookingRequest, PriceBreakdown};
use yatra_pricing::{
    DiscountEngine, DriverCostCalculator, PricingError, SeasonalRateLookup,
};

/// Composes the pricing components into one gross→net computation.
///
/// A discount rejection aborts the whole computation: either the full
/// breakdown comes back or nothing does, so a booking is never persisted
/// with a partially applied price.
pub struct BookingPriceOrchestrator {
    seasonal: SeasonalRateLookup,
    driver: DriverCostCalculator,
    discounts: DiscountEngine,
}

impl BookingPriceOrchestrator {
    pub fn new(
        store: Arc<dyn PricingConfigStore>,
        history: Arc<dyn BookingHistory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            seasonal: SeasonalRateLookup::new(store.clone()),
            driver: DriverCostCalculator::new(store.clone()),
            discounts: DiscountEngine::new(store, history, clock),
        }
    }

    pub async fn price_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<PriceBreakdown, PricingError> {
        let range = request.date_range();
        let duration_days = range.duration_days();

        // 1. Vehicle base, adjusted by the seasonal rate
        let seasonal_multiplier = self
            .seasonal
            .resolve_multiplier(&range, request.vehicle_type, &request.region)
            .await?;
        let vehicle_base_amount = request.price_per_day
            * duration_days as f64
            * f64::from(request.number_of_vehicles)
            * seasonal_multiplier;

        // 2. Driver cost, if drivers were requested
        let driver_cost = self
            .driver
            .compute(
                request.tour_type,
                duration_days,
                request.number_of_drivers,
                request.estimated_distance_km,
            )
            .await?;

        let gross_amount = vehicle_base_amount + driver_cost.total;

        // 3. Discounts against the gross; any rejection aborts here
        let outcome = self
            .discounts
            .compute(
                gross_amount,
                duration_days,
                request.coupon_code.as_deref(),
                request.user_id,
                request.vehicle_type,
            )
            .await?;

        // 4. Net totals, clamped so a large discount cannot go negative
        let total_price = (gross_amount - outcome.total_discount).max(0.0);
        let remaining_amount = total_price - request.advance_amount;

        info!(
            user_id = %request.user_id,
            gross_amount,
            discount = outcome.total_discount,
            total_price,
            "Booking priced"
        );

        Ok(PriceBreakdown {
            vehicle_base_amount,
            seasonal_multiplier,
            driver_total_amount: (request.number_of_drivers > 0).then_some(driver_cost.total),
            distance_charge: driver_cost.distance_charge,
            terrain_charge: driver_cost.terrain_charge,
            applied_discounts: outcome.discounts,
            discount_amount: outcome.total_discount,
            gross_amount,
            total_price,
            advance_amount: request.advance_amount,
            remaining_amount,
        })
    }
}
