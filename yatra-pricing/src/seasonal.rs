use crate::error::PricingError;
use std::sync::Arc;
use yatra_core::PricingConfigStore;
use yatra_domain::{DateRange, VehicleType};

/// Multiplier when no seasonal rate covers the rental
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// Resolves the seasonal price multiplier for a rental.
/// Missing configuration never blocks a booking; it degrades to 1.0.
pub struct SeasonalRateLookup {
    store: Arc<dyn PricingConfigStore>,
}

impl SeasonalRateLookup {
    pub fn new(store: Arc<dyn PricingConfigStore>) -> Self {
        Self { store }
    }

    /// Pick the single applicable rate: active, window overlapping the
    /// rental, scope covering vehicle type and region. Highest priority
    /// wins; ties go to the earliest-created row.
    pub async fn resolve_multiplier(
        &self,
        range: &DateRange,
        vehicle_type: VehicleType,
        region: &str,
    ) -> Result<f64, PricingError> {
        let rates = self.store.active_seasonal_rates().await?;

        let mut candidates: Vec<_> = rates
            .into_iter()
            .filter(|r| {
                r.overlaps(range) && r.covers_vehicle(vehicle_type) && r.covers_region(region)
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.created_at.cmp(&b.created_at))
        });

        match candidates.first() {
            Some(rate) => {
                tracing::debug!(
                    rate = %rate.name,
                    multiplier = rate.price_multiplier,
                    "Seasonal rate applied"
                );
                Ok(rate.price_multiplier)
            }
            None => Ok(NEUTRAL_MULTIPLIER),
        }
    }
}
