use crate::error::PricingError;
use serde::Serialize;
use std::sync::Arc;
use yatra_core::PricingConfigStore;
use yatra_domain::TourType;

/// Fallback daily driver rate, NPR, used when no driver config exists.
/// Missing config must never block a booking, it only disables surcharges.
pub const DEFAULT_DAILY_DRIVER_RATE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverCost {
    pub daily_rate: f64,
    pub base_amount: f64,
    pub distance_charge: f64,
    pub terrain_charge: f64,
    pub total: f64,
}

impl DriverCost {
    pub fn zero() -> Self {
        Self {
            daily_rate: 0.0,
            base_amount: 0.0,
            distance_charge: 0.0,
            terrain_charge: 0.0,
            total: 0.0,
        }
    }
}

/// Computes the cost of driver service for a rental
pub struct DriverCostCalculator {
    store: Arc<dyn PricingConfigStore>,
}

impl DriverCostCalculator {
    pub fn new(store: Arc<dyn PricingConfigStore>) -> Self {
        Self { store }
    }

    pub async fn compute(
        &self,
        tour_type: Option<TourType>,
        duration_days: i64,
        number_of_drivers: u32,
        estimated_distance_km: Option<f64>,
    ) -> Result<DriverCost, PricingError> {
        if number_of_drivers == 0 {
            return Ok(DriverCost::zero());
        }

        let config = self.store.active_driver_rate(tour_type).await?;
        let (daily_rate, price_per_km, terrain_multiplier) = match &config {
            Some(c) => (c.daily_rate, c.price_per_km, c.terrain_multiplier),
            None => (DEFAULT_DAILY_DRIVER_RATE, None, None),
        };

        let days = duration_days as f64;
        let drivers = number_of_drivers as f64;
        let base_amount = daily_rate * days * drivers;

        let distance_charge = match (estimated_distance_km, price_per_km) {
            (Some(km), Some(per_km)) => km * per_km,
            _ => 0.0,
        };

        // Surcharge only for difficult-terrain routes with a configured
        // multiplier above 1
        let terrain_charge = match (tour_type, terrain_multiplier) {
            (Some(tt), Some(tm)) if tt.is_difficult_terrain() && tm > 1.0 => {
                daily_rate * (tm - 1.0) * days * drivers
            }
            _ => 0.0,
        };

        Ok(DriverCost {
            daily_rate,
            base_amount,
            distance_charge,
            terrain_charge,
            total: base_amount + distance_charge + terrain_charge,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use yatra_domain::DriverRate;
    use yatra_store::memory::InMemoryConfigStore;

    fn driver_rate(tour_type: Option<TourType>) -> DriverRate {
        DriverRate {
            id: Uuid::new_v4(),
            tour_type,
            daily_rate: 1500.0,
            price_per_km: Some(20.0),
            terrain_multiplier: Some(1.3),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_zero_drivers_costs_nothing() {
        let store = InMemoryConfigStore::default();
        store.add_driver(driver_rate(None));
        let calc = DriverCostCalculator::new(Arc::new(store));

        let cost = calc
            .compute(Some(TourType::Mountain), 5, 0, Some(300.0))
            .await
            .unwrap();
        assert_eq!(cost, DriverCost::zero());
    }

    #[tokio::test]
    async fn test_missing_config_falls_back_to_default_rate() {
        let calc = DriverCostCalculator::new(Arc::new(InMemoryConfigStore::default()));

        let cost = calc
            .compute(Some(TourType::Mountain), 3, 2, Some(100.0))
            .await
            .unwrap();
        assert_eq!(cost.daily_rate, DEFAULT_DAILY_DRIVER_RATE);
        assert_eq!(cost.base_amount, 1000.0 * 3.0 * 2.0);
        // No configured per-km rate and no terrain multiplier: surcharges off
        assert_eq!(cost.distance_charge, 0.0);
        assert_eq!(cost.terrain_charge, 0.0);
        assert_eq!(cost.total, 6000.0);
    }

    #[tokio::test]
    async fn test_distance_charge_needs_both_inputs() {
        let store = InMemoryConfigStore::default();
        store.add_driver(driver_rate(None));
        let calc = DriverCostCalculator::new(Arc::new(store));

        let with_distance = calc.compute(None, 2, 1, Some(150.0)).await.unwrap();
        assert_eq!(with_distance.distance_charge, 150.0 * 20.0);

        let without_distance = calc.compute(None, 2, 1, None).await.unwrap();
        assert_eq!(without_distance.distance_charge, 0.0);
    }

    #[tokio::test]
    async fn test_terrain_surcharge_only_on_mountain_routes() {
        let store = InMemoryConfigStore::default();
        store.add_driver(driver_rate(Some(TourType::Mountain)));
        store.add_driver(driver_rate(Some(TourType::City)));
        let calc = DriverCostCalculator::new(Arc::new(store));

        let mountain = calc
            .compute(Some(TourType::Mountain), 4, 2, None)
            .await
            .unwrap();
        // 1500 * (1.3 - 1) * 4 days * 2 drivers
        assert!((mountain.terrain_charge - 3600.0).abs() < 1e-9);
        assert!((mountain.total - (1500.0 * 4.0 * 2.0 + 3600.0)).abs() < 1e-9);

        let city = calc.compute(Some(TourType::City), 4, 2, None).await.unwrap();
        assert_eq!(city.terrain_charge, 0.0);
    }

    #[tokio::test]
    async fn test_terrain_multiplier_at_or_below_one_is_ignored() {
        let store = InMemoryConfigStore::default();
        let mut rate = driver_rate(Some(TourType::Mountain));
        rate.terrain_multiplier = Some(1.0);
        store.add_driver(rate);
        let calc = DriverCostCalculator::new(Arc::new(store));

        let cost = calc
            .compute(Some(TourType::Mountain), 4, 1, None)
            .await
            .unwrap();
        assert_eq!(cost.terrain_charge, 0.0);
    }
}
