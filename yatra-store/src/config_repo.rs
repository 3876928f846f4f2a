use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use yatra_core::{PricingConfigStore, StoreError};
use yatra_domain::{
    DiscountRule, DiscountSource, DiscountValueType, DriverRate, SeasonalRate, TourType,
    VehicleType,
};

pub struct PostgresPricingConfigStore {
    pub pool: PgPool,
}

impl PostgresPricingConfigStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn vehicle_types_from_row(row: &PgRow) -> Result<Vec<VehicleType>, StoreError> {
    let raw: Vec<String> = row.try_get("vehicle_types")?;
    // Unknown tags are skipped rather than failing the whole lookup
    Ok(raw.iter().filter_map(|s| s.parse().ok()).collect())
}

fn seasonal_from_row(row: &PgRow) -> Result<SeasonalRate, StoreError> {
    Ok(SeasonalRate {
        id: row.try_get("id")?,
        name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
        price_multiplier: row.try_get("price_multiplier")?,
        valid_from: row.try_get("valid_from")?,
        valid_until: row.try_get("valid_until")?,
        vehicle_types: vehicle_types_from_row(row)?,
        regions: row.try_get("regions")?,
        priority: row.try_get("priority")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn driver_from_row(row: &PgRow) -> Result<DriverRate, StoreError> {
    let tour_type: Option<String> = row.try_get("tour_type")?;
    Ok(DriverRate {
        id: row.try_get("id")?,
        tour_type: tour_type.and_then(|s| s.parse::<TourType>().ok()),
        daily_rate: row.try_get("daily_rate")?,
        price_per_km: row.try_get("price_per_km")?,
        terrain_multiplier: row.try_get("terrain_multiplier")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn discount_from_row(row: &PgRow) -> Result<DiscountRule, StoreError> {
    let source: String = row.try_get("discount_source")?;
    let source = match source.as_str() {
        "LONG_TERM" => DiscountSource::LongTerm,
        _ => DiscountSource::Coupon,
    };
    let value_type: String = row.try_get("value_type")?;
    let value_type = match value_type.as_str() {
        "FIXED" => DiscountValueType::Fixed,
        _ => DiscountValueType::Percentage,
    };

    Ok(DiscountRule {
        id: row.try_get("id")?,
        code: row.try_get("code")?,
        source,
        value_type,
        value: row.try_get("discount_value")?,
        max_discount: row.try_get("max_discount")?,
        min_booking_amount: row.try_get("min_booking_amount")?,
        min_days: row.try_get("min_days")?,
        usage_limit: row.try_get("usage_limit")?,
        usage_count: row.try_get("usage_count")?,
        per_user_limit: row.try_get("per_user_limit")?,
        vehicle_types: vehicle_types_from_row(row)?,
        valid_from: row.try_get("valid_from")?,
        valid_until: row.try_get("valid_until")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

const SEASONAL_COLUMNS: &str = "id, name, price_multiplier, priority, vehicle_types, regions, \
     valid_from, valid_until, is_active, created_at";

const DRIVER_COLUMNS: &str =
    "id, tour_type, daily_rate, price_per_km, terrain_multiplier, is_active, created_at";

const DISCOUNT_COLUMNS: &str = "id, code, discount_source, value_type, discount_value, \
     max_discount, min_booking_amount, min_days, usage_limit, usage_count, per_user_limit, \
     vehicle_types, valid_from, valid_until, is_active, created_at";

#[async_trait]
impl PricingConfigStore for PostgresPricingConfigStore {
    async fn active_seasonal_rates(&self) -> Result<Vec<SeasonalRate>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM pricing_configs \
             WHERE kind = 'SEASONAL' AND is_active \
             ORDER BY priority DESC, created_at ASC",
            SEASONAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(seasonal_from_row).collect()
    }

    async fn active_driver_rate(
        &self,
        tour_type: Option<TourType>,
    ) -> Result<Option<DriverRate>, StoreError> {
        // Exact tour-type match beats the generic (NULL tour_type) rate
        let row = sqlx::query(&format!(
            "SELECT {} FROM pricing_configs \
             WHERE kind = 'DRIVER' AND is_active \
               AND (tour_type = $1 OR tour_type IS NULL) \
             ORDER BY (tour_type IS NOT NULL) DESC, created_at ASC \
             LIMIT 1",
            DRIVER_COLUMNS
        ))
        .bind(tour_type.map(|t| t.to_string()))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(driver_from_row).transpose()
    }

    async fn find_coupon(&self, code: &str) -> Result<Option<DiscountRule>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM pricing_configs \
             WHERE kind = 'DISCOUNT' AND discount_source = 'COUPON' \
               AND is_active AND code = $1",
            DISCOUNT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(discount_from_row).transpose()
    }

    async fn active_long_term_discounts(&self) -> Result<Vec<DiscountRule>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM pricing_configs \
             WHERE kind = 'DISCOUNT' AND discount_source = 'LONG_TERM' AND is_active \
             ORDER BY min_days DESC NULLS LAST",
            DISCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(discount_from_row).collect()
    }
}
