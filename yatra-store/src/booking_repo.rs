use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;
use yatra_core::{BookingHistory, BookingStore, CreateOutcome, StoreError};
use yatra_domain::{
    Booking, PriceBreakdown, RefundDecision, RefundPolicy, TourType,
};

pub struct PostgresBookingStore {
    pub pool: PgPool,
}

impl PostgresBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn booking_from_row(row: &PgRow) -> Result<Booking, StoreError> {
    let tour_type: Option<String> = row.try_get("tour_type")?;
    let status: String = row.try_get("status")?;
    let vehicle_type: String = row.try_get("vehicle_type")?;

    let applied: serde_json::Value = row.try_get("applied_discounts")?;
    let applied_discounts = serde_json::from_value(applied).unwrap_or_default();

    let refund = match row.try_get::<Option<i32>, _>("refund_percentage")? {
        Some(refund_percentage) => Some(RefundDecision {
            refund_percentage,
            refund_amount: row
                .try_get::<Option<f64>, _>("refund_amount")?
                .unwrap_or(0.0),
            reason: row
                .try_get::<Option<String>, _>("refund_reason")?
                .unwrap_or_default(),
            policy: row
                .try_get::<Option<String>, _>("refund_policy")?
                .and_then(|s| s.parse().ok())
                .unwrap_or(RefundPolicy::NoRefund),
        }),
        None => None,
    };

    Ok(Booking {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        vehicle_type: vehicle_type.parse().map_err(StoreError::from)?,
        region: row.try_get("region")?,
        tour_type: tour_type.and_then(|s| s.parse::<TourType>().ok()),
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        number_of_vehicles: row.try_get::<i32, _>("number_of_vehicles")? as u32,
        number_of_drivers: row.try_get::<i32, _>("number_of_drivers")? as u32,
        estimated_distance_km: row.try_get("estimated_distance_km")?,
        coupon_code: row.try_get("coupon_code")?,
        status: status.parse().map_err(StoreError::from)?,
        price: PriceBreakdown {
            vehicle_base_amount: row.try_get("vehicle_base_amount")?,
            seasonal_multiplier: row.try_get("seasonal_multiplier")?,
            driver_total_amount: row.try_get("driver_total_amount")?,
            distance_charge: row.try_get("distance_charge")?,
            terrain_charge: row.try_get("terrain_charge")?,
            applied_discounts,
            discount_amount: row.try_get("discount_amount")?,
            gross_amount: row.try_get("gross_amount")?,
            total_price: row.try_get("total_price")?,
            advance_amount: row.try_get("advance_amount")?,
            remaining_amount: row.try_get("remaining_amount")?,
        },
        refund,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

const BOOKING_COLUMNS: &str = "id, user_id, vehicle_type, region, tour_type, start_date, \
     end_date, number_of_vehicles, number_of_drivers, estimated_distance_km, coupon_code, \
     status, vehicle_base_amount, seasonal_multiplier, driver_total_amount, distance_charge, \
     terrain_charge, applied_discounts, discount_amount, gross_amount, total_price, \
     advance_amount, remaining_amount, refund_percentage, refund_amount, refund_reason, \
     refund_policy, created_at, updated_at";

#[async_trait]
impl BookingStore for PostgresBookingStore {
    /// Inserts the booking and consumes the coupon counter in one
    /// transaction. The counter is bumped with a conditional update, so two
    /// concurrent bookings cannot both take the last use of a capped coupon.
    async fn create_booking(&self, booking: &Booking) -> Result<CreateOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        if let Some(code) = &booking.coupon_code {
            let updated = sqlx::query(
                "UPDATE pricing_configs \
                 SET usage_count = usage_count + 1 \
                 WHERE kind = 'DISCOUNT' AND code = $1 AND is_active \
                   AND (usage_limit IS NULL OR usage_count < usage_limit)",
            )
            .bind(code)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Lost the race; rolled back on drop, nothing persisted
                tracing::warn!(code, booking_id = %booking.id, "Coupon exhausted at commit");
                return Ok(CreateOutcome::CouponExhausted);
            }
        }

        let applied_discounts = serde_json::to_value(&booking.price.applied_discounts)?;

        sqlx::query(
            "INSERT INTO bookings (id, user_id, vehicle_type, region, tour_type, start_date, \
             end_date, number_of_vehicles, number_of_drivers, estimated_distance_km, \
             coupon_code, status, vehicle_base_amount, seasonal_multiplier, \
             driver_total_amount, distance_charge, terrain_charge, applied_discounts, \
             discount_amount, gross_amount, total_price, advance_amount, remaining_amount, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23, $24, $25)",
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.vehicle_type.to_string())
        .bind(&booking.region)
        .bind(booking.tour_type.map(|t| t.to_string()))
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.number_of_vehicles as i32)
        .bind(booking.number_of_drivers as i32)
        .bind(booking.estimated_distance_km)
        .bind(&booking.coupon_code)
        .bind(booking.status.to_string())
        .bind(booking.price.vehicle_base_amount)
        .bind(booking.price.seasonal_multiplier)
        .bind(booking.price.driver_total_amount)
        .bind(booking.price.distance_charge)
        .bind(booking.price.terrain_charge)
        .bind(applied_discounts)
        .bind(booking.price.discount_amount)
        .bind(booking.price.gross_amount)
        .bind(booking.price.total_price)
        .bind(booking.price.advance_amount)
        .bind(booking.price.remaining_amount)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(CreateOutcome::Created)
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    async fn cancel_booking(&self, id: Uuid, refund: &RefundDecision) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE bookings \
             SET status = 'CANCELLED', refund_percentage = $2, refund_amount = $3, \
                 refund_reason = $4, refund_policy = $5, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(refund.refund_percentage)
        .bind(refund.refund_amount)
        .bind(&refund.reason)
        .bind(refund.policy.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl BookingHistory for PostgresBookingStore {
    async fn count_coupon_uses(&self, user_id: Uuid, code: &str) -> Result<i64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS uses FROM bookings \
             WHERE user_id = $1 AND coupon_code = $2 AND status <> 'CANCELLED'",
        )
        .bind(user_id)
        .bind(code)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get::<i64, _>("uses")?)
    }
}
