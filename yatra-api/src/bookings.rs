use axum::{
    extract::{Json, Path, State},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use yatra_core::CreateOutcome;
use yatra_domain::{Booking, BookingStatus, CreateBookingRequest, PriceBreakdown, RefundDecision};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct BookingResponse {
    booking_id: Uuid,
    status: String,
    price: PriceBreakdown,
}

#[derive(Debug, Serialize)]
struct CancellationResponse {
    booking_id: Uuid,
    status: String,
    refund: RefundDecision,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings/quote", post(quote_booking))
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
}

/// Price preview; nothing is persisted and no coupon use is consumed
async fn quote_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<PriceBreakdown>, AppError> {
    let price = state
        .orchestrator
        .price_booking(&req)
        .await
        .map_err(AppError::from_pricing)?;

    Ok(Json(price))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    // 1. Price the request; a discount rejection aborts the booking
    let price = state
        .orchestrator
        .price_booking(&req)
        .await
        .map_err(AppError::from_pricing)?;

    // 2. Persist. There is no separate payment step, so the booking is
    // confirmed immediately.
    let mut booking = Booking::new(&req, price);
    booking.status = BookingStatus::Confirmed;

    match state
        .bookings
        .create_booking(&booking)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
    {
        CreateOutcome::Created => {}
        // Passed the engine's pre-check but lost the commit-time race
        CreateOutcome::CouponExhausted => {
            return Err(AppError::ConflictError(
                "This coupon has reached its usage limit.".to_string(),
            ));
        }
    }

    info!("Booking confirmed: {}", booking.id);

    Ok(Json(BookingResponse {
        booking_id: booking.id,
        status: booking.status.to_string(),
        price: booking.price,
    }))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .bookings
        .get_booking(id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", id)))?;

    Ok(Json(booking))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancellationResponse>, AppError> {
    // 1. Load and validate
    let booking = state
        .bookings
        .get_booking(id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", id)))?;

    if booking.status == BookingStatus::Cancelled {
        return Err(AppError::ConflictError(
            "Booking is already cancelled.".to_string(),
        ));
    }

    // 2. Refund tier from the notice period, written onto the booking
    let refund = state
        .refunds
        .compute(booking.start_date, booking.price.total_price);

    state
        .bookings
        .cancel_booking(id, &refund)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    info!(
        booking_id = %id,
        refund_percentage = refund.refund_percentage,
        "Booking cancelled"
    );

    Ok(Json(CancellationResponse {
        booking_id: id,
        status: BookingStatus::Cancelled.to_string(),
        refund,
    }))
}
