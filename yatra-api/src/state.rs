use std::sync::Arc;
use yatra_booking::BookingPriceOrchestrator;
use yatra_core::BookingStore;
use yatra_pricing::RefundCalculator;

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingStore>,
    pub orchestrator: Arc<BookingPriceOrchestrator>,
    pub refunds: Arc<RefundCalculator>,
}
