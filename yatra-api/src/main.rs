use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yatra_api::{app, AppState};
use yatra_booking::BookingPriceOrchestrator;
use yatra_core::{Clock, SystemClock};
use yatra_pricing::RefundCalculator;
use yatra_store::{DbClient, PostgresBookingStore, PostgresPricingConfigStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yatra_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = yatra_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Yatra API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let config_store = Arc::new(PostgresPricingConfigStore::new(db.pool.clone()));
    let booking_store = Arc::new(PostgresBookingStore::new(db.pool.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let orchestrator = Arc::new(BookingPriceOrchestrator::new(
        config_store,
        booking_store.clone(),
        clock.clone(),
    ));

    let state = AppState {
        bookings: booking_store,
        orchestrator,
        refunds: Arc::new(RefundCalculator::new(clock)),
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
