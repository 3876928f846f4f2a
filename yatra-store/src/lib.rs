pub mod app_config;
pub mod booking_repo;
pub mod config_repo;
pub mod database;
pub mod memory;

pub use booking_repo::PostgresBookingStore;
pub use config_repo::PostgresPricingConfigStore;
pub use database::DbClient;
