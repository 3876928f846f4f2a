pub mod orchestrator;

pub use orchestrator::BookingPriceOrchestrator;
