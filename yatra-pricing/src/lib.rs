pub mod discount;
pub mod driver;
pub mod error;
pub mod refund;
pub mod seasonal;

pub use discount::{DiscountEngine, DiscountOutcome};
pub use driver::{DriverCost, DriverCostCalculator, DEFAULT_DAILY_DRIVER_RATE};
pub use error::{DiscountError, PricingError};
pub use refund::RefundCalculator;
pub use seasonal::SeasonalRateLookup;
