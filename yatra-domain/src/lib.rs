pub mod booking;
pub mod config;
pub mod pricing;
pub mod vehicle;

pub use booking::{Booking, BookingStatus, CreateBookingRequest, DateRange};
pub use config::{DiscountRule, DiscountSource, DiscountValueType, DriverRate, SeasonalRate};
pub use pricing::{AppliedDiscount, PriceBreakdown, RefundDecision, RefundPolicy};
pub use vehicle::{TourType, VehicleType};
