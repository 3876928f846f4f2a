pub mod clock;
pub mod repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use repository::{
    BookingHistory, BookingStore, CreateOutcome, PricingConfigStore, StoreError,
};
