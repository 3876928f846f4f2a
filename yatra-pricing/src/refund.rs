use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use yatra_core::Clock;
use yatra_domain::{RefundDecision, RefundPolicy};

/// Maps cancellation notice to a refund tier:
/// 7+ days → 90%, 3–6 days → 50%, 1–2 days → 25%, otherwise nothing.
pub struct RefundCalculator {
    clock: Arc<dyn Clock>,
}

impl RefundCalculator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Pure in the injected clock: identical inputs yield identical output.
    /// Cut points compare the exact lead duration, so exactly 7 days gets
    /// 90% while 6 days 23 hours falls to 50%.
    pub fn compute(&self, start_date: DateTime<Utc>, total_price: f64) -> RefundDecision {
        let lead = start_date - self.clock.now();

        let (refund_percentage, policy) = if lead >= Duration::days(7) {
            (90, RefundPolicy::Cancel7DaysBefore)
        } else if lead >= Duration::days(3) {
            (50, RefundPolicy::Cancel3To6Days)
        } else if lead >= Duration::days(1) {
            (25, RefundPolicy::Cancel1To2Days)
        } else {
            (0, RefundPolicy::NoRefund)
        };

        let refund_amount = (total_price * f64::from(refund_percentage) / 100.0).max(0.0);
        let notice_days = lead.num_days().max(0);
        let reason = match policy {
            RefundPolicy::NoRefund => {
                "Cancelled less than 1 day before start: no refund".to_string()
            }
            _ => format!(
                "Cancelled {} day(s) before start: {}% refund",
                notice_days, refund_percentage
            ),
        };

        RefundDecision {
            refund_percentage,
            refund_amount,
            reason,
            policy,
        }
    }
}
