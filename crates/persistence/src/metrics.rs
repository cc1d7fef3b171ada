//! Store metrics collection.
//!
//! Provides functions for recording store-related metrics.

use metrics::{gauge, histogram};
use std::time::Instant;

use crate::store::StoreState;

/// Record the duration of a store operation.
pub fn record_operation_duration(operation: &str, duration_secs: f64) {
    histogram!(
        "store_operation_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(duration_secs);
}

/// Record the number of records held by the store.
pub fn record_store_sizes(state: &StoreState) {
    let pending = state.orders.iter().filter(|o| o.is_pending()).count();

    gauge!("store_orders_pending").set(pending as f64);
    gauge!("store_orders_signed").set((state.orders.len() - pending) as f64);
    gauge!("store_templates_total").set(state.templates.len() as f64);
    gauge!("store_admin_sessions").set(state.sessions.len() as f64);
}

/// A helper to time store operations and record metrics.
///
/// Usage:
/// ```ignore
/// let timer = StoreTimer::new("create_pending_order");
/// let result = state.orders.push(order);
/// timer.record();
/// ```
pub struct StoreTimer {
    operation: &'static str,
    start: Instant,
}

impl StoreTimer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        record_operation_duration(self.operation, self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_timer_creation() {
        let timer = StoreTimer::new("find_order_by_id");
        assert_eq!(timer.operation, "find_order_by_id");
        timer.record();
    }

    #[test]
    fn test_record_store_sizes_on_empty_state() {
        record_store_sizes(&StoreState::default());
    }
}
