//! Metrics collection.
//!
//! # Metrics
//! - `proverbs_operations_total` (counter): session operations by name, outcome
//! - `proverbs_errors_total` (counter): surfaced errors by kind
//! - `proverbs_entries` (gauge): entries held after the last refresh

/// Record a finished session operation.
pub fn record_operation(operation: &'static str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!(
        "proverbs_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record an error surfaced to the user.
pub fn record_error(kind: &'static str) {
    metrics::counter!("proverbs_errors_total", "kind" => kind).increment(1);
}

/// Record the number of entries after a refresh.
pub fn record_entries(count: usize) {
    metrics::gauge!("proverbs_entries").set(count as f64);
}
