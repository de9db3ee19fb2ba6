//! Recurrence expansion -- turns a [`RecurrenceSpec`] into concrete instances.
//!
//! Daily rules step one day at a time from the start date. Weekly rules first
//! align the start date forward onto the requested weekday, then step seven days.
//! Every instance keeps the spec's time of day and is tagged against the view
//! window supplied to the call.

use chrono::Days;
use tracing::{debug, warn};

use crate::instance::Instance;
use crate::spec::RecurrenceSpec;
use crate::window::{is_in_window, ViewWindow};

/// Expand `spec` into its instances, each tagged against `window`.
///
/// Returns an empty list when the spec has no start date yet, or when weekly
/// alignment would leave chrono's calendar range. Otherwise returns
/// [`RecurrenceSpec::effective_count`] instances in strictly ascending order.
/// The list only comes up short if a date would leave chrono's calendar range.
pub fn generate(spec: &RecurrenceSpec, window: &ViewWindow) -> Vec<Instance> {
    if spec.start_date.is_none() {
        debug!("no start date; nothing to generate");
        return Vec::new();
    }
    let Some(first) = spec.aligned_start() else {
        warn!(start = ?spec.start_date, "weekly alignment ran past the calendar range");
        return Vec::new();
    };

    let count = spec.effective_count();
    if count != spec.count {
        warn!(
            requested = spec.count,
            effective = count,
            "instance count clamped"
        );
    }

    let stride = spec.pattern.stride_days();
    let mut instances = Vec::with_capacity(count as usize);

    for i in 0..u64::from(count) {
        let Some(date) = first.checked_add_days(Days::new(stride * i)) else {
            warn!(generated = instances.len(), "recurrence ran past the calendar range");
            break;
        };
        let instant = date.and_time(spec.start_time);
        instances.push(Instance {
            date,
            time: spec.start_time,
            in_window: is_in_window(instant, window),
        });
    }

    debug!(
        pattern = %spec.pattern,
        first = %first,
        generated = instances.len(),
        "generated instances"
    );
    instances
}

/// Expand `spec` with no window, so every instance is tagged visible.
pub fn generate_all(spec: &RecurrenceSpec) -> Vec<Instance> {
    generate(spec, &ViewWindow::unbounded())
}
