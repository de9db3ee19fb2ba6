//! Caller-side state for an interactive front end.
//!
//! A [`Planner`] owns the current spec, the current window, the last generated
//! list and its in-window view. Changing the window refilters the existing list
//! straight away; changing the spec does nothing until [`Planner::generate`] is
//! called explicitly.

use chrono::{Months, NaiveDate, NaiveTime, Weekday};
use tracing::debug;

use crate::expander;
use crate::instance::Instance;
use crate::spec::{Pattern, RecurrenceSpec, DEFAULT_COUNT};
use crate::window::{filter_by_window, instances_in_window, summarize, ViewWindow, WindowSummary};

#[derive(Debug, Clone)]
pub struct Planner {
    spec: RecurrenceSpec,
    window: ViewWindow,
    instances: Vec<Instance>,
    visible: Vec<Instance>,
}

impl Planner {
    /// Start with `spec` and `window`; nothing is generated yet.
    pub fn new(spec: RecurrenceSpec, window: ViewWindow) -> Self {
        Self {
            spec,
            window,
            instances: Vec::new(),
            visible: Vec::new(),
        }
    }

    /// Initial form state: weekly on Monday at 09:00, ten occurrences starting
    /// `today`, viewed over `today` through one month later.
    pub fn with_defaults(today: NaiveDate) -> Self {
        let spec = RecurrenceSpec::new(
            today,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            Pattern::Weekly(Weekday::Mon),
            DEFAULT_COUNT,
        );
        Self::new(spec, default_window(today))
    }

    pub fn spec(&self) -> &RecurrenceSpec {
        &self.spec
    }

    pub fn window(&self) -> &ViewWindow {
        &self.window
    }

    /// Every instance from the last generation, tagged against the current window.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Only the instances inside the current window.
    pub fn visible(&self) -> &[Instance] {
        &self.visible
    }

    pub fn summary(&self) -> WindowSummary {
        summarize(&self.instances)
    }

    /// Replace the spec. The existing instances stay as they are.
    pub fn set_spec(&mut self, spec: RecurrenceSpec) {
        self.spec = spec;
    }

    /// Replace the window and refilter the existing instances against it.
    pub fn set_window(&mut self, window: ViewWindow) {
        self.window = window;
        self.refilter();
    }

    /// Regenerate from the current spec and window.
    ///
    /// With no start date the previous list is left untouched.
    pub fn generate(&mut self) -> &[Instance] {
        if self.spec.start_date.is_none() {
            debug!("generate requested without a start date");
            return &self.instances;
        }
        self.instances = expander::generate(&self.spec, &self.window);
        self.refilter();
        &self.instances
    }

    fn refilter(&mut self) {
        self.instances = filter_by_window(&self.instances, &self.window);
        self.visible = instances_in_window(&self.instances, &self.window);
    }
}

/// `[today, today + 1 month]`. Month ends clamp (Jan 31 runs to Feb 28/29).
pub fn default_window(today: NaiveDate) -> ViewWindow {
    let to = today.checked_add_months(Months::new(1)).unwrap_or(today);
    ViewWindow::new(today, to)
}
