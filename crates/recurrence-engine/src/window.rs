//! View windows -- inclusive date ranges used to classify instances as visible.
//!
//! A window covers whole days: from 00:00:00 on `from` through 23:59:59 on `to`.
//! A window missing either bound is unconstrained and admits everything. An
//! inverted window (`from` after `to`) is evaluated literally and admits nothing.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RecurrenceError, Result};
use crate::instance::Instance;
use crate::spec::parse_optional_date;

/// Inclusive date range. Either bound may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ViewWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ViewWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// A window with no bounds; every instant is inside it.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse two `YYYY-MM-DD` strings; empty strings leave that bound open.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Ok(Self {
            from: parse_optional_date(from)?,
            to: parse_optional_date(to)?,
        })
    }

    /// `[from 00:00:00, to 23:59:59]`, or `None` when the window is unconstrained.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let (from, to) = (self.from?, self.to?);
        Some((from.and_hms_opt(0, 0, 0)?, to.and_hms_opt(23, 59, 59)?))
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() || self.to.is_none()
    }

    /// True when both bounds are set and `from` is after `to`.
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        is_in_window(instant, self)
    }
}

/// String-typed window as a form supplies it. Empty strings mean "no bound".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawWindow {
    pub from: String,
    pub to: String,
}

impl TryFrom<RawWindow> for ViewWindow {
    type Error = RecurrenceError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        ViewWindow::parse(&raw.from, &raw.to)
    }
}

/// Running tally of a tagged instance list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub total: usize,
    pub in_window: usize,
}

impl WindowSummary {
    pub fn outside_window(&self) -> usize {
        self.total.saturating_sub(self.in_window)
    }
}

/// Whether `instant` falls inside `window`, both ends inclusive.
///
/// Unconstrained windows admit everything. Inverted windows admit nothing.
pub fn is_in_window(instant: NaiveDateTime, window: &ViewWindow) -> bool {
    match window.bounds() {
        None => true,
        Some((start, end)) => start <= instant && instant <= end,
    }
}

/// Re-tag every instance against `window`, keeping the full list.
///
/// Membership is recomputed from each instance's date and time; the incoming
/// `in_window` flags are ignored.
pub fn filter_by_window(instances: &[Instance], window: &ViewWindow) -> Vec<Instance> {
    let tagged: Vec<Instance> = instances
        .iter()
        .map(|instance| instance.with_in_window(is_in_window(instance.instant(), window)))
        .collect();

    debug!(
        total = tagged.len(),
        in_window = tagged.iter().filter(|i| i.in_window).count(),
        inverted = window.is_inverted(),
        "refiltered instances"
    );
    tagged
}

/// Only the instances inside `window`, freshly tagged, in their original order.
pub fn instances_in_window(instances: &[Instance], window: &ViewWindow) -> Vec<Instance> {
    instances
        .iter()
        .filter(|instance| is_in_window(instance.instant(), window))
        .map(|instance| instance.with_in_window(true))
        .collect()
}

/// Count a tagged list by its current `in_window` flags.
pub fn summarize(instances: &[Instance]) -> WindowSummary {
    WindowSummary {
        total: instances.len(),
        in_window: instances.iter().filter(|i| i.in_window).count(),
    }
}
