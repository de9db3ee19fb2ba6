//! A single concrete occurrence of a recurring event.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// One generated occurrence: its date, its time, and whether it falls inside
/// the view window it was last classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub in_window: bool,
}

impl Instance {
    /// The local date-time this instance occurs at.
    pub fn instant(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Long-form en-US rendering, e.g. `Monday, January 1, 2024 at 09:00 AM`.
    pub fn display(&self) -> String {
        self.instant()
            .format("%A, %B %-d, %Y at %I:%M %p")
            .to_string()
    }

    /// Same occurrence, re-tagged.
    pub fn with_in_window(self, in_window: bool) -> Self {
        Self { in_window, ..self }
    }
}
