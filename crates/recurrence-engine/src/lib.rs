//! # recurrence-engine
//!
//! Deterministic expansion of daily and weekly recurring events into concrete
//! instances, with inclusive view-window classification.
//!
//! The engine is a set of pure functions: the same spec and window always give
//! the same instances, and no state is kept between calls. Callers that need
//! to remember what was generated use [`Planner`].
//!
//! ## Modules
//!
//! - [`spec`] — `RecurrenceSpec`, patterns, and the validated parse step from strings
//! - [`expander`] — spec → ordered list of tagged instances
//! - [`window`] — view windows, membership predicate, refiltering
//! - [`instance`] — the `Instance` record and its long-form rendering
//! - [`planner`] — caller-side state that refilters on window change
//! - [`error`] — Error types

pub mod error;
pub mod expander;
pub mod instance;
pub mod planner;
pub mod spec;
pub mod window;

pub use error::RecurrenceError;
pub use expander::{generate, generate_all};
pub use instance::Instance;
pub use planner::Planner;
pub use spec::{Pattern, RawSpec, RecurrenceSpec, MAX_COUNT};
pub use window::{
    filter_by_window, instances_in_window, is_in_window, summarize, RawWindow, ViewWindow,
    WindowSummary,
};
