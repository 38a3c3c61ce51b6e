//! Schedule parsing core for the loadshedding API.
//!
//! The schedule endpoint returns an HTML fragment with one block per calendar day.
//! This crate turns that fragment into absolute SAST time ranges in two steps:
//!
//! - [`extract`] walks the markup and pulls a raw `(date, time)` text pair per day block
//! - [`normalize`] rebuilds start/end instants from those labels, inferring the year
//!   from a caller-supplied reference instant
//!
//! Neither step performs I/O or reads the wall clock. Per-item failures never abort a
//! run; they are collected next to the partial result in a [`Partial`].
//!
//! ```
//! use chrono::TimeZone;
//! use loadshed_schedule::{sast, Schedule, Stage};
//!
//! let html = br##"
//! <div class="scheduleDay">
//!   <div class="dayMonth"> Fri, 29 Oct </div>
//!   <a href="#">04:00 - 06:30</a>
//! </div>"##;
//! let now = sast().with_ymd_and_hms(2021, 10, 27, 18, 0, 0).unwrap();
//!
//! let schedule = Schedule::from_html(html, Stage::new(1), &now).unwrap();
//! assert_eq!(schedule.times.len(), 1);
//! assert_eq!(
//!     schedule.times[0].start,
//!     sast().with_ymd_and_hms(2021, 10, 29, 4, 0, 0).unwrap()
//! );
//! ```
pub mod extract;
pub mod html;
pub mod normalize;
pub mod partial;
pub mod stage;
pub mod types;

pub use extract::{extract, ExtractError, Extractor};
pub use normalize::{normalize, NormalizeError};
pub use partial::{CombinedError, Partial};
pub use stage::Stage;
pub use types::{sast, RawEntry, Schedule, TimeRange, SAST_ABBREV};
