//! Client for the Eskom loadshedding API.
//!
//! Covers the current stage, municipality and suburb lookups, and per-suburb outage
//! schedules. Schedule pages are HTML; they are handed to `loadshed-schedule` for
//! extraction and date normalization, with the reference instant supplied by the
//! client's [`Clock`].
pub mod client;
pub mod clock;
pub mod types;

pub use client::{Client, ClientBuilder, ClientError, DEFAULT_BASE_URL};
pub use clock::{Clock, FixedClock, SystemClock};
pub use loadshed_schedule::{Partial, Schedule, Stage, TimeRange};
pub use types::{Municipality, OmitEmpty, Province, SearchSuburb, Suburb, SuburbResult};
