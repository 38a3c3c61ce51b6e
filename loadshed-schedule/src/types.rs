use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::extract;
use crate::normalize::normalize;
use crate::partial::CombinedError;
use crate::stage::Stage;

/// Abbreviation the schedule timestamps are parsed with.
pub const SAST_ABBREV: &str = "SAST";
const SAST_OFFSET_SECS: i32 = 2 * 60 * 60;

/// South Africa Standard Time: fixed UTC+2, no daylight saving.
pub fn sast() -> FixedOffset {
    FixedOffset::east_opt(SAST_OFFSET_SECS).expect("UTC+2 is within the valid offset range")
}

/// One day block as it appears on the schedule page, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    date_label: String,
    time_label: String,
}

impl RawEntry {
    pub fn new(date_label: impl Into<String>, time_label: impl Into<String>) -> Self {
        Self {
            date_label: date_label.into(),
            time_label: time_label.into(),
        }
    }

    /// e.g. `"Fri, 29 Oct"`
    pub fn date_label(&self) -> &str {
        &self.date_label
    }

    /// e.g. `"04:00 - 06:30"`
    pub fn time_label(&self) -> &str {
        &self.time_label
    }
}

/// A single outage window.
///
/// `end` is taken verbatim from the page, so a window such as `22:00 - 00:30` ends
/// *before* it starts on the same calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeRange {
    /// Placeholder for an instant that could not be parsed: the Unix epoch in SAST.
    pub fn unresolved_instant() -> DateTime<FixedOffset> {
        DateTime::<Utc>::default().with_timezone(&sast())
    }

    pub fn unresolved() -> Self {
        Self {
            start: Self::unresolved_instant(),
            end: Self::unresolved_instant(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        let unset = Self::unresolved_instant();
        self.start != unset && self.end != unset
    }
}

/// The outage windows for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub stage: Stage,
    pub times: Vec<TimeRange>,
}

impl Schedule {
    /// Extract and normalize a schedule page.
    ///
    /// Strict: any extraction or normalization error fails the whole page, reported
    /// as one combined message.
    pub fn from_html<Tz: TimeZone>(
        html: &[u8],
        stage: Stage,
        now: &DateTime<Tz>,
    ) -> Result<Schedule, CombinedError> {
        let entries = extract(html).into_result()?;
        let times = normalize(&entries, now).into_result()?;
        tracing::debug!(%stage, windows = times.len(), "schedule.parsed");
        Ok(Schedule { stage, times })
    }
}
