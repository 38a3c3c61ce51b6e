//! Turns raw day/time labels into absolute SAST instants.
//!
//! Labels carry no year, so the year starts at the reference instant's year and is
//! bumped each time the month token changes to `Jan`. The first entry is compared
//! against an empty previous token, so a schedule whose first label is already a
//! January date rolls over straight away, even when the reference instant is itself
//! in January.
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone};

use crate::partial::Partial;
use crate::types::{sast, RawEntry, TimeRange, SAST_ABBREV};

const JANUARY: &str = "Jan";
const TIME_SEPARATOR: &str = " - ";
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
/// Layout of the stamp after the `"<Weekday>, "` prefix has been split off.
const STAMP_LAYOUT: &str = "%d %b %Y %H:%M SAST";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("entry {index}: malformed time label {label:?}, expected \"HH:MM - HH:MM\"")]
    MalformedTimeLabel { index: usize, label: String },
    #[error("entry {index}: cannot parse {stamp:?}: {reason}")]
    TimestampParse {
        index: usize,
        stamp: String,
        reason: String,
    },
}

/// Resolve every entry to a [`TimeRange`], one output per input, in input order.
///
/// Entries that fail keep their slot with [`TimeRange::unresolved_instant`] standing
/// in for the unparseable end(s).
pub fn normalize<Tz: TimeZone>(
    entries: &[RawEntry],
    reference_now: &DateTime<Tz>,
) -> Partial<Vec<TimeRange>, NormalizeError> {
    let mut year = reference_now.year();
    let mut previous_month = "";
    let mut ranges = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let month = month_token(entry.date_label());
        if !month.is_empty() && month != previous_month && month == JANUARY {
            year += 1;
            tracing::trace!(index, year, "schedule.normalize.year_rollover");
        }
        previous_month = month;

        let parts: Vec<&str> = entry.time_label().split(TIME_SEPARATOR).collect();
        let [lower, upper] = parts.as_slice() else {
            errors.push(NormalizeError::MalformedTimeLabel {
                index,
                label: entry.time_label().to_string(),
            });
            ranges.push(TimeRange::unresolved());
            continue;
        };

        let start = resolve(index, entry.date_label(), year, lower, &mut errors);
        let end = resolve(index, entry.date_label(), year, upper, &mut errors);
        ranges.push(TimeRange { start, end });
    }

    if !errors.is_empty() {
        tracing::debug!(
            entries = entries.len(),
            errors = errors.len(),
            "schedule.normalize.partial"
        );
    }
    Partial::new(ranges, errors)
}

/// Trailing three characters of a date label (`"Fri, 29 Oct"` → `"Oct"`).
fn month_token(date_label: &str) -> &str {
    let start = date_label
        .char_indices()
        .rev()
        .nth(2)
        .map_or(0, |(i, _)| i);
    &date_label[start..]
}

fn resolve(
    index: usize,
    date_label: &str,
    year: i32,
    time: &str,
    errors: &mut Vec<NormalizeError>,
) -> DateTime<FixedOffset> {
    let stamp = format!("{date_label} {year} {time} {SAST_ABBREV}");
    match parse_stamp(&stamp) {
        Ok(instant) => instant,
        Err(reason) => {
            errors.push(NormalizeError::TimestampParse {
                index,
                stamp,
                reason,
            });
            TimeRange::unresolved_instant()
        }
    }
}

/// Parse `"<Weekday>, <DD> <Mon> <YYYY> <HH>:<MM> SAST"`.
///
/// The weekday must be one of the three-letter names but is not checked against the
/// date. The day of month must have two digits.
fn parse_stamp(stamp: &str) -> Result<DateTime<FixedOffset>, String> {
    let (weekday, rest) = stamp
        .split_once(", ")
        .ok_or_else(|| "missing \"<Weekday>, \" prefix".to_string())?;
    if !WEEKDAYS.contains(&weekday) {
        return Err(format!("unknown weekday {weekday:?}"));
    }
    match rest.as_bytes() {
        [d1, d2, b' ', ..] if d1.is_ascii_digit() && d2.is_ascii_digit() => {}
        _ => return Err(format!("day of month in {rest:?} is not two digits")),
    }
    let naive = NaiveDateTime::parse_from_str(rest, STAMP_LAYOUT).map_err(|e| e.to_string())?;
    sast()
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| "ambiguous local time".to_string())
}
