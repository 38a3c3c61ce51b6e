//! Day-block extraction from the schedule page.
//!
//! The page is a list of `div.scheduleDay` blocks, each holding a `div.dayMonth` with
//! the date label and a link whose text is the time window. Blocks the site has not
//! populated yet lack one of those children and are skipped without complaint.
use crate::html::{Document, Node, QueryError};
use crate::partial::Partial;
use crate::types::RawEntry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("locating day blocks: {0}")]
    Blocks(QueryError),
    #[error("day block {block}: {source}")]
    Structural {
        block: usize,
        #[source]
        source: QueryError,
    },
}

/// Markers identifying the parts of a day block.
#[derive(Debug, Clone)]
pub struct Extractor {
    pub day_tag: String,
    pub day_class: String,
    pub date_tag: String,
    pub date_class: String,
    pub time_tag: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            day_tag: "div".into(),
            day_class: "scheduleDay".into(),
            date_tag: "div".into(),
            date_class: "dayMonth".into(),
            time_tag: "a".into(),
        }
    }
}

/// Extract with the markers used by the live schedule page.
pub fn extract(html: &[u8]) -> Partial<Vec<RawEntry>, ExtractError> {
    Extractor::default().extract(html)
}

impl Extractor {
    pub fn extract(&self, html: &[u8]) -> Partial<Vec<RawEntry>, ExtractError> {
        let document = Document::parse(html);
        let days = match document.find_all(&self.day_tag, &self.day_class) {
            Ok(days) => days,
            Err(e) => return Partial::new(Vec::new(), vec![ExtractError::Blocks(e)]),
        };

        let mut entries = Vec::with_capacity(days.len());
        let mut errors = Vec::new();

        for (block, day) in days.iter().enumerate() {
            match self.extract_day(day) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {
                    tracing::trace!(block, "schedule.extract.skip_unpopulated");
                }
                Err(source) => errors.push(ExtractError::Structural { block, source }),
            }
        }

        tracing::debug!(
            blocks = days.len(),
            entries = entries.len(),
            errors = errors.len(),
            "schedule.extract.done"
        );
        Partial::new(entries, errors)
    }

    fn extract_day(&self, day: &Node<'_>) -> Result<Option<RawEntry>, QueryError> {
        let Some(date) = day.find_first(&self.date_tag, Some(&self.date_class))? else {
            return Ok(None);
        };
        let Some(time) = day.find_first(&self.time_tag, None)? else {
            return Ok(None);
        };
        Ok(Some(RawEntry::new(
            date.text().trim(),
            time.text().trim(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, time: &str) -> String {
        format!(
            r#"<div class="scheduleDay">
                 <div class="dayMonth">
                   {date}
                 </div>
                 <a href="javascript:void(0);" class="scheduleTime">
                   {time}
                 </a>
               </div>"#
        )
    }

    #[test]
    fn extracts_trimmed_pairs_in_order() {
        let html = format!(
            "<div>{}{}</div>",
            day("Fri, 29 Oct", "04:00 - 06:30"),
            day("Sat, 30 Oct", "12:00 - 14:30")
        );
        let out = extract(html.as_bytes());
        assert!(out.is_clean());
        assert_eq!(
            out.value,
            vec![
                RawEntry::new("Fri, 29 Oct", "04:00 - 06:30"),
                RawEntry::new("Sat, 30 Oct", "12:00 - 14:30"),
            ]
        );
    }

    #[test]
    fn block_without_date_is_skipped_silently() {
        let html = format!(
            r#"<div class="scheduleDay"><a>00:00 - 02:30</a></div>{}"#,
            day("Sun, 31 Oct", "20:00 - 22:30")
        );
        let out = extract(html.as_bytes());
        assert!(out.is_clean());
        assert_eq!(out.value, vec![RawEntry::new("Sun, 31 Oct", "20:00 - 22:30")]);
    }

    #[test]
    fn block_without_link_is_skipped_silently() {
        let html = r#"<div class="scheduleDay"><div class="dayMonth">Mon, 01 Nov</div></div>"#;
        let out = extract(html.as_bytes());
        assert!(out.is_clean());
        assert!(out.value.is_empty());
    }

    #[test]
    fn document_without_blocks_yields_nothing() {
        let out = extract(b"<html><body><p>Nothing scheduled</p></body></html>");
        assert!(out.is_clean());
        assert!(out.value.is_empty());
    }

    #[test]
    fn structural_failures_are_collected_per_block() {
        let extractor = Extractor {
            date_class: "day Month".into(),
            ..Extractor::default()
        };
        let html = format!(
            "{}{}",
            day("Fri, 29 Oct", "04:00 - 06:30"),
            day("Sat, 30 Oct", "12:00 - 14:30")
        );
        let out = extractor.extract(html.as_bytes());
        assert!(out.value.is_empty());
        assert_eq!(out.errors.len(), 2);
        assert_eq!(
            out.combined().unwrap().to_string(),
            "day block 0: invalid class name \"day Month\"; day block 1: invalid class name \"day Month\""
        );
    }

    #[test]
    fn invalid_block_marker_is_reported_once() {
        let extractor = Extractor {
            day_tag: "".into(),
            ..Extractor::default()
        };
        let out = extractor.extract(day("Fri, 29 Oct", "04:00 - 06:30").as_bytes());
        assert!(out.value.is_empty());
        assert_eq!(out.errors, vec![ExtractError::Blocks(QueryError::InvalidTag(String::new()))]);
    }
}
