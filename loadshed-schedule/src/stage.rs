//! Loadshedding stages and the status-code lookup table.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Loadshedding severity.
///
/// `-1` is unknown, `0` means no loadshedding, `1..=8` are the severity levels.
/// Arbitrary values can be constructed (callers may ask for any stage) and are then
/// checked with [`Stage::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stage(i32);

/// Status endpoint code → stage. The endpoint reports stages offset by one.
pub const STATUS_CODES: [(i32, Stage); 10] = [
    (-1, Stage(-1)),
    (1, Stage(0)),
    (2, Stage(1)),
    (3, Stage(2)),
    (4, Stage(3)),
    (5, Stage(4)),
    (6, Stage(5)),
    (7, Stage(6)),
    (8, Stage(7)),
    (9, Stage(8)),
];

impl Stage {
    pub const UNKNOWN: Stage = Stage(-1);
    pub const NONE: Stage = Stage(0);

    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    /// Map a raw status endpoint code to a stage, `None` for codes outside the table.
    pub fn from_status_code(code: i32) -> Option<Stage> {
        STATUS_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, stage)| *stage)
    }

    pub fn is_valid(self) -> bool {
        STATUS_CODES.iter().any(|(_, stage)| *stage == self)
    }

    /// Only real severity levels have a published schedule.
    pub fn is_schedulable(self) -> bool {
        self.is_valid() && self.0 >= 1
    }

    pub fn name(self) -> String {
        match self.0 {
            -1 => "Unknown".to_string(),
            0 => "No Loadshedding".to_string(),
            n => format!("Stage {n}"),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Stage {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i32>().map(Stage)
    }
}

impl From<i32> for Stage {
    fn from(value: i32) -> Self {
        Stage(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(Stage::from_status_code(-1).unwrap().name(), "Unknown");
        assert_eq!(Stage::from_status_code(1).unwrap().name(), "No Loadshedding");
        assert_eq!(Stage::from_status_code(8).unwrap().name(), "Stage 7");
        assert_eq!(Stage::new(4).to_string(), "Stage 4");
    }

    #[test]
    fn status_codes_are_offset_by_one() {
        for code in 1..=9 {
            assert_eq!(Stage::from_status_code(code), Some(Stage::new(code - 1)));
        }
        assert_eq!(Stage::from_status_code(-1), Some(Stage::UNKNOWN));
        assert_eq!(Stage::from_status_code(0), None);
        assert_eq!(Stage::from_status_code(10), None);
    }

    #[test]
    fn validity_is_table_membership() {
        assert!(Stage::new(8).is_valid());
        assert!(Stage::UNKNOWN.is_valid());
        assert!(Stage::NONE.is_valid());
        assert!(!Stage::new(9).is_valid());
        assert!(!Stage::new(-2).is_valid());
    }

    #[test]
    fn only_severity_levels_are_schedulable() {
        assert!(!Stage::UNKNOWN.is_schedulable());
        assert!(!Stage::NONE.is_schedulable());
        assert!(Stage::new(1).is_schedulable());
        assert!(Stage::new(8).is_schedulable());
        assert!(!Stage::new(9).is_schedulable());
    }

    #[test]
    fn parses_and_serializes_as_integer() {
        let stage: Stage = " 3 ".parse().unwrap();
        assert_eq!(stage, Stage::new(3));
        assert_eq!(serde_json::to_string(&stage).unwrap(), "3");
        assert!("three".parse::<Stage>().is_err());
    }
}
