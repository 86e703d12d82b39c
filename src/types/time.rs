use serde::{Deserialize, Serialize};
use std::fmt;

use super::Department;

/// Working day of the week (closed, ordered set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Day {
    pub const ALL: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    pub fn short_name(self) -> &'static str {
        match self {
            Day::Mon => "MON",
            Day::Tue => "TUE",
            Day::Wed => "WED",
            Day::Thu => "THU",
            Day::Fri => "FRI",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// A contiguous time range on one day; minutes are measured from midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub day: Day,
    /// Start minute, inclusive
    pub start: u16,
    /// End minute, exclusive
    pub end: u16,
}

impl Interval {
    pub fn new(day: Day, start: u16, end: u16) -> Self {
        debug_assert!(start < end && end <= 24 * 60);
        Self { day, start, end }
    }

    pub fn duration_min(&self) -> u16 {
        self.end - self.start
    }

    /// Same day and strictly intersecting ranges
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.day == other.day && self.start < other.end && self.end > other.start
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            format_hhmm(self.start),
            format_hhmm(self.end)
        )
    }
}

/// Render minutes-from-midnight as "HH:MM"
pub fn format_hhmm(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse "HH:MM" into minutes-from-midnight
pub fn parse_hhmm(s: &str) -> Option<u16> {
    let (h, m) = s.split_once(':')?;
    let h: u16 = h.parse().ok()?;
    let m: u16 = m.parse().ok()?;
    if m >= 60 || h * 60 + m > 24 * 60 {
        return None;
    }
    Some(h * 60 + m)
}

/// Serde codec for "HH:MM" time-of-day fields in config files
pub mod hhmm {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(minutes: &u16, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*minutes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_hhmm(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time '{s}', expected HH:MM")))
    }
}

/// Break classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Morning,
    Lunch,
    Snack,
}

impl BreakKind {
    /// Snack windows are rendered but never constrain placement
    pub fn blocks_teaching(self) -> bool {
        !matches!(self, BreakKind::Snack)
    }

    pub fn label(self) -> &'static str {
        match self {
            BreakKind::Morning => "Morning Break",
            BreakKind::Lunch => "Lunch Break",
            BreakKind::Snack => "Snacks",
        }
    }
}

/// A recurring daily break window; lunch windows are per-department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakWindow {
    pub kind: BreakKind,
    /// None applies to every department
    #[serde(default)]
    pub department: Option<Department>,
    #[serde(with = "hhmm")]
    pub start: u16,
    #[serde(with = "hhmm")]
    pub end: u16,
}

impl BreakWindow {
    pub fn applies_to(&self, dept: &Department) -> bool {
        self.department.as_ref().map_or(true, |d| d == dept)
    }

    pub fn interval_on(&self, day: Day) -> Interval {
        Interval::new(day, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_requires_same_day() {
        let a = Interval::new(Day::Mon, 540, 630);
        let b = Interval::new(Day::Tue, 540, 630);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Interval::new(Day::Mon, 600, 660)));
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        let a = Interval::new(Day::Wed, 540, 630);
        let b = Interval::new(Day::Wed, 630, 690);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_hhmm_round_trip() {
        assert_eq!(parse_hhmm("09:00"), Some(540));
        assert_eq!(parse_hhmm("19:30"), Some(1170));
        assert_eq!(parse_hhmm("9:75"), None);
        assert_eq!(format_hhmm(1170), "19:30");
    }

    #[test]
    fn test_break_window_scoping() {
        let lunch = BreakWindow {
            kind: BreakKind::Lunch,
            department: Some(Department::from("CSE")),
            start: 780,
            end: 870,
        };
        assert!(lunch.applies_to(&Department::from("CSE")));
        assert!(!lunch.applies_to(&Department::from("ECE")));
        assert!(!BreakKind::Snack.blocks_teaching());
    }
}
