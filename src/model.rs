use chrono::Weekday;
use serde::Serialize;

/// Marker that opens a course header line (`+AP03`).
pub const COURSE_MARKER: char = '+';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub name: String,
    pub slots: Vec<Slot>,
}

impl Course {
    pub fn new(name: impl Into<String>) -> Self {
        Course {
            name: name.into(),
            slots: Vec::new(),
        }
    }

    /// Course name without the leading `+`.
    pub fn code(&self) -> &str {
        self.name.strip_prefix(COURSE_MARKER).unwrap_or(&self.name)
    }

    /// True if a slot already claims the same room on the same day and time range.
    pub fn has_slot_at(&self, day: &str, time_range: &str, room: &str) -> bool {
        self.slots
            .iter()
            .any(|s| s.day == day && s.time_range == time_range && s.room == room)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub session_type: String,
    pub capacity: u32,
    pub day: String,
    pub time_range: String,
    pub group: String,
    pub room: String,
}

impl Slot {
    /// Start and end of the slot in minutes since midnight.
    pub fn minutes(&self) -> Option<(u32, u32)> {
        parse_time_range(&self.time_range)
    }

    pub fn weekday(&self) -> Option<Weekday> {
        weekday_from_code(&self.day)
    }
}

/// Parse `H:MM-H:MM` into minutes since midnight.
pub fn parse_time_range(range: &str) -> Option<(u32, u32)> {
    let (start, end) = range.split_once('-')?;
    Some((parse_clock(start)?, parse_clock(end)?))
}

/// Parse `H:MM` or `HH:MM` between 00:00 and 23:59 into minutes since midnight.
pub fn parse_clock(s: &str) -> Option<u32> {
    let (h, m) = split_clock(s)?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

/// Hour and minute fields of `H:MM` / `HH:MM`, not range-checked.
pub fn split_clock(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.trim().split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((h.parse().ok()?, m.parse().ok()?))
}

/// Teaching days in week order, as written in CRU files.
pub const WEEK_DAYS: &[&str] = &["L", "MA", "ME", "J", "V"];

pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code {
        "L" => Some(Weekday::Mon),
        "MA" => Some(Weekday::Tue),
        "ME" => Some(Weekday::Wed),
        "J" => Some(Weekday::Thu),
        "V" => Some(Weekday::Fri),
        "S" => Some(Weekday::Sat),
        "D" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn day_label(code: &str) -> &str {
    match code {
        "L" => "Monday",
        "MA" => "Tuesday",
        "ME" => "Wednesday",
        "J" => "Thursday",
        "V" => "Friday",
        "S" => "Saturday",
        "D" => "Sunday",
        other => other,
    }
}
