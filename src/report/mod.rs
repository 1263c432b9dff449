pub mod availability;
pub mod calendar;
pub mod capacity;
pub mod occupancy;

use std::collections::BTreeSet;

use crate::model::{Course, Slot};

/// Teaching hours of one day, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: u32,
    pub end: u32,
}

impl DayWindow {
    pub fn from_hours(start: u32, end: u32) -> Self {
        DayWindow {
            start: start * 60,
            end: end * 60,
        }
    }

    pub fn minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

impl Default for DayWindow {
    fn default() -> Self {
        DayWindow::from_hours(8, 18)
    }
}

/// Every slot of every course, in parse order.
pub fn all_slots(courses: &[Course]) -> impl Iterator<Item = &Slot> {
    courses.iter().flat_map(|c| c.slots.iter())
}

/// Every room mentioned by at least one slot, sorted.
pub fn known_rooms(courses: &[Course]) -> BTreeSet<&str> {
    all_slots(courses).map(|s| s.room.as_str()).collect()
}

/// `H:MM` rendering of minutes since midnight.
pub fn format_minutes(minutes: u32) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
pub(crate) fn fixture_courses() -> Vec<Course> {
    let text = std::fs::read_to_string("tests/fixtures/edt.cru").unwrap();
    crate::parser::parse(&text).courses
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooms_are_sorted_and_unique() {
        let courses = fixture_courses();
        let rooms: Vec<_> = known_rooms(&courses).into_iter().collect();
        assert_eq!(rooms, vec!["A001", "B101", "B102", "B103", "EXT1", "S104"]);
    }

    #[test]
    fn minutes_format() {
        assert_eq!(format_minutes(480), "8:00");
        assert_eq!(format_minutes(795), "13:15");
        assert_eq!(DayWindow::default().minutes(), 600);
    }
}
