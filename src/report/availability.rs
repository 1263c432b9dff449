use anyhow::{bail, Result};
use serde::Serialize;

use crate::model::{split_clock, Course, WEEK_DAYS};

use super::{all_slots, known_rooms, DayWindow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeDay {
    pub day: String,
    /// Free intervals in minutes since midnight, in order.
    pub periods: Vec<(u32, u32)>,
}

/// Free intervals of `room` for each teaching day of the week.
pub fn free_periods(courses: &[Course], room: &str, window: DayWindow) -> Vec<FreeDay> {
    WEEK_DAYS
        .iter()
        .map(|&day| {
            let mut periods = vec![(window.start, window.end)];
            for (start, end) in all_slots(courses)
                .filter(|s| s.room == room && s.day == day)
                .filter_map(|s| s.minutes())
                .filter(|(start, end)| start < end)
            {
                periods = remove_interval(&periods, start, end);
            }
            FreeDay {
                day: day.to_string(),
                periods,
            }
        })
        .collect()
}

fn remove_interval(periods: &[(u32, u32)], start: u32, end: u32) -> Vec<(u32, u32)> {
    let mut out = Vec::with_capacity(periods.len() + 1);
    for &(p_start, p_end) in periods {
        if end <= p_start || start >= p_end {
            out.push((p_start, p_end));
            continue;
        }
        if start > p_start {
            out.push((p_start, start));
        }
        if end < p_end {
            out.push((end, p_end));
        }
    }
    out
}

/// Rooms with no slot covering `at` on `day`. A slot covers its start minute
/// but not its end minute.
pub fn free_rooms(courses: &[Course], day: &str, at: u32) -> Vec<String> {
    let day = day.to_uppercase();
    let occupied: Vec<&str> = all_slots(courses)
        .filter(|s| s.day == day)
        .filter(|s| matches!(s.minutes(), Some((start, end)) if at >= start && at < end))
        .map(|s| s.room.as_str())
        .collect();
    known_rooms(courses)
        .into_iter()
        .filter(|room| !occupied.contains(room))
        .map(str::to_string)
        .collect()
}

/// Parse a `H:MM` / `HH:MM` time of day between 00:00 and 23:59.
pub fn parse_time_of_day(s: &str) -> Result<u32> {
    let Some((h, m)) = split_clock(s) else {
        bail!("Hour is invalid \"{}\", expected H:MM", s);
    };
    if h > 23 || m > 59 {
        bail!("Hour \"{}\" must be in range of 00:00 to 23:59", s);
    }
    Ok(h * 60 + m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixture_courses;

    fn periods_of(days: &[FreeDay], day: &str) -> Vec<(u32, u32)> {
        days.iter().find(|d| d.day == day).unwrap().periods.clone()
    }

    #[test]
    fn free_periods_of_room() {
        let courses = fixture_courses();
        let days = free_periods(&courses, "B101", DayWindow::default());
        assert_eq!(days.len(), 5);
        assert_eq!(periods_of(&days, "L"), vec![(480, 1080)]);
        assert_eq!(periods_of(&days, "MA"), vec![(480, 600), (720, 1080)]);
        assert_eq!(periods_of(&days, "J"), vec![(480, 600), (720, 1080)]);
    }

    #[test]
    fn slot_filling_the_day() {
        let courses = crate::parser::parse("+AB12\n1,C1,P=30,H=L 8:00-18:00,F1,S=A101//").courses;
        let days = free_periods(&courses, "A101", DayWindow::default());
        assert!(periods_of(&days, "L").is_empty());
    }

    #[test]
    fn inverted_slot_is_ignored() {
        let courses = crate::parser::parse("+AB12\n1,C1,P=30,H=L 11:40-10:00,F1,S=A101//").courses;
        assert_eq!(courses[0].slots.len(), 1);
        let days = free_periods(&courses, "A101", DayWindow::default());
        assert_eq!(periods_of(&days, "L"), vec![(480, 1080)]);
    }

    #[test]
    fn overlapping_slots() {
        let periods = remove_interval(&[(480, 1080)], 600, 720);
        let periods = remove_interval(&periods, 660, 780);
        assert_eq!(periods, vec![(480, 600), (780, 1080)]);
    }

    #[test]
    fn free_rooms_at_time() {
        let courses = fixture_courses();
        assert_eq!(
            free_rooms(&courses, "J", 630),
            vec!["A001", "B102", "B103", "EXT1", "S104"]
        );
        assert_eq!(
            free_rooms(&courses, "j", 840),
            vec!["A001", "B101", "B102", "B103", "EXT1"]
        );
        // end of a slot is free again
        assert!(free_rooms(&courses, "J", 720).contains(&"B101".to_string()));
    }

    #[test]
    fn time_of_day() {
        assert_eq!(parse_time_of_day("10:00").unwrap(), 600);
        assert_eq!(parse_time_of_day("9:30").unwrap(), 570);
        assert!(parse_time_of_day("24:00").is_err());
        assert!(parse_time_of_day("10:75").is_err());
        assert!(parse_time_of_day("23:59").is_ok());
        let err = parse_time_of_day("10:75").unwrap_err();
        assert!(err.to_string().contains("00:00 to 23:59"));
        assert!(parse_time_of_day("10h").is_err());
    }
}
