use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Course, WEEK_DAYS};

use super::{all_slots, DayWindow};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomOccupancy {
    pub room: String,
    pub used_minutes: u32,
    /// Percentage of the teaching week.
    pub rate: f64,
}

/// Weekly occupancy of every room, busiest first.
pub fn occupancy(courses: &[Course], window: DayWindow) -> Vec<RoomOccupancy> {
    let mut used: HashMap<&str, u32> = HashMap::new();
    for slot in all_slots(courses) {
        let Some((start, end)) = slot.minutes() else {
            continue;
        };
        *used.entry(slot.room.as_str()).or_default() += end.saturating_sub(start);
    }

    let week = window.minutes() * WEEK_DAYS.len() as u32;
    let mut rows: Vec<RoomOccupancy> = used
        .into_iter()
        .map(|(room, used_minutes)| RoomOccupancy {
            room: room.to_string(),
            used_minutes,
            rate: if week == 0 {
                0.0
            } else {
                f64::from(used_minutes) / f64::from(week) * 100.0
            },
        })
        .collect();
    rows.sort_by(|a, b| {
        b.used_minutes
            .cmp(&a.used_minutes)
            .then_with(|| a.room.cmp(&b.room))
    });
    rows
}
