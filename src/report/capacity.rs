use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;

use crate::model::Course;

use super::all_slots;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classroom {
    pub session_type: String,
    pub room: String,
}

/// Session types and rooms of the first course named `course_name`.
pub fn classrooms(courses: &[Course], course_name: &str) -> Option<Vec<Classroom>> {
    let course = courses.iter().find(|c| c.name == course_name)?;
    Some(
        course
            .slots
            .iter()
            .map(|s| Classroom {
                session_type: s.session_type.clone(),
                room: s.room.clone(),
            })
            .collect(),
    )
}

/// Largest capacity declared for `room` across all slots.
pub fn room_capacity(courses: &[Course], room: &str) -> Option<u32> {
    all_slots(courses)
        .filter(|s| s.room == room)
        .map(|s| s.capacity)
        .max()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomCapacity {
    pub room: String,
    pub capacity: u32,
}

/// Rooms by decreasing capacity; ties are ordered by room name.
pub fn rank_rooms(courses: &[Course]) -> Vec<RoomCapacity> {
    let mut best: HashMap<&str, u32> = HashMap::new();
    for slot in all_slots(courses) {
        let entry = best.entry(slot.room.as_str()).or_insert(slot.capacity);
        *entry = (*entry).max(slot.capacity);
    }
    best.into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .map(|(room, capacity)| RoomCapacity {
            room: room.to_string(),
            capacity,
        })
        .collect()
}
