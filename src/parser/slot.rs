use crate::model::{Course, Slot};

use super::diagnostics::ParseIssue;
use super::lines::SLOT_RE;

/// Match a slot line against the CRU grammar and build the slot it describes.
pub fn parse_slot(line: &str) -> Result<Slot, ParseIssue> {
    let caps = SLOT_RE.captures(line).ok_or(ParseIssue::InvalidSlot)?;
    // \d+ may still overflow
    let capacity = caps[2].parse::<u32>().map_err(|_| ParseIssue::InvalidSlot)?;
    Ok(Slot {
        session_type: caps[1].to_string(),
        capacity,
        day: caps[3].to_string(),
        time_range: caps[4].to_string(),
        group: caps[5].to_string(),
        room: caps[6].to_string(),
    })
}

/// Attach `slot` to the current course unless it collides with an existing
/// (day, time range, room) triple. The first slot seen for a triple wins.
pub fn attach_slot(current: Option<&mut Course>, slot: Slot) -> Result<(), ParseIssue> {
    let course = current.ok_or(ParseIssue::OrphanSlot)?;
    if course.has_slot_at(&slot.day, &slot.time_range, &slot.room) {
        return Err(ParseIssue::DuplicateSlot {
            day: slot.day,
            time_range: slot.time_range,
            room: slot.room,
        });
    }
    course.slots.push(slot);
    Ok(())
}
