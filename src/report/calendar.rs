use anyhow::{bail, ensure, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::model::{Course, Slot};

const PRODID: &str = "-//cru_timetable//Timetable Calendar 1.0//FR";
const TZID: &str = "Europe/Paris";

/// Session types exported to the calendar and their labels.
const EXPORTED_SESSIONS: &[(&str, &str)] = &[("C1", "CM"), ("D1", "TD"), ("T1", "TP")];

fn session_label(session_type: &str) -> Option<&'static str> {
    EXPORTED_SESSIONS
        .iter()
        .find(|(code, _)| *code == session_type)
        .map(|(_, label)| *label)
}

/// Render an iCalendar document with one event per matching slot and date
/// between `start` and `end` inclusive.
pub fn render_ics(
    courses: &[Course],
    names: &[String],
    start: NaiveDate,
    end: NaiveDate,
    stamp: DateTime<Utc>,
) -> Result<String> {
    ensure!(!names.is_empty(), "No course given, at least one course is required");
    ensure!(start <= end, "The start date must be prior to the end date");

    let missing: Vec<&str> = names
        .iter()
        .filter(|n| !courses.iter().any(|c| &c.name == *n))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        bail!("Unknown course(s): {}", missing.join(", "));
    }

    let selected: Vec<&Course> = courses
        .iter()
        .filter(|c| names.contains(&c.name))
        .collect();
    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();

    let mut out = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
    ];

    for date in start.iter_days().take_while(|d| *d <= end) {
        for course in &selected {
            for (idx, slot) in course.slots.iter().enumerate() {
                if slot.weekday() == Some(date.weekday()) {
                    push_event(&mut out, course, idx, slot, date, &dtstamp);
                }
            }
        }
    }

    out.push("END:VCALENDAR".to_string());
    let mut ics = out.join("\r\n");
    ics.push_str("\r\n");
    Ok(ics)
}

fn push_event(
    out: &mut Vec<String>,
    course: &Course,
    idx: usize,
    slot: &Slot,
    date: NaiveDate,
    dtstamp: &str,
) {
    let Some(label) = session_label(&slot.session_type) else {
        return;
    };
    let Some((from, to)) = slot.minutes() else {
        return;
    };
    let day = date.format("%Y%m%d");
    out.push("BEGIN:VEVENT".to_string());
    out.push(format!("UID:{}-{}-{}@cru", course.code(), day, idx));
    out.push(format!("DTSTAMP:{}", dtstamp));
    out.push(format!("DTSTART;TZID={}:{}T{}", TZID, day, ics_time(from)));
    out.push(format!("DTEND;TZID={}:{}T{}", TZID, day, ics_time(to)));
    out.push(format!("SUMMARY:{} de {}", label, course.code()));
    out.push(format!(
        "DESCRIPTION:{} de {} en {}.",
        label,
        course.code(),
        slot.room
    ));
    out.push(format!("LOCATION:{}", slot.room));
    out.push("END:VEVENT".to_string());
}

fn ics_time(minutes: u32) -> String {
    format!("{:02}{:02}00", minutes / 60, minutes % 60)
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(d) => Ok(d),
        Err(e) => bail!("Invalid date \"{}\", expected YYYY-MM-DD ({})", s, e),
    }
}
