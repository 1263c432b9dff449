use std::sync::LazyLock;

use regex::Regex;

use crate::model::COURSE_MARKER;

pub const COURSE_HEADER_PATTERN: &str = r"^\+[A-Z0-9]+$";
pub const SLOT_PATTERN: &str =
    r"^1,([A-Z0-9]+),P=([0-9]+),H=([A-Z]+)\s([0-9]{1,2}:[0-9]{2}-[0-9]{1,2}:[0-9]{2}),F([A-Z0-9]+),S=([A-Z0-9]{4})//";

pub(crate) static COURSE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COURSE_HEADER_PATTERN).unwrap());
pub(crate) static SLOT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(SLOT_PATTERN).unwrap());

/// A line kept for parsing, with its 1-based number in the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

impl SourceLine<'_> {
    pub fn is_course_candidate(&self) -> bool {
        self.text.starts_with(COURSE_MARKER)
    }
}

pub fn is_course_header(line: &str) -> bool {
    COURSE_HEADER_RE.is_match(line)
}

pub fn is_slot_line(line: &str) -> bool {
    SLOT_RE.is_match(line)
}

/// Keep course-name candidates and well-formed slot lines; everything else is noise.
pub fn filter_relevant_lines(text: &str) -> Vec<SourceLine<'_>> {
    numbered(text)
        .filter(|l| l.is_course_candidate() || is_slot_line(l.text))
        .collect()
}

/// Keep every line that is not blank. Used when noise should be reported, not dropped.
pub fn non_blank_lines(text: &str) -> Vec<SourceLine<'_>> {
    numbered(text).filter(|l| !l.text.trim().is_empty()).collect()
}

// `str::lines` splits on `\n` and strips a trailing `\r`.
fn numbered(text: &str) -> impl Iterator<Item = SourceLine<'_>> {
    text.lines().enumerate().map(|(i, text)| SourceLine {
        number: i + 1,
        text,
    })
}
