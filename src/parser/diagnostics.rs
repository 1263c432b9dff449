use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why a line was rejected. None of these stop the parse.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssue {
    #[error("Expected course name but got something else")]
    ExpectedCourseName,
    #[error("Invalid course name format")]
    InvalidCourseName,
    #[error("Invalid creneau format")]
    InvalidSlot,
    #[error("Creneau found without an associated course")]
    OrphanSlot,
    #[error("Duplicate creneau found for salle {room} at {day} {time_range}")]
    DuplicateSlot {
        day: String,
        time_range: String,
        room: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueKind {
    Structural,
    SlotGrammar,
    OrphanSlot,
    DuplicateSlot,
}

impl ParseIssue {
    pub fn kind(&self) -> IssueKind {
        match self {
            ParseIssue::ExpectedCourseName | ParseIssue::InvalidCourseName => IssueKind::Structural,
            ParseIssue::InvalidSlot => IssueKind::SlotGrammar,
            ParseIssue::OrphanSlot => IssueKind::OrphanSlot,
            ParseIssue::DuplicateSlot { .. } => IssueKind::DuplicateSlot,
        }
    }
}

/// One rejected line, with its 1-based position in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub issue: ParseIssue,
    pub line_number: usize,
    pub line: String,
}

impl Diagnostic {
    pub fn kind(&self) -> IssueKind {
        self.issue.kind()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} on \"{}\"",
            self.line_number, self.issue, self.line
        )
    }
}

/// Totals reported once a parse run is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    pub courses: usize,
    pub slots: usize,
    pub errors: usize,
}

impl fmt::Display for ParseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parsing completed with {} error(s).", self.errors)
    }
}
