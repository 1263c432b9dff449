//! Parser and reports for CRU timetable files.
//!
//! A CRU file lists courses (`+AP03`) each followed by slot lines such as
//! `1,D1,P=25,H=J 10:00-12:00,F1,S=B101//`. [`parser`] turns that text into
//! [`model::Course`] values and counts every line it has to reject;
//! [`report`] answers questions about rooms and schedules over the result.

pub mod discovery;
pub mod model;
pub mod parser;
pub mod report;
pub mod settings;

pub use model::{Course, Slot};
pub use parser::diagnostics::{Diagnostic, IssueKind, ParseIssue, ParseSummary};
pub use parser::{parse, parse_with, CruParser, ParseOptions, ParseOutcome};
