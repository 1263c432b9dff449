pub mod diagnostics;
pub mod lines;
pub mod slot;

use serde::Serialize;
use tracing::{debug, warn};

use crate::model::Course;
use diagnostics::{Diagnostic, ParseIssue, ParseSummary};
use lines::SourceLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Log each rejected line as a warning. Rejections are counted either way.
    pub show_errors: bool,
    /// Drop lines that are neither course headers nor valid slots before parsing.
    pub filter_noise: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            show_errors: true,
            filter_noise: true,
        }
    }
}

/// Owner of the slots parsed next. Lives for one `parse` call only.
#[derive(Debug, Default)]
struct ParseContext {
    current: Option<usize>,
}

/// Line-oriented CRU parser: a header line opens a course, the slot lines
/// under it fill it, and every rejected line is counted instead of aborting.
#[derive(Debug, Default)]
pub struct CruParser {
    options: ParseOptions,
    courses: Vec<Course>,
    diagnostics: Vec<Diagnostic>,
}

impl CruParser {
    pub fn new(options: ParseOptions) -> Self {
        CruParser {
            options,
            courses: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_errors_shown(show_errors: bool) -> Self {
        Self::new(ParseOptions {
            show_errors,
            ..ParseOptions::default()
        })
    }

    /// Parse `text`, appending its courses to those of earlier calls.
    pub fn parse(&mut self, text: &str) -> &[Course] {
        let tokens = if self.options.filter_noise {
            lines::filter_relevant_lines(text)
        } else {
            lines::non_blank_lines(text)
        };

        let mut ctx = ParseContext::default();
        let mut i = 0;
        while i < tokens.len() {
            i = self.course_block(&tokens, i, &mut ctx);
        }

        &self.courses
    }

    /// Parse one header line and the slot lines that follow it.
    /// Returns the index of the next unconsumed line.
    fn course_block(&mut self, tokens: &[SourceLine], start: usize, ctx: &mut ParseContext) -> usize {
        let line = tokens[start];
        let mut i = start + 1;

        if !line.is_course_candidate() {
            self.reject(ParseIssue::ExpectedCourseName, line);
            return i;
        }
        if !lines::is_course_header(line.text) {
            ctx.current = None;
            self.reject(ParseIssue::InvalidCourseName, line);
            return i;
        }

        debug!(course = line.text, line = line.number, "course header");
        self.courses.push(Course::new(line.text));
        ctx.current = Some(self.courses.len() - 1);

        while i < tokens.len() && !tokens[i].is_course_candidate() {
            self.slot_line(tokens[i], ctx);
            i += 1;
        }
        i
    }

    fn slot_line(&mut self, line: SourceLine, ctx: &ParseContext) {
        let current = ctx.current.and_then(|idx| self.courses.get_mut(idx));
        let result = slot::parse_slot(line.text).and_then(|s| slot::attach_slot(current, s));
        if let Err(issue) = result {
            self.reject(issue, line);
        }
    }

    fn reject(&mut self, issue: ParseIssue, line: SourceLine) {
        if self.options.show_errors {
            warn!("Parsing Error ! on \"{}\" (line {}) -- msg : {}", line.text, line.number, issue);
        }
        self.diagnostics.push(Diagnostic {
            issue,
            line_number: line.number,
            line: line.text.to_string(),
        });
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn into_courses(self) -> Vec<Course> {
        self.courses
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn summary(&self) -> ParseSummary {
        ParseSummary {
            courses: self.courses.len(),
            slots: self.courses.iter().map(|c| c.slots.len()).sum(),
            errors: self.error_count(),
        }
    }

    /// Forget every course and diagnostic, keeping the options.
    pub fn reset(&mut self) {
        self.courses.clear();
        self.diagnostics.clear();
    }

    pub fn into_outcome(self) -> ParseOutcome {
        ParseOutcome {
            courses: self.courses,
            diagnostics: self.diagnostics,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseOutcome {
    pub courses: Vec<Course>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }
}

/// Parse `text` with a fresh parser that collects diagnostics without logging them.
pub fn parse(text: &str) -> ParseOutcome {
    parse_with(text, ParseOptions { show_errors: false, ..ParseOptions::default() })
}

pub fn parse_with(text: &str, options: ParseOptions) -> ParseOutcome {
    let mut parser = CruParser::new(options);
    parser.parse(text);
    parser.into_outcome()
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagnostics::IssueKind;

    const STRICT: ParseOptions = ParseOptions {
        show_errors: false,
        filter_noise: false,
    };

    fn rooms(course: &Course) -> Vec<&str> {
        course.slots.iter().map(|s| s.room.as_str()).collect()
    }

    #[test]
    fn well_formed_input_keeps_order() {
        let text = "+AP03\n\
                    1,D1,P=25,H=J 10:00-12:00,F1,S=B101//\n\
                    1,D2,P=24,H=J 13:00-15:00,F1,S=S104//\n\
                    +UVUV\n\
                    1,C1,P=24,H=V 9:00-12:00,F1,S=B103//\n";
        let out = parse(text);
        assert_eq!(out.error_count(), 0);
        let names: Vec<_> = out.courses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["+AP03", "+UVUV"]);
        assert_eq!(rooms(&out.courses[0]), vec!["B101", "S104"]);
        assert_eq!(rooms(&out.courses[1]), vec!["B103"]);
    }

    #[test]
    fn header_without_slots() {
        let out = parse("+AP03\n+UVUV\n");
        assert_eq!(out.courses.len(), 2);
        assert!(out.courses.iter().all(|c| c.slots.is_empty()));
        assert_eq!(out.error_count(), 0);
    }

    #[test]
    fn garbage_between_slots_in_strict_mode() {
        let text = "+AB12\n1,C1,P=30,H=L 08:00-10:00,FG1,S=A101//\nGARBAGE\n1,C1,P=30,H=L 08:00-10:00,FG1,S=A102//";
        let out = parse_with(text, STRICT);
        assert_eq!(out.courses.len(), 1);
        assert_eq!(out.courses[0].name, "+AB12");
        assert_eq!(rooms(&out.courses[0]), vec!["A101", "A102"]);
        assert_eq!(out.error_count(), 1);
        assert_eq!(out.diagnostics[0].issue, ParseIssue::InvalidSlot);
        assert_eq!(out.diagnostics[0].line_number, 3);
        assert_eq!(out.diagnostics[0].line, "GARBAGE");
    }

    #[test]
    fn garbage_is_filtered_by_default() {
        let text = "+AB12\n1,C1,P=30,H=L 08:00-10:00,FG1,S=A101//\nGARBAGE\n1,C1,P=30,H=L 08:00-10:00,FG1,S=A102//";
        let out = parse(text);
        assert_eq!(rooms(&out.courses[0]), vec!["A101", "A102"]);
        assert_eq!(out.error_count(), 0);
    }

    #[test]
    fn duplicate_slot_keeps_first() {
        let text = "+AB12\n1,C1,P=30,H=L 08:00-10:00,FG1,S=A101//\n1,D1,P=20,H=L 08:00-10:00,FG2,S=A101//";
        let out = parse(text);
        assert_eq!(out.courses.len(), 1);
        assert_eq!(out.courses[0].slots.len(), 1);
        assert_eq!(out.courses[0].slots[0].session_type, "C1");
        assert_eq!(out.courses[0].slots[0].capacity, 30);
        assert_eq!(out.error_count(), 1);
        assert_eq!(
            out.diagnostics[0].issue,
            ParseIssue::DuplicateSlot {
                day: "L".into(),
                time_range: "08:00-10:00".into(),
                room: "A101".into(),
            }
        );
    }

    #[test]
    fn one_error_per_duplicate_occurrence() {
        let text = "+AB12\n\
                    1,C1,P=30,H=L 08:00-10:00,FG1,S=A101//\n\
                    1,D1,P=20,H=L 08:00-10:00,FG2,S=A101//\n\
                    1,T1,P=10,H=L 08:00-10:00,FG3,S=A101//\n";
        let out = parse(text);
        assert_eq!(out.courses[0].slots.len(), 1);
        assert_eq!(out.error_count(), 2);
        assert!(out.diagnostics.iter().all(|d| d.kind() == IssueKind::DuplicateSlot));
    }

    #[test]
    fn same_slot_in_two_courses_is_not_a_duplicate() {
        let text = "+AB12\n1,C1,P=30,H=L 08:00-10:00,FG1,S=A101//\n+CD34\n1,C1,P=30,H=L 08:00-10:00,FG1,S=A101//";
        let out = parse(text);
        assert_eq!(out.error_count(), 0);
        assert_eq!(out.courses[1].slots.len(), 1);
    }

    #[test]
    fn slots_before_any_header() {
        let text = "1,C1,P=30,H=L 08:00-10:00,FG1,S=A101//\n1,C1,P=30,H=L 10:00-12:00,FG1,S=A101//\n";
        let out = parse(text);
        assert!(out.courses.is_empty());
        assert_eq!(out.error_count(), 2);
        assert!(out
            .diagnostics
            .iter()
            .all(|d| d.issue == ParseIssue::ExpectedCourseName));
    }

    #[test]
    fn invalid_header_does_not_adopt_following_slots() {
        let text = "+AB12\n\
                    1,C1,P=30,H=L 08:00-10:00,FG1,S=A101//\n\
                    +bad\n\
                    1,C1,P=30,H=MA 08:00-10:00,FG1,S=A102//\n";
        let out = parse(text);
        assert_eq!(out.courses.len(), 1);
        assert_eq!(rooms(&out.courses[0]), vec!["A101"]);
        assert_eq!(out.error_count(), 2);
        assert_eq!(out.diagnostics[0].issue, ParseIssue::InvalidCourseName);
        assert_eq!(out.diagnostics[1].issue, ParseIssue::ExpectedCourseName);
    }

    #[test]
    fn non_ascii_digits_are_noise() {
        let text = "+AB12\n\
                    1,C1,P=30,H=L \u{0668}:00-10:00,FG1,S=A101//\n\
                    1,C1,P=\u{0663}\u{0660},H=L 8:00-10:00,FG1,S=A101//\n";
        let out = parse(text);
        assert_eq!(out.courses.len(), 1);
        assert!(out.courses[0].slots.is_empty());
        assert_eq!(out.error_count(), 0);
    }

    #[test]
    fn shown_errors_are_still_counted() {
        let text = "+AB12\n\
                    1,C1,P=30,H=L 08:00-10:00,FG1,S=A101//\n\
                    1,D1,P=20,H=L 08:00-10:00,FG2,S=A101//\n\
                    +bad\n\
                    1,C1,P=30,H=MA 08:00-10:00,FG1,S=A102//\n";
        let mut loud = CruParser::with_errors_shown(true);
        loud.parse(text);
        let mut silent = CruParser::with_errors_shown(false);
        silent.parse(text);

        assert_eq!(loud.error_count(), 3);
        assert_eq!(loud.error_count(), silent.error_count());
        assert_eq!(loud.diagnostics(), silent.diagnostics());
        assert_eq!(loud.courses(), silent.courses());
        assert_eq!(loud.summary().errors, 3);
    }

    #[test]
    fn crlf_input() {
        let out = parse("+AB12\r\n1,C1,P=30,H=L 08:00-10:00,FG1,S=A101//\r\n");
        assert_eq!(out.courses.len(), 1);
        assert_eq!(out.courses[0].slots.len(), 1);
        assert_eq!(out.error_count(), 0);
    }

    #[test]
    fn deterministic_with_fresh_parsers() {
        let text = std::fs::read_to_string("tests/fixtures/edt.cru").unwrap();
        let a = parse(&text);
        let b = parse(&text);
        assert_eq!(a.courses, b.courses);
        assert_eq!(a.diagnostics, b.diagnostics);
    }

    #[test]
    fn fixture_file() {
        let text = std::fs::read_to_string("tests/fixtures/edt.cru").unwrap();
        let mut parser = CruParser::with_errors_shown(false);
        let courses = parser.parse(&text);
        assert_eq!(courses.len(), 4);
        assert_eq!(courses[0].name, "+AP03");
        let summary = parser.summary();
        assert_eq!(summary.courses, 4);
        assert_eq!(summary.errors, parser.error_count());
        // duplicate in +MT01, bad header +mt02 and the slot under it
        assert_eq!(parser.error_count(), 3);
    }

    #[test]
    fn parse_accumulates_until_reset() {
        let mut parser = CruParser::with_errors_shown(false);
        parser.parse("+AB12\n1,C1,P=30,H=L 08:00-10:00,FG1,S=A101//");
        // a new run does not inherit the previous current course
        parser.parse("1,C1,P=30,H=L 10:00-12:00,FG1,S=A101//\n+CD34");
        assert_eq!(parser.courses().len(), 2);
        assert_eq!(parser.courses()[0].slots.len(), 1);
        assert_eq!(parser.error_count(), 1);

        parser.reset();
        assert!(parser.courses().is_empty());
        assert_eq!(parser.error_count(), 0);
        parser.parse("+EF56");
        assert_eq!(parser.into_courses().len(), 1);
    }
}
