use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::model::Course;
use crate::parser::diagnostics::{Diagnostic, ParseSummary};
use crate::parser::{CruParser, ParseOptions};

/// Parsed content of one or more CRU files.
#[derive(Debug, Default)]
pub struct Timetable {
    pub courses: Vec<Course>,
    pub files: Vec<FileReport>,
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub courses: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Timetable {
    pub fn error_count(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }

    /// Rejected lines of every file, in path order.
    pub fn diagnostics(&self) -> impl Iterator<Item = (&Path, &Diagnostic)> {
        self.files
            .iter()
            .flat_map(|f| f.diagnostics.iter().map(move |d| (f.path.as_path(), d)))
    }

    pub fn summary(&self) -> ParseSummary {
        ParseSummary {
            courses: self.courses.len(),
            slots: self.courses.iter().map(|c| c.slots.len()).sum(),
            errors: self.error_count(),
        }
    }
}

pub fn is_cru_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("cru"))
}

/// Every `.cru` file under `root`, sorted. A file path yields itself.
pub fn find_cru_files(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        if !is_cru_file(root) {
            bail!("The file \"{}\" is not a valid .cru file", root.display());
        }
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        bail!("No such file or directory: {}", root.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if entry.file_type().is_file() && is_cru_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    info!("Found {} .cru file(s) under {}", files.len(), root.display());
    Ok(files)
}

/// Read and parse each file with its own parser. Results keep the order of `paths`.
pub fn load_files(paths: &[PathBuf], options: ParseOptions) -> Result<Timetable> {
    let pb = if paths.len() > 1 {
        let pb = ProgressBar::new(paths.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let parsed: Vec<Result<(Vec<Course>, FileReport)>> = paths
        .par_iter()
        .map(|path| -> Result<(Vec<Course>, FileReport)> {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Error reading file {}", path.display()))?;
            let mut parser = CruParser::new(options);
            parser.parse(&text);
            let outcome = parser.into_outcome();
            pb.inc(1);
            let report = FileReport {
                path: path.clone(),
                courses: outcome.courses.len(),
                diagnostics: outcome.diagnostics,
            };
            Ok((outcome.courses, report))
        })
        .collect();
    pb.finish_and_clear();

    let mut timetable = Timetable::default();
    for result in parsed {
        let (courses, report) = result?;
        if !report.diagnostics.is_empty() {
            warn!(
                "{}: {} line(s) rejected",
                report.path.display(),
                report.diagnostics.len()
            );
        }
        timetable.courses.extend(courses);
        timetable.files.push(report);
    }

    let summary = timetable.summary();
    info!(
        "{} {} course(s), {} slot(s) in {} file(s).",
        summary,
        summary.courses,
        summary.slots,
        timetable.files.len()
    );
    Ok(timetable)
}

/// Discover `.cru` files under `root` and load them.
pub fn load_timetable(root: &Path, options: ParseOptions) -> Result<Timetable> {
    let files = find_cru_files(root)?;
    if files.is_empty() {
        bail!("No .cru files found in {}", root.display());
    }
    load_files(&files, options)
}
