// Vocabulary ingestion from uploaded CSV files

use crate::error::{Error, Result};
use crate::utils::validation::{is_csv_path, validate_csv_path};
use crate::vocabulary::Vocabulary;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Counts from one or more CSV loads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub files: usize,
    pub rows: usize,
    /// Names that were new to the vocabulary
    pub added: usize,
    /// Rows whose name was already known (or repeated within the load)
    pub duplicates: usize,
    /// Rows with a blank or missing ingredient cell
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl IngestReport {
    fn merge(&mut self, other: IngestReport) {
        self.files += other.files;
        self.rows += other.rows;
        self.added += other.added;
        self.duplicates += other.duplicates;
        self.skipped += other.skipped;
        self.errors.extend(other.errors);
    }

    pub fn log_summary(&self) {
        info!(
            "Vocabulary ingestion completed: {} files, {} rows, {} added, {} duplicates, {} skipped, {} errors",
            self.files,
            self.rows,
            self.added,
            self.duplicates,
            self.skipped,
            self.errors.len()
        );

        if !self.errors.is_empty() {
            warn!("Ingestion errors:");
            for error in &self.errors {
                warn!("  - {}", error);
            }
        }
    }
}

/// Read the `column` of a headed CSV stream into the vocabulary.
///
/// The header match ignores case and surrounding whitespace. Names are
/// canonicalized by the vocabulary; the batch is published once.
pub fn load_reader<R: Read>(vocabulary: &Vocabulary, reader: R, column: &str) -> Result<IngestReport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let index = csv_reader
        .headers()?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column.trim()))
        .ok_or_else(|| Error::Validation(format!("CSV has no '{column}' column")))?;

    let mut report = IngestReport::default();
    let mut names = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        report.rows += 1;

        match record.get(index).map(str::trim) {
            Some(name) if !name.is_empty() => names.push(name.to_string()),
            _ => {
                debug!("Skipping CSV row {} with no ingredient", report.rows);
                report.skipped += 1;
            }
        }
    }

    report.added = vocabulary.insert_many(&names);
    report.duplicates = names.len() - report.added;

    Ok(report)
}

/// Load one CSV file into the vocabulary
pub fn load_file(vocabulary: &Vocabulary, path: &Path, column: &str) -> Result<IngestReport> {
    validate_csv_path(path)?;

    let file = File::open(path)?;
    let mut report = load_reader(vocabulary, file, column)?;
    report.files = 1;

    debug!(
        "Loaded {}: {} rows, {} new names",
        path.display(),
        report.rows,
        report.added
    );

    Ok(report)
}

/// Load every `.csv` file of the upload folder, in file name order.
///
/// A missing folder yields an empty report. A file that fails to load is
/// recorded in the report and the remaining files are still loaded.
pub fn load_directory(vocabulary: &Vocabulary, dir: &Path, column: &str) -> Result<IngestReport> {
    let mut report = IngestReport::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Upload folder {} does not exist, vocabulary starts empty", dir.display());
            return Ok(report);
        }
        Err(e) => return Err(e.into()),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        // Other files may share the folder, skip them quietly
        if path.is_file() && is_csv_path(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    for path in paths {
        match load_file(vocabulary, &path, column) {
            Ok(file_report) => report.merge(file_report),
            Err(e) => {
                let error_msg = format!("Failed to load '{}': {}", path.display(), e);
                warn!("{}", error_msg);
                report.errors.push(error_msg);
            }
        }
    }

    report.log_summary();
    Ok(report)
}
