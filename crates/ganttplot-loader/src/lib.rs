//! # ganttplot-loader
//!
//! Schedule loader: turns delimited spreadsheet exports into validated
//! [`TaskRecord`] sequences.
//!
//! Expected columns: `Task`, `Plan-Start`, `Plan-End`, `Actual-Start`,
//! `Actual-End`, `Predecessor`, optionally `Description`. Header matching is
//! forgiving about case, spaces, dashes and underscores. The `Predecessor`
//! cell holds a `;`-separated id list; empty date cells mean "not set".
//!
//! The loader owns validation: every record it returns satisfies the layout
//! engine's preconditions (non-empty unique ids, ordered date ranges,
//! resolvable predecessor references). A malformed file is a fatal
//! [`LoadError`] naming the offending row or task.
//!
//! ## Example
//!
//! ```rust
//! let input = "\
//! Task,Description,Plan-Start,Plan-End,Actual-Start,Actual-End,Predecessor
//! 1.0,Survey,01.07.2024,05.07.2024,01.07.2024,06.07.2024,
//! 2.0,Build,08.07.2024,19.07.2024,,,1.0
//! ";
//! let records = ganttplot_loader::load_str(input).unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].predecessors, vec!["1.0".to_string()]);
//! ```

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use ganttplot_core::TaskRecord;
use thiserror::Error;
use tracing::debug;

/// Load error
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid date '{value}' in column '{column}'")]
    InvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: task id must not be empty")]
    EmptyTaskId { row: usize },

    #[error("duplicate task id '{0}'")]
    DuplicateTask(String),

    #[error("task '{task}': {which} end {end} precedes {which} start {start}")]
    InvertedRange {
        task: String,
        which: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("task '{task}': predecessor '{predecessor}' is not defined in the schedule")]
    DanglingPredecessor { task: String, predecessor: String },
}

/// Column indices resolved from the header row
struct Columns {
    task: usize,
    description: Option<usize>,
    plan_start: usize,
    plan_end: usize,
    actual_start: usize,
    actual_end: usize,
    predecessor: usize,
}

/// Load and validate a schedule from a file
pub fn load_path(path: &Path) -> Result<Vec<TaskRecord>, LoadError> {
    let content = std::fs::read_to_string(path)?;
    load_str(&content)
}

/// Load and validate a schedule from in-memory text
pub fn load_str(input: &str) -> Result<Vec<TaskRecord>, LoadError> {
    load_reader(input.as_bytes())
}

/// Load and validate a schedule from any reader
pub fn load_reader<R: Read>(reader: R) -> Result<Vec<TaskRecord>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut records = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        // Header is line 1; data rows are reported 1-based below it.
        let row = i + 2;
        let record = result?;
        records.push(parse_row(&record, &columns, row)?);
    }

    validate(&records)?;
    debug!(tasks = records.len(), "schedule loaded");
    Ok(records)
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, LoadError> {
    let find = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.contains(&normalize_header(h).as_str()))
    };

    let required = |names: &[&str], label: &'static str| {
        find(names).ok_or(LoadError::MissingColumn(label))
    };

    Ok(Columns {
        task: required(&["task", "taskno", "id"], "Task")?,
        description: find(&["description", "notes", "note"]),
        plan_start: required(&["planstart", "plannedstart"], "Plan-Start")?,
        plan_end: required(&["planend", "plannedend"], "Plan-End")?,
        actual_start: required(&["actualstart"], "Actual-Start")?,
        actual_end: required(&["actualend"], "Actual-End")?,
        predecessor: required(&["predecessor", "predecessors"], "Predecessor")?,
    })
}

/// Normalize a header for matching: lowercase, strip separators
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn parse_row(
    record: &csv::StringRecord,
    columns: &Columns,
    row: usize,
) -> Result<TaskRecord, LoadError> {
    let cell = |i: usize| record.get(i).unwrap_or("").trim();

    let id = cell(columns.task);
    if id.is_empty() {
        return Err(LoadError::EmptyTaskId { row });
    }

    let mut task = TaskRecord::new(id);
    if let Some(i) = columns.description {
        task.description = cell(i).to_string();
    }
    task.planned_start = parse_date(cell(columns.plan_start), "Plan-Start", row)?;
    task.planned_end = parse_date(cell(columns.plan_end), "Plan-End", row)?;
    task.actual_start = parse_date(cell(columns.actual_start), "Actual-Start", row)?;
    task.actual_end = parse_date(cell(columns.actual_end), "Actual-End", row)?;
    task.predecessors = cell(columns.predecessor)
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    Ok(task)
}

/// Parse a date cell; empty means "not set".
///
/// Spreadsheet exports in the wild use either day-first dotted dates or ISO.
fn parse_date(
    value: &str,
    column: &'static str,
    row: usize,
) -> Result<Option<NaiveDate>, LoadError> {
    if value.is_empty() {
        return Ok(None);
    }
    for format in ["%d.%m.%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(Some(date));
        }
    }
    Err(LoadError::InvalidDate {
        row,
        column,
        value: value.to_string(),
    })
}

/// Cross-record validation: unique ids, ordered ranges, resolvable
/// predecessor references.
fn validate(records: &[TaskRecord]) -> Result<(), LoadError> {
    let mut ids: HashSet<&str> = HashSet::with_capacity(records.len());
    for record in records {
        if !ids.insert(record.id.as_str()) {
            return Err(LoadError::DuplicateTask(record.id.clone()));
        }
    }

    for record in records {
        for (which, range) in [
            ("planned", record.planned_range()),
            ("actual", record.actual_range()),
        ] {
            if let Some((start, end)) = range {
                if end < start {
                    return Err(LoadError::InvertedRange {
                        task: record.id.clone(),
                        which,
                        start,
                        end,
                    });
                }
            }
        }

        for predecessor in &record.predecessors {
            if !ids.contains(predecessor.as_str()) {
                return Err(LoadError::DanglingPredecessor {
                    task: record.id.clone(),
                    predecessor: predecessor.clone(),
                });
            }
        }
    }
    Ok(())
}
