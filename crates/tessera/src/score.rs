//! Scoring produced annotations against ground truth.
//!
//! Both files share the flat record shape the pipeline emits: the leading
//! fields form the key, the last field is the annotation URI. A submission
//! row is correct when its key exists in the ground truth and the URIs match
//! (case-insensitively - benchmark ground truths mix IRI casing).

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TesseraError};

/// Which annotation task a file belongs to, fixing its key width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Cell-entity annotation: key is (table, column, row).
    Cea,
    /// Column-type annotation: key is (table, column).
    Cta,
    /// Column-pair relation annotation: key is (table, column, column).
    Cpa,
}

impl Task {
    /// Number of key fields preceding the annotation field.
    pub fn key_fields(&self) -> usize {
        match self {
            Task::Cea => 3,
            Task::Cta => 2,
            Task::Cpa => 3,
        }
    }

    /// Lowercase task name.
    pub fn name(&self) -> &'static str {
        match self {
            Task::Cea => "cea",
            Task::Cta => "cta",
            Task::Cpa => "cpa",
        }
    }
}

/// Precision/recall/F1 over exact key+annotation matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Ground-truth entries.
    pub ground_truth: usize,
    /// Distinct keys submitted.
    pub submitted: usize,
    /// Submitted keys whose annotation matches the ground truth.
    pub correct: usize,
}

impl ScoreReport {
    /// Fraction of submitted annotations that are correct.
    pub fn precision(&self) -> f64 {
        if self.submitted == 0 {
            0.0
        } else {
            self.correct as f64 / self.submitted as f64
        }
    }

    /// Fraction of ground-truth entries that were annotated correctly.
    pub fn recall(&self) -> f64 {
        if self.ground_truth == 0 {
            0.0
        } else {
            self.correct as f64 / self.ground_truth as f64
        }
    }

    /// Harmonic mean of precision and recall.
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

fn read_records(path: &Path, key_fields: usize) -> Result<Vec<(Vec<String>, String)>> {
    let file = File::open(path).map_err(|e| TesseraError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() != key_fields + 1 {
            return Err(TesseraError::MalformedRecord {
                line: idx + 1,
                message: format!(
                    "expected {} fields, got {}",
                    key_fields + 1,
                    record.len()
                ),
            });
        }

        let key: Vec<String> = record.iter().take(key_fields).map(String::from).collect();
        let annotation = record[key_fields].trim().to_string();
        records.push((key, annotation));
    }

    Ok(records)
}

/// Score a submission file against a ground-truth file.
///
/// Duplicate submission keys keep their first annotation; submission keys
/// absent from the ground truth count against precision, matching how the
/// benchmark evaluators treat spurious rows.
pub fn score_file(
    submission: impl AsRef<Path>,
    ground_truth: impl AsRef<Path>,
    task: Task,
) -> Result<ScoreReport> {
    let key_fields = task.key_fields();

    let gt: HashMap<Vec<String>, String> = read_records(ground_truth.as_ref(), key_fields)?
        .into_iter()
        .collect();

    let mut submitted: HashMap<Vec<String>, String> = HashMap::new();
    for (key, annotation) in read_records(submission.as_ref(), key_fields)? {
        submitted.entry(key).or_insert(annotation);
    }

    let correct = submitted
        .iter()
        .filter(|(key, annotation)| {
            gt.get(*key)
                .is_some_and(|expected| expected.eq_ignore_ascii_case(annotation))
        })
        .count();

    Ok(ScoreReport {
        ground_truth: gt.len(),
        submitted: submitted.len(),
        correct,
    })
}
