//! Score command - compare an annotation file against ground truth.

use std::path::PathBuf;

use colored::Colorize;
use tessera::score_file;

use crate::cli::TaskChoice;

pub fn run(
    task: TaskChoice,
    submission: PathBuf,
    ground_truth: PathBuf,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !submission.exists() {
        return Err(format!("Submission file not found: {}", submission.display()).into());
    }
    if !ground_truth.exists() {
        return Err(format!("Ground-truth file not found: {}", ground_truth.display()).into());
    }

    let report = score_file(&submission, &ground_truth, task.into())?;

    if json {
        let payload = serde_json::json!({
            "task": task.to_string(),
            "ground_truth": report.ground_truth,
            "submitted": report.submitted,
            "correct": report.correct,
            "precision": report.precision(),
            "recall": report.recall(),
            "f1": report.f1(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "{} {} against {}",
        "Scoring".cyan().bold(),
        submission.display().to_string().white(),
        ground_truth.display()
    );
    println!(
        "{} correct of {} submitted ({} in ground truth)",
        report.correct.to_string().green().bold(),
        report.submitted,
        report.ground_truth
    );
    println!(
        "Precision {:.4}  Recall {:.4}  F1 {}",
        report.precision(),
        report.recall(),
        format!("{:.4}", report.f1()).white().bold()
    );

    Ok(())
}
