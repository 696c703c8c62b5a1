use quizdig_core::dataset::load_dataset;
use quizdig_core::error::QuizdigError;
use std::path::PathBuf;

use crate::output;

pub fn run(
    transcript_file: PathBuf,
    dataset_file: PathBuf,
    output_format: &str,
    all_warnings: bool,
) -> Result<(), QuizdigError> {
    let dataset = load_dataset(&dataset_file)?;
    let transcript = quizdig_core::read_document(&transcript_file)?;

    let report = quizdig_core::verify_dataset(&dataset, &transcript);

    match output_format {
        "json" => output::json::print(&report)?,
        _ => output::table::print_report(&report, all_warnings),
    }

    if report.has_errors() {
        return Err(QuizdigError::VerificationFailed(report.errors.len()));
    }
    Ok(())
}
