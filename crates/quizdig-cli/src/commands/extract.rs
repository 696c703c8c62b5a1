use quizdig_core::error::QuizdigError;
use quizdig_core::extraction::detector::ColorClassDetector;
use std::path::PathBuf;

use crate::commands::resolve_profile;
use crate::output;

pub fn run(
    input_file: PathBuf,
    out: PathBuf,
    preset: Option<String>,
    profile: Option<PathBuf>,
    output_format: &str,
) -> Result<(), QuizdigError> {
    let profile = resolve_profile(preset, profile)?;
    let html = quizdig_core::read_document(&input_file)?;
    let detector = ColorClassDetector::from_profile(&profile);

    let extraction = quizdig_core::extract_questions(&html, &profile, &detector)?;
    quizdig_core::dataset::save_dataset(&out, &extraction.questions)?;

    match output_format {
        "json" => output::json::print(&extraction)?,
        _ => output::table::print_extraction(&extraction),
    }
    eprintln!(
        "Extracted {} question(s), written to {}",
        extraction.questions.len(),
        out.display()
    );

    Ok(())
}
