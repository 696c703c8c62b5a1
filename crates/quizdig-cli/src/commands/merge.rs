use quizdig_core::dataset::{load_dataset, save_dataset};
use quizdig_core::error::QuizdigError;
use std::path::PathBuf;

pub fn run(transcript_file: PathBuf, dataset_file: PathBuf) -> Result<(), QuizdigError> {
    let provisional = load_dataset(&dataset_file)?;
    let transcript = quizdig_core::read_document(&transcript_file)?;

    let merged = quizdig_core::merge_transcript(&transcript, &provisional)?;
    save_dataset(&dataset_file, &merged.questions)?;

    println!(
        "Merged {} question(s), written to {}",
        merged.questions.len(),
        dataset_file.display()
    );
    if !merged.warnings.is_empty() {
        println!("  {} warning(s):", merged.warnings.len());
        for w in &merged.warnings {
            println!("    {}", w);
        }
    }

    Ok(())
}
