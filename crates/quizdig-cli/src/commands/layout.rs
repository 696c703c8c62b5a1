use quizdig_core::error::QuizdigError;
use quizdig_core::extraction::{html, layout};
use std::path::PathBuf;

use crate::commands::resolve_profile;

pub fn run(
    input_file: PathBuf,
    preset: Option<String>,
    profile: Option<PathBuf>,
) -> Result<(), QuizdigError> {
    let profile = resolve_profile(preset, profile)?;
    let document = quizdig_core::read_document(&input_file)?;
    let pages = html::scan_pages(&document, &profile.page_class, &profile.fragment_class)?;

    let fragment_count: usize = pages.iter().map(|p| p.fragments.len()).sum();
    println!(
        "{} page(s), {} fragment(s) by left offset (em):\n",
        pages.len(),
        fragment_count
    );

    for column in layout::left_histogram(&pages) {
        println!("  {:>4}  {} fragment(s)", column.column, column.count);
        for sample in &column.samples {
            println!("        {}", sample);
        }
    }

    Ok(())
}
