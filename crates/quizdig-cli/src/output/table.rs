use quizdig_core::verify::VerificationReport;
use quizdig_core::Extraction;

pub fn print_extraction(extraction: &Extraction) {
    let answered = extraction
        .questions
        .iter()
        .filter(|q| q.answer.is_some())
        .count();

    println!(
        "  Fragments: {} ({} boilerplate)",
        extraction.fragment_count, extraction.boilerplate_count
    );
    println!(
        "  Questions: {} ({} with an answer)\n",
        extraction.questions.len(),
        answered
    );

    if !extraction.warnings.is_empty() {
        println!("  Warnings:");
        for w in &extraction.warnings {
            println!("    {}", w);
        }
        println!();
    }
}

pub fn print_report(report: &VerificationReport, all_warnings: bool) {
    println!("  Transcript: {} question(s)", report.transcript_count);
    println!("  Dataset:    {} question(s)\n", report.dataset_count);

    if report.is_clean() {
        println!("SUCCESS: all questions match in order and content (opening text check).");
        return;
    }

    println!("ISSUES FOUND:");
    for e in &report.errors {
        println!("  [ERROR] {}", e);
    }

    if !report.warnings.is_empty() {
        let shown = if all_warnings {
            &report.warnings[..]
        } else {
            report.displayed_warnings()
        };
        println!(
            "  [WARNING] {} potential content mismatch(es). (Showing {})",
            report.warnings.len(),
            shown.len()
        );
        for w in shown {
            println!("\n  [ID {}] Content mismatch possible:", w.id);
            println!("    Dataset   : {}...", w.dataset_excerpt);
            println!("    Transcript: {}...", w.transcript_excerpt);
        }
    }
}
