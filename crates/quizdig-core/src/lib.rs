pub mod dataset;
pub mod error;
pub mod extraction;
pub mod model;
pub mod profile;
pub mod segment;
pub mod transcript;
pub mod verify;

use error::QuizdigError;
use extraction::detector::CorrectMarkDetector;
use model::{PipelineWarning, QuestionRecord};
use profile::filter::BoilerplateFilter;
use profile::schema::ExtractionProfile;
use serde::Serialize;
use std::path::Path;
use transcript::MergeOutcome;
use verify::VerificationReport;

/// Result of reconstructing questions from an HTML export.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub questions: Vec<QuestionRecord>,
    /// Fragments scanned, before boilerplate filtering.
    pub fragment_count: usize,
    /// Fragments removed as boilerplate.
    pub boilerplate_count: usize,
    pub warnings: Vec<PipelineWarning>,
}

/// Main extraction entry point: HTML export to provisional question records.
///
/// Fragments are put into reading order per page, flagged by `detector`,
/// stripped of boilerplate, and segmented into questions. Correct-answer
/// marks are audited but never rejected.
pub fn extract_questions(
    html: &str,
    profile: &ExtractionProfile,
    detector: &dyn CorrectMarkDetector,
) -> Result<Extraction, QuizdigError> {
    let fragments = extraction::extract_fragments(html, profile, detector)?;
    let filter = BoilerplateFilter::from_profile(profile)?;

    let content: Vec<_> = fragments
        .iter()
        .filter(|f| !filter.is_boilerplate(&f.text))
        .collect();
    let boilerplate_count = fragments.len() - content.len();

    let outcome = segment::segment(content);
    if outcome.questions.is_empty() {
        return Err(QuizdigError::NoQuestions(format!(
            "{} fragments scanned, none starts a numbered question",
            fragments.len()
        )));
    }

    let mut warnings = outcome.warnings;
    warnings.extend(audit(&outcome.questions));

    tracing::info!(
        fragments = fragments.len(),
        boilerplate = boilerplate_count,
        questions = outcome.questions.len(),
        "extracted questions"
    );

    Ok(Extraction {
        questions: outcome.questions,
        fragment_count: fragments.len(),
        boilerplate_count,
        warnings,
    })
}

/// Rebuild the dataset from the transcript, keeping the answers the
/// extraction stage found.
///
/// Fails when the transcript yields no records at all, so an unrelated file
/// cannot wipe the dataset.
pub fn merge_transcript(
    transcript: &str,
    dataset: &[QuestionRecord],
) -> Result<MergeOutcome, QuizdigError> {
    let answers = dataset::answer_key(dataset);
    let mut outcome = transcript::merge(transcript, &answers);

    if outcome.questions.is_empty() {
        return Err(QuizdigError::NoQuestions(
            "transcript contains no parseable question blocks".into(),
        ));
    }

    let (questions, dropped) = dataset::dedup_by_first_id(outcome.questions);
    for id in dropped {
        outcome.warnings.push(PipelineWarning::for_question(
            id,
            "duplicate id; later occurrence discarded",
        ));
    }
    outcome.warnings.extend(audit(&questions));
    outcome.questions = questions;

    Ok(outcome)
}

/// Cross-check a dataset against the transcript. Read-only.
pub fn verify_dataset(dataset: &[QuestionRecord], transcript: &str) -> VerificationReport {
    verify::verify(dataset, transcript)
}

/// Read an input document. A missing or unreadable file is fatal.
pub fn read_document(path: &Path) -> Result<String, QuizdigError> {
    std::fs::read_to_string(path).map_err(|source| QuizdigError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

fn audit(questions: &[QuestionRecord]) -> Vec<PipelineWarning> {
    let warnings = dataset::audit_answers(questions);
    for w in &warnings {
        tracing::warn!("{}", w);
    }
    warnings
}
