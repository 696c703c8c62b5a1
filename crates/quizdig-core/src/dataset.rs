use crate::error::QuizdigError;
use crate::model::{AnswerKey, PipelineWarning, QuestionRecord};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Read a dataset written by an earlier stage.
pub fn load_dataset(path: &Path) -> Result<Vec<QuestionRecord>, QuizdigError> {
    let content = std::fs::read_to_string(path).map_err(|source| QuizdigError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<QuestionRecord> = serde_json::from_str(&content)?;
    Ok(records)
}

/// Replace the dataset file as a whole.
///
/// The JSON is written to a temporary file next to `path` and then renamed
/// over it, so a reader never observes a half-written dataset.
pub fn save_dataset(path: &Path, records: &[QuestionRecord]) -> Result<(), QuizdigError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_err = |reason: String| QuizdigError::WriteDataset {
        path: path.to_path_buf(),
        reason,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    serde_json::to_writer_pretty(&mut tmp, records)?;
    tmp.write_all(b"\n")?;
    tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;
    Ok(())
}

/// Build the id -> correct label map from records that have an answer.
pub fn answer_key(records: &[QuestionRecord]) -> AnswerKey {
    records
        .iter()
        .filter_map(|q| q.answer.map(|a| (q.id, a)))
        .collect()
}

/// Keep the first record for each id. Returns the kept records and the ids
/// of every discarded later occurrence.
pub fn dedup_by_first_id(records: Vec<QuestionRecord>) -> (Vec<QuestionRecord>, Vec<u32>) {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());
    let mut dropped = Vec::new();

    for record in records {
        if seen.insert(record.id) {
            kept.push(record);
        } else {
            dropped.push(record.id);
        }
    }

    (kept, dropped)
}

/// Records a quiz front end can present: an answer is known and there is
/// at least one option to choose from.
pub fn playable(records: &[QuestionRecord]) -> Vec<&QuestionRecord> {
    records
        .iter()
        .filter(|q| q.answer.is_some() && !q.options.is_empty())
        .collect()
}

/// Flag records whose correctness marks are not exactly one option that
/// agrees with `answer`. Nothing is rejected; the caller decides.
pub fn audit_answers(records: &[QuestionRecord]) -> Vec<PipelineWarning> {
    let mut warnings = Vec::new();

    for q in records {
        let marked = q.correct_count();
        if marked == 0 && q.answer.is_none() {
            warnings.push(PipelineWarning::for_question(
                q.id,
                "no option is marked correct",
            ));
        } else if marked > 1 {
            warnings.push(PipelineWarning::for_question(
                q.id,
                format!("{} options are marked correct", marked),
            ));
        }

        if let Some(answer) = q.answer {
            let agrees = q
                .options
                .iter()
                .any(|o| o.label == answer && o.is_correct);
            if !agrees {
                warnings.push(PipelineWarning::for_question(
                    q.id,
                    format!("answer {} is not among the options marked correct", answer),
                ));
            }
        }
    }

    warnings
}
