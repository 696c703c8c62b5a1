use crate::model::{AnswerKey, OptionLabel, OptionRecord, QuestionRecord};
use regex::Regex;
use std::sync::LazyLock;

static ID_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s+").expect("id prefix pattern"));

/// The lines belonging to one question in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptBlock<'a> {
    pub id: u32,
    pub lines: Vec<&'a str>,
}

/// Why a block produced no record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockIssue {
    #[error("block does not start with '<id>. '")]
    MissingIdPrefix,

    #[error("could not find option {0}")]
    MissingOption(OptionLabel),
}

/// Turn one block into a question record.
///
/// Options are peeled off from the right: the last `" D. "` first, then
/// the last `" C. "` before it, and so on down to `" A. "`. Letter tokens
/// that appear earlier in the question prose are therefore never split on.
/// Correctness comes only from `answers`.
pub fn parse_block(
    block: &TranscriptBlock<'_>,
    answers: &AnswerKey,
) -> Result<QuestionRecord, BlockIssue> {
    let joined = block.lines.join(" ");
    let joined = joined.trim();

    let prefix = ID_PREFIX.find(joined).ok_or(BlockIssue::MissingIdPrefix)?;
    let mut remainder = &joined[prefix.end()..];

    let mut texts = [""; 4];
    for label in OptionLabel::ALL.into_iter().rev() {
        let delimiter = label.delimiter();
        let idx = remainder
            .rfind(delimiter)
            .ok_or(BlockIssue::MissingOption(label))?;
        texts[label.index()] = remainder[idx + delimiter.len()..].trim();
        remainder = &remainder[..idx];
    }

    // The prefix consumed all leading whitespace, so a remainder that
    // survived the " A. " split always starts with question text.
    let question = remainder.trim();
    let answer = answers.get(&block.id).copied();
    let options = OptionLabel::ALL
        .into_iter()
        .map(|label| OptionRecord {
            label,
            text: texts[label.index()].to_string(),
            is_correct: answer == Some(label),
        })
        .collect();

    Ok(QuestionRecord {
        id: block.id,
        question: question.to_string(),
        options,
        answer,
    })
}
