pub mod anchor;
pub mod block;

use crate::model::{AnswerKey, PipelineWarning, QuestionRecord};
use anchor::{AnchorCursor, LineRole};
use block::{parse_block, TranscriptBlock};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    pub questions: Vec<QuestionRecord>,
    pub warnings: Vec<PipelineWarning>,
}

/// Group transcript lines into blocks under the anchor rule.
///
/// Lines before the first block are discarded. The returned cursor can be
/// fed back in to continue over more lines.
pub fn split_blocks<'a, I>(lines: I, cursor: AnchorCursor) -> (Vec<TranscriptBlock<'a>>, AnchorCursor)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut blocks: Vec<TranscriptBlock<'a>> = Vec::new();
    let mut cursor = cursor;

    for line in lines {
        let (next, role) = cursor.advance(line);
        cursor = next;
        match role {
            LineRole::BlockStart(id) => blocks.push(TranscriptBlock {
                id,
                lines: vec![line],
            }),
            LineRole::Continuation => {
                if let Some(open) = blocks.last_mut() {
                    open.lines.push(line);
                }
            }
        }
    }

    (blocks, cursor)
}

/// Rebuild question records from the transcript, taking correctness from
/// `answers`. Blocks that cannot be split are dropped with a warning.
pub fn merge(transcript: &str, answers: &AnswerKey) -> MergeOutcome {
    let (blocks, _) = split_blocks(transcript.lines(), AnchorCursor::new());

    let mut questions = Vec::with_capacity(blocks.len());
    let mut warnings = Vec::new();

    for block in &blocks {
        match parse_block(block, answers) {
            Ok(question) => {
                if question.answer.is_none() {
                    tracing::warn!(id = question.id, "no answer key entry");
                    warnings.push(PipelineWarning::for_question(
                        question.id,
                        "no answer key entry; no option marked correct",
                    ));
                }
                questions.push(question);
            }
            Err(issue) => {
                tracing::warn!(id = block.id, "dropping transcript block: {}", issue);
                warnings.push(PipelineWarning::for_question(block.id, issue.to_string()));
            }
        }
    }

    let parsed: BTreeSet<u32> = blocks.iter().map(|b| b.id).collect();
    let orphaned: Vec<String> = answers
        .keys()
        .filter(|id| !parsed.contains(id))
        .map(|id| id.to_string())
        .collect();
    if !orphaned.is_empty() {
        tracing::warn!(count = orphaned.len(), "answer key ids missing from transcript");
        warnings.push(PipelineWarning::general(format!(
            "answer key ids with no transcript block: {}",
            orphaned.join(", ")
        )));
    }

    tracing::info!(
        blocks = blocks.len(),
        questions = questions.len(),
        "merged transcript"
    );

    MergeOutcome {
        questions,
        warnings,
    }
}
