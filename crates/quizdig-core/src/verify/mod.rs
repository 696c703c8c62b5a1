use crate::model::{OptionLabel, QuestionRecord};
use crate::transcript::anchor::{AnchorCursor, LineRole};
use serde::Serialize;
use std::fmt;

/// Characters of normalized text compared between the two sources.
pub const SIGNATURE_LEN: usize = 30;

/// Characters of raw text quoted in a content warning.
pub const EXCERPT_LEN: usize = 100;

/// Content warnings shown by default; the full count is always reported.
pub const WARNING_DISPLAY_LIMIT: usize = 15;

/// A question as it first appears in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub id: u32,
    /// Rest of the opening line after `<id>.`, inline options removed.
    pub text: String,
}

/// Structural mismatch that must be fixed before the dataset is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerificationError {
    CountMismatch {
        dataset: usize,
        transcript: usize,
    },
    OrderMismatch {
        index: usize,
        dataset_id: u32,
        transcript_id: u32,
    },
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationError::CountMismatch {
                dataset,
                transcript,
            } => write!(
                f,
                "Count mismatch: dataset has {}, transcript has {}",
                dataset, transcript
            ),
            VerificationError::OrderMismatch {
                index,
                dataset_id,
                transcript_id,
            } => write!(
                f,
                "Order mismatch at index {}: dataset ID {} vs transcript ID {}",
                index, dataset_id, transcript_id
            ),
        }
    }
}

/// Same id, but the opening text differs. May be benign rewording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentWarning {
    pub id: u32,
    pub dataset_excerpt: String,
    pub transcript_excerpt: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
    pub dataset_count: usize,
    pub transcript_count: usize,
    pub errors: Vec<VerificationError>,
    pub warnings: Vec<ContentWarning>,
}

impl VerificationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The warnings shown by default.
    pub fn displayed_warnings(&self) -> &[ContentWarning] {
        let end = self.warnings.len().min(WARNING_DISPLAY_LIMIT);
        &self.warnings[..end]
    }
}

/// Derive the transcript's question sequence with the anchor rule.
///
/// This is a separate pass over the raw lines rather than a reuse of the
/// block parser's output, so a block parser bug cannot hide itself.
pub fn index_transcript(transcript: &str) -> Vec<TranscriptEntry> {
    let mut cursor = AnchorCursor::new();
    let mut entries = Vec::new();

    for line in transcript.lines() {
        let (next, role) = cursor.advance(line);
        cursor = next;
        if let LineRole::BlockStart(id) = role {
            let text = line
                .split_once('.')
                .map(|(_, rest)| strip_inline_options(rest.trim()))
                .unwrap_or_default();
            entries.push(TranscriptEntry {
                id,
                text: text.to_string(),
            });
        }
    }

    entries
}

/// Lowercase, keep ASCII alphanumerics, truncate to [`SIGNATURE_LEN`].
pub fn normalized_prefix(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(SIGNATURE_LEN)
        .collect()
}

/// Compare a dataset against the transcript it should have come from.
pub fn verify(dataset: &[QuestionRecord], transcript: &str) -> VerificationReport {
    let mut entries = index_transcript(transcript);
    let mut records: Vec<&QuestionRecord> = dataset.iter().collect();

    let mut report = VerificationReport {
        dataset_count: records.len(),
        transcript_count: entries.len(),
        ..Default::default()
    };

    if records.len() != entries.len() {
        report.errors.push(VerificationError::CountMismatch {
            dataset: records.len(),
            transcript: entries.len(),
        });
    }

    records.sort_by_key(|q| q.id);
    entries.sort_by_key(|e| e.id);

    for (index, (record, entry)) in records.iter().zip(entries.iter()).enumerate() {
        if record.id != entry.id {
            report.errors.push(VerificationError::OrderMismatch {
                index,
                dataset_id: record.id,
                transcript_id: entry.id,
            });
            continue;
        }

        if normalized_prefix(&record.question) != normalized_prefix(&entry.text) {
            report.warnings.push(ContentWarning {
                id: record.id,
                dataset_excerpt: excerpt(&record.question),
                transcript_excerpt: excerpt(&entry.text),
            });
        }
    }

    tracing::info!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "verification finished"
    );

    report
}

/// Cut options written on the same line off a question, so
/// `"Which port? A. 21 B. 22"` becomes `"Which port?"`.
///
/// Options are peeled from the right starting at the highest label present.
/// At least `A.` and `B.` must be found in order; a lone `" A. "` in prose
/// is left alone.
pub fn strip_inline_options(line: &str) -> &str {
    for last in (OptionLabel::B.index()..OptionLabel::ALL.len()).rev() {
        if let Some(question) = peel_options(line, &OptionLabel::ALL[..=last]) {
            return question;
        }
    }
    line
}

fn peel_options<'a>(line: &'a str, labels: &[OptionLabel]) -> Option<&'a str> {
    let mut remainder = line;
    for label in labels.iter().rev() {
        let idx = remainder.rfind(label.delimiter())?;
        remainder = &remainder[..idx];
    }
    Some(remainder.trim_end())
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_LEN).collect()
}
