use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn from_char(c: char) -> Option<OptionLabel> {
        match c {
            'A' => Some(OptionLabel::A),
            'B' => Some(OptionLabel::B),
            'C' => Some(OptionLabel::C),
            'D' => Some(OptionLabel::D),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            OptionLabel::A => 0,
            OptionLabel::B => 1,
            OptionLabel::C => 2,
            OptionLabel::D => 3,
        }
    }

    /// Inline delimiter used by transcripts, e.g. `" C. "`.
    pub fn delimiter(self) -> &'static str {
        match self {
            OptionLabel::A => " A. ",
            OptionLabel::B => " B. ",
            OptionLabel::C => " C. ",
            OptionLabel::D => " D. ",
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub label: OptionLabel,
    pub text: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// One reconstructed multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: u32,
    pub question: String,
    pub options: Vec<OptionRecord>,
    /// Label of the correct option, `null` when no correct mark was found.
    pub answer: Option<OptionLabel>,
}

impl QuestionRecord {
    pub fn new(id: u32, question: impl Into<String>) -> Self {
        QuestionRecord {
            id,
            question: question.into(),
            options: Vec::new(),
            answer: None,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }
}

/// Map from question id to correct label.
pub type AnswerKey = BTreeMap<u32, OptionLabel>;

/// A record-level problem that did not abort the stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineWarning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<u32>,
    pub reason: String,
}

impl PipelineWarning {
    pub fn for_question(id: u32, reason: impl Into<String>) -> Self {
        PipelineWarning {
            question_id: Some(id),
            reason: reason.into(),
        }
    }

    pub fn general(reason: impl Into<String>) -> Self {
        PipelineWarning {
            question_id: None,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.question_id {
            Some(id) => write!(f, "[ID {}] {}", id, self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_serializes_with_camel_case_flag() {
        let mut q = QuestionRecord::new(3, "What is Y?");
        q.options.push(OptionRecord {
            label: OptionLabel::B,
            text: "bar".into(),
            is_correct: true,
        });
        q.answer = Some(OptionLabel::B);

        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["answer"], "B");
        assert_eq!(json["options"][0]["label"], "B");
        assert_eq!(json["options"][0]["isCorrect"], true);
    }

    #[test]
    fn test_missing_answer_serializes_as_null() {
        let q = QuestionRecord::new(1, "Q");
        let json = serde_json::to_value(&q).unwrap();
        assert!(json["answer"].is_null());
    }

    #[test]
    fn test_label_from_char() {
        assert_eq!(OptionLabel::from_char('C'), Some(OptionLabel::C));
        assert_eq!(OptionLabel::from_char('E'), None);
        assert_eq!(OptionLabel::from_char('a'), None);
    }
}
