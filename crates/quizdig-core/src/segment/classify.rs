use crate::model::OptionLabel;
use regex::Regex;
use std::sync::LazyLock;

static QUESTION_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s*").expect("question start pattern"));

static OPTION_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-D])\.\s*").expect("option start pattern"));

/// What a fragment's leading token says about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `<n>. ...` with the prefix removed.
    QuestionStart { id: u32, rest: &'a str },
    /// `<A-D>. ...` with the prefix removed.
    OptionStart { label: OptionLabel, rest: &'a str },
    Continuation,
}

pub fn classify_line(text: &str) -> LineKind<'_> {
    if let Some(caps) = QUESTION_START.captures(text) {
        // Ids are positive; "0." or an overflowing number reads as prose.
        if let Some(id) = caps[1].parse::<u32>().ok().filter(|&id| id > 0) {
            let prefix_len = caps.get(0).map_or(0, |m| m.end());
            return LineKind::QuestionStart {
                id,
                rest: text[prefix_len..].trim(),
            };
        }
        return LineKind::Continuation;
    }

    if let Some(caps) = OPTION_START.captures(text) {
        let label = caps[1].chars().next().and_then(OptionLabel::from_char);
        if let Some(label) = label {
            let prefix_len = caps.get(0).map_or(0, |m| m.end());
            return LineKind::OptionStart {
                label,
                rest: text[prefix_len..].trim(),
            };
        }
    }

    LineKind::Continuation
}
