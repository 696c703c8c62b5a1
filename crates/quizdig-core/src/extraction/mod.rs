pub mod detector;
pub mod html;
pub mod layout;
pub mod reading_order;

use crate::error::QuizdigError;
use crate::profile::schema::ExtractionProfile;
use detector::CorrectMarkDetector;
use rust_decimal::Decimal;

/// An inline run (`<span>`) nested inside a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMarkup {
    pub class: String,
    pub style: String,
    pub text: String,
}

/// A fragment as scanned from markup, before correctness detection.
#[derive(Debug, Clone, Default)]
pub struct FragmentMarkup {
    pub top: Decimal,
    pub left: Decimal,
    pub style: String,
    pub runs: Vec<RunMarkup>,
    /// All text of the fragment in document order, runs included.
    pub content: String,
    /// Inner markup, kept for diagnostics.
    pub markup: String,
}

impl FragmentMarkup {
    /// Fragment text with whitespace collapsed.
    pub fn text(&self) -> String {
        collapse_ws(&self.content)
    }
}

/// Fragments of one page container, in source order.
#[derive(Debug, Clone)]
pub struct PageMarkup {
    pub page_number: usize,
    pub fragments: Vec<FragmentMarkup>,
}

/// A text fragment with its position and correct-answer flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedFragment {
    pub top: Decimal,
    pub left: Decimal,
    pub text: String,
    pub marked_correct: bool,
    pub markup: String,
}

/// Scan the document and return every non-empty fragment in reading order.
///
/// Pages are ordered independently and concatenated in document order.
pub fn extract_fragments(
    html: &str,
    profile: &ExtractionProfile,
    detector: &dyn CorrectMarkDetector,
) -> Result<Vec<PositionedFragment>, QuizdigError> {
    let pages = html::scan_pages(html, &profile.page_class, &profile.fragment_class)?;

    if pages.is_empty() {
        return Err(QuizdigError::NoPages(profile.page_class.clone()));
    }

    let mut fragments = Vec::new();
    for page in pages {
        let positioned: Vec<PositionedFragment> = page
            .fragments
            .into_iter()
            .filter_map(|f| {
                let text = f.text();
                if text.is_empty() {
                    return None;
                }
                let marked_correct = detector.is_marked(&f);
                Some(PositionedFragment {
                    top: f.top,
                    left: f.left,
                    text,
                    marked_correct,
                    markup: f.markup,
                })
            })
            .collect();

        tracing::debug!(
            page = page.page_number,
            fragments = positioned.len(),
            "scanned page"
        );
        fragments.extend(reading_order::order_page(
            positioned,
            profile.line_tolerance_em,
        ));
    }

    Ok(fragments)
}

pub(crate) fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_text_collapses_whitespace() {
        let f = FragmentMarkup {
            content: "\n  12. Which \t  port?\n".into(),
            ..Default::default()
        };
        assert_eq!(f.text(), "12. Which port?");
    }

    #[test]
    fn test_fragment_text_ignores_run_split() {
        let f = FragmentMarkup {
            runs: vec![RunMarkup {
                text: "A.".into(),
                ..Default::default()
            }],
            content: "A. SSH".into(),
            ..Default::default()
        };
        assert_eq!(f.text(), "A. SSH");
    }
}
