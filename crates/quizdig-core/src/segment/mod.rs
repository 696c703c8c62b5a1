pub mod classify;

use crate::dataset::dedup_by_first_id;
use crate::extraction::PositionedFragment;
use crate::model::{OptionLabel, OptionRecord, PipelineWarning, QuestionRecord};
use classify::{classify_line, LineKind};
use serde::Serialize;

/// Which field continuation text is appended to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SegmentState {
    #[default]
    Idle,
    InQuestion,
    InOption,
}

/// Everything the segmenter carries between fragments.
///
/// Each call to [`SegmentAccumulator::step`] consumes the accumulator and
/// returns the next one, so a single transition can be tested by building
/// an accumulator by hand.
#[derive(Debug, Clone, Default)]
pub struct SegmentAccumulator {
    pub state: SegmentState,
    /// Question currently being assembled. `Some` whenever state is not `Idle`.
    pub open: Option<QuestionRecord>,
    pub emitted: Vec<QuestionRecord>,
    pub warnings: Vec<PipelineWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentOutcome {
    pub questions: Vec<QuestionRecord>,
    pub warnings: Vec<PipelineWarning>,
}

/// Segment an ordered, flag-annotated fragment stream into questions.
///
/// Boilerplate must already be filtered out.
pub fn segment<'a, I>(fragments: I) -> SegmentOutcome
where
    I: IntoIterator<Item = &'a PositionedFragment>,
{
    fragments
        .into_iter()
        .fold(SegmentAccumulator::default(), |acc, f| {
            acc.step(&f.text, f.marked_correct)
        })
        .finish()
}

impl SegmentAccumulator {
    /// Apply one fragment.
    pub fn step(mut self, text: &str, marked_correct: bool) -> Self {
        match classify_line(text) {
            LineKind::QuestionStart { id, rest } => match self.open.as_ref().map(|q| q.id) {
                // A smaller number inside an open question is a numbered
                // sub-list, not a new question.
                Some(open_id) if id < open_id => {
                    tracing::debug!(open_id, id, "treating numbered line as sub-list");
                    self.append(text, marked_correct);
                }
                _ => {
                    self.flush();
                    self.open = Some(QuestionRecord::new(id, rest));
                    self.state = SegmentState::InQuestion;
                }
            },
            LineKind::OptionStart { label, rest } => {
                if let Some(open) = self.open.as_mut() {
                    open.options.push(OptionRecord {
                        label,
                        text: rest.to_string(),
                        is_correct: marked_correct,
                    });
                    if marked_correct {
                        set_answer(open, label, &mut self.warnings);
                    }
                    self.state = SegmentState::InOption;
                } else {
                    tracing::debug!(text, "option line before any question, ignored");
                }
            }
            LineKind::Continuation => self.append(text, marked_correct),
        }
        self
    }

    /// Flush the open question and deduplicate by id.
    pub fn finish(mut self) -> SegmentOutcome {
        self.flush();

        let (questions, dropped) = dedup_by_first_id(self.emitted);
        for id in dropped {
            tracing::warn!(id, "duplicate question id, later occurrence discarded");
            self.warnings.push(PipelineWarning::for_question(
                id,
                "duplicate id; later occurrence discarded",
            ));
        }

        SegmentOutcome {
            questions,
            warnings: self.warnings,
        }
    }

    fn append(&mut self, text: &str, marked_correct: bool) {
        let Some(open) = self.open.as_mut() else {
            return;
        };
        match self.state {
            SegmentState::InQuestion => push_text(&mut open.question, text),
            SegmentState::InOption => {
                let Some(option) = open.options.last_mut() else {
                    return;
                };
                push_text(&mut option.text, text);
                // Colour may sit on a later line of a multi-line option.
                if marked_correct {
                    option.is_correct = true;
                    let label = option.label;
                    set_answer(open, label, &mut self.warnings);
                }
            }
            SegmentState::Idle => {}
        }
    }

    fn flush(&mut self) {
        self.state = SegmentState::Idle;
        let Some(mut question) = self.open.take() else {
            return;
        };

        question.options.sort_by_key(|o| o.label);

        if question.question.is_empty() {
            self.warn(question.id, "question text is empty".to_string());
        }
        if question.options.len() != OptionLabel::ALL.len() {
            self.warn(
                question.id,
                format!("expected 4 options, found {}", question.options.len()),
            );
        }
        if question
            .options
            .windows(2)
            .any(|pair| pair[0].label == pair[1].label)
        {
            self.warn(question.id, "duplicate option labels".to_string());
        }

        self.emitted.push(question);
    }

    fn warn(&mut self, id: u32, reason: String) {
        tracing::warn!(id, "{}", reason);
        self.warnings.push(PipelineWarning::for_question(id, reason));
    }
}

fn set_answer(question: &mut QuestionRecord, label: OptionLabel, warnings: &mut Vec<PipelineWarning>) {
    if let Some(previous) = question.answer.filter(|&p| p != label) {
        let reason = format!(
            "options {} and {} are both marked correct; keeping {}",
            previous, label, label
        );
        tracing::warn!(id = question.id, "{}", reason);
        warnings.push(PipelineWarning::for_question(question.id, reason));
    }
    question.answer = Some(label);
}

fn push_text(target: &mut String, text: &str) {
    if target.is_empty() {
        target.push_str(text);
    } else {
        target.push(' ');
        target.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[(&str, bool)]) -> SegmentOutcome {
        lines
            .iter()
            .fold(SegmentAccumulator::default(), |acc, (text, marked)| {
                acc.step(text, *marked)
            })
            .finish()
    }

    fn plain(lines: &[&str]) -> SegmentOutcome {
        let marked: Vec<(&str, bool)> = lines.iter().map(|l| (*l, false)).collect();
        run(&marked)
    }

    #[test]
    fn test_happy_path() {
        let out = run(&[
            ("5. What is X?", false),
            ("A. one", false),
            ("B. two", false),
            ("C. three", true),
            ("D. four", false),
        ]);

        assert_eq!(out.questions.len(), 1);
        let q = &out.questions[0];
        assert_eq!(q.id, 5);
        assert_eq!(q.question, "What is X?");
        assert_eq!(q.answer, Some(OptionLabel::C));
        let labels: Vec<OptionLabel> = q.options.iter().map(|o| o.label).collect();
        assert_eq!(labels, OptionLabel::ALL.to_vec());
        assert_eq!(q.correct_count(), 1);
        assert!(q.options[2].is_correct);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_sub_list_absorbed_into_question() {
        let out = plain(&[
            "5. Steps: ",
            "1. first",
            "2. second",
            "A. opt1",
            "B. opt2",
            "C. opt3",
            "D. opt4",
        ]);

        assert_eq!(out.questions.len(), 1);
        assert_eq!(out.questions[0].id, 5);
        assert!(out.questions[0].question.contains("1. first 2. second"));
        assert!(out.questions.iter().all(|q| q.id != 1 && q.id != 2));
    }

    #[test]
    fn test_sub_list_inside_option_goes_to_option() {
        let out = run(&[
            ("9. Order the phases", false),
            ("A. Either", false),
            ("1. recon", true),
            ("B. b", false),
            ("C. c", false),
            ("D. d", false),
        ]);
        let q = &out.questions[0];
        assert_eq!(q.options[0].text, "Either 1. recon");
        assert!(q.options[0].is_correct);
        assert_eq!(q.answer, Some(OptionLabel::A));
    }

    #[test]
    fn test_marked_continuation_marks_option() {
        let out = run(&[
            ("3. Question", false),
            ("A. first line", false),
            ("second line", true),
            ("B. b", false),
            ("C. c", false),
            ("D. d", false),
        ]);
        let q = &out.questions[0];
        assert_eq!(q.options[0].text, "first line second line");
        assert!(q.options[0].is_correct);
        assert_eq!(q.answer, Some(OptionLabel::A));
    }

    #[test]
    fn test_marked_question_continuation_does_not_set_answer() {
        let out = run(&[("3. Question", false), ("more prose", true)]);
        assert_eq!(out.questions[0].question, "Question more prose");
        assert_eq!(out.questions[0].answer, None);
    }

    #[test]
    fn test_consecutive_questions_flush() {
        let out = plain(&[
            "1. First?", "A. a", "B. b", "C. c", "D. d", "2. Second?", "A. a", "B. b", "C. c",
            "D. d",
        ]);
        let ids: Vec<u32> = out.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let out = plain(&[
            "4. Original", "A. a", "B. b", "C. c", "D. d", "4. Repeat", "A. a", "B. b", "C. c",
            "D. d", "4. Again",
        ]);
        assert_eq!(out.questions.len(), 1);
        assert_eq!(out.questions[0].question, "Original");
        let dup_warnings = out
            .warnings
            .iter()
            .filter(|w| w.reason.contains("duplicate id"))
            .count();
        assert_eq!(dup_warnings, 2);
    }

    #[test]
    fn test_options_sorted_into_label_order() {
        let out = plain(&["6. Q", "B. b", "A. a", "D. d", "C. c"]);
        let texts: Vec<&str> = out.questions[0]
            .options
            .iter()
            .map(|o| o.text.as_str())
            .collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_lines_before_first_question_ignored() {
        let out = plain(&["Intro text", "A. stray", "1. Real?", "A. a"]);
        assert_eq!(out.questions.len(), 1);
        assert_eq!(out.questions[0].question, "Real?");
        assert_eq!(out.questions[0].options.len(), 1);
    }

    #[test]
    fn test_short_option_list_warns() {
        let out = plain(&["7. Q", "A. a", "B. b"]);
        assert!(out
            .warnings
            .iter()
            .any(|w| w.question_id == Some(7) && w.reason.contains("expected 4 options")));
    }

    #[test]
    fn test_second_marked_option_warns_and_wins() {
        let out = run(&[
            ("2. Q", false),
            ("A. a", true),
            ("B. b", true),
            ("C. c", false),
            ("D. d", false),
        ]);
        let q = &out.questions[0];
        assert_eq!(q.answer, Some(OptionLabel::B));
        assert_eq!(q.correct_count(), 2);
        assert!(out.warnings.iter().any(|w| w.reason.contains("both marked")));
    }

    #[test]
    fn test_single_transition_from_hand_built_state() {
        let mut open = QuestionRecord::new(10, "Q");
        open.options.push(OptionRecord {
            label: OptionLabel::A,
            text: "a".into(),
            is_correct: false,
        });
        let acc = SegmentAccumulator {
            state: SegmentState::InOption,
            open: Some(open),
            ..Default::default()
        };

        let acc = acc.step("tail", true);
        assert_eq!(acc.state, SegmentState::InOption);
        let open = acc.open.as_ref().unwrap();
        assert_eq!(open.options[0].text, "a tail");
        assert_eq!(open.answer, Some(OptionLabel::A));

        let acc = acc.step("11. Next", false);
        assert_eq!(acc.state, SegmentState::InQuestion);
        assert_eq!(acc.emitted.len(), 1);
        assert_eq!(acc.open.as_ref().unwrap().id, 11);
    }

    #[test]
    fn test_segment_reads_fragments() {
        let frags: Vec<PositionedFragment> = [("1. Q", false), ("A. a", true)]
            .iter()
            .map(|(t, m)| PositionedFragment {
                top: Default::default(),
                left: Default::default(),
                text: t.to_string(),
                marked_correct: *m,
                markup: String::new(),
            })
            .collect();
        let out = segment(&frags);
        assert_eq!(out.questions[0].answer, Some(OptionLabel::A));
    }
}
