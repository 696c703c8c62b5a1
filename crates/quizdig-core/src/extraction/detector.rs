use crate::extraction::html::has_class;
use crate::extraction::FragmentMarkup;
use crate::profile::schema::ExtractionProfile;

/// Decides whether a fragment carries the "this is the correct answer" mark.
pub trait CorrectMarkDetector: Send + Sync {
    fn is_marked(&self, fragment: &FragmentMarkup) -> bool;
}

impl<F> CorrectMarkDetector for F
where
    F: Fn(&FragmentMarkup) -> bool + Send + Sync,
{
    fn is_marked(&self, fragment: &FragmentMarkup) -> bool {
        self(fragment)
    }
}

/// Marks fragments rendered in a given foreground colour.
///
/// The converter emits the colour either as an inline `color:` declaration
/// (on the fragment or one of its runs) or through a run class, so both are
/// checked. A single matching run marks the whole fragment.
#[derive(Debug, Clone)]
pub struct ColorClassDetector {
    color: String,
    classes: Vec<String>,
}

impl ColorClassDetector {
    pub fn new(color: impl Into<String>, classes: Vec<String>) -> Self {
        ColorClassDetector {
            color: color.into(),
            classes,
        }
    }

    pub fn from_profile(profile: &ExtractionProfile) -> Self {
        Self::new(profile.correct_color.clone(), profile.correct_classes.clone())
    }
}

impl CorrectMarkDetector for ColorClassDetector {
    fn is_marked(&self, fragment: &FragmentMarkup) -> bool {
        declares_color(&fragment.style, &self.color)
            || fragment.runs.iter().any(|run| {
                declares_color(&run.style, &self.color)
                    || self.classes.iter().any(|c| has_class(&run.class, c))
            })
    }
}

/// True if an inline style sets `color` to `hex`, with or without spacing
/// around the colon.
fn declares_color(style: &str, hex: &str) -> bool {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .any(|(prop, value)| {
            let value = value.trim();
            let value = value
                .strip_suffix("!important")
                .map(str::trim_end)
                .unwrap_or(value);
            prop.trim().eq_ignore_ascii_case("color") && value.eq_ignore_ascii_case(hex)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::RunMarkup;

    fn detector() -> ColorClassDetector {
        ColorClassDetector::new("#FF0000", vec!["pdf24_16".into(), "pdf24_127".into()])
    }

    fn run(class: &str, style: &str) -> RunMarkup {
        RunMarkup {
            class: class.into(),
            style: style.into(),
            text: "x".into(),
        }
    }

    #[test]
    fn test_fragment_style_marks() {
        let f = FragmentMarkup {
            style: "top:1em;color: #FF0000".into(),
            ..Default::default()
        };
        assert!(detector().is_marked(&f));
    }

    #[test]
    fn test_run_style_unspaced_and_lowercase() {
        let f = FragmentMarkup {
            runs: vec![run("pdf24_10", ""), run("pdf24_10", "color:#ff0000")],
            ..Default::default()
        };
        assert!(detector().is_marked(&f));
    }

    #[test]
    fn test_run_class_marks() {
        let f = FragmentMarkup {
            runs: vec![run("pdf24_ pdf24_127", "")],
            ..Default::default()
        };
        assert!(detector().is_marked(&f));
    }

    #[test]
    fn test_class_prefix_does_not_mark() {
        let f = FragmentMarkup {
            runs: vec![run("pdf24_160", "")],
            ..Default::default()
        };
        assert!(!detector().is_marked(&f));
    }

    #[test]
    fn test_other_colors_do_not_mark() {
        let f = FragmentMarkup {
            style: "color:#000000".into(),
            runs: vec![run("pdf24_10", "background-color:#FF0000")],
            ..Default::default()
        };
        assert!(!detector().is_marked(&f));
    }

    #[test]
    fn test_closure_detector() {
        let by_text = |f: &FragmentMarkup| f.text().ends_with('*');
        let f = FragmentMarkup {
            content: "B. Nmap *".into(),
            ..Default::default()
        };
        assert!(by_text.is_marked(&f));
    }
}
