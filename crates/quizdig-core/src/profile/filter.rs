use crate::error::QuizdigError;
use crate::profile::schema::{BoilerplateRule, ExtractionProfile};
use regex::Regex;

/// Compiled form of a profile's boilerplate rules.
#[derive(Debug, Clone, Default)]
pub struct BoilerplateFilter {
    patterns: Vec<Regex>,
    contains: Vec<String>,
    exact: Vec<String>,
}

impl BoilerplateFilter {
    pub fn from_profile(profile: &ExtractionProfile) -> Result<Self, QuizdigError> {
        Self::from_rules(&profile.boilerplate)
    }

    pub fn from_rules(rules: &[BoilerplateRule]) -> Result<Self, QuizdigError> {
        let mut filter = BoilerplateFilter::default();
        for rule in rules {
            match rule {
                BoilerplateRule::Regex { pattern } => {
                    let re = Regex::new(pattern).map_err(|e| {
                        QuizdigError::ProfileInvalid(format!(
                            "boilerplate pattern '{}' does not compile: {}",
                            pattern, e
                        ))
                    })?;
                    filter.patterns.push(re);
                }
                BoilerplateRule::Contains { text } => filter.contains.push(text.clone()),
                BoilerplateRule::Exact { text } => filter.exact.push(text.trim().to_string()),
            }
        }
        Ok(filter)
    }

    /// True if the line is page furniture rather than question content.
    pub fn is_boilerplate(&self, text: &str) -> bool {
        let trimmed = text.trim();
        self.exact.iter().any(|e| e == trimmed)
            || self.contains.iter().any(|c| text.contains(c.as_str()))
            || self.patterns.iter().any(|re| re.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builtin::load_preset;

    #[test]
    fn test_pdf24_furniture_detected() {
        let filter = BoilerplateFilter::from_profile(&load_preset("pdf24").unwrap()).unwrap();
        assert!(filter.is_boilerplate("Page | 12"));
        assert!(filter.is_boilerplate("Mock Questions"));
        assert!(filter.is_boilerplate("Copyright © by EC-Council"));
        assert!(filter.is_boilerplate("Exam 312-50 Certified Ethical Hacker"));
    }

    #[test]
    fn test_question_text_kept() {
        let filter = BoilerplateFilter::from_profile(&load_preset("pdf24").unwrap()).unwrap();
        assert!(!filter.is_boilerplate("12. Which port does SSH use?"));
        assert!(!filter.is_boilerplate("Mock Questions are fun"));
        assert!(!filter.is_boilerplate("A. Page 12"));
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = BoilerplateFilter::default();
        assert!(!filter.is_boilerplate("Page | 1"));
    }
}
