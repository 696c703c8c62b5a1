pub mod builtin;
pub mod filter;
pub mod schema;

use crate::error::QuizdigError;
use regex::Regex;
use rust_decimal::Decimal;
use schema::{BoilerplateRule, ExtractionProfile};
use std::path::Path;

/// Load an extraction profile from a JSON file.
pub fn load_profile(path: &Path) -> Result<ExtractionProfile, QuizdigError> {
    let content = std::fs::read_to_string(path).map_err(|e| QuizdigError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_profile(&content, path)
}

/// Parse a profile from a JSON string.
pub fn parse_profile(json: &str, source: &Path) -> Result<ExtractionProfile, QuizdigError> {
    let profile: ExtractionProfile =
        serde_json::from_str(json).map_err(|e| QuizdigError::ProfileLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Parse a profile from a JSON string (no file path context).
pub fn parse_profile_str(json: &str) -> Result<ExtractionProfile, QuizdigError> {
    let profile: ExtractionProfile = serde_json::from_str(json).map_err(QuizdigError::Json)?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Validate that a profile is well-formed.
pub fn validate_profile(profile: &ExtractionProfile) -> Result<(), QuizdigError> {
    if profile.page_class.trim().is_empty() {
        return Err(QuizdigError::ProfileInvalid(
            "page_class must not be empty".into(),
        ));
    }

    if profile.fragment_class.trim().is_empty() {
        return Err(QuizdigError::ProfileInvalid(
            "fragment_class must not be empty".into(),
        ));
    }

    if profile.page_class.split_whitespace().count() != 1
        || profile.fragment_class.split_whitespace().count() != 1
    {
        return Err(QuizdigError::ProfileInvalid(
            "page_class and fragment_class must be single class names".into(),
        ));
    }

    if !is_hex_color(&profile.correct_color) {
        return Err(QuizdigError::ProfileInvalid(format!(
            "correct_color '{}' is not a #RRGGBB hex colour",
            profile.correct_color
        )));
    }

    if profile.line_tolerance_em <= Decimal::ZERO {
        return Err(QuizdigError::ProfileInvalid(format!(
            "line_tolerance_em must be positive, got {}",
            profile.line_tolerance_em
        )));
    }

    for class in &profile.correct_classes {
        if class.trim().is_empty() || class.split_whitespace().count() != 1 {
            return Err(QuizdigError::ProfileInvalid(format!(
                "correct class '{}' must be a single class name",
                class
            )));
        }
    }

    for rule in &profile.boilerplate {
        match rule {
            BoilerplateRule::Regex { pattern } => {
                Regex::new(pattern).map_err(|e| {
                    QuizdigError::ProfileInvalid(format!(
                        "boilerplate pattern '{}' does not compile: {}",
                        pattern, e
                    ))
                })?;
            }
            BoilerplateRule::Contains { text } | BoilerplateRule::Exact { text } => {
                if text.trim().is_empty() {
                    return Err(QuizdigError::ProfileInvalid(
                        "boilerplate text must not be empty".into(),
                    ));
                }
            }
        }
    }

    Ok(())
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
