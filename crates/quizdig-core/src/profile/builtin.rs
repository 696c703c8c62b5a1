use crate::error::QuizdigError;
use crate::profile::parse_profile_str;
use crate::profile::schema::ExtractionProfile;

const PDF24_JSON: &str = include_str!("../../../../profiles/pdf24.json");

/// Available predefined profiles.
pub const PRESETS: &[&str] = &["pdf24"];

/// Name of the preset used when neither a preset nor a profile file is given.
pub const DEFAULT_PRESET: &str = "pdf24";

/// Load a predefined profile by name.
pub fn load_preset(name: &str) -> Result<ExtractionProfile, QuizdigError> {
    match name {
        "pdf24" => parse_profile_str(PDF24_JSON),
        _ => Err(QuizdigError::ProfileInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::schema::BoilerplateRule;

    #[test]
    fn test_load_pdf24_preset() {
        let p = load_preset("pdf24").unwrap();
        assert_eq!(p.page_class, "pdf24_02");
        assert_eq!(p.fragment_class, "pdf24_01");
        assert_eq!(p.correct_classes.len(), 7);
        assert!(p
            .boilerplate
            .iter()
            .any(|r| matches!(r, BoilerplateRule::Exact { text } if text == "Mock Questions")));
    }

    #[test]
    fn test_every_listed_preset_loads() {
        for name in PRESETS {
            assert!(load_preset(name).is_ok(), "preset {name} failed to load");
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("xyz").is_err());
    }
}
