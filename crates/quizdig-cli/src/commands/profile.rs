use quizdig_core::error::QuizdigError;
use quizdig_core::profile::builtin;
use quizdig_core::profile::schema::BoilerplateRule;
use std::path::Path;

pub fn list() -> Result<(), QuizdigError> {
    println!("Available predefined profiles:\n");
    for name in builtin::PRESETS {
        let profile = builtin::load_preset(name)?;
        println!("  {:<8} {} (v{})", name, profile.name, profile.version);
        if let Some(ref desc) = profile.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), QuizdigError> {
    let profile = builtin::load_preset(preset)?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), QuizdigError> {
    let profile = quizdig_core::profile::load_profile(file)?;

    println!("Profile '{}' (v{}) is valid.", profile.name, profile.version);
    println!(
        "  Pages: .{}  Fragments: .{}",
        profile.page_class, profile.fragment_class
    );
    println!(
        "  Correct mark: {} or classes [{}]",
        profile.correct_color,
        profile.correct_classes.join(", ")
    );
    println!("  Boilerplate rules: {}", profile.boilerplate.len());

    let mut warnings = Vec::new();
    if profile.correct_classes.is_empty() {
        warnings.push("no correct classes; only inline colour styles will mark answers".to_string());
    }
    if !profile
        .boilerplate
        .iter()
        .any(|r| matches!(r, BoilerplateRule::Regex { .. }))
    {
        warnings.push("no regex rule; page numbers may leak into question text".to_string());
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
