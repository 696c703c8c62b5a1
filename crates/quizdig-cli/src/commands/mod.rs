pub mod extract;
pub mod layout;
pub mod merge;
pub mod profile;
pub mod verify;

use quizdig_core::error::QuizdigError;
use quizdig_core::profile::builtin;
use quizdig_core::profile::schema::ExtractionProfile;
use std::path::PathBuf;

/// Pick the profile from `--profile`, `--preset`, or the default preset.
pub fn resolve_profile(
    preset: Option<String>,
    profile: Option<PathBuf>,
) -> Result<ExtractionProfile, QuizdigError> {
    let resolved = match (profile, preset) {
        (Some(path), _) => quizdig_core::profile::load_profile(&path)?,
        (None, Some(name)) => builtin::load_preset(&name)?,
        (None, None) => builtin::load_preset(builtin::DEFAULT_PRESET)?,
    };
    tracing::debug!(profile = %resolved.name, version = %resolved.version, "using profile");
    Ok(resolved)
}
