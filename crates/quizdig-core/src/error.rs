use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum QuizdigError {
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write dataset to {path}: {reason}")]
    WriteDataset { path: PathBuf, reason: String },

    #[error("malformed markup at byte {position}: {reason}")]
    Markup { position: u64, reason: String },

    #[error("no page containers with class '{0}' found in document")]
    NoPages(String),

    #[error("no question records found: {0}")]
    NoQuestions(String),

    #[error("failed to load profile from {path}: {reason}")]
    ProfileLoad { path: PathBuf, reason: String },

    #[error("invalid profile: {0}")]
    ProfileInvalid(String),

    #[error("verification found {0} hard error(s)")]
    VerificationFailed(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
