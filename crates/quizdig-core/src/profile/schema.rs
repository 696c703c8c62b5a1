use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Describes the markup conventions of one family of HTML exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionProfile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Class carried by each page container.
    pub page_class: String,
    /// Class carried by each absolutely positioned text fragment.
    pub fragment_class: String,
    /// Foreground colour that marks the correct option, e.g. "#FF0000".
    pub correct_color: String,
    /// Run classes known to render in the correct-answer colour.
    #[serde(default)]
    pub correct_classes: Vec<String>,
    /// Maximum vertical distance (em) between fragments on one visual line.
    #[serde(default = "default_line_tolerance")]
    pub line_tolerance_em: Decimal,
    /// Lines removed before segmentation (page numbers, footers, titles).
    #[serde(default)]
    pub boilerplate: Vec<BoilerplateRule>,
}

fn default_line_tolerance() -> Decimal {
    Decimal::new(5, 1)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoilerplateRule {
    /// Regular expression matched against the fragment text.
    Regex { pattern: String },
    /// Substring anywhere in the fragment text.
    Contains { text: String },
    /// Whole fragment text after trimming.
    Exact { text: String },
}
