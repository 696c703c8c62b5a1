use crate::extraction::PageMarkup;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::BTreeMap;

const SAMPLES_PER_COLUMN: usize = 5;
const SAMPLE_CHARS: usize = 50;

/// Fragments whose left offset falls in `[column, column + 1)` em.
#[derive(Debug, Clone, Serialize)]
pub struct LeftColumn {
    pub column: i64,
    pub count: usize,
    pub samples: Vec<String>,
}

/// Bucket every fragment by the integer part of its left offset.
///
/// Useful when tuning boilerplate rules: headers and footers usually sit
/// in columns of their own.
pub fn left_histogram(pages: &[PageMarkup]) -> Vec<LeftColumn> {
    let mut columns: BTreeMap<i64, LeftColumn> = BTreeMap::new();

    for fragment in pages.iter().flat_map(|p| p.fragments.iter()) {
        let column = fragment.left.floor().to_i64().unwrap_or_default();
        let entry = columns.entry(column).or_insert_with(|| LeftColumn {
            column,
            count: 0,
            samples: Vec::new(),
        });
        entry.count += 1;
        if entry.samples.len() < SAMPLES_PER_COLUMN {
            entry
                .samples
                .push(fragment.text().chars().take(SAMPLE_CHARS).collect());
        }
    }

    columns.into_values().collect()
}
