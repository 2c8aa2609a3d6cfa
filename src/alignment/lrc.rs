use serde::{Deserialize, Serialize};

use crate::types::LineRecord;

/// Display variants attached to one transcript line by the translation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineVariants {
    #[serde(default)]
    pub romanized: String,
    #[serde(default)]
    pub translation: String,
    /// Second-pass translation; wins over `translation` when non-empty.
    #[serde(default)]
    pub refined_translation: String,
}

impl LineVariants {
    pub fn preferred_translation(&self) -> &str {
        let refined = self.refined_translation.trim();
        if refined.is_empty() {
            self.translation.trim()
        } else {
            refined
        }
    }
}

/// Renders `[mm:ss.xx]line\tromanized\ttranslation` for every timed record.
///
/// `variants` is matched to `records` by position, blank lines included.
/// Blank (skip) records produce no output line.
pub fn render_lrc(records: &[LineRecord], variants: &[LineVariants]) -> String {
    if !variants.is_empty() && variants.len() != records.len() {
        tracing::warn!(
            records = records.len(),
            variants = variants.len(),
            "lrc: variant count does not match line count; output may be misaligned"
        );
    }

    let empty = LineVariants::default();
    let mut out = Vec::with_capacity(records.len());
    for (pos, record) in records.iter().enumerate() {
        let text = record.line_text.trim();
        let Some(timestamp) = record.timestamp else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        let variant = variants.get(pos).unwrap_or(&empty);
        out.push(format!(
            "{timestamp}{text}\t{}\t{}",
            variant.romanized.trim(),
            variant.preferred_translation()
        ));
    }
    out.join("\n")
}
