//! JSON files for moving exams between stores.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::ExamDocument;

impl ExamDocument {
    /// Save the exam as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize exam")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write exam to {}", path.display()))?;
        Ok(())
    }

    /// Load an exam from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read exam from {}", path.display()))?;
        let doc: ExamDocument =
            serde_json::from_str(&content).context("failed to parse exam JSON")?;
        Ok(doc)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<ExamDocument>),
    One(Box<ExamDocument>),
}

/// Load a file holding either one exam or an array of exams.
pub fn load_exams(path: &Path) -> Result<Vec<ExamDocument>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let parsed: OneOrMany = serde_json::from_str(&content)
        .with_context(|| format!("{} is neither an exam nor a list of exams", path.display()))?;
    Ok(match parsed {
        OneOrMany::Many(docs) => docs,
        OneOrMany::One(doc) => vec![*doc],
    })
}

/// Save several exams as one JSON array.
pub fn save_exams(docs: &[ExamDocument], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(docs).context("failed to serialize exams")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
