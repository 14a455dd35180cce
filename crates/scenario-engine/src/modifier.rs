//! Scenario Modifier
//!
//! Flat `(feature, operand)` algebra with one combination mode per spec.

use feature_engine::FeatureSnapshot;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How each operand combines with the current feature value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationMode {
    /// value += operand
    Add,
    /// value *= operand
    Multiply,
    /// The primary feature is scaled; every other listed feature is set
    MultiplySet { primary: String },
    /// value = operand
    #[default]
    Set,
}

/// One modified feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationEntry {
    pub feature: String,
    pub operand: f64,
}

/// Declarative snapshot modification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModificationSpec {
    pub mode: ModificationMode,
    pub entries: Vec<ModificationEntry>,
}

impl ModificationSpec {
    pub fn new<'a>(mode: ModificationMode, entries: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            mode,
            entries: entries
                .into_iter()
                .map(|(feature, operand)| ModificationEntry {
                    feature: feature.to_string(),
                    operand,
                })
                .collect(),
        }
    }

    /// The no-op spec
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply to a copy of `snapshot`.
    ///
    /// Features the snapshot does not carry are skipped.
    pub fn apply(&self, snapshot: &FeatureSnapshot) -> FeatureSnapshot {
        let mut modified = snapshot.clone();

        for entry in &self.entries {
            let Some(current) = modified.get(&entry.feature) else {
                trace!("Skipping {}: not in snapshot", entry.feature);
                continue;
            };

            let value = match &self.mode {
                ModificationMode::Add => current + entry.operand,
                ModificationMode::Multiply => current * entry.operand,
                ModificationMode::MultiplySet { primary } if *primary == entry.feature => {
                    current * entry.operand
                }
                ModificationMode::MultiplySet { .. } | ModificationMode::Set => entry.operand,
            };
            modified.set(entry.feature.clone(), value);
        }

        modified
    }
}
