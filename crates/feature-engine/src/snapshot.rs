//! Feature Snapshot

use crate::FeatureError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One time-indexed set of named building features.
///
/// Snapshots are plain values: scenario rules and recomputation take a
/// reference and hand back a new snapshot, so a baseline can be reused across
/// any number of evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    timestamp: NaiveDateTime,
    values: BTreeMap<String, f64>,
}

impl FeatureSnapshot {
    /// Create an empty snapshot at the given time
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
        }
    }

    /// Build a snapshot from `(name, value)` pairs
    pub fn from_values<I, K>(timestamp: NaiveDateTime, values: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            timestamp,
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Get a feature that must be present
    pub fn require(&self, name: &str) -> Result<f64, FeatureError> {
        self.get(name)
            .ok_or_else(|| FeatureError::MissingFeature(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Insert or overwrite a feature value
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Extract features in exactly the order given.
    pub fn select(&self, names: &[&str]) -> Result<Vec<f64>, FeatureError> {
        names.iter().map(|name| self.require(name)).collect()
    }

    /// Names from `names` that this snapshot does not carry
    pub fn missing<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
