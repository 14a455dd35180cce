//! Snapshot Validator

use crate::error::ValidationError;
use feature_engine::{names, FeatureSnapshot};
use serde::{Deserialize, Serialize};

/// Plausible range for one feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRange {
    pub feature: String,
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    fn new(feature: &str, min: f64, max: f64) -> Self {
        Self {
            feature: feature.to_string(),
            min,
            max,
        }
    }
}

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Plausibility ranges checked on every snapshot
    pub ranges: Vec<FeatureRange>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            ranges: vec![
                FeatureRange::new(names::INDOOR_TEMP_C, -10.0, 50.0),
                FeatureRange::new(names::OUTSIDE_TEMP_C, -50.0, 60.0),
                FeatureRange::new(names::TOTAL_OCCUPANCY, 0.0, 10_000.0),
                FeatureRange::new(names::ENERGY_PRICE_USD_KWH, 0.0, 10.0),
                FeatureRange::new(names::HOUR, 0.0, 23.0),
                FeatureRange::new(names::SEASON, 0.0, 3.0),
                FeatureRange::new(names::IS_WEEKEND, 0.0, 1.0),
                FeatureRange::new(names::IS_DAYTIME, 0.0, 1.0),
            ],
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            fields_checked,
        }
    }
}

/// Validator for building feature snapshots
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Ensure every named feature is present and finite.
    ///
    /// All absent names are reported together.
    pub fn require(&self, snapshot: &FeatureSnapshot, names: &[&str]) -> Result<(), ValidationError> {
        let missing = snapshot.missing(names);
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(
                missing.into_iter().map(String::from).collect(),
            ));
        }

        for name in names {
            if let Some(value) = snapshot.get(name).filter(|v| !v.is_finite()) {
                return Err(ValidationError::NonFinite {
                    field: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Check configured plausibility ranges on the features present
    pub fn check_ranges(&self, snapshot: &FeatureSnapshot) -> ValidationResult {
        let mut checked = 0;
        let errors = self
            .config
            .ranges
            .iter()
            .filter_map(|range| {
                let value = snapshot.get(&range.feature)?;
                checked += 1;
                self.validate_range(&range.feature, value, (range.min, range.max))
                    .err()
            })
            .collect();

        ValidationResult::from_errors(errors, checked)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
