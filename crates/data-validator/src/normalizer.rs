//! Fitted Feature Scalers
//!
//! Each model was trained on scaled inputs; the scaler parameters are fitted
//! offline and loaded with the model. Both supported methods reduce to
//! `(x - offset) / scale` per column.

use crate::ValidationError;
use serde::{Deserialize, Serialize};

/// Normalization method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizationMethod {
    /// Z-score normalization: offset is the column mean, scale its std dev
    ZScore,
    /// Min-max normalization to [0, 1]: offset is the column min, scale its range
    MinMax,
    /// No normalization
    None,
}

/// Serialized scaler parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NormalizerParams {
    method: NormalizationMethod,
    #[serde(default)]
    offsets: Vec<f64>,
    #[serde(default)]
    scales: Vec<f64>,
    #[serde(default)]
    width: Option<usize>,
}

/// Column-wise fitted scaler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NormalizerParams", into = "NormalizerParams")]
pub struct Normalizer {
    method: NormalizationMethod,
    offsets: Vec<f64>,
    scales: Vec<f64>,
}

impl Normalizer {
    /// Z-score scaler from fitted column means and standard deviations
    pub fn z_score(mean: Vec<f64>, std_dev: Vec<f64>) -> Result<Self, ValidationError> {
        Self::fitted(NormalizationMethod::ZScore, mean, std_dev)
    }

    /// Min-max scaler from fitted column minima and maxima
    pub fn min_max(min: Vec<f64>, max: Vec<f64>) -> Result<Self, ValidationError> {
        if min.len() != max.len() {
            return Err(ValidationError::WidthMismatch {
                expected: min.len(),
                actual: max.len(),
            });
        }
        let range = min.iter().zip(&max).map(|(lo, hi)| hi - lo).collect();
        Self::fitted(NormalizationMethod::MinMax, min, range)
    }

    /// Pass-through scaler of the given width
    pub fn identity(width: usize) -> Self {
        Self {
            method: NormalizationMethod::None,
            offsets: vec![0.0; width],
            scales: vec![1.0; width],
        }
    }

    fn fitted(
        method: NormalizationMethod,
        offsets: Vec<f64>,
        scales: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        if offsets.len() != scales.len() {
            return Err(ValidationError::WidthMismatch {
                expected: offsets.len(),
                actual: scales.len(),
            });
        }
        if let Some((i, value)) = offsets
            .iter()
            .chain(&scales)
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ValidationError::NonFinite {
                field: format!("scaler parameter {i}"),
                value: *value,
            });
        }

        // Constant columns were fitted with zero spread; sklearn divides by 1
        let scales = scales
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self {
            method,
            offsets,
            scales,
        })
    }

    pub fn method(&self) -> NormalizationMethod {
        self.method
    }

    /// Number of columns this scaler was fitted on
    pub fn width(&self) -> usize {
        self.offsets.len()
    }

    /// Scale one row
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ValidationError> {
        if values.len() != self.width() {
            return Err(ValidationError::WidthMismatch {
                expected: self.width(),
                actual: values.len(),
            });
        }

        if self.method == NormalizationMethod::None {
            return Ok(values.to_vec());
        }

        Ok(values
            .iter()
            .zip(self.offsets.iter().zip(&self.scales))
            .map(|(x, (offset, scale))| (x - offset) / scale)
            .collect())
    }
}

impl TryFrom<NormalizerParams> for Normalizer {
    type Error = ValidationError;

    fn try_from(params: NormalizerParams) -> Result<Self, Self::Error> {
        match params.method {
            NormalizationMethod::None => {
                let width = params.width.unwrap_or(params.offsets.len());
                Ok(Self::identity(width))
            }
            method => Self::fitted(method, params.offsets, params.scales),
        }
    }
}

impl From<Normalizer> for NormalizerParams {
    fn from(n: Normalizer) -> Self {
        Self {
            width: Some(n.width()),
            method: n.method,
            offsets: n.offsets,
            scales: n.scales,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zscore_normalization() {
        let norm = Normalizer::z_score(vec![10.0, 0.0], vec![2.0, 0.5]).unwrap();

        let result = norm.transform(&[14.0, -1.0]).unwrap();
        assert_eq!(result, vec![2.0, -2.0]);
    }

    #[test]
    fn test_minmax_normalization() {
        let norm = Normalizer::min_max(vec![0.0], vec![100.0]).unwrap();

        let result = norm.transform(&[50.0]).unwrap();
        assert!((result[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_scale_is_passthrough_shift() {
        let norm = Normalizer::z_score(vec![3.0], vec![0.0]).unwrap();
        assert_eq!(norm.transform(&[5.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_width_mismatch() {
        let norm = Normalizer::identity(4);
        assert_eq!(
            norm.transform(&[1.0, 2.0, 3.0]).unwrap_err(),
            ValidationError::WidthMismatch {
                expected: 4,
                actual: 3
            }
        );
        assert!(Normalizer::z_score(vec![0.0, 1.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_deserialize_from_params() {
        let raw = r#"{"method":"ZScore","offsets":[1.0,2.0],"scales":[1.0,4.0]}"#;
        let norm: Normalizer = serde_json::from_str(raw).unwrap();
        assert_eq!(norm.width(), 2);
        assert_eq!(norm.transform(&[2.0, 10.0]).unwrap(), vec![1.0, 2.0]);

        let identity: Normalizer = serde_json::from_str(r#"{"method":"None","width":4}"#).unwrap();
        assert_eq!(identity.width(), 4);

        let bad = r#"{"method":"ZScore","offsets":[1.0],"scales":[]}"#;
        assert!(serde_json::from_str::<Normalizer>(bad).is_err());
    }
}
