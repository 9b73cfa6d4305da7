use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use crate::ml::features::FeatureVector;

#[derive(Serialize)]
struct PredictRequest<'a> {
    features: &'a [f64],
    feature_names: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct MlPrediction {
    pub predicted_value: f64,
    pub confidence: f64,
}

/// Thin client for the external model service. Every failure mode
/// (timeout, connection, non-2xx, bad payload) surfaces as an error the
/// caller converts into a formula fallback.
pub struct MlServiceClient {
    http: reqwest::Client,
    base_url: String,
    deadline: Duration,
}

impl MlServiceClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            deadline: Duration::from_millis(timeout_ms),
        }
    }

    pub async fn predict(&self, features: &FeatureVector) -> Result<MlPrediction> {
        let url = format!("{}/predict", self.base_url);
        let request = PredictRequest {
            features: &features.values,
            feature_names: &features.names,
        };

        let response = timeout(self.deadline, self.http.post(&url).json(&request).send())
            .await
            .context("ml service call timed out")?
            .context("ml service unreachable")?;

        if !response.status().is_success() {
            bail!("ml service returned {}", response.status());
        }

        let prediction: MlPrediction = timeout(self.deadline, response.json())
            .await
            .context("ml service response timed out")?
            .context("ml service returned an unparsable body")?;

        if !prediction.predicted_value.is_finite() {
            bail!("ml service returned a non-finite prediction");
        }
        Ok(prediction)
    }
}

/// Offline stand-in for the model: carry the calibration offset through
/// and nudge for peak proximity and soil program. The shape matters
/// more than the numbers; the real model learns its own weights.
pub fn apply_ml_heuristic(raw_value: f64, features: &FeatureVector) -> f64 {
    let offset = features.values.get(11).copied().unwrap_or(0.0);

    let progress = features.values.get(3).copied().unwrap_or(-1.0);
    let peak_adjustment = if progress >= 0.0 {
        let distance = (progress - 1.0).abs();
        0.15 * (1.0 - (distance / 0.5).min(1.0))
    } else {
        0.0
    };

    let fertility = features.values.get(13).copied().unwrap_or(-1.0);
    let fertility_bonus = if fertility >= 2.0 {
        0.1
    } else if fertility >= 1.0 {
        0.05
    } else {
        0.0
    };

    raw_value + offset + peak_adjustment + fertility_bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::features::FEATURE_NAMES;

    fn features_with(progress: f64, offset: f64, fertility: f64) -> FeatureVector {
        let mut values = vec![-1.0; 16];
        values[3] = progress;
        values[11] = offset;
        values[13] = fertility;
        FeatureVector {
            values,
            names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn test_heuristic_carries_calibration_offset() {
        let enhanced = apply_ml_heuristic(11.5, &features_with(-1.0, 0.5, -1.0));
        assert!((enhanced - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_heuristic_peak_adjustment_fades_with_distance() {
        let at_peak = apply_ml_heuristic(11.5, &features_with(1.0, 0.0, -1.0));
        let off_peak = apply_ml_heuristic(11.5, &features_with(0.7, 0.0, -1.0));
        let far = apply_ml_heuristic(11.5, &features_with(0.2, 0.0, -1.0));
        assert!((at_peak - 11.65).abs() < 1e-9);
        assert!(off_peak < at_peak);
        assert!((far - 11.5).abs() < 1e-9);
    }

    #[test]
    fn test_heuristic_mineralized_bonus() {
        let mineralized = apply_ml_heuristic(11.5, &features_with(-1.0, 0.0, 2.0));
        let banking = apply_ml_heuristic(11.5, &features_with(-1.0, 0.0, 1.0));
        let annual = apply_ml_heuristic(11.5, &features_with(-1.0, 0.0, 0.0));
        assert!((mineralized - 11.6).abs() < 1e-9);
        assert!((banking - 11.55).abs() < 1e-9);
        assert!((annual - 11.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unreachable_service_errors_fast() {
        // Nothing listens on this port; the call must fail, not hang
        let client = MlServiceClient::new("http://127.0.0.1:9", 200);
        let features = features_with(-1.0, 0.0, -1.0);
        assert!(client.predict(&features).await.is_err());
    }
}
