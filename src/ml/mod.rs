pub mod abtest;
pub mod client;
pub mod features;
pub mod registry;

pub use abtest::{AbAssignment, AbGroup, ExperimentAggregator, ExperimentAssigner, ExperimentSummary};
pub use client::{apply_ml_heuristic, MlPrediction, MlServiceClient};
pub use features::{extract_features, FeatureVector, FEATURE_NAMES};
pub use registry::{ModelRegistry, ModelVersion};

use log::warn;

use crate::config::EngineConfig;

const DEFAULT_EXPERIMENT_ID: &str = "quality-model-rollout";
const FORMULA_VERSION: &str = "formula-v1";

#[derive(Debug, Clone)]
pub struct MlEnhancement {
    pub value: f64,
    pub confidence: Option<f64>,
    /// "external" or "heuristic".
    pub source: &'static str,
    pub fallback_reason: Option<String>,
}

/// Serving front for the optional model service: A/B assignment, the
/// external call with its fallback, and the offline heuristic.
pub struct MlLayer {
    assigner: ExperimentAssigner,
    client: Option<MlServiceClient>,
    registry: ModelRegistry,
    aggregator: ExperimentAggregator,
    experiment_id: String,
}

impl MlLayer {
    pub fn new(config: &EngineConfig) -> Self {
        let client = config
            .ml_api_url
            .as_deref()
            .map(|url| MlServiceClient::new(url, config.ml_timeout_ms));
        Self {
            assigner: ExperimentAssigner::new(config.ab_traffic_split),
            client,
            registry: ModelRegistry::new(),
            aggregator: ExperimentAggregator::new(),
            experiment_id: DEFAULT_EXPERIMENT_ID.to_string(),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn aggregator(&self) -> &ExperimentAggregator {
        &self.aggregator
    }

    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    pub fn assign(&self, user_id: &str) -> AbAssignment {
        let model_version = self
            .registry
            .production()
            .map(|m| m.version)
            .unwrap_or_else(|| FORMULA_VERSION.to_string());
        self.assigner
            .assign(user_id, &self.experiment_id, &model_version)
    }

    /// Treatment-path enhancement of a raw formula value. The external
    /// model wins when it answers in time; anything else falls back to
    /// the heuristic, silently from the caller's point of view.
    pub async fn enhance(&self, raw_value: f64, features: &FeatureVector) -> MlEnhancement {
        if let Some(client) = &self.client {
            match client.predict(features).await {
                Ok(prediction) => {
                    return MlEnhancement {
                        value: prediction.predicted_value,
                        confidence: Some(prediction.confidence),
                        source: "external",
                        fallback_reason: None,
                    };
                }
                Err(error) => {
                    warn!("ml service fallback: {:#}", error);
                    return MlEnhancement {
                        value: apply_ml_heuristic(raw_value, features),
                        confidence: None,
                        source: "heuristic",
                        fallback_reason: Some(format!("{:#}", error)),
                    };
                }
            }
        }
        MlEnhancement {
            value: apply_ml_heuristic(raw_value, features),
            confidence: None,
            source: "heuristic",
            fallback_reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_uses_production_version_when_present() {
        let mut config = EngineConfig::default();
        config.ab_traffic_split = 1.0;
        let layer = MlLayer::new(&config);
        assert_eq!(layer.assign("u-1").model_version, FORMULA_VERSION);

        layer
            .registry()
            .register(ModelVersion::new("v7", 0.6, 400, vec![]));
        layer.registry().set_production("v7");
        assert_eq!(layer.assign("u-1").model_version, "v7");
    }

    #[tokio::test]
    async fn test_enhance_without_service_uses_heuristic() {
        let layer = MlLayer::new(&EngineConfig::default());
        let mut values = vec![-1.0; 16];
        values[11] = 0.4;
        let features = FeatureVector {
            values,
            names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        };
        let enhancement = layer.enhance(10.0, &features).await;
        assert_eq!(enhancement.source, "heuristic");
        assert!((enhancement.value - 10.4).abs() < 1e-9);
        assert!(enhancement.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn test_enhance_falls_back_when_service_is_down() {
        let mut config = EngineConfig::default();
        config.ml_api_url = Some("http://127.0.0.1:9".to_string());
        config.ml_timeout_ms = 100;
        let layer = MlLayer::new(&config);
        let features = FeatureVector {
            values: vec![-1.0; 16],
            names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        };
        let enhancement = layer.enhance(10.0, &features).await;
        assert_eq!(enhancement.source, "heuristic");
        assert!(enhancement.fallback_reason.is_some());
    }
}
