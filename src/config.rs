use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use log::{info, warn};

/// Runtime configuration for the inference engine. Everything has a
/// default; `from_env` only overrides the options that are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Base URL of the external ML model service. Absent means the
    /// heuristic enhancement path only.
    pub ml_api_url: Option<String>,
    /// Fraction of traffic routed to the treatment group, 0.0–1.0.
    pub ab_traffic_split: f64,
    pub min_samples_for_calibration: u64,
    pub samples_for_max_confidence: u64,
    pub max_confidence_boost: f64,
    pub anomaly_z_threshold: f64,
    /// Per-metric physical range overrides, keyed by field name.
    #[serde(default)]
    pub physical_range_overrides: HashMap<String, (f64, f64)>,
    /// External ML call deadline in milliseconds.
    pub ml_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ml_api_url: None,
            ab_traffic_split: 0.0,
            min_samples_for_calibration: 5,
            samples_for_max_confidence: 50,
            max_confidence_boost: 0.10,
            anomaly_z_threshold: 2.5,
            physical_range_overrides: HashMap::new(),
            ml_timeout_ms: 250,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("ML_API_URL") {
            if !url.trim().is_empty() {
                config.ml_api_url = Some(url);
            }
        }
        if let Some(split) = parse_env_f64("AB_TRAFFIC_SPLIT") {
            if (0.0..=1.0).contains(&split) {
                config.ab_traffic_split = split;
            } else {
                warn!("AB_TRAFFIC_SPLIT={} out of [0,1], keeping default", split);
            }
        }
        if let Some(n) = parse_env_u64("MIN_SAMPLES_FOR_CALIBRATION") {
            config.min_samples_for_calibration = n;
        }
        if let Some(n) = parse_env_u64("SAMPLES_FOR_MAX_CONFIDENCE") {
            config.samples_for_max_confidence = n;
        }
        if let Some(boost) = parse_env_f64("MAX_CONFIDENCE_BOOST") {
            config.max_confidence_boost = boost;
        }
        if let Some(z) = parse_env_f64("ANOMALY_Z_THRESHOLD") {
            config.anomaly_z_threshold = z;
        }

        info!(
            "Engine config: ml_api={}, ab_split={}, calibration_min={}",
            config.ml_api_url.as_deref().unwrap_or("disabled"),
            config.ab_traffic_split,
            config.min_samples_for_calibration
        );
        config
    }
}

fn parse_env_f64(name: &str) -> Option<f64> {
    match env::var(name) {
        Ok(raw) => match raw.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring unparsable {}={}", name, raw);
                None
            }
        },
        Err(_) => None,
    }
}

fn parse_env_u64(name: &str) -> Option<u64> {
    match env::var(name) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring unparsable {}={}", name, raw);
                None
            }
        },
        Err(_) => None,
    }
}
