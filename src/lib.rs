pub mod calibration;
pub mod catalog;
pub mod claims;
pub mod classifier;
pub mod config;
pub mod ml;
pub mod models;
pub mod prediction;
pub mod utils;
pub mod validation;

pub use calibration::{
    CalibrationKey, CalibrationRepository, CalibrationStore, InMemoryCalibrationRepository,
    RegionalCalibration,
};
pub use catalog::{CatalogLoader, ReferenceCatalog};
pub use classifier::{ClassificationResult, ClassificationWarning, ProfileClassifier};
pub use config::EngineConfig;
pub use models::*;
pub use prediction::{PredictionRouter, QualityPredictor};
pub use utils::QualityError;
pub use validation::{ValidationEngine, ValidationReport};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn router() -> PredictionRouter {
        PredictionRouter::new(EngineConfig::default())
    }

    #[tokio::test]
    async fn test_scenario_silence_routes_to_marketing_grass() {
        let router = router();
        let mut input = PredictionInput::new(Category::Livestock);
        input.claims = vec!["grass-fed".to_string()];
        let result = router.predict_unified(&input).await.unwrap();

        assert_eq!(result.profile_code, Some("B-C".to_string()));
        assert!((result.primary_metric.value - 11.5).abs() < 1e-9);
        assert!(result
            .model_info
            .warnings
            .iter()
            .any(|w| w.contains("no finishing claim")));
    }

    #[tokio::test]
    async fn test_scenario_explicit_exclusion_routes_to_true_grass() {
        let router = router();
        let mut input = PredictionInput::new(Category::Livestock);
        input.claims = vec!["100% grass-fed".to_string(), "grass-finished".to_string()];
        let result = router.predict_unified(&input).await.unwrap();

        assert_eq!(result.profile_code, Some("B-A".to_string()));
        assert!((result.primary_metric.value - 2.5).abs() < 1e-9);
        assert!(result
            .model_info
            .warnings
            .iter()
            .all(|w| !w.contains("no finishing claim")));
    }

    #[tokio::test]
    async fn test_scenario_premium_cafo_is_the_worst() {
        let router = router();
        let mut input = PredictionInput::new(Category::Livestock);
        input.claims = vec!["American Wagyu".to_string(), "Prime".to_string()];
        let result = router.predict_unified(&input).await.unwrap();

        assert_eq!(result.profile_code, Some("B-F".to_string()));
        assert!((result.primary_metric.value - 23.0).abs() < 1e-9);
        assert!(result
            .model_info
            .warnings
            .iter()
            .any(|w| w.contains("price does not imply health")));
    }

    #[tokio::test]
    async fn test_scenario_honey_raw_vs_processed() {
        let router = router();
        let mut raw = PredictionInput::new(Category::Honey);
        raw.honey_varietal = Some("manuka".to_string());
        raw.honey_processing = Some(HoneyProcessing::Raw);
        let raw_result = router.predict_unified(&raw).await.unwrap();
        assert!((raw_result.primary_metric.value - 13.0).abs() < 1e-9);

        let mut processed = PredictionInput::new(Category::Honey);
        processed.honey_varietal = Some("manuka".to_string());
        processed.honey_processing = Some(HoneyProcessing::Processed);
        let processed_result = router.predict_unified(&processed).await.unwrap();
        assert!((processed_result.primary_metric.value - 5.0).abs() < 1e-9);

        let mut wet = raw.clone();
        wet.measurements.insert("moisture".to_string(), 21.0);
        let wet_result = router.predict_unified(&wet).await.unwrap();
        assert!(wet_result
            .model_info
            .warnings
            .iter()
            .any(|w| w.contains("fermentation risk")));
    }

    #[tokio::test]
    async fn test_scenario_calibration_ring() {
        let router = router();
        let sample = ActualMeasurement {
            cultivar_id: "washington_navel".to_string(),
            region_id: "florida".to_string(),
            metric_value: 12.0,
            source: MeasurementSource::Lab,
            timestamp: Utc::now(),
            prediction_id: Some(Uuid::new_v4()),
            predicted_value: Some(11.5),
            season_year: None,
        };
        for _ in 0..4 {
            assert!(router.submit_actual(&sample).success);
        }

        let mut input = PredictionInput::new(Category::Produce);
        input.cultivar_id = Some("washington_navel".to_string());
        input.region_id = Some("florida".to_string());
        input.current_gdd = Some(3200.0);
        input.target_gdd = Some(3200.0);

        // Four samples: nothing happens yet
        let unchanged = router.predict_unified(&input).await.unwrap();
        assert_eq!(unchanged.model_info.calibration.unwrap().offset, 0.0);

        // The fifth sample crosses the threshold
        router.submit_actual(&sample);
        let calibrated = router.predict_unified(&input).await.unwrap();
        let applied = calibrated.model_info.calibration.unwrap();
        assert!((applied.offset - 0.5).abs() < 1e-9);
        assert_eq!(applied.confidence_boost, 0.0);
    }

    #[test]
    fn test_scenario_ab_determinism() {
        let layer = ml::MlLayer::new(&EngineConfig {
            ab_traffic_split: 0.1,
            ..EngineConfig::default()
        });
        let first = layer.assign("u-123");
        for _ in 0..1000 {
            assert_eq!(layer.assign("u-123").group, first.group);
        }
    }

    #[test]
    fn test_scenario_omega_anomaly_on_claim_consistency() {
        let engine = ValidationEngine::new(&EngineConfig::default());
        let result = engine.detect_omega_anomaly(12.0, 2.5, 0.5, Some((2.0, 3.0)), Some("B-A"));
        assert!(result.is_anomaly);
        assert!(result.reason.contains("worse than the expected range"));
    }

    #[tokio::test]
    async fn test_confidence_always_in_unit_interval() {
        let router = router();
        let mut inputs = Vec::new();
        let mut forecast = PredictionInput::new(Category::Produce);
        forecast.cultivar_id = Some("bing".to_string());
        forecast.days_until_harvest = Some(300.0);
        inputs.push(forecast);
        inputs.push(PredictionInput::new(Category::Seafood));
        inputs.push(PredictionInput::new(Category::Dairy));
        for input in inputs {
            let result = router.predict_unified(&input).await.unwrap();
            assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
        }
    }
}
