use std::collections::HashMap;
use std::sync::Arc;
use log::{info, warn};

use crate::calibration::{CalibrationRepository, CalibrationStore, InMemoryCalibrationRepository};
use crate::catalog::ReferenceCatalog;
use crate::classifier::{ClassificationResult, ProfileClassifier};
use crate::config::EngineConfig;
use crate::ml::{extract_features, MlLayer};
use crate::models::{
    ActualMeasurement, Category, MetricType, PredictionInput, PredictionResult,
    SubmitActualResponse,
};
use crate::prediction::honey::HoneyPredictor;
use crate::prediction::livestock::LivestockPredictor;
use crate::prediction::nut::NutPredictor;
use crate::prediction::produce::ProducePredictor;
use crate::prediction::seafood::SeafoodPredictor;
use crate::prediction::transformed::TransformedPredictor;
use crate::prediction::vegetable::VegetablePredictor;
use crate::prediction::QualityPredictor;
use crate::utils::{clamp, scale_to_score, scale_to_score_inverted, QualityError};
use crate::validation::ValidationEngine;

/// Front door of the engine: dispatches to the category predictor, then
/// wraps the raw result with calibration, confidence capping, physical
/// clamping and the optional A/B model enhancement.
pub struct PredictionRouter {
    catalog: Arc<ReferenceCatalog>,
    classifier: ProfileClassifier,
    predictors: HashMap<Category, Arc<dyn QualityPredictor>>,
    calibration: CalibrationStore,
    validation: ValidationEngine,
    ml: MlLayer,
    ab_enabled: bool,
}

impl PredictionRouter {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_repository(config, Arc::new(InMemoryCalibrationRepository::new()))
    }

    pub fn with_repository(
        config: EngineConfig,
        calibration_repository: Arc<dyn CalibrationRepository>,
    ) -> Self {
        let catalog = Arc::new(ReferenceCatalog::new());

        let mut predictors: HashMap<Category, Arc<dyn QualityPredictor>> = HashMap::new();
        predictors.insert(
            Category::Produce,
            Arc::new(ProducePredictor::new(Arc::clone(&catalog))),
        );
        predictors.insert(
            Category::Vegetables,
            Arc::new(VegetablePredictor::new(Arc::clone(&catalog))),
        );
        predictors.insert(
            Category::Nut,
            Arc::new(NutPredictor::new(Arc::clone(&catalog))),
        );
        let livestock: Arc<dyn QualityPredictor> =
            Arc::new(LivestockPredictor::new(Arc::clone(&catalog)));
        predictors.insert(Category::Livestock, Arc::clone(&livestock));
        predictors.insert(Category::Eggs, Arc::clone(&livestock));
        predictors.insert(Category::Dairy, livestock);
        predictors.insert(
            Category::Seafood,
            Arc::new(SeafoodPredictor::new(Arc::clone(&catalog))),
        );
        predictors.insert(
            Category::Honey,
            Arc::new(HoneyPredictor::new(Arc::clone(&catalog))),
        );
        predictors.insert(
            Category::Transformed,
            Arc::new(TransformedPredictor::new(Arc::clone(&catalog))),
        );

        Self {
            classifier: ProfileClassifier::new(Arc::clone(&catalog)),
            predictors,
            calibration: CalibrationStore::new(calibration_repository, &config),
            validation: ValidationEngine::new(&config),
            ml: MlLayer::new(&config),
            ab_enabled: config.ab_traffic_split > 0.0,
            catalog,
        }
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn calibration(&self) -> &CalibrationStore {
        &self.calibration
    }

    pub fn ml(&self) -> &MlLayer {
        &self.ml
    }

    /// Classify claims without running a prediction.
    pub fn classify_claims(
        &self,
        category: Category,
        claims: &[String],
    ) -> Result<ClassificationResult, QualityError> {
        self.classifier.classify(category, claims)
    }

    /// Record a ground-truth measurement. Validation failures come back
    /// in the response rather than as errors.
    pub fn submit_actual(&self, actual: &ActualMeasurement) -> SubmitActualResponse {
        let report = match self.validation.validate_actual(actual) {
            Ok(report) => report,
            Err(error) => {
                return SubmitActualResponse {
                    success: false,
                    id: None,
                    error: Some(error.to_string()),
                }
            }
        };
        if !report.is_usable() {
            return SubmitActualResponse {
                success: false,
                id: None,
                error: Some(
                    report
                        .errors
                        .iter()
                        .map(|e| e.message.clone())
                        .collect::<Vec<_>>()
                        .join("; "),
                ),
            };
        }
        let id = self.calibration.submit_actual(actual);
        SubmitActualResponse {
            success: true,
            id: Some(id),
            error: None,
        }
    }

    pub async fn predict_unified(
        &self,
        input: &PredictionInput,
    ) -> Result<PredictionResult, QualityError> {
        let predictor = self
            .predictors
            .get(&input.category)
            .ok_or(QualityError::UnknownCategory(input.category))?;

        // Profile selection; commodity default when claims are silent
        let classification = self.classifier.classify(input.category, &input.claims)?;
        let profile = self
            .catalog
            .profile_by_code(&classification.profile_code)
            .ok_or_else(|| {
                QualityError::CatalogLookup(format!(
                    "classified profile {} missing from catalog",
                    classification.profile_code
                ))
            })?;

        let mut result = predictor.predict(input, profile)?;
        let raw_value = result.primary_metric.value;

        let config = self
            .catalog
            .resolved_config(input.category, input.subcategory.as_deref())
            .ok_or_else(|| {
                QualityError::CatalogLookup(format!("{} config missing", input.category))
            })?;

        // Regional calibration, when we know where and what this is
        let calibration_applied = match (&input.cultivar_id, &input.region_id) {
            (Some(cultivar), Some(region)) => {
                let (calibrated, applied) = self.calibration.apply(
                    raw_value,
                    cultivar,
                    region,
                    input.season_year,
                    config.physical_range,
                );
                result.primary_metric.value = calibrated;
                result.confidence = (result.confidence + applied.confidence_boost).min(1.0);
                Some(applied)
            }
            _ => None,
        };

        // Optional A/B model path
        if self.ab_enabled {
            if let Some(user_id) = &input.user_id {
                let assignment = self.ml.assign(user_id);
                result.model_info.ab_group = Some(assignment.group.to_string());
                if assignment.group == crate::ml::AbGroup::Treatment {
                    let rootstock_modifier = input
                        .rootstock
                        .as_deref()
                        .map(|r| self.catalog.rootstock_modifier(r))
                        .unwrap_or(0.0);
                    let features = extract_features(
                        input,
                        raw_value,
                        rootstock_modifier,
                        calibration_applied.as_ref(),
                    );
                    let enhancement = self.ml.enhance(raw_value, &features).await;
                    if let Some(reason) = &enhancement.fallback_reason {
                        warn!("serving formula fallback for {}: {}", user_id, reason);
                        result
                            .model_info
                            .warnings
                            .push("model service unavailable; formula fallback served".to_string());
                    }
                    result.primary_metric.value = enhancement.value;
                    result.model_info.enhanced = true;
                    result.model_info.model_version = assignment.model_version.clone();
                    if let Some(model_confidence) = enhancement.confidence {
                        result.confidence = result.confidence.max(model_confidence).min(1.0);
                    }
                }
            }
        }

        // Final physical clamp and score reconciliation
        result.primary_metric.value = clamp(
            result.primary_metric.value,
            config.physical_range.0,
            config.physical_range.1,
        );
        if (result.primary_metric.value - raw_value).abs() > f64::EPSILON {
            result.quality_score = self.rescore(
                &config.scoring_range,
                result.primary_metric.metric_type,
                result.primary_metric.value,
                result.quality_score,
            );
        }
        result.confidence = clamp(result.confidence, 0.0, 1.0);
        result.model_info.calibration = calibration_applied;
        for warning in &classification.warnings {
            result.model_info.warnings.push(warning.message.clone());
        }

        info!(
            "prediction served: {} {} -> {:.2} {} (tier {}, confidence {:.2})",
            input.category,
            classification.profile_code,
            result.primary_metric.value,
            result.primary_metric.unit,
            result.tier,
            result.confidence
        );
        Ok(result)
    }

    /// Keep the 0-100 score consistent after calibration or enhancement
    /// moved the metric. Score-typed metrics already are the score.
    fn rescore(
        &self,
        scoring_range: &(f64, f64),
        metric_type: MetricType,
        value: f64,
        previous_score: f64,
    ) -> f64 {
        match metric_type {
            MetricType::FreshnessScore | MetricType::StorageScore => previous_score,
            MetricType::OmegaRatio => {
                scale_to_score_inverted(value, scoring_range.0, scoring_range.1)
            }
            _ => scale_to_score(value, scoring_range.0, scoring_range.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use crate::models::{HarvestStatus, MeasurementSource, Tier};

    fn router() -> PredictionRouter {
        PredictionRouter::new(EngineConfig::default())
    }

    fn navel_input() -> PredictionInput {
        let mut input = PredictionInput::new(Category::Produce);
        input.cultivar_id = Some("washington_navel".to_string());
        input.subcategory = Some("citrus".to_string());
        input.region_id = Some("florida".to_string());
        input.current_gdd = Some(3200.0);
        input.target_gdd = Some(3200.0);
        input
    }

    fn actual(measured: f64, predicted: f64) -> ActualMeasurement {
        ActualMeasurement {
            cultivar_id: "washington_navel".to_string(),
            region_id: "florida".to_string(),
            metric_value: measured,
            source: MeasurementSource::Farm,
            timestamp: Utc::now(),
            prediction_id: Some(Uuid::new_v4()),
            predicted_value: Some(predicted),
            season_year: None,
        }
    }

    #[tokio::test]
    async fn test_unified_produce_prediction() {
        let result = router().predict_unified(&navel_input()).await.unwrap();
        assert!((result.primary_metric.value - 11.5).abs() < 1e-9);
        assert_eq!(result.tier, Tier::Premium);
        assert_eq!(result.harvest_status, Some(HarvestStatus::Peak));
        assert_eq!(result.profile_code, Some("P-D".to_string()));
        assert!(result.usda_comparison.unwrap().exceeds);
    }

    #[tokio::test]
    async fn test_post_harvest_has_no_predictor() {
        let input = PredictionInput::new(Category::PostHarvest);
        let error = router().predict_unified(&input).await.unwrap_err();
        assert!(matches!(error, QualityError::UnknownCategory(_)));
    }

    #[tokio::test]
    async fn test_calibration_wraps_prediction_after_five_actuals() {
        let router = router();
        let before = router.predict_unified(&navel_input()).await.unwrap();
        assert!(before.model_info.calibration.as_ref().unwrap().offset == 0.0);

        for _ in 0..5 {
            let response = router.submit_actual(&actual(12.0, 11.5));
            assert!(response.success);
        }
        let after = router.predict_unified(&navel_input()).await.unwrap();
        let applied = after.model_info.calibration.unwrap();
        assert!((applied.offset - 0.5).abs() < 1e-9);
        assert!((after.primary_metric.value - 12.0).abs() < 1e-9);
        assert_eq!(applied.sample_count, 5);
    }

    #[tokio::test]
    async fn test_confidence_stays_capped() {
        let router = router();
        for _ in 0..60 {
            router.submit_actual(&actual(12.0, 11.5));
        }
        let mut input = navel_input();
        input.measurements.insert("brix".to_string(), 12.0);
        let result = router.predict_unified(&input).await.unwrap();
        assert!(result.confidence <= 1.0);
        assert!(result.confidence >= 0.0);
        let applied = result.model_info.calibration.unwrap();
        assert!((applied.confidence_boost - 0.10).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_classification_warnings_reach_the_result() {
        let mut input = PredictionInput::new(Category::Livestock);
        input.claims = vec!["grass-fed".to_string()];
        let result = router().predict_unified(&input).await.unwrap();
        assert_eq!(result.profile_code, Some("B-C".to_string()));
        assert!((result.primary_metric.value - 11.5).abs() < 1e-9);
        assert!(result
            .model_info
            .warnings
            .iter()
            .any(|w| w.contains("no finishing claim")));
    }

    #[tokio::test]
    async fn test_ab_treatment_runs_heuristic_enhancement() {
        let mut config = EngineConfig::default();
        config.ab_traffic_split = 1.0; // everyone is treatment
        let router = PredictionRouter::with_repository(
            config,
            Arc::new(InMemoryCalibrationRepository::new()),
        );
        let mut input = navel_input();
        input.user_id = Some("u-123".to_string());
        let result = router.predict_unified(&input).await.unwrap();
        assert_eq!(result.model_info.ab_group.as_deref(), Some("treatment"));
        assert!(result.model_info.enhanced);
        // Heuristic adds the near-peak nudge to the formula value
        assert!((result.primary_metric.value - 11.65).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_ab_disabled_serves_plain_formula() {
        let mut input = navel_input();
        input.user_id = Some("u-123".to_string());
        let result = router().predict_unified(&input).await.unwrap();
        assert!(result.model_info.ab_group.is_none());
        assert!(!result.model_info.enhanced);
    }

    #[tokio::test]
    async fn test_metric_always_inside_physical_range() {
        let router = router();
        let inputs = vec![
            navel_input(),
            {
                let mut input = PredictionInput::new(Category::Livestock);
                input.claims = vec!["American Wagyu".to_string(), "Prime".to_string()];
                input
            },
            {
                let mut input = PredictionInput::new(Category::Honey);
                input.honey_varietal = Some("manuka".to_string());
                input
            },
        ];
        for input in inputs {
            let result = router.predict_unified(&input).await.unwrap();
            let config = router
                .catalog()
                .resolved_config(input.category, input.subcategory.as_deref())
                .unwrap();
            assert!(result.primary_metric.value >= config.physical_range.0);
            assert!(result.primary_metric.value <= config.physical_range.1);
        }
    }

    #[tokio::test]
    async fn test_submit_actual_rejects_unusable_reading() {
        let response = router().submit_actual(&actual(f64::NAN, 11.5));
        assert!(!response.success);
        assert!(response.error.is_some());
    }
}
