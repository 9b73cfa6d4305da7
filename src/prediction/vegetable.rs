use std::sync::Arc;

use crate::catalog::{Profile, ReferenceCatalog, VegetableClass, VegetableVariety};
use crate::models::{
    Category, MetricType, ModelInfo, PillarContribution, PillarContributions, PredictionInput,
    PredictionResult, PrimaryMetric, StorageConditions, Tier,
};
use crate::prediction::{band_around, QualityPredictor};
use crate::utils::{clamp, QualityError};

/// Vegetables run one of three submodels keyed by variety class:
/// exponential freshness decay (leafy/cruciferous/legume), Brix with a
/// cold-storage sweetening bonus (root/nightshade), or a curing-then-
/// storage curve (allium/squash).
pub struct VegetablePredictor {
    catalog: Arc<ReferenceCatalog>,
}

impl VegetablePredictor {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self { catalog }
    }

    fn resolve_class(&self, input: &PredictionInput) -> (Option<VegetableVariety>, VegetableClass) {
        if let Some(variety) = input
            .variety_id
            .as_deref()
            .and_then(|id| self.catalog.vegetable_variety(id))
        {
            return (Some(variety.clone()), variety.class);
        }
        let class = match input.subcategory.as_deref() {
            Some("leafy") => VegetableClass::Leafy,
            Some("cruciferous") => VegetableClass::Cruciferous,
            Some("legume") => VegetableClass::Legume,
            Some("root") => VegetableClass::Root,
            Some("nightshade") => VegetableClass::Nightshade,
            Some("allium") => VegetableClass::Allium,
            Some("squash") => VegetableClass::Squash,
            _ => VegetableClass::Leafy,
        };
        (None, class)
    }

    /// `score = 100 · exp(−k · days_since_harvest · storage_factor)`
    fn freshness_score(
        &self,
        class: VegetableClass,
        days_since_harvest: f64,
        storage: Option<StorageConditions>,
    ) -> f64 {
        let factor = storage.map(|s| s.decay_factor()).unwrap_or(1.0);
        let effective_days = days_since_harvest * factor;
        100.0 * (-class.decay_k() * effective_days).exp()
    }

    fn freshness_status(&self, effective_days: f64, optimal_days: f64) -> &'static str {
        if effective_days <= optimal_days * 0.5 {
            "peak freshness"
        } else if effective_days <= optimal_days {
            "fresh"
        } else if effective_days <= optimal_days * 2.0 {
            "acceptable"
        } else {
            "past prime"
        }
    }

    /// Root-crop Brix: variety base plus cold-storage sweetening, capped
    /// at +3. Normalized to a score as ((brix − 4) / 10) · 100.
    fn brix_value(&self, variety: Option<&VegetableVariety>, input: &PredictionInput) -> f64 {
        let base = variety.and_then(|v| v.base_brix).unwrap_or(6.0);
        let bonus = match (variety, input.storage_conditions, input.storage_weeks) {
            (Some(v), Some(StorageConditions::ColdStorage), Some(weeks)) => v
                .cold_storage_bonus_per_week
                .map(|per_week| (per_week * weeks).min(3.0))
                .unwrap_or(0.0),
            _ => 0.0,
        };
        base + bonus
    }

    /// Curing ramps 70 → 100 over the variety's cure window; storage
    /// holds 100 through the optimal months and then slides.
    fn storage_score(&self, variety: Option<&VegetableVariety>, input: &PredictionInput) -> (f64, String) {
        let optimal_cure = variety.and_then(|v| v.optimal_cure_days).unwrap_or(10.0);
        let optimal_months = variety.and_then(|v| v.optimal_storage_months).unwrap_or(4.0);

        if let Some(cure_days) = input.curing_days {
            if cure_days < optimal_cure {
                let score = 70.0 + 30.0 * (cure_days / optimal_cure);
                return (score, format!("curing, day {:.0} of {:.0}", cure_days, optimal_cure));
            }
        }

        let months_stored = input
            .storage_weeks
            .map(|w| w / 4.345)
            .or_else(|| input.days_since_harvest.map(|d| d / 30.4))
            .unwrap_or(0.0);
        if months_stored <= optimal_months {
            (100.0, format!("in storage, month {:.1}", months_stored))
        } else {
            let over = months_stored - optimal_months;
            let score = clamp(100.0 - 12.0 * over, 10.0, 100.0);
            (
                score,
                format!("{:.1} months past optimal storage", over),
            )
        }
    }

    fn score_tier(score: f64) -> Tier {
        if score >= 85.0 {
            Tier::Artisan
        } else if score >= 70.0 {
            Tier::Premium
        } else if score >= 50.0 {
            Tier::Standard
        } else {
            Tier::Commodity
        }
    }
}

impl QualityPredictor for VegetablePredictor {
    fn can_handle(&self, category: Category) -> bool {
        category == Category::Vegetables
    }

    fn primary_metric_type(&self) -> MetricType {
        MetricType::FreshnessScore
    }

    fn predict(
        &self,
        input: &PredictionInput,
        profile: &Profile,
    ) -> Result<PredictionResult, QualityError> {
        let (variety, class) = self.resolve_class(input);
        let variety_ref = variety.as_ref();

        let (metric_type, metric_value, quality_score, ripen_details) = if class
            .uses_freshness_model()
        {
            let days = input.days_since_harvest.unwrap_or(0.0);
            let factor = input
                .storage_conditions
                .map(|s| s.decay_factor())
                .unwrap_or(1.0);
            let score = self.freshness_score(class, days, input.storage_conditions);
            let optimal = variety_ref
                .and_then(|v| v.optimal_fresh_days)
                .unwrap_or(7.0);
            let status = self.freshness_status(days * factor, optimal);
            (
                MetricType::FreshnessScore,
                score,
                score,
                format!("{} ({:.1} effective days since harvest)", status, days * factor),
            )
        } else if class.uses_brix_model() {
            let brix = self.brix_value(variety_ref, input);
            let score = clamp((brix - 4.0) / 10.0 * 100.0, 0.0, 100.0);
            (
                MetricType::Brix,
                brix,
                score,
                format!("{:.1} °Bx after storage adjustments", brix),
            )
        } else {
            let (score, status) = self.storage_score(variety_ref, input);
            (MetricType::StorageScore, score, score, status)
        };

        let tier = Self::score_tier(quality_score);

        let mut confidence: f64 = 0.5;
        if variety.is_some() {
            confidence += 0.25;
        }
        if input.days_since_harvest.is_some() || input.curing_days.is_some() {
            confidence += 0.15;
        }
        if input.storage_conditions.is_some() {
            confidence += 0.10;
        }
        let confidence = confidence.min(1.0);

        let soil = PillarContribution::new(
            0.0,
            0.4,
            match input.fertility_approach {
                Some(_) => "grower fertility program reported",
                None => "no soil data",
            },
        );
        let heritage = PillarContribution::new(
            0.0,
            if variety.is_some() { 0.8 } else { 0.4 },
            variety_ref
                .map(|v| format!("{} ({:?})", v.display_name, v.class))
                .unwrap_or_else(|| format!("variety unknown, class {:?}", class)),
        );
        let agricultural = PillarContribution::new(
            0.0,
            0.6,
            format!("profile {} ({})", profile.code, profile.display_name),
        );
        let ripen = PillarContribution::new(0.0, confidence, ripen_details);
        let enrich = PillarContribution::new(
            quality_score,
            confidence,
            format!("quality score {:.0}/100", quality_score),
        );

        let bounds = match metric_type {
            MetricType::Brix => (0.0, 30.0),
            _ => (0.0, 100.0),
        };

        Ok(PredictionResult {
            category: Category::Vegetables,
            profile_code: Some(profile.code.clone()),
            quality_score,
            tier,
            confidence,
            primary_metric: PrimaryMetric::new(metric_type, metric_value),
            band: band_around(metric_value, confidence, if metric_type == MetricType::Brix { 1.0 } else { 8.0 }, bounds),
            pillars: PillarContributions {
                soil,
                heritage,
                agricultural,
                ripen,
                enrich,
            },
            harvest_status: None,
            usda_comparison: None,
            model_info: ModelInfo::formula(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictor() -> VegetablePredictor {
        VegetablePredictor::new(Arc::new(ReferenceCatalog::new()))
    }

    fn profile() -> Profile {
        ReferenceCatalog::new()
            .profile_by_code("V-B")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_fresh_spinach_scores_high() {
        let mut input = PredictionInput::new(Category::Vegetables);
        input.variety_id = Some("spinach".to_string());
        input.days_since_harvest = Some(1.0);
        input.storage_conditions = Some(StorageConditions::Refrigerated);
        let result = predictor().predict(&input, &profile()).unwrap();
        // 100 · exp(−0.15 · 0.5) ≈ 92.8
        assert!((result.primary_metric.value - 100.0 * (-0.075_f64).exp()).abs() < 1e-9);
        assert_eq!(result.tier, Tier::Artisan);
        assert!(result
            .pillars
            .ripen
            .details
            .contains("peak freshness"));
    }

    #[test]
    fn test_refrigeration_halves_the_clock() {
        let p = predictor();
        let ambient = p.freshness_score(VegetableClass::Leafy, 4.0, Some(StorageConditions::Ambient));
        let fridge =
            p.freshness_score(VegetableClass::Leafy, 4.0, Some(StorageConditions::Refrigerated));
        let cold =
            p.freshness_score(VegetableClass::Leafy, 4.0, Some(StorageConditions::ColdStorage));
        assert!(fridge > ambient);
        assert!(cold > fridge);
        assert!((fridge - p.freshness_score(VegetableClass::Leafy, 2.0, None)).abs() < 1e-9);
    }

    #[test]
    fn test_old_lettuce_is_past_prime() {
        let mut input = PredictionInput::new(Category::Vegetables);
        input.variety_id = Some("butterhead_lettuce".to_string());
        input.days_since_harvest = Some(20.0);
        let result = predictor().predict(&input, &profile()).unwrap();
        assert!(result.pillars.ripen.details.contains("past prime"));
        assert_eq!(result.tier, Tier::Commodity);
    }

    #[test]
    fn test_carrot_cold_storage_sweetening() {
        let mut input = PredictionInput::new(Category::Vegetables);
        input.variety_id = Some("nantes_carrot".to_string());
        input.storage_conditions = Some(StorageConditions::ColdStorage);
        input.storage_weeks = Some(4.0);
        let result = predictor().predict(&input, &profile()).unwrap();
        // 8.0 base + 0.5/week × 4 = 10.0
        assert!((result.primary_metric.value - 10.0).abs() < 1e-9);
        assert_eq!(result.primary_metric.metric_type, MetricType::Brix);
        // ((10 − 4) / 10) · 100 = 60
        assert!((result.quality_score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_cold_storage_bonus_caps_at_three() {
        let p = predictor();
        let catalog = ReferenceCatalog::new();
        let parsnip = catalog.vegetable_variety("harris_parsnip").cloned();
        let mut input = PredictionInput::new(Category::Vegetables);
        input.storage_conditions = Some(StorageConditions::ColdStorage);
        input.storage_weeks = Some(10.0); // 0.8/week would be +8 uncapped
        let brix = p.brix_value(parsnip.as_ref(), &input);
        assert!((brix - 12.0).abs() < 1e-9); // 9.0 + capped 3.0
    }

    #[test]
    fn test_onion_curing_ramp() {
        let mut input = PredictionInput::new(Category::Vegetables);
        input.variety_id = Some("yellow_storage_onion".to_string());
        input.curing_days = Some(7.0);
        let result = predictor().predict(&input, &profile()).unwrap();
        // Halfway through a 14-day cure: 70 + 15 = 85
        assert!((result.primary_metric.value - 85.0).abs() < 1e-9);
        assert_eq!(result.primary_metric.metric_type, MetricType::StorageScore);
    }

    #[test]
    fn test_squash_holds_through_optimal_storage() {
        let mut input = PredictionInput::new(Category::Vegetables);
        input.variety_id = Some("butternut_squash".to_string());
        input.curing_days = Some(10.0);
        input.storage_weeks = Some(13.0); // ~3 months, inside 6
        let result = predictor().predict(&input, &profile()).unwrap();
        assert_eq!(result.primary_metric.value, 100.0);
        // Past the window the score slides
        input.storage_weeks = Some(40.0); // ~9.2 months
        let late = predictor().predict(&input, &profile()).unwrap();
        assert!(late.primary_metric.value < 100.0);
    }

    #[test]
    fn test_subcategory_fallback_without_variety() {
        let mut input = PredictionInput::new(Category::Vegetables);
        input.subcategory = Some("cruciferous".to_string());
        input.days_since_harvest = Some(5.0);
        let result = predictor().predict(&input, &profile()).unwrap();
        assert!((result.primary_metric.value - 100.0 * (-0.08_f64 * 5.0).exp()).abs() < 1e-9);
    }
}
