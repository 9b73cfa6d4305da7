use std::sync::Arc;

use crate::catalog::{PreservationStance, Profile, ProfileQuality, ReferenceCatalog, TierThresholds};
use crate::models::{
    Category, MetricType, ModelInfo, PillarContribution, PillarContributions, PredictionInput,
    PredictionResult, PrimaryMetric, Tier,
};
use crate::prediction::{band_around, QualityPredictor};
use crate::utils::{clamp, scale_to_score, QualityError};

/// Two-stage predictor for coffee, tea and cacao: an origin profile
/// supplies the quality the farm produced; the transformation profile
/// decides how much of it reaches the cup. Enhancing processes pass the
/// high end through, preserving ones the midpoint, masking ones clip to
/// the low end.
pub struct TransformedPredictor {
    catalog: Arc<ReferenceCatalog>,
}

impl TransformedPredictor {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self { catalog }
    }

    fn cupping_thresholds() -> TierThresholds {
        TierThresholds::new(88.0, 84.0, 80.0)
    }
}

impl QualityPredictor for TransformedPredictor {
    fn can_handle(&self, category: Category) -> bool {
        category == Category::Transformed
    }

    fn primary_metric_type(&self) -> MetricType {
        MetricType::CuppingScore
    }

    fn predict(
        &self,
        input: &PredictionInput,
        profile: &Profile,
    ) -> Result<PredictionResult, QualityError> {
        let (origin_range, compatible) = match &profile.quality {
            ProfileQuality::Transformed {
                origin_range,
                compatible_transformations,
            } => (*origin_range, compatible_transformations.clone()),
            _ => ((70.0, 80.0), Vec::new()),
        };

        let transformation = input
            .transformation_code
            .as_deref()
            .and_then(|code| self.catalog.transformation_profile(code));

        let mut warnings = Vec::new();
        let (final_quality, stance_details) = match transformation {
            Some(t) => {
                let passed_through = match t.stance {
                    PreservationStance::Enhances => origin_range.1,
                    PreservationStance::Preserves | PreservationStance::Neutral => {
                        (origin_range.0 + origin_range.1) / 2.0
                    }
                    PreservationStance::RisksMasking => origin_range.0,
                };
                // The process has its own ceiling and floor
                let value = clamp(
                    passed_through,
                    t.estimated_final_quality.0,
                    t.estimated_final_quality.1,
                );

                if t.stance == PreservationStance::RisksMasking
                    && matches!(profile.tier, Tier::Artisan | Tier::Premium)
                {
                    warnings.push(format!(
                        "{} masks a {} origin; the cup will not show what the farm produced",
                        t.display_name, profile.tier
                    ));
                }
                if !compatible.is_empty() && !compatible.contains(&t.code) {
                    warnings.push(format!(
                        "{} is an unusual process for profile {}",
                        t.display_name, profile.code
                    ));
                }
                (value, format!("{} ({:?})", t.display_name, t.stance))
            }
            None => {
                let mid = (origin_range.0 + origin_range.1) / 2.0;
                (mid, "transformation unknown; origin midpoint".to_string())
            }
        };

        let measured = input.measurements.get("cupping_score").copied();
        let final_quality = clamp(measured.unwrap_or(final_quality), 0.0, 100.0);

        let tier = Self::cupping_thresholds().classify(final_quality);
        let config = self
            .catalog
            .resolved_config(Category::Transformed, input.subcategory.as_deref())
            .ok_or_else(|| QualityError::CatalogLookup("transformed config missing".to_string()))?;
        let quality_score =
            scale_to_score(final_quality, config.scoring_range.0, config.scoring_range.1);

        let mut confidence: f64 = if profile.is_default { 0.45 } else { 0.65 };
        if transformation.is_some() {
            confidence += 0.15;
        }
        if measured.is_some() {
            confidence += 0.2;
        }
        let confidence = confidence.min(1.0);

        let soil = PillarContribution::new(
            0.0,
            0.5,
            "terroir folded into the origin grade".to_string(),
        );
        let heritage = PillarContribution::new(
            (origin_range.0 + origin_range.1) / 2.0,
            if profile.is_default { 0.4 } else { 0.8 },
            format!(
                "origin {} ({:.0}-{:.0} potential)",
                profile.display_name, origin_range.0, origin_range.1
            ),
        );
        let agricultural = PillarContribution::new(
            0.0,
            0.6,
            format!("profile {} ({})", profile.code, profile.display_name),
        );
        let ripen = PillarContribution::new(
            final_quality - (origin_range.0 + origin_range.1) / 2.0,
            if transformation.is_some() { 0.85 } else { 0.4 },
            stance_details,
        );
        let enrich = PillarContribution::new(
            final_quality,
            confidence,
            format!("estimated cup quality {:.1} points", final_quality),
        );

        let mut model_info = ModelInfo::formula();
        model_info.warnings = warnings;

        Ok(PredictionResult {
            category: Category::Transformed,
            profile_code: Some(profile.code.clone()),
            quality_score,
            tier,
            confidence,
            primary_metric: PrimaryMetric::new(MetricType::CuppingScore, final_quality),
            band: band_around(final_quality, confidence, 2.0, (0.0, 100.0)),
            pillars: PillarContributions {
                soil,
                heritage,
                agricultural,
                ripen,
                enrich,
            },
            harvest_status: None,
            usda_comparison: None,
            model_info,
        })
    }
}
