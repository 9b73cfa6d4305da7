use std::sync::Arc;

use crate::catalog::{Profile, ProfileQuality, ReferenceCatalog, TierThresholds};
use crate::models::{
    Category, MetricType, ModelInfo, PillarContribution, PillarContributions, PredictionInput,
    PredictionResult, PrimaryMetric,
};
use crate::prediction::{band_around, QualityPredictor};
use crate::utils::{clamp, scale_to_score, QualityError};

/// Kernel oil-content predictor. Heritage and native cultivars carry
/// richer oil; modern selections trade oil for kernel percentage.
pub struct NutPredictor {
    catalog: Arc<ReferenceCatalog>,
}

impl NutPredictor {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self { catalog }
    }

    fn oil_thresholds() -> TierThresholds {
        TierThresholds::new(72.0, 68.0, 64.0)
    }
}

impl QualityPredictor for NutPredictor {
    fn can_handle(&self, category: Category) -> bool {
        category == Category::Nut
    }

    fn primary_metric_type(&self) -> MetricType {
        MetricType::OilContent
    }

    fn predict(
        &self,
        input: &PredictionInput,
        profile: &Profile,
    ) -> Result<PredictionResult, QualityError> {
        let cultivar = input
            .cultivar_id
            .as_deref()
            .and_then(|id| self.catalog.cultivar(id));

        let profile_range = match &profile.quality {
            ProfileQuality::Nut { oil_range } => *oil_range,
            _ => (62.0, 68.0),
        };

        let base = cultivar
            .and_then(|c| c.base_metric)
            .unwrap_or((profile_range.0 + profile_range.1) / 2.0);
        let heritage_bonus = cultivar
            .map(|c| c.heritage_intent.heritage_bonus())
            .unwrap_or(0.0);

        let mut oil = base + heritage_bonus;
        let measured = input.measurements.get("oil_content").copied();
        if let Some(measured_oil) = measured {
            oil = measured_oil;
        }
        let bounds = cultivar
            .and_then(|c| c.research_range)
            .unwrap_or((40.0, 85.0));
        oil = clamp(oil, bounds.0, bounds.1);

        let tier = Self::oil_thresholds().classify(oil);
        let config = self
            .catalog
            .resolved_config(Category::Nut, input.subcategory.as_deref())
            .ok_or_else(|| QualityError::CatalogLookup("nut config missing".to_string()))?;
        let quality_score = scale_to_score(oil, config.scoring_range.0, config.scoring_range.1);

        let mut confidence: f64 = 0.5;
        if cultivar.is_some() {
            confidence += 0.25;
        }
        if measured.is_some() {
            confidence += 0.2;
        }
        let confidence = confidence.min(1.0);

        let soil = PillarContribution::new(
            0.0,
            0.4,
            match input.fertility_approach {
                Some(_) => "orchard fertility program reported",
                None => "no orchard soil data",
            },
        );
        let mut heritage = PillarContribution::new(
            heritage_bonus,
            if cultivar.is_some() { 0.85 } else { 0.4 },
            cultivar
                .map(|c| format!("{} ({:?})", c.display_name, c.heritage_intent))
                .unwrap_or_else(|| "cultivar unknown".to_string()),
        );
        if let Some(c) = cultivar {
            if matches!(
                c.heritage_intent,
                crate::catalog::HeritageIntent::ModernNutrient
                    | crate::catalog::HeritageIntent::ModernFlavor
                    | crate::catalog::HeritageIntent::Commercial
            ) {
                heritage = heritage.with_insight("modern selection: higher kernel percentage");
            }
        }
        let agricultural = PillarContribution::new(
            0.0,
            0.6,
            format!("profile {} ({})", profile.code, profile.display_name),
        );
        let ripen = PillarContribution::new(
            0.0,
            0.5,
            "oil content peaks at full hull split".to_string(),
        );
        let enrich = PillarContribution::new(
            oil,
            confidence,
            format!("predicted {:.1}% kernel oil", oil),
        );

        Ok(PredictionResult {
            category: Category::Nut,
            profile_code: Some(profile.code.clone()),
            quality_score,
            tier,
            confidence,
            primary_metric: PrimaryMetric::new(MetricType::OilContent, oil),
            band: band_around(oil, confidence, 2.0, bounds),
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
    use crate::models::Tier;

    fn predictor() -> NutPredictor {
        NutPredictor::new(Arc::new(ReferenceCatalog::new()))
    }

    fn profile(code: &str) -> Profile {
        ReferenceCatalog::new().profile_by_code(code).unwrap().clone()
    }

    #[test]
    fn test_heritage_pecan_reaches_artisan() {
        let mut input = PredictionInput::new(Category::Nut);
        input.cultivar_id = Some("stuart_pecan".to_string());
        let result = predictor().predict(&input, &profile("N-A")).unwrap();
        // 72.0 base + 1.0 heritage = 73.0, over the 72 artisan line
        assert!((result.primary_metric.value - 73.0).abs() < 1e-9);
        assert_eq!(result.tier, Tier::Artisan);
    }

    #[test]
    fn test_modern_walnut_lands_standard() {
        let mut input = PredictionInput::new(Category::Nut);
        input.cultivar_id = Some("chandler_walnut".to_string());
        let result = predictor().predict(&input, &profile("N-C")).unwrap();
        // 66.0 + 0.6 modern_nutrient = 66.6
        assert!((result.primary_metric.value - 66.6).abs() < 1e-9);
        assert_eq!(result.tier, Tier::Standard);
        assert!(result
            .pillars
            .heritage
            .insights
            .iter()
            .any(|i| i.contains("kernel percentage")));
    }

    #[test]
    fn test_tier_lines_match_published_thresholds() {
        let thresholds = NutPredictor::oil_thresholds();
        assert_eq!(thresholds.classify(72.0), Tier::Artisan);
        assert_eq!(thresholds.classify(68.0), Tier::Premium);
        assert_eq!(thresholds.classify(64.0), Tier::Standard);
        assert_eq!(thresholds.classify(63.9), Tier::Commodity);
    }

    #[test]
    fn test_unknown_cultivar_uses_profile_range() {
        let input = PredictionInput::new(Category::Nut);
        let result = predictor().predict(&input, &profile("N-C")).unwrap();
        assert!((result.primary_metric.value - 65.0).abs() < 1e-9);
        assert!(result.confidence < 0.6);
    }
}
