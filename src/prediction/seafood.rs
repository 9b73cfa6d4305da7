use std::sync::Arc;

use crate::catalog::{Profile, ProfileQuality, ReferenceCatalog};
use crate::models::{
    CatchMethod, Category, MetricType, ModelInfo, PillarContribution, PillarContributions,
    PredictionInput, PredictionResult, PrimaryMetric, Tier,
};
use crate::prediction::{band_around, QualityPredictor};
use crate::utils::{clamp, scale_to_score, QualityError};

/// ω3-content predictor. Catch method and waters drive both the metric
/// position inside the profile range and the tier. Oysters carry a
/// merroir model (the water body is the terroir); stone crab is the
/// sustainability gold standard.
pub struct SeafoodPredictor {
    catalog: Arc<ReferenceCatalog>,
}

impl SeafoodPredictor {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self { catalog }
    }

    /// Position inside the profile's ω3 range by harvest method.
    fn omega3_value(&self, range: (f64, f64), catch: Option<CatchMethod>) -> f64 {
        let (lo, hi) = range;
        match catch {
            Some(CatchMethod::Wild) => lo + (hi - lo) * 0.85,
            Some(CatchMethod::SustainableFarmed) => (lo + hi) / 2.0,
            Some(CatchMethod::Farmed) => lo + (hi - lo) * 0.25,
            None => (lo + hi) / 2.0,
        }
    }

    fn tier_for(&self, catch: Option<CatchMethod>, species: Option<&str>) -> Tier {
        if species == Some("stone_crab") {
            // Claw-only harvest, crab released alive
            return Tier::Artisan;
        }
        match catch {
            Some(CatchMethod::Wild) => Tier::Artisan,
            Some(CatchMethod::SustainableFarmed) => Tier::Premium,
            Some(CatchMethod::Farmed) => Tier::Commodity,
            None => Tier::Standard,
        }
    }
}

impl QualityPredictor for SeafoodPredictor {
    fn can_handle(&self, category: Category) -> bool {
        category == Category::Seafood
    }

    fn primary_metric_type(&self) -> MetricType {
        MetricType::Omega3Content
    }

    fn predict(
        &self,
        input: &PredictionInput,
        profile: &Profile,
    ) -> Result<PredictionResult, QualityError> {
        let range = match &profile.quality {
            ProfileQuality::Seafood { omega3_range } => *omega3_range,
            _ => (300.0, 700.0),
        };
        let species = input.species.as_deref();
        let is_oyster = species == Some("oyster") || input.subcategory.as_deref() == Some("oyster");

        let mut omega3 = self.omega3_value(range, input.catch_method);
        let measured = input.measurements.get("omega3").copied();
        if let Some(measured_omega3) = measured {
            omega3 = measured_omega3;
        }
        omega3 = clamp(omega3, 0.0, 4000.0);

        let tier = self.tier_for(input.catch_method, species);

        let config = self
            .catalog
            .resolved_config(Category::Seafood, input.subcategory.as_deref())
            .ok_or_else(|| QualityError::CatalogLookup("seafood config missing".to_string()))?;
        let quality_score = scale_to_score(omega3, config.scoring_range.0, config.scoring_range.1);

        let mut confidence: f64 = if profile.is_default { 0.45 } else { 0.65 };
        if input.catch_method.is_some() {
            confidence += 0.15;
        }
        if measured.is_some() {
            confidence += 0.2;
        }
        let confidence = confidence.min(1.0);

        // For oysters the water body IS the quality story
        let mut soil = PillarContribution::new(
            0.0,
            if input.water_body.is_some() { 0.85 } else { 0.4 },
            input
                .water_body
                .as_deref()
                .map(|w| format!("waters: {}", w))
                .unwrap_or_else(|| "water body unknown".to_string()),
        );
        if is_oyster {
            soil = soil.with_insight(match &input.water_body {
                Some(body) => format!("merroir signature of {}", body),
                None => "oyster quality tracks its water body; merroir unknown".to_string(),
            });
        }

        let heritage = PillarContribution::new(
            0.0,
            if species.is_some() { 0.7 } else { 0.4 },
            species
                .map(|s| format!("species: {}", s))
                .unwrap_or_else(|| "species unknown".to_string()),
        );

        let mut agricultural = PillarContribution::new(
            0.0,
            if input.catch_method.is_some() { 0.85 } else { 0.4 },
            match input.catch_method {
                Some(CatchMethod::Wild) => "wild capture fishery",
                Some(CatchMethod::SustainableFarmed) => "certified sustainable aquaculture",
                Some(CatchMethod::Farmed) => "conventional aquaculture",
                None => "harvest method unknown",
            },
        );
        if species == Some("stone_crab") {
            agricultural = agricultural
                .with_insight("claw-only harvest: the crab is released and regenerates");
        }

        let ripen = PillarContribution::new(
            0.0,
            0.5,
            match input.season_month {
                Some(month) => format!("harvest month {}", month),
                None => "harvest season unknown".to_string(),
            },
        );
        let enrich = PillarContribution::new(
            omega3,
            confidence,
            format!("estimated {:.0} mg ω3 per 100g", omega3),
        );

        Ok(PredictionResult {
            category: Category::Seafood,
            profile_code: Some(profile.code.clone()),
            quality_score,
            tier,
            confidence,
            primary_metric: PrimaryMetric::new(MetricType::Omega3Content, omega3),
            band: band_around(omega3, confidence, (range.1 - range.0) / 4.0, (0.0, 4000.0)),
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
