use std::sync::Arc;

use crate::catalog::{Cultivar, Profile, ProfileQuality, ReferenceCatalog, TierThresholds};
use crate::models::{
    Category, FeedingRegime, MetricType, ModelInfo, PillarContribution, PillarContributions,
    PredictionInput, PredictionResult, PrimaryMetric,
};
use crate::prediction::{band_around, QualityPredictor};
use crate::utils::{clamp, scale_to_score_inverted, QualityError};

/// ω6:ω3 predictor shared by livestock, eggs and dairy. The production
/// profile sets the expected range; breed genetics and age-at-harvest
/// nudge the midpoint. Lower is better, so tiering runs inverted.
pub struct LivestockPredictor {
    catalog: Arc<ReferenceCatalog>,
}

impl LivestockPredictor {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self { catalog }
    }

    fn omega_range(&self, profile: &Profile) -> ((f64, f64), FeedingRegime) {
        match &profile.quality {
            ProfileQuality::Animal {
                omega_range,
                feeding_regime,
            } => (*omega_range, *feeding_regime),
            _ => ((14.0, 20.0), FeedingRegime::GrainFed),
        }
    }

    /// Heritage breeds were selected before feed-conversion economics
    /// drove genetics; they finish well on forage.
    fn breed_adjustment(&self, breed: Option<&Cultivar>, regime: FeedingRegime) -> f64 {
        let Some(breed) = breed else { return 0.0 };
        let on_forage = matches!(
            regime,
            FeedingRegime::GrassOnly | FeedingRegime::PastureForage
        );
        if on_forage {
            -breed.heritage_intent.heritage_bonus()
        } else {
            // Feedlot rations flatten genetic differences
            -breed.heritage_intent.heritage_bonus() * 0.25
        }
    }

    /// Poultry maturation: ~14 weeks is the pasture optimum, 6-8 weeks
    /// the commodity cycle. Longer on appropriate feed improves the
    /// ratio; rushing a pasture bird forfeits the forage benefit.
    fn age_adjustment(&self, input: &PredictionInput, regime: FeedingRegime) -> f64 {
        let Some(age_weeks) = input.age_at_harvest_weeks else {
            return 0.0;
        };
        let on_forage = matches!(
            regime,
            FeedingRegime::GrassOnly | FeedingRegime::PastureForage
        );
        if !on_forage {
            return 0.0;
        }
        let target = 14.0;
        clamp((target - age_weeks) * 0.1, -1.5, 1.5)
    }

    fn tier_thresholds(category: Category) -> TierThresholds {
        match category {
            Category::Dairy => TierThresholds::new(2.5, 4.0, 8.0),
            Category::Eggs => TierThresholds::new(5.0, 9.0, 14.0),
            _ => TierThresholds::new(3.0, 6.0, 12.0),
        }
    }
}

impl QualityPredictor for LivestockPredictor {
    fn can_handle(&self, category: Category) -> bool {
        matches!(
            category,
            Category::Livestock | Category::Eggs | Category::Dairy
        )
    }

    fn primary_metric_type(&self) -> MetricType {
        MetricType::OmegaRatio
    }

    fn predict(
        &self,
        input: &PredictionInput,
        profile: &Profile,
    ) -> Result<PredictionResult, QualityError> {
        let (omega_range, profile_regime) = self.omega_range(profile);
        let regime = input.feeding_regime.unwrap_or(profile_regime);

        let breed = input
            .cultivar_id
            .as_deref()
            .and_then(|id| self.catalog.cultivar(id));

        let base = (omega_range.0 + omega_range.1) / 2.0;
        let breed_adjustment = self.breed_adjustment(breed, regime);
        let age_adjustment = self.age_adjustment(input, regime);

        let mut omega = base + breed_adjustment + age_adjustment;
        let measured = input.measurements.get("omega_ratio").copied();
        if let Some(measured_omega) = measured {
            omega = measured_omega;
        }
        omega = clamp(omega, 0.5, 50.0);

        let tier = Self::tier_thresholds(input.category).classify_inverted(omega);

        let config = self
            .catalog
            .resolved_config(input.category, input.subcategory.as_deref())
            .ok_or_else(|| {
                QualityError::CatalogLookup(format!("{} config missing", input.category))
            })?;
        let (best, worst) = config.scoring_range;
        let quality_score = scale_to_score_inverted(omega, best, worst);

        let mut confidence: f64 = if profile.is_default { 0.45 } else { 0.7 };
        if measured.is_some() {
            confidence += 0.2;
        }
        if breed.is_some() {
            confidence += 0.05;
        }
        if input.feeding_regime.is_some() {
            confidence += 0.05;
        }
        let confidence = confidence.min(1.0);

        let soil = PillarContribution::new(
            0.0,
            if profile.is_default { 0.4 } else { 0.8 },
            match regime {
                FeedingRegime::GrassOnly => "100% forage diet, no grain at any stage",
                FeedingRegime::PastureForage => "pasture-based with supplemental grain",
                FeedingRegime::GrainFinished => "pasture start, grain finishing",
                FeedingRegime::GrainFed => "confined feeding throughout",
            },
        );
        let heritage = PillarContribution::new(
            breed_adjustment,
            if breed.is_some() { 0.85 } else { 0.4 },
            breed
                .map(|b| format!("{} ({:?})", b.display_name, b.heritage_intent))
                .unwrap_or_else(|| "breed unknown".to_string()),
        );
        let agricultural = PillarContribution::new(
            0.0,
            if profile.is_default { 0.4 } else { 0.85 },
            format!("profile {} ({})", profile.code, profile.display_name),
        );
        let mut ripen = PillarContribution::new(
            age_adjustment,
            if input.age_at_harvest_weeks.is_some() { 0.8 } else { 0.4 },
            match input.age_at_harvest_weeks {
                Some(weeks) => format!("harvested at {:.0} weeks", weeks),
                None => "age at harvest unknown".to_string(),
            },
        );
        if age_adjustment < 0.0 {
            ripen = ripen.with_insight("extended maturation on forage improves the ratio");
        }
        let enrich = PillarContribution::new(
            omega,
            confidence,
            format!(
                "predicted {:.1}:1 against the profile range {:.0}-{:.0}:1",
                omega, omega_range.0, omega_range.1
            ),
        );

        Ok(PredictionResult {
            category: input.category,
            profile_code: Some(profile.code.clone()),
            quality_score,
            tier,
            confidence,
            primary_metric: PrimaryMetric::new(MetricType::OmegaRatio, omega),
            band: band_around(omega, confidence, (omega_range.1 - omega_range.0) / 2.0, (0.5, 50.0)),
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
