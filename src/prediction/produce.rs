use std::sync::Arc;

use crate::catalog::{Cultivar, Profile, ProfileQuality, ReferenceCatalog};
use crate::models::{
    Category, FertilityApproach, HarvestStatus, MetricType, ModelInfo, PestManagementApproach,
    PillarContribution, PillarContributions, PredictionInput, PredictionResult, PrimaryMetric,
    UsdaComparison,
};
use crate::prediction::{band_around, temporal_decay, QualityPredictor};
use crate::utils::{clamp, scale_to_score, QualityError};

/// Brix predictor for tree fruit, berries, melons, stone fruit and
/// citrus. The phenology model is additive:
/// base (cultivar genetics) + rootstock + tree age + GDD timing +
/// practices, clamped to the cultivar's research range.
pub struct ProducePredictor {
    catalog: Arc<ReferenceCatalog>,
}

impl ProducePredictor {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self { catalog }
    }

    fn base_brix(&self, cultivar: Option<&Cultivar>, profile: &Profile) -> f64 {
        if let Some(cultivar) = cultivar {
            if let Some(base) = cultivar.base_metric {
                return base;
            }
            return cultivar.heritage_intent.default_base_brix();
        }
        if let ProfileQuality::Produce { brix_range } = &profile.quality {
            return (brix_range.0 + brix_range.1) / 2.0;
        }
        10.0
    }

    /// Young trees dilute sugars into growth; very old trees decline.
    fn age_modifier(&self, cultivar: Option<&Cultivar>, tree_age: Option<f64>) -> f64 {
        let Some(age) = tree_age else { return 0.0 };
        let precocious = cultivar.map(|c| c.precocious).unwrap_or(false);
        if precocious && age >= 2.0 {
            return 0.0;
        }
        if age < 3.0 {
            -0.8
        } else if age < 5.0 {
            -0.5
        } else if age < 8.0 {
            -0.2
        } else if age <= 18.0 {
            0.0
        } else if age <= 25.0 {
            -0.2
        } else {
            -0.3
        }
    }

    /// Zero near the target, linear falloff to −0.5 at half or 1.5× the
    /// accumulated heat units.
    fn timing_modifier(&self, gdd_progress: f64) -> f64 {
        if (0.95..=1.05).contains(&gdd_progress) {
            0.0
        } else if gdd_progress < 0.95 {
            -0.5 * ((0.95 - gdd_progress) / 0.45).min(1.0)
        } else {
            -0.5 * ((gdd_progress - 1.05) / 0.45).min(1.0)
        }
    }

    fn harvest_status(&self, gdd_progress: f64) -> HarvestStatus {
        if gdd_progress < 0.5 {
            HarvestStatus::NotReady
        } else if gdd_progress < 0.8 {
            HarvestStatus::Early
        } else if gdd_progress < 0.95 {
            HarvestStatus::Optimal
        } else if gdd_progress <= 1.05 {
            HarvestStatus::Peak
        } else if gdd_progress <= 1.3 {
            HarvestStatus::Late
        } else {
            HarvestStatus::PastPeak
        }
    }

    fn practice_modifier(&self, input: &PredictionInput) -> (f64, f64, f64) {
        let fertility = match input.fertility_approach {
            Some(FertilityApproach::MineralizedSoilScience) => 0.5,
            Some(FertilityApproach::SoilBanking) => 0.3,
            Some(FertilityApproach::Annual) | None => 0.0,
        };
        let pest = match input.pest_management {
            Some(PestManagementApproach::Organic) | Some(PestManagementApproach::NoSpray) => 0.1,
            _ => 0.0,
        };
        let crop_load = if input.crop_load_managed == Some(true) {
            0.2
        } else {
            0.0
        };
        (fertility, pest, crop_load)
    }

    /// Weighted data-quality subscores: cultivar 30%, phenology 25%,
    /// measurement 20%, rootstock 10%, soil 10%, practices 5%.
    fn confidence(&self, input: &PredictionInput, cultivar: Option<&Cultivar>) -> f64 {
        let cultivar_score = match cultivar {
            Some(c) if c.research_range.is_some() => 1.0,
            Some(_) => 0.7,
            None => 0.4,
        };
        let phenology_score = match (input.current_gdd, input.target_gdd) {
            (Some(_), Some(_)) => 1.0,
            (Some(_), None) | (None, Some(_)) => 0.5,
            (None, None) => 0.3,
        };
        let measurement_score = if input.measurements.contains_key("brix") {
            1.0
        } else {
            0.5
        };
        let rootstock_score = if input.rootstock.is_some() { 1.0 } else { 0.5 };
        let soil_score = if input.fertility_approach.is_some() {
            1.0
        } else {
            0.5
        };
        let practices_score =
            if input.pest_management.is_some() || input.crop_load_managed.is_some() {
                1.0
            } else {
                0.5
            };

        0.30 * cultivar_score
            + 0.25 * phenology_score
            + 0.20 * measurement_score
            + 0.10 * rootstock_score
            + 0.10 * soil_score
            + 0.05 * practices_score
    }
}

impl QualityPredictor for ProducePredictor {
    fn can_handle(&self, category: Category) -> bool {
        category == Category::Produce
    }

    fn primary_metric_type(&self) -> MetricType {
        MetricType::Brix
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

        let base = self.base_brix(cultivar, profile);
        let rootstock_modifier = input
            .rootstock
            .as_deref()
            .map(|r| self.catalog.rootstock_modifier(r))
            .unwrap_or(0.0);
        let age_modifier = self.age_modifier(cultivar, input.tree_age);

        let gdd_progress = match (input.current_gdd, input.target_gdd) {
            (Some(current), Some(target)) if target > 0.0 => Some(current / target),
            _ => None,
        };
        let timing_modifier = gdd_progress.map(|p| self.timing_modifier(p)).unwrap_or(0.0);
        let harvest_status = gdd_progress.map(|p| self.harvest_status(p));

        let (fertility_mod, pest_mod, crop_load_mod) = self.practice_modifier(input);
        let practice_modifier = fertility_mod + pest_mod + crop_load_mod;

        let mut predicted =
            base + rootstock_modifier + age_modifier + timing_modifier + practice_modifier;

        // A direct refractometer reading beats the model
        let measured = input.measurements.get("brix").copied();
        if let Some(measured_brix) = measured {
            predicted = measured_brix;
        }

        let research_bounds = cultivar
            .and_then(|c| c.research_range)
            .unwrap_or((4.0, 20.0));
        predicted = clamp(predicted, research_bounds.0, research_bounds.1);

        let crop_group = cultivar.map(|c| c.crop_group.as_str()).unwrap_or("generic");
        let tier_table =
            self.catalog
                .tier_table(crop_group, Category::Produce, input.subcategory.as_deref());
        let tier = tier_table.classify(predicted);

        let config = self
            .catalog
            .resolved_config(Category::Produce, input.subcategory.as_deref())
            .ok_or_else(|| QualityError::CatalogLookup("produce config missing".to_string()))?;
        let quality_score =
            scale_to_score(predicted, config.scoring_range.0, config.scoring_range.1);

        let mut confidence = self.confidence(input, cultivar);
        // Forecast predictions lose confidence with the horizon; a
        // direct reading is never decayed.
        if measured.is_none() {
            if let Some(days) = input.days_until_harvest {
                confidence = temporal_decay(confidence, days);
            }
        }

        let usda_comparison = cultivar.and_then(|c| {
            self.catalog.usda_minimum(&c.crop).map(|min| UsdaComparison {
                crop: c.crop.clone(),
                minimum: min.minimum,
                grade_label: min.grade_label.clone(),
                exceeds: predicted >= min.minimum,
                delta: predicted - min.minimum,
            })
        });

        let soil = PillarContribution::new(
            fertility_mod,
            if input.fertility_approach.is_some() { 0.8 } else { 0.4 },
            match input.fertility_approach {
                Some(FertilityApproach::MineralizedSoilScience) => {
                    "mineralized soil program in place"
                }
                Some(FertilityApproach::SoilBanking) => "multi-year soil banking",
                Some(FertilityApproach::Annual) => "annual fertility only",
                None => "no fertility data",
            },
        );

        let mut heritage = PillarContribution::new(
            cultivar
                .map(|c| c.heritage_intent.heritage_bonus())
                .unwrap_or(0.0),
            if cultivar.is_some() { 0.9 } else { 0.4 },
            cultivar
                .map(|c| format!("{} ({:?} genetics)", c.display_name, c.heritage_intent))
                .unwrap_or_else(|| "cultivar unknown".to_string()),
        );
        if let Some(c) = cultivar {
            if c.precocious {
                heritage = heritage.with_insight("precocious cultivar: no young-tree penalty");
            }
        }

        let agricultural = PillarContribution::new(
            pest_mod + crop_load_mod,
            if input.pest_management.is_some() { 0.8 } else { 0.4 },
            format!("profile {} ({})", profile.code, profile.display_name),
        );

        let mut ripen = PillarContribution::new(
            timing_modifier,
            if gdd_progress.is_some() { 0.9 } else { 0.3 },
            match gdd_progress {
                Some(p) => format!("{:.0}% of target heat units accumulated", p * 100.0),
                None => "no heat-unit data".to_string(),
            },
        );
        if let Some(status) = harvest_status {
            ripen = ripen.with_insight(format!("harvest window status: {:?}", status));
        }

        let enrich = PillarContribution::new(
            predicted - base,
            confidence,
            format!("predicted {:.1} °Bx against a base of {:.1}", predicted, base),
        );

        Ok(PredictionResult {
            category: Category::Produce,
            profile_code: Some(profile.code.clone()),
            quality_score,
            tier,
            confidence,
            primary_metric: PrimaryMetric::new(MetricType::Brix, predicted),
            band: band_around(predicted, confidence, 1.2, research_bounds),
            pillars: PillarContributions {
                soil,
                heritage,
                agricultural,
                ripen,
                enrich,
            },
            harvest_status,
            usda_comparison,
            model_info: ModelInfo::formula(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tier;

    fn predictor() -> ProducePredictor {
        ProducePredictor::new(Arc::new(ReferenceCatalog::new()))
    }

    fn commodity_profile(catalog: &ReferenceCatalog) -> Profile {
        catalog.profile_by_code("P-D").unwrap().clone()
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

    #[test]
    fn test_navel_at_gdd_peak() {
        let catalog = ReferenceCatalog::new();
        let predictor = ProducePredictor::new(Arc::new(ReferenceCatalog::new()));
        let result = predictor
            .predict(&navel_input(), &commodity_profile(&catalog))
            .unwrap();

        // Base 11.5, no rootstock/age/practice terms, timing at peak = 0
        assert!((result.primary_metric.value - 11.5).abs() < 1e-9);
        assert_eq!(result.harvest_status, Some(HarvestStatus::Peak));
        // Citrus table: premium at >= 11
        assert_eq!(result.tier, Tier::Premium);

        let usda = result.usda_comparison.unwrap();
        assert!(usda.exceeds);
        assert!((usda.delta - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_age_modifier_piecewise() {
        let p = predictor();
        let catalog = ReferenceCatalog::new();
        let navel = catalog.cultivar("washington_navel");
        assert_eq!(p.age_modifier(navel, Some(2.0)), -0.8);
        assert_eq!(p.age_modifier(navel, Some(4.0)), -0.5);
        assert_eq!(p.age_modifier(navel, Some(6.0)), -0.2);
        assert_eq!(p.age_modifier(navel, Some(12.0)), 0.0);
        assert_eq!(p.age_modifier(navel, Some(20.0)), -0.2);
        assert_eq!(p.age_modifier(navel, Some(40.0)), -0.3);
    }

    #[test]
    fn test_precocious_cultivar_skips_age_penalty() {
        let p = predictor();
        let catalog = ReferenceCatalog::new();
        let honeycrisp = catalog.cultivar("honeycrisp");
        assert!(honeycrisp.unwrap().precocious);
        assert_eq!(p.age_modifier(honeycrisp, Some(2.5)), 0.0);
        assert_eq!(p.age_modifier(honeycrisp, Some(4.0)), 0.0);
        // Below two years even precocious trees carry the penalty
        assert_eq!(p.age_modifier(honeycrisp, Some(1.0)), -0.8);
    }

    #[test]
    fn test_timing_modifier_shape() {
        let p = predictor();
        assert_eq!(p.timing_modifier(1.0), 0.0);
        assert_eq!(p.timing_modifier(0.95), 0.0);
        assert_eq!(p.timing_modifier(1.05), 0.0);
        // Halfway to the floor
        assert!((p.timing_modifier(0.725) - (-0.25)).abs() < 1e-9);
        assert!((p.timing_modifier(0.5) - (-0.5)).abs() < 1e-9);
        assert!((p.timing_modifier(1.5) - (-0.5)).abs() < 1e-9);
        // The floor holds beyond the endpoints
        assert_eq!(p.timing_modifier(0.1), -0.5);
        assert_eq!(p.timing_modifier(2.5), -0.5);
    }

    #[test]
    fn test_harvest_status_labels() {
        let p = predictor();
        assert_eq!(p.harvest_status(0.3), HarvestStatus::NotReady);
        assert_eq!(p.harvest_status(0.6), HarvestStatus::Early);
        assert_eq!(p.harvest_status(0.9), HarvestStatus::Optimal);
        assert_eq!(p.harvest_status(1.0), HarvestStatus::Peak);
        assert_eq!(p.harvest_status(1.2), HarvestStatus::Late);
        assert_eq!(p.harvest_status(1.6), HarvestStatus::PastPeak);
    }

    #[test]
    fn test_practice_modifiers_are_additive() {
        let catalog = ReferenceCatalog::new();
        let mut input = navel_input();
        input.fertility_approach = Some(FertilityApproach::MineralizedSoilScience);
        input.pest_management = Some(PestManagementApproach::NoSpray);
        input.crop_load_managed = Some(true);
        let result = predictor()
            .predict(&input, &commodity_profile(&catalog))
            .unwrap();
        // 11.5 + 0.5 + 0.1 + 0.2 = 12.3
        assert!((result.primary_metric.value - 12.3).abs() < 1e-9);
        assert_eq!(result.tier, Tier::Artisan);
    }

    #[test]
    fn test_prediction_clamps_to_research_range() {
        let catalog = ReferenceCatalog::new();
        let mut input = navel_input();
        input.measurements.insert("brix".to_string(), 25.0);
        let result = predictor()
            .predict(&input, &commodity_profile(&catalog))
            .unwrap();
        // Washington navel research ceiling is 14.0
        assert_eq!(result.primary_metric.value, 14.0);
    }

    #[test]
    fn test_unknown_cultivar_uses_profile_midpoint() {
        let catalog = ReferenceCatalog::new();
        let input = PredictionInput::new(Category::Produce);
        let result = predictor()
            .predict(&input, &commodity_profile(&catalog))
            .unwrap();
        // P-D carries (8, 12): midpoint 10
        assert!((result.primary_metric.value - 10.0).abs() < 1e-9);
        assert!(result.confidence < 0.7);
    }

    #[test]
    fn test_forecast_confidence_decays() {
        let catalog = ReferenceCatalog::new();
        let near = {
            let mut input = navel_input();
            input.days_until_harvest = Some(5.0);
            predictor()
                .predict(&input, &commodity_profile(&catalog))
                .unwrap()
        };
        let far = {
            let mut input = navel_input();
            input.days_until_harvest = Some(120.0);
            predictor()
                .predict(&input, &commodity_profile(&catalog))
                .unwrap()
        };
        assert!(near.confidence > far.confidence);
        let retrospective = predictor()
            .predict(&navel_input(), &commodity_profile(&catalog))
            .unwrap();
        assert!(retrospective.confidence > near.confidence);
    }

    #[test]
    fn test_rootstock_modifier_applies() {
        let catalog = ReferenceCatalog::new();
        let mut input = navel_input();
        input.rootstock = Some("trifoliate".to_string());
        let result = predictor()
            .predict(&input, &commodity_profile(&catalog))
            .unwrap();
        assert!((result.primary_metric.value - 12.0).abs() < 1e-9);
        assert_eq!(result.tier, Tier::Artisan);
    }
}
