use std::sync::Arc;

use crate::catalog::{Profile, ProfileQuality, ReferenceCatalog, TierThresholds};
use crate::models::{
    Category, HoneyProcessing, MetricType, ModelInfo, PillarContribution, PillarContributions,
    PredictionInput, PredictionResult, PrimaryMetric, Tier,
};
use crate::prediction::{band_around, QualityPredictor};
use crate::utils::{clamp, scale_to_score, QualityError};

/// Diastase-number predictor. Heat processing destroys the enzyme, so
/// raw handling adds to the varietal baseline and processing subtracts.
/// Moisture is a secondary gate: at 20% and above fermentation risk
/// caps the tier.
pub struct HoneyPredictor {
    catalog: Arc<ReferenceCatalog>,
}

const RAW_DIASTASE_BONUS: f64 = 3.0;
const PROCESSED_DIASTASE_PENALTY: f64 = 5.0;
const FERMENTATION_MOISTURE: f64 = 20.0;

impl HoneyPredictor {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self { catalog }
    }

    fn diastase_thresholds() -> TierThresholds {
        TierThresholds::new(20.0, 12.0, 8.0)
    }

    /// Processing can come in explicitly or be read off the matched
    /// profile (the raw profiles require a raw claim).
    fn processing(&self, input: &PredictionInput, profile: &Profile) -> HoneyProcessing {
        if let Some(processing) = input.honey_processing {
            return processing;
        }
        match profile.code.as_str() {
            "H-A" | "H-B" => HoneyProcessing::Raw,
            _ => HoneyProcessing::Processed,
        }
    }
}

impl QualityPredictor for HoneyPredictor {
    fn can_handle(&self, category: Category) -> bool {
        category == Category::Honey
    }

    fn primary_metric_type(&self) -> MetricType {
        MetricType::Diastase
    }

    fn predict(
        &self,
        input: &PredictionInput,
        profile: &Profile,
    ) -> Result<PredictionResult, QualityError> {
        let varietal = input.honey_varietal.as_deref();
        let baseline = varietal
            .and_then(|v| self.catalog.honey_varietal_baseline(v))
            .unwrap_or_else(|| match &profile.quality {
                ProfileQuality::Honey { diastase_range, .. } => {
                    (diastase_range.0 + diastase_range.1) / 2.0
                }
                _ => 8.0,
            });

        let processing = self.processing(input, profile);
        let mut diastase = match processing {
            HoneyProcessing::Raw => baseline + RAW_DIASTASE_BONUS,
            HoneyProcessing::Processed => baseline - PROCESSED_DIASTASE_PENALTY,
        };
        let measured = input.measurements.get("diastase").copied();
        if let Some(measured_dn) = measured {
            diastase = measured_dn;
        }
        diastase = clamp(diastase, 0.0, 40.0);

        let mut warnings = Vec::new();
        let moisture = input.measurements.get("moisture").copied();
        let mut tier = Self::diastase_thresholds().classify(diastase);
        if let Some(moisture_pct) = moisture {
            if moisture_pct >= FERMENTATION_MOISTURE {
                warnings.push(format!(
                    "moisture {:.1}% carries fermentation risk (threshold {}%)",
                    moisture_pct, FERMENTATION_MOISTURE
                ));
                if tier < Tier::Standard {
                    tier = Tier::Standard;
                }
            }
        }

        let config = self
            .catalog
            .resolved_config(Category::Honey, input.subcategory.as_deref())
            .ok_or_else(|| QualityError::CatalogLookup("honey config missing".to_string()))?;
        let quality_score =
            scale_to_score(diastase, config.scoring_range.0, config.scoring_range.1);

        let mut confidence: f64 = 0.5;
        if varietal.is_some() {
            confidence += 0.2;
        }
        if measured.is_some() {
            confidence += 0.2;
        }
        if moisture.is_some() {
            confidence += 0.1;
        }
        let confidence = confidence.min(1.0);

        let soil = PillarContribution::new(
            0.0,
            if varietal.is_some() { 0.7 } else { 0.4 },
            varietal
                .map(|v| format!("forage source: {}", v))
                .unwrap_or_else(|| "forage source unknown".to_string()),
        );
        let heritage = PillarContribution::new(
            baseline,
            if varietal.is_some() { 0.8 } else { 0.4 },
            format!("varietal baseline {:.0} DN", baseline),
        );
        let agricultural = PillarContribution::new(
            0.0,
            0.6,
            format!("profile {} ({})", profile.code, profile.display_name),
        );
        let ripen = PillarContribution::new(
            match processing {
                HoneyProcessing::Raw => RAW_DIASTASE_BONUS,
                HoneyProcessing::Processed => -PROCESSED_DIASTASE_PENALTY,
            },
            0.8,
            match processing {
                HoneyProcessing::Raw => "raw extraction, enzymes intact",
                HoneyProcessing::Processed => "heat processed; diastase degraded",
            },
        );
        let mut enrich = PillarContribution::new(
            diastase,
            confidence,
            format!("predicted diastase number {:.1}", diastase),
        );
        if let Some(moisture_pct) = moisture {
            enrich = enrich.with_insight(format!("moisture {:.1}%", moisture_pct));
        }

        let mut model_info = ModelInfo::formula();
        model_info.warnings = warnings;

        Ok(PredictionResult {
            category: Category::Honey,
            profile_code: Some(profile.code.clone()),
            quality_score,
            tier,
            confidence,
            primary_metric: PrimaryMetric::new(MetricType::Diastase, diastase),
            band: band_around(diastase, confidence, 2.5, (0.0, 40.0)),
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
