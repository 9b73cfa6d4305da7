use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use chrono::{DateTime, Utc};

// ======================================================================
// CORE DATA MODELS - Shared across classifier, predictors and router
// ======================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Produce,
    Vegetables,
    Nut,
    Livestock,
    Eggs,
    Dairy,
    Seafood,
    Honey,
    Transformed,
    PostHarvest,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Category::Produce => "produce",
            Category::Vegetables => "vegetables",
            Category::Nut => "nut",
            Category::Livestock => "livestock",
            Category::Eggs => "eggs",
            Category::Dairy => "dairy",
            Category::Seafood => "seafood",
            Category::Honey => "honey",
            Category::Transformed => "transformed",
            Category::PostHarvest => "post_harvest",
        };
        write!(f, "{}", name)
    }
}

impl Category {
    pub fn parse(s: &str) -> Option<Category> {
        match s.trim().to_lowercase().as_str() {
            "produce" | "fruit" => Some(Category::Produce),
            "vegetables" | "vegetable" => Some(Category::Vegetables),
            "nut" | "nuts" => Some(Category::Nut),
            "livestock" | "meat" | "beef" => Some(Category::Livestock),
            "eggs" => Some(Category::Eggs),
            "dairy" => Some(Category::Dairy),
            "seafood" | "fish" => Some(Category::Seafood),
            "honey" => Some(Category::Honey),
            "transformed" | "coffee" | "tea" | "cacao" => Some(Category::Transformed),
            "post_harvest" => Some(Category::PostHarvest),
            _ => None,
        }
    }

    /// Animal-product categories share the omega-ratio claim semantics
    /// (CAFO silence, breed-only routing, organic-feed warning).
    pub fn is_animal_product(&self) -> bool {
        matches!(
            self,
            Category::Livestock | Category::Eggs | Category::Dairy
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Brix,
    OmegaRatio,
    Omega3Content,
    Diastase,
    OilContent,
    FreshnessScore,
    StorageScore,
    CuppingScore,
}

impl MetricType {
    pub fn unit(&self) -> &'static str {
        match self {
            MetricType::Brix => "°Bx",
            MetricType::OmegaRatio => "ω6:ω3",
            MetricType::Omega3Content => "mg/100g",
            MetricType::Diastase => "DN",
            MetricType::OilContent => "%",
            MetricType::FreshnessScore => "score",
            MetricType::StorageScore => "score",
            MetricType::CuppingScore => "points",
        }
    }

    /// Only the omega ratio improves as it goes down.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, MetricType::OmegaRatio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Artisan,
    Premium,
    Standard,
    Commodity,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Tier::Artisan => write!(f, "artisan"),
            Tier::Premium => write!(f, "premium"),
            Tier::Standard => write!(f, "standard"),
            Tier::Commodity => write!(f, "commodity"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestStatus {
    NotReady,
    Early,
    Optimal,
    Peak,
    Late,
    PastPeak,
}

// ======================================================================
// AGRICULTURAL PRACTICE ENUMS
// ======================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FertilityApproach {
    Annual,
    SoilBanking,
    MineralizedSoilScience,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PestManagementApproach {
    Conventional,
    Ipm,
    Organic,
    NoSpray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageConditions {
    Ambient,
    Refrigerated,
    ColdStorage,
}

impl StorageConditions {
    /// Shelf-clock multiplier for freshness decay.
    pub fn decay_factor(&self) -> f64 {
        match self {
            StorageConditions::Ambient => 1.0,
            StorageConditions::Refrigerated => 0.5,
            StorageConditions::ColdStorage => 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingRegime {
    GrassOnly,
    PastureForage,
    GrainFinished,
    GrainFed,
}

impl FeedingRegime {
    /// Expected midpoint of the ω6:ω3 ratio for this regime.
    pub fn omega_midpoint(&self) -> f64 {
        match self {
            FeedingRegime::GrassOnly => 2.5,
            FeedingRegime::PastureForage => 5.0,
            FeedingRegime::GrainFinished => 13.0,
            FeedingRegime::GrainFed => 17.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchMethod {
    Wild,
    SustainableFarmed,
    Farmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoneyProcessing {
    Raw,
    Processed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSource {
    Consumer,
    Farm,
    Lab,
}

// ======================================================================
// PREDICTION INPUT
// ======================================================================

/// A single prediction request. Only `category` is mandatory; every
/// predictor reads the subset of fields it understands and treats the
/// rest as absent signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInput {
    pub category: Category,
    pub subcategory: Option<String>,
    #[serde(default)]
    pub claims: Vec<String>,
    pub cultivar_id: Option<String>,
    pub variety_id: Option<String>,
    pub region_id: Option<String>,
    pub species: Option<String>,

    // Phenology / environment
    pub current_gdd: Option<f64>,
    pub target_gdd: Option<f64>,
    pub tree_age: Option<f64>,
    pub rootstock: Option<String>,
    pub days_since_harvest: Option<f64>,
    pub days_until_harvest: Option<f64>,
    pub storage_conditions: Option<StorageConditions>,
    pub storage_weeks: Option<f64>,
    pub curing_days: Option<f64>,
    pub season_month: Option<u32>,
    pub season_year: Option<i32>,

    // Practices
    pub fertility_approach: Option<FertilityApproach>,
    pub pest_management: Option<PestManagementApproach>,
    pub crop_load_managed: Option<bool>,

    // Animal products
    pub feeding_regime: Option<FeedingRegime>,
    pub age_at_harvest_weeks: Option<f64>,

    // Seafood
    pub catch_method: Option<CatchMethod>,
    pub water_body: Option<String>,

    // Honey
    pub honey_varietal: Option<String>,
    pub honey_processing: Option<HoneyProcessing>,

    // Transformed goods
    pub transformation_code: Option<String>,

    // Direct measurements, keyed by metric name ("brix", "moisture", ...)
    #[serde(default)]
    pub measurements: HashMap<String, f64>,

    pub user_id: Option<String>,
}

impl PredictionInput {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            subcategory: None,
            claims: Vec::new(),
            cultivar_id: None,
            variety_id: None,
            region_id: None,
            species: None,
            current_gdd: None,
            target_gdd: None,
            tree_age: None,
            rootstock: None,
            days_since_harvest: None,
            days_until_harvest: None,
            storage_conditions: None,
            storage_weeks: None,
            curing_days: None,
            season_month: None,
            season_year: None,
            fertility_approach: None,
            pest_management: None,
            crop_load_managed: None,
            feeding_regime: None,
            age_at_harvest_weeks: None,
            catch_method: None,
            water_body: None,
            honey_varietal: None,
            honey_processing: None,
            transformation_code: None,
            measurements: HashMap::new(),
            user_id: None,
        }
    }
}

// ======================================================================
// PREDICTION RESULT
// ======================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryMetric {
    pub metric_type: MetricType,
    pub value: f64,
    pub unit: String,
    pub lower_is_better: bool,
}

impl PrimaryMetric {
    pub fn new(metric_type: MetricType, value: f64) -> Self {
        Self {
            metric_type,
            value,
            unit: metric_type.unit().to_string(),
            lower_is_better: metric_type.lower_is_better(),
        }
    }
}

/// Low/mid/high band around the primary metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualityBand {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

/// One of the five interpretive pillars of a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarContribution {
    /// Signed modifier (additive metric terms) or indicator value.
    pub modifier: f64,
    pub confidence: f64,
    pub details: String,
    #[serde(default)]
    pub insights: Vec<String>,
}

impl PillarContribution {
    pub fn new(modifier: f64, confidence: f64, details: impl Into<String>) -> Self {
        Self {
            modifier,
            confidence,
            details: details.into(),
            insights: Vec::new(),
        }
    }

    pub fn with_insight(mut self, insight: impl Into<String>) -> Self {
        self.insights.push(insight.into());
        self
    }
}

/// Soil, heritage, agricultural practice, ripen/timing, enrich/outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PillarContributions {
    pub soil: PillarContribution,
    pub heritage: PillarContribution,
    pub agricultural: PillarContribution,
    pub ripen: PillarContribution,
    pub enrich: PillarContribution,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaComparison {
    pub crop: String,
    pub minimum: f64,
    pub grade_label: String,
    pub exceeds: bool,
    pub delta: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationApplied {
    pub offset: f64,
    pub confidence_boost: f64,
    pub sample_count: u64,
    pub calibration_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub model_version: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub calibration: Option<CalibrationApplied>,
    pub ab_group: Option<String>,
    pub enhanced: bool,
}

impl ModelInfo {
    pub fn formula() -> Self {
        Self {
            model_version: "formula-v1".to_string(),
            warnings: Vec::new(),
            calibration: None,
            ab_group: None,
            enhanced: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub category: Category,
    pub profile_code: Option<String>,
    pub quality_score: f64,
    pub tier: Tier,
    pub confidence: f64,
    pub primary_metric: PrimaryMetric,
    pub band: QualityBand,
    pub pillars: PillarContributions,
    pub harvest_status: Option<HarvestStatus>,
    pub usda_comparison: Option<UsdaComparison>,
    pub model_info: ModelInfo,
}

// ======================================================================
// ACTUAL MEASUREMENTS
// ======================================================================

/// A submitted ground-truth measurement. Append-only; submitting one
/// with a linked prediction feeds the calibration store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualMeasurement {
    pub cultivar_id: String,
    pub region_id: String,
    pub metric_value: f64,
    pub source: MeasurementSource,
    pub timestamp: DateTime<Utc>,
    pub prediction_id: Option<Uuid>,
    pub predicted_value: Option<f64>,
    pub season_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitActualResponse {
    pub success: bool,
    pub id: Option<Uuid>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!(Category::parse("produce"), Some(Category::Produce));
        assert_eq!(Category::parse("  Livestock "), Some(Category::Livestock));
        assert_eq!(Category::parse("post_harvest"), Some(Category::PostHarvest));
        assert_eq!(Category::parse("widgets"), None);
    }

    #[test]
    fn test_category_display_round_trip() {
        for cat in [
            Category::Produce,
            Category::Vegetables,
            Category::Honey,
            Category::Transformed,
            Category::PostHarvest,
        ] {
            assert_eq!(Category::parse(&cat.to_string()), Some(cat));
        }
    }

    #[test]
    fn test_omega_is_the_only_inverted_metric() {
        assert!(MetricType::OmegaRatio.lower_is_better());
        assert!(!MetricType::Brix.lower_is_better());
        assert!(!MetricType::Diastase.lower_is_better());
    }

    #[test]
    fn test_feeding_regime_midpoints() {
        assert_eq!(FeedingRegime::GrassOnly.omega_midpoint(), 2.5);
        assert_eq!(FeedingRegime::PastureForage.omega_midpoint(), 5.0);
        assert_eq!(FeedingRegime::GrainFinished.omega_midpoint(), 13.0);
        assert_eq!(FeedingRegime::GrainFed.omega_midpoint(), 17.0);
    }

    #[test]
    fn test_storage_decay_factors() {
        assert_eq!(StorageConditions::Ambient.decay_factor(), 1.0);
        assert_eq!(StorageConditions::Refrigerated.decay_factor(), 0.5);
        assert_eq!(StorageConditions::ColdStorage.decay_factor(), 0.3);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Artisan < Tier::Premium);
        assert!(Tier::Premium < Tier::Standard);
        assert!(Tier::Standard < Tier::Commodity);
    }
}
