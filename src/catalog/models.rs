use serde::{Deserialize, Serialize};

use crate::models::{Category, FeedingRegime, MetricType, Tier};

// ======================================================================
// CATEGORY CONFIGURATION
// ======================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakTimingMethod {
    /// Quality peaks in the middle 50% of the harvest window.
    Middle50,
    /// Quality improves to the end of the window (storage crops).
    WindowEnd,
    /// No meaningful window (continuous production).
    Continuous,
    NotApplicable,
}

/// Category-appropriate display names for the five pillars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarLabels {
    pub soil: String,
    pub heritage: String,
    pub agricultural: String,
    pub ripen: String,
    pub enrich: String,
}

impl PillarLabels {
    pub fn new(soil: &str, heritage: &str, agricultural: &str, ripen: &str, enrich: &str) -> Self {
        Self {
            soil: soil.to_string(),
            heritage: heritage.to_string(),
            agricultural: agricultural.to_string(),
            ripen: ripen.to_string(),
            enrich: enrich.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFlags {
    pub show_harvest_status: bool,
    pub show_usda_comparison: bool,
    pub show_tier_badge: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConfig {
    pub category: Category,
    pub primary_metric: MetricType,
    pub peak_timing: PeakTimingMethod,
    /// Hard floor/ceiling for the primary metric.
    pub physical_range: (f64, f64),
    /// Range used for the 0-100 quality-score mapping.
    pub scoring_range: (f64, f64),
    pub pillar_labels: PillarLabels,
    pub display: DisplayFlags,
    /// Code of the profile returned when nothing else matches.
    pub default_profile_code: String,
}

/// Sparse subcategory override, merged onto the category config.
/// Top-level options shallow-merge; pillar labels and tier thresholds
/// deep-merge field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryOverride {
    pub id: String,
    pub primary_metric: Option<MetricType>,
    pub peak_timing: Option<PeakTimingMethod>,
    pub physical_range: Option<(f64, f64)>,
    pub scoring_range: Option<(f64, f64)>,
    pub tier_thresholds: Option<PartialTierThresholds>,
    pub pillar_labels: Option<PartialPillarLabels>,
    pub display: Option<PartialDisplayFlags>,
    pub default_profile_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialPillarLabels {
    pub soil: Option<String>,
    pub heritage: Option<String>,
    pub agricultural: Option<String>,
    pub ripen: Option<String>,
    pub enrich: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialDisplayFlags {
    pub show_harvest_status: Option<bool>,
    pub show_usda_comparison: Option<bool>,
    pub show_tier_badge: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialTierThresholds {
    pub artisan: Option<f64>,
    pub premium: Option<f64>,
    pub standard: Option<f64>,
}

// ======================================================================
// TIER THRESHOLDS
// ======================================================================

/// Thresholds mapping a metric reading to a qualitative tier. Values
/// below `standard` collapse to commodity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierThresholds {
    pub artisan: f64,
    pub premium: f64,
    pub standard: f64,
}

impl TierThresholds {
    pub fn new(artisan: f64, premium: f64, standard: f64) -> Self {
        Self {
            artisan,
            premium,
            standard,
        }
    }

    pub fn classify(&self, value: f64) -> Tier {
        if value >= self.artisan {
            Tier::Artisan
        } else if value >= self.premium {
            Tier::Premium
        } else if value >= self.standard {
            Tier::Standard
        } else {
            Tier::Commodity
        }
    }

    /// For lower-is-better metrics the comparison direction flips.
    pub fn classify_inverted(&self, value: f64) -> Tier {
        if value <= self.artisan {
            Tier::Artisan
        } else if value <= self.premium {
            Tier::Premium
        } else if value <= self.standard {
            Tier::Standard
        } else {
            Tier::Commodity
        }
    }
}

// ======================================================================
// CULTIVARS & BREEDS
// ======================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeritageIntent {
    TrueHeritage,
    HeirloomQuality,
    HeirloomUtility,
    ModernNutrient,
    ModernFlavor,
    Commercial,
}

impl HeritageIntent {
    /// Fallback base Brix when a cultivar has no research average.
    pub fn default_base_brix(&self) -> f64 {
        match self {
            HeritageIntent::TrueHeritage => 13.0,
            HeritageIntent::HeirloomQuality => 12.5,
            HeritageIntent::HeirloomUtility => 11.5,
            HeritageIntent::ModernNutrient => 12.0,
            HeritageIntent::ModernFlavor => 11.5,
            HeritageIntent::Commercial => 10.0,
        }
    }

    /// Heritage/heirloom genetics contribute a positive pillar signal.
    pub fn heritage_bonus(&self) -> f64 {
        match self {
            HeritageIntent::TrueHeritage => 1.0,
            HeritageIntent::HeirloomQuality => 0.8,
            HeritageIntent::HeirloomUtility => 0.5,
            HeritageIntent::ModernNutrient => 0.6,
            HeritageIntent::ModernFlavor => 0.4,
            HeritageIntent::Commercial => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropMaturity {
    /// Continues ripening after harvest (apples, tomatoes).
    Climacteric,
    /// Ripens only on the plant (citrus, berries, cherries).
    NonClimacteric,
}

/// A named genetic identity: fruit cultivar, vegetable-adjacent tree
/// crop, or livestock breed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cultivar {
    pub id: String,
    pub display_name: String,
    pub category: Category,
    /// Specific crop ("navel_orange", "sweet_cherry").
    pub crop: String,
    /// Tier-table grouping ("citrus", "cherry", "apple").
    pub crop_group: String,
    pub heritage_intent: HeritageIntent,
    /// Research average for the primary metric (Brix, ω, oil %).
    pub base_metric: Option<f64>,
    /// Published min/max for the primary metric.
    pub research_range: Option<(f64, f64)>,
    pub maturity: CropMaturity,
    pub time_to_maturity_years: Option<f64>,
    /// Precocious trees skip the young-tree penalty from age 2 up.
    pub precocious: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaMinimum {
    pub crop: String,
    pub minimum: f64,
    pub grade_label: String,
}

// ======================================================================
// VEGETABLE VARIETIES
// ======================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VegetableClass {
    Leafy,
    Cruciferous,
    Legume,
    Root,
    Nightshade,
    Allium,
    Squash,
}

impl VegetableClass {
    /// Freshness decay constant per effective day.
    pub fn decay_k(&self) -> f64 {
        match self {
            VegetableClass::Leafy => 0.15,
            VegetableClass::Cruciferous => 0.08,
            VegetableClass::Legume => 0.12,
            // Brix/storage classes decay far slower; only used when the
            // freshness submodel is forced on them.
            VegetableClass::Root | VegetableClass::Nightshade => 0.04,
            VegetableClass::Allium | VegetableClass::Squash => 0.02,
        }
    }

    pub fn uses_freshness_model(&self) -> bool {
        matches!(
            self,
            VegetableClass::Leafy | VegetableClass::Cruciferous | VegetableClass::Legume
        )
    }

    pub fn uses_brix_model(&self) -> bool {
        matches!(self, VegetableClass::Root | VegetableClass::Nightshade)
    }

    pub fn uses_storage_model(&self) -> bool {
        matches!(self, VegetableClass::Allium | VegetableClass::Squash)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetableVariety {
    pub id: String,
    pub display_name: String,
    pub class: VegetableClass,
    /// Brix submodel baseline.
    pub base_brix: Option<f64>,
    /// Brix gained per week of cold storage (root crops sweeten).
    pub cold_storage_bonus_per_week: Option<f64>,
    /// Freshness submodel: days the crop holds peak quality.
    pub optimal_fresh_days: Option<f64>,
    /// Storage submodel: curing ramp length.
    pub optimal_cure_days: Option<f64>,
    /// Storage submodel: months of full-quality storage after curing.
    pub optimal_storage_months: Option<f64>,
}

// ======================================================================
// PROFILES
// ======================================================================

/// One conjunct of a profile's required claims. The requirement is
/// satisfied when any of its phrases matches a submitted claim; a plain
/// required claim is a group of one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRequirement {
    pub any_of: Vec<String>,
}

impl ClaimRequirement {
    pub fn of(phrases: &[&str]) -> Self {
        Self {
            any_of: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Quality payload attached to a profile, by product family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ProfileQuality {
    Produce {
        brix_range: (f64, f64),
    },
    Animal {
        omega_range: (f64, f64),
        feeding_regime: FeedingRegime,
    },
    Seafood {
        omega3_range: (f64, f64),
    },
    Honey {
        diastase_range: (f64, f64),
        moisture_max: f64,
        hmf_max: f64,
    },
    Nut {
        oil_range: (f64, f64),
    },
    Transformed {
        origin_range: (f64, f64),
        compatible_transformations: Vec<String>,
    },
}

impl ProfileQuality {
    pub fn primary_range(&self) -> (f64, f64) {
        match self {
            ProfileQuality::Produce { brix_range } => *brix_range,
            ProfileQuality::Animal { omega_range, .. } => *omega_range,
            ProfileQuality::Seafood { omega3_range } => *omega3_range,
            ProfileQuality::Honey { diastase_range, .. } => *diastase_range,
            ProfileQuality::Nut { oil_range } => *oil_range,
            ProfileQuality::Transformed { origin_range, .. } => *origin_range,
        }
    }

    pub fn midpoint(&self) -> f64 {
        let (lo, hi) = self.primary_range();
        (lo + hi) / 2.0
    }
}

/// A claim-combination pattern identifying one way of producing a
/// product. Claims are stored raw here and normalized at catalog load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub code: String,
    pub display_name: String,
    pub category: Category,
    pub tier: Tier,
    /// Lower is better; first tie-break after score.
    pub quality_rank: u32,
    /// Deterministic final tie-break.
    pub sort_order: u32,
    pub required_claims: Vec<ClaimRequirement>,
    pub excluded_claims: Vec<String>,
    pub optional_claims: Vec<String>,
    pub quality: ProfileQuality,
    /// Designated fallback for the category.
    pub is_default: bool,
}

// ======================================================================
// TRANSFORMATION PROFILES
// ======================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreservationStance {
    /// Process lifts origin quality toward the high end.
    Enhances,
    /// Process carries the origin midpoint through.
    Preserves,
    Neutral,
    /// Process can hide origin quality; clip to the low end.
    RisksMasking,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationProfile {
    pub id: String,
    pub code: String,
    pub display_name: String,
    pub primary_method: String,
    pub secondary_methods: Vec<String>,
    pub excluded_methods: Vec<String>,
    /// Expected final quality (cupping points for coffee).
    pub estimated_final_quality: (f64, f64),
    pub stance: PreservationStance,
}
