use crate::catalog::models::*;
use crate::models::{Category, FeedingRegime, MetricType, Tier};
use csv::Reader;
use log::info;
use std::collections::HashMap;
use std::error::Error;

/// Loads the default embedded catalog and optional CSV supplements.
/// The embedded data is the authoritative baseline; CSV rows extend it
/// (new cultivars, new USDA minima) without recompiling.
pub struct CatalogLoader {
    pub categories: Vec<CategoryConfig>,
    pub subcategories: Vec<(Category, SubcategoryOverride)>,
    pub profiles: Vec<Profile>,
    pub transformation_profiles: Vec<TransformationProfile>,
    pub cultivars: Vec<Cultivar>,
    pub vegetable_varieties: Vec<VegetableVariety>,
    pub honey_varietals: HashMap<String, f64>,
    pub usda_minima: Vec<UsdaMinimum>,
    pub brix_tier_tables: HashMap<String, TierThresholds>,
    pub rootstock_modifiers: HashMap<String, f64>,
}

impl CatalogLoader {
    pub fn new() -> Self {
        let mut loader = Self {
            categories: Self::initialize_categories(),
            subcategories: Self::initialize_subcategories(),
            profiles: Vec::new(),
            transformation_profiles: Self::initialize_transformation_profiles(),
            cultivars: Self::initialize_cultivars(),
            vegetable_varieties: Self::initialize_vegetable_varieties(),
            honey_varietals: Self::initialize_honey_varietals(),
            usda_minima: Self::initialize_usda_minima(),
            brix_tier_tables: Self::initialize_brix_tier_tables(),
            rootstock_modifiers: Self::initialize_rootstock_modifiers(),
        };

        loader.add_livestock_profiles();
        loader.add_egg_profiles();
        loader.add_dairy_profiles();
        loader.add_produce_profiles();
        loader.add_vegetable_profiles();
        loader.add_nut_profiles();
        loader.add_seafood_profiles();
        loader.add_honey_profiles();
        loader.add_transformed_profiles();

        info!(
            "Catalog loaded: {} categories, {} profiles, {} cultivars, {} transformation profiles",
            loader.categories.len(),
            loader.profiles.len(),
            loader.cultivars.len(),
            loader.transformation_profiles.len()
        );
        loader
    }

    // ==================================================================
    // CATEGORY CONFIGS
    // ==================================================================

    fn initialize_categories() -> Vec<CategoryConfig> {
        vec![
            CategoryConfig {
                category: Category::Produce,
                primary_metric: MetricType::Brix,
                peak_timing: PeakTimingMethod::Middle50,
                physical_range: (0.0, 30.0),
                scoring_range: (4.0, 20.0),
                pillar_labels: PillarLabels::new(
                    "Soil", "Heritage", "Growing practice", "Ripening", "Nutrition",
                ),
                display: DisplayFlags {
                    show_harvest_status: true,
                    show_usda_comparison: true,
                    show_tier_badge: true,
                },
                default_profile_code: "P-D".to_string(),
            },
            CategoryConfig {
                category: Category::Vegetables,
                primary_metric: MetricType::FreshnessScore,
                peak_timing: PeakTimingMethod::Middle50,
                physical_range: (0.0, 100.0),
                scoring_range: (0.0, 100.0),
                pillar_labels: PillarLabels::new(
                    "Soil", "Variety", "Growing practice", "Freshness", "Nutrition",
                ),
                display: DisplayFlags {
                    show_harvest_status: true,
                    show_usda_comparison: false,
                    show_tier_badge: true,
                },
                default_profile_code: "V-B".to_string(),
            },
            CategoryConfig {
                category: Category::Nut,
                primary_metric: MetricType::OilContent,
                peak_timing: PeakTimingMethod::WindowEnd,
                physical_range: (40.0, 85.0),
                scoring_range: (55.0, 75.0),
                pillar_labels: PillarLabels::new(
                    "Soil", "Heritage", "Orchard practice", "Maturity", "Oil quality",
                ),
                display: DisplayFlags {
                    show_harvest_status: false,
                    show_usda_comparison: false,
                    show_tier_badge: true,
                },
                default_profile_code: "N-C".to_string(),
            },
            CategoryConfig {
                category: Category::Livestock,
                primary_metric: MetricType::OmegaRatio,
                peak_timing: PeakTimingMethod::NotApplicable,
                physical_range: (0.5, 50.0),
                scoring_range: (1.5, 30.0),
                pillar_labels: PillarLabels::new(
                    "Pasture", "Breed", "Feeding practice", "Maturation", "Fatty acids",
                ),
                display: DisplayFlags {
                    show_harvest_status: false,
                    show_usda_comparison: false,
                    show_tier_badge: true,
                },
                default_profile_code: "B-G".to_string(),
            },
            CategoryConfig {
                category: Category::Eggs,
                primary_metric: MetricType::OmegaRatio,
                peak_timing: PeakTimingMethod::Continuous,
                physical_range: (0.5, 50.0),
                scoring_range: (1.5, 30.0),
                pillar_labels: PillarLabels::new(
                    "Pasture", "Breed", "Flock practice", "Lay freshness", "Fatty acids",
                ),
                display: DisplayFlags {
                    show_harvest_status: false,
                    show_usda_comparison: false,
                    show_tier_badge: true,
                },
                default_profile_code: "E-E".to_string(),
            },
            CategoryConfig {
                category: Category::Dairy,
                primary_metric: MetricType::OmegaRatio,
                peak_timing: PeakTimingMethod::Continuous,
                physical_range: (0.5, 50.0),
                scoring_range: (1.0, 20.0),
                pillar_labels: PillarLabels::new(
                    "Pasture", "Breed", "Herd practice", "Season", "Fatty acids",
                ),
                display: DisplayFlags {
                    show_harvest_status: false,
                    show_usda_comparison: false,
                    show_tier_badge: true,
                },
                default_profile_code: "D-D".to_string(),
            },
            CategoryConfig {
                category: Category::Seafood,
                primary_metric: MetricType::Omega3Content,
                peak_timing: PeakTimingMethod::NotApplicable,
                physical_range: (0.0, 4000.0),
                scoring_range: (200.0, 2000.0),
                pillar_labels: PillarLabels::new(
                    "Waters", "Species", "Harvest method", "Season", "Omega-3",
                ),
                display: DisplayFlags {
                    show_harvest_status: false,
                    show_usda_comparison: false,
                    show_tier_badge: true,
                },
                default_profile_code: "S-C".to_string(),
            },
            CategoryConfig {
                category: Category::Honey,
                primary_metric: MetricType::Diastase,
                peak_timing: PeakTimingMethod::NotApplicable,
                physical_range: (0.0, 40.0),
                scoring_range: (3.0, 25.0),
                pillar_labels: PillarLabels::new(
                    "Forage", "Varietal", "Apiary practice", "Extraction", "Enzymes",
                ),
                display: DisplayFlags {
                    show_harvest_status: false,
                    show_usda_comparison: false,
                    show_tier_badge: true,
                },
                default_profile_code: "H-C".to_string(),
            },
            CategoryConfig {
                category: Category::Transformed,
                primary_metric: MetricType::CuppingScore,
                peak_timing: PeakTimingMethod::NotApplicable,
                physical_range: (0.0, 100.0),
                scoring_range: (60.0, 100.0),
                pillar_labels: PillarLabels::new(
                    "Terroir", "Origin", "Farm practice", "Processing", "Cup quality",
                ),
                display: DisplayFlags {
                    show_harvest_status: false,
                    show_usda_comparison: false,
                    show_tier_badge: true,
                },
                default_profile_code: "T-C".to_string(),
            },
            // Post-harvest handling is catalog-visible (display labels for
            // storage/processing contexts) but has no predictor of its own.
            CategoryConfig {
                category: Category::PostHarvest,
                primary_metric: MetricType::StorageScore,
                peak_timing: PeakTimingMethod::WindowEnd,
                physical_range: (0.0, 100.0),
                scoring_range: (0.0, 100.0),
                pillar_labels: PillarLabels::new(
                    "Origin", "Variety", "Handling", "Storage", "Condition",
                ),
                display: DisplayFlags {
                    show_harvest_status: false,
                    show_usda_comparison: false,
                    show_tier_badge: false,
                },
                default_profile_code: "V-B".to_string(),
            },
        ]
    }

    fn initialize_subcategories() -> Vec<(Category, SubcategoryOverride)> {
        vec![
            // Citrus keeps the Middle50 window but runs on its own tier table
            (
                Category::Produce,
                SubcategoryOverride {
                    id: "citrus".to_string(),
                    scoring_range: Some((6.0, 16.0)),
                    tier_thresholds: Some(PartialTierThresholds {
                        artisan: Some(12.0),
                        premium: Some(11.0),
                        standard: Some(8.0),
                    }),
                    ..Default::default()
                },
            ),
            (
                Category::Produce,
                SubcategoryOverride {
                    id: "berry".to_string(),
                    scoring_range: Some((6.0, 14.0)),
                    pillar_labels: Some(PartialPillarLabels {
                        ripen: Some("Pick timing".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            ),
            (
                Category::Produce,
                SubcategoryOverride {
                    id: "stone_fruit".to_string(),
                    scoring_range: Some((8.0, 18.0)),
                    ..Default::default()
                },
            ),
            (
                Category::Livestock,
                SubcategoryOverride {
                    id: "beef".to_string(),
                    pillar_labels: Some(PartialPillarLabels {
                        ripen: Some("Finishing".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            ),
            (
                Category::Seafood,
                SubcategoryOverride {
                    id: "oyster".to_string(),
                    pillar_labels: Some(PartialPillarLabels {
                        soil: Some("Merroir".to_string()),
                        ripen: Some("Season".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            ),
            (
                Category::Transformed,
                SubcategoryOverride {
                    id: "coffee".to_string(),
                    pillar_labels: Some(PartialPillarLabels {
                        ripen: Some("Roast".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            ),
        ]
    }

    // ==================================================================
    // PROFILES - livestock (beef)
    // ==================================================================

    fn add_livestock_profiles(&mut self) {
        let livestock = vec![
            Profile {
                id: "profile_b_a".to_string(),
                code: "B-A".to_string(),
                display_name: "100% Grass-Fed, Grass-Finished".to_string(),
                category: Category::Livestock,
                tier: Tier::Artisan,
                quality_rank: 1,
                sort_order: 10,
                // A grass claim AND an explicit confinement exclusion.
                // "Grass-fed" alone never lands here.
                required_claims: vec![
                    ClaimRequirement::of(&["grass-fed", "grass-finished"]),
                    ClaimRequirement::of(&[
                        "100% grass-fed",
                        "grass-finished",
                        "no feedlot",
                        "no cafo",
                        "never confined",
                    ]),
                ],
                excluded_claims: vec!["grain-finished".to_string(), "grain-fed".to_string()],
                optional_claims: vec![
                    "regenerative".to_string(),
                    "rotational grazing".to_string(),
                    "aga certified".to_string(),
                ],
                quality: ProfileQuality::Animal {
                    omega_range: (2.0, 3.0),
                    feeding_regime: FeedingRegime::GrassOnly,
                },
                is_default: false,
            },
            Profile {
                id: "profile_b_b".to_string(),
                code: "B-B".to_string(),
                display_name: "Pasture-Raised, Verified No Confinement".to_string(),
                category: Category::Livestock,
                tier: Tier::Premium,
                quality_rank: 2,
                sort_order: 20,
                required_claims: vec![
                    ClaimRequirement::of(&["pasture-raised"]),
                    ClaimRequirement::of(&["no feedlot", "no cafo", "never confined"]),
                ],
                excluded_claims: vec!["grain-finished".to_string(), "grain-fed".to_string()],
                optional_claims: vec!["organic".to_string(), "regenerative".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (4.0, 6.0),
                    feeding_regime: FeedingRegime::PastureForage,
                },
                is_default: false,
            },
            Profile {
                id: "profile_b_c".to_string(),
                code: "B-C".to_string(),
                display_name: "Grass-Fed (Marketing Claim)".to_string(),
                category: Category::Livestock,
                tier: Tier::Standard,
                quality_rank: 3,
                sort_order: 30,
                // "Grass-fed" with no finishing claim. Silence is a signal:
                // feedlot finishing remains possible.
                required_claims: vec![ClaimRequirement::of(&["grass-fed"])],
                excluded_claims: vec![
                    "100% grass-fed".to_string(),
                    "grass-finished".to_string(),
                    "no feedlot".to_string(),
                    "no cafo".to_string(),
                    "never confined".to_string(),
                ],
                optional_claims: vec!["organic".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (8.0, 15.0),
                    feeding_regime: FeedingRegime::GrainFinished,
                },
                is_default: false,
            },
            Profile {
                id: "profile_b_d".to_string(),
                code: "B-D".to_string(),
                display_name: "Pasture-Raised (Marketing Claim)".to_string(),
                category: Category::Livestock,
                tier: Tier::Standard,
                quality_rank: 4,
                sort_order: 40,
                required_claims: vec![ClaimRequirement::of(&["pasture-raised", "free-range"])],
                excluded_claims: vec![
                    "grass-fed".to_string(),
                    "grass-finished".to_string(),
                    "no feedlot".to_string(),
                    "no cafo".to_string(),
                    "never confined".to_string(),
                ],
                optional_claims: vec!["organic".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (10.0, 16.0),
                    feeding_regime: FeedingRegime::GrainFinished,
                },
                is_default: false,
            },
            Profile {
                id: "profile_b_e".to_string(),
                code: "B-E".to_string(),
                display_name: "Grain-Finished (Disclosed)".to_string(),
                category: Category::Livestock,
                tier: Tier::Standard,
                quality_rank: 5,
                sort_order: 50,
                required_claims: vec![ClaimRequirement::of(&["grain-finished"])],
                excluded_claims: vec!["grass-finished".to_string()],
                optional_claims: vec!["pasture-raised".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (11.0, 15.0),
                    feeding_regime: FeedingRegime::GrainFinished,
                },
                is_default: false,
            },
            Profile {
                id: "profile_b_f".to_string(),
                code: "B-F".to_string(),
                display_name: "Premium CAFO (Breed/Grade Program)".to_string(),
                category: Category::Livestock,
                tier: Tier::Commodity,
                quality_rank: 6,
                sort_order: 60,
                // Breed and USDA-grade markers with no process claims:
                // extended feedlot time for marbling.
                required_claims: vec![ClaimRequirement::of(&[
                    "wagyu", "kobe", "prime", "a5", "certified angus",
                ])],
                excluded_claims: vec![
                    "grass-fed".to_string(),
                    "grass-finished".to_string(),
                    "pasture-raised".to_string(),
                    "no feedlot".to_string(),
                    "no cafo".to_string(),
                ],
                optional_claims: vec!["dry aged".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (20.0, 26.0),
                    feeding_regime: FeedingRegime::GrainFed,
                },
                is_default: false,
            },
            Profile {
                id: "profile_b_g".to_string(),
                code: "B-G".to_string(),
                display_name: "Commodity Beef".to_string(),
                category: Category::Livestock,
                tier: Tier::Commodity,
                quality_rank: 7,
                sort_order: 70,
                required_claims: vec![],
                excluded_claims: vec![],
                optional_claims: vec!["organic".to_string(), "local".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (14.0, 20.0),
                    feeding_regime: FeedingRegime::GrainFed,
                },
                is_default: true,
            },
        ];
        self.profiles.extend(livestock);
    }

    // ==================================================================
    // PROFILES - eggs
    // ==================================================================

    fn add_egg_profiles(&mut self) {
        let eggs = vec![
            Profile {
                id: "profile_e_a".to_string(),
                code: "E-A".to_string(),
                display_name: "Pasture-Raised, Verified Rotation".to_string(),
                category: Category::Eggs,
                tier: Tier::Artisan,
                quality_rank: 1,
                sort_order: 10,
                required_claims: vec![
                    ClaimRequirement::of(&["pasture-raised"]),
                    ClaimRequirement::of(&[
                        "never confined",
                        "no confinement",
                        "rotated daily",
                        "mobile coop",
                    ]),
                ],
                excluded_claims: vec![],
                optional_claims: vec!["soy free".to_string(), "corn free".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (3.0, 6.0),
                    feeding_regime: FeedingRegime::PastureForage,
                },
                is_default: false,
            },
            Profile {
                id: "profile_e_b".to_string(),
                code: "E-B".to_string(),
                display_name: "Pasture-Raised (Marketing Claim)".to_string(),
                category: Category::Eggs,
                tier: Tier::Premium,
                quality_rank: 2,
                sort_order: 20,
                required_claims: vec![ClaimRequirement::of(&["pasture-raised"])],
                excluded_claims: vec![
                    "never confined".to_string(),
                    "no confinement".to_string(),
                    "rotated daily".to_string(),
                    "mobile coop".to_string(),
                ],
                optional_claims: vec!["organic".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (6.0, 10.0),
                    feeding_regime: FeedingRegime::PastureForage,
                },
                is_default: false,
            },
            Profile {
                id: "profile_e_c".to_string(),
                code: "E-C".to_string(),
                display_name: "Free-Range".to_string(),
                category: Category::Eggs,
                tier: Tier::Standard,
                quality_rank: 3,
                sort_order: 30,
                required_claims: vec![ClaimRequirement::of(&["free-range"])],
                excluded_claims: vec!["pasture-raised".to_string()],
                optional_claims: vec!["organic".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (10.0, 15.0),
                    feeding_regime: FeedingRegime::GrainFed,
                },
                is_default: false,
            },
            Profile {
                id: "profile_e_d".to_string(),
                code: "E-D".to_string(),
                display_name: "Cage-Free".to_string(),
                category: Category::Eggs,
                tier: Tier::Standard,
                quality_rank: 4,
                sort_order: 40,
                required_claims: vec![ClaimRequirement::of(&["cage-free"])],
                excluded_claims: vec!["free-range".to_string(), "pasture-raised".to_string()],
                optional_claims: vec![],
                quality: ProfileQuality::Animal {
                    omega_range: (12.0, 17.0),
                    feeding_regime: FeedingRegime::GrainFed,
                },
                is_default: false,
            },
            Profile {
                id: "profile_e_e".to_string(),
                code: "E-E".to_string(),
                display_name: "Commodity Eggs".to_string(),
                category: Category::Eggs,
                tier: Tier::Commodity,
                quality_rank: 5,
                sort_order: 50,
                required_claims: vec![],
                excluded_claims: vec![],
                optional_claims: vec!["organic".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (15.0, 20.0),
                    feeding_regime: FeedingRegime::GrainFed,
                },
                is_default: true,
            },
        ];
        self.profiles.extend(eggs);
    }

    // ==================================================================
    // PROFILES - dairy
    // ==================================================================

    fn add_dairy_profiles(&mut self) {
        let dairy = vec![
            Profile {
                id: "profile_d_a".to_string(),
                code: "D-A".to_string(),
                display_name: "100% Grass-Fed Dairy".to_string(),
                category: Category::Dairy,
                tier: Tier::Artisan,
                quality_rank: 1,
                sort_order: 10,
                required_claims: vec![
                    ClaimRequirement::of(&["grass-fed"]),
                    ClaimRequirement::of(&["100% grass-fed", "no grain", "no feedlot", "no cafo"]),
                ],
                excluded_claims: vec![],
                optional_claims: vec!["a2".to_string(), "raw milk".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (1.5, 3.0),
                    feeding_regime: FeedingRegime::GrassOnly,
                },
                is_default: false,
            },
            Profile {
                id: "profile_d_b".to_string(),
                code: "D-B".to_string(),
                display_name: "Grass-Fed Dairy (Marketing Claim)".to_string(),
                category: Category::Dairy,
                tier: Tier::Standard,
                quality_rank: 2,
                sort_order: 20,
                required_claims: vec![ClaimRequirement::of(&["grass-fed", "pasture-raised"])],
                excluded_claims: vec![
                    "100% grass-fed".to_string(),
                    "no grain".to_string(),
                    "no feedlot".to_string(),
                    "no cafo".to_string(),
                ],
                optional_claims: vec!["organic".to_string()],
                quality: ProfileQuality::Animal {
                    omega_range: (4.0, 8.0),
                    feeding_regime: FeedingRegime::PastureForage,
                },
                is_default: false,
            },
            Profile {
                id: "profile_d_c".to_string(),
                code: "D-C".to_string(),
                display_name: "Organic Dairy".to_string(),
                category: Category::Dairy,
                tier: Tier::Standard,
                quality_rank: 3,
                sort_order: 30,
                required_claims: vec![ClaimRequirement::of(&["organic"])],
                excluded_claims: vec!["grass-fed".to_string()],
                optional_claims: vec![],
                quality: ProfileQuality::Animal {
                    omega_range: (5.0, 9.0),
                    feeding_regime: FeedingRegime::PastureForage,
                },
                is_default: false,
            },
            Profile {
                id: "profile_d_d".to_string(),
                code: "D-D".to_string(),
                display_name: "Commodity Dairy".to_string(),
                category: Category::Dairy,
                tier: Tier::Commodity,
                quality_rank: 4,
                sort_order: 40,
                required_claims: vec![],
                excluded_claims: vec![],
                optional_claims: vec![],
                quality: ProfileQuality::Animal {
                    omega_range: (8.0, 12.0),
                    feeding_regime: FeedingRegime::GrainFed,
                },
                is_default: true,
            },
        ];
        self.profiles.extend(dairy);
    }

    // ==================================================================
    // PROFILES - produce
    // ==================================================================

    fn add_produce_profiles(&mut self) {
        let produce = vec![
            Profile {
                id: "profile_p_a".to_string(),
                code: "P-A".to_string(),
                display_name: "Mineralized, Nutrient-Dense Program".to_string(),
                category: Category::Produce,
                tier: Tier::Artisan,
                quality_rank: 1,
                sort_order: 10,
                required_claims: vec![ClaimRequirement::of(&[
                    "mineralized",
                    "nutrient dense",
                    "brix tested",
                    "biological farming",
                ])],
                excluded_claims: vec![],
                optional_claims: vec!["organic".to_string(), "no spray".to_string()],
                quality: ProfileQuality::Produce {
                    brix_range: (13.0, 18.0),
                },
                is_default: false,
            },
            Profile {
                id: "profile_p_b".to_string(),
                code: "P-B".to_string(),
                display_name: "Regenerative, Soil-Building".to_string(),
                category: Category::Produce,
                tier: Tier::Premium,
                quality_rank: 2,
                sort_order: 20,
                required_claims: vec![ClaimRequirement::of(&[
                    "regenerative",
                    "soil banking",
                    "cover crop",
                    "no-till",
                ])],
                excluded_claims: vec![],
                optional_claims: vec!["organic".to_string(), "dry farmed".to_string()],
                quality: ProfileQuality::Produce {
                    brix_range: (12.0, 16.0),
                },
                is_default: false,
            },
            Profile {
                id: "profile_p_c".to_string(),
                code: "P-C".to_string(),
                display_name: "Organic / No-Spray".to_string(),
                category: Category::Produce,
                tier: Tier::Standard,
                quality_rank: 3,
                sort_order: 30,
                required_claims: vec![ClaimRequirement::of(&["organic", "no spray"])],
                excluded_claims: vec![],
                optional_claims: vec!["heirloom".to_string(), "tree ripened".to_string()],
                quality: ProfileQuality::Produce {
                    brix_range: (10.0, 14.0),
                },
                is_default: false,
            },
            Profile {
                id: "profile_p_d".to_string(),
                code: "P-D".to_string(),
                display_name: "Conventional Commodity".to_string(),
                category: Category::Produce,
                tier: Tier::Commodity,
                quality_rank: 4,
                sort_order: 40,
                required_claims: vec![],
                excluded_claims: vec![],
                optional_claims: vec!["local".to_string()],
                quality: ProfileQuality::Produce {
                    brix_range: (8.0, 12.0),
                },
                is_default: true,
            },
        ];
        self.profiles.extend(produce);
    }

    // ==================================================================
    // PROFILES - vegetables
    // ==================================================================

    fn add_vegetable_profiles(&mut self) {
        let vegetables = vec![
            Profile {
                id: "profile_v_a".to_string(),
                code: "V-A".to_string(),
                display_name: "Organic Market Garden".to_string(),
                category: Category::Vegetables,
                tier: Tier::Premium,
                quality_rank: 1,
                sort_order: 10,
                required_claims: vec![ClaimRequirement::of(&[
                    "organic",
                    "no spray",
                    "market garden",
                ])],
                excluded_claims: vec![],
                optional_claims: vec!["heirloom".to_string(), "regenerative".to_string()],
                quality: ProfileQuality::Produce {
                    brix_range: (6.0, 12.0),
                },
                is_default: false,
            },
            Profile {
                id: "profile_v_b".to_string(),
                code: "V-B".to_string(),
                display_name: "Commodity Vegetables".to_string(),
                category: Category::Vegetables,
                tier: Tier::Commodity,
                quality_rank: 2,
                sort_order: 20,
                required_claims: vec![],
                excluded_claims: vec![],
                optional_claims: vec!["local".to_string()],
                quality: ProfileQuality::Produce {
                    brix_range: (4.0, 8.0),
                },
                is_default: true,
            },
        ];
        self.profiles.extend(vegetables);
    }

    // ==================================================================
    // PROFILES - nuts
    // ==================================================================

    fn add_nut_profiles(&mut self) {
        let nuts = vec![
            Profile {
                id: "profile_n_a".to_string(),
                code: "N-A".to_string(),
                display_name: "Heritage / Native Grove".to_string(),
                category: Category::Nut,
                tier: Tier::Artisan,
                quality_rank: 1,
                sort_order: 10,
                required_claims: vec![ClaimRequirement::of(&[
                    "heritage",
                    "native",
                    "wild harvested",
                ])],
                excluded_claims: vec![],
                optional_claims: vec!["organic".to_string(), "dry farmed".to_string()],
                quality: ProfileQuality::Nut {
                    oil_range: (70.0, 76.0),
                },
                is_default: false,
            },
            Profile {
                id: "profile_n_b".to_string(),
                code: "N-B".to_string(),
                display_name: "Organic Orchard".to_string(),
                category: Category::Nut,
                tier: Tier::Standard,
                quality_rank: 2,
                sort_order: 20,
                required_claims: vec![ClaimRequirement::of(&["organic"])],
                excluded_claims: vec![],
                optional_claims: vec![],
                quality: ProfileQuality::Nut {
                    oil_range: (66.0, 72.0),
                },
                is_default: false,
            },
            Profile {
                id: "profile_n_c".to_string(),
                code: "N-C".to_string(),
                display_name: "Commodity Nuts".to_string(),
                category: Category::Nut,
                tier: Tier::Commodity,
                quality_rank: 3,
                sort_order: 30,
                required_claims: vec![],
                excluded_claims: vec![],
                optional_claims: vec![],
                quality: ProfileQuality::Nut {
                    oil_range: (62.0, 68.0),
                },
                is_default: true,
            },
        ];
        self.profiles.extend(nuts);
    }

    // ==================================================================
    // PROFILES - seafood
    // ==================================================================

    fn add_seafood_profiles(&mut self) {
        let seafood = vec![
            Profile {
                id: "profile_s_a".to_string(),
                code: "S-A".to_string(),
                display_name: "Wild-Caught".to_string(),
                category: Category::Seafood,
                tier: Tier::Artisan,
                quality_rank: 1,
                sort_order: 10,
                required_claims: vec![ClaimRequirement::of(&["wild caught", "wild"])],
                excluded_claims: vec!["farmed".to_string(), "farm raised".to_string()],
                optional_claims: vec!["day boat".to_string(), "line caught".to_string()],
                quality: ProfileQuality::Seafood {
                    omega3_range: (800.0, 1600.0),
                },
                is_default: false,
            },
            Profile {
                id: "profile_s_b".to_string(),
                code: "S-B".to_string(),
                display_name: "Sustainably Farmed".to_string(),
                category: Category::Seafood,
                tier: Tier::Premium,
                quality_rank: 2,
                sort_order: 20,
                required_claims: vec![ClaimRequirement::of(&[
                    "sustainably farmed",
                    "sustainable farmed",
                    "responsibly farmed",
                    "asc certified",
                ])],
                excluded_claims: vec![],
                optional_claims: vec!["no antibiotics".to_string()],
                quality: ProfileQuality::Seafood {
                    omega3_range: (500.0, 1000.0),
                },
                is_default: false,
            },
            Profile {
                id: "profile_s_c".to_string(),
                code: "S-C".to_string(),
                display_name: "Farmed Commodity".to_string(),
                category: Category::Seafood,
                tier: Tier::Commodity,
                quality_rank: 3,
                sort_order: 30,
                required_claims: vec![],
                excluded_claims: vec![],
                optional_claims: vec![],
                quality: ProfileQuality::Seafood {
                    omega3_range: (300.0, 700.0),
                },
                is_default: true,
            },
        ];
        self.profiles.extend(seafood);
    }

    // ==================================================================
    // PROFILES - honey
    // ==================================================================

    fn add_honey_profiles(&mut self) {
        let honey = vec![
            Profile {
                id: "profile_h_a".to_string(),
                code: "H-A".to_string(),
                display_name: "Raw Single-Varietal".to_string(),
                category: Category::Honey,
                tier: Tier::Artisan,
                quality_rank: 1,
                sort_order: 10,
                required_claims: vec![
                    ClaimRequirement::of(&["raw", "unfiltered", "unheated"]),
                    ClaimRequirement::of(&["single varietal", "varietal", "single origin"]),
                ],
                excluded_claims: vec!["pasteurized".to_string(), "blended".to_string()],
                optional_claims: vec!["comb".to_string(), "estate".to_string()],
                quality: ProfileQuality::Honey {
                    diastase_range: (15.0, 30.0),
                    moisture_max: 18.5,
                    hmf_max: 15.0,
                },
                is_default: false,
            },
            Profile {
                id: "profile_h_b".to_string(),
                code: "H-B".to_string(),
                display_name: "Raw Blended".to_string(),
                category: Category::Honey,
                tier: Tier::Premium,
                quality_rank: 2,
                sort_order: 20,
                required_claims: vec![ClaimRequirement::of(&["raw", "unfiltered", "unheated"])],
                excluded_claims: vec!["pasteurized".to_string()],
                optional_claims: vec!["local".to_string(), "wildflower".to_string()],
                quality: ProfileQuality::Honey {
                    diastase_range: (10.0, 20.0),
                    moisture_max: 18.5,
                    hmf_max: 25.0,
                },
                is_default: false,
            },
            Profile {
                id: "profile_h_c".to_string(),
                code: "H-C".to_string(),
                display_name: "Processed Commodity Honey".to_string(),
                category: Category::Honey,
                tier: Tier::Commodity,
                quality_rank: 3,
                sort_order: 30,
                required_claims: vec![],
                excluded_claims: vec![],
                optional_claims: vec![],
                quality: ProfileQuality::Honey {
                    diastase_range: (3.0, 8.0),
                    moisture_max: 20.0,
                    hmf_max: 40.0,
                },
                is_default: true,
            },
        ];
        self.profiles.extend(honey);
    }

    // ==================================================================
    // PROFILES - transformed goods (coffee, tea, cacao)
    // ==================================================================

    fn add_transformed_profiles(&mut self) {
        let transformed = vec![
            Profile {
                id: "profile_t_a".to_string(),
                code: "T-A".to_string(),
                display_name: "Specialty Single-Origin".to_string(),
                category: Category::Transformed,
                tier: Tier::Artisan,
                quality_rank: 1,
                sort_order: 10,
                required_claims: vec![ClaimRequirement::of(&[
                    "single origin",
                    "specialty",
                    "micro lot",
                ])],
                excluded_claims: vec!["blend".to_string()],
                optional_claims: vec!["direct trade".to_string(), "high altitude".to_string()],
                quality: ProfileQuality::Transformed {
                    origin_range: (84.0, 92.0),
                    compatible_transformations: vec![
                        "coffee_washed_light".to_string(),
                        "coffee_natural_light".to_string(),
                        "coffee_honey_process".to_string(),
                    ],
                },
                is_default: false,
            },
            Profile {
                id: "profile_t_b".to_string(),
                code: "T-B".to_string(),
                display_name: "Premium Estate".to_string(),
                category: Category::Transformed,
                tier: Tier::Premium,
                quality_rank: 2,
                sort_order: 20,
                required_claims: vec![ClaimRequirement::of(&["estate", "direct trade"])],
                excluded_claims: vec![],
                optional_claims: vec!["shade grown".to_string(), "organic".to_string()],
                quality: ProfileQuality::Transformed {
                    origin_range: (80.0, 88.0),
                    compatible_transformations: vec![
                        "coffee_washed_light".to_string(),
                        "coffee_washed_medium".to_string(),
                        "coffee_natural_light".to_string(),
                    ],
                },
                is_default: false,
            },
            Profile {
                id: "profile_t_c".to_string(),
                code: "T-C".to_string(),
                display_name: "Commodity Blend".to_string(),
                category: Category::Transformed,
                tier: Tier::Commodity,
                quality_rank: 3,
                sort_order: 30,
                required_claims: vec![],
                excluded_claims: vec![],
                optional_claims: vec![],
                quality: ProfileQuality::Transformed {
                    origin_range: (70.0, 80.0),
                    compatible_transformations: vec![
                        "coffee_washed_medium".to_string(),
                        "coffee_dark_roast".to_string(),
                    ],
                },
                is_default: true,
            },
        ];
        self.profiles.extend(transformed);
    }

    fn initialize_transformation_profiles() -> Vec<TransformationProfile> {
        vec![
            TransformationProfile {
                id: "transform_washed_light".to_string(),
                code: "coffee_washed_light".to_string(),
                display_name: "Washed, Light Roast".to_string(),
                primary_method: "washed".to_string(),
                secondary_methods: vec!["light roast".to_string()],
                excluded_methods: vec!["dark roast".to_string()],
                estimated_final_quality: (85.0, 92.0),
                stance: PreservationStance::Enhances,
            },
            TransformationProfile {
                id: "transform_natural_light".to_string(),
                code: "coffee_natural_light".to_string(),
                display_name: "Natural Process, Light Roast".to_string(),
                primary_method: "natural".to_string(),
                secondary_methods: vec!["light roast".to_string()],
                excluded_methods: vec!["dark roast".to_string()],
                estimated_final_quality: (84.0, 90.0),
                stance: PreservationStance::Enhances,
            },
            TransformationProfile {
                id: "transform_honey_process".to_string(),
                code: "coffee_honey_process".to_string(),
                display_name: "Honey Process".to_string(),
                primary_method: "honey".to_string(),
                secondary_methods: vec![],
                excluded_methods: vec!["dark roast".to_string()],
                estimated_final_quality: (83.0, 90.0),
                stance: PreservationStance::Preserves,
            },
            TransformationProfile {
                id: "transform_washed_medium".to_string(),
                code: "coffee_washed_medium".to_string(),
                display_name: "Washed, Medium Roast".to_string(),
                primary_method: "washed".to_string(),
                secondary_methods: vec!["medium roast".to_string()],
                excluded_methods: vec![],
                estimated_final_quality: (80.0, 87.0),
                stance: PreservationStance::Preserves,
            },
            TransformationProfile {
                id: "transform_dark_roast".to_string(),
                code: "coffee_dark_roast".to_string(),
                display_name: "Dark Roast".to_string(),
                primary_method: "dark roast".to_string(),
                secondary_methods: vec![],
                excluded_methods: vec![],
                estimated_final_quality: (70.0, 80.0),
                stance: PreservationStance::RisksMasking,
            },
            TransformationProfile {
                id: "transform_tea_minimal".to_string(),
                code: "tea_minimal_oxidation".to_string(),
                display_name: "Minimal Oxidation".to_string(),
                primary_method: "minimal oxidation".to_string(),
                secondary_methods: vec!["shade grown".to_string()],
                excluded_methods: vec![],
                estimated_final_quality: (80.0, 90.0),
                stance: PreservationStance::Preserves,
            },
            TransformationProfile {
                id: "transform_cacao_stone".to_string(),
                code: "cacao_stone_ground".to_string(),
                display_name: "Stone Ground, Low Heat".to_string(),
                primary_method: "stone ground".to_string(),
                secondary_methods: vec![],
                excluded_methods: vec!["dutch process".to_string()],
                estimated_final_quality: (78.0, 88.0),
                stance: PreservationStance::Preserves,
            },
        ]
    }

    // ==================================================================
    // CULTIVARS & BREEDS
    // ==================================================================

    fn initialize_cultivars() -> Vec<Cultivar> {
        vec![
            // CITRUS
            Cultivar {
                id: "washington_navel".to_string(),
                display_name: "Washington Navel".to_string(),
                category: Category::Produce,
                crop: "navel_orange".to_string(),
                crop_group: "citrus".to_string(),
                heritage_intent: HeritageIntent::HeirloomQuality,
                base_metric: Some(11.5), // UC Riverside citrus variety trials
                research_range: Some((9.5, 14.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: Some(4.0),
                precocious: false,
            },
            Cultivar {
                id: "valencia".to_string(),
                display_name: "Valencia".to_string(),
                category: Category::Produce,
                crop: "valencia_orange".to_string(),
                crop_group: "citrus".to_string(),
                heritage_intent: HeritageIntent::HeirloomUtility,
                base_metric: Some(10.5),
                research_range: Some((9.0, 13.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: Some(4.0),
                precocious: false,
            },
            Cultivar {
                id: "cara_cara".to_string(),
                display_name: "Cara Cara".to_string(),
                category: Category::Produce,
                crop: "navel_orange".to_string(),
                crop_group: "citrus".to_string(),
                heritage_intent: HeritageIntent::ModernFlavor,
                base_metric: Some(12.0),
                research_range: Some((10.0, 14.5)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: Some(3.0),
                precocious: false,
            },
            // APPLES
            Cultivar {
                id: "honeycrisp".to_string(),
                display_name: "Honeycrisp".to_string(),
                category: Category::Produce,
                crop: "apple".to_string(),
                crop_group: "apple".to_string(),
                heritage_intent: HeritageIntent::ModernFlavor,
                base_metric: Some(13.5),
                research_range: Some((12.0, 16.0)),
                maturity: CropMaturity::Climacteric,
                time_to_maturity_years: Some(3.0),
                // Bears in year two on dwarfing rootstock
                precocious: true,
            },
            Cultivar {
                id: "gravenstein".to_string(),
                display_name: "Gravenstein".to_string(),
                category: Category::Produce,
                crop: "apple".to_string(),
                crop_group: "apple".to_string(),
                heritage_intent: HeritageIntent::TrueHeritage,
                base_metric: Some(12.5),
                research_range: Some((11.0, 15.0)),
                maturity: CropMaturity::Climacteric,
                time_to_maturity_years: Some(5.0),
                precocious: false,
            },
            // CHERRIES
            Cultivar {
                id: "bing".to_string(),
                display_name: "Bing".to_string(),
                category: Category::Produce,
                crop: "sweet_cherry".to_string(),
                crop_group: "cherry".to_string(),
                heritage_intent: HeritageIntent::HeirloomQuality,
                base_metric: Some(17.5),
                research_range: Some((14.0, 22.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: Some(5.0),
                precocious: false,
            },
            Cultivar {
                id: "rainier".to_string(),
                display_name: "Rainier".to_string(),
                category: Category::Produce,
                crop: "sweet_cherry".to_string(),
                crop_group: "cherry".to_string(),
                heritage_intent: HeritageIntent::ModernFlavor,
                base_metric: Some(18.5),
                research_range: Some((15.0, 23.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: Some(5.0),
                precocious: false,
            },
            // STONE FRUIT
            Cultivar {
                id: "elberta".to_string(),
                display_name: "Elberta".to_string(),
                category: Category::Produce,
                crop: "peach".to_string(),
                crop_group: "stone_fruit".to_string(),
                heritage_intent: HeritageIntent::TrueHeritage,
                base_metric: Some(12.0),
                research_range: Some((10.0, 15.0)),
                maturity: CropMaturity::Climacteric,
                time_to_maturity_years: Some(3.0),
                precocious: false,
            },
            // TOMATOES (garden fruit sold through produce channels)
            Cultivar {
                id: "brandywine".to_string(),
                display_name: "Brandywine".to_string(),
                category: Category::Produce,
                crop: "tomato".to_string(),
                crop_group: "tomato".to_string(),
                heritage_intent: HeritageIntent::TrueHeritage,
                base_metric: Some(5.5),
                research_range: Some((4.5, 7.5)),
                maturity: CropMaturity::Climacteric,
                time_to_maturity_years: None,
                precocious: false,
            },
            Cultivar {
                id: "sungold".to_string(),
                display_name: "Sungold".to_string(),
                category: Category::Produce,
                crop: "cherry_tomato".to_string(),
                crop_group: "tomato".to_string(),
                heritage_intent: HeritageIntent::ModernFlavor,
                base_metric: Some(8.0),
                research_range: Some((6.0, 10.0)),
                maturity: CropMaturity::Climacteric,
                time_to_maturity_years: None,
                precocious: false,
            },
            // NUTS
            Cultivar {
                id: "chandler_walnut".to_string(),
                display_name: "Chandler".to_string(),
                category: Category::Nut,
                crop: "walnut".to_string(),
                crop_group: "walnut".to_string(),
                heritage_intent: HeritageIntent::ModernNutrient,
                base_metric: Some(66.0), // kernel oil %
                research_range: Some((62.0, 70.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: Some(6.0),
                precocious: false,
            },
            Cultivar {
                id: "mission_almond".to_string(),
                display_name: "Mission".to_string(),
                category: Category::Nut,
                crop: "almond".to_string(),
                crop_group: "almond".to_string(),
                heritage_intent: HeritageIntent::HeirloomUtility,
                base_metric: Some(68.0),
                research_range: Some((64.0, 72.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: Some(4.0),
                precocious: false,
            },
            Cultivar {
                id: "stuart_pecan".to_string(),
                display_name: "Stuart".to_string(),
                category: Category::Nut,
                crop: "pecan".to_string(),
                crop_group: "pecan".to_string(),
                heritage_intent: HeritageIntent::TrueHeritage,
                base_metric: Some(72.0),
                research_range: Some((68.0, 76.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: Some(8.0),
                precocious: false,
            },
            // LIVESTOCK BREEDS (base metric is the typical ω ratio on
            // breed-appropriate feed)
            Cultivar {
                id: "devon".to_string(),
                display_name: "Devon".to_string(),
                category: Category::Livestock,
                crop: "beef".to_string(),
                crop_group: "beef".to_string(),
                heritage_intent: HeritageIntent::TrueHeritage,
                base_metric: Some(2.5),
                research_range: Some((1.8, 4.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: Some(2.0),
                precocious: false,
            },
            Cultivar {
                id: "american_wagyu".to_string(),
                display_name: "American Wagyu".to_string(),
                category: Category::Livestock,
                crop: "beef".to_string(),
                crop_group: "beef".to_string(),
                heritage_intent: HeritageIntent::ModernFlavor,
                base_metric: Some(18.0),
                research_range: Some((10.0, 26.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: Some(2.5),
                precocious: false,
            },
            // POULTRY BREEDS
            Cultivar {
                id: "rhode_island_red".to_string(),
                display_name: "Rhode Island Red".to_string(),
                category: Category::Eggs,
                crop: "chicken_egg".to_string(),
                crop_group: "eggs".to_string(),
                heritage_intent: HeritageIntent::TrueHeritage,
                base_metric: Some(8.0),
                research_range: Some((4.0, 14.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: None,
                precocious: false,
            },
            Cultivar {
                id: "white_leghorn".to_string(),
                display_name: "White Leghorn".to_string(),
                category: Category::Eggs,
                crop: "chicken_egg".to_string(),
                crop_group: "eggs".to_string(),
                heritage_intent: HeritageIntent::Commercial,
                base_metric: Some(15.0),
                research_range: Some((10.0, 20.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: None,
                precocious: false,
            },
            // DAIRY BREEDS
            Cultivar {
                id: "jersey".to_string(),
                display_name: "Jersey".to_string(),
                category: Category::Dairy,
                crop: "milk".to_string(),
                crop_group: "dairy".to_string(),
                heritage_intent: HeritageIntent::TrueHeritage,
                base_metric: Some(2.5),
                research_range: Some((1.5, 5.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: None,
                precocious: false,
            },
            Cultivar {
                id: "holstein".to_string(),
                display_name: "Holstein".to_string(),
                category: Category::Dairy,
                crop: "milk".to_string(),
                crop_group: "dairy".to_string(),
                heritage_intent: HeritageIntent::Commercial,
                base_metric: Some(6.0),
                research_range: Some((3.0, 10.0)),
                maturity: CropMaturity::NonClimacteric,
                time_to_maturity_years: None,
                precocious: false,
            },
        ]
    }

    // ==================================================================
    // VEGETABLE VARIETIES
    // ==================================================================

    fn initialize_vegetable_varieties() -> Vec<VegetableVariety> {
        vec![
            // LEAFY (freshness model, k = 0.15)
            VegetableVariety {
                id: "butterhead_lettuce".to_string(),
                display_name: "Butterhead Lettuce".to_string(),
                class: VegetableClass::Leafy,
                base_brix: None,
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: Some(7.0),
                optimal_cure_days: None,
                optimal_storage_months: None,
            },
            VegetableVariety {
                id: "spinach".to_string(),
                display_name: "Spinach".to_string(),
                class: VegetableClass::Leafy,
                base_brix: None,
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: Some(5.0),
                optimal_cure_days: None,
                optimal_storage_months: None,
            },
            VegetableVariety {
                id: "lacinato_kale".to_string(),
                display_name: "Lacinato Kale".to_string(),
                class: VegetableClass::Leafy,
                base_brix: None,
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: Some(10.0),
                optimal_cure_days: None,
                optimal_storage_months: None,
            },
            // CRUCIFEROUS (freshness model, k = 0.08)
            VegetableVariety {
                id: "broccoli_calabrese".to_string(),
                display_name: "Calabrese Broccoli".to_string(),
                class: VegetableClass::Cruciferous,
                base_brix: None,
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: Some(10.0),
                optimal_cure_days: None,
                optimal_storage_months: None,
            },
            VegetableVariety {
                id: "green_cabbage".to_string(),
                display_name: "Green Cabbage".to_string(),
                class: VegetableClass::Cruciferous,
                base_brix: None,
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: Some(21.0),
                optimal_cure_days: None,
                optimal_storage_months: None,
            },
            // LEGUMES (freshness model, k = 0.12)
            VegetableVariety {
                id: "sugar_snap_pea".to_string(),
                display_name: "Sugar Snap Pea".to_string(),
                class: VegetableClass::Legume,
                base_brix: None,
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: Some(5.0),
                optimal_cure_days: None,
                optimal_storage_months: None,
            },
            VegetableVariety {
                id: "blue_lake_bean".to_string(),
                display_name: "Blue Lake Green Bean".to_string(),
                class: VegetableClass::Legume,
                base_brix: None,
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: Some(7.0),
                optimal_cure_days: None,
                optimal_storage_months: None,
            },
            // ROOTS (Brix model; cold storage sweetens)
            VegetableVariety {
                id: "nantes_carrot".to_string(),
                display_name: "Nantes Carrot".to_string(),
                class: VegetableClass::Root,
                base_brix: Some(8.0),
                cold_storage_bonus_per_week: Some(0.5),
                optimal_fresh_days: None,
                optimal_cure_days: None,
                optimal_storage_months: Some(4.0),
            },
            VegetableVariety {
                id: "detroit_beet".to_string(),
                display_name: "Detroit Dark Red Beet".to_string(),
                class: VegetableClass::Root,
                base_brix: Some(10.0),
                cold_storage_bonus_per_week: Some(0.4),
                optimal_fresh_days: None,
                optimal_cure_days: None,
                optimal_storage_months: Some(4.0),
            },
            VegetableVariety {
                id: "harris_parsnip".to_string(),
                display_name: "Harris Model Parsnip".to_string(),
                class: VegetableClass::Root,
                base_brix: Some(9.0),
                cold_storage_bonus_per_week: Some(0.8),
                optimal_fresh_days: None,
                optimal_cure_days: None,
                optimal_storage_months: Some(5.0),
            },
            // NIGHTSHADES (Brix model, no cold bonus)
            VegetableVariety {
                id: "slicing_tomato".to_string(),
                display_name: "Slicing Tomato".to_string(),
                class: VegetableClass::Nightshade,
                base_brix: Some(5.0),
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: None,
                optimal_cure_days: None,
                optimal_storage_months: None,
            },
            VegetableVariety {
                id: "bell_pepper".to_string(),
                display_name: "Bell Pepper".to_string(),
                class: VegetableClass::Nightshade,
                base_brix: Some(6.0),
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: None,
                optimal_cure_days: None,
                optimal_storage_months: None,
            },
            // ALLIUMS (curing + storage model)
            VegetableVariety {
                id: "yellow_storage_onion".to_string(),
                display_name: "Yellow Storage Onion".to_string(),
                class: VegetableClass::Allium,
                base_brix: None,
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: None,
                optimal_cure_days: Some(14.0),
                optimal_storage_months: Some(6.0),
            },
            VegetableVariety {
                id: "music_garlic".to_string(),
                display_name: "Music Garlic".to_string(),
                class: VegetableClass::Allium,
                base_brix: None,
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: None,
                optimal_cure_days: Some(21.0),
                optimal_storage_months: Some(8.0),
            },
            // WINTER SQUASH (curing + storage model)
            VegetableVariety {
                id: "butternut_squash".to_string(),
                display_name: "Butternut Squash".to_string(),
                class: VegetableClass::Squash,
                base_brix: None,
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: None,
                optimal_cure_days: Some(10.0),
                optimal_storage_months: Some(6.0),
            },
            VegetableVariety {
                id: "acorn_squash".to_string(),
                display_name: "Acorn Squash".to_string(),
                class: VegetableClass::Squash,
                base_brix: None,
                cold_storage_bonus_per_week: None,
                optimal_fresh_days: None,
                optimal_cure_days: Some(7.0),
                optimal_storage_months: Some(3.0),
            },
        ]
    }

    fn initialize_honey_varietals() -> HashMap<String, f64> {
        let mut varietals = HashMap::new();
        // Baseline diastase numbers by floral source. Manuka runs low
        // naturally (its quality markers are non-enzymatic).
        varietals.insert("manuka".to_string(), 10.0);
        varietals.insert("acacia".to_string(), 14.0);
        varietals.insert("tupelo".to_string(), 18.0);
        varietals.insert("sourwood".to_string(), 20.0);
        varietals.insert("clover".to_string(), 15.0);
        varietals.insert("orange_blossom".to_string(), 16.0);
        varietals.insert("wildflower".to_string(), 12.0);
        varietals.insert("blended".to_string(), 8.0);
        varietals
    }

    fn initialize_usda_minima() -> Vec<UsdaMinimum> {
        vec![
            UsdaMinimum {
                crop: "navel_orange".to_string(),
                minimum: 10.0,
                grade_label: "U.S. Fancy".to_string(),
            },
            UsdaMinimum {
                crop: "valencia_orange".to_string(),
                minimum: 9.0,
                grade_label: "U.S. Fancy".to_string(),
            },
            UsdaMinimum {
                crop: "apple".to_string(),
                minimum: 10.5,
                grade_label: "U.S. Extra Fancy".to_string(),
            },
            UsdaMinimum {
                crop: "sweet_cherry".to_string(),
                minimum: 14.0,
                grade_label: "U.S. No. 1".to_string(),
            },
            UsdaMinimum {
                crop: "peach".to_string(),
                minimum: 10.0,
                grade_label: "U.S. Fancy".to_string(),
            },
            UsdaMinimum {
                crop: "grapefruit".to_string(),
                minimum: 9.0,
                grade_label: "U.S. Fancy".to_string(),
            },
        ]
    }

    fn initialize_brix_tier_tables() -> HashMap<String, TierThresholds> {
        let mut tables = HashMap::new();
        tables.insert("citrus".to_string(), TierThresholds::new(12.0, 11.0, 8.0));
        tables.insert("cherry".to_string(), TierThresholds::new(18.0, 16.0, 14.0));
        tables.insert("tomato".to_string(), TierThresholds::new(6.0, 5.0, 4.0));
        tables.insert("apple".to_string(), TierThresholds::new(15.0, 13.0, 11.0));
        tables.insert(
            "stone_fruit".to_string(),
            TierThresholds::new(15.0, 13.0, 11.0),
        );
        // Generic fallback for crops with no dedicated table
        tables.insert("generic".to_string(), TierThresholds::new(14.0, 12.0, 10.0));
        tables
    }

    fn initialize_rootstock_modifiers() -> HashMap<String, f64> {
        let mut modifiers = HashMap::new();
        // Citrus rootstocks
        modifiers.insert("carrizo".to_string(), 0.3);
        modifiers.insert("swingle".to_string(), 0.2);
        modifiers.insert("c35".to_string(), 0.3);
        modifiers.insert("sour_orange".to_string(), 0.4);
        modifiers.insert("trifoliate".to_string(), 0.5);
        // Vigorous stock dilutes solids
        modifiers.insert("rough_lemon".to_string(), -0.5);
        // Apple rootstocks
        modifiers.insert("m9".to_string(), 0.4);
        modifiers.insert("m26".to_string(), 0.2);
        modifiers.insert("mm111".to_string(), -0.2);
        // Cherry
        modifiers.insert("gisela_5".to_string(), 0.3);
        modifiers.insert("mazzard".to_string(), 0.0);
        modifiers.insert("seedling".to_string(), 0.0);
        modifiers
    }

    // ==================================================================
    // CSV SUPPLEMENTS
    // ==================================================================

    /// Append cultivars from a CSV file. Columns:
    /// id, display_name, category, crop, crop_group, heritage_intent,
    /// base_metric, research_min, research_max, maturity, precocious
    pub fn load_cultivars_from_csv(&mut self, file_path: &str) -> Result<(), Box<dyn Error>> {
        let mut reader = Reader::from_path(file_path)?;
        let mut loaded = 0usize;

        for result in reader.records() {
            let record = result?;
            if record.len() < 11 {
                continue; // Skip incomplete records
            }

            let category = Self::parse_category(&record[2])?;
            let cultivar = Cultivar {
                id: record[0].to_string(),
                display_name: record[1].to_string(),
                category,
                crop: record[3].to_string(),
                crop_group: record[4].to_string(),
                heritage_intent: Self::parse_heritage_intent(&record[5])?,
                base_metric: if record[6].is_empty() {
                    None
                } else {
                    Some(record[6].parse()?)
                },
                research_range: if record[7].is_empty() || record[8].is_empty() {
                    None
                } else {
                    Some((record[7].parse()?, record[8].parse()?))
                },
                maturity: Self::parse_maturity(&record[9])?,
                time_to_maturity_years: None,
                precocious: record[10].trim() == "true",
            };
            self.cultivars.push(cultivar);
            loaded += 1;
        }

        info!("Loaded {} cultivars from {}", loaded, file_path);
        Ok(())
    }

    /// Append USDA minima from a CSV file. Columns: crop, minimum, grade.
    pub fn load_usda_minima_from_csv(&mut self, file_path: &str) -> Result<(), Box<dyn Error>> {
        let mut reader = Reader::from_path(file_path)?;
        let mut loaded = 0usize;

        for result in reader.records() {
            let record = result?;
            if record.len() < 3 {
                continue;
            }
            self.usda_minima.push(UsdaMinimum {
                crop: record[0].to_string(),
                minimum: record[1].parse()?,
                grade_label: record[2].to_string(),
            });
            loaded += 1;
        }

        info!("Loaded {} USDA minima from {}", loaded, file_path);
        Ok(())
    }

    fn parse_category(s: &str) -> Result<Category, Box<dyn Error>> {
        crate::models::Category::parse(s).ok_or_else(|| format!("Unknown category: {}", s).into())
    }

    fn parse_heritage_intent(s: &str) -> Result<HeritageIntent, Box<dyn Error>> {
        match s.trim() {
            "true_heritage" => Ok(HeritageIntent::TrueHeritage),
            "heirloom_quality" => Ok(HeritageIntent::HeirloomQuality),
            "heirloom_utility" => Ok(HeritageIntent::HeirloomUtility),
            "modern_nutrient" => Ok(HeritageIntent::ModernNutrient),
            "modern_flavor" => Ok(HeritageIntent::ModernFlavor),
            "commercial" => Ok(HeritageIntent::Commercial),
            _ => Err(format!("Unknown heritage intent: {}", s).into()),
        }
    }

    fn parse_maturity(s: &str) -> Result<CropMaturity, Box<dyn Error>> {
        match s.trim() {
            "climacteric" => Ok(CropMaturity::Climacteric),
            "non_climacteric" => Ok(CropMaturity::NonClimacteric),
            _ => Err(format!("Unknown maturity type: {}", s).into()),
        }
    }
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_config() {
        let loader = CatalogLoader::new();
        for cat in [
            Category::Produce,
            Category::Vegetables,
            Category::Nut,
            Category::Livestock,
            Category::Eggs,
            Category::Dairy,
            Category::Seafood,
            Category::Honey,
            Category::Transformed,
            Category::PostHarvest,
        ] {
            assert!(
                loader.categories.iter().any(|c| c.category == cat),
                "missing config for {:?}",
                cat
            );
        }
    }

    #[test]
    fn test_every_predictable_category_has_a_default_profile() {
        let loader = CatalogLoader::new();
        for cat in [
            Category::Produce,
            Category::Vegetables,
            Category::Nut,
            Category::Livestock,
            Category::Eggs,
            Category::Dairy,
            Category::Seafood,
            Category::Honey,
            Category::Transformed,
        ] {
            let default = loader
                .profiles
                .iter()
                .find(|p| p.category == cat && p.is_default);
            assert!(default.is_some(), "no default profile for {:?}", cat);
            assert_eq!(default.unwrap().tier, Tier::Commodity);
        }
    }

    #[test]
    fn test_required_and_excluded_claims_are_disjoint() {
        let loader = CatalogLoader::new();
        for profile in &loader.profiles {
            for requirement in &profile.required_claims {
                for phrase in &requirement.any_of {
                    assert!(
                        !profile.excluded_claims.contains(phrase),
                        "profile {} lists '{}' as both required and excluded",
                        profile.code,
                        phrase
                    );
                }
            }
        }
    }

    #[test]
    fn test_profile_codes_are_unique() {
        let loader = CatalogLoader::new();
        let mut codes: Vec<&str> = loader.profiles.iter().map(|p| p.code.as_str()).collect();
        codes.sort();
        let before = codes.len();
        codes.dedup();
        assert_eq!(before, codes.len());
    }

    #[test]
    fn test_brix_tier_tables_match_published_thresholds() {
        let loader = CatalogLoader::new();
        let citrus = loader.brix_tier_tables.get("citrus").unwrap();
        assert_eq!(citrus.artisan, 12.0);
        assert_eq!(citrus.premium, 11.0);
        assert_eq!(citrus.standard, 8.0);
        let generic = loader.brix_tier_tables.get("generic").unwrap();
        assert_eq!(generic.artisan, 14.0);
    }

    #[test]
    fn test_honey_varietal_baselines() {
        let loader = CatalogLoader::new();
        assert_eq!(loader.honey_varietals.get("manuka"), Some(&10.0));
        assert_eq!(loader.honey_varietals.get("sourwood"), Some(&20.0));
        assert_eq!(loader.honey_varietals.get("blended"), Some(&8.0));
    }

    #[test]
    fn test_washington_navel_baseline() {
        let loader = CatalogLoader::new();
        let navel = loader
            .cultivars
            .iter()
            .find(|c| c.id == "washington_navel")
            .unwrap();
        assert_eq!(navel.base_metric, Some(11.5));
        assert_eq!(navel.crop_group, "citrus");
        assert_eq!(navel.maturity, CropMaturity::NonClimacteric);
    }
}
