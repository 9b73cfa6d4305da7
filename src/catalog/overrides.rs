//! Subcategory override merging. Top-level scalar options replace the
//! category value; pillar labels, display flags and tier thresholds
//! merge field by field; list-valued settings replace wholesale.

use crate::catalog::models::{
    CategoryConfig, DisplayFlags, PartialDisplayFlags, PartialPillarLabels, PartialTierThresholds,
    PillarLabels, SubcategoryOverride, TierThresholds,
};

pub fn merge_category_config(base: &CategoryConfig, ov: &SubcategoryOverride) -> CategoryConfig {
    let mut merged = base.clone();

    if let Some(metric) = ov.primary_metric {
        merged.primary_metric = metric;
    }
    if let Some(timing) = ov.peak_timing {
        merged.peak_timing = timing;
    }
    if let Some(range) = ov.physical_range {
        merged.physical_range = range;
    }
    if let Some(range) = ov.scoring_range {
        merged.scoring_range = range;
    }
    if let Some(code) = &ov.default_profile_code {
        merged.default_profile_code = code.clone();
    }
    if let Some(labels) = &ov.pillar_labels {
        merged.pillar_labels = merge_pillar_labels(&base.pillar_labels, labels);
    }
    if let Some(display) = &ov.display {
        merged.display = merge_display_flags(&base.display, display);
    }

    merged
}

pub fn merge_pillar_labels(base: &PillarLabels, ov: &PartialPillarLabels) -> PillarLabels {
    PillarLabels {
        soil: ov.soil.clone().unwrap_or_else(|| base.soil.clone()),
        heritage: ov.heritage.clone().unwrap_or_else(|| base.heritage.clone()),
        agricultural: ov
            .agricultural
            .clone()
            .unwrap_or_else(|| base.agricultural.clone()),
        ripen: ov.ripen.clone().unwrap_or_else(|| base.ripen.clone()),
        enrich: ov.enrich.clone().unwrap_or_else(|| base.enrich.clone()),
    }
}

pub fn merge_display_flags(base: &DisplayFlags, ov: &PartialDisplayFlags) -> DisplayFlags {
    DisplayFlags {
        show_harvest_status: ov.show_harvest_status.unwrap_or(base.show_harvest_status),
        show_usda_comparison: ov.show_usda_comparison.unwrap_or(base.show_usda_comparison),
        show_tier_badge: ov.show_tier_badge.unwrap_or(base.show_tier_badge),
    }
}

pub fn merge_tier_thresholds(base: &TierThresholds, ov: &PartialTierThresholds) -> TierThresholds {
    TierThresholds {
        artisan: ov.artisan.unwrap_or(base.artisan),
        premium: ov.premium.unwrap_or(base.premium),
        standard: ov.standard.unwrap_or(base.standard),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::PeakTimingMethod;
    use crate::models::{Category, MetricType};

    fn base_config() -> CategoryConfig {
        CategoryConfig {
            category: Category::Produce,
            primary_metric: MetricType::Brix,
            peak_timing: PeakTimingMethod::Middle50,
            physical_range: (0.0, 30.0),
            scoring_range: (4.0, 20.0),
            pillar_labels: PillarLabels::new("Soil", "Heritage", "Practice", "Ripening", "Nutrition"),
            display: DisplayFlags {
                show_harvest_status: true,
                show_usda_comparison: true,
                show_tier_badge: true,
            },
            default_profile_code: "P-D".to_string(),
        }
    }

    #[test]
    fn test_scalar_override_replaces() {
        let ov = SubcategoryOverride {
            id: "citrus".to_string(),
            scoring_range: Some((6.0, 16.0)),
            ..Default::default()
        };
        let merged = merge_category_config(&base_config(), &ov);
        assert_eq!(merged.scoring_range, (6.0, 16.0));
        // Untouched options survive the merge
        assert_eq!(merged.physical_range, (0.0, 30.0));
        assert_eq!(merged.default_profile_code, "P-D");
    }

    #[test]
    fn test_pillar_labels_deep_merge() {
        let ov = SubcategoryOverride {
            id: "berry".to_string(),
            pillar_labels: Some(PartialPillarLabels {
                ripen: Some("Pick timing".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge_category_config(&base_config(), &ov);
        assert_eq!(merged.pillar_labels.ripen, "Pick timing");
        // A sparse label override must not wipe the other labels
        assert_eq!(merged.pillar_labels.soil, "Soil");
        assert_eq!(merged.pillar_labels.enrich, "Nutrition");
    }

    #[test]
    fn test_tier_thresholds_deep_merge() {
        let base = TierThresholds::new(14.0, 12.0, 10.0);
        let ov = PartialTierThresholds {
            artisan: Some(12.0),
            premium: Some(11.0),
            standard: None,
        };
        let merged = merge_tier_thresholds(&base, &ov);
        assert_eq!(merged.artisan, 12.0);
        assert_eq!(merged.premium, 11.0);
        assert_eq!(merged.standard, 10.0);
    }

    #[test]
    fn test_empty_override_is_identity() {
        let ov = SubcategoryOverride {
            id: "noop".to_string(),
            ..Default::default()
        };
        let merged = merge_category_config(&base_config(), &ov);
        assert_eq!(merged.scoring_range, base_config().scoring_range);
        assert_eq!(merged.pillar_labels.soil, "Soil");
    }
}
