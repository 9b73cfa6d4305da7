use serde::{Deserialize, Serialize};

use crate::models::{CalibrationApplied, FertilityApproach, PestManagementApproach, PredictionInput};

/// Canonical model feature ordering. Training and serving must agree on
/// this list exactly.
pub const FEATURE_NAMES: [&str; 16] = [
    "base_brix",
    "current_gdd",
    "target_gdd",
    "gdd_progress",
    "days_from_peak",
    "season_month",
    "is_early_season",
    "is_late_season",
    "tree_age",
    "rootstock_modifier",
    "has_calibration",
    "calibration_offset",
    "calibration_sample_count",
    "fertility_approach",
    "pest_management",
    "crop_load_managed",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    pub values: Vec<f64>,
    pub names: Vec<String>,
}

/// Missing signals encode as −1 so the model can distinguish "absent"
/// from a real zero.
const MISSING: f64 = -1.0;

pub fn encode_fertility(fertility: Option<FertilityApproach>) -> f64 {
    match fertility {
        Some(FertilityApproach::Annual) => 0.0,
        Some(FertilityApproach::SoilBanking) => 1.0,
        Some(FertilityApproach::MineralizedSoilScience) => 2.0,
        None => MISSING,
    }
}

pub fn encode_pest_management(pest: Option<PestManagementApproach>) -> f64 {
    match pest {
        Some(PestManagementApproach::Conventional) => 0.0,
        Some(PestManagementApproach::Ipm) => 1.0,
        Some(PestManagementApproach::Organic) => 2.0,
        Some(PestManagementApproach::NoSpray) => 3.0,
        None => MISSING,
    }
}

pub fn extract_features(
    input: &PredictionInput,
    base_metric: f64,
    rootstock_modifier: f64,
    calibration: Option<&CalibrationApplied>,
) -> FeatureVector {
    let gdd_progress = match (input.current_gdd, input.target_gdd) {
        (Some(current), Some(target)) if target > 0.0 => current / target,
        _ => MISSING,
    };
    let season_month = input.season_month.map(|m| m as f64).unwrap_or(MISSING);
    let (is_early, is_late) = match input.season_month {
        Some(month) => (
            if (1..=4).contains(&month) { 1.0 } else { 0.0 },
            if (9..=12).contains(&month) { 1.0 } else { 0.0 },
        ),
        None => (MISSING, MISSING),
    };
    let (has_calibration, offset, sample_count) = match calibration {
        Some(c) if c.sample_count > 0 => (1.0, c.offset, c.sample_count as f64),
        _ => (0.0, 0.0, 0.0),
    };

    let values = vec![
        base_metric,
        input.current_gdd.unwrap_or(MISSING),
        input.target_gdd.unwrap_or(MISSING),
        gdd_progress,
        input.days_until_harvest.unwrap_or(MISSING),
        season_month,
        is_early,
        is_late,
        input.tree_age.unwrap_or(MISSING),
        rootstock_modifier,
        has_calibration,
        offset,
        sample_count,
        encode_fertility(input.fertility_approach),
        encode_pest_management(input.pest_management),
        match input.crop_load_managed {
            Some(true) => 1.0,
            Some(false) => 0.0,
            None => MISSING,
        },
    ];

    FeatureVector {
        values,
        names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_vector_is_always_sixteen_wide() {
        let input = PredictionInput::new(Category::Produce);
        let features = extract_features(&input, 11.5, 0.0, None);
        assert_eq!(features.values.len(), 16);
        assert_eq!(features.names.len(), 16);
        assert_eq!(features.names[0], "base_brix");
        assert_eq!(features.names[15], "crop_load_managed");
    }

    #[test]
    fn test_missing_fields_encode_as_minus_one() {
        let input = PredictionInput::new(Category::Produce);
        let features = extract_features(&input, 11.5, 0.0, None);
        assert_eq!(features.values[1], -1.0); // current_gdd
        assert_eq!(features.values[3], -1.0); // gdd_progress
        assert_eq!(features.values[13], -1.0); // fertility
        assert_eq!(features.values[15], -1.0); // crop load
    }

    #[test]
    fn test_categorical_encodings() {
        assert_eq!(encode_fertility(Some(FertilityApproach::Annual)), 0.0);
        assert_eq!(encode_fertility(Some(FertilityApproach::SoilBanking)), 1.0);
        assert_eq!(
            encode_fertility(Some(FertilityApproach::MineralizedSoilScience)),
            2.0
        );
        assert_eq!(
            encode_pest_management(Some(PestManagementApproach::NoSpray)),
            3.0
        );
        assert_eq!(encode_pest_management(None), -1.0);
    }

    #[test]
    fn test_gdd_progress_and_calibration_features() {
        let mut input = PredictionInput::new(Category::Produce);
        input.current_gdd = Some(1600.0);
        input.target_gdd = Some(3200.0);
        input.season_month = Some(10);
        let calibration = CalibrationApplied {
            offset: 0.5,
            confidence_boost: 0.05,
            sample_count: 12,
            calibration_id: None,
        };
        let features = extract_features(&input, 11.5, 0.3, Some(&calibration));
        assert_eq!(features.values[3], 0.5); // progress
        assert_eq!(features.values[6], 0.0); // not early
        assert_eq!(features.values[7], 1.0); // late season
        assert_eq!(features.values[9], 0.3); // rootstock
        assert_eq!(features.values[10], 1.0); // has calibration
        assert_eq!(features.values[11], 0.5); // offset
        assert_eq!(features.values[12], 12.0); // samples
    }
}
