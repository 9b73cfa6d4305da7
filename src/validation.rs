use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::models::{ActualMeasurement, Category, MeasurementSource};
use crate::utils::{clamp, validate_identifier, QualityError};

// ======================================================================
// ISSUE & WARNING CODES
// ======================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    OutOfPhysicalRange,
    MissingRequiredField,
    InvalidFormat,
    InconsistentData,
    ImpossibleValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    OutsideTypicalRange,
    StatisticalOutlier,
    LowConfidence,
    DataQualityConcern,
    PossibleMeasurementError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningGrade {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub code: ValidationCode,
    pub field: String,
    pub message: String,
    /// Clamped value a caller may choose to proceed with.
    pub corrected_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub code: WarningCode,
    pub field: String,
    pub message: String,
    pub grade: WarningGrade,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationWarning>,
    pub data_quality_score: f64,
}

impl ValidationReport {
    pub fn is_usable(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OmegaAnomalyResult {
    pub is_anomaly: bool,
    pub z_score: Option<f64>,
    pub reason: String,
    /// Set when the reading contradicts the claimed production profile.
    pub claim_validation_warning: Option<String>,
}

// ======================================================================
// VALIDATION ENGINE
// ======================================================================

pub struct ValidationEngine {
    physical_ranges: HashMap<String, (f64, f64)>,
    anomaly_z_threshold: f64,
}

impl ValidationEngine {
    pub fn new(config: &EngineConfig) -> Self {
        let mut physical_ranges = Self::default_physical_ranges();
        for (field, range) in &config.physical_range_overrides {
            physical_ranges.insert(field.clone(), *range);
        }
        Self {
            physical_ranges,
            anomaly_z_threshold: config.anomaly_z_threshold,
        }
    }

    fn default_physical_ranges() -> HashMap<String, (f64, f64)> {
        let mut ranges = HashMap::new();
        ranges.insert("brix".to_string(), (0.0, 30.0));
        ranges.insert("titratable_acidity".to_string(), (0.0, 10.0));
        ranges.insert("omega_ratio".to_string(), (0.5, 50.0));
        ranges.insert("gdd".to_string(), (0.0, 10_000.0));
        ranges.insert("tree_age".to_string(), (0.0, 150.0));
        ranges.insert("moisture".to_string(), (0.0, 100.0));
        ranges.insert("ph".to_string(), (0.0, 14.0));
        ranges
    }

    pub fn physical_range(&self, field: &str) -> Option<(f64, f64)> {
        self.physical_ranges.get(field).copied()
    }

    /// Hard floor/ceiling check. NaN and infinities are format errors;
    /// out-of-range values carry the clamped correction.
    pub fn check_physical(&self, field: &str, value: f64) -> Option<ValidationIssue> {
        if !value.is_finite() {
            return Some(ValidationIssue {
                code: ValidationCode::InvalidFormat,
                field: field.to_string(),
                message: format!("{} is not a finite number", field),
                corrected_value: None,
            });
        }
        let (min, max) = self.physical_range(field)?;
        if value < min || value > max {
            return Some(ValidationIssue {
                code: ValidationCode::OutOfPhysicalRange,
                field: field.to_string(),
                message: format!(
                    "{} = {} is outside the physical range [{}, {}]",
                    field, value, min, max
                ),
                corrected_value: Some(clamp(value, min, max)),
            });
        }
        None
    }

    /// Clamp a predicted metric to its physical range without raising.
    pub fn clamp_to_physical(&self, field: &str, value: f64) -> f64 {
        match self.physical_range(field) {
            Some((min, max)) => clamp(value, min, max),
            None => value,
        }
    }

    /// Soft, category-aware plausibility check.
    pub fn typical_range_warning(
        &self,
        category: Category,
        field: &str,
        value: f64,
    ) -> Option<ValidationWarning> {
        let (lo, hi) = typical_range(category, field)?;
        if value >= lo && value <= hi {
            return None;
        }
        let span = hi - lo;
        let distance = if value < lo { lo - value } else { value - hi };
        let grade = if distance > span {
            WarningGrade::High
        } else if distance > span * 0.25 {
            WarningGrade::Medium
        } else {
            WarningGrade::Low
        };
        Some(ValidationWarning {
            code: WarningCode::OutsideTypicalRange,
            field: field.to_string(),
            message: format!(
                "{} = {} is outside the typical {} range [{}, {}] for {}",
                field, value, field, lo, hi, category
            ),
            grade,
        })
    }

    pub fn z_score(&self, value: f64, mean: f64, stddev: f64) -> Option<f64> {
        if stddev <= 0.0 || !stddev.is_finite() {
            return None;
        }
        Some((value - mean) / stddev)
    }

    /// |z| above the configured threshold flags an anomaly.
    pub fn is_anomaly(&self, value: f64, mean: f64, stddev: f64) -> bool {
        match self.z_score(value, mean, stddev) {
            Some(z) => z.abs() > self.anomaly_z_threshold,
            None => false,
        }
    }

    /// Omega readings are additionally checked against the claimed
    /// profile's expected range: a reading far outside it is an
    /// inconsistency even when the population z-score looks ordinary.
    pub fn detect_omega_anomaly(
        &self,
        measured: f64,
        expected_mean: f64,
        expected_stddev: f64,
        profile_range: Option<(f64, f64)>,
        profile_code: Option<&str>,
    ) -> OmegaAnomalyResult {
        let z = self.z_score(measured, expected_mean, expected_stddev);
        let statistically_anomalous = z.map(|z| z.abs() > self.anomaly_z_threshold).unwrap_or(false);

        let mut claim_warning = None;
        let mut out_of_profile = false;
        if let Some((lo, hi)) = profile_range {
            if measured > hi {
                out_of_profile = true;
                claim_warning = Some(format!(
                    "measured ratio {}:1 is worse than the expected range [{}-{}:1] for \
                     profile {}; the production claims may not hold",
                    measured,
                    lo,
                    hi,
                    profile_code.unwrap_or("?")
                ));
            } else if measured < lo {
                out_of_profile = true;
                claim_warning = Some(format!(
                    "measured ratio {}:1 is better than the expected range [{}-{}:1] for \
                     profile {}; verify the measurement",
                    measured,
                    lo,
                    hi,
                    profile_code.unwrap_or("?")
                ));
            }
        }

        let is_anomaly = statistically_anomalous || out_of_profile;
        let reason = if out_of_profile {
            claim_warning.clone().unwrap_or_default()
        } else if statistically_anomalous {
            format!(
                "z-score {:.2} exceeds the anomaly threshold {:.1}",
                z.unwrap_or(0.0),
                self.anomaly_z_threshold
            )
        } else {
            "within expected bounds".to_string()
        };

        OmegaAnomalyResult {
            is_anomaly,
            z_score: z,
            reason,
            claim_validation_warning: claim_warning,
        }
    }

    /// Validate a submitted actual before it reaches the calibration
    /// store. Structural problems are fatal here.
    pub fn validate_actual(&self, actual: &ActualMeasurement) -> Result<ValidationReport, QualityError> {
        validate_identifier("cultivar_id", &actual.cultivar_id)?;
        validate_identifier("region_id", &actual.region_id)?;

        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !actual.metric_value.is_finite() {
            errors.push(ValidationIssue {
                code: ValidationCode::InvalidFormat,
                field: "metric_value".to_string(),
                message: "metric_value is not a finite number".to_string(),
                corrected_value: None,
            });
        } else if actual.metric_value < 0.0 {
            errors.push(ValidationIssue {
                code: ValidationCode::ImpossibleValue,
                field: "metric_value".to_string(),
                message: "metric_value cannot be negative".to_string(),
                corrected_value: Some(0.0),
            });
        }

        if actual.prediction_id.is_some() && actual.predicted_value.is_none() {
            warnings.push(ValidationWarning {
                code: WarningCode::DataQualityConcern,
                field: "predicted_value".to_string(),
                message: "linked prediction without a predicted value; the sample cannot \
                          feed calibration"
                    .to_string(),
                grade: WarningGrade::Medium,
            });
        }

        let score = self.data_quality_score(
            true,
            Some(actual.source),
            true,
            errors.len(),
            warnings.len(),
        );
        Ok(ValidationReport {
            errors,
            warnings,
            data_quality_score: score,
        })
    }

    /// Composite 0-1 data-quality score.
    pub fn data_quality_score(
        &self,
        has_primary_metric: bool,
        source: Option<MeasurementSource>,
        has_timestamp: bool,
        error_count: usize,
        warning_count: usize,
    ) -> f64 {
        let mut score = 1.0;
        if !has_primary_metric {
            score -= 0.3;
        }
        if source.is_none() {
            score -= 0.1;
        }
        if !has_timestamp {
            score -= 0.1;
        }
        score -= 0.2 * error_count as f64;
        score -= 0.05 * warning_count as f64;
        score += match source {
            Some(MeasurementSource::Lab) => 0.1,
            Some(MeasurementSource::Consumer) => -0.1,
            Some(MeasurementSource::Farm) | None => 0.0,
        };
        clamp(score, 0.0, 1.0)
    }
}

/// Category-specific soft plausibility bounds.
fn typical_range(category: Category, field: &str) -> Option<(f64, f64)> {
    match (category, field) {
        (Category::Produce, "brix") => Some((6.0, 20.0)),
        (Category::Vegetables, "brix") => Some((3.0, 14.0)),
        (Category::Livestock, "omega_ratio") => Some((1.5, 30.0)),
        (Category::Eggs, "omega_ratio") => Some((2.0, 25.0)),
        (Category::Dairy, "omega_ratio") => Some((1.0, 15.0)),
        (Category::Honey, "moisture") => Some((14.0, 21.0)),
        (Category::Honey, "diastase") => Some((3.0, 30.0)),
        (Category::Produce, "gdd") => Some((500.0, 6_000.0)),
        (Category::Produce, "tree_age") => Some((2.0, 60.0)),
        _ => None,
    }
}
