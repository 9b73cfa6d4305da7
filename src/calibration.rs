use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::models::{ActualMeasurement, CalibrationApplied};
use crate::utils::clamp;

// ======================================================================
// CALIBRATION ROWS
// ======================================================================

/// Composite key: `season_year = None` is the all-time row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalibrationKey {
    pub cultivar_id: String,
    pub region_id: String,
    pub season_year: Option<i32>,
}

impl CalibrationKey {
    pub fn new(cultivar_id: &str, region_id: &str, season_year: Option<i32>) -> Self {
        Self {
            cultivar_id: cultivar_id.to_string(),
            region_id: region_id.to_string(),
            season_year,
        }
    }

    pub fn all_time(&self) -> Self {
        Self {
            cultivar_id: self.cultivar_id.clone(),
            region_id: self.region_id.clone(),
            season_year: None,
        }
    }
}

/// Running statistics over (actual − predicted) deltas for one key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalCalibration {
    pub id: Uuid,
    pub cultivar_id: String,
    pub region_id: String,
    pub season_year: Option<i32>,
    pub sample_count: u64,
    pub offset_mean: f64,
    /// Welford M2 accumulator; kept so updates stay numerically stable.
    pub offset_m2: f64,
    pub offset_stddev: f64,
    pub offset_min: f64,
    pub offset_max: f64,
    /// Mean absolute error of the raw predictions.
    pub mae_before: f64,
    /// Mean absolute residual after subtracting the running offset.
    pub mae_after: f64,
    pub confidence_boost: f64,
    pub is_active: bool,
    pub last_updated: DateTime<Utc>,
}

impl RegionalCalibration {
    fn new(key: &CalibrationKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            cultivar_id: key.cultivar_id.clone(),
            region_id: key.region_id.clone(),
            season_year: key.season_year,
            sample_count: 0,
            offset_mean: 0.0,
            offset_m2: 0.0,
            offset_stddev: 0.0,
            offset_min: f64::INFINITY,
            offset_max: f64::NEG_INFINITY,
            mae_before: 0.0,
            mae_after: 0.0,
            confidence_boost: 0.0,
            is_active: false,
            last_updated: Utc::now(),
        }
    }

    /// One Welford step. `mean_{n+1} = mean_n + (x − mean_n)/count_{n+1}`.
    fn fold_delta(&mut self, delta: f64) {
        // Residual against the offset that was in force before this sample
        let residual = (delta - self.offset_mean).abs();

        self.sample_count += 1;
        let n = self.sample_count as f64;
        let d1 = delta - self.offset_mean;
        self.offset_mean += d1 / n;
        let d2 = delta - self.offset_mean;
        self.offset_m2 += d1 * d2;
        self.offset_stddev = if self.sample_count > 1 {
            (self.offset_m2 / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        self.offset_min = self.offset_min.min(delta);
        self.offset_max = self.offset_max.max(delta);
        self.mae_before += (delta.abs() - self.mae_before) / n;
        self.mae_after += (residual - self.mae_after) / n;
        self.last_updated = Utc::now();
    }
}

// ======================================================================
// REPOSITORY BOUNDARY
// ======================================================================

/// Persistence boundary for calibration rows and the append-only actual
/// ledger. The in-memory implementation backs tests and single-process
/// deployments; remote stores implement the same contract.
pub trait CalibrationRepository: Send + Sync {
    fn get(&self, key: &CalibrationKey) -> Option<RegionalCalibration>;
    /// Apply a mutation under the repository's own locking discipline,
    /// creating the row on first touch.
    fn update(&self, key: &CalibrationKey, apply: &mut dyn FnMut(&mut RegionalCalibration));
    fn append_actual(&self, id: Uuid, actual: &ActualMeasurement);
    fn actual_count(&self) -> usize;
}

#[derive(Default)]
pub struct InMemoryCalibrationRepository {
    rows: RwLock<HashMap<CalibrationKey, RegionalCalibration>>,
    actuals: RwLock<Vec<(Uuid, ActualMeasurement)>>,
}

impl InMemoryCalibrationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CalibrationRepository for InMemoryCalibrationRepository {
    fn get(&self, key: &CalibrationKey) -> Option<RegionalCalibration> {
        self.rows.read().expect("calibration lock poisoned").get(key).cloned()
    }

    fn update(&self, key: &CalibrationKey, apply: &mut dyn FnMut(&mut RegionalCalibration)) {
        let mut rows = self.rows.write().expect("calibration lock poisoned");
        let row = rows
            .entry(key.clone())
            .or_insert_with(|| RegionalCalibration::new(key));
        apply(row);
    }

    fn append_actual(&self, id: Uuid, actual: &ActualMeasurement) {
        self.actuals
            .write()
            .expect("actuals lock poisoned")
            .push((id, actual.clone()));
    }

    fn actual_count(&self) -> usize {
        self.actuals.read().expect("actuals lock poisoned").len()
    }
}

// ======================================================================
// CALIBRATION STORE
// ======================================================================

pub struct CalibrationStore {
    repository: Arc<dyn CalibrationRepository>,
    min_samples: u64,
    samples_for_max_confidence: u64,
    max_confidence_boost: f64,
}

impl CalibrationStore {
    pub fn new(repository: Arc<dyn CalibrationRepository>, config: &EngineConfig) -> Self {
        Self {
            repository,
            min_samples: config.min_samples_for_calibration,
            samples_for_max_confidence: config.samples_for_max_confidence,
            max_confidence_boost: config.max_confidence_boost,
        }
    }

    pub fn in_memory(config: &EngineConfig) -> Self {
        Self::new(Arc::new(InMemoryCalibrationRepository::new()), config)
    }

    /// Effective calibration for a key. A season row below the sample
    /// threshold falls back to the all-time row; below-threshold rows
    /// are never returned.
    pub fn get(
        &self,
        cultivar_id: &str,
        region_id: &str,
        season_year: Option<i32>,
    ) -> Option<RegionalCalibration> {
        if season_year.is_some() {
            let season_key = CalibrationKey::new(cultivar_id, region_id, season_year);
            if let Some(row) = self.repository.get(&season_key) {
                if row.sample_count >= self.min_samples {
                    return Some(row);
                }
            }
        }
        let all_time = CalibrationKey::new(cultivar_id, region_id, None);
        self.repository
            .get(&all_time)
            .filter(|row| row.sample_count >= self.min_samples)
    }

    /// Shift a prediction by the learned offset, clamped to `bounds`.
    /// Without an effective calibration the prediction passes through.
    pub fn apply(
        &self,
        predicted: f64,
        cultivar_id: &str,
        region_id: &str,
        season_year: Option<i32>,
        bounds: (f64, f64),
    ) -> (f64, CalibrationApplied) {
        match self.get(cultivar_id, region_id, season_year) {
            Some(row) => {
                let calibrated = clamp(predicted + row.offset_mean, bounds.0, bounds.1);
                debug!(
                    "calibration {}/{}: offset {:.3} over {} samples",
                    cultivar_id, region_id, row.offset_mean, row.sample_count
                );
                (
                    calibrated,
                    CalibrationApplied {
                        offset: row.offset_mean,
                        confidence_boost: self.confidence_boost(row.sample_count),
                        sample_count: row.sample_count,
                        calibration_id: Some(row.id),
                    },
                )
            }
            None => (
                predicted,
                CalibrationApplied {
                    offset: 0.0,
                    confidence_boost: 0.0,
                    sample_count: 0,
                    calibration_id: None,
                },
            ),
        }
    }

    /// Record a ground-truth measurement. When a predicted value is
    /// linked, the delta feeds the all-time row and, if the actual is
    /// seasonal, the season row as well.
    pub fn submit_actual(&self, actual: &ActualMeasurement) -> Uuid {
        let id = Uuid::new_v4();
        self.repository.append_actual(id, actual);

        if let Some(predicted) = actual.predicted_value {
            let delta = actual.metric_value - predicted;
            let min_samples = self.min_samples;
            let boost_curve = |count: u64| self.confidence_boost(count);

            let all_time = CalibrationKey::new(&actual.cultivar_id, &actual.region_id, None);
            self.repository.update(&all_time, &mut |row| {
                row.fold_delta(delta);
                row.is_active = row.sample_count >= min_samples;
                row.confidence_boost = boost_curve(row.sample_count);
            });

            if actual.season_year.is_some() {
                let season = CalibrationKey::new(
                    &actual.cultivar_id,
                    &actual.region_id,
                    actual.season_year,
                );
                self.repository.update(&season, &mut |row| {
                    row.fold_delta(delta);
                    row.is_active = row.sample_count >= min_samples;
                    row.confidence_boost = boost_curve(row.sample_count);
                });
            }

            info!(
                "actual recorded for {}/{}: delta {:.3}",
                actual.cultivar_id, actual.region_id, delta
            );
        }
        id
    }

    /// 0 below the sample threshold, then a linear ramp up to the boost
    /// ceiling at `samples_for_max_confidence`.
    pub fn confidence_boost(&self, sample_count: u64) -> f64 {
        if sample_count < self.min_samples {
            return 0.0;
        }
        if sample_count >= self.samples_for_max_confidence {
            return self.max_confidence_boost;
        }
        let span = (self.samples_for_max_confidence - self.min_samples) as f64;
        self.max_confidence_boost * (sample_count - self.min_samples) as f64 / span
    }

    pub fn actual_count(&self) -> usize {
        self.repository.actual_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasurementSource;

    fn store() -> CalibrationStore {
        CalibrationStore::in_memory(&EngineConfig::default())
    }

    fn actual(cultivar: &str, region: &str, measured: f64, predicted: f64) -> ActualMeasurement {
        ActualMeasurement {
            cultivar_id: cultivar.to_string(),
            region_id: region.to_string(),
            metric_value: measured,
            source: MeasurementSource::Farm,
            timestamp: Utc::now(),
            prediction_id: Some(Uuid::new_v4()),
            predicted_value: Some(predicted),
            season_year: None,
        }
    }

    #[test]
    fn test_below_threshold_returns_prediction_unchanged() {
        let store = store();
        for _ in 0..4 {
            store.submit_actual(&actual("navel", "florida", 12.0, 11.5));
        }
        let (calibrated, applied) = store.apply(11.5, "navel", "florida", None, (0.0, 30.0));
        assert_eq!(calibrated, 11.5);
        assert_eq!(applied.offset, 0.0);
        assert_eq!(applied.sample_count, 0);
    }

    #[test]
    fn test_calibration_kicks_in_at_five_samples() {
        let store = store();
        for _ in 0..5 {
            store.submit_actual(&actual("navel", "florida", 12.0, 11.5));
        }
        let (calibrated, applied) = store.apply(11.5, "navel", "florida", None, (0.0, 30.0));
        assert!((applied.offset - 0.5).abs() < 1e-9);
        assert!((calibrated - 12.0).abs() < 1e-9);
        // Boost only begins ramping past the threshold
        assert_eq!(applied.confidence_boost, 0.0);
        assert_eq!(applied.sample_count, 5);
    }

    #[test]
    fn test_boost_reaches_ceiling_at_fifty_samples() {
        let store = store();
        for _ in 0..50 {
            store.submit_actual(&actual("navel", "florida", 12.0, 11.5));
        }
        let (_, applied) = store.apply(11.5, "navel", "florida", None, (0.0, 30.0));
        assert!((applied.confidence_boost - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_boost_curve_is_linear_between_thresholds() {
        let store = store();
        assert_eq!(store.confidence_boost(4), 0.0);
        assert_eq!(store.confidence_boost(5), 0.0);
        let mid = store.confidence_boost(27); // halfway along 5..50
        assert!((mid - 0.10 * 22.0 / 45.0).abs() < 1e-12);
        assert_eq!(store.confidence_boost(50), 0.10);
        assert_eq!(store.confidence_boost(500), 0.10);
    }

    #[test]
    fn test_welford_mean_matches_arithmetic_mean() {
        let store = store();
        let deltas = [0.5, -0.25, 1.75, 0.0, -1.0, 0.3, 2.2, -0.7];
        for delta in deltas {
            store.submit_actual(&actual("navel", "florida", 11.5 + delta, 11.5));
        }
        let row = store.get("navel", "florida", None).unwrap();
        let expected: f64 = deltas.iter().sum::<f64>() / deltas.len() as f64;
        assert!((row.offset_mean - expected).abs() < 1e-9);
        assert_eq!(row.sample_count, deltas.len() as u64);
        assert_eq!(row.offset_min, -1.0);
        assert_eq!(row.offset_max, 2.2);
    }

    #[test]
    fn test_welford_stddev_is_sane() {
        let store = store();
        // Constant deltas have zero spread
        for _ in 0..10 {
            store.submit_actual(&actual("navel", "florida", 12.0, 11.5));
        }
        let row = store.get("navel", "florida", None).unwrap();
        assert!(row.offset_stddev.abs() < 1e-12);
        // MAE after calibration collapses for a constant bias
        assert!(row.mae_after < row.mae_before);
    }

    #[test]
    fn test_repeated_equal_submission_is_commutative() {
        let a = store();
        let b = store();
        let sample = actual("navel", "florida", 12.0, 11.5);
        for _ in 0..6 {
            a.submit_actual(&sample);
        }
        for _ in 0..3 {
            b.submit_actual(&sample);
        }
        for _ in 0..3 {
            b.submit_actual(&sample);
        }
        let row_a = a.get("navel", "florida", None).unwrap();
        let row_b = b.get("navel", "florida", None).unwrap();
        assert_eq!(row_a.sample_count, row_b.sample_count);
        assert!((row_a.offset_mean - row_b.offset_mean).abs() < 1e-12);
    }

    #[test]
    fn test_season_row_preferred_when_effective() {
        let store = store();
        let mut seasonal = actual("navel", "florida", 12.5, 11.5);
        seasonal.season_year = Some(2025);
        for _ in 0..5 {
            store.submit_actual(&seasonal);
        }
        // Season row is effective and carries the +1.0 offset
        let row = store.get("navel", "florida", Some(2025)).unwrap();
        assert_eq!(row.season_year, Some(2025));
        assert!((row.offset_mean - 1.0).abs() < 1e-9);
        // An unknown season falls back to the all-time row (also fed)
        let fallback = store.get("navel", "florida", Some(2023)).unwrap();
        assert_eq!(fallback.season_year, None);
    }

    #[test]
    fn test_season_row_below_threshold_falls_back() {
        let store = store();
        // Three seasonal samples: season row stays ineffective
        let mut seasonal = actual("navel", "florida", 12.5, 11.5);
        seasonal.season_year = Some(2025);
        for _ in 0..3 {
            store.submit_actual(&seasonal);
        }
        assert!(store.get("navel", "florida", Some(2025)).is_none());
        // Two more non-seasonal samples push the all-time row over
        for _ in 0..2 {
            store.submit_actual(&actual("navel", "florida", 12.5, 11.5));
        }
        let row = store.get("navel", "florida", Some(2025)).unwrap();
        assert_eq!(row.season_year, None);
        assert_eq!(row.sample_count, 5);
    }

    #[test]
    fn test_apply_clamps_to_bounds() {
        let store = store();
        for _ in 0..5 {
            store.submit_actual(&actual("navel", "florida", 14.0, 11.5));
        }
        let (calibrated, _) = store.apply(29.0, "navel", "florida", None, (0.0, 30.0));
        assert_eq!(calibrated, 30.0);
    }

    #[test]
    fn test_actual_without_prediction_only_appends() {
        let store = store();
        let mut unlinked = actual("navel", "florida", 12.0, 11.5);
        unlinked.predicted_value = None;
        unlinked.prediction_id = None;
        store.submit_actual(&unlinked);
        assert_eq!(store.actual_count(), 1);
        assert!(store.repository.get(&CalibrationKey::new("navel", "florida", None)).is_none());
    }
}
