use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

// ======================================================================
// DETERMINISTIC ASSIGNMENT
// ======================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbGroup {
    Control,
    Treatment,
}

impl std::fmt::Display for AbGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AbGroup::Control => write!(f, "control"),
            AbGroup::Treatment => write!(f, "treatment"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbAssignment {
    pub user_id: String,
    pub experiment_id: String,
    pub group: AbGroup,
    pub model_version: String,
}

/// FNV-1a. Stable across processes and platforms, which is what makes
/// the assignment sticky for a user.
fn stable_hash(text: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in text.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

pub struct ExperimentAssigner {
    traffic_split: f64,
}

impl ExperimentAssigner {
    pub fn new(traffic_split: f64) -> Self {
        Self {
            traffic_split: traffic_split.clamp(0.0, 1.0),
        }
    }

    /// Same user and experiment always land in the same bucket.
    pub fn assign(&self, user_id: &str, experiment_id: &str, model_version: &str) -> AbAssignment {
        let bucket = (stable_hash(&format!("{}{}", user_id, experiment_id)) % 100) as f64 / 100.0;
        let group = if bucket < self.traffic_split {
            AbGroup::Treatment
        } else {
            AbGroup::Control
        };
        AbAssignment {
            user_id: user_id.to_string(),
            experiment_id: experiment_id.to_string(),
            group,
            model_version: model_version.to_string(),
        }
    }
}

// ======================================================================
// EXPERIMENT RESULT AGGREGATION
// ======================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub sample_count: u64,
    pub mae: f64,
    pub mean_error: f64,
}

impl GroupStats {
    fn fold(&mut self, error: f64) {
        self.sample_count += 1;
        let n = self.sample_count as f64;
        self.mae += (error.abs() - self.mae) / n;
        self.mean_error += (error - self.mean_error) / n;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentSummary {
    pub experiment_id: String,
    pub control: GroupStats,
    pub treatment: GroupStats,
    /// Positive when the treatment model is more accurate.
    pub mae_improvement: f64,
}

/// Per-experiment outcome ledger: each record pairs a served prediction
/// with the eventually observed error.
#[derive(Default)]
pub struct ExperimentAggregator {
    stats: RwLock<HashMap<String, (GroupStats, GroupStats)>>,
}

impl ExperimentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, experiment_id: &str, group: AbGroup, predicted: f64, actual: f64) {
        let mut stats = self.stats.write().expect("experiment lock poisoned");
        let entry = stats.entry(experiment_id.to_string()).or_default();
        match group {
            AbGroup::Control => entry.0.fold(actual - predicted),
            AbGroup::Treatment => entry.1.fold(actual - predicted),
        }
    }

    pub fn summarize(&self, experiment_id: &str) -> Option<ExperimentSummary> {
        let stats = self.stats.read().expect("experiment lock poisoned");
        let (control, treatment) = stats.get(experiment_id)?;
        Some(ExperimentSummary {
            experiment_id: experiment_id.to_string(),
            control: *control,
            treatment: *treatment,
            mae_improvement: control.mae - treatment.mae,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_is_deterministic() {
        let assigner = ExperimentAssigner::new(0.1);
        let first = assigner.assign("u-123", "e1", "v2");
        for _ in 0..1000 {
            let again = assigner.assign("u-123", "e1", "v2");
            assert_eq!(first.group, again.group);
        }
    }

    #[test]
    fn test_split_extremes() {
        let all_control = ExperimentAssigner::new(0.0);
        let all_treatment = ExperimentAssigner::new(1.0);
        for user in ["u-1", "u-2", "u-3", "u-42", "u-999"] {
            assert_eq!(all_control.assign(user, "e1", "v1").group, AbGroup::Control);
            assert_eq!(
                all_treatment.assign(user, "e1", "v1").group,
                AbGroup::Treatment
            );
        }
    }

    #[test]
    fn test_split_roughly_honors_fraction() {
        let assigner = ExperimentAssigner::new(0.5);
        let treatment_count = (0..1000)
            .filter(|i| {
                assigner.assign(&format!("user-{}", i), "e1", "v1").group == AbGroup::Treatment
            })
            .count();
        assert!((350..=650).contains(&treatment_count));
    }

    #[test]
    fn test_different_experiments_rebucket() {
        let assigner = ExperimentAssigner::new(0.5);
        let flipped = (0..1000).any(|i| {
            let user = format!("user-{}", i);
            assigner.assign(&user, "e1", "v1").group != assigner.assign(&user, "e2", "v1").group
        });
        assert!(flipped);
    }

    #[test]
    fn test_aggregation_tracks_mae_per_group() {
        let aggregator = ExperimentAggregator::new();
        aggregator.record("e1", AbGroup::Control, 11.0, 12.0);
        aggregator.record("e1", AbGroup::Control, 11.0, 10.0);
        aggregator.record("e1", AbGroup::Treatment, 11.5, 12.0);
        let summary = aggregator.summarize("e1").unwrap();
        assert_eq!(summary.control.sample_count, 2);
        assert!((summary.control.mae - 1.0).abs() < 1e-9);
        assert!((summary.treatment.mae - 0.5).abs() < 1e-9);
        assert!((summary.mae_improvement - 0.5).abs() < 1e-9);
        // Signed errors cancel in the control group
        assert!(summary.control.mean_error.abs() < 1e-9);
    }

    #[test]
    fn test_unknown_experiment_summarizes_to_none() {
        assert!(ExperimentAggregator::new().summarize("nope").is_none());
    }
}
