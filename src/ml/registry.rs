use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use log::info;

/// One trained model release.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVersion {
    pub version: String,
    pub is_active: bool,
    pub is_production: bool,
    /// Set on the row that `rollback` would restore.
    pub is_rollback_target: bool,
    pub mae: f64,
    pub sample_count: u64,
    pub features: Vec<String>,
    pub traffic_percentage: f64,
}

impl ModelVersion {
    pub fn new(version: &str, mae: f64, sample_count: u64, features: Vec<String>) -> Self {
        Self {
            version: version.to_string(),
            is_active: true,
            is_production: false,
            is_rollback_target: false,
            mae,
            sample_count,
            features,
            traffic_percentage: 0.0,
        }
    }
}

/// In-memory model-version registry. At most one row is in production
/// at any time; promotion marks the outgoing row as the rollback
/// target before the flags change hands, so rollback is idempotent.
#[derive(Default)]
pub struct ModelRegistry {
    rows: RwLock<HashMap<String, ModelVersion>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, model: ModelVersion) {
        let mut rows = self.rows.write().expect("registry lock poisoned");
        rows.insert(model.version.clone(), model);
    }

    pub fn get(&self, version: &str) -> Option<ModelVersion> {
        self.rows
            .read()
            .expect("registry lock poisoned")
            .get(version)
            .cloned()
    }

    pub fn production(&self) -> Option<ModelVersion> {
        self.rows
            .read()
            .expect("registry lock poisoned")
            .values()
            .find(|m| m.is_production)
            .cloned()
    }

    /// Promote a version to production. The previous production row
    /// becomes the rollback target; any older rollback flag is cleared.
    pub fn set_production(&self, version: &str) -> bool {
        let mut rows = self.rows.write().expect("registry lock poisoned");
        if !rows.contains_key(version) {
            return false;
        }

        let previous = rows
            .values()
            .find(|m| m.is_production && m.version != version)
            .map(|m| m.version.clone());

        for row in rows.values_mut() {
            row.is_rollback_target = false;
        }
        if let Some(previous_version) = previous {
            if let Some(row) = rows.get_mut(&previous_version) {
                row.is_rollback_target = true;
                row.is_production = false;
            }
        }
        for row in rows.values_mut() {
            row.is_production = row.version == version;
        }
        info!("model {} promoted to production", version);
        true
    }

    /// Restore the rollback target. Calling it twice is a no-op the
    /// second time: the target stays the target until a new promotion.
    pub fn rollback(&self) -> Option<String> {
        let target = {
            let rows = self.rows.read().expect("registry lock poisoned");
            rows.values()
                .find(|m| m.is_rollback_target)
                .map(|m| m.version.clone())?
        };
        let mut rows = self.rows.write().expect("registry lock poisoned");
        for row in rows.values_mut() {
            row.is_production = row.version == target;
        }
        info!("rolled back to model {}", target);
        Some(target)
    }

    pub fn active_versions(&self) -> Vec<ModelVersion> {
        self.rows
            .read()
            .expect("registry lock poisoned")
            .values()
            .filter(|m| m.is_active)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(versions: &[&str]) -> ModelRegistry {
        let registry = ModelRegistry::new();
        for v in versions {
            registry.register(ModelVersion::new(v, 0.8, 100, vec!["base_brix".to_string()]));
        }
        registry
    }

    #[test]
    fn test_single_production_row() {
        let registry = registry_with(&["v1", "v2", "v3"]);
        assert!(registry.set_production("v1"));
        assert!(registry.set_production("v2"));
        let in_production: Vec<_> = registry
            .active_versions()
            .into_iter()
            .filter(|m| m.is_production)
            .collect();
        assert_eq!(in_production.len(), 1);
        assert_eq!(in_production[0].version, "v2");
    }

    #[test]
    fn test_promotion_marks_rollback_target() {
        let registry = registry_with(&["v1", "v2"]);
        registry.set_production("v1");
        registry.set_production("v2");
        let v1 = registry.get("v1").unwrap();
        assert!(v1.is_rollback_target);
        assert!(!v1.is_production);
    }

    #[test]
    fn test_rollback_is_idempotent() {
        let registry = registry_with(&["v1", "v2"]);
        registry.set_production("v1");
        registry.set_production("v2");
        assert_eq!(registry.rollback(), Some("v1".to_string()));
        assert_eq!(registry.production().unwrap().version, "v1");
        // Second rollback lands on the same row
        assert_eq!(registry.rollback(), Some("v1".to_string()));
        assert_eq!(registry.production().unwrap().version, "v1");
    }

    #[test]
    fn test_unknown_version_cannot_be_promoted() {
        let registry = registry_with(&["v1"]);
        assert!(!registry.set_production("v99"));
        assert!(registry.production().is_none());
    }

    #[test]
    fn test_rollback_without_target_is_none() {
        let registry = registry_with(&["v1"]);
        registry.set_production("v1");
        assert_eq!(registry.rollback(), None);
    }
}
