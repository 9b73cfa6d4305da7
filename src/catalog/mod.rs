pub mod data;
pub mod models;
pub mod overrides;

pub use data::CatalogLoader;
pub use models::*;

use std::collections::HashMap;

use crate::claims;
use crate::models::Category;

/// Immutable, process-lifetime registry of reference data. Built once
/// from a `CatalogLoader` at startup; profile claims are normalized here
/// so the classifier only ever sees canonical text.
pub struct ReferenceCatalog {
    categories: HashMap<Category, CategoryConfig>,
    subcategories: HashMap<(Category, String), SubcategoryOverride>,
    profiles: Vec<Profile>,
    profiles_by_category: HashMap<Category, Vec<usize>>,
    transformation_profiles: HashMap<String, TransformationProfile>,
    cultivars: HashMap<String, Cultivar>,
    vegetable_varieties: HashMap<String, VegetableVariety>,
    honey_varietals: HashMap<String, f64>,
    usda_minima: HashMap<String, UsdaMinimum>,
    brix_tier_tables: HashMap<String, TierThresholds>,
    rootstock_modifiers: HashMap<String, f64>,
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self::from_loader(CatalogLoader::new())
    }

    pub fn from_loader(loader: CatalogLoader) -> Self {
        let mut profiles = loader.profiles;
        for profile in &mut profiles {
            for requirement in &mut profile.required_claims {
                for phrase in &mut requirement.any_of {
                    *phrase = claims::normalize_phrase(phrase);
                }
            }
            for phrase in &mut profile.excluded_claims {
                *phrase = claims::normalize_phrase(phrase);
            }
            for phrase in &mut profile.optional_claims {
                *phrase = claims::normalize_phrase(phrase);
            }
        }
        // Deterministic classifier iteration order
        profiles.sort_by_key(|p| (p.category.to_string(), p.sort_order));

        let mut profiles_by_category: HashMap<Category, Vec<usize>> = HashMap::new();
        for (idx, profile) in profiles.iter().enumerate() {
            profiles_by_category
                .entry(profile.category)
                .or_default()
                .push(idx);
        }

        Self {
            categories: loader
                .categories
                .into_iter()
                .map(|c| (c.category, c))
                .collect(),
            subcategories: loader
                .subcategories
                .into_iter()
                .map(|(cat, ov)| ((cat, ov.id.clone()), ov))
                .collect(),
            profiles,
            profiles_by_category,
            transformation_profiles: loader
                .transformation_profiles
                .into_iter()
                .map(|t| (t.code.clone(), t))
                .collect(),
            cultivars: loader
                .cultivars
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
            vegetable_varieties: loader
                .vegetable_varieties
                .into_iter()
                .map(|v| (v.id.clone(), v))
                .collect(),
            honey_varietals: loader.honey_varietals,
            usda_minima: loader
                .usda_minima
                .into_iter()
                .map(|m| (m.crop.clone(), m))
                .collect(),
            brix_tier_tables: loader.brix_tier_tables,
            rootstock_modifiers: loader.rootstock_modifiers,
        }
    }

    pub fn config(&self, category: Category) -> Option<&CategoryConfig> {
        self.categories.get(&category)
    }

    /// Category config with the subcategory override merged on, when one
    /// exists. Unknown subcategories fall back to the plain config.
    pub fn resolved_config(
        &self,
        category: Category,
        subcategory: Option<&str>,
    ) -> Option<CategoryConfig> {
        let base = self.categories.get(&category)?;
        match subcategory
            .and_then(|s| self.subcategories.get(&(category, s.to_string())))
        {
            Some(ov) => Some(overrides::merge_category_config(base, ov)),
            None => Some(base.clone()),
        }
    }

    pub fn profiles_for(&self, category: Category) -> Vec<&Profile> {
        self.profiles_by_category
            .get(&category)
            .map(|indices| indices.iter().map(|&i| &self.profiles[i]).collect())
            .unwrap_or_default()
    }

    pub fn default_profile(&self, category: Category) -> Option<&Profile> {
        self.profiles_for(category)
            .into_iter()
            .find(|p| p.is_default)
    }

    pub fn profile_by_code(&self, code: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.code == code)
    }

    pub fn cultivar(&self, id: &str) -> Option<&Cultivar> {
        self.cultivars.get(id)
    }

    pub fn vegetable_variety(&self, id: &str) -> Option<&VegetableVariety> {
        self.vegetable_varieties.get(id)
    }

    pub fn honey_varietal_baseline(&self, varietal: &str) -> Option<f64> {
        self.honey_varietals.get(varietal).copied()
    }

    pub fn usda_minimum(&self, crop: &str) -> Option<&UsdaMinimum> {
        self.usda_minima.get(crop)
    }

    pub fn transformation_profile(&self, code: &str) -> Option<&TransformationProfile> {
        self.transformation_profiles.get(code)
    }

    pub fn rootstock_modifier(&self, rootstock: &str) -> f64 {
        self.rootstock_modifiers
            .get(rootstock)
            .copied()
            .unwrap_or(0.0)
    }

    /// Tier table for a crop group with generic fallback, then the
    /// subcategory's partial thresholds merged on top.
    pub fn tier_table(
        &self,
        crop_group: &str,
        category: Category,
        subcategory: Option<&str>,
    ) -> TierThresholds {
        let base = self
            .brix_tier_tables
            .get(crop_group)
            .or_else(|| self.brix_tier_tables.get("generic"))
            .copied()
            .unwrap_or(TierThresholds {
                artisan: 14.0,
                premium: 12.0,
                standard: 10.0,
            });

        match subcategory
            .and_then(|s| self.subcategories.get(&(category, s.to_string())))
            .and_then(|ov| ov.tier_thresholds.as_ref())
        {
            Some(partial) => overrides::merge_tier_thresholds(&base, partial),
            None => base,
        }
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricType, Tier};

    #[test]
    fn test_profiles_are_normalized_at_load() {
        let catalog = ReferenceCatalog::new();
        let b_a = catalog.profile_by_code("B-A").unwrap();
        // "100% grass-fed" canonicalizes to "100 grassfed"
        assert!(b_a.required_claims[1]
            .any_of
            .contains(&"100 grassfed".to_string()));
        let b_c = catalog.profile_by_code("B-C").unwrap();
        assert!(b_c.excluded_claims.contains(&"grassfinished".to_string()));
    }

    #[test]
    fn test_default_profile_lookup() {
        let catalog = ReferenceCatalog::new();
        let default = catalog.default_profile(Category::Livestock).unwrap();
        assert_eq!(default.code, "B-G");
        assert_eq!(default.tier, Tier::Commodity);
    }

    #[test]
    fn test_profiles_for_returns_only_that_category() {
        let catalog = ReferenceCatalog::new();
        for profile in catalog.profiles_for(Category::Honey) {
            assert_eq!(profile.category, Category::Honey);
        }
        assert!(!catalog.profiles_for(Category::Honey).is_empty());
    }

    #[test]
    fn test_citrus_subcategory_merges_tier_table() {
        let catalog = ReferenceCatalog::new();
        // Cherry table untouched by the citrus subcategory
        let cherry = catalog.tier_table("cherry", Category::Produce, None);
        assert_eq!(cherry.artisan, 18.0);
        // Unknown crop group falls back to generic
        let unknown = catalog.tier_table("dragonfruit", Category::Produce, None);
        assert_eq!(unknown.artisan, 14.0);
    }

    #[test]
    fn test_resolved_config_with_subcategory() {
        let catalog = ReferenceCatalog::new();
        let citrus = catalog
            .resolved_config(Category::Produce, Some("citrus"))
            .unwrap();
        assert_eq!(citrus.scoring_range, (6.0, 16.0));
        assert_eq!(citrus.primary_metric, MetricType::Brix);
        // Oyster subcategory relabels the soil pillar as merroir
        let oyster = catalog
            .resolved_config(Category::Seafood, Some("oyster"))
            .unwrap();
        assert_eq!(oyster.pillar_labels.soil, "Merroir");
    }

    #[test]
    fn test_rootstock_modifier_fallback() {
        let catalog = ReferenceCatalog::new();
        assert_eq!(catalog.rootstock_modifier("carrizo"), 0.3);
        assert_eq!(catalog.rootstock_modifier("unknown_stock"), 0.0);
    }
}
