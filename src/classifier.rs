use serde::{Deserialize, Serialize};
use std::sync::Arc;
use log::debug;

use crate::catalog::{Profile, ReferenceCatalog};
use crate::claims;
use crate::models::{Category, Tier};
use crate::utils::{validate_claim_list, QualityError};

// ======================================================================
// CLASSIFICATION RESULT
// ======================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationWarning {
    pub severity: WarningSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub profile_id: String,
    pub profile_code: String,
    pub profile_name: String,
    pub category: Category,
    pub tier: Tier,
    pub score: i32,
    pub matched_required: usize,
    pub matched_optional: Vec<String>,
    pub used_default: bool,
    pub reasoning: Vec<String>,
    pub warnings: Vec<ClassificationWarning>,
}

// ======================================================================
// CLAIM VOCABULARY FOR SEMANTIC WARNINGS
// ======================================================================

/// Explicit confinement-exclusion phrases (normalized). Their absence
/// next to a soft claim is itself a signal.
const CAFO_EXCLUSION_PHRASES: &[&str] = &[
    "100 grassfed",
    "grassfinished",
    "nofeedlot",
    "no cafo",
    "noconfinement",
];

/// Soft process claims that sound stronger than they are.
const SOFT_GRASS_PHRASES: &[&str] = &["grassfed", "pastureraised", "freerange"];

/// Breed and USDA-grade markers. These describe genetics and marbling,
/// not the production system.
const BREED_GRADE_MARKERS: &[&str] = &[
    "wagyu",
    "kobe",
    "prime",
    "choice",
    "a5",
    "angus",
    "certified angus",
    "usda prime",
];

// ======================================================================
// PROFILE CLASSIFIER
// ======================================================================

pub struct ProfileClassifier {
    catalog: Arc<ReferenceCatalog>,
}

impl ProfileClassifier {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self { catalog }
    }

    /// Score every profile of the category against the submitted claims
    /// and return the best non-disqualified match, falling back to the
    /// category's commodity default.
    pub fn classify(
        &self,
        category: Category,
        raw_claims: &[String],
    ) -> Result<ClassificationResult, QualityError> {
        validate_claim_list(raw_claims)?;
        let submitted = claims::normalize_claims(raw_claims);

        let profiles = self.catalog.profiles_for(category);
        if profiles.is_empty() {
            return Err(QualityError::CatalogLookup(format!(
                "category '{}' has no profiles",
                category
            )));
        }

        let mut best: Option<(&Profile, i32, usize, Vec<String>)> = None;
        for &profile in &profiles {
            let Some((score, matched_required, matched_optional)) =
                score_profile(profile, &submitted)
            else {
                continue; // disqualified
            };
            debug!(
                "profile {} scored {} ({} required, {} optional)",
                profile.code,
                score,
                matched_required,
                matched_optional.len()
            );

            let better = match &best {
                None => true,
                Some((current, current_score, _, _)) => {
                    score > *current_score
                        || (score == *current_score
                            && (profile.quality_rank, profile.sort_order)
                                < (current.quality_rank, current.sort_order))
                }
            };
            if better {
                best = Some((profile, score, matched_required, matched_optional));
            }
        }

        let mut reasoning = Vec::new();
        let (profile, score, matched_required, matched_optional, used_default) = match best {
            Some((p, score, req, opt)) => {
                reasoning.push(format!(
                    "matched {} required claim group(s) and {} optional claim(s)",
                    req,
                    opt.len()
                ));
                (p, score, req, opt, false)
            }
            None => {
                let default = self.catalog.default_profile(category).ok_or_else(|| {
                    QualityError::CatalogLookup(format!(
                        "category '{}' has no default profile",
                        category
                    ))
                })?;
                reasoning.push(
                    "no profile qualified without disqualification; using category default"
                        .to_string(),
                );
                (default, 0, 0, Vec::new(), true)
            }
        };
        reasoning.push(format!(
            "selected profile {} ({})",
            profile.code, profile.display_name
        ));

        let warnings = self.semantic_warnings(category, &submitted);

        Ok(ClassificationResult {
            profile_id: profile.id.clone(),
            profile_code: profile.code.clone(),
            profile_name: profile.display_name.clone(),
            category: profile.category,
            tier: profile.tier,
            score,
            matched_required,
            matched_optional,
            used_default,
            reasoning,
            warnings,
        })
    }

    /// Claim-pattern warnings for animal products. These fire on the
    /// submitted claims themselves, independent of which profile won.
    fn semantic_warnings(
        &self,
        category: Category,
        submitted: &[String],
    ) -> Vec<ClassificationWarning> {
        let mut warnings = Vec::new();
        if !category.is_animal_product() {
            return warnings;
        }

        let has_exclusion = CAFO_EXCLUSION_PHRASES
            .iter()
            .any(|p| claims::phrase_matches(submitted, p));
        let has_grass = claims::phrase_matches(submitted, "grassfed");
        let has_pasture = claims::phrase_matches(submitted, "pastureraised");

        if has_grass && !has_exclusion {
            warnings.push(ClassificationWarning {
                severity: WarningSeverity::High,
                message: "says 'grass-fed' but no finishing claim; grain finishing in a \
                          feedlot remains possible"
                    .to_string(),
            });
        } else if has_pasture && !has_exclusion {
            warnings.push(ClassificationWarning {
                severity: WarningSeverity::Medium,
                message: "says 'pasture-raised' but no confinement-exclusion claim; the \
                          claim is unverified marketing language"
                    .to_string(),
            });
        }

        let breed_only = !submitted.is_empty()
            && submitted.iter().all(|claim| {
                BREED_GRADE_MARKERS.iter().any(|m| claim.contains(m))
            });
        if breed_only {
            warnings.push(ClassificationWarning {
                severity: WarningSeverity::High,
                message: "breed and grade claims only; price does not imply health. Marbling \
                          programs extend feedlot time"
                    .to_string(),
            });
        }

        let has_organic = claims::phrase_matches(submitted, "organic");
        if has_organic
            && !has_grass
            && !has_pasture
            && matches!(category, Category::Livestock | Category::Eggs)
        {
            warnings.push(ClassificationWarning {
                severity: WarningSeverity::Critical,
                message: "organic is not grass-fed: it constrains feed inputs, not the \
                          feeding system"
                    .to_string(),
            });
        }

        warnings
    }
}

/// Returns `None` when the profile is disqualified (missing required
/// claim or matched exclusion), otherwise the score components.
fn score_profile(
    profile: &Profile,
    submitted: &[String],
) -> Option<(i32, usize, Vec<String>)> {
    for excluded in &profile.excluded_claims {
        if claims::phrase_matches(submitted, excluded) {
            return None;
        }
    }

    let mut matched_required = 0usize;
    for requirement in &profile.required_claims {
        if claims::any_phrase_matches(submitted, &requirement.any_of) {
            matched_required += 1;
        } else {
            return None;
        }
    }

    let matched_optional: Vec<String> = profile
        .optional_claims
        .iter()
        .filter(|phrase| claims::phrase_matches(submitted, phrase))
        .cloned()
        .collect();

    let score = 10 * matched_required as i32 + 5 * matched_optional.len() as i32;
    Some((score, matched_required, matched_optional))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ProfileClassifier {
        ProfileClassifier::new(Arc::new(ReferenceCatalog::new()))
    }

    fn classify(category: Category, claims: &[&str]) -> ClassificationResult {
        classifier()
            .classify(
                category,
                &claims.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            )
            .unwrap()
    }

    #[test]
    fn test_silence_routes_to_marketing_grass() {
        let result = classify(Category::Livestock, &["grass-fed"]);
        assert_eq!(result.profile_code, "B-C");
        assert!(!result.used_default);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("no finishing claim")));
    }

    #[test]
    fn test_explicit_exclusion_routes_to_true_grass() {
        let result = classify(Category::Livestock, &["100% grass-fed", "grass-finished"]);
        assert_eq!(result.profile_code, "B-A");
        assert!(result
            .warnings
            .iter()
            .all(|w| !w.message.contains("no finishing claim")));
    }

    #[test]
    fn test_breed_grade_only_routes_to_premium_cafo() {
        let result = classify(Category::Livestock, &["American Wagyu", "Prime"]);
        assert_eq!(result.profile_code, "B-F");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("price does not imply health")));
    }

    #[test]
    fn test_organic_meat_without_grass_warns_critically() {
        let result = classify(Category::Livestock, &["organic"]);
        let critical = result
            .warnings
            .iter()
            .find(|w| w.severity == WarningSeverity::Critical);
        assert!(critical.is_some());
        assert!(critical.unwrap().message.contains("organic is not grass-fed"));
    }

    #[test]
    fn test_empty_claims_return_category_default() {
        for (category, default_code) in [
            (Category::Livestock, "B-G"),
            (Category::Eggs, "E-E"),
            (Category::Dairy, "D-D"),
            (Category::Produce, "P-D"),
            (Category::Vegetables, "V-B"),
            (Category::Nut, "N-C"),
            (Category::Seafood, "S-C"),
            (Category::Honey, "H-C"),
            (Category::Transformed, "T-C"),
        ] {
            let result = classify(category, &[]);
            assert_eq!(result.profile_code, default_code, "for {:?}", category);
        }
    }

    #[test]
    fn test_classifier_returns_profile_of_requested_category() {
        let inputs: &[&[&str]] = &[
            &[],
            &["grass-fed"],
            &["organic", "heirloom"],
            &["raw", "single varietal"],
            &["wild caught"],
        ];
        for claims in inputs {
            for category in [
                Category::Livestock,
                Category::Produce,
                Category::Honey,
                Category::Seafood,
            ] {
                let result = classify(category, claims);
                assert_eq!(result.category, category);
            }
        }
    }

    #[test]
    fn test_satisfied_profile_is_never_disqualified() {
        // Submitting exactly a profile's required claims (and none of
        // its exclusions) must qualify it.
        let catalog = ReferenceCatalog::new();
        let b_a = catalog.profile_by_code("B-A").unwrap();
        let submitted: Vec<String> = b_a
            .required_claims
            .iter()
            .map(|req| req.any_of[0].clone())
            .collect();
        assert!(score_profile(b_a, &submitted).is_some());
    }

    #[test]
    fn test_score_weights_required_over_optional() {
        // B-A with both required groups: 2×10 = 20. An extra optional
        // claim adds 5 on top.
        let result = classify(
            Category::Livestock,
            &["100% grass-fed", "grass-finished", "regenerative"],
        );
        assert_eq!(result.profile_code, "B-A");
        assert_eq!(result.score, 25);
    }

    #[test]
    fn test_pasture_marketing_variant() {
        let result = classify(Category::Livestock, &["pasture-raised"]);
        assert_eq!(result.profile_code, "B-D");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("pasture-raised")));
    }

    #[test]
    fn test_pasture_with_exclusion_routes_premium() {
        let result = classify(Category::Livestock, &["pasture-raised", "no feedlot"]);
        assert_eq!(result.profile_code, "B-B");
    }

    #[test]
    fn test_raw_varietal_honey() {
        let result = classify(Category::Honey, &["raw", "single varietal tupelo"]);
        assert_eq!(result.profile_code, "H-A");
        let blended = classify(Category::Honey, &["raw wildflower"]);
        assert_eq!(blended.profile_code, "H-B");
    }

    #[test]
    fn test_verbose_packaging_prose_still_matches() {
        let result = classify(
            Category::Livestock,
            &["Our herd is 100% Grass-Fed and Grass-Finished on open range."],
        );
        assert_eq!(result.profile_code, "B-A");
    }
}
