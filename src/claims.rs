//! Claim normalization. Marketing text is noisy ("100% Grass-Fed!",
//! "grassfed", "grass fed"); every claim is canonicalized before any
//! profile matching so the classifier only ever compares normalized text.

/// Synonym table applied after punctuation stripping. Both sides are
/// already lowercase and punctuation-free; the right side is canonical.
const SYNONYMS: &[(&str, &str)] = &[
    ("grass fed", "grassfed"),
    ("grass finished", "grassfinished"),
    ("grain finished", "grainfinished"),
    ("grain fed", "grainfed"),
    ("pasture raised", "pastureraised"),
    ("pastured", "pastureraised"),
    ("free range", "freerange"),
    ("cage free", "cagefree"),
    ("no spray", "nospray"),
    ("spray free", "nospray"),
    ("never confined", "noconfinement"),
    ("no confinement", "noconfinement"),
    ("no feedlot", "nofeedlot"),
    ("feedlot free", "nofeedlot"),
    ("100 percent", "100"),
    ("one hundred percent", "100"),
    ("concentrated animal feeding operation", "cafo"),
];

/// Normalize one claim phrase: trim, lowercase, strip punctuation
/// (spaces survive), collapse whitespace, then apply the synonym table.
/// Idempotent.
pub fn normalize_phrase(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() || c == ' ' { c } else { ' ' })
        .collect();
    let mut collapsed = stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    for (variant, canonical) in SYNONYMS {
        if collapsed.contains(variant) {
            collapsed = collapsed.replace(variant, canonical);
        }
    }
    // Replacement can leave doubled spaces when a phrase collapses
    collapsed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a full claim list. Order is irrelevant and duplicates
/// collapse; empty claims drop out.
pub fn normalize_claims(raw: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for claim in raw {
        let normalized = normalize_phrase(claim);
        if !normalized.is_empty() && !seen.contains(&normalized) {
            seen.push(normalized);
        }
    }
    seen
}

/// Substring match: a catalog phrase matches when any submitted claim
/// contains it. Keeps the matcher robust to verbose packaging prose.
pub fn phrase_matches(submitted: &[String], normalized_phrase: &str) -> bool {
    if normalized_phrase.is_empty() {
        return false;
    }
    submitted.iter().any(|claim| claim.contains(normalized_phrase))
}

/// True when any of the catalog phrases matches.
pub fn any_phrase_matches(submitted: &[String], phrases: &[String]) -> bool {
    phrases.iter().any(|p| phrase_matches(submitted, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        normalize_phrase(s)
    }

    #[test]
    fn test_basic_normalization() {
        assert_eq!(norm("  Grass-Fed!  "), "grassfed");
        assert_eq!(norm("100% GRASS-FED"), "100 grassfed");
        assert_eq!(norm("Pasture   Raised"), "pastureraised");
        assert_eq!(norm("No CAFO"), "no cafo");
    }

    #[test]
    fn test_synonym_variants_collapse_to_one_form() {
        assert_eq!(norm("grass fed"), norm("grass-fed"));
        assert_eq!(norm("grassfed"), norm("grass fed"));
        assert_eq!(norm("100 percent grass fed"), norm("100% grass-fed"));
        assert_eq!(norm("no feedlot"), norm("feedlot-free"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for raw in [
            "100% Grass-Fed, Grass-Finished",
            "Pasture-Raised / No CAFO",
            "USDA Prime American Wagyu",
            "raw unfiltered honey",
        ] {
            let once = norm(raw);
            assert_eq!(norm(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_duplicates_collapse() {
        let claims = vec![
            "Grass-Fed".to_string(),
            "grass fed".to_string(),
            "GRASSFED".to_string(),
        ];
        assert_eq!(normalize_claims(&claims), vec!["grassfed".to_string()]);
    }

    #[test]
    fn test_empty_claims_drop_out() {
        let claims = vec!["!!!".to_string(), "".to_string(), "organic".to_string()];
        assert_eq!(normalize_claims(&claims), vec!["organic".to_string()]);
    }

    #[test]
    fn test_substring_matching_survives_prose() {
        let submitted = normalize_claims(&[
            "Our happy cows are 100% Grass-Fed on coastal pastures.".to_string(),
        ]);
        assert!(phrase_matches(&submitted, &norm("100% grass-fed")));
        assert!(phrase_matches(&submitted, &norm("grass-fed")));
        assert!(!phrase_matches(&submitted, &norm("grain-finished")));
    }

    #[test]
    fn test_empty_phrase_never_matches() {
        let submitted = vec!["organic".to_string()];
        assert!(!phrase_matches(&submitted, ""));
    }
}
