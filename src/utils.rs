use thiserror::Error;

use crate::models::Category;

/// Fatal errors. Everything recoverable is surfaced as a warning on the
/// prediction result instead.
#[derive(Debug, Error)]
pub enum QualityError {
    #[error("no predictor registered for category '{0}'")]
    UnknownCategory(Category),
    #[error("missing required field '{0}'")]
    MissingRequiredField(String),
    #[error("invalid value for '{field}': {reason}")]
    InvalidFormat { field: String, reason: String },
    #[error("catalog lookup failed: {0}")]
    CatalogLookup(String),
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Linear interpolation of `value` across `[lo, hi]` onto [0, 100].
pub fn scale_to_score(value: f64, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return 0.0;
    }
    clamp((value - lo) / (hi - lo) * 100.0, 0.0, 100.0)
}

/// Same mapping with the direction reversed (lower metric = higher score).
pub fn scale_to_score_inverted(value: f64, best: f64, worst: f64) -> f64 {
    if worst <= best {
        return 0.0;
    }
    clamp((worst - value) / (worst - best) * 100.0, 0.0, 100.0)
}

pub fn validate_claim_list(claims: &[String]) -> Result<(), QualityError> {
    if claims.len() > 50 {
        return Err(QualityError::InvalidFormat {
            field: "claims".to_string(),
            reason: "too many claims (max 50)".to_string(),
        });
    }
    for claim in claims {
        if claim.len() > 500 {
            return Err(QualityError::InvalidFormat {
                field: "claims".to_string(),
                reason: "claim text too long (max 500 characters)".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_identifier(field: &str, value: &str) -> Result<(), QualityError> {
    if value.trim().is_empty() {
        return Err(QualityError::MissingRequiredField(field.to_string()));
    }
    if value.len() > 200 {
        return Err(QualityError::InvalidFormat {
            field: field.to_string(),
            reason: "identifier too long (max 200 characters)".to_string(),
        });
    }
    Ok(())
}
