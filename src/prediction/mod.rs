pub mod honey;
pub mod livestock;
pub mod nut;
pub mod produce;
pub mod router;
pub mod seafood;
pub mod transformed;
pub mod vegetable;

pub use router::PredictionRouter;

use crate::catalog::Profile;
use crate::models::{Category, MetricType, PredictionInput, PredictionResult, QualityBand};
use crate::utils::QualityError;

/// Contract every category predictor implements. Predictors are pure
/// and synchronous; calibration, decay capping and ML enhancement are
/// the router's job.
pub trait QualityPredictor: Send + Sync {
    fn can_handle(&self, category: Category) -> bool;
    fn primary_metric_type(&self) -> MetricType;
    fn predict(
        &self,
        input: &PredictionInput,
        profile: &Profile,
    ) -> Result<PredictionResult, QualityError>;
}

/// Confidence decay for forecast predictions. Inside a 10-day window the
/// forecast is nearly as good as a reading; beyond it the value halves
/// every 60 days, floored at 30% of the undecayed confidence.
pub fn temporal_decay(confidence: f64, days_until_harvest: f64) -> f64 {
    if days_until_harvest <= 0.0 {
        return confidence;
    }
    let factor = if days_until_harvest <= 10.0 {
        0.95
    } else {
        let halvings = (days_until_harvest - 10.0) / 60.0;
        (0.95 * 0.5_f64.powf(halvings)).max(0.30)
    };
    confidence * factor
}

/// Symmetric band around a point estimate, clamped to hard bounds. The
/// half-width widens as confidence drops.
pub fn band_around(mid: f64, confidence: f64, unit_spread: f64, bounds: (f64, f64)) -> QualityBand {
    let half_width = unit_spread * (1.5 - confidence.clamp(0.0, 1.0));
    QualityBand {
        low: (mid - half_width).max(bounds.0),
        mid,
        high: (mid + half_width).min(bounds.1),
    }
}
