use serde::{Deserialize, Serialize};

use crate::config::{ClassThresholds, EnergyClass};
use crate::engine::primary::PrimaryEnergyResult;
use crate::error::{EngineError, Result};

/// Classification outcome: the certificate-facing indicator pair plus the
/// assigned class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyClassResult {
    pub specific_primary_kwh_per_m2: f64,
    pub specific_co2_kg_per_m2: f64,
    pub class: EnergyClass,
}

/// Maps the specific primary-energy indicator to its ordinal class.
/// Total over non-negative input; a negative indicator is a pipeline bug
/// upstream and fails with `InvalidIndicator`.
pub fn classify(
    primary: &PrimaryEnergyResult,
    thresholds: &ClassThresholds,
) -> Result<EnergyClassResult> {
    let indicator = primary.specific_primary_kwh_per_m2;
    if indicator < 0.0 || !indicator.is_finite() {
        return Err(EngineError::InvalidIndicator(indicator));
    }
    Ok(EnergyClassResult {
        specific_primary_kwh_per_m2: indicator,
        specific_co2_kg_per_m2: primary.specific_co2_kg_per_m2,
        class: thresholds.classify(indicator),
    })
}
