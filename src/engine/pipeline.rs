use serde::{Deserialize, Serialize};

use crate::climate::ClimateZone;
use crate::config::{CalcConfig, ClassThresholds, FactorSet};
use crate::envelope::Envelope;
use crate::error::Result;
use crate::systems::{DhwSystem, HeatingSystem};

use super::balance::{compute_monthly_balance, MonthlyBalanceResult};
use super::classify::{classify, EnergyClassResult};
use super::delivered::{delivered_energy, DeliveredEnergy};
use super::primary::{convert_primary, PrimaryEnergyResult};

/// Complete evaluation of one building state: balance, delivered energy,
/// primary energy/CO2 and energy class. Serializable for the certificate
/// and report layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvaluation {
    pub balance: MonthlyBalanceResult,
    pub delivered: DeliveredEnergy,
    pub primary: PrimaryEnergyResult,
    pub class_result: EnergyClassResult,
}

/// Runs the full pipeline on one building state. Pure and deterministic;
/// the optimizer re-runs it per candidate measure on cloned inputs.
pub fn evaluate(
    envelope: &Envelope,
    heating: &HeatingSystem,
    dhw: &DhwSystem,
    zone: &ClimateZone,
    config: &CalcConfig,
    factors: &FactorSet,
    thresholds: &ClassThresholds,
) -> Result<AuditEvaluation> {
    let balance = compute_monthly_balance(envelope, config, zone)?;
    let delivered = delivered_energy(&balance, heating, dhw, config)?;
    let primary = convert_primary(&delivered, factors, envelope.heated_floor_area_m2)?;
    let class_result = classify(&primary, thresholds)?;
    Ok(AuditEvaluation {
        balance,
        delivered,
        primary,
        class_result,
    })
}
