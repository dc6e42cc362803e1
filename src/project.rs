//! Audit project: the aggregate the surrounding application hands to the
//! engine. Holds one building state, its climate location, the candidate
//! measures and the financial parameters, and exposes the two entry
//! points the report layer calls.

use serde::{Deserialize, Serialize};

use crate::climate::ClimateRegistry;
use crate::config::{CalcConfig, ClassThresholds, EnergyTariffs, FactorSet, FinanceDefaults};
use crate::engine::{evaluate, AuditEvaluation};
use crate::envelope::Envelope;
use crate::error::Result;
use crate::measures::Measure;
use crate::optimizer::{prioritize, PriorityMatrix};
use crate::systems::{DhwSystem, HeatingSystem};
use crate::uid::UID;

/// One energy audit: a building, its location and the retrofit measures
/// under consideration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditProject {
    pub id: UID,
    pub name: String,
    pub envelope: Envelope,
    pub heating: HeatingSystem,
    pub dhw: DhwSystem,
    /// Climate zone identifier resolved against the registry at
    /// evaluation time.
    pub location_id: String,
    pub config: CalcConfig,
    pub measures: Vec<Measure>,
    pub finance: FinanceDefaults,
}

impl AuditProject {
    pub fn new(
        name: &str,
        envelope: Envelope,
        heating: HeatingSystem,
        dhw: DhwSystem,
        location_id: &str,
        config: CalcConfig,
    ) -> Self {
        Self {
            id: UID::new(),
            name: name.to_string(),
            envelope,
            heating,
            dhw,
            location_id: location_id.to_string(),
            config,
            measures: Vec::new(),
            finance: FinanceDefaults::default(),
        }
    }

    pub fn add_measure(&mut self, measure: Measure) {
        self.measures.push(measure);
    }

    /// Runs the full pipeline on the building as described, without any
    /// measure applied.
    pub fn evaluate_baseline(
        &self,
        registry: &ClimateRegistry,
        factors: &FactorSet,
        thresholds: &ClassThresholds,
    ) -> Result<AuditEvaluation> {
        let zone = registry.lookup(&self.location_id)?;
        evaluate(
            &self.envelope,
            &self.heating,
            &self.dhw,
            zone,
            &self.config,
            factors,
            thresholds,
        )
    }

    /// Evaluates every candidate measure and selects the best subset
    /// within the budget (`None` = unconstrained).
    #[allow(clippy::too_many_arguments)]
    pub fn prioritize_measures(
        &self,
        registry: &ClimateRegistry,
        factors: &FactorSet,
        thresholds: &ClassThresholds,
        tariffs: &EnergyTariffs,
        budget_eur: Option<f64>,
    ) -> Result<PriorityMatrix> {
        let zone = registry.lookup(&self.location_id)?;
        prioritize(
            &self.envelope,
            &self.heating,
            &self.dhw,
            zone,
            &self.config,
            factors,
            thresholds,
            tariffs,
            &self.finance,
            &self.measures,
            budget_eur,
        )
    }
}
