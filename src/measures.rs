//! Retrofit measures: declarative edits to a building state.
//!
//! A measure never mutates the baseline; the optimizer clones the
//! envelope, systems and config and applies the measure's actions to the
//! clone. Each action names the subject it touches so the optimizer can
//! reject overlapping candidates up front.

use serde::{Deserialize, Serialize};

use crate::config::CalcConfig;
use crate::envelope::Envelope;
use crate::error::{EngineError, Result};
use crate::systems::{DhwSystem, HeatingSystem};
use crate::uid::UID;

/// One atomic edit performed by a retrofit measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeasureAction {
    /// Sets the U-value of the named envelope element directly
    /// (e.g. window replacement with a certified product value).
    ImproveElementU { element: String, new_u_value: f64 },
    /// Adds an insulation layer to the named element; the new U-value is
    /// 1 / (1/U_old + d/λ).
    AddInsulation {
        element: String,
        /// Layer thickness in m.
        thickness_m: f64,
        /// Insulant conductivity in W/(m·K).
        conductivity: f64,
    },
    /// Swaps the space heating system.
    ReplaceHeatingSystem { system: HeatingSystem },
    /// Swaps the domestic hot water system.
    ReplaceDhwSystem { system: DhwSystem },
    /// Sets a new design air-change rate (window sealing, heat-recovery
    /// ventilation modelled as an equivalent reduced rate).
    ReduceAirChange { new_rate_per_h: f64 },
}

impl MeasureAction {
    /// Key identifying what this action touches; two actions with the
    /// same subject must never run in one optimization pass.
    pub fn subject(&self) -> String {
        match self {
            MeasureAction::ImproveElementU { element, .. }
            | MeasureAction::AddInsulation { element, .. } => format!("element:{element}"),
            MeasureAction::ReplaceHeatingSystem { .. } => "heating_system".to_string(),
            MeasureAction::ReplaceDhwSystem { .. } => "dhw_system".to_string(),
            MeasureAction::ReduceAirChange { .. } => "air_change".to_string(),
        }
    }
}

/// A named retrofit measure: one or more actions plus its cost and
/// expected lifetime, which doubles as the financial evaluation horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub id: UID,
    pub name: String,
    pub actions: Vec<MeasureAction>,
    /// Up-front investment in EUR.
    pub investment_cost_eur: f64,
    /// Technical lifetime in years.
    pub lifetime_years: u32,
}

impl Measure {
    pub fn new(name: &str, investment_cost_eur: f64, lifetime_years: u32) -> Self {
        Self {
            id: UID::new(),
            name: name.to_string(),
            actions: Vec::new(),
            investment_cost_eur,
            lifetime_years,
        }
    }

    pub fn with_action(mut self, action: MeasureAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Subjects touched by this measure, for overlap detection.
    pub fn subjects(&self) -> Vec<String> {
        self.actions.iter().map(|a| a.subject()).collect()
    }

    /// Applies every action to the given (cloned) building state.
    ///
    /// Naming an envelope element that does not exist is an input error,
    /// not a no-op: a silently skipped action would make the measure look
    /// free of effect and the optimizer would quietly drop it.
    pub fn apply(
        &self,
        envelope: &mut Envelope,
        heating: &mut HeatingSystem,
        dhw: &mut DhwSystem,
        config: &mut CalcConfig,
    ) -> Result<()> {
        for action in &self.actions {
            match action {
                MeasureAction::ImproveElementU {
                    element,
                    new_u_value,
                } => {
                    let target = find_element(envelope, element)?;
                    if !(*new_u_value > 0.0 && new_u_value.is_finite()) {
                        return Err(EngineError::InvalidGeometry {
                            element: element.clone(),
                            quantity: "u_value",
                            value: *new_u_value,
                        });
                    }
                    target.u_value = *new_u_value;
                }
                MeasureAction::AddInsulation {
                    element,
                    thickness_m,
                    conductivity,
                } => {
                    if !(*thickness_m > 0.0 && *conductivity > 0.0) {
                        return Err(EngineError::InvalidGeometry {
                            element: element.clone(),
                            quantity: "insulation_layer",
                            value: *thickness_m,
                        });
                    }
                    let target = find_element(envelope, element)?;
                    target.u_value = 1.0 / (1.0 / target.u_value + thickness_m / conductivity);
                }
                MeasureAction::ReplaceHeatingSystem { system } => {
                    system.validate()?;
                    *heating = system.clone();
                }
                MeasureAction::ReplaceDhwSystem { system } => {
                    system.validate()?;
                    *dhw = system.clone();
                }
                MeasureAction::ReduceAirChange { new_rate_per_h } => {
                    if !(*new_rate_per_h > 0.0 && new_rate_per_h.is_finite()) {
                        return Err(EngineError::InvalidGeometry {
                            element: "ventilation".to_string(),
                            quantity: "air_change_rate",
                            value: *new_rate_per_h,
                        });
                    }
                    config.air_change = crate::config::AirChange::Design {
                        rate_per_h: *new_rate_per_h,
                    };
                }
            }
        }
        Ok(())
    }
}

fn find_element<'a>(
    envelope: &'a mut Envelope,
    name: &str,
) -> Result<&'a mut crate::envelope::ConstructionElement> {
    envelope
        .elements_mut()
        .iter_mut()
        .find(|e| e.name == name)
        .ok_or_else(|| EngineError::InvalidGeometry {
            element: name.to_string(),
            quantity: "unknown_element",
            value: f64::NAN,
        })
}
