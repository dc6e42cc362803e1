use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Energy carrier delivered to the building.
///
/// A heat pump is treated as its own carrier with the seasonal performance
/// factor folded into the source efficiency; its primary-energy and CO2
/// factors are carrier-specific rather than derived from the electricity mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Carrier {
    Electricity,
    NaturalGas,
    Biomass,
    DistrictHeat,
    HeatPump,
}

impl Carrier {
    pub const ALL: [Carrier; 5] = [
        Carrier::Electricity,
        Carrier::NaturalGas,
        Carrier::Biomass,
        Carrier::DistrictHeat,
        Carrier::HeatPump,
    ];
}

/// Space heating system: source, distribution and control efficiency.
///
/// Each efficiency must lie in (0, 1], except the source efficiency of a
/// heat pump, which is the seasonal performance factor and may reach 7.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingSystem {
    pub carrier: Carrier,
    /// Heat source (generation) efficiency, or SPF for heat pumps.
    pub source_efficiency: f64,
    /// Distribution efficiency in (0, 1].
    pub distribution_efficiency: f64,
    /// Control efficiency in (0, 1].
    pub control_efficiency: f64,
}

impl HeatingSystem {
    pub fn new(
        carrier: Carrier,
        source_efficiency: f64,
        distribution_efficiency: f64,
        control_efficiency: f64,
    ) -> Result<Self> {
        let source_max = if carrier == Carrier::HeatPump { 7.0 } else { 1.0 };
        check_efficiency("source", source_efficiency, source_max)?;
        check_efficiency("distribution", distribution_efficiency, 1.0)?;
        check_efficiency("control", control_efficiency, 1.0)?;
        Ok(Self {
            carrier,
            source_efficiency,
            distribution_efficiency,
            control_efficiency,
        })
    }

    /// Condensing gas boiler with radiator distribution.
    pub fn gas_boiler() -> Self {
        Self::new(Carrier::NaturalGas, 0.92, 0.95, 0.97).unwrap()
    }

    /// Air-to-water heat pump with SPF 3.2.
    pub fn heat_pump() -> Self {
        Self::new(Carrier::HeatPump, 3.2, 0.95, 0.97).unwrap()
    }

    /// Overall system efficiency (product of the three terms).
    pub fn overall_efficiency(&self) -> f64 {
        self.source_efficiency * self.distribution_efficiency * self.control_efficiency
    }

    /// Re-checks the efficiency ranges. Fields are public (the struct is
    /// deserialized from the form layer), so consumers validate at use.
    pub fn validate(&self) -> Result<()> {
        let source_max = if self.carrier == Carrier::HeatPump { 7.0 } else { 1.0 };
        check_efficiency("source", self.source_efficiency, source_max)?;
        check_efficiency("distribution", self.distribution_efficiency, 1.0)?;
        check_efficiency("control", self.control_efficiency, 1.0)?;
        Ok(())
    }
}

/// Domestic hot water system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DhwSystem {
    pub carrier: Carrier,
    /// Overall DHW system efficiency (generation, storage and circulation).
    pub system_efficiency: f64,
    /// Daily hot water draw per occupant in liters.
    pub daily_need_l_per_person: f64,
    /// Number of occupants.
    pub occupants: f64,
}

impl DhwSystem {
    pub fn new(
        carrier: Carrier,
        system_efficiency: f64,
        daily_need_l_per_person: f64,
        occupants: f64,
    ) -> Result<Self> {
        let max = if carrier == Carrier::HeatPump { 7.0 } else { 1.0 };
        check_efficiency("dhw", system_efficiency, max)?;
        Ok(Self {
            carrier,
            system_efficiency,
            daily_need_l_per_person,
            occupants,
        })
    }

    /// Electric storage water heater for a 4-person household.
    pub fn electric_boiler() -> Self {
        Self::new(Carrier::Electricity, 0.85, 40.0, 4.0).unwrap()
    }

    /// Re-checks the efficiency range (see [`HeatingSystem::validate`]).
    pub fn validate(&self) -> Result<()> {
        let max = if self.carrier == Carrier::HeatPump { 7.0 } else { 1.0 };
        check_efficiency("dhw", self.system_efficiency, max)
    }
}

fn check_efficiency(role: &'static str, value: f64, max: f64) -> Result<()> {
    if !(value > 0.0 && value <= max && value.is_finite()) {
        return Err(EngineError::InvalidEfficiency {
            role,
            value,
            min: 0.0,
            max,
        });
    }
    Ok(())
}
