use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::systems::Carrier;

/// Closed set of building-use categories driving internal gains and DHW
/// draw-off profiles. Kept as an enumeration rather than an open lookup so
/// every category has a defined rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingUse {
    FamilyHouse,
    ApartmentBlock,
    Office,
    School,
    Hospital,
    Retail,
    Industrial,
}

impl BuildingUse {
    /// Internal heat-gain rate in W/m² of heated floor area.
    pub fn internal_gain_rate_w_per_m2(self) -> f64 {
        match self {
            BuildingUse::FamilyHouse => 4.0,
            BuildingUse::ApartmentBlock => 3.5,
            BuildingUse::Office => 6.0,
            BuildingUse::School => 5.0,
            BuildingUse::Hospital => 8.0,
            BuildingUse::Retail => 10.0,
            BuildingUse::Industrial => 12.0,
        }
    }

    /// Fraction of the nominal occupant hot-water draw actually taken,
    /// reflecting intermittent occupancy (offices, schools, retail).
    pub fn dhw_draw_off_factor(self) -> f64 {
        match self {
            BuildingUse::FamilyHouse | BuildingUse::ApartmentBlock => 1.0,
            BuildingUse::Hospital => 1.0,
            BuildingUse::Office => 0.35,
            BuildingUse::School => 0.30,
            BuildingUse::Retail => 0.25,
            BuildingUse::Industrial => 0.40,
        }
    }
}

/// Source of the ventilation air-change rate. An explicit configuration
/// point: either a fixed design value or a blower-door n50 result divided
/// by a conversion factor (20 by convention for sheltered buildings).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AirChange {
    /// Fixed design air-change rate in 1/h.
    Design { rate_per_h: f64 },
    /// n50 airtightness result in 1/h, converted to a seasonal mean rate.
    MeasuredN50 { n50_per_h: f64, conversion_factor: f64 },
}

impl AirChange {
    /// Effective air-change rate in 1/h.
    pub fn rate_per_h(&self) -> f64 {
        match *self {
            AirChange::Design { rate_per_h } => rate_per_h,
            AirChange::MeasuredN50 {
                n50_per_h,
                conversion_factor,
            } => n50_per_h / conversion_factor,
        }
    }
}

/// Per-run calculation configuration. Passed explicitly into every
/// evaluation — never process-wide state — so audits against different
/// parameter years can run side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcConfig {
    /// Indoor heating setpoint in °C.
    pub heating_setpoint_c: f64,
    /// Indoor cooling setpoint in °C (summer stability check).
    pub cooling_setpoint_c: f64,
    /// Ventilation air-change source.
    pub air_change: AirChange,
    /// Building-use category (internal gains, DHW profile).
    pub building_use: BuildingUse,
    /// Utilization-curve reference constant a0 (monthly method).
    pub utilization_a0: f64,
    /// Utilization-curve reference time constant τ0 in hours.
    pub utilization_tau0_h: f64,
    /// Cold water inlet temperature in °C.
    pub dhw_cold_water_c: f64,
    /// Hot water delivery temperature in °C.
    pub dhw_hot_water_c: f64,
}

impl CalcConfig {
    pub fn new(building_use: BuildingUse) -> Self {
        Self {
            heating_setpoint_c: 20.0,
            cooling_setpoint_c: 24.0,
            air_change: AirChange::Design { rate_per_h: 0.5 },
            building_use,
            utilization_a0: 1.0,
            utilization_tau0_h: 15.0,
            dhw_cold_water_c: 10.0,
            dhw_hot_water_c: 45.0,
        }
    }
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self::new(BuildingUse::FamilyHouse)
    }
}

/// Primary-energy and CO2 emission factors for one carrier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarrierFactors {
    /// Primary-energy conversion factor (kWh primary per kWh delivered).
    pub primary_energy: f64,
    /// CO2 emission factor in kg per kWh delivered.
    pub co2_kg_per_kwh: f64,
}

/// Factor table for one regulatory year. Regulators revise these, so the
/// table is externally supplied and versioned rather than hardcoded into
/// the conversion step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorSet {
    pub year: u16,
    factors: BTreeMap<Carrier, CarrierFactors>,
}

impl FactorSet {
    pub fn new(year: u16) -> Self {
        Self {
            year,
            factors: BTreeMap::new(),
        }
    }

    pub fn with_factor(mut self, carrier: Carrier, factors: CarrierFactors) -> Self {
        self.factors.insert(carrier, factors);
        self
    }

    /// Slovak reference factors for 2024.
    pub fn slovak_2024() -> Self {
        Self::new(2024)
            .with_factor(
                Carrier::Electricity,
                CarrierFactors {
                    primary_energy: 3.0,
                    co2_kg_per_kwh: 0.486,
                },
            )
            .with_factor(
                Carrier::NaturalGas,
                CarrierFactors {
                    primary_energy: 1.1,
                    co2_kg_per_kwh: 0.202,
                },
            )
            .with_factor(
                Carrier::Biomass,
                CarrierFactors {
                    primary_energy: 1.2,
                    co2_kg_per_kwh: 0.354,
                },
            )
            .with_factor(
                Carrier::DistrictHeat,
                CarrierFactors {
                    primary_energy: 1.3,
                    co2_kg_per_kwh: 0.280,
                },
            )
            .with_factor(
                Carrier::HeatPump,
                CarrierFactors {
                    primary_energy: 2.5,
                    co2_kg_per_kwh: 0.390,
                },
            )
    }

    /// Factors for a carrier; `UnknownCarrier` when the table lacks one.
    pub fn lookup(&self, carrier: Carrier) -> Result<CarrierFactors> {
        self.factors
            .get(&carrier)
            .copied()
            .ok_or(EngineError::UnknownCarrier {
                carrier,
                year: self.year,
            })
    }
}

/// Energy class labels, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnergyClass {
    A0,
    A1,
    B,
    C,
    D,
    E,
    F,
    G,
}

/// Ascending, exhaustive classification table: each entry is the inclusive
/// upper bound of specific primary energy (kWh/m²·yr) for its class; the
/// last class (G) is unbounded above.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassThresholds {
    /// Upper bounds for A0..F (G is everything above the last bound).
    bounds: [f64; 7],
}

impl ClassThresholds {
    /// Validates strict ascending order.
    pub fn new(bounds: [f64; 7]) -> Result<Self> {
        for (i, pair) in bounds.windows(2).enumerate() {
            if !(pair[1] > pair[0]) {
                return Err(EngineError::InvalidThresholds {
                    index: i + 1,
                    value: pair[1],
                });
            }
        }
        if !(bounds[0] > 0.0) {
            return Err(EngineError::InvalidThresholds {
                index: 0,
                value: bounds[0],
            });
        }
        Ok(Self { bounds })
    }

    /// Slovak certificate ladder for residential-class buildings.
    pub fn slovak_residential() -> Self {
        Self::new([25.0, 50.0, 75.0, 100.0, 150.0, 200.0, 250.0]).unwrap()
    }

    pub fn bounds(&self) -> &[f64; 7] {
        &self.bounds
    }

    /// Class for a non-negative indicator. Total: every value maps to
    /// exactly one class.
    pub fn classify(&self, indicator: f64) -> EnergyClass {
        const CLASSES: [EnergyClass; 7] = [
            EnergyClass::A0,
            EnergyClass::A1,
            EnergyClass::B,
            EnergyClass::C,
            EnergyClass::D,
            EnergyClass::E,
            EnergyClass::F,
        ];
        for (bound, class) in self.bounds.iter().zip(CLASSES) {
            if indicator <= *bound {
                return class;
            }
        }
        EnergyClass::G
    }
}

/// Retail energy prices per carrier in EUR/kWh, used to turn per-measure
/// energy deltas into annual cost savings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyTariffs {
    prices: BTreeMap<Carrier, f64>,
}

impl EnergyTariffs {
    pub fn new() -> Self {
        Self {
            prices: BTreeMap::new(),
        }
    }

    pub fn with_price(mut self, carrier: Carrier, eur_per_kwh: f64) -> Self {
        self.prices.insert(carrier, eur_per_kwh);
        self
    }

    /// Slovak household reference tariffs.
    pub fn slovak_household() -> Self {
        Self::new()
            .with_price(Carrier::Electricity, 0.25)
            .with_price(Carrier::NaturalGas, 0.11)
            .with_price(Carrier::Biomass, 0.07)
            .with_price(Carrier::DistrictHeat, 0.09)
            .with_price(Carrier::HeatPump, 0.25)
    }

    /// Price for a carrier; `UnknownCarrier` (year 0) when missing.
    pub fn price(&self, carrier: Carrier) -> Result<f64> {
        self.prices
            .get(&carrier)
            .copied()
            .ok_or(EngineError::UnknownCarrier { carrier, year: 0 })
    }
}

impl Default for EnergyTariffs {
    fn default() -> Self {
        Self::slovak_household()
    }
}

/// Default financial parameters for measure evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FinanceDefaults {
    /// Discount rate as a fraction (0.05 = 5 %).
    pub discount_rate: f64,
    /// Annual energy price escalation as a fraction.
    pub price_escalation: f64,
}

impl Default for FinanceDefaults {
    fn default() -> Self {
        Self {
            discount_rate: 0.05,
            price_escalation: 0.02,
        }
    }
}
