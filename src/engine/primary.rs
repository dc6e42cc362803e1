use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::FactorSet;
use crate::engine::delivered::DeliveredEnergy;
use crate::error::Result;
use crate::systems::Carrier;

/// Primary energy and CO2 emissions derived from delivered energy via the
/// year-versioned carrier factor table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryEnergyResult {
    /// Factor table year the conversion used.
    pub factor_year: u16,
    /// Annual primary energy per carrier in kWh.
    pub primary_by_carrier: BTreeMap<Carrier, f64>,
    /// Annual CO2 emissions per carrier in kg.
    pub co2_by_carrier: BTreeMap<Carrier, f64>,
    pub total_primary_kwh: f64,
    pub total_co2_kg: f64,
    /// Specific primary energy in kWh/(m²·yr) — the classification input.
    pub specific_primary_kwh_per_m2: f64,
    /// Specific CO2 in kg/(m²·yr).
    pub specific_co2_kg_per_m2: f64,
}

/// Applies per-carrier primary-energy and emission factors. Only carriers
/// with nonzero delivered energy are converted; a missing factor for such
/// a carrier fails with `UnknownCarrier`.
pub fn convert_primary(
    delivered: &DeliveredEnergy,
    factors: &FactorSet,
    heated_floor_area_m2: f64,
) -> Result<PrimaryEnergyResult> {
    let mut primary_by_carrier = BTreeMap::new();
    let mut co2_by_carrier = BTreeMap::new();
    let mut total_primary = 0.0;
    let mut total_co2 = 0.0;

    for (&carrier, &kwh) in &delivered.by_carrier {
        if kwh == 0.0 {
            continue;
        }
        let f = factors.lookup(carrier)?;
        let primary = kwh * f.primary_energy;
        let co2 = kwh * f.co2_kg_per_kwh;
        primary_by_carrier.insert(carrier, primary);
        co2_by_carrier.insert(carrier, co2);
        total_primary += primary;
        total_co2 += co2;
    }

    Ok(PrimaryEnergyResult {
        factor_year: factors.year,
        primary_by_carrier,
        co2_by_carrier,
        total_primary_kwh: total_primary,
        total_co2_kg: total_co2,
        specific_primary_kwh_per_m2: total_primary / heated_floor_area_m2,
        specific_co2_kg_per_m2: total_co2 / heated_floor_area_m2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn delivered(pairs: &[(Carrier, f64)]) -> DeliveredEnergy {
        DeliveredEnergy {
            by_carrier: pairs.iter().copied().collect(),
            heating_delivered_kwh: pairs.iter().map(|(_, v)| v).sum(),
            dhw_need_kwh: 0.0,
            dhw_delivered_kwh: 0.0,
        }
    }

    #[test]
    fn test_conversion_applies_factors() {
        let d = delivered(&[(Carrier::NaturalGas, 10_000.0)]);
        let result = convert_primary(&d, &FactorSet::slovak_2024(), 100.0).unwrap();
        // Gas: f_pe = 1.1, f_co2 = 0.202
        assert!((result.total_primary_kwh - 11_000.0).abs() < 1e-9);
        assert!((result.total_co2_kg - 2_020.0).abs() < 1e-9);
        assert!((result.specific_primary_kwh_per_m2 - 110.0).abs() < 1e-9);
        assert!((result.specific_co2_kg_per_m2 - 20.2).abs() < 1e-9);
    }

    #[test]
    fn test_missing_factor_for_used_carrier_fails() {
        let d = delivered(&[(Carrier::Biomass, 5_000.0)]);
        let factors = FactorSet::new(2030); // empty table
        let err = convert_primary(&d, &factors, 100.0).unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownCarrier {
                carrier: Carrier::Biomass,
                year: 2030
            }
        );
    }

    #[test]
    fn test_zero_delivered_carrier_needs_no_factor() {
        let d = delivered(&[(Carrier::Biomass, 0.0), (Carrier::NaturalGas, 1_000.0)]);
        // Table knows gas only; biomass at zero must not trip the lookup.
        let factors = FactorSet::new(2024).with_factor(
            Carrier::NaturalGas,
            crate::config::CarrierFactors {
                primary_energy: 1.1,
                co2_kg_per_kwh: 0.202,
            },
        );
        let result = convert_primary(&d, &factors, 100.0).unwrap();
        assert!((result.total_primary_kwh - 1_100.0).abs() < 1e-9);
    }

    #[test]
    fn test_per_carrier_totals_sum() {
        let d = delivered(&[
            (Carrier::NaturalGas, 8_000.0),
            (Carrier::Electricity, 2_000.0),
        ]);
        let result = convert_primary(&d, &FactorSet::slovak_2024(), 120.0).unwrap();
        let sum: f64 = result.primary_by_carrier.values().sum();
        assert!((sum - result.total_primary_kwh).abs() < 1e-9);
        // Gas 8000*1.1 + electricity 2000*3.0 = 8800 + 6000
        assert!((result.total_primary_kwh - 14_800.0).abs() < 1e-9);
    }
}
