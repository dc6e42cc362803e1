use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::CalcConfig;
use crate::engine::balance::MonthlyBalanceResult;
use crate::error::Result;
use crate::systems::{Carrier, DhwSystem, HeatingSystem};

/// Specific heat capacity of water in J/(kg·K); 1 l weighs 1 kg.
const WATER_HEAT_CAPACITY_J_PER_KG_K: f64 = 4186.0;

/// Delivered (final) energy per carrier. Carriers are kept separate all
/// the way to the primary-energy conversion — no cross-carrier sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveredEnergy {
    /// Annual delivered energy per carrier in kWh.
    pub by_carrier: BTreeMap<Carrier, f64>,
    /// Delivered energy for space heating in kWh.
    pub heating_delivered_kwh: f64,
    /// Net DHW heat need in kWh (before system losses).
    pub dhw_need_kwh: f64,
    /// Delivered energy for DHW in kWh.
    pub dhw_delivered_kwh: f64,
}

/// Converts net heating need into delivered energy through the heating
/// system's source, distribution and control efficiencies, and adds the
/// separately computed DHW delivered energy on its own carrier.
pub fn delivered_energy(
    balance: &MonthlyBalanceResult,
    heating: &HeatingSystem,
    dhw: &DhwSystem,
    config: &CalcConfig,
) -> Result<DeliveredEnergy> {
    heating.validate()?;
    dhw.validate()?;

    let heating_delivered = balance.annual_heating_kwh / heating.overall_efficiency();

    let delta_t = config.dhw_hot_water_c - config.dhw_cold_water_c;
    let draw_off = config.building_use.dhw_draw_off_factor();
    let annual_liters = dhw.daily_need_l_per_person * dhw.occupants * draw_off * 365.0;
    let dhw_need = annual_liters * WATER_HEAT_CAPACITY_J_PER_KG_K * delta_t / 3.6e6;
    let dhw_delivered = dhw_need / dhw.system_efficiency;

    let mut by_carrier = BTreeMap::new();
    *by_carrier.entry(heating.carrier).or_insert(0.0) += heating_delivered;
    *by_carrier.entry(dhw.carrier).or_insert(0.0) += dhw_delivered;

    Ok(DeliveredEnergy {
        by_carrier,
        heating_delivered_kwh: heating_delivered,
        dhw_need_kwh: dhw_need,
        dhw_delivered_kwh: dhw_delivered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildingUse;
    use crate::error::EngineError;

    fn balance_with_heating_need(kwh: f64) -> MonthlyBalanceResult {
        MonthlyBalanceResult {
            months: Vec::new(),
            annual_heating_kwh: kwh,
            annual_cooling_kwh: 0.0,
            specific_heating_kwh_per_m2: kwh / 100.0,
            transmission_coefficient_w_per_k: 100.0,
            ventilation_coefficient_w_per_k: 40.0,
            time_constant_h: 30.0,
        }
    }

    #[test]
    fn test_heating_delivered_energy() {
        let balance = balance_with_heating_need(10_000.0);
        let heating = HeatingSystem::new(Carrier::NaturalGas, 0.90, 1.0, 1.0).unwrap();
        let dhw = DhwSystem::electric_boiler();
        let config = CalcConfig::new(BuildingUse::FamilyHouse);

        let result = delivered_energy(&balance, &heating, &dhw, &config).unwrap();
        assert!(
            (result.heating_delivered_kwh - 10_000.0 / 0.90).abs() < 1e-9,
            "Delivered = need / η, got {}",
            result.heating_delivered_kwh
        );
    }

    #[test]
    fn test_dhw_need() {
        // 4 persons * 40 l * 365 d * 4186 J/kgK * 35 K / 3.6e6 = 2376.8 kWh
        let balance = balance_with_heating_need(0.0);
        let heating = HeatingSystem::gas_boiler();
        let dhw = DhwSystem::electric_boiler();
        let config = CalcConfig::new(BuildingUse::FamilyHouse);

        let result = delivered_energy(&balance, &heating, &dhw, &config).unwrap();
        let expected = 4.0 * 40.0 * 365.0 * 4186.0 * 35.0 / 3.6e6;
        assert!(
            (result.dhw_need_kwh - expected).abs() < 0.01,
            "Expected {expected:.1} kWh DHW need, got {}",
            result.dhw_need_kwh
        );
        assert!(
            (result.dhw_delivered_kwh - expected / 0.85).abs() < 0.01,
            "DHW delivered must include the 0.85 system efficiency"
        );
    }

    #[test]
    fn test_carriers_kept_separate() {
        let balance = balance_with_heating_need(10_000.0);
        let heating = HeatingSystem::gas_boiler();
        let dhw = DhwSystem::electric_boiler();
        let config = CalcConfig::new(BuildingUse::FamilyHouse);

        let result = delivered_energy(&balance, &heating, &dhw, &config).unwrap();
        assert_eq!(result.by_carrier.len(), 2);
        assert!(
            (result.by_carrier[&Carrier::NaturalGas] - result.heating_delivered_kwh).abs() < 1e-9
        );
        assert!((result.by_carrier[&Carrier::Electricity] - result.dhw_delivered_kwh).abs() < 1e-9);
    }

    #[test]
    fn test_same_carrier_sums() {
        let balance = balance_with_heating_need(10_000.0);
        let heating = HeatingSystem::new(Carrier::Electricity, 0.98, 1.0, 0.99).unwrap();
        let dhw = DhwSystem::electric_boiler();
        let config = CalcConfig::new(BuildingUse::FamilyHouse);

        let result = delivered_energy(&balance, &heating, &dhw, &config).unwrap();
        assert_eq!(result.by_carrier.len(), 1);
        let total = result.heating_delivered_kwh + result.dhw_delivered_kwh;
        assert!((result.by_carrier[&Carrier::Electricity] - total).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_efficiency_rejected_at_use() {
        let balance = balance_with_heating_need(10_000.0);
        let mut heating = HeatingSystem::gas_boiler();
        heating.distribution_efficiency = 1.5; // tampered after construction
        let dhw = DhwSystem::electric_boiler();
        let config = CalcConfig::new(BuildingUse::FamilyHouse);

        let err = delivered_energy(&balance, &heating, &dhw, &config).unwrap_err();
        assert!(matches!(err, EngineError::InvalidEfficiency { .. }));
    }

    #[test]
    fn test_office_draw_off_reduces_dhw() {
        let balance = balance_with_heating_need(0.0);
        let heating = HeatingSystem::gas_boiler();
        let dhw = DhwSystem::electric_boiler();

        let home = delivered_energy(
            &balance,
            &heating,
            &dhw,
            &CalcConfig::new(BuildingUse::FamilyHouse),
        )
        .unwrap();
        let office = delivered_energy(
            &balance,
            &heating,
            &dhw,
            &CalcConfig::new(BuildingUse::Office),
        )
        .unwrap();
        assert!(office.dhw_need_kwh < home.dhw_need_kwh * 0.5);
    }
}
