use serde::{Deserialize, Serialize};

use crate::climate::{ClimateZone, HOURS_IN_MONTH};
use crate::config::CalcConfig;
use crate::envelope::Envelope;
use crate::error::Result;

/// Volumetric heat capacity of air divided into per-hour form:
/// ρ·c_air / 3600 s ≈ 0.33 Wh/(m³·K).
pub const AIR_HEAT_CAPACITY_WH_PER_M3_K: f64 = 0.33;

/// Zero-based indices of the summer months (June–August) used for the
/// cooling-side stability check.
const SUMMER_MONTHS: [usize; 3] = [5, 6, 7];

/// Relative tolerance around γ = 1 below which the degenerate utilization
/// branch is taken instead of the general closed form.
const GAMMA_DEGENERATE_TOL: f64 = 1e-9;

/// Energy balance of a single calendar month. All energies in kWh.
///
/// Loss terms are signed: in a month whose outdoor mean exceeds the
/// setpoint the transmission term goes negative, and the net heating need
/// is clamped at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBalance {
    /// Calendar month, 1-12.
    pub month: u8,
    pub transmission_loss_kwh: f64,
    pub ventilation_loss_kwh: f64,
    pub solar_gain_kwh: f64,
    pub internal_gain_kwh: f64,
    /// Gain-utilization factor η in [0, 1].
    pub utilization_factor: f64,
    /// Net heating need, max(0, losses − η·gains).
    pub net_heating_kwh: f64,
    /// Net cooling need (summer months only, otherwise 0).
    pub net_cooling_kwh: f64,
}

impl MonthBalance {
    pub fn total_losses_kwh(&self) -> f64 {
        self.transmission_loss_kwh + self.ventilation_loss_kwh
    }

    pub fn total_gains_kwh(&self) -> f64 {
        self.solar_gain_kwh + self.internal_gain_kwh
    }
}

/// Result of the monthly quasi-steady-state balance. Produced fresh on
/// every evaluation call; a value object, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBalanceResult {
    pub months: Vec<MonthBalance>,
    /// Annual net heating need in kWh (sum of the 12 non-negative values).
    pub annual_heating_kwh: f64,
    /// Annual net cooling need in kWh (summer stability indicator only).
    pub annual_cooling_kwh: f64,
    /// Annual net heating need per m² heated floor area.
    pub specific_heating_kwh_per_m2: f64,
    /// Transmission loss coefficient H_tr in W/K.
    pub transmission_coefficient_w_per_k: f64,
    /// Ventilation loss coefficient H_ve in W/K.
    pub ventilation_coefficient_w_per_k: f64,
    /// Building time constant τ in hours.
    pub time_constant_h: f64,
}

/// Gain-utilization factor η for the heating balance.
///
/// γ is the heat-balance ratio gains/losses, `a = a0 + τ/τ0`. The γ = 1
/// case is an explicit branch — the general closed form divides by zero
/// there, so it must not be approximated by evaluating near the pole.
pub fn gain_utilization_factor(gamma: f64, a: f64) -> f64 {
    if gamma < 0.0 {
        return 1.0;
    }
    let eta = if (gamma - 1.0).abs() < GAMMA_DEGENERATE_TOL {
        a / (a + 1.0)
    } else {
        (1.0 - gamma.powf(a)) / (1.0 - gamma.powf(a + 1.0))
    };
    eta.clamp(0.0, 1.0)
}

/// Loss-utilization factor for the cooling balance (the heating formula
/// mirrored through γ → 1/γ).
pub fn loss_utilization_factor(gamma: f64, a: f64) -> f64 {
    if gamma <= 0.0 {
        return 1.0;
    }
    let eta = if (gamma - 1.0).abs() < GAMMA_DEGENERATE_TOL {
        a / (a + 1.0)
    } else {
        let inv = 1.0 / gamma;
        (1.0 - inv.powf(a)) / (1.0 - inv.powf(a + 1.0))
    };
    eta.clamp(0.0, 1.0)
}

/// Computes the 12-month quasi-steady-state heat balance.
///
/// Per month: transmission and ventilation losses against the setpoint,
/// solar gains over transparent elements, internal gains by building use,
/// utilization factor from the heat-balance ratio and time constant, and
/// the clamped net heating need. Summer months additionally get the
/// mirrored cooling balance against the cooling setpoint.
pub fn compute_monthly_balance(
    envelope: &Envelope,
    config: &CalcConfig,
    zone: &ClimateZone,
) -> Result<MonthlyBalanceResult> {
    let h_tr = envelope.transmission_coefficient();
    let h_ve =
        AIR_HEAT_CAPACITY_WH_PER_M3_K * config.air_change.rate_per_h() * envelope.heated_volume();
    let tau_h = envelope.time_constant_h(h_ve)?;
    let a = config.utilization_a0 + tau_h / config.utilization_tau0_h;

    let gain_rate = config.building_use.internal_gain_rate_w_per_m2();
    let h_total = h_tr + h_ve;

    let mut months = Vec::with_capacity(12);
    let mut annual_heating = 0.0;
    let mut annual_cooling = 0.0;

    for m in 0..12 {
        let hours = HOURS_IN_MONTH[m];
        let delta_t = config.heating_setpoint_c - zone.mean_outdoor_temp_c[m];

        let transmission_kwh = h_tr * delta_t * hours / 1000.0;
        let ventilation_kwh = h_ve * delta_t * hours / 1000.0;

        let solar_kwh: f64 = envelope
            .elements()
            .iter()
            .filter(|e| e.is_transparent())
            .map(|e| {
                let g = e.solar_factor.unwrap_or(0.0);
                let shading = e.shading_factor.unwrap_or(1.0);
                zone.irradiation(e.orientation, m) * e.area_m2 * g * shading
            })
            .sum();
        let internal_kwh = gain_rate * envelope.heated_floor_area_m2 * hours / 1000.0;

        let losses = transmission_kwh + ventilation_kwh;
        let gains = solar_kwh + internal_kwh;

        // When losses vanish or go negative there is nothing for gains to
        // offset: no heating need, and the utilization factor is reported
        // as zero rather than evaluated at an undefined γ.
        let (eta, net_heating) = if losses <= 0.0 {
            (0.0, 0.0)
        } else {
            let gamma = gains / losses;
            let eta = gain_utilization_factor(gamma, a);
            (eta, (losses - eta * gains).max(0.0))
        };

        let net_cooling = if SUMMER_MONTHS.contains(&m) {
            let delta_c = config.cooling_setpoint_c - zone.mean_outdoor_temp_c[m];
            let losses_c = h_total * delta_c * hours / 1000.0;
            if losses_c <= 0.0 {
                // Outdoor mean above the cooling setpoint: losses turn
                // into additional load.
                gains - losses_c
            } else {
                let gamma_c = gains / losses_c;
                let eta_ls = loss_utilization_factor(gamma_c, a);
                (gains - eta_ls * losses_c).max(0.0)
            }
        } else {
            0.0
        };

        annual_heating += net_heating;
        annual_cooling += net_cooling;

        months.push(MonthBalance {
            month: (m + 1) as u8,
            transmission_loss_kwh: transmission_kwh,
            ventilation_loss_kwh: ventilation_kwh,
            solar_gain_kwh: solar_kwh,
            internal_gain_kwh: internal_kwh,
            utilization_factor: eta,
            net_heating_kwh: net_heating,
            net_cooling_kwh: net_cooling,
        });
    }

    Ok(MonthlyBalanceResult {
        months,
        annual_heating_kwh: annual_heating,
        annual_cooling_kwh: annual_cooling,
        specific_heating_kwh_per_m2: annual_heating / envelope.heated_floor_area_m2,
        transmission_coefficient_w_per_k: h_tr,
        ventilation_coefficient_w_per_k: h_ve,
        time_constant_h: tau_h,
    })
}
