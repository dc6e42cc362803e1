use serde::{Deserialize, Serialize};

use crate::climate::Orientation;
use crate::error::{EngineError, Result};

/// Sanity ceiling for element U-values in W/(m²·K). Single glazing sits
/// around 5.7; anything above 10 is a data-entry mistake.
pub const U_VALUE_CEILING: f64 = 10.0;

/// Default effective heat capacity per unit floor area in J/(m²·K)
/// (medium-weight construction, ISO 13790 class).
pub const DEFAULT_EFFECTIVE_CAPACITY_J_PER_M2_K: f64 = 165_000.0;

/// Inside surface resistance R_si in m²·K/W (horizontal heat flow).
pub const R_SI: f64 = 0.13;
/// Outside surface resistance R_se in m²·K/W.
pub const R_SE: f64 = 0.04;

/// Construction element kind. Windows (and glazed doors, via an explicit
/// solar factor) participate in solar gains; opaque kinds do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Wall,
    Roof,
    Floor,
    Window,
    Door,
}

/// One envelope construction element (wall, roof, floor, window, door).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructionElement {
    pub name: String,
    pub kind: ElementKind,
    /// Area in m², > 0.
    pub area_m2: f64,
    /// Thermal transmittance in W/(m²·K), within (0, U_VALUE_CEILING].
    pub u_value: f64,
    /// Orientation, used for solar irradiation lookup on transparent elements.
    pub orientation: Orientation,
    /// Total solar energy transmittance g (glazing only).
    pub solar_factor: Option<f64>,
    /// Shading reduction factor in [0, 1] (glazing only); 1 = unshaded.
    pub shading_factor: Option<f64>,
}

impl ConstructionElement {
    /// Creates an opaque element.
    pub fn opaque(
        name: &str,
        kind: ElementKind,
        area_m2: f64,
        u_value: f64,
        orientation: Orientation,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            area_m2,
            u_value,
            orientation,
            solar_factor: None,
            shading_factor: None,
        }
    }

    /// Creates a window with glazing solar properties.
    pub fn window(
        name: &str,
        area_m2: f64,
        u_value: f64,
        orientation: Orientation,
        solar_factor: f64,
        shading_factor: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind: ElementKind::Window,
            area_m2,
            u_value,
            orientation,
            solar_factor: Some(solar_factor),
            shading_factor: Some(shading_factor),
        }
    }

    /// True if the element collects solar gains (has a solar factor).
    pub fn is_transparent(&self) -> bool {
        self.solar_factor.is_some()
    }

    fn validate(&self) -> Result<()> {
        if !(self.area_m2 > 0.0 && self.area_m2.is_finite()) {
            return Err(EngineError::InvalidGeometry {
                element: self.name.clone(),
                quantity: "area_m2",
                value: self.area_m2,
            });
        }
        if !(self.u_value > 0.0 && self.u_value <= U_VALUE_CEILING) {
            return Err(EngineError::InvalidGeometry {
                element: self.name.clone(),
                quantity: "u_value",
                value: self.u_value,
            });
        }
        for (quantity, value) in [
            ("solar_factor", self.solar_factor),
            ("shading_factor", self.shading_factor),
        ] {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(EngineError::InvalidGeometry {
                        element: self.name.clone(),
                        quantity,
                        value: v,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Linear thermal bridge: junction length times linear transmittance ψ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermalBridge {
    pub name: String,
    /// Length in m, > 0.
    pub length_m: f64,
    /// Linear transmittance ψ in W/(m·K), ≥ 0.
    pub psi: f64,
}

impl ThermalBridge {
    pub fn new(name: &str, length_m: f64, psi: f64) -> Self {
        Self {
            name: name.to_string(),
            length_m,
            psi,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.length_m > 0.0 && self.length_m.is_finite()) {
            return Err(EngineError::InvalidGeometry {
                element: self.name.clone(),
                quantity: "length_m",
                value: self.length_m,
            });
        }
        if !(self.psi >= 0.0 && self.psi.is_finite()) {
            return Err(EngineError::InvalidGeometry {
                element: self.name.clone(),
                quantity: "psi",
                value: self.psi,
            });
        }
        Ok(())
    }
}

/// Thermal envelope of a building: construction elements, thermal bridges,
/// heated floor area and volume. Owns its elements exclusively; per-measure
/// variants are produced by cloning, never by mutating a shared baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    elements: Vec<ConstructionElement>,
    bridges: Vec<ThermalBridge>,
    /// Heated floor area in m².
    pub heated_floor_area_m2: f64,
    /// Heated volume in m³.
    pub heated_volume_m3: f64,
    /// Effective heat capacity per unit floor area in J/(m²·K).
    pub effective_capacity_j_per_m2_k: f64,
}

impl Envelope {
    pub fn new(heated_floor_area_m2: f64, heated_volume_m3: f64) -> Result<Self> {
        if !(heated_floor_area_m2 > 0.0 && heated_floor_area_m2.is_finite()) {
            return Err(EngineError::InvalidGeometry {
                element: "envelope".to_string(),
                quantity: "heated_floor_area_m2",
                value: heated_floor_area_m2,
            });
        }
        if !(heated_volume_m3 > 0.0 && heated_volume_m3.is_finite()) {
            return Err(EngineError::InvalidGeometry {
                element: "envelope".to_string(),
                quantity: "heated_volume_m3",
                value: heated_volume_m3,
            });
        }
        Ok(Self {
            elements: Vec::new(),
            bridges: Vec::new(),
            heated_floor_area_m2,
            heated_volume_m3,
            effective_capacity_j_per_m2_k: DEFAULT_EFFECTIVE_CAPACITY_J_PER_M2_K,
        })
    }

    /// Adds a construction element, validating physical ranges.
    pub fn add_element(&mut self, element: ConstructionElement) -> Result<()> {
        element.validate()?;
        self.elements.push(element);
        Ok(())
    }

    /// Adds a linear thermal bridge, validating physical ranges.
    pub fn add_thermal_bridge(&mut self, bridge: ThermalBridge) -> Result<()> {
        bridge.validate()?;
        self.bridges.push(bridge);
        Ok(())
    }

    pub fn elements(&self) -> &[ConstructionElement] {
        &self.elements
    }

    pub fn bridges(&self) -> &[ThermalBridge] {
        &self.bridges
    }

    /// Mutable access for measure application on a cloned envelope.
    pub(crate) fn elements_mut(&mut self) -> &mut [ConstructionElement] {
        &mut self.elements
    }

    /// Transmission heat loss coefficient H_tr = Σ U·A + Σ ψ·L in W/K.
    pub fn transmission_coefficient(&self) -> f64 {
        let elements: f64 = self.elements.iter().map(|e| e.u_value * e.area_m2).sum();
        let bridges: f64 = self.bridges.iter().map(|b| b.psi * b.length_m).sum();
        elements + bridges
    }

    /// Total envelope area in m² (opaque + transparent).
    pub fn total_envelope_area_m2(&self) -> f64 {
        self.elements.iter().map(|e| e.area_m2).sum()
    }

    pub fn heated_volume(&self) -> f64 {
        self.heated_volume_m3
    }

    /// Building time constant τ in hours:
    /// τ = C_eff · A_floor / (3600 · (H_tr + H_ve)).
    ///
    /// Fails with `DegenerateTimeConstant` when the total loss coefficient
    /// is zero — a building with no envelope and no air exchange.
    pub fn time_constant_h(&self, ventilation_coefficient_w_per_k: f64) -> Result<f64> {
        let total = self.transmission_coefficient() + ventilation_coefficient_w_per_k;
        if total <= 0.0 {
            return Err(EngineError::DegenerateTimeConstant {
                loss_coefficient: total,
            });
        }
        let capacity_j_per_k = self.effective_capacity_j_per_m2_k * self.heated_floor_area_m2;
        Ok(capacity_j_per_k / (3600.0 * total))
    }

    /// Flags physically implausible inputs without rejecting them.
    ///
    /// A total envelope area below half or above ten times the heated floor
    /// area does not make the calculation invalid, but almost always means a
    /// form entry error; the audit UI surfaces these.
    pub fn plausibility_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let ratio = self.total_envelope_area_m2() / self.heated_floor_area_m2;
        if ratio < 0.5 {
            warnings.push(format!(
                "envelope area is only {:.2}x the heated floor area; missing elements?",
                ratio
            ));
        } else if ratio > 10.0 {
            warnings.push(format!(
                "envelope area is {:.2}x the heated floor area; duplicated elements?",
                ratio
            ));
        }
        let mean_height = self.heated_volume_m3 / self.heated_floor_area_m2;
        if !(1.8..=8.0).contains(&mean_height) {
            warnings.push(format!(
                "mean storey height {:.2} m is outside the plausible 1.8-8.0 m range",
                mean_height
            ));
        }
        warnings
    }
}

/// Thermal conductivities of common construction materials in W/(m·K).
pub mod conductivity {
    pub const CONCRETE: f64 = 1.4;
    pub const BRICK: f64 = 0.6;
    pub const WOOD: f64 = 0.12;
    pub const EPS: f64 = 0.035;
    pub const MINERAL_WOOL: f64 = 0.040;
    pub const PUR: f64 = 0.025;
}

/// Derives a construction U-value from material layers (thickness m,
/// conductivity W/(m·K)) with standard surface resistances:
/// U = 1 / (R_si + Σ d/λ + R_se).
pub fn u_value_of_layers(layers: &[(f64, f64)]) -> f64 {
    let r_layers: f64 = layers.iter().map(|(d, lambda)| d / lambda).sum();
    1.0 / (R_SI + r_layers + R_SE)
}
