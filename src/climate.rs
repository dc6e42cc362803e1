use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Hours in each calendar month (non-leap year).
pub const HOURS_IN_MONTH: [f64; 12] = [
    744.0, 672.0, 744.0, 720.0, 744.0, 720.0, 744.0, 744.0, 720.0, 744.0, 720.0, 744.0,
];

/// Days in each calendar month (non-leap year).
pub const DAYS_IN_MONTH: [f64; 12] = [
    31.0, 28.0, 31.0, 30.0, 31.0, 30.0, 31.0, 31.0, 30.0, 31.0, 30.0, 31.0,
];

/// Surface orientation for solar irradiation lookup.
///
/// Roofs and skylights use `Horizontal`; facade elements use the four
/// cardinal directions (intermediate azimuths are assigned to the nearest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    North,
    South,
    East,
    West,
}

/// Monthly climate parameters for one location. Immutable reference data,
/// created at load time and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateZone {
    /// Location identifier (registry key).
    pub location_id: String,
    /// Monthly mean outdoor temperature in °C.
    pub mean_outdoor_temp_c: [f64; 12],
    /// Monthly heating degree days (base 20 °C), derived at construction.
    pub degree_days: [f64; 12],
    /// Monthly solar irradiation on a horizontal plane in kWh/m².
    pub irradiation_horizontal: [f64; 12],
    /// Monthly solar irradiation on vertical planes in kWh/m², N/S/E/W.
    pub irradiation_north: [f64; 12],
    pub irradiation_south: [f64; 12],
    pub irradiation_east: [f64; 12],
    pub irradiation_west: [f64; 12],
}

/// Outdoor mean below which a month counts toward the heating season.
const HEATING_SEASON_THRESHOLD_C: f64 = 13.0;

impl ClimateZone {
    /// Creates a zone, deriving monthly degree days (base 20 °C) from the
    /// monthly mean temperatures. Months with a mean at or above 13 °C fall
    /// outside the heating season and contribute zero degree days.
    pub fn new(
        location_id: &str,
        mean_outdoor_temp_c: [f64; 12],
        irradiation_horizontal: [f64; 12],
        irradiation_north: [f64; 12],
        irradiation_south: [f64; 12],
        irradiation_east: [f64; 12],
        irradiation_west: [f64; 12],
    ) -> Self {
        let mut degree_days = [0.0; 12];
        for m in 0..12 {
            let t = mean_outdoor_temp_c[m];
            if t < HEATING_SEASON_THRESHOLD_C {
                degree_days[m] = (20.0 - t).max(0.0) * DAYS_IN_MONTH[m];
            }
        }
        Self {
            location_id: location_id.to_string(),
            mean_outdoor_temp_c,
            degree_days,
            irradiation_horizontal,
            irradiation_north,
            irradiation_south,
            irradiation_east,
            irradiation_west,
        }
    }

    /// Monthly irradiation in kWh/m² for a given orientation.
    /// `month` is a zero-based index (0 = January).
    pub fn irradiation(&self, orientation: Orientation, month: usize) -> f64 {
        match orientation {
            Orientation::Horizontal => self.irradiation_horizontal[month],
            Orientation::North => self.irradiation_north[month],
            Orientation::South => self.irradiation_south[month],
            Orientation::East => self.irradiation_east[month],
            Orientation::West => self.irradiation_west[month],
        }
    }

    /// Annual heating degree days.
    pub fn annual_degree_days(&self) -> f64 {
        self.degree_days.iter().sum()
    }
}

/// Lookup table of climate zones. Pre-loaded, in-memory, read-only for the
/// engine's lifetime; lookups never touch I/O.
#[derive(Debug, Clone)]
pub struct ClimateRegistry {
    zones: HashMap<String, ClimateZone>,
    default_id: String,
}

impl ClimateRegistry {
    /// Registry with the built-in Slovak reference zones. The default zone
    /// (used only via [`Self::lookup_or_default`]) is the lowland zone.
    pub fn slovak_reference() -> Self {
        let mut zones = HashMap::new();
        for zone in [lowland_zone(), upland_zone(), mountain_zone()] {
            zones.insert(zone.location_id.clone(), zone);
        }
        Self {
            zones,
            default_id: "SK-lowland".to_string(),
        }
    }

    /// Empty registry for caller-supplied zones.
    pub fn with_default(default: ClimateZone) -> Self {
        let default_id = default.location_id.clone();
        let mut zones = HashMap::new();
        zones.insert(default_id.clone(), default);
        Self { zones, default_id }
    }

    pub fn insert(&mut self, zone: ClimateZone) {
        self.zones.insert(zone.location_id.clone(), zone);
    }

    /// Looks up a zone by location id. Fails with `UnknownLocation` if the
    /// id is absent — there is no silent substitution.
    pub fn lookup(&self, location_id: &str) -> Result<&ClimateZone> {
        self.zones
            .get(location_id)
            .ok_or_else(|| EngineError::UnknownLocation(location_id.to_string()))
    }

    /// Like [`Self::lookup`], but falls back to the designated default zone.
    /// The fallback only happens through this explicit opt-in call.
    pub fn lookup_or_default(&self, location_id: &str) -> &ClimateZone {
        self.zones
            .get(location_id)
            .unwrap_or_else(|| &self.zones[&self.default_id])
    }
}

/// Bratislava-class lowland climate (warmest Slovak zone).
fn lowland_zone() -> ClimateZone {
    ClimateZone::new(
        "SK-lowland",
        [
            -1.0, 0.9, 5.0, 10.3, 15.1, 18.3, 20.3, 19.8, 15.2, 10.1, 4.6, 0.3,
        ],
        [
            28.0, 48.0, 92.0, 130.0, 165.0, 170.0, 178.0, 155.0, 103.0, 62.0, 30.0, 21.0,
        ],
        [
            12.0, 20.0, 35.0, 48.0, 62.0, 67.0, 65.0, 53.0, 35.0, 22.0, 12.0, 9.0,
        ],
        [
            55.0, 70.0, 95.0, 95.0, 95.0, 90.0, 95.0, 100.0, 95.0, 85.0, 55.0, 45.0,
        ],
        [
            20.0, 33.0, 60.0, 80.0, 98.0, 100.0, 104.0, 92.0, 64.0, 42.0, 22.0, 15.0,
        ],
        [
            20.0, 33.0, 60.0, 80.0, 98.0, 100.0, 104.0, 92.0, 64.0, 42.0, 22.0, 15.0,
        ],
    )
}

/// Mild upland climate (300–600 m a.s.l.), roughly 2 K colder.
fn upland_zone() -> ClimateZone {
    let base = lowland_zone();
    let mut temps = base.mean_outdoor_temp_c;
    for t in temps.iter_mut() {
        *t -= 2.0;
    }
    ClimateZone::new(
        "SK-upland",
        temps,
        scale(base.irradiation_horizontal, 0.95),
        scale(base.irradiation_north, 0.95),
        scale(base.irradiation_south, 0.95),
        scale(base.irradiation_east, 0.95),
        scale(base.irradiation_west, 0.95),
    )
}

/// Mountain climate (above 600 m a.s.l.), roughly 4.5 K colder.
fn mountain_zone() -> ClimateZone {
    let base = lowland_zone();
    let mut temps = base.mean_outdoor_temp_c;
    for t in temps.iter_mut() {
        *t -= 4.5;
    }
    ClimateZone::new(
        "SK-mountain",
        temps,
        scale(base.irradiation_horizontal, 0.90),
        scale(base.irradiation_north, 0.90),
        scale(base.irradiation_south, 0.90),
        scale(base.irradiation_east, 0.90),
        scale(base.irradiation_west, 0.90),
    )
}

fn scale(mut values: [f64; 12], factor: f64) -> [f64; 12] {
    for v in values.iter_mut() {
        *v *= factor;
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_sum_to_year() {
        let total: f64 = HOURS_IN_MONTH.iter().sum();
        assert!((total - 8760.0).abs() < 1e-10);
    }

    #[test]
    fn test_degree_days_derivation() {
        let zone = lowland_zone();
        // January: (20 - (-1)) * 31 = 651 degree days.
        assert!(
            (zone.degree_days[0] - 651.0).abs() < 1e-10,
            "Expected 651 Kd in January, got {}",
            zone.degree_days[0]
        );
        // July mean 20.3 °C is outside the heating season.
        assert!((zone.degree_days[6] - 0.0).abs() < 1e-10);
        // Bratislava-class annual total in a plausible range.
        let annual = zone.annual_degree_days();
        assert!(
            (2800.0..4200.0).contains(&annual),
            "Annual degree days out of range: {annual}"
        );
    }

    #[test]
    fn test_lookup_unknown_location_fails() {
        let registry = ClimateRegistry::slovak_reference();
        let err = registry.lookup("Atlantis").unwrap_err();
        assert_eq!(err, EngineError::UnknownLocation("Atlantis".to_string()));
    }

    #[test]
    fn test_lookup_or_default_is_explicit_opt_in() {
        let registry = ClimateRegistry::slovak_reference();
        let zone = registry.lookup_or_default("Atlantis");
        assert_eq!(zone.location_id, "SK-lowland");
    }

    #[test]
    fn test_irradiation_by_orientation() {
        let zone = lowland_zone();
        // South facade collects more than north in January.
        assert!(zone.irradiation(Orientation::South, 0) > zone.irradiation(Orientation::North, 0));
        // Horizontal peaks in summer.
        assert!(
            zone.irradiation(Orientation::Horizontal, 6)
                > zone.irradiation(Orientation::Horizontal, 0)
        );
    }

    #[test]
    fn test_colder_zones_have_more_degree_days() {
        let lowland = lowland_zone().annual_degree_days();
        let upland = upland_zone().annual_degree_days();
        let mountain = mountain_zone().annual_degree_days();
        assert!(lowland < upland && upland < mountain);
    }
}
