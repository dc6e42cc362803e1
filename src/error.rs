use thiserror::Error;

use crate::systems::Carrier;

/// Machine-readable failure kinds raised at the component boundary that
/// detects them. The surrounding application maps these to user-facing
/// messages; the engine only reports the kind and the offending value.
///
/// Financial non-convergence (no IRR bracket) is *not* an error — it is a
/// representable absence on [`crate::finance::FinancialResult`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Non-physical element dimensions (area/U-value/length out of range).
    #[error("invalid geometry on '{element}': {quantity} = {value}")]
    InvalidGeometry {
        element: String,
        quantity: &'static str,
        value: f64,
    },

    /// Zero total loss coefficient — a building with no envelope.
    #[error("degenerate time constant: total loss coefficient is {loss_coefficient} W/K")]
    DegenerateTimeConstant { loss_coefficient: f64 },

    /// System efficiency outside its valid interval.
    #[error("invalid {role} efficiency {value} (expected within ({min}, {max}])")]
    InvalidEfficiency {
        role: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// No primary-energy/CO2 factor configured for this carrier and year.
    #[error("no energy factors for carrier {carrier:?} in year {year}")]
    UnknownCarrier { carrier: Carrier, year: u16 },

    /// Climate registry has no zone under this identifier.
    #[error("unknown climate location '{0}'")]
    UnknownLocation(String),

    /// Negative specific primary energy cannot be classified.
    #[error("invalid classification indicator {0} (must be non-negative)")]
    InvalidIndicator(f64),

    /// Two candidate measures in one optimization run touch the same
    /// envelope element or system; combination effects are undefined.
    #[error("measures '{first}' and '{second}' overlap on {subject}")]
    OverlappingMeasures {
        first: String,
        second: String,
        subject: String,
    },

    /// Classification threshold table is not strictly ascending.
    #[error("class thresholds not strictly ascending at index {index}: {value}")]
    InvalidThresholds { index: usize, value: f64 },
}

pub type Result<T> = std::result::Result<T, EngineError>;
