pub mod climate;
pub mod config;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod finance;
pub mod measures;
pub mod optimizer;
pub mod project;
pub mod systems;
pub mod uid;

// Prelude
pub use climate::{ClimateRegistry, ClimateZone, Orientation};
pub use config::{
    AirChange, BuildingUse, CalcConfig, ClassThresholds, EnergyClass, EnergyTariffs, FactorSet,
    FinanceDefaults,
};
pub use engine::{evaluate, AuditEvaluation, MonthlyBalanceResult};
pub use envelope::{ConstructionElement, ElementKind, Envelope, ThermalBridge};
pub use error::{EngineError, Result};
pub use finance::{CashFlowSpec, FinancialResult};
pub use measures::{Measure, MeasureAction};
pub use optimizer::{prioritize, MeasureScore, PriorityMatrix};
pub use project::AuditProject;
pub use systems::{Carrier, DhwSystem, HeatingSystem};
pub use uid::UID;
