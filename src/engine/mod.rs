//! Calculation pipeline: monthly balance → delivered energy → primary
//! energy/CO2 → energy class. Every stage is a pure function over immutable
//! inputs; per-measure re-runs clone their inputs and share nothing.

pub mod balance;
pub mod classify;
pub mod delivered;
pub mod pipeline;
pub mod primary;

pub use balance::{compute_monthly_balance, MonthBalance, MonthlyBalanceResult};
pub use classify::{classify, EnergyClassResult};
pub use delivered::{delivered_energy, DeliveredEnergy};
pub use pipeline::{evaluate, AuditEvaluation};
pub use primary::{convert_primary, PrimaryEnergyResult};
