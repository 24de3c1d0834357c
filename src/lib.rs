//! Emergency-department decision-support engine.
//!
//! Couples a discrete-event patient-flow simulator with a per-class
//! ILP staff rostering optimizer over a multi-week planning horizon.
//! The scheduler emits the roster that parameterizes each simulation
//! cycle; the simulator's observed rejection rate and waiting time
//! adjust the next cycle's staffing demands.
//!
//! # Modules
//!
//! - **`models`**: domain types — `Patient`, `TriageLevel`, `Role`,
//!   `StaffMember`, `ShiftDefinition`, `Demand`
//! - **`simulation`**: the event-driven ED model — arrival generation,
//!   priority waiting queue, room and staff pools, hourly metrics
//! - **`scheduling`**: optimization input assembly, the four class
//!   roster ILPs, and the demand feedback controller
//! - **`staffing`**: Oregon staffing-rule demand formulas
//! - **`expr`**: the arrival-rate expression evaluator
//! - **`config`**: JSON configuration loading and validation
//!
//! # Example
//!
//! ```no_run
//! use erflow::config::Config;
//! use erflow::simulation::{EngineOptions, SimulationEngine};
//!
//! # fn main() -> erflow::error::Result<()> {
//! let config = Config::from_file("config.json")?;
//! let mut engine = SimulationEngine::new(config, EngineOptions::default())?;
//! let report = engine.run_days(28)?;
//! println!("{} treated, {} rejected", report.patients_treated, report.patients_rejected);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod expr;
pub mod models;
pub mod scheduling;
pub mod simulation;
pub mod staffing;

pub use config::Config;
pub use error::{EngineError, Result};
