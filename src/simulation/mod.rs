//! Discrete-event patient-flow simulation.
//!
//! Patients arrive following a time-varying Poisson process, wait in a
//! bounded priority queue, occupy a treatment room and pooled staff
//! for a sampled service time, and release their resources on
//! discharge. The [`SimulationEngine`] drives the whole loop in
//! repeating scheduling cycles.

mod emergency_room;
mod engine;
mod event;
mod generator;
mod metrics;

pub use emergency_room::{EmergencyRoom, StaffGroup, StaffPool};
pub use engine::{EngineOptions, SimulationEngine, SimulationReport};
pub use event::{Event, EventKind, EventQueue};
pub use generator::{PatientGenerator, DIAGNOSIS_PROBABILITIES};
pub use metrics::{HourlyRecord, MetricsRecorder, PerformanceMetrics, UtilizationSummary};
