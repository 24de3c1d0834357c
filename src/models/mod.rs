//! Domain models.
//!
//! Core data types shared by the simulator and the roster optimizer.
//!
//! # Domain Mappings
//!
//! | Type | Simulator role | Optimizer role |
//! |------|----------------|----------------|
//! | [`Patient`] | unit of flow through the ED | — |
//! | [`TriageLevel`] | queue priority, resource needs | acuity input to demand rules |
//! | [`StaffMember`] | pooled headcount | decision-variable dimension |
//! | [`ShiftDefinition`] | — | assignment target, coverage interval |
//! | [`Demand`] | — | coverage constraint right-hand side |

mod demand;
mod patient;
mod shift;
mod staff;
mod triage;

pub use demand::Demand;
pub use patient::{Patient, PatientId};
pub use shift::{ShiftCatalog, ShiftDefinition, ShiftKind};
pub use staff::{Role, RoleClass, StaffMember};
pub use triage::{TriageClassifier, TriageLevel};
