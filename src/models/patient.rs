//! Patient record.
//!
//! A patient is created by the generator at arrival-event creation and
//! mutated by the event loop as it moves through admit → treat →
//! release. Timestamps are minutes since the simulation epoch; a
//! missing timestamp means the patient has not reached that stage yet.

use serde::{Deserialize, Serialize};

use super::TriageLevel;

/// Stable patient identity within one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(pub u64);

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{:06}", self.0)
    }
}

/// A patient attending the emergency department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    /// Stable identity.
    pub id: PatientId,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u8,
    /// Assigned urgency tier (after any escalation).
    pub triage_level: TriageLevel,
    /// Sampled service time in minutes.
    pub service_time_mins: i64,
    /// Arrival at the ED (minutes since epoch). Stamped by the event loop.
    pub arrival_time_mins: Option<i64>,
    /// Treatment start (minutes since epoch).
    pub treatment_start_mins: Option<i64>,
    /// Discharge (minutes since epoch).
    pub discharge_time_mins: Option<i64>,
}

impl Patient {
    /// Creates a new patient awaiting arrival.
    pub fn new(id: PatientId, age: u8, triage_level: TriageLevel, service_time_mins: i64) -> Self {
        Self {
            id,
            name: format!("Patient{}", id.0 % 10_000),
            age,
            triage_level,
            service_time_mins,
            arrival_time_mins: None,
            treatment_start_mins: None,
            discharge_time_mins: None,
        }
    }

    /// Waiting time from arrival to treatment start, if both happened.
    pub fn wait_mins(&self) -> Option<i64> {
        match (self.arrival_time_mins, self.treatment_start_mins) {
            (Some(arrival), Some(start)) => Some(start - arrival),
            _ => None,
        }
    }

    /// Time spent in treatment, if discharged.
    pub fn treatment_mins(&self) -> Option<i64> {
        match (self.treatment_start_mins, self.discharge_time_mins) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}
