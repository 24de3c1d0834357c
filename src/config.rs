//! Engine configuration.
//!
//! A single JSON document, parsed once at startup, parameterizes both
//! halves of the engine: ED shape and arrival profiles for the
//! simulator, labor rules and wage tables for the roster optimizer.
//! [`Config::validate`] runs immediately after parsing; a config that
//! passes it cannot produce configuration errors later in the run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::expr::ArrivalRate;
use crate::models::{Role, TriageLevel};

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Population of the simulated catchment area (reporting only).
    pub population_size: u64,

    /// Display name of the emergency department.
    #[serde(rename = "ERName")]
    pub er_name: String,

    /// Waiting-room capacity (maximum queued patients).
    #[serde(rename = "ERCapacity")]
    pub er_capacity: usize,

    /// Number of treatment rooms.
    #[serde(rename = "ERTreatmentRooms")]
    pub er_treatment_rooms: u32,

    /// Nominal mean inter-arrival time in minutes (tau-0).
    pub interarrival_time_mins: f64,

    /// Youngest generated patient age.
    pub patient_min_age: u8,
    /// Oldest generated patient age.
    pub patient_max_age: u8,

    /// Labor rule: maximum worked hours in any day.
    pub max_hours_per_day: u32,
    /// Labor rule: weekly hours before overtime applies.
    pub max_regular_hours_per_week: u32,
    /// Labor rule: weekly hours including overtime.
    pub max_total_hours_per_week: u32,
    /// Overtime pay multiplier applied to the hourly wage.
    pub overtime_multiplier: f64,

    /// Label of the arrival function used when none is selected.
    pub default_arrival_function: String,
    /// Named arrival-rate expressions, `f(t)` of the hour index.
    pub patient_arrival_functions: BTreeMap<String, String>,

    /// Headcount per role.
    pub staff_counts: BTreeMap<Role, u32>,
    /// Regular hourly wage per role, dollars.
    pub hourly_wages: BTreeMap<Role, f64>,

    /// Nurses required in treatment per triage level (fractional).
    pub triage_nurse_requirements: BTreeMap<TriageLevel, f64>,
    /// Attending physicians required per triage level (fractional).
    pub triage_physician_requirements: BTreeMap<TriageLevel, f64>,
    /// Resident physicians required per triage level (fractional).
    #[serde(rename = "triageRPRequirements")]
    pub triage_rp_requirements: BTreeMap<TriageLevel, f64>,

    /// Mean treatment time per triage level, minutes.
    pub avg_treatment_times_mins: BTreeMap<TriageLevel, f64>,

    /// Policy ratio: patients per LPN (0 disables LPN demand).
    #[serde(rename = "LPNRatio")]
    pub lpn_ratio: f64,
    /// Policy ratio: patients per CNA/tech (0 disables CNA demand).
    #[serde(rename = "CNARatio")]
    pub cna_ratio: f64,

    /// Estimated trauma patients on the day shift.
    pub est_trauma_patients_day: u32,
    /// Estimated trauma patients on the evening shift.
    pub est_trauma_patients_evening: u32,
    /// Estimated trauma patients on the night shift.
    pub est_trauma_patients_night: u32,
    /// Estimated non-trauma patients on the day shift.
    pub est_non_trauma_patients_day: u32,
    /// Estimated non-trauma patients on the evening shift.
    pub est_non_trauma_patients_evening: u32,
    /// Estimated non-trauma patients on the night shift.
    pub est_non_trauma_patients_night: u32,
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses and validates a configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field consistency beyond what the schema enforces.
    pub fn validate(&self) -> Result<()> {
        if self.interarrival_time_mins <= 0.0 {
            return Err(EngineError::Config(format!(
                "interarrivalTimeMins must be positive, got {}",
                self.interarrival_time_mins
            )));
        }
        if self.patient_min_age > self.patient_max_age {
            return Err(EngineError::Config(format!(
                "patientMinAge {} exceeds patientMaxAge {}",
                self.patient_min_age, self.patient_max_age
            )));
        }
        if self.max_total_hours_per_week < self.max_regular_hours_per_week {
            return Err(EngineError::Config(format!(
                "maxTotalHoursPerWeek {} is below maxRegularHoursPerWeek {}",
                self.max_total_hours_per_week, self.max_regular_hours_per_week
            )));
        }
        if self.max_hours_per_day == 0 {
            return Err(EngineError::Config("maxHoursPerDay must be positive".into()));
        }
        if self.overtime_multiplier < 1.0 {
            return Err(EngineError::Config(format!(
                "overtimeMultiplier must be at least 1.0, got {}",
                self.overtime_multiplier
            )));
        }

        if !self
            .patient_arrival_functions
            .contains_key(&self.default_arrival_function)
        {
            return Err(EngineError::Config(format!(
                "defaultArrivalFunction '{}' is not defined in patientArrivalFunctions",
                self.default_arrival_function
            )));
        }
        // Every configured expression must parse; failures are fatal here
        // rather than mid-simulation.
        for (label, expression) in &self.patient_arrival_functions {
            ArrivalRate::parse(label.clone(), expression)?;
        }

        for (role, _count) in &self.staff_counts {
            if !self.hourly_wages.contains_key(role) {
                return Err(EngineError::Config(format!(
                    "no hourly wage configured for role {}",
                    role.config_key()
                )));
            }
        }

        for level in TriageLevel::ALL {
            for (name, table) in [
                ("triageNurseRequirements", &self.triage_nurse_requirements),
                ("triagePhysicianRequirements", &self.triage_physician_requirements),
                ("triageRPRequirements", &self.triage_rp_requirements),
            ] {
                match table.get(&level) {
                    None => {
                        return Err(EngineError::Config(format!(
                            "{name} is missing triage level {level:?}"
                        )))
                    }
                    Some(v) if *v < 0.0 => {
                        return Err(EngineError::Config(format!(
                            "{name} has negative requirement {v} for {level:?}"
                        )))
                    }
                    Some(_) => {}
                }
            }
            match self.avg_treatment_times_mins.get(&level) {
                Some(v) if *v > 0.0 => {}
                Some(v) => {
                    return Err(EngineError::Config(format!(
                        "avgTreatmentTimesMins must be positive for {level:?}, got {v}"
                    )))
                }
                None => {
                    return Err(EngineError::Config(format!(
                        "avgTreatmentTimesMins is missing triage level {level:?}"
                    )))
                }
            }
        }

        Ok(())
    }

    /// Parses the selected (or default) arrival function.
    ///
    /// An unknown label is a configuration error, matching the startup
    /// failure mode for a bad `defaultArrivalFunction`.
    pub fn arrival_rate(&self, label: Option<&str>) -> Result<ArrivalRate> {
        let label = label.unwrap_or(&self.default_arrival_function);
        let expression = self.patient_arrival_functions.get(label).ok_or_else(|| {
            EngineError::Config(format!("unknown arrival function '{label}'"))
        })?;
        ArrivalRate::parse(label, expression)
    }

    /// Mean treatment time for a triage level, minutes.
    ///
    /// Validation guarantees every level is present.
    pub fn treatment_mean_mins(&self, level: TriageLevel) -> f64 {
        self.avg_treatment_times_mins.get(&level).copied().unwrap_or(1.0)
    }

    /// Nurses required to treat a patient of the given level.
    pub fn nurse_requirement(&self, level: TriageLevel) -> f64 {
        self.triage_nurse_requirements.get(&level).copied().unwrap_or(0.0)
    }

    /// Attending physicians required to treat a patient of the given level.
    pub fn physician_requirement(&self, level: TriageLevel) -> f64 {
        self.triage_physician_requirements.get(&level).copied().unwrap_or(0.0)
    }

    /// Resident physicians required to treat a patient of the given level.
    pub fn resident_requirement(&self, level: TriageLevel) -> f64 {
        self.triage_rp_requirements.get(&level).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
pub(crate) fn sample_config() -> Config {
    use TriageLevel::{Blue, Green, Orange, Red, Yellow};

    let mut patient_arrival_functions = BTreeMap::new();
    patient_arrival_functions.insert("flat".to_string(), "1".to_string());
    patient_arrival_functions.insert(
        "diurnal".to_string(),
        "(-0.25)*cos((pi/12)*t)+0.75".to_string(),
    );

    let mut staff_counts = BTreeMap::new();
    staff_counts.insert(Role::RegisteredNurse, 10);
    staff_counts.insert(Role::LicensedPracticalNurse, 4);
    staff_counts.insert(Role::CertifiedNursingAssistant, 4);
    staff_counts.insert(Role::AttendingPhysician, 4);
    staff_counts.insert(Role::ResidentPhysician, 6);
    staff_counts.insert(Role::AdminClerk, 2);

    let mut hourly_wages = BTreeMap::new();
    hourly_wages.insert(Role::RegisteredNurse, 45.0);
    hourly_wages.insert(Role::LicensedPracticalNurse, 30.0);
    hourly_wages.insert(Role::CertifiedNursingAssistant, 22.0);
    hourly_wages.insert(Role::AttendingPhysician, 140.0);
    hourly_wages.insert(Role::ResidentPhysician, 35.0);
    hourly_wages.insert(Role::AdminClerk, 20.0);

    let levels = [Red, Orange, Yellow, Green, Blue];
    let nurse_req = [2.0, 1.5, 1.0, 0.5, 0.5];
    let physician_req = [1.0, 1.0, 0.5, 0.25, 0.0];
    let rp_req = [1.0, 0.5, 0.5, 0.25, 0.25];
    let treatment_mins = [180.0, 120.0, 90.0, 45.0, 15.0];

    Config {
        population_size: 200_000,
        er_name: "Test ED".to_string(),
        er_capacity: 30,
        er_treatment_rooms: 15,
        interarrival_time_mins: 15.0,
        patient_min_age: 5,
        patient_max_age: 99,
        max_hours_per_day: 12,
        max_regular_hours_per_week: 40,
        max_total_hours_per_week: 48,
        overtime_multiplier: 1.5,
        default_arrival_function: "diurnal".to_string(),
        patient_arrival_functions,
        staff_counts,
        hourly_wages,
        triage_nurse_requirements: levels.iter().copied().zip(nurse_req).collect(),
        triage_physician_requirements: levels.iter().copied().zip(physician_req).collect(),
        triage_rp_requirements: levels.iter().copied().zip(rp_req).collect(),
        avg_treatment_times_mins: levels.iter().copied().zip(treatment_mins).collect(),
        lpn_ratio: 15.0,
        cna_ratio: 10.0,
        est_trauma_patients_day: 4,
        est_trauma_patients_evening: 5,
        est_trauma_patients_night: 3,
        est_non_trauma_patients_day: 20,
        est_non_trauma_patients_evening: 24,
        est_non_trauma_patients_night: 12,
    }
}
