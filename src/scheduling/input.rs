//! Optimization input assembly.
//!
//! Builds the full input for the class optimizers from configuration:
//! the staff list (one record per configured head), the shift catalog,
//! and the demand list derived from the staffing rules. Between
//! scheduling cycles, observed performance adjusts the baseline
//! demands multiplicatively (the feedback controller).

use crate::config::Config;
use crate::models::{Demand, ShiftCatalog, StaffMember};
use crate::simulation::PerformanceMetrics;
use crate::staffing;

/// Performance bands for the demand feedback controller.
const HIGH_REJECTION_THRESHOLD: f64 = 0.05;
const HIGH_WAIT_THRESHOLD_MINS: f64 = 45.0;
const LOW_REJECTION_THRESHOLD: f64 = 0.01;
const LOW_WAIT_THRESHOLD_MINS: f64 = 15.0;

/// Everything a class optimizer needs for one planning period.
#[derive(Debug, Clone)]
pub struct OptimizationInput {
    /// Staff available for scheduling, all classes mixed.
    pub staff_members: Vec<StaffMember>,
    /// Shift definitions the optimizer may assign.
    pub shift_catalog: ShiftCatalog,
    /// Coverage requirements.
    pub demands: Vec<Demand>,
    /// Days in the planning period.
    pub num_days: usize,
    /// Weeks in the planning period (partial weeks round up).
    pub num_weeks: usize,
    /// Labor rule: maximum worked hours per day.
    pub max_hours_per_day: f64,
    /// Labor rule: weekly hours before overtime.
    pub max_regular_hours_per_week: f64,
    /// Labor rule: weekly hours including overtime.
    pub max_total_hours_per_week: f64,
}

impl OptimizationInput {
    /// Builds the baseline input for a planning period.
    pub fn from_config(config: &Config, period_days: usize) -> Self {
        Self {
            staff_members: generate_staff(config),
            shift_catalog: ShiftCatalog::standard(),
            demands: baseline_demands(config, period_days),
            num_days: period_days,
            num_weeks: period_days.div_ceil(7),
            max_hours_per_day: config.max_hours_per_day as f64,
            max_regular_hours_per_week: config.max_regular_hours_per_week as f64,
            max_total_hours_per_week: config.max_total_hours_per_week as f64,
        }
    }

    /// Builds the input with demands adjusted by observed performance.
    pub fn from_config_with_metrics(
        config: &Config,
        period_days: usize,
        metrics: &PerformanceMetrics,
    ) -> Self {
        let mut input = Self::from_config(config, period_days);
        input.demands = adjust_demands(&input.demands, metrics);
        input
    }
}

/// Expands configured headcounts into individual staff records.
///
/// Ids are stable (`<ROLE>_<i>`), so repeated factory calls produce
/// identical rosters and schedules remain comparable across cycles.
pub fn generate_staff(config: &Config) -> Vec<StaffMember> {
    let mut staff = Vec::new();
    for (role, count) in &config.staff_counts {
        let wage = config.hourly_wages.get(role).copied().unwrap_or(0.0);
        for i in 0..*count {
            let id = format!("{}_{i}", role.config_key());
            let name = format!("{}_{i}", role.abbreviation());
            staff.push(StaffMember::new(
                id,
                name,
                *role,
                wage,
                config.overtime_multiplier,
            ));
        }
    }
    staff
}

/// Derives the baseline demand list from the staffing rules.
///
/// Each day of the period gets three day-part demand sets, stated
/// against the 8-hour shifts (`d8`, `e8`, `n8`). Zero-count entries
/// are not emitted.
pub fn baseline_demands(config: &Config, num_days: usize) -> Vec<Demand> {
    let day = staffing::staff_requirements(
        config.est_trauma_patients_day,
        config.est_non_trauma_patients_day,
        config.cna_ratio,
        config.lpn_ratio,
    );
    let evening = staffing::staff_requirements(
        config.est_trauma_patients_evening,
        config.est_non_trauma_patients_evening,
        config.cna_ratio,
        config.lpn_ratio,
    );
    let night = staffing::staff_requirements(
        config.est_trauma_patients_night,
        config.est_non_trauma_patients_night,
        config.cna_ratio,
        config.lpn_ratio,
    );

    let mut demands = Vec::new();
    for day_index in 0..num_days {
        for (requirements, shift_id) in [(&day, "d8"), (&evening, "e8"), (&night, "n8")] {
            for (role, count) in requirements.iter() {
                if *count > 0 {
                    demands.push(Demand::new(*role, day_index, shift_id, *count));
                }
            }
        }
    }
    demands
}

/// Applies the feedback factor to a baseline demand list.
///
/// Poor performance (rejections above 5% or waits above 45 minutes)
/// scales demand up by 15% and/or 10%; excellent performance on both
/// axes scales it down by 10%. Inside the acceptable band the baseline
/// is returned unchanged. Counts round up, and a demand that was above
/// one never drops to zero.
pub fn adjust_demands(baseline: &[Demand], metrics: &PerformanceMetrics) -> Vec<Demand> {
    let mut factor = 1.0;
    let high_rejection = metrics.rejection_rate > HIGH_REJECTION_THRESHOLD;
    let high_wait = metrics.avg_wait_mins > HIGH_WAIT_THRESHOLD_MINS;

    if high_rejection || high_wait {
        if high_rejection {
            factor += 0.15;
        }
        if high_wait {
            factor += 0.10;
        }
        log::info!(
            "demand feedback: rejection {:.1}%, wait {:.1} min; scaling demand by {factor:.2}",
            100.0 * metrics.rejection_rate,
            metrics.avg_wait_mins
        );
    } else if metrics.rejection_rate < LOW_REJECTION_THRESHOLD
        && metrics.avg_wait_mins < LOW_WAIT_THRESHOLD_MINS
    {
        factor = 0.90;
        log::info!(
            "demand feedback: performance headroom detected; scaling demand by {factor:.2}"
        );
    } else {
        return baseline.to_vec();
    }

    baseline
        .iter()
        .map(|demand| {
            let mut adjusted = (demand.required_count as f64 * factor).ceil() as u32;
            if demand.required_count > 1 && adjusted < 1 {
                adjusted = 1;
            }
            Demand::new(demand.role, demand.day_index, demand.shift_id.clone(), adjusted)
        })
        .collect()
}
