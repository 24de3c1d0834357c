//! Staff rostering.
//!
//! Builds optimization inputs from configuration and solves one ILP
//! per staff class. Class solves are independent: a failure in one
//! class leaves the others usable and the orchestrator running.

mod input;
mod roster;
mod output;

pub use input::{adjust_demands, baseline_demands, generate_staff, OptimizationInput};
pub use output::OptimizedSchedule;
pub use roster::{ClassRules, RosterOptimizer};

use crate::models::RoleClass;

/// The four class rosters produced by one scheduling pass.
#[derive(Debug, Clone, Default)]
pub struct ClassSchedules {
    /// Nurse-class roster.
    pub nurse: OptimizedSchedule,
    /// Attending-class roster.
    pub attending: OptimizedSchedule,
    /// Resident-class roster.
    pub resident: OptimizedSchedule,
    /// Admin-class roster.
    pub admin: OptimizedSchedule,
}

impl ClassSchedules {
    /// Total cost across all feasible class rosters.
    pub fn total_cost(&self) -> f64 {
        [&self.nurse, &self.attending, &self.resident, &self.admin]
            .iter()
            .filter(|s| s.feasible)
            .map(|s| s.total_cost)
            .sum()
    }

    /// Whether every class produced a usable roster.
    pub fn all_feasible(&self) -> bool {
        self.nurse.feasible
            && self.attending.feasible
            && self.resident.feasible
            && self.admin.feasible
    }

    /// Falls back to the previous period's roster for any class whose
    /// fresh solve failed. A class that has never solved stays
    /// infeasible.
    pub fn carry_forward(&mut self, previous: &ClassSchedules) {
        for (current, prior, name) in [
            (&mut self.nurse, &previous.nurse, "nurse"),
            (&mut self.attending, &previous.attending, "attending"),
            (&mut self.resident, &previous.resident, "resident"),
            (&mut self.admin, &previous.admin, "admin"),
        ] {
            if !current.feasible && prior.feasible {
                log::warn!("{name} roster infeasible; keeping the previous period's roster");
                *current = prior.clone();
            }
        }
    }
}

/// Solves all four class rosters for one planning period.
pub fn optimize_all(input: &OptimizationInput) -> ClassSchedules {
    ClassSchedules {
        nurse: RosterOptimizer::for_class(RoleClass::Nurse).optimize(input),
        attending: RosterOptimizer::for_class(RoleClass::Attending).optimize(input),
        resident: RosterOptimizer::for_class(RoleClass::Resident).optimize(input),
        admin: RosterOptimizer::for_class(RoleClass::Admin).optimize(input),
    }
}
