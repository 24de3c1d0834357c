//! ILP roster optimizer.
//!
//! One mixed-integer model per staff class assigns every staff member
//! exactly one shift (possibly the off shift) per day, minimizing wage
//! cost under the labor rules:
//!
//! | Constraint | Contract |
//! |------------|----------|
//! | one-shift-per-day | Σ_s x[n,s,d] = 1 |
//! | weekly hours | actual[n,w] = Σ_{d∈w} Σ_s x[n,s,d]·len(s) |
//! | hour split | actual[n,w] = reg[n,w] + ot[n,w] |
//! | daily cap | Σ_s x[n,s,d]·len(s) ≤ maxHoursPerDay |
//! | coverage | staff of the demanded role on covering shifts ≥ required |
//! | rest | no work start within 10h after a ≥12h shift ends |
//!
//! The four classes share the model builder and differ only in which
//! staff and demands they see and which extra rules apply (resident
//! hour caps and days off, admin days off, attending regular-hour cap).
//!
//! A failed or infeasible solve degrades to the empty infeasible
//! output; the caller keeps its last usable schedule and continues.

use good_lp::{constraint, default_solver, variable, variables, Expression, Solution, SolverModel, Variable};

use crate::models::{RoleClass, ShiftDefinition, StaffMember};

use super::input::OptimizationInput;
use super::output::OptimizedSchedule;

/// Shift length that triggers the minimum-rest rule.
const LONG_SHIFT_THRESHOLD_HOURS: f64 = 12.0;
/// Required rest after a long shift.
const MIN_REST_HOURS_AFTER_LONG_SHIFT: f64 = 10.0;
/// Duty-hour ceiling for residents, per week and averaged.
const RESIDENT_WEEKLY_HOURS_CAP: f64 = 80.0;
/// Regular-hour ceiling for attending physicians.
const ATTENDING_MAX_REGULAR_HOURS: f64 = 40.0;
/// Extraction threshold for binary assignment variables.
const ASSIGNMENT_THRESHOLD: f64 = 0.9;

/// Class-specific rule set layered over the common constraints.
#[derive(Debug, Clone, Copy)]
pub struct ClassRules {
    /// Which staff class this optimizer schedules.
    pub class: RoleClass,
    /// Cap on weekly regular hours, below the configured maximum.
    pub max_regular_hours_cap: Option<f64>,
    /// Hard cap on weekly total hours, below the configured maximum.
    pub weekly_hours_hard_cap: Option<f64>,
    /// Cap on average weekly hours over the whole period.
    pub average_weekly_hours_cap: Option<f64>,
    /// Minimum off-shift days per week (0 disables the rule).
    pub min_days_off_per_week: u32,
    /// Whether the minimum-rest rule applies.
    pub rest_rule: bool,
}

impl ClassRules {
    /// Nurse-class rules: the common constraint set only.
    pub fn nurse() -> Self {
        Self {
            class: RoleClass::Nurse,
            max_regular_hours_cap: None,
            weekly_hours_hard_cap: None,
            average_weekly_hours_cap: None,
            min_days_off_per_week: 0,
            rest_rule: true,
        }
    }

    /// Attending-class rules: regular hours capped at 40.
    pub fn attending() -> Self {
        Self {
            class: RoleClass::Attending,
            max_regular_hours_cap: Some(ATTENDING_MAX_REGULAR_HOURS),
            weekly_hours_hard_cap: None,
            average_weekly_hours_cap: None,
            min_days_off_per_week: 0,
            rest_rule: true,
        }
    }

    /// Resident-class rules: 80-hour weekly and averaged caps, one day
    /// off per week.
    pub fn resident() -> Self {
        Self {
            class: RoleClass::Resident,
            max_regular_hours_cap: None,
            weekly_hours_hard_cap: Some(RESIDENT_WEEKLY_HOURS_CAP),
            average_weekly_hours_cap: Some(RESIDENT_WEEKLY_HOURS_CAP),
            min_days_off_per_week: 1,
            rest_rule: true,
        }
    }

    /// Admin-class rules: two days off per week, no rest rule.
    pub fn admin() -> Self {
        Self {
            class: RoleClass::Admin,
            max_regular_hours_cap: None,
            weekly_hours_hard_cap: None,
            average_weekly_hours_cap: None,
            min_days_off_per_week: 2,
            rest_rule: false,
        }
    }

    /// The rule set for a staff class.
    pub fn for_class(class: RoleClass) -> Self {
        match class {
            RoleClass::Nurse => Self::nurse(),
            RoleClass::Attending => Self::attending(),
            RoleClass::Resident => Self::resident(),
            RoleClass::Admin => Self::admin(),
        }
    }
}

/// Builds and solves the roster ILP for one staff class.
#[derive(Debug, Clone)]
pub struct RosterOptimizer {
    rules: ClassRules,
}

impl RosterOptimizer {
    /// Creates an optimizer with explicit rules.
    pub fn new(rules: ClassRules) -> Self {
        Self { rules }
    }

    /// Creates the standard optimizer for a staff class.
    pub fn for_class(class: RoleClass) -> Self {
        Self::new(ClassRules::for_class(class))
    }

    /// Solves the roster problem for this class.
    ///
    /// Staff and demands outside the class are ignored. A class with
    /// no staff yields an empty feasible schedule; a solver failure
    /// yields the infeasible output shape.
    pub fn optimize(&self, input: &OptimizationInput) -> OptimizedSchedule {
        let staff: Vec<&StaffMember> = input
            .staff_members
            .iter()
            .filter(|s| s.role.class() == self.rules.class)
            .collect();
        if staff.is_empty() {
            log::info!("{:?} class has no staff; returning empty schedule", self.rules.class);
            return OptimizedSchedule::empty_feasible();
        }

        let demands: Vec<_> = input
            .demands
            .iter()
            .filter(|d| d.role.class() == self.rules.class)
            .collect();

        let shifts: Vec<&ShiftDefinition> = input.shift_catalog.iter().collect();
        let off_index = shifts.iter().position(|s| s.is_off());
        if off_index.is_none() && self.rules.min_days_off_per_week > 0 {
            log::warn!(
                "{:?} class requires days off but the shift catalog defines no off shift; \
                 skipping the day-off rule",
                self.rules.class
            );
        }

        let num_staff = staff.len();
        let num_shifts = shifts.len();
        let num_days = input.num_days;
        let num_weeks = input.num_weeks;

        let reg_cap = match self.rules.max_regular_hours_cap {
            Some(cap) => input.max_regular_hours_per_week.min(cap),
            None => input.max_regular_hours_per_week,
        };
        let total_cap = match self.rules.weekly_hours_hard_cap {
            Some(cap) => input.max_total_hours_per_week.min(cap),
            None => input.max_total_hours_per_week,
        };

        // --- Decision variables ---
        let mut vars = variables!();

        let x: Vec<Vec<Vec<Variable>>> = (0..num_staff)
            .map(|_| {
                (0..num_shifts)
                    .map(|_| (0..num_days).map(|_| vars.add(variable().binary())).collect())
                    .collect()
            })
            .collect();

        let reg: Vec<Vec<Variable>> = (0..num_staff)
            .map(|_| {
                (0..num_weeks)
                    .map(|_| vars.add(variable().min(0.0).max(reg_cap)))
                    .collect()
            })
            .collect();
        let ot: Vec<Vec<Variable>> = (0..num_staff)
            .map(|_| {
                (0..num_weeks)
                    .map(|_| vars.add(variable().min(0.0).max(total_cap)))
                    .collect()
            })
            .collect();
        let actual: Vec<Vec<Variable>> = (0..num_staff)
            .map(|_| {
                (0..num_weeks)
                    .map(|_| vars.add(variable().min(0.0).max(total_cap)))
                    .collect()
            })
            .collect();

        // --- Objective: wage cost of regular plus overtime hours ---
        let mut objective = Expression::from(0.0);
        for (n, member) in staff.iter().enumerate() {
            for w in 0..num_weeks {
                objective += member.hourly_wage * reg[n][w];
                objective += member.overtime_wage() * ot[n][w];
            }
        }

        // --- Constraints ---
        let mut constraints = Vec::new();

        // One shift per staff member per day.
        for n in 0..num_staff {
            for d in 0..num_days {
                let mut assigned = Expression::from(0.0);
                for s in 0..num_shifts {
                    assigned += x[n][s][d];
                }
                constraints.push(constraint!(assigned == 1.0));
            }
        }

        // Weekly actual hours follow the assignments.
        for n in 0..num_staff {
            for w in 0..num_weeks {
                let mut hours = Expression::from(0.0);
                for offset in 0..7 {
                    let d = w * 7 + offset;
                    if d >= num_days {
                        break;
                    }
                    for (s, shift) in shifts.iter().enumerate() {
                        if !shift.is_off() {
                            hours += shift.length_hours() * x[n][s][d];
                        }
                    }
                }
                constraints.push(constraint!(hours == actual[n][w]));
                constraints.push(constraint!(actual[n][w] == reg[n][w] + ot[n][w]));
            }
        }

        // Daily hour cap.
        for n in 0..num_staff {
            for d in 0..num_days {
                let mut hours = Expression::from(0.0);
                for (s, shift) in shifts.iter().enumerate() {
                    if !shift.is_off() {
                        hours += shift.length_hours() * x[n][s][d];
                    }
                }
                constraints.push(constraint!(hours <= input.max_hours_per_day));
            }
        }

        // Demand coverage by shift-interval containment.
        for demand in &demands {
            if demand.required_count == 0 || demand.day_index >= num_days {
                continue;
            }
            let Some(target) = input.shift_catalog.get(&demand.shift_id) else {
                log::warn!(
                    "demand for {} on day {} names unknown shift '{}'; skipping",
                    demand.role.config_key(),
                    demand.day_index,
                    demand.shift_id
                );
                continue;
            };
            let mut coverage = Expression::from(0.0);
            for (n, member) in staff.iter().enumerate() {
                if member.role != demand.role {
                    continue;
                }
                for (s, shift) in shifts.iter().enumerate() {
                    if shift.covers(target) {
                        coverage += x[n][s][demand.day_index];
                    }
                }
            }
            constraints.push(constraint!(coverage >= demand.required_count as f64));
        }

        // Minimum rest after long shifts: a ≥12h shift on day d
        // excludes any work shift on day d or d+1 that starts before
        // the long shift's end plus the rest window.
        if self.rules.rest_rule {
            for n in 0..num_staff {
                for d in 0..num_days {
                    for (s_long, long_shift) in shifts.iter().enumerate() {
                        if long_shift.is_off()
                            || long_shift.length_hours() < LONG_SHIFT_THRESHOLD_HOURS
                        {
                            continue;
                        }
                        let long_end = long_shift.start_hour() + long_shift.length_hours();
                        let rest_until = long_end + MIN_REST_HOURS_AFTER_LONG_SHIFT;
                        for d2 in d..(d + 2).min(num_days) {
                            for (s2, conflict) in shifts.iter().enumerate() {
                                if (d2 == d && s2 == s_long) || conflict.is_off() {
                                    continue;
                                }
                                let conflict_start = if d2 == d {
                                    conflict.start_hour()
                                } else {
                                    24.0 + conflict.start_hour()
                                };
                                if conflict_start < rest_until {
                                    constraints.push(constraint!(
                                        x[n][s_long][d] + x[n][s2][d2] <= 1.0
                                    ));
                                }
                            }
                        }
                    }
                }
            }
        }

        // Average weekly hours over the whole period.
        if let Some(cap) = self.rules.average_weekly_hours_cap {
            if num_weeks > 0 {
                for n in 0..num_staff {
                    let mut period_hours = Expression::from(0.0);
                    for w in 0..num_weeks {
                        period_hours += actual[n][w];
                    }
                    constraints.push(constraint!(period_hours <= cap * num_weeks as f64));
                }
            }
        }

        // Minimum days off per week.
        if self.rules.min_days_off_per_week > 0 {
            if let Some(off) = off_index {
                for n in 0..num_staff {
                    for w in 0..num_weeks {
                        let days_in_week = (num_days - w * 7).min(7);
                        let mut off_days = Expression::from(0.0);
                        for offset in 0..days_in_week {
                            off_days += x[n][off][w * 7 + offset];
                        }
                        let required =
                            (self.rules.min_days_off_per_week as usize).min(days_in_week);
                        constraints.push(constraint!(off_days >= required as f64));
                    }
                }
            }
        }

        // --- Solve and extract ---
        let mut model = vars.minimise(objective).using(default_solver);
        for c in constraints {
            model = model.with(c);
        }

        match model.solve() {
            Ok(solution) => self.extract(&solution, &staff, &shifts, &x, &reg, &ot, &actual, input),
            Err(error) => {
                log::warn!(
                    "{:?} class roster has no usable solution: {error}; demands go uncovered \
                     this period",
                    self.rules.class
                );
                OptimizedSchedule::infeasible()
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn extract(
        &self,
        solution: &impl Solution,
        staff: &[&StaffMember],
        shifts: &[&ShiftDefinition],
        x: &[Vec<Vec<Variable>>],
        reg: &[Vec<Variable>],
        ot: &[Vec<Variable>],
        actual: &[Vec<Variable>],
        input: &OptimizationInput,
    ) -> OptimizedSchedule {
        let mut output = OptimizedSchedule::empty_feasible();
        let mut total_cost = 0.0;

        for (n, member) in staff.iter().enumerate() {
            let mut daily = std::collections::BTreeMap::new();
            for d in 0..input.num_days {
                // One-shift-per-day guarantees a unique assignment;
                // the threshold tolerates solver rounding noise.
                for (s, shift) in shifts.iter().enumerate() {
                    if solution.value(x[n][s][d]) > ASSIGNMENT_THRESHOLD {
                        daily.insert(d, shift.id.clone());
                        break;
                    }
                }
            }
            output.assignments.insert(member.id.clone(), daily);

            let mut reg_hours = std::collections::BTreeMap::new();
            let mut ot_hours = std::collections::BTreeMap::new();
            let mut actual_hours = std::collections::BTreeMap::new();
            for w in 0..input.num_weeks {
                let r = solution.value(reg[n][w]);
                let o = solution.value(ot[n][w]);
                reg_hours.insert(w, r);
                ot_hours.insert(w, o);
                actual_hours.insert(w, solution.value(actual[n][w]));
                total_cost += member.hourly_wage * r + member.overtime_wage() * o;
            }
            output.weekly_regular_hours.insert(member.id.clone(), reg_hours);
            output.weekly_overtime_hours.insert(member.id.clone(), ot_hours);
            output
                .weekly_actual_hours
                .insert(member.id.clone(), actual_hours);
        }

        output.total_cost = total_cost;
        log::info!(
            "{:?} class roster solved: {} staff, cost {:.2}",
            self.rules.class,
            staff.len(),
            total_cost
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Demand, Role, ShiftCatalog, ShiftDefinition, ShiftKind};

    fn catalog_8h() -> ShiftCatalog {
        let mut catalog = ShiftCatalog::new();
        catalog.insert(ShiftDefinition::new("d8", ShiftKind::Day8));
        catalog.insert(ShiftDefinition::new("e8", ShiftKind::Evening8));
        catalog.insert(ShiftDefinition::new("n8", ShiftKind::Night8));
        catalog.insert(ShiftDefinition::new("off", ShiftKind::Free));
        catalog
    }

    fn input(
        staff: Vec<StaffMember>,
        catalog: ShiftCatalog,
        demands: Vec<Demand>,
        num_days: usize,
    ) -> OptimizationInput {
        OptimizationInput {
            staff_members: staff,
            shift_catalog: catalog,
            demands,
            num_days,
            num_weeks: num_days.div_ceil(7),
            max_hours_per_day: 12.0,
            max_regular_hours_per_week: 40.0,
            max_total_hours_per_week: 48.0,
        }
    }

    fn rn(id: &str, wage: f64) -> StaffMember {
        StaffMember::new(id, id, Role::RegisteredNurse, wage, 1.5)
    }

    #[test]
    fn test_minimal_feasible_roster() {
        // Two RNs, one d8 demand on days 0..4: the cheaper RN works
        // all five days at the regular rate.
        let staff = vec![rn("RN_A", 30.0), rn("RN_B", 32.0)];
        let demands: Vec<Demand> = (0..5)
            .map(|d| Demand::new(Role::RegisteredNurse, d, "d8", 1))
            .collect();
        let input = input(staff, catalog_8h(), demands, 7);

        let output = RosterOptimizer::for_class(RoleClass::Nurse).optimize(&input);
        assert!(output.feasible);
        assert!((output.total_cost - 5.0 * 8.0 * 30.0).abs() < 1e-6);

        // Every staff member has exactly one assignment per day.
        for member in ["RN_A", "RN_B"] {
            let days = &output.assignments[member];
            assert_eq!(days.len(), 7);
            let worked = days.values().filter(|s| *s != "off").count();
            assert!(worked <= 5);
        }

        // The demand is covered each weekday.
        for d in 0..5 {
            let covered = ["RN_A", "RN_B"]
                .iter()
                .filter(|m| output.assignment(m, d) == Some("d8"))
                .count();
            assert!(covered >= 1, "day {d} uncovered");
        }
    }

    #[test]
    fn test_weekly_hours_consistency() {
        let staff = vec![rn("RN_A", 30.0)];
        let demands: Vec<Demand> = (0..5)
            .map(|d| Demand::new(Role::RegisteredNurse, d, "d8", 1))
            .collect();
        let input = input(staff, catalog_8h(), demands, 7);

        let output = RosterOptimizer::for_class(RoleClass::Nurse).optimize(&input);
        assert!(output.feasible);

        let reg = output.weekly_regular_hours["RN_A"][&0];
        let ot = output.weekly_overtime_hours["RN_A"][&0];
        let actual = output.weekly_actual_hours["RN_A"][&0];
        assert!((actual - (reg + ot)).abs() < 1e-6);
        assert!((actual - 40.0).abs() < 1e-6);
        assert!(reg <= 40.0 + 1e-9);
        assert!(actual <= 48.0 + 1e-9);
    }

    #[test]
    fn test_infeasible_demand_reports_failure() {
        // One RN cannot satisfy a two-RN demand.
        let staff = vec![rn("RN_A", 30.0)];
        let demands = vec![Demand::new(Role::RegisteredNurse, 0, "d8", 2)];
        let input = input(staff, catalog_8h(), demands, 7);

        let output = RosterOptimizer::for_class(RoleClass::Nurse).optimize(&input);
        assert!(!output.feasible);
        assert!(output.assignments.is_empty());
        assert_eq!(output.total_cost, 0.0);
    }

    #[test]
    fn test_empty_class_is_trivially_feasible() {
        let input = input(Vec::new(), catalog_8h(), Vec::new(), 7);
        let output = RosterOptimizer::for_class(RoleClass::Nurse).optimize(&input);
        assert!(output.feasible);
        assert!(output.assignments.is_empty());
    }

    #[test]
    fn test_coverage_by_containment() {
        // A d12 assignment satisfies a d8 demand: the 12-hour interval
        // contains the 8-hour one.
        let mut catalog = ShiftCatalog::new();
        catalog.insert(ShiftDefinition::new("d12", ShiftKind::Day12));
        catalog.insert(ShiftDefinition::new("off", ShiftKind::Free));
        let staff = vec![rn("RN_A", 30.0)];
        let demands = vec![Demand::new(Role::RegisteredNurse, 0, "d8", 1)];
        let mut input = input(staff, catalog, demands, 2);
        // The demand's own shift is not in the catalog, but coverage
        // is stated against intervals, not ids.
        input
            .shift_catalog
            .insert(ShiftDefinition::new("d8", ShiftKind::Day8));

        let output = RosterOptimizer::for_class(RoleClass::Nurse).optimize(&input);
        assert!(output.feasible);
        let day0 = output.assignment("RN_A", 0).unwrap();
        assert!(day0 == "d12" || day0 == "d8");
    }

    #[test]
    fn test_rest_rule_blocks_early_start_after_long_night() {
        // A night-12 ends at 07:00 next day; rest until 17:00 rules
        // out every next-day shift except the night ones.
        let mut catalog = ShiftCatalog::new();
        catalog.insert(ShiftDefinition::new("d12", ShiftKind::Day12));
        catalog.insert(ShiftDefinition::new("n12", ShiftKind::Night12));
        catalog.insert(ShiftDefinition::new("off", ShiftKind::Free));
        let staff = vec![rn("RN_A", 30.0)];
        let demands = vec![
            Demand::new(Role::RegisteredNurse, 0, "n12", 1),
            Demand::new(Role::RegisteredNurse, 1, "d12", 1),
        ];
        let input = input(staff, catalog, demands, 2);

        // Covering both demands with one nurse would need n12 on day 0
        // and d12 on day 1, which violates the rest rule.
        let output = RosterOptimizer::for_class(RoleClass::Nurse).optimize(&input);
        assert!(!output.feasible);
    }

    #[test]
    fn test_rest_rule_allows_repeated_nights() {
        let mut catalog = ShiftCatalog::new();
        catalog.insert(ShiftDefinition::new("n12", ShiftKind::Night12));
        catalog.insert(ShiftDefinition::new("off", ShiftKind::Free));
        let staff = vec![rn("RN_A", 30.0)];
        let demands = vec![
            Demand::new(Role::RegisteredNurse, 0, "n12", 1),
            Demand::new(Role::RegisteredNurse, 1, "n12", 1),
        ];
        let input = input(staff, catalog, demands, 2);

        // Night-to-night start gap is 24h, past the 22h rest horizon.
        let output = RosterOptimizer::for_class(RoleClass::Nurse).optimize(&input);
        assert!(output.feasible);
        assert_eq!(output.assignment("RN_A", 0), Some("n12"));
        assert_eq!(output.assignment("RN_A", 1), Some("n12"));
    }

    #[test]
    fn test_resident_day_off_rule() {
        let staff = vec![StaffMember::new(
            "RES_0",
            "RES_0",
            Role::ResidentPhysician,
            35.0,
            1.0,
        )];
        // Demand on six days leaves exactly one day free.
        let demands: Vec<Demand> = (0..6)
            .map(|d| Demand::new(Role::ResidentPhysician, d, "d8", 1))
            .collect();
        let input = input(staff, catalog_8h(), demands, 7);

        let output = RosterOptimizer::for_class(RoleClass::Resident).optimize(&input);
        assert!(output.feasible);
        let off_days = output.assignments["RES_0"]
            .values()
            .filter(|s| *s == "off")
            .count();
        assert!(off_days >= 1);
    }

    #[test]
    fn test_resident_demand_on_every_day_is_infeasible() {
        // Seven demand days leave no room for the required day off.
        let staff = vec![StaffMember::new(
            "RES_0",
            "RES_0",
            Role::ResidentPhysician,
            35.0,
            1.0,
        )];
        let demands: Vec<Demand> = (0..7)
            .map(|d| Demand::new(Role::ResidentPhysician, d, "d8", 1))
            .collect();
        let input = input(staff, catalog_8h(), demands, 7);

        let output = RosterOptimizer::for_class(RoleClass::Resident).optimize(&input);
        assert!(!output.feasible);
    }

    #[test]
    fn test_admin_two_days_off() {
        let staff = vec![
            StaffMember::new("AC_0", "AC_0", Role::AdminClerk, 20.0, 1.5),
            StaffMember::new("AC_1", "AC_1", Role::AdminClerk, 21.0, 1.5),
        ];
        let demands: Vec<Demand> = (0..7)
            .map(|d| Demand::new(Role::AdminClerk, d, "d8", 1))
            .collect();
        let input = input(staff, catalog_8h(), demands, 7);

        let output = RosterOptimizer::for_class(RoleClass::Admin).optimize(&input);
        assert!(output.feasible);
        for clerk in ["AC_0", "AC_1"] {
            let off_days = output.assignments[clerk]
                .values()
                .filter(|s| *s == "off")
                .count();
            assert!(off_days >= 2, "{clerk} has only {off_days} days off");
        }
    }

    #[test]
    fn test_class_filter_ignores_other_roles() {
        // A resident in the staff list does not leak into the nurse
        // roster, and nurse demands do not bind the resident solve.
        let staff = vec![
            rn("RN_A", 30.0),
            StaffMember::new("RES_0", "RES_0", Role::ResidentPhysician, 35.0, 1.0),
        ];
        let demands = vec![Demand::new(Role::RegisteredNurse, 0, "d8", 1)];
        let input = input(staff, catalog_8h(), demands, 7);

        let nurse = RosterOptimizer::for_class(RoleClass::Nurse).optimize(&input);
        assert!(nurse.feasible);
        assert!(nurse.assignments.contains_key("RN_A"));
        assert!(!nurse.assignments.contains_key("RES_0"));

        let resident = RosterOptimizer::for_class(RoleClass::Resident).optimize(&input);
        assert!(resident.feasible);
        // No demands bind residents, so the cheapest roster is all off.
        let worked = resident.assignments["RES_0"]
            .values()
            .filter(|s| *s != "off")
            .count();
        assert_eq!(worked, 0);
        assert!(resident.total_cost.abs() < 1e-9);
    }

    #[test]
    fn test_daily_cap_blocks_double_shifts() {
        // Covering d8 and e8 with a single RN would need two 8-hour
        // shifts in one day; the one-shift-per-day rule forbids it.
        let staff = vec![rn("RN_A", 30.0)];
        let demands = vec![
            Demand::new(Role::RegisteredNurse, 0, "d8", 1),
            Demand::new(Role::RegisteredNurse, 0, "e8", 1),
        ];
        let input = input(staff, catalog_8h(), demands, 2);

        let output = RosterOptimizer::for_class(RoleClass::Nurse).optimize(&input);
        assert!(!output.feasible);
    }

    #[test]
    fn test_unknown_demand_shift_is_skipped() {
        let staff = vec![rn("RN_A", 30.0)];
        let demands = vec![Demand::new(Role::RegisteredNurse, 0, "x9", 1)];
        let input = input(staff, catalog_8h(), demands, 2);

        // The unknown shift cannot be enforced; the solve proceeds and
        // the cheapest roster is all off.
        let output = RosterOptimizer::for_class(RoleClass::Nurse).optimize(&input);
        assert!(output.feasible);
        assert!(output.total_cost.abs() < 1e-9);
    }
}
