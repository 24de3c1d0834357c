//! Optimized schedule output.
//!
//! The result of one class optimizer run: per-staff daily shift
//! assignments, weekly hour splits, total cost, and feasibility. The
//! output references staff only by id; it owns no staff records.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::models::{ShiftCatalog, ShiftKind};

/// Result of a roster optimization for one staff class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizedSchedule {
    /// staff id → (day index → shift id).
    pub assignments: BTreeMap<String, BTreeMap<usize, String>>,
    /// staff id → (week index → regular hours).
    pub weekly_regular_hours: BTreeMap<String, BTreeMap<usize, f64>>,
    /// staff id → (week index → overtime hours).
    pub weekly_overtime_hours: BTreeMap<String, BTreeMap<usize, f64>>,
    /// staff id → (week index → regular + overtime hours).
    pub weekly_actual_hours: BTreeMap<String, BTreeMap<usize, f64>>,
    /// Objective value: total wage cost over the period, dollars.
    pub total_cost: f64,
    /// Whether the optimizer found a usable solution.
    pub feasible: bool,
}

impl OptimizedSchedule {
    /// The output shape for a failed solve: empty maps, zero cost.
    pub fn infeasible() -> Self {
        Self::default()
    }

    /// The output for a class with no staff to schedule: nothing to
    /// assign, trivially feasible.
    pub fn empty_feasible() -> Self {
        Self {
            feasible: true,
            ..Self::default()
        }
    }

    /// The shift id assigned to a staff member on a day.
    pub fn assignment(&self, staff_id: &str, day_index: usize) -> Option<&str> {
        self.assignments
            .get(staff_id)?
            .get(&day_index)
            .map(String::as_str)
    }

    /// Resolves one week of a staff member's assignments to concrete
    /// shift kinds, Monday through Sunday.
    ///
    /// Days past `num_days` (a partial final week) are omitted, as are
    /// days whose shift id is missing from the catalog.
    pub fn week_schedule(
        &self,
        staff_id: &str,
        week_index: usize,
        num_days: usize,
        catalog: &ShiftCatalog,
    ) -> Vec<(Weekday, ShiftKind)> {
        const WEEKDAYS: [Weekday; 7] = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];

        let Some(daily) = self.assignments.get(staff_id) else {
            return Vec::new();
        };

        let mut week = Vec::new();
        for (offset, weekday) in WEEKDAYS.iter().enumerate() {
            let day = week_index * 7 + offset;
            if day >= num_days {
                break;
            }
            if let Some(kind) = daily
                .get(&day)
                .and_then(|shift_id| catalog.get(shift_id))
                .map(|definition| definition.kind)
            {
                week.push((*weekday, kind));
            }
        }
        week
    }
}
