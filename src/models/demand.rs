//! Staffing demand record.
//!
//! One demand states that `required_count` staff of `role` must be on
//! a shift covering `shift_id` on `day_index`. Demands are produced by
//! the staffing-rules generator and consumed as coverage constraints
//! by the roster optimizer.

use serde::{Deserialize, Serialize};

use super::Role;

/// Required staffing for a role on a given day and shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demand {
    /// The role that must provide the coverage.
    pub role: Role,
    /// Day index within the planning period (0-based).
    pub day_index: usize,
    /// Shift id the demand is stated against (e.g. `d8`).
    pub shift_id: String,
    /// Number of staff required.
    pub required_count: u32,
}

impl Demand {
    /// Creates a demand record.
    pub fn new(role: Role, day_index: usize, shift_id: impl Into<String>, required_count: u32) -> Self {
        Self {
            role,
            day_index,
            shift_id: shift_id.into(),
            required_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demand_fields() {
        let d = Demand::new(Role::RegisteredNurse, 3, "d8", 2);
        assert_eq!(d.role, Role::RegisteredNurse);
        assert_eq!(d.day_index, 3);
        assert_eq!(d.shift_id, "d8");
        assert_eq!(d.required_count, 2);
    }
}
