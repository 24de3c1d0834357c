//! Oregon ED staffing rules.
//!
//! Translates per-shift patient estimates into minimum role headcounts.
//! The RN ratio follows Oregon HB 2697 planning minimums (1:1 for
//! trauma, 1:4 averaged for non-trauma); the remaining roles use
//! hospital-policy ratios since no statute fixes them.

use std::collections::BTreeMap;

use crate::models::Role;

/// Minimum registered nurses for an ED census.
///
/// 1 RN per trauma patient plus 1 RN per 4 non-trauma patients,
/// rounded up.
pub fn min_registered_nurses(trauma_count: u32, non_trauma_count: u32) -> u32 {
    trauma_count + non_trauma_count.div_ceil(4)
}

/// Policy-based LPN count: 1 per `ratio` patients; 0 when the ratio is
/// unset or non-positive.
pub fn policy_lpns(patient_count: u32, ratio: f64) -> u32 {
    policy_ratio(patient_count, ratio)
}

/// Policy-based CNA/tech count: 1 per `ratio` patients; 0 when the
/// ratio is unset or non-positive.
pub fn policy_cnas(patient_count: u32, ratio: f64) -> u32 {
    policy_ratio(patient_count, ratio)
}

fn policy_ratio(patient_count: u32, ratio: f64) -> u32 {
    if patient_count == 0 || ratio <= 0.0 {
        return 0;
    }
    (patient_count as f64 / ratio).ceil() as u32
}

/// Attending physicians: 1 per 20 patients, never fewer than 1 while
/// the ED has any census.
pub fn attending_physicians(patient_count: u32) -> u32 {
    if patient_count == 0 {
        return 0;
    }
    patient_count.div_ceil(20).max(1)
}

/// Resident physicians: 1 per 15 patients.
pub fn resident_physicians(patient_count: u32) -> u32 {
    patient_count.div_ceil(15)
}

/// Administrative clerks: 1 per 50 arrivals/census, never fewer than 1
/// while the ED has any census.
pub fn admin_clerks(census: u32) -> u32 {
    if census == 0 {
        return 0;
    }
    census.div_ceil(50).max(1)
}

/// Full per-role requirement vector for one day-part.
///
/// `total = trauma + non_trauma` drives every ratio except the RN rule,
/// which weighs trauma and non-trauma separately.
pub fn staff_requirements(
    trauma_count: u32,
    non_trauma_count: u32,
    cna_ratio: f64,
    lpn_ratio: f64,
) -> BTreeMap<Role, u32> {
    let total = trauma_count + non_trauma_count;
    let mut requirements = BTreeMap::new();
    requirements.insert(
        Role::RegisteredNurse,
        min_registered_nurses(trauma_count, non_trauma_count),
    );
    requirements.insert(Role::LicensedPracticalNurse, policy_lpns(total, lpn_ratio));
    requirements.insert(Role::CertifiedNursingAssistant, policy_cnas(total, cna_ratio));
    requirements.insert(Role::AttendingPhysician, attending_physicians(total));
    requirements.insert(Role::ResidentPhysician, resident_physicians(total));
    requirements.insert(Role::AdminClerk, admin_clerks(total));
    requirements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rn_rule() {
        assert_eq!(min_registered_nurses(0, 0), 0);
        assert_eq!(min_registered_nurses(3, 0), 3);
        assert_eq!(min_registered_nurses(0, 4), 1);
        assert_eq!(min_registered_nurses(0, 5), 2);
        assert_eq!(min_registered_nurses(2, 9), 5); // 2 + ceil(9/4)=3
    }

    #[test]
    fn test_policy_ratios() {
        assert_eq!(policy_lpns(30, 15.0), 2);
        assert_eq!(policy_lpns(31, 15.0), 3);
        assert_eq!(policy_lpns(30, 0.0), 0);
        assert_eq!(policy_lpns(0, 15.0), 0);
        assert_eq!(policy_cnas(25, 10.0), 3);
        assert_eq!(policy_cnas(25, -1.0), 0);
    }

    #[test]
    fn test_physician_minimums() {
        assert_eq!(attending_physicians(0), 0);
        assert_eq!(attending_physicians(1), 1);
        assert_eq!(attending_physicians(20), 1);
        assert_eq!(attending_physicians(21), 2);
        assert_eq!(attending_physicians(45), 3);
        assert_eq!(resident_physicians(0), 0);
        assert_eq!(resident_physicians(15), 1);
        assert_eq!(resident_physicians(16), 2);
    }

    #[test]
    fn test_admin_minimums() {
        assert_eq!(admin_clerks(0), 0);
        assert_eq!(admin_clerks(10), 1);
        assert_eq!(admin_clerks(50), 1);
        assert_eq!(admin_clerks(51), 2);
    }

    #[test]
    fn test_full_requirement_vector() {
        // 4 trauma + 20 non-trauma = 24 total.
        let reqs = staff_requirements(4, 20, 10.0, 15.0);
        assert_eq!(reqs[&Role::RegisteredNurse], 9); // 4 + ceil(20/4)
        assert_eq!(reqs[&Role::LicensedPracticalNurse], 2); // ceil(24/15)
        assert_eq!(reqs[&Role::CertifiedNursingAssistant], 3); // ceil(24/10)
        assert_eq!(reqs[&Role::AttendingPhysician], 2); // ceil(24/20)
        assert_eq!(reqs[&Role::ResidentPhysician], 2); // ceil(24/15)
        assert_eq!(reqs[&Role::AdminClerk], 1); // max(1, ceil(24/50))
    }

    #[test]
    fn test_empty_census() {
        let reqs = staff_requirements(0, 0, 10.0, 15.0);
        assert!(reqs.values().all(|&count| count == 0));
    }
}
