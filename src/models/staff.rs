//! Staff roles and members.
//!
//! Roles are grouped into four scheduling classes; each class is
//! rostered by its own optimizer run. The runtime treatment-gating
//! pools are a separate, coarser grouping (see
//! `simulation::emergency_room::StaffGroup`): advanced-practice
//! nurses, surgeons and cardiologists are schedulable but do not feed
//! the treatment pools.

use serde::{Deserialize, Serialize};

/// A hospital staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    RegisteredNurse,
    LicensedPracticalNurse,
    CertifiedNursingAssistant,
    NursePractitioner,
    ClinicalNurseSpecialist,
    CertifiedRegisteredNurseAnesthetist,
    ResidentPhysician,
    AttendingPhysician,
    Surgeon,
    Cardiologist,
    AdminClerk,
}

/// Scheduling class: which optimizer rosters a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleClass {
    /// RN, LPN, CNA, NP, CNS, CRNA.
    Nurse,
    /// Attending physicians, surgeons, cardiologists.
    Attending,
    /// Resident physicians.
    Resident,
    /// Administrative clerks.
    Admin,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 11] = [
        Role::RegisteredNurse,
        Role::LicensedPracticalNurse,
        Role::CertifiedNursingAssistant,
        Role::NursePractitioner,
        Role::ClinicalNurseSpecialist,
        Role::CertifiedRegisteredNurseAnesthetist,
        Role::ResidentPhysician,
        Role::AttendingPhysician,
        Role::Surgeon,
        Role::Cardiologist,
        Role::AdminClerk,
    ];

    /// The scheduling class this role belongs to.
    pub fn class(self) -> RoleClass {
        match self {
            Role::RegisteredNurse
            | Role::LicensedPracticalNurse
            | Role::CertifiedNursingAssistant
            | Role::NursePractitioner
            | Role::ClinicalNurseSpecialist
            | Role::CertifiedRegisteredNurseAnesthetist => RoleClass::Nurse,
            Role::AttendingPhysician | Role::Surgeon | Role::Cardiologist => RoleClass::Attending,
            Role::ResidentPhysician => RoleClass::Resident,
            Role::AdminClerk => RoleClass::Admin,
        }
    }

    /// Short abbreviation for display and staff-id construction.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Role::RegisteredNurse => "RN",
            Role::LicensedPracticalNurse => "LPN",
            Role::CertifiedNursingAssistant => "CNA",
            Role::NursePractitioner => "NP",
            Role::ClinicalNurseSpecialist => "CNS",
            Role::CertifiedRegisteredNurseAnesthetist => "CRNA",
            Role::ResidentPhysician => "MD_RESIDENT",
            Role::AttendingPhysician => "MD_ATTENDING",
            Role::Surgeon => "MD_SURGEON",
            Role::Cardiologist => "MD_CARDIO",
            Role::AdminClerk => "AC",
        }
    }

    /// Configuration key for this role (staff counts, wage tables).
    pub fn config_key(self) -> &'static str {
        match self {
            Role::RegisteredNurse => "REGISTERED_NURSE",
            Role::LicensedPracticalNurse => "LICENSED_PRACTICAL_NURSE",
            Role::CertifiedNursingAssistant => "CERTIFIED_NURSING_ASSISTANT",
            Role::NursePractitioner => "NURSE_PRACTITIONER",
            Role::ClinicalNurseSpecialist => "CLINICAL_NURSE_SPECIALIST",
            Role::CertifiedRegisteredNurseAnesthetist => "CERTIFIED_REGISTERED_NURSE_ANESTHETIST",
            Role::ResidentPhysician => "RESIDENT_PHYSICIAN",
            Role::AttendingPhysician => "ATTENDING_PHYSICIAN",
            Role::Surgeon => "SURGEON",
            Role::Cardiologist => "CARDIOLOGIST",
            Role::AdminClerk => "ADMIN_CLERK",
        }
    }
}

/// A schedulable staff member.
///
/// One record per person; the role discriminator routes the member to
/// the right class optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique identifier within an optimization instance.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role (determines class and demand eligibility).
    pub role: Role,
    /// Regular hourly wage in dollars.
    pub hourly_wage: f64,
    /// Overtime pay multiplier (e.g. 1.5).
    pub overtime_multiplier: f64,
}

impl StaffMember {
    /// Creates a staff member.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        hourly_wage: f64,
        overtime_multiplier: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            hourly_wage,
            overtime_multiplier,
        }
    }

    /// Hourly wage for overtime hours.
    pub fn overtime_wage(&self) -> f64 {
        self.hourly_wage * self.overtime_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_classes() {
        assert_eq!(Role::RegisteredNurse.class(), RoleClass::Nurse);
        assert_eq!(Role::CertifiedRegisteredNurseAnesthetist.class(), RoleClass::Nurse);
        assert_eq!(Role::AttendingPhysician.class(), RoleClass::Attending);
        assert_eq!(Role::Surgeon.class(), RoleClass::Attending);
        assert_eq!(Role::Cardiologist.class(), RoleClass::Attending);
        assert_eq!(Role::ResidentPhysician.class(), RoleClass::Resident);
        assert_eq!(Role::AdminClerk.class(), RoleClass::Admin);
    }

    #[test]
    fn test_all_roles_covered() {
        // Every role maps to exactly one class; counting by class
        // partitions the full role set.
        let nurses = Role::ALL.iter().filter(|r| r.class() == RoleClass::Nurse).count();
        let attendings = Role::ALL.iter().filter(|r| r.class() == RoleClass::Attending).count();
        let residents = Role::ALL.iter().filter(|r| r.class() == RoleClass::Resident).count();
        let admins = Role::ALL.iter().filter(|r| r.class() == RoleClass::Admin).count();
        assert_eq!(nurses, 6);
        assert_eq!(attendings, 3);
        assert_eq!(residents, 1);
        assert_eq!(admins, 1);
        assert_eq!(nurses + attendings + residents + admins, Role::ALL.len());
    }

    #[test]
    fn test_role_serde_names() {
        let json = serde_json::to_string(&Role::RegisteredNurse).unwrap();
        assert_eq!(json, "\"REGISTERED_NURSE\"");
        let parsed: Role = serde_json::from_str("\"ATTENDING_PHYSICIAN\"").unwrap();
        assert_eq!(parsed, Role::AttendingPhysician);
    }

    #[test]
    fn test_overtime_wage() {
        let rn = StaffMember::new("RN_0", "Alice", Role::RegisteredNurse, 30.0, 1.5);
        assert!((rn.overtime_wage() - 45.0).abs() < 1e-10);
    }
}
