//! Emergency-department state.
//!
//! Holds the bounded waiting queue (a min-heap on triage priority with
//! FIFO tie-break), the treatment-room counter, and the pooled staff
//! counters used to gate treatment starts. Counter mutations saturate
//! at their bounds; an invalid increment or decrement is ignored rather
//! than panicking mid-simulation.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::models::{Patient, Role, RoleClass};

/// Runtime staff pools that gate treatment starts.
///
/// Coarser than scheduling classes: the nurse pool aggregates every
/// nurse-class role, while only attending and resident physicians are
/// pooled. Surgeons and cardiologists do not gate treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffGroup {
    /// All nurse-class roles, treated interchangeably.
    Nurses,
    /// Attending physicians.
    Physicians,
    /// Resident physicians.
    Residents,
}

impl StaffGroup {
    /// The three pooled groups.
    pub const ALL: [StaffGroup; 3] = [
        StaffGroup::Nurses,
        StaffGroup::Physicians,
        StaffGroup::Residents,
    ];
}

/// Pooled staff counters.
///
/// Values are `f64` because configured per-triage requirements are
/// fractional (e.g. 1.5 nurses for an orange patient).
#[derive(Debug, Clone, Default)]
pub struct StaffPool {
    available: [f64; 3],
    initial: [f64; 3],
}

impl StaffPool {
    /// Builds the pool from configured role headcounts.
    pub fn from_counts<'a, I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (&'a Role, &'a u32)>,
    {
        let mut initial = [0.0; 3];
        for (role, count) in counts {
            match role {
                r if r.class() == RoleClass::Nurse => initial[0] += *count as f64,
                Role::AttendingPhysician => initial[1] += *count as f64,
                Role::ResidentPhysician => initial[2] += *count as f64,
                _ => {}
            }
        }
        Self {
            available: initial,
            initial,
        }
    }

    fn index(group: StaffGroup) -> usize {
        match group {
            StaffGroup::Nurses => 0,
            StaffGroup::Physicians => 1,
            StaffGroup::Residents => 2,
        }
    }

    /// Currently available headcount in a group.
    pub fn available(&self, group: StaffGroup) -> f64 {
        self.available[Self::index(group)]
    }

    /// Initial (total) headcount in a group.
    pub fn initial(&self, group: StaffGroup) -> f64 {
        self.initial[Self::index(group)]
    }

    /// Removes `n` staff from the pool; clamps at zero.
    pub fn occupy(&mut self, group: StaffGroup, n: f64) {
        let i = Self::index(group);
        self.available[i] = (self.available[i] - n).max(0.0);
    }

    /// Returns `n` staff to the pool; clamps at the initial total.
    pub fn free(&mut self, group: StaffGroup, n: f64) {
        let i = Self::index(group);
        self.available[i] = (self.available[i] + n).min(self.initial[i]);
    }
}

#[derive(Debug)]
struct WaitingEntry {
    priority: u8,
    seq: u64,
    patient: Patient,
}

impl PartialEq for WaitingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for WaitingEntry {}

impl Ord for WaitingEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior on (priority, insertion order).
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for WaitingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The ED's mutable state: waiting queue, rooms, staff pools.
#[derive(Debug)]
pub struct EmergencyRoom {
    name: String,
    waiting_capacity: usize,
    waiting: BinaryHeap<WaitingEntry>,
    seq: u64,
    treatment_rooms: u32,
    occupied_rooms: u32,
    staff: StaffPool,
}

impl EmergencyRoom {
    /// Creates an ED with the given capacities and staff pool.
    pub fn new(
        name: impl Into<String>,
        waiting_capacity: usize,
        treatment_rooms: u32,
        staff: StaffPool,
    ) -> Self {
        Self {
            name: name.into(),
            waiting_capacity,
            waiting: BinaryHeap::new(),
            seq: 0,
            treatment_rooms,
            occupied_rooms: 0,
            staff,
        }
    }

    /// ED display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueues a patient iff the waiting room has space.
    ///
    /// Returns `false` without side effects when full.
    pub fn try_admit(&mut self, patient: Patient) -> bool {
        if self.waiting.len() >= self.waiting_capacity {
            return false;
        }
        self.waiting.push(WaitingEntry {
            priority: patient.triage_level.priority(),
            seq: self.seq,
            patient,
        });
        self.seq += 1;
        true
    }

    /// Removes and returns the most urgent waiting patient.
    pub fn next_waiting(&mut self) -> Option<Patient> {
        self.waiting.pop().map(|e| e.patient)
    }

    /// The most urgent waiting patient, without removing it.
    pub fn peek_waiting(&self) -> Option<&Patient> {
        self.waiting.peek().map(|e| &e.patient)
    }

    /// Number of waiting patients.
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// Whether a treatment room is free.
    pub fn has_room(&self) -> bool {
        self.occupied_rooms < self.treatment_rooms
    }

    /// Marks one room occupied; ignored when all rooms are taken.
    pub fn occupy_room(&mut self) {
        if self.occupied_rooms < self.treatment_rooms {
            self.occupied_rooms += 1;
        }
    }

    /// Frees one room; ignored when none are occupied.
    pub fn free_room(&mut self) {
        if self.occupied_rooms > 0 {
            self.occupied_rooms -= 1;
        }
    }

    /// Total treatment rooms.
    pub fn treatment_rooms(&self) -> u32 {
        self.treatment_rooms
    }

    /// Rooms currently free.
    pub fn available_rooms(&self) -> u32 {
        self.treatment_rooms - self.occupied_rooms
    }

    /// The pooled staff counters.
    pub fn staff(&self) -> &StaffPool {
        &self.staff
    }

    /// Removes staff from a pool for a treatment.
    pub fn occupy_staff(&mut self, group: StaffGroup, n: f64) {
        self.staff.occupy(group, n);
    }

    /// Returns staff to a pool after a discharge.
    pub fn free_staff(&mut self, group: StaffGroup, n: f64) {
        self.staff.free(group, n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatientId, TriageLevel};
    use std::collections::BTreeMap;

    fn patient(id: u64, level: TriageLevel) -> Patient {
        Patient::new(PatientId(id), 40, level, 60)
    }

    fn empty_pool() -> StaffPool {
        StaffPool::from_counts(&BTreeMap::new())
    }

    #[test]
    fn test_admit_up_to_capacity() {
        let mut er = EmergencyRoom::new("ED", 2, 1, empty_pool());
        assert!(er.try_admit(patient(1, TriageLevel::Green)));
        assert!(er.try_admit(patient(2, TriageLevel::Green)));
        assert!(!er.try_admit(patient(3, TriageLevel::Red)));
        assert_eq!(er.waiting_len(), 2);
    }

    #[test]
    fn test_priority_ordering() {
        let mut er = EmergencyRoom::new("ED", 10, 1, empty_pool());
        er.try_admit(patient(1, TriageLevel::Blue));
        er.try_admit(patient(2, TriageLevel::Red));
        er.try_admit(patient(3, TriageLevel::Yellow));

        assert_eq!(er.next_waiting().unwrap().id, PatientId(2));
        assert_eq!(er.next_waiting().unwrap().id, PatientId(3));
        assert_eq!(er.next_waiting().unwrap().id, PatientId(1));
        assert!(er.next_waiting().is_none());
    }

    #[test]
    fn test_fifo_within_priority() {
        let mut er = EmergencyRoom::new("ED", 10, 1, empty_pool());
        er.try_admit(patient(1, TriageLevel::Green));
        er.try_admit(patient(2, TriageLevel::Green));
        er.try_admit(patient(3, TriageLevel::Green));

        assert_eq!(er.next_waiting().unwrap().id, PatientId(1));
        assert_eq!(er.next_waiting().unwrap().id, PatientId(2));
        assert_eq!(er.next_waiting().unwrap().id, PatientId(3));
    }

    #[test]
    fn test_peek_is_non_destructive() {
        let mut er = EmergencyRoom::new("ED", 10, 1, empty_pool());
        er.try_admit(patient(1, TriageLevel::Orange));
        assert_eq!(er.peek_waiting().unwrap().id, PatientId(1));
        assert_eq!(er.waiting_len(), 1);
    }

    #[test]
    fn test_room_counters_saturate() {
        let mut er = EmergencyRoom::new("ED", 10, 2, empty_pool());
        assert!(er.has_room());
        er.occupy_room();
        er.occupy_room();
        assert!(!er.has_room());
        er.occupy_room(); // Ignored at the bound
        assert_eq!(er.available_rooms(), 0);
        er.free_room();
        er.free_room();
        er.free_room(); // Ignored at the bound
        assert_eq!(er.available_rooms(), 2);
    }

    #[test]
    fn test_pool_aggregation_by_class() {
        let mut counts = BTreeMap::new();
        counts.insert(Role::RegisteredNurse, 5);
        counts.insert(Role::LicensedPracticalNurse, 2);
        counts.insert(Role::NursePractitioner, 1);
        counts.insert(Role::AttendingPhysician, 3);
        counts.insert(Role::ResidentPhysician, 4);
        counts.insert(Role::Surgeon, 2); // Not pooled
        counts.insert(Role::AdminClerk, 2); // Not pooled
        let pool = StaffPool::from_counts(&counts);

        assert_eq!(pool.available(StaffGroup::Nurses), 8.0);
        assert_eq!(pool.available(StaffGroup::Physicians), 3.0);
        assert_eq!(pool.available(StaffGroup::Residents), 4.0);
    }

    #[test]
    fn test_occupy_free_round_trip() {
        let mut counts = BTreeMap::new();
        counts.insert(Role::RegisteredNurse, 4);
        let mut pool = StaffPool::from_counts(&counts);

        pool.occupy(StaffGroup::Nurses, 1.5);
        assert_eq!(pool.available(StaffGroup::Nurses), 2.5);
        pool.free(StaffGroup::Nurses, 1.5);
        assert_eq!(pool.available(StaffGroup::Nurses), 4.0);
    }

    #[test]
    fn test_pool_clamps_at_bounds() {
        let mut counts = BTreeMap::new();
        counts.insert(Role::ResidentPhysician, 2);
        let mut pool = StaffPool::from_counts(&counts);

        pool.occupy(StaffGroup::Residents, 5.0);
        assert_eq!(pool.available(StaffGroup::Residents), 0.0);
        pool.free(StaffGroup::Residents, 10.0);
        assert_eq!(pool.available(StaffGroup::Residents), 2.0);
    }
}
