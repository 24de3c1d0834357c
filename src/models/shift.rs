//! Shift catalog for the roster optimizer.
//!
//! A [`ShiftKind`] is a fixed shape (length, default start hour, off
//! flag); a [`ShiftDefinition`] pairs one kind with the short
//! identifier the optimizer uses for it. Coverage between shifts is
//! interval containment: a 12-hour day shift covers an 8-hour day
//! demand that starts inside it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed catalog of shift shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftKind {
    /// 8-hour day shift.
    Day8,
    /// 8-hour evening shift.
    Evening8,
    /// 8-hour night shift.
    Night8,
    /// 10-hour day shift.
    Day10,
    /// 10-hour evening shift.
    Evening10,
    /// 10-hour night shift.
    Night10,
    /// 12-hour day shift.
    Day12,
    /// 12-hour night shift.
    Night12,
    /// On-call: zero scheduled hours, still a work shift.
    OnCall,
    /// Day off.
    Free,
}

impl ShiftKind {
    /// Scheduled length in hours.
    pub fn length_hours(self) -> f64 {
        match self {
            ShiftKind::Day8 | ShiftKind::Evening8 | ShiftKind::Night8 => 8.0,
            ShiftKind::Day10 | ShiftKind::Evening10 | ShiftKind::Night10 => 10.0,
            ShiftKind::Day12 | ShiftKind::Night12 => 12.0,
            ShiftKind::OnCall | ShiftKind::Free => 0.0,
        }
    }

    /// Default start hour from midnight.
    pub fn start_hour(self) -> f64 {
        match self {
            ShiftKind::Day8 | ShiftKind::Day10 | ShiftKind::Day12 => 7.0,
            ShiftKind::Evening8 => 15.0,
            ShiftKind::Evening10 => 13.0,
            ShiftKind::Night8 => 23.0,
            ShiftKind::Night10 => 21.0,
            ShiftKind::Night12 => 19.0,
            ShiftKind::OnCall | ShiftKind::Free => 0.0,
        }
    }

    /// Whether this kind represents a day off.
    pub fn is_off(self) -> bool {
        matches!(self, ShiftKind::Free)
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            ShiftKind::Day8 => "Day 8 Hours",
            ShiftKind::Evening8 => "Evening 8 Hours",
            ShiftKind::Night8 => "Night 8 Hours",
            ShiftKind::Day10 => "Day 10 Hours",
            ShiftKind::Evening10 => "Evening 10 Hours",
            ShiftKind::Night10 => "Night 10 Hours",
            ShiftKind::Day12 => "Day 12 Hours",
            ShiftKind::Night12 => "Night 12 Hours",
            ShiftKind::OnCall => "On Call",
            ShiftKind::Free => "Free/Off",
        }
    }
}

/// A shift as the optimizer sees it: short id plus concrete kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    /// Short identifier unique within a problem instance (e.g. `d8`).
    pub id: String,
    /// The concrete shift shape.
    pub kind: ShiftKind,
}

impl ShiftDefinition {
    /// Creates a shift definition.
    pub fn new(id: impl Into<String>, kind: ShiftKind) -> Self {
        Self { id: id.into(), kind }
    }

    /// Scheduled length in hours.
    pub fn length_hours(&self) -> f64 {
        self.kind.length_hours()
    }

    /// Start hour from midnight.
    pub fn start_hour(&self) -> f64 {
        self.kind.start_hour()
    }

    /// Whether this is a day off.
    pub fn is_off(&self) -> bool {
        self.kind.is_off()
    }

    /// Whether this shift's interval fully contains another's on the
    /// same day. Off shifts never cover and are never covered.
    pub fn covers(&self, other: &ShiftDefinition) -> bool {
        if self.is_off() || other.is_off() {
            return false;
        }
        let self_start = self.start_hour();
        let self_end = self_start + self.length_hours();
        let other_start = other.start_hour();
        let other_end = other_start + other.length_hours();
        self_start <= other_start && self_end >= other_end
    }
}

/// An ordered set of shift definitions keyed by id.
///
/// Ordered iteration keeps optimizer variable layout (and therefore
/// solutions) reproducible across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftCatalog {
    shifts: BTreeMap<String, ShiftDefinition>,
}

impl ShiftCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full catalog used by the input factory: all 8/10/12-hour
    /// shapes plus on-call and the off shift.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for (id, kind) in [
            ("d8", ShiftKind::Day8),
            ("e8", ShiftKind::Evening8),
            ("n8", ShiftKind::Night8),
            ("d10", ShiftKind::Day10),
            ("e10", ShiftKind::Evening10),
            ("n10", ShiftKind::Night10),
            ("d12", ShiftKind::Day12),
            ("n12", ShiftKind::Night12),
            ("on_call", ShiftKind::OnCall),
            ("off", ShiftKind::Free),
        ] {
            catalog.insert(ShiftDefinition::new(id, kind));
        }
        catalog
    }

    /// Adds or replaces a definition.
    pub fn insert(&mut self, definition: ShiftDefinition) {
        self.shifts.insert(definition.id.clone(), definition);
    }

    /// Looks up a definition by id.
    pub fn get(&self, id: &str) -> Option<&ShiftDefinition> {
        self.shifts.get(id)
    }

    /// Iterates definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ShiftDefinition> {
        self.shifts.values()
    }

    /// Shift ids in stable order.
    pub fn ids(&self) -> Vec<&str> {
        self.shifts.keys().map(String::as_str).collect()
    }

    /// The id of the first off shift, if the catalog defines one.
    pub fn off_shift_id(&self) -> Option<&str> {
        self.shifts
            .values()
            .find(|s| s.is_off())
            .map(|s| s.id.as_str())
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }
}
