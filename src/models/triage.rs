//! Triage levels and classifier variants.
//!
//! A triage level is an ordered clinical urgency tier; lower priority
//! number means more urgent. Three classifier variants map the 17
//! supported diagnosis codes onto levels:
//!
//! | Variant | System |
//! |---------|--------|
//! | CTAS | Canadian Triage and Acuity Scale |
//! | ESI | Emergency Severity Index |
//! | MTS | Manchester Triage System |
//!
//! The mapping tables are fixed constants; the same diagnosis can land
//! on different levels under different systems (e.g. code 2, fever, is
//! CTAS 4 but ESI 3).

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Clinical urgency tier. Lower priority = more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriageLevel {
    /// Immediate (priority 1).
    Red,
    /// Very urgent (priority 2).
    Orange,
    /// Urgent (priority 3).
    Yellow,
    /// Standard (priority 4).
    Green,
    /// Non urgent (priority 5).
    Blue,
}

impl TriageLevel {
    /// All levels in priority order, most urgent first.
    pub const ALL: [TriageLevel; 5] = [
        TriageLevel::Red,
        TriageLevel::Orange,
        TriageLevel::Yellow,
        TriageLevel::Green,
        TriageLevel::Blue,
    ];

    /// Queue priority (1 = most urgent, 5 = least).
    pub fn priority(self) -> u8 {
        match self {
            TriageLevel::Red => 1,
            TriageLevel::Orange => 2,
            TriageLevel::Yellow => 3,
            TriageLevel::Green => 4,
            TriageLevel::Blue => 5,
        }
    }

    /// Human-readable urgency description.
    pub fn description(self) -> &'static str {
        match self {
            TriageLevel::Red => "Immediate",
            TriageLevel::Orange => "Very Urgent",
            TriageLevel::Yellow => "Urgent",
            TriageLevel::Green => "Standard",
            TriageLevel::Blue => "Non Urgent",
        }
    }

    /// One level more urgent; `Red` stays `Red`.
    pub fn escalated(self) -> TriageLevel {
        match self {
            TriageLevel::Blue => TriageLevel::Green,
            TriageLevel::Green => TriageLevel::Yellow,
            TriageLevel::Yellow => TriageLevel::Orange,
            TriageLevel::Orange | TriageLevel::Red => TriageLevel::Red,
        }
    }
}

/// Triage classifier variant selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriageClassifier {
    /// Canadian Triage and Acuity Scale (default).
    #[default]
    Ctas,
    /// Emergency Severity Index.
    Esi,
    /// Manchester Triage System.
    Mts,
}

impl TriageClassifier {
    /// Classifies a diagnosis code (1..=17) into a triage level.
    ///
    /// Codes outside the supported range indicate a defect in the
    /// caller (the diagnosis sampler only produces 1..=17) and fail
    /// with [`EngineError::UnknownDiagnosis`].
    pub fn classify(self, diagnosis_code: u8) -> Result<TriageLevel> {
        let table = match self {
            TriageClassifier::Ctas => &CTAS_TABLE,
            TriageClassifier::Esi => &ESI_TABLE,
            TriageClassifier::Mts => &MTS_TABLE,
        };
        match diagnosis_code {
            1..=17 => Ok(table[(diagnosis_code - 1) as usize]),
            other => Err(EngineError::UnknownDiagnosis(other)),
        }
    }

    /// Parses a variant name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "CTAS" => Some(TriageClassifier::Ctas),
            "ESI" => Some(TriageClassifier::Esi),
            "MTS" => Some(TriageClassifier::Mts),
            _ => None,
        }
    }
}

use TriageLevel::{Blue, Green, Orange, Red, Yellow};

// Diagnosis codes, in table order:
//  1 syncope, 2 fever, 3 shock, 4 nausea/vomiting, 5 dysphagia,
//  6 abdominal pain, 7 malaise/fatigue, 8 mental/substance use,
//  9 abnormal substance findings, 10 nervous system, 11 genitourinary,
// 12 circulatory, 13 respiratory, 14 skin/subcutaneous,
// 15 general sensation/perception, 16 other general signs,
// 17 abnormal findings w/o diagnosis.

const CTAS_TABLE: [TriageLevel; 17] = [
    Yellow, Green, Red, Blue, Orange, Green, Yellow, Yellow, Blue, Yellow, Green, Orange, Orange,
    Green, Blue, Blue, Blue,
];

const ESI_TABLE: [TriageLevel; 17] = [
    Yellow, Yellow, Red, Yellow, Yellow, Yellow, Green, Yellow, Blue, Yellow, Green, Yellow,
    Orange, Blue, Green, Green, Blue,
];

const MTS_TABLE: [TriageLevel; 17] = [
    Yellow, Yellow, Red, Yellow, Yellow, Yellow, Green, Yellow, Blue, Yellow, Green, Yellow,
    Orange, Green, Green, Green, Blue,
];
