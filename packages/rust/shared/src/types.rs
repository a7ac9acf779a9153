//! Domain types for consultation records and discharge notes.

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Input record
// ---------------------------------------------------------------------------

/// A consultation record as stored in the input JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRecord {
    /// The animal seen during the visit.
    pub patient: Patient,
    /// The visit itself.
    pub consultation: Consultation,
}

/// Patient details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub gender: String,
    /// Absent in the record means not neutered.
    #[serde(default)]
    pub neutered: bool,
    #[serde(deserialize_with = "text_or_number")]
    pub date_of_birth: String,
    /// Free-form, e.g. `"30kg"`; bare numbers are kept as written.
    #[serde(deserialize_with = "text_or_number")]
    pub weight: String,
}

/// A single clinic visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub date: String,
    pub time: String,
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "clinical notes", default)]
    pub clinical_notes: Vec<ClinicalNote>,
    pub treatment_items: TreatmentItems,
}

/// One free-text clinical note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub note: String,
}

/// Treatment items recorded for the visit. Only procedures are rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreatmentItems {
    #[serde(default)]
    pub procedures: Vec<Procedure>,
}

/// A procedure performed during the visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    pub date: String,
    pub time: String,
}

// ---------------------------------------------------------------------------
// Output record
// ---------------------------------------------------------------------------

/// The output file structure: a single `discharge_note` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DischargeNote {
    pub discharge_note: String,
}

impl DischargeNote {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            discharge_note: text.into(),
        }
    }
}

/// Accept either a JSON string or a JSON number, keeping numbers as written.
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}
