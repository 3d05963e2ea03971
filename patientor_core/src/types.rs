//! Core domain types for the Patientor record store.
//!
//! This module defines the fundamental types used throughout the system:
//! - Patients and the creation/summary views of them
//! - Journal entries, a tagged union over three clinical visit kinds
//! - Diagnosis reference data
//!
//! Serialized field names follow the JSON wire format (`dateOfBirth`,
//! `healthCheckRating`, ...). Optional fields are omitted rather than
//! written as `null`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Patient Types
// ============================================================================

/// Administrative gender as recorded on the patient
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient and their journal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    pub gender: Gender,
    pub occupation: String,
    /// Append-only, insertion order is journal order
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Patient {
    /// Build a patient from validated input with an empty journal
    pub fn new(id: String, new: NewPatient) -> Self {
        Self {
            id,
            name: new.name,
            date_of_birth: new.date_of_birth,
            ssn: new.ssn,
            gender: new.gender,
            occupation: new.occupation,
            entries: Vec::new(),
        }
    }

    pub fn summary(&self) -> PatientSummary {
        PatientSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            date_of_birth: self.date_of_birth.clone(),
            ssn: self.ssn.clone(),
            gender: self.gender,
            occupation: self.occupation.clone(),
        }
    }
}

/// Listing view of a patient (no journal)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    pub gender: Gender,
    pub occupation: String,
}

/// Validated patient-creation input (no id, no entries)
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    pub gender: Gender,
    pub occupation: String,
}

// ============================================================================
// Entry Types
// ============================================================================

/// Discriminator of the entry union, as carried in the `type` field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    HealthCheck,
    OccupationalHealthcare,
    Hospital,
}

impl EntryKind {
    pub const ALL: [EntryKind; 3] = [
        EntryKind::HealthCheck,
        EntryKind::OccupationalHealthcare,
        EntryKind::Hospital,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::HealthCheck => "HealthCheck",
            EntryKind::OccupationalHealthcare => "OccupationalHealthcare",
            EntryKind::Hospital => "Hospital",
        }
    }
}

impl FromStr for EntryKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by every entry kind
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BaseEntry {
    pub id: String,
    pub date: String,
    pub description: String,
    pub specialist: String,
    /// Never absent once stored; empty when the input carried none
    #[serde(default)]
    pub diagnosis_codes: Vec<String>,
}

/// Result of a general health check, 0 = healthy ... 3 = critical
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub enum HealthCheckRating {
    Healthy = 0,
    LowRisk = 1,
    HighRisk = 2,
    CriticalRisk = 3,
}

impl TryFrom<u8> for HealthCheckRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HealthCheckRating::Healthy),
            1 => Ok(HealthCheckRating::LowRisk),
            2 => Ok(HealthCheckRating::HighRisk),
            3 => Ok(HealthCheckRating::CriticalRisk),
            other => Err(format!("health check rating {} is out of range 0..=3", other)),
        }
    }
}

impl From<HealthCheckRating> for u8 {
    fn from(rating: HealthCheckRating) -> Self {
        rating as u8
    }
}

/// Sick leave granted at an occupational visit
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SickLeave {
    pub start_date: String,
    pub end_date: String,
}

/// Hospital discharge details
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Discharge {
    pub date: String,
    pub criteria: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckEntry {
    #[serde(flatten)]
    pub base: BaseEntry,
    pub health_check_rating: HealthCheckRating,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OccupationalHealthcareEntry {
    #[serde(flatten)]
    pub base: BaseEntry,
    pub employer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sick_leave: Option<SickLeave>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HospitalEntry {
    #[serde(flatten)]
    pub base: BaseEntry,
    pub discharge: Discharge,
}

/// One journal record, tagged on the `type` field
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Entry {
    HealthCheck(HealthCheckEntry),
    OccupationalHealthcare(OccupationalHealthcareEntry),
    Hospital(HospitalEntry),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::HealthCheck(_) => EntryKind::HealthCheck,
            Entry::OccupationalHealthcare(_) => EntryKind::OccupationalHealthcare,
            Entry::Hospital(_) => EntryKind::Hospital,
        }
    }

    pub fn base(&self) -> &BaseEntry {
        match self {
            Entry::HealthCheck(e) => &e.base,
            Entry::OccupationalHealthcare(e) => &e.base,
            Entry::Hospital(e) => &e.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }
}

// ============================================================================
// Diagnosis Type
// ============================================================================

/// Reference diagnosis (ICD-10 code), read-only
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnosis {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> BaseEntry {
        BaseEntry {
            id: "e1".into(),
            date: "2024-05-01".into(),
            description: "x".into(),
            specialist: "Dr. Y".into(),
            diagnosis_codes: vec![],
        }
    }

    #[test]
    fn test_entry_serializes_with_type_tag() {
        let entry = Entry::HealthCheck(HealthCheckEntry {
            base: base(),
            health_check_rating: HealthCheckRating::HighRisk,
        });
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "HealthCheck",
                "id": "e1",
                "date": "2024-05-01",
                "description": "x",
                "specialist": "Dr. Y",
                "diagnosisCodes": [],
                "healthCheckRating": 2
            })
        );
    }

    #[test]
    fn test_absent_sick_leave_is_omitted() {
        let entry = Entry::OccupationalHealthcare(OccupationalHealthcareEntry {
            base: base(),
            employer_name: "ACME".into(),
            sick_leave: None,
        });
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("sickLeave").is_none());
        assert_eq!(value["employerName"], "ACME");
    }

    #[test]
    fn test_hospital_entry_deserializes() {
        let value = json!({
            "type": "Hospital",
            "id": "e9",
            "date": "2015-01-02",
            "description": "Healing",
            "specialist": "MD House",
            "diagnosisCodes": ["S62.5"],
            "discharge": {"date": "2015-01-16", "criteria": "Thumb has healed."}
        });
        let entry: Entry = serde_json::from_value(value).unwrap();
        assert_eq!(entry.kind(), EntryKind::Hospital);
        assert_eq!(entry.base().diagnosis_codes, vec!["S62.5".to_string()]);
    }

    #[test]
    fn test_rating_out_of_range_fails_to_deserialize() {
        let result: Result<HealthCheckRating, _> = serde_json::from_value(json!(4));
        assert!(result.is_err());
    }

    #[test]
    fn test_gender_parse_is_exact() {
        assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
        assert!("Female".parse::<Gender>().is_err());
        assert!("".parse::<Gender>().is_err());
    }

    #[test]
    fn test_patient_optional_fields_omitted() {
        let patient = Patient {
            id: "p1".into(),
            name: "Ada".into(),
            date_of_birth: None,
            ssn: None,
            gender: Gender::Female,
            occupation: "engineer".into(),
            entries: vec![],
        };
        let value = serde_json::to_value(&patient).unwrap();
        assert!(value.get("dateOfBirth").is_none());
        assert!(value.get("ssn").is_none());
        assert_eq!(value["entries"], json!([]));
    }
}
