//! Record store facade.
//!
//! The store owns the patient list and is the single point of mutation.
//! Mutating operations take `&mut self`, so callers sharing a store across
//! threads must wrap it (e.g. in a `Mutex`) which serializes
//! `create_patient`/`append_entry` and keeps journal order intact.

use crate::entry::parse_entry;
use crate::ids::{IdGenerator, UuidIds};
use crate::patient::parse_new_patient;
use crate::types::{Entry, NewPatient, Patient, PatientSummary};
use crate::{Error, Result};
use serde_json::Value;

/// In-memory collection of patients and their journals
pub struct RecordStore {
    patients: Vec<Patient>,
    ids: Box<dyn IdGenerator>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("patients", &self.patients.len())
            .finish()
    }
}

impl RecordStore {
    /// Empty store issuing UUID identifiers
    pub fn new() -> Self {
        Self::with_id_generator(UuidIds)
    }

    /// Empty store with a custom identifier source
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            patients: Vec::new(),
            ids: Box::new(ids),
        }
    }

    /// Store over an existing, already consistent patient list
    pub fn from_patients(patients: Vec<Patient>, ids: impl IdGenerator + 'static) -> Self {
        Self {
            patients,
            ids: Box::new(ids),
        }
    }

    pub fn id_generator(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Assign an identifier and an empty journal, then add the patient.
    pub fn create_patient(&mut self, new: NewPatient) -> &Patient {
        let patient = Patient::new(self.ids.new_id(), new);
        let index = self.patients.len();
        self.patients.push(patient);
        &self.patients[index]
    }

    /// Append a validated entry to the end of a patient's journal.
    pub fn append_entry(&mut self, patient_id: &str, entry: Entry) -> Result<&Entry> {
        let index = self
            .patients
            .iter()
            .position(|p| p.id == patient_id)
            .ok_or_else(|| Error::not_found(patient_id))?;

        if self.contains_entry(entry.id()) {
            return Err(Error::DuplicateId(entry.id().to_string()));
        }

        let entries = &mut self.patients[index].entries;
        entries.push(entry);
        Ok(&entries[entries.len() - 1])
    }

    pub fn get_patient(&self, id: &str) -> Result<&Patient> {
        self.patients
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found(id))
    }

    /// Listing view, omitting journals
    pub fn list_patients(&self) -> Vec<PatientSummary> {
        self.patients.iter().map(Patient::summary).collect()
    }

    /// Validate a raw patient body and create the patient.
    pub fn register_patient(&mut self, raw: &Value) -> Result<&Patient> {
        let new = parse_new_patient(raw)?;
        Ok(self.create_patient(new))
    }

    /// Validate a raw entry body and append it to an existing patient.
    ///
    /// An unknown patient is reported before any problem with the body.
    pub fn submit_entry(&mut self, patient_id: &str, raw: &Value) -> Result<&Entry> {
        self.get_patient(patient_id)?;
        let entry = parse_entry(raw, self.ids.as_ref())?;
        self.append_entry(patient_id, entry)
    }

    fn contains_entry(&self, entry_id: &str) -> bool {
        self.patients
            .iter()
            .flat_map(|p| p.entries.iter())
            .any(|e| e.id() == entry_id)
    }
}
