//! Record store persistence with file locking.
//!
//! The store is saved as a single JSON snapshot. Writers serialize on an
//! exclusive lock held on a sidecar `.lock` file for the whole
//! load-modify-save cycle, so concurrent processes never lose each other's
//! patients or entries.

use crate::ids::UuidIds;
use crate::types::Patient;
use crate::{Error, RecordStore, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// On-disk snapshot layout
#[derive(Debug, Deserialize)]
struct StoreFile {
    #[serde(default)]
    patients: Vec<Patient>,
}

#[derive(Debug, Serialize)]
struct StoreFileRef<'a> {
    patients: &'a [Patient],
}

/// Sidecar lock path for a store file (`patients.json` -> `patients.json.lock`)
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

impl RecordStore {
    /// Load a store from a snapshot file with shared locking
    ///
    /// Returns an empty store if the file doesn't exist. A file that exists but
    /// cannot be read or parsed is an error: records are never silently dropped.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No store file found at {:?}, starting empty", path);
            return Ok(Self::new());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let parsed: StoreFile = serde_json::from_str(&contents).map_err(|e| {
            Error::State(format!("Failed to parse store file {:?}: {}", path, e))
        })?;

        tracing::debug!(
            "Loaded {} patients from {:?}",
            parsed.patients.len(),
            path
        );
        Ok(Self::from_patients(parsed.patients, UuidIds))
    }

    /// Save the store atomically
    ///
    /// Writes to a temp file in the same directory, syncs it to disk, then
    /// renames it over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(&StoreFileRef {
                patients: self.patients(),
            })?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} patients to {:?}", self.len(), path);
        Ok(())
    }

    /// Load the store, modify it, and save it back under an exclusive lock
    ///
    /// The store is only written when `f` succeeds.
    pub fn update<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut RecordStore) -> Result<T>,
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path(path))?;
        lock.lock_exclusive()?;

        let outcome = Self::load(path).and_then(|mut store| {
            let value = f(&mut store)?;
            store.save(path)?;
            Ok(value)
        });

        lock.unlock()?;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entry;
    use serde_json::json;

    fn seed(store: &mut RecordStore) -> String {
        let id = store
            .register_patient(&json!({
                "name": "Dana Scully",
                "dateOfBirth": "1974-01-05",
                "gender": "female",
                "occupation": "Forensic Pathologist"
            }))
            .unwrap()
            .id
            .clone();
        store
            .submit_entry(
                &id,
                &json!({
                    "type": "OccupationalHealthcare",
                    "date": "2019-09-10",
                    "description": "Prescriptions renewed.",
                    "specialist": "MD House",
                    "employerName": "FBI"
                }),
            )
            .unwrap();
        store
            .submit_entry(
                &id,
                &json!({
                    "type": "HealthCheck",
                    "date": "2019-10-20",
                    "description": "Yearly control visit.",
                    "specialist": "MD House",
                    "diagnosisCodes": ["E78.0"],
                    "healthCheckRating": 0
                }),
            )
            .unwrap();
        id
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("patients.json");

        let mut store = RecordStore::new();
        let id = seed(&mut store);
        store.save(&path).unwrap();

        let loaded = RecordStore::load(&path).unwrap();
        assert_eq!(loaded.patients(), store.patients());

        let patient = loaded.get_patient(&id).unwrap();
        assert_eq!(patient.entries.len(), 2);
        assert!(matches!(patient.entries[0], Entry::OccupationalHealthcare(_)));
        assert!(matches!(patient.entries[1], Entry::HealthCheck(_)));
    }

    #[test]
    fn test_absent_optionals_are_not_written_as_null() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("patients.json");

        let mut store = RecordStore::new();
        seed(&mut store);
        store.save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("null"));
        assert!(!contents.contains("ssn"));
        assert!(!contents.contains("sickLeave"));
        assert!(contents.contains("\"diagnosisCodes\": []"));
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = RecordStore::load(&temp_dir.path().join("nope.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupted_store_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("patients.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let result = RecordStore::load(&path);
        assert!(matches!(result, Err(Error::State(_))));
    }

    #[test]
    fn test_update_persists_changes() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("data").join("patients.json");

        let id = RecordStore::update(&path, |store| Ok(seed(store))).unwrap();

        let loaded = RecordStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get_patient(&id).unwrap().entries.len(), 2);
    }

    #[test]
    fn test_failed_update_is_not_saved() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("patients.json");

        let result = RecordStore::update(&path, |store| {
            store.register_patient(&json!({"name": "Ada"}))?;
            Ok(())
        });
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("patients.json");

        RecordStore::new().save(&path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "patients.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only patients.json, found extras: {:?}",
            extras
        );
    }

    #[test]
    fn test_lock_path() {
        assert_eq!(
            lock_path(Path::new("/tmp/x/patients.json")),
            PathBuf::from("/tmp/x/patients.json.lock")
        );
    }
}
