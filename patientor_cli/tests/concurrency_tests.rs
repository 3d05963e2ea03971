//! Concurrency tests for patientor.
//!
//! These tests verify that multiple processes can safely:
//! - Create patients simultaneously (store file locking)
//! - Append entries to the same patient without losing any
//! - Read the store while writers are active

use assert_cmd::Command;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("patientor").expect("Failed to find patientor binary");
    cmd.arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn list_patients(dir: &Path) -> Vec<Value> {
    let output = cli(dir).arg("patients").output().unwrap();
    assert!(output.status.success());
    let listing: Value = serde_json::from_slice(&output.stdout).unwrap();
    listing.as_array().unwrap().clone()
}

#[test]
fn test_concurrent_patient_creation() {
    let temp_dir = setup_test_dir();
    let dir: PathBuf = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dir = dir.clone();
            thread::spawn(move || {
                let body = format!(
                    r#"{{"name":"Patient {}","gender":"other","occupation":"tester"}}"#,
                    i
                );
                cli(&dir)
                    .arg("add-patient")
                    .arg("--json")
                    .arg(body)
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    let patients = list_patients(&dir);
    assert_eq!(patients.len(), 8, "Expected 8 patients, got {}", patients.len());

    let mut ids: Vec<_> = patients
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8, "Patient ids must be unique");
}

#[test]
fn test_concurrent_entries_for_one_patient() {
    let temp_dir = setup_test_dir();
    let dir: PathBuf = temp_dir.path().to_path_buf();

    let output = cli(&dir)
        .arg("add-patient")
        .arg("--json")
        .arg(r#"{"name":"Ada","gender":"female","occupation":"engineer"}"#)
        .output()
        .unwrap();
    let patient: Value = serde_json::from_slice(&output.stdout).unwrap();
    let patient_id = patient["id"].as_str().unwrap().to_string();

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let dir = dir.clone();
            let patient_id = patient_id.clone();
            thread::spawn(move || {
                let body = format!(
                    r#"{{"type":"HealthCheck","date":"2024-03-0{}","description":"visit {}",
                        "specialist":"Dr. Z","healthCheckRating":{}}}"#,
                    i + 1,
                    i,
                    i % 4
                );
                cli(&dir)
                    .arg("add-entry")
                    .arg(&patient_id)
                    .arg("--json")
                    .arg(body)
                    .assert()
                    .success();
            })
        })
        .collect();

    // Readers can read at any time
    for _ in 0..3 {
        list_patients(&dir);
    }

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    let output = cli(&dir).arg("patient").arg(&patient_id).output().unwrap();
    let stored: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stored["entries"].as_array().unwrap().len(), 6);
}
