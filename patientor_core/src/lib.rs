#![forbid(unsafe_code)]

//! Core domain model and business logic for the Patientor record store.
//!
//! This crate provides:
//! - Domain types (patients, journal entries, diagnoses)
//! - Field validators and the entry/patient parsing pipeline
//! - The record store facade and its snapshot persistence
//! - Diagnosis catalog, demo seed data and configuration

pub mod types;
pub mod error;
pub mod validation;
pub mod entry;
pub mod patient;
pub mod ids;
pub mod store;
pub mod state;
pub mod diagnoses;
pub mod seed;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError, ValidationReason, ValidationResult};
pub use types::*;
pub use entry::parse_entry;
pub use patient::parse_new_patient;
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use store::RecordStore;
pub use diagnoses::{build_default_catalog, get_default_catalog, DiagnosisCatalog};
pub use seed::seed_demo_patients;
pub use config::Config;
