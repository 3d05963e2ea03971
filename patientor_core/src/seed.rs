//! Demo patients for a fresh store.
//!
//! Seed records go through the same validation pipeline as any request body.

use crate::{RecordStore, Result};
use serde_json::{json, Value};

/// Demo patients with their journals, as raw request bodies
fn demo_records() -> Vec<(Value, Vec<Value>)> {
    vec![
        (
            json!({
                "name": "John McClane",
                "dateOfBirth": "1986-07-09",
                "ssn": "090786-122X",
                "gender": "male",
                "occupation": "New york city cop"
            }),
            vec![json!({
                "type": "Hospital",
                "date": "2015-01-02",
                "specialist": "MD House",
                "diagnosisCodes": ["S62.5"],
                "description": "Healing time appr. 2 weeks. patient doesn't remember how he got the injury.",
                "discharge": {"date": "2015-01-16", "criteria": "Thumb has healed."}
            })],
        ),
        (
            json!({
                "name": "Martin Riggs",
                "dateOfBirth": "1979-01-30",
                "ssn": "300179-77A",
                "gender": "male",
                "occupation": "Cop"
            }),
            vec![json!({
                "type": "OccupationalHealthcare",
                "date": "2019-08-05",
                "specialist": "MD House",
                "employerName": "HyPD",
                "diagnosisCodes": ["Z57.1", "Z74.3", "M51.2"],
                "description": "Patient mistakenly found himself in a nuclear plant waste site without protection gear. Very minor radiation poisoning.",
                "sickLeave": {"startDate": "2019-08-05", "endDate": "2019-08-28"}
            })],
        ),
        (
            json!({
                "name": "Hans Gruber",
                "dateOfBirth": "1970-04-25",
                "ssn": "250470-555L",
                "gender": "other",
                "occupation": "Technician"
            }),
            vec![],
        ),
        (
            json!({
                "name": "Dana Scully",
                "dateOfBirth": "1974-01-05",
                "ssn": "050174-432N",
                "gender": "female",
                "occupation": "Forensic Pathologist"
            }),
            vec![
                json!({
                    "type": "HealthCheck",
                    "date": "2018-10-05",
                    "specialist": "MD House",
                    "description": "Yearly control visit. Due to high cholesterol levels recommended to eat more vegetables.",
                    "healthCheckRating": 1
                }),
                json!({
                    "type": "OccupationalHealthcare",
                    "date": "2019-09-10",
                    "specialist": "MD House",
                    "employerName": "FBI",
                    "description": "Prescriptions renewed."
                }),
                json!({
                    "type": "HealthCheck",
                    "date": "2019-10-20",
                    "specialist": "MD House",
                    "description": "Yearly control visit. Cholesterol levels back to normal.",
                    "healthCheckRating": 0
                }),
            ],
        ),
        (
            json!({
                "name": "Matti Luukkainen",
                "dateOfBirth": "1971-04-09",
                "ssn": "090471-8890",
                "gender": "male",
                "occupation": "Digital evangelist"
            }),
            vec![json!({
                "type": "OccupationalHealthcare",
                "date": "2019-05-01",
                "specialist": "Dr Byte House",
                "employerName": "University of Helsinki",
                "diagnosisCodes": ["H54.7"],
                "description": "Digital overdose, very bytestatic. Otherwise healthy."
            })],
        ),
    ]
}

/// Insert the demo patients into an empty store
///
/// Returns the number of patients added; a store that already has patients is
/// left untouched and 0 is returned.
pub fn seed_demo_patients(store: &mut RecordStore) -> Result<usize> {
    if !store.is_empty() {
        tracing::info!(
            "Store already holds {} patients, skipping demo seed",
            store.len()
        );
        return Ok(0);
    }

    let records = demo_records();
    let count = records.len();
    for (patient, entries) in records {
        let id = store.register_patient(&patient)?.id.clone();
        for entry in &entries {
            store.submit_entry(&id, entry)?;
        }
    }

    tracing::info!("Seeded {} demo patients", count);
    Ok(count)
}
