//! Patient builder: validation of patient-creation bodies.

use crate::error::ValidationResult;
use crate::types::{Gender, NewPatient};
use crate::validation;
use serde_json::{Map, Value};

/// Parse and validate a raw patient-creation body.
///
/// Fields are checked in wire order and the first failure is returned. The
/// journal is not part of the input; created patients always start empty.
pub fn parse_new_patient(raw: &Value) -> ValidationResult<NewPatient> {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    Ok(NewPatient {
        name: validation::text("name", fields.get("name"))?,
        date_of_birth: validation::optional_date("dateOfBirth", fields.get("dateOfBirth"))?,
        ssn: validation::optional_text("ssn", fields.get("ssn"))?,
        gender: validation::enumerated::<Gender>("gender", fields.get("gender"))?,
        occupation: validation::text("occupation", fields.get("occupation"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationReason;
    use serde_json::json;

    #[test]
    fn test_minimal_patient() {
        let new = parse_new_patient(&json!({
            "name": "Ada",
            "gender": "female",
            "occupation": "engineer"
        }))
        .unwrap();
        assert_eq!(new.name, "Ada");
        assert_eq!(new.gender, Gender::Female);
        assert_eq!(new.occupation, "engineer");
        assert_eq!(new.date_of_birth, None);
        assert_eq!(new.ssn, None);
    }

    #[test]
    fn test_full_patient() {
        let new = parse_new_patient(&json!({
            "name": "John McClane",
            "dateOfBirth": "1986-07-09",
            "ssn": "090786-122X",
            "gender": "male",
            "occupation": "New york city cop",
            "entries": [{"type": "Hospital"}]
        }))
        .unwrap();
        assert_eq!(new.date_of_birth.as_deref(), Some("1986-07-09"));
        assert_eq!(new.ssn.as_deref(), Some("090786-122X"));
    }

    #[test]
    fn test_required_fields_are_named() {
        let complete = json!({"name": "Ada", "gender": "female", "occupation": "engineer"});
        for field in ["name", "gender", "occupation"] {
            let mut raw = complete.clone();
            raw.as_object_mut().unwrap().remove(field);
            let err = parse_new_patient(&raw).unwrap_err();
            assert_eq!(err.field, field);
            assert_eq!(err.reason, ValidationReason::IncorrectOrMissing);
        }
    }

    #[test]
    fn test_gender_outside_set() {
        let err = parse_new_patient(&json!({
            "name": "Ada",
            "gender": "unknown",
            "occupation": "engineer"
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "incorrect or missing gender");
    }

    #[test]
    fn test_bad_date_of_birth() {
        let err = parse_new_patient(&json!({
            "name": "Ada",
            "dateOfBirth": "1815-13-10",
            "gender": "female",
            "occupation": "engineer"
        }))
        .unwrap_err();
        assert_eq!(err.field, "dateOfBirth");
    }

    #[test]
    fn test_blank_date_of_birth_is_absent() {
        let new = parse_new_patient(&json!({
            "name": "Ada",
            "dateOfBirth": "  ",
            "ssn": null,
            "gender": "female",
            "occupation": "engineer"
        }))
        .unwrap();
        assert_eq!(new.date_of_birth, None);
        assert_eq!(new.ssn, None);
    }

    #[test]
    fn test_non_text_ssn() {
        let err = parse_new_patient(&json!({
            "name": "Ada",
            "ssn": 12345,
            "gender": "female",
            "occupation": "engineer"
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "incorrect ssn");
    }

    #[test]
    fn test_non_object_body() {
        let err = parse_new_patient(&json!(null)).unwrap_err();
        assert_eq!(err.field, "name");
    }
}
