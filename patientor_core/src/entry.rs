//! Entry dispatcher and variant parsers.
//!
//! [`parse_entry`] turns an untyped request body into one of the three entry
//! kinds:
//! 1. The `type` tag is resolved to an [`EntryKind`]
//! 2. Fields common to every kind are validated
//! 3. The matching variant parser validates its own fields and assigns a
//!    fresh identifier
//!
//! Common-field errors are therefore always reported before variant errors.

use crate::error::{ValidationError, ValidationReason, ValidationResult};
use crate::ids::IdGenerator;
use crate::types::{
    BaseEntry, Discharge, Entry, EntryKind, HealthCheckEntry, HospitalEntry,
    OccupationalHealthcareEntry, SickLeave,
};
use crate::validation;
use serde_json::{Map, Value};

type Fields = Map<String, Value>;

/// Fields shared by all entry kinds, validated but not yet identified
#[derive(Clone, Debug, PartialEq)]
pub struct CommonFields {
    pub date: String,
    pub description: String,
    pub specialist: String,
    pub diagnosis_codes: Vec<String>,
}

impl CommonFields {
    fn into_base(self, id: String) -> BaseEntry {
        BaseEntry {
            id,
            date: self.date,
            description: self.description,
            specialist: self.specialist,
            diagnosis_codes: self.diagnosis_codes,
        }
    }
}

/// Parse and validate a raw entry body, assigning it a new identifier.
pub fn parse_entry(raw: &Value, ids: &dyn IdGenerator) -> ValidationResult<Entry> {
    let empty = Fields::new();
    let fields = raw.as_object().unwrap_or(&empty);

    let kind = parse_kind(fields)?;
    let common = parse_common(fields)?;

    // Every entry kind is dispatched here and nowhere else.
    let entry = match kind {
        EntryKind::HealthCheck => Entry::HealthCheck(parse_health_check(common, fields, ids)?),
        EntryKind::OccupationalHealthcare => {
            Entry::OccupationalHealthcare(parse_occupational(common, fields, ids)?)
        }
        EntryKind::Hospital => Entry::Hospital(parse_hospital(common, fields, ids)?),
    };
    Ok(entry)
}

fn parse_kind(fields: &Fields) -> ValidationResult<EntryKind> {
    fields
        .get("type")
        .and_then(Value::as_str)
        .and_then(|tag| tag.parse::<EntryKind>().ok())
        .ok_or_else(|| ValidationError::new("type", ValidationReason::UnknownEntryType))
}

/// Validate the fields every entry kind carries
pub fn parse_common(fields: &Fields) -> ValidationResult<CommonFields> {
    Ok(CommonFields {
        date: validation::date("date", fields.get("date"))?,
        description: validation::text("description", fields.get("description"))?,
        specialist: validation::text("specialist", fields.get("specialist"))?,
        diagnosis_codes: validation::diagnosis_codes(
            "diagnosisCodes",
            fields.get("diagnosisCodes"),
        )?,
    })
}

// ============================================================================
// Variant Parsers
// ============================================================================

pub fn parse_health_check(
    common: CommonFields,
    fields: &Fields,
    ids: &dyn IdGenerator,
) -> ValidationResult<HealthCheckEntry> {
    let health_check_rating =
        validation::health_check_rating("healthCheckRating", fields.get("healthCheckRating"))?;

    Ok(HealthCheckEntry {
        base: common.into_base(ids.new_id()),
        health_check_rating,
    })
}

pub fn parse_occupational(
    common: CommonFields,
    fields: &Fields,
    ids: &dyn IdGenerator,
) -> ValidationResult<OccupationalHealthcareEntry> {
    let employer_name = validation::text("employerName", fields.get("employerName"))?;
    let sick_leave = parse_sick_leave(fields.get("sickLeave"))?;

    Ok(OccupationalHealthcareEntry {
        base: common.into_base(ids.new_id()),
        employer_name,
        sick_leave,
    })
}

/// A sick leave group lacking either date is dropped without error, while a
/// complete group with a malformed date is rejected. Start and end are not
/// compared.
fn parse_sick_leave(value: Option<&Value>) -> ValidationResult<Option<SickLeave>> {
    let Some(leave) = value.and_then(Value::as_object) else {
        return Ok(None);
    };
    let start = leave.get("startDate");
    let end = leave.get("endDate");
    if !validation::is_supplied(start) || !validation::is_supplied(end) {
        return Ok(None);
    }

    Ok(Some(SickLeave {
        start_date: validation::date("sickLeave.startDate", start)?,
        end_date: validation::date("sickLeave.endDate", end)?,
    }))
}

pub fn parse_hospital(
    common: CommonFields,
    fields: &Fields,
    ids: &dyn IdGenerator,
) -> ValidationResult<HospitalEntry> {
    let missing =
        || ValidationError::new("discharge", ValidationReason::MissingDischargeInformation);

    let discharge = fields
        .get("discharge")
        .filter(|d| validation::is_supplied(Some(*d)))
        .ok_or_else(missing)?;
    let date = discharge.get("date");
    let criteria = discharge.get("criteria");
    if !validation::is_supplied(date) || !validation::is_supplied(criteria) {
        return Err(missing());
    }

    let discharge = Discharge {
        date: validation::date("discharge.date", date)?,
        criteria: validation::text("discharge.criteria", criteria)?,
    };

    Ok(HospitalEntry {
        base: common.into_base(ids.new_id()),
        discharge,
    })
}
