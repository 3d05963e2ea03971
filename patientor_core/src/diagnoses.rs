//! Diagnosis catalog.
//!
//! Read-only reference mapping from ICD-10 code to a descriptive name. Used for
//! display only; entry validation never consults it.

use crate::types::Diagnosis;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<DiagnosisCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static DiagnosisCatalog {
    &DEFAULT_CATALOG
}

/// Diagnoses keyed by code, iterated in code order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosisCatalog {
    diagnoses: BTreeMap<String, Diagnosis>,
}

impl DiagnosisCatalog {
    pub fn new(diagnoses: impl IntoIterator<Item = Diagnosis>) -> Self {
        Self {
            diagnoses: diagnoses
                .into_iter()
                .map(|d| (d.code.clone(), d))
                .collect(),
        }
    }

    pub fn lookup(&self, code: &str) -> Option<&Diagnosis> {
        self.diagnoses.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnosis> {
        self.diagnoses.values()
    }

    pub fn len(&self) -> usize {
        self.diagnoses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnoses.is_empty()
    }

    /// Copy of this catalog with extra diagnoses; same code replaces the built-in
    pub fn with_custom(&self, custom: &[Diagnosis]) -> Self {
        let mut merged = self.clone();
        for diagnosis in custom {
            merged
                .diagnoses
                .insert(diagnosis.code.clone(), diagnosis.clone());
        }
        merged
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (code, diagnosis) in &self.diagnoses {
            if code.trim().is_empty() || diagnosis.code.trim().is_empty() {
                errors.push("Diagnosis has empty code".to_string());
            }
            if code != &diagnosis.code {
                errors.push(format!(
                    "Diagnosis key '{}' doesn't match diagnosis.code '{}'",
                    code, diagnosis.code
                ));
            }
            if diagnosis.name.trim().is_empty() {
                errors.push(format!("Diagnosis '{}' has empty name", code));
            }
        }

        errors
    }
}

fn diagnosis(code: &str, name: &str, latin: Option<&str>) -> Diagnosis {
    Diagnosis {
        code: code.into(),
        name: name.into(),
        latin: latin.map(Into::into),
    }
}

/// Builds the default catalog of ICD-10 diagnoses
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference.
pub fn build_default_catalog() -> DiagnosisCatalog {
    DiagnosisCatalog::new([
        diagnosis("M24.2", "Disorder of ligament", Some("Morbositas ligamenti")),
        diagnosis(
            "M51.2",
            "Other specified intervertebral disc displacement",
            Some("Alia dislocatio disci intervertebralis specificata"),
        ),
        diagnosis(
            "S03.5",
            "Sprain and strain of joints and ligaments of other and unspecified parts of head",
            Some("Distorsio et/sive distensio articulationum et/sive ligamentorum partium aliarum sive non specificatarum capitis"),
        ),
        diagnosis(
            "J10.1",
            "Influenza with other respiratory manifestations, other influenza virus identified",
            Some("Influenza cum aliis manifestationibus respiratoriis ab agente virali identificato"),
        ),
        diagnosis(
            "J06.9",
            "Acute upper respiratory infection, unspecified",
            Some("Infectio acuta respiratoria superior non specificata"),
        ),
        diagnosis("Z57.1", "Occupational exposure to radiation", None),
        diagnosis("N30.0", "Acute cystitis", Some("Cystitis acuta")),
        diagnosis("H54.7", "Unspecified visual loss", Some("Amblyopia NAS")),
        diagnosis(
            "J03.0",
            "Streptococcal tonsillitis",
            Some("Tonsillitis (palatina) streptococcica"),
        ),
        diagnosis("L60.1", "Onycholysis", Some("Onycholysis")),
        diagnosis("Z74.3", "Need for continuous supervision", None),
        diagnosis("L20", "Atopic dermatitis", Some("Atopic dermatitis")),
        diagnosis("F43.2", "Adjustment disorders", Some("Perturbationes adaptationis")),
        diagnosis("S62.5", "Fracture of thumb", Some("Fractio [ossis/ossium] pollicis")),
        diagnosis(
            "H35.29",
            "Other proliferative retinopathy",
            Some("Alia retinopathia proliferativa"),
        ),
        diagnosis("E78.0", "Pure hypercholesterolaemia", None),
    ])
}
