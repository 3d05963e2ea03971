use clap::{Parser, Subcommand, ValueEnum};
use patientor_core::*;
use serde_json::{json, Value};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit status for rejected input (sysexits EX_DATAERR)
const EXIT_INVALID_INPUT: u8 = 65;
/// Exit status for an unknown patient (sysexits EX_NOINPUT)
const EXIT_NOT_FOUND: u8 = 66;

#[derive(Parser)]
#[command(name = "patientor")]
#[command(about = "Patient journal record store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the tool is alive
    Ping,

    /// List all patients (without journals)
    Patients,

    /// Show one patient with their journal
    Patient {
        id: String,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Create a patient from a JSON body
    AddPatient {
        #[command(flatten)]
        body: BodyArgs,
    },

    /// Append a journal entry to a patient from a JSON body
    AddEntry {
        patient_id: String,

        #[command(flatten)]
        body: BodyArgs,
    },

    /// List the diagnosis catalog
    Diagnoses {
        /// Show a single diagnosis
        #[arg(long)]
        code: Option<String>,
    },

    /// Add demo patients to an empty store
    Seed,

    /// Write a default config file (to --config or the default location)
    InitConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Where a request body comes from; stdin when neither flag is given
#[derive(clap::Args)]
struct BodyArgs {
    /// Inline JSON body
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Read the JSON body from a file
    #[arg(long)]
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    patientor_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_config_path);
    let config = Config::load_or_default(&config_path)?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store_path = data_dir.join(patientor_core::config::STORE_FILE_NAME);

    match cli.command {
        Commands::Ping => print_json(&json!({ "message": "This is some data from the backend!" })),
        Commands::Patients => cmd_patients(&store_path),
        Commands::Patient { id, format } => cmd_patient(&store_path, &id, format, &config),
        Commands::AddPatient { body } => cmd_add_patient(&store_path, &body),
        Commands::AddEntry { patient_id, body } => cmd_add_entry(&store_path, &patient_id, &body),
        Commands::Diagnoses { code } => cmd_diagnoses(code.as_deref(), &config),
        Commands::Seed => cmd_seed(&store_path),
        Commands::InitConfig => cmd_init_config(&config_path, &config),
    }
}

fn cmd_patients(store_path: &Path) -> Result<()> {
    let store = RecordStore::load(store_path)?;
    print_json(&store.list_patients())
}

fn cmd_patient(store_path: &Path, id: &str, format: Format, config: &Config) -> Result<()> {
    let store = RecordStore::load(store_path)?;
    let patient = store.get_patient(id)?;
    match format {
        Format::Json => print_json(patient),
        Format::Text => {
            let catalog = catalog(config)?;
            print!("{}", render_patient(patient, &catalog));
            Ok(())
        }
    }
}

fn cmd_add_patient(store_path: &Path, body: &BodyArgs) -> Result<()> {
    let raw = read_body(body)?;
    let patient = RecordStore::update(store_path, |store| {
        Ok(store.register_patient(&raw)?.clone())
    })?;
    tracing::info!("Created patient {}", patient.id);
    print_json(&patient)
}

fn cmd_add_entry(store_path: &Path, patient_id: &str, body: &BodyArgs) -> Result<()> {
    let raw = read_body(body)?;
    let entry = RecordStore::update(store_path, |store| {
        Ok(store.submit_entry(patient_id, &raw)?.clone())
    })?;
    tracing::info!("Appended {} entry {} to {}", entry.kind(), entry.id(), patient_id);
    print_json(&entry)
}

fn cmd_diagnoses(code: Option<&str>, config: &Config) -> Result<()> {
    let catalog = catalog(config)?;
    match code {
        Some(code) => {
            let diagnosis = catalog
                .lookup(code)
                .ok_or_else(|| Error::NotFound {
                    what: "diagnosis",
                    id: code.to_string(),
                })?;
            print_json(diagnosis)
        }
        None => print_json(&catalog.iter().collect::<Vec<_>>()),
    }
}

fn cmd_seed(store_path: &Path) -> Result<()> {
    let added = RecordStore::update(store_path, seed_demo_patients)?;
    print_json(&json!({ "added": added }))
}

fn cmd_init_config(config_path: &Path, config: &Config) -> Result<()> {
    if config_path.exists() {
        return Err(Error::Config(format!(
            "config already exists: {}",
            config_path.display()
        )));
    }
    config.save_to(config_path)?;
    print_json(&json!({ "config": config_path }))
}

/// Built-in catalog merged with configured custom diagnoses
fn catalog(config: &Config) -> Result<DiagnosisCatalog> {
    let catalog = get_default_catalog().with_custom(&config.diagnoses.custom);
    let errors = catalog.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("Diagnosis catalog: {}", error);
        }
        return Err(Error::Config(format!(
            "invalid diagnosis catalog ({} problems)",
            errors.len()
        )));
    }
    Ok(catalog)
}

fn read_body(body: &BodyArgs) -> Result<Value> {
    let text = match (&body.json, &body.file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    serde_json::from_str(&text).map_err(|e| Error::malformed_body(&e))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(err: &Error) -> ExitCode {
    let body = json!({ "error": err.to_string() });
    eprintln!("{}", body);
    match err {
        Error::Validation(_) | Error::MalformedBody(_) => ExitCode::from(EXIT_INVALID_INPUT),
        Error::NotFound { .. } => ExitCode::from(EXIT_NOT_FOUND),
        _ => ExitCode::FAILURE,
    }
}

fn render_patient(patient: &Patient, catalog: &DiagnosisCatalog) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", patient.name));
    out.push_str(&format!("  Gender: {}\n", patient.gender));
    if let Some(ref ssn) = patient.ssn {
        out.push_str(&format!("  SSN: {}\n", ssn));
    }
    if let Some(ref dob) = patient.date_of_birth {
        out.push_str(&format!("  Born: {}\n", dob));
    }
    out.push_str(&format!("  Occupation: {}\n", patient.occupation));
    out.push_str("\nEntries\n");

    if patient.entries.is_empty() {
        out.push_str("  (none)\n");
    }
    for entry in &patient.entries {
        let base = entry.base();
        out.push_str(&format!("  {} [{}] {}\n", base.date, entry.kind(), base.description));
        out.push_str(&format!("    Specialist: {}\n", base.specialist));
        match entry {
            Entry::HealthCheck(e) => {
                out.push_str(&format!("    Rating: {}\n", u8::from(e.health_check_rating)));
            }
            Entry::OccupationalHealthcare(e) => {
                out.push_str(&format!("    Employer: {}\n", e.employer_name));
                if let Some(ref leave) = e.sick_leave {
                    out.push_str(&format!(
                        "    Sick leave: {} to {}\n",
                        leave.start_date, leave.end_date
                    ));
                }
            }
            Entry::Hospital(e) => {
                out.push_str(&format!(
                    "    Discharged {}: {}\n",
                    e.discharge.date, e.discharge.criteria
                ));
            }
        }
        for code in &base.diagnosis_codes {
            let name = catalog.lookup(code).map(|d| d.name.as_str()).unwrap_or("");
            let line = format!("    {} {}", code, name);
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}
