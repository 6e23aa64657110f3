use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgAction, Parser, Subcommand};
use serde::Deserialize;

use emr::models::{CreateAppointment, CreateMedication, CreatePatient};
use emr::services::password::hash_password;
use emr::state::AppState;
use emr::Config;

#[derive(Parser)]
#[command(
    name = "emrctl",
    about = "Command line tooling for the EMR server",
    version,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load sample patients, appointments, and prescriptions into the database.
    Seed {
        /// Path to the fixture file.
        #[arg(short, long, default_value = "fixtures/data.json")]
        file: PathBuf,
        /// Delete all existing records before seeding.
        #[arg(long, action = ArgAction::SetTrue)]
        reset: bool,
        /// Skip the confirmation prompt for --reset.
        #[arg(short = 'y', long, action = ArgAction::SetTrue)]
        yes: bool,
    },

    /// Derive a PBKDF2 salt and hash for a password, for manual fixes.
    GenPasswordHash {
        password: String,
        /// Iteration count; must match the server's configured value.
        #[arg(long)]
        iterations: Option<u32>,
    },

    /// Print CLI version.
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Seed { file, reset, yes } => run_seed(&file, reset, yes).await,
        Commands::GenPasswordHash {
            password,
            iterations,
        } => run_gen_password_hash(&password, iterations),
    }
}

// ============================================================================
// Fixture format
// ============================================================================

#[derive(Deserialize)]
struct SeedData {
    users: Vec<SeedUser>,
}

#[derive(Deserialize)]
struct SeedUser {
    /// Full name; the first word becomes the first name, the rest the last.
    name: String,
    email: String,
    password: String,
    #[serde(default)]
    appointments: Vec<SeedAppointment>,
    #[serde(default)]
    prescriptions: Vec<SeedPrescription>,
}

#[derive(Deserialize)]
struct SeedAppointment {
    provider: String,
    datetime: DateTime<Utc>,
    repeat: Option<String>,
}

#[derive(Deserialize)]
struct SeedPrescription {
    medication: String,
    dosage: String,
    quantity: i64,
    refill_on: NaiveDate,
    refill_schedule: String,
}

// ============================================================================
// Commands
// ============================================================================

async fn run_seed(file: &Path, reset: bool, yes: bool) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read fixture file {}", file.display()))?;
    let data: SeedData = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse fixture file {}", file.display()))?;

    if reset && !yes && !confirm("This will delete all existing records. Continue? (yes/no): ")? {
        println!("Seeding cancelled.");
        return Ok(());
    }

    let config = Config::load().context("Failed to load configuration")?;
    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;

    if reset {
        let patients = state.query_service.list_patients().await?;
        for patient in &patients {
            state.mutation_service.delete_patient(&patient.id).await?;
        }
        println!("✓ Removed {} existing patients", patients.len());
    }

    let mut patients_created = 0;
    let mut appointments_created = 0;
    let mut medications_created = 0;

    for user in &data.users {
        let (first_name, last_name) = split_name(&user.name);

        let patient = state
            .mutation_service
            .create_patient(CreatePatient {
                first_name: Some(first_name.to_string()),
                last_name: Some(last_name.to_string()),
                email: Some(user.email.clone()),
                password: Some(user.password.clone()),
                ..CreatePatient::default()
            })
            .await
            .with_context(|| format!("Failed to create patient {}", user.email))?;
        patients_created += 1;
        println!("✓ Created patient {} ({})", user.name, patient.id);

        for appointment in &user.appointments {
            state
                .mutation_service
                .create_appointment(CreateAppointment {
                    patient: Some(patient.id.clone()),
                    provider_name: Some(appointment.provider.clone()),
                    appointment_date: Some(appointment.datetime),
                    repeat_schedule: appointment.repeat.clone(),
                    end_date: None,
                })
                .await
                .with_context(|| format!("Failed to create appointment for {}", user.email))?;
            appointments_created += 1;
        }

        for prescription in &user.prescriptions {
            state
                .mutation_service
                .create_medication(CreateMedication {
                    patient: Some(patient.id.clone()),
                    name: Some(prescription.medication.clone()),
                    dosage: Some(prescription.dosage.clone()),
                    quantity: Some(prescription.quantity),
                    refill_date: Some(prescription.refill_on),
                    refill_schedule: Some(prescription.refill_schedule.clone()),
                })
                .await
                .with_context(|| format!("Failed to create medication for {}", user.email))?;
            medications_created += 1;
        }
    }

    println!();
    println!("Seeding complete:");
    println!("  patients:     {patients_created}");
    println!("  appointments: {appointments_created}");
    println!("  medications:  {medications_created}");

    Ok(())
}

fn run_gen_password_hash(password: &str, iterations: Option<u32>) -> Result<()> {
    let iterations = match iterations {
        Some(n) => n,
        None => Config::load()
            .context("Failed to load configuration")?
            .auth
            .pbkdf2_iterations,
    };

    let (salt, hash) = hash_password(password, iterations);
    println!("iterations: {iterations}");
    println!("salt:       {salt}");
    println!("hash:       {hash}");
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Split a full name on the first space. A single word becomes the first
/// name with an empty last name.
fn split_name(name: &str) -> (&str, &str) {
    match name.split_once(' ') {
        Some((first, last)) => (first, last),
        None => (name, ""),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "yes" | "y"
    ))
}
