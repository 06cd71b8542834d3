use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use triage_core::stage::CARE_PATHWAY;
use triage_core::{
    clock, config, CoreConfig, JsonStore, PatientRecord, PatientUpdate, Priority, Stage,
    TriageService, Vitals,
};
use triage_core::validation::IntakeForm;
use triage_types::PatientId;

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Emergency-department intake and triage tracker CLI")]
struct Cli {
    /// Data directory (default: TRIAGE_DATA_DIR or ./triage_data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Simulated submit latency in milliseconds for intake registration
    #[arg(long, global = true)]
    submit_delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Staff login
    Login {
        username: String,
        password: String,
    },
    /// Clear the staff session
    Logout,
    /// Register a new patient and print the generated id
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        gender: String,
        #[arg(long)]
        symptoms: String,
        /// Body temperature in °C
        #[arg(long)]
        temperature: Option<String>,
        /// Blood pressure as "systolic/diastolic"
        #[arg(long)]
        blood_pressure: Option<String>,
        /// Heart rate in bpm
        #[arg(long)]
        heart_rate: Option<String>,
        /// Oxygen saturation in percent
        #[arg(long)]
        oxygen_saturation: Option<String>,
        /// Self-reported pain, 0-10
        #[arg(long)]
        pain_level: Option<String>,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        medications: Option<String>,
        /// Explicit emergency signs observed at intake
        #[arg(long)]
        emergency: bool,
    },
    /// List active patients, most urgent first
    List {
        /// Filter by name or id
        #[arg(long)]
        search: Option<String>,
        /// Only red and orange cases
        #[arg(long)]
        urgent: bool,
        /// Only patients at the waiting stage
        #[arg(long)]
        waiting: bool,
        /// Show discharged patients instead
        #[arg(long)]
        archived: bool,
    },
    /// Show one patient in full
    Show { id: String },
    /// Toggle a care-stage's completion for a patient
    ToggleStep { id: String, step: String },
    /// Edit patient fields, override priority, or set the current stage
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        symptoms: Option<String>,
        /// Priority colour, e.g. "Laranja"
        #[arg(long)]
        priority: Option<String>,
        /// Stage id, e.g. "espera"; "alta" discharges and archives
        #[arg(long)]
        step: Option<String>,
        #[arg(long)]
        temperature: Option<String>,
        #[arg(long)]
        blood_pressure: Option<String>,
        #[arg(long)]
        heart_rate: Option<String>,
        #[arg(long)]
        oxygen_saturation: Option<String>,
        #[arg(long)]
        pain_level: Option<String>,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        medications: Option<String>,
    },
    /// Patient-side: submit a reevaluation request
    Reevaluate {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// List patients with pending, unseen reevaluation requests
    Reevaluations,
    /// View (and mark seen) a patient's reevaluation request
    ViewReeval { id: String },
    /// Patient-side status screen: timeline, elapsed and remaining time
    Status {
        id: String,
        /// Re-render once per second
        #[arg(long)]
        watch: bool,
    },
    /// Export the full census as CSV
    Export {
        /// Output path; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Dashboard statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().or_else(|| {
        std::env::var("TRIAGE_DATA_DIR").ok().map(PathBuf::from)
    });
    let submit_delay = cli.submit_delay_ms.map(Duration::from_millis);
    let cfg = Arc::new(CoreConfig::new(
        config::resolve_data_dir(data_dir),
        submit_delay,
    )?);
    let service = TriageService::new(JsonStore::new(Arc::clone(&cfg))?, cfg);

    match cli.command {
        Commands::Login { username, password } => {
            let role = service.login(&username, &password)?;
            println!("Logged in as {username} ({role})");
        }
        Commands::Logout => {
            service.logout()?;
            println!("Logged out");
        }
        Commands::Register {
            name,
            age,
            gender,
            symptoms,
            temperature,
            blood_pressure,
            heart_rate,
            oxygen_saturation,
            pain_level,
            allergies,
            medications,
            emergency,
        } => {
            require_staff(&service)?;
            let form = IntakeForm {
                name,
                age,
                gender,
                symptoms,
                vitals: Vitals {
                    temperature,
                    blood_pressure,
                    heart_rate,
                    oxygen_saturation,
                    pain_level,
                },
                allergies,
                medications,
                has_emergency_signs: emergency,
            };
            let record = service.register(form)?;
            println!(
                "Registered {} ({}) with priority {}, estimated wait {}",
                record.id, record.name, record.priority, record.wait_time
            );
        }
        Commands::List {
            search,
            urgent,
            waiting,
            archived,
        } => {
            require_staff(&service)?;
            let mut patients = if archived {
                service.list_archived()?
            } else if let Some(term) = &search {
                service.search(term)?
            } else {
                service.list()?
            };
            if urgent {
                patients.retain(|p| p.priority.is_urgent());
            }
            if waiting {
                patients.retain(|p| p.current_step == Stage::Waiting);
            }
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in &patients {
                    print_row(patient);
                }
            }
        }
        Commands::Show { id } => {
            require_staff(&service)?;
            let id = PatientId::parse(&id)?;
            let record = service.get(&id)?;
            print_full(&record);
        }
        Commands::ToggleStep { id, step } => {
            require_staff(&service)?;
            let id = PatientId::parse(&id)?;
            let step: Stage = step.parse()?;
            let record = service.toggle_step(&id, step)?;
            println!(
                "Current step for {} is now {}",
                record.id,
                record.current_step.label()
            );
            print_timeline(&record);
        }
        Commands::Edit {
            id,
            name,
            age,
            gender,
            symptoms,
            priority,
            step,
            temperature,
            blood_pressure,
            heart_rate,
            oxygen_saturation,
            pain_level,
            allergies,
            medications,
        } => {
            require_staff(&service)?;
            let id = PatientId::parse(&id)?;
            let priority = priority
                .map(|p| p.parse::<Priority>())
                .transpose()?;
            let step = step.map(|s| s.parse::<Stage>()).transpose()?;
            let update = PatientUpdate {
                name,
                age,
                gender,
                symptoms,
                priority,
                current_step: step,
                vitals: Vitals {
                    temperature,
                    blood_pressure,
                    heart_rate,
                    oxygen_saturation,
                    pain_level,
                },
                allergies,
                medications,
            };
            let record = service.edit(&id, &update)?;
            if record.is_discharged() {
                println!("Patient {} discharged and archived", record.id);
            } else {
                print_full(&record);
            }
        }
        Commands::Reevaluate { id, reason } => {
            let id = PatientId::parse(&id)?;
            let record = service.submit_reevaluation(&id, reason)?;
            println!(
                "Reevaluation request recorded for {}; staff will be notified",
                record.id
            );
        }
        Commands::Reevaluations => {
            require_staff(&service)?;
            let pending = service.pending_reevaluations()?;
            if pending.is_empty() {
                println!("No pending reevaluation requests.");
            } else {
                for patient in &pending {
                    if let Some(request) = &patient.reevaluation_request {
                        println!(
                            "{} {} [{}]: {}",
                            patient.id,
                            patient.name,
                            request.timestamp.format("%H:%M"),
                            request.reason
                        );
                    }
                }
            }
        }
        Commands::ViewReeval { id } => {
            require_staff(&service)?;
            let id = PatientId::parse(&id)?;
            let request = service.view_reevaluation(&id)?;
            println!("Reason: {}", request.reason);
            println!("Requested at: {}", request.timestamp.format("%d/%m/%Y %H:%M:%S"));
            println!("Marked as seen.");
        }
        Commands::Status { id, watch } => {
            let id = PatientId::parse(&id)?;
            // Looking yourself up is the patient-side login.
            let mut record = service.patient_login(&id)?;
            loop {
                print_status(&record);
                if !watch {
                    break;
                }
                std::thread::sleep(Duration::from_secs(1));
                record = service.get(&id)?;
            }
        }
        Commands::Export { out } => {
            require_staff(&service)?;
            let csv = service.export_csv()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, csv)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{csv}"),
            }
        }
        Commands::Stats => {
            require_staff(&service)?;
            let stats = service.stats()?;
            println!("Active patients:       {}", stats.active);
            println!("Urgent cases:          {}", stats.urgent);
            println!("In the waiting room:   {}", stats.waiting);
            println!("Unseen reevaluations:  {}", stats.unseen_reevaluations);
            println!("Average wait:          {} min", stats.average_wait_minutes);
        }
    }

    Ok(())
}

fn require_staff(service: &TriageService<JsonStore>) -> anyhow::Result<()> {
    if !service.session()?.is_staff() {
        bail!("staff login required: run `triage login <username> <password>` first");
    }
    Ok(())
}

fn print_row(patient: &PatientRecord) {
    let flag = if patient
        .reevaluation_request
        .as_ref()
        .is_some_and(|r| r.requested && !r.seen)
    {
        " [reeval]"
    } else {
        ""
    };
    println!(
        "{}  {:<10} {:<12} {:<20} {}{}",
        patient.id,
        patient.priority.label(),
        patient.current_step.label(),
        patient.name,
        patient.registered_at.format("%H:%M"),
        flag
    );
}

fn print_full(record: &PatientRecord) {
    println!("ID:          {}", record.id);
    println!("Name:        {} ({}, {})", record.name, record.age, record.gender);
    println!("Symptoms:    {}", record.symptoms);
    println!("Priority:    {} ({})", record.priority, record.wait_time);
    println!(
        "Registered:  {}",
        record.registered_at.format("%d/%m/%Y %H:%M:%S")
    );
    if let Some(temperature) = &record.vitals.temperature {
        println!("Temperature: {temperature} °C");
    }
    if let Some(blood_pressure) = &record.vitals.blood_pressure {
        println!("BP:          {blood_pressure}");
    }
    if let Some(heart_rate) = &record.vitals.heart_rate {
        println!("Heart rate:  {heart_rate} bpm");
    }
    if let Some(oxygen_saturation) = &record.vitals.oxygen_saturation {
        println!("SpO2:        {oxygen_saturation}%");
    }
    if let Some(pain_level) = &record.vitals.pain_level {
        println!("Pain:        {pain_level}/10");
    }
    if let Some(allergies) = &record.allergies {
        println!("Allergies:   {allergies}");
    }
    if let Some(medications) = &record.medications {
        println!("Medications: {medications}");
    }
    print_timeline(record);
}

fn print_timeline(record: &PatientRecord) {
    let marks: Vec<String> = CARE_PATHWAY
        .iter()
        .map(|stage| {
            let done = if record.completed_steps.contains(stage) {
                "x"
            } else {
                " "
            };
            let here = if *stage == record.current_step { ">" } else { " " };
            format!("{here}[{done}] {}", stage.label())
        })
        .collect();
    println!("Timeline:    {}", marks.join("  "));
}

fn print_status(record: &PatientRecord) {
    let now = Utc::now();
    println!("Patient {} ({})", record.id, record.name);
    println!("Priority:       {}", record.priority);
    print_timeline(record);
    println!(
        "Elapsed:        {}",
        clock::format_elapsed(record.registered_at, now)
    );
    let step_minutes = record.current_step_minutes();
    if step_minutes > 0 {
        println!(
            "Remaining here: {}",
            clock::format_remaining(record.registered_at, now, step_minutes)
        );
    }
    println!("Until discharge: {}", record.estimate_label());
}
