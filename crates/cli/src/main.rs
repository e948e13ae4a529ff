use api_shared::{
    CommitScheduleRes, DepartmentDto, GenerateScheduleRes, ListRequirementsRes, ScheduleSlotDto,
};
use clap::{Parser, Subcommand};
use rotation_core::{
    candidate_days, data_dir_from_env_value, Cohort, CommitOutcome, CoreConfig, DateWindow,
    FileRequirementsStore, FileSlotStore, GenerationOutcome, GenerationRequest, Role,
    SchedulingService, SlotFilter,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rota")]
#[command(about = "Clinical rotation schedule generator")]
struct Cli {
    /// Data directory holding requirements.yaml and slots/ (defaults to $ROTATION_DATA_DIR or rotation_data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Propose a schedule without storing it
    Preview(GenerateArgs),
    /// Generate a schedule and store it as one batch
    Commit(GenerateArgs),
    /// List committed slots
    Slots {
        /// Earliest date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only this department
        #[arg(long)]
        department: Option<String>,
    },
    /// Show the department requirements for a cohort
    Requirements {
        /// first, second, third or fourth
        cohort: String,
    },
    /// List configured departments
    Departments,
    /// List the days in a window that may receive slots
    EligibleDays {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,
    },
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// first, second, third or fourth
    #[arg(long)]
    cohort: String,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: String,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end: String,
    /// Role to act as
    #[arg(long, default_value = "hospital_admin")]
    role: String,
}

type CliService = SchedulingService<FileRequirementsStore, FileSlotStore>;

fn open_service(data_dir: Option<PathBuf>) -> Result<CliService, Box<dyn std::error::Error>> {
    let data_dir = data_dir
        .unwrap_or_else(|| data_dir_from_env_value(std::env::var("ROTATION_DATA_DIR").ok()));
    let cfg = CoreConfig::new(data_dir)?;
    Ok(SchedulingService::new(
        FileRequirementsStore::new(&cfg),
        FileSlotStore::new(&cfg),
    ))
}

fn print_outcome(outcome: &GenerationOutcome) {
    for slot in outcome.slots() {
        println!(
            "{}  {}-{}  {:<20} capacity {}",
            slot.date,
            slot.start_label(),
            slot.end_label(),
            slot.department_id,
            slot.capacity
        );
    }
    for allocation in outcome.allocations().iter().filter(|a| a.under_filled()) {
        println!(
            "Warning: {} received {} of {} slots",
            allocation.department_id, allocation.slots_created, allocation.slots_needed
        );
    }
    println!("{}", outcome.message());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match cli.command {
        Some(Commands::Preview(args)) => {
            let role = Role::parse(&args.role)?;
            let request = GenerationRequest::parse(&args.cohort, &args.start, &args.end)?;
            let outcome = open_service(cli.data_dir)?.preview(role, &request)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&GenerateScheduleRes::from(&outcome))?
                );
            } else {
                print_outcome(&outcome);
            }
        }
        Some(Commands::Commit(args)) => {
            let role = Role::parse(&args.role)?;
            let request = GenerationRequest::parse(&args.cohort, &args.start, &args.end)?;
            let outcome = open_service(cli.data_dir)?.commit(role, &request)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&CommitScheduleRes::from(&outcome))?
                );
            } else {
                print_outcome(outcome.generation());
                match &outcome {
                    CommitOutcome::Committed { batch, .. } => {
                        println!("Committed batch {}", batch.batch_id);
                    }
                    CommitOutcome::Nothing(_) => println!("Nothing committed."),
                }
            }
        }
        Some(Commands::Slots {
            from,
            to,
            department,
        }) => {
            let filter = SlotFilter::parse(from.as_deref(), to.as_deref(), department.as_deref())?;
            let slots = open_service(cli.data_dir)?.list_slots(&filter)?;
            if json {
                let dtos: Vec<ScheduleSlotDto> = slots.iter().map(ScheduleSlotDto::from).collect();
                println!("{}", serde_json::to_string_pretty(&dtos)?);
            } else if slots.is_empty() {
                println!("No slots found.");
            } else {
                for slot in slots {
                    let dto = ScheduleSlotDto::from(&slot);
                    println!(
                        "{}  {}-{}  {:<20} {}/{}  {}",
                        dto.date,
                        dto.start_time,
                        dto.end_time,
                        dto.department_id,
                        dto.booked_count,
                        dto.capacity,
                        dto.id
                    );
                }
            }
        }
        Some(Commands::Requirements { cohort }) => {
            let cohort = Cohort::parse(&cohort)?;
            let requirements = open_service(cli.data_dir)?.requirements_for(cohort)?;
            let res = ListRequirementsRes::new(cohort, &requirements);
            if json {
                println!("{}", serde_json::to_string_pretty(&res)?);
            } else if res.requirements.is_empty() {
                println!("No department requirements found for {cohort} year students.");
            } else {
                for r in res.requirements {
                    println!(
                        "{:<20} {:>6} h  {} slots  capacity {}",
                        r.department_id, r.required_hours, r.slots_needed, r.capacity
                    );
                }
            }
        }
        Some(Commands::Departments) => {
            let departments = open_service(cli.data_dir)?
                .requirements_store()
                .departments()?;
            let dtos: Vec<DepartmentDto> = departments.iter().map(DepartmentDto::from).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&dtos)?);
            } else if dtos.is_empty() {
                println!("No departments configured.");
            } else {
                for d in dtos {
                    println!(
                        "{:<20} {:<30} capacity {}",
                        d.id,
                        d.name.unwrap_or_default(),
                        d.capacity
                    );
                }
            }
        }
        Some(Commands::EligibleDays { start, end }) => {
            let window = DateWindow::parse(&start, &end)?;
            let days = candidate_days(&window);
            if json {
                let days: Vec<String> = days.iter().map(ToString::to_string).collect();
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else if days.is_empty() {
                println!("No available days found in the date range.");
            } else {
                for day in days {
                    println!("{} {}", day, day.format("%a"));
                }
            }
        }
        None => {
            println!("Use 'rota --help' for commands");
        }
    }

    Ok(())
}
