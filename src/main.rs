mod add;
mod delete;
mod interactive;
mod query;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use planner::state::AssignmentFilter;
use planner::weeks::DEFAULT_WINDOW_WEEKS;
use planner::{logging, ApiClient, ComplexityTier, Config};

use add::{AssignmentArgs, ProjectArgs};
use delete::DeleteTarget;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Capacity and project assignment planning client", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_DATE"), ")"))]
struct Cli {
    /// Backend base URL (overrides the stored config and PLANNER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List projects with the assignment screen filters
    Projects {
        /// Phase to include (repeatable)
        #[arg(long)]
        phase: Vec<String>,

        /// Classification to include (repeatable)
        #[arg(long)]
        classification: Vec<String>,

        /// Complexity to include (repeatable)
        #[arg(long)]
        complexity: Vec<String>,

        /// Only projects with (Sí) or without (No) a resource
        #[arg(long)]
        has_resource: Option<String>,

        /// Case-insensitive substring of the project name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List resources
    Resources,
    /// Weekly load grid per resource
    Capacity {
        #[command(flatten)]
        window: WindowArgs,

        /// Month label to show (e.g. Agosto_25)
        #[arg(short, long)]
        month: Option<String>,

        /// Resource name to show
        #[arg(short, long)]
        resource: Option<String>,
    },
    /// Resource availability with workload bands
    Availability {
        #[command(flatten)]
        window: WindowArgs,

        /// Workload band: all, available, moderate or overloaded
        #[arg(short = 'l', long)]
        workload: Option<String>,
    },
    /// Per-person load by work type
    ResourcesVs {
        #[command(flatten)]
        window: WindowArgs,

        /// Resource name to show
        #[arg(short, long)]
        resource: Option<String>,

        /// Work type to show
        #[arg(short = 't', long = "type")]
        work_type: Option<String>,
    },
    /// Average weekly load per project
    WeeklyAvg {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Current-month subprocesses of a project
    Subprocesses {
        /// Project id
        #[arg(short, long)]
        project: i64,

        /// Only weeks assigned to this resource
        #[arg(short, long)]
        resource: Option<String>,
    },
    /// Weekly rows of an assignment
    Weeks {
        /// Assignment id
        #[arg(short, long)]
        assignment: i64,
    },
    /// Print the fixed deliverable schedule of a complexity tier
    Schedule {
        /// Complexity tier (Media or Alta)
        tier: ComplexityTier,

        /// Show deliverable names per week
        #[arg(short, long)]
        names: bool,
    },
    /// Show the start week a scheduled assignment would use
    StartWeek {
        /// Reference date (YYYY-MM-DD, YYYY.MM.DD, or YYYY/MM/DD format, default: today)
        #[arg(short = 'D', long)]
        date: Option<String>,
    },
    /// Create a project, resource or assignment
    Add {
        #[command(subcommand)]
        what: AddCommands,
    },
    /// Delete a project, resource or assignment
    Delete {
        #[command(subcommand)]
        what: DeleteCommands,
    },
    /// Import projects and assignments from an Excel workbook
    Import {
        /// Path to the .xlsx file
        file: PathBuf,
    },
    /// Show or change the stored configuration (--api-url stores the URL)
    Config {
        /// Request timeout in seconds (0 removes it)
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the current configuration
        #[arg(long)]
        show: bool,
    },
    /// Run the interactive terminal UI
    Interactive,
}

#[derive(clap::Args, Debug, Clone)]
struct WindowArgs {
    /// First week of the window (any date in that week, default: this week)
    #[arg(short = 'D', long)]
    start: Option<String>,

    /// Number of weeks in the window
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_WEEKS)]
    weeks: u32,
}

#[derive(Subcommand)]
enum AddCommands {
    /// Create a project
    Project {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        classification: Option<String>,

        #[arg(short, long)]
        phase: Option<String>,

        /// Alta, Media or Baja
        #[arg(short = 'x', long)]
        complexity: Option<String>,

        /// Resource id to attach
        #[arg(short, long)]
        resource: Option<i64>,
    },
    /// Create a resource
    Resource {
        #[arg(short, long)]
        name: String,
    },
    /// Assign a resource to a project
    Assignment {
        /// Project id
        #[arg(short, long)]
        project: i64,

        /// Resource id
        #[arg(short, long)]
        resource: i64,

        /// First week (Baja projects only)
        #[arg(long)]
        from: Option<String>,

        /// Last week (Baja projects only)
        #[arg(long)]
        to: Option<String>,

        /// Weekly percentage (Baja projects only, default: 10)
        #[arg(long)]
        percentage: Option<i64>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DeleteCommands {
    /// Delete a project and its assignments
    Project {
        id: i64,
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Delete a resource and its assignments
    Resource {
        id: i64,
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Delete an assignment
    Assignment {
        id: i64,
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => (),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.verbose && std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "planner=debug");
    }

    // The interactive UI owns the terminal, so it logs to a file
    if matches!(cli.command, Commands::Interactive) {
        if let Err(e) = logging::init_with_file("planner.log") {
            eprintln!("Warning: file logging unavailable: {}", e);
        }
    } else {
        logging::init();
    }

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url.as_deref() {
        config.set_api_url(url)?;
    }

    // Commands that never reach the backend
    match &cli.command {
        Commands::Config { timeout, show } => {
            return handle_config(cli.api_url.clone(), *timeout, *show)
        }
        Commands::Schedule { tier, names } => return query::handle_schedule(*tier, *names),
        Commands::StartWeek { date } => return query::handle_start_week(date.clone()),
        _ => {}
    }

    tracing::debug!(api_url = %config.api_url, "Using backend");
    let client = ApiClient::new(&config)?;

    match cli.command {
        Commands::Projects {
            phase,
            classification,
            complexity,
            has_resource,
            search,
        } => {
            let filter = AssignmentFilter {
                phase,
                classification,
                complexity,
                has_resource: has_resource.unwrap_or_default(),
                search: search.unwrap_or_default(),
            };
            query::handle_projects(&client, filter).await
        }
        Commands::Resources => query::handle_resources(&client).await,
        Commands::Capacity {
            window,
            month,
            resource,
        } => {
            let start = query::window_start(window.start.as_deref())?;
            query::handle_capacity(&client, start, window.weeks, month, resource).await
        }
        Commands::Availability { window, workload } => {
            let start = query::window_start(window.start.as_deref())?;
            query::handle_availability(&client, start, window.weeks, workload).await
        }
        Commands::ResourcesVs {
            window,
            resource,
            work_type,
        } => {
            let start = query::window_start(window.start.as_deref())?;
            query::handle_resources_vs(&client, start, window.weeks, resource, work_type).await
        }
        Commands::WeeklyAvg { window } => {
            let start = query::window_start(window.start.as_deref())?;
            query::handle_weekly_avg(&client, start, window.weeks).await
        }
        Commands::Subprocesses { project, resource } => {
            query::handle_subprocesses(&client, project, resource).await
        }
        Commands::Weeks { assignment } => query::handle_assignment_weeks(&client, assignment).await,
        Commands::Add { what } => match what {
            AddCommands::Project {
                name,
                classification,
                phase,
                complexity,
                resource,
            } => {
                let args = ProjectArgs {
                    name,
                    classification,
                    phase,
                    complexity,
                    resource,
                };
                add::handle_add_project(&client, args).await
            }
            AddCommands::Resource { name } => add::handle_add_resource(&client, name).await,
            AddCommands::Assignment {
                project,
                resource,
                from,
                to,
                percentage,
                yes,
            } => {
                let args = AssignmentArgs {
                    project,
                    resource,
                    from,
                    to,
                    percentage,
                    yes,
                };
                add::handle_add_assignment(&client, args).await
            }
        },
        Commands::Delete { what } => {
            let (target, id, yes) = match what {
                DeleteCommands::Project { id, yes } => (DeleteTarget::Project, id, yes),
                DeleteCommands::Resource { id, yes } => (DeleteTarget::Resource, id, yes),
                DeleteCommands::Assignment { id, yes } => (DeleteTarget::Assignment, id, yes),
            };
            delete::handle_delete_command(&client, target, id, yes).await
        }
        Commands::Import { file } => add::handle_import(&client, &file).await,
        Commands::Interactive => interactive::run_interactive(client).await,
        Commands::Config { .. } | Commands::Schedule { .. } | Commands::StartWeek { .. } => Ok(()),
    }
}

fn handle_config(api_url: Option<String>, timeout: Option<u64>, show: bool) -> Result<()> {
    let mut config = Config::load()?;
    let changed = api_url.is_some() || timeout.is_some();

    if let Some(url) = api_url.as_deref() {
        config.set_api_url(url)?;
    }
    if let Some(secs) = timeout {
        config.timeout_secs = (secs > 0).then_some(secs);
    }

    if changed {
        config.save()?;
        println!("✅ Configuración guardada.");
    }

    if show || !changed {
        if let Some(path) = Config::get_config_path() {
            println!("Archivo: {}", path.display());
        }
        println!("API URL: {}", config.api_url);
        match config.timeout_secs {
            Some(secs) => println!("Timeout: {}s", secs),
            None => println!("Timeout: sin límite"),
        }
    }
    Ok(())
}
