mod browse_cmds;
mod config;
mod profile_cmd;
mod select_cmds;
mod serve_cmd;

use clap::{Parser, Subcommand};

use fitcat_core::catalog::HttpCatalog;
use fitcat_core::selection::{PlanKind, SelectionStore};
use fitcat_core::{paths, selection};
use fitcat_db::models::{DietFilter, DietSort, TrainingFilter, TrainingSort};
use fitcat_db::pool;

use config::FitcatConfig;

#[derive(Parser)]
#[command(name = "fitcat", about = "Fitness plan catalog server and client")]
struct Cli {
    /// Database URL (overrides FITCAT_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// API base URL for client commands (overrides FITCAT_API_URL env var)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a fitcat config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = fitcat_db::config::DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Base URL of the fitcat API for client commands
        #[arg(long, default_value = config::DEFAULT_API_URL)]
        base_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the fitcat database (create it and run migrations)
    DbInit,
    /// Run the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
        /// Port to listen on (falls back to nearby ports when taken; 0 lets the OS pick)
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
    /// Browse training plans
    Trainings {
        #[command(subcommand)]
        command: TrainingCommands,
    },
    /// Browse diet plans
    Diets {
        #[command(subcommand)]
        command: DietCommands,
    },
    /// Toggle a plan in or out of your selection
    Select {
        /// Plan kind: training or diet
        kind: PlanKind,
        /// Plan ID to toggle
        id: String,
    },
    /// Remove a plan from your selection (works even when the plan is gone)
    Unselect {
        /// Plan kind: training or diet
        kind: PlanKind,
        /// Plan ID to remove
        id: String,
    },
    /// Show your selected plans
    MyPlans,
    /// Manage your local profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[derive(Subcommand)]
pub enum TrainingCommands {
    /// List training plans
    List {
        /// Filter by category (e.g. "Full Body")
        #[arg(long)]
        category: Option<String>,
        /// Filter by difficulty (e.g. "Beginner")
        #[arg(long)]
        difficulty: Option<String>,
        /// Filter by intensity (e.g. "High")
        #[arg(long)]
        intensity: Option<String>,
        /// Sort order: duration or calories (default: newest first)
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show one training plan in full
    Show {
        /// Plan ID to show
        id: String,
    },
}

#[derive(Subcommand)]
pub enum DietCommands {
    /// List diet plans
    List {
        /// Filter by goal (e.g. "Fat Loss")
        #[arg(long)]
        goal: Option<String>,
        /// Sort order: calories (default: newest first)
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show one diet plan in full
    Show {
        /// Plan ID to show
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the stored profile
    Show,
    /// Update the profile (only supplied fields change)
    Set {
        #[arg(long)]
        name: Option<String>,
        /// Experience level (e.g. "Beginner")
        #[arg(long)]
        level: Option<String>,
        /// Fitness goal (e.g. "Muscle Gain")
        #[arg(long)]
        goal: Option<String>,
    },
}

/// Execute the `fitcat init` command: write config file.
fn cmd_init(db_url: &str, base_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        api: config::ApiSection {
            base_url: base_url.to_string(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  api.base_url = {base_url}");
    println!();
    println!("Next: run `fitcat db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `fitcat db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = FitcatConfig::resolve(cli_db_url, None)?;

    println!("Initializing fitcat database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("fitcat db-init complete.");
    Ok(())
}

fn open_selection_store() -> anyhow::Result<SelectionStore> {
    selection::SelectionStore::open(paths::selection_path())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            db_url,
            base_url,
            force,
        } => {
            cmd_init(&db_url, &base_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Serve { bind, port } => {
            let resolved = FitcatConfig::resolve(cli.database_url.as_deref(), None)?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            pool::run_migrations(&db_pool).await?;
            let result = serve_cmd::run_serve(db_pool.clone(), &bind, port).await;
            db_pool.close().await;
            result?;
        }
        Commands::Trainings { command } => {
            let resolved = FitcatConfig::resolve(None, cli.api_url.as_deref())?;
            let catalog = HttpCatalog::new(&resolved.api_base_url);
            match command {
                TrainingCommands::List {
                    category,
                    difficulty,
                    intensity,
                    sort,
                } => {
                    let store = open_selection_store()?;
                    let filter = TrainingFilter {
                        category,
                        difficulty,
                        intensity,
                    };
                    let sort = TrainingSort::from_param(sort.as_deref());
                    browse_cmds::run_trainings_list(&catalog, store.state(), &filter, sort)?;
                }
                TrainingCommands::Show { id } => {
                    browse_cmds::run_trainings_show(&catalog, &id)?;
                }
            }
        }
        Commands::Diets { command } => {
            let resolved = FitcatConfig::resolve(None, cli.api_url.as_deref())?;
            let catalog = HttpCatalog::new(&resolved.api_base_url);
            match command {
                DietCommands::List { goal, sort } => {
                    let store = open_selection_store()?;
                    let filter = DietFilter { goal };
                    let sort = DietSort::from_param(sort.as_deref());
                    browse_cmds::run_diets_list(&catalog, store.state(), &filter, sort)?;
                }
                DietCommands::Show { id } => {
                    browse_cmds::run_diets_show(&catalog, &id)?;
                }
            }
        }
        Commands::Select { kind, id } => {
            let resolved = FitcatConfig::resolve(None, cli.api_url.as_deref())?;
            let catalog = HttpCatalog::new(&resolved.api_base_url);
            let mut store = open_selection_store()?;
            select_cmds::run_select(&catalog, &mut store, kind, &id)?;
        }
        Commands::Unselect { kind, id } => {
            let mut store = open_selection_store()?;
            select_cmds::run_unselect(&mut store, kind, &id)?;
        }
        Commands::MyPlans => {
            let resolved = FitcatConfig::resolve(None, cli.api_url.as_deref())?;
            let catalog = HttpCatalog::new(&resolved.api_base_url);
            let store = open_selection_store()?;
            select_cmds::run_my_plans(&catalog, &store)?;
        }
        Commands::Profile { command } => match command {
            ProfileCommands::Show => {
                profile_cmd::run_profile_show(&paths::profile_path())?;
            }
            ProfileCommands::Set { name, level, goal } => {
                profile_cmd::run_profile_set(&paths::profile_path(), name, level, goal)?;
            }
        },
    }

    Ok(())
}
