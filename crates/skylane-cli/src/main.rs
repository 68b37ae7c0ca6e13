use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use skylane_lib::{
    airport_distance, init_schema, nearest_airports, route_distance, Coordinates, Database,
    DatabaseConfig,
};

mod output;

#[derive(Parser, Debug)]
#[command(author, version, about = "Skylane airport and route utilities")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "SKYLANE_DB_PATH", default_value = "skylane.db")]
    database: PathBuf,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the schema, optionally loading a SQL seed script.
    Init {
        /// SQL file executed after the schema is created.
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Distance between two airports given by IATA or ICAO code.
    Distance {
        from: String,
        to: String,
    },
    /// Distance and carriers for a departure/arrival leg (IATA codes).
    RouteDistance {
        departure: String,
        arrival: String,
    },
    /// Airports closest to a point.
    #[command(allow_negative_numbers = true)]
    Nearest {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
        /// Number of airports to list (1-50).
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Init { seed } => handle_init(&cli.database, seed.as_deref()),
        Command::Distance { from, to } => {
            let db = open_existing(&cli.database)?;
            let result = airport_distance(&db, Some(&from), Some(&to))?;
            output::airport_distance(&result, cli.json)
        }
        Command::RouteDistance { departure, arrival } => {
            let db = open_existing(&cli.database)?;
            let result = route_distance(&db, Some(&departure), Some(&arrival))?;
            output::route_distance(&result, cli.json)
        }
        Command::Nearest { lat, lon, limit } => {
            let db = open_existing(&cli.database)?;
            let airports = nearest_airports(&db, Coordinates::new(lat, lon), limit)?;
            output::nearest(&airports, cli.json)
        }
    }
}

fn handle_init(path: &Path, seed: Option<&Path>) -> Result<()> {
    let db = Database::open(path, &DatabaseConfig::default().with_max_connections(1))
        .with_context(|| format!("failed to open database at {}", path.display()))?;
    init_schema(&db).context("failed to create schema")?;

    if let Some(seed) = seed {
        let script = std::fs::read_to_string(seed)
            .with_context(|| format!("failed to read seed script {}", seed.display()))?;
        db.execute_batch(&script)
            .with_context(|| format!("failed to apply seed script {}", seed.display()))?;
        tracing::info!(seed = %seed.display(), "seed applied");
    }

    println!("Schema ready at {}", path.display());
    Ok(())
}

fn open_existing(path: &Path) -> Result<Database> {
    let config = DatabaseConfig::default()
        .with_max_connections(1)
        .must_exist(true);
    Database::open(path, &config)
        .with_context(|| format!("failed to open database at {}", path.display()))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
