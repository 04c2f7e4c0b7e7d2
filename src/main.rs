use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fixturesync::cli::{self, ViewOptions};
use fixturesync::config::SyncConfig;
use fixturesync::forms::{FieldInput, FieldKind};
use fixturesync::view::filter::FilterSnapshot;

#[derive(Parser)]
#[command(name = "fixturesync")]
#[command(about = "Keeps a school-sports fixture table in sync with its match list")]
struct Cli {
    /// Base URL of the fixture site (overrides FIXTURE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct FilterArgs {
    /// Show only this phase (exact match)
    #[arg(long, default_value = "")]
    fase: String,
    /// Show only this status: programado, en_curso, finalizado
    #[arg(long, default_value = "")]
    estado: String,
    /// Show only matches where either team name contains this text
    #[arg(long, default_value = "")]
    equipo: String,
    /// Free-text search over the whole row
    #[arg(short, long)]
    search: Option<String>,
    /// Sort by this column index (0 = Fecha)
    #[arg(long)]
    sort: Option<usize>,
}

impl From<FilterArgs> for ViewOptions {
    fn from(args: FilterArgs) -> Self {
        ViewOptions {
            filter: FilterSnapshot::new(args.fase, args.estado, args.equipo),
            search: args.search,
            sort_column: args.sort,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the fixture view and keep it refreshed
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Fetch the match list once and print the table
    Fetch {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Poll the match list and print the table after every refresh
    Watch {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Fetch the match list once and write it as CSV
    Export {
        /// Output file (defaults to FIXTURE_EXPORT_FILENAME)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Overwrite an existing output file without asking
        #[arg(short, long)]
        yes: bool,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Validate a single form value
    Validate {
        #[arg(short, long, value_enum, default_value = "text")]
        kind: FieldKind,
        #[arg(short, long)]
        required: bool,
        /// Show a character counter against this maxlength
        #[arg(long)]
        max_length: Option<usize>,
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = SyncConfig::from_env()?.with_api_url(cli.api_url);

    match cli.command {
        Some(Commands::Serve { port }) => {
            tracing::info!("Starting fixture view on port {}", port);
            fixturesync::api::serve(config, port).await?;
        }
        Some(Commands::Fetch { filters }) => {
            cli::fetch_once(&config, &filters.into()).await?;
        }
        Some(Commands::Watch { filters }) => {
            cli::watch_fixture(&config, &filters.into()).await?;
        }
        Some(Commands::Export { out, yes, filters }) => {
            cli::export(&config, &filters.into(), out.as_deref(), yes).await?;
        }
        Some(Commands::Validate {
            kind,
            required,
            max_length,
            value,
        }) => {
            cli::validate(&FieldInput {
                kind,
                required,
                value: value.unwrap_or_default(),
                max_length,
            })?;
        }
        None => {
            // Default to serving
            tracing::info!("Starting fixture view on port 3000");
            fixturesync::api::serve(config, 3000).await?;
        }
    }

    Ok(())
}
