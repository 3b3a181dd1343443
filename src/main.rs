use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studydesk::{api, config::AppConfig, db};

#[derive(Parser)]
#[command(name = "studydesk")]
#[command(about = "Personal study planner: assignments, marks, notes and rewards")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Address to bind
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,

        /// Database file (overrides STUDYDESK_DB)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Print where the database lives
    DbPath,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "studydesk=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(config: &AppConfig, override_path: Option<PathBuf>) -> anyhow::Result<db::Database> {
    let path = match override_path.or_else(|| config.db_path.clone()) {
        Some(path) => path,
        None => db::Database::default_path()?,
    };
    tracing::info!("Using database at {}", path.display());

    let db = db::Database::open(path)?;
    db.migrate()?;
    Ok(db)
}

async fn serve(config: AppConfig, bind: &str, port: u16, db_path: Option<PathBuf>) -> anyhow::Result<()> {
    let db = open_database(&config, db_path)?;
    let app = api::create_router(db, api::SessionKeys::from_config(&config));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind, port)).await?;
    tracing::info!("StudyDesk listening on http://{}:{}", bind, port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = AppConfig::from_env();

    match cli.command {
        Some(Commands::Serve { port, bind, db }) => serve(config, &bind, port, db).await?,
        Some(Commands::DbPath) => {
            let path = match config.db_path {
                Some(path) => path,
                None => db::Database::default_path()?,
            };
            println!("{}", path.display());
        }
        None => serve(config, "127.0.0.1", 5000, None).await?,
    }

    Ok(())
}
