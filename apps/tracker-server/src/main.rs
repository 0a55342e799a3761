use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use time_tracking::config::TimeTrackingConfig;
use time_tracking::TimeTracking;
use url::Url;

mod http;
mod shutdown;

const MODULE_NAME: &str = "time_tracking";

/// Tracker Server - projects and time entries over HTTP
#[derive(Parser)]
#[command(name = "tracker-server")]
#[command(about = "Tracker Server - projects and time entries over HTTP")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    if let Some(path) = cli.config.as_deref() {
        if !path.is_file() {
            return Err(anyhow!("config file not found: {}", path.display()));
        }
    }

    // home_dir is normalized inside
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Tracker Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

/// Detect DB backend from URL scheme.
fn detect_backend(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// "sqlite::memory:" is kept as-is.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.eq_ignore_ascii_case(runtime::config::MOCK_DATABASE_URL) {
        return Ok(dsn.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };
    if path_str.is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }

    let mut p = PathBuf::from(path_str);
    if p.is_relative() {
        p = base_dir.join(p);
    }
    if let Some(dir) = p.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create database dir {}", dir.display()))?;
    }

    let mut out = format!("sqlite://{}", p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

async fn connect(db_config: &DatabaseConfig, home_dir: &Path) -> Result<DatabaseConnection> {
    let backend = detect_backend(db_config)?;
    let dsn = if backend == "sqlite" {
        absolutize_sqlite_dsn(db_config.url.trim(), home_dir)?
    } else {
        db_config.url.trim().to_string()
    };

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.max_connections(db_config.max_conns.unwrap_or(10))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    tracing::info!(backend, "Connecting to database: {}", dsn);
    Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to {backend} database"))
}

async fn run_server(config: AppConfig) -> Result<()> {
    let module_config: TimeTrackingConfig = config.module_config(MODULE_NAME)?;
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("No database configured; set database.url or pass --mock"))?;

    let db = connect(db_config, Path::new(&config.server.home_dir)).await?;

    let module = TimeTracking::new(db, module_config);
    module.migrate().await?;

    let app = http::build_router(module.router(), config.server.timeout_sec);

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind address {}:{}",
                config.server.host, config.server.port
            )
        })?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_shutdown())
        .await?;

    tracing::info!("Tracker Server stopped");
    Ok(())
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let _: TimeTrackingConfig = config.module_config(MODULE_NAME)?;
    match &config.database {
        Some(db) => {
            let backend = detect_backend(db)?;
            tracing::info!(backend, "Database configuration is valid");
        }
        None => tracing::warn!("No database configuration found"),
    }

    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.into(),
            max_conns: None,
        }
    }

    #[test]
    fn detects_backend_from_scheme() {
        assert_eq!(detect_backend(&db("sqlite://x.db")).unwrap(), "sqlite");
        assert_eq!(detect_backend(&db("sqlite::memory:")).unwrap(), "sqlite");
        assert_eq!(detect_backend(&db("postgresql://h/db")).unwrap(), "postgres");
        assert!(detect_backend(&db("mysql://h/db")).is_err());
        assert!(detect_backend(&db("  ")).is_err());
    }

    #[test]
    fn relative_sqlite_paths_land_under_home() {
        let tmp = tempfile::tempdir().unwrap();
        let dsn = absolutize_sqlite_dsn("sqlite://data/t.db?mode=rwc", tmp.path()).unwrap();
        let expected = tmp.path().join("data/t.db").to_string_lossy().replace('\\', "/");
        assert_eq!(dsn, format!("sqlite://{expected}?mode=rwc"));
        assert!(tmp.path().join("data").is_dir());

        assert_eq!(
            absolutize_sqlite_dsn("sqlite::memory:", tmp.path()).unwrap(),
            "sqlite::memory:"
        );
    }
}
