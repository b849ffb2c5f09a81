use anyhow::{anyhow, Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig, IN_MEMORY_DSN};
use salespersons::{Salespersons, SalespersonsConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps in-memory DSNs as `sqlite::memory:`.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` when no query is given so the file is created.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case(IN_MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(IN_MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}

/// CRM Server - admissions CRM back office API
#[derive(Parser)]
#[command(name = "crm-server")]
#[command(about = "CRM Server - admissions CRM back office API")]
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

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("CRM Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

/// Detect DB backend from URL scheme. Only SQLite is compiled in.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if raw.eq_ignore_ascii_case(IN_MEMORY_DSN) {
        return Ok("sqlite");
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Effective DSN with relative SQLite paths resolved against `server.home_dir`.
/// `--mock` has already swapped in the in-memory database at this point.
fn resolve_dsn(config: &AppConfig) -> Result<String> {
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("database section is required (or pass --mock)"))?;
    detect_from_dsn(db_config)?;
    absolutize_sqlite_dsn(db_config.url.trim(), config.server.home_path(), true)
}

async fn connect(db_config: &DatabaseConfig, dsn: &str) -> Result<DatabaseConnection> {
    // Every pooled connection to `sqlite::memory:` would be its own database.
    let max_conns = if dsn == IN_MEMORY_DSN {
        1
    } else {
        db_config.max_conns
    };
    let busy_timeout = db_config.busy_timeout();

    let mut opts = ConnectOptions::new(dsn.to_owned());
    opts.max_connections(max_conns)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false)
        .map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy_timeout));

    tracing::info!("Connecting to database: {}", dsn);
    Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to {dsn}"))
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");

    let addr = config.server.listen_addr()?;
    let ingress_cfg: ApiIngressConfig = config.module_config(ApiIngress::NAME)?;
    let salespersons_cfg: SalespersonsConfig = config.module_config(Salespersons::NAME)?;

    let dsn = resolve_dsn(&config)?;
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("database section is required (or pass --mock)"))?;
    let db = connect(db_config, &dsn).await?;

    let salespersons = Salespersons::default();
    salespersons.migrate(&db).await?;
    salespersons.init(db, salespersons_cfg)?;

    let routes = salespersons.register_rest(axum::Router::new())?;

    let ingress = ApiIngress::new(ingress_cfg, config.server.request_timeout());
    let router = ingress.build_router(routes, Salespersons::openapi())?;

    ingress
        .serve(router, addr, api_ingress::shutdown_signal())
        .await
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    config.server.listen_addr()?;
    config.module_config::<ApiIngressConfig>(ApiIngress::NAME)?;
    config.module_config::<SalespersonsConfig>(Salespersons::NAME)?;
    let dsn = resolve_dsn(&config)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Database: {dsn}");
    println!("{}", config.to_yaml()?);

    Ok(())
}
