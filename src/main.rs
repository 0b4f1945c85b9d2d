use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use vvp_sql::config::Config;
use vvp_sql::{
    connect_vvp, flink_sql, ConnectOptions, ConnectOutcome, ReqwestTransport, SessionRegistry,
    SqlOptions, SqlOutcome, SqlService, VvpError,
};

/// Submit Flink SQL to a Ververica Platform namespace
#[derive(Parser, Debug)]
#[command(name = "vvp-sql", version, about, long_about = None)]
struct Cli {
    /// VVP hostname (defaults to VVP_HOST or localhost)
    hostname: Option<String>,

    /// VVP port (defaults to VVP_PORT or 8080)
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// Namespace. If empty, lists all namespaces.
    #[arg(short = 'n', long = "namespace")]
    namespace: Option<String>,

    /// Session name
    #[arg(short = 's', long = "session", default_value = "default")]
    session: String,

    /// Force updating of session names
    #[arg(short = 'f', long = "force")]
    force: bool,

    /// SQL statement to run
    #[arg(short = 'c', long = "command", conflicts_with = "file")]
    command: Option<String>,

    /// Read the SQL statement from a file
    #[arg(long = "file")]
    file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long = "json")]
    json: bool,
}

impl Cli {
    fn read_sql(&self) -> anyhow::Result<String> {
        if let Some(command) = &self.command {
            return Ok(command.clone());
        }

        if let Some(path) = &self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read SQL file {}", path.display()));
        }

        let mut sql = String::new();
        std::io::stdin()
            .read_to_string(&mut sql)
            .context("Failed to read SQL from stdin")?;
        Ok(sql)
    }
}

fn print_outcome(outcome: &SqlOutcome, json: bool) -> anyhow::Result<()> {
    match outcome {
        SqlOutcome::NoOp => println!("Empty statement: doing nothing."),
        SqlOutcome::Table(table) if json => println!("{}", serde_json::to_string_pretty(table)?),
        SqlOutcome::Table(table) => println!("{}", table),
        SqlOutcome::Raw(value) => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
    .context("Failed to load configuration")?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let transport = Arc::new(ReqwestTransport::new(config.http.timeout_secs)?);
    let service = SqlService::new(transport.clone());
    let mut registry = SessionRegistry::new();

    let options = ConnectOptions {
        hostname: cli.hostname.clone().unwrap_or_else(|| config.vvp.hostname.clone()),
        port: cli.port.unwrap_or(config.vvp.port),
        namespace: cli.namespace.clone(),
        session: Some(cli.session.clone()),
        force: cli.force,
    };

    info!("Connecting to {}", options.base_url()?);

    match connect_vvp(&mut registry, transport.as_ref(), &options).await? {
        ConnectOutcome::Namespaces(namespaces) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&namespaces)?);
            } else {
                for namespace in namespaces {
                    println!("{}", namespace);
                }
            }
            return Ok(());
        }
        ConnectOutcome::Session(session) => {
            info!("Using session {} (namespace {})", session.name, session.namespace());
        }
    }

    let sql = cli.read_sql()?;
    let options = SqlOptions::with_session(cli.session.clone());

    match flink_sql(&registry, &service, &options, &sql).await {
        Ok(outcome) => print_outcome(&outcome, cli.json),
        Err(e) => {
            if let VvpError::SqlSyntaxOrUnsupported {
                details: Some(details),
                ..
            } = &e
            {
                error!("Validation response: {}", details);
            }
            Err(e.into())
        }
    }
}
