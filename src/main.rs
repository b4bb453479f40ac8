use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use subreddit_audit::audit::{run_audit, AuditFailure, OutputFormat};
use subreddit_audit::config;
use subreddit_audit::net_client::RedditClient;
use subreddit_audit::server::{router, RedditSetup};
use subreddit_audit::{AuditorConfig, Credentials};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Parser, Debug)]
#[command(name = "subreddit-audit", version, about = "Audit a user's activity in one subreddit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit one user and print the report
    Audit {
        #[arg(long, help = "User to audit (defaults to $REDDIT_USER)")]
        user: Option<String>,
        #[arg(long, help = "Print the grouped result as JSON")]
        json: bool,
    },
    /// Serve the audit endpoint over HTTP
    Serve {
        #[arg(long, help = "Listen address (defaults to 0.0.0.0:$PORT or 0.0.0.0:8080)")]
        addr: Option<String>,
    },
}

fn main() -> ExitCode {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,subreddit_audit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        match cli.command {
            Commands::Audit { user, json } => audit(user, json).await,
            Commands::Serve { addr } => serve(addr).await,
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn audit(user: Option<String>, json: bool) -> Result<()> {
    let user = config::target_user(user, |key| env::var(key).ok())?;
    let config = AuditorConfig::from_env().map_err(AuditFailure::Setup)?;
    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let output = run_audit(&config.community, &user, format, || connect(&config)).await?;

    tracing::info!("{output}");
    println!("{output}");
    Ok(())
}

async fn connect(config: &AuditorConfig) -> subreddit_audit::Result<RedditClient> {
    let credentials = Credentials::from_env()?;
    RedditClient::login(config.clone(), credentials).await
}

async fn serve(addr: Option<String>) -> Result<()> {
    let addr = addr
        .or_else(|| env::var("PORT").ok().map(|port| format!("0.0.0.0:{port}")))
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    let config = AuditorConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(community = %config.community, "Configuration loaded");

    let app = router(RedditSetup::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
