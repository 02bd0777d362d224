//! lsw-daemon entry point.
//!
//! This file is intentionally thin: it parses the command line, resolves
//! configuration, sets up tracing, builds the shared state and starts the
//! HTTP server. All route handlers live in `routes.rs`.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use lsw_config::ServerConfig;
use lsw_daemon::{logging, routes, state, template::SwitchTemplate};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "lsw-daemon")]
#[command(about = "Switch Server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Start,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();
    match cli.cmd {
        Some(Commands::Start) => start().await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

async fn start() -> anyhow::Result<()> {
    let cfg = ServerConfig::from_env()?;

    let (log_path, log_file) = logging::open_log_file(&cfg.log_dir)?;
    logging::init_tracing(log_file);
    info!(path = %log_path.display(), "log file");
    info!(dir = %cfg.certificate_dir.display(), "certificate directory");
    info!(dir = %cfg.html_dir.display(), "html directory");
    info!(routes = ?cfg.routes, "https redirect routes");

    let template_path = cfg.template_path();
    let template = SwitchTemplate::load(&template_path)
        .with_context(|| format!("load switch template '{}'", template_path.display()))?;

    let switch = state::boot_switch(cfg.switch_name.clone());
    let shared = Arc::new(state::AppState::new(switch, template, cfg.static_dir()));

    let app = routes::build_router(shared).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let listener = tokio::net::TcpListener::bind(cfg.addr)
        .await
        .with_context(|| format!("bind {}", cfg.addr))?;
    info!("lsw-daemon listening on http://{}", cfg.addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server crashed")?;

    info!("lsw-daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "ctrl-c handler unavailable; serving until killed");
        std::future::pending::<()>().await;
    }
}
