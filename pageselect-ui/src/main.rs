//! Selection UI server - JSON API and change stream for a paginated table.

mod routes;
mod sse;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use clap::Parser;
use pageselect::io::config::{DEFAULT_CONFIG_PATH, load_config};
use pageselect::io::fetch::HttpPageSource;
use pageselect::session::SelectionSession;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "pageselect-ui")]
#[command(about = "Web API for cross-page bulk selection")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Selector config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory containing UI static files
    #[arg(long)]
    ui_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pageselect_ui=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let cfg = load_config(&args.config)?;
    let source = HttpPageSource::new(&cfg.api).context("create page source")?;
    info!(base_url = %cfg.api.base_url, page_size = cfg.page_size, "starting pageselect-ui");

    let state = AppState::new(SelectionSession::new(cfg.page_size), source);

    // Initial load of the first page
    let ticket = state.session.lock().await.start();
    state.spawn_fetch(ticket);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .nest("/api", routes::api_router())
        .route("/events", get(sse::events_handler))
        .layer(cors)
        .with_state(state);

    if let Some(ui_dir) = args.ui_dir {
        if ui_dir.exists() {
            info!(ui_dir = %ui_dir.display(), "serving static UI files");
            app = app.fallback_service(ServeDir::new(ui_dir).append_index_html_on_directories(true));
        } else {
            info!(ui_dir = %ui_dir.display(), "UI directory not found, API-only mode");
        }
    }

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
