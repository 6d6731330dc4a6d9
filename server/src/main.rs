use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use axum::routing::get;
use axum::Router;
use clap::Parser;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod handlers;
mod logic;
mod sessions;
mod state;

use crate::handlers::{lobby_ws_handler, ping_handler, root_handler, session_handler, ws_handler};
use crate::state::{AppState, RelayLimits, MAX_COLOR_LEN, MAX_POINTS_PER_STROKE};

/// Relays drawing events between the peers of a board.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,
    /// Directory holding index.html and the compiled client.
    #[arg(long)]
    public_dir: Option<PathBuf>,
    /// Strokes with more points than this are cut short before forwarding.
    #[arg(long, default_value_t = MAX_POINTS_PER_STROKE)]
    max_points: usize,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drawsync_server=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();
    let state = AppState::new(RelayLimits {
        max_points: args.max_points,
        max_color_len: MAX_COLOR_LEN,
    });

    let public_dir = args
        .public_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));
    let index_file = public_dir.join("index.html");

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/ping", get(ping_handler))
        .route("/s/:session_id", get(session_handler))
        .route("/ws", get(lobby_ws_handler))
        .route("/ws/:session_id", get(ws_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(axum::Extension(index_file))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Whiteboard relay running at http://{addr}");
    axum::serve(listener, app).await
}
