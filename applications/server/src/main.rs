/// Playtree server - document store, HTTP surface and CLI player
use anyhow::Context;
use clap::Parser;
use playtree_core::PlaytreeDoc;
use playtree_playback::{Action, EngineConfig, PlayerSession, ProcessBackend};
use playtree_server::{api, config::ServerConfig, state::AppState, store::DocumentStore};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "playtree-server")]
#[command(about = "Playtree document store and interactive player", long_about = None)]
struct Cli {
    /// Play a playtree document from a local file on the command line
    /// (keys: p play, s stop, n next, b back, l left, r right)
    #[arg(short = 'c', value_name = "FILE")]
    cli: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "playtree_server=info,playtree_playback=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.cli {
        Some(path) => play_file(&path).await,
        None => serve().await,
    }
}

/// CLI player: validate a local document and drive a session with
/// keystrokes from standard input
async fn play_file(path: &Path) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let doc = PlaytreeDoc::from_slice(&bytes)?;
    let tree = playtree_core::validate(doc)?;

    let backend = Arc::new(ProcessBackend::from_env());
    let mut session = PlayerSession::new(backend, EngineConfig::default());
    let mut events = session.load(tree).await;

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                // transitions are already logged by the engine
                Some(_) => {}
                // every playhead finished
                None => break,
            },
            line = lines.next_line() => match line? {
                Some(line) => {
                    let action = match line.trim() {
                        "p" => Action::Play,
                        "s" => Action::Stop,
                        "n" => Action::Next,
                        "b" => Action::Back,
                        "l" => Action::Left,
                        "r" => Action::Right,
                        _ => continue,
                    };
                    session.send(action).await?;
                }
                None => break, // stdin closed
            },
        }
    }
    session.stop().await;
    Ok(())
}

/// HTTP server mode
async fn serve() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    let store = DocumentStore::new(config.storage.playtrees_dir.clone());
    store.initialize().await?;
    tracing::info!(
        "document store at {}",
        config.storage.playtrees_dir.display()
    );

    let backend = Arc::new(ProcessBackend::new(
        config.audio.player_command.clone(),
        config.audio.audio_path.clone(),
    ));
    let state = AppState::new(store, backend);
    let app = api::router(state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
