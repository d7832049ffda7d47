//! Dev server: static file serving for the output tree plus an SSE
//! live-reload channel fed by the render pipeline.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use tokio::sync::broadcast;
use tokio_stream::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::domain::AppError;
use crate::ports::ReloadNotifier;

/// Fixed dev server port.
pub const PORT: u16 = 1980;

/// Path of the SSE live-reload endpoint.
pub const RELOAD_PATH: &str = "/__mailforge/reload";

/// Reload signals fan out to every connected SSE client.
#[derive(Clone)]
pub struct BroadcastReload {
    tx: broadcast::Sender<String>,
}

impl BroadcastReload {
    pub fn new(tx: broadcast::Sender<String>) -> Self {
        Self { tx }
    }
}

impl ReloadNotifier for BroadcastReload {
    fn notify(&self, stage: &str) {
        // Send only fails when no client is connected, which is fine.
        let _ = self.tx.send(stage.to_string());
    }
}

#[derive(Clone)]
struct ReloadState {
    tx: broadcast::Sender<String>,
}

/// Serve the output root on 127.0.0.1:1980 until the process exits.
pub fn serve(output: &Path, reload_tx: broadcast::Sender<String>) -> Result<(), AppError> {
    let runtime = tokio::runtime::Runtime::new()?;
    let output = output.to_path_buf();
    runtime.block_on(async move {
        let app = router(output, reload_tx);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", PORT))
            .await
            .map_err(|err| AppError::Server(format!("failed to bind port {PORT}: {err}")))?;
        tracing::info!(port = PORT, "dev server listening");
        axum::serve(listener, app)
            .await
            .map_err(|err| AppError::Server(err.to_string()))
    })
}

fn router(output: PathBuf, reload_tx: broadcast::Sender<String>) -> Router {
    Router::new()
        .route(RELOAD_PATH, get(reload_events))
        .fallback_service(ServeDir::new(output))
        .layer(TraceLayer::new_for_http())
        .with_state(ReloadState { tx: reload_tx })
}

/// SSE endpoint: one `reload` event per completed render stage.
async fn reload_events(
    State(state): State<ReloadState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.tx.subscribe()).filter_map(|msg| match msg {
        Ok(stage) => Some(Ok(Event::default().event("reload").data(stage))),
        // A lagged receiver only means missed reloads; skip and catch up.
        Err(BroadcastStreamRecvError::Lagged(_)) => None,
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
