//! HTTP surface: one router whose fallback is the request dispatcher.
//!
//! Dispatch order, every branch terminating the response exactly once:
//! 1. the path resolves under the web root → serve the file;
//! 2. `/auto/stop` → fire the stop effector, 200;
//! 3. `/auto/v…` → channel matcher → tune (302 / 400 / 404 / 409);
//! 4. anything else → 404.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio_util::io::ReaderStream;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};

use tuner_proto::channels::{ChannelTable, CommandMatch};

use crate::effector::ActionEffector;
use crate::static_files::{self, FileResult, ServedFile};
use crate::tuner::{TuneOutcome, Tuner};

#[derive(Clone)]
pub struct AppContext {
    pub web_root: PathBuf,
    pub table: Arc<ChannelTable>,
    pub tuner: Arc<Tuner>,
    pub effector: Arc<dyn ActionEffector>,
    pub stop_command: String,
}

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .fallback(get(dispatch))
        // a panicking request becomes a 500 for that request only
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

async fn dispatch(
    State(ctx): State<AppContext>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
) -> Response {
    let path = uri.path();
    debug!(%method, %path, client = %addr, "request");

    // Static tree first; the command namespace only applies to paths that
    // do not name a file under the root.
    match static_files::resolve(path, &ctx.web_root).await {
        Ok(FileResult::Found(file)) => return file_response(file),
        Ok(FileResult::NotFound) => {}
        Err(e) => {
            error!(%path, "failed to serve file: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    if path == "/auto/stop" {
        if !ctx.effector.invoke(&ctx.stop_command, &[]) {
            warn!("stop effector did not start");
        }
        return StatusCode::OK.into_response();
    }

    match ctx.table.match_command(path) {
        CommandMatch::Malformed => {
            warn!(%path, "malformed channel command");
            StatusCode::BAD_REQUEST.into_response()
        }
        CommandMatch::NoMatch => StatusCode::NOT_FOUND.into_response(),
        CommandMatch::Entry(entry) => match ctx.tuner.tune(entry, addr.ip()).await {
            TuneOutcome::Redirect(target) => Response::builder()
                .status(StatusCode::FOUND)
                .header(header::LOCATION, target)
                .body(Body::empty())
                .unwrap(),
            TuneOutcome::Busy { current } => (
                StatusCode::CONFLICT,
                format!("tuner busy on channel {current}\n"),
            )
                .into_response(),
        },
    }
}

fn file_response(file: ServedFile) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type)
        .header(header::CONTENT_LENGTH, file.len)
        .header(header::DATE, rfc1123(SystemTime::now()));
    if let Some(modified) = file.modified {
        builder = builder.header(header::LAST_MODIFIED, rfc1123(modified));
    }
    builder
        .body(Body::from_stream(ReaderStream::new(file.file)))
        .unwrap()
}

fn rfc1123(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Bind and serve until a shutdown signal arrives, then drain in-flight
/// requests and release the socket. Port 0 binds an OS-assigned free port.
pub async fn serve(ctx: AppContext, bind_address: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", bind_address, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("control endpoint listening on http://{}", listener.local_addr()?);

    let app = router(ctx);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("shutdown requested, draining in-flight requests");
}
