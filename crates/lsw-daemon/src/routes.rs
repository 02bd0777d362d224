//! Axum router and all HTTP handlers for lsw-daemon.
//!
//! `build_router` is the single entry point. It carries the request-log
//! middleware and the static-file fallback; `main.rs` only adds the
//! tower-http trace layer, so tests exercise the full surface without it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Query, Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use lsw_switch::SwitchSnapshot;
use tower_http::services::ServeDir;
use tracing::{debug, error, info};

use crate::state::AppState;

/// Form field carrying the requested state.
pub const STATE_FIELD: &str = "state";

type Pairs = Vec<(String, String)>;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/state", get(state_handler).fallback(unsupported_method))
        .route(
            "/switch",
            get(switch_view)
                .post(switch_submit)
                .fallback(unsupported_method),
        )
        .fallback_service(static_files)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

/// One line per request: remote address, protocol, method, host, path.
async fn log_request(req: Request, next: Next) -> Response {
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    info!(
        remote = %remote,
        proto = ?req.version(),
        method = %req.method(),
        host = %host,
        path = %req.uri().path(),
        "request"
    );

    next.run(req).await
}

// ---------------------------------------------------------------------------
// GET /state
// ---------------------------------------------------------------------------

pub(crate) async fn state_handler(State(st): State<Arc<AppState>>) -> String {
    let state = st.switch.read().await.state().to_string();
    debug!(bytes = state.len(), "state written");
    state
}

// ---------------------------------------------------------------------------
// GET /switch
// ---------------------------------------------------------------------------

pub(crate) async fn switch_view(State(st): State<Arc<AppState>>) -> Response {
    let snap = st.switch.read().await.snapshot();
    render_switch(&st, &snap)
}

// ---------------------------------------------------------------------------
// POST /switch
// ---------------------------------------------------------------------------

/// Apply the submitted `state` and render the view.
///
/// Body fields come before query fields; the first `state` value wins.
/// A request with no `state` field at all is 400 and leaves the switch as is.
pub(crate) async fn switch_submit(
    State(st): State<Arc<AppState>>,
    query: Option<Query<Pairs>>,
    form: Option<Form<Pairs>>,
) -> Response {
    let values: Vec<String> = form
        .map(|Form(pairs)| pairs)
        .unwrap_or_default()
        .into_iter()
        .chain(query.map(|Query(pairs)| pairs).unwrap_or_default())
        .filter(|(k, _)| k == STATE_FIELD)
        .map(|(_, v)| v)
        .collect();
    info!(?values, "submitted state");

    let Some(requested) = values.into_iter().next() else {
        info!("switch request missing state field");
        return StatusCode::BAD_REQUEST.into_response();
    };

    // Transition and snapshot under one guard so the page shows this request's result.
    let snap = {
        let mut sw = st.switch.write().await;
        sw.transition(&requested);
        sw.snapshot()
    };

    render_switch(&st, &snap)
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

fn render_switch(st: &AppState, snap: &SwitchSnapshot) -> Response {
    match st.template.render(&snap.view()) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(%err, "switch view render failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn unsupported_method(method: Method) -> StatusCode {
    info!(%method, "unsupported method");
    StatusCode::METHOD_NOT_ALLOWED
}
