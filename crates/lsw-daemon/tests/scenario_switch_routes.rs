//! In-process scenario tests for the /state and /switch endpoints.
//!
//! These tests spin up the Axum router **without** binding a TCP socket.
//! Each test calls `routes::build_router` and drives it via
//! `tower::ServiceExt::oneshot`; no network I/O required.

use std::sync::Arc;

use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use lsw_daemon::{routes, state, template::SwitchTemplate};
use tower::ServiceExt; // oneshot

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TEMPLATE: &str = "<h1>{{.Name}}</h1>\
<p id=\"state\">{{.State}}</p>\
<p id=\"next\">{{.Next}}</p>\
<time>{{.Timestamp}}</time>";

fn make_state_with(template: &str) -> Arc<state::AppState> {
    let template = SwitchTemplate::parse(template).expect("test template parses");
    Arc::new(state::AppState::new(
        state::boot_switch("Light"),
        template,
        "does-not-exist",
    ))
}

fn make_state() -> Arc<state::AppState> {
    make_state_with(TEMPLATE)
}

async fn call(router: axum::Router, req: Request<axum::body::Body>) -> (StatusCode, bytes::Bytes) {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    (status, body)
}

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

fn text(b: &bytes::Bytes) -> String {
    String::from_utf8(b.to_vec()).expect("body is not utf-8")
}

// ---------------------------------------------------------------------------
// GET /state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn state_returns_boot_state_off() {
    let (status, body) = call(routes::build_router(make_state()), get("/state")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&body), "off");
}

#[tokio::test]
async fn state_rejects_post_with_405() {
    let st = make_state();
    let (status, body) = call(
        routes::build_router(Arc::clone(&st)),
        post_form("/state", "state=on"),
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body.is_empty());
    assert_eq!(st.switch.read().await.state(), "off", "no mutation via /state");
}

// ---------------------------------------------------------------------------
// GET /switch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn switch_view_renders_boot_fields() {
    let (status, body) = call(routes::build_router(make_state()), get("/switch")).await;
    assert_eq!(status, StatusCode::OK);

    let html = text(&body);
    assert!(html.contains("<h1>Light</h1>"), "{html}");
    assert!(html.contains("<p id=\"state\">off</p>"), "{html}");
    assert!(html.contains("<p id=\"next\">on</p>"), "{html}");
    assert!(html.contains("<time>1970-01-01T00:00:00Z</time>"), "{html}");
}

#[tokio::test]
async fn switch_view_is_html() {
    let resp = routes::build_router(make_state())
        .oneshot(get("/switch"))
        .await
        .unwrap();
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(ct.starts_with("text/html"), "got {ct}");
}

// ---------------------------------------------------------------------------
// POST /switch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn post_on_renders_new_state_and_state_endpoint_follows() {
    let st = make_state();

    let (status, body) = call(
        routes::build_router(Arc::clone(&st)),
        post_form("/switch", "state=on"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let html = text(&body);
    assert!(html.contains("<p id=\"state\">on</p>"), "{html}");
    assert!(html.contains("<p id=\"next\">off</p>"), "{html}");
    assert!(
        !html.contains("1970-01-01T00:00:00Z"),
        "timestamp must be stamped: {html}"
    );

    let (_, body) = call(routes::build_router(Arc::clone(&st)), get("/state")).await;
    assert_eq!(text(&body), "on");
}

#[tokio::test]
async fn post_without_state_field_is_400_and_no_mutation() {
    let st = make_state();

    let (status, body) = call(
        routes::build_router(Arc::clone(&st)),
        post_form("/switch", "colour=blue"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    let sw = st.switch.read().await;
    assert_eq!(sw.state(), "off");
    assert_eq!(sw.timestamp(), 0);
}

#[tokio::test]
async fn post_without_body_or_content_type_is_400() {
    let st = make_state();
    let req = Request::builder()
        .method("POST")
        .uri("/switch")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, _) = call(routes::build_router(Arc::clone(&st)), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(st.switch.read().await.state(), "off");
}

#[tokio::test]
async fn post_empty_value_is_applied_verbatim() {
    let st = make_state();

    let (status, _) = call(
        routes::build_router(Arc::clone(&st)),
        post_form("/switch", "state="),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let sw = st.switch.read().await;
    assert_eq!(sw.state(), "");
    assert_eq!(sw.next(), "on", "next unchanged for unrecognised state");
    assert!(sw.timestamp() > 0);
}

#[tokio::test]
async fn post_unrecognised_state_keeps_next() {
    let st = make_state();

    let (status, body) = call(
        routes::build_router(Arc::clone(&st)),
        post_form("/switch", "state=dimmed"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let html = text(&body);
    assert!(html.contains("<p id=\"state\">dimmed</p>"), "{html}");
    assert!(html.contains("<p id=\"next\">on</p>"), "{html}");
}

#[tokio::test]
async fn post_first_state_value_wins() {
    let st = make_state();
    let _ = call(
        routes::build_router(Arc::clone(&st)),
        post_form("/switch", "state=on&state=off"),
    )
    .await;
    assert_eq!(st.switch.read().await.state(), "on");
}

#[tokio::test]
async fn post_reads_query_when_body_lacks_field() {
    let st = make_state();
    let req = Request::builder()
        .method("POST")
        .uri("/switch?state=on")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, _) = call(routes::build_router(Arc::clone(&st)), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(st.switch.read().await.state(), "on");
}

#[tokio::test]
async fn post_body_takes_precedence_over_query() {
    let st = make_state();
    let _ = call(
        routes::build_router(Arc::clone(&st)),
        post_form("/switch?state=off", "state=on"),
    )
    .await;
    assert_eq!(st.switch.read().await.state(), "on");
}

#[tokio::test]
async fn repeated_post_advances_timestamp() {
    let st = make_state();

    let _ = call(
        routes::build_router(Arc::clone(&st)),
        post_form("/switch", "state=on"),
    )
    .await;
    let first = st.switch.read().await.timestamp();

    let _ = call(
        routes::build_router(Arc::clone(&st)),
        post_form("/switch", "state=on"),
    )
    .await;
    let sw = st.switch.read().await;

    assert_eq!((sw.state(), sw.next()), ("on", "off"));
    assert!(sw.timestamp() > first);
}

#[tokio::test]
async fn submitted_markup_is_escaped_in_view() {
    let st = make_state();
    let (status, body) = call(
        routes::build_router(Arc::clone(&st)),
        post_form("/switch", "state=%3Cscript%3E"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let html = text(&body);
    assert!(html.contains("&lt;script&gt;"), "{html}");
    assert!(!html.contains("<script>"), "{html}");

    // /state is raw text, not HTML.
    let (_, body) = call(routes::build_router(st), get("/state")).await;
    assert_eq!(text(&body), "<script>");
}

#[tokio::test]
async fn switch_rejects_delete_with_405() {
    let req = Request::builder()
        .method("DELETE")
        .uri("/switch")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, _) = call(routes::build_router(make_state()), req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// ---------------------------------------------------------------------------
// Render failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn render_failure_is_500_with_empty_body() {
    let (status, body) = call(
        routes::build_router(make_state_with("<p>{{.Colour}}</p>")),
        get("/switch"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());
}

#[tokio::test]
async fn render_failure_after_post_still_applies_transition() {
    let st = make_state_with("{{.Colour}}");
    let (status, _) = call(
        routes::build_router(Arc::clone(&st)),
        post_form("/switch", "state=on"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(st.switch.read().await.state(), "on");
}
