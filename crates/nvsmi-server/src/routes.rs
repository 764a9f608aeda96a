use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, Response, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use nvsmi_core::Scraper;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const INDEX_HTML: &str = r#"<!doctype html>
<html>
    <head>
        <meta charset="utf-8">
        <title>Nvidia SMI Exporter</title>
    </head>
    <body>
        <h1>Nvidia SMI Exporter</h1>
        <p><a href="/metrics">Metrics</a></p>
    </body>
</html>"#;

pub fn router(scraper: Scraper) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    Router::new()
        .route("/", get(index))
        .route("/metrics", get(metrics))
        .fallback(index)
        .layer(trace_layer)
        .with_state(scraper)
}

async fn index() -> Html<&'static str> {
    info!("Serving /index");
    Html(INDEX_HTML)
}

async fn metrics(State(scraper): State<Scraper>) -> Result<impl IntoResponse, StatusCode> {
    info!("Serving /metrics");

    match scraper.scrape().await {
        Ok(text) => Ok(([(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], text)),
        Err(e) => {
            error!("Scrape failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
