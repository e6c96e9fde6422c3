//! Purpose: Provide the browser UI server for structsmith.
//! Exports: `ServeConfig`, `serve`.
//! Role: Axum-based loopback server; index page plus an HTML-fragment generate endpoint.
//! Invariants: Generated code is HTML-escaped before it is embedded in a fragment.
//! Invariants: Loopback-only unless explicitly allowed.
//! Notes: An empty input is answered with an empty 200 body, not an error.

use axum::extract::{DefaultBodyLimit, Form};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use std::future::IntoFuture;
use std::net::{IpAddr, SocketAddr};
use tokio::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use structsmith::api::{Error, ErrorKind, GenerateOptions, generate_source};

const INDEX_HTML: &str = include_str!("../assets/index.html");
const APP_JS: &str = include_str!("../assets/app.js");
const STYLE_CSS: &str = include_str!("../assets/style.css");

/// Base type name for code generated through the web form.
const WEB_BASE_NAME: &str = "Generated";

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub allow_non_loopback: bool,
    pub max_body_bytes: u64,
}

pub async fn serve(config: ServeConfig) -> Result<(), Error> {
    validate_config(&config)?;

    init_tracing();

    let max_body_bytes: usize = config
        .max_body_bytes
        .try_into()
        .map_err(|_| Error::new(ErrorKind::Usage).with_message("--max-body-bytes is too large"))?;

    let app = Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/static/app.js", get(app_js))
        .route("/static/style.css", get(style_css))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to bind server")
                .with_source(err)
        })?;
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("serving on http://{addr}/");
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("server failed")
                    .with_source(err)
            })?;
        }
        _ = shutdown_signal() => {
            let _ = shutdown_tx.send(());
            match tokio::time::timeout(Duration::from_secs(10), &mut server).await {
                Ok(result) => result.map_err(|err| {
                    Error::new(ErrorKind::Io)
                        .with_message("server failed")
                        .with_source(err)
                })?,
                Err(_) => {
                    return Err(Error::new(ErrorKind::Io).with_message("server shutdown timed out"));
                }
            }
        }
    };
    Ok(())
}

fn is_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(addr) => addr.is_loopback(),
        IpAddr::V6(addr) => addr.is_loopback(),
    }
}

fn validate_config(config: &ServeConfig) -> Result<(), Error> {
    if !is_loopback(config.bind.ip()) && !config.allow_non_loopback {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("non-loopback bind requires explicit opt-in")
            .with_hint("Re-run with --allow-non-loopback or use a loopback address."));
    }

    if config.max_body_bytes == 0 {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("--max-body-bytes must be greater than zero")
            .with_hint("Use a positive value like 1048576."));
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        let mut signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler");
        signal.recv().await;
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
}

#[derive(Debug, Deserialize)]
struct GenerateForm {
    #[serde(default)]
    input: String,
    #[serde(default)]
    sort_fields: Option<String>,
    #[serde(default)]
    value_comments: Option<String>,
    #[serde(default)]
    derive_default: Option<String>,
}

// Unchecked checkboxes are absent from the form body; checked ones post "on".
fn checkbox(value: &Option<String>) -> bool {
    value.as_deref() == Some("on")
}

async fn index() -> Response {
    html_response(INDEX_HTML)
}

async fn app_js() -> Response {
    static_response(APP_JS, "application/javascript; charset=utf-8")
}

async fn style_css() -> Response {
    static_response(STYLE_CSS, "text/css; charset=utf-8")
}

async fn healthz() -> Response {
    let mut response = r#"{"ok":true}"#.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

async fn generate(Form(form): Form<GenerateForm>) -> Response {
    if form.input.is_empty() {
        return html_response("");
    }
    let options = GenerateOptions {
        name: None,
        sort_fields: checkbox(&form.sort_fields),
        value_comments: checkbox(&form.value_comments),
        derive_default: checkbox(&form.derive_default),
    };
    match generate_source(&options, WEB_BASE_NAME, &form.input) {
        Ok(code) => html_response(&render_fragment(&code)),
        Err(err) => error_response(err),
    }
}

/// The swap target fragment: generated code inside an element carrying the
/// `output` class, ready for client-side highlighting.
fn render_fragment(code: &str) -> String {
    format!(
        "<pre><code class=\"language-rust output\">{}</code></pre>",
        html_escape(code)
    )
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn html_response(body: impl Into<String>) -> Response {
    let mut response = body.into().into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}

fn static_response(body: &'static str, content_type: &'static str) -> Response {
    let mut response = body.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type),
    );
    response
}

// The browser host never renders these bodies (failed swaps are suppressed);
// they exist for curl users and logs.
fn error_response(err: Error) -> Response {
    let status = match err.kind() {
        ErrorKind::Usage | ErrorKind::Parse => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Io | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = format!("error: {}", err.message().unwrap_or("generation failed"));
    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(bind: &str) -> ServeConfig {
        ServeConfig {
            bind: bind.parse().expect("bind"),
            allow_non_loopback: false,
            max_body_bytes: 1024 * 1024,
        }
    }

    #[tokio::test]
    async fn serve_rejects_non_loopback_bind() {
        let err = serve(config("0.0.0.0:0")).await.expect_err("usage error");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn non_loopback_requires_allow_flag() {
        let err = validate_config(&config("0.0.0.0:0")).expect_err("usage error");
        assert_eq!(err.kind(), ErrorKind::Usage);

        let mut allowed = config("0.0.0.0:0");
        allowed.allow_non_loopback = true;
        validate_config(&allowed).expect("config ok");
    }

    #[test]
    fn loopback_binds_are_accepted() {
        validate_config(&config("127.0.0.1:0")).expect("config ok");
        validate_config(&config("[::1]:0")).expect("config ok");
    }

    #[test]
    fn body_limit_must_be_positive() {
        let mut zero = config("127.0.0.1:0");
        zero.max_body_bytes = 0;
        let err = validate_config(&zero).expect_err("usage error");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn checkboxes_post_on_when_checked() {
        assert!(checkbox(&Some("on".to_string())));
        assert!(!checkbox(&Some("off".to_string())));
        assert!(!checkbox(&None));
    }

    #[test]
    fn fragments_escape_generated_code() {
        let fragment = render_fragment("pub x: Vec<String>, // \"quoted\" & more");
        assert!(fragment.starts_with("<pre><code class=\"language-rust output\">"));
        assert!(fragment.contains("Vec&lt;String&gt;"));
        assert!(fragment.contains("&quot;quoted&quot; &amp; more"));
        assert!(!fragment.contains("Vec<String>"));
    }

    #[test]
    fn parse_failures_map_to_bad_request() {
        let response = error_response(Error::new(ErrorKind::Parse).with_message("bad json"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = error_response(Error::new(ErrorKind::Internal));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
