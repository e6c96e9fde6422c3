//! Purpose: End-to-end tests for the web UI server.
//! Exports: None (integration test module).
//! Role: Validate the generate endpoint, static assets, and error statuses over TCP.
//! Invariants: Uses a loopback-only server on an ephemeral port.
//! Invariants: Bounded waits avoid test flakiness.
//! Invariants: Server processes are cleaned up on drop.

use std::io::Read;
use std::net::{SocketAddr, TcpListener};
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard};
use std::thread::sleep;
use std::time::{Duration, Instant};

type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

static SERVER_LOCK: Mutex<()> = Mutex::new(());

struct TestServer {
    child: Child,
    base_url: String,
    _server_guard: MutexGuard<'static, ()>,
}

impl TestServer {
    fn start() -> TestResult<Self> {
        let guard = SERVER_LOCK
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        let mut last_err: Option<Box<dyn std::error::Error>> = None;
        for _attempt in 0..3 {
            let port = pick_port()?;
            let bind = format!("127.0.0.1:{port}");
            let base_url = format!("http://{bind}");

            let mut child = Command::new(env!("CARGO_BIN_EXE_structsmith"))
                .arg("serve")
                .arg("--bind")
                .arg(&bind)
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()?;

            match wait_for_server(&mut child, bind.parse()?) {
                Ok(()) => {
                    return Ok(Self {
                        child,
                        base_url,
                        _server_guard: guard,
                    });
                }
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    last_err = Some(err);
                    sleep(Duration::from_millis(30));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| "server failed to start".into()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn pick_port() -> TestResult<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

fn wait_for_server(child: &mut Child, addr: SocketAddr) -> TestResult<()> {
    let url = format!("http://{addr}/healthz");
    let start = Instant::now();
    loop {
        if let Ok(resp) = ureq::get(&url).call() {
            if resp.status() == 200 {
                return Ok(());
            }
        }
        if let Some(status) = child.try_wait()? {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            let detail = stderr.trim();
            return Err(format!(
                "server exited before ready (status: {status}, stderr: {})",
                if detail.is_empty() { "<empty>" } else { detail }
            )
            .into());
        }
        if start.elapsed() > Duration::from_secs(8) {
            return Err("server did not start in time".into());
        }
        sleep(Duration::from_millis(20));
    }
}

#[test]
fn index_serves_the_page() -> TestResult<()> {
    let server = TestServer::start()?;

    let resp = ureq::get(&server.url("/")).call()?;
    assert_eq!(resp.status(), 200);
    assert!(
        resp.header("content-type")
            .unwrap_or_default()
            .starts_with("text/html")
    );
    let body = resp.into_string()?;
    assert!(body.contains("structsmith"));
    assert!(body.contains("hx-post=\"/generate\""));
    assert!(body.contains("id=\"output-container\""));
    Ok(())
}

#[test]
fn generate_answers_with_a_highlightable_fragment() -> TestResult<()> {
    let server = TestServer::start()?;

    let resp = ureq::post(&server.url("/generate"))
        .send_form(&[("input", r#"{"name": "kit", "id": 7}"#), ("sort_fields", "on")])?;
    assert_eq!(resp.status(), 200);
    let body = resp.into_string()?;
    assert!(body.contains("class=\"language-rust output\""), "{body}");
    assert!(body.contains("pub struct Generated {"), "{body}");
    assert!(body.contains("pub name: String,"), "{body}");
    Ok(())
}

#[test]
fn empty_input_returns_an_empty_success() -> TestResult<()> {
    let server = TestServer::start()?;

    let resp = ureq::post(&server.url("/generate")).send_form(&[("input", "")])?;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.into_string()?, "");
    Ok(())
}

#[test]
fn malformed_input_is_a_400_with_plain_text() -> TestResult<()> {
    let server = TestServer::start()?;

    match ureq::post(&server.url("/generate")).send_form(&[("input", "{broken")]) {
        Err(ureq::Error::Status(code, resp)) => {
            assert_eq!(code, 400);
            let body = resp.into_string()?;
            assert!(body.starts_with("error:"), "{body}");
        }
        Ok(resp) => return Err(format!("expected 400, got {}", resp.status()).into()),
        Err(other) => return Err(other.into()),
    }
    Ok(())
}

#[test]
fn checkboxes_steer_the_generated_code() -> TestResult<()> {
    let server = TestServer::start()?;

    // Unchecked boxes are absent from the form body, so source order survives.
    let resp = ureq::post(&server.url("/generate"))
        .send_form(&[("input", r#"{"b": 1, "a": 2}"#)])?;
    let body = resp.into_string()?;
    let b_at = body.find("pub b:").ok_or("field b missing")?;
    let a_at = body.find("pub a:").ok_or("field a missing")?;
    assert!(b_at < a_at, "{body}");

    let resp = ureq::post(&server.url("/generate")).send_form(&[
        ("input", r#"{"count": 17}"#),
        ("sort_fields", "on"),
        ("value_comments", "on"),
        ("derive_default", "on"),
    ])?;
    let body = resp.into_string()?;
    assert!(body.contains("// Ex: 17"), "{body}");
    assert!(body.contains("Default"), "{body}");
    Ok(())
}

#[test]
fn generated_markup_is_escaped() -> TestResult<()> {
    let server = TestServer::start()?;

    let resp = ureq::post(&server.url("/generate"))
        .send_form(&[("input", r#"{"items": []}"#)])?;
    let body = resp.into_string()?;
    assert!(body.contains("Vec&lt;String&gt;"), "{body}");
    assert!(!body.contains("Vec<String>"), "{body}");
    Ok(())
}

#[test]
fn static_assets_are_served() -> TestResult<()> {
    let server = TestServer::start()?;

    let js = ureq::get(&server.url("/static/app.js")).call()?;
    assert_eq!(js.status(), 200);
    assert!(
        js.header("content-type")
            .unwrap_or_default()
            .starts_with("application/javascript")
    );
    let js_body = js.into_string()?;
    assert!(js_body.contains("htmx:beforeSwap"));
    assert!(js_body.contains("htmx:beforeRequest"));

    let css = ureq::get(&server.url("/static/style.css")).call()?;
    assert_eq!(css.status(), 200);
    assert!(
        css.header("content-type")
            .unwrap_or_default()
            .starts_with("text/css")
    );
    Ok(())
}

#[test]
fn healthz_answers_ok() -> TestResult<()> {
    let server = TestServer::start()?;

    let resp = ureq::get(&server.url("/healthz")).call()?;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.into_string()?, r#"{"ok":true}"#);
    Ok(())
}
