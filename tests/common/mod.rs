//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use map_starter_kit::config::{KitConfig, PathsConfig, ResolvedPaths};
use map_starter_kit::http::HttpServer;

/// Directory holding the shipped views.
pub fn shipped_core_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// A scratch working directory for `.env.secret`.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_secret(&self, content: &str) {
        std::fs::write(self.dir.path().join(".env.secret"), content).unwrap();
    }
}

/// Config pointing the server at `core_root` and `working_dir`.
pub fn config_for(core_root: &Path, working_dir: &Path) -> (KitConfig, ResolvedPaths) {
    let mut config = KitConfig::default();
    config.paths = PathsConfig {
        core_root: Some(core_root.to_path_buf()),
        working_dir: Some(working_dir.to_path_buf()),
        ..PathsConfig::default()
    };
    let paths = ResolvedPaths::resolve_from(&config.paths, working_dir);
    (config, paths)
}

/// Server over the shipped views with a scratch working directory.
pub fn shipped_server(workspace: &Workspace) -> HttpServer {
    let (config, paths) = config_for(&shipped_core_root(), workspace.path());
    HttpServer::new(config, paths).unwrap()
}

/// Collect a response body as UTF-8.
pub async fn body_string(res: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `GET path` with an optional Host header.
pub fn get(path: &str, host: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(host) = host {
        builder = builder.header("host", host);
    }
    builder.body(Body::empty()).unwrap()
}

/// Request line of one mocked call.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
}

/// Start a programmable mock backend on an ephemeral port.
///
/// The request is read fully before the canned `(status, json body)` is
/// written, so clients never see a reset.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut remaining = content_length.saturating_sub(buf.len() - header_end);
    while remaining > 0 {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        remaining = remaining.saturating_sub(n);
    }

    let mut parts = head.lines().next()?.split_whitespace();
    Some(MockRequest {
        method: parts.next()?.to_string(),
        path: parts.next()?.to_string(),
    })
}
