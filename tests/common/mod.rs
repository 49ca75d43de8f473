//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use auth_site::lifecycle::startup;
use auth_site::settings::{ServiceSettings, StorageBackend};
use auth_site::storage::MemoryStore;
use auth_site::{HttpServer, Shutdown};

/// Start a programmable mock HTTP backend on an ephemeral port.
///
/// `f` receives the request path and returns the status and body.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
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
                        let path = read_request_path(&mut socket).await;
                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
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

async fn read_request_path(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    let text = String::from_utf8_lossy(&buf);
    text.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string()
}

/// A running service over an in-memory store.
#[allow(dead_code)]
pub struct TestService {
    pub base: String,
    pub store: Arc<MemoryStore>,
    pub shutdown: Shutdown,
    pub client: reqwest::Client,
}

#[allow(dead_code)]
impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// GET with the caller email header.
    pub fn get_as(&self, email: &str, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).header("x-user-email", email)
    }

    pub fn post_as(&self, email: &str, path: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path)).header("x-user-email", email)
    }

    pub fn put_as(&self, email: &str, path: &str) -> reqwest::RequestBuilder {
        self.client.put(self.url(path)).header("x-user-email", email)
    }

    pub fn patch_as(&self, email: &str, path: &str) -> reqwest::RequestBuilder {
        self.client.patch(self.url(path)).header("x-user-email", email)
    }
}

/// Spawn the HTTP service on an ephemeral port with `admins` allowed.
#[allow(dead_code)]
pub async fn spawn_service(admins: &[&str]) -> TestService {
    let store = Arc::new(MemoryStore::new());

    let mut settings = ServiceSettings::default();
    settings.storage.backend = StorageBackend::Memory;
    settings.admin.admin_emails = admins.iter().map(|a| a.to_string()).collect();
    settings.cookies.domain = Some(".example.com".to_string());

    let state = startup::build_state(settings, store.clone()).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(state);
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });

    TestService {
        base: format!("http://{}", addr),
        store,
        shutdown,
        client: reqwest::Client::new(),
    }
}
