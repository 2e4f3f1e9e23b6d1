use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::config::ServiceConfig;

pub const ROOM_BODY: &str = r#"{"data":{"data":{"data":[{"room_view_stats":{"display_value":"1.2万"}}]}}}"#;

pub fn count_body(value: &str) -> String {
    format!(
        r#"{{"data":{{"data":{{"data":[{{"room_view_stats":{{"display_value":"{}"}}}}]}}}}}}"#,
        value
    )
}

/// Local HTTP server answering the n-th connection with the n-th canned
/// response (the last one repeats). Records request lines.
pub struct CannedServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    pub async fn start(responses: Vec<(String, Duration)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let server_hits = hits.clone();
        let server_requests = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let index = server_hits.fetch_add(1, Ordering::SeqCst);
                let (body, delay) = responses[index.min(responses.len() - 1)].clone();
                let requests = server_requests.clone();

                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let Ok(n) = socket.read(&mut buf).await else {
                        return;
                    };
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    requests
                        .lock()
                        .unwrap()
                        .push(request.lines().next().unwrap_or_default().to_string());

                    tokio::time::sleep(delay).await;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });

        Self { addr, hits, requests }
    }

    pub async fn always(body: &str) -> Self {
        Self::start(vec![(body.to_string(), Duration::ZERO)]).await
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn service(&self, timeout_ms: u64) -> ServiceConfig {
        ServiceConfig {
            base_url: format!("http://{}", self.addr),
            timeout_ms,
            version: None,
            platform: None,
        }
    }
}

/// Service config pointing at a port nothing listens on.
pub async fn unreachable_service() -> ServiceConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ServiceConfig {
        base_url: format!("http://{}", addr),
        timeout_ms: 1000,
        version: None,
        platform: None,
    }
}
