//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Request head sizes seen by a mock intermediary, in arrival order.
pub type SeenSizes = Arc<Mutex<Vec<usize>>>;

/// Start a mock intermediary whose response status depends on the size of
/// the request head (request line through the blank line).
pub async fn start_programmable_intermediary<F>(respond: F) -> (SocketAddr, SeenSizes)
where
    F: Fn(usize) -> u16 + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: SeenSizes = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let seen_task = seen.clone();
    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let respond = respond.clone();
            let seen = seen_task.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];
                let head_len = loop {
                    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                        break pos + 4;
                    }
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                };
                seen.lock().unwrap().push(head_len);

                let status = respond(head_len);
                let body = format!("head was {} bytes", head_len);
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, seen)
}

/// Start a mock intermediary that rejects heads larger than `limit` with 431.
pub async fn start_limited_intermediary(limit: usize) -> (SocketAddr, SeenSizes) {
    start_programmable_intermediary(move |size| if size <= limit { 200 } else { 431 }).await
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        431 => "Request Header Fields Too Large",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
