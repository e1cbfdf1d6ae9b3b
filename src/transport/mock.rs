//! Test doubles for the transport traits

use crate::transport::traits::{DatagramConnector, DatagramSocket, ShutdownTransport};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// A datagram handed to a recording socket
#[derive(Debug, Clone)]
pub struct SentDatagram {
    pub payload: Vec<u8>,
    pub target: SocketAddr,
    pub at: Instant,
}

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<SentDatagram>>,
    attempts: AtomicUsize,
    opened: AtomicUsize,
    released: AtomicUsize,
}

/// Connector whose sockets record every datagram instead of sending it
#[derive(Clone, Default)]
pub struct RecordingConnector {
    recorder: Arc<Recorder>,
    fail_on_attempt: Option<usize>,
    fail_open: bool,
}

impl RecordingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the n-th send (1-based, across all sockets) fail
    pub fn failing_on_attempt(attempt: usize) -> Self {
        Self {
            fail_on_attempt: Some(attempt),
            ..Self::default()
        }
    }

    /// Make opening a socket fail
    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentDatagram> {
        self.recorder.sent.lock().unwrap().clone()
    }

    pub fn opened(&self) -> usize {
        self.recorder.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.recorder.released.load(Ordering::SeqCst)
    }
}

pub struct RecordingSocket {
    recorder: Arc<Recorder>,
    fail_on_attempt: Option<usize>,
}

#[async_trait]
impl DatagramSocket for RecordingSocket {
    async fn send_to(&self, payload: &[u8], target: SocketAddr) -> Result<usize> {
        let attempt = self.recorder.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_attempt == Some(attempt) {
            return Err(anyhow!("network unreachable"));
        }

        self.recorder.sent.lock().unwrap().push(SentDatagram {
            payload: payload.to_vec(),
            target,
            at: Instant::now(),
        });
        Ok(payload.len())
    }
}

impl Drop for RecordingSocket {
    fn drop(&mut self) {
        self.recorder.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DatagramConnector for RecordingConnector {
    type Socket = RecordingSocket;

    async fn open(&self) -> Result<Self::Socket> {
        if self.fail_open {
            return Err(anyhow!("permission denied"));
        }

        self.recorder.opened.fetch_add(1, Ordering::SeqCst);
        Ok(RecordingSocket {
            recorder: self.recorder.clone(),
            fail_on_attempt: self.fail_on_attempt,
        })
    }

    fn name(&self) -> &'static str {
        "Recording"
    }
}

/// Shutdown transport returning a fixed status and recording each call
#[derive(Clone)]
pub struct MockShutdown {
    response: std::result::Result<u16, String>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockShutdown {
    pub fn status(status: u16) -> Self {
        Self {
            response: Ok(status),
            calls: Arc::default(),
        }
    }

    pub fn failing(cause: &str) -> Self {
        Self {
            response: Err(cause.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShutdownTransport for MockShutdown {
    async fn post_shutdown(&self, host: &str, key: &str) -> Result<u16> {
        self.calls
            .lock()
            .unwrap()
            .push((host.to_string(), key.to_string()));
        self.response.clone().map_err(|cause| anyhow!(cause))
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}

/// Raw HTTP request captured by [`MockHttpServer`]
#[derive(Debug)]
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

/// Minimal HTTP/1.1 server answering every request with a fixed status
pub struct MockHttpServer {
    port: u16,
    requests: mpsc::UnboundedReceiver<CapturedRequest>,
    _task: tokio::task::JoinHandle<()>,
}

impl MockHttpServer {
    pub async fn start(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, requests) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(request) = read_request(&mut socket).await {
                        let _ = tx.send(request);
                    }
                    let response = format!(
                        "HTTP/1.1 {status} Mock\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            port,
            requests,
            _task: task,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn next_request(&mut self) -> Option<CapturedRequest> {
        tokio::time::timeout(Duration::from_secs(5), self.requests.recv())
            .await
            .ok()
            .flatten()
    }

    /// Whether a request arrived without waiting for one
    pub fn has_request(&mut self) -> bool {
        self.requests.try_recv().is_ok()
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let length = content_length(&head);

    while buf.len() < head_end + length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = buf[head_end..head_end + length].to_vec();
    Some(CapturedRequest { head, body })
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}
