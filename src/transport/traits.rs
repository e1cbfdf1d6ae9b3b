//! Transport trait abstraction for pluggable network backends

use anyhow::Result;
use async_trait::async_trait;
use std::net::SocketAddr;

/// A connectionless socket that sends whole datagrams
#[async_trait]
pub trait DatagramSocket: Send + Sync + 'static {
    /// Send one datagram, returning the number of bytes written
    async fn send_to(&self, payload: &[u8], target: SocketAddr) -> Result<usize>;
}

/// Factory for datagram sockets. Each call yields a fresh socket that is
/// released when dropped.
#[async_trait]
pub trait DatagramConnector: Send + Sync {
    /// The socket type this connector produces
    type Socket: DatagramSocket;

    /// Open a new socket on an ephemeral local port
    async fn open(&self) -> Result<Self::Socket>;

    /// Human-readable name for this transport
    fn name(&self) -> &'static str;
}

/// Sends an authenticated shutdown request to a host
#[async_trait]
pub trait ShutdownTransport: Send + Sync {
    /// Issue one request and return the HTTP status code of the response
    async fn post_shutdown(&self, host: &str, key: &str) -> Result<u16>;

    /// Human-readable name for this transport
    fn name(&self) -> &'static str;
}
