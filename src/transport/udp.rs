//! UDP transport for magic packets

use crate::transport::traits::{DatagramConnector, DatagramSocket};
use anyhow::Result;
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::debug;

/// UDP socket wrapper implementing DatagramSocket
pub struct UdpDatagramSocket {
    inner: UdpSocket,
}

impl UdpDatagramSocket {
    pub fn new(socket: UdpSocket) -> Self {
        Self { inner: socket }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.inner.local_addr()?)
    }
}

#[async_trait]
impl DatagramSocket for UdpDatagramSocket {
    async fn send_to(&self, payload: &[u8], target: SocketAddr) -> Result<usize> {
        let sent = self.inner.send_to(payload, target).await?;
        Ok(sent)
    }
}

/// Opens broadcast-capable UDP sockets
pub struct UdpConnector {
    bind_address: SocketAddr,
}

impl UdpConnector {
    /// Bind to all interfaces on an ephemeral port
    pub fn new() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        }
    }
}

impl Default for UdpConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatagramConnector for UdpConnector {
    type Socket = UdpDatagramSocket;

    async fn open(&self) -> Result<Self::Socket> {
        let socket = UdpSocket::bind(self.bind_address).await?;
        socket.set_broadcast(true)?;

        let socket = UdpDatagramSocket::new(socket);
        debug!("Opened UDP socket on {}", socket.local_addr()?);
        Ok(socket)
    }

    fn name(&self) -> &'static str {
        "UDP"
    }
}
