pub mod http;
#[cfg(test)]
pub mod mock;
pub mod traits;
pub mod udp;

pub use http::HttpShutdownClient;
pub use traits::{DatagramConnector, DatagramSocket, ShutdownTransport};
pub use udp::UdpConnector;
