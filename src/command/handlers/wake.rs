//! Wake-on-LAN handler

use crate::config::WakeSettings;
use crate::transport::{DatagramConnector, DatagramSocket};
use bytes::Bytes;
use power_remote_shared::codec::{broadcast_address, magic_packet};
use power_remote_shared::{ActionError, DeviceActionRequest, MacAddress};
use std::net::{IpAddr, SocketAddr};
use tokio::net::lookup_host;
use tokio::time::sleep;
use tracing::{debug, error, info};

const LOG_TARGET: &str = "WOL";

/// A validated wake request
#[derive(Debug, Clone)]
pub struct WakePlan {
    pub mac: MacAddress,
    pub packet: Bytes,
    pub broadcast: String,
    pub port: u16,
}

/// Check the MAC address and derive the broadcast target. No I/O.
pub fn prepare_wake(request: &DeviceActionRequest) -> Result<WakePlan, ActionError> {
    let mac: MacAddress = request.mac_address.parse().inspect_err(|_| {
        error!(target: LOG_TARGET, "Invalid MAC address: {:?}", request.mac_address);
    })?;

    Ok(WakePlan {
        mac,
        packet: magic_packet(&mac),
        broadcast: broadcast_address(&request.host_address),
        port: request.wake_port,
    })
}

/// Send the magic packet `repeat_count` times to the broadcast address.
///
/// The socket is dropped on every exit path. A failed send aborts the
/// remaining attempts; there is no acknowledgment to wait for, so success
/// only means the packets left this host.
pub async fn send_wake<C>(
    settings: &WakeSettings,
    plan: &WakePlan,
    connector: &C,
) -> Result<String, ActionError>
where
    C: DatagramConnector,
{
    let total = settings.repeat_count;
    debug!(
        target: LOG_TARGET,
        "Sending WOL to {}:{} with MAC {}", plan.broadcast, plan.port, plan.mac
    );

    let target = resolve(&plan.broadcast, plan.port).await.inspect_err(|e| {
        error!(target: LOG_TARGET, "Cannot resolve {}: {:?}", plan.broadcast, e);
    })?;

    let socket = connector.open().await.map_err(|e| {
        error!(target: LOG_TARGET, "Failed to open {} socket: {:#}", connector.name(), e);
        ActionError::Transport(format!("{e:#}"))
    })?;

    for attempt in 1..=total {
        if attempt > 1 {
            sleep(settings.interval()).await;
        }

        if let Err(e) = socket.send_to(&plan.packet, target).await {
            error!(target: LOG_TARGET, "Packet {}/{} failed: {:#}", attempt, total, e);
            return Err(ActionError::SendFailed {
                sent: attempt - 1,
                total,
                cause: format!("{e:#}"),
            });
        }
        debug!(target: LOG_TARGET, "Packet sent {}/{}", attempt, total);
    }
    drop(socket);

    info!(target: LOG_TARGET, "WOL completed");
    Ok(format!("sent {} packets to {}:{}", total, plan.broadcast, plan.port))
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr, ActionError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    lookup_host((host, port))
        .await
        .map_err(|e| ActionError::AddressResolutionFailed(e.to_string()))?
        .next()
        .ok_or_else(|| ActionError::AddressResolutionFailed(format!("no addresses found for {host}")))
}
