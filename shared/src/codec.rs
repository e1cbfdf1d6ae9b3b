//! Wake-on-LAN codec
//!
//! A magic packet is laid out as:
//! ```text
//! [ 6 bytes: 0xFF ][ 6 bytes: MAC ] x 16
//! ```
//!
//! It is sent to the broadcast address of the target's subnet, since a
//! sleeping machine cannot be addressed directly.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{ActionError, MacAddress};

/// Length of the leading 0xFF synchronization stream
pub const SYNC_STREAM_LEN: usize = 6;

/// How often the MAC is repeated after the synchronization stream
pub const MAC_REPETITIONS: usize = 16;

/// Total size of a magic packet (102 bytes)
pub const MAGIC_PACKET_LEN: usize = SYNC_STREAM_LEN + 6 * MAC_REPETITIONS;

/// Build the magic packet for a parsed MAC address
pub fn magic_packet(mac: &MacAddress) -> Bytes {
    let mut buf = BytesMut::with_capacity(MAGIC_PACKET_LEN);

    buf.put_bytes(0xFF, SYNC_STREAM_LEN);
    for _ in 0..MAC_REPETITIONS {
        buf.put_slice(mac.as_bytes());
    }

    buf.freeze()
}

/// Parse a MAC address string and build its magic packet
pub fn build_magic_packet(mac: &str) -> Result<Bytes, ActionError> {
    let mac: MacAddress = mac.parse()?;
    Ok(magic_packet(&mac))
}

/// Recover the target MAC from a magic packet, if the layout is valid
pub fn decode_magic_packet(packet: &[u8]) -> Option<MacAddress> {
    if packet.len() != MAGIC_PACKET_LEN {
        return None;
    }

    let (sync, body) = packet.split_at(SYNC_STREAM_LEN);
    if sync.iter().any(|&b| b != 0xFF) {
        return None;
    }

    let mut mac = [0u8; 6];
    mac.copy_from_slice(&body[..6]);
    if body.chunks_exact(6).any(|chunk| chunk != mac) {
        return None;
    }

    Some(MacAddress::new(mac))
}

/// Derive the broadcast address for a dotted IPv4 host.
///
/// Always assumes a /24 network: the last part is replaced with `255`.
/// Input that does not have exactly four parts is returned unchanged.
pub fn broadcast_address(host: &str) -> String {
    let parts: Vec<&str> = host.split('.').collect();

    if parts.len() == 4 {
        format!("{}.{}.{}.255", parts[0], parts[1], parts[2])
    } else {
        host.to_string()
    }
}
