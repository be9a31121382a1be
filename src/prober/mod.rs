//! One ICMP echo probe: raw socket lifecycle, receive loop and reply
//! filtering.

use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::debug;

use crate::error::ProbeError;

pub mod filter;
pub mod session;
pub mod socket;

pub use session::{ProbeSession, ProbeState};
pub use socket::{RawIcmpSocket, Transport};

/// Inputs of a single probe, fixed for its whole duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeParams {
    pub destination: Ipv4Addr,
    pub timeout: Duration,
    pub identifier: u16,
    pub sequence_number: u16,
    /// Zero-filled payload length, at most [`crate::icmp::MAX_PAYLOAD_SIZE`].
    pub payload_size: usize,
}

/// Pings `params.destination` once over a fresh raw socket and returns the
/// round trip time. Blocks for at most `params.timeout` after sending.
pub fn probe_icmp(params: ProbeParams) -> Result<Duration, ProbeError> {
    let socket = RawIcmpSocket::open().map_err(ProbeError::SocketOpen)?;
    let mut session = ProbeSession::new(params, socket);
    let result = session.run();
    debug!(state = ?session.state(), "probe finished");
    result
}
