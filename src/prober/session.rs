use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::ProbeParams;
use super::filter::{Verdict, classify};
use super::socket::{MIN_SOCKET_TIMEOUT, Transport};
use crate::error::ProbeError;
use crate::icmp::EchoMessage;

/// Lifecycle of one probe. Every state after `Waiting` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Idle,
    Sending,
    Waiting,
    Matched,
    Unreachable,
    TimedOut,
    Errored,
}

impl ProbeState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ProbeState::Idle | ProbeState::Sending | ProbeState::Waiting)
    }
}

/// A single send / wait / match exchange over a transport it owns.
pub struct ProbeSession<T: Transport> {
    params: ProbeParams,
    transport: T,
    state: ProbeState,
}

impl<T: Transport> ProbeSession<T> {
    pub fn new(params: ProbeParams, transport: T) -> Self {
        Self {
            params,
            transport,
            state: ProbeState::Idle,
        }
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    fn enter(&mut self, next: ProbeState) {
        trace!(from = ?self.state, to = ?next, "probe state");
        self.state = next;
    }

    /// Sends one echo request and waits for its reply. Returns the round
    /// trip time.
    pub fn run(&mut self) -> Result<Duration, ProbeError> {
        self.enter(ProbeState::Sending);
        let request = EchoMessage::new_request(
            self.params.identifier,
            self.params.sequence_number,
            vec![0u8; self.params.payload_size],
        );
        let packet = request.encode().map_err(|err| {
            self.enter(ProbeState::Errored);
            ProbeError::Encode(err)
        })?;

        let destination = self.params.destination;
        let timeout = self.params.timeout;
        let start = Instant::now();
        let deadline = start + timeout;
        if let Err(err) = self.transport.send_to(&packet, destination, timeout) {
            self.enter(ProbeState::Errored);
            return Err(ProbeError::Send(err));
        }
        debug!(%destination, seq = self.params.sequence_number, bytes = packet.len(), "echo request sent");

        self.enter(ProbeState::Waiting);
        loop {
            // Every read is bounded by the same absolute deadline.
            let Some(remaining) = read_timeout(deadline, Instant::now()) else {
                self.enter(ProbeState::TimedOut);
                return Err(ProbeError::Timeout(timeout));
            };

            let datagram = match self.transport.recv_from(remaining) {
                Ok(datagram) => datagram,
                Err(err) if is_timeout(&err) => {
                    self.enter(ProbeState::TimedOut);
                    return Err(ProbeError::Timeout(timeout));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.enter(ProbeState::Errored);
                    return Err(ProbeError::Receive(err));
                }
            };
            let end = Instant::now();

            match classify(&datagram.icmp, datagram.source, destination, &request) {
                Verdict::Matched => {
                    self.enter(ProbeState::Matched);
                    let rtt = end - start;
                    debug!(%destination, seq = self.params.sequence_number, ?rtt, "echo reply matched");
                    return Ok(rtt);
                }
                Verdict::Unreachable { from } => {
                    self.enter(ProbeState::Unreachable);
                    return Err(ProbeError::DestinationUnreachable { from });
                }
                Verdict::Discard(reason) => {
                    debug!(source = %datagram.source, ?reason, "discarding datagram");
                }
            }
        }
    }
}

/// Time left for the next read, or `None` once less than a socket can
/// represent remains.
fn read_timeout(deadline: Instant, now: Instant) -> Option<Duration> {
    let remaining = deadline.saturating_duration_since(now);
    (remaining >= MIN_SOCKET_TIMEOUT).then_some(remaining)
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}
