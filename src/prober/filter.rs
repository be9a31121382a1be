use std::net::Ipv4Addr;

use crate::error::CodecError;
use crate::icmp::{EchoMessage, EchoType, pair};

/// Why a received datagram was dropped by the receive loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discard {
    Truncated { len: usize },
    OwnRequest,
    ForeignReply { source: Ipv4Addr },
    Invalid(CodecError),
    UnhandledType(u8),
}

/// Outcome of inspecting one received datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Matched,
    Unreachable { from: Ipv4Addr },
    Discard(Discard),
}

/// Decides what the receive loop does with one datagram.
///
/// Pure: no I/O and no clock, so the loop only has to act on the verdict.
/// Types other than echo request, echo reply and destination unreachable
/// are dropped without interpretation.
pub fn classify(icmp: &[u8], source: Ipv4Addr, destination: Ipv4Addr, request: &EchoMessage) -> Verdict {
    let Some(kind) = EchoType::peek(icmp) else {
        return Verdict::Discard(Discard::Truncated { len: icmp.len() });
    };

    match kind {
        // Loopback hands us our own outbound request before the reply.
        EchoType::EchoRequest => Verdict::Discard(Discard::OwnRequest),
        EchoType::EchoReply if source == destination => {
            match EchoMessage::decode(icmp).and_then(|reply| pair(request, &reply)) {
                Ok(()) => Verdict::Matched,
                Err(err) => Verdict::Discard(Discard::Invalid(err)),
            }
        }
        EchoType::EchoReply => Verdict::Discard(Discard::ForeignReply { source }),
        EchoType::DestinationUnreachable => Verdict::Unreachable { from: source },
        EchoType::Other(raw) => Verdict::Discard(Discard::UnhandledType(raw)),
    }
}
