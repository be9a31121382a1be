use std::fmt;
use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;

/// Header field that differed when correlating a reply with its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairField {
    Code,
    Identifier,
    SequenceNumber,
    Payload,
}

impl fmt::Display for PairField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PairField::Code => "code",
            PairField::Identifier => "identifier",
            PairField::SequenceNumber => "sequence number",
            PairField::Payload => "payload",
        };
        f.write_str(name)
    }
}

/// Failures of the echo message codec and the pairing check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("payload of {size} bytes exceeds the maximum of {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("buffer of {len} bytes is shorter than the {min} byte ICMP header")]
    TooShort { len: usize, min: usize },

    #[error("checksum does not verify (residual 0x{residual:04x})")]
    ChecksumMismatch { residual: u16 },

    #[error("reply does not pair with request: {0} differs")]
    PairMismatch(PairField),
}

/// Failures of a single probe.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to open raw ICMP socket: {0}")]
    SocketOpen(#[source] io::Error),

    #[error("failed to encode echo request: {0}")]
    Encode(#[from] CodecError),

    #[error("failed to send echo request: {0}")]
    Send(#[source] io::Error),

    #[error("failed to receive reply: {0}")]
    Receive(#[source] io::Error),

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    #[error("From {from} Destination Unreachable")]
    DestinationUnreachable { from: Ipv4Addr },
}

impl ProbeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout(_))
    }
}
