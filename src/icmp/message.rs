use super::{ICMP_HEADER_SIZE, MAX_PAYLOAD_SIZE, checksum};
use crate::error::CodecError;

const TYPE_OFFSET: usize = 0;
const CODE_OFFSET: usize = 1;
const CHECKSUM_OFFSET: usize = 2;
const IDENTIFIER_OFFSET: usize = 4;
const SEQUENCE_OFFSET: usize = 6;

/// ICMP message type, decoded once from the first header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoType {
    EchoReply,
    DestinationUnreachable,
    EchoRequest,
    /// Any type without a named variant. `Other(0)`, `Other(3)` and
    /// `Other(8)` encode to the named types' bytes and decode back as those
    /// variants; build them through `EchoType::from(u8)` to stay canonical.
    Other(u8),
}

impl From<u8> for EchoType {
    fn from(raw: u8) -> Self {
        match raw {
            0 => EchoType::EchoReply,
            3 => EchoType::DestinationUnreachable,
            8 => EchoType::EchoRequest,
            other => EchoType::Other(other),
        }
    }
}

impl From<EchoType> for u8 {
    fn from(kind: EchoType) -> Self {
        match kind {
            EchoType::EchoReply => 0,
            EchoType::DestinationUnreachable => 3,
            EchoType::EchoRequest => 8,
            EchoType::Other(raw) => raw,
        }
    }
}

impl EchoType {
    /// Reads the type from the first byte of an ICMP message without
    /// decoding the rest. `None` when the buffer cannot hold a header.
    pub fn peek(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < ICMP_HEADER_SIZE {
            return None;
        }
        Some(EchoType::from(bytes[TYPE_OFFSET]))
    }
}

/// Fixed 8-byte header shared by echo requests and replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoHeader {
    pub kind: EchoType,
    pub code: u8,
    pub checksum: u16,
    pub identifier: u16,
    pub sequence_number: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoMessage {
    pub header: EchoHeader,
    pub payload: Vec<u8>,
}

impl EchoMessage {
    /// Echo request with an uncomputed checksum. The payload length is
    /// checked by [`EchoMessage::encode`], not here.
    pub fn new_request(identifier: u16, sequence_number: u16, payload: Vec<u8>) -> Self {
        EchoMessage {
            header: EchoHeader {
                kind: EchoType::EchoRequest,
                code: 0,
                checksum: 0,
                identifier,
                sequence_number,
            },
            payload,
        }
    }

    /// Serializes the message and fills in the checksum.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(CodecError::PayloadTooLarge {
                size: self.payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let mut buf = vec![0u8; ICMP_HEADER_SIZE + self.payload.len()];
        buf[TYPE_OFFSET] = self.header.kind.into();
        buf[CODE_OFFSET] = self.header.code;
        buf[IDENTIFIER_OFFSET..IDENTIFIER_OFFSET + 2]
            .copy_from_slice(&self.header.identifier.to_be_bytes());
        buf[SEQUENCE_OFFSET..SEQUENCE_OFFSET + 2]
            .copy_from_slice(&self.header.sequence_number.to_be_bytes());
        buf[ICMP_HEADER_SIZE..].copy_from_slice(&self.payload);

        // Checksum field is still zero here; it covers itself.
        let sum = checksum(&buf);
        buf[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());

        Ok(buf)
    }

    /// Parses a received ICMP message and verifies its checksum.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() < ICMP_HEADER_SIZE {
            return Err(CodecError::TooShort {
                len: bytes.len(),
                min: ICMP_HEADER_SIZE,
            });
        }

        let residual = checksum(bytes);
        if residual != 0 {
            return Err(CodecError::ChecksumMismatch { residual });
        }

        let word = |offset: usize| u16::from_be_bytes([bytes[offset], bytes[offset + 1]]);
        Ok(EchoMessage {
            header: EchoHeader {
                kind: EchoType::from(bytes[TYPE_OFFSET]),
                code: bytes[CODE_OFFSET],
                checksum: word(CHECKSUM_OFFSET),
                identifier: word(IDENTIFIER_OFFSET),
                sequence_number: word(SEQUENCE_OFFSET),
            },
            payload: bytes[ICMP_HEADER_SIZE..].to_vec(),
        })
    }
}
