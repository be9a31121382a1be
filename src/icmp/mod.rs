//! ICMP echo message model: checksum, wire codec and request/reply pairing.

pub mod checksum;
pub mod message;
pub mod pair;

pub use checksum::checksum;
pub use message::{EchoHeader, EchoMessage, EchoType};
pub use pair::pair;

/// Minimum IPv4 header length.
pub const IPV4_HEADER_MIN_SIZE: usize = 20;
/// Largest IPv4 datagram, header included.
pub const IPV4_TOTAL_MAX_SIZE: usize = 65535;
/// Echo header: type, code, checksum, identifier, sequence number.
pub const ICMP_HEADER_SIZE: usize = 8;
/// Largest echo payload that fits in one IPv4 datagram.
pub const MAX_PAYLOAD_SIZE: usize = IPV4_TOTAL_MAX_SIZE - IPV4_HEADER_MIN_SIZE - ICMP_HEADER_SIZE;
