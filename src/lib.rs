//! Minimal ICMP echo ("ping") client over raw IPv4 sockets.

pub mod error;
pub mod icmp;
pub mod prober;

pub use error::{CodecError, PairField, ProbeError};
pub use prober::{ProbeParams, probe_icmp};
