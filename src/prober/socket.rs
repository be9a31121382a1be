use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::mem::MaybeUninit;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use crate::icmp::IPV4_TOTAL_MAX_SIZE;

/// One datagram as handed to the receive loop: the ICMP message with any
/// IP header removed, and the address it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub source: Ipv4Addr,
    pub icmp: Vec<u8>,
}

/// Shortest timeout a socket can hold. `SO_RCVTIMEO` and `SO_SNDTIMEO` have
/// microsecond resolution and a zero value means "block forever".
pub const MIN_SOCKET_TIMEOUT: Duration = Duration::from_micros(1);

/// Maps a timeout onto one the kernel enforces: zero is rejected and
/// anything below a microsecond is rounded up to one.
pub fn socket_timeout(timeout: Duration) -> io::Result<Duration> {
    if timeout.is_zero() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "socket timeout must be non-zero"));
    }
    Ok(timeout.max(MIN_SOCKET_TIMEOUT))
}

/// Sending and receiving side of a probe.
///
/// A timeout elapsing must surface as `WouldBlock` or `TimedOut`.
pub trait Transport {
    fn send_to(&mut self, packet: &[u8], destination: Ipv4Addr, timeout: Duration) -> io::Result<()>;
    fn recv_from(&mut self, timeout: Duration) -> io::Result<Datagram>;
}

/// Raw IPv4 socket restricted to ICMP. Closed when dropped.
pub struct RawIcmpSocket {
    socket: Socket,
    buf: Vec<u8>,
}

impl RawIcmpSocket {
    pub fn open() -> io::Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
        Ok(Self {
            socket,
            buf: vec![0u8; IPV4_TOTAL_MAX_SIZE],
        })
    }
}

impl Transport for RawIcmpSocket {
    fn send_to(&mut self, packet: &[u8], destination: Ipv4Addr, timeout: Duration) -> io::Result<()> {
        self.socket.set_write_timeout(Some(socket_timeout(timeout)?))?;
        let addr = SockAddr::from(SocketAddrV4::new(destination, 0));
        self.socket.send_to(packet, &addr)?;
        Ok(())
    }

    fn recv_from(&mut self, timeout: Duration) -> io::Result<Datagram> {
        self.socket.set_read_timeout(Some(socket_timeout(timeout)?))?;

        // SAFETY: `u8` and `MaybeUninit<u8>` share layout and the buffer is
        // already initialized, so the kernel can only overwrite valid bytes.
        let uninit = unsafe { &mut *(self.buf.as_mut_slice() as *mut [u8] as *mut [MaybeUninit<u8>]) };
        let (len, from) = self.socket.recv_from(uninit)?;

        // Non-IPv4 sources cannot happen on an AF_INET socket; an unspecified
        // source never matches a destination and is simply filtered out.
        let source = match from.as_socket() {
            Some(SocketAddr::V4(addr)) => *addr.ip(),
            _ => Ipv4Addr::UNSPECIFIED,
        };

        Ok(Datagram {
            source,
            icmp: strip_ipv4_header(&self.buf[..len]).to_vec(),
        })
    }
}

/// Raw IPv4 sockets deliver the IP header in front of the ICMP message.
/// Returns the bytes after it, or an empty slice when the header is
/// malformed or longer than the datagram.
pub fn strip_ipv4_header(datagram: &[u8]) -> &[u8] {
    let Some(&first) = datagram.first() else {
        return &[];
    };
    if first >> 4 != 4 {
        return &[];
    }
    let header_len = usize::from(first & 0x0f) * 4;
    if header_len < 20 || header_len > datagram.len() {
        return &[];
    }
    &datagram[header_len..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ipv4_header(ihl: u8) -> Vec<u8> {
        let mut header = vec![0u8; usize::from(ihl) * 4];
        header[0] = 0x40 | ihl;
        header
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = socket_timeout(Duration::ZERO).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn sub_microsecond_timeout_rounds_up() {
        assert_eq!(socket_timeout(Duration::from_nanos(1)).unwrap(), MIN_SOCKET_TIMEOUT);
        assert_eq!(socket_timeout(Duration::from_nanos(500)).unwrap(), MIN_SOCKET_TIMEOUT);
        assert_eq!(socket_timeout(Duration::from_millis(3)).unwrap(), Duration::from_millis(3));
    }

    #[test]
    fn strips_minimal_header() {
        let mut datagram = ipv4_header(5);
        datagram.extend_from_slice(&[0, 0, 0xff, 0xff, 0, 0, 0, 0]);
        assert_eq!(strip_ipv4_header(&datagram), &[0, 0, 0xff, 0xff, 0, 0, 0, 0]);
    }

    #[test]
    fn strips_header_with_options() {
        let mut datagram = ipv4_header(6);
        datagram.extend_from_slice(&[3, 1]);
        assert_eq!(strip_ipv4_header(&datagram), &[3, 1]);
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(strip_ipv4_header(&[]).is_empty());
        // Version 6.
        assert!(strip_ipv4_header(&[0x65; 28]).is_empty());
        // IHL below the minimum.
        assert!(strip_ipv4_header(&[0x44; 28]).is_empty());
        // Advertised header longer than the datagram.
        assert!(strip_ipv4_header(&ipv4_header(15)[..40]).is_empty());
    }
}
