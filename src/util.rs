use std::net::{IpAddr, Ipv4Addr};
use anyhow::Result;

/// Low 16 bits of the process id, used as the echo identifier.
pub fn process_identifier() -> u16 {
    (std::process::id() & 0xffff) as u16
}

pub async fn resolve_host_to_ipv4(host: &str) -> Result<Ipv4Addr> {
    // First try to parse as IP address
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => return Ok(ip),
        Ok(IpAddr::V6(_)) => return Err(anyhow::anyhow!("Not an IPv4 address: {}", host)),
        Err(_) => {}
    }

    // If parsing fails, resolve via DNS
    let addr = format!("{}:0", host);
    let addrs = tokio::net::lookup_host(&addr).await?;
    addrs
        .filter_map(|addr| match addr.ip() {
            IpAddr::V4(ip) => Some(ip),
            IpAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| anyhow::anyhow!("Could not resolve hostname to an IPv4 address: {}", host))
}
