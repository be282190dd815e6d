//! Address arithmetic and the special-purpose address table.

use cidr::IpCidr;
use std::net::IpAddr;
use std::sync::OnceLock;

/// Blocks an IP-to-ASN service will never have an origin AS for.
const RESERVED_BLOCKS: &[&str] = &[
    "0.0.0.0/8",
    "10.0.0.0/8",
    "100.64.0.0/10",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "172.16.0.0/12",
    "192.0.0.0/24",
    "192.0.2.0/24",
    "192.88.99.0/24",
    "192.168.0.0/16",
    "198.18.0.0/15",
    "198.51.100.0/24",
    "203.0.113.0/24",
    "224.0.0.0/4",
    "240.0.0.0/4",
    "255.255.255.255/32",
    "::/128",
    "::1/128",
    "100::/64",
    "2001:db8::/32",
    "fc00::/7",
    "fe80::/10",
    "ff00::/8",
];

fn reserved_table() -> &'static [IpCidr] {
    static TABLE: OnceLock<Vec<IpCidr>> = OnceLock::new();
    TABLE.get_or_init(|| {
        RESERVED_BLOCKS
            .iter()
            .filter_map(|block| block.parse().ok())
            .collect()
    })
}

/// Returns true if `ip` is private, loopback, link-local, documentation,
/// multicast or otherwise reserved.
///
/// IPv4-mapped IPv6 addresses are judged by their IPv4 form.
#[must_use]
pub fn is_reserved(ip: IpAddr) -> bool {
    let ip = canonical(ip);
    reserved_table().iter().any(|block| block.contains(&ip))
}

/// Unwrap IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) to plain IPv4
#[must_use]
pub fn canonical(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(ip, IpAddr::V4),
        IpAddr::V4(_) => ip,
    }
}

/// Numeric value of an address, for span arithmetic
#[must_use]
pub fn ip_to_u128(ip: IpAddr) -> u128 {
    match ip {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}
