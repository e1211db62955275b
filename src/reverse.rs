//! IPv4 to reverse-zone name conversion for PTR synthesis.

use std::net::Ipv4Addr;

/// Split an IPv4 address into the `in-addr.arpa` zone holding its /24
/// and the host label within that zone.
///
/// `192.168.1.3` maps to the zone `1.168.192.in-addr.arpa` with host
/// label `3`, giving the full PTR owner name `3.1.168.192.in-addr.arpa`.
pub fn to_reverse(ip: Ipv4Addr) -> (String, String) {
    let [a, b, c, d] = ip.octets();
    (format!("{}.{}.{}.in-addr.arpa", c, b, a), d.to_string())
}

/// The full PTR owner name for an IPv4 address.
pub fn ptr_name(ip: Ipv4Addr) -> String {
    let (zone, host) = to_reverse(ip);
    format!("{}.{}", host, zone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_address_into_zone_and_host() {
        let (zone, host) = to_reverse(Ipv4Addr::new(192, 168, 1, 3));
        assert_eq!(zone, "1.168.192.in-addr.arpa");
        assert_eq!(host, "3");
    }

    #[test]
    fn full_ptr_name() {
        assert_eq!(
            ptr_name(Ipv4Addr::new(192, 168, 1, 3)),
            "3.1.168.192.in-addr.arpa"
        );
        assert_eq!(ptr_name(Ipv4Addr::new(10, 0, 0, 1)), "1.0.0.10.in-addr.arpa");
    }
}
