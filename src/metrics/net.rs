use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::process::Command;

use crate::config::Config;

/// Reported when every resolution tier fails.
pub const FALLBACK_IP: &str = "0.0.0.0";

/// Connecting a datagram socket here never sends a packet; it only asks the
/// routing table which source address would be used.
const PROBE_ADDR: &str = "1.1.1.1:80";

/// Resolve the IP to display: configured override, then the configured
/// interface, then the route-derived source address, then `0.0.0.0`.
pub fn resolve_ip(config: &Config) -> String {
    if let Some(ip) = config.host_ip.as_deref() {
        let trimmed = ip.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    if let Some(iface) = config.iface.as_deref() {
        if let Some(ip) = iface_ipv4(iface) {
            return ip;
        }
    }
    probe_source_ip().unwrap_or_else(|| FALLBACK_IP.to_string())
}

/// First global-scope IPv4 address bound to the interface, via `ip(8)`.
fn iface_ipv4(iface: &str) -> Option<String> {
    let output = Command::new("ip")
        .args(["-o", "-4", "addr", "show", "dev", iface, "scope", "global"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_addr_show(&String::from_utf8_lossy(&output.stdout))
}

fn parse_addr_show(raw: &str) -> Option<String> {
    for line in raw.lines() {
        for token in line.split_whitespace() {
            if let Some((addr, _prefix)) = token.split_once('/') {
                if addr.parse::<Ipv4Addr>().is_ok() {
                    return Some(addr.to_string());
                }
            }
        }
    }
    None
}

fn probe_source_ip() -> Option<String> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).ok()?;
    socket.connect(PROBE_ADDR).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(v4) if !v4.is_unspecified() => Some(v4.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_and_is_trimmed() {
        let config = Config {
            host_ip: Some("  10.0.0.7 ".into()),
            iface: Some("eth0".into()),
            ..Config::default()
        };
        assert_eq!(resolve_ip(&config), "10.0.0.7");
    }

    #[test]
    fn blank_override_falls_through() {
        let config = Config {
            host_ip: Some("   ".into()),
            ..Config::default()
        };
        // No interface configured; whatever tier answers must not be blank.
        assert!(!resolve_ip(&config).trim().is_empty());
    }

    #[test]
    fn parses_ip_addr_show_output() {
        let raw = "2: eth0    inet 192.168.1.10/24 brd 192.168.1.255 scope global dynamic eth0\\       valid_lft 86000sec preferred_lft 86000sec\n";
        assert_eq!(parse_addr_show(raw), Some("192.168.1.10".into()));
    }

    #[test]
    fn parse_skips_non_address_tokens() {
        assert_eq!(parse_addr_show("3: wlan0 no addresses\n"), None);
        assert_eq!(parse_addr_show(""), None);
        // A slash token that is not an IPv4 address must not match.
        assert_eq!(parse_addr_show("link/ether aa:bb:cc:dd:ee:ff\n"), None);
    }

    #[test]
    fn parse_takes_first_of_multiple_addresses() {
        let raw = "2: eth0 inet 10.1.2.3/16 scope global eth0\n\
                   2: eth0 inet 10.9.9.9/16 scope global secondary eth0\n";
        assert_eq!(parse_addr_show(raw), Some("10.1.2.3".into()));
    }
}
