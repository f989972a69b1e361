//! Client IP handling.
//!
//! Extraction prefers the first `X-Forwarded-For` hop, falling back to the
//! peer address. Loopback addresses are normalized to a `localhost` display
//! value before they reach the analytics store, since geolocation is
//! meaningless for them.

use std::net::IpAddr;

use actix_web::HttpRequest;

/// Check whether an IP is a private-range or loopback address.
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            // fc00::/7 (ULA), fe80::/10 (link-local), ::1
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

pub fn is_loopback(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback(),
        IpAddr::V6(v6) => v6.is_loopback() || is_v4_mapped_loopback(v6),
    }
}

fn is_v4_mapped_loopback(v6: &std::net::Ipv6Addr) -> bool {
    v6.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback())
}

/// Display form for a raw source IP: loopback collapses to `localhost`,
/// everything else passes through unchanged.
pub fn display_ip(raw: &str) -> String {
    match raw.parse::<IpAddr>() {
        Ok(addr) if is_loopback(&addr) => "localhost".to_string(),
        _ => raw.to_string(),
    }
}

/// Extract the client IP from a request.
///
/// Takes the first entry of `X-Forwarded-For` when present, otherwise the
/// peer address without the port.
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }

    req.peer_addr().map(|addr| addr.ip().to_string())
}
