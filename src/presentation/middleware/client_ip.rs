use axum::{extract::ConnectInfo, http::HeaderMap};
use std::net::{IpAddr, SocketAddr};

/// Resolve the client address for a request.
///
/// Proxy headers are only honoured when `trust_forwarded` is set; otherwise
/// the socket peer address is used, falling back to loopback when the
/// server was not started with connect info.
pub fn client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust_forwarded: bool,
) -> IpAddr {
    if trust_forwarded {
        if let Some(ip) = forwarded_ip(headers) {
            return ip;
        }
    }

    if let Some(ConnectInfo(socket_addr)) = connect_info {
        return socket_addr.ip();
    }

    IpAddr::from([127, 0, 0, 1])
}

/// Client IP reported by `X-Forwarded-For` (first hop) or `X-Real-IP`
pub fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    from_forwarded_for.or_else(|| {
        headers.get("x-real-ip").and_then(|v| v.to_str().ok()).and_then(|v| v.trim().parse().ok())
    })
}
