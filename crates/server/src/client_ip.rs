use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::extract::ConnectInfo;
use config::ClientIpConfig;
use http::{HeaderMap, HeaderName, Request};

const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");
const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Finds the address of the caller, trusting proxy headers only as far as configured.
pub(crate) fn extract_client_ip<B>(config: &ClientIpConfig, req: &Request<B>) -> IpAddr {
    let headers = req.headers();

    let from_proxy = config
        .x_real_ip
        .then(|| real_ip(headers))
        .flatten()
        .or_else(|| config.x_forwarded_for_trusted_hops.and_then(|hops| forwarded_for(headers, hops)));

    if let Some(ip) = from_proxy {
        return ip;
    }

    if let Some(ConnectInfo(peer)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return peer.ip();
    }

    log::warn!("No peer address available for request, keying anonymous client on 0.0.0.0");
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn real_ip(headers: &HeaderMap) -> Option<IpAddr> {
    parse_ip(headers.get(X_REAL_IP)?.to_str().ok()?)
}

/// Each trusted proxy appends one entry, so the caller is `hops` entries from the end.
fn forwarded_for(headers: &HeaderMap, hops: usize) -> Option<IpAddr> {
    let chain = headers.get(X_FORWARDED_FOR)?.to_str().ok()?;
    parse_ip(chain.rsplit(',').nth(hops)?)
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse().ok()
}
