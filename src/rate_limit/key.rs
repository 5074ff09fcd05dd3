use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::http::HeaderMap;

/// Identity a quota is scoped to. Built from request metadata only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientKey(String);

impl ClientKey {
    /// Shared bucket for requests whose origin cannot be determined.
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        if key.trim().is_empty() {
            Self::unknown()
        } else {
            Self(key)
        }
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn from_ip(ip: IpAddr) -> Self {
        Self(ip.to_string())
    }

    /// Derives the key from the peer address, consulting `X-Forwarded-For`
    /// and `X-Real-IP` first when `trust_proxy` is set. Header values that do
    /// not parse as an IP address are ignored.
    pub fn from_request_parts(
        headers: &HeaderMap,
        peer: Option<SocketAddr>,
        trust_proxy: bool,
    ) -> Self {
        if trust_proxy {
            let forwarded = headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok());

            let real_ip = || {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            };

            if let Some(ip) = forwarded.or_else(real_ip) {
                return Self::from_ip(ip);
            }
        }

        peer.map(|addr| Self::from_ip(addr.ip()))
            .unwrap_or_else(Self::unknown)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the governor needs to know about a request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub client: ClientKey,
    /// Matched route template, or the raw path when nothing matched.
    pub route: String,
    /// Time since the Unix epoch.
    pub now: Duration,
}

impl RequestContext {
    pub fn new(client: ClientKey, route: impl Into<String>, now: Duration) -> Self {
        Self {
            client,
            route: route.into(),
            now,
        }
    }
}
