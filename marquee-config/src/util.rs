use std::net::IpAddr;
use std::time::Duration;

use url::{Host, Url};

/// Treat blank values the same as unset ones.
pub fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_duration(
    raw: &str,
) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(raw.trim())
}

/// Appends a trailing `/` so relative endpoint paths join beneath the base
/// instead of replacing its last segment.
pub fn ensure_trailing_slash(url: &mut Url) {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
}

pub fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
        Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
        None => false,
    }
}
