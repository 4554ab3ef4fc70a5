//! URL validation for SSRF protection.
//!
//! URL-mode requests carry caller-supplied URLs, so every fetch goes
//! through this validator first. It blocks:
//! - internal services (localhost, 127.0.0.1)
//! - private IP ranges (10.x, 172.16.x, 192.168.x)
//! - cloud metadata services (169.254.x)
//! - non-HTTP(S) schemes (file://, ftp://)

use std::collections::HashSet;
use std::net::IpAddr;
use url::Url;

use crate::error::{SecurityError, SecurityResult};

const BLOCKED_HOSTS: &[&str] = &[
    "localhost",
    "127.0.0.1",
    "::1",
    "[::1]",
    "0.0.0.0",
    "metadata.google.internal",
    "metadata.gke.internal",
    "instance-data",
];

const BLOCKED_CIDRS: &[&str] = &[
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "169.254.0.0/16", // Link-local / cloud metadata
    "127.0.0.0/8",
    "::1/128",
    "fc00::/7",
    "fe80::/10",
];

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Rejects URLs a discovery call must never fetch.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    blocked_hosts: HashSet<String>,
    blocked_cidrs: Vec<ipnet::IpNet>,
    /// Skip every check for these (test servers, trusted intranets)
    allowed_hosts: HashSet<String>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlValidator {
    pub fn new() -> Self {
        Self {
            blocked_hosts: BLOCKED_HOSTS.iter().map(|h| h.to_string()).collect(),
            blocked_cidrs: BLOCKED_CIDRS.iter().filter_map(|c| c.parse().ok()).collect(),
            allowed_hosts: HashSet::new(),
        }
    }

    /// Trust a host outright.
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into().to_lowercase());
        self
    }

    /// Validate a URL string for safety.
    pub fn validate_str(&self, url: &str) -> SecurityResult<()> {
        self.validate(&Url::parse(url)?)
    }

    /// Validate a parsed URL for safety.
    pub fn validate(&self, url: &Url) -> SecurityResult<()> {
        if !ALLOWED_SCHEMES.contains(&url.scheme()) {
            return Err(SecurityError::DisallowedScheme(url.scheme().to_string()));
        }

        let host = url.host_str().ok_or(SecurityError::NoHost)?;

        if self.allowed_hosts.contains(host) {
            return Ok(());
        }

        if self.blocked_hosts.contains(host) {
            return Err(SecurityError::BlockedHost(host.to_string()));
        }

        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = bare.parse::<IpAddr>() {
            self.check_ip(ip)?;
        }

        Ok(())
    }

    /// Validate and resolve DNS to check the actual IPs.
    ///
    /// Catches DNS rebinding where a public-looking hostname resolves to an
    /// internal address.
    pub async fn validate_with_dns(&self, url: &Url) -> SecurityResult<()> {
        self.validate(url)?;

        let host = url.host_str().ok_or(SecurityError::NoHost)?;
        if self.allowed_hosts.contains(host) {
            return Ok(());
        }

        // IP literals were already checked
        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if bare.parse::<IpAddr>().is_ok() {
            return Ok(());
        }

        let port = url.port_or_known_default().unwrap_or(80);
        let addrs = tokio::net::lookup_host(format!("{}:{}", host, port))
            .await
            .map_err(|e| SecurityError::DnsResolution(e.to_string()))?;

        for addr in addrs {
            self.check_ip(addr.ip()).map_err(|_| {
                SecurityError::BlockedCidr(format!(
                    "DNS for {} resolved to blocked IP {}",
                    host,
                    addr.ip()
                ))
            })?;
        }

        Ok(())
    }

    fn check_ip(&self, ip: IpAddr) -> SecurityResult<()> {
        if self.blocked_cidrs.iter().any(|cidr| cidr.contains(&ip)) {
            return Err(SecurityError::BlockedCidr(ip.to_string()));
        }
        Ok(())
    }
}
