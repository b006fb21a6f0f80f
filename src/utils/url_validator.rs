// URL validation for the shortener
// Only absolute http(s) URLs pointing at public hosts are accepted

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use url::{Host, Url};

const MAX_URL_LENGTH: usize = 2048;

lazy_static! {
    /// localhost and any of its subdomains
    static ref LOCALHOST_REGEX: Regex = Regex::new(r"(?i)^(.+\.)?localhost\.?$").unwrap();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL is required")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL scheme not allowed: {0}. Only HTTP and HTTPS are supported")]
    InvalidScheme(String),

    #[error("URL length exceeds maximum of {max} characters (current: {current})")]
    TooLong { current: usize, max: usize },

    #[error("URL is missing a host")]
    MissingHost,

    #[error("Cannot shorten URLs that point to this service")]
    SelfReference,

    #[error("URL points to a local or private address: {0}")]
    PrivateNetwork(String),
}

pub struct UrlValidator;

impl UrlValidator {
    /// Validate a destination URL.
    ///
    /// `own_host` is the host this service answers on; links back to it are
    /// rejected so short URLs cannot chain into each other.
    pub fn validate_url(url_str: &str, own_host: Option<&str>) -> Result<Url, UrlValidationError> {
        let url_str = url_str.trim();
        if url_str.is_empty() {
            return Err(UrlValidationError::Empty);
        }

        if url_str.len() > MAX_URL_LENGTH {
            return Err(UrlValidationError::TooLong {
                current: url_str.len(),
                max: MAX_URL_LENGTH,
            });
        }

        let url =
            Url::parse(url_str).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

        Self::validate_scheme(&url)?;
        Self::validate_host(&url)?;
        Self::check_self_reference(&url, own_host)?;
        Self::check_private_networks(&url)?;

        Ok(url)
    }

    /// Only HTTP and HTTPS are allowed
    fn validate_scheme(url: &Url) -> Result<(), UrlValidationError> {
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(UrlValidationError::InvalidScheme(scheme.to_string())),
        }
    }

    fn validate_host(url: &Url) -> Result<(), UrlValidationError> {
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(UrlValidationError::MissingHost),
        }
    }

    fn check_self_reference(url: &Url, own_host: Option<&str>) -> Result<(), UrlValidationError> {
        let (Some(host), Some(own)) = (url.host_str(), own_host) else {
            return Ok(());
        };

        // own_host may carry a port (taken from a Host header)
        let own = own.rsplit_once(':').map_or(own, |(name, port)| {
            if port.chars().all(|c| c.is_ascii_digit()) && !name.ends_with(':') {
                name
            } else {
                own
            }
        });
        let own = own.trim_start_matches('[').trim_end_matches(']');

        if host.trim_start_matches('[').trim_end_matches(']').eq_ignore_ascii_case(own) {
            return Err(UrlValidationError::SelfReference);
        }
        Ok(())
    }

    /// Reject localhost, loopback, unspecified, private and link-local targets
    fn check_private_networks(url: &Url) -> Result<(), UrlValidationError> {
        let blocked = match url.host() {
            Some(Host::Domain(domain)) => LOCALHOST_REGEX.is_match(domain),
            Some(Host::Ipv4(ip)) => is_private_ip(IpAddr::V4(ip)),
            Some(Host::Ipv6(ip)) => is_private_ip(IpAddr::V6(ip)),
            None => false,
        };

        if blocked {
            let host = url.host_str().unwrap_or_default().to_string();
            return Err(UrlValidationError::PrivateNetwork(host));
        }
        Ok(())
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_unspecified() || ip.is_private() || ip.is_link_local()
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_private_v4(mapped);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (first & 0xffc0) == 0xfe80
}

pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_v4(v4),
        IpAddr::V6(v6) => is_private_v6(v6),
    }
}

// =============================================================================
// TESTS
// =============================================================================
