//! URL validation for the intake field.
//!
//! [`validate_url`] is the only entry point the intake workflow uses. What
//! counts as acceptable is decided by a [`ValidationPolicy`]; the default
//! [`WebUrlPolicy`] accepts http(s) URLs and normalizes scheme and host.

use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

use crate::config::ValidationSettings;

/// Longest input accepted by [`WebUrlPolicy`] (common browser limit).
pub const MAX_URL_LENGTH: usize = 2000;

/// Decides whether a trimmed, non-empty candidate is a usable URL.
pub trait ValidationPolicy {
    /// Returns the normalized URL, or `None` to reject.
    fn validate(&self, candidate: &str) -> Option<String>;
}

impl<F> ValidationPolicy for F
where
    F: Fn(&str) -> Option<String>,
{
    fn validate(&self, candidate: &str) -> Option<String> {
        self(candidate)
    }
}

/// Runs `policy` on `raw` after trimming it.
///
/// Empty and whitespace-only input never reaches the policy.
pub fn validate_url<P>(policy: &P, raw: &str) -> Option<String>
where
    P: ValidationPolicy + ?Sized,
{
    let candidate = raw.trim();
    if candidate.is_empty() {
        trace!("empty input rejected");
        return None;
    }
    policy.validate(candidate)
}

/// Why [`WebUrlPolicy`] refused a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("URL too long ({length} chars, max {MAX_URL_LENGTH})")]
    TooLong { length: usize },

    #[error("malformed URL: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("scheme '{0}' is not supported")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    NoHost,

    #[error("host '{0}' is not in the allowed list")]
    HostNotAllowed(String),
}

/// Default policy: http(s) URLs with a host, optionally restricted to a list
/// of domains.
#[derive(Debug, Clone)]
pub struct WebUrlPolicy {
    assume_https: bool,
    allowed_hosts: Vec<String>,
}

impl Default for WebUrlPolicy {
    fn default() -> Self {
        Self {
            assume_https: true,
            allowed_hosts: Vec::new(),
        }
    }
}

impl WebUrlPolicy {
    pub fn from_settings(settings: &ValidationSettings) -> Self {
        Self {
            assume_https: settings.assume_https,
            allowed_hosts: settings
                .allowed_hosts
                .iter()
                .map(|h| h.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Checks `candidate` and returns its normalized form.
    pub fn check(&self, candidate: &str) -> Result<String, Rejection> {
        let length = candidate.chars().count();
        if length > MAX_URL_LENGTH {
            return Err(Rejection::TooLong { length });
        }

        let parsed = if self.assume_https && !has_scheme(candidate) {
            Url::parse(&format!("https://{candidate}"))?
        } else {
            Url::parse(candidate)?
        };

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => return Err(Rejection::UnsupportedScheme(scheme.to_string())),
        }

        let host = parsed.host_str().ok_or(Rejection::NoHost)?;
        if !self.host_allowed(host) {
            return Err(Rejection::HostNotAllowed(host.to_string()));
        }

        Ok(parsed.into())
    }

    fn host_allowed(&self, host: &str) -> bool {
        self.allowed_hosts.is_empty()
            || self.allowed_hosts.iter().any(|allowed| {
                host == allowed
                    || host
                        .strip_suffix(allowed.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            })
    }
}

/// Whether `candidate` starts with `scheme:`.
///
/// `host:port` is not a scheme: a colon followed only by a valid port number
/// (and then a path, query, fragment or nothing) counts as a port.
fn has_scheme(candidate: &str) -> bool {
    let Some((scheme, rest)) = candidate.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return false;
    }

    let port_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let port = &rest[..port_end];
    let is_port = !port.is_empty()
        && port.chars().all(|c| c.is_ascii_digit())
        && port.parse::<u16>().is_ok();
    !is_port
}

impl ValidationPolicy for WebUrlPolicy {
    fn validate(&self, candidate: &str) -> Option<String> {
        match self.check(candidate) {
            Ok(url) => Some(url),
            Err(reason) => {
                debug!(%reason, "URL rejected");
                None
            }
        }
    }
}
