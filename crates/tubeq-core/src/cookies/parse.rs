//! Browser-exported cookie objects (EditThisCookie-style JSON arrays).

use serde::{Deserialize, Serialize};

/// One cookie as exported by a browser extension. Fields the store does not
/// use are kept verbatim in `extra` so a bundle round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, rename = "expirationDate")]
    pub expiration_date: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Cookie {
    /// True if this cookie should be sent to `host` over the given scheme.
    /// A domain of `example.com` or `.example.com` covers the host itself and
    /// every subdomain; a cookie without a domain applies everywhere.
    pub fn applies_to(&self, host: &str, https: bool) -> bool {
        if self.secure && !https {
            return false;
        }
        match self.domain.as_deref() {
            Some(domain) => domain_matches(domain, host),
            None => true,
        }
    }
}

/// True if `host` is `domain` or one of its subdomains. A leading dot on
/// `domain` is ignored; an empty domain matches every host.
pub fn domain_matches(domain: &str, host: &str) -> bool {
    let domain = domain.trim().trim_start_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return true;
    }
    let host = host.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}
