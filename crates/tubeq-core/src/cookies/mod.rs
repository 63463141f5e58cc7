//! Credential store: cookie bundles loaded from the `cookies/` directory.
//!
//! Each regular, non-hidden file holds a JSON array of cookie objects. Bundles
//! are only used for optional page fetches during ingestion; they are never
//! handed to the downloader.

mod parse;

pub use parse::{domain_matches, Cookie};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Cookies from one file.
#[derive(Debug, Clone, PartialEq)]
pub struct CookieBundle {
    /// File name the bundle was loaded from.
    pub name: String,
    pub cookies: Vec<Cookie>,
}

impl CookieBundle {
    /// Parse one bundle file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("read cookie file: {}", path.display()))?;
        let cookies: Vec<Cookie> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse cookie JSON: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, cookies })
    }

    /// `Cookie` header value for a request to `host`, or None if no cookie applies.
    pub fn header_for(&self, host: &str, https: bool) -> Option<String> {
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|c| c.applies_to(host, https))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        (!pairs.is_empty()).then(|| pairs.join("; "))
    }
}

/// All bundles found in the cookies directory, in directory-listing order.
#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    bundles: Vec<CookieBundle>,
}

impl CookieStore {
    /// Load every bundle in `dir`. A missing directory yields an empty store;
    /// a file that fails to parse is logged and skipped.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            return Ok(Self::default());
        }
        let mut bundles = Vec::new();
        for entry in fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))? {
            let path = entry?.path();
            let hidden = path
                .file_name()
                .map(|n| n.to_string_lossy().starts_with('.'))
                .unwrap_or(true);
            if hidden || !path.is_file() {
                continue;
            }
            match CookieBundle::load(&path) {
                Ok(bundle) => {
                    tracing::debug!(
                        bundle = %bundle.name,
                        cookies = bundle.cookies.len(),
                        "loaded cookie bundle"
                    );
                    bundles.push(bundle);
                }
                Err(e) => tracing::warn!("skipping cookie bundle {}: {:#}", path.display(), e),
            }
        }
        Ok(Self { bundles })
    }

    pub fn bundles(&self) -> &[CookieBundle] {
        &self.bundles
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Header values of every bundle with at least one cookie for `host`.
    pub fn headers_for(&self, host: &str, https: bool) -> Vec<String> {
        self.bundles
            .iter()
            .filter_map(|b| b.header_for(host, https))
            .collect()
    }
}
