//! Url ingestion: turn the files in `pending/` into deduplicated `UrlRecord`s.
//!
//! Plain-text files hold one `url[,name[,folder]]` per line; HTML files
//! contribute the `href` of every anchor. Nothing here is fatal: unreadable
//! files and unparseable lines are logged and skipped.

mod html;

pub use html::{anchor_hrefs, is_standalone_href};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cookies::{domain_matches, CookieStore};
use crate::fetch_page;
use crate::layout::RunContext;
use crate::url_model::{parse_line, sanitize_url, UrlRecord};

/// Decides which input URLs are index pages to be replaced by their links.
pub trait LinkExpander {
    fn wants(&self, url: &str) -> bool;
    fn expand(&self, url: &str) -> Result<Vec<String>>;
}

/// Never expands anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExpansion;

impl LinkExpander for NoExpansion {
    fn wants(&self, _url: &str) -> bool {
        false
    }

    fn expand(&self, url: &str) -> Result<Vec<String>> {
        Ok(vec![url.to_string()])
    }
}

/// Fetches pages on the configured hosts over HTTP, with matching cookies.
#[derive(Debug, Clone)]
pub struct PageExpander {
    hosts: Vec<String>,
    cookies: CookieStore,
}

impl PageExpander {
    pub fn new(hosts: Vec<String>, cookies: CookieStore) -> Self {
        Self { hosts, cookies }
    }
}

impl LinkExpander for PageExpander {
    fn wants(&self, url: &str) -> bool {
        let Some(host) = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
        else {
            return false;
        };
        self.hosts.iter().any(|h| domain_matches(h, &host))
    }

    fn expand(&self, url: &str) -> Result<Vec<String>> {
        Ok(fetch_page::expand_page(url, &self.cookies)?)
    }
}

/// Expander for a run: page expansion when `ingest.expand_hosts` is set,
/// using the cookie bundles found in the layout's cookie dir.
pub fn expander_for(ctx: &RunContext) -> Result<Box<dyn LinkExpander>> {
    let hosts = &ctx.config.ingest.expand_hosts;
    if hosts.is_empty() {
        return Ok(Box::new(NoExpansion));
    }
    let cookies = CookieStore::load_dir(ctx.layout.cookies())?;
    tracing::debug!(hosts = ?hosts, bundles = cookies.len(), "page expansion enabled");
    Ok(Box::new(PageExpander::new(hosts.clone(), cookies)))
}

/// Ingests the layout's pending dir with the run's expander.
pub fn ingest_pending(ctx: &RunContext) -> Result<Vec<UrlRecord>> {
    let expander = expander_for(ctx)?;
    ingest_dir(ctx.layout.pending(), expander.as_ref())
}

/// Insertion-ordered set of records.
#[derive(Debug, Default)]
pub struct RecordSet {
    seen: HashSet<UrlRecord>,
    records: Vec<UrlRecord>,
}

impl RecordSet {
    /// Adds `record` unless an equal one is already present. Returns true if added.
    pub fn push(&mut self, record: UrlRecord) -> bool {
        if self.seen.contains(&record) {
            return false;
        }
        self.seen.insert(record.clone());
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<UrlRecord> {
        self.records
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| {
            let n = n.to_string_lossy();
            n.starts_with('.') || n.starts_with('#')
        })
        .unwrap_or(true)
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase().contains("htm"))
        .unwrap_or(false)
}

/// Regular, non-hidden files in `dir`, sorted by name.
pub fn source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && !is_hidden(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads every source file in `dir` and returns the deduplicated records.
pub fn ingest_dir(dir: &Path, expander: &dyn LinkExpander) -> Result<Vec<UrlRecord>> {
    let mut set = RecordSet::default();
    for path in source_files(dir)? {
        let text = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!("skipping unreadable source {}: {}", path.display(), e);
                continue;
            }
        };
        let before = set.len();
        if is_html(&path) {
            ingest_html(&text, &mut set);
        } else {
            ingest_text(&text, expander, &mut set);
        }
        tracing::debug!(
            source = %path.display(),
            added = set.len() - before,
            "read pending source"
        );
    }
    tracing::info!("{} url(s) added to queue", set.len());
    Ok(set.into_records())
}

/// Adds every usable anchor of an HTML document.
pub fn ingest_html(html: &str, set: &mut RecordSet) {
    for href in anchor_hrefs(html) {
        if is_standalone_href(&href) {
            set.push(UrlRecord::new(sanitize_url(&href)));
        }
    }
}

/// Adds every accepted line of a plain-text list.
pub fn ingest_text(text: &str, expander: &dyn LinkExpander, set: &mut RecordSet) {
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('/') {
            continue;
        }
        let Some(parsed) = parse_line(line) else {
            tracing::warn!(line, "ignoring line without a url");
            continue;
        };

        if expander.wants(&parsed.url) {
            match expander.expand(&parsed.url) {
                Ok(links) => {
                    for link in links {
                        set.push(UrlRecord::with_overrides(link, "", &parsed.folder));
                    }
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        url = %parsed.url,
                        "page expansion failed, keeping url: {:#}",
                        e
                    );
                }
            }
        }

        let record = UrlRecord::from(parsed);
        if !set.push(record.clone()) {
            tracing::debug!(record = %record, "duplicate record dropped");
        }
    }
}
