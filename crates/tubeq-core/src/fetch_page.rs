//! HTTP GET of an index page for link expansion.
//!
//! Uses the curl crate (libcurl) to download a page, optionally with a
//! `Cookie` header from the credential store, then pulls the anchors out and
//! resolves them against the page URL.

use std::str;
use std::time::Duration;
use thiserror::Error;

use crate::cookies::CookieStore;
use crate::ingest::anchor_hrefs;

/// Pages larger than this are cut off; link lists are small.
const MAX_PAGE_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid page URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("page URL {0} has no host")]
    NoHost(String),
    #[error("GET {url} failed: {source}")]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },
    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },
}

/// Downloads `url` and returns the body as text. Follows redirects.
/// Runs in the current thread.
pub fn fetch_page(url: &str, cookie_header: Option<&str>) -> Result<String, PageError> {
    let curl_err = |source| PageError::Curl {
        url: url.to_string(),
        source,
    };

    let mut body: Vec<u8> = Vec::new();
    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_err)?;
    easy.follow_location(true).map_err(curl_err)?;
    easy.connect_timeout(Duration::from_secs(15)).map_err(curl_err)?;
    easy.timeout(Duration::from_secs(60)).map_err(curl_err)?;
    if let Some(cookie) = cookie_header {
        easy.cookie(cookie).map_err(curl_err)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                let room = MAX_PAGE_BYTES.saturating_sub(body.len());
                body.extend_from_slice(&data[..data.len().min(room)]);
                Ok(data.len())
            })
            .map_err(curl_err)?;
        transfer.perform().map_err(curl_err)?;
    }

    let code = easy.response_code().map_err(curl_err)?;
    if !(200..300).contains(&code) {
        return Err(PageError::Http {
            url: url.to_string(),
            code,
        });
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Absolute http(s) links found in `html`, resolved against `base`, deduplicated
/// in document order. Fragment-only hrefs are dropped.
pub fn page_links(base: &url::Url, html: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for href in anchor_hrefs(html) {
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        let Ok(mut link) = base.join(&href) else {
            continue;
        };
        if link.scheme() != "http" && link.scheme() != "https" {
            continue;
        }
        link.set_fragment(None);
        let link = link.to_string();
        if !out.contains(&link) {
            out.push(link);
        }
    }
    out
}

/// Fetches `url` once per cookie bundle that applies to its host (or once
/// without cookies if none does) and returns the union of the links found.
/// A failing attempt is logged and skipped; the last error is returned only
/// when every attempt failed.
pub fn expand_page(url: &str, cookies: &CookieStore) -> Result<Vec<String>, PageError> {
    let base = url::Url::parse(url).map_err(|source| PageError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let host = base
        .host_str()
        .ok_or_else(|| PageError::NoHost(url.to_string()))?
        .to_string();
    let https = base.scheme() == "https";

    let headers = cookies.headers_for(&host, https);
    let attempts: Vec<Option<&str>> = if headers.is_empty() {
        vec![None]
    } else {
        headers.iter().map(|h| Some(h.as_str())).collect()
    };

    let links = collect_links(&base, &attempts, |cookie| fetch_page(url, cookie))?;
    tracing::debug!(url, links = links.len(), "expanded page");
    Ok(links)
}

fn collect_links<F>(
    base: &url::Url,
    attempts: &[Option<&str>],
    mut fetch: F,
) -> Result<Vec<String>, PageError>
where
    F: FnMut(Option<&str>) -> Result<String, PageError>,
{
    let mut links: Vec<String> = Vec::new();
    let mut last_err = None;
    let mut fetched = 0;
    for (i, &cookie) in attempts.iter().enumerate() {
        let html = match fetch(cookie) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(
                    attempt = i + 1,
                    of = attempts.len(),
                    with_cookies = cookie.is_some(),
                    "page fetch failed, trying next: {}",
                    e
                );
                last_err = Some(e);
                continue;
            }
        };
        fetched += 1;
        for link in page_links(base, &html) {
            if !links.contains(&link) {
                links.push(link);
            }
        }
    }
    match last_err {
        Some(e) if fetched == 0 => Err(e),
        _ => Ok(links),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_links_resolve_relative_hrefs() {
        let base = url::Url::parse("https://example.com/channel/videos").unwrap();
        let html = r##"
            <a href="/watch?v=1">root-relative</a>
            <a href="watch?v=2">relative</a>
            <a href="https://cdn.example.org/v/3#t=10">absolute</a>
            <a href="#top">fragment</a>
            <a href="mailto:someone@example.com">mail</a>
            <a href="/watch?v=1">duplicate</a>
        "##;
        assert_eq!(
            page_links(&base, html),
            vec![
                "https://example.com/watch?v=1",
                "https://example.com/channel/watch?v=2",
                "https://cdn.example.org/v/3",
            ]
        );
    }

    #[test]
    fn expand_page_rejects_bad_urls() {
        let store = CookieStore::default();
        assert!(matches!(
            expand_page("not a url", &store),
            Err(PageError::InvalidUrl { .. })
        ));
        assert!(matches!(
            expand_page("file:///tmp/list.html", &store),
            Err(PageError::NoHost(_))
        ));
    }

    fn http_error(code: u32) -> PageError {
        PageError::Http {
            url: "https://example.com/list".to_string(),
            code,
        }
    }

    #[test]
    fn failing_bundle_is_skipped_when_another_succeeds() {
        let base = url::Url::parse("https://example.com/list").unwrap();
        let mut tried = Vec::new();
        let links = collect_links(&base, &[Some("sid=old"), Some("sid=new")], |cookie| {
            tried.push(cookie.map(str::to_string));
            match cookie {
                Some("sid=old") => Err(http_error(403)),
                _ => Ok(r#"<a href="/watch?v=1">one</a>"#.to_string()),
            }
        })
        .unwrap();
        assert_eq!(links, vec!["https://example.com/watch?v=1"]);
        assert_eq!(tried.len(), 2);
    }

    #[test]
    fn every_attempt_failing_returns_the_last_error() {
        let base = url::Url::parse("https://example.com/list").unwrap();
        let mut codes = vec![403, 500].into_iter();
        let err = collect_links(&base, &[Some("a=1"), Some("b=2")], |_| {
            Err(http_error(codes.next().unwrap()))
        })
        .unwrap_err();
        assert!(matches!(err, PageError::Http { code: 500, .. }), "{err}");
    }

    #[test]
    fn page_without_links_is_not_an_error() {
        let base = url::Url::parse("https://example.com/list").unwrap();
        let links = collect_links(&base, &[None], |_| Ok("<p>empty</p>".to_string())).unwrap();
        assert!(links.is_empty());
    }
}
