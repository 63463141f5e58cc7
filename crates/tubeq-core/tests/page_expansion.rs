//! Link expansion against a local HTTP server, with and without cookie bundles.

mod common;

use std::fs;

use tubeq_core::cookies::CookieStore;
use tubeq_core::fetch_page::{self, PageError};
use tubeq_core::ingest::{ingest_text, PageExpander, RecordSet};
use tubeq_core::url_model::UrlRecord;

const PAGE: &str = r##"<html><body>
<a href="/watch?v=1">one</a>
<a href="/watch?v=2#t=10">two</a>
<a href="https://cdn.example.org/clip">three</a>
<a href="#top">top</a>
<a href="mailto:someone@example.org">mail</a>
<a href="/watch?v=1">one again</a>
</body></html>"##;

#[test]
fn expand_page_resolves_links_without_cookies() {
    let (base, seen) = common::page_server::start(PAGE);
    let links = fetch_page::expand_page(&format!("{}channel", base), &CookieStore::default())
        .unwrap();
    assert_eq!(
        links,
        vec![
            format!("{}watch?v=1", base),
            format!("{}watch?v=2", base),
            "https://cdn.example.org/clip".to_string(),
        ]
    );
    assert_eq!(*seen.lock().unwrap(), vec![None::<String>]);
}

#[test]
fn matching_cookie_bundles_are_sent_one_request_each() {
    let (base, seen) = common::page_server::start(PAGE);
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.json"),
        r#"[{"name":"sid","value":"abc","domain":"127.0.0.1","path":"/","hostOnly":true}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("b.json"),
        r#"[{"name":"other","value":"x","domain":".example.com"}]"#,
    )
    .unwrap();
    let store = CookieStore::load_dir(dir.path()).unwrap();
    assert_eq!(store.len(), 2);

    let links = fetch_page::expand_page(&base, &store).unwrap();
    assert_eq!(links.len(), 3);
    assert_eq!(*seen.lock().unwrap(), vec![Some("sid=abc".to_string())]);
}

#[test]
fn rejected_bundle_does_not_stop_the_others() {
    let (base, seen) = common::page_server::start(PAGE);
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.json"),
        r#"[{"name":"sid","value":"expired","domain":"127.0.0.1","hostOnly":true}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("b.json"),
        r#"[{"name":"sid","value":"fresh","domain":"127.0.0.1","hostOnly":true}]"#,
    )
    .unwrap();
    let store = CookieStore::load_dir(dir.path()).unwrap();

    let links = fetch_page::expand_page(&base, &store).unwrap();
    assert_eq!(links.len(), 3);
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn every_bundle_rejected_is_an_error() {
    let (base, _seen) = common::page_server::start(PAGE);
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.json"),
        r#"[{"name":"sid","value":"expired","domain":"127.0.0.1","hostOnly":true}]"#,
    )
    .unwrap();
    let store = CookieStore::load_dir(dir.path()).unwrap();

    let err = fetch_page::expand_page(&base, &store).unwrap_err();
    assert!(matches!(err, PageError::Http { code: 403, .. }), "{err}");
}

#[test]
fn http_error_is_reported() {
    let (base, _seen) = common::page_server::start(PAGE);
    let err = fetch_page::fetch_page(&format!("{}missing", base), None).unwrap_err();
    assert!(matches!(err, PageError::Http { code: 404, .. }), "{err}");
}

#[test]
fn expanded_links_replace_the_page_and_keep_its_folder() {
    let (base, _seen) = common::page_server::start(PAGE);
    let expander = PageExpander::new(vec!["127.0.0.1".to_string()], CookieStore::default());
    let mut set = RecordSet::default();
    ingest_text(
        &format!("{}channel,name,music\nhttps://example.com/single\n", base),
        &expander,
        &mut set,
    );
    let records = set.into_records();
    assert_eq!(records.len(), 4);
    assert_eq!(
        records[0],
        UrlRecord::with_overrides(format!("{}watch?v=1", base), "", "music")
    );
    assert_eq!(records[3], UrlRecord::new("https://example.com/single"));
}
