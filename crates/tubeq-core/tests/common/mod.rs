#![allow(dead_code)]

#[cfg(unix)]
pub mod fake_downloader;
pub mod page_server;
