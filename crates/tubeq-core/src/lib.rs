pub mod config;
pub mod logging;

pub mod artifact;
pub mod checksum;
pub mod cookies;
pub mod detect;
pub mod downloader;
pub mod fetch_page;
pub mod finalize;
pub mod ingest;
pub mod layout;
pub mod queue;
pub mod scheduler;
pub mod url_model;
