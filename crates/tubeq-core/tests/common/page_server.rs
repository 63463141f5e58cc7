//! Minimal HTTP/1.1 server for link-expansion tests.
//!
//! Serves one static HTML body for every GET path except `/missing`, which
//! returns 404. Requests whose cookies contain `expired` get 403. The `Cookie`
//! header of every request is recorded so tests can check which credentials
//! were sent.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Cookie header of each request, in arrival order (None when absent).
pub type SeenCookies = Arc<Mutex<Vec<Option<String>>>>;

/// Starts a server in a background thread. Returns the base URL
/// (e.g. "http://127.0.0.1:12345/") and the request log. The server runs until
/// the process exits.
pub fn start(body: &str) -> (String, SeenCookies) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body.to_string());
    let seen: SeenCookies = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &body, &log));
        }
    });
    (format!("http://127.0.0.1:{}/", port), seen)
}

fn handle(mut stream: TcpStream, body: &str, log: &SeenCookies) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let (method, path, cookie) = parse_request(request);
    let expired = cookie.as_deref().is_some_and(|c| c.contains("expired"));
    log.lock().unwrap().push(cookie);

    let response = if !method.eq_ignore_ascii_case("GET") {
        "HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n".to_string()
    } else if expired {
        "HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\n\r\n".to_string()
    } else if path == "/missing" {
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_string()
    } else {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        )
    };
    let _ = stream.write_all(response.as_bytes());
}

/// Returns (method, path, Cookie header value).
fn parse_request(request: &str) -> (&str, &str, Option<String>) {
    let mut lines = request.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("/");
    let mut cookie = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("cookie") {
                cookie = Some(value.trim().to_string());
            }
        }
    }
    (method, path, cookie)
}
