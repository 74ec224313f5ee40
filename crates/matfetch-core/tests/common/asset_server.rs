//! Minimal HTTP/1.1 server for integration tests: one JSON listing plus files.
//!
//! `GET /contents/<tag>` answers with a GitHub-style listing whose
//! `download_url`s point back at `GET /raw/<name>`. Names in `broken` get the
//! connection closed without a response (a network failure from curl's view).
//! Names in `stalled` get headers and then nothing until long after any test
//! timeout. Names in `missing` are advertised but answer 404. Every request's
//! `User-Agent` is recorded.

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// How long a stalled download stays silent; well past any test timeout.
const STALL: std::time::Duration = std::time::Duration::from_secs(6);

#[derive(Debug, Clone, Default)]
pub struct AssetServerOptions {
    /// Files served under `/raw/<name>` and advertised in the listing.
    pub files: Vec<(String, Vec<u8>)>,
    /// Names advertised but whose download drops the connection.
    pub broken: HashSet<String>,
    /// Names advertised whose download sends headers and then stalls.
    pub stalled: HashSet<String>,
    /// Names advertised but not served (`/raw/<name>` answers 404).
    pub missing: HashSet<String>,
    /// If set, the listing answers with this status and no body.
    pub listing_status: Option<u16>,
    /// If set, a 200 listing returns these bytes instead of the JSON records.
    pub listing_body: Option<Vec<u8>>,
    /// Extra raw listing records appended verbatim.
    pub extra_records: Vec<serde_json::Value>,
}

pub struct AssetServer {
    /// e.g. "http://127.0.0.1:12345"
    pub base_url: String,
    listing_hits: Arc<AtomicUsize>,
    file_hits: Arc<AtomicUsize>,
    user_agents: Arc<Mutex<Vec<(String, String)>>>,
}

impl AssetServer {
    /// Listing URL template with a `{tag}` placeholder.
    pub fn listing_template(&self) -> String {
        format!("{}/contents/{{tag}}", self.base_url)
    }

    pub fn listing_hits(&self) -> usize {
        self.listing_hits.load(Ordering::SeqCst)
    }

    /// Requests made for `/raw/...` (successful or not).
    pub fn file_hits(&self) -> usize {
        self.file_hits.load(Ordering::SeqCst)
    }

    /// `(path, User-Agent)` of every request seen so far (empty UA if absent).
    pub fn user_agents(&self) -> Vec<(String, String)> {
        self.user_agents.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(opts: AssetServerOptions) -> AssetServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base_url = format!("http://127.0.0.1:{}", port);

    let listing = match &opts.listing_body {
        Some(body) => body.clone(),
        None => build_listing(&base_url, &opts),
    };
    let files: HashMap<String, Vec<u8>> = opts.files.iter().cloned().collect();
    let state = Arc::new(State {
        listing,
        listing_status: opts.listing_status,
        files,
        broken: opts.broken,
        stalled: opts.stalled,
    });
    let listing_hits = Arc::new(AtomicUsize::new(0));
    let file_hits = Arc::new(AtomicUsize::new(0));
    let user_agents = Arc::new(Mutex::new(Vec::new()));

    let counters = Counters {
        listing_hits: Arc::clone(&listing_hits),
        file_hits: Arc::clone(&file_hits),
        user_agents: Arc::clone(&user_agents),
    };
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&state);
            let counters = counters.clone();
            thread::spawn(move || handle(stream, &state, &counters));
        }
    });

    AssetServer {
        base_url,
        listing_hits,
        file_hits,
        user_agents,
    }
}

struct State {
    listing: Vec<u8>,
    listing_status: Option<u16>,
    files: HashMap<String, Vec<u8>>,
    broken: HashSet<String>,
    stalled: HashSet<String>,
}

#[derive(Clone)]
struct Counters {
    listing_hits: Arc<AtomicUsize>,
    file_hits: Arc<AtomicUsize>,
    user_agents: Arc<Mutex<Vec<(String, String)>>>,
}

fn build_listing(base_url: &str, opts: &AssetServerOptions) -> Vec<u8> {
    let mut records: Vec<serde_json::Value> = opts
        .files
        .iter()
        .map(|(name, _)| name.clone())
        .chain(opts.broken.iter().cloned())
        .chain(opts.stalled.iter().cloned())
        .chain(opts.missing.iter().cloned())
        .map(|name| {
            serde_json::json!({
                "name": name,
                "path": format!("512/{}", name),
                "type": "file",
                "download_url": format!("{}/raw/{}", base_url, name),
            })
        })
        .collect();
    records.extend(opts.extra_records.iter().cloned());
    serde_json::to_vec(&records).unwrap()
}

fn handle(mut stream: std::net::TcpStream, state: &State, counters: &Counters) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    let user_agent = request
        .lines()
        .skip(1)
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("user-agent"))
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default();
    counters
        .user_agents
        .lock()
        .unwrap()
        .push((path.to_string(), user_agent));
    if !method.eq_ignore_ascii_case("GET") {
        respond(&mut stream, "405 Method Not Allowed", "text/plain", b"");
        return;
    }

    if path.starts_with("/contents/") {
        counters.listing_hits.fetch_add(1, Ordering::SeqCst);
        match state.listing_status {
            Some(code) => respond(&mut stream, &status_line(code), "application/json", b"{\"message\":\"Not Found\"}"),
            None => respond(&mut stream, "200 OK", "application/json", &state.listing),
        }
        return;
    }

    if let Some(name) = path.strip_prefix("/raw/") {
        counters.file_hits.fetch_add(1, Ordering::SeqCst);
        if state.broken.contains(name) {
            // Drop the connection without answering.
            return;
        }
        if state.stalled.contains(name) {
            let head = "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 1024\r\nConnection: close\r\n\r\n";
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.flush();
            thread::sleep(STALL);
            return;
        }
        match state.files.get(name) {
            Some(body) => respond(&mut stream, "200 OK", "image/png", body),
            None => respond(&mut stream, "404 Not Found", "text/plain", b"not found"),
        }
        return;
    }

    respond(&mut stream, "404 Not Found", "text/plain", b"not found");
}

fn status_line(code: u16) -> String {
    let reason = match code {
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Error",
    };
    format!("{} {}", code, reason)
}

fn respond(stream: &mut std::net::TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
