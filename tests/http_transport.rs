//! Drives the reqwest transport against a one-shot loopback HTTP server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use azure_maps_search::api::{HttpTransport, Transport};
use azure_maps_search::{QueryBuilder, SearchError};

/// Serve exactly one request with `status` and `body`, returning the raw
/// request head that was received.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/search/fuzzy/json", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut head = Vec::new();
        let mut chunk = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        String::from_utf8_lossy(&head).into_owned()
    });

    (url, handle)
}

fn request_line(head: &str) -> &str {
    head.lines().next().unwrap_or_default()
}

#[test]
fn sends_query_string_and_maps_results() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"results":[{"poi":{"name":"Rondebosch Boys"},"position":{"lat":-33.96,"lon":18.47}}]}"#,
    );

    let mut builder = QueryBuilder::new(&url, "test-key").unwrap();
    let results = builder
        .new_search("Rondebosch Boys", Some("7372"))
        .country(["ZA", "NA"])
        .location_with_radius(-33.925, 18.424, 5000)
        .fetch_results()
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Rondebosch Boys");
    assert_eq!(results[0].coordinates.lng, Some(18.47));

    let head = server.join().unwrap();
    let line = request_line(&head);
    assert!(line.starts_with("GET /search/fuzzy/json?"), "{}", line);
    assert!(line.contains("api-version=1.0"));
    assert!(line.contains("subscription-key=test-key"));
    assert!(line.contains("query=Rondebosch+Boys"));
    assert!(line.contains("categorySet=7372"));
    assert!(line.contains("countrySet=ZA%2CNA"));
    assert!(line.contains("lat=-33.925"));
    assert!(line.contains("lon=18.424"));
    assert!(line.contains("radius=5000"));
    assert!(line.contains("limit=5"));
}

#[test]
fn non_200_surfaces_status_error() {
    let (url, server) = serve_once("503 Service Unavailable", r#"{"error":"busy"}"#);

    let mut builder = QueryBuilder::new(&url, "test-key").unwrap();
    let err = builder.new_search("anything", None).fetch().unwrap_err();
    server.join().unwrap();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "Failed to fetch search results");
}

#[test]
fn transport_returns_body_for_error_statuses() {
    let (url, server) = serve_once("404 Not Found", "missing");

    let transport = HttpTransport::with_settings("test-agent", Duration::from_secs(5)).unwrap();
    let response = transport.get(&url, &[]).unwrap();
    let head = server.join().unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.body, "missing");
    assert!(head.to_ascii_lowercase().contains("user-agent: test-agent"));
}

#[test]
fn connection_failure_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/search", listener.local_addr().unwrap());
    drop(listener);

    let mut builder = QueryBuilder::new(&url, "SECRET-KEY-123").unwrap();
    let err = builder.new_search("anything", None).fetch().unwrap_err();

    assert!(matches!(err, SearchError::Transport(_)));
    let message = err.to_string();
    assert!(message.starts_with("Failed to fetch search results: "));
    assert!(!message.contains("SECRET-KEY-123"), "{}", message);
    assert!(!message.contains("subscription-key"), "{}", message);
}
