//! Minimal HTTP/1.1 server for responses wiremock cannot produce.
//!
//! wiremock always sends a `Content-Length` matching the body. These helpers
//! write the response bytes verbatim, so a test can omit the length, lie
//! about it, or tag the body with an encoding.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use super::socket_guard::should_skip_socket_bound_test;

const CHUNK_SIZE: usize = 16;

/// Serves `body` with `Transfer-Encoding: chunked` to every connection.
///
/// Returns the base URI (`http://127.0.0.1:PORT`), or `None` when sockets are
/// unavailable. The server thread lives until the test process exits.
#[track_caller]
pub fn serve_chunked(body: Vec<u8>) -> Option<String> {
    let mut response =
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n".to_vec();
    for chunk in body.chunks(CHUNK_SIZE) {
        response.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        response.extend_from_slice(chunk);
        response.extend_from_slice(b"\r\n");
    }
    response.extend_from_slice(b"0\r\n\r\n");
    serve_raw(response)
}

/// Serves a 200 response with the given extra `headers` and `body`, then
/// closes the connection.
///
/// No `Content-Length` is added; pass one in `headers` to declare a length
/// that differs from what is actually sent.
#[track_caller]
pub fn serve_with_headers(headers: &[(&str, &str)], body: &[u8]) -> Option<String> {
    let mut response = b"HTTP/1.1 200 OK\r\nConnection: close\r\n".to_vec();
    for (name, value) in headers {
        response.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    response.extend_from_slice(b"\r\n");
    response.extend_from_slice(body);
    serve_raw(response)
}

/// Writes `response` verbatim to every connection after reading its request.
#[track_caller]
fn serve_raw(response: Vec<u8>) -> Option<String> {
    if should_skip_socket_bound_test() {
        return None;
    }
    let listener = TcpListener::bind("127.0.0.1:0").ok()?;
    let addr = listener.local_addr().ok()?;
    let response = Arc::new(response);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            let response = Arc::clone(&response);
            thread::spawn(move || respond(stream, &response));
        }
    });

    Some(format!("http://{addr}"))
}

fn respond(mut stream: TcpStream, response: &[u8]) {
    let mut received = Vec::new();
    let mut buf = [0u8; 1024];
    while !received.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => received.extend_from_slice(&buf[..n]),
        }
    }

    // The client may hang up early (size limit); that is not a test failure.
    let _ = stream.write_all(response);
    let _ = stream.flush();
}
