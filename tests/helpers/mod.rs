//! Localhost mock servers for wire-level tests.
//!
//! The client under test is blocking, so the servers run on std threads.
//! Each canned response serves exactly one connection: read the full
//! request, hand it to the test through a channel, write the response,
//! close the socket.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;

/// A mock HTTP/1.1 server bound to a random localhost port.
pub struct MockServer {
    listener: TcpListener,
    port: u16,
}

impl MockServer {
    /// Bind to a random port.
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let port = listener.local_addr().unwrap().port();
        Self { listener, port }
    }

    #[allow(dead_code)]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL for this server.
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Serve the canned responses, one connection each, then stop.
    ///
    /// Returns a channel yielding each captured request in order.
    #[allow(dead_code)]
    pub fn run(self, responses: Vec<Vec<u8>>) -> mpsc::Receiver<Vec<u8>> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for response in responses {
                let (mut stream, _) = match self.listener.accept() {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let request = read_request(&mut stream);
                let _ = tx.send(request);
                let _ = stream.write_all(&response);
                // Dropping the stream closes the connection; EOF is the
                // client's end-of-body signal.
            }
        });
        rx
    }

    /// Serve one connection with a custom handler. The captured request is
    /// delivered before the handler runs.
    #[allow(dead_code)]
    pub fn run_with<F>(self, handler: F) -> mpsc::Receiver<Vec<u8>>
    where
        F: FnOnce(&mut TcpStream) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = self.listener.accept() {
                let request = read_request(&mut stream);
                let _ = tx.send(request);
                handler(&mut stream);
            }
        });
        rx
    }

    /// Accept one connection without speaking HTTP at all.
    #[allow(dead_code)]
    pub fn run_raw<F>(self, handler: F)
    where
        F: FnOnce(&mut TcpStream) + Send + 'static,
    {
        thread::spawn(move || {
            if let Ok((mut stream, _)) = self.listener.accept() {
                handler(&mut stream);
            }
        });
    }
}

/// Assemble a response byte sequence.
#[allow(dead_code)]
pub fn http_response(status_line: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut response = Vec::new();
    response.extend_from_slice(status_line.as_bytes());
    response.extend_from_slice(b"\r\n");
    for (name, value) in headers {
        response.extend_from_slice(name.as_bytes());
        response.extend_from_slice(b": ");
        response.extend_from_slice(value.as_bytes());
        response.extend_from_slice(b"\r\n");
    }
    response.extend_from_slice(b"\r\n");
    response.extend_from_slice(body);
    response
}

/// Read one full request: headers through `\r\n\r\n`, plus `Content-Length`
/// body bytes when present.
fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        if let Some(header_end) = find_header_end(&data) {
            let expected = header_end + content_length(&data[..header_end]);
            if data.len() >= expected {
                return data;
            }
        }
        let n = match stream.read(&mut buf) {
            Ok(n) => n,
            Err(_) => return data,
        };
        if n == 0 {
            return data;
        }
        data.extend_from_slice(&buf[..n]);
    }
}

fn find_header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

fn content_length(head: &[u8]) -> usize {
    let head = String::from_utf8_lossy(head);
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}
