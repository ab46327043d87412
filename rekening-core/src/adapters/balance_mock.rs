//! Mock bank API server for testing
//!
//! A tiny HTTP server on a random local port that answers every request with
//! one configurable response and records the raw request text, so the HTTP
//! client can be tested without a running bank server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Canned response returned for every request
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

impl MockResponse {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.to_string(),
            delay_ms: 0,
        }
    }

    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html",
            body: body.to_string(),
            delay_ms: 0,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            ..Self::json(body)
        }
    }
}

/// Mock bank server
pub struct MockBalanceServer {
    port: u16,
    running: Arc<AtomicBool>,
    response: Arc<Mutex<MockResponse>>,
    requests: Arc<Mutex<Vec<String>>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockBalanceServer {
    /// Start a new mock server on a random available port
    pub fn start(response: MockResponse) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let response = Arc::new(Mutex::new(response));
        let requests = Arc::new(Mutex::new(Vec::new()));

        // Non-blocking so the accept loop can observe shutdown
        listener.set_nonblocking(true)?;

        let running_clone = Arc::clone(&running);
        let response_clone = Arc::clone(&response);
        let requests_clone = Arc::clone(&requests);
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let response = Arc::clone(&response_clone);
                        let requests = Arc::clone(&requests_clone);
                        thread::spawn(move || handle_connection(stream, &response, &requests));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            response,
            requests,
            thread_handle: Some(thread_handle),
        })
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Replace the response served from now on
    pub fn set_response(&self, response: MockResponse) {
        *self.response.lock().unwrap() = response;
    }

    /// Raw text of every request received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockBalanceServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, response: &Mutex<MockResponse>, requests: &Mutex<Vec<String>>) {
    let _ = stream.set_nonblocking(false);
    let mut buffer = [0; 4096];

    if let Ok(n) = stream.read(&mut buffer) {
        let request = String::from_utf8_lossy(&buffer[..n]).to_string();
        requests.lock().unwrap().push(request);

        let response = response.lock().unwrap().clone();
        if response.delay_ms > 0 {
            thread::sleep(Duration::from_millis(response.delay_ms));
        }
        send_response(&mut stream, &response);
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn send_response(stream: &mut TcpStream, response: &MockResponse) {
    let raw = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        status_text(response.status),
        response.content_type,
        response.body.len(),
        response.body
    );
    let _ = stream.write_all(raw.as_bytes());
    let _ = stream.flush();
}
