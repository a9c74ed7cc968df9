//! Minimal HTTP responder used to drive the elevation client in tests
#![allow(dead_code)]
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Serves canned responses on a random local port
pub struct TestServer {
    addr: SocketAddr,
    requests: Receiver<String>,
}

impl TestServer {
    /// Answer `count` connections, `respond` maps the request target to a status and body
    pub fn start<F>(count: usize, respond: F) -> TestServer
    where
        F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        let respond = Arc::new(respond);
        thread::spawn(move || {
            for stream in listener.incoming().take(count) {
                let stream = stream.unwrap();
                let tx = tx.clone();
                let respond = respond.clone();
                thread::spawn(move || handle_connection(stream, tx, respond.as_ref()));
            }
        });
        TestServer { addr, requests: rx }
    }

    /// Answer every request with the same status and body
    pub fn respond_with(status: u16, body: &str) -> TestServer {
        let body = body.to_string();
        TestServer::start(1, move |_| (status, body.clone()))
    }

    /// Accept a single connection and never answer it
    pub fn stalled() -> TestServer {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (_tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((_stream, _)) = listener.accept() {
                thread::sleep(Duration::from_secs(5));
            }
        });
        TestServer { addr, requests: rx }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Header block of the next request received
    pub fn next_request(&self) -> String {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("no request received")
    }
}

/// Return a base URL where nothing is listening
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Request target (path and query) from a request header block
pub fn request_target(head: &str) -> &str {
    head.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("")
}

fn handle_connection(
    mut stream: TcpStream,
    tx: Sender<String>,
    respond: &(dyn Fn(&str) -> (u16, String) + Send + Sync),
) {
    let mut head = String::new();
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
            break;
        }
        head.push_str(&line);
    }

    let (status, body) = respond(request_target(&head));
    let _ = tx.send(head);
    let response = format!(
        "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();
}
