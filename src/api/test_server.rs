//! Throwaway HTTP/1.1 server for client tests.
//!
//! Serves one canned response per connection, in order, and hands back the
//! raw requests it received.
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub struct Canned {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Canned {
    pub fn json(body: impl Into<String>) -> Self {
        Canned { status: "200 OK", content_type: "application/json", body: body.into().into_bytes() }
    }

    pub fn png(body: Vec<u8>) -> Self {
        Canned { status: "200 OK", content_type: "image/png", body }
    }

    pub fn status(status: &'static str) -> Self {
        Canned { status, content_type: "text/plain", body: b"nope".to_vec() }
    }
}

/// Start serving `responses`; returns the base URL and a handle yielding the requests
pub async fn serve(responses: Vec<Canned>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for canned in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);

            let head = format!(
                "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                canned.status,
                canned.content_type,
                canned.body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&canned.body).await.unwrap();
            socket.shutdown().await.ok();
        }
        requests
    });

    (format!("http://{addr}"), handle)
}

/// Read one request: headers, then either `content-length` bytes or a chunked body
async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];

    loop {
        if let Some(header_end) = find(&data, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
            let body_len = data.len() - (header_end + 4);

            let complete = if let Some(length) = content_length(&head) {
                body_len >= length
            } else if head.contains("transfer-encoding: chunked") {
                data.ends_with(b"0\r\n\r\n")
            } else {
                true
            };
            if complete {
                break;
            }
        }

        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }

    String::from_utf8_lossy(&data).into_owned()
}

fn content_length(head: &str) -> Option<usize> {
    head.lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse().ok())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// A base URL nothing is listening on
pub async fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
