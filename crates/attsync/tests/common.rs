// Test helpers are shared across test binaries; not every test uses every helper.
#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `attsync` command isolated from the caller's environment.
pub fn attsync(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("attsync");
    cmd.current_dir(dir.path())
        .env_remove("ATTSYNC_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Serve one canned `(status, body)` per connection and return the
/// request lines received.
pub fn stub_server(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            seen.push(request_line.trim_end().to_owned());

            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    content_length = value.trim().parse().unwrap();
                }
            }
            let mut body_in = vec![0; content_length];
            reader.read_exact(&mut body_in).unwrap();

            let response = format!(
                "HTTP/1.1 {status} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            reader.get_mut().write_all(response.as_bytes()).unwrap();
            reader.get_mut().flush().unwrap();
        }
        seen
    });

    (base_url, handle)
}
