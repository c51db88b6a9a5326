use crate::config::SourceConfig;
use crate::error::{EtlError, Result};
use reqwest::blocking::Client;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Anything that can hand back the HTML behind a URL.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Live HTTP fetch. The response is consumed and dropped inside `fetch`, so the
/// connection is released on every path.
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self, url: &str) -> Result<String> {
        info!("HTTP GET request to: {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text()?;
        info!("HTTP response: status={}, size={} bytes", status.as_u16(), body.len());
        Ok(body)
    }
}

/// Reads a saved copy of the page from disk; the URL is ignored.
pub struct FilePageSource {
    path: PathBuf,
}

impl FilePageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for FilePageSource {
    fn fetch(&self, url: &str) -> Result<String> {
        info!("Reading {} from {}", url, self.path.display());
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// Serves a fixed document.
pub struct StaticPageSource {
    html: String,
}

impl StaticPageSource {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

impl PageSource for StaticPageSource {
    fn fetch(&self, _url: &str) -> Result<String> {
        Ok(self.html.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve a single canned HTTP response on a loopback port and return its URL.
    fn serve_once(response: &'static str) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/wiki/List_of_largest_banks", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
        });
        (url, handle)
    }

    #[test]
    fn file_source_reads_saved_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "<html></html>").unwrap();

        let source = FilePageSource::new(&path);
        assert_eq!(source.fetch("https://example.com").unwrap(), "<html></html>");
    }

    #[test]
    fn file_source_reports_missing_file() {
        let source = FilePageSource::new("/nonexistent/page.html");
        assert!(matches!(source.fetch("https://example.com"), Err(EtlError::Io(_))));
    }

    #[test]
    fn http_error_status_is_reported() {
        let (url, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot found",
        );
        let source = HttpPageSource::new(&SourceConfig::default()).unwrap();

        match source.fetch(&url) {
            Err(EtlError::HttpStatus { url: failed, status }) => {
                assert_eq!(status, 404);
                assert_eq!(failed, url);
            }
            other => panic!("expected status error, got {:?}", other),
        }
        server.join().unwrap();
    }

    #[test]
    fn http_success_returns_body() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 13\r\nConnection: close\r\n\r\n<html></html>",
        );
        let source = HttpPageSource::new(&SourceConfig::default()).unwrap();

        assert_eq!(source.fetch(&url).unwrap(), "<html></html>");
        server.join().unwrap();
    }

    #[test]
    fn http_source_builds_from_default_config() {
        assert!(HttpPageSource::new(&SourceConfig::default()).is_ok());
    }
}
