//! Size-capped downloads

use crate::error::{DocweaveError, Result};
use reqwest::blocking::Client;
use std::io::Read;
use std::time::Duration;
use url::Url;

pub const USER_AGENT: &str = concat!("docweave/", env!("CARGO_PKG_VERSION"));

pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| DocweaveError::Generic(format!("Cannot build HTTP client: {}", e)))
}

/// Download `url` into memory
///
/// Supports `http`, `https` and `file` URLs. Anything larger than
/// `max_bytes` fails, whether the size is announced up front or not.
pub fn download_to_memory(client: &Client, url: &Url, max_bytes: u64) -> Result<Vec<u8>> {
    match url.scheme() {
        "http" | "https" => download_http(client, url, max_bytes),
        "file" => read_file(url, max_bytes),
        scheme => Err(failed(url, format!("unsupported scheme {}", scheme))),
    }
}

fn download_http(client: &Client, url: &Url, max_bytes: u64) -> Result<Vec<u8>> {
    let mut response = client
        .get(url.as_str())
        .send()
        .map_err(|e| failed(url, e.to_string()))?;

    if let Err(err) = response.error_for_status_ref() {
        return Err(failed(url, err.to_string()));
    }

    if let Some(length) = response.content_length() {
        if length > max_bytes {
            return Err(too_large(url, max_bytes));
        }
    }

    let mut buffer = Vec::new();
    let mut chunk = [0; 8192];
    let mut downloaded: u64 = 0;

    loop {
        let bytes_read = response
            .read(&mut chunk)
            .map_err(|e| failed(url, e.to_string()))?;
        if bytes_read == 0 {
            break;
        }

        downloaded += bytes_read as u64;
        if downloaded > max_bytes {
            return Err(too_large(url, max_bytes));
        }
        buffer.extend_from_slice(&chunk[..bytes_read]);
    }

    tracing::debug!("Downloaded {} bytes from {}", downloaded, url);
    Ok(buffer)
}

fn read_file(url: &Url, max_bytes: u64) -> Result<Vec<u8>> {
    let path = url
        .to_file_path()
        .map_err(|_| failed(url, "not a local path".to_string()))?;
    let length = std::fs::metadata(&path)
        .map_err(|e| failed(url, e.to_string()))?
        .len();
    if length > max_bytes {
        return Err(too_large(url, max_bytes));
    }
    std::fs::read(&path).map_err(|e| failed(url, e.to_string()))
}

fn failed(url: &Url, reason: String) -> DocweaveError {
    DocweaveError::FetchFailed {
        url: url.to_string(),
        reason,
    }
}

fn too_large(url: &Url, max_bytes: u64) -> DocweaveError {
    failed(url, format!("larger than {} bytes", max_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::io::Write;

    fn client() -> Client {
        build_client(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_download_success() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/logo.png")
            .with_status(200)
            .with_body([1u8, 2, 3, 4])
            .create();

        let url = Url::parse(&format!("{}/logo.png", server.url())).unwrap();
        let bytes = download_to_memory(&client(), &url, 1024).unwrap();

        mock.assert();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_http_error_status() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/missing.png").with_status(404).create();

        let url = Url::parse(&format!("{}/missing.png", server.url())).unwrap();
        let result = download_to_memory(&client(), &url, 1024);

        assert!(matches!(result, Err(DocweaveError::FetchFailed { .. })));
    }

    #[test]
    fn test_size_cap() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/big.png")
            .with_status(200)
            .with_body(vec![b'x'; 4096])
            .create();

        let url = Url::parse(&format!("{}/big.png", server.url())).unwrap();
        let err = download_to_memory(&client(), &url, 1000).unwrap_err();

        assert!(err.to_string().contains("larger than 1000 bytes"));
    }

    #[test]
    fn test_file_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"local").unwrap();

        let url = Url::from_file_path(file.path()).unwrap();
        assert_eq!(download_to_memory(&client(), &url, 1024).unwrap(), b"local");
        assert!(download_to_memory(&client(), &url, 2).is_err());
    }

    #[test]
    fn test_unsupported_scheme() {
        let url = Url::parse("ftp://example.com/logo.png").unwrap();
        let err = download_to_memory(&client(), &url, 1024).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme ftp"));
    }
}
