//! Downloaded subtitle archives.

use std::path::{Component, Path};

use futures_util::StreamExt;
use reqwest::Response;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use super::http::header_str;
use crate::error::AnimeSubError;

/// A subtitle archive whose body has not been read yet.
///
/// The body is consumed by [`bytes`](Self::bytes) or
/// [`save_to`](Self::save_to). Dropping the value without reading it closes
/// the connection.
#[derive(Debug)]
pub struct DownloadedArchive {
    /// File name suggested by the server, or `<id>.zip`.
    pub filename: String,
    /// Size announced by the server.
    pub content_length: Option<u64>,
    url: String,
    response: Response,
}

impl DownloadedArchive {
    pub(crate) fn from_response(subtitle_id: u32, url: &str, response: Response) -> Self {
        let filename = header_str(&response, CONTENT_DISPOSITION)
            .and_then(parse_content_disposition)
            .map(|name| sanitize_filename(&name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("{subtitle_id}.zip"));
        let content_length =
            header_str(&response, CONTENT_LENGTH).and_then(|v| v.trim().parse().ok());
        Self {
            filename,
            content_length,
            url: url.to_string(),
            response,
        }
    }

    /// Reads the whole archive into memory.
    ///
    /// # Errors
    ///
    /// Returns [`AnimeSubError::Network`] if the body cannot be read.
    pub async fn bytes(self) -> Result<Vec<u8>, AnimeSubError> {
        let bytes = self
            .response
            .bytes()
            .await
            .map_err(|e| AnimeSubError::network(&self.url, e))?;
        Ok(bytes.to_vec())
    }

    /// Streams the archive to `path`, returning the number of bytes written.
    ///
    /// A partially written file is removed when the transfer fails.
    ///
    /// # Errors
    ///
    /// Returns [`AnimeSubError::Io`] if the file cannot be written and
    /// [`AnimeSubError::Network`] if the transfer breaks off.
    pub async fn save_to(self, path: &Path) -> Result<u64, AnimeSubError> {
        let mut file = File::create(path)
            .await
            .map_err(|e| AnimeSubError::io(path, e))?;

        let result = stream_to_file(&mut file, self.response, &self.url, path).await;
        if result.is_err() {
            debug!(path = %path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(path).await;
        }
        let bytes_written = result?;

        info!(path = %path.display(), bytes = bytes_written, "download complete");
        Ok(bytes_written)
    }
}

async fn stream_to_file(
    file: &mut File,
    response: Response,
    url: &str,
    path: &Path,
) -> Result<u64, AnimeSubError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AnimeSubError::network(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| AnimeSubError::io(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| AnimeSubError::io(path, e))?;
    Ok(bytes_written)
}

/// Extracts the file name from a `Content-Disposition` header.
///
/// Handles `filename="a b.zip"`, `filename=a.zip` and RFC 5987
/// `filename*=UTF-8''a%20b.zip`.
pub(crate) fn parse_content_disposition(header: &str) -> Option<String> {
    if let Some(pos) = header.find("filename*=") {
        let value = header[pos + 10..].trim();
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            let end = encoded.find(';').unwrap_or(encoded.len());
            if let Ok(decoded) = urlencoding::decode(encoded[..end].trim()) {
                return Some(decoded.into_owned());
            }
        }
    }

    let pos = header.find("filename=")?;
    let value = header[pos + 9..].trim();
    if let Some(quoted) = value.strip_prefix('"') {
        return quoted
            .find('"')
            .map(|end| quoted[..end].to_string())
            .filter(|name| !name.is_empty());
    }
    let end = value.find(';').unwrap_or(value.len());
    let name = value[..end].trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Makes a server-provided name safe to use as a single path segment.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let sanitized = sanitized.trim().to_string();

    let mut components = Path::new(&sanitized).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if single_normal {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}
