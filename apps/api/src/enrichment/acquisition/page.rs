//! Raw-document strategy: one GET of the profile page with browser-like headers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, info, warn};

use super::{
    describe_transport_error, status_line, truncate_chars, AcquisitionError, DocumentSource,
    RawContent,
};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// A UTF-8 char is at most 4 bytes, so this many bytes always covers the cap.
const MAX_BYTES_PER_CHAR: usize = 4;

/// Fetches profile pages. Cloneable; the inner client pools connections.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    max_content_length: usize,
}

impl PageFetcher {
    pub fn new(timeout: Duration, max_content_length: usize) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            max_content_length,
        })
    }
}

#[async_trait]
impl DocumentSource for PageFetcher {
    /// Single attempt. The body is read chunk by chunk and reading stops once
    /// enough bytes for `max_content_length` characters have arrived.
    async fn fetch_document(&self, url: &str) -> Result<RawContent, AcquisitionError> {
        info!(url, "fetching profile page");

        let mut response = self.client.get(url).send().await.map_err(|e| {
            let detail = describe_transport_error(&e);
            warn!(url, "page fetch failed: {detail}");
            AcquisitionError::transport(detail)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "page fetch returned non-success status");
            return Err(AcquisitionError::http(
                status.as_u16(),
                format!(
                    "HTTP status {} fetching {url}. The page might be private, require login, \
                    or the server might be blocking automated requests.",
                    status_line(status)
                ),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let byte_budget = self.max_content_length.saturating_mul(MAX_BYTES_PER_CHAR);
        let mut body: Vec<u8> = Vec::new();
        loop {
            let chunk = response.chunk().await.map_err(|e| {
                let detail = describe_transport_error(&e);
                warn!(url, "reading page body failed: {detail}");
                AcquisitionError::transport(detail)
            })?;
            let Some(chunk) = chunk else { break };
            body.extend_from_slice(&chunk);
            if body.len() >= byte_budget {
                debug!(url, bytes = body.len(), "byte budget reached, abandoning rest of body");
                break;
            }
        }

        let text = String::from_utf8_lossy(&body).into_owned();
        let fetched_chars = text.chars().count();
        let text = truncate_chars(text, self.max_content_length);
        if fetched_chars > self.max_content_length {
            warn!(
                url,
                fetched_chars,
                max = self.max_content_length,
                "page content is very long, truncating"
            );
        }

        let content = RawContent::new(text, content_type);
        info!(url, length = content.length, "fetched profile page");
        Ok(content)
    }
}
