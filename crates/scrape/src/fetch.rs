// ABOUTME: The page-fetch capability the pipeline consumes, plus its blocking HTTP implementation.
// ABOUTME: HttpFetcher enforces status/size limits and decodes bodies using charset hints or detection.

use std::time::Duration;

use crate::error::FetchError;

/// Maximum allowed body size (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Retrieves the text content at a URL.
///
/// Implementations block the calling thread until the page is read or the
/// request fails.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// Fetches pages over HTTP(S) with a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Request {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        tracing::debug!(%url, "GET");
        let request_error = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(parsed).send().map_err(request_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        if let Some(len) = response.content_length() {
            if len as usize > MAX_CONTENT_LENGTH {
                return Err(FetchError::TooLarge {
                    url: url.to_string(),
                });
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_lowercase());

        let body = response.bytes().map_err(request_error)?;
        if body.len() > MAX_CONTENT_LENGTH {
            return Err(FetchError::TooLarge {
                url: url.to_string(),
            });
        }

        tracing::debug!(%url, bytes = body.len(), "fetched");
        Ok(decode_body(&body, content_type.as_deref()))
    }
}

/// Decodes body bytes using the charset from the content type, or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()));

    let encoding = declared.unwrap_or_else(|| {
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(body, true);
        detector.guess(None, true)
    });

    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        part.trim()
            .to_lowercase()
            .strip_prefix("charset=")
            .map(|charset| charset.trim_matches(['"', '\'']).to_string())
    })
}
