use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of a single GET against a candidate URL.
///
/// Transport failures are carried in `error` with a zero status code rather
/// than being returned as `Err`, so one dead host never stops a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub url: String,
    /// Where the request ended up after redirects, if it moved.
    pub final_url: Option<String>,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub response_time: Duration,
    pub body: String,
    /// Set when the body was cut at the read limit.
    pub truncated: bool,
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn new(url: String) -> Self {
        Self {
            url,
            final_url: None,
            status_code: 0,
            content_type: None,
            content_length: None,
            response_time: Duration::from_secs(0),
            body: String::new(),
            truncated: false,
            error: None,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(url)
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_html(&self) -> bool {
        self.content_type
            .as_ref()
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false)
    }
}
