use crate::error::{Result, ScanError};
use crate::result::ProbeResult;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = concat!(
    "leakprobe/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/trapdoorsec/leakprobe)"
);

/// Bodies larger than this are cut; the classifier only needs the head of a file.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub struct ProberBuilder {
    timeout_secs: u64,
    user_agent: String,
    max_redirects: usize,
    insecure: bool,
    max_body_bytes: usize,
}

impl ProberBuilder {
    pub fn new() -> Self {
        Self {
            timeout_secs: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 5,
            insecure: false,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs.max(1);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn build(self) -> Result<Prober> {
        let redirect = if self.max_redirects == 0 {
            reqwest::redirect::Policy::none()
        } else {
            reqwest::redirect::Policy::limited(self.max_redirects)
        };

        let client = Client::builder()
            .user_agent(self.user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.timeout_secs))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(redirect)
            .danger_accept_invalid_certs(self.insecure)
            .build()
            .map_err(|e| ScanError::ClientBuild(e.to_string()))?;

        Ok(Prober {
            client,
            max_body_bytes: self.max_body_bytes,
        })
    }
}

impl Default for ProberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Thin wrapper over a pooled `reqwest::Client`. Cheap to clone.
#[derive(Clone)]
pub struct Prober {
    client: Client,
    max_body_bytes: usize,
}

impl Prober {
    pub fn builder() -> ProberBuilder {
        ProberBuilder::new()
    }

    /// GET `url` and capture what the classifier needs.
    ///
    /// Never fails: connection errors, timeouts and body read errors end up
    /// in [`ProbeResult::error`].
    pub async fn probe(&self, url: &str) -> ProbeResult {
        debug!("Checking for: {}", url);

        match self.fetch(url).await {
            Ok(result) => {
                debug!("{} -> {}", url, result.status_code);
                result
            }
            Err(e) => {
                debug!("Error checking {}: {}", url, e);
                ProbeResult::with_error(url.to_string(), e.to_string())
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<ProbeResult> {
        let parsed = url::Url::parse(url).map_err(|e| ScanError::InvalidUrl(e.to_string()))?;

        let start = Instant::now();
        let mut response = self.client.get(parsed).send().await?;

        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let content_length = response.content_length();
        let final_url = Some(response.url().to_string()).filter(|u| u != url);

        let mut body = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = response.chunk().await? {
            let remaining = self.max_body_bytes - body.len();
            if chunk.len() > remaining {
                body.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }
        let response_time = start.elapsed();

        let mut result = ProbeResult::new(url.to_string());
        result.final_url = final_url;
        result.status_code = status_code;
        result.content_type = content_type;
        result.content_length = content_length;
        result.response_time = response_time;
        result.body = String::from_utf8_lossy(&body).into_owned();
        result.truncated = truncated;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    #[tokio::test]
    async fn test_probe_captures_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/.env"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("APP_KEY=base64:abc\nDB_PASSWORD=hunter2\n"),
            )
            .mount(&mock_server)
            .await;

        let prober = Prober::builder().build().unwrap();
        let result = prober.probe(&format!("{}/.env", mock_server.uri())).await;

        assert!(!result.is_error());
        assert_eq!(result.status_code, 200);
        assert_eq!(result.content_type.as_deref(), Some("text/plain"));
        assert!(result.body.contains("DB_PASSWORD=hunter2"));
        assert!(!result.truncated);
        assert!(result.final_url.is_none());
    }

    #[tokio::test]
    async fn test_probe_records_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let prober = Prober::builder().build().unwrap();
        let result = prober
            .probe(&format!("{}/config.php", mock_server.uri()))
            .await;

        assert_eq!(result.status_code, 404);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_probe_follows_redirects() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/old/.env"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("location", format!("{}/.env", mock_server.uri()).as_str()),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/.env"))
            .respond_with(ResponseTemplate::new(200).set_body_string("KEY=value"))
            .mount(&mock_server)
            .await;

        let prober = Prober::builder().build().unwrap();
        let result = prober
            .probe(&format!("{}/old/.env", mock_server.uri()))
            .await;

        assert_eq!(result.status_code, 200);
        assert_eq!(
            result.final_url,
            Some(format!("{}/.env", mock_server.uri()))
        );
    }

    #[tokio::test]
    async fn test_probe_without_redirects_keeps_3xx() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/.env"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/login"))
            .mount(&mock_server)
            .await;

        let prober = Prober::builder().with_max_redirects(0).build().unwrap();
        let result = prober.probe(&format!("{}/.env", mock_server.uri())).await;

        assert_eq!(result.status_code, 302);
    }

    #[tokio::test]
    async fn test_probe_sends_user_agent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(header("user-agent", "custom-agent/1.0"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let prober = Prober::builder()
            .with_user_agent("custom-agent/1.0")
            .build()
            .unwrap();
        let result = prober.probe(&format!("{}/x", mock_server.uri())).await;

        // wiremock answers 404 when no mock matches
        assert_eq!(result.status_code, 200);
    }

    #[tokio::test]
    async fn test_probe_truncates_large_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("A".repeat(4096)))
            .mount(&mock_server)
            .await;

        let prober = Prober::builder().with_max_body_bytes(100).build().unwrap();
        let result = prober.probe(&format!("{}/big", mock_server.uri())).await;

        assert_eq!(result.body.len(), 100);
        assert!(result.truncated);
    }

    #[tokio::test]
    async fn test_probe_unreachable_host() {
        // Port 9 (discard) on localhost is closed on test machines
        let prober = Prober::builder().with_timeout(1).build().unwrap();
        let result = prober.probe("http://127.0.0.1:9/.env").await;

        assert!(result.is_error());
        assert_eq!(result.status_code, 0);
    }

    #[tokio::test]
    async fn test_probe_invalid_url() {
        let prober = Prober::builder().build().unwrap();
        let result = prober.probe("not a url").await;

        assert!(result.is_error());
        assert!(result.error.unwrap().contains("Invalid URL"));
    }
}
