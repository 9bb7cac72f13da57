use crate::group::coordinator::PeerClient;

use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_millis(500);
const FETCH_ATTEMPTS: usize = 2;

/// HTTP client handle for a single remote peer.
///
/// `base_url` is the peer address plus the shared base path, e.g.
/// `http://127.0.0.1:8002/_geecache/`.
pub struct HttpPeer {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpPeer {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Full request URL for a group/key pair, with both segments escaped so
    /// keys containing `/` or spaces survive the round trip.
    pub fn request_url(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        )
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let mut delay_ms = 100u64;

        for attempt in 0..FETCH_ATTEMPTS {
            let response = self
                .http_client
                .get(url)
                .timeout(FETCH_TIMEOUT)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt + 1 == FETCH_ATTEMPTS {
                        return Err(anyhow::anyhow!(e));
                    }
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(400);
                }
            }
        }

        Err(anyhow::anyhow!("Retry attempts exhausted"))
    }
}

impl PeerClient for HttpPeer {
    fn fetch<'a>(
        &'a self,
        group: &'a str,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.request_url(group, key);
            let response = self.get_with_retry(&url).await?;

            if !response.status().is_success() {
                return Err(anyhow::anyhow!("peer returned {}", response.status()));
            }

            let body = response.bytes().await?;
            Ok(body.to_vec())
        })
    }
}
