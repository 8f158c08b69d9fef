//! Target site probing
//!
//! The site under test is an external process (a local dev server on
//! 3000/3001/4000 in practice). Sitecheck only waits for it to answer.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{HarnessError, HarnessResult};

const PROBE_INTERVAL: Duration = Duration::from_millis(100);
const PROBE_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Handle on the external site under test
pub struct Target {
    base_url: String,
}

impl Target {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Poll the base URL until it answers or the deadline expires.
    ///
    /// Connection refused while polling is expected (the server may still
    /// be starting) and is not logged as a warning.
    pub async fn wait_ready(&self, deadline: Duration) -> HarnessResult<()> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_REQUEST_TIMEOUT)
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < deadline {
            attempts += 1;

            match client.get(&self.base_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!("site is up at {}", self.base_url);
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("probe of {} returned {}", self.base_url, resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("waiting for site at {}...", self.base_url);
                    }
                    if !e.is_connect() {
                        warn!("probe error: {}", e);
                    }
                }
            }

            sleep(PROBE_INTERVAL).await;
        }

        Err(HarnessError::TargetUnreachable {
            url: self.base_url.clone(),
            attempts,
        })
    }

    /// Single probe, used by `sitecheck status`
    pub async fn probe(&self) -> HarnessResult<u16> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_REQUEST_TIMEOUT)
            .build()?;
        let resp = client.get(&self.base_url).send().await?;
        Ok(resp.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_target_errors_out() {
        // Port 9 (discard) is a safe nothing-listens-here address
        let target = Target::new("http://127.0.0.1:9");
        let err = target.wait_ready(Duration::from_millis(300)).await.unwrap_err();
        assert!(matches!(err, HarnessError::TargetUnreachable { .. }));
    }
}
