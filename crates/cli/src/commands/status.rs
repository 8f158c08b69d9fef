//! Status Command

use anyhow::Result;

use sitecheck_common::SiteConfig;
use sitecheck_harness::Target;

use crate::output::{print_error, print_success};

pub async fn execute(config: SiteConfig) -> Result<bool> {
    let target = Target::new(config.base_url.clone());

    match target.probe().await {
        Ok(status) if (200..400).contains(&status) => {
            print_success(&format!("site is responding (HTTP {}) at {}", status, config.base_url));
            Ok(true)
        }
        Ok(status) => {
            print_error(&format!("site returned HTTP {} at {}", status, config.base_url));
            Ok(false)
        }
        Err(e) => {
            print_error(&format!("site is not reachable at {}: {}", config.base_url, e));
            Ok(false)
        }
    }
}
