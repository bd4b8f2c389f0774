use std::collections::BTreeMap;
use std::time::Duration;

use futures::future::join_all;

use mw_core::config::SourcesConfig;
use mw_core::{SourceHealthReport, SourceStatus};
use reqwest::StatusCode;
use tracing::{debug, warn};

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(15);

/// HEAD first; servers that refuse HEAD get a GET.
pub async fn validate_source(client: &reqwest::Client, url: &str) -> bool {
    let head = client.head(url).timeout(HEALTH_TIMEOUT).send().await;
    let status = match head {
        Ok(response) if needs_get_fallback(response.status()) => {
            match client.get(url).timeout(HEALTH_TIMEOUT).send().await {
                Ok(response) => response.status(),
                Err(e) => {
                    warn!(url, error = %e, "Validation failed");
                    return false;
                }
            }
        }
        Ok(response) => response.status(),
        Err(e) => {
            warn!(url, error = %e, "Validation failed");
            return false;
        }
    };
    debug!(url, status = status.as_u16(), "Source checked");
    is_healthy(status)
}

pub fn needs_get_fallback(status: StatusCode) -> bool {
    status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::FORBIDDEN
}

pub fn is_healthy(status: StatusCode) -> bool {
    status.as_u16() < 400
}

async fn check_all<'a>(
    client: &reqwest::Client,
    kind: &str,
    sources: impl Iterator<Item = (&'a str, &'a str)>,
) -> BTreeMap<String, SourceStatus> {
    let checks = sources.map(|(name, url)| async move {
        let healthy = validate_source(client, url).await;
        if !healthy {
            warn!("{} Source unhealthy: {} ({})", kind, name, url);
        }
        (
            name.to_string(),
            SourceStatus {
                url: url.to_string(),
                healthy,
            },
        )
    });
    join_all(checks).await.into_iter().collect()
}

/// Checks every configured RSS and scrape URL, concurrently within each
/// group.
pub async fn check_sources_health(client: &reqwest::Client, sources: &SourcesConfig) -> SourceHealthReport {
    let rss = sources.rss.iter().map(|f| (f.name.as_str(), f.url.as_str()));
    let scrape = sources.scrape.iter().map(|s| (s.name.as_str(), s.url.as_str()));
    SourceHealthReport {
        rss: check_all(client, "RSS", rss).await,
        scrape: check_all(client, "Scrape", scrape).await,
    }
}
