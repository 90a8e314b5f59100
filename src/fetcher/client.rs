use backon::Retryable;
use reqwest::{
    StatusCode,
    header::{CONNECTION, HeaderMap, HeaderValue},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use recount_schema::ListingResponse;

use super::pacer::{Pacer, PauseReason, TokioPacer};
use super::policy::{RetryPolicy, UPSTREAM_BODY_PREVIEW_CHARS};
use super::{FetchResult, StatsSource};
use crate::config::FetchConfig;
use crate::content::ContentKind;
use crate::error::{FetchError, IsRetryable, RecountError};
use crate::utils::logging::with_pretty_json_debug;
use async_trait::async_trait;

/// Builds the HTTP client used for `.json` lookups.
pub fn build_http_client(cfg: &FetchConfig) -> Result<reqwest::Client, RecountError> {
    let mut headers = HeaderMap::new();
    let mut builder = reqwest::Client::builder()
        .user_agent(cfg.user_agent.as_str())
        .connect_timeout(Duration::from_secs(cfg.timeout_secs))
        .timeout(Duration::from_secs(cfg.timeout_secs));

    if let Some(proxy_url) = cfg.proxy.clone() {
        let proxy = reqwest::Proxy::all(proxy_url.as_str())?;
        builder = builder.proxy(proxy);
    }

    if !cfg.enable_multiplexing {
        headers.insert(CONNECTION, HeaderValue::from_static("close"));
        builder = builder.http1_only().pool_max_idle_per_host(0);
    }

    Ok(builder.default_headers(headers).build()?)
}

/// Turns an export permalink into its `.json` endpoint.
///
/// Trims whitespace and one trailing `/`. Site-relative permalinks are
/// joined onto `base_url`.
pub fn item_json_url(permalink: &str, base_url: &Url) -> Result<Url, url::ParseError> {
    let trimmed = permalink.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    let with_suffix = format!("{trimmed}.json");

    if with_suffix.starts_with('/') {
        base_url.join(&with_suffix)
    } else {
        Url::parse(&with_suffix)
    }
}

/// Reads the counts for `kind` out of a listing response.
pub fn extract_counts(
    listing: &ListingResponse,
    kind: ContentKind,
) -> Result<FetchResult, FetchError> {
    let index = kind.listing_index();
    let item = listing.first_thing(index).ok_or_else(|| {
        FetchError::Malformed(format!("no item at [{index}].data.children[0].data"))
    })?;

    let score = non_negative(item.ups);
    let reply_count = match kind {
        ContentKind::Post => non_negative(item.num_comments),
        // The comment listing does not carry a reply count at this depth.
        ContentKind::Comment => 0,
    };
    Ok(FetchResult { score, reply_count })
}

fn non_negative(value: Option<i64>) -> u64 {
    value.and_then(|v| u64::try_from(v).ok()).unwrap_or(0)
}

/// Looks up live counts for export rows, one request at a time.
pub struct Fetcher<P = TokioPacer> {
    client: reqwest::Client,
    policy: RetryPolicy,
    base_url: Url,
    pacer: Arc<P>,
}

impl Fetcher<TokioPacer> {
    pub fn from_config(cfg: &FetchConfig) -> Result<Self, RecountError> {
        let client = build_http_client(cfg)?;
        Ok(Self::new(
            client,
            RetryPolicy::from_config(cfg),
            cfg.base_url.clone(),
            TokioPacer,
        ))
    }
}

impl<P: Pacer + 'static> Fetcher<P> {
    pub fn new(client: reqwest::Client, policy: RetryPolicy, base_url: Url, pacer: P) -> Self {
        Self {
            client,
            policy,
            base_url,
            pacer: Arc::new(pacer),
        }
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Fetches `(score, reply_count)` for one permalink.
    ///
    /// Never fails: invalid URLs, malformed bodies and exhausted attempts all
    /// come back as zero counts. Every failed attempt that could have been
    /// retried owes a cooldown, the last one included.
    pub async fn fetch(&self, permalink: &str, kind: ContentKind) -> FetchResult {
        match self.fetch_with_retry(permalink, kind).await {
            Ok(result) => result,
            Err(err) if err.is_retryable() => {
                let delay = self.policy.delay_for(&err);
                warn!(
                    permalink,
                    %kind,
                    attempts = self.policy.max_attempts,
                    error = %err,
                    ?delay,
                    "Attempts exhausted; counting as zero"
                );
                self.pacer.pause(PauseReason::Cooldown, delay).await;
                FetchResult::default()
            }
            Err(err) => {
                warn!(permalink, %kind, error = %err, "Unusable response; counting as zero");
                FetchResult::default()
            }
        }
    }

    async fn fetch_with_retry(
        &self,
        permalink: &str,
        kind: ContentKind,
    ) -> Result<FetchResult, FetchError> {
        let url = &item_json_url(permalink, &self.base_url)?;
        let pacer = Arc::clone(&self.pacer);

        let attempt = move || async move {
            self.pacer
                .pause(PauseReason::Politeness, self.policy.politeness_delay())
                .await;
            self.try_fetch(url, kind).await
        };

        let result = attempt
            .retry(self.policy.backoff())
            .sleep(move |delay: Duration| {
                let pacer = Arc::clone(&pacer);
                async move { pacer.pause(PauseReason::Cooldown, delay).await }
            })
            .when(|err: &FetchError| err.is_retryable())
            .adjust(|err: &FetchError, delay: Option<Duration>| {
                delay.map(|_| self.policy.delay_for(err))
            })
            .notify(|err: &FetchError, delay: Duration| {
                if matches!(err, FetchError::RateLimited(_)) {
                    warn!(url = %url, ?delay, "Rate limited; pausing before retry");
                } else {
                    debug!(
                        url = %url,
                        status = ?err.status(),
                        error = %err,
                        ?delay,
                        "Attempt failed; retrying"
                    );
                }
            })
            .await?;

        debug!(
            url = %url,
            %kind,
            score = result.score,
            reply_count = result.reply_count,
            "Fetched live counts"
        );
        Ok(result)
    }

    async fn try_fetch(&self, url: &Url, kind: ContentKind) -> Result<FetchResult, FetchError> {
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited(status));
        }
        if status != StatusCode::OK {
            return Err(FetchError::UpstreamStatus(status));
        }

        let bytes = resp.bytes().await?;
        let listing: ListingResponse = serde_json::from_slice(&bytes).map_err(|e| {
            let raw_body = String::from_utf8_lossy(&bytes);
            debug!(
                url = %url,
                body = %format!("{:.len$}", raw_body, len = UPSTREAM_BODY_PREVIEW_CHARS),
                "Response body is not a listing array"
            );
            FetchError::Malformed(e.to_string())
        })?;

        extract_counts(&listing, kind).inspect_err(|_| {
            with_pretty_json_debug(&listing, |pretty| {
                debug!(url = %url, body = %pretty, "Listing lacks the expected item");
            });
        })
    }
}

#[async_trait]
impl<P: Pacer + 'static> StatsSource for Fetcher<P> {
    async fn fetch_counts(&self, permalink: &str, kind: ContentKind) -> FetchResult {
        self.fetch(permalink, kind).await
    }
}
