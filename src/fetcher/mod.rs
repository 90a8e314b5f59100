mod client;
pub mod pacer;
mod policy;

pub use client::{Fetcher, build_http_client, extract_counts, item_json_url};
pub use pacer::{Pacer, PauseReason, TokioPacer};
pub use policy::{RetryPolicy, UPSTREAM_BODY_PREVIEW_CHARS};

use async_trait::async_trait;

use crate::content::ContentKind;

/// Live counts for one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchResult {
    pub score: u64,
    pub reply_count: u64,
}

/// Anything that can resolve a permalink to live counts.
///
/// Implementations must not fail; unknown items report zero.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_counts(&self, permalink: &str, kind: ContentKind) -> FetchResult;
}
