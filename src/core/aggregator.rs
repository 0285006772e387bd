use crate::config::FeedSettings;
use crate::core::{
    flatten::flatten_pages,
    partition::partition,
    ranking::{rank_by_miss_distance, DataShapeError},
};
use crate::models::{DataShapePolicy, DateRange, FeedPage, SpaceObject, SpanLimits};
use crate::services::{FeedSource, NeoWsError};
use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 16;

/// Errors that fail a whole aggregation
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("NeoWs feed for {range} failed: {source}")]
    Upstream { range: DateRange, source: NeoWsError },

    #[error("Malformed NeoWs entry: {0}")]
    DataShape(#[from] DataShapeError),
}

/// Result of one aggregation
#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    /// Space objects sorted ascending by miss distance
    pub objects: Vec<SpaceObject>,
    /// Entries left out for missing or unparsable distance data
    pub dropped: usize,
    /// Range actually served
    pub effective: DateRange,
    /// Whether the requested range was cut to the maximum span
    pub truncated: bool,
    /// Number of upstream requests issued
    pub requests: usize,
}

/// Fan-out/merge/sort orchestrator
///
/// # Pipeline Stages
/// 1. Partition the range into upstream-sized sub-ranges
/// 2. Fetch every sub-range concurrently, failing fast on the first error
/// 3. Flatten all days of all pages into one list
/// 4. Sort by miss distance and project
#[derive(Clone)]
pub struct Aggregator {
    source: Arc<dyn FeedSource>,
    limits: SpanLimits,
    policy: DataShapePolicy,
    max_concurrent_requests: usize,
}

impl Aggregator {
    pub fn new(source: Arc<dyn FeedSource>, limits: SpanLimits, policy: DataShapePolicy) -> Self {
        Self {
            source,
            limits,
            policy,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }

    pub fn from_settings(source: Arc<dyn FeedSource>, settings: &FeedSettings) -> Self {
        Self::new(source, settings.span_limits(), settings.data_shape_policy)
            .with_max_concurrent_requests(settings.max_concurrent_requests)
    }

    /// Bound the number of upstream requests in flight at once
    pub fn with_max_concurrent_requests(mut self, max_concurrent_requests: usize) -> Self {
        self.max_concurrent_requests = max_concurrent_requests.max(1);
        self
    }

    /// Fetch, merge and rank every near-earth object in `range`
    ///
    /// Nothing is returned until every sub-range has been fetched. The first
    /// failed fetch fails the whole call and drops the fetches still in flight.
    pub async fn space_objects(&self, range: DateRange) -> Result<AggregateOutcome, AggregateError> {
        let partition = partition(range, self.limits);

        if partition.truncated {
            tracing::warn!(
                "Requested range {} exceeds {} days, serving {}",
                range,
                self.limits.max_total_span_days,
                partition.effective
            );
        }

        tracing::debug!("Partitioned {} into {:?}", range, partition.sub_ranges);

        let pages = self.fetch_all(&partition.sub_ranges).await?;
        let requests = pages.len();

        tracing::info!("All {} NeoWs responses received", requests);

        let entries = flatten_pages(pages);
        let total_entries = entries.len();
        let ranking = rank_by_miss_distance(entries, self.policy)?;

        if ranking.dropped > 0 {
            tracing::warn!(
                "Dropped {} of {} entries without usable miss distance",
                ranking.dropped,
                total_entries
            );
        }

        Ok(AggregateOutcome {
            objects: ranking.objects,
            dropped: ranking.dropped,
            effective: partition.effective,
            truncated: partition.truncated,
            requests,
        })
    }

    async fn fetch_all(&self, sub_ranges: &[DateRange]) -> Result<Vec<FeedPage>, AggregateError> {
        stream::iter(sub_ranges.iter().copied())
            .map(|range| async move {
                self.source
                    .fetch_feed(range)
                    .await
                    .map_err(|source| AggregateError::Upstream { range, source })
            })
            .buffered(self.max_concurrent_requests)
            .try_collect()
            .await
    }
}
