//! Consolidated statistics across several report types.
//!
//! Fans out one aggregate fetch per underlying report concurrently and
//! folds the results into a single summary. All-or-nothing: one failed
//! fetch fails the merge, because a partially summed consolidated total
//! would be misleadingly low.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use contracts::reports::{fields, FilterPayload, ReportType, StatsData};
use futures::future::try_join_all;
use tracing::debug;

use crate::service::{FetchError, QueryService};
use crate::slot::Slot;
use crate::stats::fetch_stats_with_token;

/// Knobs of the consolidation fold
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Keep source totals that summed to exactly zero.
    ///
    /// The inherited display behavior treats a computed zero as "no
    /// meaningful data" and drops the field, which makes a true zero
    /// total indistinguishable from absence. Off by default for
    /// behavioral parity.
    pub keep_zero_totals: bool,
}

/// Concurrent per-report stats fetcher with a consolidation fold
pub struct MultiReportMerger<S> {
    service: Arc<S>,
    slot: Slot,
    options: MergeOptions,
    timeout: Option<Duration>,
}

impl<S: QueryService> MultiReportMerger<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            slot: Slot::new(),
            options: MergeOptions::default(),
            timeout: None,
        }
    }

    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Opt into a hard per-request timeout for the underlying fetches
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fetch stats for every report type concurrently and fold them into
    /// one consolidated summary. Starting a new merge supersedes the
    /// previous one as a whole (the per-type fetches run under child
    /// tokens of the merge's own token).
    pub async fn merge_across(
        &self,
        report_types: &[ReportType],
        filters_per_type: &HashMap<ReportType, FilterPayload>,
    ) -> Result<StatsData, FetchError> {
        let token = self.slot.begin();
        let no_filters = FilterPayload::default();

        debug!(reports = report_types.len(), "dispatching consolidated stats");
        let fetches: Vec<_> = report_types
            .iter()
            .map(|report_type| {
                let child = token.child_token();
                let filters = filters_per_type.get(report_type).unwrap_or(&no_filters);
                let service = Arc::clone(&self.service);
                let timeout = self.timeout;
                let report_type = *report_type;
                async move {
                    fetch_stats_with_token(&*service, report_type, filters, &child, timeout).await
                }
            })
            .collect();

        let sources = try_join_all(fetches).await?;
        if token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        Ok(consolidate(&sources, &self.options))
    }
}

/// Fold per-report summaries into one.
///
/// Source fields sum null-safely across sources (absent contributions
/// are skipped, never coerced to zero); utilidad/margen are recomputed
/// on the combined totals since margins are not additive; finally,
/// unless configured otherwise, source totals that summed to exactly
/// zero are dropped.
pub fn consolidate(sources: &[StatsData], options: &MergeOptions) -> StatsData {
    let mut merged = StatsData::default();
    for field in fields::SOURCE {
        for source in sources {
            if let Some(value) = source.get(field) {
                merged.add(field, value);
            }
        }
    }

    let mut merged = merged.with_derived();

    if !options.keep_zero_totals {
        for field in fields::SOURCE {
            if merged.get(field) == Some(0.0) {
                merged.set(field, None);
            }
        }
    }
    merged
}
