//! Aggregate statistics loading and reduction.
//!
//! Sends the report's aggregation list (page size 1) and folds the
//! aggregate row set into a normalized [`StatsData`]. Zero rows is a
//! success, not an error; a metric absent from every row stays absent
//! instead of becoming zero.

use std::sync::Arc;
use std::time::Duration;

use contracts::reports::{
    AggregationSpec, FilterGroupSpec, FilterPayload, QueryFilterSet, QueryRequest, ReportType, Row,
    StatsData,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::catalog;
use crate::service::{FetchError, QueryService};
use crate::slot::Slot;

/// Cancelable aggregate fetcher; runs on its own slot, independent of
/// the table loader.
pub struct StatsAggregator<S> {
    service: Arc<S>,
    slot: Slot,
    timeout: Option<Duration>,
}

impl<S: QueryService> StatsAggregator<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            slot: Slot::new(),
            timeout: None,
        }
    }

    /// Opt into a hard per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fetch and reduce the aggregates for one report, superseding any
    /// in-flight stats fetch on this aggregator's slot.
    pub async fn fetch_stats(
        &self,
        report_type: ReportType,
        filters: &FilterPayload,
    ) -> Result<StatsData, FetchError> {
        let token = self.slot.begin();
        fetch_stats_with_token(&*self.service, report_type, filters, &token, self.timeout).await
    }
}

/// Slot-independent fetch used both by [`StatsAggregator`] and by the
/// multi-report merger (which hands out child tokens of its own slot).
pub(crate) async fn fetch_stats_with_token<S: QueryService + ?Sized>(
    service: &S,
    report_type: ReportType,
    filters: &FilterPayload,
    token: &CancellationToken,
    timeout: Option<Duration>,
) -> Result<StatsData, FetchError> {
    let request = build_stats_request(report_type, filters);
    debug!(report = %report_type, "dispatching stats query");

    let outcome = crate::service::run_cancellable(service, request, token, timeout).await;
    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            if !err.is_cancelled() {
                warn!(report = %report_type, error = %err, "stats query failed");
            }
            return Err(err);
        }
    };

    if token.is_cancelled() {
        debug!(report = %report_type, "stats query superseded, discarding result");
        return Err(FetchError::Cancelled);
    }

    Ok(reduce_aggregate_rows(report_type, &response.data))
}

/// Assemble the wire request for an aggregate query
fn build_stats_request(report_type: ReportType, filters: &FilterPayload) -> QueryRequest {
    let desc = catalog::descriptor(report_type);
    QueryRequest {
        table: desc.table.to_string(),
        filters: QueryFilterSet {
            selects: Vec::new(),
            aggregations: desc
                .aggregations
                .iter()
                .map(|a| AggregationSpec {
                    key: a.key.to_string(),
                    alias: a.alias.to_string(),
                    operation: a.op,
                })
                .collect(),
            filter_groups: filters.groups.iter().map(FilterGroupSpec::from).collect(),
            order: Vec::new(),
        },
        page: None,
        // the aggregate query returns one summary row (or none)
        page_size: 1,
    }
}

/// Null-safe reduction of the aggregate row set.
///
/// Some backends return a single aggregate row, others an array; each
/// recognized alias is summed across the rows it appears in. Derived
/// utilidad/margen are recomputed on the summed totals.
fn reduce_aggregate_rows(report_type: ReportType, rows: &[Row]) -> StatsData {
    let desc = catalog::descriptor(report_type);
    let mut stats = StatsData::default();
    for row in rows {
        for agg in desc.aggregations {
            if let Some(value) = numeric_value(row.get(agg.alias)) {
                stats.add(agg.alias, value);
            }
        }
    }
    stats.with_derived()
}

/// Aggregate cells arrive as numbers or numeric strings depending on the
/// backend; anything else does not contribute.
fn numeric_value(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::MockService;
    use contracts::reports::QueryResponse;
    use serde_json::json;
    use tokio::sync::Notify;

    fn aggregate_response(rows: Vec<Value>) -> QueryResponse {
        QueryResponse {
            data: rows
                .into_iter()
                .map(|v| v.as_object().cloned().unwrap())
                .collect(),
            page: None,
            total_records: None,
        }
    }

    #[tokio::test]
    async fn test_empty_response_is_empty_stats_not_error() {
        let service = Arc::new(MockService::new());
        service.push_ready(Ok(aggregate_response(vec![])));
        let aggregator = StatsAggregator::new(service);

        let stats = aggregator
            .fetch_stats(ReportType::Ventas, &FilterPayload::default())
            .await
            .unwrap();
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn test_single_row_reduction_with_derived() {
        let service = Arc::new(MockService::new());
        service.push_ready(Ok(aggregate_response(vec![json!({
            "totalVentas": 100.0,
            "totalCosto": 40.0,
            "totalArticulos": 12,
        })])));
        let aggregator = StatsAggregator::new(service.clone());

        let stats = aggregator
            .fetch_stats(ReportType::Ventas, &FilterPayload::default())
            .await
            .unwrap();
        assert_eq!(stats.total_ventas, Some(100.0));
        assert_eq!(stats.total_costo, Some(40.0));
        assert_eq!(stats.total_articulos, Some(12.0));
        assert_eq!(stats.utilidad, Some(60.0));
        assert_eq!(stats.margen, Some(60.0));

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests[0].page_size, 1);
        assert_eq!(requests[0].page, None);
        assert!(requests[0].filters.selects.is_empty());
        assert_eq!(requests[0].filters.aggregations.len(), 4);
    }

    #[tokio::test]
    async fn test_multi_row_summation_is_null_safe() {
        let service = Arc::new(MockService::new());
        service.push_ready(Ok(aggregate_response(vec![
            json!({ "totalVentas": 100.0 }),
            json!({ "totalVentas": 50.0, "totalCosto": 30.0 }),
            json!({ "totalClientes": null }),
        ])));
        let aggregator = StatsAggregator::new(service);

        let stats = aggregator
            .fetch_stats(ReportType::Ventas, &FilterPayload::default())
            .await
            .unwrap();
        assert_eq!(stats.total_ventas, Some(150.0));
        assert_eq!(stats.total_costo, Some(30.0));
        // absent from every row: absent in the output, not zero
        assert_eq!(stats.total_clientes, None);
    }

    #[tokio::test]
    async fn test_numeric_strings_are_accepted() {
        let service = Arc::new(MockService::new());
        service.push_ready(Ok(aggregate_response(vec![json!({
            "totalMermas": "123.45",
            "totalArticulos": "no-number",
        })])));
        let aggregator = StatsAggregator::new(service);

        let stats = aggregator
            .fetch_stats(ReportType::Mermas, &FilterPayload::default())
            .await
            .unwrap();
        assert_eq!(stats.total_mermas, Some(123.45));
        assert_eq!(stats.total_articulos, None);
    }

    #[tokio::test]
    async fn test_unrecognized_fields_are_ignored() {
        let service = Arc::new(MockService::new());
        service.push_ready(Ok(aggregate_response(vec![json!({
            "totalVentas": 10.0,
            "algoInesperado": 99.0,
        })])));
        let aggregator = StatsAggregator::new(service);

        let stats = aggregator
            .fetch_stats(ReportType::Ventas, &FilterPayload::default())
            .await
            .unwrap();
        assert_eq!(stats.total_ventas, Some(10.0));
        assert_eq!(stats.get("algoInesperado"), None);
    }

    #[tokio::test]
    async fn test_new_fetch_supersedes_in_flight_one() {
        let service = Arc::new(MockService::new());
        let gate = Arc::new(Notify::new());
        service.push_gated(
            gate.clone(),
            Ok(aggregate_response(vec![json!({ "totalVentas": 1.0 })])),
        );
        service.push_ready(Ok(aggregate_response(vec![json!({ "totalVentas": 2.0 })])));

        let aggregator = Arc::new(StatsAggregator::new(service.clone()));
        let stale = tokio::spawn({
            let aggregator = aggregator.clone();
            async move {
                aggregator
                    .fetch_stats(ReportType::Ventas, &FilterPayload::default())
                    .await
            }
        });
        while service.dispatched() < 1 {
            tokio::task::yield_now().await;
        }

        let fresh = aggregator
            .fetch_stats(ReportType::Ventas, &FilterPayload::default())
            .await
            .unwrap();
        assert_eq!(fresh.total_ventas, Some(2.0));

        gate.notify_one();
        assert_eq!(stale.await.unwrap(), Err(FetchError::Cancelled));
    }
}
