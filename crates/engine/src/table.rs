//! Paginated row loading for the active report.
//!
//! One loader owns one `table` cancellation slot: starting a new page
//! fetch supersedes the in-flight one, and a superseded fetch can never
//! commit its rows no matter when it settles.

use std::sync::Arc;
use std::time::Duration;

use contracts::reports::{
    FilterGroupSpec, FilterPayload, OrderSpec, QueryFilterSet, QueryRequest, ReportType, Row,
    SelectSpec, SortRule,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog;
use crate::service::{FetchError, QueryService};
use crate::slot::Slot;

/// Row fields that may carry a warehouse value, depending on the report
const WAREHOUSE_FIELDS: &[&str] = &["Almacen", "AlmacenVenta", "AlmacenCompra"];

/// One fetched page of report rows
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    /// Row page as returned by the service
    pub rows: Vec<Row>,
    /// Effective page; the server's value wins when it clamps the request
    pub page: u32,
    /// Total record count, or the server's estimate
    pub total_records: u64,
}

/// Cancelable paginated row fetcher
pub struct TableDataLoader<S> {
    service: Arc<S>,
    slot: Slot,
    timeout: Option<Duration>,
}

impl<S: QueryService> TableDataLoader<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            slot: Slot::new(),
            timeout: None,
        }
    }

    /// Opt into a hard per-request timeout. Off by default; a timeout is
    /// a service failure, not a cancellation.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fetch one page for the report, superseding any in-flight fetch on
    /// this loader's slot.
    pub async fn fetch_page(
        &self,
        report_type: ReportType,
        filters: &FilterPayload,
        sort_rules: &[SortRule],
        page: u32,
        page_size: u32,
    ) -> Result<TablePage, FetchError> {
        let token = self.slot.begin();
        let request = build_table_request(report_type, filters, sort_rules, page, page_size);
        debug!(report = %report_type, page, page_size, "dispatching table query");

        let outcome =
            crate::service::run_cancellable(&*self.service, request, &token, self.timeout).await;
        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                if !err.is_cancelled() {
                    warn!(report = %report_type, error = %err, "table query failed");
                }
                return Err(err);
            }
        };

        // superseded while the response was in flight: never commit
        if token.is_cancelled() {
            debug!(report = %report_type, "table query superseded, discarding result");
            return Err(FetchError::Cancelled);
        }

        let total_records = response
            .total_records
            .unwrap_or(response.data.len() as u64);
        Ok(TablePage {
            page: response.page.unwrap_or(page),
            total_records,
            rows: response.data,
        })
    }
}

/// Assemble the wire request for a row page
fn build_table_request(
    report_type: ReportType,
    filters: &FilterPayload,
    sort_rules: &[SortRule],
    page: u32,
    page_size: u32,
) -> QueryRequest {
    let desc = catalog::descriptor(report_type);
    QueryRequest {
        table: desc.table.to_string(),
        filters: QueryFilterSet {
            selects: desc
                .selects
                .iter()
                .map(|c| SelectSpec {
                    key: c.key.to_string(),
                    alias: c.alias.map(str::to_string),
                })
                .collect(),
            aggregations: Vec::new(),
            filter_groups: filters.groups.iter().map(FilterGroupSpec::from).collect(),
            order: sort_rules
                .iter()
                .map(|r| OrderSpec {
                    key: r.key.clone(),
                    direction: r.direction,
                })
                .collect(),
        },
        page: Some(page),
        page_size,
    }
}

/// Distinct warehouse values observed in the page, in first-seen order.
///
/// Page-local approximation: only warehouses visible in the current page
/// are reported, which is good enough to populate a filter dropdown but
/// not a source of global truth.
pub fn distinct_warehouses(rows: &[Row]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for row in rows {
        for field in WAREHOUSE_FIELDS {
            if let Some(Value::String(value)) = row.get(*field) {
                if !value.is_empty() && !seen.iter().any(|s| s == value) {
                    seen.push(value.clone());
                }
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::MockService;
    use contracts::reports::QueryResponse;
    use serde_json::json;
    use tokio::sync::Notify;

    fn row(pairs: &[(&str, &str)]) -> Row {
        let mut map = Row::new();
        for (key, value) in pairs {
            map.insert(key.to_string(), json!(value));
        }
        map
    }

    fn page_response(rows: Vec<Row>, page: Option<u32>, total: Option<u64>) -> QueryResponse {
        QueryResponse {
            data: rows,
            page,
            total_records: total,
        }
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let service = Arc::new(MockService::new());
        service.push_ready(Ok(page_response(
            vec![row(&[("Almacen", "CENTRAL")])],
            Some(1),
            Some(120),
        )));
        let loader = TableDataLoader::new(service.clone());

        let page = loader
            .fetch_page(ReportType::Ventas, &FilterPayload::default(), &[], 1, 50)
            .await
            .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_records, 120);
        assert_eq!(page.rows.len(), 1);

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].page, Some(1));
        assert_eq!(requests[0].page_size, 50);
        assert!(requests[0].filters.aggregations.is_empty());
        assert!(!requests[0].filters.selects.is_empty());
    }

    #[test]
    fn test_identical_state_yields_identical_request_bodies() {
        use chrono::{TimeZone, Utc};
        use contracts::reports::{DateRange, ReportViewState};

        let mut state = ReportViewState::new(ReportType::Ventas, "articulo");
        state.search_term = "Coca".to_string();
        state.search_applied = true;
        state.warehouse_filter = "CENTRAL".to_string();
        state.date_range = DateRange::new(
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()),
        );

        // each build assigns fresh session ids to its groups; none of
        // that may leak into the wire body
        let first =
            build_table_request(ReportType::Ventas, &crate::filters::build_filters(&state), &[], 1, 50);
        let second =
            build_table_request(ReportType::Ventas, &crate::filters::build_filters(&state), &[], 1, 50);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_server_page_is_authoritative() {
        let service = Arc::new(MockService::new());
        // requested page 99, server clamped to 3
        service.push_ready(Ok(page_response(vec![], Some(3), Some(150))));
        let loader = TableDataLoader::new(service);

        let page = loader
            .fetch_page(ReportType::Ventas, &FilterPayload::default(), &[], 99, 50)
            .await
            .unwrap();
        assert_eq!(page.page, 3);
    }

    #[tokio::test]
    async fn test_missing_totals_fall_back_to_page_length() {
        let service = Arc::new(MockService::new());
        service.push_ready(Ok(page_response(
            vec![row(&[("Folio", "A1")]), row(&[("Folio", "A2")])],
            None,
            None,
        )));
        let loader = TableDataLoader::new(service);

        let page = loader
            .fetch_page(ReportType::Ventas, &FilterPayload::default(), &[], 2, 50)
            .await
            .unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_records, 2);
    }

    #[tokio::test]
    async fn test_superseded_fetch_loses_even_when_it_settles_last() {
        let service = Arc::new(MockService::new());
        let gate = Arc::new(Notify::new());
        service.push_gated(
            gate.clone(),
            Ok(page_response(vec![row(&[("Folio", "STALE")])], Some(1), Some(1))),
        );
        service.push_ready(Ok(page_response(
            vec![row(&[("Folio", "FRESH")])],
            Some(1),
            Some(1),
        )));

        let loader = Arc::new(TableDataLoader::new(service.clone()));
        let stale = tokio::spawn({
            let loader = loader.clone();
            async move {
                loader
                    .fetch_page(ReportType::Ventas, &FilterPayload::default(), &[], 1, 50)
                    .await
            }
        });

        // wait until the first fetch is actually in flight
        while service.dispatched() < 1 {
            tokio::task::yield_now().await;
        }

        let fresh = loader
            .fetch_page(ReportType::Ventas, &FilterPayload::default(), &[], 1, 50)
            .await
            .unwrap();
        assert_eq!(fresh.rows[0]["Folio"], json!("FRESH"));

        // let the stale operation settle only now
        gate.notify_one();
        let stale = stale.await.unwrap();
        assert_eq!(stale, Err(FetchError::Cancelled));
    }

    #[tokio::test]
    async fn test_service_failure_surfaces_as_error() {
        let service = Arc::new(MockService::new());
        service.push_ready(Err(FetchError::service("HTTP 502")));
        let loader = TableDataLoader::new(service);

        let err = loader
            .fetch_page(ReportType::Compras, &FilterPayload::default(), &[], 1, 50)
            .await
            .unwrap_err();
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_distinct_warehouses_first_seen_order() {
        let rows = vec![
            row(&[("Almacen", "CENTRAL")]),
            row(&[("AlmacenVenta", "SUR"), ("AlmacenCompra", "CENTRAL")]),
            row(&[("Almacen", "")]),
            row(&[("Almacen", "NORTE"), ("AlmacenVenta", "SUR")]),
        ];
        assert_eq!(distinct_warehouses(&rows), vec!["CENTRAL", "SUR", "NORTE"]);
    }

    #[test]
    fn test_distinct_warehouses_ignores_non_strings() {
        let mut numeric = Row::new();
        numeric.insert("Almacen".to_string(), json!(7));
        assert!(distinct_warehouses(&[numeric]).is_empty());
    }
}
