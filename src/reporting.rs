use crate::{
    error::{Error, Result},
    reporting::types::{
        ApiErrorResponse, DateRange, Dimension, GetReportsRequest, GetReportsResponse, Metric,
        ReportRequest,
    },
    timer::Timer,
    transport::Transport,
};
use reqwest::{
    Method, Request, StatusCode, Url,
    header::{ACCEPT, CONTENT_TYPE, HeaderValue},
};

pub mod types;

pub const DEFAULT_BASE_URL: &str = "https://analyticsreporting.googleapis.com/";

/// The query issued for every run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    pub start_date: String,
    pub end_date: String,
    pub metrics: Vec<String>,
    pub dimensions: Vec<String>,
}

impl ReportQuery {
    pub fn new(
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        metrics: &[&str],
        dimensions: &[&str],
    ) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            metrics: metrics.iter().map(|m| m.to_string()).collect(),
            dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Build the single report request for a view
    pub fn to_request(&self, view_id: &str) -> ReportRequest {
        ReportRequest {
            view_id: view_id.to_string(),
            date_ranges: vec![DateRange {
                start_date: self.start_date.clone(),
                end_date: self.end_date.clone(),
            }],
            metrics: self
                .metrics
                .iter()
                .map(|expression| Metric {
                    expression: expression.clone(),
                    alias: None,
                })
                .collect(),
            dimensions: self
                .dimensions
                .iter()
                .map(|name| Dimension { name: name.clone() })
                .collect(),
        }
    }
}

impl Default for ReportQuery {
    /// Sessions per country over the last week
    fn default() -> Self {
        Self::new("7daysAgo", "today", &["ga:sessions"], &["ga:country"])
    }
}

/// A decoded response together with the HTTP status it arrived with
#[derive(Debug, Clone)]
pub struct ReportsCall {
    pub status: StatusCode,
    pub response: GetReportsResponse,
}

/// Client for the Analytics Reporting API v4
pub struct ReportingService<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> ReportingService<T> {
    /// Create a new service on top of an authorized transport
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the service at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        self.base_url = base_url;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one report for a view, sent as a batch holding a single request
    pub async fn fetch_report(
        &self,
        view_id: &str,
        date_range_start: &str,
        date_range_end: &str,
        metric_expressions: &[&str],
        dimension_names: &[&str],
    ) -> Result<ReportsCall> {
        let query = ReportQuery::new(
            date_range_start,
            date_range_end,
            metric_expressions,
            dimension_names,
        );

        self.fetch_query(view_id, &query).await
    }

    /// Fetch one report described by `query`
    pub async fn fetch_query(&self, view_id: &str, query: &ReportQuery) -> Result<ReportsCall> {
        let request = GetReportsRequest {
            report_requests: vec![query.to_request(view_id)],
        };

        self.batch_get(&request).await
    }

    /// Call `reports:batchGet`
    #[tracing::instrument(skip_all, fields(reports = request.report_requests.len()))]
    pub async fn batch_get(&self, request: &GetReportsRequest) -> Result<ReportsCall> {
        let _timer = Timer::new("batch_get")
            .with_label("reports", request.report_requests.len().to_string());

        let endpoint = format!("{}v4/reports:batchGet", self.base_url);
        let url = Url::parse(&endpoint).map_err(|_| Error::InvalidUrl(endpoint.clone()))?;

        let mut http_request = Request::new(Method::POST, url);
        let headers = http_request.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        *http_request.body_mut() = Some(serde_json::to_vec(request)?.into());

        tracing::info!("Doing request to analytics reporting");

        let response = self.transport.execute(http_request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<ApiErrorResponse>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) => String::from_utf8_lossy(&body).trim().to_string(),
            };

            return Err(Error::Api { status, message });
        }

        let response: GetReportsResponse = serde_json::from_slice(&body)?;
        tracing::debug!(reports = response.reports.len(), "Decoded report response");

        Ok(ReportsCall { status, response })
    }
}
