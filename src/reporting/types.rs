use serde::{Deserialize, Serialize};

/// Body of a `reports:batchGet` call; the API accepts up to five report requests
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetReportsRequest {
    pub report_requests: Vec<ReportRequest>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub view_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_ranges: Vec<DateRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
}

/// Inclusive date window, either `YYYY-MM-DD` or relative (`today`, `7daysAgo`)
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetReportsResponse {
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub query_cost: Option<i64>,
    #[serde(default)]
    pub resource_quotas_remaining: Option<ResourceQuotasRemaining>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuotasRemaining {
    #[serde(default)]
    pub daily_quota_tokens_remaining: Option<i64>,
    #[serde(default)]
    pub hourly_quota_tokens_remaining: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub column_header: ColumnHeader,
    #[serde(default)]
    pub data: ReportData,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metric_header: MetricHeader,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricHeader {
    #[serde(default)]
    pub metric_header_entries: Vec<MetricHeaderEntry>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricHeaderEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub metric_type: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    #[serde(default)]
    pub rows: Vec<ReportRow>,
    #[serde(default)]
    pub totals: Vec<DateRangeValues>,
    #[serde(default)]
    pub minimums: Vec<DateRangeValues>,
    #[serde(default)]
    pub maximums: Vec<DateRangeValues>,
    #[serde(default)]
    pub row_count: Option<i64>,
    #[serde(default)]
    pub is_data_golden: Option<bool>,
    #[serde(default)]
    pub data_last_refreshed: Option<String>,
    // int64 values arrive as JSON strings
    #[serde(default)]
    pub samples_read_counts: Vec<String>,
    #[serde(default)]
    pub sampling_space_sizes: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<DateRangeValues>,
}

/// Metric values for one date range, aligned with the metric header entries
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeValues {
    #[serde(default)]
    pub values: Vec<String>,
}

/// Error envelope returned by Google APIs on failure
#[derive(Deserialize, Debug, Clone)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request = GetReportsRequest {
            report_requests: vec![ReportRequest {
                view_id: "12345".to_string(),
                date_ranges: vec![DateRange {
                    start_date: "7daysAgo".to_string(),
                    end_date: "today".to_string(),
                }],
                metrics: vec![Metric {
                    expression: "ga:sessions".to_string(),
                    alias: None,
                }],
                dimensions: vec![Dimension {
                    name: "ga:country".to_string(),
                }],
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "reportRequests": [{
                    "viewId": "12345",
                    "dateRanges": [{"startDate": "7daysAgo", "endDate": "today"}],
                    "metrics": [{"expression": "ga:sessions"}],
                    "dimensions": [{"name": "ga:country"}]
                }]
            })
        );
    }

    #[test]
    fn test_response_with_all_fields() {
        let body = r#"{
            "reports": [{
                "columnHeader": {
                    "dimensions": ["ga:country"],
                    "metricHeader": {"metricHeaderEntries": [{"name": "ga:sessions", "type": "INTEGER"}]}
                },
                "data": {
                    "rows": [{"dimensions": ["Norway"], "metrics": [{"values": ["17"]}]}],
                    "totals": [{"values": ["17"]}],
                    "minimums": [{"values": ["17"]}],
                    "maximums": [{"values": ["17"]}],
                    "rowCount": 1,
                    "isDataGolden": true,
                    "samplesReadCounts": ["499630"],
                    "samplingSpaceSizes": ["15328013"]
                },
                "nextPageToken": "1"
            }],
            "queryCost": 1,
            "resourceQuotasRemaining": {"dailyQuotaTokensRemaining": 49999}
        }"#;

        let response: GetReportsResponse = serde_json::from_str(body).unwrap();
        let report = &response.reports[0];

        assert_eq!(report.column_header.dimensions, vec!["ga:country"]);
        assert_eq!(
            report.column_header.metric_header.metric_header_entries[0]
                .metric_type
                .as_deref(),
            Some("INTEGER")
        );
        assert_eq!(report.data.rows[0].metrics[0].values, vec!["17"]);
        assert_eq!(report.data.row_count, Some(1));
        assert_eq!(report.data.is_data_golden, Some(true));
        assert_eq!(report.next_page_token.as_deref(), Some("1"));
        assert_eq!(response.query_cost, Some(1));
    }

    #[test]
    fn test_response_with_missing_data() {
        let response: GetReportsResponse =
            serde_json::from_str(r#"{"reports": [{"columnHeader": {}}]}"#).unwrap();

        assert_eq!(response.reports.len(), 1);
        assert!(response.reports[0].data.rows.is_empty());
        assert!(response.reports[0].column_header.dimensions.is_empty());
    }
}
