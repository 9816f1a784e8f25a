use crate::{reporting::types::GetReportsResponse, timer::Timer};
use std::fmt;

/// One line of report output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    Value { name: String, value: String },
    NoData,
}

impl ReportLine {
    fn value(name: &str, value: &str) -> Self {
        ReportLine::Value {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::Value { name, value } => write!(f, "{name}: {value}"),
            ReportLine::NoData => write!(f, "No data found for given view."),
        }
    }
}

/// Flatten a response into output lines
///
/// Values are paired with their headers by position. A row holding fewer
/// values than there are headers (or the other way round) only yields the
/// pairs both sides have.
pub fn report_lines(response: &GetReportsResponse) -> Vec<ReportLine> {
    let mut lines = Vec::new();

    for report in &response.reports {
        let dimension_headers = &report.column_header.dimensions;
        let metric_headers = &report.column_header.metric_header.metric_header_entries;
        let rows = &report.data.rows;

        if rows.is_empty() {
            lines.push(ReportLine::NoData);
            continue;
        }

        for row in rows {
            lines.extend(
                dimension_headers
                    .iter()
                    .zip(&row.dimensions)
                    .map(|(header, value)| ReportLine::value(header, value)),
            );

            // One set of values per date range
            for date_range in &row.metrics {
                lines.extend(
                    metric_headers
                        .iter()
                        .zip(&date_range.values)
                        .map(|(header, value)| ReportLine::value(&header.name, value)),
                );
            }
        }
    }

    lines
}

/// Log every line of the response
pub fn print_response(response: &GetReportsResponse, view_id: &str) -> Vec<ReportLine> {
    let _timer = Timer::new("print_response");
    tracing::info!("Printing response from analytics reporting");

    let lines = report_lines(response);

    for line in &lines {
        match line {
            ReportLine::NoData => tracing::info!(view_id, "{}", line),
            ReportLine::Value { .. } => tracing::info!("{}", line),
        }
    }

    tracing::info!("Completed printing response");
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::types::{
        ColumnHeader, DateRangeValues, MetricHeader, MetricHeaderEntry, Report, ReportData,
        ReportRow,
    };

    fn report(dimensions: &[&str], metrics: &[&str], rows: Vec<ReportRow>) -> Report {
        Report {
            column_header: ColumnHeader {
                dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
                metric_header: MetricHeader {
                    metric_header_entries: metrics
                        .iter()
                        .map(|m| MetricHeaderEntry {
                            name: m.to_string(),
                            metric_type: Some("INTEGER".to_string()),
                        })
                        .collect(),
                },
            },
            data: ReportData {
                rows,
                ..Default::default()
            },
            next_page_token: None,
        }
    }

    fn row(dimensions: &[&str], metrics: &[&[&str]]) -> ReportRow {
        ReportRow {
            dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
            metrics: metrics
                .iter()
                .map(|values| DateRangeValues {
                    values: values.iter().map(|v| v.to_string()).collect(),
                })
                .collect(),
        }
    }

    fn response(reports: Vec<Report>) -> GetReportsResponse {
        GetReportsResponse {
            reports,
            ..Default::default()
        }
    }

    fn rendered(lines: &[ReportLine]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_single_row() {
        let res = response(vec![report(
            &["country"],
            &["sessions"],
            vec![row(&["US"], &[&["42"]])],
        )]);

        assert_eq!(rendered(&report_lines(&res)), vec!["country: US", "sessions: 42"]);
    }

    #[test]
    fn test_short_row_is_truncated() {
        let res = response(vec![report(
            &["country", "city", "browser"],
            &[],
            vec![row(&["US", "Boston"], &[])],
        )]);

        assert_eq!(
            rendered(&report_lines(&res)),
            vec!["country: US", "city: Boston"]
        );
    }

    #[test]
    fn test_values_beyond_headers_are_dropped() {
        let res = response(vec![report(
            &["country"],
            &["sessions"],
            vec![row(&["US", "extra"], &[&["42", "7"]])],
        )]);

        assert_eq!(rendered(&report_lines(&res)), vec!["country: US", "sessions: 42"]);
    }

    #[test]
    fn test_no_rows() {
        let res = response(vec![report(&["country"], &["sessions"], vec![])]);

        assert_eq!(report_lines(&res), vec![ReportLine::NoData]);
    }

    #[test]
    fn test_every_date_range_is_printed() {
        let res = response(vec![report(
            &["country"],
            &["sessions", "users"],
            vec![
                row(&["US"], &[&["42", "30"], &["40"]]),
                row(&["NO"], &[&["5", "4"]]),
            ],
        )]);

        assert_eq!(
            rendered(&report_lines(&res)),
            vec![
                "country: US",
                "sessions: 42",
                "users: 30",
                "sessions: 40",
                "country: NO",
                "sessions: 5",
                "users: 4",
            ]
        );
    }

    #[test]
    fn test_multiple_reports() {
        let res = response(vec![
            report(&["country"], &["sessions"], vec![]),
            report(&["country"], &["sessions"], vec![row(&["SE"], &[&["3"]])]),
        ]);

        assert_eq!(
            rendered(&report_lines(&res)),
            vec!["No data found for given view.", "country: SE", "sessions: 3"]
        );
    }

    #[test]
    fn test_print_response_returns_logged_lines() {
        let res = response(vec![report(
            &["country"],
            &["sessions"],
            vec![row(&["US"], &[&["42"]])],
        )]);

        assert_eq!(print_response(&res, "12345"), report_lines(&res));
    }
}
