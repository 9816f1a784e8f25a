use crate::{
    auth::{ANALYTICS_READONLY_SCOPE, AuthorizedTransport, JwtConfig},
    config::Config,
    error::{Error, Result},
    printer::{self, ReportLine},
    reporting::{ReportQuery, ReportingService},
    timer::Timer,
    transport::Transport,
};
use reqwest::StatusCode;

/// Runs the single report query for the configured view
pub struct Reporter<T> {
    config: Config,
    query: ReportQuery,
    service: ReportingService<AuthorizedTransport<T>>,
}

impl<T: Transport> Reporter<T> {
    /// Create an authorized reporting service from the configured key file
    ///
    /// Nothing is sent over `transport` until [`Reporter::run`] is called.
    pub fn new(config: Config, transport: T) -> Result<Self> {
        let _timer = Timer::new("make_report_service");

        let data = config.read_key_file()?;
        tracing::debug!(keyfile = %config.keyfile.display(), "Read key file");

        let jwt = JwtConfig::from_json(&data, &[ANALYTICS_READONLY_SCOPE])
            .inspect_err(|_| tracing::error!("Failed to create JWT config from JSON credentials"))?;
        tracing::debug!(email = %jwt.email, "Created JWT config");

        let service = ReportingService::new(jwt.client(transport));
        tracing::info!("Created Google Analytics Reporting Service object");

        Ok(Self {
            config,
            query: ReportQuery::default(),
            service,
        })
    }

    /// Replace the query sent for the view
    pub fn with_query(mut self, query: ReportQuery) -> Self {
        self.query = query;
        self
    }

    /// Send requests to a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.service = self.service.with_base_url(base_url);
        self
    }

    pub fn query(&self) -> &ReportQuery {
        &self.query
    }

    /// Fetch the report, check the status and print every row
    #[tracing::instrument(skip(self), fields(view_id = %self.config.view_id))]
    pub async fn run(&self) -> Result<Vec<ReportLine>> {
        let call = {
            let _timer = Timer::new("get_report").with_label("view_id", &self.config.view_id);
            self.service
                .fetch_query(&self.config.view_id, &self.query)
                .await?
        };

        if call.status != StatusCode::OK {
            tracing::error!(status = %call.status, "Did not get expected HTTP response code");
            return Err(Error::UnexpectedStatus(call.status));
        }

        tracing::info!("Got response from analytics reporting");

        Ok(printer::print_response(&call.response, &self.config.view_id))
    }
}
