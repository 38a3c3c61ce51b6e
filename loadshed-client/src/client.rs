//! Thin wrapper around the loadshedding endpoints.
//!
//! Every method is a single GET through [`HttpClient`]. `schedule` is the only one
//! that does real work on the response, and it is deliberately forgiving: one bad
//! stage never costs the caller the others.
use crate::clock::{Clock, SystemClock};
use crate::types::{Municipality, Province, SearchSuburb, SuburbResult};
use chrono::{DateTime, FixedOffset};
use loadshed_http::{HttpClient, HttpError, RequestOpts};
use loadshed_schedule::{CombinedError, Partial, Schedule, Stage};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://loadshedding.eskom.co.za/LoadShedding";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const SUBURB_PAGE_SIZE: u32 = 100;
const DEFAULT_MAX_SEARCH_RESULTS: u32 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("unexpected status response {body:?}: {reason}")]
    Status { body: String, reason: String },

    #[error("{} is not a valid stage", .0.value())]
    InvalidStage(Stage),

    #[error("only Stages 1 - 8 are valid for schedules")]
    StageOutOfRange(Stage),

    #[error("stage {}: {source}", .stage.value())]
    StageRequest { stage: Stage, source: HttpError },

    #[error("stage {}: {source}", .stage.value())]
    Schedule { stage: Stage, source: CombinedError },
}

/// Options for [`Client`].
///
/// ```
/// use loadshed_client::{Client, FixedClock};
/// use loadshed_schedule::sast;
/// use chrono::TimeZone;
/// use std::time::Duration;
///
/// let now = sast().with_ymd_and_hms(2021, 10, 27, 18, 0, 0).unwrap();
/// let client = Client::builder()
///     .timeout(Duration::from_secs(40))
///     .clock(FixedClock(now))
///     .build()
///     .unwrap();
/// assert_eq!(client.timeout(), Duration::from_secs(40));
/// assert_eq!(client.now(), now);
/// ```
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
    clock: Arc<dyn Clock>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            clock: Arc::new(SystemClock),
        }
    }
}

impl ClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Reference time used to infer years on schedule pages.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build(self) -> Result<Client, ClientError> {
        let mut http = HttpClient::new(&self.base_url)?.with_timeout(self.timeout);
        if let Some(agent) = self.user_agent {
            http = http.with_user_agent(agent);
        }
        Ok(Client {
            http,
            clock: self.clock,
        })
    }
}

#[derive(Clone)]
pub struct Client {
    http: HttpClient,
    clock: Arc<dyn Clock>,
}

impl Client {
    /// Client with default options (live endpoint, 30 s timeout, wall clock).
    pub fn new() -> Result<Self, ClientError> {
        ClientBuilder::default().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn timeout(&self) -> Duration {
        self.http.default_timeout
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    /// Current loadshedding stage. `Stage::UNKNOWN` and `Stage::NONE` both mean no
    /// loadshedding right now.
    pub async fn status(&self) -> Result<Stage, ClientError> {
        let body = self.http.get_text("GetStatus", RequestOpts::default()).await?;
        let code: i32 = body.trim().parse().map_err(|e: std::num::ParseIntError| {
            ClientError::Status {
                body: body.clone(),
                reason: e.to_string(),
            }
        })?;
        let stage = Stage::from_status_code(code).unwrap_or_else(|| {
            tracing::warn!(code, "loadshed.status.unmapped_code");
            Stage::UNKNOWN
        });
        tracing::debug!(code, %stage, "loadshed.status");
        Ok(stage)
    }

    /// Municipalities supplied directly in `province`.
    pub async fn municipalities(
        &self,
        province: Province,
    ) -> Result<Vec<Municipality>, ClientError> {
        let opts = RequestOpts {
            query: Some(vec![("Id", province.id().to_string().into())]),
            ..Default::default()
        };
        Ok(self.http.get_json("GetMunicipalities/", opts).await?)
    }

    /// One page (100 per page, 1-based; 0 is treated as 1) of suburbs in a
    /// municipality matching `search_term`.
    pub async fn suburbs(
        &self,
        municipality_id: &str,
        search_term: &str,
        page: u32,
    ) -> Result<SuburbResult, ClientError> {
        let page = page.max(1);
        let opts = RequestOpts {
            query: Some(vec![
                ("pageSize", SUBURB_PAGE_SIZE.to_string().into()),
                ("pageNum", page.to_string().into()),
                ("searchTerm", Cow::Borrowed(search_term)),
                ("id", Cow::Borrowed(municipality_id)),
            ]),
            ..Default::default()
        };
        Ok(self.http.get_json("GetSurburbData/", opts).await?)
    }

    /// Suburbs across all municipalities matching `search_term`, up to `max_results`
    /// (default 300).
    pub async fn search_suburbs(
        &self,
        search_term: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<SearchSuburb>, ClientError> {
        let max_results = max_results.unwrap_or(DEFAULT_MAX_SEARCH_RESULTS);
        let opts = RequestOpts {
            query: Some(vec![
                ("searchText", Cow::Borrowed(search_term)),
                ("maxResults", max_results.to_string().into()),
            ]),
            ..Default::default()
        };
        Ok(self.http.get_json("FindSuburbs", opts).await?)
    }

    /// Outage schedule for `suburb_id` at each requested stage.
    ///
    /// Stages are fetched one after another. A stage that is invalid, cannot be
    /// fetched, or whose page does not parse cleanly is left out of the map and its
    /// failure recorded in the returned errors.
    pub async fn schedule(
        &self,
        suburb_id: &str,
        stages: &[Stage],
    ) -> Partial<BTreeMap<Stage, Schedule>, ClientError> {
        let mut schedules = BTreeMap::new();
        let mut errors = Vec::new();

        for &stage in stages {
            if !stage.is_valid() {
                errors.push(ClientError::InvalidStage(stage));
                continue;
            }
            if !stage.is_schedulable() {
                errors.push(ClientError::StageOutOfRange(stage));
                continue;
            }

            let path = format!("GetScheduleM/{suburb_id}/{}/_/1", stage.value());
            let html = match self.http.get_bytes(&path, RequestOpts::default()).await {
                Ok(html) => html,
                Err(source) => {
                    errors.push(ClientError::StageRequest { stage, source });
                    continue;
                }
            };

            match Schedule::from_html(&html, stage, &self.clock.now()) {
                Ok(schedule) => {
                    tracing::debug!(
                        suburb_id,
                        %stage,
                        windows = schedule.times.len(),
                        "loadshed.schedule.stage"
                    );
                    schedules.insert(stage, schedule);
                }
                Err(source) => {
                    tracing::warn!(suburb_id, %stage, error = %source, "loadshed.schedule.parse_failed");
                    errors.push(ClientError::Schedule { stage, source });
                }
            }
        }

        Partial::new(schedules, errors)
    }
}
