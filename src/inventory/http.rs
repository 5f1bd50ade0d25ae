// Provider client over a JSON gateway that fronts the cloud management API.
//
//   GET {endpoint}/v1/db-instances?region=..[&instance_id=..]   -> {"DBInstances": [...]}
//   GET {endpoint}/v1/metric-data?region=..&namespace=..&...     -> {"MetricDataResults": [...]}
//   GET {endpoint}/v1/events?region=..&source_identifier=..&...  -> {"Events": [...]}
//
// The account profile travels in the X-Provider-Profile header.

use super::records::{
    DbInstanceRecord, DescribeDbInstancesResponse, DescribeEventsResponse, EventRecord,
    GetMetricDataResponse, MetricDataResult,
};
use super::{MetricQuery, ResourceProvider};
use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::models::ProviderTarget;
use crate::version::{NAME, VERSION};
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

pub const PROFILE_HEADER: &str = "X-Provider-Profile";

/// Longest slice of an error body carried into the error message.
const MAX_ERROR_BODY: usize = 200;

pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpProvider {
    pub fn new(base_url: &str, timeout: Duration, api_token: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", NAME, VERSION))
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("provider HTTP client: {}", e))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> anyhow::Result<Self> {
        Self::new(
            &config.endpoint,
            Duration::from_secs(config.timeout_secs),
            config.api_token.clone(),
        )
    }

    fn request(&self, target: &ProviderTarget, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .get(format!("{}/v1/{}", self.base_url, path))
            .header(PROFILE_HEADER, &target.profile)
            .query(&[("region", target.region.as_str())]);
        if let Some(ref token) = self.api_token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<T, FetchError> {
        let response = req.send().await.map_err(|e| transport_error(e, context))?;
        decode(response, context).await
    }

    /// Like `send_json`, but 404 means the named resource does not exist: `None`.
    async fn send_json_optional<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<Option<T>, FetchError> {
        let response = req.send().await.map_err(|e| transport_error(e, context))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response, context).await.map(Some)
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body, context));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| transport_error(e, context))
}

#[async_trait]
impl ResourceProvider for HttpProvider {
    #[instrument(skip(self, target), fields(provider_target = %target, repo = "provider", operation = "describe_db_instances"))]
    async fn describe_db_instances(
        &self,
        target: &ProviderTarget,
        instance_id: Option<&str>,
    ) -> Result<Vec<DbInstanceRecord>, FetchError> {
        let req = self.request(target, "db-instances");
        let body: DescribeDbInstancesResponse = match instance_id {
            Some(id) => {
                let req = req.query(&[("instance_id", id)]);
                match self.send_json_optional(req, "describe_db_instances").await? {
                    Some(body) => body,
                    None => return Ok(Vec::new()),
                }
            }
            None => self.send_json(req, "describe_db_instances").await?,
        };
        Ok(body.db_instances)
    }

    #[instrument(skip(self, target), fields(provider_target = %target, repo = "provider", operation = "get_metric_data"))]
    async fn get_metric_data(
        &self,
        target: &ProviderTarget,
        query: &MetricQuery,
    ) -> Result<Vec<MetricDataResult>, FetchError> {
        let period = query.period_secs.to_string();
        let start = query.start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end = query.end.to_rfc3339_opts(SecondsFormat::Secs, true);
        let req = self.request(target, "metric-data").query(&[
            ("namespace", query.namespace.as_str()),
            ("metric_name", query.metric_name.as_str()),
            ("dimension_name", query.dimension_name.as_str()),
            ("dimension_value", query.dimension_value.as_str()),
            ("period", period.as_str()),
            ("stat", query.statistic.as_str()),
            ("start_time", start.as_str()),
            ("end_time", end.as_str()),
        ]);
        let body: GetMetricDataResponse = self.send_json(req, "get_metric_data").await?;
        Ok(body.metric_data_results)
    }

    #[instrument(skip(self, target), fields(provider_target = %target, repo = "provider", operation = "describe_events"))]
    async fn describe_events(
        &self,
        target: &ProviderTarget,
        instance_id: &str,
        duration_minutes: i64,
    ) -> Result<Vec<EventRecord>, FetchError> {
        let duration = duration_minutes.to_string();
        let req = self.request(target, "events").query(&[
            ("source_type", "db-instance"),
            ("source_identifier", instance_id),
            ("duration", duration.as_str()),
        ]);
        let body: DescribeEventsResponse = self.send_json(req, "describe_events").await?;
        Ok(body.events)
    }
}

/// Map a non-success HTTP status onto a fetch error kind.
pub(crate) fn status_error(status: StatusCode, body: &str, context: &str) -> FetchError {
    let detail = format!("{} returned {}: {}", context, status, truncate(body.trim()));
    match status {
        StatusCode::UNAUTHORIZED => FetchError::Authentication(detail),
        StatusCode::FORBIDDEN => FetchError::AccessDenied(detail),
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => FetchError::Transient(detail),
        s if s.is_server_error() => FetchError::Transient(detail),
        _ => FetchError::AccessDenied(detail),
    }
}

fn transport_error(e: reqwest::Error, context: &str) -> FetchError {
    if e.is_decode() {
        FetchError::InvalidResponse(format!("{}: {}", context, e))
    } else {
        FetchError::Transient(format!("{}: {}", context, e))
    }
}

fn truncate(s: &str) -> &str {
    match s.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
