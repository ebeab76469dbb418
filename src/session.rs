// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search session
//!
//! Owns the query state for one ongoing search: key, query, endpoint,
//! parameter/header maps, the HTTP client, and the per-session counters.
//! Sessions are single-consumer: requests are issued one at a time, and
//! each is fully resolved, rate-limit retries included, before the next.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::{ParamMap, SessionConfig};
use crate::constants::{Endpoint, RATE_LIMIT_ATTEMPTS, URL_LENGTH_WARNING};
use crate::error::SearchError;
use crate::preflight;
use crate::query::{build_query, predict_url, BuiltQuery};
use crate::types::Unpacked;
use crate::unpack::unpack;
use crate::validate::{check_status, StatusCheck};

/// Changes to apply to an existing session. At least one field must be set.
#[derive(Debug, Clone, Default)]
pub struct ResetRequest {
    /// Replace the subscription key.
    pub new_key: Option<String>,
    /// Replace the plaintext query.
    pub new_query: Option<String>,
    /// Switch to a different endpoint.
    pub new_endpoint: Option<Endpoint>,
    /// Replace the whole parameter map.
    pub new_params: Option<ParamMap>,
    /// Replace the whole header map.
    pub new_headers: Option<ParamMap>,
}

impl ResetRequest {
    fn is_empty(&self) -> bool {
        self.new_key.is_none()
            && self.new_query.is_none()
            && self.new_endpoint.is_none()
            && self.new_params.is_none()
            && self.new_headers.is_none()
    }
}

/// One ongoing query context against the Bing API.
pub struct BingSession {
    api_key: String,
    query: String,
    endpoint: Endpoint,
    params: ParamMap,
    headers: ParamMap,
    validate_params: bool,
    base_url_override: Option<String>,
    request_timeout_ms: u64,
    retry_backoff: Duration,
    pub(crate) page_ceiling: u32,
    client: Client,
    pub(crate) built: BuiltQuery,
    queries_run: u64,
    pub(crate) total_estimated_matches: u64,
    urls_predicted: Vec<String>,
    last_actual_url: Option<String>,
    url_comparisons: Vec<(String, String)>,
}

impl BingSession {
    /// Build a session. The query is encoded and the authentication header
    /// injected up front, so configuration errors surface here rather than
    /// on the first request.
    pub fn new(config: SessionConfig) -> Result<Self, SearchError> {
        let base_url = config
            .base_url_override
            .clone()
            .unwrap_or_else(|| config.endpoint.base_url().to_string());
        let built = build_query(
            &config.query,
            config.endpoint,
            &config.params,
            &config.headers,
            &config.api_key,
            false,
            &base_url,
        )?;
        if config.validate_params {
            preflight::check_params(&built.params, &built.headers)?;
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| SearchError::Config {
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        debug!(
            endpoint = config.endpoint.as_str(),
            predicted_url = %built.predicted_url,
            "search session initialized"
        );

        Ok(Self {
            api_key: config.api_key,
            query: config.query,
            endpoint: config.endpoint,
            params: config.params,
            headers: config.headers,
            validate_params: config.validate_params,
            base_url_override: config.base_url_override,
            request_timeout_ms: config.request_timeout_ms,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            page_ceiling: config.page_ceiling,
            client,
            urls_predicted: vec![built.predicted_url.clone()],
            built,
            queries_run: 0,
            total_estimated_matches: 0,
            last_actual_url: None,
            url_comparisons: Vec::new(),
        })
    }

    fn base_url(&self) -> String {
        self.base_url_override
            .clone()
            .unwrap_or_else(|| self.endpoint.base_url().to_string())
    }

    /// Issue exactly one GET request. Does not validate the status or
    /// retry; that happens in [`fetch_validated`](Self::fetch_validated).
    pub async fn send(&mut self) -> Result<Response, SearchError> {
        let url = format!("{}{}", self.base_url(), self.built.encoded_query);
        let mut request = self.client.get(&url).query(&self.built.params);
        for (name, value) in &self.built.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                error!("request timed out, aborting search");
                SearchError::Timeout {
                    timeout_ms: self.request_timeout_ms,
                }
            } else {
                SearchError::Transport {
                    message: e.to_string(),
                }
            }
        })?;

        let actual_url = response.url().to_string();
        if actual_url.len() > URL_LENGTH_WARNING {
            warn!(
                length = actual_url.len(),
                "query URL too long, Bing can silently truncate it; keep URLs under 1200 chars"
            );
        }
        self.url_comparisons
            .push((self.built.predicted_url.clone(), actual_url.clone()));
        self.last_actual_url = Some(actual_url);
        self.queries_run += 1;
        Ok(response)
    }

    /// Send, validate the status code, and recover from rate limiting with
    /// the fixed resend policy. Every non-recoverable status becomes a
    /// typed error here.
    pub async fn fetch_validated(&mut self) -> Result<Response, SearchError> {
        let response = self.send().await?;
        let status = response.status().as_u16();
        match check_status(status) {
            StatusCheck::Ok => Ok(response),
            StatusCheck::RateLimited => {
                info!(
                    attempts = RATE_LIMIT_ATTEMPTS,
                    "queries per second quota exceeded, resending"
                );
                let url = response.url().clone();
                self.retry_rate_limited(url).await
            }
            StatusCheck::BadRequest => Err(self.bad_request_error(response).await),
            StatusCheck::Known(description) => Err(SearchError::KnownHttp {
                status,
                description: description.to_string(),
            }),
            StatusCheck::Unknown => Err(SearchError::UnknownHttp {
                status,
                url: response.url().to_string(),
            }),
        }
    }

    /// Resend the same URL and headers after a fixed backoff, up to the
    /// attempt bound. A non-200, non-429 status aborts immediately.
    async fn retry_rate_limited(&mut self, url: Url) -> Result<Response, SearchError> {
        for attempt in 1..=RATE_LIMIT_ATTEMPTS {
            tokio::time::sleep(self.retry_backoff).await;
            debug!(attempt, "resending after rate limit");
            let mut request = self.client.get(url.clone());
            for (name, value) in &self.built.headers {
                request = request.header(name.as_str(), value.as_str());
            }
            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        timeout_ms: self.request_timeout_ms,
                    }
                } else {
                    SearchError::Transport {
                        message: e.to_string(),
                    }
                }
            })?;
            match response.status().as_u16() {
                200 => return Ok(response),
                429 => continue,
                status => return Err(SearchError::UnexpectedStatus { status }),
            }
        }
        Err(SearchError::RateLimitExhausted {
            attempts: RATE_LIMIT_ATTEMPTS,
        })
    }

    async fn bad_request_error(&self, response: Response) -> SearchError {
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let first_error = body.get("errors").and_then(|errors| errors.get(0));
        let field = |name: &str| {
            first_error
                .and_then(|entry| entry.get(name))
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string()
        };
        SearchError::BadRequest {
            parameter: field("parameter"),
            value: field("value"),
        }
    }

    /// One validated request, body parsed as JSON.
    pub async fn fetch_json(&mut self) -> Result<Value, SearchError> {
        let response = self.fetch_validated().await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::Unparseable {
                reason: format!("response body is not JSON: {}", e),
            })
    }

    /// One validated request, body returned as HTML text. Requires the
    /// `textFormat` parameter to be set to HTML.
    pub async fn fetch_html(&mut self) -> Result<String, SearchError> {
        let html_requested = self
            .built
            .params
            .get("textFormat")
            .map(|format| format.eq_ignore_ascii_case("HTML"))
            .unwrap_or(false);
        if !html_requested {
            return Err(SearchError::Config {
                reason: "attempting html retrieval without specifying HTML under the textFormat param"
                    .to_string(),
            });
        }
        let response = self.fetch_validated().await?;
        response
            .text()
            .await
            .map_err(|e| SearchError::Transport {
                message: e.to_string(),
            })
    }

    /// One validated request, unpacked into typed records. `Ok(None)`
    /// means Bing reported no results for a web search.
    pub async fn fetch_records(&mut self) -> Result<Option<Unpacked>, SearchError> {
        let filter = self.built.params.get("responseFilter").cloned();
        let body = self.fetch_json().await?;
        unpack(body, filter.as_deref(), &mut self.total_estimated_matches)
    }

    /// Apply a new query state to this session. Any accepted change zeroes
    /// the cached total-match estimate, since it belongs to the previous
    /// query. A request with nothing to change is an error.
    pub fn reset(&mut self, request: ResetRequest) -> Result<(), SearchError> {
        if request.is_empty() {
            return Err(SearchError::Validation {
                reason: "reset requires at least one change".to_string(),
            });
        }
        if let Some(new_key) = request.new_key {
            if self.api_key == new_key {
                debug!("API key equals previous, header injection will be a no-op");
            }
            self.total_estimated_matches = 0;
            self.api_key = new_key;
        }
        if let Some(new_query) = request.new_query {
            if self.query == new_query {
                debug!("query equals previous");
            }
            self.total_estimated_matches = 0;
            self.query = new_query;
        }
        if let Some(new_endpoint) = request.new_endpoint {
            if self.endpoint == new_endpoint {
                debug!("endpoint equals previous");
            }
            self.total_estimated_matches = 0;
            self.endpoint = new_endpoint;
        }
        if let Some(new_params) = request.new_params {
            self.total_estimated_matches = 0;
            self.params = new_params;
        }
        if let Some(new_headers) = request.new_headers {
            self.total_estimated_matches = 0;
            self.headers = new_headers;
        }
        self.rebuild()
    }

    /// Recompute the built request from the current session state. The
    /// session owns key injection here, so an auth entry in the caller's
    /// header map is replaced rather than rejected.
    fn rebuild(&mut self) -> Result<(), SearchError> {
        let base_url = self.base_url();
        self.built = build_query(
            &self.query,
            self.endpoint,
            &self.params,
            &self.headers,
            &self.api_key,
            true,
            &base_url,
        )?;
        self.urls_predicted.push(self.built.predicted_url.clone());
        debug!(predicted_url = %self.built.predicted_url, "session state rebuilt");
        Ok(())
    }

    /// Overwrite one cleaned request parameter in place, keeping the
    /// predicted URL in step. Used by the pagination loop for the
    /// count/offset adjustments between pages.
    pub(crate) fn set_param(&mut self, key: &str, value: String) {
        self.params.insert(key.to_string(), Some(value.clone()));
        self.built.params.insert(key.to_string(), value);
        self.built.predicted_url = predict_url(
            &self.base_url(),
            &self.built.encoded_query,
            &self.built.params,
        );
    }

    /// Number of requests this session has issued, retries excluded.
    pub fn queries_run(&self) -> u64 {
        self.queries_run
    }

    /// Bing's estimate of the total matching records, cached from the
    /// first page of the current query. Zero until a page reports one.
    pub fn total_estimated_matches(&self) -> u64 {
        self.total_estimated_matches
    }

    /// The current predicted request URL.
    pub fn predicted_url(&self) -> &str {
        &self.built.predicted_url
    }

    /// Every URL prediction made over the session's lifetime.
    pub fn predicted_urls(&self) -> &[String] {
        &self.urls_predicted
    }

    /// The resolved URL of the most recent request, if any was sent.
    pub fn last_actual_url(&self) -> Option<&str> {
        self.last_actual_url.as_deref()
    }

    /// Predicted/actual URL pairs, one per request, for diagnostics.
    pub fn url_comparisons(&self) -> &[(String, String)] {
        &self.url_comparisons
    }

    /// Whether this session runs the pre-flight checker at build time.
    pub fn validates_params(&self) -> bool {
        self.validate_params
    }
}
