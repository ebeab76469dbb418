// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session configuration
//!
//! Default parameter and header tables are plain owned values handed to the
//! session at construction. Each session copies them, so mutating one
//! session never leaks into another.

use std::collections::BTreeMap;
use std::env;

use crate::constants::{Endpoint, DEFAULT_PAGE_CEILING, RETRY_BACKOFF_MS};

/// Query parameters or header fields: string keys to present-or-absent
/// values. Absent entries are dropped before the request is sent.
pub type ParamMap = BTreeMap<String, Option<String>>;

/// Dummy User-Agent header for a consistent response format.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.2; Win64; x64; rv:16.0.1) Gecko/20121011 Firefox/16.0.1";

/// Configuration for one search session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bing subscription key. Must be exactly 32 characters.
    pub api_key: String,
    /// Plaintext query, or a category name for the categorical endpoint.
    pub query: String,
    /// Which Bing endpoint to hit.
    pub endpoint: Endpoint,
    /// Query parameters. Absent values are omitted from the request.
    pub params: ParamMap,
    /// Header fields. Absent values are omitted from the request. Never put
    /// the subscription key here; the session injects it.
    pub headers: ParamMap,
    /// Run the pre-flight parameter checker before any request is sent.
    pub validate_params: bool,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Backoff between rate-limit resends, in milliseconds.
    pub retry_backoff_ms: u64,
    /// Cap on pages fetched by a single pagination call.
    pub page_ceiling: u32,
    /// Replace the endpoint's base URL, trailing separator included.
    /// Intended for tests against a local stub server.
    pub base_url_override: Option<String>,
}

impl SessionConfig {
    /// Minimal configuration: a key, a query, and the default tables.
    pub fn new(api_key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            query: query.into(),
            ..Self::default()
        }
    }

    /// Load key and query from `BING_API_KEY` / `BING_SEARCH_QUERY`.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("BING_API_KEY").unwrap_or_default(),
            query: env::var("BING_SEARCH_QUERY").unwrap_or_default(),
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            query: String::new(),
            endpoint: Endpoint::Web,
            params: default_params(),
            headers: default_headers(),
            validate_params: false,
            request_timeout_ms: 10_000,
            retry_backoff_ms: RETRY_BACKOFF_MS,
            page_ceiling: DEFAULT_PAGE_CEILING,
            base_url_override: None,
        }
    }
}

/// Default query parameters. `count` is 0-50, `offset` pages through
/// results alongside `totalEstimatedMatches`, `category` applies to news
/// search only.
pub fn default_params() -> ParamMap {
    let mut params = ParamMap::new();
    params.insert("cc".to_string(), None);
    params.insert("count".to_string(), Some("50".to_string()));
    params.insert("freshness".to_string(), None);
    params.insert("mkt".to_string(), Some("en-us".to_string()));
    params.insert("offset".to_string(), Some("0".to_string()));
    params.insert("responseFilter".to_string(), None);
    params.insert("safeSearch".to_string(), None);
    params.insert("setLang".to_string(), None);
    params.insert("textDecorations".to_string(), None);
    params.insert("textFormat".to_string(), None);
    params.insert("category".to_string(), None);
    params
}

/// Default header fields. The subscription key is never set here; the
/// session injects it at build time.
pub fn default_headers() -> ParamMap {
    let mut headers = ParamMap::new();
    headers.insert("User-Agent".to_string(), Some(DEFAULT_USER_AGENT.to_string()));
    headers.insert("X-Search-ClientIP".to_string(), None);
    headers.insert("X-MSEdge-ClientID".to_string(), None);
    headers.insert("Accept".to_string(), None);
    headers.insert("Accept-Language".to_string(), None);
    headers.insert("X-Search-Location".to_string(), None);
    headers
}
