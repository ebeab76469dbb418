// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Query building
//!
//! Turns a plaintext query, endpoint selection, and parameter/header maps
//! into a predicted, URL-encoded request. Leaf component: no I/O.

use std::collections::BTreeMap;

use crate::config::ParamMap;
use crate::constants::{
    Endpoint, API_KEY_LENGTH, AUTH_HEADER, NEWS_CATEGORIES_GB, NEWS_CATEGORIES_US,
};
use crate::error::SearchError;

/// A fully prepared request, ready for the transport layer.
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    /// Encoded query-string fragment: `q=...` or `category=...`.
    pub encoded_query: String,
    /// Parameters with absent/empty entries removed.
    pub params: BTreeMap<String, String>,
    /// Headers with absent/empty entries removed. The authentication entry
    /// is always first.
    pub headers: Vec<(String, String)>,
    /// Advisory prediction of the request URL, for diagnostics only. The
    /// transport may order parameters differently.
    pub predicted_url: String,
}

/// Build a request from caller-supplied state.
///
/// Validates the key length and (for categorical endpoints) the query term
/// against the market's category vocabulary, cleans both maps, and injects
/// the authentication header. Supplying an authentication header without
/// `override_key` is a caller error.
pub fn build_query(
    query: &str,
    endpoint: Endpoint,
    params: &ParamMap,
    headers: &ParamMap,
    api_key: &str,
    override_key: bool,
    base_url: &str,
) -> Result<BuiltQuery, SearchError> {
    if api_key.len() != API_KEY_LENGTH {
        return Err(SearchError::Config {
            reason: format!(
                "API key must be {} characters, got {}",
                API_KEY_LENGTH,
                api_key.len()
            ),
        });
    }

    let params = clear_null_vals(params);
    let cleaned_headers = clear_null_vals(headers);

    let encoded_query = if endpoint.is_categorical() {
        encode_categorical_query(query, &params)?
    } else {
        format!("q={}", urlencoding::encode(query))
    };

    let headers = inject_key_into_headers(cleaned_headers, api_key, override_key)?;
    let predicted_url = predict_url(base_url, &encoded_query, &params);

    Ok(BuiltQuery {
        encoded_query,
        params,
        headers,
        predicted_url,
    })
}

/// Drop entries whose value is absent or empty. A parameter or header with
/// no value is omitted from the request entirely, not sent as empty.
pub fn clear_null_vals(map: &ParamMap) -> BTreeMap<String, String> {
    map.iter()
        .filter_map(|(key, value)| match value {
            Some(value) if !value.is_empty() => Some((key.clone(), value.clone())),
            _ => None,
        })
        .collect()
}

/// Predicted request URL: base endpoint URL, encoded query, then the
/// URL-encoded parameter map.
pub fn predict_url(base_url: &str, encoded_query: &str, params: &BTreeMap<String, String>) -> String {
    let encoded_params = params
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}{}&{}", base_url, encoded_query, encoded_params)
}

/// Categorical search must be used in conjunction with the `mkt` param.
/// Only the US and GB markets have category vocabularies.
fn encode_categorical_query(
    query: &str,
    params: &BTreeMap<String, String>,
) -> Result<String, SearchError> {
    let market = params.get("mkt").ok_or_else(|| SearchError::Validation {
        reason: "categorical search requires the mkt param".to_string(),
    })?;
    let market = market.to_ascii_lowercase();
    let vocabulary = if market.ends_with("us") {
        NEWS_CATEGORIES_US
    } else if market.ends_with("gb") {
        NEWS_CATEGORIES_GB
    } else {
        return Err(SearchError::Validation {
            reason: format!("categorical search is not supported for market {}", market),
        });
    };
    if !vocabulary.contains(&query) {
        return Err(SearchError::Validation {
            reason: "mkt param and categorical query term do not match".to_string(),
        });
    }
    Ok(format!("category={}", query))
}

/// Place the subscription key first in the header list.
///
/// Ordering only matters for URL-prediction string equality against the
/// actual request, never for correctness.
fn inject_key_into_headers(
    cleaned: BTreeMap<String, String>,
    api_key: &str,
    override_key: bool,
) -> Result<Vec<(String, String)>, SearchError> {
    if cleaned.contains_key(AUTH_HEADER) && !override_key {
        return Err(SearchError::Config {
            reason: format!(
                "API key detected in supplied headers, set override to replace {}",
                AUTH_HEADER
            ),
        });
    }
    let mut headers = vec![(AUTH_HEADER.to_string(), api_key.to_string())];
    headers.extend(cleaned.into_iter().filter(|(name, _)| name != AUTH_HEADER));
    Ok(headers)
}
