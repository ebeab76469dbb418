// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response unpacking
//!
//! Dispatches on the JSON body's shape to produce typed result records.
//! The order of the branches is significant because the shapes overlap:
//! the `_type` discriminator wins, then the `webPages` section, then the
//! heuristics for filter-keyed and ad-hoc bodies. Each heuristic degrades
//! to a weaker shape rather than failing, down to bare URL strings.

use serde_json::Value;
use tracing::{info, warn};

use crate::error::SearchError;
use crate::types::{NewsResult, Unpacked, WebResult};

/// Unpack one page of results.
///
/// `response_filter` is the caller's `responseFilter` parameter, used to
/// pick the section of a mixed-content body. `total_estimated_matches` is
/// the session's cached estimate; it is filled in the first time a
/// `SearchResponse` reports one.
///
/// Returns `Ok(None)` for a `SearchResponse` with no `webPages` section,
/// which Bing sends when a web search matches nothing.
pub fn unpack(
    body: Value,
    response_filter: Option<&str>,
    total_estimated_matches: &mut u64,
) -> Result<Option<Unpacked>, SearchError> {
    let type_tag = body.get("_type").and_then(Value::as_str);

    if type_tag == Some("News") {
        return unpack_news(&body).map(Some);
    }

    let has_web_pages = body.get("webPages").is_some();

    if type_tag == Some("SearchResponse") || (type_tag.is_none() && has_web_pages) {
        return unpack_search_response(&body, total_estimated_matches);
    }

    if !has_web_pages {
        return unpack_adhoc(body, response_filter).map(Some);
    }

    Err(SearchError::Unparseable {
        reason: format!("unrecognized _type tag {:?}", type_tag),
    })
}

fn unpack_news(body: &Value) -> Result<Unpacked, SearchError> {
    let entries = body
        .get("value")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::Unparseable {
            reason: "News response has no value list".to_string(),
        })?;
    let results = entries
        .iter()
        .map(|entry| serde_json::from_value::<NewsResult>(entry.clone()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SearchError::Unparseable {
            reason: format!("News entry did not decode: {}", e),
        })?;
    Ok(Unpacked::News(results))
}

fn unpack_search_response(
    body: &Value,
    total_estimated_matches: &mut u64,
) -> Result<Option<Unpacked>, SearchError> {
    let Some(web_pages) = body.get("webPages") else {
        // A web search with no webPages section is taken to mean no
        // results, not a malformed response.
        warn!("no webPages section in search response, treating as no results");
        return Ok(None);
    };

    if *total_estimated_matches == 0 {
        if let Some(total) = web_pages.get("totalEstimatedMatches").and_then(Value::as_u64) {
            info!(
                total_estimated_matches = total,
                "Bing estimates this many results match the query"
            );
            *total_estimated_matches = total;
        }
    }

    let entries = web_pages
        .get("value")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::Unparseable {
            reason: "webPages section has no value list".to_string(),
        })?;
    let results = entries
        .iter()
        .map(|entry| serde_json::from_value::<WebResult>(entry.clone()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SearchError::Unparseable {
            reason: format!("webPages entry did not decode: {}", e),
        })?;
    Ok(Some(Unpacked::Web(results)))
}

/// Bodies without a `webPages` section: empty-result detection, then the
/// filter-keyed section, then a generic top-level `value` list.
fn unpack_adhoc(body: Value, response_filter: Option<&str>) -> Result<Unpacked, SearchError> {
    // Heuristic empty-result detection: a falsy rankingResponse means Bing
    // matched nothing. The caller gets the raw body back and distinguishes
    // empty from unparseable by inspecting it.
    if let Some(ranking) = body.get("rankingResponse") {
        if is_falsy(ranking) {
            info!("no results returned by Bing, passing the original body through");
            return Ok(Unpacked::Raw(body));
        }
    }

    if let Some(filter) = response_filter {
        if let Some(entries) = body
            .get(filter)
            .and_then(|section| section.get("value"))
            .and_then(Value::as_array)
        {
            let typed = entries
                .iter()
                .map(|entry| serde_json::from_value::<WebResult>(entry.clone()))
                .collect::<Result<Vec<_>, _>>();
            return Ok(match typed {
                Ok(results) => Unpacked::Web(results),
                Err(_) => {
                    warn!(filter, "unrecognized entry format, returning URL strings");
                    Unpacked::Urls(extract_urls(entries))
                }
            });
        }
    }

    if let Some(entries) = body.get("value").and_then(Value::as_array) {
        return Ok(Unpacked::Urls(extract_urls(entries)));
    }

    Err(SearchError::Unparseable {
        reason: "response filter did not identify the payload and no value list was found"
            .to_string(),
    })
}

fn extract_urls(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| entry.get("url").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// Mirrors a dynamic-language truthiness check: null, false, zero, empty
/// string, empty list, and empty object are all falsy.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}
