// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pre-flight parameter checking
//!
//! Optional human-error checker for known-bad parameter combinations, run
//! before any network call when the session asks for it. Operates on the
//! cleaned maps, so every present key has a non-empty value.

use std::collections::BTreeMap;

use tracing::warn;

use crate::constants::{
    FRESHNESS_VALUES, MAX_PAGE_SIZE, RESPONSE_FILTERS, SAFE_SEARCH_VALUES, TEXT_FORMAT_VALUES,
};
use crate::error::SearchError;

fn invalid(reason: impl Into<String>) -> SearchError {
    SearchError::Validation {
        reason: reason.into(),
    }
}

fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(header, _)| header == name)
        .map(|(_, value)| value.as_str())
}

/// Check the cleaned parameter and header maps for known conflicting
/// combinations. A failure here is a hard stop: the request is never sent.
pub fn check_params(
    params: &BTreeMap<String, String>,
    headers: &[(String, String)],
) -> Result<(), SearchError> {
    if params.contains_key("cc") {
        if header_value(headers, "Accept-Language").is_none() {
            return Err(invalid(
                "attempt to use a cc country code without specifying a language",
            ));
        }
        if params.contains_key("mkt") {
            return Err(invalid("cc and mkt cannot be specified simultaneously"));
        }
    }

    if let Some(count) = params.get("count") {
        let count: i64 = count
            .parse()
            .map_err(|_| invalid(format!("count must be a number, got {}", count)))?;
        if !(0..=MAX_PAGE_SIZE as i64).contains(&count) {
            return Err(invalid(format!(
                "count specified out of range, at most {} objects returned",
                MAX_PAGE_SIZE
            )));
        }
    }

    if let Some(freshness) = params.get("freshness") {
        if !FRESHNESS_VALUES.contains(&freshness.as_str()) {
            return Err(invalid(
                "freshness must be Day, Week, or Month, case-sensitive",
            ));
        }
    }

    if let Some(offset) = params.get("offset") {
        let offset: i64 = offset
            .parse()
            .map_err(|_| invalid(format!("offset must be a number, got {}", offset)))?;
        if offset < 0 {
            return Err(invalid("offset cannot be negative"));
        }
    }

    if let Some(filter) = params.get("responseFilter") {
        if !RESPONSE_FILTERS.contains(&filter.as_str()) {
            return Err(invalid(format!("improper response filter {}", filter)));
        }
    }

    if let Some(safe_search) = params.get("safeSearch") {
        if !SAFE_SEARCH_VALUES.contains(&safe_search.as_str()) {
            return Err(invalid(
                "safeSearch setting must be Off, Moderate, or Strict, case-sensitive",
            ));
        }
        if header_value(headers, "X-Search-ClientIP").is_some() {
            warn!(
                "both an X-Search-ClientIP header and a safeSearch setting are present, \
                 the header takes precedence"
            );
        }
    }

    if params.contains_key("setLang") && header_value(headers, "Accept-Language").is_some() {
        return Err(invalid(
            "attempt to use both the Accept-Language header and the setLang param",
        ));
    }

    if let Some(decorations) = params.get("textDecorations") {
        if !["true", "false"].contains(&decorations.to_ascii_lowercase().as_str()) {
            return Err(invalid("textDecorations takes a boolean"));
        }
    }

    if let Some(format) = params.get("textFormat") {
        if !TEXT_FORMAT_VALUES.contains(&format.as_str()) {
            return Err(invalid("textFormat must be Raw or HTML, case-sensitive"));
        }
    }

    Ok(())
}
