// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy for the search pipeline

use thiserror::Error;

/// Errors that can occur while building, sending, or unpacking a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Bad construction-time input: malformed key, unsupported value,
    /// or an authentication-header conflict.
    #[error("invalid configuration: {reason}")]
    Config {
        /// What was wrong with the input
        reason: String,
    },

    /// Bad parameter combination or categorical-query mismatch.
    #[error("invalid parameters: {reason}")]
    Validation {
        /// Which combination was rejected
        reason: String,
    },

    /// Request timed out at the transport layer.
    #[error("search timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Non-timeout transport failure (DNS, connection, TLS).
    #[error("transport error: {message}")]
    Transport {
        /// Underlying client error message
        message: String,
    },

    /// Bing rejected a query parameter (HTTP 400).
    #[error("bad request: Bing is showing param {parameter} set to {value}")]
    BadRequest {
        /// Offending parameter name from the response body
        parameter: String,
        /// Offending parameter value from the response body
        value: String,
    },

    /// A status code from the documented error table.
    #[error("search API error {status}: {description}")]
    KnownHttp {
        /// HTTP status code
        status: u16,
        /// Description from the fixed error-code table
        description: String,
    },

    /// A status code not present in the documented error table.
    #[error("unknown status code {status} returned, url string is {url}")]
    UnknownHttp {
        /// HTTP status code
        status: u16,
        /// Request URL that produced it
        url: String,
    },

    /// Still rate limited after the fixed number of resend attempts.
    #[error("queries per second quota still exceeded after {attempts} resend attempts")]
    RateLimitExhausted {
        /// Resend attempts made
        attempts: u32,
    },

    /// A rate-limit resend returned something other than 200 or 429.
    #[error("unexpected status {status} while resending after rate limit")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
    },

    /// None of the known response shapes matched the body.
    #[error("unable to unpack response: {reason}")]
    Unparseable {
        /// Why every fallback shape was rejected
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SearchError::BadRequest {
            parameter: "count".to_string(),
            value: "9000".to_string(),
        };
        assert!(error.to_string().contains("count"));
        assert!(error.to_string().contains("9000"));

        let error = SearchError::RateLimitExhausted { attempts: 5 };
        assert!(error.to_string().contains('5'));

        let error = SearchError::UnknownHttp {
            status: 418,
            url: "https://example.com".to_string(),
        };
        assert!(error.to_string().contains("418"));
        assert!(error.to_string().contains("example.com"));
    }
}
