// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response status validation
//!
//! Pure dispatch on the HTTP status code. Rate limiting is a signal, not an
//! error: the caller recovers from it with the fixed resend policy, while
//! everything else surfaces as a typed failure.

use crate::constants::describe_status;

/// Outcome of inspecting a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCheck {
    /// 200, the call succeeded.
    Ok,
    /// 429, the queries-per-second quota was exceeded. Retryable.
    RateLimited,
    /// 400, a query parameter was rejected. The response body names it.
    BadRequest,
    /// Another status from the documented error table.
    Known(&'static str),
    /// A status the table does not cover.
    Unknown,
}

/// Classify a status code per the fixed error-code table.
pub fn check_status(status: u16) -> StatusCheck {
    match status {
        200 => StatusCheck::Ok,
        429 => StatusCheck::RateLimited,
        400 => StatusCheck::BadRequest,
        other => describe_status(other)
            .map(StatusCheck::Known)
            .unwrap_or(StatusCheck::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(check_status(200), StatusCheck::Ok);
    }

    #[test]
    fn test_rate_limit_is_a_signal_not_a_failure() {
        assert_eq!(check_status(429), StatusCheck::RateLimited);
    }

    #[test]
    fn test_bad_request_is_distinguished() {
        assert_eq!(check_status(400), StatusCheck::BadRequest);
    }

    #[test]
    fn test_documented_statuses_carry_descriptions() {
        match check_status(401) {
            StatusCheck::Known(description) => {
                assert!(description.contains("subscription key"));
            }
            other => panic!("expected Known, got {:?}", other),
        }
        assert!(matches!(check_status(403), StatusCheck::Known(_)));
        assert!(matches!(check_status(404), StatusCheck::Known(_)));
        assert!(matches!(check_status(410), StatusCheck::Known(_)));
    }

    #[test]
    fn test_undocumented_statuses_are_unknown() {
        assert_eq!(check_status(500), StatusCheck::Unknown);
        assert_eq!(check_status(302), StatusCheck::Unknown);
    }
}
