// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bing Web Search API client
//!
//! Builds query URLs and request headers from caller-supplied parameters,
//! issues GET requests, validates status codes, retries on rate limiting,
//! and unpacks the JSON payload into typed result records. Multi-page
//! collection repeats the cycle with adjusted offset/count parameters.
//!
//! Key behaviors:
//! - Fixed endpoint set with per-market category vocabularies
//! - Authentication header injected by the session, never by the caller
//! - Fixed 5-attempt linear backoff on rate-limit responses
//! - Shape-priority unpacking that degrades to URL strings or raw JSON
//!   instead of failing on response drift

pub mod config;
pub mod constants;
pub mod decode;
pub mod error;
pub mod pager;
pub mod preflight;
pub mod query;
pub mod session;
pub mod types;
pub mod unpack;
pub mod validate;

// Re-export commonly used types
pub use config::{default_headers, default_params, ParamMap, SessionConfig};
pub use constants::Endpoint;
pub use decode::decode_response_url;
pub use error::SearchError;
pub use pager::{PageKind, PageOutput, PageSelection};
pub use session::{BingSession, ResetRequest};
pub use types::{NewsResult, SearchRecord, Unpacked, WebResult};
