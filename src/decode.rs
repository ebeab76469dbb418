// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoding for Bing's wrapped result URLs
//!
//! Bing returns result URLs wrapped in a fixed-length opaque prefix and
//! suffix around a percent-encoded path, padded on the left with `=`.
//! This transform is specific to that wrapper shape; it is not a general
//! percent-decoder. Feeding it arbitrary text yields unspecified output,
//! but it never panics.

/// Length of the opaque prefix Bing prepends to result URLs.
const WRAPPER_PREFIX_LEN: usize = 153;

/// Length of the opaque suffix Bing appends to result URLs.
const WRAPPER_SUFFIX_LEN: usize = 15;

/// Recover the plaintext URL from a Bing-encoded result URL.
///
/// Strips the fixed-length wrapper, trims the `=` padding, then
/// percent-decodes. Input that does not match the wrapper shape is
/// returned unchanged.
pub fn decode_response_url(encoded: &str) -> String {
    if encoded.len() <= WRAPPER_PREFIX_LEN + WRAPPER_SUFFIX_LEN {
        return encoded.to_string();
    }
    // get() rather than slicing: the fixed offsets can land inside a
    // multi-byte character on garbage input.
    let inner = match encoded.get(WRAPPER_PREFIX_LEN..encoded.len() - WRAPPER_SUFFIX_LEN) {
        Some(inner) => inner.trim_start_matches('='),
        None => return encoded.to_string(),
    };
    match urlencoding::decode(inner) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => inner.to_string(),
    }
}
