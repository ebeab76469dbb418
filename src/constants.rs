// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed tables specified by Bing
//!
//! Endpoint base URLs, the HTTP status-code description table, and the
//! per-market news-category vocabularies. These are static upstream data,
//! not tunable configuration.

/// Required length of a Bing subscription key.
pub const API_KEY_LENGTH: usize = 32;

/// Header field carrying the subscription key.
pub const AUTH_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Bing caps each request at this many records.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Bing silently truncates query URLs longer than this.
pub const URL_LENGTH_WARNING: usize = 1300;

/// Resend attempts made when the queries-per-second quota is exceeded.
pub const RATE_LIMIT_ATTEMPTS: u32 = 5;

/// Fixed backoff between rate-limit resends, in milliseconds.
pub const RETRY_BACKOFF_MS: u64 = 2000;

/// Default cap on pages fetched by a single pagination call.
pub const DEFAULT_PAGE_CEILING: u32 = 100;

/// Valid values for the `responseFilter` query parameter.
pub const RESPONSE_FILTERS: &[&str] = &[
    "Computation",
    "Images",
    "News",
    "RelatedSearches",
    "SpellSuggestions",
    "TimeZone",
    "Videos",
    "Webpages",
];

/// Valid values for the `freshness` query parameter. Case-sensitive.
pub const FRESHNESS_VALUES: &[&str] = &["Day", "Week", "Month"];

/// Valid values for the `safeSearch` query parameter. Case-sensitive.
pub const SAFE_SEARCH_VALUES: &[&str] = &["Off", "Moderate", "Strict"];

/// Valid values for the `textFormat` query parameter. Case-sensitive.
pub const TEXT_FORMAT_VALUES: &[&str] = &["Raw", "HTML"];

/// One of the fixed set of Bing search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Web,
    Images,
    ImagesTrending,
    Videos,
    VideosTrending,
    VideosDetails,
    News,
    NewsCategories,
    NewsTrending,
}

impl Endpoint {
    /// Base URL for this endpoint, including the trailing separator the
    /// encoded query fragment is appended to.
    pub fn base_url(&self) -> &'static str {
        match self {
            Endpoint::Web => "https://api.cognitive.microsoft.com/bing/v5.0/search?",
            Endpoint::Images => "https://api.cognitive.microsoft.com/bing/v5.0/images/search?",
            // Trending images work only for mkt = en-US, en-CA, and en-AU.
            Endpoint::ImagesTrending => {
                "https://api.cognitive.microsoft.com/bing/v5.0/images/trending/search?"
            }
            Endpoint::Videos => "https://api.cognitive.microsoft.com/bing/v5.0/videos/search?",
            Endpoint::VideosTrending => {
                "https://api.cognitive.microsoft.com/bing/v5.0/videos/trending/search?"
            }
            Endpoint::VideosDetails => {
                "https://api.cognitive.microsoft.com/bing/v5.0/videos/details/search?"
            }
            Endpoint::News => "https://api.cognitive.microsoft.com/bing/v5.0/news/search?",
            Endpoint::NewsCategories => "https://api.cognitive.microsoft.com/bing/v5.0/news?",
            Endpoint::NewsTrending => {
                "https://api.cognitive.microsoft.com/bing/v5.0/news/trendingtopics&"
            }
        }
    }

    /// Endpoint name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Web => "web",
            Endpoint::Images => "images",
            Endpoint::ImagesTrending => "images_trending",
            Endpoint::Videos => "videos",
            Endpoint::VideosTrending => "videos_trending",
            Endpoint::VideosDetails => "videos_details",
            Endpoint::News => "news",
            Endpoint::NewsCategories => "news_categories",
            Endpoint::NewsTrending => "news_trending",
        }
    }

    /// Categorical endpoints take a category name instead of free text and
    /// validate it against the market's vocabulary.
    pub fn is_categorical(&self) -> bool {
        matches!(self, Endpoint::NewsCategories)
    }
}

/// Human-readable description for the status codes Bing documents.
pub fn describe_status(status: u16) -> Option<&'static str> {
    match status {
        200 => Some("The call succeeded"),
        400 => Some("One of the query parameters is missing or not valid"),
        401 => Some("The subscription key is missing or not valid"),
        403 => Some(
            "The user is authenticated but doesn't have permission to the requested resource. \
             Bing may also return this status if the caller exceeded their queries per month quota",
        ),
        404 => Some(
            "Page not found: Bing should not be throwing this error. There is likely a \
             fundamental problem with the structure of your query URL",
        ),
        410 => Some("The request was made using HTTP. Only HTTPS is supported"),
        429 => Some("The user exceeded their queries per second quota"),
        _ => None,
    }
}

/// News categories accepted by the categorical endpoint for en-US markets.
pub const NEWS_CATEGORIES_US: &[&str] = &[
    "Business",
    "Entertainment",
    "Entertainment_MovieAndTV",
    "Entertainment_Music",
    "Health",
    "Politics",
    "ScienceAndTechnology",
    "Science",
    "Technology",
    "Sports",
    "Sports_Golf",
    "Sports_MLB",
    "Sports_NBA",
    "Sports_NFL",
    "Sports_NHL",
    "Sports_Soccer",
    "Sports_Tennis",
    "Sports_CFB",
    "Sports_CBB",
    "US",
    "US_Northeast",
    "US_South",
    "US_Midwest",
    "US_West",
    "World",
    "World_Africa",
    "World_Americas",
    "World_Asia",
    "World_Europe",
    "World_MiddleEast",
];

/// News categories accepted by the categorical endpoint for en-GB markets.
pub const NEWS_CATEGORIES_GB: &[&str] = &[
    "Business",
    "Entertainment",
    "Health",
    "Politics",
    "ScienceAndTechnology",
    "Sports",
    "UK",
    "World",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_endpoints_use_https() {
        let endpoints = [
            Endpoint::Web,
            Endpoint::Images,
            Endpoint::ImagesTrending,
            Endpoint::Videos,
            Endpoint::VideosTrending,
            Endpoint::VideosDetails,
            Endpoint::News,
            Endpoint::NewsCategories,
            Endpoint::NewsTrending,
        ];
        for endpoint in endpoints {
            assert!(endpoint.base_url().starts_with("https://"));
        }
    }

    #[test]
    fn test_only_news_categories_is_categorical() {
        assert!(Endpoint::NewsCategories.is_categorical());
        assert!(!Endpoint::Web.is_categorical());
        assert!(!Endpoint::News.is_categorical());
        assert!(!Endpoint::NewsTrending.is_categorical());
    }

    #[test]
    fn test_describe_status_known_codes() {
        assert!(describe_status(429).unwrap().contains("queries per second"));
        assert!(describe_status(401).unwrap().contains("subscription key"));
    }

    #[test]
    fn test_describe_status_unknown_code() {
        assert!(describe_status(418).is_none());
        assert!(describe_status(503).is_none());
    }

    #[test]
    fn test_category_vocabularies() {
        assert_eq!(NEWS_CATEGORIES_US.len(), 30);
        assert_eq!(NEWS_CATEGORIES_GB.len(), 8);
        assert!(NEWS_CATEGORIES_GB.contains(&"UK"));
        assert!(!NEWS_CATEGORIES_GB.contains(&"Sports_NFL"));
        assert!(NEWS_CATEGORIES_US.contains(&"Sports_NFL"));
    }
}
