// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Typed result records unpacked from Bing JSON responses

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::decode_response_url;

/// A single web-page result.
///
/// Immutable snapshot of one entry from a `webPages.value` list. Only the
/// URL is required; everything else is best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebResult {
    /// The URL sent back by Bing, still in its encoded wrapper.
    pub url: String,
    /// Display URL. Not always accurate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_url: Option<String>,
    /// Title of the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Snippet of text from the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Per-entry index id, used primarily for compound queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// When Bing last crawled the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_last_crawled: Option<String>,
    /// Opaque "about" metadata, passed through as raw JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<Value>,
}

impl WebResult {
    /// Plaintext URL, unwrapped from Bing's encoding scheme.
    pub fn decoded_url(&self) -> String {
        decode_response_url(&self.url)
    }
}

/// A single news-article result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResult {
    /// News category this article was filed under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Article headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Publication date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    /// Article description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Article URL, still in its encoded wrapper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Subjects the article is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<Vec<NewsAbout>>,
    /// Thumbnail image metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<NewsImage>,
    /// Publishing organizations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Vec<NewsProvider>>,
}

impl NewsResult {
    /// Plaintext URL, unwrapped from Bing's encoding scheme.
    pub fn decoded_url(&self) -> Option<String> {
        self.url.as_deref().map(decode_response_url)
    }
}

/// A subject attached to a news result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsAbout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_link: Option<String>,
}

/// Image metadata attached to a news result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<NewsThumbnail>,
}

/// Thumbnail details for a news image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsThumbnail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// A publisher attached to a news result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsProvider {
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One polymorphic result entry.
#[derive(Debug, Clone)]
pub enum SearchRecord {
    /// A typed web-page result.
    Web(WebResult),
    /// A typed news result.
    News(NewsResult),
    /// A bare URL string, produced when the entry shape was unrecognized.
    Url(String),
    /// Raw JSON passthrough, produced when the whole page was unrecognized.
    Raw(Value),
}

impl SearchRecord {
    /// Encoded URL carried by this record, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            SearchRecord::Web(web) => Some(&web.url),
            SearchRecord::News(news) => news.url.as_deref(),
            SearchRecord::Url(url) => Some(url),
            SearchRecord::Raw(_) => None,
        }
    }
}

/// Outcome of unpacking one page of results.
///
/// Weaker variants are fallbacks: the unpacker degrades from typed records
/// down to URL strings and finally raw JSON rather than failing on minor
/// response-shape drift.
#[derive(Debug, Clone)]
pub enum Unpacked {
    /// Web-page results from a `SearchResponse` or filter-keyed body.
    Web(Vec<WebResult>),
    /// News results from a `_type: News` body.
    News(Vec<NewsResult>),
    /// Bare URL strings extracted from an unrecognized entry shape.
    Urls(Vec<String>),
    /// The original body, returned when Bing reported no results.
    Raw(Value),
}

impl Unpacked {
    /// Flatten into per-entry records.
    pub fn into_records(self) -> Vec<SearchRecord> {
        match self {
            Unpacked::Web(results) => results.into_iter().map(SearchRecord::Web).collect(),
            Unpacked::News(results) => results.into_iter().map(SearchRecord::News).collect(),
            Unpacked::Urls(urls) => urls.into_iter().map(SearchRecord::Url).collect(),
            Unpacked::Raw(body) => vec![SearchRecord::Raw(body)],
        }
    }

    /// Encoded URLs for every entry that carries one.
    pub fn urls(&self) -> Vec<String> {
        match self {
            Unpacked::Web(results) => results.iter().map(|r| r.url.clone()).collect(),
            Unpacked::News(results) => results.iter().filter_map(|r| r.url.clone()).collect(),
            Unpacked::Urls(urls) => urls.clone(),
            Unpacked::Raw(_) => Vec::new(),
        }
    }

    /// Plaintext URLs for every entry that carries one.
    pub fn decoded_urls(&self) -> Vec<String> {
        self.urls().iter().map(|url| decode_response_url(url)).collect()
    }

    /// Number of entries on this page.
    pub fn len(&self) -> usize {
        match self {
            Unpacked::Web(results) => results.len(),
            Unpacked::News(results) => results.len(),
            Unpacked::Urls(urls) => urls.len(),
            Unpacked::Raw(_) => 1,
        }
    }

    /// Whether the page carried no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_web_result_deserialization() {
        let entry = json!({
            "url": "https://example.com",
            "displayUrl": "example.com",
            "name": "Example",
            "snippet": "An example page",
            "id": "https://api.cognitive.microsoft.com/api/v5/#WebPages.0",
            "dateLastCrawled": "2016-08-01T12:00:00"
        });
        let result: WebResult = serde_json::from_value(entry).unwrap();
        assert_eq!(result.url, "https://example.com");
        assert_eq!(result.display_url.as_deref(), Some("example.com"));
        assert_eq!(result.date_last_crawled.as_deref(), Some("2016-08-01T12:00:00"));
        assert!(result.about.is_none());
    }

    #[test]
    fn test_web_result_requires_url() {
        let entry = json!({ "name": "no url here" });
        assert!(serde_json::from_value::<WebResult>(entry).is_err());
    }

    #[test]
    fn test_news_result_deserialization_full() {
        let entry = json!({
            "category": "Business",
            "name": "Markets rally",
            "datePublished": "2016-08-01T09:00:00",
            "description": "Stocks went up",
            "url": "https://news.example.com/rally",
            "about": [{ "name": "Markets", "readLink": "https://api.example.com/markets" }],
            "image": { "thumbnail": { "contentUrl": "https://img.example.com/t.jpg", "width": 700, "height": 466 } },
            "provider": [{ "_type": "Organization", "name": "Example News" }]
        });
        let result: NewsResult = serde_json::from_value(entry).unwrap();
        assert_eq!(result.category.as_deref(), Some("Business"));
        assert_eq!(result.about.as_ref().unwrap()[0].name.as_deref(), Some("Markets"));
        let thumbnail = result.image.as_ref().unwrap().thumbnail.as_ref().unwrap();
        assert_eq!(thumbnail.width, Some(700));
        assert_eq!(result.provider.as_ref().unwrap()[0].kind.as_deref(), Some("Organization"));
    }

    #[test]
    fn test_news_result_tolerates_sparse_entries() {
        let entry = json!({ "name": "Headline only" });
        let result: NewsResult = serde_json::from_value(entry).unwrap();
        assert_eq!(result.name.as_deref(), Some("Headline only"));
        assert!(result.url.is_none());
        assert!(result.decoded_url().is_none());
    }

    #[test]
    fn test_unpacked_into_records() {
        let unpacked = Unpacked::Urls(vec!["a".to_string(), "b".to_string()]);
        let records = unpacked.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url(), Some("a"));
    }

    #[test]
    fn test_unpacked_raw_counts_as_one_entry() {
        let unpacked = Unpacked::Raw(json!({ "rankingResponse": {} }));
        assert_eq!(unpacked.len(), 1);
        assert!(unpacked.urls().is_empty());
    }
}
