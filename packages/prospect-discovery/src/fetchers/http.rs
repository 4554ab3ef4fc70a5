//! HTTP-based page fetcher.
//!
//! Fetches a single page, converts the HTML to markdown-ish text, and
//! labels the few fields it can find structurally: `<title>`, the first
//! `<h1>`, `mailto:`/`tel:` links, `og:site_name`, and a link whose text
//! says it is the website or homepage.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{FetchedPage, PageFetcher};
use crate::types::config::DiscoveryConfig;

lazy_static! {
    static ref SCRIPT: Regex = Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap();
    static ref STYLE: Regex = Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap();
    static ref TITLE: Regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();
    static ref H1: Regex = Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").unwrap();
    static ref H2: Regex = Regex::new(r"(?is)<h2[^>]*>(.*?)</h2>").unwrap();
    static ref H3: Regex = Regex::new(r"(?is)<h3[^>]*>(.*?)</h3>").unwrap();
    static ref PARAGRAPH: Regex = Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap();
    static ref BREAK: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"(?is)<li[^>]*>(.*?)</li>").unwrap();
    static ref ANCHOR: Regex =
        Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#).unwrap();
    static ref SITE_NAME: Regex = Regex::new(
        r#"(?is)<meta[^>]*property\s*=\s*["']og:site_name["'][^>]*content\s*=\s*["']([^"']+)["']"#
    )
    .unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref MULTI_NEWLINE: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// HTTP fetcher for single pages.
///
/// For production, wrap it: `ValidatedFetcher::new(HttpPageFetcher::new())`.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpPageFetcher {
    /// Create a new HTTP fetcher with default settings.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
            .with_user_agent(DiscoveryConfig::default().user_agent)
    }

    /// Create from config (timeout and user agent).
    pub fn from_config(config: &DiscoveryConfig) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;
        Ok(Self::with_client(client).with_user_agent(config.user_agent.clone()))
    }

    /// Use a custom HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            user_agent: String::new(),
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build a page from already-downloaded HTML.
    pub fn parse_html(url: &Url, html: &str) -> FetchedPage {
        let mut page = FetchedPage::new(url.as_str(), html_to_text(html));

        if let Some(title) = first_capture(&TITLE, html) {
            page = page.with_title(title);
        }
        if let Some(heading) = first_capture(&H1, html) {
            page = page.with_field("heading", heading);
        }
        if let Some(site_name) = first_capture(&SITE_NAME, html) {
            page = page.with_field("site_name", site_name);
        }

        for (key, value) in labelled_links(url, html) {
            if !page.fields.contains_key(key) {
                page.fields.insert(key.to_string(), value);
            }
        }

        page
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage> {
        debug!(url = %url, "HTTP fetch starting");

        let mut request = self.client.get(url.as_str());
        if !self.user_agent.is_empty() {
            request = request.header("User-Agent", &self.user_agent);
        }

        let response = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Http(Box::new(e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Http(Box::new(e))
            }
        })?;

        let page = Self::parse_html(url, &html);
        if !page.has_content() {
            return Err(FetchError::EmptyContent {
                url: url.to_string(),
            });
        }

        debug!(
            url = %url,
            content_length = page.content.len(),
            labelled_fields = page.fields.len(),
            "Page fetched successfully"
        );

        Ok(page)
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn first_capture(pattern: &Regex, html: &str) -> Option<String> {
    pattern
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| clean_inline(m.as_str()))
        .filter(|s| !s.is_empty())
}

/// Strip tags, decode entities, and collapse whitespace in an inline fragment.
fn clean_inline(fragment: &str) -> String {
    let text = decode_entities(&TAG.replace_all(fragment, " "));
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `mailto:`, `tel:` and explicitly labelled homepage links, in document order.
fn labelled_links(base: &Url, html: &str) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();

    for cap in ANCHOR.captures_iter(html) {
        let (Some(href), Some(text)) = (cap.get(1), cap.get(2)) else {
            continue;
        };
        let href = decode_entities(href.as_str().trim());
        let lower = href.to_lowercase();

        if lower.starts_with("mailto:") {
            let address = href[7..].split('?').next().unwrap_or_default().trim();
            if !address.is_empty() {
                out.push(("email", address.to_string()));
            }
            continue;
        }

        if lower.starts_with("tel:") {
            let number = href[4..].trim();
            if !number.is_empty() {
                out.push(("phone", number.to_string()));
            }
            continue;
        }

        let label = clean_inline(text.as_str()).to_lowercase();
        let is_homepage_link = ["website", "homepage", "home page"]
            .iter()
            .any(|needle| label.contains(needle));
        if is_homepage_link {
            if let Ok(resolved) = base.join(&href) {
                if matches!(resolved.scheme(), "http" | "https") {
                    out.push(("website", resolved.to_string()));
                }
            }
        }
    }

    out
}

/// Convert HTML to markdown-ish text (simplified).
fn html_to_text(html: &str) -> String {
    let mut text = SCRIPT.replace_all(html, "").to_string();
    text = STYLE.replace_all(&text, "").to_string();
    text = TITLE.replace_all(&text, "").to_string();

    text = H1.replace_all(&text, "# $1\n").to_string();
    text = H2.replace_all(&text, "## $1\n").to_string();
    text = H3.replace_all(&text, "### $1\n").to_string();

    text = PARAGRAPH.replace_all(&text, "$1\n\n").to_string();
    text = BREAK.replace_all(&text, "\n").to_string();

    // Keep link targets; mailto/tel hrefs carry contact details
    text = ANCHOR.replace_all(&text, "[$2]($1)").to_string();

    text = LIST_ITEM.replace_all(&text, "- $1\n").to_string();
    text = TAG.replace_all(&text, "").to_string();
    text = MULTI_NEWLINE.replace_all(&text, "\n\n").to_string();

    decode_entities(&text).trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
