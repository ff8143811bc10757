//! HTML article fetching and text extraction.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::loader::config::LoaderConfig;
use crate::loader::error::{LoaderError, LoaderResult};
use crate::loader::{ContentSource, LoadFuture, browser_get, read_body_limited};

/// Selectors tried in order to locate the main body of an article.
const CONTENT_SELECTORS: [&str; 10] = [
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".article-content",
    ".entry-content",
    ".content",
    "#content",
    ".post",
    ".article",
];

/// Elements whose text never belongs to the readable page.
const SKIPPED_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "svg"];

/// Minimum word count for a content selector match to be trusted.
const MIN_MAIN_WORDS: usize = 50;

/// Web page source backed by an HTTP client.
pub struct ArticleSource {
    client: reqwest::Client,
    config: LoaderConfig,
}

impl ArticleSource {
    /// Create a new article source.
    #[must_use]
    pub const fn new(client: reqwest::Client, config: LoaderConfig) -> Self {
        Self { client, config }
    }

    async fn fetch_text(&self, url: &str) -> LoaderResult<String> {
        Url::parse(url)?;

        let response = browser_get(&self.client, &self.config, url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        let body = read_body_limited(response, self.config.max_content_length).await?;

        if content_type.contains("text/plain") {
            return Ok(clean_text(&body));
        }
        if !content_type.contains("html") {
            return Err(LoaderError::UnsupportedContentType(content_type));
        }

        tracing::debug!(url, bytes = body.len(), "Fetched article HTML");
        Ok(extract_page_text(&body))
    }
}

impl ContentSource for ArticleSource {
    fn fetch(&self, url: &str) -> LoadFuture<'_, LoaderResult<String>> {
        let url = url.to_string();
        Box::pin(async move { self.fetch_text(&url).await })
    }
}

/// Extract readable text from an HTML document: title followed by the main content.
#[must_use]
pub fn extract_page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let title = extract_title(&document);
    let body = extract_main_text(&document);

    match (title.is_empty(), body.is_empty()) {
        (true, _) => body,
        (false, true) => title,
        (false, false) if body.starts_with(&title) => body,
        (false, false) => format!("{title}\n\n{body}"),
    }
}

/// Extract page title.
fn extract_title(document: &Html) -> String {
    if let Ok(selector) = Selector::parse("title") {
        if let Some(element) = document.select(&selector).next() {
            let title = clean_text(&element.text().collect::<String>());
            if !title.is_empty() {
                return title;
            }
        }
    }

    if let Ok(selector) = Selector::parse("h1") {
        if let Some(element) = document.select(&selector).next() {
            return clean_text(&element.text().collect::<String>());
        }
    }

    String::new()
}

/// Extract main text content from the page.
fn extract_main_text(document: &Html) -> String {
    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = visible_text(element);
                if text.split_whitespace().count() > MIN_MAIN_WORDS {
                    return text;
                }
            }
        }
    }

    // Fallback: the whole body.
    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            return visible_text(body);
        }
    }

    String::new()
}

/// Collect the text under `root`, skipping scripts, styles and similar nodes.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut text = String::new();

    for node in root.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = fragment.trim();
        if !trimmed.is_empty() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(trimmed);
        }
    }

    clean_text(&text)
}

/// Collapse all whitespace runs into single spaces.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }

    result.trim().to_string()
}
