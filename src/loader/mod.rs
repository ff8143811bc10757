//! Content loading for the summarizer.
//!
//! A URL is classified as either a YouTube video or a generic article and
//! routed to the matching [`ContentSource`]:
//! - `article`: HTML fetch and main-text extraction
//! - `video`: YouTube caption track download

pub mod article;
pub mod config;
pub mod error;
pub mod types;
pub mod video;

pub use article::ArticleSource;
pub use config::LoaderConfig;
pub use error::{LoaderError, LoaderResult};
pub use types::{ContentKind, LoadedContent};
pub use video::TranscriptSource;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future type for content source operations.
pub type LoadFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something that can turn a URL into plain text.
pub trait ContentSource: Send + Sync {
    /// Fetch the text behind `url`.
    ///
    /// # Errors
    /// Returns an error if the remote fetch fails.
    fn fetch(&self, url: &str) -> LoadFuture<'_, LoaderResult<String>>;
}

/// Classify a URL by shape alone, without any network access.
#[must_use]
pub fn classify_url(url: &str) -> ContentKind {
    if video::video_id(url).is_some() {
        ContentKind::Youtube
    } else {
        ContentKind::Article
    }
}

/// Loader that dispatches each URL to the article or video source.
pub struct ContentLoader {
    article: Arc<dyn ContentSource>,
    video: Arc<dyn ContentSource>,
}

impl ContentLoader {
    /// Create a loader backed by real HTTP sources.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &LoaderConfig) -> LoaderResult<Self> {
        let client = build_client(config)?;
        Ok(Self::with_sources(
            Arc::new(ArticleSource::new(client.clone(), config.clone())),
            Arc::new(TranscriptSource::new(client, config.clone())),
        ))
    }

    /// Create a loader from explicit sources.
    #[must_use]
    pub fn with_sources(article: Arc<dyn ContentSource>, video: Arc<dyn ContentSource>) -> Self {
        Self { article, video }
    }

    /// Load the text behind `url` and report how it was classified.
    ///
    /// # Errors
    /// Returns an error if the fetch fails or yields no text.
    pub async fn load(&self, url: &str) -> LoaderResult<LoadedContent> {
        let kind = classify_url(url);
        let source = match kind {
            ContentKind::Article => &self.article,
            ContentKind::Youtube => &self.video,
        };

        tracing::info!(url, content_type = %kind, "Loading content");
        let text = source.fetch(url).await?;

        if text.trim().is_empty() {
            return Err(LoaderError::EmptyContent);
        }

        tracing::debug!(url, chars = text.chars().count(), "Content loaded");
        Ok(LoadedContent { text, kind })
    }
}

/// Start a GET request carrying a user agent picked for this request.
fn browser_get(client: &reqwest::Client, config: &LoaderConfig, url: &str) -> reqwest::RequestBuilder {
    client
        .get(url)
        .header(reqwest::header::USER_AGENT, config.random_user_agent())
}

/// Read a response body, failing once it grows past `limit` bytes.
///
/// Chunked and header-less responses are counted as they stream in.
async fn read_body_limited(mut response: reqwest::Response, limit: usize) -> LoaderResult<String> {
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(LoaderError::TooLarge(len));
        }
    }

    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let total = body.len() + chunk.len();
        if total > limit {
            return Err(LoaderError::TooLarge(total as u64));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Build an HTTP client with browser-like headers.
fn build_client(config: &LoaderConfig) -> LoaderResult<reqwest::Client> {
    use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

    let mut headers = HeaderMap::new();

    if let Ok(accept) = HeaderValue::from_str(
        "text/html,application/xhtml+xml,application/xml;q=0.9,text/plain;q=0.8,*/*;q=0.7",
    ) {
        headers.insert(ACCEPT, accept);
    }

    if let Ok(lang) = HeaderValue::from_str(&config.accept_language()) {
        headers.insert(ACCEPT_LANGUAGE, lang);
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| LoaderError::HttpClient(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::{Read, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    use super::*;

    /// Answer a single HTTP request with `response` and report the request head.
    fn serve_once(response: Vec<u8>) -> (String, mpsc::Receiver<String>) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut head = Vec::new();
            let mut buf = [0_u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            let _ = tx.send(String::from_utf8_lossy(&head).to_lowercase());
            let _ = stream.write_all(&response);
        });

        (format!("http://{addr}/"), rx)
    }

    /// A `text/plain` response streamed as `chunks` chunks of `size` bytes, without a length.
    fn chunked_response(chunks: usize, size: usize) -> Vec<u8> {
        let mut out = b"HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\n\
            transfer-encoding: chunked\r\nconnection: close\r\n\r\n"
            .to_vec();
        let data = "a".repeat(size);
        for _ in 0..chunks {
            out.extend_from_slice(format!("{size:x}\r\n{data}\r\n").as_bytes());
        }
        out.extend_from_slice(b"0\r\n\r\n");
        out
    }

    fn article_source(config: LoaderConfig) -> ArticleSource {
        ArticleSource::new(build_client(&config).unwrap(), config)
    }

    struct FixedSource {
        text: &'static str,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(text: &'static str) -> Arc<Self> {
            Arc::new(Self {
                text,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ContentSource for FixedSource {
        fn fetch(&self, _url: &str) -> LoadFuture<'_, LoaderResult<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = self.text.to_string();
            Box::pin(async move { Ok(text) })
        }
    }

    #[test]
    fn test_classify_url() {
        assert_eq!(classify_url("https://example.com/post/1"), ContentKind::Article);
        assert_eq!(classify_url("https://www.youtube.com/@someone"), ContentKind::Article);
        assert_eq!(classify_url("garbage"), ContentKind::Article);
        assert_eq!(
            classify_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            ContentKind::Youtube
        );
        assert_eq!(classify_url("https://youtu.be/dQw4w9WgXcQ"), ContentKind::Youtube);
    }

    #[tokio::test]
    async fn test_load_dispatches_by_kind() {
        let article = FixedSource::new("article body");
        let video = FixedSource::new("transcript body");
        let loader = ContentLoader::with_sources(article.clone(), video.clone());

        let loaded = loader.load("https://example.com/a").await;
        assert!(matches!(
            loaded,
            Ok(LoadedContent { ref text, kind: ContentKind::Article }) if text == "article body"
        ));

        let loaded = loader.load("https://youtu.be/dQw4w9WgXcQ").await;
        assert!(matches!(
            loaded,
            Ok(LoadedContent { ref text, kind: ContentKind::Youtube }) if text == "transcript body"
        ));

        assert_eq!(article.calls.load(Ordering::SeqCst), 1);
        assert_eq!(video.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_rejects_empty_text() {
        let loader = ContentLoader::with_sources(FixedSource::new("  \n "), FixedSource::new(""));
        let result = loader.load("https://example.com/empty").await;
        assert!(matches!(result, Err(LoaderError::EmptyContent)));
    }

    #[test]
    fn test_loader_creation() {
        assert!(ContentLoader::new(&LoaderConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_chunked_body_over_limit_is_too_large() {
        let (url, _head) = serve_once(chunked_response(10, 1000));
        let source = article_source(LoaderConfig {
            max_content_length: 100,
            ..LoaderConfig::default()
        });

        let result = source.fetch(&url).await;
        assert!(matches!(result, Err(LoaderError::TooLarge(n)) if n > 100));
    }

    #[tokio::test]
    async fn test_chunked_body_within_limit_is_read() {
        let (url, _head) = serve_once(chunked_response(3, 10));
        let source = article_source(LoaderConfig {
            max_content_length: 100,
            ..LoaderConfig::default()
        });

        let text = source.fetch(&url).await.unwrap();
        assert_eq!(text, "a".repeat(30));
    }

    #[tokio::test]
    async fn test_user_agent_comes_from_config_rotation() {
        let (url, head) = serve_once(chunked_response(1, 5));
        let source = article_source(LoaderConfig {
            user_agents: vec!["SummarizerTest/1.0".to_string()],
            ..LoaderConfig::default()
        });

        assert!(source.fetch(&url).await.is_ok());
        let head = head.recv().unwrap();
        assert!(head.contains("user-agent: summarizertest/1.0"));
    }
}
