//! HTTP GET with a transparent on-disk response cache.
//!
//! Each URL maps to two files under the cache directory, keyed by the SHA-256
//! of the URL: `<key>.html` holds the body and `<key>.json` the [`CacheMeta`].
//! The metadata file is written last, so an entry without it is treated as a
//! miss.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};
use url::Url;

use ariacrawl_shared::{AriaCrawlError, CacheMode, FetchConfig, Result};

/// User-Agent string for fetch requests.
const USER_AGENT: &str = concat!("ariacrawl/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

// ---------------------------------------------------------------------------
// Cache entries
// ---------------------------------------------------------------------------

/// Sidecar metadata stored next to each cached body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    /// The URL that was fetched.
    pub url: String,
    /// When the response was stored.
    pub fetched_at: DateTime<Utc>,
    /// HTTP status of the stored response.
    pub status: u16,
    /// SHA-256 of the body, checked on every read.
    pub content_hash: String,
    /// Body length in bytes.
    pub content_len: usize,
}

struct CacheEntry {
    body_path: PathBuf,
    meta_path: PathBuf,
}

impl CacheEntry {
    fn for_url(dir: &Path, url: &Url) -> Self {
        let key = compute_hash(url.as_str());
        Self {
            body_path: dir.join(format!("{key}.html")),
            meta_path: dir.join(format!("{key}.json")),
        }
    }

    /// Read a cached body. Missing, unreadable, or tampered entries are misses.
    async fn read(&self) -> Result<Option<String>> {
        let Some(raw_meta) = read_optional(&self.meta_path).await? else {
            return Ok(None);
        };

        let meta: CacheMeta = match serde_json::from_str(&raw_meta) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(path = ?self.meta_path, error = %e, "unreadable cache metadata, ignoring entry");
                return Ok(None);
            }
        };

        let Some(body) = read_optional(&self.body_path).await? else {
            return Ok(None);
        };

        if compute_hash(&body) != meta.content_hash {
            warn!(url = %meta.url, "cached body does not match recorded hash, ignoring entry");
            return Ok(None);
        }

        debug!(url = %meta.url, fetched_at = %meta.fetched_at, "cache hit");
        Ok(Some(body))
    }

    async fn write(&self, url: &Url, status: u16, body: &str) -> Result<()> {
        if let Some(parent) = self.body_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AriaCrawlError::io(parent, e))?;
        }

        let meta = CacheMeta {
            url: url.to_string(),
            fetched_at: Utc::now(),
            status,
            content_hash: compute_hash(body),
            content_len: body.len(),
        };

        tokio::fs::write(&self.body_path, body)
            .await
            .map_err(|e| AriaCrawlError::io(&self.body_path, e))?;
        tokio::fs::write(&self.meta_path, serde_json::to_string_pretty(&meta)?)
            .await
            .map_err(|e| AriaCrawlError::io(&self.meta_path, e))?;

        debug!(path = ?self.body_path, bytes = body.len(), "stored response in cache");
        Ok(())
    }
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AriaCrawlError::io(path, e)),
    }
}

// ---------------------------------------------------------------------------
// CachedFetcher
// ---------------------------------------------------------------------------

/// Outcome of a single request attempt.
enum Attempt {
    /// Transport failure or 5xx; worth another try.
    Retry(AriaCrawlError),
    /// Anything else; give up immediately.
    Fail(AriaCrawlError),
}

/// HTTP client with on-disk caching and bounded retries.
pub struct CachedFetcher {
    config: FetchConfig,
    client: Client,
}

impl CachedFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AriaCrawlError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// The cache policy this fetcher applies.
    pub fn cache_mode(&self) -> CacheMode {
        self.config.cache_mode
    }

    /// Fetch `url` as text, honoring the configured [`CacheMode`].
    #[instrument(skip_all, fields(url = %url, mode = ?self.config.cache_mode))]
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        let entry = CacheEntry::for_url(&self.config.cache_dir, url);

        match self.config.cache_mode {
            CacheMode::Default => {
                if let Some(body) = entry.read().await? {
                    return Ok(body);
                }
            }
            CacheMode::OnlyIfCached => {
                return entry
                    .read()
                    .await?
                    .ok_or_else(|| AriaCrawlError::Cache(format!("no cached response for {url}")));
            }
            CacheMode::NoStore | CacheMode::Reload => {}
        }

        let (status, body) = self.get_with_retry(url).await?;
        info!(status, bytes = body.len(), "fetched document");

        if self.config.cache_mode != CacheMode::NoStore {
            entry.write(url, status, &body).await?;
        }

        Ok(body)
    }

    async fn get_with_retry(&self, url: &Url) -> Result<(u16, String)> {
        let mut attempt: u32 = 0;
        loop {
            match self.get_once(url).await {
                Ok(response) => return Ok(response),
                Err(Attempt::Retry(e)) if attempt < self.config.retries => {
                    attempt += 1;
                    let delay = self.config.retry_backoff_ms * u64::from(attempt);
                    warn!(%url, attempt, delay_ms = delay, error = %e, "request failed, retrying");
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(Attempt::Retry(e) | Attempt::Fail(e)) => return Err(e),
            }
        }
    }

    async fn get_once(&self, url: &Url) -> std::result::Result<(u16, String), Attempt> {
        debug!(%url, "sending request");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| Attempt::Retry(AriaCrawlError::Network(format!("{url}: {e}"))))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(Attempt::Retry(AriaCrawlError::Network(format!(
                "{url}: HTTP {status}"
            ))));
        }
        if !status.is_success() {
            return Err(Attempt::Fail(AriaCrawlError::Network(format!(
                "{url}: HTTP {status}"
            ))));
        }

        let body = response.text().await.map_err(|e| {
            Attempt::Retry(AriaCrawlError::Network(format!("{url}: body read failed: {e}")))
        })?;

        Ok((status.as_u16(), body))
    }
}

/// Compute SHA-256 hash of content.
fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod fetch_tests {
    use super::*;
    use uuid::Uuid;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_cache_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ariacrawl-{label}-{}", Uuid::now_v7()))
    }

    fn config(cache_dir: &Path, cache_mode: CacheMode) -> FetchConfig {
        FetchConfig {
            cache_dir: cache_dir.to_path_buf(),
            cache_mode,
            timeout_secs: 5,
            retries: 2,
            retry_backoff_ms: 0,
        }
    }

    fn doc_url(server: &MockServer) -> Url {
        Url::parse(&format!("{}/TR/doc", server.uri())).unwrap()
    }

    #[test]
    fn test_compute_hash() {
        let hash = compute_hash("hello world");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_cache_entry_paths_keyed_by_url() {
        let dir = Path::new("/tmp/cache");
        let a = CacheEntry::for_url(dir, &Url::parse("https://www.w3.org/TR/html-aria").unwrap());
        let b = CacheEntry::for_url(dir, &Url::parse("https://www.w3.org/TR/wai-aria-1.1").unwrap());
        assert_ne!(a.body_path, b.body_path);
        assert_eq!(a.body_path.extension().unwrap(), "html");
        assert_eq!(a.meta_path.extension().unwrap(), "json");
        assert_eq!(a.body_path.file_stem(), a.meta_path.file_stem());
    }

    #[tokio::test]
    async fn test_second_fetch_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/TR/doc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>doc</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = temp_cache_dir("hit");
        let fetcher = CachedFetcher::new(config(&dir, CacheMode::Default)).unwrap();
        let url = doc_url(&server);

        assert_eq!(fetcher.fetch(&url).await.unwrap(), "<html>doc</html>");
        assert_eq!(fetcher.fetch(&url).await.unwrap(), "<html>doc</html>");

        let entry = CacheEntry::for_url(&dir, &url);
        let meta: CacheMeta =
            serde_json::from_str(&std::fs::read_to_string(&entry.meta_path).unwrap()).unwrap();
        assert_eq!(meta.status, 200);
        assert_eq!(meta.content_len, "<html>doc</html>".len());
        assert_eq!(meta.url, url.to_string());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_no_store_never_writes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/TR/doc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fresh"))
            .expect(2)
            .mount(&server)
            .await;

        let dir = temp_cache_dir("nostore");
        let fetcher = CachedFetcher::new(config(&dir, CacheMode::NoStore)).unwrap();
        let url = doc_url(&server);

        fetcher.fetch(&url).await.unwrap();
        fetcher.fetch(&url).await.unwrap();
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_reload_refetches_and_overwrites() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/TR/doc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("v1"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/TR/doc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("v2"))
            .mount(&server)
            .await;

        let dir = temp_cache_dir("reload");
        let url = doc_url(&server);

        let warm = CachedFetcher::new(config(&dir, CacheMode::Default)).unwrap();
        assert_eq!(warm.fetch(&url).await.unwrap(), "v1");

        let reload = CachedFetcher::new(config(&dir, CacheMode::Reload)).unwrap();
        assert_eq!(reload.fetch(&url).await.unwrap(), "v2");

        let cached = CachedFetcher::new(config(&dir, CacheMode::OnlyIfCached)).unwrap();
        assert_eq!(cached.fetch(&url).await.unwrap(), "v2");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_only_if_cached_miss_is_cache_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("unused"))
            .expect(0)
            .mount(&server)
            .await;

        let dir = temp_cache_dir("offline");
        let fetcher = CachedFetcher::new(config(&dir, CacheMode::OnlyIfCached)).unwrap();
        let err = fetcher.fetch(&doc_url(&server)).await.unwrap_err();
        assert!(matches!(err, AriaCrawlError::Cache(_)));
    }

    #[tokio::test]
    async fn test_tampered_cache_entry_is_refetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/TR/doc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("original"))
            .expect(2)
            .mount(&server)
            .await;

        let dir = temp_cache_dir("tamper");
        let fetcher = CachedFetcher::new(config(&dir, CacheMode::Default)).unwrap();
        let url = doc_url(&server);

        fetcher.fetch(&url).await.unwrap();
        std::fs::write(CacheEntry::for_url(&dir, &url).body_path, "tampered").unwrap();
        assert_eq!(fetcher.fetch(&url).await.unwrap(), "original");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/TR/doc"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/TR/doc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = temp_cache_dir("retry");
        let fetcher = CachedFetcher::new(config(&dir, CacheMode::NoStore)).unwrap();
        assert_eq!(fetcher.fetch(&doc_url(&server)).await.unwrap(), "recovered");
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/TR/doc"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let dir = temp_cache_dir("notfound");
        let fetcher = CachedFetcher::new(config(&dir, CacheMode::Default)).unwrap();
        let err = fetcher.fetch(&doc_url(&server)).await.unwrap_err();
        assert!(matches!(err, AriaCrawlError::Network(_)));
        assert!(err.to_string().contains("404"));
        assert!(!dir.exists());
    }
}
