//! GitHub REST client
//!
//! Read-only access to repository metadata and file contents. Transient
//! failures (5xx, transport errors) are retried with exponential backoff;
//! auth, not-found and rate-limit failures surface immediately.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::GithubConfig;
use crate::constants::github as gh;
use crate::types::{
    ContentEntry, EntryKind, ErrorCategory, FileSnapshot, RepoIdentifier, RepolyzeError,
    RepositoryInfo, Result, unique_files,
};

const SERVICE: &str = "github";

/// Client for the GitHub REST API
///
/// The token is optional at construction so that commands which never touch
/// GitHub still work; every request checks for it first.
pub struct GitHubClient {
    token: Option<SecretString>,
    api_base: Url,
    max_file_size: u64,
    max_retries: usize,
    retry_delay: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base.as_str())
            .field("max_file_size", &self.max_file_size)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl GitHubClient {
    pub fn new(config: &GithubConfig, token: Option<SecretString>) -> Result<Self> {
        let api_base = Url::parse(&config.api_base).map_err(|e| {
            RepolyzeError::Config(format!(
                "Invalid github.api_base '{}': {}",
                config.api_base, e
            ))
        })?;
        if !matches!(api_base.scheme(), "http" | "https") || api_base.cannot_be_a_base() {
            return Err(RepolyzeError::Config(format!(
                "github.api_base must be an http(s) URL, got: {}",
                config.api_base
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(gh::ACCEPT));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(gh::API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("repolyze/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                RepolyzeError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            token: token.filter(|t| !t.expose_secret().trim().is_empty()),
            api_base,
            max_file_size: config.max_file_size,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(gh::BASE_DELAY_MS),
            client,
        })
    }

    /// Override the first backoff delay
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Repository metadata plus the top-level contents listing
    pub async fn fetch_repository(&self, repo: &RepoIdentifier) -> Result<RepositoryInfo> {
        info!("Fetching repository {}", repo);

        let meta: RepoResponse = self
            .get_json(&["repos", repo.owner(), repo.name()], &repo.full_name())
            .await?;

        let contents = match self.list_directory(repo, None).await {
            Ok(entries) => entries,
            // Empty repositories answer 404 on the contents endpoint
            Err(RepolyzeError::NotFound(msg)) => {
                debug!("No contents for {}: {}", repo, msg);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        Ok(RepositoryInfo {
            repo: repo.clone(),
            name: meta.name,
            full_name: meta.full_name,
            description: meta.description,
            language: meta.language,
            stars: meta.stargazers_count,
            default_branch: meta.default_branch,
            contents,
        })
    }

    /// File entries of the directory at `path_filter` (root when `None`)
    ///
    /// When `path_filter` names a file, that single entry is returned.
    pub async fn list_files(
        &self,
        repo: &RepoIdentifier,
        path_filter: Option<&str>,
    ) -> Result<Vec<ContentEntry>> {
        let entries = self.list_directory(repo, path_filter).await?;
        Ok(entries.into_iter().filter(ContentEntry::is_file).collect())
    }

    /// Download and decode one file
    pub async fn fetch_file(&self, repo: &RepoIdentifier, path: &str) -> Result<FileSnapshot> {
        let path = normalize_path(path);
        if path.is_empty() {
            return Err(RepolyzeError::analysis(path, "empty file path"));
        }
        debug!("Fetching {}:{}", repo, path);

        let response: ContentsResponse = self
            .get_json(
                &contents_segments(repo, Some(path)),
                &format!("{}:{}", repo, path),
            )
            .await?;

        let file = match response {
            ContentsResponse::Listing(_) => {
                return Err(RepolyzeError::analysis(path, "path is a directory"));
            }
            ContentsResponse::Item(file) => file,
        };

        if file.kind != EntryKind::File {
            return Err(RepolyzeError::analysis(
                path,
                format!("not a regular file ({:?})", file.kind).to_lowercase(),
            ));
        }

        if file.size > self.max_file_size {
            return Err(RepolyzeError::FileTooLarge {
                path: path.to_string(),
                size: file.size,
                limit: self.max_file_size,
            });
        }

        let content = decode_content(path, file.encoding.as_deref(), file.content.as_deref())?;

        Ok(FileSnapshot {
            path: file.path,
            size: file.size,
            sha: file.sha,
            content,
            fetched_at: Utc::now(),
        })
    }

    /// Fetch every listed file whose extension is in `extensions`
    ///
    /// Library API for callers that want the contents only. Paths are unique
    /// and keep listing order, using the same selection as
    /// [`RepositoryAnalyzer`](crate::pipeline::RepositoryAnalyzer), which
    /// fetches per file so it can record each outcome. Undecodable or
    /// oversized files are skipped; auth, not-found, rate-limit and transport
    /// failures fail the whole call.
    pub async fn fetch_files(
        &self,
        repo: &RepoIdentifier,
        path_filter: Option<&str>,
        extensions: &[String],
    ) -> Result<Vec<FileSnapshot>> {
        let entries = self.list_files(repo, path_filter).await?;
        let wanted = unique_files(&entries, |entry| {
            entry.extension().is_some_and(|ext| {
                extensions
                    .iter()
                    .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            })
        });

        let mut snapshots = Vec::new();
        for entry in wanted {
            match self.fetch_file(repo, &entry.path).await {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) if e.category() == ErrorCategory::Analysis => {
                    warn!("Skipping {}: {}", entry.path, e);
                }
                Err(e) => return Err(e),
            }
        }

        info!("Fetched {} file(s) from {}", snapshots.len(), repo);
        Ok(snapshots)
    }

    // =========================================================================
    // HTTP plumbing
    // =========================================================================

    async fn list_directory(
        &self,
        repo: &RepoIdentifier,
        path_filter: Option<&str>,
    ) -> Result<Vec<ContentEntry>> {
        let path = path_filter.map(normalize_path).filter(|p| !p.is_empty());
        let resource = match path {
            Some(p) => format!("{}:{}", repo, p),
            None => repo.full_name(),
        };

        let response: ContentsResponse = self
            .get_json(&contents_segments(repo, path), &resource)
            .await?;

        Ok(match response {
            ContentsResponse::Listing(entries) => entries,
            ContentsResponse::Item(file) => vec![ContentEntry {
                name: file.name,
                path: file.path,
                kind: file.kind,
                size: file.size,
            }],
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| RepolyzeError::Config("github.api_base cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], resource: &str) -> Result<T> {
        let token = self.token.as_ref().ok_or_else(|| {
            RepolyzeError::auth(
                SERVICE,
                "GITHUB_TOKEN is not set. Export it or add it to .env",
            )
        })?;
        let url = self.endpoint(segments)?;

        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_delay)
            .with_max_delay(Duration::from_secs(gh::MAX_DELAY_SECS))
            .with_factor(2.0)
            .with_max_times(self.max_retries);

        (|| self.get_once(url.clone(), token, resource))
            .retry(backoff)
            .when(|e: &RepolyzeError| e.is_retryable())
            .notify(|e: &RepolyzeError, delay: Duration| {
                warn!("GitHub request failed ({}), retrying in {:?}", e, delay);
            })
            .await
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: Url,
        token: &SecretString,
        resource: &str,
    ) -> Result<T> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| RepolyzeError::network(SERVICE, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                RepolyzeError::upstream(SERVICE, format!("unexpected response body: {}", e))
            });
        }

        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &headers, &body, resource))
    }
}

// =============================================================================
// Response mapping
// =============================================================================

fn classify_failure(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
    resource: &str,
) -> RepolyzeError {
    let message = serde_json::from_str::<ApiError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());

    let quota_exhausted = header_str(headers, "x-ratelimit-remaining") == Some("0");

    match status.as_u16() {
        429 => rate_limited(headers, message),
        403 if quota_exhausted => rate_limited(headers, message),
        404 => RepolyzeError::NotFound(format!("{} ({})", resource, message)),
        code => RepolyzeError::from_http_status(SERVICE, code, message),
    }
}

fn rate_limited(headers: &HeaderMap, message: String) -> RepolyzeError {
    let reset_at = header_str(headers, "x-ratelimit-reset")
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

    RepolyzeError::RateLimit {
        service: SERVICE.to_string(),
        message,
        reset_at,
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn decode_content(path: &str, encoding: Option<&str>, content: Option<&str>) -> Result<String> {
    match encoding {
        Some("base64") => {}
        other => {
            return Err(RepolyzeError::analysis(
                path,
                format!("unsupported content encoding: {}", other.unwrap_or("none")),
            ));
        }
    }

    let compact: String = content
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| RepolyzeError::analysis(path, format!("invalid base64 content: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|_| RepolyzeError::analysis(path, "file is not valid UTF-8 text"))
}

fn normalize_path(path: &str) -> &str {
    path.trim().trim_matches('/')
}

fn contents_segments<'a>(repo: &'a RepoIdentifier, path: Option<&'a str>) -> Vec<&'a str> {
    let mut segments = vec!["repos", repo.owner(), repo.name(), "contents"];
    if let Some(path) = path {
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
    }
    segments
}

// =============================================================================
// API payloads
// =============================================================================

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    full_name: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default = "default_branch")]
    default_branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentEntry>),
    Item(FileContent),
}

#[derive(Debug, Deserialize)]
struct FileContent {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: EntryKind,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    sha: String,
    encoding: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> GithubConfig {
        GithubConfig {
            api_base: server.uri(),
            ..GithubConfig::default()
        }
    }

    fn client_for(server: &MockServer) -> GitHubClient {
        GitHubClient::new(
            &config_for(server),
            Some(SecretString::from("ghp_test".to_string())),
        )
        .unwrap()
        .with_retry_delay(Duration::from_millis(1))
    }

    fn repo() -> RepoIdentifier {
        RepoIdentifier::parse("octocat/hello").unwrap()
    }

    /// GitHub wraps base64 content at 60 columns
    fn wrapped_base64(text: &str) -> String {
        let encoded = BASE64.encode(text);
        encoded
            .as_bytes()
            .chunks(60)
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn file_body(path: &str, text: &str) -> serde_json::Value {
        json!({
            "name": path.rsplit('/').next().unwrap(),
            "path": path,
            "type": "file",
            "size": text.len(),
            "sha": "abc123",
            "encoding": "base64",
            "content": wrapped_base64(text),
        })
    }

    #[tokio::test]
    async fn test_fetch_repository() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .and(header("authorization", "Bearer ghp_test"))
            .and(header("x-github-api-version", "2022-11-28"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "hello",
                "full_name": "octocat/hello",
                "description": "A demo",
                "language": "Python",
                "stargazers_count": 42,
                "default_branch": "main"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "main.py", "path": "main.py", "type": "file", "size": 10},
                {"name": "pkg", "path": "pkg", "type": "dir", "size": 0}
            ])))
            .mount(&server)
            .await;

        let info = client_for(&server).fetch_repository(&repo()).await.unwrap();
        assert_eq!(info.full_name, "octocat/hello");
        assert_eq!(info.stars, 42);
        assert_eq!(info.language.as_deref(), Some("Python"));
        assert_eq!(info.contents.len(), 2);
        assert_eq!(info.files().count(), 1);
    }

    #[tokio::test]
    async fn test_empty_repository_has_no_contents() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "hello",
                "full_name": "octocat/hello",
                "description": null,
                "language": null,
                "stargazers_count": 0,
                "default_branch": "main"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"message": "This repository is empty."})),
            )
            .mount(&server)
            .await;

        let info = client_for(&server).fetch_repository(&repo()).await.unwrap();
        assert!(info.contents.is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_request() {
        let server = MockServer::start().await;
        let client = GitHubClient::new(&config_for(&server), None).unwrap();

        let err = client.fetch_repository(&repo()).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Auth);

        let blank = GitHubClient::new(
            &config_for(&server),
            Some(SecretString::from("   ".to_string())),
        )
        .unwrap();
        let err = blank.fetch_file(&repo(), "main.py").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Auth);

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_repository(&repo()).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.to_string().contains("octocat/hello"));
    }

    #[tokio::test]
    async fn test_bad_credentials_is_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_repository(&repo()).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[tokio::test]
    async fn test_forbidden_without_quota_header_is_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "4999")
                    .set_body_json(json!({"message": "Resource not accessible"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_repository(&repo()).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Auth);
    }

    #[tokio::test]
    async fn test_rate_limit_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", "1700000000")
                    .set_body_json(json!({"message": "API rate limit exceeded"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_repository(&repo()).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::RateLimit);
        match err {
            RepolyzeError::RateLimit { reset_at, .. } => {
                assert_eq!(reset_at.map(|t| t.timestamp()), Some(1_700_000_000));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_retried_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents/app.py"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents/app.py"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_body("app.py", "x = 1\n")))
            .mount(&server)
            .await;

        let snapshot = client_for(&server).fetch_file(&repo(), "app.py").await.unwrap();
        assert_eq!(snapshot.content, "x = 1\n");
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_server_error_exhausts_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1 + GithubConfig::default().max_retries as u64)
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_file(&repo(), "app.py").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Upstream);
    }

    #[tokio::test]
    async fn test_fetch_file_decodes_wrapped_base64() {
        let server = MockServer::start().await;
        let source = "def main():\n    print('hello, world')\n\n".repeat(10);
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents/src/app/main.py"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(file_body("src/app/main.py", &source)),
            )
            .mount(&server)
            .await;

        let snapshot = client_for(&server)
            .fetch_file(&repo(), "/src/app/main.py")
            .await
            .unwrap();
        assert_eq!(snapshot.path, "src/app/main.py");
        assert_eq!(snapshot.content, source);
        assert_eq!(snapshot.sha, "abc123");
    }

    #[tokio::test]
    async fn test_fetch_file_rejects_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "a.py", "path": "pkg/a.py", "type": "file", "size": 1}
            ])))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_file(&repo(), "pkg").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Analysis);
        assert!(err.to_string().contains("directory"));
    }

    #[tokio::test]
    async fn test_fetch_file_too_large() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "big.py",
                "path": "big.py",
                "type": "file",
                "size": 5_000_000,
                "sha": "def",
                "encoding": "none",
                "content": ""
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_file(&repo(), "big.py").await.unwrap_err();
        assert!(matches!(err, RepolyzeError::FileTooLarge { size: 5_000_000, .. }));
    }

    #[tokio::test]
    async fn test_fetch_file_rejects_binary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "blob.py",
                "path": "blob.py",
                "type": "file",
                "size": 3,
                "sha": "def",
                "encoding": "base64",
                "content": BASE64.encode([0xff, 0xfe, 0x00]),
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_file(&repo(), "blob.py").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Analysis);
        assert!(err.to_string().contains("UTF-8"));
    }

    #[tokio::test]
    async fn test_fetch_files_filters_and_dedupes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "main.py", "path": "main.py", "type": "file", "size": 6},
                {"name": "README.md", "path": "README.md", "type": "file", "size": 6},
                {"name": "main.py", "path": "main.py", "type": "file", "size": 6},
                {"name": "util.PY", "path": "util.PY", "type": "file", "size": 6},
                {"name": "pkg", "path": "pkg", "type": "dir", "size": 0}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents/main.py"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_body("main.py", "a = 1\n")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents/util.PY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_body("util.PY", "b = 2\n")))
            .expect(1)
            .mount(&server)
            .await;

        let files = client_for(&server)
            .fetch_files(&repo(), None, &["py".to_string()])
            .await
            .unwrap();

        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["main.py", "util.PY"]);
        assert!(files.iter().all(|f| !f.content.is_empty()));
    }

    #[tokio::test]
    async fn test_fetch_files_fails_whole_on_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "a.py", "path": "a.py", "type": "file", "size": 6},
                {"name": "b.py", "path": "b.py", "type": "file", "size": 6}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents/a.py"))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_body("a.py", "a = 1\n")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents/b.py"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_files(&repo(), None, &["py".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Auth);
    }

    #[tokio::test]
    async fn test_list_files_under_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/contents/pkg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "core.py", "path": "pkg/core.py", "type": "file", "size": 6},
                {"name": "sub", "path": "pkg/sub", "type": "dir", "size": 0}
            ])))
            .mount(&server)
            .await;

        let files = client_for(&server)
            .list_files(&repo(), Some("pkg/"))
            .await
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "pkg/core.py");
    }

    #[test]
    fn test_invalid_api_base() {
        let config = GithubConfig {
            api_base: "ftp://example.com".to_string(),
            ..GithubConfig::default()
        };
        assert!(matches!(
            GitHubClient::new(&config, None),
            Err(RepolyzeError::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = GitHubClient::new(
            &GithubConfig::default(),
            Some(SecretString::from("ghp_secret".to_string())),
        )
        .unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
