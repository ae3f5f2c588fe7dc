use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Instrument;

use crate::api::cache::{QueryCache, Tag};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::sanitize::{describe_data_uri, mask_token, redact_url, truncate_body};
use crate::session::Session;

pub(crate) enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`; values may hold credentials.
    Form(Vec<(&'static str, String)>),
    Multipart(Form),
}

impl RequestBody {
    fn summary(&self) -> String {
        match self {
            RequestBody::Empty => "empty".to_string(),
            RequestBody::Json(value) => match value {
                serde_json::Value::Object(map) => {
                    let fields: Vec<String> = map
                        .iter()
                        .map(|(key, value)| match value.as_str() {
                            Some(uri) if uri.starts_with("data:") => {
                                format!("{}={}", key, describe_data_uri(uri))
                            }
                            _ => key.clone(),
                        })
                        .collect();
                    format!("json {{{}}}", fields.join(", "))
                }
                _ => "json".to_string(),
            },
            RequestBody::Form(_) => "form".to_string(),
            RequestBody::Multipart(_) => "multipart".to_string(),
        }
    }
}

/// HTTP client for the farm service. Injects the session's bearer token,
/// serves cached reads and applies invalidation tags after mutations.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
    cache: Arc<QueryCache>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &redact_url(&self.base_url))
            .field("authenticated", &self.session.is_authenticated())
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
            .timeout(Duration::from_secs(config.http.request_timeout_secs))
            .user_agent(concat!("coffeefarm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        let cache = QueryCache::new(
            Duration::from_secs(config.cache.ttl_secs),
            config.cache.max_entries,
        );

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
            cache: Arc::new(cache),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Drops cached queries matching `tags` so the next read refetches.
    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        self.cache.invalidate(tags)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Cached GET. `provides` is computed from the decoded response so
    /// list queries can tag every entity they returned.
    pub(crate) async fn query<T, Q, F>(
        &self,
        path: &str,
        params: Option<&Q>,
        provides: F,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Serialize,
        Q: Serialize + ?Sized,
        F: FnOnce(&T) -> Vec<Tag>,
    {
        let params = params.map(to_query_value).transpose()?;
        let key = cache_key(path, params.as_ref());

        if let Some(hit) = self.cache.get::<T>(&key) {
            return Ok(hit);
        }

        let response = self
            .send(Method::GET, path, params.as_ref(), RequestBody::Empty)
            .await?;
        let value: T = decode(response, path).await?;
        self.cache.insert(&key, &value, provides(&value));
        Ok(value)
    }

    /// Uncached GET, for one-off reads such as the dev endpoints.
    pub(crate) async fn fetch<T, Q>(&self, path: &str, params: Option<&Q>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let params = params.map(to_query_value).transpose()?;
        let response = self
            .send(Method::GET, path, params.as_ref(), RequestBody::Empty)
            .await?;
        decode(response, path).await
    }

    /// Non-GET call. `invalidates` is applied only when the call succeeds,
    /// and may depend on the decoded response.
    pub(crate) async fn mutate<T, F>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        invalidates: F,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: FnOnce(&T) -> Vec<Tag>,
    {
        let response = self.send(method, path, None, body).await?;
        let value: T = decode(response, path).await?;
        self.cache.invalidate(&invalidates(&value));
        Ok(value)
    }

    /// Like [`ApiClient::mutate`] with query-string parameters and no body.
    pub(crate) async fn mutate_with_params<T, Q>(
        &self,
        method: Method,
        path: &str,
        params: &Q,
        invalidates: &[Tag],
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let params = to_query_value(params)?;
        let response = self
            .send(method, path, Some(&params), RequestBody::Empty)
            .await?;
        let value: T = decode(response, path).await?;
        self.cache.invalidate(invalidates);
        Ok(value)
    }

    /// Mutation whose response body is ignored, e.g. DELETE.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        invalidates: &[Tag],
    ) -> Result<(), ApiError> {
        self.send(method, path, None, RequestBody::Empty).await?;
        self.cache.invalidate(invalidates);
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: Option<&serde_json::Value>,
        body: RequestBody,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let span = tracing::info_span!("api.request", method = %method, path = %path);

        async move {
            debug!(
                "{} {} body={}",
                method,
                redact_url(&url),
                body.summary()
            );

            let mut request = self.http.request(method.clone(), &url);
            if let Some(params) = params {
                request = request.query(params);
            }
            if let Some(token) = self.session.bearer_token() {
                debug!("Authorizing with token {}", mask_token(token.expose_secret()));
                request = request.bearer_auth(token.expose_secret());
            }
            request = match body {
                RequestBody::Empty => request,
                RequestBody::Json(value) => request.json(&value),
                RequestBody::Form(fields) => request.form(&fields),
                RequestBody::Multipart(form) => request.multipart(form),
            };

            let started = Instant::now();
            let response = request.send().await.map_err(|e| {
                warn!("{} {} failed after {:?}: {}", method, path, started.elapsed(), e);
                transport_error(&e)
            })?;

            let status = response.status();
            let elapsed = started.elapsed();
            if status.is_success() {
                info!("{} {} -> {} in {:?}", method, path, status.as_u16(), elapsed);
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(&body);
            warn!(
                "{} {} -> {} in {:?}: {}",
                method,
                path,
                status.as_u16(),
                elapsed,
                log_reason(status, detail.as_deref(), &body)
            );
            Err(ApiError::Rejected {
                status: status.as_u16(),
                detail,
            })
        }
        .instrument(span)
        .await
    }
}

fn to_query_value<Q: Serialize + ?Sized>(params: &Q) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(params).map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

fn cache_key(path: &str, params: Option<&serde_json::Value>) -> String {
    match params {
        Some(serde_json::Value::Object(map)) if !map.is_empty() => {
            format!("GET {}?{}", path, serde_json::Value::Object(map.clone()))
        }
        _ => format!("GET {}", path),
    }
}

pub(crate) fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

async fn decode<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(|e| transport_error(&e))?;
    // DELETE and some POSTs answer with an empty body.
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &bytes
    };
    serde_json::from_slice(bytes).map_err(|e| ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

fn transport_error(e: &reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Transport("Request timed out".to_string())
    } else if e.is_connect() {
        ApiError::Transport("Could not connect to the server".to_string())
    } else if e.is_decode() {
        ApiError::Transport(format!("Could not read the server response: {}", e))
    } else {
        ApiError::Transport(e.to_string())
    }
}

/// Reason the server gave in a JSON error body. FastAPI sends
/// `{"detail": "..."}` or, for validation failures,
/// `{"detail": [{"loc": [...], "msg": "..."}]}`. Anything else (HTML
/// error pages, empty bodies) yields `None`.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    match json.get("detail") {
        Some(serde_json::Value::String(detail)) if !detail.trim().is_empty() => {
            return Some(truncate_body(detail));
        }
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let field = item
                        .get("loc")
                        .and_then(|loc| loc.as_array())
                        .and_then(|loc| loc.last())
                        .and_then(|last| last.as_str());
                    Some(match field {
                        Some(field) => format!("{}: {}", field, msg),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if !messages.is_empty() {
                return Some(truncate_body(&messages.join("; ")));
            }
        }
        _ => {}
    }
    json.get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.trim().is_empty())
        .map(truncate_body)
}

/// Log line for a rejection: the parsed reason, else the truncated raw
/// body, else the status reason phrase.
fn log_reason(status: StatusCode, detail: Option<&str>, body: &str) -> String {
    if let Some(detail) = detail {
        return detail.to_string();
    }
    if body.trim().is_empty() {
        return status.canonical_reason().unwrap_or_default().to_string();
    }
    truncate_body(body)
}
