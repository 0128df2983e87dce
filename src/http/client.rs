//! REST API client
//!
//! Issues JSON requests against the backend, attaches the bearer credential,
//! and normalizes every failure into a `CorkboardError`. A 401 on an
//! authenticated request triggers one silent token refresh followed by a
//! replay; concurrent 401s share a single refresh through `SingleFlight`.

use super::session::Session;
use super::single_flight::SingleFlight;
use super::transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
use crate::config::ApiConfig;
use crate::{CorkboardError, Result};
use kanban_api::{endpoints, ErrorBody, RefreshResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether a request carries the access credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Attach `Authorization: Bearer <token>` and refresh on 401
    Bearer,
    /// Send without credential (login, register, refresh)
    Anonymous,
}

/// Successful response payload
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    /// 204 or an empty 2xx body
    NoContent,
}

impl ResponseBody {
    /// Decode the JSON payload into `T`
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            ResponseBody::Json(value) => Ok(serde_json::from_value(value)?),
            ResponseBody::NoContent => Err(CorkboardError::UnexpectedResponse { status: 204 }),
        }
    }

    pub fn is_no_content(&self) -> bool {
        matches!(self, ResponseBody::NoContent)
    }
}

/// Authenticated JSON client for the Kanban API
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    refresh: SingleFlight<Option<String>>,
}

impl ApiClient {
    /// Create a client over an explicit transport
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            session,
            refresh: SingleFlight::new(),
        }
    }

    /// Create a reqwest-backed client from config
    pub fn from_config(config: &ApiConfig, session: Arc<Session>) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::new(&config.base_url, Arc::new(transport), session))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session shared with this client
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn get(&self, path: &str, auth: Auth) -> Result<ResponseBody> {
        self.send(Method::Get, path, None, auth).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<ResponseBody> {
        let body = serde_json::to_value(body)?;
        self.send(Method::Post, path, Some(body), auth).await
    }

    /// POST without a request body
    pub async fn post_empty(&self, path: &str, auth: Auth) -> Result<ResponseBody> {
        self.send(Method::Post, path, None, auth).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<ResponseBody> {
        let body = serde_json::to_value(body)?;
        self.send(Method::Put, path, Some(body), auth).await
    }

    pub async fn delete(&self, path: &str, auth: Auth) -> Result<ResponseBody> {
        self.send(Method::Delete, path, None, auth).await
    }

    /// Restore the session from the refresh cookie
    ///
    /// Used at startup, when no access token is held in memory yet.
    pub async fn refresh_session(&self) -> Result<()> {
        match self.refresh_access_token().await {
            Some(_) => Ok(()),
            None => Err(CorkboardError::SessionExpired),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        auth: Auth,
    ) -> Result<ResponseBody> {
        let token = match auth {
            Auth::Bearer => self.session.access_token(),
            Auth::Anonymous => None,
        };

        debug!(%method, path, "Sending request");
        let response = self
            .transport
            .send(self.request(method, path, body.clone(), token.clone()))
            .await?;

        if response.status != 401 || auth == Auth::Anonymous {
            return handle_response(method, path, response);
        }

        debug!(%method, path, "Access token rejected, refreshing");
        self.recover_session(token.as_deref()).await?;

        let replay = self
            .transport
            .send(self.request(method, path, body, self.session.access_token()))
            .await?;

        if replay.status == 401 {
            warn!(%method, path, "Request still unauthorized after refresh");
            self.session.clear();
            return Err(CorkboardError::SessionExpired);
        }

        handle_response(method, path, replay)
    }

    /// Make sure the session holds a token newer than `stale`
    async fn recover_session(&self, stale: Option<&str>) -> Result<()> {
        if let Some(current) = self.session.access_token() {
            if Some(current.as_str()) != stale {
                debug!("Token was refreshed by another request, replaying");
                return Ok(());
            }
        }

        self.refresh_session().await
    }

    async fn refresh_access_token(&self) -> Option<String> {
        let transport = Arc::clone(&self.transport);
        let session = Arc::clone(&self.session);
        let url = self.url(endpoints::auth::REFRESH);

        self.refresh
            .run(move || async move {
                let request = HttpRequest {
                    method: Method::Post,
                    url,
                    bearer: None,
                    body: None,
                };

                let outcome = match transport.send(request).await {
                    Ok(response) => handle_response(Method::Post, endpoints::auth::REFRESH, response)
                        .and_then(|body| body.into_json::<RefreshResponse>()),
                    Err(e) => Err(e),
                };

                match outcome {
                    Ok(refreshed) => {
                        info!("Access token refreshed");
                        session.set_access_token(refreshed.access_token.clone());
                        if let Some(user) = refreshed.user {
                            session.set_user(user);
                        }
                        Some(refreshed.access_token)
                    }
                    Err(e) => {
                        warn!(error = %e, "Token refresh failed, clearing session");
                        session.clear();
                        None
                    }
                }
            })
            .await
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        bearer: Option<String>,
    ) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url(path),
            bearer,
            body,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.session.is_authenticated())
            .finish()
    }
}

/// Turn a raw response into a payload or an error
fn handle_response(method: Method, path: &str, response: HttpResponse) -> Result<ResponseBody> {
    let is_json = response.is_json();

    if !response.is_success() {
        let message = if is_json {
            let body: ErrorBody = serde_json::from_slice(&response.body).unwrap_or_default();
            body.reason().unwrap_or("Request failed").to_string()
        } else {
            format!("HTTP error! status: {}", response.status)
        };

        debug!(%method, path, status = response.status, %message, "Request failed");
        return Err(CorkboardError::http(response.status, message));
    }

    if response.status == 204 || response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResponseBody::NoContent);
    }

    if is_json {
        return Ok(ResponseBody::Json(serde_json::from_slice(&response.body)?));
    }

    Err(CorkboardError::UnexpectedResponse {
        status: response.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    type Handler = Box<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

    /// Transport answering from a closure and recording every request
    struct ScriptedTransport {
        handler: Handler,
        requests: Mutex<Vec<HttpRequest>>,
        refresh_calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(handler: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static) -> Self {
            Self {
                handler: Box::new(handler),
                requests: Mutex::new(Vec::new()),
                refresh_calls: AtomicUsize::new(0),
            }
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(request.clone());
            if request.url.ends_with(endpoints::auth::REFRESH) {
                self.refresh_calls.fetch_add(1, Ordering::SeqCst);
                // Keep the refresh in flight long enough for others to join
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok((self.handler)(&request))
        }
    }

    fn client(transport: Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new("http://localhost:3000/", transport, Arc::new(Session::new()))
    }

    /// Boards need the "fresh" token; refresh hands it out
    fn refreshing_backend(request: &HttpRequest) -> HttpResponse {
        if request.url.ends_with(endpoints::auth::REFRESH) {
            return HttpResponse::json(200, &json!({ "accessToken": "fresh" }));
        }
        match request.bearer.as_deref() {
            Some("fresh") => HttpResponse::json(200, &json!({ "boards": [] })),
            _ => HttpResponse::json(401, &json!({ "error": "Token expired" })),
        }
    }

    #[tokio::test]
    async fn test_get_attaches_bearer_token() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            HttpResponse::json(200, &json!({ "data": "test" }))
        }));
        let client = client(Arc::clone(&transport));
        client.session().set_access_token("test-token");

        let body = client.get("/test", Auth::Bearer).await.unwrap();

        assert_eq!(body, ResponseBody::Json(json!({ "data": "test" })));
        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://localhost:3000/test");
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].bearer.as_deref(), Some("test-token"));
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_credential() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            HttpResponse::json(200, &json!({}))
        }));
        let client = client(Arc::clone(&transport));
        client.session().set_access_token("test-token");

        client.get("/test", Auth::Anonymous).await.unwrap();

        assert!(transport.requests()[0].bearer.is_none());
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            HttpResponse::json(201, &json!({ "id": 1 }))
        }));
        let client = client(Arc::clone(&transport));

        client
            .post("/api/boards", &json!({ "title": "New" }), Auth::Bearer)
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].body, Some(json!({ "title": "New" })));
    }

    #[tokio::test]
    async fn test_error_message_from_json_body() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            HttpResponse::json(400, &json!({ "error": "Invalid request" }))
        }));

        let err = client(transport).get("/test", Auth::Bearer).await.unwrap_err();

        assert!(matches!(err, CorkboardError::Http { status: 400, .. }));
        assert_eq!(err.to_string(), "Invalid request");
    }

    #[tokio::test]
    async fn test_error_message_falls_back_to_message_field() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            HttpResponse::json(409, &json!({ "message": "Conflict" }))
        }));

        let err = client(transport).get("/test", Auth::Bearer).await.unwrap_err();
        assert_eq!(err.to_string(), "Conflict");
    }

    #[tokio::test]
    async fn test_non_json_error_uses_status() {
        let transport = Arc::new(ScriptedTransport::new(|_| HttpResponse {
            status: 500,
            content_type: Some("text/html".to_string()),
            body: b"<h1>oops</h1>".to_vec(),
        }));

        let err = client(transport).get("/test", Auth::Bearer).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn test_no_content_response() {
        let transport = Arc::new(ScriptedTransport::new(|_| HttpResponse::empty(204)));

        let body = client(transport)
            .delete("/api/cards/1", Auth::Bearer)
            .await
            .unwrap();

        assert!(body.is_no_content());
        assert!(body.into_json::<serde_json::Value>().is_err());
    }

    #[tokio::test]
    async fn test_unexpected_non_json_success() {
        let transport = Arc::new(ScriptedTransport::new(|_| HttpResponse {
            status: 200,
            content_type: Some("text/plain".to_string()),
            body: b"hello".to_vec(),
        }));

        let err = client(transport).get("/test", Auth::Bearer).await.unwrap_err();
        assert!(matches!(err, CorkboardError::UnexpectedResponse { status: 200 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_and_replay_on_401() {
        let transport = Arc::new(ScriptedTransport::new(refreshing_backend));
        let client = client(Arc::clone(&transport));
        client.session().set_access_token("stale");

        let body = client.get("/api/boards", Auth::Bearer).await.unwrap();

        assert_eq!(body, ResponseBody::Json(json!({ "boards": [] })));
        assert_eq!(client.session().access_token().as_deref(), Some("fresh"));

        let sent = transport.requests();
        assert_eq!(sent.len(), 3);
        assert!(sent[1].url.ends_with("/api/auth/refresh"));
        assert!(sent[1].bearer.is_none());
        assert_eq!(sent[2].bearer.as_deref(), Some("fresh"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_401s_share_one_refresh() {
        let transport = Arc::new(ScriptedTransport::new(refreshing_backend));
        let client = client(Arc::clone(&transport));
        client.session().set_access_token("stale");

        let (a, b) = tokio::join!(
            client.get("/api/boards", Auth::Bearer),
            client.get("/api/boards", Auth::Bearer)
        );

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_expires_session() {
        let transport = Arc::new(ScriptedTransport::new(|request| {
            if request.url.ends_with(endpoints::auth::REFRESH) {
                HttpResponse::json(401, &json!({ "error": "Refresh token expired" }))
            } else {
                HttpResponse::json(401, &json!({ "error": "Token expired" }))
            }
        }));
        let client = client(Arc::clone(&transport));
        client.session().set_access_token("stale");

        let (a, b) = tokio::join!(
            client.get("/api/boards", Auth::Bearer),
            client.get("/api/lists/board/1", Auth::Bearer)
        );

        assert!(matches!(a, Err(CorkboardError::SessionExpired)));
        assert!(matches!(b, Err(CorkboardError::SessionExpired)));
        assert!(!client.session().is_authenticated());
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_401_after_successful_refresh_is_terminal() {
        let transport = Arc::new(ScriptedTransport::new(|request| {
            if request.url.ends_with(endpoints::auth::REFRESH) {
                HttpResponse::json(200, &json!({ "accessToken": "fresh" }))
            } else {
                HttpResponse::json(401, &json!({ "error": "Nope" }))
            }
        }));
        let client = client(Arc::clone(&transport));
        client.session().set_access_token("stale");

        let err = client.get("/api/boards", Auth::Bearer).await.unwrap_err();

        assert!(matches!(err, CorkboardError::SessionExpired));
        assert!(!client.session().is_authenticated());
        // original, refresh, one replay; no second refresh
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_anonymous_401_is_plain_error() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            HttpResponse::json(401, &json!({ "error": "Invalid credentials" }))
        }));
        let client = client(Arc::clone(&transport));

        let err = client
            .post("/api/auth/login", &json!({}), Auth::Anonymous)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 0);
    }
}
