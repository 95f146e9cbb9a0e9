//! LeadConnector API client for token exchange and location-scoped reads.

use std::fmt;

use async_trait::async_trait;
use leadsync_core::leads::{Appointment, Contact, Form, Opportunity};
use leadsync_core::{AccessToken, CrmApi, CrmResource, Result as CoreResult};
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};

use crate::error::{GhlError, Result};
use crate::types::*;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://services.leadconnectorhq.com";
/// Value of the `Version` header sent with every resource request.
pub const API_VERSION: &str = "2021-07-28";
const MAX_LOG_BODY_CHARS: usize = 512;

/// OAuth client credentials for the client-credentials grant.
#[derive(Clone)]
pub struct GhlCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl GhlCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for GhlCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhlCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Client for one GoHighLevel location.
///
/// Tokens are never cached: each [`GhlClient::exchange_token`] call performs a
/// fresh credential exchange.
#[derive(Debug, Clone)]
pub struct GhlClient {
    client: reqwest::Client,
    base_url: String,
    credentials: GhlCredentials,
    location_id: String,
}

impl GhlClient {
    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("GHL response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("GHL response error ({}): {}", status, preview);
    }

    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API host (e.g., "https://services.leadconnectorhq.com")
    /// * `credentials` - OAuth client id and secret
    /// * `location_id` - location scoping every resource read
    pub fn new(
        base_url: &str,
        credentials: GhlCredentials,
        location_id: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            location_id: location_id.into(),
        })
    }

    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    /// Create headers for a resource request.
    fn headers(&self, token: &AccessToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("version"),
            HeaderValue::from_static(API_VERSION),
        );

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .map_err(|_| GhlError::invalid_request("Invalid access token format"))?;
        headers.insert(AUTHORIZATION, auth_value);

        Ok(headers)
    }

    /// Parse a JSON response body, keeping the raw body on failure.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            return Err(GhlError::api(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to deserialize GHL response: {}", e);
            GhlError::Json(e)
        })
    }

    /// Exchange client credentials for an access token.
    ///
    /// POST /oauth/token
    pub async fn exchange_token(&self) -> Result<String> {
        let url = format!("{}/oauth/token", self.base_url);
        debug!("Requesting GHL access token");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let token: TokenResponse = Self::parse_response(response).await?;
        Ok(token.access_token)
    }

    async fn get_location_resource<T: serde::de::DeserializeOwned>(
        &self,
        token: &AccessToken,
        path: &str,
        location_param: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} ({}={})", url, location_param, self.location_id);

        let response = self
            .client
            .get(&url)
            .headers(self.headers(token)?)
            .query(&[(location_param, self.location_id.as_str())])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// GET /contacts/?locationId=
    pub async fn list_contacts(&self, token: &AccessToken) -> Result<Vec<Contact>> {
        let body: ContactsResponse = self
            .get_location_resource(token, "/contacts/", "locationId")
            .await?;
        Ok(body.contacts)
    }

    /// GET /opportunities/search?location_id=
    pub async fn list_opportunities(&self, token: &AccessToken) -> Result<Vec<Opportunity>> {
        let body: OpportunitiesResponse = self
            .get_location_resource(token, "/opportunities/search", "location_id")
            .await?;
        Ok(body.opportunities)
    }

    /// GET /appointments/?locationId=
    pub async fn list_appointments(&self, token: &AccessToken) -> Result<Vec<Appointment>> {
        let body: AppointmentsResponse = self
            .get_location_resource(token, "/appointments/", "locationId")
            .await?;
        Ok(body.appointments)
    }

    /// GET /forms/?locationId=
    pub async fn list_forms(&self, token: &AccessToken) -> Result<Vec<Form>> {
        let body: FormsResponse = self
            .get_location_resource(token, "/forms/", "locationId")
            .await?;
        Ok(body.forms)
    }
}

#[async_trait]
impl CrmApi for GhlClient {
    async fn obtain_access_token(&self) -> CoreResult<AccessToken> {
        self.exchange_token().await.map(AccessToken::new).map_err(|e| {
            error!("GHL token exchange failed: {}", e);
            e.into_auth_error()
        })
    }

    async fn fetch_contacts(&self, token: &AccessToken) -> CoreResult<Vec<Contact>> {
        self.list_contacts(token)
            .await
            .map_err(|e| e.into_upstream_error(CrmResource::Contacts))
    }

    async fn fetch_opportunities(&self, token: &AccessToken) -> CoreResult<Vec<Opportunity>> {
        self.list_opportunities(token)
            .await
            .map_err(|e| e.into_upstream_error(CrmResource::Opportunities))
    }

    async fn fetch_appointments(&self, token: &AccessToken) -> CoreResult<Vec<Appointment>> {
        self.list_appointments(token)
            .await
            .map_err(|e| e.into_upstream_error(CrmResource::Appointments))
    }

    async fn fetch_forms(&self, token: &AccessToken) -> CoreResult<Vec<Form>> {
        self.list_forms(token)
            .await
            .map_err(|e| e.into_upstream_error(CrmResource::Forms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadsync_core::Error as CoreError;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex as TokioMutex;

    #[derive(Debug, Clone)]
    struct CapturedRequest {
        request_line: String,
        headers: HashMap<String, String>,
        body: String,
    }

    fn header_end_offset(buffer: &[u8]) -> Option<usize> {
        buffer.windows(4).position(|w| w == b"\r\n\r\n")
    }

    async fn read_http_request(stream: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
        let mut buffer = Vec::new();
        loop {
            let mut chunk = [0_u8; 2048];
            let read = stream.read(&mut chunk).await.ok()?;
            if read == 0 {
                return None;
            }
            buffer.extend_from_slice(&chunk[..read]);
            if header_end_offset(&buffer).is_some() {
                break;
            }
        }

        let header_end = header_end_offset(&buffer)?;
        let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
        let mut lines = head.lines();
        let request_line = lines.next()?.to_string();

        let mut headers = HashMap::new();
        for line in lines {
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
            }
        }

        let content_length = headers
            .get("content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = buffer[header_end + 4..].to_vec();
        while body.len() < content_length {
            let mut chunk = [0_u8; 2048];
            let read = stream.read(&mut chunk).await.ok()?;
            if read == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..read]);
        }

        Some(CapturedRequest {
            request_line,
            headers,
            body: String::from_utf8_lossy(&body).to_string(),
        })
    }

    fn status_text(status: u16) -> &'static str {
        match status {
            200 => "OK",
            400 => "Bad Request",
            401 => "Unauthorized",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            _ => "Error",
        }
    }

    async fn write_http_response(
        stream: &mut tokio::net::TcpStream,
        status: u16,
        body: &str,
    ) -> std::io::Result<()> {
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            status_text(status),
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await?;
        stream.flush().await
    }

    /// Serves scripted `(status, body)` responses in order and records each request.
    async fn start_mock_server(
        responses: Vec<(u16, &str)>,
    ) -> (
        String,
        Arc<TokioMutex<Vec<CapturedRequest>>>,
        tokio::task::JoinHandle<()>,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let captured = Arc::new(TokioMutex::new(Vec::<CapturedRequest>::new()));
        let scripted = Arc::new(TokioMutex::new(
            responses
                .into_iter()
                .map(|(status, body)| (status, body.to_string()))
                .collect::<VecDeque<_>>(),
        ));
        let captured_clone = Arc::clone(&captured);

        let handle = tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(value) => value,
                    Err(_) => break,
                };
                let Some(request) = read_http_request(&mut stream).await else {
                    continue;
                };
                captured_clone.lock().await.push(request);
                let (status, body) = scripted
                    .lock()
                    .await
                    .pop_front()
                    .unwrap_or((500, "{\"message\":\"unexpected request\"}".to_string()));
                let _ = write_http_response(&mut stream, status, &body).await;
            }
        });

        (format!("http://{}", addr), captured, handle)
    }

    fn test_client(base_url: &str) -> GhlClient {
        GhlClient::new(
            base_url,
            GhlCredentials::new("client-123", "secret-456"),
            "loc-1",
        )
        .expect("client")
    }

    #[tokio::test]
    async fn token_exchange_posts_client_credentials_form() {
        let (base_url, captured, server) =
            start_mock_server(vec![(200, r#"{"access_token":"tok-1","expires_in":3600}"#)]).await;

        let token = test_client(&base_url).exchange_token().await.expect("token");
        assert_eq!(token, "tok-1");

        let requests = captured.lock().await.clone();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert!(request.request_line.starts_with("POST /oauth/token "));
        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            request.headers.get("accept").map(String::as_str),
            Some("application/json")
        );
        assert!(!request.headers.contains_key("version"));
        assert!(request.body.contains("client_id=client-123"));
        assert!(request.body.contains("client_secret=secret-456"));
        assert!(request.body.contains("grant_type=client_credentials"));

        server.abort();
    }

    #[tokio::test]
    async fn token_exchange_failure_carries_upstream_body() {
        let body = r#"{"error":"invalid_client","error_description":"bad secret"}"#;
        let (base_url, captured, server) = start_mock_server(vec![(401, body)]).await;

        let err = test_client(&base_url)
            .obtain_access_token()
            .await
            .expect_err("auth should fail");

        match &err {
            CoreError::Auth { message, details } => {
                assert!(message.contains("401"));
                assert_eq!(details.as_deref(), Some(body));
            }
            other => panic!("expected auth error, got {:?}", other),
        }
        // No retry on failure.
        assert_eq!(captured.lock().await.len(), 1);

        server.abort();
    }

    #[tokio::test]
    async fn contacts_request_is_versioned_and_location_scoped() {
        let (base_url, captured, server) = start_mock_server(vec![(
            200,
            r#"{"contacts":[{"id":"c1","firstName":"Ada","email":"ada@ceo.io","tags":null}]}"#,
        )])
        .await;

        let contacts = test_client(&base_url)
            .fetch_contacts(&AccessToken::new("tok-1"))
            .await
            .expect("contacts");
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].first_name.as_deref(), Some("Ada"));
        assert!(contacts[0].tags.is_empty());

        let requests = captured.lock().await.clone();
        let request = &requests[0];
        assert!(request
            .request_line
            .starts_with("GET /contacts/?locationId=loc-1 "));
        assert_eq!(
            request.headers.get("version").map(String::as_str),
            Some(API_VERSION)
        );
        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer tok-1")
        );

        server.abort();
    }

    #[tokio::test]
    async fn opportunities_use_snake_case_location_param() {
        let (base_url, captured, server) = start_mock_server(vec![(
            200,
            r#"{"opportunities":[{"id":"o1","contact":{"id":"c1"},"monetaryValue":500,"status":"open"}]}"#,
        )])
        .await;

        let opportunities = test_client(&base_url)
            .fetch_opportunities(&AccessToken::new("tok-1"))
            .await
            .expect("opportunities");
        assert_eq!(opportunities[0].owner_id(), Some("c1"));

        let requests = captured.lock().await.clone();
        assert!(requests[0]
            .request_line
            .starts_with("GET /opportunities/search?location_id=loc-1 "));

        server.abort();
    }

    #[tokio::test]
    async fn failed_read_maps_to_upstream_error() {
        let body = r#"{"statusCode":500,"message":"Internal server error"}"#;
        let (base_url, _captured, server) = start_mock_server(vec![(500, body)]).await;

        let err = test_client(&base_url)
            .fetch_forms(&AccessToken::new("tok-1"))
            .await
            .expect_err("forms should fail");

        match &err {
            CoreError::Upstream {
                resource, details, ..
            } => {
                assert_eq!(*resource, CrmResource::Forms);
                assert_eq!(details.as_deref(), Some(body));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }

        server.abort();
    }

    #[tokio::test]
    async fn appointments_parse_with_calendar_status() {
        let (base_url, _captured, server) = start_mock_server(vec![(
            200,
            r#"{"appointments":[{"id":"a1","title":"Intro call","startTime":"2024-06-01T10:00:00Z","appointmentStatus":"confirmed","contactId":"c1"}]}"#,
        )])
        .await;

        let appointments = test_client(&base_url)
            .list_appointments(&AccessToken::new("tok-1"))
            .await
            .expect("appointments");
        assert_eq!(appointments[0].effective_status(), Some("confirmed"));
        assert_eq!(appointments[0].owner_id(), Some("c1"));

        server.abort();
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let creds = GhlCredentials::new("id", "super-secret");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("id"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = test_client("http://localhost:9999/");
        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(client.location_id(), "loc-1");
    }
}
