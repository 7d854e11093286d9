//! Authorized HTTP client for the backend API
//!
//! Every call reads the session credentials at dispatch time and attaches
//! `Authorization: Bearer <token>` when a token exists. Responses that arrive
//! after the session changed are discarded as `SessionInvalidated`.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::config::ApiConfig;
use crate::session::Session;
use crate::utils::errors::{AdminError, Result};
use crate::utils::logging::{log_api_error, log_api_request};
use super::upload::Attachment;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Shared HTTP client bound to one session
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
    auth_markers: Vec<String>,
}

impl ApiClient {
    /// Create a new ApiClient instance
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self> {
        url::Url::parse(&config.base_url)?;

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(AdminError::Http)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            auth_markers: config
                .auth_error_markers
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a JSON document
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.execute(Method::GET, path, |req| req).await?;
        decode(path, &body)
    }

    /// Send a JSON body and decode the JSON reply
    pub async fn send_json<B, T>(&self, method: Method, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(method, path, |req| req.json(payload)).await?;
        decode(path, &body)
    }

    /// Send a request whose reply body is not interpreted
    pub async fn send_empty<B>(&self, method: Method, path: &str, payload: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, |req| match payload {
            Some(payload) => req.json(payload),
            None => req,
        })
        .await
        .map(|_| ())
    }

    /// `POST /upload/single` with the attachment as multipart field `file`
    pub async fn upload_single(&self, attachment: Attachment) -> Result<String> {
        let path = "/upload/single";
        let form = reqwest::multipart::Form::new().part("file", attachment.into_part()?);
        let body = self.execute(Method::POST, path, |req| req.multipart(form)).await?;
        let reply: UploadResponse = decode(path, &body)?;
        debug!(url = %reply.url, "File uploaded");
        Ok(reply.url)
    }

    async fn execute<F>(&self, method: Method, path: &str, build: F) -> Result<String>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let credentials = self.session.credentials();
        log_api_request(method.as_str(), path, credentials.token.is_some());

        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(token) = &credentials.token {
            request = request.bearer_auth(token);
        }

        let result = self.dispatch(build(request)).await;

        // A login or logout happened while the request was in flight
        if !self.session.is_current(credentials.generation) {
            debug!(path = path, "Discarding response from a previous session");
            return Err(AdminError::SessionInvalidated);
        }

        result.map_err(|e| {
            log_api_error(path, &e.to_string(), Some(method.as_str()));
            e
        })
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AdminError::Auth(error_message(&body).unwrap_or_else(|| status.to_string())));
        }

        if let Some(message) = error_message(&body) {
            let lowered = message.to_lowercase();
            if self.auth_markers.iter().any(|marker| lowered.contains(marker)) {
                return Err(AdminError::Auth(message));
            }
        }

        if !status.is_success() {
            return Err(AdminError::Server {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

fn map_transport_error(error: reqwest::Error) -> AdminError {
    if error.is_timeout() || error.is_connect() || error.is_request() {
        AdminError::Network(error.to_string())
    } else {
        AdminError::Http(error)
    }
}

/// `message` (or `error`) of a JSON object body
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(|field| match field {
            serde_json::Value::String(text) => Some(text.clone()),
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => None,
        })
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        log_api_error(path, &e.to_string(), Some("decode"));
        AdminError::Serialization(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message": "jwt expired"}"#), Some("jwt expired".to_string()));
        assert_eq!(
            error_message(r#"{"message": ["a", "b"], "statusCode": 400}"#),
            Some("a; b".to_string())
        );
        assert_eq!(error_message(r#"{"error": "Not Found"}"#), Some("Not Found".to_string()));
        assert_eq!(error_message(r#"[{"message": "x"}]"#), None);
        assert_eq!(error_message("plain text"), None);
    }

    #[test]
    fn test_url_joining() {
        let storage = std::sync::Arc::new(crate::session::SessionStorage::in_memory());
        let settings = crate::config::Settings::default();
        let session = Session::new(storage, &settings.session);
        let mut api = settings.api.clone();
        api.base_url = "https://mlm-backend.pixl.uz/".to_string();

        let client = ApiClient::new(&api, session).unwrap();
        assert_eq!(client.url("/users"), "https://mlm-backend.pixl.uz/users");
        assert_eq!(client.url("tariff/add"), "https://mlm-backend.pixl.uz/tariff/add");
    }
}
