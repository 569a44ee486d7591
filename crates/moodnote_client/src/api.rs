//! REST client for the notes backend.
//!
//! # Responsibility
//! - Map every backend endpoint onto a typed async call.
//! - Attach the stored bearer token and keep it current on login/logout.
//! - Memoize link previews, failures included.
//!
//! # Invariants
//! - Non-2xx responses become [`ClientError::Api`] carrying the backend
//!   `detail` when present, otherwise `HTTP <status>: <reason>`.
//! - Calls are single attempts: no retry, no backoff.
//! - Log lines carry method, path, status and timing only.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token::TokenStore;
use crate::wire::{
    FileUploadResponse, ForgotPasswordRequest, HealthResponse, LabelCreate, LabelResponse,
    LinkPreview, MessageResponse, NoteCreate, NoteResponse, NoteUpdate, ResetPasswordRequest,
    UserCreate, UserLogin, UserResponse,
};
use log::{info, warn};
use moodnote_core::Note;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

/// Page size used by `GET /notes` when the caller gives none.
pub const DEFAULT_NOTES_LIMIT: u32 = 100;

type PreviewCache = HashMap<String, Result<LinkPreview, String>>;

/// Async client for one backend.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Box<dyn TokenStore>,
    previews: Mutex<PreviewCache>,
}

impl ApiClient {
    /// Builds a client with its own connection pool.
    pub fn new(config: ClientConfig, tokens: impl TokenStore + 'static) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            config,
            tokens: Box::new(tokens),
            previews: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether a bearer token is currently stored.
    pub fn is_authenticated(&self) -> ClientResult<bool> {
        Ok(self.tokens.load()?.is_some())
    }

    pub async fn register(&self, user: &UserCreate) -> ClientResult<UserResponse> {
        let request = self.request(Method::POST, "/auth/register")?.json(user);
        let response: UserResponse = self.execute("/auth/register", request).await?;
        self.store_token(&response.access_token)?;
        Ok(response)
    }

    pub async fn login(&self, credentials: &UserLogin) -> ClientResult<UserResponse> {
        let request = self.request(Method::POST, "/auth/login")?.json(credentials);
        let response: UserResponse = self.execute("/auth/login", request).await?;
        self.store_token(&response.access_token)?;
        Ok(response)
    }

    /// Forgets the stored token. No request is sent.
    pub fn logout(&self) -> ClientResult<()> {
        self.tokens.clear()?;
        info!("event=auth_logout module=client status=ok");
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<MessageResponse> {
        let request = self
            .request(Method::POST, "/auth/forgot-password")?
            .json(&ForgotPasswordRequest { email });
        self.execute("/auth/forgot-password", request).await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> ClientResult<MessageResponse> {
        let request = self
            .request(Method::POST, "/auth/reset-password")?
            .json(&ResetPasswordRequest {
                token,
                new_password,
            });
        self.execute("/auth/reset-password", request).await
    }

    /// `GET /notes?skip=&limit=`; defaults are `0` and [`DEFAULT_NOTES_LIMIT`].
    pub async fn list_notes(
        &self,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> ClientResult<Vec<NoteResponse>> {
        let request = self.request(Method::GET, "/notes")?.query(&[
            ("skip", skip.unwrap_or(0)),
            ("limit", limit.unwrap_or(DEFAULT_NOTES_LIMIT)),
        ]);
        self.execute("/notes", request).await
    }

    /// Fetches the first page of notes converted into core notes.
    pub async fn fetch_notes(&self) -> ClientResult<Vec<Note>> {
        self.list_notes(None, None)
            .await?
            .into_iter()
            .map(NoteResponse::into_note)
            .collect()
    }

    pub async fn get_note(&self, id: i64) -> ClientResult<NoteResponse> {
        let path = format!("/notes/{id}");
        let request = self.request(Method::GET, &path)?;
        self.execute(&path, request).await
    }

    pub async fn create_note(&self, note: &NoteCreate) -> ClientResult<NoteResponse> {
        let request = self.request(Method::POST, "/notes")?.json(note);
        self.execute("/notes", request).await
    }

    pub async fn update_note(&self, id: i64, update: &NoteUpdate) -> ClientResult<NoteResponse> {
        let path = format!("/notes/{id}");
        let request = self.request(Method::PUT, &path)?.json(update);
        self.execute(&path, request).await
    }

    pub async fn delete_note(&self, id: i64) -> ClientResult<MessageResponse> {
        let path = format!("/notes/{id}");
        let request = self.request(Method::DELETE, &path)?;
        self.execute(&path, request).await
    }

    /// Uploads an image as multipart `file`; `content_type` must be `image/*`.
    pub async fn upload_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<FileUploadResponse> {
        self.upload("/upload/image", "image/", file_name, content_type, bytes)
            .await
    }

    /// Uploads audio as multipart `file`; `content_type` must be `audio/*`.
    pub async fn upload_audio(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<FileUploadResponse> {
        self.upload("/upload/audio", "audio/", file_name, content_type, bytes)
            .await
    }

    /// Returns the preview for `url`, fetching it at most once per client.
    ///
    /// A failed fetch is cached too, transport errors and timeouts included;
    /// later calls on this client return the same error without a request.
    pub async fn link_preview(&self, url: &str) -> ClientResult<LinkPreview> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ClientError::LinkPreview {
                url: String::new(),
                message: "url is empty".to_string(),
            });
        }

        let cached = self.preview_cache().get(url).cloned();
        let outcome = match cached {
            Some(outcome) => outcome,
            None => {
                let request = self
                    .request(Method::GET, "/link-preview")?
                    .query(&[("url", url)]);
                let outcome = self
                    .execute::<LinkPreview>("/link-preview", request)
                    .await
                    .map_err(|err| err.to_string());
                self.preview_cache().insert(url.to_string(), outcome.clone());
                outcome
            }
        };

        outcome.map_err(|message| ClientError::LinkPreview {
            url: url.to_string(),
            message,
        })
    }

    pub async fn list_labels(&self) -> ClientResult<Vec<LabelResponse>> {
        let request = self.request(Method::GET, "/labels")?;
        self.execute("/labels", request).await
    }

    pub async fn create_label(&self, label: &LabelCreate) -> ClientResult<LabelResponse> {
        let request = self.request(Method::POST, "/labels")?.json(label);
        self.execute("/labels", request).await
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let request = self.request(Method::GET, "/health")?;
        self.execute("/health", request).await
    }

    async fn upload(
        &self,
        path: &'static str,
        expected: &'static str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<FileUploadResponse> {
        if !content_type.trim().to_ascii_lowercase().starts_with(expected) {
            return Err(ClientError::UnsupportedMedia {
                expected,
                content_type: content_type.to_string(),
            });
        }
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type.trim())?;
        let request = self
            .request(Method::POST, path)?
            .multipart(Form::new().part("file", part));
        self.execute(path, request).await
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let builder = self.http.request(method, self.config.endpoint(path));
        Ok(match self.tokens.load()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let started_at = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    "event=api_request module=client status=error path={} duration_ms={} error=transport",
                    path,
                    started_at.elapsed().as_millis()
                );
                return Err(err.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "event=api_request module=client status=error path={} http_status={} duration_ms={}",
                path,
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        info!(
            "event=api_request module=client status=ok path={} http_status={} duration_ms={}",
            path,
            status.as_u16(),
            started_at.elapsed().as_millis()
        );
        Ok(response.json::<T>().await?)
    }

    fn store_token(&self, token: &str) -> ClientResult<()> {
        if token.is_empty() {
            return Ok(());
        }
        self.tokens.save(token)?;
        info!("event=auth_token_stored module=client status=ok");
        Ok(())
    }

    fn preview_cache(&self) -> MutexGuard<'_, PreviewCache> {
        self.previews
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// User-facing message for a failed response.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|mut value| value.get_mut("detail").map(Value::take))
        .and_then(|detail| match detail {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        });

    detail.unwrap_or_else(|| {
        format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    })
}
