use std::future::Future;
use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};

pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub trait HttpClient: Send + Sync {
    fn get(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;

    fn post(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;

    fn post_multipart(
        &self,
        path: &str,
        parts: Vec<Part>,
    ) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;
}

/// One part of a multipart request body.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

impl Part {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            data: value.into().into_bytes(),
        }
    }

    pub fn file(name: impl Into<String>, file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            data,
        }
    }
}

/// Non-2xx response. Boxed into [`Error`] so callers can downcast and map
/// statuses to their own domain errors.
#[derive(Debug, thiserror::Error)]
#[error("HTTP status {status}")]
pub struct StatusError {
    pub status: u16,
    pub body: Vec<u8>,
}

/// `reqwest`-backed [`HttpClient`] with a cookie jar.
///
/// The service authenticates with a session cookie set by the login and
/// signup endpoints; the jar carries it across calls within a process, and
/// [`session_cookie`](Self::session_cookie) /
/// [`with_session_cookie`](Self::with_session_cookie) move it across
/// processes.
#[derive(Clone)]
pub struct ReqwestClient {
    base: String,
    client: reqwest::Client,
    jar: Arc<Jar>,
}

impl ReqwestClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .expect("failed to build HTTP client");
        Self { base, client, jar }
    }

    pub fn with_session_cookie(base: impl Into<String>, cookie: &str) -> Self {
        let this = Self::new(base);
        if let Ok(url) = this.base.parse() {
            this.jar.add_cookie_str(cookie, &url);
        }
        this
    }

    /// The current session cookie as a `name=value` header string, if any.
    pub fn session_cookie(&self) -> Option<String> {
        let url = self.base.parse().ok()?;
        let value = self.jar.cookies(&url)?;
        value.to_str().ok().map(str::to_string)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn read(response: reqwest::Response) -> Result<Vec<u8>, Error> {
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        if status.is_success() {
            Ok(body)
        } else {
            Err(Box::new(StatusError {
                status: status.as_u16(),
                body,
            }))
        }
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, path: &str) -> Result<Vec<u8>, Error> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::read(response).await
    }

    async fn post(&self, path: &str, body: Vec<u8>, content_type: &str) -> Result<Vec<u8>, Error> {
        let response = self
            .client
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn post_multipart(&self, path: &str, parts: Vec<Part>) -> Result<Vec<u8>, Error> {
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            let mut piece = reqwest::multipart::Part::bytes(part.data);
            if let Some(file_name) = part.file_name {
                piece = piece.file_name(file_name);
            }
            form = form.part(part.name, piece);
        }
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::read(response).await
    }
}
