use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Serialize)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub author: String,
}

/// Fields left as `None` are not sent and stay unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlogUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid proxy URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The proxy answered with an error envelope.
    #[error("Proxy returned error status {status}: {message}")]
    Api { status: u16, message: String },
}

impl SdkError {
    /// HTTP status of an error envelope, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            SdkError::Http(e) => e.status().map(|s| s.as_u16()),
            SdkError::InvalidUrl(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct BlogEnvelope {
    blog: Value,
}

#[derive(Deserialize)]
struct BlogsEnvelope {
    blogs: Value,
}

/// `{status, message}`, used for both health and error bodies.
#[derive(Deserialize)]
struct StatusEnvelope {
    message: String,
}

pub struct BlogClient {
    client: Client,
    proxy_url: Url,
}

impl BlogClient {
    pub fn new(proxy_url: &str) -> Result<Self, SdkError> {
        Self::with_client(Client::new(), proxy_url)
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxy settings).
    pub fn with_client(client: Client, proxy_url: &str) -> Result<Self, SdkError> {
        let proxy_url = Url::parse(proxy_url)?;
        if proxy_url.cannot_be_a_base() {
            return Err(SdkError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self { client, proxy_url })
    }

    /// `GET /`; returns the health message.
    pub async fn health(&self) -> Result<String, SdkError> {
        let resp = self.client.get(self.url(&[""])).send().await?;
        let body: StatusEnvelope = check(resp).await?.json().await?;
        Ok(body.message)
    }

    pub async fn list_blogs(&self) -> Result<Value, SdkError> {
        let resp = self.client.get(self.url(&["blogs"])).send().await?;
        let body: BlogsEnvelope = check(resp).await?.json().await?;
        Ok(body.blogs)
    }

    pub async fn get_blog(&self, id: &str) -> Result<Value, SdkError> {
        let resp = self.client.get(self.url(&["blogs", id])).send().await?;
        let body: BlogEnvelope = check(resp).await?.json().await?;
        Ok(body.blog)
    }

    pub async fn create_blog(&self, blog: &NewBlog) -> Result<Value, SdkError> {
        let resp = self
            .client
            .post(self.url(&["blogs"]))
            .json(blog)
            .send()
            .await?;
        let body: BlogEnvelope = check(resp).await?.json().await?;
        Ok(body.blog)
    }

    pub async fn update_blog(&self, id: &str, update: &BlogUpdate) -> Result<Value, SdkError> {
        let resp = self
            .client
            .put(self.url(&["blogs", id]))
            .json(update)
            .send()
            .await?;
        let body: BlogEnvelope = check(resp).await?.json().await?;
        Ok(body.blog)
    }

    pub async fn delete_blog(&self, id: &str) -> Result<(), SdkError> {
        let resp = self.client.delete(self.url(&["blogs", id])).send().await?;
        check(resp).await?;
        Ok(())
    }

    /// Proxy URL with `segments` appended, each percent-encoded on its own.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.proxy_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Turn an error envelope into `SdkError::Api`.
async fn check(resp: Response) -> Result<Response, SdkError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await?;
    let message = match serde_json::from_str::<StatusEnvelope>(&text) {
        Ok(envelope) => envelope.message,
        Err(_) => text,
    };
    Err(SdkError::Api {
        status: status.as_u16(),
        message,
    })
}
