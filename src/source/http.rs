//! HTTP transport backed by [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;

use super::{Reply, Transport};
use crate::error::FetchError;

const USER_AGENT: &str = concat!("posts-view/", env!("CARGO_PKG_VERSION"));

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(request_timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn get(&self, url: &str) -> Result<Box<dyn Reply>, FetchError> {
        let response = self.client.get(url).send().await?;
        Ok(Box::new(HttpReply::new(response)))
    }
}

/// A live response; the body stays on the wire until [`Reply::bytes`].
struct HttpReply {
    status: u16,
    status_text: String,
    response: reqwest::Response,
}

impl HttpReply {
    fn new(response: reqwest::Response) -> Self {
        let status = response.status();
        Self {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            response,
        }
    }
}

#[async_trait]
impl Reply for HttpReply {
    fn status(&self) -> u16 {
        self.status
    }

    fn status_text(&self) -> &str {
        &self.status_text
    }

    async fn bytes(self: Box<Self>) -> Result<Bytes, FetchError> {
        Ok(self.response.bytes().await?)
    }
}
