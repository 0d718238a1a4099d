use futures::future::LocalBoxFuture;
use reqwest::header::CONTENT_TYPE;

use crate::config::HarvestConfig;
use crate::error::HarvestError;

pub type ResponseFuture<'a> = LocalBoxFuture<'a, Result<HttpResponse, HarvestError>>;

/// What the crawler needs to know about an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP GET seam, so that crawling and fetching can run against any transport.
///
/// Only transport failures are errors, any status code is a response.
pub trait HttpClient {
    fn get<'a>(&'a self, url: &'a str) -> ResponseFuture<'a>;
}

/// Production client: connection reuse, compression and a per request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(config: &HarvestConfig) -> Result<Self, HarvestError> {
        let inner = reqwest::ClientBuilder::new()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| HarvestError::Network {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { inner })
    }
}

impl HttpClient for ReqwestClient {
    fn get<'a>(&'a self, url: &'a str) -> ResponseFuture<'a> {
        Box::pin(async move {
            let network = |e: reqwest::Error| HarvestError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            };

            let resp = self.inner.get(url).send().await.map_err(network)?;
            let status = resp.status().as_u16();
            let content_type = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|c| c.to_str().ok())
                .map(String::from);
            let body = resp.bytes().await.map_err(network)?.to_vec();

            Ok(HttpResponse {
                status,
                content_type,
                body,
            })
        })
    }
}
