//! Recharge HTTP Client
//!
//! `reqwest` implementation of [`RechargeApi`] for the command line.

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::sync::OnceLock;
use tokio::sync::OnceCell;

use crate::api::{Endpoints, RechargeApi, CSRF_HEADER};
use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::model::{ErrorBody, MonthlyAggregate, RechargeId, RechargePage, RechargeUpdate};
use crate::query::ListQueryState;

/// Recharge API client
pub struct HttpRechargeApi {
    client: Client,
    endpoints: Endpoints,
    session_cookie: Option<String>,
    csrf_token: OnceCell<String>,
}

impl HttpRechargeApi {
    pub fn new(config: &ServerConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let csrf_token = match &config.csrf_token {
            Some(token) => OnceCell::new_with(Some(token.clone())),
            None => OnceCell::new(),
        };

        Ok(Self {
            client,
            endpoints: Endpoints::new(&config.base_url),
            session_cookie: config.session_cookie.clone(),
            csrf_token,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.session_cookie {
            Some(cookie) => builder.header(reqwest::header::COOKIE, cookie),
            None => builder,
        }
    }

    /// Token for mutating requests: configured, or scraped from the
    /// manage page on first use.
    async fn csrf_token(&self) -> ApiResult<&str> {
        let token = self
            .csrf_token
            .get_or_try_init(|| async {
                let url = self.endpoints.manage_page();
                tracing::debug!(url = %url, "Fetching CSRF token");
                let response = send(self.request(Method::GET, &url)).await?;
                let html = check(response).await?.text().await.map_err(transport)?;
                extract_csrf_token(&html)
                    .ok_or_else(|| ApiError::Parse("csrf-token meta tag not found".to_string()))
            })
            .await?;
        Ok(token)
    }

    /// GET `url` and return the body, e.g. the CSV behind an export link
    pub async fn download(&self, url: &str) -> ApiResult<String> {
        tracing::debug!(url = %url, "Downloading");
        let response = check(send(self.request(Method::GET, url)).await?).await?;
        response.text().await.map_err(transport)
    }
}

#[async_trait(?Send)]
impl RechargeApi for HttpRechargeApi {
    async fn list(&self, query: &ListQueryState) -> ApiResult<RechargePage> {
        let url = self.endpoints.list(query);
        tracing::debug!(url = %url, "GET recharge list");
        let response = check(send(self.request(Method::GET, &url)).await?).await?;
        json_body(response).await
    }

    async fn update(&self, id: &RechargeId, update: &RechargeUpdate) -> ApiResult<()> {
        let token = self.csrf_token().await?;
        let url = self.endpoints.recharge(id);
        tracing::debug!(url = %url, "PATCH recharge");
        let request = self
            .request(Method::PATCH, &url)
            .header(CSRF_HEADER, token)
            .json(update);
        check(send(request).await?).await?;
        Ok(())
    }

    async fn delete(&self, id: &RechargeId) -> ApiResult<()> {
        let token = self.csrf_token().await?;
        let url = self.endpoints.recharge(id);
        tracing::debug!(url = %url, "DELETE recharge");
        let request = self.request(Method::DELETE, &url).header(CSRF_HEADER, token);
        check(send(request).await?).await?;
        Ok(())
    }

    async fn monthly(&self) -> ApiResult<MonthlyAggregate> {
        let url = self.endpoints.monthly();
        tracing::debug!(url = %url, "GET monthly aggregation");
        let response = check(send(self.request(Method::GET, &url)).await?).await?;
        json_body(response).await
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

async fn send(request: RequestBuilder) -> ApiResult<Response> {
    request.send().await.map_err(transport)
}

/// Pass 2xx responses through; turn anything else into an error, keeping
/// the server's `{"error": ...}` message when there is one.
async fn check(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status = status.as_u16();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            error: Some(message),
        }) if !message.is_empty() => Err(ApiError::Rejected { status, message }),
        _ => Err(ApiError::Status { status }),
    }
}

async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> ApiResult<T> {
    let body = response.text().await.map_err(transport)?;
    Ok(serde_json::from_str(&body)?)
}

/// Value of `<meta name="csrf-token" content="...">` in `html`
pub fn extract_csrf_token(html: &str) -> Option<String> {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            Regex::new(r#"<meta[^>]*\bname\s*=\s*["']csrf-token["'][^>]*\bcontent\s*=\s*["']([^"']*)["']"#)
                .expect("valid meta pattern"),
            Regex::new(r#"<meta[^>]*\bcontent\s*=\s*["']([^"']*)["'][^>]*\bname\s*=\s*["']csrf-token["']"#)
                .expect("valid meta pattern"),
        ]
    });

    patterns
        .iter()
        .find_map(|re| re.captures(html))
        .map(|caps| caps[1].to_string())
}
