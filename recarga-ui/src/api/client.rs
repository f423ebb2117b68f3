//! HTTP API Client
//!
//! `gloo-net` implementation of [`RechargeApi`]. Requests go to the page's
//! own origin, so the session cookie travels with them; mutating calls
//! carry the token from `<meta name="csrf-token">`.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};

use recarga::api::CSRF_HEADER;
use recarga::model::ErrorBody;
use recarga::{
    ApiError, ApiResult, Endpoints, ListQueryState, MonthlyAggregate, RechargeApi, RechargeId,
    RechargePage, RechargeUpdate,
};

/// Same-origin recharge API client
#[derive(Debug, Clone, Default)]
pub struct GlooRechargeApi {
    endpoints: Endpoints,
}

impl GlooRechargeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[async_trait(?Send)]
impl RechargeApi for GlooRechargeApi {
    async fn list(&self, query: &ListQueryState) -> ApiResult<RechargePage> {
        let response = send(Request::get(&self.endpoints.list(query))).await?;
        json_body(check(response).await?).await
    }

    async fn update(&self, id: &RechargeId, update: &RechargeUpdate) -> ApiResult<()> {
        let request = Request::patch(&self.endpoints.recharge(id))
            .header(CSRF_HEADER, &csrf_token()?)
            .json(update)
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        let response = request.send().await.map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    async fn delete(&self, id: &RechargeId) -> ApiResult<()> {
        let request =
            Request::delete(&self.endpoints.recharge(id)).header(CSRF_HEADER, &csrf_token()?);
        check(send(request).await?).await?;
        Ok(())
    }

    async fn monthly(&self) -> ApiResult<MonthlyAggregate> {
        let response = send(Request::get(&self.endpoints.monthly())).await?;
        json_body(check(response).await?).await
    }
}

/// Content of the page's `<meta name="csrf-token">`
fn csrf_token() -> ApiResult<String> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector(r#"meta[name="csrf-token"]"#).ok().flatten())
        .and_then(|meta| meta.get_attribute("content"))
        .ok_or_else(|| ApiError::Parse("csrf-token meta tag not found".to_string()))
}

fn transport(e: gloo_net::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

async fn send(request: RequestBuilder) -> ApiResult<Response> {
    request.send().await.map_err(transport)
}

async fn check(response: Response) -> ApiResult<Response> {
    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
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
