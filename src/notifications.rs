//! "Mark as read" controls on the notification list.

use crate::config::UiConfig;
use crate::cookies::get_cookie;
use crate::dom::{el, Dom, Fragment, Marker, Mutation};
use crate::errors::UiError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::future::Future;
use tracing::debug;
use url::Url;

pub const CONTROL_CLASS: &str = "mark-read-btn";
/// Sent as `X-CSRFToken`; header names are case-insensitive.
pub const CSRF_HEADER: &str = "x-csrftoken";

/// Classes that mark a card as unread.
pub const UNREAD_CLASSES: [&str; 2] = ["border-primary", "unread"];

/// A resolved click on a mark-read control.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkReadTarget<N> {
    pub control: N,
    pub notification_id: Option<String>,
    pub url: Option<String>,
    pub card: Option<N>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkReadRequest {
    pub url: String,
    pub csrf_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkReadResponse {
    pub success: bool,
    pub unread_count: Option<u64>,
}

impl MarkReadResponse {
    /// Interprets a parsed body. `success` counts when it is truthy in the
    /// JavaScript sense; a `null` body is an error since nothing can be read
    /// from it.
    pub fn from_value(body: &Value) -> Result<Self, UiError> {
        match body {
            Value::Null => Err(UiError::decode("response body is null")),
            Value::Object(fields) => Ok(Self {
                success: fields.get("success").is_some_and(is_truthy),
                unread_count: fields.get("unread_count").and_then(Value::as_u64),
            }),
            _ => Ok(Self {
                success: false,
                unread_count: None,
            }),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, UiError> {
        let body: Value = serde_json::from_slice(bytes)?;
        Self::from_value(&body)
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub trait MarkReadTransport {
    fn mark_read(
        &self,
        request: MarkReadRequest,
    ) -> impl Future<Output = Result<MarkReadResponse, UiError>> + Send;
}

/// Posts to the backend with reqwest. The HTTP status is not inspected: any
/// body that parses as JSON is interpreted.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &UiConfig) -> Result<Self, UiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn resolve(&self, url: &str) -> Result<Url, UiError> {
        Ok(self.base_url.join(url)?)
    }

    fn headers(request: &MarkReadRequest) -> Result<HeaderMap, UiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &request.csrf_token {
            let value = HeaderValue::from_str(token)
                .map_err(|err| UiError::config(format!("csrf token: {err}")))?;
            headers.insert(HeaderName::from_static(CSRF_HEADER), value);
        }
        Ok(headers)
    }
}

impl MarkReadTransport for HttpTransport {
    async fn mark_read(&self, request: MarkReadRequest) -> Result<MarkReadResponse, UiError> {
        let url = self.resolve(&request.url)?;
        let headers = Self::headers(&request)?;
        let response = self.client.post(url).headers(headers).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%status, "mark-read response received");
        MarkReadResponse::from_slice(&bytes)
    }
}

/// Resolves the control under the click, if any.
pub fn resolve_target<D: Dom>(dom: &D, target: &D::Node) -> Option<MarkReadTarget<D::Node>> {
    let control = dom.closest(target, Marker::Class(CONTROL_CLASS))?;
    let notification_id = dom.dataset(&control, "id");
    let url = dom.dataset(&control, "url");
    let card = notification_id
        .as_deref()
        .and_then(|id| dom.element_by_id(&format!("notification-{id}")));
    Some(MarkReadTarget {
        control,
        notification_id,
        url,
        card,
    })
}

pub fn build_request<D: Dom>(
    dom: &D,
    target: &MarkReadTarget<D::Node>,
    csrf_cookie: &str,
) -> Option<MarkReadRequest> {
    let url = target.url.clone()?;
    Some(MarkReadRequest {
        url,
        csrf_token: get_cookie(&dom.cookie(), csrf_cookie),
    })
}

pub fn seen_badge() -> Fragment {
    el("span")
        .class("badge bg-light text-muted border rounded-pill px-3 py-2")
        .child(el("i").class("fas fa-check-double me-1"))
        .text(" Seen")
}

/// Mutations for a notification the server confirmed as read.
pub fn plan_marked_read<N: Clone>(target: &MarkReadTarget<N>) -> Vec<Mutation<N>> {
    let mut mutations = Vec::new();
    if let Some(card) = &target.card {
        for class in UNREAD_CLASSES {
            mutations.push(Mutation::RemoveClass {
                node: card.clone(),
                class,
            });
        }
    }
    mutations.push(Mutation::ReplaceWith {
        node: target.control.clone(),
        fragment: seen_badge(),
    });
    mutations
}
