// ABOUTME: Remote responder client — asks the code-helper HTTP endpoint one question.
// ABOUTME: POSTs the percent-encoded text as a query parameter and returns the plain-text answer.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Url;
use thiserror::Error;

use crate::config::ResponderConfig;

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped, so a space
/// becomes `%20` rather than the form-style `+`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Failures of a single remote exchange.
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("Server responded with an error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid responder URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Something that answers a free-form code question with text.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn ask(&self, text: &str) -> Result<String, ResponderError>;
}

/// HTTP implementation of [`Responder`].
#[derive(Debug, Clone)]
pub struct HttpResponder {
    client: reqwest::Client,
    base_url: Url,
    query_param: String,
}

impl HttpResponder {
    pub fn new(config: &ResponderConfig) -> Result<Self, ResponderError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ResponderError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let mut builder = reqwest::Client::builder();
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
            query_param: config.query_param.clone(),
        })
    }

    /// The full request URL for `text`, with the text percent-encoded.
    pub fn request_url(&self, text: &str) -> Url {
        let pair = format!(
            "{}={}",
            utf8_percent_encode(&self.query_param, QUERY_VALUE),
            utf8_percent_encode(text, QUERY_VALUE)
        );
        let query = match self.base_url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{pair}"),
            _ => pair,
        };
        let mut url = self.base_url.clone();
        url.set_query(Some(&query));
        url
    }
}

#[async_trait]
impl Responder for HttpResponder {
    async fn ask(&self, text: &str) -> Result<String, ResponderError> {
        let url = self.request_url(text);
        tracing::debug!(url = %self.base_url, chars = text.chars().count(), "sending question");

        let response = self.client.post(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResponderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.text().await?)
    }
}
