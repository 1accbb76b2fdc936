//! Comment sink
//!
//! The rendered report is handed to an external endpoint as an opaque
//! string. The sink is a port: pull-request runs use the HTTP
//! implementation, everything else gets the no-op sink. One blocking
//! attempt, no retries; a transport failure means the promised side
//! effect did not happen and propagates as a run failure.

use crate::error::{CliError, CliResult};
use serde::Serialize;

/// Destination for the rendered report text
pub trait CommentSink {
    /// Deliver the report body
    fn post(&self, body: &str) -> CliResult<()>;
}

/// Sink that drops the report (non-PR runs, missing token)
#[derive(Debug, Default)]
pub struct NullSink;

impl CommentSink for NullSink {
    fn post(&self, _body: &str) -> CliResult<()> {
        tracing::debug!("no comment endpoint configured, skipping post");
        Ok(())
    }
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// Sink that posts the report as a JSON comment to an HTTP endpoint
#[derive(Debug)]
pub struct HttpCommentSink {
    url: String,
    token: String,
}

impl HttpCommentSink {
    /// Create a sink for `url` authenticated with a bearer token
    #[must_use]
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
        }
    }
}

impl CommentSink for HttpCommentSink {
    fn post(&self, body: &str) -> CliResult<()> {
        let response = reqwest::blocking::Client::new()
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&CommentBody { body })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CliError::publish(format!(
                "comment endpoint {} returned {status}",
                self.url
            )));
        }
        tracing::info!(url = %self.url, "posted coverage comment");
        Ok(())
    }
}
