//! Destinations for diagnostic reports.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::Serialize;
use thiserror::Error;

use crate::alerts::report::DiagnosticReport;
use crate::config::AlertConfig;

/// Errors raised while delivering a report.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook rejected report with status {0}")]
    Rejected(u16),
}

/// Something that accepts diagnostic reports.
pub trait AlertSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn deliver<'a>(&'a self, report: &'a DiagnosticReport) -> BoxFuture<'a, Result<(), AlertError>>;
}

/// Writes reports to the log at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn deliver<'a>(&'a self, report: &'a DiagnosticReport) -> BoxFuture<'a, Result<(), AlertError>> {
        tracing::warn!(
            status = report.status.code,
            path = %report.request.path,
            "{}",
            report
        );
        futures_util::future::ready(Ok(())).boxed()
    }
}

#[derive(Debug, Serialize)]
struct SlackMessage<'a> {
    channel: &'a str,
    username: &'a str,
    icon_emoji: &'a str,
    text: String,
}

/// Posts reports to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackSink {
    client: reqwest::Client,
    webhook_url: String,
    channel: String,
    username: String,
    icon: String,
}

impl SlackSink {
    pub fn new(config: &AlertConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(config.delivery_timeout())
                .build()
                .unwrap_or_default(),
            webhook_url: config.slack_url.clone(),
            channel: config.slack_channel.clone(),
            username: config.slack_user.clone(),
            icon: config.slack_icon.clone(),
        }
    }

    /// `None` when no webhook URL is configured.
    pub fn from_config(config: &AlertConfig) -> Option<Self> {
        if config.slack_url.is_empty() {
            None
        } else {
            Some(Self::new(config))
        }
    }

    fn message(&self, report: &DiagnosticReport) -> SlackMessage<'_> {
        SlackMessage {
            channel: &self.channel,
            username: &self.username,
            icon_emoji: &self.icon,
            text: format!("```\n{}```", report),
        }
    }
}

impl AlertSink for SlackSink {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn deliver<'a>(&'a self, report: &'a DiagnosticReport) -> BoxFuture<'a, Result<(), AlertError>> {
        async move {
            let response = self
                .client
                .post(&self.webhook_url)
                .json(&self.message(report))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(AlertError::Rejected(status.as_u16()));
            }
            Ok(())
        }
        .boxed()
    }
}
