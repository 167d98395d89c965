//! Pass-through gateway to the downstream scoring and analysis services.
//!
//! The core has no basis for synthesizing these services' output, so this
//! layer only forwards: request bodies go out unchanged, response bodies
//! come back unchanged, and a non-success upstream status is propagated as
//! a failure rather than swallowed.

use std::future::Future;

use serde_json::Value;

use crate::config::DownstreamConfig;

/// The downstream collaborators reachable through the pass-through routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownstreamService {
    Scoring,
    Analysis,
}

impl DownstreamService {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "score" => Some(DownstreamService::Scoring),
            "analysis" => Some(DownstreamService::Analysis),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DownstreamService::Scoring => "scoring",
            DownstreamService::Analysis => "analysis",
        }
    }
}

/// Capability to forward a request body to a downstream service.
pub trait DownstreamGateway: Send + Sync {
    fn forward(
        &self,
        service: DownstreamService,
        body: Value,
    ) -> impl Future<Output = Result<Value, DownstreamError>> + Send;
}

/// Failures while talking to a downstream collaborator. Both kinds are
/// user-visible hard failures; there is no local recovery.
#[derive(Debug, thiserror::Error)]
pub enum DownstreamError {
    #[error("{service} service unreachable: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} service returned status {status}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
}

/// HTTP gateway forwarding JSON bodies to the configured service URLs.
#[derive(Debug, Clone)]
pub struct HttpDownstreamGateway {
    client: reqwest::Client,
    scoring_url: String,
    analysis_url: String,
}

impl HttpDownstreamGateway {
    pub fn new(config: &DownstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            scoring_url: config.scoring_url.clone(),
            analysis_url: config.analysis_url.clone(),
        })
    }

    fn url(&self, service: DownstreamService) -> &str {
        match service {
            DownstreamService::Scoring => &self.scoring_url,
            DownstreamService::Analysis => &self.analysis_url,
        }
    }
}

impl DownstreamGateway for HttpDownstreamGateway {
    fn forward(
        &self,
        service: DownstreamService,
        body: Value,
    ) -> impl Future<Output = Result<Value, DownstreamError>> + Send {
        async move {
            let label = service.label();
            let response = self
                .client
                .post(self.url(service))
                .json(&body)
                .send()
                .await
                .map_err(|source| DownstreamError::Transport {
                    service: label,
                    source,
                })?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|source| DownstreamError::Transport {
                    service: label,
                    source,
                })?;

            if !status.is_success() {
                return Err(DownstreamError::Status {
                    service: label,
                    status: status.as_u16(),
                    body: text,
                });
            }

            // Bodies are forwarded verbatim; non-JSON payloads are passed
            // through as a JSON string.
            Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        }
    }
}
