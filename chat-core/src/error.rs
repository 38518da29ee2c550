use reqwest::StatusCode;
use thiserror::Error;

/// Every failure this pipeline can meet is an upstream dependency failure.
/// Stages convert these into their documented fallback values at the public
/// boundary; nothing here escapes to the caller.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request failed with status {status}: {body}")]
    Status {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} response contained no {what}")]
    MissingField {
        provider: &'static str,
        what: &'static str,
    },
}

impl UpstreamError {
    pub fn transport(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { provider, source }
    }

    pub fn status(provider: &'static str, status: StatusCode, body: &str) -> Self {
        Self::Status { provider, status, body: truncate_body(body) }
    }

    pub fn decode(provider: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { provider, source }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let end = body.char_indices().take_while(|(i, _)| *i <= MAX).last().map_or(0, |(i, _)| i);
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
