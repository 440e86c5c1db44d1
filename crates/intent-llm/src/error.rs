//! Gateway error taxonomy

use std::time::Duration;

use thiserror::Error;

/// Failures of the language-model gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The endpoint did not answer within the configured bound
    #[error("language model did not answer within {}s", .0.as_secs_f32())]
    Timeout(Duration),

    /// The endpoint answered with an empty string
    #[error("language model returned an empty response")]
    EmptyResponse,

    /// Connection or decode failure
    #[error("inference transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the endpoint
    #[error("inference endpoint returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Startup-time check could not make the model available
    #[error("model '{model}' is not available: {reason}")]
    ModelUnavailable { model: String, reason: String },
}

impl GatewayError {
    /// Map a reqwest failure, keeping timeouts distinct from outages
    pub(crate) fn from_reqwest(err: reqwest::Error, bound: Duration) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(bound)
        } else {
            GatewayError::Transport(err.to_string())
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout(_))
    }
}
