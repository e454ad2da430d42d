//! Classification of HTTP client failures.
//!
//! A `reqwest::Error` is folded into a [`FailureKind`] so the session can tell
//! "never reached the server" apart from "the server said no".

use super::traits::FailureKind;

pub fn classify(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        tracing::warn!(reqwest_timeout = %err);
        FailureKind::Transport
    } else if err.is_connect() {
        tracing::warn!(reqwest_connect = %err);
        FailureKind::Transport
    } else if err.is_request() {
        tracing::warn!(reqwest_request = %err);
        FailureKind::Transport
    } else if err.is_status() {
        tracing::info!(reqwest_status = %err);
        FailureKind::Server
    } else if err.is_decode() {
        tracing::warn!(reqwest_decode = %err);
        FailureKind::Decode
    } else {
        tracing::error!(reqwest_error = %err);
        FailureKind::Transport
    }
}

/// User-safe message for a failure with no server-provided text.
pub fn default_message(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Transport => "Could not reach the server",
        FailureKind::Server => "The server rejected the request",
        FailureKind::Decode => "Unexpected response from the server",
        FailureKind::Cancelled => "Request cancelled",
        FailureKind::InvalidRequest => "The request could not be sent",
    }
}
