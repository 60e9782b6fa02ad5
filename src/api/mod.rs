//! Wire payloads exchanged with the chat service.

pub mod client;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::message::{classification_or_safe, Classification};
use crate::core::mode::Mode;

pub use client::{endpoint_url, ApiError, ChatApi, HttpChatApi};

/// Body of `POST {base}/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub mode: Mode,
}

/// Body returned by `POST {base}/chat`. Fields beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default, deserialize_with = "classification_or_safe")]
    pub classification: Classification,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Outcome of `GET {base}/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Connected,
    /// The service answered with a non-success status code.
    Degraded(u16),
    Unreachable,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Connected => f.write_str("connected"),
            HealthStatus::Degraded(code) => write!(f, "service error (HTTP {code})"),
            HealthStatus::Unreachable => f.write_str("unreachable"),
        }
    }
}
