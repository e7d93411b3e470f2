/*
 * error.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Mailroom.
 *
 * Mailroom is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Mailroom is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Mailroom.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Fault kinds raised by the composition, threading, dispatch and status layers.
//!
//! Partial failure inside a batch is data (see `dispatch::BatchSummary`), never one of these.

use serde_json::Value;

/// Result type alias for mailroom operations.
pub type Result<T> = std::result::Result<T, MailError>;

/// Top-level error for mailroom operations.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFault),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationFault),

    #[error("transport error: {0}")]
    Transport(#[from] TransportFault),

    #[error("store error: {0}")]
    Store(#[from] StoreFault),
}

impl MailError {
    /// Whether the caller may reasonably retry the same call.
    pub fn is_retryable(&self) -> bool {
        match self {
            MailError::Transport(t) => t.retryable,
            MailError::Store(s) => s.is_retryable(),
            MailError::Validation(_) | MailError::Configuration(_) => false,
        }
    }
}

/// Caller input violated a documented constraint. Never retryable, never partially applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFault {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("entry {index}: missing required field {field}")]
    EntryMissingField { index: usize, field: &'static str },

    #[error("entry {index}: conflicting content fields: {fields}")]
    ConflictingContent { index: usize, fields: String },

    #[error("batch is empty")]
    EmptyBatch,

    #[error("batch of {size} entries exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("malformed continuation token: {0}")]
    MalformedToken(String),

    #[error("invalid time range: start {start} is after end {end}")]
    InvalidTimeRange { start: String, end: String },

    #[error("entry {index}: template {template} could not be rendered: {reason}")]
    Render {
        index: usize,
        template: String,
        reason: String,
    },

    #[error("message body is empty: supply html, text or an attachment")]
    EmptyBody,
}

/// A capability or setting the operation depends on is absent or unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationFault {
    #[error("capability not configured: {0}")]
    MissingCapability(&'static str),

    #[error("invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// The remote mail service rejected or failed a call. Normalised at one boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code} (request {request_id}, retryable: {retryable})")]
pub struct TransportFault {
    pub code: String,
    pub request_id: String,
    pub retryable: bool,
}

/// Provider error codes that signal throttling or transient capacity problems.
const RETRYABLE_CODES: &[&str] = &[
    "throttling",
    "throttlingexception",
    "toomanyrequestsexception",
    "serviceunavailable",
    "serviceunavailableexception",
    "internalfailure",
    "requesttimeout",
];

impl TransportFault {
    pub fn new(code: impl Into<String>, request_id: impl Into<String>, retryable: bool) -> Self {
        Self {
            code: code.into(),
            request_id: request_id.into(),
            retryable,
        }
    }

    /// Normalise a loosely-typed provider error payload into `{code, request_id, retryable}`.
    ///
    /// Accepts `code`, `Code` or `name` for the code; `requestId`, `RequestId` or
    /// `$metadata.requestId` for the request id; and `$retryable`, `retryable` or the
    /// HTTP status (`$metadata.httpStatusCode`, `statusCode`) for retryability.
    pub fn from_provider(payload: &Value) -> Self {
        let code = ["code", "Code", "name"]
            .iter()
            .find_map(|k| payload.get(*k).and_then(Value::as_str))
            .unwrap_or("UnknownError")
            .to_string();

        let metadata = payload.get("$metadata");
        let request_id = ["requestId", "RequestId"]
            .iter()
            .find_map(|k| payload.get(*k).and_then(Value::as_str))
            .or_else(|| metadata.and_then(|m| m.get("requestId")).and_then(Value::as_str))
            .unwrap_or("")
            .to_string();

        let status = metadata
            .and_then(|m| m.get("httpStatusCode"))
            .or_else(|| payload.get("statusCode"))
            .and_then(Value::as_u64);

        let explicit = match payload.get("$retryable") {
            // SDK-style: presence of the object means retryable.
            Some(Value::Object(_)) => Some(true),
            Some(Value::Bool(b)) => Some(*b),
            _ => payload.get("retryable").and_then(Value::as_bool),
        };

        let retryable = explicit.unwrap_or_else(|| {
            RETRYABLE_CODES.contains(&code.to_ascii_lowercase().as_str())
                || matches!(status, Some(429) | Some(500..=599))
        });

        Self {
            code,
            request_id,
            retryable,
        }
    }
}

/// Read failure from the message or event store, propagated unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreFault {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String, retryable: bool },

    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

impl StoreFault {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreFault::Unavailable { retryable: true, .. })
    }
}
