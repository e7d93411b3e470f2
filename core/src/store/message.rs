/*
 * message.rs
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

//! Address, attachment and stored-message types.

use crate::message_id::MessageId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Email or identity address with optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub email: String,
    pub name: Option<String>,
}

impl Address {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn named(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Content-Transfer-Encoding of an attachment part.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// Content is base64 encoded (or re-wrapped) at 76 characters per line.
    #[default]
    Base64,
    /// Any other declared encoding; content is emitted unmodified under this name.
    Other(String),
}

/// Attachment payload: raw bytes, or text already in base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentContent {
    Bytes(Vec<u8>),
    Base64(String),
}

/// Attachment for an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: AttachmentContent,
    /// Explicit MIME type. When absent it is inferred from the filename extension.
    pub content_type: Option<String>,
    pub encoding: TransferEncoding,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: AttachmentContent::Bytes(content.into()),
            content_type: None,
            encoding: TransferEncoding::Base64,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_encoding(mut self, encoding: TransferEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// One entry of a stored message's attachment manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
}

/// Pointer to the original raw bytes of a stored message (e.g. bucket + key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLocation {
    pub container: String,
    pub key: String,
}

/// A message produced by the ingestion pipeline. Read-only here.
#[derive(Debug, Clone)]
pub struct StoredInboundMessage {
    pub id: MessageId,
    pub from: Address,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub raw: RawLocation,
    /// Header map as stored; lookups go through [`StoredInboundMessage::header`].
    pub headers: HashMap<String, String>,
    pub received_at: DateTime<Utc>,
    pub attachments: Vec<AttachmentInfo>,
}

impl StoredInboundMessage {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Message-ID header, if any and not blank.
    pub fn message_id_header(&self) -> Option<&str> {
        self.header("message-id").map(str::trim).filter(|s| !s.is_empty())
    }

    /// References header, if any and not blank.
    pub fn references_header(&self) -> Option<&str> {
        self.header("references").map(str::trim).filter(|s| !s.is_empty())
    }
}
