/*
 * reply.rs
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

//! Reply semantics: recipient, idempotent subject, and thread headers.

use crate::message_id::angle_bracketed;
use crate::mime::ComposeRequest;
use crate::store::{Address, Attachment, StoredInboundMessage};
use crate::threading::headers::references_chain;
use crate::threading::subject::reply_subject;

/// Caller content for a reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplyOptions {
    pub from: Address,
    pub text: Option<String>,
    pub html: Option<String>,
    pub cc: Vec<Address>,
    pub attachments: Vec<Attachment>,
}

impl ReplyOptions {
    pub fn text(from: impl Into<Address>, text: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Whether the reply carries text, html or an attachment.
    pub fn has_content(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
            || self.html.as_deref().is_some_and(|h| !h.is_empty())
            || !self.attachments.is_empty()
    }
}

/// `In-Reply-To` and `References` for a reply to `original`; empty when it has no Message-ID.
pub fn thread_headers(original: &StoredInboundMessage) -> Vec<(String, String)> {
    let Some(message_id) = original.message_id_header() else {
        return Vec::new();
    };
    vec![
        ("In-Reply-To".to_string(), angle_bracketed(message_id)),
        (
            "References".to_string(),
            references_chain(original.references_header(), message_id),
        ),
    ]
}

/// Compose request replying to the original sender.
pub fn build_reply(original: &StoredInboundMessage, options: &ReplyOptions) -> ComposeRequest {
    ComposeRequest {
        from: options.from.clone(),
        to: vec![original.from.clone()],
        cc: options.cc.clone(),
        subject: reply_subject(&original.subject),
        html: options.html.clone(),
        text: options.text.clone(),
        attachments: options.attachments.clone(),
        custom_headers: thread_headers(original),
        ..ComposeRequest::default()
    }
}
