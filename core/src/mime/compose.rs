/*
 * compose.rs
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

//! Build RFC 5322 / MIME bytes from structured fields.
//!
//! Layout:
//! - attachments present: top-level multipart/mixed, body entity first, attachments after;
//! - html and text both present: multipart/alternative, text first, html last;
//! - otherwise a single part with a top-level Content-Type.

use crate::mime::address::{escape_quoted, format_mailbox, format_mailbox_list};
use crate::mime::boundary::{unique_boundary, BoundaryGenerator, BoundaryKind, TimestampBoundaries};
use crate::mime::encoding::{base64_wrapped, rewrap_base64, to_crlf};
use crate::mime::media_type::resolve_media_type;
use crate::mime::raw::RawMessage;
use crate::store::{Address, Attachment, AttachmentContent, TransferEncoding};
use std::sync::Arc;

const TEXT_PLAIN: &str = "text/plain; charset=UTF-8";
const TEXT_HTML: &str = "text/html; charset=UTF-8";

/// Structured fields for one outbound message. Assumed pre-validated.
#[derive(Debug, Clone, Default)]
pub struct ComposeRequest {
    pub from: Address,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    pub reply_to: Vec<Address>,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    pub attachments: Vec<Attachment>,
    /// Emitted after Reply-To, in this order.
    pub custom_headers: Vec<(String, String)>,
}

impl ComposeRequest {
    pub fn new(from: impl Into<Address>, to: Vec<Address>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to,
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// All envelope recipients: to, cc, then bcc.
    pub fn destinations(&self) -> Vec<Address> {
        self.to
            .iter()
            .chain(self.cc.iter())
            .chain(self.bcc.iter())
            .cloned()
            .collect()
    }

    /// Whether html, text or an attachment is present.
    pub fn has_content(&self) -> bool {
        self.html().is_some() || self.text().is_some() || !self.attachments.is_empty()
    }

    fn html(&self) -> Option<&str> {
        self.html.as_deref().filter(|s| !s.is_empty())
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|s| !s.is_empty())
    }
}

/// Pure message builder. Cheap to clone; safe to share across threads.
#[derive(Clone)]
pub struct MessageComposer {
    boundaries: Arc<dyn BoundaryGenerator>,
}

impl Default for MessageComposer {
    fn default() -> Self {
        Self::new(Arc::new(TimestampBoundaries::new()))
    }
}

impl std::fmt::Debug for MessageComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageComposer").finish_non_exhaustive()
    }
}

impl MessageComposer {
    pub fn new(boundaries: Arc<dyn BoundaryGenerator>) -> Self {
        Self { boundaries }
    }

    /// Build the complete raw message. Has no failure path: with no html, text or
    /// attachments it emits an empty `text/plain` body.
    pub fn build_raw(&self, request: &ComposeRequest) -> RawMessage {
        let mut out = Vec::new();

        append_header(&mut out, "From", &format_mailbox(&request.from));
        append_address_header(&mut out, "To", &request.to);
        append_address_header(&mut out, "Cc", &request.cc);
        append_address_header(&mut out, "Bcc", &request.bcc);
        append_address_header(&mut out, "Reply-To", &request.reply_to);
        for (name, value) in &request.custom_headers {
            append_header(&mut out, name, value);
        }
        append_header(&mut out, "Subject", &request.subject);
        append_header(&mut out, "MIME-Version", "1.0");

        let body = self.body_entity(request.text(), request.html());

        if request.attachments.is_empty() {
            out.extend_from_slice(&body);
        } else {
            let parts: Vec<Vec<u8>> = request.attachments.iter().map(attachment_entity).collect();
            let mut enclosed: Vec<&[u8]> = vec![body.as_slice()];
            enclosed.extend(parts.iter().map(Vec::as_slice));
            let boundary = unique_boundary(self.boundaries.as_ref(), BoundaryKind::Mixed, &enclosed);

            append_header(
                &mut out,
                "Content-Type",
                &format!("multipart/mixed; boundary=\"{}\"", boundary),
            );
            out.extend_from_slice(b"\r\n");
            for part in enclosed {
                open_part(&mut out, &boundary);
                out.extend_from_slice(part);
            }
            close_multipart(&mut out, &boundary);
        }

        tracing::debug!(
            attachments = request.attachments.len(),
            custom_headers = request.custom_headers.len(),
            bytes = out.len(),
            "composed raw message"
        );
        RawMessage::from_bytes(out)
    }

    /// Body entity (its own Content-Type header, blank line, content), ending in CRLF.
    fn body_entity(&self, text: Option<&str>, html: Option<&str>) -> Vec<u8> {
        let mut out = Vec::new();
        match (text, html) {
            (Some(text), Some(html)) => {
                let text = to_crlf(text);
                let html = to_crlf(html);
                let boundary = unique_boundary(
                    self.boundaries.as_ref(),
                    BoundaryKind::Alternative,
                    &[text.as_bytes(), html.as_bytes()],
                );
                append_header(
                    &mut out,
                    "Content-Type",
                    &format!("multipart/alternative; boundary=\"{}\"", boundary),
                );
                out.extend_from_slice(b"\r\n");
                open_part(&mut out, &boundary);
                append_single_part(&mut out, TEXT_PLAIN, text.as_bytes());
                open_part(&mut out, &boundary);
                append_single_part(&mut out, TEXT_HTML, html.as_bytes());
                close_multipart(&mut out, &boundary);
            }
            (None, Some(html)) => append_single_part(&mut out, TEXT_HTML, to_crlf(html).as_bytes()),
            (Some(text), None) => append_single_part(&mut out, TEXT_PLAIN, to_crlf(text).as_bytes()),
            (None, None) => append_single_part(&mut out, TEXT_PLAIN, b""),
        }
        out
    }
}

fn append_header(out: &mut Vec<u8>, name: &str, value: &str) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(value.as_bytes());
    out.extend_from_slice(b"\r\n");
}

fn append_address_header(out: &mut Vec<u8>, name: &str, addrs: &[Address]) {
    if addrs.is_empty() {
        return;
    }
    append_header(out, name, &format_mailbox_list(addrs));
}

fn append_single_part(out: &mut Vec<u8>, content_type: &str, content: &[u8]) {
    append_header(out, "Content-Type", content_type);
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(content);
    out.extend_from_slice(b"\r\n");
}

fn open_part(out: &mut Vec<u8>, boundary: &str) {
    out.extend_from_slice(b"--");
    out.extend_from_slice(boundary.as_bytes());
    out.extend_from_slice(b"\r\n");
}

fn close_multipart(out: &mut Vec<u8>, boundary: &str) {
    out.extend_from_slice(b"--");
    out.extend_from_slice(boundary.as_bytes());
    out.extend_from_slice(b"--\r\n");
}

fn attachment_entity(att: &Attachment) -> Vec<u8> {
    let mut out = Vec::new();
    let media_type = resolve_media_type(att.content_type.as_deref(), &att.filename);
    let filename = escape_quoted(&att.filename);
    append_header(
        &mut out,
        "Content-Type",
        &format!("{}; name=\"{}\"", media_type, filename),
    );
    append_header(
        &mut out,
        "Content-Disposition",
        &format!("attachment; filename=\"{}\"", filename),
    );
    match &att.encoding {
        TransferEncoding::Base64 => {
            append_header(&mut out, "Content-Transfer-Encoding", "base64");
            out.extend_from_slice(b"\r\n");
            let encoded = match &att.content {
                AttachmentContent::Bytes(b) => base64_wrapped(b),
                AttachmentContent::Base64(s) => rewrap_base64(s),
            };
            out.extend_from_slice(encoded.as_bytes());
        }
        TransferEncoding::Other(name) => {
            // Content under any other declared encoding is copied unmodified.
            append_header(&mut out, "Content-Transfer-Encoding", name);
            out.extend_from_slice(b"\r\n");
            match &att.content {
                AttachmentContent::Bytes(b) => out.extend_from_slice(b),
                AttachmentContent::Base64(s) => out.extend_from_slice(s.as_bytes()),
            }
        }
    }
    out.extend_from_slice(b"\r\n");
    out
}
