/*
 * forward.rs
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

//! Forward semantics: passthrough (raw rewrite) and wrapped (new message quoting the original).

use crate::mime::{format_mailbox, format_mailbox_list, ComposeRequest};
use crate::store::{Address, Attachment, StoredInboundMessage};
use crate::threading::subject::prefixed;

/// Banner separating caller text from the quoted original.
pub const FORWARD_BANNER: &str = "---------- Forwarded message ----------";

/// How a stored message is forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardMode {
    /// Resend the original bytes with From/To rewritten and an optional subject prefix.
    Passthrough { subject_prefix: Option<String> },
    /// Build a new message embedding a quoted copy of the original.
    Wrapped(WrappedForward),
}

impl Default for ForwardMode {
    fn default() -> Self {
        ForwardMode::Passthrough {
            subject_prefix: None,
        }
    }
}

/// Caller additions for a wrapped forward.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WrappedForward {
    /// Replaces the configured default prefix (normally `Fwd:`).
    pub subject_prefix: Option<String>,
    pub text: Option<String>,
    pub html: Option<String>,
    pub cc: Vec<Address>,
    pub attachments: Vec<Attachment>,
}

/// Who the forward goes to and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardOptions {
    pub from: Address,
    pub to: Vec<Address>,
    pub mode: ForwardMode,
}

impl ForwardOptions {
    pub fn passthrough(from: impl Into<Address>, to: Vec<Address>) -> Self {
        Self {
            from: from.into(),
            to,
            mode: ForwardMode::default(),
        }
    }

    pub fn wrapped(from: impl Into<Address>, to: Vec<Address>, wrapped: WrappedForward) -> Self {
        Self {
            from: from.into(),
            to,
            mode: ForwardMode::Wrapped(wrapped),
        }
    }
}

/// Compose request for a wrapped forward of `original`.
pub fn build_wrapped_forward(
    original: &StoredInboundMessage,
    from: &Address,
    to: &[Address],
    wrapped: &WrappedForward,
    default_prefix: &str,
) -> ComposeRequest {
    let prefix = wrapped.subject_prefix.as_deref().unwrap_or(default_prefix);
    let quoted = QuotedHeaders::of(original);

    ComposeRequest {
        from: from.clone(),
        to: to.to_vec(),
        cc: wrapped.cc.clone(),
        subject: prefixed(prefix, &original.subject),
        text: Some(wrapped_text(original, wrapped.text.as_deref(), &quoted)),
        html: Some(wrapped_html(
            original,
            wrapped.html.as_deref(),
            wrapped.text.as_deref(),
            &quoted,
        )),
        attachments: wrapped.attachments.clone(),
        ..ComposeRequest::default()
    }
}

struct QuotedHeaders {
    from: String,
    date: String,
    subject: String,
    to: String,
}

impl QuotedHeaders {
    fn of(original: &StoredInboundMessage) -> Self {
        let date = original
            .header("date")
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| original.received_at.to_rfc2822());
        Self {
            from: format_mailbox(&original.from),
            date,
            subject: original.subject.clone(),
            to: format_mailbox_list(&original.to),
        }
    }
}

fn wrapped_text(original: &StoredInboundMessage, caller: Option<&str>, q: &QuotedHeaders) -> String {
    let mut out = String::new();
    if let Some(text) = caller.filter(|t| !t.is_empty()) {
        out.push_str(text);
        out.push_str("\n\n");
    }
    out.push_str(FORWARD_BANNER);
    out.push('\n');
    out.push_str(&format!("From: {}\n", q.from));
    out.push_str(&format!("Date: {}\n", q.date));
    out.push_str(&format!("Subject: {}\n", q.subject));
    out.push_str(&format!("To: {}\n", q.to));
    out.push('\n');
    if let Some(text) = original.text.as_deref() {
        out.push_str(text);
    }
    out
}

fn wrapped_html(
    original: &StoredInboundMessage,
    caller_html: Option<&str>,
    caller_text: Option<&str>,
    q: &QuotedHeaders,
) -> String {
    let mut out = String::new();
    match (caller_html.filter(|h| !h.is_empty()), caller_text.filter(|t| !t.is_empty())) {
        (Some(html), _) => {
            out.push_str(html);
            out.push_str("<br><br>\n");
        }
        (None, Some(text)) => {
            out.push_str(&format!("<p>{}</p>\n", html_escape(text).replace('\n', "<br>")));
        }
        (None, None) => {}
    }
    out.push_str("<div class=\"forwarded\">\n");
    out.push_str(FORWARD_BANNER);
    out.push_str("<br>\n");
    out.push_str(&format!("From: {}<br>\n", html_escape(&q.from)));
    out.push_str(&format!("Date: {}<br>\n", html_escape(&q.date)));
    out.push_str(&format!("Subject: {}<br>\n", html_escape(&q.subject)));
    out.push_str(&format!("To: {}<br>\n", html_escape(&q.to)));
    out.push_str("<br>\n");
    match (original.html.as_deref(), original.text.as_deref()) {
        (Some(html), _) if !html.is_empty() => out.push_str(html),
        (_, Some(text)) => out.push_str(&format!("<pre>{}</pre>", html_escape(text))),
        _ => {}
    }
    out.push_str("\n</div>");
    out
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
