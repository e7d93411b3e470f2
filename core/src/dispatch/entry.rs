/*
 * entry.rs
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

//! Batch request types and resolution of loosely-typed content fields into one tagged variant.

use crate::error::ValidationFault;
use crate::store::Address;
use serde_json::{Map, Value};

/// Provider message tag (e.g. for event routing or analytics).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Reference to a renderable template plus its variables.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRef {
    pub name: String,
    pub variables: Map<String, Value>,
}

impl TemplateRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Map::new(),
        }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }
}

/// Content fields as callers supply them. `template` excludes `html`/`text`;
/// `html` with `text` is an alternative body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentFields {
    pub html: Option<String>,
    pub text: Option<String>,
    pub template: Option<TemplateRef>,
}

impl ContentFields {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Self::default()
        }
    }

    pub fn template(template: TemplateRef) -> Self {
        Self {
            template: Some(template),
            ..Self::default()
        }
    }
}

/// A concrete body. The composer and bulk transport only ever see this form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    Html(String),
    Alternative { text: String, html: String },
}

impl MessageBody {
    pub fn text(&self) -> Option<&str> {
        match self {
            MessageBody::Text(t) | MessageBody::Alternative { text: t, .. } => Some(t.as_str()),
            MessageBody::Html(_) => None,
        }
    }

    pub fn html(&self) -> Option<&str> {
        match self {
            MessageBody::Html(h) | MessageBody::Alternative { html: h, .. } => Some(h.as_str()),
            MessageBody::Text(_) => None,
        }
    }

    /// From optional html/text; `None` when both are absent or empty.
    pub fn from_parts(html: Option<String>, text: Option<String>) -> Option<Self> {
        let html = html.filter(|s| !s.is_empty());
        let text = text.filter(|s| !s.is_empty());
        match (html, text) {
            (Some(html), Some(text)) => Some(MessageBody::Alternative { text, html }),
            (Some(html), None) => Some(MessageBody::Html(html)),
            (None, Some(text)) => Some(MessageBody::Text(text)),
            (None, None) => None,
        }
    }
}

/// Validated entry content: a ready body, or a template still to render.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryContent {
    Body { subject: String, body: MessageBody },
    Template(TemplateRef),
}

/// One recipient of a batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DispatchEntry {
    pub recipient: Address,
    /// Falls back to [`BatchRequest::subject`] for non-template content.
    pub subject: Option<String>,
    pub content: ContentFields,
    pub tags: Vec<Tag>,
}

impl DispatchEntry {
    pub fn new(recipient: impl Into<Address>, content: ContentFields) -> Self {
        Self {
            recipient: recipient.into(),
            content,
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }
}

/// Ordered entries under a shared sender. Consumed by exactly one dispatch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchRequest {
    pub from: Address,
    pub reply_to: Vec<Address>,
    pub subject: Option<String>,
    pub entries: Vec<DispatchEntry>,
}

/// Validate one entry and resolve its content fields.
pub(crate) fn resolve_entry(
    index: usize,
    entry: &DispatchEntry,
    default_subject: Option<&str>,
) -> Result<EntryContent, ValidationFault> {
    if entry.recipient.email.trim().is_empty() {
        return Err(ValidationFault::EntryMissingField {
            index,
            field: "recipient",
        });
    }
    let fields = &entry.content;
    let has_html = fields.html.as_deref().is_some_and(|s| !s.is_empty());
    let has_text = fields.text.as_deref().is_some_and(|s| !s.is_empty());

    if let Some(template) = &fields.template {
        if has_html || has_text {
            let mut set = vec!["template"];
            if has_html {
                set.push("html");
            }
            if has_text {
                set.push("text");
            }
            return Err(ValidationFault::ConflictingContent {
                index,
                fields: set.join(", "),
            });
        }
        if template.name.trim().is_empty() {
            return Err(ValidationFault::EntryMissingField {
                index,
                field: "template name",
            });
        }
        return Ok(EntryContent::Template(template.clone()));
    }

    let body = MessageBody::from_parts(fields.html.clone(), fields.text.clone())
        .ok_or(ValidationFault::EntryMissingField {
            index,
            field: "content",
        })?;
    let subject = entry
        .subject
        .as_deref()
        .or(default_subject)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationFault::EntryMissingField {
            index,
            field: "subject",
        })?;
    Ok(EntryContent::Body {
        subject: subject.to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_html_make_alternative() {
        let entry = DispatchEntry::new(
            "a@x",
            ContentFields {
                html: Some("<p>h</p>".into()),
                text: Some("t".into()),
                template: None,
            },
        )
        .with_subject("S");
        let content = resolve_entry(0, &entry, None).unwrap();
        assert_eq!(
            content,
            EntryContent::Body {
                subject: "S".into(),
                body: MessageBody::Alternative {
                    text: "t".into(),
                    html: "<p>h</p>".into()
                }
            }
        );
    }

    #[test]
    fn template_with_html_conflicts() {
        let mut fields = ContentFields::template(TemplateRef::new("welcome"));
        fields.html = Some("<p>x</p>".into());
        let err = resolve_entry(3, &DispatchEntry::new("a@x", fields), None).unwrap_err();
        assert_eq!(
            err,
            ValidationFault::ConflictingContent {
                index: 3,
                fields: "template, html".into()
            }
        );
    }

    #[test]
    fn missing_content_and_recipient() {
        let err = resolve_entry(1, &DispatchEntry::new("a@x", ContentFields::default()), Some("S")).unwrap_err();
        assert_eq!(err, ValidationFault::EntryMissingField { index: 1, field: "content" });
        let err = resolve_entry(2, &DispatchEntry::new("", ContentFields::text("t")), Some("S")).unwrap_err();
        assert_eq!(err, ValidationFault::EntryMissingField { index: 2, field: "recipient" });
    }

    #[test]
    fn subject_falls_back_to_batch_default() {
        let entry = DispatchEntry::new("a@x", ContentFields::text("t"));
        match resolve_entry(0, &entry, Some("Batch subject")).unwrap() {
            EntryContent::Body { subject, .. } => assert_eq!(subject, "Batch subject"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            resolve_entry(0, &entry, None).unwrap_err(),
            ValidationFault::EntryMissingField { index: 0, field: "subject" }
        );
    }

    #[test]
    fn template_needs_no_subject() {
        let entry = DispatchEntry::new("a@x", ContentFields::template(TemplateRef::new("t1")));
        assert!(matches!(resolve_entry(0, &entry, None), Ok(EntryContent::Template(_))));
    }
}
