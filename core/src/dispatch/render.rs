/*
 * render.rs
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

//! Template rendering capability used to pre-resolve batch content.

use crate::dispatch::entry::{MessageBody, TemplateRef};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Why a template could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("unknown template")]
    UnknownTemplate,

    #[error("missing variable: {0}")]
    MissingVariable(String),

    #[error("template produced no body")]
    EmptyBody,

    #[error("{0}")]
    Other(String),
}

/// Subject and body produced by rendering a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    pub subject: String,
    pub body: MessageBody,
}

/// Resolves a template reference into concrete content. Called for every
/// template entry before any bulk call is issued.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &TemplateRef) -> Result<RenderedContent, RenderError>;
}

/// Template source with `{{name}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateSource {
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
}

/// In-memory templates with `{{variable}}` substitution. Unknown placeholders are errors.
#[derive(Debug, Clone, Default)]
pub struct InlineTemplates {
    templates: HashMap<String, TemplateSource>,
}

impl InlineTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, source: TemplateSource) -> &mut Self {
        self.templates.insert(name.into(), source);
        self
    }
}

impl TemplateRenderer for InlineTemplates {
    fn render(&self, template: &TemplateRef) -> Result<RenderedContent, RenderError> {
        let source = self
            .templates
            .get(&template.name)
            .ok_or(RenderError::UnknownTemplate)?;
        let subject = substitute(&source.subject, &template.variables)?;
        let html = source
            .html
            .as_deref()
            .map(|h| substitute(h, &template.variables))
            .transpose()?;
        let text = source
            .text
            .as_deref()
            .map(|t| substitute(t, &template.variables))
            .transpose()?;
        let body = MessageBody::from_parts(html, text).ok_or(RenderError::EmptyBody)?;
        Ok(RenderedContent { subject, body })
    }
}

/// Replace `{{ name }}` placeholders. Strings insert verbatim; other JSON values use their JSON text.
pub fn substitute(source: &str, variables: &Map<String, Value>) -> Result<String, RenderError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            // Unterminated: keep literally.
            out.push_str(&rest[open..]);
            return Ok(out);
        };
        let name = after[..close].trim();
        match variables.get(name) {
            Some(Value::String(s)) => out.push_str(s),
            Some(Value::Null) => {}
            Some(other) => out.push_str(&other.to_string()),
            None => return Err(RenderError::MissingVariable(name.to_string())),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn substitutes_strings_and_numbers() {
        let out = substitute("Hi {{ name }}, you have {{count}} items", &vars(json!({"name": "Ann", "count": 3}))).unwrap();
        assert_eq!(out, "Hi Ann, you have 3 items");
    }

    #[test]
    fn missing_variable_is_error() {
        assert_eq!(
            substitute("{{who}}", &Map::new()).unwrap_err(),
            RenderError::MissingVariable("who".into())
        );
    }

    #[test]
    fn unterminated_placeholder_kept() {
        assert_eq!(substitute("a {{b", &Map::new()).unwrap(), "a {{b");
    }

    #[test]
    fn inline_templates_render_alternative() {
        let mut t = InlineTemplates::new();
        t.insert(
            "welcome",
            TemplateSource {
                subject: "Welcome {{name}}".into(),
                html: Some("<h1>{{name}}</h1>".into()),
                text: Some("Hello {{name}}".into()),
            },
        );
        let rendered = t
            .render(&TemplateRef::new("welcome").with_variable("name", "Bo"))
            .unwrap();
        assert_eq!(rendered.subject, "Welcome Bo");
        assert_eq!(
            rendered.body,
            MessageBody::Alternative {
                text: "Hello Bo".into(),
                html: "<h1>Bo</h1>".into()
            }
        );
        assert_eq!(
            t.render(&TemplateRef::new("nope")).unwrap_err(),
            RenderError::UnknownTemplate
        );
    }
}
