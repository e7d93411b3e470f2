/*
 * message_id.rs
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

//! Message identifiers: opaque store keys, provider ids, and RFC 5322 Message-ID values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque key of a stored inbound message. Not the Message-ID header.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(opaque: impl Into<String>) -> Self {
        Self(opaque.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id assigned by the mail provider when a message is accepted. Lifecycle events are keyed by it.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ProviderMessageId(String);

impl ProviderMessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderMessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProviderMessageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// RFC 5322 msg-id in angle-bracket form. Trims whitespace and adds brackets when missing.
pub fn angle_bracketed(id: &str) -> String {
    let id = id.trim();
    let inner = id.strip_prefix('<').unwrap_or(id);
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    format!("<{}>", inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_key_is_opaque() {
        let id = MessageId::new("inbound/2026/10/abc");
        assert_eq!(id.as_str(), "inbound/2026/10/abc");
        assert_eq!(id.to_string(), "inbound/2026/10/abc");
    }

    #[test]
    fn angle_brackets_added_once() {
        assert_eq!(angle_bracketed("<m1@x>"), "<m1@x>");
        assert_eq!(angle_bracketed("m1@x"), "<m1@x>");
        assert_eq!(angle_bracketed("  <m1@x> "), "<m1@x>");
    }
}
