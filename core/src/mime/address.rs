/*
 * address.rs
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

//! RFC 5322 mailbox rendering for header values.

use crate::store::Address;

/// Render one address: a bare address as-is, a named one as `"Name" <addr>`.
pub fn format_mailbox(address: &Address) -> String {
    match address.name.as_deref() {
        Some(name) if !name.is_empty() => {
            format!("\"{}\" <{}>", escape_quoted(name), address.email)
        }
        _ => address.email.clone(),
    }
}

/// Render an address list joined by `, `.
pub fn format_mailbox_list(addresses: &[Address]) -> String {
    addresses
        .iter()
        .map(format_mailbox)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Backslash-escape `\` and `"` for use inside a quoted-string.
pub fn escape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Inverse of [`escape_quoted`]: a backslash quotes the next character.
pub fn unescape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_address_as_is() {
        assert_eq!(format_mailbox(&Address::new("a@example.com")), "a@example.com");
    }

    #[test]
    fn empty_name_is_plain() {
        assert_eq!(format_mailbox(&Address::named("", "a@example.com")), "a@example.com");
    }

    #[test]
    fn named_address_quoted() {
        let a = Address::named("Ada Lovelace", "ada@example.com");
        assert_eq!(format_mailbox(&a), "\"Ada Lovelace\" <ada@example.com>");
    }

    #[test]
    fn quote_and_backslash_escaped_and_recoverable() {
        let name = r#"Bob "The \ Builder""#;
        let rendered = format_mailbox(&Address::named(name, "bob@example.com"));
        assert_eq!(rendered, r#""Bob \"The \\ Builder\"" <bob@example.com>"#);
        let quoted = rendered
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix(" <bob@example.com>"))
            .and_then(|s| s.strip_suffix('"'))
            .unwrap();
        assert_eq!(unescape_quoted(quoted), name);
    }

    #[test]
    fn list_joined() {
        let list = vec![Address::new("a@x"), Address::named("B", "b@x")];
        assert_eq!(format_mailbox_list(&list), "a@x, \"B\" <b@x>");
    }
}
