/*
 * encoding.rs
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

//! Content-Transfer-Encoding helpers for outbound parts (RFC 2045).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Maximum encoded line length for base64 bodies.
pub const BASE64_LINE_LEN: usize = 76;

/// Base64 encode and wrap at 76 characters per line, lines joined by CRLF (no trailing CRLF).
pub fn base64_wrapped(data: &[u8]) -> String {
    wrap_lines(&BASE64.encode(data))
}

/// Re-wrap text that is already base64: strip all whitespace, then wrap at 76.
pub fn rewrap_base64(encoded: &str) -> String {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    wrap_lines(&compact)
}

fn wrap_lines(compact: &str) -> String {
    // base64 alphabet is ASCII, so byte chunks are char boundaries.
    compact
        .as_bytes()
        .chunks(BASE64_LINE_LEN)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Normalise line endings to CRLF (bare LF and bare CR become CRLF).
pub fn to_crlf(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 32);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\r\n");
            }
            '\n' => out.push_str("\r\n"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_at_most_76() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let wrapped = base64_wrapped(&data);
        let lines: Vec<&str> = wrapped.split("\r\n").collect();
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= BASE64_LINE_LEN));
        assert!(lines[..lines.len() - 1].iter().all(|l| l.len() == BASE64_LINE_LEN));
        assert_eq!(BASE64.decode(lines.concat()).unwrap(), data);
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(base64_wrapped(&[]), "");
    }

    #[test]
    fn rewrap_strips_existing_breaks() {
        let original = BASE64.encode(vec![7u8; 200]);
        let badly_wrapped = original
            .as_bytes()
            .chunks(100)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        let rewrapped = rewrap_base64(&badly_wrapped);
        assert_eq!(rewrapped, base64_wrapped(&[7u8; 200]));
    }

    #[test]
    fn crlf_normalisation() {
        assert_eq!(to_crlf("a\nb\r\nc\rd"), "a\r\nb\r\nc\r\nd");
    }
}
