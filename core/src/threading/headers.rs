/*
 * headers.rs
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

//! Header-level rewriting of raw messages and thread header values.

use crate::message_id::angle_bracketed;
use crate::mime::{find_header_end, format_mailbox, format_mailbox_list};
use crate::store::Address;

/// Rewrite addressing of a raw message for a passthrough forward.
///
/// Only the header block is touched: the `From:` and `To:` fields (with their folded
/// continuation lines) are replaced, later duplicates of either are dropped, and the
/// `Subject:` value gets `subject_prefix` prepended. Fields that are missing are inserted
/// at the top. Everything else, including the body, is copied byte for byte.
pub fn build_passthrough(
    raw: &[u8],
    from: &Address,
    to: &[Address],
    subject_prefix: Option<&str>,
) -> Vec<u8> {
    let header_len = find_header_end(raw).map_or(raw.len(), |(start, _)| start);
    let (head, rest) = raw.split_at(header_len);
    let default_eol: &[u8] = if head.is_empty() || head.windows(2).any(|w| w == b"\r\n") {
        b"\r\n"
    } else {
        b"\n"
    };
    let prefix = subject_prefix.map(str::trim).filter(|p| !p.is_empty());

    let from_value = format!("From: {}", format_mailbox(from));
    let to_value = format!("To: {}", format_mailbox_list(to));

    let mut fields_out = Vec::with_capacity(head.len() + 64);
    let mut seen_from = false;
    let mut seen_to = false;
    let mut seen_subject = false;

    for field in split_fields(head) {
        match field_name(field) {
            Some(name) if name.eq_ignore_ascii_case(b"from") => {
                if !seen_from {
                    fields_out.extend_from_slice(from_value.as_bytes());
                    fields_out.extend_from_slice(line_ending(field));
                    seen_from = true;
                }
            }
            Some(name) if name.eq_ignore_ascii_case(b"to") => {
                if !seen_to {
                    fields_out.extend_from_slice(to_value.as_bytes());
                    fields_out.extend_from_slice(line_ending(field));
                    seen_to = true;
                }
            }
            Some(name) if name.eq_ignore_ascii_case(b"subject") && prefix.is_some() && !seen_subject => {
                seen_subject = true;
                if let Some(p) = prefix {
                    prefix_subject_field(&mut fields_out, field, p);
                }
            }
            _ => fields_out.extend_from_slice(field),
        }
    }

    let mut out = Vec::with_capacity(raw.len() + 128);
    if !seen_from {
        out.extend_from_slice(from_value.as_bytes());
        out.extend_from_slice(default_eol);
    }
    if !seen_to {
        out.extend_from_slice(to_value.as_bytes());
        out.extend_from_slice(default_eol);
    }
    if let (Some(p), false) = (prefix, seen_subject) {
        out.extend_from_slice(format!("Subject: {}", p).as_bytes());
        out.extend_from_slice(default_eol);
    }
    out.extend_from_slice(&fields_out);
    out.extend_from_slice(rest);
    out
}

/// References value for a reply: prior References, a space, then the message id.
pub fn references_chain(existing: Option<&str>, message_id: &str) -> String {
    let id = angle_bracketed(message_id);
    match existing.map(str::trim).filter(|r| !r.is_empty()) {
        Some(prior) => format!("{} {}", prior, id),
        None => id,
    }
}

/// Split a header block into fields; a field is one line plus any continuation lines.
fn split_fields(head: &[u8]) -> Vec<&[u8]> {
    let mut fields = Vec::new();
    let mut field_start = 0;
    let mut line_start = 0;
    while line_start < head.len() {
        let line_end = head[line_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(head.len(), |p| line_start + p + 1);
        let is_continuation = matches!(head[line_start], b' ' | b'\t');
        if !is_continuation && line_start > field_start {
            fields.push(&head[field_start..line_start]);
            field_start = line_start;
        }
        line_start = line_end;
    }
    if field_start < head.len() {
        fields.push(&head[field_start..]);
    }
    fields
}

/// Field name (bytes before the colon), or `None` for lines that are not fields.
fn field_name(field: &[u8]) -> Option<&[u8]> {
    let colon = field.iter().position(|&b| b == b':')?;
    let name = &field[..colon];
    if name.is_empty() || name.iter().any(|b| b.is_ascii_whitespace()) {
        return None;
    }
    Some(name)
}

/// Terminator of a field's first line.
fn line_ending(field: &[u8]) -> &'static [u8] {
    match field.iter().position(|&b| b == b'\n') {
        Some(p) if p > 0 && field[p - 1] == b'\r' => b"\r\n",
        Some(_) => b"\n",
        None => b"",
    }
}

fn prefix_subject_field(out: &mut Vec<u8>, field: &[u8], prefix: &str) {
    // field_name succeeded, so a colon exists.
    let colon = field.iter().position(|&b| b == b':').unwrap_or(0);
    let mut value = &field[colon + 1..];
    while let Some((&b, tail)) = value.split_first() {
        if b == b' ' || b == b'\t' {
            value = tail;
        } else {
            break;
        }
    }
    out.extend_from_slice(b"Subject: ");
    out.extend_from_slice(prefix.as_bytes());
    let empty = value.is_empty() || value[0] == b'\r' || value[0] == b'\n';
    if !empty {
        out.push(b' ');
    }
    out.extend_from_slice(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &[u8] = b"Return-Path: <orig@sender.test>\r\n\
From: \"Original Sender\" <orig@sender.test>\r\n\
To: first@inbox.test,\r\n second@inbox.test\r\n\
Subject: Hello\r\n\
Message-ID: <m1@x>\r\n\
\r\n\
From: this body line is not a header\r\n\
To: neither is this\r\n";

    fn rewrite(prefix: Option<&str>) -> String {
        let out = build_passthrough(
            RAW,
            &Address::named("Forwarder", "fwd@relay.test"),
            &[Address::new("dest@elsewhere.test")],
            prefix,
        );
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn from_and_to_replaced_in_place() {
        let out = rewrite(None);
        assert!(out.starts_with("Return-Path: <orig@sender.test>\r\nFrom: \"Forwarder\" <fwd@relay.test>\r\nTo: dest@elsewhere.test\r\nSubject: Hello\r\n"));
        let from_line = out.lines().find(|l| l.starts_with("From: ")).unwrap();
        assert!(!from_line.contains("orig@sender.test"));
        assert!(!out.contains("second@inbox.test"));
    }

    #[test]
    fn body_preserved_byte_for_byte() {
        let out = rewrite(Some("[FWD]"));
        assert!(out.ends_with("\r\n\r\nFrom: this body line is not a header\r\nTo: neither is this\r\n"));
    }

    #[test]
    fn subject_prefixed_once() {
        let out = rewrite(Some("[FWD]"));
        assert!(out.contains("\r\nSubject: [FWD] Hello\r\n"));
        assert_eq!(out.matches("Subject:").count(), 1);
    }

    #[test]
    fn prefix_is_not_idempotence_protected() {
        let once = build_passthrough(RAW, &Address::new("a@x"), &[Address::new("b@x")], Some("[FWD]"));
        let twice = build_passthrough(&once, &Address::new("a@x"), &[Address::new("b@x")], Some("[FWD]"));
        assert!(String::from_utf8(twice).unwrap().contains("Subject: [FWD] [FWD] Hello\r\n"));
    }

    #[test]
    fn missing_headers_inserted_at_top() {
        let raw = b"Subject: x\nX-Other: 1\n\nbody";
        let out = build_passthrough(raw, &Address::new("a@x"), &[Address::new("b@x"), Address::new("c@x")], None);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "From: a@x\nTo: b@x, c@x\nSubject: x\nX-Other: 1\n\nbody"
        );
    }

    #[test]
    fn duplicate_from_dropped() {
        let raw = b"From: one@x\r\nFROM: two@x\r\n\r\nb";
        let out = build_passthrough(raw, &Address::new("new@x"), &[Address::new("t@x")], None);
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("one@x"));
        assert!(!out.contains("two@x"));
        assert!(out.starts_with("To: t@x\r\nFrom: new@x\r\n\r\nb"));
    }

    #[test]
    fn non_utf8_body_untouched() {
        let mut raw = b"From: a@x\r\nTo: b@x\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0xff, 0xfe, 0x00, 0x80]);
        let out = build_passthrough(&raw, &Address::new("n@x"), &[Address::new("m@x")], None);
        assert!(out.ends_with(&[0xff, 0xfe, 0x00, 0x80]));
    }

    #[test]
    fn references_appended() {
        assert_eq!(references_chain(None, "<m1@x>"), "<m1@x>");
        assert_eq!(references_chain(Some("  "), "<m1@x>"), "<m1@x>");
        assert_eq!(references_chain(Some("<a@x> <b@x>"), "<m1@x>"), "<a@x> <b@x> <m1@x>");
        assert_eq!(references_chain(Some("<a@x>"), "m1@x"), "<a@x> <m1@x>");
    }

    #[test]
    fn fields_keep_continuations() {
        let fields = split_fields(b"A: 1\r\n 2\r\nB: 3\r\n");
        assert_eq!(fields, vec![&b"A: 1\r\n 2\r\n"[..], &b"B: 3\r\n"[..]]);
    }
}
