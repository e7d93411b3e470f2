/*
 * raw.rs
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

//! Immutable raw message bytes handed to the transport.

use std::fmt;

/// CRLF-terminated header block + body. Built per call, never retained.
#[derive(Clone, PartialEq, Eq)]
pub struct RawMessage(Vec<u8>);

impl RawMessage {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lossy UTF-8 view, for logging and inspection.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    /// The header block (up to but excluding the first empty line).
    pub fn header_block(&self) -> &[u8] {
        let end = find_header_end(&self.0).map_or(self.0.len(), |(start, _)| start);
        &self.0[..end]
    }
}

impl fmt::Debug for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawMessage").field("len", &self.0.len()).finish()
    }
}

/// Locate the blank line separating headers from body.
/// Returns (index where the separator starts, index where the body starts).
/// Accepts CRLF CRLF as well as bare LF LF.
pub(crate) fn find_header_end(bytes: &[u8]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' {
            let next = i + 1;
            if bytes.get(next) == Some(&b'\n') {
                return Some((i + 1, next + 1));
            }
            if bytes.get(next) == Some(&b'\r') && bytes.get(next + 1) == Some(&b'\n') {
                return Some((i + 1, next + 2));
            }
        }
        i += 1;
    }
    None
}
