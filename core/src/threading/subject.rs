/*
 * subject.rs
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

//! Subject prefixing for replies and forwards.

const REPLY_PREFIX: &str = "Re:";

/// `Re: <subject>`, unless the subject already starts with `Re:` (any case).
pub fn reply_subject(original: &str) -> String {
    let trimmed = original.trim_start();
    let already = trimmed
        .get(..REPLY_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(REPLY_PREFIX));
    if already {
        original.to_string()
    } else {
        prefixed(REPLY_PREFIX, original)
    }
}

/// `<prefix> <subject>`. Not idempotent; applied once per forward.
pub fn prefixed(prefix: &str, subject: &str) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return subject.to_string();
    }
    if subject.is_empty() {
        return prefix.to_string();
    }
    format!("{} {}", prefix, subject)
}
