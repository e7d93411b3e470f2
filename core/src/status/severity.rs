/*
 * severity.rs
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

//! Severity ranking of lifecycle event types.

/// Known event types in ascending severity. Rank is position + 1.
const SEVERITY_ORDER: &[&str] = &[
    "sent",
    "delivered",
    "opened",
    "clicked",
    "suppressed",
    "complained",
    "bounced",
];

/// Lower-cased, trimmed event type.
pub fn normalize_event_type(event_type: &str) -> String {
    event_type.trim().to_lowercase()
}

/// Rank of a normalised event type; 0 for types outside the table.
pub fn severity_rank(normalized: &str) -> u8 {
    SEVERITY_ORDER
        .iter()
        .position(|t| *t == normalized)
        .map_or(0, |p| (p + 1) as u8)
}
