/*
 * mod.rs
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

//! Delivery status derived from unordered lifecycle events.

mod aggregate;
mod query;
mod severity;
mod token;

pub use aggregate::{aggregate_by_message, derive_status, DerivedStatus, LifecycleEvent};
pub use query::{AccountStatusRequest, StatusPage, StatusQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use severity::{normalize_event_type, severity_rank};
pub use token::{decode_token, encode_token};
