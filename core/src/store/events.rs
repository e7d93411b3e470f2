/*
 * events.rs
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

//! Event store trait: read-only queries over provider lifecycle events.

use crate::error::StoreFault;
use crate::message_id::ProviderMessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope recorded with every lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventEnvelope {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
}

/// A lifecycle event as persisted by the event store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    pub message_id: ProviderMessageId,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    /// Raw JSON text as stored; may be malformed.
    pub metadata: Option<String>,
    pub envelope: EventEnvelope,
}

/// Composite key of the last event read; the store resumes strictly after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventKey {
    pub account_id: String,
    pub timestamp: DateTime<Utc>,
    pub message_id: ProviderMessageId,
}

/// Account-wide query over a time range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountQuery {
    pub account_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub limit: usize,
    pub after: Option<EventKey>,
}

/// One page of an account query. `last_key` is `None` when there is nothing more to read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventPage {
    pub events: Vec<StoredEvent>,
    pub last_key: Option<EventKey>,
}

/// Append-only event store; this crate only reads from it.
pub trait EventStore: Send + Sync {
    /// All events for one provider message id, in any order. No events is an empty vector.
    fn events_for_message(&self, id: &ProviderMessageId) -> Result<Vec<StoredEvent>, StoreFault>;

    fn query_account(&self, query: &AccountQuery) -> Result<EventPage, StoreFault>;
}
