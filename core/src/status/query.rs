/*
 * query.rs
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

//! Status lookups over the event store: by message id, or paged by account and time range.

use crate::capability::Capability;
use crate::error::{Result, ValidationFault};
use crate::message_id::ProviderMessageId;
use crate::status::aggregate::{derive_status, DerivedStatus};
use crate::status::token::{decode_token, encode_token};
use crate::store::{AccountQuery, EventStore, StoredEvent};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Events per page when the caller does not say.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Upper bound on events per page.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Account-wide status request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStatusRequest {
    pub account_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Events (not messages) per page; clamped to `1..=MAX_PAGE_SIZE`, 0 means default.
    pub limit: usize,
    pub continuation: Option<String>,
}

/// One page of derived statuses. Pass `next_token` back to continue.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusPage {
    pub statuses: Vec<DerivedStatus>,
    pub next_token: Option<String>,
}

/// Reads events and derives statuses. Never writes to the store.
pub struct StatusQuery {
    events: Capability<Arc<dyn EventStore>>,
}

impl StatusQuery {
    pub fn new(events: Capability<Arc<dyn EventStore>>) -> Self {
        Self { events }
    }

    /// Status of one message. `Ok(None)` when no events exist yet.
    pub fn status_for_message(&self, id: &ProviderMessageId) -> Result<Option<DerivedStatus>> {
        let store = self.events.get()?;
        let events = store.events_for_message(id)?;
        tracing::debug!(message_id = %id, events = events.len(), "deriving message status");
        Ok(derive_status(events))
    }

    /// Statuses for an account over a time range, one page at a time.
    ///
    /// Pages are cut by event count; the page only decides which messages are listed.
    /// Each listed message is derived from all of its events, so a message whose events
    /// straddle a page boundary reports the same status on every page it appears on.
    pub fn statuses_for_account(&self, request: &AccountStatusRequest) -> Result<StatusPage> {
        if request.account_id.trim().is_empty() {
            return Err(ValidationFault::MissingField("account_id").into());
        }
        if request.start > request.end {
            return Err(ValidationFault::InvalidTimeRange {
                start: request.start.to_rfc3339(),
                end: request.end.to_rfc3339(),
            }
            .into());
        }
        let after = match request.continuation.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(token) => {
                let key = decode_token(token)?;
                if key.account_id != request.account_id {
                    return Err(ValidationFault::MalformedToken(
                        "token was issued for a different account".into(),
                    )
                    .into());
                }
                Some(key)
            }
            None => None,
        };
        let store = self.events.get()?;

        let limit = match request.limit {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };
        let page = store.query_account(&AccountQuery {
            account_id: request.account_id.clone(),
            start: request.start,
            end: request.end,
            limit,
            after,
        })?;

        let event_count = page.events.len();
        let mut statuses = Vec::new();
        for id in message_ids_in_order(&page.events) {
            let events = store.events_for_message(&id)?;
            if let Some(status) = derive_status(events) {
                statuses.push(status);
            }
        }
        let next_token = page.last_key.as_ref().map(encode_token);
        tracing::debug!(
            account_id = %request.account_id,
            events = event_count,
            messages = statuses.len(),
            more = next_token.is_some(),
            "derived account statuses"
        );
        Ok(StatusPage {
            statuses,
            next_token,
        })
    }
}

/// Distinct message ids in first-appearance order.
fn message_ids_in_order(events: &[StoredEvent]) -> Vec<ProviderMessageId> {
    let mut ids: Vec<ProviderMessageId> = Vec::new();
    for event in events {
        if !ids.contains(&event.message_id) {
            ids.push(event.message_id.clone());
        }
    }
    ids
}
