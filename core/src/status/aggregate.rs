/*
 * aggregate.rs
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

//! Reduce the events of one message into a canonical status.
//!
//! The status is the event with the highest severity observed, not the latest:
//! an `opened` after a `bounced` leaves the message bounced.

use crate::message_id::ProviderMessageId;
use crate::status::severity::{normalize_event_type, severity_rank};
use crate::store::StoredEvent;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// One event in a derived status, with metadata parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleEvent {
    /// Normalised (lower-case) type; unknown types are kept as-is.
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Canonical delivery status of one provider message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedStatus {
    pub message_id: ProviderMessageId,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub status: String,
    /// Earliest event timestamp.
    pub sent_at: DateTime<Utc>,
    /// Latest event timestamp.
    pub last_event_at: DateTime<Utc>,
    /// All events, ascending by timestamp.
    pub events: Vec<LifecycleEvent>,
}

/// Derive the status of one message from its events (any order). `None` when there are none.
///
/// All events are assumed to share a message id; the first event's id is used.
/// The envelope comes from the earliest event.
pub fn derive_status(mut events: Vec<StoredEvent>) -> Option<DerivedStatus> {
    // Stable: equal timestamps keep input order.
    events.sort_by_key(|e| e.timestamp);
    let first = events.first()?;
    let last = events.last()?;

    let message_id = first.message_id.clone();
    let from = first.envelope.from.clone();
    let to = first.envelope.to.clone();
    let subject = first.envelope.subject.clone();
    let sent_at = first.timestamp;
    let last_event_at = last.timestamp;

    let lifecycle: Vec<LifecycleEvent> = events.into_iter().map(to_lifecycle_event).collect();

    let mut status_index = 0;
    let mut status_rank = severity_rank(&lifecycle[0].event_type);
    for (i, event) in lifecycle.iter().enumerate().skip(1) {
        let rank = severity_rank(&event.event_type);
        if rank > status_rank {
            status_rank = rank;
            status_index = i;
        }
    }
    let status = lifecycle[status_index].event_type.clone();

    Some(DerivedStatus {
        message_id,
        from,
        to,
        subject,
        status,
        sent_at,
        last_event_at,
        events: lifecycle,
    })
}

/// Group events by message id and derive one status per message, in first-appearance order.
pub fn aggregate_by_message(events: Vec<StoredEvent>) -> Vec<DerivedStatus> {
    let mut order: Vec<ProviderMessageId> = Vec::new();
    let mut groups: HashMap<ProviderMessageId, Vec<StoredEvent>> = HashMap::new();
    for event in events {
        let group = groups.entry(event.message_id.clone()).or_insert_with(|| {
            order.push(event.message_id.clone());
            Vec::new()
        });
        group.push(event);
    }
    order
        .into_iter()
        .filter_map(|id| groups.remove(&id).and_then(derive_status))
        .collect()
}

fn to_lifecycle_event(event: StoredEvent) -> LifecycleEvent {
    let metadata = event.metadata.as_deref().and_then(|raw| match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(
                message_id = %event.message_id,
                event_type = %event.event_type,
                error = %e,
                "dropping unparsable event metadata"
            );
            None
        }
    });
    LifecycleEvent {
        event_type: normalize_event_type(&event.event_type),
        timestamp: event.timestamp,
        metadata,
    }
}
