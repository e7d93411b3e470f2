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

//! In-memory fakes of the collaborator traits, shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use mailroom_core::store::{
    AccountQuery, Address, BulkOutcome, BulkRequest, BulkTransport, EventEnvelope, EventKey,
    EventPage, EventStore, MailTransport, MessageStore, RawLocation, RawSendRequest, SendReceipt,
    StoredEvent, StoredInboundMessage,
};
use mailroom_core::{MessageId, ProviderMessageId, StoreFault, TransportFault};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 12, minute, 0).unwrap()
}

/// Stored message plus its raw bytes. Counts every read.
#[derive(Default)]
pub struct MemoryMessageStore {
    messages: HashMap<MessageId, (StoredInboundMessage, Vec<u8>)>,
    pub reads: AtomicUsize,
}

impl MemoryMessageStore {
    pub fn insert(&mut self, message: StoredInboundMessage, raw: &str) {
        self.messages
            .insert(message.id.clone(), (message, raw.as_bytes().to_vec()));
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl MessageStore for MemoryMessageStore {
    fn get_message(&self, id: &MessageId) -> Result<StoredInboundMessage, StoreFault> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.messages
            .get(id)
            .map(|(m, _)| m.clone())
            .ok_or_else(|| StoreFault::NotFound {
                entity: "message",
                id: id.to_string(),
            })
    }

    fn get_raw(&self, message: &StoredInboundMessage) -> Result<Vec<u8>, StoreFault> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.messages
            .get(&message.id)
            .map(|(_, raw)| raw.clone())
            .ok_or_else(|| StoreFault::NotFound {
                entity: "raw message",
                id: message.raw.key.clone(),
            })
    }
}

/// A stored message whose header map mirrors the raw text.
pub fn stored_message(id: &str, subject: &str, headers: &[(&str, &str)]) -> StoredInboundMessage {
    StoredInboundMessage {
        id: MessageId::new(id),
        from: Address::named("Alice Original", "alice@origin.example"),
        to: vec![Address::new("team@example.com")],
        cc: vec![],
        subject: subject.to_string(),
        text: Some("original body".to_string()),
        html: None,
        raw: RawLocation {
            container: "inbound".to_string(),
            key: id.to_string(),
        },
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        received_at: at(0),
        attachments: vec![],
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<RawSendRequest>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<RawSendRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailTransport for RecordingTransport {
    fn send_raw(&self, request: &RawSendRequest) -> Result<SendReceipt, TransportFault> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(request.clone());
        Ok(SendReceipt {
            provider_message_id: ProviderMessageId::new(format!("prov-{}", sent.len())),
            request_id: format!("req-{}", sent.len()),
        })
    }
}

/// Bulk transport that fails the windows listed in `failing_windows` and accepts
/// everything else, recording each call.
#[derive(Default)]
pub struct ScriptedBulk {
    pub failing_windows: Vec<usize>,
    pub rejected_recipients: Vec<String>,
    pub calls: Mutex<Vec<BulkRequest>>,
}

impl ScriptedBulk {
    pub fn call_sizes(&self) -> Vec<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.entries.len())
            .collect()
    }
}

impl BulkTransport for ScriptedBulk {
    fn send_bulk(&self, request: &BulkRequest) -> Result<Vec<BulkOutcome>, TransportFault> {
        let mut calls = self.calls.lock().unwrap();
        let window = calls.len();
        calls.push(request.clone());
        if self.failing_windows.contains(&window) {
            return Err(TransportFault::from_provider(&serde_json::json!({
                "name": "ThrottlingException",
                "$metadata": { "requestId": format!("bulk-{}", window), "httpStatusCode": 400 }
            })));
        }
        Ok(request
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                if self.rejected_recipients.contains(&e.recipient.email) {
                    BulkOutcome::Rejected {
                        error: "MessageRejected".to_string(),
                    }
                } else {
                    BulkOutcome::Accepted {
                        message_id: ProviderMessageId::new(format!("w{}-{}", window, i)),
                    }
                }
            })
            .collect())
    }
}

/// Events for one account, paged by `(timestamp, message_id)`.
#[derive(Default)]
pub struct MemoryEventStore {
    events: Vec<(String, StoredEvent)>,
}

impl MemoryEventStore {
    pub fn push(&mut self, account: &str, message: &str, event_type: &str, minute: u32) {
        self.events.push((
            account.to_string(),
            StoredEvent {
                message_id: ProviderMessageId::new(message),
                event_type: event_type.to_string(),
                timestamp: at(minute),
                metadata: None,
                envelope: EventEnvelope {
                    from: "sender@example.com".to_string(),
                    to: vec![format!("{}@rcpt.example", message)],
                    subject: format!("About {}", message),
                },
            },
        ));
    }
}

impl EventStore for MemoryEventStore {
    fn events_for_message(&self, id: &ProviderMessageId) -> Result<Vec<StoredEvent>, StoreFault> {
        Ok(self
            .events
            .iter()
            .filter(|(_, e)| &e.message_id == id)
            .map(|(_, e)| e.clone())
            .collect())
    }

    fn query_account(&self, query: &AccountQuery) -> Result<EventPage, StoreFault> {
        let mut matching: Vec<&StoredEvent> = self
            .events
            .iter()
            .filter(|(account, e)| {
                account == &query.account_id
                    && e.timestamp >= query.start
                    && e.timestamp <= query.end
            })
            .map(|(_, e)| e)
            .filter(|e| match &query.after {
                Some(k) => (e.timestamp, &e.message_id) > (k.timestamp, &k.message_id),
                None => true,
            })
            .collect();
        matching.sort_by(|a, b| (a.timestamp, &a.message_id).cmp(&(b.timestamp, &b.message_id)));

        let more = matching.len() > query.limit;
        let events: Vec<StoredEvent> = matching.into_iter().take(query.limit).cloned().collect();
        let last_key = if more {
            events.last().map(|e| EventKey {
                account_id: query.account_id.clone(),
                timestamp: e.timestamp,
                message_id: e.message_id.clone(),
            })
        } else {
            None
        };
        Ok(EventPage { events, last_key })
    }
}
