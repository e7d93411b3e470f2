/*
 * transport.rs
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

//! Transport traits: single raw-message send and windowed bulk send.

use crate::dispatch::{MessageBody, Tag};
use crate::error::TransportFault;
use crate::message_id::ProviderMessageId;
use crate::mime::RawMessage;
use crate::store::message::Address;

/// A fully assembled message plus its SMTP-level envelope.
#[derive(Debug, Clone)]
pub struct RawSendRequest {
    pub from: Address,
    /// Every envelope recipient (to, cc and bcc).
    pub destinations: Vec<Address>,
    pub raw: RawMessage,
}

/// What the provider returns when it accepts a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub provider_message_id: ProviderMessageId,
    pub request_id: String,
}

/// Single-message transport. Implementations normalise provider errors with
/// [`TransportFault::from_provider`] before returning them.
pub trait MailTransport: Send + Sync {
    fn send_raw(&self, request: &RawSendRequest) -> Result<SendReceipt, TransportFault>;
}

/// One per-recipient entry of a bulk call. Content is already resolved.
#[derive(Debug, Clone)]
pub struct BulkEntry {
    pub recipient: Address,
    pub subject: String,
    pub body: MessageBody,
    pub tags: Vec<Tag>,
}

/// One provider call: a shared sender and at most one window of entries.
#[derive(Debug, Clone)]
pub struct BulkRequest {
    pub from: Address,
    pub reply_to: Vec<Address>,
    pub entries: Vec<BulkEntry>,
}

/// Per-entry outcome reported by the provider, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    Accepted { message_id: ProviderMessageId },
    Rejected { error: String },
}

/// Bulk transport. A whole-call failure (throttling, auth) is returned as `Err`;
/// per-entry rejections are reported inside the `Ok` vector.
pub trait BulkTransport: Send + Sync {
    fn send_bulk(&self, request: &BulkRequest) -> Result<Vec<BulkOutcome>, TransportFault>;
}
