/*
 * store.rs
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

//! Message store trait: read-only access to messages produced by the ingestion pipeline.

use crate::error::StoreFault;
use crate::message_id::MessageId;
use crate::store::message::StoredInboundMessage;

/// Parsed/raw message store keyed by opaque message id.
pub trait MessageStore: Send + Sync {
    /// Parsed envelope, headers and bodies. A missing id is `StoreFault::NotFound`.
    fn get_message(&self, id: &MessageId) -> Result<StoredInboundMessage, StoreFault>;

    /// Original raw bytes the message was parsed from, read through `message.raw`.
    fn get_raw(&self, message: &StoredInboundMessage) -> Result<Vec<u8>, StoreFault>;
}
