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

//! Collaborator traits and the data they exchange: message store, event store, transports.

mod events;
mod message;
mod store;
mod transport;

pub use events::{AccountQuery, EventEnvelope, EventKey, EventPage, EventStore, StoredEvent};
pub use message::{
    Address, Attachment, AttachmentContent, AttachmentInfo, RawLocation, StoredInboundMessage,
    TransferEncoding,
};
pub use store::MessageStore;
pub use transport::{
    BulkEntry, BulkOutcome, BulkRequest, BulkTransport, MailTransport, RawSendRequest, SendReceipt,
};
