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

//! Reply and forward threading against stored inbound messages.
//!
//! Passthrough forwards rewrite the original raw bytes and bypass the composer;
//! wrapped forwards and replies are assembled by [`MessageComposer`].

mod forward;
mod headers;
mod reply;
mod subject;

pub use forward::{build_wrapped_forward, html_escape, ForwardMode, ForwardOptions, WrappedForward, FORWARD_BANNER};
pub use headers::{references_chain, build_passthrough};
pub use reply::{build_reply, thread_headers, ReplyOptions};
pub use subject::{prefixed, reply_subject};

use crate::capability::Capability;
use crate::error::{Result, ValidationFault};
use crate::message_id::MessageId;
use crate::mime::{MessageComposer, RawMessage};
use crate::store::{MailTransport, MessageStore, RawSendRequest, SendReceipt};
use std::sync::Arc;

/// Default wrapped-forward subject prefix.
pub const DEFAULT_FORWARD_PREFIX: &str = "Fwd:";

/// Forward/reply engine over a message store and a mail transport.
pub struct ThreadingEngine {
    store: Capability<Arc<dyn MessageStore>>,
    transport: Capability<Arc<dyn MailTransport>>,
    composer: MessageComposer,
    forward_prefix: String,
}

impl ThreadingEngine {
    pub fn new(
        store: Capability<Arc<dyn MessageStore>>,
        transport: Capability<Arc<dyn MailTransport>>,
        composer: MessageComposer,
    ) -> Self {
        Self {
            store,
            transport,
            composer,
            forward_prefix: DEFAULT_FORWARD_PREFIX.to_string(),
        }
    }

    /// Default prefix for wrapped forwards when the caller supplies none.
    pub fn set_forward_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.forward_prefix = prefix.into();
        self
    }

    /// Build the forward without sending it. Reads the store; needs no transport.
    pub fn prepare_forward(&self, id: &MessageId, options: &ForwardOptions) -> Result<RawSendRequest> {
        let store = self.store.get()?;
        let original = store.get_message(id)?;
        match &options.mode {
            ForwardMode::Passthrough { subject_prefix } => {
                let raw = store.get_raw(&original)?;
                let rewritten = build_passthrough(
                    &raw,
                    &options.from,
                    &options.to,
                    subject_prefix.as_deref(),
                );
                Ok(RawSendRequest {
                    from: options.from.clone(),
                    destinations: options.to.clone(),
                    raw: RawMessage::from_bytes(rewritten),
                })
            }
            ForwardMode::Wrapped(wrapped) => {
                let request = build_wrapped_forward(
                    &original,
                    &options.from,
                    &options.to,
                    wrapped,
                    &self.forward_prefix,
                );
                Ok(RawSendRequest {
                    from: request.from.clone(),
                    destinations: request.destinations(),
                    raw: self.composer.build_raw(&request),
                })
            }
        }
    }

    /// Build the reply without sending it. A reply with no content is rejected before
    /// the store is read.
    pub fn prepare_reply(&self, id: &MessageId, options: &ReplyOptions) -> Result<RawSendRequest> {
        if !options.has_content() {
            return Err(ValidationFault::EmptyBody.into());
        }
        let store = self.store.get()?;
        let original = store.get_message(id)?;
        let request = build_reply(&original, options);
        Ok(RawSendRequest {
            from: request.from.clone(),
            destinations: request.destinations(),
            raw: self.composer.build_raw(&request),
        })
    }

    /// Forward a stored message. A missing transport fails before the store is read.
    pub fn forward(&self, id: &MessageId, options: &ForwardOptions) -> Result<SendReceipt> {
        let transport = self.transport.get()?;
        let request = self.prepare_forward(id, options)?;
        let mode = match options.mode {
            ForwardMode::Passthrough { .. } => "passthrough",
            ForwardMode::Wrapped(_) => "wrapped",
        };
        tracing::info!(
            message_id = %id,
            mode,
            recipients = request.destinations.len(),
            "forwarding stored message"
        );
        let receipt = transport.send_raw(&request)?;
        tracing::debug!(provider_message_id = %receipt.provider_message_id, "forward accepted");
        Ok(receipt)
    }

    /// Reply to the sender of a stored message. A missing transport fails before the store is read.
    pub fn reply(&self, id: &MessageId, options: &ReplyOptions) -> Result<SendReceipt> {
        let transport = self.transport.get()?;
        let request = self.prepare_reply(id, options)?;
        tracing::info!(message_id = %id, "replying to stored message");
        let receipt = transport.send_raw(&request)?;
        tracing::debug!(provider_message_id = %receipt.provider_message_id, "reply accepted");
        Ok(receipt)
    }
}
