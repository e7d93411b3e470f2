/*
 * client.rs
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

//! `Mailroom`: one handle over composition, threading, bulk dispatch and status lookup.
//!
//! Collaborators are optional. Each is resolved into a [`Capability`] when the handle is
//! built; operations that need an absent one fail with a configuration fault naming it.

use crate::capability::{
    Capability, BULK_TRANSPORT, EVENT_STORE, MAIL_TRANSPORT, MESSAGE_STORE, TEMPLATE_RENDERER,
};
use crate::config::Settings;
use crate::dispatch::{BatchRequest, BatchSummary, DispatchBatcher, TemplateRenderer};
use crate::error::{Result, ValidationFault};
use crate::message_id::{MessageId, ProviderMessageId};
use crate::mime::{BoundaryGenerator, ComposeRequest, MessageComposer, RawMessage, TimestampBoundaries};
use crate::status::{AccountStatusRequest, DerivedStatus, StatusPage, StatusQuery};
use crate::store::{
    BulkTransport, EventStore, MailTransport, MessageStore, RawSendRequest, SendReceipt,
};
use crate::threading::{ForwardOptions, ReplyOptions, ThreadingEngine};
use std::sync::Arc;

/// Collects collaborators and settings for a [`Mailroom`].
#[derive(Default)]
pub struct MailroomBuilder {
    settings: Settings,
    message_store: Option<Arc<dyn MessageStore>>,
    mail_transport: Option<Arc<dyn MailTransport>>,
    bulk_transport: Option<Arc<dyn BulkTransport>>,
    renderer: Option<Arc<dyn TemplateRenderer>>,
    event_store: Option<Arc<dyn EventStore>>,
    boundaries: Option<Arc<dyn BoundaryGenerator>>,
}

impl MailroomBuilder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn message_store(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.message_store = Some(store);
        self
    }

    pub fn mail_transport(mut self, transport: Arc<dyn MailTransport>) -> Self {
        self.mail_transport = Some(transport);
        self
    }

    pub fn bulk_transport(mut self, transport: Arc<dyn BulkTransport>) -> Self {
        self.bulk_transport = Some(transport);
        self
    }

    pub fn template_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn event_store(mut self, store: Arc<dyn EventStore>) -> Self {
        self.event_store = Some(store);
        self
    }

    /// Replace the default timestamp-based MIME boundary generator.
    pub fn boundaries(mut self, boundaries: Arc<dyn BoundaryGenerator>) -> Self {
        self.boundaries = Some(boundaries);
        self
    }

    /// Validate settings and resolve every capability.
    pub fn build(self) -> Result<Mailroom> {
        self.settings.validate()?;

        let composer = MessageComposer::new(
            self.boundaries
                .unwrap_or_else(|| Arc::new(TimestampBoundaries::new())),
        );
        let transport = Capability::new(MAIL_TRANSPORT, self.mail_transport);

        let mut threading = ThreadingEngine::new(
            Capability::new(MESSAGE_STORE, self.message_store),
            transport.clone(),
            composer.clone(),
        );
        threading.set_forward_prefix(self.settings.forward.subject_prefix.clone());

        let dispatch = DispatchBatcher::new(
            Capability::new(BULK_TRANSPORT, self.bulk_transport),
            Capability::new(TEMPLATE_RENDERER, self.renderer),
            self.settings.dispatch_limits(),
        );
        let status = StatusQuery::new(Capability::new(EVENT_STORE, self.event_store));

        tracing::debug!(
            mail_transport = transport.is_configured(),
            limits = ?dispatch.limits(),
            "mailroom ready"
        );
        Ok(Mailroom {
            settings: self.settings,
            composer,
            transport,
            threading,
            dispatch,
            status,
        })
    }
}

/// Entry point for sending and tracking mail.
pub struct Mailroom {
    settings: Settings,
    composer: MessageComposer,
    transport: Capability<Arc<dyn MailTransport>>,
    threading: ThreadingEngine,
    dispatch: DispatchBatcher,
    status: StatusQuery,
}

impl Mailroom {
    pub fn builder(settings: Settings) -> MailroomBuilder {
        MailroomBuilder::new(settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn threading(&self) -> &ThreadingEngine {
        &self.threading
    }

    /// Build the raw bytes of a message without validating or sending it.
    pub fn compose(&self, request: &ComposeRequest) -> RawMessage {
        self.composer.build_raw(request)
    }

    /// Validate, compose and send a single message.
    pub fn send(&self, request: &ComposeRequest) -> Result<SendReceipt> {
        validate_outbound(request)?;
        let transport = self.transport.get()?;
        let raw = self.composer.build_raw(request);
        tracing::info!(
            recipients = request.destinations().len(),
            attachments = request.attachments.len(),
            bytes = raw.len(),
            "sending message"
        );
        let receipt = transport.send_raw(&RawSendRequest {
            from: request.from.clone(),
            destinations: request.destinations(),
            raw,
        })?;
        tracing::debug!(provider_message_id = %receipt.provider_message_id, "message accepted");
        Ok(receipt)
    }

    pub fn forward(&self, id: &MessageId, options: &ForwardOptions) -> Result<SendReceipt> {
        self.threading.forward(id, options)
    }

    pub fn reply(&self, id: &MessageId, options: &ReplyOptions) -> Result<SendReceipt> {
        self.threading.reply(id, options)
    }

    pub fn dispatch_batch(&self, request: BatchRequest) -> Result<BatchSummary> {
        self.dispatch.dispatch(request)
    }

    pub fn status_for_message(&self, id: &ProviderMessageId) -> Result<Option<DerivedStatus>> {
        self.status.status_for_message(id)
    }

    pub fn statuses_for_account(&self, request: &AccountStatusRequest) -> Result<StatusPage> {
        self.status.statuses_for_account(request)
    }
}

/// Required fields for a single send: sender, at least one To recipient, subject, some body.
fn validate_outbound(request: &ComposeRequest) -> std::result::Result<(), ValidationFault> {
    if request.from.email.trim().is_empty() {
        return Err(ValidationFault::MissingField("from"));
    }
    if !request.to.iter().any(|a| !a.email.trim().is_empty()) {
        return Err(ValidationFault::MissingField("to"));
    }
    if request.subject.trim().is_empty() {
        return Err(ValidationFault::MissingField("subject"));
    }
    if !request.has_content() {
        return Err(ValidationFault::EmptyBody);
    }
    Ok(())
}
