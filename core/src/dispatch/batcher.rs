/*
 * batcher.rs
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

//! Windowed bulk dispatch with per-entry outcome accounting.
//!
//! Windows are sent one after another in original order. A window-level transport
//! failure becomes a failure record for each of its entries; later windows still go out.

use crate::capability::Capability;
use crate::dispatch::entry::{resolve_entry, BatchRequest, EntryContent};
use crate::dispatch::render::TemplateRenderer;
use crate::error::{Result, ValidationFault};
use crate::message_id::ProviderMessageId;
use crate::store::{Address, BulkEntry, BulkOutcome, BulkRequest, BulkTransport};
use std::sync::Arc;

/// Provider cap on entries per bulk call.
pub const MAX_WINDOW_SIZE: usize = 50;

/// Window size used unless configured lower.
pub const DEFAULT_WINDOW_SIZE: usize = MAX_WINDOW_SIZE;

/// Caller-facing cap on entries per batch.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Diagnostic attached to every entry of a window whose call failed as a whole.
pub const WINDOW_FAILURE_MESSAGE: &str = "bulk send window failed";

/// Diagnostic for an entry the provider response did not account for.
pub const MISSING_OUTCOME_MESSAGE: &str = "no outcome returned for entry";

/// Size limits for a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchLimits {
    pub max_entries: usize,
    pub window_size: usize,
}

impl Default for DispatchLimits {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

/// Outcome of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    Success,
    Failed,
}

/// Per-entry result keyed by the entry's index in the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub index: usize,
    pub recipient: Address,
    pub status: DispatchStatus,
    pub provider_message_id: Option<ProviderMessageId>,
    pub error: Option<String>,
}

impl DispatchResult {
    fn success(index: usize, recipient: Address, id: ProviderMessageId) -> Self {
        Self {
            index,
            recipient,
            status: DispatchStatus::Success,
            provider_message_id: Some(id),
            error: None,
        }
    }

    fn failure(index: usize, recipient: Address, error: impl Into<String>) -> Self {
        Self {
            index,
            recipient,
            status: DispatchStatus::Failed,
            provider_message_id: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DispatchStatus::Success
    }
}

/// Ordered results plus counts. Always returned once dispatch starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub results: Vec<DispatchResult>,
    pub success_count: usize,
    pub failure_count: usize,
}

impl BatchSummary {
    fn from_results(results: Vec<DispatchResult>) -> Self {
        let success_count = results.iter().filter(|r| r.is_success()).count();
        let failure_count = results.len() - success_count;
        Self {
            results,
            success_count,
            failure_count,
        }
    }

    /// Failed entries, for selective retry by the caller.
    pub fn failures(&self) -> impl Iterator<Item = &DispatchResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

/// Splits a batch into provider-sized windows and merges their outcomes.
pub struct DispatchBatcher {
    transport: Capability<Arc<dyn BulkTransport>>,
    renderer: Capability<Arc<dyn TemplateRenderer>>,
    limits: DispatchLimits,
}

impl DispatchBatcher {
    pub fn new(
        transport: Capability<Arc<dyn BulkTransport>>,
        renderer: Capability<Arc<dyn TemplateRenderer>>,
        limits: DispatchLimits,
    ) -> Self {
        Self {
            transport,
            renderer,
            limits,
        }
    }

    pub fn limits(&self) -> DispatchLimits {
        self.limits
    }

    /// Validate, pre-render, then dispatch window by window.
    ///
    /// Validation and render failures reject the whole batch before any bulk call.
    /// Transport failures never do: they are recorded per entry in the summary.
    pub fn dispatch(&self, request: BatchRequest) -> Result<BatchSummary> {
        let entries = self.validate_and_resolve(&request)?;
        let transport = self.transport.get()?;
        let window = self.limits.window_size.clamp(1, MAX_WINDOW_SIZE);
        let total = entries.len();

        let mut results: Vec<Option<DispatchResult>> = vec![None; total];
        for (window_index, chunk) in entries.chunks(window).enumerate() {
            let base = window_index * window;
            let bulk = BulkRequest {
                from: request.from.clone(),
                reply_to: request.reply_to.clone(),
                entries: chunk.to_vec(),
            };
            match transport.send_bulk(&bulk) {
                Ok(outcomes) => {
                    if outcomes.len() > chunk.len() {
                        tracing::warn!(
                            window = window_index,
                            expected = chunk.len(),
                            received = outcomes.len(),
                            "provider returned extra outcomes, ignoring"
                        );
                    }
                    for (offset, entry) in chunk.iter().enumerate() {
                        let index = base + offset;
                        let recipient = entry.recipient.clone();
                        results[index] = Some(match outcomes.get(offset) {
                            Some(BulkOutcome::Accepted { message_id }) => {
                                DispatchResult::success(index, recipient, message_id.clone())
                            }
                            Some(BulkOutcome::Rejected { error }) => {
                                DispatchResult::failure(index, recipient, error.clone())
                            }
                            None => DispatchResult::failure(index, recipient, MISSING_OUTCOME_MESSAGE),
                        });
                    }
                }
                Err(fault) => {
                    tracing::warn!(
                        window = window_index,
                        entries = chunk.len(),
                        code = %fault.code,
                        request_id = %fault.request_id,
                        retryable = fault.retryable,
                        "bulk window failed, marking its entries failed"
                    );
                    for (offset, entry) in chunk.iter().enumerate() {
                        let index = base + offset;
                        results[index] = Some(DispatchResult::failure(
                            index,
                            entry.recipient.clone(),
                            WINDOW_FAILURE_MESSAGE,
                        ));
                    }
                }
            }
        }

        let results: Vec<DispatchResult> = results
            .into_iter()
            .enumerate()
            .map(|(index, r)| {
                r.unwrap_or_else(|| {
                    DispatchResult::failure(index, entries[index].recipient.clone(), MISSING_OUTCOME_MESSAGE)
                })
            })
            .collect();
        let summary = BatchSummary::from_results(results);
        tracing::info!(
            entries = total,
            windows = total.div_ceil(window),
            succeeded = summary.success_count,
            failed = summary.failure_count,
            "batch dispatched"
        );
        Ok(summary)
    }

    /// Check the request and turn every entry into a ready bulk entry.
    fn validate_and_resolve(&self, request: &BatchRequest) -> Result<Vec<BulkEntry>> {
        if request.from.email.trim().is_empty() {
            return Err(ValidationFault::MissingField("from").into());
        }
        if request.entries.is_empty() {
            return Err(ValidationFault::EmptyBatch.into());
        }
        if request.entries.len() > self.limits.max_entries {
            return Err(ValidationFault::BatchTooLarge {
                size: request.entries.len(),
                max: self.limits.max_entries,
            }
            .into());
        }

        let contents = request
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| resolve_entry(i, e, request.subject.as_deref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut resolved = Vec::with_capacity(contents.len());
        for (index, (entry, content)) in request.entries.iter().zip(contents).enumerate() {
            let (subject, body) = match content {
                EntryContent::Body { subject, body } => (subject, body),
                EntryContent::Template(template) => {
                    let renderer = self.renderer.get()?;
                    let rendered = renderer.render(&template).map_err(|e| ValidationFault::Render {
                        index,
                        template: template.name.clone(),
                        reason: e.to_string(),
                    })?;
                    (rendered.subject, rendered.body)
                }
            };
            resolved.push(BulkEntry {
                recipient: entry.recipient.clone(),
                subject,
                body,
                tags: entry.tags.clone(),
            });
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::entry::{ContentFields, DispatchEntry, TemplateRef};
    use crate::dispatch::render::{InlineTemplates, TemplateSource};
    use crate::error::{MailError, TransportFault};
    use std::sync::Mutex;

    /// Records every call; fails the windows whose index is listed.
    struct ScriptedBulk {
        calls: Mutex<Vec<BulkRequest>>,
        failing_windows: Vec<usize>,
    }

    impl ScriptedBulk {
        fn new(failing_windows: Vec<usize>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                failing_windows,
            })
        }

        fn call_sizes(&self) -> Vec<usize> {
            self.calls.lock().unwrap().iter().map(|c| c.entries.len()).collect()
        }
    }

    impl BulkTransport for ScriptedBulk {
        fn send_bulk(&self, request: &BulkRequest) -> std::result::Result<Vec<BulkOutcome>, TransportFault> {
            let mut calls = self.calls.lock().unwrap();
            let window = calls.len();
            calls.push(request.clone());
            if self.failing_windows.contains(&window) {
                return Err(TransportFault::new("Throttling", format!("req-{}", window), true));
            }
            Ok(request
                .entries
                .iter()
                .map(|e| BulkOutcome::Accepted {
                    message_id: ProviderMessageId::new(format!("pm-{}", e.recipient.email)),
                })
                .collect())
        }
    }

    fn batch(n: usize) -> BatchRequest {
        BatchRequest {
            from: Address::new("news@example.com"),
            subject: Some("Weekly".into()),
            entries: (0..n)
                .map(|i| DispatchEntry::new(format!("user{}@example.com", i), ContentFields::text("hi")))
                .collect(),
            ..BatchRequest::default()
        }
    }

    fn batcher(transport: Arc<ScriptedBulk>, limits: DispatchLimits) -> DispatchBatcher {
        DispatchBatcher::new(
            Capability::configured("bulk transport", transport as Arc<dyn BulkTransport>),
            Capability::absent("template renderer"),
            limits,
        )
    }

    #[test]
    fn seventy_five_entries_two_windows() {
        let t = ScriptedBulk::new(vec![]);
        let summary = batcher(t.clone(), DispatchLimits::default()).dispatch(batch(75)).unwrap();
        assert_eq!(t.call_sizes(), vec![50, 25]);
        assert_eq!(summary.results.len(), 75);
        for (i, r) in summary.results.iter().enumerate() {
            assert_eq!(r.index, i);
            assert_eq!(r.recipient.email, format!("user{}@example.com", i));
        }
        assert_eq!(summary.success_count, 75);
        assert_eq!(summary.failure_count, 0);
    }

    #[test]
    fn failed_first_window_does_not_stop_second() {
        let t = ScriptedBulk::new(vec![0]);
        let summary = batcher(t.clone(), DispatchLimits::default()).dispatch(batch(75)).unwrap();
        assert_eq!(t.call_sizes(), vec![50, 25]);
        assert_eq!(summary.failure_count, 50);
        assert_eq!(summary.success_count, 25);
        assert!(summary.results[..50]
            .iter()
            .all(|r| r.error.as_deref() == Some(WINDOW_FAILURE_MESSAGE)));
        assert_eq!(
            summary.results[74].provider_message_id,
            Some(ProviderMessageId::new("pm-user74@example.com"))
        );
    }

    #[test]
    fn throttled_pair() {
        let t = ScriptedBulk::new(vec![0]);
        let summary = batcher(t, DispatchLimits::default()).dispatch(batch(2)).unwrap();
        assert_eq!(summary.success_count, 0);
        assert_eq!(summary.failure_count, 2);
        assert_eq!(summary.results[0].error, summary.results[1].error);
        assert_eq!(summary.results[0].error.as_deref(), Some(WINDOW_FAILURE_MESSAGE));
    }

    #[test]
    fn over_cap_rejected_without_calls() {
        let t = ScriptedBulk::new(vec![]);
        let err = batcher(t.clone(), DispatchLimits::default()).dispatch(batch(101)).unwrap_err();
        assert!(matches!(
            err,
            MailError::Validation(ValidationFault::BatchTooLarge { size: 101, max: 100 })
        ));
        assert!(t.call_sizes().is_empty());
    }

    #[test]
    fn empty_batch_rejected() {
        let t = ScriptedBulk::new(vec![]);
        let err = batcher(t, DispatchLimits::default()).dispatch(batch(0)).unwrap_err();
        assert!(matches!(err, MailError::Validation(ValidationFault::EmptyBatch)));
    }

    #[test]
    fn template_without_renderer_is_configuration_fault() {
        let t = ScriptedBulk::new(vec![]);
        let mut req = batch(1);
        req.entries[0].content = ContentFields::template(TemplateRef::new("welcome"));
        let err = batcher(t.clone(), DispatchLimits::default()).dispatch(req).unwrap_err();
        assert!(matches!(err, MailError::Configuration(_)));
        assert!(t.call_sizes().is_empty());
    }

    #[test]
    fn render_failure_fails_fast() {
        let t = ScriptedBulk::new(vec![]);
        let mut templates = InlineTemplates::new();
        templates.insert(
            "welcome",
            TemplateSource {
                subject: "Hi {{name}}".into(),
                text: Some("Hello {{name}}".into()),
                html: None,
            },
        );
        let b = DispatchBatcher::new(
            Capability::configured("bulk transport", t.clone() as Arc<dyn BulkTransport>),
            Capability::configured("template renderer", Arc::new(templates) as Arc<dyn TemplateRenderer>),
            DispatchLimits {
                max_entries: 100,
                window_size: 1,
            },
        );
        let mut req = batch(3);
        req.entries[0].content = ContentFields::template(TemplateRef::new("welcome").with_variable("name", "A"));
        req.entries[2].content = ContentFields::template(TemplateRef::new("welcome"));
        let err = b.dispatch(req).unwrap_err();
        match err {
            MailError::Validation(ValidationFault::Render { index, template, .. }) => {
                assert_eq!(index, 2);
                assert_eq!(template, "welcome");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(t.call_sizes().is_empty());
    }

    #[test]
    fn missing_and_rejected_outcomes() {
        struct Partial;
        impl BulkTransport for Partial {
            fn send_bulk(&self, _request: &BulkRequest) -> std::result::Result<Vec<BulkOutcome>, TransportFault> {
                Ok(vec![
                    BulkOutcome::Rejected {
                        error: "MessageRejected".into(),
                    },
                    BulkOutcome::Accepted {
                        message_id: ProviderMessageId::new("ok-1"),
                    },
                ])
            }
        }
        let b = DispatchBatcher::new(
            Capability::configured("bulk transport", Arc::new(Partial) as Arc<dyn BulkTransport>),
            Capability::absent("template renderer"),
            DispatchLimits::default(),
        );
        let summary = b.dispatch(batch(3)).unwrap();
        assert_eq!(summary.results[0].error.as_deref(), Some("MessageRejected"));
        assert!(summary.results[1].is_success());
        assert_eq!(summary.results[2].error.as_deref(), Some(MISSING_OUTCOME_MESSAGE));
        assert_eq!(summary.failures().count(), 2);
    }
}
