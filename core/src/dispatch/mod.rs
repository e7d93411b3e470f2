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

//! Batched dispatch: validation, template pre-rendering, windowing, outcome merging.

mod batcher;
mod entry;
mod render;

pub use batcher::{
    BatchSummary, DispatchBatcher, DispatchLimits, DispatchResult, DispatchStatus,
    DEFAULT_MAX_ENTRIES, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE, MISSING_OUTCOME_MESSAGE,
    WINDOW_FAILURE_MESSAGE,
};
pub use entry::{BatchRequest, ContentFields, DispatchEntry, EntryContent, MessageBody, Tag, TemplateRef};
pub use render::{substitute, InlineTemplates, RenderError, RenderedContent, TemplateRenderer, TemplateSource};
