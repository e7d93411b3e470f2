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

//! Outbound MIME composition: address rendering, boundaries, transfer encodings, raw assembly.

mod address;
mod boundary;
mod compose;
mod encoding;
mod media_type;
mod raw;

pub use address::{escape_quoted, format_mailbox, format_mailbox_list, unescape_quoted};
pub use boundary::{BoundaryGenerator, BoundaryKind, SequenceBoundaries, TimestampBoundaries};
pub use compose::{ComposeRequest, MessageComposer};
pub use encoding::{base64_wrapped, rewrap_base64, to_crlf, BASE64_LINE_LEN};
pub use media_type::{infer_from_filename, resolve_media_type, DEFAULT_MEDIA_TYPE};
pub use raw::RawMessage;
pub(crate) use raw::find_header_end;
