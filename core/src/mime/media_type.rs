/*
 * media_type.rs
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

//! Attachment MIME type inference from filename extension.

/// Fallback when neither an explicit type nor a known extension is available.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Static extension table (lower-case extension, media type).
const EXTENSION_TABLE: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("doc", "application/msword"),
    ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    ("xls", "application/vnd.ms-excel"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("ppt", "application/vnd.ms-powerpoint"),
    ("pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("ics", "text/calendar"),
    ("eml", "message/rfc822"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("mp4", "video/mp4"),
];

/// Resolve the media type of an attachment: explicit wins, then extension, then default.
pub fn resolve_media_type(explicit: Option<&str>, filename: &str) -> String {
    if let Some(t) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return t.to_string();
    }
    infer_from_filename(filename)
        .unwrap_or(DEFAULT_MEDIA_TYPE)
        .to_string()
}

/// Look up the media type for a filename's extension (case-insensitive).
pub fn infer_from_filename(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    EXTENSION_TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, t)| *t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_type_wins() {
        assert_eq!(resolve_media_type(Some("text/x-custom"), "a.pdf"), "text/x-custom");
    }

    #[test]
    fn inferred_from_extension() {
        assert_eq!(resolve_media_type(None, "Report.PDF"), "application/pdf");
        assert_eq!(resolve_media_type(None, "photo.jpeg"), "image/jpeg");
        assert_eq!(resolve_media_type(Some("  "), "a.csv"), "text/csv");
    }

    #[test]
    fn unknown_or_missing_extension_defaults() {
        assert_eq!(resolve_media_type(None, "archive.xyz"), DEFAULT_MEDIA_TYPE);
        assert_eq!(resolve_media_type(None, "README"), DEFAULT_MEDIA_TYPE);
    }
}
