/*
 * token.rs
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

//! Opaque continuation tokens: the store's composite key as JSON, base64 encoded.

use crate::error::ValidationFault;
use crate::store::EventKey;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Encode the last key of a page as an opaque token.
pub fn encode_token(key: &EventKey) -> String {
    // EventKey contains only strings and a timestamp; serialisation cannot fail.
    let json = serde_json::to_vec(key).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a token produced by [`encode_token`]. Anything else is a validation fault.
pub fn decode_token(token: &str) -> Result<EventKey, ValidationFault> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| ValidationFault::MalformedToken(format!("not base64: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ValidationFault::MalformedToken(format!("not a continuation key: {}", e)))
}
