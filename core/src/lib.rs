/*
 * lib.rs
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

//! Mailroom core: outbound MIME composition, reply/forward threading, windowed bulk
//! dispatch and delivery status derived from lifecycle events.
//!
//! Collaborators (message store, event store, transports, template renderer) are traits
//! in [`store`] and [`dispatch`]; [`client::Mailroom`] wires them together.

pub mod capability;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod message_id;
pub mod mime;
pub mod status;
pub mod store;
pub mod threading;

pub use client::{Mailroom, MailroomBuilder};
pub use config::Settings;
pub use error::{ConfigurationFault, MailError, Result, StoreFault, TransportFault, ValidationFault};
pub use message_id::{MessageId, ProviderMessageId};
