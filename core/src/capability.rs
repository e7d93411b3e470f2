/*
 * capability.rs
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

//! Optional collaborators resolved once at construction.

use crate::error::ConfigurationFault;

pub const MESSAGE_STORE: &str = "message store";
pub const MAIL_TRANSPORT: &str = "mail transport";
pub const BULK_TRANSPORT: &str = "bulk transport";
pub const TEMPLATE_RENDERER: &str = "template renderer";
pub const EVENT_STORE: &str = "event store";

/// A named optional capability. Call sites ask the handle instead of checking `Option`s.
#[derive(Clone)]
pub struct Capability<T> {
    name: &'static str,
    inner: Option<T>,
}

impl<T> Capability<T> {
    pub fn new(name: &'static str, inner: Option<T>) -> Self {
        Self { name, inner }
    }

    pub fn configured(name: &'static str, value: T) -> Self {
        Self::new(name, Some(value))
    }

    pub fn absent(name: &'static str) -> Self {
        Self::new(name, None)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    /// The capability, or a configuration fault naming it.
    pub fn get(&self) -> Result<&T, ConfigurationFault> {
        self.inner
            .as_ref()
            .ok_or(ConfigurationFault::MissingCapability(self.name))
    }

    pub fn as_option(&self) -> Option<&T> {
        self.inner.as_ref()
    }
}

impl<T> std::fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("configured", &self.inner.is_some())
            .finish()
    }
}
