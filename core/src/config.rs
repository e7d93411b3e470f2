/*
 * config.rs
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

//! Runtime settings: dispatch limits, forward defaults, log level.
//!
//! Values come from serde defaults, optionally overlaid by a JSON document or by
//! `MAILROOM_*` environment variables.

use crate::dispatch::{DispatchLimits, DEFAULT_MAX_ENTRIES, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE};
use crate::error::ConfigurationFault;
use crate::threading::DEFAULT_FORWARD_PREFIX;
use serde::Deserialize;

pub const ENV_MAX_BATCH: &str = "MAILROOM_MAX_BATCH";
pub const ENV_WINDOW_SIZE: &str = "MAILROOM_WINDOW_SIZE";
pub const ENV_FORWARD_PREFIX: &str = "MAILROOM_FORWARD_PREFIX";
pub const ENV_LOG_LEVEL: &str = "MAILROOM_LOG_LEVEL";

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dispatch: DispatchSettings,
    pub forward: ForwardSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Caller-facing cap on entries per batch.
    pub max_entries: usize,
    /// Entries per bulk call, at most the provider cap of 50.
    pub window_size: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForwardSettings {
    /// Prefix for wrapped forwards when the caller supplies none.
    pub subject_prefix: String,
}

impl Default for ForwardSettings {
    fn default() -> Self {
        Self {
            subject_prefix: DEFAULT_FORWARD_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset, e.g. `info` or `mailroom_core=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with `MAILROOM_*` environment variables, then validated.
    pub fn from_env() -> Result<Self, ConfigurationFault> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationFault>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        if let Some(v) = non_blank(lookup(ENV_MAX_BATCH)) {
            settings.dispatch.max_entries = parse_count(ENV_MAX_BATCH, &v)?;
        }
        if let Some(v) = non_blank(lookup(ENV_WINDOW_SIZE)) {
            settings.dispatch.window_size = parse_count(ENV_WINDOW_SIZE, &v)?;
        }
        if let Some(v) = lookup(ENV_FORWARD_PREFIX) {
            settings.forward.subject_prefix = v;
        }
        if let Some(v) = non_blank(lookup(ENV_LOG_LEVEL)) {
            settings.logging.level = v;
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a JSON document; absent keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationFault> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| ConfigurationFault::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigurationFault> {
        let d = &self.dispatch;
        if d.max_entries == 0 {
            return Err(invalid("dispatch.max_entries", "must be at least 1"));
        }
        if d.window_size == 0 {
            return Err(invalid("dispatch.window_size", "must be at least 1"));
        }
        if d.window_size > MAX_WINDOW_SIZE {
            return Err(invalid(
                "dispatch.window_size",
                format!("{} exceeds the provider cap of {}", d.window_size, MAX_WINDOW_SIZE),
            ));
        }
        if d.window_size > d.max_entries {
            return Err(invalid(
                "dispatch.window_size",
                format!("{} exceeds dispatch.max_entries ({})", d.window_size, d.max_entries),
            ));
        }
        Ok(())
    }

    pub fn dispatch_limits(&self) -> DispatchLimits {
        DispatchLimits {
            max_entries: self.dispatch.max_entries,
            window_size: self.dispatch.window_size,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_count(key: &str, value: &str) -> Result<usize, ConfigurationFault> {
    value
        .parse::<usize>()
        .map_err(|e| invalid(key, format!("{:?}: {}", value, e)))
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigurationFault {
    ConfigurationFault::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}
