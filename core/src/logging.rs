/*
 * logging.rs
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

//! Tracing subscriber setup. The library itself only emits events; binaries and
//! tests decide whether to install a subscriber.

use crate::config::LoggingConfig;
use crate::error::ConfigurationFault;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `config.level` is used as the filter directive.
///
/// # Errors
/// Returns a fault when the directive does not parse or a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), ConfigurationFault> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| ConfigurationFault::InvalidValue {
            key: "logging.level".to_string(),
            message: e.to_string(),
        })?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| ConfigurationFault::Logging(e.to_string()))
}

/// Initialise logging for tests (no-op if already initialised).
pub fn init_test() {
    let _ = init(&LoggingConfig {
        level: "debug".to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_test_is_repeatable() {
        init_test();
        init_test();
        tracing::debug!("logging initialised");
    }

    #[test]
    fn second_init_reports_fault() {
        init_test();
        let result = init(&LoggingConfig::default());
        assert!(matches!(result, Err(ConfigurationFault::Logging(_))));
    }
}
