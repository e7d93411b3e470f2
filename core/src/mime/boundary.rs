/*
 * boundary.rs
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

//! MIME boundary generation. Injectable so tests can produce deterministic output.
//!
//! Tokens mix a timestamp, a process-wide counter and a random suffix. That makes
//! collisions unlikely, not impossible; the composer still checks enclosed content.

use chrono::Utc;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Source of boundary tokens.
pub trait BoundaryGenerator: Send + Sync {
    fn next_token(&self) -> String;
}

/// Which multipart container a boundary delimits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Mixed,
    Alternative,
}

impl BoundaryKind {
    fn prefix(self) -> &'static str {
        match self {
            BoundaryKind::Mixed => "mixed",
            BoundaryKind::Alternative => "alt",
        }
    }
}

/// Production generator: millisecond timestamp + counter + 64 random bits.
#[derive(Debug, Default)]
pub struct TimestampBoundaries {
    counter: AtomicU64,
}

impl TimestampBoundaries {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoundaryGenerator for TimestampBoundaries {
    fn next_token(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!(
            "{:x}.{:x}.{:016x}",
            Utc::now().timestamp_millis(),
            n,
            rand::random::<u64>()
        )
    }
}

/// Deterministic generator: yields the given tokens in order, then `seq<n>`.
#[derive(Debug, Default)]
pub struct SequenceBoundaries {
    tokens: Mutex<VecDeque<String>>,
    issued: AtomicU64,
}

impl SequenceBoundaries {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: Mutex::new(tokens.into_iter().map(Into::into).collect()),
            issued: AtomicU64::new(0),
        }
    }
}

impl BoundaryGenerator for SequenceBoundaries {
    fn next_token(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::Relaxed);
        let queued = match self.tokens.lock() {
            Ok(mut q) => q.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        queued.unwrap_or_else(|| format!("seq{}", n))
    }
}

/// Attempts with fresh tokens before falling back to suffixing.
const MAX_FRESH_ATTEMPTS: u32 = 8;

/// Produce a boundary whose delimiter line (`--boundary`) occurs in none of `enclosed`.
pub(crate) fn unique_boundary(
    generator: &dyn BoundaryGenerator,
    kind: BoundaryKind,
    enclosed: &[&[u8]],
) -> String {
    let collides = |b: &str| {
        let delimiter = format!("--{}", b);
        let needle = delimiter.as_bytes();
        enclosed
            .iter()
            .any(|part| part.windows(needle.len()).any(|w| w == needle))
    };
    let base = format!("=_{}_{}", kind.prefix(), generator.next_token());
    if !collides(&base) {
        return base;
    }
    for _ in 1..MAX_FRESH_ATTEMPTS {
        let candidate = format!("=_{}_{}", kind.prefix(), generator.next_token());
        if !collides(&candidate) {
            return candidate;
        }
    }
    tracing::debug!(kind = ?kind, "boundary generator kept colliding, suffixing");
    let mut n: u64 = 1;
    loop {
        let candidate = format!("{}.{}", base, n);
        if !collides(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_then_fallback() {
        let g = SequenceBoundaries::new(["a", "b"]);
        assert_eq!(g.next_token(), "a");
        assert_eq!(g.next_token(), "b");
        assert_eq!(g.next_token(), "seq2");
    }

    #[test]
    fn timestamp_tokens_differ() {
        let g = TimestampBoundaries::new();
        assert_ne!(g.next_token(), g.next_token());
    }

    #[test]
    fn colliding_token_is_skipped() {
        let g = SequenceBoundaries::new(["x", "y"]);
        let body = "text containing --=_mixed_x somewhere";
        let b = unique_boundary(&g, BoundaryKind::Mixed, &[body.as_bytes()]);
        assert_eq!(b, "=_mixed_y");
    }

    #[test]
    fn always_colliding_generator_gets_suffix() {
        struct Stuck;
        impl BoundaryGenerator for Stuck {
            fn next_token(&self) -> String {
                "same".into()
            }
        }
        let body = "--=_alt_same";
        let b = unique_boundary(&Stuck, BoundaryKind::Alternative, &[body.as_bytes()]);
        assert!(!body.contains(&format!("--{}", b)));
        assert_eq!(b, "=_alt_same.1");
    }
}
