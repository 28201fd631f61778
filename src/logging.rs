// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tracing subscriber setup.
//!
//! Library code only emits `tracing` events; binaries and tests pick a [`Profile`] once at
//! start-up. The filter comes from an explicit directive, else the `FLOWPAGE_LOG` environment
//! variable, else the profile default.

use std::sync::Once;

use tracing::warn;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "FLOWPAGE_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output on stderr, `debug` for this crate.
    Development,
    /// JSON lines on stderr, `info` for this crate.
    Production,
    /// Output captured by the test harness.
    Test,
}

impl Profile {
    fn default_directive(self) -> &'static str {
        match self {
            Self::Development => "flowpage=debug",
            Self::Production => "flowpage=info",
            Self::Test => "flowpage=trace",
        }
    }
}

static INIT_ONCE: Once = Once::new();

pub fn init(profile: Profile) {
    init_with_directive(profile, None);
}

/// Checks a filter directive, for use as a CLI value parser.
pub fn parse_directive(directive: &str) -> Result<String, ParseError> {
    EnvFilter::try_new(directive).map(|_| directive.to_owned())
}

/// Installs the global subscriber. Only the first call has an effect.
///
/// An invalid `directive` falls back to `FLOWPAGE_LOG` or the profile default and is reported
/// as a warning through the installed subscriber.
pub fn init_with_directive(profile: Profile, directive: Option<&str>) {
    INIT_ONCE.call_once(|| {
        let (filter, rejected) = resolve_filter(profile, directive);
        // A subscriber installed by an embedding application wins; ignore the error.
        let _ = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
            Profile::Test => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_test_writer()
                .try_init(),
        };
        if let (Some(directive), Some(err)) = (directive, rejected) {
            warn!(directive, error = %err, "ignoring invalid log directive");
        }
    });
}

fn resolve_filter(profile: Profile, directive: Option<&str>) -> (EnvFilter, Option<ParseError>) {
    let rejected = match directive.map(EnvFilter::try_new) {
        Some(Ok(filter)) => return (filter, None),
        Some(Err(err)) => Some(err),
        None => None,
    };
    let fallback = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(profile.default_directive()));
    (fallback, rejected)
}
