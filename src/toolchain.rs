// Copyright (c) The junit-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discovery of the toolchain version recorded in suite properties.

use crate::errors::ToolchainError;
use std::process::Command;
use tracing::{debug, warn};

/// Fallback value recorded when the version lookup fails.
static UNKNOWN_VERSION: &str = "unknown";

/// Returns the version reported by the `rustc` binary on `PATH`.
///
/// This is the version of the toolchain that ran the tests, which is not
/// necessarily the version this crate was built with. The leading `rustc `
/// prefix is stripped, so a typical value is
/// `1.70.0 (90c541806 2023-05-31)`.
///
/// To skip the process spawn entirely, set
/// [`ReportConfig::rustc_version`](crate::ReportConfig#structfield.rustc_version).
pub fn rustc_version() -> Result<String, ToolchainError> {
    let output = Command::new("rustc")
        .arg("--version")
        .output()
        .map_err(ToolchainError::Exec)?;
    if !output.status.success() {
        return Err(ToolchainError::Exit(output.status));
    }
    let stdout = String::from_utf8(output.stdout).map_err(ToolchainError::InvalidUtf8)?;
    let version = stdout.trim();
    Ok(version.strip_prefix("rustc ").unwrap_or(version).to_owned())
}

/// Resolves the version to record: an explicit override wins, then a live
/// lookup, then `"unknown"`. Lookup failures are not fatal to generation.
pub(crate) fn resolve_version(version_override: Option<&str>) -> String {
    if let Some(version) = version_override {
        return version.to_owned();
    }
    debug!("exec: rustc --version");
    match rustc_version() {
        Ok(version) => version,
        Err(error) => {
            warn!("failed to look up rustc version for junit xml: {error}");
            UNKNOWN_VERSION.to_owned()
        }
    }
}
