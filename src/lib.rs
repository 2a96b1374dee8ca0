// Copyright (c) The junit-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Create JUnit/XUnit XML summaries of recorded test runs.
//!
//! The input is an [`ExecutionRecord`]: per-package lists of passed, failed
//! and skipped test outcomes together with timings and captured output. The
//! output is a JUnit XML document ready for CI dashboards. [`generate`]
//! builds the document tree and [`write_report`] serializes it to a sink in
//! one call.
//!
//! Bracketed annotations embedded in test names (for example
//! `reopen_preserves_contents[REQ-9]`) are lifted out of the display name
//! into `Requirement`/`Requirements` properties on the test case.

mod annotation;
mod errors;
mod exec;
mod generate;
mod report;
mod serialize;
mod toolchain;

pub use errors::*;
pub use exec::*;
pub use generate::*;
pub use report::*;
pub use toolchain::rustc_version;
