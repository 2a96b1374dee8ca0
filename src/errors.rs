// Copyright (c) The junit-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{io, process::ExitStatus};
use thiserror::Error;

/// An error that occurs while serializing a [`Report`](crate::Report).
///
/// Returned by [`Report::serialize`](crate::Report::serialize),
/// [`Report::to_string`](crate::Report::to_string) and
/// [`write_report`](crate::write_report). Write failures on the output sink
/// are carried in the [`Xml`](Self::Xml) variant.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The structural encoder rejected the document tree, or the output sink
    /// failed.
    #[error("failed to write JUnit XML")]
    Xml(#[from] quick_xml::Error),

    /// The serialized document was not valid UTF-8.
    #[error("serialized JUnit XML is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// An error that occurs while querying the `rustc` version.
///
/// Returned by [`rustc_version`](crate::rustc_version). During report
/// generation this error is non-fatal: the version is recorded as
/// `"unknown"` and generation proceeds.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// The `rustc` binary could not be executed.
    #[error("failed to execute `rustc --version`")]
    Exec(#[source] io::Error),

    /// `rustc --version` exited with a failure status.
    #[error("`rustc --version` exited with {0}")]
    Exit(ExitStatus),

    /// `rustc --version` produced output that was not valid UTF-8.
    #[error("`rustc --version` produced invalid UTF-8")]
    InvalidUtf8(#[source] std::string::FromUtf8Error),
}
