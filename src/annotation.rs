// Copyright (c) The junit-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of bracketed requirement annotations from test names.

use crate::report::Property;

/// Splits a bracketed annotation out of a test name.
///
/// The payload between the first `[` and the first `]` becomes a
/// `Requirement` property (single value) or a `Requirements` property
/// (comma-separated list, preserved verbatim), and exactly one occurrence of
/// the bracketed segment is removed from the name. Names without a
/// well-ordered bracket pair pass through unchanged.
pub(crate) fn extract_requirement(name: &str) -> (String, Option<Property>) {
    let (open, close) = match (name.find('['), name.find(']')) {
        (Some(open), Some(close)) if open < close => (open, close),
        _ => return (name.to_owned(), None),
    };

    let payload = &name[open + 1..close];
    let stripped = name.replacen(&name[open..=close], "", 1);
    let property = if payload.contains(',') {
        Property::new("Requirements", payload)
    } else {
        Property::new("Requirement", payload)
    };
    (stripped, Some(property))
}
