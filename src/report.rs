// Copyright (c) The junit-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::SerializeError, serialize::serialize_report};
use std::io;

/// The root element of a JUnit report.
///
/// Counts and times are set by the generator, not derived from the suites
/// added to the report: when empty packages are hidden, the overall totals
/// still cover the full execution record.
#[derive(Clone, Debug)]
pub struct Report {
    /// The name of this report. Omitted from the output when empty.
    pub name: String,

    /// The total number of tests across the full run.
    pub tests: usize,

    /// The total number of failed tests across the full run.
    pub failures: usize,

    /// The total number of run-level errors, e.g. build failures.
    pub errors: usize,

    /// The overall elapsed time, as fixed-point seconds.
    pub time: String,

    /// The test suites contained in this report.
    pub test_suites: Vec<TestSuite>,
}

impl Report {
    /// Creates a new `Report` with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: 0,
            failures: 0,
            errors: 0,
            time: String::new(),
            test_suites: vec![],
        }
    }

    /// Adds a test suite to this report.
    pub fn add_test_suite(&mut self, test_suite: TestSuite) -> &mut Self {
        self.test_suites.push(test_suite);
        self
    }

    /// Adds several test suites to this report.
    pub fn add_test_suites(
        &mut self,
        test_suites: impl IntoIterator<Item = TestSuite>,
    ) -> &mut Self {
        self.test_suites.extend(test_suites);
        self
    }

    /// Serialize this report to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_report(self, writer)
    }

    /// Serialize this report to a string.
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Represents a single test suite: the test cases originating from one
/// package.
#[derive(Clone, Debug)]
pub struct TestSuite {
    /// The name of this test suite.
    pub name: String,

    /// The total number of tests in this suite, including the synthetic
    /// `TestMain` case when the package failed before running any test.
    pub tests: usize,

    /// The number of failed test outcomes in this suite.
    pub failures: usize,

    /// The time taken by this suite, as fixed-point seconds.
    pub time: String,

    /// The time at which the suite began execution, as RFC3339 text.
    pub timestamp: String,

    /// Properties of this suite, e.g. the toolchain version.
    pub properties: Vec<Property>,

    /// The test cases that form this suite.
    pub test_cases: Vec<TestCase>,
}

impl TestSuite {
    /// Creates a new `TestSuite`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: 0,
            failures: 0,
            time: String::new(),
            timestamp: String::new(),
            properties: vec![],
            test_cases: vec![],
        }
    }

    /// Adds a property to this test suite.
    pub fn add_property(&mut self, property: impl Into<Property>) -> &mut Self {
        self.properties.push(property.into());
        self
    }

    /// Adds a test case to this test suite.
    pub fn add_test_case(&mut self, test_case: TestCase) -> &mut Self {
        self.test_cases.push(test_case);
        self
    }

    /// Adds several test cases to this test suite.
    pub fn add_test_cases(&mut self, test_cases: impl IntoIterator<Item = TestCase>) -> &mut Self {
        self.test_cases.extend(test_cases);
        self
    }
}

/// Represents a single test case with its result.
#[derive(Clone, Debug)]
pub struct TestCase {
    /// The name of the test case, with any bracketed annotation stripped.
    pub name: String,

    /// The "classname" of the test case: the formatted package identifier.
    pub classname: String,

    /// The time it took to execute this test case, as fixed-point seconds.
    pub time: String,

    /// The status of this test.
    pub status: TestCaseStatus,

    /// Properties of this test case, e.g. requirement annotations.
    pub properties: Vec<Property>,
}

impl TestCase {
    /// Creates a new test case.
    pub fn new(name: impl Into<String>, status: TestCaseStatus) -> Self {
        Self {
            name: name.into(),
            classname: String::new(),
            time: String::new(),
            status,
            properties: vec![],
        }
    }

    /// Sets the classname of the test.
    pub fn set_classname(&mut self, classname: impl Into<String>) -> &mut Self {
        self.classname = classname.into();
        self
    }

    /// Sets the time taken for the test.
    pub fn set_time(&mut self, time: impl Into<String>) -> &mut Self {
        self.time = time.into();
        self
    }

    /// Adds a property to this test case.
    pub fn add_property(&mut self, property: impl Into<Property>) -> &mut Self {
        self.properties.push(property.into());
        self
    }
}

/// Represents the result of a test case.
///
/// Failure and skip detail are mutually exclusive; a test case carries at
/// most one of them.
#[derive(Clone, Debug)]
pub enum TestCaseStatus {
    /// This test case passed. No detail element is emitted.
    Success,

    /// This test case failed.
    Failure {
        /// The failure message.
        message: XmlString,

        /// The "type" of failure that occurred.
        ty: XmlString,

        /// The description of the failure: the captured output of the test.
        ///
        /// This is serialized as the text node of the `failure` element.
        description: XmlString,
    },

    /// This test case was not run.
    Skipped {
        /// The reason the test was skipped.
        message: XmlString,
    },
}

impl TestCaseStatus {
    /// Creates a new `TestCaseStatus` that represents a successful test.
    pub fn success() -> Self {
        TestCaseStatus::Success
    }

    /// Creates a new `TestCaseStatus` that represents a failed test.
    ///
    /// The failure type starts out empty; use [`set_type`](Self::set_type)
    /// to record one.
    pub fn failure(message: impl Into<XmlString>, description: impl Into<XmlString>) -> Self {
        TestCaseStatus::Failure {
            message: message.into(),
            ty: XmlString::default(),
            description: description.into(),
        }
    }

    /// Creates a new `TestCaseStatus` that represents a skipped test.
    pub fn skipped(message: impl Into<XmlString>) -> Self {
        TestCaseStatus::Skipped {
            message: message.into(),
        }
    }

    /// Sets the type of a failure. No-op for success and skip cases.
    pub fn set_type(&mut self, new_ty: impl Into<XmlString>) -> &mut Self {
        if let TestCaseStatus::Failure { ty, .. } = self {
            *ty = new_ty.into();
        }
        self
    }
}

/// A key/value pair attached to a test suite or test case.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Property {
    /// The name of the property.
    pub name: XmlString,

    /// The value of the property.
    pub value: XmlString,
}

impl Property {
    /// Creates a new `Property` instance.
    pub fn new(name: impl Into<XmlString>, value: impl Into<XmlString>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<T> From<(T, T)> for Property
where
    T: Into<XmlString>,
{
    fn from((k, v): (T, T)) -> Self {
        Property::new(k, v)
    }
}

/// A string sanitized for embedding in XML.
///
/// Captured test output routinely contains ANSI escape sequences and other
/// control characters that are not representable in XML 1.0. Construction
/// strips ANSI escapes and removes non-printable control characters;
/// newlines are preserved.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct XmlString {
    inner: Box<str>,
}

impl XmlString {
    /// Creates a new `XmlString`, sanitizing the input.
    pub fn new(s: impl AsRef<str>) -> Self {
        let stripped = strip_ansi_escapes::strip_str(s.as_ref());
        let inner = stripped
            .replace(
                |c| matches!(c, '\x00'..='\x08' | '\x0b' | '\x0c' | '\x0e'..='\x1f'),
                "",
            )
            .into_boxed_str();
        Self { inner }
    }

    /// Returns the string as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Converts the `XmlString` into a `String`.
    pub fn into_string(self) -> String {
        self.inner.into_string()
    }
}

impl AsRef<str> for XmlString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for XmlString {
    fn from(s: &str) -> Self {
        XmlString::new(s)
    }
}

impl From<String> for XmlString {
    fn from(s: String) -> Self {
        XmlString::new(s)
    }
}

impl From<&String> for XmlString {
    fn from(s: &String) -> Self {
        XmlString::new(s)
    }
}

impl From<XmlString> for String {
    fn from(s: XmlString) -> Self {
        s.into_string()
    }
}
