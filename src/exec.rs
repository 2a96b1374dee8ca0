// Copyright (c) The junit-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The input side of report generation: a record of one completed test run.

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use std::time::Duration;

/// A record of one completed test run.
///
/// The record holds, per package, the ordered lists of passed, failed and
/// skipped test outcomes along with captured output and timings. It is
/// produced by the caller's test harness and read, never mutated, by
/// [`generate`](crate::generate).
#[derive(Clone, Debug)]
pub struct ExecutionRecord {
    started: DateTime<FixedOffset>,
    packages: IndexMap<String, PackageExecution>,
    errors: Vec<String>,
}

impl ExecutionRecord {
    /// Creates a new record for a run that began at `started`.
    pub fn new(started: impl Into<DateTime<FixedOffset>>) -> Self {
        Self {
            started: started.into(),
            packages: IndexMap::new(),
            errors: vec![],
        }
    }

    /// Returns the package with the given name, inserting an empty one on
    /// first reference.
    ///
    /// Packages keep the order in which they were first referenced, and the
    /// generated report lists suites in the same order.
    pub fn package_mut(&mut self, name: impl Into<String>) -> &mut PackageExecution {
        self.packages.entry(name.into()).or_default()
    }

    /// Records a run-level error, e.g. a build failure. These are distinct
    /// from test failures and feed the `errors` count on the root element.
    pub fn add_error(&mut self, error: impl Into<String>) -> &mut Self {
        self.errors.push(error.into());
        self
    }

    /// The time at which the run began.
    pub fn started(&self) -> DateTime<FixedOffset> {
        self.started
    }

    /// Iterates over packages in first-reference order.
    pub fn packages(&self) -> impl Iterator<Item = (&str, &PackageExecution)> {
        self.packages.iter().map(|(name, pkg)| (name.as_str(), pkg))
    }

    /// Looks up a package by name.
    pub fn package(&self, name: &str) -> Option<&PackageExecution> {
        self.packages.get(name)
    }

    /// The run-level errors recorded so far.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The total number of tests across all packages, including synthetic
    /// setup-failure cases.
    pub fn total(&self) -> usize {
        self.packages.values().map(PackageExecution::total).sum()
    }

    /// The number of failed test outcomes across all packages.
    pub fn failure_total(&self) -> usize {
        self.packages.values().map(|pkg| pkg.failed.len()).sum()
    }
}

/// The recorded outcomes of a single package under test.
#[derive(Clone, Debug, Default)]
pub struct PackageExecution {
    passed: Vec<TestOutcome>,
    failed: Vec<TestOutcome>,
    skipped: Vec<TestOutcome>,
    elapsed: Duration,
    main_failed: bool,
    output: Vec<String>,
    test_output: IndexMap<String, Vec<String>>,
}

impl PackageExecution {
    /// Records a passed test.
    pub fn add_passed(&mut self, name: impl Into<String>, elapsed: Duration) -> &mut Self {
        self.passed.push(TestOutcome::new(name, elapsed));
        self
    }

    /// Records a failed test.
    pub fn add_failed(&mut self, name: impl Into<String>, elapsed: Duration) -> &mut Self {
        self.failed.push(TestOutcome::new(name, elapsed));
        self
    }

    /// Records a skipped test.
    pub fn add_skipped(&mut self, name: impl Into<String>, elapsed: Duration) -> &mut Self {
        self.skipped.push(TestOutcome::new(name, elapsed));
        self
    }

    /// Records a line of package-level output, e.g. build diagnostics or
    /// output emitted before any test ran. Lines carry their own
    /// terminators.
    pub fn record_output(&mut self, line: impl Into<String>) -> &mut Self {
        self.output.push(line.into());
        self
    }

    /// Records a line of captured output for the named test. Lines carry
    /// their own terminators.
    pub fn record_test_output(
        &mut self,
        test: impl Into<String>,
        line: impl Into<String>,
    ) -> &mut Self {
        self.test_output
            .entry(test.into())
            .or_default()
            .push(line.into());
        self
    }

    /// Sets the time taken by the package.
    pub fn set_elapsed(&mut self, elapsed: Duration) -> &mut Self {
        self.elapsed = elapsed;
        self
    }

    /// Marks the package as having failed before any test ran, e.g. because
    /// its test binary did not build or its harness aborted during setup.
    pub fn mark_main_failed(&mut self) -> &mut Self {
        self.main_failed = true;
        self
    }

    /// The passed outcomes, in record order.
    pub fn passed(&self) -> &[TestOutcome] {
        &self.passed
    }

    /// The failed outcomes, in record order.
    pub fn failed(&self) -> &[TestOutcome] {
        &self.failed
    }

    /// The skipped outcomes, in record order.
    pub fn skipped(&self) -> &[TestOutcome] {
        &self.skipped
    }

    /// The time taken by the package.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whether the package failed before any test ran.
    pub fn main_failed(&self) -> bool {
        self.main_failed
    }

    /// The number of test cases this package contributes to the report,
    /// including the synthetic setup-failure case when applicable.
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len() + self.skipped.len() + usize::from(self.main_failed)
    }

    /// Whether the package contributed no test activity at all.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// The package-level output, concatenated in emission order.
    pub fn output(&self) -> String {
        self.output.concat()
    }

    /// The captured output of the named test, concatenated in emission
    /// order.
    pub fn test_output(&self, test: &str) -> String {
        self.test_output
            .get(test)
            .map(|lines| lines.concat())
            .unwrap_or_default()
    }
}

/// The result of one test: its raw name and how long it took.
///
/// Which of the three outcome lists an outcome lives in determines its
/// pass/fail/skip category; the outcome itself carries no status.
#[derive(Clone, Debug)]
pub struct TestOutcome {
    /// The raw test name, possibly carrying a bracketed annotation.
    pub name: String,

    /// The time it took to execute this test.
    pub elapsed: Duration,
}

impl TestOutcome {
    /// Creates a new outcome.
    pub fn new(name: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            name: name.into(),
            elapsed,
        }
    }
}
