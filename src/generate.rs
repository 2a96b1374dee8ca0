// Copyright (c) The junit-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of an [`ExecutionRecord`] into a JUnit [`Report`].

use crate::{
    annotation::extract_requirement,
    errors::SerializeError,
    exec::{ExecutionRecord, PackageExecution, TestOutcome},
    report::{Property, Report, TestCase, TestCaseStatus, TestSuite},
    toolchain,
};
use chrono::{SecondsFormat, Utc};
use debug_ignore::DebugIgnore;
use std::{io, time::Duration};

static FAILURE_MESSAGE: &str = "Failed";
static MAIN_FAILURE_CASE_NAME: &str = "TestMain";
static RUSTC_VERSION_PROPERTY: &str = "rustc.version";

/// Converts a package or test identifier into its display form.
pub type FormatFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Configuration for report generation.
#[derive(Debug, Default)]
pub struct ReportConfig {
    /// The project name recorded on the root element. Omitted when empty.
    pub project_name: String,

    /// Skips suites for packages with no test activity. Overall counts on
    /// the root element still cover the full record.
    pub hide_empty_packages: bool,

    /// Fixed suite timestamp, replacing the run start time. Useful for
    /// reproducible output.
    pub timestamp_override: Option<String>,

    /// Fixed overall elapsed time, replacing the measured wall-clock value.
    /// Useful for reproducible output.
    pub elapsed_override: Option<String>,

    /// Toolchain version to record, skipping the `rustc --version` lookup.
    pub rustc_version: Option<String>,

    format_suite_name: DebugIgnore<Option<FormatFn>>,
    format_classname: DebugIgnore<Option<FormatFn>>,
}

impl ReportConfig {
    /// Creates a configuration with the given project name.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Self::default()
        }
    }

    /// Sets the formatter applied to package names to produce suite names.
    /// Defaults to the identity function.
    pub fn set_format_suite_name(
        &mut self,
        format: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> &mut Self {
        self.format_suite_name = DebugIgnore(Some(Box::new(format)));
        self
    }

    /// Sets the formatter applied to package names to produce test case
    /// classnames. Defaults to the identity function.
    pub fn set_format_classname(
        &mut self,
        format: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> &mut Self {
        self.format_classname = DebugIgnore(Some(Box::new(format)));
        self
    }

    fn suite_name(&self, package: &str) -> String {
        match &self.format_suite_name.0 {
            Some(format) => format(package),
            None => package.to_owned(),
        }
    }

    fn classname(&self, package: &str) -> String {
        match &self.format_classname.0 {
            Some(format) => format(package),
            None => package.to_owned(),
        }
    }
}

/// Generates a report from `record` and writes it to `out`.
pub fn write_report(
    out: impl io::Write,
    record: &ExecutionRecord,
    config: &ReportConfig,
) -> Result<(), SerializeError> {
    generate(record, config).serialize(out)
}

/// Builds a JUnit [`Report`] from a completed execution record.
///
/// Overall counts cover the full record even when
/// [`hide_empty_packages`](ReportConfig#structfield.hide_empty_packages)
/// filters suites out. Unless overridden, the toolchain version is looked up
/// once per call; a failed lookup records `"unknown"` and generation
/// proceeds.
pub fn generate(record: &ExecutionRecord, config: &ReportConfig) -> Report {
    let version = toolchain::resolve_version(config.rustc_version.as_deref());

    let mut report = Report::new(&config.project_name);
    report.tests = record.total();
    report.failures = record.failure_total();
    report.errors = record.errors().len();
    report.time = match &config.elapsed_override {
        Some(elapsed) => elapsed.clone(),
        None => {
            let elapsed = Utc::now()
                .signed_duration_since(record.started())
                .to_std()
                .unwrap_or_default();
            format_duration_as_seconds(elapsed)
        }
    };

    for (package_name, package) in record.packages() {
        if config.hide_empty_packages && package.is_empty() {
            continue;
        }

        let mut suite = TestSuite::new(config.suite_name(package_name));
        suite.tests = package.total();
        suite.failures = package.failed().len();
        suite.time = format_duration_as_seconds(package.elapsed());
        suite.timestamp = match &config.timestamp_override {
            Some(timestamp) => timestamp.clone(),
            None => record
                .started()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        suite.add_property(Property::new(RUSTC_VERSION_PROPERTY, version.as_str()));
        suite.add_test_cases(package_test_cases(package_name, package, config));
        report.add_test_suite(suite);
    }

    report
}

// Failed cases lead (after the synthetic setup-failure case, if any), then
// skipped, then passed, each in record order. Consumers rely on failures
// appearing before passes.
fn package_test_cases(
    package_name: &str,
    package: &PackageExecution,
    config: &ReportConfig,
) -> Vec<TestCase> {
    let mut cases = vec![];

    if package.main_failed() {
        let status = TestCaseStatus::failure(FAILURE_MESSAGE, package.output());
        let mut case = TestCase::new(MAIN_FAILURE_CASE_NAME, status);
        case.set_classname(config.classname(package_name))
            .set_time(format_duration_as_seconds(Duration::ZERO));
        cases.push(case);
    }

    for outcome in package.failed() {
        let mut case = new_test_case(package_name, outcome, config);
        case.status =
            TestCaseStatus::failure(FAILURE_MESSAGE, package.test_output(&outcome.name));
        cases.push(case);
    }

    for outcome in package.skipped() {
        let mut case = new_test_case(package_name, outcome, config);
        case.status = TestCaseStatus::skipped(package.test_output(&outcome.name));
        cases.push(case);
    }

    for outcome in package.passed() {
        cases.push(new_test_case(package_name, outcome, config));
    }

    cases
}

fn new_test_case(package_name: &str, outcome: &TestOutcome, config: &ReportConfig) -> TestCase {
    let (name, property) = extract_requirement(&outcome.name);
    let mut case = TestCase::new(name, TestCaseStatus::success());
    case.set_classname(config.classname(package_name))
        .set_time(format_duration_as_seconds(outcome.elapsed));
    if let Some(property) = property {
        case.add_property(property);
    }
    case
}

fn format_duration_as_seconds(duration: Duration) -> String {
    format!("{:.6}", duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn start_time() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-05-01T10:00:00+00:00").expect("valid timestamp")
    }

    // Overrides keep the output deterministic: no wall clock, no rustc
    // spawn.
    fn fixed_config() -> ReportConfig {
        let mut config = ReportConfig::default();
        config.timestamp_override = Some("2024-05-01T10:00:00Z".to_owned());
        config.elapsed_override = Some("0.045000".to_owned());
        config.rustc_version = Some("1.70.0 (90c541806 2023-05-31)".to_owned());
        config
    }

    #[test]
    fn round_trip_single_package() {
        let mut record = ExecutionRecord::new(start_time());
        let pkg = record.package_mut("pkg/a");
        pkg.add_passed("TestA", Duration::from_millis(10));
        pkg.add_failed("TestB[REQ-9]", Duration::from_millis(20));
        pkg.record_test_output("TestB[REQ-9]", "boom\n");
        pkg.set_elapsed(Duration::from_millis(30));

        let report = generate(&record, &fixed_config());
        assert_eq!(report.tests, 2);
        assert_eq!(report.failures, 1);
        assert_eq!(report.errors, 0);

        let suite = &report.test_suites[0];
        assert_eq!(suite.name, "pkg/a");
        assert_eq!(suite.tests, 2);
        assert_eq!(suite.failures, 1);
        assert_eq!(suite.test_cases.len(), 2);

        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites tests="2" failures="1" errors="0" time="0.045000">
	<testsuite tests="2" failures="1" time="0.030000" name="pkg/a" timestamp="2024-05-01T10:00:00Z">
		<properties>
			<property name="rustc.version" value="1.70.0 (90c541806 2023-05-31)"/>
		</properties>
		<testcase classname="pkg/a" name="TestB" time="0.020000">
			<failure message="Failed" type="">boom
</failure>
			<properties>
				<property name="Requirement" value="REQ-9"/>
			</properties>
		</testcase>
		<testcase classname="pkg/a" name="TestA" time="0.010000"/>
	</testsuite>
</testsuites>
"#;
        assert_eq!(report.to_string().expect("serialization succeeds"), expected);
    }

    #[test]
    fn main_failure_synthesizes_leading_case() {
        let mut record = ExecutionRecord::new(start_time());
        let pkg = record.package_mut("pkg/broken");
        pkg.mark_main_failed();
        pkg.record_output("error[E0425]: cannot find value `x`\n");
        pkg.record_output("error: aborting due to previous error\n");
        pkg.add_failed("TestC", Duration::from_millis(5));
        record.add_error("build failed for pkg/broken");

        let report = generate(&record, &fixed_config());
        assert_eq!(report.tests, 2);
        assert_eq!(report.failures, 1);
        assert_eq!(report.errors, 1);

        let suite = &report.test_suites[0];
        // The synthetic case counts toward the suite total but not its
        // failure count.
        assert_eq!(suite.tests, 2);
        assert_eq!(suite.failures, 1);

        let main_case = &suite.test_cases[0];
        assert_eq!(main_case.name, "TestMain");
        assert_eq!(main_case.time, "0.000000");
        assert!(main_case.properties.is_empty());
        match &main_case.status {
            TestCaseStatus::Failure {
                message,
                ty,
                description,
            } => {
                assert_eq!(message.as_str(), "Failed");
                assert_eq!(ty.as_str(), "");
                assert_eq!(
                    description.as_str(),
                    "error[E0425]: cannot find value `x`\nerror: aborting due to previous error\n"
                );
            }
            status => panic!("expected failure status, got {status:?}"),
        }
        assert_eq!(suite.test_cases[1].name, "TestC");
    }

    #[test]
    fn case_ordering_is_failed_skipped_passed() {
        let mut record = ExecutionRecord::new(start_time());
        let pkg = record.package_mut("pkg/order");
        pkg.add_passed("passed_1", Duration::ZERO);
        pkg.add_skipped("skipped_1", Duration::ZERO);
        pkg.add_failed("failed_1", Duration::ZERO);
        pkg.add_passed("passed_2", Duration::ZERO);
        pkg.add_failed("failed_2", Duration::ZERO);

        let report = generate(&record, &fixed_config());
        let names: Vec<_> = report.test_suites[0]
            .test_cases
            .iter()
            .map(|case| case.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["failed_1", "failed_2", "skipped_1", "passed_1", "passed_2"]
        );
    }

    #[test]
    fn skipped_case_carries_captured_output() {
        let mut record = ExecutionRecord::new(start_time());
        let pkg = record.package_mut("pkg/skip");
        pkg.add_skipped("needs_disk[REQ-2,REQ-5]", Duration::ZERO);
        pkg.record_test_output("needs_disk[REQ-2,REQ-5]", "skipped: requires large disk\n");

        let report = generate(&record, &fixed_config());
        let case = &report.test_suites[0].test_cases[0];
        assert_eq!(case.name, "needs_disk");
        match &case.status {
            TestCaseStatus::Skipped { message } => {
                assert_eq!(message.as_str(), "skipped: requires large disk\n");
            }
            status => panic!("expected skipped status, got {status:?}"),
        }
        assert_eq!(
            case.properties,
            [Property::new("Requirements", "REQ-2,REQ-5")]
        );
    }

    #[test]
    fn hiding_empty_packages_preserves_totals() {
        let mut record = ExecutionRecord::new(start_time());
        record
            .package_mut("pkg/a")
            .add_passed("TestA", Duration::ZERO);
        record.package_mut("pkg/empty");
        record.add_error("an unrelated run-level error");

        let mut config = fixed_config();
        config.hide_empty_packages = true;
        let report = generate(&record, &config);
        let suite_names: Vec<_> = report
            .test_suites
            .iter()
            .map(|suite| suite.name.as_str())
            .collect();
        assert_eq!(suite_names, ["pkg/a"]);
        assert_eq!(report.tests, 1);
        assert_eq!(report.errors, 1);

        // Without the option the empty package still shows up.
        let report = generate(&record, &fixed_config());
        assert_eq!(report.test_suites.len(), 2);
        assert_eq!(report.test_suites[1].name, "pkg/empty");
        assert_eq!(report.test_suites[1].tests, 0);
        assert_eq!(report.tests, 1);
    }

    #[test]
    fn name_formatters_apply() {
        let mut record = ExecutionRecord::new(start_time());
        record
            .package_mut("crates/storage")
            .add_passed("TestA", Duration::ZERO);

        let mut config = fixed_config();
        config.set_format_suite_name(|name| name.replace('/', "."));
        config.set_format_classname(|name| format!("rs.{name}"));
        let report = generate(&record, &config);

        let suite = &report.test_suites[0];
        assert_eq!(suite.name, "crates.storage");
        assert_eq!(suite.test_cases[0].classname, "rs.crates/storage");
    }

    #[test]
    fn default_timestamp_is_rfc3339_start_time() {
        let started =
            DateTime::parse_from_rfc3339("2024-05-01T10:00:00+09:00").expect("valid timestamp");
        let mut record = ExecutionRecord::new(started);
        record
            .package_mut("pkg/a")
            .add_passed("TestA", Duration::ZERO);

        let mut config = fixed_config();
        config.timestamp_override = None;
        let report = generate(&record, &config);
        assert_eq!(
            report.test_suites[0].timestamp,
            "2024-05-01T10:00:00+09:00"
        );
    }

    #[test]
    fn default_elapsed_is_measured_in_seconds() {
        let mut record = ExecutionRecord::new(start_time());
        record
            .package_mut("pkg/a")
            .add_passed("TestA", Duration::ZERO);

        let mut config = fixed_config();
        config.elapsed_override = None;
        let report = generate(&record, &config);

        let (seconds, fraction) = report
            .time
            .split_once('.')
            .expect("elapsed time is fixed-point");
        assert_eq!(fraction.len(), 6);
        assert!(seconds.parse::<u64>().expect("integral seconds") > 0);
    }

    #[test]
    fn project_name_lands_on_root_element() {
        let mut record = ExecutionRecord::new(start_time());
        record
            .package_mut("pkg/a")
            .add_passed("TestA", Duration::ZERO);

        let mut config = fixed_config();
        config.project_name = "storage-ci".to_owned();
        let report = generate(&record, &config);
        assert_eq!(report.name, "storage-ci");
        let doc = report.to_string().expect("serialization succeeds");
        assert!(doc.contains(r#"<testsuites name="storage-ci" tests="1""#));
    }
}
