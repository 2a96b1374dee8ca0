// Copyright (c) The junit-summary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `Report`.

use crate::{errors::SerializeError, Property, Report, TestCase, TestCaseStatus, TestSuite};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::io;

static TESTSUITES_TAG: &str = "testsuites";
static TESTSUITE_TAG: &str = "testsuite";
static TESTCASE_TAG: &str = "testcase";
static PROPERTIES_TAG: &str = "properties";
static PROPERTY_TAG: &str = "property";
static FAILURE_TAG: &str = "failure";
static SKIPPED_TAG: &str = "skipped";

pub(crate) fn serialize_report(
    report: &Report,
    writer: impl io::Write,
) -> Result<(), SerializeError> {
    let mut writer = Writer::new_with_indent(writer, b'\t', 1);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_report_impl(report, &mut writer)?;

    // Add a trailing newline.
    writer.write_indent()?;
    Ok(())
}

fn serialize_report_impl(
    report: &Report,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let Report {
        name,
        tests,
        failures,
        errors,
        time,
        test_suites,
    } = report;

    let mut testsuites_tag = BytesStart::new(TESTSUITES_TAG);
    if !name.is_empty() {
        testsuites_tag.push_attribute(("name", name.as_str()));
    }
    testsuites_tag.extend_attributes([
        ("tests", tests.to_string().as_str()),
        ("failures", failures.to_string().as_str()),
        ("errors", errors.to_string().as_str()),
        ("time", time.as_str()),
    ]);
    writer.write_event(Event::Start(testsuites_tag))?;

    for test_suite in test_suites {
        serialize_test_suite(test_suite, writer)?;
    }

    serialize_end_tag(TESTSUITES_TAG, writer)
}

fn serialize_test_suite(
    test_suite: &TestSuite,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let TestSuite {
        name,
        tests,
        failures,
        time,
        timestamp,
        properties,
        test_cases,
    } = test_suite;

    let mut testsuite_tag = BytesStart::new(TESTSUITE_TAG);
    testsuite_tag.extend_attributes([
        ("tests", tests.to_string().as_str()),
        ("failures", failures.to_string().as_str()),
        ("time", time.as_str()),
        ("name", name.as_str()),
        ("timestamp", timestamp.as_str()),
    ]);
    writer.write_event(Event::Start(testsuite_tag))?;

    serialize_properties(properties, writer)?;

    for test_case in test_cases {
        serialize_test_case(test_case, writer)?;
    }

    serialize_end_tag(TESTSUITE_TAG, writer)
}

fn serialize_test_case(
    test_case: &TestCase,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let TestCase {
        name,
        classname,
        time,
        status,
        properties,
    } = test_case;

    let mut testcase_tag = BytesStart::new(TESTCASE_TAG);
    testcase_tag.extend_attributes([
        ("classname", classname.as_str()),
        ("name", name.as_str()),
        ("time", time.as_str()),
    ]);

    if matches!(status, TestCaseStatus::Success) && properties.is_empty() {
        return writer.write_event(Event::Empty(testcase_tag));
    }
    writer.write_event(Event::Start(testcase_tag))?;

    match status {
        TestCaseStatus::Success => {}
        TestCaseStatus::Failure {
            message,
            ty,
            description,
        } => {
            let mut failure_tag = BytesStart::new(FAILURE_TAG);
            failure_tag.extend_attributes([("message", message.as_str()), ("type", ty.as_str())]);
            if description.as_str().is_empty() {
                writer.write_event(Event::Empty(failure_tag))?;
            } else {
                writer.write_event(Event::Start(failure_tag))?;
                writer.write_event(Event::Text(BytesText::new(description.as_str())))?;
                serialize_end_tag(FAILURE_TAG, writer)?;
            }
        }
        TestCaseStatus::Skipped { message } => {
            let mut skipped_tag = BytesStart::new(SKIPPED_TAG);
            skipped_tag.push_attribute(("message", message.as_str()));
            writer.write_event(Event::Empty(skipped_tag))?;
        }
    }

    serialize_properties(properties, writer)?;

    serialize_end_tag(TESTCASE_TAG, writer)
}

// The JUnit schema rejects an empty `<properties/>` element, so a container
// with zero entries is omitted entirely rather than encoded.
fn serialize_properties(
    properties: &[Property],
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    if properties.is_empty() {
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new(PROPERTIES_TAG)))?;
    for property in properties {
        let mut property_tag = BytesStart::new(PROPERTY_TAG);
        property_tag.extend_attributes([
            ("name", property.name.as_str()),
            ("value", property.value.as_str()),
        ]);
        writer.write_event(Event::Empty(property_tag))?;
    }
    serialize_end_tag(PROPERTIES_TAG, writer)
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag_name)))
}
