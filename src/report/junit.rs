use super::types::RunResults;
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

use crate::runner::state::StepResult;

/// Generate JUnit XML report string from RunResults
pub fn generate_junit_xml(results: &RunResults) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = results.steps.len();
    let failures = results.steps.iter().filter(|s| !s.success).count();
    let total_duration: u64 = results.steps.iter().map(|s| s.duration_ms).sum();

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "portal-probe-run"));
    suites_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suites_start.push_attribute(("failures", failures.to_string().as_str()));
    suites_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    writer.write_event(Event::Start(suites_start))?;

    // Single <testsuite>: one run is one linear scenario
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", results.base_url.as_str()));
    suite_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suite_start.push_attribute(("failures", failures.to_string().as_str()));
    suite_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    suite_start.push_attribute(("timestamp", results.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for step in &results.steps {
        write_test_case(&mut writer, step)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(writer: &mut Writer<W>, step: &StepResult) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", step.name.as_str()));
    case_start.push_attribute(("classname", "portal-probe"));
    case_start.push_attribute((
        "time",
        (step.duration_ms as f64 / 1000.0).to_string().as_str(),
    ));

    if step.success {
        writer.write_event(Event::Empty(case_start))?;
    } else {
        writer.write_event(Event::Start(case_start))?;
        let mut failure = BytesStart::new("failure");
        let message = step.error.as_deref().unwrap_or("step failed");
        failure.push_attribute(("message", message));
        match &step.body {
            Some(body) => {
                writer.write_event(Event::Start(failure))?;
                writer.write_event(Event::Text(quick_xml::events::BytesText::new(
                    &body.to_string(),
                )))?;
                writer.write_event(Event::End(BytesEnd::new("failure")))?;
            }
            None => writer.write_event(Event::Empty(failure))?,
        }
        writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    }

    Ok(())
}

/// Generate JUnit report
pub fn generate(results: &RunResults, output: Option<&Path>) -> Result<()> {
    let xml = generate_junit_xml(results)?;

    if let Some(path) = output {
        std::fs::write(path, xml)?;
        println!("JUnit report saved to: {}", path.display());
    } else {
        println!("{}", xml);
    }

    Ok(())
}
