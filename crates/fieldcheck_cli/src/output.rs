use anyhow::Result;
use colored::*;
use fieldcheck_core::{Params, Request, ValidationReport, Value};
use serde_json::{Value as JsonValue, json};

pub fn print_validation_report(
    report: &ValidationReport,
    request: &Request,
    format: &str,
) -> Result<()> {
    match format {
        "json" => print_json(&report_json(report, request)),
        _ => {
            print_text_report(report);
            Ok(())
        }
    }
}

fn print_text_report(report: &ValidationReport) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if report.passed {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !report.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for (i, error) in report.errors.iter().enumerate() {
            println!("  {}. {}", i + 1, error.message().red());
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Sections validated: {}", report.stats.sections_validated);
    println!("  Fields checked:     {}", report.stats.fields_checked);
    println!("  Fields skipped:     {}", report.stats.fields_skipped);
    println!("  Total errors:       {}", report.errors.len());
    println!("{}", "═".repeat(60));
}

fn params_json(params: &Params) -> JsonValue {
    Value::Object(params.clone()).to_json()
}

fn report_json(report: &ValidationReport, request: &Request) -> JsonValue {
    let errors: Vec<JsonValue> = report
        .errors
        .iter()
        .map(|error| {
            json!({
                "section": error.section,
                "field": error.record.field,
                "constraint": error.record.constraint,
                "message": error.message(),
            })
        })
        .collect();

    json!({
        "passed": report.passed,
        "errors": errors,
        "inputs": {
            "params": params_json(&request.params),
            "query": params_json(&request.query),
            "body": params_json(&request.body),
        },
        "summary": {
            "sections_validated": report.stats.sections_validated,
            "fields_checked": report.stats.fields_checked,
            "fields_skipped": report.stats.fields_skipped,
            "error_count": report.errors.len(),
            "duration_ms": report.stats.duration_ms,
        }
    })
}

pub fn print_json(value: &JsonValue) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}
