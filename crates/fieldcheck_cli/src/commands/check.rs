use anyhow::{Context, Result};
use fieldcheck_core::{FieldRule, RouteValidation, Section, SectionSchema, Terminal};
use fieldcheck_parser::parse_file;
use fieldcheck_validator::{EvaluationPlan, compile};
use serde_json::{Value as JsonValue, json};
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(schema_path: &str, format: &str) -> Result<()> {
    info!("Checking schema: {}", schema_path);

    let path = Path::new(schema_path);
    let validation = parse_file(path)
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))?;

    match format {
        "json" => output::print_json(&summary_json(&validation)),
        _ => {
            print_summary(&validation);
            Ok(())
        }
    }
}

fn sections(validation: &RouteValidation) -> impl Iterator<Item = (Section, &SectionSchema)> {
    [
        (Section::Url, validation.url.as_ref()),
        (Section::Query, validation.query.as_ref()),
        (Section::Body, validation.body.as_ref()),
    ]
    .into_iter()
    .filter_map(|(section, schema)| schema.map(|schema| (section, schema)))
}

fn describe(rule: &FieldRule) -> String {
    let mut parts = vec![rule.rule_type.to_string()];
    if rule.required {
        parts.push("required".to_string());
    }
    match &rule.terminal {
        Terminal::Never => {}
        Terminal::Always => parts.push("terminal".to_string()),
        Terminal::On(constraints) => parts.push(format!(
            "terminal on [{}]",
            constraints
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
    parts.join(", ")
}

fn print_summary(validation: &RouteValidation) {
    output::print_success("Schema is valid");

    for (section, schema) in sections(validation) {
        let plan = EvaluationPlan::build(schema);

        println!("\n{}:", section);
        for (name, raw) in schema.fields() {
            match compile(raw) {
                Some(rule) => println!("  {:<20} {}", name, describe(&rule)),
                None => println!("  {:<20} skipped (no usable type)", name),
            }
        }
        println!(
            "  Evaluation order: {}",
            plan.fields().map(|f| f.name).collect::<Vec<_>>().join(", ")
        );
        println!(
            "  Extra fields:     {}",
            if schema.disallow_extra_fields {
                "rejected"
            } else {
                "allowed"
            }
        );
    }

    let messages = validation.messages.as_ref().map_or(0, |m| m.len());
    println!("\nCustom messages: {}", messages);
}

fn summary_json(validation: &RouteValidation) -> JsonValue {
    let sections: Vec<JsonValue> = sections(validation)
        .map(|(section, schema)| {
            let plan = EvaluationPlan::build(schema);
            let fields: Vec<JsonValue> = schema
                .fields()
                .map(|(name, raw)| match compile(raw) {
                    Some(rule) => json!({
                        "name": name,
                        "type": rule.rule_type.as_str(),
                        "required": rule.required,
                        "terminal": rule.terminal.is_flagged(),
                    }),
                    None => json!({ "name": name, "skipped": true }),
                })
                .collect();

            json!({
                "section": section,
                "fields": fields,
                "order": plan.fields().map(|f| f.name).collect::<Vec<_>>(),
                "skipped": plan.skipped(),
                "disallowExtraFields": schema.disallow_extra_fields,
            })
        })
        .collect();

    json!({
        "valid": true,
        "sections": sections,
        "messages": validation.messages.as_ref().map_or(0, |m| m.len()),
    })
}
