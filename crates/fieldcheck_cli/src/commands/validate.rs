use anyhow::{Context, Result};
use fieldcheck_parser::{load_request, parse_file};
use fieldcheck_validator::RequestValidator;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(schema_path: &str, request_path: &str, fail_slow: bool, format: &str) -> Result<()> {
    info!("Validating request {} against {}", request_path, schema_path);
    info!("Fail slow: {}", fail_slow);

    let validation = parse_file(Path::new(schema_path))
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))?;

    let mut request = load_request(Path::new(request_path))
        .with_context(|| format!("Failed to load request file: {}", request_path))?
        .with_validation(validation);

    let mut validator = RequestValidator::new();
    if fail_slow {
        validator.disable_fail_on_first_error();
    }

    let report = validator.report(&mut request);
    output::print_validation_report(&report, &request, format)?;

    if !report.passed {
        std::process::exit(1);
    }

    Ok(())
}
