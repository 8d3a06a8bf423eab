//! Request validation orchestrator.
//!
//! This module provides the [`RequestValidator`] that runs the section
//! schemas of a request's route over its inputs and hands the outcome to a
//! continuation.

use crate::SectionEvaluator;
use fieldcheck_core::{Request, RequestError, Section, ValidationReport};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// Builds the failure value handed to the continuation from a message.
pub type ErrorHandler<E> = Box<dyn Fn(String) -> E + Send + Sync>;

/// Validates requests against the schema attached to their route.
///
/// Sections are validated in order: URL parameters, query string, body.
/// Inputs are coerced and formatted in place, so after a successful run the
/// request holds typed values.
///
/// # Example
///
/// ```rust
/// use fieldcheck_core::{Params, Request, RuleBuilder, SectionSchema, ValidationBuilder, Value};
/// use fieldcheck_validator::RequestValidator;
///
/// let validation = ValidationBuilder::new()
///     .query(SectionSchema::new().field("page", RuleBuilder::new("numeric").required(true).build()))
///     .build();
///
/// let mut request = Request::new()
///     .with_validation(validation)
///     .with_query(Params::from([("page", "2")]));
///
/// let validator = RequestValidator::new();
/// validator.validate(&mut request, |err| {
///     assert!(err.is_none());
/// });
///
/// assert_eq!(request.query.get("page"), Some(&Value::from(2)));
/// ```
pub struct RequestValidator<E = RequestError> {
    error_handler: ErrorHandler<E>,
    fail_on_first_error: bool,
}

impl RequestValidator<RequestError> {
    /// Creates a validator that reports [`RequestError`]s and stops at the
    /// first error.
    pub fn new() -> Self {
        Self::with_error_handler(RequestError::from)
    }
}

impl Default for RequestValidator<RequestError> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RequestValidator<E> {
    /// Creates a validator that builds its failure values with `handler`.
    pub fn with_error_handler(handler: impl Fn(String) -> E + Send + Sync + 'static) -> Self {
        Self {
            error_handler: Box::new(handler),
            fail_on_first_error: true,
        }
    }

    /// Collects every error instead of stopping at the first one.
    ///
    /// Messages are then joined with newlines.
    pub fn disable_fail_on_first_error(&mut self) {
        self.fail_on_first_error = false;
    }

    /// Returns true if the validator stops at the first error.
    pub fn fail_on_first_error(&self) -> bool {
        self.fail_on_first_error
    }

    /// Validates a request and returns the full report.
    ///
    /// A request without a validation schema passes.
    pub fn report(&self, request: &mut Request) -> ValidationReport {
        let start = Instant::now();
        let Request {
            validation,
            params,
            query,
            body,
        } = request;

        let Some(validation) = validation.as_ref() else {
            debug!("request has no validation schema");
            return ValidationReport::success();
        };

        let evaluator = SectionEvaluator::new(self.fail_on_first_error)
            .with_messages(validation.messages.as_ref());
        let mut report = ValidationReport::success();

        let sections = [
            (Section::Url, validation.url.as_ref(), params),
            (Section::Query, validation.query.as_ref(), query),
            (Section::Body, validation.body.as_ref(), body),
        ];

        for (section, schema, input) in sections {
            let Some(schema) = schema else {
                continue;
            };

            let outcome = evaluator.evaluate(input, schema, section.is_from_url());
            debug!(
                section = %section,
                fields = outcome.fields_checked,
                errors = outcome.errors.len(),
                "validated section"
            );

            report.stats.sections_validated += 1;
            report.stats.fields_checked += outcome.fields_checked;
            report.stats.fields_skipped += outcome.fields_skipped;
            report.extend(section, outcome.errors);
        }

        report.stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            passed = report.passed,
            errors = report.errors.len(),
            duration_ms = report.stats.duration_ms,
            "request validated"
        );

        report
    }

    /// Validates a request and calls `next` with `None` on success or the
    /// failure value otherwise.
    ///
    /// `next` is called exactly once.
    pub fn validate<F>(&self, request: &mut Request, next: F)
    where
        F: FnOnce(Option<E>),
    {
        next(self.check(request).err());
    }

    /// Validates a request and returns the failure value as an error.
    pub fn check(&self, request: &mut Request) -> Result<(), E> {
        let report = self.report(request);
        match self.failure_message(&report) {
            Some(message) => Err((self.error_handler)(message)),
            None => Ok(()),
        }
    }

    /// Builds the aggregated message: the first message when failing fast,
    /// all messages joined by newlines otherwise.
    fn failure_message(&self, report: &ValidationReport) -> Option<String> {
        let messages = report.messages();
        if messages.is_empty() {
            return None;
        }

        if self.fail_on_first_error {
            messages.into_iter().next()
        } else {
            Some(messages.join("\n"))
        }
    }
}

impl<E> fmt::Debug for RequestValidator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestValidator")
            .field("fail_on_first_error", &self.fail_on_first_error)
            .finish_non_exhaustive()
    }
}
