//! Record validation from the static field-rule table.
//!
//! Both input channels (JSON bodies and form bodies) pass through here
//! before anything is persisted. Every field's rules run; failures
//! accumulate rather than short-circuiting, so one submission reports all
//! of its problems at once.

use crate::error::AppError;
use crate::model::{EntityDef, FieldRule};
use regex::Regex;
use std::collections::HashMap;

pub struct RecordValidator;

impl RecordValidator {
    /// Validate input fields against the entity's rules. Returns `Ok` or a
    /// `BadRequest` carrying the aggregated message.
    pub fn validate(
        fields: &HashMap<String, String>,
        entity: &EntityDef,
    ) -> Result<(), AppError> {
        let problems = Self::check(fields, entity);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::BadRequest(problems.join("; ")))
        }
    }

    /// Run every field rule and collect one message per failure. An empty or
    /// whitespace-only value counts as absent.
    pub fn check(fields: &HashMap<String, String>, entity: &EntityDef) -> Vec<String> {
        let mut problems = Vec::new();
        for f in entity.fields {
            let value = fields
                .get(f.name)
                .map(String::as_str)
                .map(str::trim)
                .filter(|v| !v.is_empty());
            match value {
                None => {
                    if f.rule.required {
                        problems.push(format!("{} is required", f.name));
                    }
                }
                Some(v) => check_value(f.name, v, &f.rule, &mut problems),
            }
        }
        problems
    }
}

fn check_value(name: &str, value: &str, rule: &FieldRule, problems: &mut Vec<String>) {
    if let Some(pattern) = rule.pattern {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(value) => {
                problems.push(format!("{} does not match required pattern", name));
            }
            Ok(_) => {}
            Err(_) => problems.push(format!("invalid pattern for {}", name)),
        }
    }
    if let Some(allowed) = rule.allowed {
        let bad = value
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .any(|t| !allowed.iter().any(|a| *a == t));
        if bad {
            problems.push(format!("{} must be one of: {}", name, allowed.join(", ")));
        }
    }
    if rule.url && !is_well_formed_url(value) {
        problems.push(format!("{} must be a valid URL", name));
    }
}

/// Minimal well-formedness check: an http(s) scheme and a non-empty host.
fn is_well_formed_url(s: &str) -> bool {
    let rest = match s.strip_prefix("http://").or_else(|| s.strip_prefix("https://")) {
        Some(rest) => rest,
        None => return false,
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty() && !host.contains(char::is_whitespace)
}
