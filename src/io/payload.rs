//! Payload validation: raw JSON -> `LoanApplication`.
//!
//! Rules:
//! - every field in `FEATURE_NAMES` must be present and non-null
//! - numeric fields take numbers or numeric strings (finite only)
//! - integer fields take integers, integral floats (`1.0`) or integer strings
//! - extra fields are ignored
//!
//! Category codes are not range-checked here. All problems are collected
//! before returning so the caller sees every bad field at once.

use serde_json::{Map, Value};

use crate::domain::LoanApplication;
use crate::error::{FieldError, FieldProblem, ValidationError};

/// Sentinel field name used when the payload itself is not an object.
pub const PAYLOAD_FIELD: &str = "payload";

/// Parse a raw request body. Malformed JSON is a validation failure on `payload`.
pub fn parse_payload(raw: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(raw).map_err(|_| ValidationError {
        fields: vec![FieldError {
            field: PAYLOAD_FIELD.to_string(),
            problem: FieldProblem::MalformedJson,
        }],
    })
}

pub fn validate_payload(payload: &Value) -> Result<LoanApplication, ValidationError> {
    let Some(obj) = payload.as_object() else {
        return Err(ValidationError {
            fields: vec![FieldError {
                field: PAYLOAD_FIELD.to_string(),
                problem: FieldProblem::NotAnObject,
            }],
        });
    };

    let mut errors = Vec::new();

    let duration = number_field(obj, "duration", &mut errors);
    let credit_amount = number_field(obj, "credit_amount", &mut errors);
    let age = number_field(obj, "age", &mut errors);
    let job = integer_field(obj, "job", &mut errors);
    let checking_status = integer_field(obj, "checking_status", &mut errors);
    let savings_status = integer_field(obj, "savings_status", &mut errors);
    let purpose = integer_field(obj, "purpose", &mut errors);

    match (duration, credit_amount, age, job, checking_status, savings_status, purpose) {
        (
            Some(duration),
            Some(credit_amount),
            Some(age),
            Some(job),
            Some(checking_status),
            Some(savings_status),
            Some(purpose),
        ) if errors.is_empty() => Ok(LoanApplication {
            duration,
            credit_amount,
            age,
            job,
            checking_status,
            savings_status,
            purpose,
        }),
        _ => Err(ValidationError { fields: errors }),
    }
}

fn number_field(obj: &Map<String, Value>, name: &str, errors: &mut Vec<FieldError>) -> Option<f64> {
    let value = present(obj, name, errors)?;
    match as_number(value) {
        Some(v) => Some(v),
        None => {
            push(errors, name, FieldProblem::ExpectedNumber);
            None
        }
    }
}

fn integer_field(obj: &Map<String, Value>, name: &str, errors: &mut Vec<FieldError>) -> Option<i64> {
    let value = present(obj, name, errors)?;
    match as_integer(value) {
        Some(v) => Some(v),
        None => {
            push(errors, name, FieldProblem::ExpectedInteger);
            None
        }
    }
}

fn present<'a>(obj: &'a Map<String, Value>, name: &str, errors: &mut Vec<FieldError>) -> Option<&'a Value> {
    match obj.get(name) {
        None | Some(Value::Null) => {
            push(errors, name, FieldProblem::Missing);
            None
        }
        Some(value) => Some(value),
    }
}

fn push(errors: &mut Vec<FieldError>, name: &str, problem: FieldProblem) {
    errors.push(FieldError {
        field: name.to_string(),
        problem,
    });
}

fn as_number(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            integral(n.as_f64()?)
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok()
        }
        _ => None,
    }
}

fn integral(v: f64) -> Option<i64> {
    // Bounds keep the cast exact.
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        Some(v as i64)
    } else {
        None
    }
}
