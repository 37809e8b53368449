//! Layering untyped key/value input onto a configuration.
//!
//! Presets, `.arch.toml` files and `key=value` assignments all arrive as a
//! JSON object. Each known key is coerced to the type of the field it
//! targets; unknown keys are ignored.

use serde_json::{Map, Number, Value};

use crate::config::ArchConfig;
use crate::error::{ModelError, Result};

/// The scalar kind a configuration field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Float,
    Integer,
    Text,
}

impl FieldKind {
    fn of(current: &Value) -> Option<Self> {
        match current {
            Value::Number(n) if n.is_f64() => Some(Self::Float),
            Value::Number(_) => Some(Self::Integer),
            Value::String(_) => Some(Self::Text),
            _ => None,
        }
    }
}

/// Return a copy of `base` with every recognized key in `overrides` applied.
pub fn apply_overrides(base: &ArchConfig, overrides: &Map<String, Value>) -> Result<ArchConfig> {
    let mut merged = base.to_map();

    for (key, raw) in overrides {
        let Some(kind) = merged.get(key).and_then(FieldKind::of) else {
            log::warn!("ignoring unknown configuration key '{key}'");
            continue;
        };
        if raw.is_null() {
            continue;
        }
        let value = coerce(key, raw, kind)?;
        merged.insert(key.clone(), value);
    }

    Ok(serde_json::from_value(Value::Object(merged))?)
}

/// Split a `key=value` assignment. The value stays an untyped string.
pub fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
    let Some((key, value)) = assignment.split_once('=') else {
        return Err(ModelError::Validation {
            detail: format!("expected KEY=VALUE, got '{assignment}'"),
        });
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(ModelError::Validation {
            detail: format!("empty key in assignment '{assignment}'"),
        });
    }
    Ok((key.to_string(), Value::String(value.trim().to_string())))
}

/// Collect several `key=value` assignments into one override map.
///
/// Later assignments to the same key win.
pub fn assignments_to_map<S: AsRef<str>>(assignments: &[S]) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for assignment in assignments {
        let (key, value) = parse_assignment(assignment.as_ref())?;
        map.insert(key, value);
    }
    Ok(map)
}

fn coerce(field: &str, raw: &Value, kind: FieldKind) -> Result<Value> {
    let fail = |expected: &'static str| ModelError::Coercion {
        field: field.to_string(),
        value: raw.to_string(),
        expected,
    };

    match kind {
        FieldKind::Float => {
            let x = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            x.and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| fail("a finite number"))
        }
        FieldKind::Integer => {
            let n = match raw {
                Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                    (Some(i), _) => Some(i),
                    // Fractional input truncates toward zero.
                    (None, Some(f)) if f.is_finite() => Some(f.trunc() as i64),
                    _ => None,
                },
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            n.map(|i| Value::Number(i.into()))
                .ok_or_else(|| fail("an integer"))
        }
        FieldKind::Text => match raw {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(fail("a string")),
        },
    }
}
