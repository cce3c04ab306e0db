use anyhow::{Result, anyhow, bail};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Shape and bounds a single document field must satisfy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRule {
    Text { min_len: usize, max_len: usize },
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Bool,
    List,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub required: bool,
    pub rule: FieldRule,
}

impl FieldDescriptor {
    pub const fn required(name: &'static str, rule: FieldRule) -> Self {
        Self {
            name,
            required: true,
            rule,
        }
    }

    pub const fn optional(name: &'static str, rule: FieldRule) -> Self {
        Self {
            name,
            required: false,
            rule,
        }
    }
}

/// Checks a JSON document against a descriptor table.
///
/// Missing or `null` optional fields are accepted; fields not listed in the
/// table are left to the decoder.
pub fn validate_document(document: &Value, fields: &[FieldDescriptor]) -> Result<()> {
    let Some(object) = document.as_object() else {
        bail!("Invalid document: expected a JSON object");
    };

    for field in fields {
        match object.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    bail!("Invalid field: {} is required", field.name);
                }
            }
            Some(value) => check_rule(field, value)?,
        }
    }

    Ok(())
}

/// Validates `document` and decodes it into `T`.
pub fn decode_document<T: DeserializeOwned>(document: Value, fields: &[FieldDescriptor]) -> Result<T> {
    validate_document(&document, fields)?;
    serde_json::from_value(document).map_err(|err| anyhow!("Invalid document: {}", err))
}

fn check_rule(field: &FieldDescriptor, value: &Value) -> Result<()> {
    match field.rule {
        FieldRule::Text { min_len, max_len } => {
            let text = value
                .as_str()
                .ok_or_else(|| anyhow!("Invalid field: {} must be a string", field.name))?;
            let len = text.chars().count();
            if len < min_len || len > max_len {
                bail!(
                    "Invalid field: {} length must be within {}..={}",
                    field.name,
                    min_len,
                    max_len
                );
            }
        }
        FieldRule::Integer { min, max } => {
            let number = value
                .as_i64()
                .ok_or_else(|| anyhow!("Invalid field: {} must be an integer", field.name))?;
            if number < min || number > max {
                bail!("Invalid field: {} must be within {}..={}", field.name, min, max);
            }
        }
        FieldRule::Float { min, max } => {
            let number = value
                .as_f64()
                .ok_or_else(|| anyhow!("Invalid field: {} must be a number", field.name))?;
            if number < min || number > max {
                bail!("Invalid field: {} must be within {}..={}", field.name, min, max);
            }
        }
        FieldRule::Bool => {
            if !value.is_boolean() {
                bail!("Invalid field: {} must be a boolean", field.name);
            }
        }
        FieldRule::List => {
            if !value.is_array() {
                bail!("Invalid field: {} must be a list", field.name);
            }
        }
        FieldRule::Object => {
            if !value.is_object() {
                bail!("Invalid field: {} must be an object", field.name);
            }
        }
    }

    Ok(())
}
