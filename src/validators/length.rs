use std::sync::Arc;

use super::Validate;
use crate::synthesize::js_string;
use crate::types::{ConfigError, Options, Record};

const KIND: &str = "length";

/// Bounds the character count of the field's text form.
///
/// Options: `min`, `max` (at least one required), `message`. Absent
/// attributes are skipped; presence is the `required` kind's concern.
struct LengthValidator {
    attributes: Vec<String>,
    min: Option<usize>,
    max: Option<usize>,
    message: Option<String>,
}

pub(super) fn construct(
    _record: &Record,
    attributes: Vec<String>,
    options: &Options,
) -> Result<Arc<dyn Validate>, ConfigError> {
    let min = options.count("min");
    let max = options.count("max");
    if min.is_none() && max.is_none() {
        return Err(ConfigError::MissingOption {
            kind: KIND,
            option: "min/max",
        });
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ConfigError::InvalidOption {
                kind: KIND,
                option: "min/max",
                reason: format!("min ({min}) exceeds max ({max})"),
            });
        }
    }
    Ok(Arc::new(LengthValidator {
        attributes,
        min,
        max,
        message: options.str("message").map(str::to_owned),
    }))
}

impl LengthValidator {
    fn too_short(&self, attribute: &str, min: usize) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => format!("{attribute} is too short (minimum is {min} characters)"),
        }
    }

    fn too_long(&self, attribute: &str, max: usize) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => format!("{attribute} is too long (maximum is {max} characters)"),
        }
    }

    fn client_message(&self, attribute: &str) -> String {
        match (&self.message, self.min, self.max) {
            (Some(message), _, _) => message.clone(),
            (None, Some(min), None) => self.too_short(attribute, min),
            (None, None, Some(max)) => self.too_long(attribute, max),
            (None, Some(min), Some(max)) => {
                format!("{attribute} must be between {min} and {max} characters")
            }
            // Construction guarantees at least one bound.
            (None, None, None) => String::new(),
        }
    }
}

impl Validate for LengthValidator {
    fn kind(&self) -> &str {
        KIND
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }

    fn validate(&self, record: &mut Record) {
        for attribute in &self.attributes {
            let Some(value) = record.get(attribute) else {
                continue;
            };
            let chars = value.text().chars().count();
            if let Some(min) = self.min {
                if chars < min {
                    let message = self.too_short(attribute, min);
                    record.add_error(attribute, message);
                    continue;
                }
            }
            if let Some(max) = self.max {
                if chars > max {
                    let message = self.too_long(attribute, max);
                    record.add_error(attribute, message);
                }
            }
        }
    }

    fn client_check(&self, _record: &Record, attribute: &str) -> Option<String> {
        let mut conditions = Vec::new();
        if let Some(min) = self.min {
            conditions.push(format!("value.length < {min}"));
        }
        if let Some(max) = self.max {
            conditions.push(format!("value.length > {max}"));
        }
        Some(format!(
            "if ({}) {{ messages.push({}); }}",
            conditions.join(" || "),
            js_string(&self.client_message(attribute)),
        ))
    }
}
