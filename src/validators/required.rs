use std::sync::Arc;

use super::Validate;
use crate::synthesize::js_string;
use crate::types::{ConfigError, Options, Record, Value};

const KIND: &str = "required";

/// The field must be present and non-blank.
///
/// Options: `message`.
struct RequiredValidator {
    attributes: Vec<String>,
    message: Option<String>,
}

pub(super) fn construct(
    _record: &Record,
    attributes: Vec<String>,
    options: &Options,
) -> Result<Arc<dyn Validate>, ConfigError> {
    Ok(Arc::new(RequiredValidator {
        attributes,
        message: options.str("message").map(str::to_owned),
    }))
}

impl RequiredValidator {
    fn message_for(&self, attribute: &str) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => format!("{attribute} cannot be blank"),
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

impl Validate for RequiredValidator {
    fn kind(&self) -> &str {
        KIND
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }

    fn validate(&self, record: &mut Record) {
        for attribute in &self.attributes {
            if is_blank(record.get(attribute)) {
                record.add_error(attribute, self.message_for(attribute));
            }
        }
    }

    fn client_check(&self, _record: &Record, attribute: &str) -> Option<String> {
        Some(format!(
            "if (value == null || String(value).trim() == \"\") {{ messages.push({}); }}",
            js_string(&self.message_for(attribute)),
        ))
    }
}
