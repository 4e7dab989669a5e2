use std::sync::Arc;

use regex::Regex;

use super::Validate;
use crate::synthesize::js_string;
use crate::types::{ConfigError, Options, Record};

const KIND: &str = "match";

/// Tests the field's text form against a regular expression.
///
/// Options: `pattern` (required), `not` (invert the match), `message`.
/// Absent attributes are skipped; presence is the `required` kind's concern.
struct PatternValidator {
    attributes: Vec<String>,
    regex: Regex,
    pattern: String,
    invert: bool,
    message: Option<String>,
}

pub(super) fn construct(
    _record: &Record,
    attributes: Vec<String>,
    options: &Options,
) -> Result<Arc<dyn Validate>, ConfigError> {
    let pattern = options.str("pattern").ok_or(ConfigError::MissingOption {
        kind: KIND,
        option: "pattern",
    })?;
    let regex = Regex::new(pattern).map_err(|err| ConfigError::InvalidOption {
        kind: KIND,
        option: "pattern",
        reason: err.to_string(),
    })?;
    Ok(Arc::new(PatternValidator {
        attributes,
        regex,
        pattern: pattern.to_owned(),
        invert: options.bool("not").unwrap_or(false),
        message: options.str("message").map(str::to_owned),
    }))
}

impl PatternValidator {
    fn message_for(&self, attribute: &str) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => format!("{attribute} has an invalid format"),
        }
    }
}

impl Validate for PatternValidator {
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
            let matched = self.regex.is_match(&value.text());
            if matched == self.invert {
                record.add_error(attribute, self.message_for(attribute));
            }
        }
    }

    fn client_check(&self, _record: &Record, attribute: &str) -> Option<String> {
        // JS regex literals end at an unescaped slash.
        let literal = self.pattern.replace('/', "\\/");
        let bang = if self.invert { "" } else { "!" };
        Some(format!(
            "if ({bang}/{literal}/.test(value)) {{ messages.push({}); }}",
            js_string(&self.message_for(attribute)),
        ))
    }
}
