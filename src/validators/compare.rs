use std::sync::Arc;

use super::Validate;
use crate::synthesize::{js_string, js_value};
use crate::types::{CompareOp, ConfigError, Options, Record, Value};

const KIND: &str = "compare";

/// Compares the field against a fixed value.
///
/// Options: `value` (required), `operator` (a [`CompareOp`] symbol, default
/// `==`), `message`.
struct CompareValidator {
    attributes: Vec<String>,
    op: CompareOp,
    target: Value,
    message: Option<String>,
}

pub(super) fn construct(
    _record: &Record,
    attributes: Vec<String>,
    options: &Options,
) -> Result<Arc<dyn Validate>, ConfigError> {
    let target = options.get("value").cloned().ok_or(ConfigError::MissingOption {
        kind: KIND,
        option: "value",
    })?;
    let op = match options.str("operator") {
        Some(symbol) => symbol.parse().map_err(|()| ConfigError::InvalidOption {
            kind: KIND,
            option: "operator",
            reason: format!("unsupported operator '{symbol}'"),
        })?,
        None => CompareOp::Eq,
    };
    Ok(Arc::new(CompareValidator {
        attributes,
        op,
        target,
        message: options.str("message").map(str::to_owned),
    }))
}

impl CompareValidator {
    fn message_for(&self, attribute: &str) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => {
                let relation = match self.op {
                    CompareOp::Eq => "must be",
                    CompareOp::Neq => "must not be",
                    CompareOp::Gt => "must be greater than",
                    CompareOp::Gte => "must be at least",
                    CompareOp::Lt => "must be less than",
                    CompareOp::Lte => "must be at most",
                };
                format!("{attribute} {relation} {}", self.target.text())
            }
        }
    }
}

impl Validate for CompareValidator {
    fn kind(&self) -> &str {
        KIND
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }

    fn validate(&self, record: &mut Record) {
        for attribute in &self.attributes {
            let holds = record
                .get(attribute)
                .and_then(|value| value.compare(self.op, &self.target))
                .unwrap_or(false);
            if !holds {
                record.add_error(attribute, self.message_for(attribute));
            }
        }
    }

    fn client_check(&self, _record: &Record, attribute: &str) -> Option<String> {
        Some(format!(
            "if (value {} {}) {{ messages.push({}); }}",
            self.op.negated(),
            js_value(&self.target),
            js_string(&self.message_for(attribute)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(options: Options) -> Arc<dyn Validate> {
        construct(&Record::new("R"), vec!["type".to_owned()], &options).unwrap()
    }

    fn options_eq_one() -> Options {
        let mut options = Options::new();
        options.insert("value", 1_i64);
        options
    }

    #[test]
    fn missing_value_option() {
        let result = construct(&Record::new("R"), vec!["type".to_owned()], &Options::new());
        assert!(matches!(
            result,
            Err(ConfigError::MissingOption { kind: "compare", option: "value" })
        ));
    }

    #[test]
    fn bad_operator_option() {
        let mut options = options_eq_one();
        options.insert("operator", "~=");
        let result = construct(&Record::new("R"), vec!["type".to_owned()], &options);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOption { kind: "compare", option: "operator", .. })
        ));
    }

    #[test]
    fn equal_value_passes() {
        let validator = build(options_eq_one());
        let mut record = Record::new("R").set("type", 1_i64);
        validator.validate(&mut record);
        assert!(record.errors().is_empty());
    }

    #[test]
    fn unequal_value_fails() {
        let validator = build(options_eq_one());
        let mut record = Record::new("R").set("type", 2_i64);
        validator.validate(&mut record);
        assert_eq!(record.errors().get("type"), ["type must be 1"]);
    }

    #[test]
    fn missing_attribute_fails() {
        let validator = build(options_eq_one());
        let mut record = Record::new("R");
        validator.validate(&mut record);
        assert!(record.has_errors("type"));
    }

    #[test]
    fn type_mismatch_fails() {
        let validator = build(options_eq_one());
        let mut record = Record::new("R").set("type", "one");
        validator.validate(&mut record);
        assert!(record.has_errors("type"));
    }

    #[test]
    fn explicit_operator() {
        let mut options = Options::new();
        options.insert("value", 18_i64);
        options.insert("operator", ">=");
        let validator = build(options);

        let mut adult = Record::new("R").set("type", 21_i64);
        validator.validate(&mut adult);
        assert!(adult.errors().is_empty());

        let mut minor = Record::new("R").set("type", 17_i64);
        validator.validate(&mut minor);
        assert_eq!(minor.errors().get("type"), ["type must be at least 18"]);
    }

    #[test]
    fn custom_message() {
        let mut options = options_eq_one();
        options.insert("message", "wrong type");
        let validator = build(options);
        let mut record = Record::new("R").set("type", 2_i64);
        validator.validate(&mut record);
        assert_eq!(record.errors().get("type"), ["wrong type"]);
    }

    #[test]
    fn client_check_tests_negated_operator() {
        let validator = build(options_eq_one());
        let record = Record::new("R").set("type", 1_i64);
        let fragment = validator.client_check(&record, "type").unwrap();
        assert_eq!(
            fragment,
            r#"if (value != 1) { messages.push("type must be 1"); }"#
        );
    }

    #[test]
    fn client_check_string_target_is_quoted() {
        let mut options = Options::new();
        options.insert("value", "admin");
        let validator = build(options);
        let record = Record::new("R");
        let fragment = validator.client_check(&record, "type").unwrap();
        assert_eq!(
            fragment,
            r#"if (value != "admin") { messages.push("type must be admin"); }"#
        );
    }
}
