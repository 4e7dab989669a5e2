//! Client-side script synthesis for conditional rules.
//!
//! The server-side conditional evaluation has a client twin: a single
//! script fragment of the shape
//!
//! ```text
//! if (GUARD) { CONSEQUENCE }
//! ```
//!
//! where GUARD is assembled from the guard validators' own client checks and
//! CONSEQUENCE is the client check of every consequence validator bound to
//! the attribute being rendered. Each collaborator fragment is expected in
//! the conventional `if (cond) { ... }` form; the parenthesized condition is
//! extracted, its `value` token re-targeted, and the result negated and
//! AND-joined across all guard attributes: the guard holds exactly when none
//! of the individual violation conditions fire.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::compile::Compiler;
use crate::types::{Conditional, Record, SynthesisError, Value};

// ---------------------------------------------------------------------------
// Fragment patterns
// ---------------------------------------------------------------------------

/// Matches the leading `if (cond) {` of a collaborator fragment. `(?s)` lets
/// the condition span lines.
static CONDITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)if\s*\((.+)\)\s*\{").expect("condition pattern is valid")
});

/// The placeholder token collaborator fragments use for the field value.
static VALUE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bvalue\b").expect("value-token pattern is valid"));

// ---------------------------------------------------------------------------
// Value addressing
// ---------------------------------------------------------------------------

/// Where a guard condition reads its field value from. One substitution
/// strategy serves both addressing modes.
enum ValueSource {
    /// A live lookup of the rendered form field.
    Live { element: String },
    /// The record's value at synthesis time, literal-encoded.
    Snapshot { literal: String },
}

impl ValueSource {
    fn for_attribute(conditional: &Conditional, record: &Record, attribute: &str) -> ValueSource {
        if conditional.dynamic_guard_value() {
            ValueSource::Live {
                element: element_id(record.name(), attribute),
            }
        } else {
            let text = record.get(attribute).map(Value::text).unwrap_or_default();
            ValueSource::Snapshot {
                literal: js_string(&text),
            }
        }
    }

    fn substitute(&self, condition: &str) -> String {
        let replacement = match self {
            ValueSource::Live { element } => {
                format!("document.getElementById(\"{element}\").value")
            }
            ValueSource::Snapshot { literal } => literal.clone(),
        };
        VALUE_TOKEN
            .replace_all(condition, NoExpand(&replacement))
            .into_owned()
    }
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

pub(crate) fn client_script(
    conditional: &Conditional,
    record: &Record,
    attribute: &str,
    compiler: &Compiler,
) -> Result<String, SynthesisError> {
    let guard = match conditional.guard_override() {
        Some(expression) => expression.to_owned(),
        None => {
            let validators = compiler.compile(record, conditional.when_rules())?;
            let mut terms = Vec::new();
            for validator in validators.iter() {
                for guard_attribute in validator.attributes() {
                    let fragment = validator
                        .client_check(record, guard_attribute)
                        .ok_or_else(|| SynthesisError::MissingClientCheck {
                            kind: validator.kind().to_owned(),
                            attribute: guard_attribute.clone(),
                        })?;
                    let condition = extract_condition(&fragment).ok_or_else(|| {
                        SynthesisError::UnrecognizedFragment {
                            attribute: guard_attribute.clone(),
                        }
                    })?;
                    let source = ValueSource::for_attribute(conditional, record, guard_attribute);
                    terms.push(format!("!({})", source.substitute(condition)));
                }
            }
            terms.join(" && ")
        }
    };

    let mut consequence = String::new();
    let validators = compiler.compile(record, conditional.then_rules())?;
    for validator in validators.iter() {
        if validator.attributes().iter().any(|a| a == attribute) {
            if let Some(fragment) = validator.client_check(record, attribute) {
                consequence.push_str(&fragment);
            }
        }
    }

    Ok(format!("\nif({guard}){{{consequence}}}\n"))
}

fn extract_condition(fragment: &str) -> Option<&str> {
    CONDITION
        .captures(fragment)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

// ---------------------------------------------------------------------------
// Script-text helpers
// ---------------------------------------------------------------------------

/// Element id of a record attribute's rendered form field: the record type
/// name and attribute joined with `_`, with any character that is not
/// alphanumeric, `-`, or `_` replaced by `_`.
#[must_use]
pub fn element_id(record_name: &str, attribute: &str) -> String {
    let raw = format!("{record_name}_{attribute}");
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A double-quoted JavaScript string literal.
pub(crate) fn js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A JavaScript literal for a typed value: numbers and bools verbatim,
/// strings quoted.
pub(crate) fn js_value(value: &Value) -> String {
    match value {
        Value::String(s) => js_string(s),
        other => other.text(),
    }
}
