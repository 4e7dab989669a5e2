use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Value;

/// Named options forwarded verbatim to a validator constructor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    map: BTreeMap<String, Value>,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.map.insert(key.to_owned(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// The option as a string, if present and string-typed.
    #[must_use]
    pub fn str(&self, key: &str) -> Option<&str> {
        match self.map.get(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The option as an integer, if present and integer-typed.
    #[must_use]
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.map.get(key) {
            Some(Value::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// The option as a non-negative count, if present and representable.
    #[must_use]
    pub fn count(&self, key: &str) -> Option<usize> {
        self.int(key).and_then(|v| usize::try_from(v).ok())
    }

    /// The option as a bool, if present and bool-typed.
    #[must_use]
    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.map.get(key) {
            Some(Value::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// One-or-many attribute selector accepted by [`RuleSpec::new`].
#[derive(Debug, Clone)]
pub struct AttributeList(Vec<String>);

impl From<&str> for AttributeList {
    fn from(attr: &str) -> Self {
        AttributeList(vec![attr.to_owned()])
    }
}

impl From<String> for AttributeList {
    fn from(attr: String) -> Self {
        AttributeList(vec![attr])
    }
}

impl From<Vec<String>> for AttributeList {
    fn from(attrs: Vec<String>) -> Self {
        AttributeList(attrs)
    }
}

impl From<Vec<&str>> for AttributeList {
    fn from(attrs: Vec<&str>) -> Self {
        AttributeList(attrs.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AttributeList {
    fn from(attrs: [&str; N]) -> Self {
        AttributeList(attrs.iter().map(|a| (*a).to_owned()).collect())
    }
}

/// Declarative description of one sub-validator: the attributes it binds, the
/// validator kind to construct, and kind-specific options.
///
/// Immutable once built. The wire form is an ordered list: element 0 the
/// attribute selector (one name or a list), element 1 the kind, element 2 an
/// optional map of options.
///
/// ```
/// use guardrail::RuleSpec;
///
/// let rules: Vec<RuleSpec> = serde_json::from_str(
///     r#"[["type", "compare", {"value": 1}],
///         [["phone", "fax"], "match", {"pattern": "^7"}]]"#,
/// ).unwrap();
/// assert_eq!(rules[0].kind(), "compare");
/// assert_eq!(rules[1].attributes(), ["phone", "fax"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSpec {
    attributes: Vec<String>,
    kind: String,
    options: Options,
}

impl RuleSpec {
    /// Describe a validator of `kind` bound to one attribute or a list.
    #[must_use]
    pub fn new(attributes: impl Into<AttributeList>, kind: &str) -> Self {
        Self {
            attributes: attributes.into().0,
            kind: kind.to_owned(),
            options: Options::new(),
        }
    }

    /// Attach a named option, builder style.
    #[must_use]
    pub fn option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Bound attribute names, in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// The validator kind identifier.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Parse a list of rules from their JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error for malformed input, including a
    /// rule list missing its attribute selector or kind.
    pub fn parse_list(json: &str) -> Result<Vec<RuleSpec>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Serialize for RuleSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Canonical 3-element form; also the fingerprint serialization.
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element(&self.attributes)?;
        seq.serialize_element(&self.kind)?;
        seq.serialize_element(&self.options)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RuleSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecVisitor;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Selector {
            One(String),
            Many(Vec<String>),
        }

        impl<'de> Visitor<'de> for SpecVisitor {
            type Value = RuleSpec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a [attributes, kind, options?] rule list")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RuleSpec, A::Error> {
                let selector: Selector = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"a rule needs an attribute selector and a kind"))?;
                let kind: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &"a rule needs an attribute selector and a kind"))?;
                let options: Options = seq.next_element()?.unwrap_or_default();

                let attributes = match selector {
                    Selector::One(attr) => vec![attr],
                    Selector::Many(attrs) => attrs,
                };
                Ok(RuleSpec {
                    attributes,
                    kind,
                    options,
                })
            }
        }

        deserializer.deserialize_seq(SpecVisitor)
    }
}
