use crate::compile::Compiler;
use crate::evaluate::{run_rules, RulePass};
use crate::types::{ConfigError, Record, RuleSpec, SynthesisError};

/// A conditional (if-then) validation rule.
///
/// Guard rules (the "when" list) are evaluated first, in isolation: their
/// violations decide whether the guard holds and are then discarded, never
/// appearing in the record's error state. Only when every guard rule passes
/// on every bound attribute do the consequence rules (the "then" list) run,
/// with their violations surfaced normally.
///
/// # Example
///
/// ```
/// use guardrail::{Compiler, Conditional, Record, RuleSpec};
///
/// // When type is 1, phone must start with 7 and name fits 255 chars.
/// let conditional = Conditional::builder()
///     .when(RuleSpec::new("type", "compare").option("value", 1_i64))
///     .then(RuleSpec::new("phone", "match").option("pattern", "^7"))
///     .then(RuleSpec::new("name", "length").option("max", 255_i64))
///     .build();
///
/// let compiler = Compiler::new();
/// let mut record = Record::new("Profile")
///     .set("type", 1_i64)
///     .set("phone", "79991234567")
///     .set("name", "ok");
/// conditional.validate(&mut record, &compiler).unwrap();
/// assert!(record.errors().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Conditional {
    when: Vec<RuleSpec>,
    then: Vec<RuleSpec>,
    dynamic_guard_value: bool,
    guard_override: Option<String>,
}

/// Builder for a [`Conditional`].
#[derive(Debug, Clone, Default)]
pub struct ConditionalBuilder {
    when: Vec<RuleSpec>,
    then: Vec<RuleSpec>,
    static_guard_values: bool,
    guard_override: Option<String>,
}

impl ConditionalBuilder {
    /// Append a guard rule.
    #[must_use]
    pub fn when(mut self, spec: RuleSpec) -> Self {
        self.when.push(spec);
        self
    }

    /// Append a consequence rule.
    #[must_use]
    pub fn then(mut self, spec: RuleSpec) -> Self {
        self.then.push(spec);
        self
    }

    /// Synthesize guard conditions over the record's values at synthesis
    /// time instead of live form-field lookups.
    #[must_use]
    pub fn static_guard_values(mut self) -> Self {
        self.static_guard_values = true;
        self
    }

    /// Use this expression as the synthesized guard verbatim, bypassing
    /// fragment extraction entirely.
    #[must_use]
    pub fn guard_expression(mut self, expression: &str) -> Self {
        self.guard_override = Some(expression.to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> Conditional {
        Conditional {
            when: self.when,
            then: self.then,
            dynamic_guard_value: !self.static_guard_values,
            guard_override: self.guard_override.filter(|e| !e.is_empty()),
        }
    }
}

impl Conditional {
    #[must_use]
    pub fn builder() -> ConditionalBuilder {
        ConditionalBuilder::default()
    }

    /// The guard rules, in evaluation order.
    #[must_use]
    pub fn when_rules(&self) -> &[RuleSpec] {
        &self.when
    }

    /// The consequence rules, in evaluation order.
    #[must_use]
    pub fn then_rules(&self) -> &[RuleSpec] {
        &self.then
    }

    /// Whether synthesized guard conditions read the live form value
    /// (default) or the synthesis-time snapshot.
    #[must_use]
    pub fn dynamic_guard_value(&self) -> bool {
        self.dynamic_guard_value
    }

    /// The guard expression override, if one was configured.
    #[must_use]
    pub fn guard_override(&self) -> Option<&str> {
        self.guard_override.as_deref()
    }

    /// Evaluate the conditional against a record.
    ///
    /// Guard violations never reach the record's error state; consequence
    /// violations are recorded normally. Pre-existing errors survive both
    /// outcomes untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a rule list cannot be compiled. Ordinary
    /// validation failures are data outcomes, not errors.
    pub fn validate(&self, record: &mut Record, compiler: &Compiler) -> Result<(), ConfigError> {
        let guard_ok = run_rules(compiler, record, &self.when, RulePass::Guard)?;
        if guard_ok {
            run_rules(compiler, record, &self.then, RulePass::Consequence)?;
        }
        Ok(())
    }

    /// Synthesize the client-side check for one attribute.
    ///
    /// Produces a fragment of the shape `if(GUARD){CONSEQUENCE}`. With no
    /// guard validators or no consequence validator bound to `attribute`,
    /// the corresponding part is empty; callers must tolerate the
    /// degenerate `if(){}` fragment.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] when a guard fragment cannot be obtained
    /// or does not have the conventional `if (cond) { ... }` shape, or when
    /// compilation fails. A synthesis failure does not affect server-side
    /// evaluation of the same rules.
    pub fn client_script(
        &self,
        record: &Record,
        attribute: &str,
        compiler: &Compiler,
    ) -> Result<String, SynthesisError> {
        crate::synthesize::client_script(self, record, attribute, compiler)
    }
}
