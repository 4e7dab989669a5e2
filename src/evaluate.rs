use crate::compile::Compiler;
use crate::types::{ConfigError, Record, RuleSpec};

/// Which half of the conditional a pass runs, and therefore what happens to
/// the violations it raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RulePass {
    /// Violations decide the pass outcome and are then discarded.
    Guard,
    /// Violations are kept and surfaced on the record.
    Consequence,
}

/// Run a rule list against the record inside an error scope.
///
/// Validators run in spec order. In a guard pass, the first bound attribute
/// with a violation short-circuits the pass: the scope is discarded (the
/// record's error state is exactly what it was before the call) and the
/// result is `false`. Otherwise the scope commits (new violations stay and
/// the pre-pass errors are unioned back in) and the result is `true`. The
/// guard is therefore conjunctive across all validators and all their
/// attributes.
pub(crate) fn run_rules(
    compiler: &Compiler,
    record: &mut Record,
    specs: &[RuleSpec],
    pass: RulePass,
) -> Result<bool, ConfigError> {
    let validators = compiler.compile(record, specs)?;

    let mut scope = record.isolate_errors();
    for validator in validators.iter() {
        validator.validate(scope.record());

        if pass == RulePass::Guard {
            let violated = validator
                .attributes()
                .iter()
                .any(|attribute| scope.record().has_errors(attribute));
            if violated {
                scope.discard();
                return Ok(false);
            }
        }
    }
    scope.commit();
    Ok(true)
}
