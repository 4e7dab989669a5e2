mod compile;
mod evaluate;
mod synthesize;
mod types;
pub mod validators;

pub use compile::{CompiledRules, Compiler};
pub use synthesize::element_id;
pub use types::{
    AttributeList, CompareOp, Conditional, ConditionalBuilder, ConfigError, ErrorBag, ErrorScope,
    Options, Record, RuleSpec, SynthesisError, Value,
};
pub use validators::{Registry, Validate};
