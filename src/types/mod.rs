mod conditional;
mod error;
mod record;
mod rule_spec;
mod value;

pub use conditional::{Conditional, ConditionalBuilder};
pub use error::{ConfigError, SynthesisError};
pub use record::{ErrorBag, ErrorScope, Record};
pub use rule_spec::{AttributeList, Options, RuleSpec};
pub use value::{CompareOp, Value};
