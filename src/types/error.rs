use thiserror::Error;

/// A malformed rule configuration. These are programming errors: they are
/// surfaced to the caller immediately and retrying cannot fix them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("'{record}' has an invalid validation rule: a rule must name the attributes to validate and the validator kind")]
    IncompleteRule { record: String },

    #[error("unknown validator kind '{kind}'")]
    UnknownKind { kind: String },

    #[error("validator '{kind}' is missing required option '{option}'")]
    MissingOption {
        kind: &'static str,
        option: &'static str,
    },

    #[error("invalid value for option '{option}' of validator '{kind}': {reason}")]
    InvalidOption {
        kind: &'static str,
        option: &'static str,
        reason: String,
    },

    #[error("failed to fingerprint rule set: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// A failure while synthesizing the client-side check for one attribute.
///
/// Fatal to that synthesis call only; server-side evaluation of the same
/// rules is unaffected.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("cannot extract a client condition for '{attribute}': expected a fragment of the form `if (cond) {{ ... }}`")]
    UnrecognizedFragment { attribute: String },

    #[error("validator '{kind}' produced no client check for guard attribute '{attribute}'")]
    MissingClientCheck { kind: String, attribute: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
