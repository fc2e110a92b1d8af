use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlagError {
    #[error("Flag redefined: {name}")]
    Redefined { name: String },

    #[error("No such flag: {0}")]
    UnknownFlag(String),

    #[error("Invalid value \"{value}\" for flag --{flag}: {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },

    #[error("Override for '{name}' is not a {expected}")]
    OverrideType { name: String, expected: &'static str },

    #[error("Help requested")]
    HelpRequested,

    #[error(transparent)]
    Cli(#[from] clap::Error),
}
