//! Environment-aware flag registration for Rust CLI apps. Describe a flag
//! once and get a consistent name, environment variable, help line and
//! default.
//!
//! ```ignore
//! let mut fs = FlagSet::new("my-cli");
//! fs.set_usage(usage::render);
//!
//! let port = Builder::new("port", "Database port")
//!     .shorthand("p")
//!     .doc_prefix("db")
//!     .uint(&mut fs, 5432, &[])?;
//!
//! fs.parse(std::env::args().skip(1))?;
//! println!("port = {}", port.get());
//! ```
//!
//! That registers `--port` and `-p` on the same storage, reads
//! `MY_CLI_PORT` for the default, and prints as
//!
//! ```text
//! Usage of my-cli:
//!   -p, --port  uint  [db] Database port ${MY_CLI_PORT} (default 5432)
//! ```
//!
//! # Precedence
//!
//! ```text
//! Static default        the value passed at registration
//!        ↑ replaced by
//! Override              Override::new("port", 6432u32)
//!        ↑ replaced by
//! Environment variable  MY_CLI_PORT=7000
//!        ↑ replaced by
//! Command line          --port 8000
//! ```
//!
//! The first three are resolved at registration time and become the flag's
//! default (the one shown in help). The command line is applied by
//! [`FlagSet::parse`].
//!
//! An environment variable that does not parse as the flag's type is
//! ignored, so a stray value never prevents startup. Collections are the
//! exception to element-level leniency: one bad element in a float list
//! rejects the whole environment value, which then falls through to the
//! override or static default.
//!
//! # Naming
//!
//! With flag set `my-cli`, prefix `replica` and field `name`:
//!
//! | What | Value |
//! |------|-------|
//! | flag | `--replicaName` |
//! | shorthand `n` | `-replicaN` |
//! | environment variable | `MY_CLI_REPLICA_NAME` |
//! | help group | `[replica]` |
//!
//! The flag set name is part of the environment variable, so the same field
//! under two commands reads two variables. [`Builder::env`] replaces the
//! derived name with an explicit one.
//!
//! # Overrides
//!
//! Overrides let one helper register the same fields under several prefixes
//! with different defaults. They are matched case-insensitively on the field
//! name (not the prefixed flag name), first match wins. An override whose
//! value type does not match the flag is a programming error and fails
//! registration with [`FlagError::OverrideType`].
//!
//! # Collections
//!
//! [`Builder::string_slice`] and [`Builder::float64_slice`] register list
//! flags. The environment value is split on [`Builder::env_separator`]. The
//! first occurrence on the command line discards the default, further
//! occurrences append: `-n a --namespace b` gives `[a, b]`.
//!
//! # Help
//!
//! [`usage::render`] prints one row per logical flag: entries that share the
//! same help text (a flag and its shorthand) are merged, rows are sorted by
//! name and every column is aligned.
//!
//! # Errors
//!
//! Registration and parsing return [`FlagError`]. Registration errors
//! (duplicate names, mistyped overrides) are mistakes in the calling program;
//! the usual response is to abort.

pub mod error;
pub mod list;
pub mod naming;
pub mod types;
pub mod usage;
pub mod value;

mod builder;
mod duration;
mod env;
mod flagset;
mod overrides;
mod register;
mod resolve;

#[cfg(test)]
mod fixtures;

pub use builder::Builder;
pub use env::{Environment, ProcessEnvironment};
pub use error::FlagError;
pub use flagset::{FlagSet, RegisteredFlag, UsageFn, default_usage};
pub use overrides::Override;
pub use register::{DEFAULT_SEPARATOR, FieldSpec};
pub use resolve::resolve_default;
pub use types::Flag;

/// Parse duration text such as `1h30m` or `300ms`.
pub use duration::parse as parse_duration;
/// Render a duration as `1m0s`.
pub use duration::format as format_duration;

/// Register a scalar flag from a [`FieldSpec`].
pub use register::scalar as register_scalar;
/// Register a collection flag from a [`FieldSpec`].
pub use register::list as register_list;
