//! Default resolution for a single flag.
//!
//! The value a flag holds before the command line is parsed comes from, in
//! order:
//!
//! 1. The environment variable, if set and parseable as the flag's type
//! 2. The first override whose name matches the field (case-insensitive)
//! 3. The static default given at registration
//!
//! An environment value that does not parse is ignored rather than reported:
//! a stray variable must not stop the program from starting. Overrides are
//! checked first regardless, so an override of the wrong type is always
//! reported even when the environment wins.

use tracing::debug;

use crate::env::Environment;
use crate::error::FlagError;
use crate::overrides::{self, Override};

pub fn resolve_default<T, P>(
    env: &dyn Environment,
    field: &str,
    env_name: &str,
    default: T,
    overrides: &[Override],
    parse: P,
) -> Result<T, FlagError>
where
    T: Clone + 'static,
    P: Fn(&str) -> Result<T, String>,
{
    let fallback = match overrides::lookup(overrides, field)? {
        Some(value) => {
            debug!(field, "default replaced by override");
            value
        }
        None => default,
    };

    let Some(raw) = env.var(env_name) else {
        return Ok(fallback);
    };

    match parse(&raw) {
        Ok(value) => Ok(value),
        Err(reason) => {
            debug!(env = env_name, value = %raw, %reason, "ignoring unparseable environment value");
            Ok(fallback)
        }
    }
}
