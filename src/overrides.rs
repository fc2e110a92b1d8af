//! Caller-supplied replacements for a flag's static default.
//!
//! An override is keyed by the logical field name (`"port"`, not the prefixed
//! flag name) and compared case-insensitively. The first matching entry wins.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::FlagError;

/// A replacement default for the field called `name`.
///
/// The value type must match the type the field is registered with, e.g. a
/// `u32` for [`Builder::uint`](crate::Builder::uint) or a `Vec<String>` for
/// [`Builder::string_slice`](crate::Builder::string_slice).
#[derive(Clone)]
pub struct Override {
    name: String,
    value: Arc<dyn Any + Send + Sync>,
}

impl Override {
    pub fn new<V: Any + Send + Sync>(name: &str, value: V) -> Self {
        Self {
            name: name.to_string(),
            value: Arc::new(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Override").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Find the first override for `name`.
///
/// A matching override holding another type is a programming error and is
/// reported as [`FlagError::OverrideType`].
pub fn lookup<T: Clone + 'static>(
    overrides: &[Override],
    name: &str,
) -> Result<Option<T>, FlagError> {
    let Some(found) = overrides.iter().find(|o| same_name(&o.name, name)) else {
        return Ok(None);
    };

    found
        .value
        .downcast_ref::<T>()
        .cloned()
        .map(Some)
        .ok_or_else(|| FlagError::OverrideType {
            name: found.name.clone(),
            expected: type_name::<T>(),
        })
}

fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Static default with overrides applied.
pub fn static_default<T: Clone + 'static>(
    overrides: &[Override],
    name: &str,
    default: T,
) -> Result<T, FlagError> {
    Ok(lookup(overrides, name)?.unwrap_or(default))
}
