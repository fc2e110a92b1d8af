use std::collections::HashMap;

/// Read-only lookup of environment variables by exact name.
///
/// The [`FlagSet`](crate::FlagSet) reads through this trait so tests can pass
/// synthetic data instead of touching the process environment.
pub trait Environment {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment. Values that are not valid Unicode are
/// treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key).and_then(|value| value.into_string().ok())
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
