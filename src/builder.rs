use std::time::Duration;

use crate::error::FlagError;
use crate::flagset::FlagSet;
use crate::list::ListElement;
use crate::overrides::Override;
use crate::register::{self, FieldSpec};
use crate::types::Flag;
use crate::value::FlagValue;

/// Fluent, immutable description of one logical flag.
///
/// Every setter returns a modified copy, so a partially configured builder can
/// be reused as a template:
///
/// ```ignore
/// let url = Builder::new("url", "Database url").prefix(prefix).doc_prefix("db");
/// let main = url.string(&mut fs, "", &[])?;
/// ```
///
/// The registration methods resolve the default (environment, then override,
/// then the given value), register the flag and its shorthand on `fs`, and
/// return the storage handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builder {
    spec: FieldSpec,
}

impl Builder {
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            spec: FieldSpec::new(name, label),
        }
    }

    /// Short alias, prefixed like the name (`replicaN` for prefix `replica`).
    pub fn shorthand(mut self, shorthand: &str) -> Self {
        self.spec.shorthand = shorthand.to_string();
        self
    }

    /// Prepended to the flag and environment variable names, and shown as the
    /// help group.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.spec.prefix = prefix.to_string();
        self
    }

    /// Help group used when there is no prefix.
    pub fn doc_prefix(mut self, doc_prefix: &str) -> Self {
        self.spec.doc_prefix = doc_prefix.to_string();
        self
    }

    /// Read this exact environment variable instead of the derived one.
    pub fn env(mut self, env: &str) -> Self {
        self.spec.env = env.to_string();
        self
    }

    /// Separator for collection values read from the environment (default `,`).
    pub fn env_separator(mut self, separator: &str) -> Self {
        self.spec.env_separator = separator.to_string();
        self
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    pub fn scalar<T: FlagValue>(
        &self,
        fs: &mut FlagSet,
        value: T,
        overrides: &[Override],
    ) -> Result<Flag<T>, FlagError> {
        register::scalar(fs, &self.spec, value, overrides)
    }

    pub fn list<T: ListElement>(
        &self,
        fs: &mut FlagSet,
        values: Vec<T>,
        overrides: &[Override],
    ) -> Result<Flag<Vec<T>>, FlagError> {
        register::list(fs, &self.spec, values, overrides)
    }

    pub fn string(
        &self,
        fs: &mut FlagSet,
        value: &str,
        overrides: &[Override],
    ) -> Result<Flag<String>, FlagError> {
        self.scalar(fs, value.to_string(), overrides)
    }

    pub fn int(
        &self,
        fs: &mut FlagSet,
        value: i32,
        overrides: &[Override],
    ) -> Result<Flag<i32>, FlagError> {
        self.scalar(fs, value, overrides)
    }

    pub fn int64(
        &self,
        fs: &mut FlagSet,
        value: i64,
        overrides: &[Override],
    ) -> Result<Flag<i64>, FlagError> {
        self.scalar(fs, value, overrides)
    }

    pub fn uint(
        &self,
        fs: &mut FlagSet,
        value: u32,
        overrides: &[Override],
    ) -> Result<Flag<u32>, FlagError> {
        self.scalar(fs, value, overrides)
    }

    pub fn uint64(
        &self,
        fs: &mut FlagSet,
        value: u64,
        overrides: &[Override],
    ) -> Result<Flag<u64>, FlagError> {
        self.scalar(fs, value, overrides)
    }

    pub fn float64(
        &self,
        fs: &mut FlagSet,
        value: f64,
        overrides: &[Override],
    ) -> Result<Flag<f64>, FlagError> {
        self.scalar(fs, value, overrides)
    }

    pub fn bool(
        &self,
        fs: &mut FlagSet,
        value: bool,
        overrides: &[Override],
    ) -> Result<Flag<bool>, FlagError> {
        self.scalar(fs, value, overrides)
    }

    pub fn duration(
        &self,
        fs: &mut FlagSet,
        value: Duration,
        overrides: &[Override],
    ) -> Result<Flag<Duration>, FlagError> {
        self.scalar(fs, value, overrides)
    }

    pub fn string_slice(
        &self,
        fs: &mut FlagSet,
        values: &[&str],
        overrides: &[Override],
    ) -> Result<Flag<Vec<String>>, FlagError> {
        let values = values.iter().map(|v| v.to_string()).collect();
        self.list(fs, values, overrides)
    }

    pub fn float64_slice(
        &self,
        fs: &mut FlagSet,
        values: &[f64],
        overrides: &[Override],
    ) -> Result<Flag<Vec<f64>>, FlagError> {
        self.list(fs, values.to_vec(), overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{flag_set, strings};

    #[test]
    fn new_sets_defaults() {
        let builder = Builder::new("tags", "Tags of ressources");
        assert_eq!(builder.spec().name, "Tags");
        assert_eq!(builder.spec().label, "Tags of ressources");
        assert_eq!(builder.spec().env_separator, ",");
        assert!(builder.spec().prefix.is_empty());
        assert!(builder.spec().shorthand.is_empty());
    }

    #[test]
    fn setters_return_modified_copies() {
        let base = Builder::new("url", "Database url").doc_prefix("db");
        let replica = base.clone().prefix("replica").shorthand("u");

        assert!(base.spec().prefix.is_empty());
        assert!(base.spec().shorthand.is_empty());
        assert_eq!(replica.spec().prefix, "replica");
        assert_eq!(replica.spec().doc_prefix, "db");
        assert_eq!(replica.spec().shorthand, "u");
    }

    #[test]
    fn string_without_environment() {
        let mut fs = flag_set("my-cli", &[]);
        let url = Builder::new("url", "Database url")
            .prefix("db")
            .string(&mut fs, "", &[])
            .unwrap();
        fs.parse(Vec::<String>::new()).unwrap();

        assert_eq!(url.get(), "");
        assert!(fs.lookup("dbUrl").unwrap().help().contains("[db] Database url"));
    }

    #[test]
    fn uint_from_explicit_env() {
        let mut fs = flag_set("my-cli", &[("X_PORT", "9999")]);
        let port = Builder::new("port", "Database port")
            .env("X_PORT")
            .uint(&mut fs, 5432, &[])
            .unwrap();
        fs.parse(Vec::<String>::new()).unwrap();

        assert_eq!(port.get(), 9999);
    }

    #[test]
    fn every_typed_method_registers() {
        let mut fs = flag_set("app", &[]);
        Builder::new("a", "A").string(&mut fs, "x", &[]).unwrap();
        Builder::new("b", "B").int(&mut fs, -1, &[]).unwrap();
        Builder::new("c", "C").int64(&mut fs, -2, &[]).unwrap();
        Builder::new("d", "D").uint(&mut fs, 3, &[]).unwrap();
        Builder::new("e", "E").uint64(&mut fs, 4, &[]).unwrap();
        Builder::new("f", "F").float64(&mut fs, 0.5, &[]).unwrap();
        Builder::new("g", "G").bool(&mut fs, true, &[]).unwrap();
        Builder::new("h", "H")
            .duration(&mut fs, Duration::from_secs(60), &[])
            .unwrap();
        Builder::new("i", "I").string_slice(&mut fs, &["x"], &[]).unwrap();
        Builder::new("j", "J").float64_slice(&mut fs, &[1.0], &[]).unwrap();

        let types: Vec<(&str, &str)> = fs.flags().map(|f| (f.name(), f.type_name())).collect();
        assert_eq!(
            types,
            [
                ("a", "string"),
                ("b", "int"),
                ("c", "int"),
                ("d", "uint"),
                ("e", "uint"),
                ("f", "float"),
                ("g", ""),
                ("h", "duration"),
                ("i", "string slice"),
                ("j", "float64 slice"),
            ]
        );
        assert_eq!(fs.lookup("h").unwrap().default_text(), "1m0s");
    }

    #[test]
    fn shorthand_and_arguments_accumulate() {
        let mut fs = flag_set("StringSlice", &[]);
        let namespace = Builder::new("namespace", "Namespace")
            .shorthand("n")
            .string_slice(&mut fs, &["default"], &[])
            .unwrap();
        fs.parse(["-n", "system", "--namespace", "default"]).unwrap();

        assert_eq!(namespace.get(), strings(&["system", "default"]));
    }

    #[test]
    fn same_builder_under_two_prefixes() {
        let mut fs = flag_set("my-cli", &[("MY_CLI_REPLICA_PORT", "6432")]);
        let port = Builder::new("port", "Database port").shorthand("p").doc_prefix("db");
        let overrides = [Override::new("Port", 7000u32)];

        let main = port.uint(&mut fs, 5432, &[]).unwrap();
        let replica = port.clone().prefix("replica").uint(&mut fs, 5432, &overrides).unwrap();

        assert_eq!(main.get(), 5432);
        assert_eq!(replica.get(), 6432);
        assert!(fs.lookup("replicaP").is_some());
        assert!(fs.lookup("p").is_some());
    }
}
