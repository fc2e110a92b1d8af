//! Flag registration: naming, help text, default resolution and binding.
//!
//! For a field `name` with prefix `prefix` on flag set `fs`:
//!
//! - flag name: `prefix` + `Name`, first letter lower-cased (`curlHeaders`)
//! - shorthand: `prefix` + `Shorthand`, first letter lower-cased (`replicaN`)
//! - environment variable: the explicit `env` if given, otherwise
//!   `FS_NAME_PREFIX_NAME` in upper snake case, so equal field names under
//!   different flag sets do not collide
//! - help: `[group] label ${ENV}` where the group is the prefix, or the doc
//!   prefix when there is no prefix, and is omitted when both are empty

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::FlagError;
use crate::flagset::FlagSet;
use crate::list::{self, ListElement, ListValue};
use crate::naming::{first_lower_case, first_upper_case, to_upper_snake_case};
use crate::overrides::Override;
use crate::resolve::resolve_default;
use crate::types::Flag;
use crate::value::{FlagValue, ScalarValue, SharedValue};

pub const DEFAULT_SEPARATOR: &str = ",";

/// The naming inputs of one flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub prefix: String,
    pub doc_prefix: String,
    pub name: String,
    pub shorthand: String,
    pub label: String,
    pub env: String,
    pub env_separator: String,
}

impl FieldSpec {
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            prefix: String::new(),
            doc_prefix: String::new(),
            name: first_upper_case(name),
            shorthand: String::new(),
            label: label.to_string(),
            env: String::new(),
            env_separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Prefix and field name joined: `ContextTest`.
    fn qualified_name(&self) -> String {
        first_upper_case(&self.prefix) + &first_upper_case(&self.name)
    }

    /// Name the flag is registered under.
    pub fn flag_name(&self) -> String {
        first_lower_case(&self.qualified_name())
    }

    /// Name of the shorthand entry, if there is one.
    pub fn shorthand_name(&self) -> Option<String> {
        if self.shorthand.is_empty() {
            return None;
        }
        Some(first_lower_case(
            &(self.prefix.clone() + &first_upper_case(&self.shorthand)),
        ))
    }

    /// Environment variable read for the default, within flag set `set_name`.
    pub fn env_name(&self, set_name: &str) -> String {
        if !self.env.is_empty() {
            return self.env.clone();
        }
        to_upper_snake_case(&(first_upper_case(set_name) + &self.qualified_name()))
    }

    /// `[group] label ${ENV}`.
    pub fn help(&self, env_name: &str) -> String {
        let group = if self.prefix.is_empty() {
            &self.doc_prefix
        } else {
            &self.prefix
        };

        if group.is_empty() {
            format!("{} ${{{env_name}}}", self.label)
        } else {
            format!("[{group}] {} ${{{env_name}}}", self.label)
        }
    }
}

/// Register a scalar flag and return its storage handle.
pub fn scalar<T: FlagValue>(
    fs: &mut FlagSet,
    spec: &FieldSpec,
    default: T,
    overrides: &[Override],
) -> Result<Flag<T>, FlagError> {
    let env_name = spec.env_name(fs.name());
    let initial = resolve_default(
        fs.environment(),
        &spec.name,
        &env_name,
        default,
        overrides,
        T::parse,
    )?;

    let slot = Rc::new(RefCell::new(initial));
    let value: SharedValue = Rc::new(RefCell::new(ScalarValue::new(Rc::clone(&slot))));
    bind(fs, spec, &spec.help(&env_name), value)?;
    Ok(Flag::new(slot))
}

/// Register a collection flag and return its storage handle.
///
/// The environment value is split on the field's separator; if any element
/// fails to parse the whole environment value is ignored.
pub fn list<T: ListElement>(
    fs: &mut FlagSet,
    spec: &FieldSpec,
    default: Vec<T>,
    overrides: &[Override],
) -> Result<Flag<Vec<T>>, FlagError> {
    let env_name = spec.env_name(fs.name());
    let separator = spec.env_separator.as_str();
    let initial = resolve_default(
        fs.environment(),
        &spec.name,
        &env_name,
        default,
        overrides,
        |text| list::parse_env(text, separator),
    )?;

    let help = format!(
        "{}, as a {}, environment variable separated by {:?}",
        spec.help(&env_name),
        T::KIND,
        spec.env_separator
    );

    let slot = Rc::new(RefCell::new(initial));
    let value: SharedValue = Rc::new(RefCell::new(ListValue::new(Rc::clone(&slot))));
    bind(fs, spec, &help, value)?;
    Ok(Flag::new(slot))
}

/// Register the shorthand (if any) and the flag name on one shared value.
///
/// Both names are checked first, so a failed call leaves `fs` untouched.
fn bind(
    fs: &mut FlagSet,
    spec: &FieldSpec,
    help: &str,
    value: SharedValue,
) -> Result<(), FlagError> {
    let flag_name = spec.flag_name();
    let shorthand = spec.shorthand_name();

    if let Some(shorthand) = &shorthand {
        if fs.contains(shorthand) || *shorthand == flag_name {
            return Err(FlagError::Redefined {
                name: shorthand.clone(),
            });
        }
    }
    if fs.contains(&flag_name) {
        return Err(FlagError::Redefined { name: flag_name });
    }

    if let Some(shorthand) = &shorthand {
        fs.var(shorthand, help, Rc::clone(&value))?;
    }
    fs.var(&flag_name, help, value)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::fixtures::test::{flag_set, strings};

    fn spec(prefix: &str, doc_prefix: &str, name: &str, label: &str) -> FieldSpec {
        FieldSpec {
            prefix: prefix.into(),
            doc_prefix: doc_prefix.into(),
            ..FieldSpec::new(name, label)
        }
    }

    #[test]
    fn names_without_prefix() {
        let spec = spec("", "cli", "test", "Test flag");
        assert_eq!(spec.flag_name(), "test");
        assert_eq!(spec.env_name("String"), "STRING_TEST");
        assert_eq!(spec.help("STRING_TEST"), "[cli] Test flag ${STRING_TEST}");
    }

    #[test]
    fn names_with_prefix() {
        let spec = spec("context", "cli", "test", "Test flag");
        assert_eq!(spec.flag_name(), "contextTest");
        assert_eq!(spec.env_name("String"), "STRING_CONTEXT_TEST");
        assert_eq!(
            spec.help("STRING_CONTEXT_TEST"),
            "[context] Test flag ${STRING_CONTEXT_TEST}"
        );
    }

    #[test]
    fn camel_case_field_in_env_name() {
        let spec = spec("", "cli", "invalidValue", "Test flag");
        assert_eq!(spec.flag_name(), "invalidValue");
        assert_eq!(spec.env_name("Int"), "INT_INVALID_VALUE");
    }

    #[test]
    fn hyphenated_set_name_in_env_name() {
        let spec = spec("replica", "db", "name", "Database name");
        assert_eq!(spec.env_name("my-cli"), "MY_CLI_REPLICA_NAME");
    }

    #[test]
    fn empty_set_name_in_env_name() {
        let spec = spec("", "", "port", "Port");
        assert_eq!(spec.env_name(""), "PORT");
    }

    #[test]
    fn explicit_env_is_verbatim() {
        let spec = FieldSpec {
            env: "MATCHES".into(),
            ..FieldSpec::new("match", "Match")
        };
        assert_eq!(spec.env_name("StringSlice"), "MATCHES");
    }

    #[test]
    fn help_without_any_group() {
        let spec = FieldSpec::new("tags", "Tags of ressources");
        assert_eq!(spec.help("TAGS"), "Tags of ressources ${TAGS}");
    }

    #[test]
    fn shorthand_names() {
        let mut spec = spec("replica", "db", "name", "Database name");
        assert_eq!(spec.shorthand_name(), None);
        spec.shorthand = "n".into();
        assert_eq!(spec.shorthand_name().as_deref(), Some("replicaN"));
        spec.prefix.clear();
        assert_eq!(spec.shorthand_name().as_deref(), Some("n"));
    }

    #[test]
    fn scalar_from_environment() {
        let mut fs = flag_set("Int", &[("INT_VALUE", "6000")]);
        let flag = scalar(&mut fs, &spec("", "cli", "value", "Test flag"), 8000i32, &[]).unwrap();
        assert_eq!(flag.get(), 6000);
        assert_eq!(fs.lookup("value").unwrap().default_text(), "6000");
    }

    #[test]
    fn scalar_invalid_environment_keeps_default() {
        let mut fs = flag_set("Uint", &[("UINT_INVALID_VALUE", "-6000")]);
        let flag = scalar(
            &mut fs,
            &spec("", "cli", "invalidValue", "Test flag"),
            8000u32,
            &[],
        )
        .unwrap();
        assert_eq!(flag.get(), 8000);
    }

    #[test]
    fn scalar_override() {
        let mut fs = flag_set("String", &[]);
        let flag = scalar(
            &mut fs,
            &spec("", "cli", "overriden", "Test override"),
            "default".to_string(),
            &[Override::new("overriden", "override".to_string())],
        )
        .unwrap();
        assert_eq!(flag.get(), "override");
    }

    #[test]
    fn scalar_wrong_override_type() {
        let mut fs = flag_set("String", &[]);
        let result = scalar(
            &mut fs,
            &spec("", "cli", "port", "Port"),
            1u32,
            &[Override::new("port", 2i64)],
        );
        assert!(matches!(result, Err(FlagError::OverrideType { .. })));
        assert!(fs.lookup("port").is_none());
    }

    #[test]
    fn scalar_duration_from_environment() {
        let mut fs = flag_set("Duration", &[("DURATION_VALUE", "1s")]);
        let flag = scalar(
            &mut fs,
            &spec("", "cli", "value", "Test flag"),
            Duration::from_secs(60),
            &[],
        )
        .unwrap();
        assert_eq!(flag.get(), Duration::from_secs(1));
        assert_eq!(fs.lookup("value").unwrap().default_text(), "1s");
    }

    #[test]
    fn scalar_command_line_beats_environment() {
        let mut fs = flag_set("Float64", &[("FLOAT64_VALUE", "34.56")]);
        let flag = scalar(&mut fs, &spec("", "cli", "value", "Test flag"), 12.34, &[]).unwrap();
        fs.parse(["--value", "56.78"]).unwrap();
        assert_eq!(flag.get(), 56.78);
    }

    #[test]
    fn shorthand_is_bound_to_same_storage() {
        let mut fs = flag_set("app", &[]);
        let spec = FieldSpec {
            shorthand: "p".into(),
            ..FieldSpec::new("port", "Port")
        };
        let flag = scalar(&mut fs, &spec, 1u32, &[]).unwrap();
        fs.parse(["-p", "2"]).unwrap();
        assert_eq!(flag.get(), 2);
        assert_eq!(fs.get::<u32>("port"), Some(2));
    }

    #[test]
    fn duplicate_registration_surfaces() {
        let mut fs = flag_set("app", &[]);
        let spec = FieldSpec::new("port", "Port");
        scalar(&mut fs, &spec, 1u32, &[]).unwrap();
        let err = scalar(&mut fs, &spec, 1u32, &[]).unwrap_err();
        assert!(matches!(err, FlagError::Redefined { .. }));
    }

    #[test]
    fn taken_flag_name_leaves_shorthand_unregistered() {
        let mut fs = flag_set("app", &[]);
        scalar(&mut fs, &FieldSpec::new("port", "Port"), 1u32, &[]).unwrap();

        let spec = FieldSpec {
            shorthand: "p".into(),
            ..FieldSpec::new("port", "Port two")
        };
        let err = scalar(&mut fs, &spec, 2u32, &[]).unwrap_err();

        assert!(matches!(err, FlagError::Redefined { ref name } if name == "port"));
        assert!(fs.lookup("p").is_none());
        assert_eq!(fs.flags().count(), 1);
        assert!(!crate::usage::render(&fs).contains("Port two"));
    }

    #[test]
    fn taken_shorthand_leaves_flag_unregistered() {
        let mut fs = flag_set("app", &[]);
        scalar(&mut fs, &FieldSpec::new("p", "Profile"), String::new(), &[]).unwrap();

        let spec = FieldSpec {
            shorthand: "p".into(),
            ..FieldSpec::new("port", "Port")
        };
        let err = scalar(&mut fs, &spec, 1u32, &[]).unwrap_err();

        assert!(matches!(err, FlagError::Redefined { ref name } if name == "p"));
        assert!(fs.lookup("port").is_none());
    }

    #[test]
    fn shorthand_equal_to_flag_name_is_rejected() {
        let mut fs = flag_set("app", &[]);
        let spec = FieldSpec {
            shorthand: "port".into(),
            ..FieldSpec::new("port", "Port")
        };
        let err = scalar(&mut fs, &spec, 1u32, &[]).unwrap_err();

        assert!(matches!(err, FlagError::Redefined { .. }));
        assert_eq!(fs.flags().count(), 0);
    }

    #[test]
    fn list_help_mentions_kind_and_separator() {
        let mut fs = flag_set("Values", &[]);
        let spec = FieldSpec {
            env_separator: "|".into(),
            ..spec("", "metadata", "labels", "Labels")
        };
        list::<String>(&mut fs, &spec, Vec::new(), &[]).unwrap();
        assert_eq!(
            fs.lookup("labels").unwrap().help(),
            "[metadata] Labels ${VALUES_LABELS}, as a string slice, environment variable separated by \"|\""
        );
    }

    #[test]
    fn list_from_environment_split() {
        let mut fs = flag_set("Foo", &[("FOO_BAR", "1,2,3")]);
        let spec = FieldSpec::new("bar", "Bar");
        let flag = list(&mut fs, &spec, Vec::<String>::new(), &[]).unwrap();
        assert_eq!(flag.get(), strings(&["1", "2", "3"]));
    }

    #[test]
    fn list_from_environment_other_separator() {
        let mut fs = flag_set("Foo", &[("FOO_BAR", "1,2,3")]);
        let spec = FieldSpec {
            env_separator: "|".into(),
            ..FieldSpec::new("bar", "Bar")
        };
        let flag = list(&mut fs, &spec, Vec::<String>::new(), &[]).unwrap();
        assert_eq!(flag.get(), strings(&["1,2,3"]));
    }

    #[test]
    fn float_list_bad_environment_falls_through() {
        let mut fs = flag_set("Foo", &[("FOO_RATIOS", "0.5,half")]);
        let overrides = [Override::new("ratios", vec![0.25])];
        let spec = FieldSpec::new("ratios", "Ratios");
        let flag = list(&mut fs, &spec, vec![1.0], &overrides).unwrap();
        assert_eq!(flag.get(), vec![0.25]);
        assert_eq!(fs.lookup("ratios").unwrap().default_text(), "[0.250000]");
    }

    #[test]
    fn float_list_good_environment() {
        let mut fs = flag_set("Foo", &[("FOO_RATIOS", "0.5;2")]);
        let spec = FieldSpec {
            env_separator: ";".into(),
            ..FieldSpec::new("ratios", "Ratios")
        };
        let flag = list(&mut fs, &spec, vec![1.0], &[]).unwrap();
        assert_eq!(flag.get(), vec![0.5, 2.0]);
    }

    #[test]
    fn list_command_line_replaces_default() {
        let mut fs = flag_set("app", &[]);
        let flag = list(
            &mut fs,
            &FieldSpec::new("tags", "Tags"),
            strings(&["a", "b"]),
            &[],
        )
        .unwrap();
        fs.parse(["--tags", "x", "--tags", "y"]).unwrap();
        assert_eq!(flag.get(), strings(&["x", "y"]));
    }
}
