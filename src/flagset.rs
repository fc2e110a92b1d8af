//! The flag registry.
//!
//! A [`FlagSet`] maps names to shared settable values, keeps the help text and
//! default rendering of every entry, and turns process arguments into
//! assignments on those values. Tokenizing is clap's job: [`FlagSet::parse`]
//! builds a `clap::Command` from the registered entries and replays every
//! occurrence, in command-line order, onto the bound values.
//!
//! Two names can share one value (a flag and its shorthand). They are two
//! entries holding clones of the same `Rc`, so an assignment through either
//! name is seen by both.

use std::collections::BTreeMap;
use std::io;
use std::rc::Rc;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use tracing::{debug, trace};

use crate::env::{Environment, ProcessEnvironment};
use crate::error::FlagError;
use crate::value::SharedValue;

const TRAILING_ID: &str = "envflags::args";

/// Renders the help text of a flag set.
pub type UsageFn = fn(&FlagSet) -> String;

/// One name in the registry.
pub struct RegisteredFlag {
    name: String,
    help: String,
    default_text: String,
    value: SharedValue,
}

impl RegisteredFlag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Rendering of the value at registration time.
    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    pub fn type_name(&self) -> &'static str {
        self.value.borrow().type_name()
    }

    /// Rendering of the current value.
    pub fn value_text(&self) -> String {
        self.value.borrow().to_text()
    }

    pub fn is_bool(&self) -> bool {
        self.value.borrow().is_bool_flag()
    }

    /// Whether `other` is bound to the same storage.
    pub fn shares_value_with(&self, other: &RegisteredFlag) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

pub struct FlagSet {
    name: String,
    flags: BTreeMap<String, RegisteredFlag>,
    env: Box<dyn Environment>,
    usage: UsageFn,
    args: Vec<String>,
    parsed: bool,
}

impl FlagSet {
    /// A flag set reading the process environment. `name` also prefixes the
    /// derived environment variable names (`my-cli` gives `MY_CLI_...`).
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flags: BTreeMap::new(),
            env: Box::new(ProcessEnvironment),
            usage: default_usage,
            args: Vec::new(),
            parsed: false,
        }
    }

    /// Read environment variables from `env` instead of the process.
    pub fn with_environment(mut self, env: impl Environment + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn environment(&self) -> &dyn Environment {
        self.env.as_ref()
    }

    /// Register `value` under `name`. Registering a name twice is an error.
    pub fn var(&mut self, name: &str, help: &str, value: SharedValue) -> Result<(), FlagError> {
        if self.flags.contains_key(name) {
            return Err(FlagError::Redefined {
                name: name.to_string(),
            });
        }

        let default_text = value.borrow().to_text();
        debug!(flag_set = %self.name, flag = name, default = %default_text, "flag registered");
        self.flags.insert(
            name.to_string(),
            RegisteredFlag {
                name: name.to_string(),
                help: help.to_string(),
                default_text,
                value,
            },
        );
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<&RegisteredFlag> {
        self.flags.get(name)
    }

    /// All entries, sorted by name.
    pub fn flags(&self) -> impl Iterator<Item = &RegisteredFlag> {
        self.flags.values()
    }

    /// Current value of `name`, if it exists and holds a `T`.
    pub fn get<T: 'static>(&self, name: &str) -> Option<T> {
        let flag = self.flags.get(name)?;
        let boxed = flag.value.borrow().get();
        boxed.downcast::<T>().ok().map(|value| *value)
    }

    /// Assign `text` to `name` as if it appeared on the command line.
    pub fn set(&mut self, name: &str, text: &str) -> Result<(), FlagError> {
        let flag = self
            .flags
            .get(name)
            .ok_or_else(|| FlagError::UnknownFlag(name.to_string()))?;

        flag.value
            .borrow_mut()
            .set(text)
            .map_err(|reason| FlagError::InvalidValue {
                flag: name.to_string(),
                value: text.to_string(),
                reason,
            })
    }

    /// Arguments left after the flags.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Replace the help renderer, e.g. with [`usage::render`](crate::usage::render).
    pub fn set_usage(&mut self, usage: UsageFn) {
        self.usage = usage;
    }

    pub fn usage(&self) -> String {
        (self.usage)(self)
    }

    pub fn write_usage(&self, out: &mut impl io::Write) -> io::Result<()> {
        out.write_all(self.usage().as_bytes())
    }

    /// Parse `args` (without the program name) into the bound values.
    ///
    /// Flags are accepted as `--name value`, `--name=value`, `-name value` or
    /// `-name=value`; boolean flags take no value unless attached with `=`.
    /// Parsing stops at the first argument that is not a flag, or after `--`.
    ///
    /// Returns [`FlagError::HelpRequested`] for `-h` or `-help` (with one or two
    /// dashes) unless a flag of that exact name is registered.
    pub fn parse<I, S>(&mut self, args: I) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parsed = true;

        let args = self.normalize(args.into_iter().map(Into::into).collect())?;
        let matches = self.command().try_get_matches_from(args)?;

        for (name, text) in self.occurrences(&matches) {
            trace!(flag = %name, value = %text, "applying command-line value");
            self.set(&name, &text)?;
        }

        self.args = matches
            .get_many::<String>(TRAILING_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        Ok(())
    }

    /// Every `(flag, value)` clap matched, in command-line order.
    fn occurrences(&self, matches: &ArgMatches) -> Vec<(String, String)> {
        let mut found: Vec<(usize, String, String)> = Vec::new();
        for name in self.flags.keys() {
            let (Some(indices), Some(values)) =
                (matches.indices_of(name), matches.get_many::<String>(name))
            else {
                continue;
            };
            found.extend(
                indices
                    .zip(values)
                    .map(|(index, value)| (index, name.clone(), value.clone())),
            );
        }

        found.sort_by_key(|(index, ..)| *index);
        found
            .into_iter()
            .map(|(_, name, value)| (name, value))
            .collect()
    }

    fn command(&self) -> Command {
        let mut command = Command::new(self.name.clone())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true);

        for flag in self.flags.values() {
            let arg = Arg::new(flag.name.clone())
                .long(flag.name.clone())
                .action(ArgAction::Append)
                .value_parser(value_parser!(String));
            let arg = if flag.is_bool() {
                arg.num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true")
            } else {
                arg.num_args(1).allow_hyphen_values(true)
            };
            command = command.arg(arg);
        }

        command.arg(
            Arg::new(TRAILING_ID)
                .num_args(0..)
                .trailing_var_arg(true)
                .action(ArgAction::Append)
                .value_parser(value_parser!(String)),
        )
    }

    /// Rewrite single-dash forms of registered names to `--name`, up to the
    /// first non-flag argument. Stops with `HelpRequested` at an unregistered
    /// help spelling.
    fn normalize(&self, args: Vec<String>) -> Result<Vec<String>, FlagError> {
        let mut out = Vec::with_capacity(args.len());
        let mut rest = args.into_iter();
        let mut value_pending = false;

        while let Some(arg) = rest.next() {
            if value_pending {
                value_pending = false;
                out.push(arg);
                continue;
            }
            if arg == "--" || arg == "-" || !arg.starts_with('-') {
                out.push(arg);
                break;
            }
            if self.is_help(&arg) {
                return Err(FlagError::HelpRequested);
            }
            match self.long_form(&arg) {
                Some((token, takes_value)) => {
                    value_pending = takes_value;
                    out.push(token);
                }
                None => out.push(arg),
            }
        }

        out.extend(rest);
        Ok(out)
    }

    fn is_help(&self, arg: &str) -> bool {
        let name = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'));
        matches!(name, Some(spelling @ ("h" | "help")) if !self.flags.contains_key(spelling))
    }

    /// `--name[=value]` for a registered flag, plus whether the next argument
    /// is its value.
    fn long_form(&self, arg: &str) -> Option<(String, bool)> {
        let body = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'))?;
        if body.is_empty() || body.starts_with('-') {
            return None;
        }

        let (name, attached) = match body.split_once('=') {
            Some((name, _)) => (name, true),
            None => (body, false),
        };

        let flag = self.flags.get(name)?;
        Some((format!("--{body}"), !attached && !flag.is_bool()))
    }
}

impl std::fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("flags", &self.flags.keys().collect::<Vec<_>>())
            .field("args", &self.args)
            .field("parsed", &self.parsed)
            .finish_non_exhaustive()
    }
}

/// Plain listing: each flag on its own line, help indented below it.
pub fn default_usage(fs: &FlagSet) -> String {
    let mut out = if fs.name().is_empty() {
        "Usage:\n".to_string()
    } else {
        format!("Usage of {}:\n", fs.name())
    };

    for flag in fs.flags() {
        out.push_str("  -");
        out.push_str(flag.name());
        if !flag.type_name().is_empty() {
            out.push(' ');
            out.push_str(flag.type_name());
        }
        out.push_str("\n    \t");
        out.push_str(flag.help());
        if !flag.default_text().is_empty() {
            out.push_str(&format_default(flag.type_name(), flag.default_text()));
        }
        out.push('\n');
    }
    out
}

/// ` (default ...)`, quoted for text values.
pub(crate) fn format_default(type_name: &str, default_text: &str) -> String {
    if type_name == "string" {
        format!(" (default {default_text:?})")
    } else {
        format!(" (default {default_text})")
    }
}
