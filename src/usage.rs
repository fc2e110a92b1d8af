//! Aligned help table.
//!
//! A flag and its shorthand are two registry entries with the same help
//! text, so entries are grouped by a digest of that text and printed as one
//! row: the longer name is the flag, the shorter one its shorthand.
//!
//! ```text
//! Usage of my-cli:
//!   -n, --name     string    [db] Database name ${MY_CLI_NAME} (default "user")
//!   -p, --port     uint      [db] Database port ${MY_CLI_PORT} (default 5432)
//!       --timeout  duration  [db] Request timeout ${MY_CLI_TIMEOUT} (default 1s)
//! ```
//!
//! Install it with `fs.set_usage(usage::render)`.

use std::collections::HashMap;
use std::fmt;

use crate::flagset::{FlagSet, RegisteredFlag, format_default};
use crate::naming::content_digest;

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRow {
    pub name: String,
    pub shorthand: String,
    pub type_name: &'static str,
    pub help: String,
    pub default_text: String,
}

impl UsageRow {
    fn from_flag(flag: &RegisteredFlag) -> Self {
        Self {
            name: flag.name().to_string(),
            shorthand: String::new(),
            type_name: flag.type_name(),
            help: flag.help().to_string(),
            default_text: flag.default_text().to_string(),
        }
    }

    /// Fold another name with the same help into this row.
    fn add_name(&mut self, name: &str) {
        if name.chars().count() < self.name.chars().count() {
            self.shorthand = name.to_string();
        } else {
            self.shorthand = std::mem::replace(&mut self.name, name.to_string());
        }
    }
}

/// The help table of a flag set, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageTable {
    pub title: String,
    pub rows: Vec<UsageRow>,
}

impl UsageTable {
    pub fn from_flag_set(fs: &FlagSet) -> Self {
        let mut rows: Vec<UsageRow> = Vec::new();
        let mut by_help: HashMap<String, usize> = HashMap::new();

        for flag in fs.flags() {
            let digest = content_digest(flag.help());
            match by_help.get(&digest) {
                Some(&index) => rows[index].add_name(flag.name()),
                None => {
                    by_help.insert(digest, rows.len());
                    rows.push(UsageRow::from_flag(flag));
                }
            }
        }
        rows.sort_by(|a, b| a.name.cmp(&b.name));

        let title = if fs.name().is_empty() {
            "Usage:".to_string()
        } else {
            format!("Usage of {}:", fs.name())
        };

        Self { title, rows }
    }
}

impl fmt::Display for UsageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = |text: &str| text.chars().count();

        let mut shorthand_width = self
            .rows
            .iter()
            .map(|r| width(&r.shorthand))
            .max()
            .unwrap_or(0);
        let name_width = self.rows.iter().map(|r| width(&r.name)).max().unwrap_or(0);
        let type_width = self.rows.iter().map(|r| width(r.type_name)).max().unwrap_or(0);
        if shorthand_width > 0 {
            // room for "-" and ", "
            shorthand_width += 3;
        }

        writeln!(f, "{}", self.title)?;
        for row in &self.rows {
            let shorthand = if row.shorthand.is_empty() {
                String::new()
            } else {
                format!("-{}, ", row.shorthand)
            };
            write!(
                f,
                "  {shorthand:<shorthand_width$}--{:<name_width$}  {:<type_width$}  {}",
                row.name, row.type_name, row.help
            )?;
            if !row.default_text.is_empty() {
                f.write_str(&format_default(row.type_name, &row.default_text))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Usage renderer for [`FlagSet::set_usage`].
pub fn render(fs: &FlagSet) -> String {
    UsageTable::from_flag_set(fs).to_string()
}
