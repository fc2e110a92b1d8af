//! Typed values behind flags.
//!
//! [`FlagValue`] is the capability set of a scalar kind: parse from text,
//! render to text, a type name for help output. [`Value`] is the settable
//! contract the [`FlagSet`](crate::FlagSet) drives while parsing; scalars get
//! it through [`ScalarValue`], collections through
//! [`ListValue`](crate::list::ListValue).

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// A scalar kind that can be registered as a flag.
pub trait FlagValue: Clone + 'static {
    /// Shown in the type column of the usage table. Empty for bare flags.
    const TYPE_NAME: &'static str;

    /// Bare `--name` means `true`; a value must be attached with `=`.
    const IS_BOOL: bool = false;

    fn parse(text: &str) -> Result<Self, String>;

    fn format(&self) -> String;
}

/// Settable value bound to one or more registry entries.
pub trait Value {
    /// Textual rendering; the rendering at registration time is the default
    /// shown in help.
    fn to_text(&self) -> String;

    /// Current value, boxed.
    fn get(&self) -> Box<dyn Any>;

    /// Assign from one command-line occurrence.
    fn set(&mut self, text: &str) -> Result<(), String>;

    fn type_name(&self) -> &'static str;

    fn is_bool_flag(&self) -> bool {
        false
    }
}

/// Shared handle to a settable value. Aliases hold clones of the same `Rc`.
pub type SharedValue = Rc<RefCell<dyn Value>>;

/// [`Value`] over a scalar slot. Each assignment replaces the previous one.
pub struct ScalarValue<T> {
    slot: Rc<RefCell<T>>,
}

impl<T: FlagValue> ScalarValue<T> {
    pub fn new(slot: Rc<RefCell<T>>) -> Self {
        Self { slot }
    }
}

impl<T: FlagValue> Value for ScalarValue<T> {
    fn to_text(&self) -> String {
        self.slot.borrow().format()
    }

    fn get(&self) -> Box<dyn Any> {
        Box::new(self.slot.borrow().clone())
    }

    fn set(&mut self, text: &str) -> Result<(), String> {
        let value = T::parse(text)?;
        *self.slot.borrow_mut() = value;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn is_bool_flag(&self) -> bool {
        T::IS_BOOL
    }
}

impl FlagValue for String {
    const TYPE_NAME: &'static str = "string";

    fn parse(text: &str) -> Result<Self, String> {
        Ok(text.to_string())
    }

    fn format(&self) -> String {
        self.clone()
    }
}

macro_rules! integer_flag_value {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FlagValue for $ty {
                const TYPE_NAME: &'static str = $name;

                fn parse(text: &str) -> Result<Self, String> {
                    text.parse().map_err(|e: std::num::ParseIntError| e.to_string())
                }

                fn format(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_flag_value! {
    i32 => "int",
    i64 => "int",
    u32 => "uint",
    u64 => "uint",
}

impl FlagValue for f64 {
    const TYPE_NAME: &'static str = "float";

    fn parse(text: &str) -> Result<Self, String> {
        text.parse().map_err(|e: std::num::ParseFloatError| e.to_string())
    }

    fn format(&self) -> String {
        format_float(*self)
    }
}

/// Shortest round-trip digits, in exponent form (`1e+06`, `2.5e-07`) when the
/// decimal exponent is below -4 or at least 6.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return value.to_string();
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..6).contains(&exponent) {
        return value.to_string();
    }

    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

impl FlagValue for bool {
    const TYPE_NAME: &'static str = "";
    const IS_BOOL: bool = true;

    fn parse(text: &str) -> Result<Self, String> {
        match text {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(format!("invalid boolean value '{text}'")),
        }
    }

    fn format(&self) -> String {
        self.to_string()
    }
}
