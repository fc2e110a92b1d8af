//! Ordered collection flags.
//!
//! A collection starts out holding its resolved default (environment, override
//! or static). The first command-line occurrence clears it, and every
//! occurrence appends one element, so `-n a --namespace b` yields `[a, b]`
//! whatever the default was.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;

/// Element kind of a collection flag.
pub trait ListElement: Clone + 'static {
    /// Type column text and the kind named in help (`as a string slice`).
    const KIND: &'static str;

    fn parse_element(text: &str) -> Result<Self, String>;

    fn format_element(&self) -> String;
}

impl ListElement for String {
    const KIND: &'static str = "string slice";

    fn parse_element(text: &str) -> Result<Self, String> {
        Ok(text.to_string())
    }

    fn format_element(&self) -> String {
        self.clone()
    }
}

impl ListElement for f64 {
    const KIND: &'static str = "float64 slice";

    fn parse_element(text: &str) -> Result<Self, String> {
        text.parse()
            .map_err(|e: std::num::ParseFloatError| format!("parse `{text}`: {e}"))
    }

    fn format_element(&self) -> String {
        format!("{self:.6}")
    }
}

/// Split an environment value on `separator` and parse every element.
///
/// An empty value is an empty list, and an empty separator yields one element
/// per character. A single bad element rejects the whole value.
pub fn parse_env<T: ListElement>(text: &str, separator: &str) -> Result<Vec<T>, String> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    if separator.is_empty() {
        let mut buf = [0u8; 4];
        return text
            .chars()
            .map(|c| T::parse_element(c.encode_utf8(&mut buf)))
            .collect();
    }

    text.split(separator).map(T::parse_element).collect()
}

/// Render as `[a, b]`, or an empty string for an empty list.
pub fn render<T: ListElement>(values: &[T]) -> String {
    if values.is_empty() {
        return String::new();
    }

    let joined: Vec<String> = values.iter().map(ListElement::format_element).collect();
    format!("[{}]", joined.join(", "))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    Defaulted,
    Edited,
}

/// [`Value`] over a collection slot with reset-on-first-edit semantics.
pub struct ListValue<T> {
    slot: Rc<RefCell<Vec<T>>>,
    state: ListState,
}

impl<T: ListElement> ListValue<T> {
    pub fn new(slot: Rc<RefCell<Vec<T>>>) -> Self {
        Self {
            slot,
            state: ListState::Defaulted,
        }
    }

    pub fn is_edited(&self) -> bool {
        self.state == ListState::Edited
    }
}

impl<T: ListElement> Value for ListValue<T> {
    fn to_text(&self) -> String {
        render(&self.slot.borrow())
    }

    fn get(&self) -> Box<dyn Any> {
        Box::new(self.slot.borrow().clone())
    }

    fn set(&mut self, text: &str) -> Result<(), String> {
        if self.state == ListState::Defaulted {
            self.state = ListState::Edited;
            self.slot.borrow_mut().clear();
        }

        let element = T::parse_element(text)?;
        self.slot.borrow_mut().push(element);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        T::KIND
    }
}
