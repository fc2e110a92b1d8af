#[cfg(test)]
pub mod test {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use crate::flagset::FlagSet;
    use crate::list::{ListElement, ListValue};
    use crate::value::{FlagValue, ScalarValue, SharedValue};

    /// Synthetic environment from literal pairs.
    pub fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// A flag set that reads `pairs` instead of the process environment.
    pub fn flag_set(name: &str, pairs: &[(&str, &str)]) -> FlagSet {
        FlagSet::new(name).with_environment(env_of(pairs))
    }

    pub fn shared_scalar<T: FlagValue>(initial: T) -> (Rc<RefCell<T>>, SharedValue) {
        let slot = Rc::new(RefCell::new(initial));
        let value: SharedValue = Rc::new(RefCell::new(ScalarValue::new(Rc::clone(&slot))));
        (slot, value)
    }

    pub fn shared_list<T: ListElement>(initial: Vec<T>) -> (Rc<RefCell<Vec<T>>>, SharedValue) {
        let slot = Rc::new(RefCell::new(initial));
        let value: SharedValue = Rc::new(RefCell::new(ListValue::new(Rc::clone(&slot))));
        (slot, value)
    }

    pub fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn flag_set_uses_synthetic_environment() {
        let fs = flag_set("app", &[("APP_HOST", "db")]);
        assert_eq!(fs.environment().var("APP_HOST").as_deref(), Some("db"));
        assert_eq!(fs.environment().var("PATH"), None);
    }
}
