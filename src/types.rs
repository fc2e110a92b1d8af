use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle to the storage a flag is bound to.
///
/// The [`FlagSet`](crate::FlagSet) writes into the same slot while parsing, so
/// read the handle after [`parse`](crate::FlagSet::parse) to get the final
/// value: command line, then environment, then override, then static default.
pub struct Flag<T> {
    slot: Rc<RefCell<T>>,
}

impl<T> Flag<T> {
    pub(crate) fn new(slot: Rc<RefCell<T>>) -> Self {
        Self { slot }
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.slot.borrow()
    }
}

impl<T: Clone> Flag<T> {
    pub fn get(&self) -> T {
        self.slot.borrow().clone()
    }
}

impl<T> Clone for Flag<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Flag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Flag").field(&*self.slot.borrow()).finish()
    }
}
