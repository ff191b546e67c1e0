/*!
Persistent frame-chain environments: each frame owns a mapping from name to
value, with a parent pointer. Capturing a closure captures a clone of the
`Env` handle, i.e. a reference to the same frame chain, not a copy of its
contents.

[`Env::define`] always creates a new binding in the innermost frame;
[`Env::assign`] walks the parent chain to mutate an *existing* binding's
cell in place, so `i += 1` inside a closure is observed by every other
holder of that frame chain, matching the `counter()` pattern of a closure
that increments and returns a variable captured from its enclosing scope.
*/

use crate::error::{CLError, CLResult, ErrorKind};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

struct Frame {
    vars: RefCell<HashMap<String, Value>>,
    parent: Option<Env>,
}

/// A handle to a frame in the chain. Clones are cheap (`Rc` bump) and share
/// the same underlying frame.
#[derive(Clone)]
pub struct Env(Rc<Frame>);

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Env(..)")
    }
}

impl Env {
    pub fn root() -> Env {
        Env(Rc::new(Frame { vars: RefCell::new(HashMap::new()), parent: None }))
    }

    /// A new child frame sharing `self` as its parent.
    pub fn child(&self) -> Env {
        Env(Rc::new(Frame { vars: RefCell::new(HashMap::new()), parent: Some(self.clone()) }))
    }

    /// Binds `name` to `value` in this frame, shadowing any outer binding.
    pub fn define(&self, name: &str, value: Value) {
        self.0.vars.borrow_mut().insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.0.vars.borrow().get(name) {
            return Some(v.clone());
        }
        self.0.parent.as_ref().and_then(|p| p.get(name))
    }

    /// Mutates the existing binding for `name` in the innermost frame that
    /// already contains it. Errors with `UnknownIdentifier` if no frame in
    /// the chain has bound `name` yet.
    pub fn assign(&self, name: &str, value: Value) -> CLResult<()> {
        if self.0.vars.borrow().contains_key(name) {
            self.0.vars.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        match &self.0.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(CLError::new(ErrorKind::UnknownIdentifier(name.to_string()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Decimal;
    use crate::quantity::Quantity;

    fn scalar(n: &str) -> Value {
        Value::Quantity(Quantity::scalar(Decimal::from_literal(n).unwrap()))
    }

    #[test]
    fn child_frame_sees_parent_bindings() {
        let root = Env::root();
        root.define("x", scalar("1"));
        let child = root.child();
        assert!(child.get("x").is_some());
    }

    #[test]
    fn assign_mutates_the_defining_frame_not_a_new_one() {
        let root = Env::root();
        root.define("i", scalar("0"));
        let child = root.child();
        child.assign("i", scalar("1")).unwrap();
        assert!(matches!(root.get("i"), Some(Value::Quantity(q)) if q.magnitude.magnitude == rust_decimal::Decimal::from(1)));
    }

    #[test]
    fn assign_to_unbound_name_is_an_error() {
        let root = Env::root();
        assert!(root.assign("nope", scalar("1")).is_err());
    }

    #[test]
    fn define_shadows_in_the_current_frame_only() {
        let root = Env::root();
        root.define("x", scalar("1"));
        let child = root.child();
        child.define("x", scalar("2"));
        assert!(matches!(root.get("x"), Some(Value::Quantity(q)) if q.magnitude.magnitude == rust_decimal::Decimal::from(1)));
        assert!(matches!(child.get("x"), Some(Value::Quantity(q)) if q.magnitude.magnitude == rust_decimal::Decimal::from(2)));
    }
}
