/*!
The dynamically-typed value every CL binding, argument, and expression
result carries: one tagged union covering every runtime shape a value can
take. Every operator dispatches on the variant; no subclassing is required.

A single-quantity-typed value model would only ever hold one kind of value
in a variable; CL's interpreter needs a tagged union instead, because
`work`-defined functions, `redo`-loop intervals, interpolated strings, and
file-sink paths are all first-class enough to be assigned and passed
around.
*/

use crate::ast::Block;
use crate::interpreter::env::Env;
use crate::quantity::Quantity;
use crate::reaction::Reaction;
use std::fmt;
use std::rc::Rc;

/// A user-defined `work` (function), capturing the environment active at
/// its definition site: calling it later runs its body against that frame
/// chain, giving it a closure rather than a stack-local scope.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
    pub closure: Env,
}

/// The half-open integer sequence `a ... b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub lo: i64,
    pub hi: i64,
}

impl Interval {
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        (self.lo..self.hi).into_iter()
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Quantity(Quantity),
    Function(Rc<Function>),
    Interval(Interval),
    Str(String),
    Path(String),
    Reaction(Rc<Reaction>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Quantity(_) => "quantity",
            Value::Function(_) => "function",
            Value::Interval(_) => "interval",
            Value::Str(_) => "string",
            Value::Path(_) => "path",
            Value::Reaction(_) => "reaction",
        }
    }

    /// Truthiness for `if`/`during` conditions and `!`: only a Quantity has
    /// a defined notion of zero/nonzero, so every other variant is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Quantity(q) => q.is_truthy(),
            _ => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Quantity(q) => write!(f, "{q}"),
            Value::Function(func) => write!(f, "<work {}>", func.name),
            Value::Interval(iv) => write!(f, "{}...{}", iv.lo, iv.hi),
            Value::Str(s) => write!(f, "{s}"),
            Value::Path(p) => write!(f, "{p}"),
            Value::Reaction(r) => write!(f, "{r}"),
        }
    }
}
