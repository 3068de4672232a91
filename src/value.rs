use std::fmt;
use std::rc::Rc;

use crate::ast::FunctionLiteral;
use crate::environment::Env;

/// Boolean `true`; shared, never allocated per evaluation.
pub const TRUE: Value = Value::Boolean(true);

/// Boolean `false`.
pub const FALSE: Value = Value::Boolean(false);

/// The absence value.
pub const NULL: Value = Value::Null;

/// A closure: the literal it came from plus the scope that was current when
/// the literal was evaluated.
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: Env,
}

impl fmt::Debug for Function {
    // The captured scope may contain this very function, so it is elided.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("literal", &self.literal)
            .finish_non_exhaustive()
    }
}

/// Runtime result of evaluating a node.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),

    Boolean(bool),

    Null,

    /// Marks an early `return` while it unwinds to the enclosing call.
    /// Never the result of a whole program.
    ReturnValue(Box<Value>),

    Function(Rc<Function>),
}

impl Value {
    /// Canonical text form shown by the REPL.
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(n) => {
                let mut buf: itoa::Buffer = itoa::Buffer::new();
                format!("INTEGER<{}>", buf.format(*n))
            }

            Value::Boolean(b) => format!("BOOLEAN<{}>", b),

            Value::Null => "NULL".to_string(),

            Value::ReturnValue(inner) => format!("RETURN_VALUE<{}>", inner.inspect()),

            Value::Function(function) => {
                let params: Vec<&str> = function
                    .literal
                    .parameters
                    .iter()
                    .map(|p| p.as_str())
                    .collect();

                format!("FUNCTION<fn({})>", params.join(", "))
            }
        }
    }

    /// `false` and `Null` are falsy; everything else, `0` included, is truthy.
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b {
            TRUE
        } else {
            FALSE
        }
    }
}

impl PartialEq for Value {
    /// Functions are equal only when they are the same closure.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::ReturnValue(a), Value::ReturnValue(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}
