//! Abstract syntax tree for the Monkey language.
//!
//! Every node owns its children; the only sharing is the `Rc` around
//! [`FunctionLiteral`], which lets a closure value point at the parameters
//! and body it was created from without copying them. Rendering lives in
//! [`ast_printer`](crate::ast_printer).
//!
//! Trees can be as deep as the input is long, so nothing that walks them
//! may rely on the native stack alone: [`Expression`] drops its children
//! with an explicit work list, and serialization grows the stack at every
//! nested field.

use serde::{Serialize, Serializer};
use std::mem;
use std::rc::Rc;

use crate::stack::ensure_sufficient_stack;
use crate::token::TokenKind;

/// `serialize_with` hook for recursive fields.
fn serialize_nested<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    ensure_sufficient_stack(move || value.serialize(serializer))
}

/// A whole parsed input: statements in source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// A variable or parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Identifier(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `{ ... }` body of an `if` branch or a function.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// `let <name> = <value>;`
    Let { name: Identifier, value: Expression },

    /// `return <value>;`
    Return(Expression),

    /// A bare expression; its value is the statement's result.
    Expression(Expression),

    Block(BlockStatement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOperator {
    /// `!`
    Bang,

    /// `-`
    Minus,
}

impl PrefixOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::BANG => Some(PrefixOperator::Bang),
            TokenKind::MINUS => Some(PrefixOperator::Minus),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PrefixOperator::Bang => "!",
            PrefixOperator::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOperator {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,
}

impl InfixOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::PLUS => Some(InfixOperator::Plus),
            TokenKind::MINUS => Some(InfixOperator::Minus),
            TokenKind::ASTERISK => Some(InfixOperator::Asterisk),
            TokenKind::SLASH => Some(InfixOperator::Slash),
            TokenKind::LT => Some(InfixOperator::Lt),
            TokenKind::GT => Some(InfixOperator::Gt),
            TokenKind::EQ => Some(InfixOperator::Eq),
            TokenKind::NOT_EQ => Some(InfixOperator::NotEq),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Asterisk => "*",
            InfixOperator::Slash => "/",
            InfixOperator::Lt => "<",
            InfixOperator::Gt => ">",
            InfixOperator::Eq => "==",
            InfixOperator::NotEq => "!=",
        }
    }
}

/// `fn(<parameters>) <body>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionLiteral {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Identifier(Identifier),

    Integer(i64),

    Boolean(bool),

    /// *Example:* `!ok`, `-5`
    Prefix {
        operator: PrefixOperator,
        #[serde(serialize_with = "serialize_nested")]
        right: Box<Expression>,
    },

    /// *Example:* `a + b`, `x < y`
    Infix {
        operator: InfixOperator,
        #[serde(serialize_with = "serialize_nested")]
        left: Box<Expression>,
        #[serde(serialize_with = "serialize_nested")]
        right: Box<Expression>,
    },

    /// `if (<condition>) <consequence> else <alternative>`
    If {
        #[serde(serialize_with = "serialize_nested")]
        condition: Box<Expression>,
        #[serde(serialize_with = "serialize_nested")]
        consequence: BlockStatement,
        #[serde(serialize_with = "serialize_nested")]
        alternative: Option<BlockStatement>,
    },

    Function(#[serde(serialize_with = "serialize_nested")] Rc<FunctionLiteral>),

    /// *Example:* `add(1, 2)`, `fn(x) { x }(5)`
    Call {
        #[serde(serialize_with = "serialize_nested")]
        callee: Box<Expression>,
        #[serde(serialize_with = "serialize_nested")]
        arguments: Vec<Expression>,
    },
}

impl Drop for Expression {
    /// Dismantle the subtree iteratively. Each node popped off `pending`
    /// hands its children over before it is dropped, so the compiler's
    /// recursive drop glue only ever sees leaves.
    fn drop(&mut self) {
        let mut pending: Vec<Expression> = Vec::new();
        self.take_children(&mut pending);

        while let Some(mut expr) = pending.pop() {
            expr.take_children(&mut pending);
        }
    }
}

impl Expression {
    /// Move every direct child expression into `out`, leaving leaves behind.
    fn take_children(&mut self, out: &mut Vec<Expression>) {
        match self {
            Expression::Identifier(_) | Expression::Integer(_) | Expression::Boolean(_) => {}

            Expression::Prefix { right, .. } => out.push(take_node(right)),

            Expression::Infix { left, right, .. } => {
                out.push(take_node(left));
                out.push(take_node(right));
            }

            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                out.push(take_node(condition));
                take_statements(&mut consequence.statements, out);
                if let Some(alt) = alternative {
                    take_statements(&mut alt.statements, out);
                }
            }

            // A literal still shared with a closure value belongs to it.
            Expression::Function(literal) => {
                if let Some(literal) = Rc::get_mut(literal) {
                    take_statements(&mut literal.body.statements, out);
                }
            }

            Expression::Call { callee, arguments } => {
                out.push(take_node(callee));
                out.append(arguments);
            }
        }
    }
}

fn take_node(slot: &mut Expression) -> Expression {
    mem::replace(slot, Expression::Boolean(false))
}

/// Flatten `statements` (nested blocks included) into their expressions.
fn take_statements(statements: &mut Vec<Statement>, out: &mut Vec<Expression>) {
    let mut pending: Vec<Statement> = mem::take(statements);

    while let Some(stmt) = pending.pop() {
        match stmt {
            Statement::Let { value, .. } => out.push(value),
            Statement::Return(expr) | Statement::Expression(expr) => out.push(expr),
            Statement::Block(mut block) => pending.append(&mut block.statements),
        }
    }
}
