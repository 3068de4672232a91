//! Tree-walking evaluator.
//!
//! Dispatch is a structural `match` over the AST. Early `return` travels as
//! [`Value::ReturnValue`]: a block stops at the first such value and hands
//! it up still wrapped, and the wrapper is removed only at a call boundary
//! or at program level.

use std::rc::Rc;

use log::{debug, info};

use crate::ast::{
    BlockStatement, Expression, FunctionLiteral, Identifier, InfixOperator, PrefixOperator,
    Program, Statement,
};
use crate::environment::{Env, Environment};
use crate::error::RuntimeError;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Function, Value, NULL};

/// Convenient alias for evaluator results.
pub type EResult<T> = Result<T, RuntimeError>;

/// Default bound on nested function applications.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 4096;

/// Evaluate `program` in `env` with the default call depth limit.
pub fn evaluate(program: &Program, env: &Env) -> EResult<Value> {
    Evaluator::new().evaluate(program, env)
}

/// Evaluation state that outlives a single node: the current call depth and
/// its limit.
#[derive(Debug, Clone)]
pub struct Evaluator {
    depth: usize,
    max_depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_CALL_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        info!("Initializing Evaluator, max call depth {}", max_depth);

        Self {
            depth: 0,
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluates a whole program. A top-level `return` ends the program and
    /// its value is returned unwrapped.
    pub fn evaluate(&mut self, program: &Program, env: &Env) -> EResult<Value> {
        debug!("Evaluating {} statement(s)", program.statements.len());

        self.depth = 0;

        let result: Value = self.eval_statements(&program.statements, env)?;

        Ok(match result {
            Value::ReturnValue(inner) => *inner,
            other => other,
        })
    }

    // ───────────────────────── statements ─────────────────────────

    /// Runs statements in order; stops at the first `ReturnValue` and
    /// passes it up still wrapped. An empty list yields `Null`.
    fn eval_statements(&mut self, statements: &[Statement], env: &Env) -> EResult<Value> {
        let mut result: Value = NULL;

        for stmt in statements {
            result = self.eval_statement(stmt, env)?;

            if let Value::ReturnValue(_) = result {
                debug!("Return value short-circuits block");
                return Ok(result);
            }
        }

        Ok(result)
    }

    fn eval_block(&mut self, block: &BlockStatement, env: &Env) -> EResult<Value> {
        self.eval_statements(&block.statements, env)
    }

    fn eval_statement(&mut self, stmt: &Statement, env: &Env) -> EResult<Value> {
        match stmt {
            Statement::Expression(expr) => self.eval_expression(expr, env),

            Statement::Let { name, value } => {
                let value: Value = self.eval_expression(value, env)?;

                debug!("Defining variable '{}' = {}", name, value);
                env.borrow_mut().define(name.as_str(), value);

                Ok(NULL)
            }

            Statement::Return(expr) => {
                let value: Value = self.eval_expression(expr, env)?;

                debug!("Returning value: {}", value);
                Ok(Value::ReturnValue(Box::new(value)))
            }

            Statement::Block(block) => self.eval_block(block, env),
        }
    }

    // ───────────────────────── expressions ────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn eval_expression(&mut self, expr: &Expression, env: &Env) -> EResult<Value> {
        ensure_sufficient_stack(|| match expr {
            Expression::Integer(n) => Ok(Value::Integer(*n)),

            Expression::Boolean(b) => Ok(Value::from(*b)),

            Expression::Identifier(ident) => eval_identifier(ident, env),

            Expression::Prefix { operator, right } => {
                let right: Value = self.eval_expression(right, env)?;
                eval_prefix(*operator, right)
            }

            Expression::Infix {
                operator,
                left,
                right,
            } => {
                let left: Value = self.eval_expression(left, env)?;
                let right: Value = self.eval_expression(right, env)?;
                eval_infix(*operator, left, right)
            }

            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition: Value = self.eval_expression(condition, env)?;

                if condition.is_truthy() {
                    debug!("Condition is truthy; evaluating consequence");
                    self.eval_block(consequence, env)
                } else if let Some(alt) = alternative {
                    debug!("Condition is falsy; evaluating alternative");
                    self.eval_block(alt, env)
                } else {
                    Ok(NULL)
                }
            }

            Expression::Function(literal) => Ok(Value::Function(Rc::new(Function {
                literal: Rc::clone(literal),
                env: Rc::clone(env),
            }))),

            Expression::Call { callee, arguments } => {
                let callee: Value = self.eval_expression(callee, env)?;

                let mut args: Vec<Value> = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.eval_expression(arg, env)?);
                }

                self.apply_function(callee, args)
            }
        })
    }

    /// Calls `callee` with already-evaluated `args`.
    ///
    /// Parameters are bound positionally in a fresh scope whose parent is
    /// the closure's captured scope. Surplus arguments are ignored and
    /// missing ones stay unbound.
    fn apply_function(&mut self, callee: Value, args: Vec<Value>) -> EResult<Value> {
        let function: Rc<Function> = match callee {
            Value::Function(function) => function,
            other => {
                debug!("Attempted to call non-function {}", other);
                return Err(RuntimeError::NotAFunction(other.inspect()));
            }
        };

        if self.depth >= self.max_depth {
            debug!("Call depth limit {} reached", self.max_depth);
            return Err(RuntimeError::CallDepthExceeded(self.max_depth));
        }

        let literal: &FunctionLiteral = &function.literal;

        if literal.parameters.len() != args.len() {
            debug!(
                "Calling fn with {} parameter(s) using {} argument(s)",
                literal.parameters.len(),
                args.len()
            );
        }

        let call_env: Env = Environment::new_enclosed(&function.env);
        {
            let mut scope = call_env.borrow_mut();
            for (param, arg) in literal.parameters.iter().zip(args) {
                scope.define(param.as_str(), arg);
            }
        }

        self.depth += 1;
        let result: EResult<Value> = self.eval_block(&literal.body, &call_env);
        self.depth -= 1;

        Ok(match result? {
            Value::ReturnValue(inner) => *inner,
            other => other,
        })
    }
}

// ───────────────────────── operators ──────────────────────────────

fn eval_identifier(ident: &Identifier, env: &Env) -> EResult<Value> {
    env.borrow().get(ident.as_str()).ok_or_else(|| {
        debug!("Undeclared identifier '{}'", ident);
        RuntimeError::UndeclaredIdentifier(ident.as_str().to_owned())
    })
}

fn eval_prefix(operator: PrefixOperator, right: Value) -> EResult<Value> {
    match operator {
        PrefixOperator::Bang => Ok(Value::from(!right.is_truthy())),

        PrefixOperator::Minus => match right {
            Value::Integer(n) => n
                .checked_neg()
                .map(Value::Integer)
                .ok_or_else(|| RuntimeError::IntegerOverflow(format!("-{}", n))),

            other => Err(RuntimeError::PrefixTypeMismatch {
                operator: operator.as_str().to_owned(),
                operand: other.inspect(),
            }),
        },
    }
}

fn eval_infix(operator: InfixOperator, left: Value, right: Value) -> EResult<Value> {
    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => eval_integer_infix(operator, *a, *b),

        (Value::Boolean(a), Value::Boolean(b)) => match operator {
            InfixOperator::Lt => Ok(Value::from(a < b)),
            InfixOperator::Gt => Ok(Value::from(a > b)),
            InfixOperator::Eq => Ok(Value::from(a == b)),
            InfixOperator::NotEq => Ok(Value::from(a != b)),

            InfixOperator::Plus
            | InfixOperator::Minus
            | InfixOperator::Asterisk
            | InfixOperator::Slash => Err(RuntimeError::unknown_operator(
                left.inspect(),
                operator.as_str(),
                right.inspect(),
            )),
        },

        _ => Err(RuntimeError::type_mismatch(
            left.inspect(),
            operator.as_str(),
            right.inspect(),
        )),
    }
}

fn eval_integer_infix(operator: InfixOperator, a: i64, b: i64) -> EResult<Value> {
    let overflow = || RuntimeError::IntegerOverflow(format!("{} {} {}", a, operator.as_str(), b));

    match operator {
        InfixOperator::Plus => a.checked_add(b).map(Value::Integer).ok_or_else(overflow),
        InfixOperator::Minus => a.checked_sub(b).map(Value::Integer).ok_or_else(overflow),
        InfixOperator::Asterisk => a.checked_mul(b).map(Value::Integer).ok_or_else(overflow),
        InfixOperator::Slash => {
            if b == 0 {
                debug!("Division by zero: {} / 0", a);
                return Err(RuntimeError::DivisionByZero(a));
            }
            a.checked_div(b).map(Value::Integer).ok_or_else(overflow)
        }

        InfixOperator::Lt => Ok(Value::from(a < b)),
        InfixOperator::Gt => Ok(Value::from(a > b)),
        InfixOperator::Eq => Ok(Value::from(a == b)),
        InfixOperator::NotEq => Ok(Value::from(a != b)),
    }
}
