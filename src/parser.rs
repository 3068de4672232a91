/*!
Recursive-descent parser with Pratt (precedence-climbing) expressions.

Grammar (EBNF, condensed)
-------------------------

```text
program        → statement* EOF ;
statement      → letStmt | returnStmt | exprStmt ;
letStmt        → "let" IDENT "=" expression ";"? ;
returnStmt     → "return" expression ";"? ;
exprStmt       → expression ";"? ;
block          → "{" statement* "}" ;
expression     → prefix infix* ;
prefix         → IDENT | INT | "true" | "false"
               | ( "!" | "-" ) expression
               | "(" expression ")"
               | "if" "(" expression ")" block ( "else" block )?
               | "fn" "(" ( IDENT ( "," IDENT )* )? ")" block ;
infix          → ( "+" | "-" | "*" | "/" | "<" | ">" | "==" | "!=" ) expression
               | "(" ( expression ( "," expression )* )? ")" ;
```

Binding powers, lowest to highest:

| Level     | Tokens            |
|-----------|-------------------|
| `Lowest`  | everything else   |
| `Equals`  | `==` `!=`         |
| `Compare` | `<` `>`           |
| `Sum`     | `+` `-`           |
| `Product` | `*` `/`           |
| `Prefix`  | unary `!` `-`     |
| `Call`    | `(` after a callee|

The parser keeps two tokens of lookahead (`current`, `peek`). Every
`parse_*` routine starts with its first token in `current` and returns with
its last token in `current`.

### Logging Policy

| Location                      | Level  | Purpose                                |
|-------------------------------|--------|----------------------------------------|
| `Parser::new`, `parse_program`| `info` | Lifecycle milestones.                  |
| statement routines            | `debug`| High-level descent into grammar rules. |
| error helpers                 | `debug`| Context before returning the error.    |
*/

use std::rc::Rc;

use crate::ast::{
    BlockStatement, Expression, FunctionLiteral, Identifier, InfixOperator, PrefixOperator,
    Program, Statement,
};
use crate::error::ParseError;
use crate::scanner::Scanner;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenKind};

use log::{debug, info};

/// Parser result alias.
pub type PResult<T> = std::result::Result<T, ParseError>;

/// Role of a token in infix position.
#[derive(Debug, Clone, Copy)]
enum Infix {
    Call,
    Operator(InfixOperator),
}

/// Operator binding power. Variant order is the precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    Compare,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    /// Binding power of `kind` in infix position. Kinds with no infix
    /// handler bind at `Lowest`, which always stops the climbing loop.
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::EQ | TokenKind::NOT_EQ => Precedence::Equals,
            TokenKind::LT | TokenKind::GT => Precedence::Compare,
            TokenKind::PLUS | TokenKind::MINUS => Precedence::Sum,
            TokenKind::ASTERISK | TokenKind::SLASH => Precedence::Product,
            TokenKind::LPAREN => Precedence::Call,

            TokenKind::ILLEGAL
            | TokenKind::EOF
            | TokenKind::IDENT
            | TokenKind::INT
            | TokenKind::ASSIGN
            | TokenKind::BANG
            | TokenKind::COMMA
            | TokenKind::SEMICOLON
            | TokenKind::RPAREN
            | TokenKind::LBRACE
            | TokenKind::RBRACE
            | TokenKind::FUNCTION
            | TokenKind::LET
            | TokenKind::TRUE
            | TokenKind::FALSE
            | TokenKind::IF
            | TokenKind::ELSE
            | TokenKind::RETURN => Precedence::Lowest,
        }
    }
}

/// Top-level parser pulling tokens on demand from a [`Scanner`].
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    current: Token<'a>,
    peek: Token<'a>,
}

impl<'a> Parser<'a> {
    /// Construct a new parser and prime both lookahead slots.
    pub fn new(mut scanner: Scanner<'a>) -> Self {
        let current: Token<'a> = scanner.next_token();
        let peek: Token<'a> = scanner.next_token();

        info!("Parser created, first token {}", current);

        Self {
            scanner,
            current,
            peek,
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse statements until EOF. The first error aborts the parse.
    pub fn parse_program(&mut self) -> PResult<Program> {
        info!("Beginning parse phase");

        let mut statements: Vec<Statement> = Vec::new();

        while !self.current_is(TokenKind::EOF) {
            statements.push(self.parse_statement()?);
            self.next_token();
        }

        info!("Parsed {} statement(s)", statements.len());

        Ok(Program { statements })
    }

    // ───────────────────────── statement rules ────────────────────

    fn parse_statement(&mut self) -> PResult<Statement> {
        match self.current.kind {
            TokenKind::LET => self.parse_let_statement(),
            TokenKind::RETURN => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> PResult<Statement> {
        debug!("Entering let statement");

        self.expect_peek(TokenKind::IDENT)?;
        let name: Identifier = Identifier::new(self.current.literal);

        self.expect_peek(TokenKind::ASSIGN)?;
        self.next_token();

        let value: Expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> PResult<Statement> {
        debug!("Entering return statement");

        self.next_token();

        let value: Expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Statement::Return(value))
    }

    fn parse_expression_statement(&mut self) -> PResult<Statement> {
        debug!("Entering expression statement at {}", self.current);

        let expr: Expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Statement::Expression(expr))
    }

    /// `current` is the opening `{`; returns with `current` on `}`.
    fn parse_block_statement(&mut self) -> PResult<BlockStatement> {
        debug!("Entering block");

        let mut statements: Vec<Statement> = Vec::new();
        self.next_token();

        while !self.current_is(TokenKind::RBRACE) {
            if self.current_is(TokenKind::EOF) {
                return Err(ParseError::unexpected(TokenKind::RBRACE, &self.current));
            }

            statements.push(self.parse_statement()?);
            self.next_token();
        }

        Ok(BlockStatement { statements })
    }

    // ─────────────────────── expression rules (Pratt) ─────────────

    /// Parse an expression whose operators all bind tighter than
    /// `precedence`.
    pub fn parse_expression(&mut self, precedence: Precedence) -> PResult<Expression> {
        ensure_sufficient_stack(|| {
            let mut left: Expression = self.parse_prefix()?;

            while !self.peek_is(TokenKind::SEMICOLON) && precedence < self.peek_precedence() {
                let Some(infix) = self.peek_infix() else {
                    break;
                };

                self.next_token();
                left = match infix {
                    Infix::Call => self.parse_call_expression(left)?,
                    Infix::Operator(operator) => self.parse_infix_expression(operator, left)?,
                };
            }

            Ok(left)
        })
    }

    /// Prefix handler dispatch on `current`.
    fn parse_prefix(&mut self) -> PResult<Expression> {
        match self.current.kind {
            TokenKind::IDENT => Ok(Expression::Identifier(Identifier::new(
                self.current.literal,
            ))),
            TokenKind::INT => self.parse_integer_literal(),
            TokenKind::TRUE => Ok(Expression::Boolean(true)),
            TokenKind::FALSE => Ok(Expression::Boolean(false)),
            TokenKind::BANG | TokenKind::MINUS => self.parse_prefix_expression(),
            TokenKind::LPAREN => self.parse_grouped_expression(),
            TokenKind::IF => self.parse_if_expression(),
            TokenKind::FUNCTION => self.parse_function_literal(),

            TokenKind::ILLEGAL
            | TokenKind::EOF
            | TokenKind::ASSIGN
            | TokenKind::PLUS
            | TokenKind::ASTERISK
            | TokenKind::SLASH
            | TokenKind::LT
            | TokenKind::GT
            | TokenKind::EQ
            | TokenKind::NOT_EQ
            | TokenKind::COMMA
            | TokenKind::SEMICOLON
            | TokenKind::RPAREN
            | TokenKind::LBRACE
            | TokenKind::RBRACE
            | TokenKind::LET
            | TokenKind::ELSE
            | TokenKind::RETURN => Err(ParseError::no_prefix(&self.current)),
        }
    }

    fn parse_integer_literal(&mut self) -> PResult<Expression> {
        self.current
            .literal
            .parse::<i64>()
            .map(Expression::Integer)
            .map_err(|_| {
                debug!("Malformed integer literal {:?}", self.current.literal);

                ParseError::InvalidInteger(self.current.literal.to_owned())
            })
    }

    fn parse_prefix_expression(&mut self) -> PResult<Expression> {
        let operator: PrefixOperator = match PrefixOperator::from_token(self.current.kind) {
            Some(op) => op,
            None => return Err(ParseError::no_prefix(&self.current)),
        };

        self.next_token();
        let right: Expression = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::Prefix {
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(
        &mut self,
        operator: InfixOperator,
        left: Expression,
    ) -> PResult<Expression> {
        let precedence: Precedence = self.current_precedence();

        self.next_token();
        let right: Expression = self.parse_expression(precedence)?;

        Ok(Expression::Infix {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> PResult<Expression> {
        self.next_token();

        let expr: Expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RPAREN)?;

        Ok(expr)
    }

    fn parse_if_expression(&mut self) -> PResult<Expression> {
        debug!("Entering if expression");

        self.expect_peek(TokenKind::LPAREN)?;
        self.next_token();

        let condition: Expression = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::RPAREN)?;
        self.expect_peek(TokenKind::LBRACE)?;

        let consequence: BlockStatement = self.parse_block_statement()?;

        let alternative: Option<BlockStatement> = if self.peek_is(TokenKind::ELSE) {
            self.next_token();
            self.expect_peek(TokenKind::LBRACE)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> PResult<Expression> {
        debug!("Entering function literal");

        self.expect_peek(TokenKind::LPAREN)?;
        let parameters: Vec<Identifier> = self.parse_function_parameters()?;

        self.expect_peek(TokenKind::LBRACE)?;
        let body: BlockStatement = self.parse_block_statement()?;

        Ok(Expression::Function(Rc::new(FunctionLiteral {
            parameters,
            body,
        })))
    }

    /// `current` is `(`; returns with `current` on `)`.
    fn parse_function_parameters(&mut self) -> PResult<Vec<Identifier>> {
        let mut parameters: Vec<Identifier> = Vec::new();

        if self.peek_is(TokenKind::RPAREN) {
            self.next_token();
            return Ok(parameters);
        }

        self.expect_peek(TokenKind::IDENT)?;
        parameters.push(Identifier::new(self.current.literal));

        while self.peek_is(TokenKind::COMMA) {
            self.next_token();
            self.expect_peek(TokenKind::IDENT)?;
            parameters.push(Identifier::new(self.current.literal));
        }

        self.expect_peek(TokenKind::RPAREN)?;

        Ok(parameters)
    }

    fn parse_call_expression(&mut self, callee: Expression) -> PResult<Expression> {
        let arguments: Vec<Expression> = self.parse_call_arguments()?;

        Ok(Expression::Call {
            callee: Box::new(callee),
            arguments,
        })
    }

    /// `current` is `(`; returns with `current` on `)`.
    fn parse_call_arguments(&mut self) -> PResult<Vec<Expression>> {
        let mut arguments: Vec<Expression> = Vec::new();

        if self.peek_is(TokenKind::RPAREN) {
            self.next_token();
            return Ok(arguments);
        }

        self.next_token();
        arguments.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::COMMA) {
            self.next_token();
            self.next_token();
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(TokenKind::RPAREN)?;

        Ok(arguments)
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn next_token(&mut self) {
        self.current = self.peek;
        self.peek = self.scanner.next_token();
    }

    #[inline(always)]
    fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    #[inline(always)]
    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Advance only if `peek` has the required kind.
    #[inline(always)]
    fn expect_peek(&mut self, kind: TokenKind) -> PResult<()> {
        if self.peek_is(kind) {
            self.next_token();
            return Ok(());
        }

        Err(ParseError::unexpected(kind, &self.peek))
    }

    /// Consume a trailing `;` if one follows.
    #[inline(always)]
    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenKind::SEMICOLON) {
            self.next_token();
        }
    }

    /// Infix handler for `peek`. Every kind that binds above `Lowest` has one.
    #[inline(always)]
    fn peek_infix(&self) -> Option<Infix> {
        match self.peek.kind {
            TokenKind::LPAREN => Some(Infix::Call),
            kind => InfixOperator::from_token(kind).map(Infix::Operator),
        }
    }

    #[inline(always)]
    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }

    #[inline(always)]
    fn current_precedence(&self) -> Precedence {
        Precedence::of(self.current.kind)
    }
}
