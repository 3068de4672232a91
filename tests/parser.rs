#[cfg(test)]
mod parser_tests {
    use monkey_interpreter as monkey;

    use monkey::ast::*;
    use monkey::error::ParseError;
    use monkey::parser::{Parser, Precedence};
    use monkey::scanner::Scanner;
    use monkey::token::TokenKind;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Program {
        Parser::new(Scanner::new(source))
            .parse_program()
            .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e))
    }

    fn parse_err(source: &str) -> ParseError {
        match Parser::new(Scanner::new(source)).parse_program() {
            Ok(program) => panic!("expected {:?} to fail, parsed {}", source, program),
            Err(e) => e,
        }
    }

    fn single_expression(source: &str) -> Expression {
        let program = parse(source);
        assert_eq!(program.statements.len(), 1, "source: {}", source);

        match program.statements.into_iter().next() {
            Some(Statement::Expression(expr)) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    fn ident(name: &str) -> Expression {
        Expression::Identifier(Identifier::new(name))
    }

    fn infix(left: Expression, operator: InfixOperator, right: Expression) -> Expression {
        Expression::Infix {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn test_let_statements() {
        let cases = [
            ("let x = 5;", "x", Expression::Integer(5)),
            ("let y = true;", "y", Expression::Boolean(true)),
            ("let foobar = y", "foobar", ident("y")),
        ];

        for (source, name, value) in cases {
            let program = parse(source);
            assert_eq!(
                program.statements,
                vec![Statement::Let {
                    name: Identifier::new(name),
                    value,
                }]
            );
        }
    }

    #[test]
    fn test_return_statements() {
        let cases = [
            ("return 5;", Expression::Integer(5)),
            ("return false;", Expression::Boolean(false)),
            ("return x", ident("x")),
        ];

        for (source, value) in cases {
            assert_eq!(parse(source).statements, vec![Statement::Return(value)]);
        }
    }

    #[test]
    fn test_prefix_expressions() {
        assert_eq!(
            single_expression("!5;"),
            Expression::Prefix {
                operator: PrefixOperator::Bang,
                right: Box::new(Expression::Integer(5)),
            }
        );
        assert_eq!(
            single_expression("-x"),
            Expression::Prefix {
                operator: PrefixOperator::Minus,
                right: Box::new(ident("x")),
            }
        );
    }

    #[test]
    fn test_infix_expressions() {
        let cases = [
            ("5 + 5;", InfixOperator::Plus),
            ("5 - 5;", InfixOperator::Minus),
            ("5 * 5;", InfixOperator::Asterisk),
            ("5 / 5;", InfixOperator::Slash),
            ("5 > 5;", InfixOperator::Gt),
            ("5 < 5;", InfixOperator::Lt),
            ("5 == 5;", InfixOperator::Eq),
            ("5 != 5;", InfixOperator::NotEq),
        ];

        for (source, operator) in cases {
            assert_eq!(
                single_expression(source),
                infix(Expression::Integer(5), operator, Expression::Integer(5))
            );
        }

        assert_eq!(
            single_expression("true != false"),
            infix(
                Expression::Boolean(true),
                InfixOperator::NotEq,
                Expression::Boolean(false)
            )
        );
    }

    #[test]
    fn test_operator_precedence_rendering() {
        let cases = [
            ("!-a", "(!(-a))"),
            ("a + b / c", "(a + (b / c))"),
            ("a * -b", "(a * (-b))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("3 < 5 == true", "((3 < 5) == true)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
        ];

        for (source, expected) in cases {
            assert_eq!(parse(source).to_string(), expected, "source: {}", source);
        }
    }

    #[test]
    fn test_statement_rendering() {
        assert_eq!(parse("let x = 1 + 2;").to_string(), "let x = (1 + 2);");
        assert_eq!(parse("return -x").to_string(), "return (-x);");
        assert_eq!(
            parse("if (x < y) { x } else { y }").to_string(),
            "if (x < y) { x } else { y }"
        );
        assert_eq!(
            parse("fn(x, y) { x + y; }").to_string(),
            "fn(x, y) { (x + y) }"
        );
    }

    #[test]
    fn test_if_expression() {
        let expr = single_expression("if (x < y) { x }");

        let Expression::If {
            condition,
            consequence,
            alternative,
        } = &expr
        else {
            panic!("expected if expression");
        };

        assert_eq!(**condition, infix(ident("x"), InfixOperator::Lt, ident("y")));
        assert_eq!(
            consequence.statements,
            vec![Statement::Expression(ident("x"))]
        );
        assert_eq!(*alternative, None);
    }

    #[test]
    fn test_if_else_expression() {
        let expr = single_expression("if (x < y) { x } else { y }");

        let Expression::If { alternative, .. } = &expr else {
            panic!("expected if expression");
        };

        assert_eq!(
            alternative.as_ref().map(|block| &block.statements),
            Some(&vec![Statement::Expression(ident("y"))])
        );
    }

    #[test]
    fn test_function_literal() {
        let expr = single_expression("fn(x, y) { x + y; }");

        let Expression::Function(literal) = &expr else {
            panic!("expected function literal");
        };

        assert_eq!(
            literal.parameters,
            vec![Identifier::new("x"), Identifier::new("y")]
        );
        assert_eq!(
            literal.body.statements,
            vec![Statement::Expression(infix(
                ident("x"),
                InfixOperator::Plus,
                ident("y")
            ))]
        );
    }

    #[test]
    fn test_function_parameters() {
        let cases: [(&str, &[&str]); 3] = [
            ("fn() {}", &[]),
            ("fn(x) {}", &["x"]),
            ("fn(x, y, z) {}", &["x", "y", "z"]),
        ];

        for (source, expected) in cases {
            let expr = single_expression(source);
            let Expression::Function(literal) = &expr else {
                panic!("expected function literal for {}", source);
            };

            let names: Vec<&str> = literal.parameters.iter().map(|p| p.as_str()).collect();
            assert_eq!(names, expected.to_vec());
        }
    }

    #[test]
    fn test_call_expression() {
        let expr = single_expression("add(1, 2 + 3, 4 * 5);");

        assert_eq!(
            expr,
            Expression::Call {
                callee: Box::new(ident("add")),
                arguments: vec![
                    Expression::Integer(1),
                    infix(
                        Expression::Integer(2),
                        InfixOperator::Plus,
                        Expression::Integer(3)
                    ),
                    infix(
                        Expression::Integer(4),
                        InfixOperator::Asterisk,
                        Expression::Integer(5)
                    ),
                ],
            }
        );
    }

    #[test]
    fn test_immediately_invoked_function() {
        assert_eq!(parse("fn(x) { x; }(5)").to_string(), "fn(x) { x }(5)");
    }

    #[test]
    fn test_statements_without_semicolons() {
        let program = parse("if (x < 2) { return x; } return f(x - 1)");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[1], Statement::Return(_)));
    }

    #[test]
    fn test_missing_assign_in_let() {
        assert_eq!(
            parse_err("let x 5;"),
            ParseError::UnexpectedToken {
                expected: TokenKind::ASSIGN,
                found: TokenKind::INT,
                literal: "5".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_identifier_in_let() {
        assert!(matches!(
            parse_err("let = 10;"),
            ParseError::UnexpectedToken {
                expected: TokenKind::IDENT,
                found: TokenKind::ASSIGN,
                ..
            }
        ));
    }

    #[test]
    fn test_no_prefix_handler() {
        assert_eq!(
            parse_err("5 + ;"),
            ParseError::NoPrefixParse {
                kind: TokenKind::SEMICOLON,
                literal: ";".to_string(),
            }
        );
        assert!(matches!(
            parse_err("let x = $;"),
            ParseError::NoPrefixParse {
                kind: TokenKind::ILLEGAL,
                ..
            }
        ));
    }

    #[test]
    fn test_unclosed_group_and_block() {
        assert!(matches!(
            parse_err("(1 + 2"),
            ParseError::UnexpectedToken {
                expected: TokenKind::RPAREN,
                found: TokenKind::EOF,
                ..
            }
        ));
        assert!(matches!(
            parse_err("fn(x) { x"),
            ParseError::UnexpectedToken {
                expected: TokenKind::RBRACE,
                found: TokenKind::EOF,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_parameter_list() {
        assert!(matches!(
            parse_err("fn(x, 1) { x }"),
            ParseError::UnexpectedToken {
                expected: TokenKind::IDENT,
                found: TokenKind::INT,
                ..
            }
        ));
    }

    #[test]
    fn test_integer_out_of_range() {
        assert_eq!(
            parse_err("99999999999999999999"),
            ParseError::InvalidInteger("99999999999999999999".to_string())
        );
    }

    #[test]
    fn test_every_binding_token_has_an_infix_handler() {
        let sources = [
            "a == b", "a != b", "a < b", "a > b", "a + b", "a - b", "a * b", "a / b", "a(b)",
        ];

        for source in sources {
            let operator = Scanner::new(source)
                .nth(1)
                .unwrap_or_else(|| panic!("no operator token in {}", source));
            assert!(Precedence::of(operator.kind) > Precedence::Lowest);

            assert!(
                matches!(
                    single_expression(source),
                    Expression::Infix { .. } | Expression::Call { .. }
                ),
                "source: {}",
                source
            );
        }
    }

    #[test]
    fn test_groups_add_no_nodes() {
        let depth = 5_000;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(single_expression(&source), Expression::Integer(1));
    }

    const DEEP: usize = 200_000;

    #[test]
    fn test_deep_prefix_chain_renders_and_drops() {
        let program = parse(&format!("{}x", "-".repeat(DEEP)));

        let rendered = program.to_string();
        assert_eq!(rendered.len(), 3 * DEEP + 1);
        assert!(rendered.starts_with("(-(-(-"));
        assert!(rendered.ends_with("(-x)))"));

        let json = serde_json::to_string(&program).expect("deep tree serializes");
        assert!(json.starts_with(r#"{"statements":[{"Expression":{"Prefix""#));

        drop(program);
    }

    #[test]
    fn test_deep_left_nested_sum_renders_and_drops() {
        let program = parse(&format!("1{}", " + 1".repeat(DEEP)));

        let rendered = program.to_string();
        assert_eq!(rendered.len(), 6 * DEEP + 1);
        assert!(rendered.starts_with(&format!("{}1 + 1) + 1)", "(".repeat(DEEP))));

        drop(program);
    }

    #[test]
    fn test_deep_grouped_prefixes_and_bangs() {
        let grouped = parse(&format!("{}1{}", "-(".repeat(DEEP), ")".repeat(DEEP)));
        assert_eq!(grouped.to_string().len(), 3 * DEEP + 1);

        let bangs = parse(&format!("{}true", "!".repeat(DEEP)));
        assert!(bangs.to_string().starts_with("(!(!"));
    }

    #[test]
    fn test_deep_nested_ifs_render_and_drop() {
        let depth = 10_000;
        let source = format!("{}1{}", "if (true) { ".repeat(depth), " }".repeat(depth));

        let program = parse(&source);
        assert!(program.to_string().starts_with("if true { if true { "));

        drop(program);
    }

    #[test]
    fn test_failed_deep_parse_releases_partial_tree() {
        let source = format!("1{} +", " + 1".repeat(DEEP));

        assert!(matches!(
            parse_err(&source),
            ParseError::NoPrefixParse {
                kind: TokenKind::EOF,
                ..
            }
        ));
    }
}
