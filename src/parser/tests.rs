//! Parser tests.

#[cfg(test)]
mod tests {
    use crate::ast::printer::{print_expr, print_program};
    use crate::ast::*;
    use crate::error::ParserError;
    use crate::lexer::Scanner;
    use crate::parser::{Parser, MAX_NESTING};
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Program {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(tokens).parse().unwrap()
    }

    fn parse_errors(source: &str) -> Vec<ParserError> {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(tokens).parse().unwrap_err()
    }

    fn parse_expr(source: &str) -> Expr {
        let program = parse(source);
        match program.statements.into_iter().next().unwrap().kind {
            StmtKind::Expression(expr) => expr,
            _ => panic!("Expected expression statement"),
        }
    }

    #[test]
    fn test_binary_expr() {
        let expr = parse_expr("1 + 2;");
        match expr.kind {
            ExprKind::Binary { operator, .. } => assert_eq!(operator, BinaryOp::Add),
            _ => panic!("Expected binary expression"),
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(print_expr(&parse_expr("1 + 2 * 3;")), "(+ 1 (* 2 3))");
        assert_eq!(print_expr(&parse_expr("-1 - -2;")), "(- (- 1) (- 2))");
        assert_eq!(
            print_expr(&parse_expr("1 < 2 == !false;")),
            "(== (< 1 2) (! false))"
        );
        assert_eq!(print_expr(&parse_expr("(1 + 2) * 3;")), "(* (group (+ 1 2)) 3)");
    }

    #[test]
    fn test_left_associative_arithmetic() {
        assert_eq!(print_expr(&parse_expr("8 - 4 - 2;")), "(- (- 8 4) 2)");
    }

    #[test]
    fn test_logical_precedence() {
        assert_eq!(
            print_expr(&parse_expr("a or b and c;")),
            "(or a (and b c))"
        );
    }

    #[test]
    fn test_assignment_right_associative() {
        assert_eq!(print_expr(&parse_expr("a = b = 3;")), "(= a (= b 3))");
    }

    #[test]
    fn test_statements() {
        let program = parse(
            "var int n = 3;\n\
             var s;\n\
             print n;\n\
             if (n > 1) print \"big\"; else { print \"small\"; }\n\
             while (n > 0) n = n - 1;\n\
             for i in 10 print i;",
        );
        assert_eq!(
            print_program(&program),
            "(var int n = 3)\n\
             (var s)\n\
             (print n)\n\
             (if (> n 1) (print \"big\") (block (print \"small\")))\n\
             (while (> n 0) (; (= n (- n 1))))\n\
             (for i 10 (print i))"
        );
    }

    #[test]
    fn test_statement_lines() {
        let program = parse("print 1;\n\nprint 2;");
        let lines: Vec<usize> = program.statements.iter().map(|s| s.span.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_invalid_assignment_target() {
        let errors = parse_errors("1 + 2 = 3;");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ParserError::InvalidAssignmentTarget(_)));
    }

    #[test]
    fn test_recovers_and_reports_multiple_errors() {
        let errors = parse_errors("print ;\nvar = 2;\nprint 3;\nvar x = (1;");
        assert_eq!(errors.len(), 3);
        let lines: Vec<usize> = errors.iter().map(|e| e.span().line).collect();
        assert_eq!(lines, vec![1, 2, 4]);
    }

    #[test]
    fn test_error_inside_block_recovers() {
        let errors = parse_errors("{ print ; print 2; }\nprint );");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_missing_semicolon() {
        let errors = parse_errors("print 1");
        assert!(matches!(errors[0], ParserError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_reserved_keyword() {
        let errors = parse_errors("class Foo;");
        assert!(errors[0].to_string().contains("reserved"));
    }

    fn nested_parens(depth: usize) -> String {
        format!("print {}1{};", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn test_nested_parens_within_limit() {
        let program = parse(&nested_parens(100));
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_expression_nesting_too_deep() {
        let errors = parse_errors(&nested_parens(MAX_NESTING));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("Expression nesting too deep"));

        let errors = parse_errors(&nested_parens(3000));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_unary_chain_too_deep() {
        let source = format!("print {}1;", "-".repeat(3000));
        let errors = parse_errors(&source);
        assert!(errors[0].to_string().contains("nesting too deep"));
    }

    #[test]
    fn test_statement_nesting_too_deep() {
        let source = format!("{}print 1;{}", "{".repeat(3000), "}".repeat(3000));
        let errors = parse_errors(&source);
        assert!(errors[0].to_string().starts_with("Statement nesting too deep"));
    }
}
