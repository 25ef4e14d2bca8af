use super::ast::*;
use super::*; // 主要是 `parse` 函数
use pretty_assertions::assert_eq;

/// 辅助函数：成功路径。出现任何诊断都会 panic，否则返回 AST。
fn parse_source_ok(source: &str) -> Program {
    let mut diagnostics = DiagnosticBag::new(source);
    let ast = parse(source, &mut diagnostics);
    assert!(
        diagnostics.is_empty(),
        "Parser failed unexpectedly for source: {}\n{:?}",
        source,
        diagnostics.iter().map(|d| d.message().to_string()).collect::<Vec<_>>()
    );
    ast.expect("Parser returned no AST despite reporting no errors.")
}

/// 辅助函数：失败路径。返回所有诊断的错误码。
fn parse_source_fail(source: &str) -> Vec<&'static str> {
    let mut diagnostics = DiagnosticBag::new(source);
    let ast = parse(source, &mut diagnostics);
    assert!(ast.is_none(), "Parser should not produce an AST for: {}", source);
    diagnostics.iter().map(|d| d.code()).collect()
}

/// 辅助函数：解析单个表达式语句。
fn parse_expr(source: &str) -> Expression {
    let program = parse_source_ok(source);
    match program.items.into_iter().next() {
        Some(Item::Expr(expr)) => expr,
        other => panic!("Expected an expression statement, got {:?}", other),
    }
}

// --- 成功路径测试 ---

#[test]
fn test_declarations() {
    let source = r#"
        var x: int = 1;
        var y: int|str;
        fn f(a: int, b) -> bool;
    "#;
    let ast = parse_source_ok(source);
    assert_eq!(ast.items.len(), 3);

    match &ast.items[0] {
        Item::VarDecl(decl) => {
            assert_eq!(decl.name.name, "x");
            assert_eq!(decl.type_spec.members, vec![BaseType::Int]);
            assert!(decl.init.is_some());
        }
        other => panic!("Expected a variable declaration, got {:?}", other),
    }

    match &ast.items[1] {
        Item::VarDecl(decl) => {
            assert_eq!(decl.type_spec.members, vec![BaseType::Int, BaseType::Str]);
            assert!(decl.init.is_none());
        }
        other => panic!("Expected a variable declaration, got {:?}", other),
    }

    match &ast.items[2] {
        Item::FnDecl(decl) => {
            assert_eq!(decl.name.name, "f");
            assert_eq!(decl.params.len(), 2);
            assert!(decl.params[0].type_spec.is_some());
            assert!(decl.params[1].type_spec.is_none());
            assert_eq!(decl.return_type.members, vec![BaseType::Bool]);
        }
        other => panic!("Expected a function declaration, got {:?}", other),
    }
}

#[test]
fn test_nested_blocks() {
    let ast = parse_source_ok("{ var x: int; { x; } }");
    assert_eq!(ast.items.len(), 1);
    match &ast.items[0] {
        Item::Block(block) => {
            assert_eq!(block.items.len(), 2);
            assert!(matches!(&block.items[1], Item::Block(inner) if inner.items.len() == 1));
        }
        other => panic!("Expected a block, got {:?}", other),
    }
}

#[test]
fn test_operator_precedence() {
    // 1 + 2 * 3 应该被解析为 1 + (2 * 3)
    let expr = parse_expr("1 + 2 * 3;");
    match expr.kind {
        ExprKind::BinaryOp { op: BinaryOp::Add, right, .. } => {
            assert!(matches!(right.kind, ExprKind::BinaryOp { op: BinaryOp::Multiply, .. }));
        }
        other => panic!("Expected an addition at the root, got {:?}", other),
    }

    // a || b && c 应该被解析为 a || (b && c)
    let expr = parse_expr("a || b && c;");
    assert!(matches!(expr.kind, ExprKind::BinaryOp { op: BinaryOp::Or, .. }));

    // 1 < 2 == true 应该被解析为 (1 < 2) == true
    let expr = parse_expr("1 < 2 == true;");
    match expr.kind {
        ExprKind::BinaryOp { op: BinaryOp::Eq, left, .. } => {
            assert!(matches!(left.kind, ExprKind::BinaryOp { op: BinaryOp::Lt, .. }));
        }
        other => panic!("Expected an equality at the root, got {:?}", other),
    }
}

#[test]
fn test_left_associativity() {
    // 1 - 2 - 3 应该被解析为 (1 - 2) - 3
    let expr = parse_expr("1 - 2 - 3;");
    match expr.kind {
        ExprKind::BinaryOp { op: BinaryOp::Subtract, left, .. } => {
            assert!(matches!(left.kind, ExprKind::BinaryOp { op: BinaryOp::Subtract, .. }));
        }
        other => panic!("Expected a subtraction at the root, got {:?}", other),
    }
}

#[test]
fn test_unary_spans_cover_operator() {
    let expr = parse_expr("!!flag;");
    assert_eq!(expr.span, Span::new(0, 6));
    match expr.kind {
        ExprKind::UnaryOp { op: UnaryOp::Not, operand } => {
            assert_eq!(operand.span, Span::new(1, 6));
            assert!(matches!(operand.kind, ExprKind::UnaryOp { op: UnaryOp::Not, .. }));
        }
        other => panic!("Expected a unary operation, got {:?}", other),
    }
}

#[test]
fn test_calls_and_variables() {
    let expr = parse_expr("f(1, g(x), y);");
    match expr.kind {
        ExprKind::Call { callee, args } => {
            assert_eq!(callee.name, "f");
            assert_eq!(args.len(), 3);
            assert!(matches!(&args[1].kind, ExprKind::Call { args, .. } if args.len() == 1));
            assert!(matches!(&args[2].kind, ExprKind::Variable(ident) if ident.name == "y"));
        }
        other => panic!("Expected a call, got {:?}", other),
    }

    // 空参数列表也是调用
    assert!(matches!(parse_expr("f();").kind, ExprKind::Call { args, .. } if args.is_empty()));
}

#[test]
fn test_conditional_expression() {
    let source = r#"if a then 1 else "x";"#;
    let expr = parse_expr(source);
    assert_eq!(expr.span, Span::new(0, source.len() - 1));
    match expr.kind {
        ExprKind::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            assert!(matches!(condition.kind, ExprKind::Variable(_)));
            assert!(matches!(then_branch.kind, ExprKind::Literal(LiteralValue::Integer(_))));
            assert!(matches!(else_branch.kind, ExprKind::Literal(LiteralValue::String(_))));
        }
        other => panic!("Expected a conditional, got {:?}", other),
    }
}

#[test]
fn test_parenthesized_expression() {
    let expr = parse_expr("(1 + 2) * 3;");
    assert!(matches!(expr.kind, ExprKind::BinaryOp { op: BinaryOp::Multiply, .. }));
}

// --- 失败路径测试 ---

#[test]
fn test_missing_semicolon() {
    assert_eq!(parse_source_fail("var x: int = 1"), vec!["E0100"]);
}

#[test]
fn test_missing_else_branch() {
    assert_eq!(parse_source_fail("if a then 1;"), vec!["E0100"]);
}

#[test]
fn test_lexing_errors_are_reported_through_parse() {
    let codes = parse_source_fail("var x: int = 1 $ 2;");
    assert!(codes.contains(&"E0000"));
    assert!(codes.contains(&"E0100"));
}

// --- 嵌套上限 ---

#[test]
fn test_nesting_limit_counts_brackets() {
    let mut diagnostics = DiagnosticBag::new("((1));");
    assert!(parse_with_limit("((1));", 2, &mut diagnostics).is_some());
    assert!(diagnostics.is_empty());

    let mut diagnostics = DiagnosticBag::new("((1));");
    assert!(parse_with_limit("((1));", 1, &mut diagnostics).is_none());
    assert_eq!(diagnostics.iter().map(|d| d.code()).collect::<Vec<_>>(), vec!["E0209"]);
    // 报告在第一个超出上限的 Token 上
    assert_eq!(diagnostics.iter().next().unwrap().primary_span(), Span::new(1, 2));
}

#[test]
fn test_nesting_limit_releases_finished_conditionals() {
    // 逗号结束前一个参数里的 `if`，所以两个参数都只有两层
    let source = "f(if a then 1 else 2, if b then 1 else 2); if a then 1 else 2;";
    let mut diagnostics = DiagnosticBag::new(source);
    assert!(parse_with_limit(source, 2, &mut diagnostics).is_some());
    assert!(diagnostics.is_empty());

    let chained = "if a then 1 else if b then 2 else 3;";
    let mut diagnostics = DiagnosticBag::new(chained);
    assert!(parse_with_limit(chained, 1, &mut diagnostics).is_none());
    assert_eq!(diagnostics.iter().map(|d| d.code()).collect::<Vec<_>>(), vec!["E0209"]);
}
