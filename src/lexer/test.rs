// 导入父模块（也就是 lexer 模块）的所有内容
use super::*;

/// 辅助函数：只返回 Token 的向量（忽略 span），并断言没有词法错误。
fn lex_just_tokens(source: &str) -> Vec<Token> {
    let mut diagnostics = DiagnosticBag::new(source);
    let tokens = lex(source, &mut diagnostics);
    assert!(diagnostics.is_empty(), "unexpected lexing errors for: {}", source);
    tokens.into_iter().map(|(token, _span)| token).collect()
}

// --- 成功案例 ---

#[test]
fn test_keywords_and_identifiers() {
    let source = "var count: int = 10;";
    let expected_tokens = vec![
        Token::Var,
        Token::Ident("count".to_string()),
        Token::Colon,
        Token::TyInt,
        Token::Assign,
        Token::Integer("10".to_string()),
        Token::Semicolon,
    ];
    assert_eq!(lex_just_tokens(source), expected_tokens);
}

#[test]
fn test_keyword_prefix_is_identifier() {
    // 最长匹配：`integer` 不是 `int` 加 `eger`
    assert_eq!(
        lex_just_tokens("integer iffy"),
        vec![Token::Ident("integer".to_string()), Token::Ident("iffy".to_string())]
    );
}

#[test]
fn test_all_operators() {
    let source = "+ - * / % = == != < > <= >= && || ! : -> |";
    let expected_tokens = vec![
        Token::Plus, Token::Minus, Token::Star, Token::Slash, Token::Percent,
        Token::Assign, Token::Eq, Token::NotEq, Token::Lt, Token::Gt,
        Token::Lte, Token::Gte, Token::And, Token::Or, Token::Not,
        Token::Colon, Token::Arrow, Token::Pipe,
    ];
    assert_eq!(lex_just_tokens(source), expected_tokens);
}

#[test]
fn test_logical_keywords_match_symbols() {
    assert_eq!(lex_just_tokens("a and b or not c"), lex_just_tokens("a && b || ! c"));
    // 只有完整的单词才是关键字
    assert_eq!(lex_just_tokens("android"), vec![Token::Ident("android".to_string())]);
}

#[test]
fn test_type_names_and_booleans() {
    assert_eq!(
        lex_just_tokens("int|str bool any true false"),
        vec![
            Token::TyInt,
            Token::Pipe,
            Token::TyStr,
            Token::TyBool,
            Token::TyAny,
            Token::Boolean(true),
            Token::Boolean(false),
        ]
    );
}

#[test]
fn test_comments_and_whitespace_are_skipped() {
    let source = r#"
        // 单行注释
        var /* 块
               注释 */ x;
    "#;
    assert_eq!(
        lex_just_tokens(source),
        vec![Token::Var, Token::Ident("x".to_string()), Token::Semicolon]
    );
}

#[test]
fn test_string_literal_escapes() {
    let tokens = lex_just_tokens(r#""a\"b\n" "plain""#);
    assert_eq!(
        tokens,
        vec![Token::String("a\"b\n".to_string()), Token::String("plain".to_string())]
    );
}

#[test]
fn test_spans_are_byte_ranges() {
    let source = "f(ab)";
    let mut diagnostics = DiagnosticBag::new(source);
    let tokens = lex(source, &mut diagnostics);
    assert_eq!(tokens[2], (Token::Ident("ab".to_string()), Span::new(2, 4)));
}

// --- 失败案例 ---

#[test]
fn test_unrecognized_character() {
    let source = "var x: int = 1 @ 2;";
    let mut diagnostics = DiagnosticBag::new(source);
    let tokens = lex(source, &mut diagnostics);

    assert_eq!(diagnostics.len(), 1);
    let diag = diagnostics.iter().next().unwrap();
    assert_eq!(diag.code(), "E0000");
    assert_eq!(diag.primary_span(), Span::new(15, 16));

    // 出错的字符被跳过，其余的 Token 照常产生
    assert_eq!(tokens.len(), 8);
}

#[test]
fn test_unterminated_string_is_an_error() {
    let source = r#""never closed"#;
    let mut diagnostics = DiagnosticBag::new(source);
    lex(source, &mut diagnostics);
    assert!(diagnostics.has_errors());
}
