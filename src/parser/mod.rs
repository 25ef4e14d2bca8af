//! src/parser/mod.rs
//!
//! 语法分析阶段的公共接口：源代码 -> Token 流 -> 语法树。

pub mod ast;
mod parsers;

#[cfg(test)]
mod test;

use crate::analyzer::{DEFAULT_MAX_DEPTH, SemanticError};
use crate::diagnostics::{Diagnostic, DiagnosticBag, Label, codes::E0100_SYNTAX_ERROR};
use crate::lexer::{self, Token};
use crate::parser::ast::Program;
use crate::utils::Span;
use chumsky::Parser;
use chumsky::input::{Input, Stream};
use parsers::program_parser;

/// parser 模块的公共入口，使用默认的嵌套上限。
///
/// 词法错误和语法错误都报告给 `diagnostics`。出现任何一种错误时返回 `None`，
/// 这时不应该再继续做类型检查。
pub fn parse(source: &str, diagnostics: &mut DiagnosticBag) -> Option<Program> {
    parse_with_limit(source, DEFAULT_MAX_DEPTH, diagnostics)
}

/// 同 [`parse`]，但括号、代码块和 `if` 的嵌套超过 `max_nesting` 时直接报告
/// `NestingTooDeep`，不进入递归下降。
pub fn parse_with_limit(source: &str, max_nesting: usize, diagnostics: &mut DiagnosticBag) -> Option<Program> {
    let tokens = lexer::lex(source, diagnostics);
    let lexed_cleanly = !diagnostics.has_errors();

    if !check_nesting(&tokens, max_nesting, diagnostics) {
        return None;
    }

    // 文件末尾的位置，代码意外结束时用来报告错误
    let eoi_span = Span::new(source.len(), source.len());
    let token_stream = Stream::from_iter(tokens).map(eoi_span, |(token, span)| (token, span));

    let (ast, parse_errors) = program_parser().parse(token_stream).into_output_errors();

    let had_errors = !parse_errors.is_empty() || !lexed_cleanly;
    for error in parse_errors {
        let found = error
            .found()
            .map_or("end of input".to_string(), |tok| format!("`{}`", tok));

        let expected = if error.expected().len() == 0 {
            "something else".to_string()
        } else {
            error
                .expected()
                .map(|expected_pattern| expected_pattern.to_string())
                .collect::<Vec<_>>()
                .join(" or ")
        };

        diagnostics.report(
            Diagnostic::error(
                &E0100_SYNTAX_ERROR,
                Label::new(*error.span(), format!("Expected {}, but found {}", expected, found)),
            )
            .with_dynamic_message(format!("Unexpected {}", found)),
        );
    }

    if had_errors {
        log::debug!("parsing failed");
        return None;
    }
    ast
}

/// 在 Token 流上估计解析时的递归深度。
///
/// 每个 `(` 和 `{` 开一层；`if` 在它所在的表达式结束（`;` 或 `,`）或所在的括号闭合之前
/// 一直占一层，因为 `else if` 链也是逐层递归解析的。超过上限时报告一次并返回 `false`。
fn check_nesting(tokens: &[(Token, Span)], max_nesting: usize, diagnostics: &mut DiagnosticBag) -> bool {
    // 每个括号层里尚未结束的 `if` 个数
    let mut frames: Vec<usize> = vec![0];
    let mut depth = 0;

    for (token, span) in tokens {
        match token {
            Token::LParen | Token::LBrace => {
                frames.push(0);
                depth += 1;
            }
            Token::RParen | Token::RBrace => {
                // 不配对的右括号留给语法分析报告
                if frames.len() > 1 {
                    let open_ifs = frames.pop().unwrap_or_default();
                    depth -= 1 + open_ifs;
                }
            }
            Token::If => {
                if let Some(open_ifs) = frames.last_mut() {
                    *open_ifs += 1;
                }
                depth += 1;
            }
            Token::Semicolon | Token::Comma => {
                if let Some(open_ifs) = frames.last_mut() {
                    depth -= *open_ifs;
                    *open_ifs = 0;
                }
            }
            _ => {}
        }

        if depth > max_nesting {
            log::debug!("token nesting exceeds {} at {:?}", max_nesting, span);
            diagnostics.report(
                SemanticError::NestingTooDeep {
                    limit: max_nesting,
                    span: *span,
                }
                .into(),
            );
            return false;
        }
    }
    true
}
