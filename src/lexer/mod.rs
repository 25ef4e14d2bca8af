// 导入logos分词库
use logos::Logos;
use crate::diagnostics::{Diagnostic, DiagnosticBag, Label, codes::E0000_UNRECOGNIZED_CHAR};
use crate::utils::Span;
use std::fmt;

// 声明单元测试模块
#[cfg(test)]
mod test;

// logos 解析时需要使用的错误类型
#[derive(Debug, Default, Clone, PartialEq)]
pub enum LexingError {
    #[default]
    InvalidToken,
}

/// 词素定义
#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)]
#[logos(error = LexingError)]
// 跳过空白
#[logos(skip r"[ \t\r\n\f]+")]
// 跳过单行注释
#[logos(skip r"//[^\n]*")]
// 跳过块注释
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum Token {
    // 关键字
    #[token("var")]
    Var,
    #[token("fn")]
    Fn,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,

    // 类型名
    #[token("int")]
    TyInt,
    #[token("str")]
    TyStr,
    #[token("bool")]
    TyBool,
    #[token("any")]
    TyAny,

    // 布尔字面量
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Boolean(bool),

    // 整数字面量，只关心类型，保留原始文本
    #[regex("[0-9]+", |lex| lex.slice().to_string())]
    Integer(String),

    #[regex(r#""([^"\\]|\\.)*""#, lex_string_literal)]
    String(String),

    #[regex("[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // 运算符号。逻辑运算符也可以写成关键字 `and` `or` `not`
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Assign,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Lte,
    #[token(">=")]
    Gte,
    #[token("&&")]
    #[token("and")]
    And,
    #[token("||")]
    #[token("or")]
    Or,
    #[token("!")]
    #[token("not")]
    Not,

    // 连接符号
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,
    #[token("|")]
    Pipe,

    // 分割符号
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
}

// 语法错误信息里用源代码的写法显示 Token
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Token::Var => "var",
            Token::Fn => "fn",
            Token::If => "if",
            Token::Then => "then",
            Token::Else => "else",
            Token::TyInt => "int",
            Token::TyStr => "str",
            Token::TyBool => "bool",
            Token::TyAny => "any",
            Token::Boolean(b) => return write!(f, "{}", b),
            Token::Integer(s) => return write!(f, "{}", s),
            Token::String(s) => return write!(f, "{:?}", s),
            Token::Ident(name) => return write!(f, "{}", name),
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Assign => "=",
            Token::Eq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Lte => "<=",
            Token::Gte => ">=",
            Token::And => "&&",
            Token::Or => "||",
            Token::Not => "!",
            Token::Colon => ":",
            Token::Arrow => "->",
            Token::Pipe => "|",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Semicolon => ";",
            Token::Comma => ",",
        };
        f.write_str(text)
    }
}

/// 字符串字面量的辅助解析函数：去除首尾引号并处理转义字符。
fn lex_string_literal(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut s = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => s.push('\n'),
                Some('t') => s.push('\t'),
                Some('r') => s.push('\r'),
                Some('\\') => s.push('\\'),
                Some('"') => s.push('"'),
                // 无法识别的转义序列按原样保留
                Some(other) => {
                    s.push('\\');
                    s.push(other);
                }
                None => return None,
            }
        } else {
            s.push(c);
        }
    }
    Some(s)
}

/// 对源代码进行词法分析，返回 Token 向量，并将所有词法错误报告给 DiagnosticBag。
pub fn lex(source: &str, diagnostics: &mut DiagnosticBag) -> Vec<(Token, Span)> {
    let mut tokens = Vec::new();

    for (result, range) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, range.into())),
            Err(_) => {
                // LexingError 本身不带字符信息，从源代码里取出来
                let unrecognized_char = source[range.clone()].chars().next().unwrap_or_default();
                diagnostics.report(Diagnostic::error(
                    &E0000_UNRECOGNIZED_CHAR,
                    Label::new(range.into(), format!("'{}' is not part of the language", unrecognized_char)),
                ));
            }
        }
    }

    log::trace!("lexed {} tokens", tokens.len());
    tokens
}
