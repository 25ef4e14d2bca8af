// src/parser/parsers.rs

use crate::lexer::Token;
use crate::parser::ast::*;
use crate::utils::Span;
use chumsky::input::ValueInput;
use chumsky::prelude::*;

pub(super) type ParseError<'a> = extra::Err<Rich<'a, Token, Span>>;

/// 构建完整的 chumsky 解析器。
/// 此函数为内部实现细节，仅对父模块 `mod.rs` 可见。
pub(super) fn program_parser<'a, I>() -> impl Parser<'a, I, Program, ParseError<'a>>
where
    I: Input<'a, Token = Token, Span = Span> + ValueInput<'a>,
{
    let mut item = Recursive::declare();

    let ident = select! { Token::Ident(name) = e => Ident { name, span: e.span() } }.labelled("identifier");
    let type_spec = type_spec_parser().boxed();
    let expr = expression_parser().boxed();

    // var name: type (= expr)? ;
    let var_decl = just(Token::Var)
        .ignore_then(ident.clone())
        .then_ignore(just(Token::Colon))
        .then(type_spec.clone())
        .then(just(Token::Assign).ignore_then(expr.clone()).or_not())
        .then_ignore(just(Token::Semicolon))
        .map_with(|((name, type_spec), init), e| VarDecl {
            name,
            type_spec,
            init,
            span: e.span(),
        })
        .labelled("variable declaration");

    // 参数的类型标注可以省略：`fn f(a, b: int) -> int;`
    let param = ident
        .clone()
        .then(just(Token::Colon).ignore_then(type_spec.clone()).or_not())
        .map(|(name, type_spec)| Param { name, type_spec });

    let fn_decl = just(Token::Fn)
        .ignore_then(ident.clone())
        .then(
            param
                .separated_by(just(Token::Comma))
                .allow_trailing()
                .collect()
                .delimited_by(just(Token::LParen), just(Token::RParen)),
        )
        .then(just(Token::Arrow).ignore_then(type_spec.clone()))
        .then_ignore(just(Token::Semicolon))
        .map_with(|((name, params), return_type), e| FnDecl {
            name,
            params,
            return_type,
            span: e.span(),
        })
        .labelled("function declaration");

    let block = item
        .clone()
        .repeated()
        .collect()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .map_with(|items, e| Block { items, span: e.span() })
        .labelled("block");

    item.define(choice((
        var_decl.map(Item::VarDecl),
        fn_decl.map(Item::FnDecl),
        block.map(Item::Block),
        expr.then_ignore(just(Token::Semicolon)).map(Item::Expr),
    )));

    item.repeated()
        .collect()
        .map_with(|items, e| Program { items, span: e.span() })
        .then_ignore(end())
}

/// 表达式解析器。优先级从低到高：`||`、`&&`、相等、比较、加减、乘除、一元、调用与原子。
pub(super) fn expression_parser<'a, I>() -> impl Parser<'a, I, Expression, ParseError<'a>> + Clone
where
    I: Input<'a, Token = Token, Span = Span> + ValueInput<'a>,
{
    let mut expr = Recursive::declare();

    let ident = select! { Token::Ident(name) = e => Ident { name, span: e.span() } }.labelled("identifier");

    expr.define({
        let literal = select! {
            Token::Integer(val) = e => Expression { kind: ExprKind::Literal(LiteralValue::Integer(val)), span: e.span() },
            Token::String(s) = e => Expression { kind: ExprKind::Literal(LiteralValue::String(s)), span: e.span() },
            Token::Boolean(b) = e => Expression { kind: ExprKind::Literal(LiteralValue::Bool(b)), span: e.span() },
        }
        .labelled("literal");

        // 有参数列表就是调用，否则就是变量
        let call_or_variable = ident
            .then(
                expr.clone()
                    .separated_by(just(Token::Comma))
                    .allow_trailing()
                    .collect()
                    .delimited_by(just(Token::LParen), just(Token::RParen))
                    .or_not(),
            )
            .map_with(|(name, args), e| match args {
                Some(args) => Expression {
                    kind: ExprKind::Call { callee: name, args },
                    span: e.span(),
                },
                None => Expression {
                    span: name.span,
                    kind: ExprKind::Variable(name),
                },
            });

        let conditional = just(Token::If)
            .ignore_then(expr.clone())
            .then_ignore(just(Token::Then))
            .then(expr.clone())
            .then_ignore(just(Token::Else))
            .then(expr.clone())
            .map_with(|((condition, then_branch), else_branch), e| Expression {
                kind: ExprKind::Conditional {
                    condition: Box::new(condition),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                },
                span: e.span(),
            })
            .labelled("conditional");

        let atom = choice((
            literal,
            conditional,
            call_or_variable,
            expr.clone().delimited_by(just(Token::LParen), just(Token::RParen)),
        ));

        // --- 运算符优先级金字塔 ---
        let op = |c| just(c);

        let unary_op = op(Token::Minus).to(UnaryOp::Negate).or(op(Token::Not).to(UnaryOp::Not));
        let unary = unary_op
            .map_with(|op, e| (op, e.span()))
            .repeated()
            .foldr(atom, |(op, op_span): (UnaryOp, Span), operand| Expression {
                span: op_span.to(operand.span),
                kind: ExprKind::UnaryOp {
                    op,
                    operand: Box::new(operand),
                },
            });

        let product_op = op(Token::Star)
            .to(BinaryOp::Multiply)
            .or(op(Token::Slash).to(BinaryOp::Divide))
            .or(op(Token::Percent).to(BinaryOp::Modulo));
        let product = unary.clone().foldl(product_op.then(unary).repeated(), fold_binary);

        let sum_op = op(Token::Plus).to(BinaryOp::Add).or(op(Token::Minus).to(BinaryOp::Subtract));
        let sum = product.clone().foldl(sum_op.then(product).repeated(), fold_binary);

        let relational_op = op(Token::Lt)
            .to(BinaryOp::Lt)
            .or(op(Token::Lte).to(BinaryOp::Lte))
            .or(op(Token::Gt).to(BinaryOp::Gt))
            .or(op(Token::Gte).to(BinaryOp::Gte));
        let relation = sum.clone().foldl(relational_op.then(sum).repeated(), fold_binary);

        let equality_op = op(Token::Eq).to(BinaryOp::Eq).or(op(Token::NotEq).to(BinaryOp::NotEq));
        let equality = relation.clone().foldl(equality_op.then(relation).repeated(), fold_binary);

        let logical_and = equality
            .clone()
            .foldl(op(Token::And).to(BinaryOp::And).then(equality).repeated(), fold_binary);

        logical_and
            .clone()
            .foldl(op(Token::Or).to(BinaryOp::Or).then(logical_and).repeated(), fold_binary)
            .labelled("expression")
    });

    expr
}

fn fold_binary(left: Expression, (op, right): (BinaryOp, Expression)) -> Expression {
    let span = left.span.to(right.span);
    Expression {
        kind: ExprKind::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    }
}

/// 类型标注：一个或多个基础类型，用 `|` 连接。
fn type_spec_parser<'a, I>() -> impl Parser<'a, I, TypeSpec, ParseError<'a>>
where
    I: Input<'a, Token = Token, Span = Span> + ValueInput<'a>,
{
    let base_type = select! {
        Token::TyInt => BaseType::Int,
        Token::TyStr => BaseType::Str,
        Token::TyBool => BaseType::Bool,
        Token::TyAny => BaseType::Any,
    };

    base_type
        .separated_by(just(Token::Pipe))
        .at_least(1)
        .collect()
        .map_with(|members, e| TypeSpec { members, span: e.span() })
        .labelled("type")
}
