// In src/analyzer/expression.rs

use super::{AnalysisContext, Resolve};
use crate::analyzer::{
    lattice::{covers, is_compatible, join},
    operators::{OperatorRule, OperatorSymbol, classify},
    semantic_error::SemanticError,
    types::TypeTag,
};
use crate::parser::ast::{self, BinaryOp, UnaryOp};
use crate::utils::Span;

// 表达式解析分发器
impl Resolve for ast::Expression {
    fn resolve(&self, ctx: &mut AnalysisContext<'_>) -> TypeTag {
        if ctx.depth >= ctx.max_depth {
            if !ctx.depth_exceeded {
                ctx.depth_exceeded = true;
                log::debug!("nesting limit {} reached at {:?}", ctx.max_depth, self.span);
                ctx.report(SemanticError::NestingTooDeep {
                    limit: ctx.max_depth,
                    span: self.span,
                });
            }
            return TypeTag::Undefined;
        }

        ctx.depth += 1;
        let resolved = match &self.kind {
            ast::ExprKind::Literal(literal) => resolve_literal(literal),
            ast::ExprKind::Variable(ident) => resolve_variable(ident, ctx),
            ast::ExprKind::Call { callee, args } => resolve_call(callee, args, &self.span, ctx),
            ast::ExprKind::UnaryOp { op, operand } => resolve_unary_op(*op, operand, &self.span, ctx),
            ast::ExprKind::BinaryOp { op, left, right } => resolve_binary_op(*op, left, right, &self.span, ctx),
            ast::ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => resolve_conditional(condition, then_branch, else_branch, ctx),
        };
        ctx.depth -= 1;

        log::trace!("{:?} resolved to {}", self.span, resolved);
        resolved
    }
}

fn resolve_literal(literal: &ast::LiteralValue) -> TypeTag {
    match literal {
        ast::LiteralValue::Integer(_) => TypeTag::Int,
        ast::LiteralValue::String(_) => TypeTag::Str,
        ast::LiteralValue::Bool(_) => TypeTag::Bool,
    }
}

fn resolve_variable(ident: &ast::Ident, ctx: &mut AnalysisContext<'_>) -> TypeTag {
    let symbol_table = ctx.symbol_table;
    match symbol_table.lookup(&ident.name) {
        Some(info) if info.is_function() => {
            ctx.report(SemanticError::FunctionUsedAsValue(ident.clone()));
            TypeTag::Undefined
        }
        Some(info) => info.kind(),
        None => {
            ctx.report(SemanticError::UndeclaredIdentifier(ident.clone()));
            TypeTag::Undefined
        }
    }
}

fn resolve_call(
    callee: &ast::Ident,
    args: &[ast::Expression],
    span: &Span,
    ctx: &mut AnalysisContext<'_>,
) -> TypeTag {
    let symbol_table = ctx.symbol_table;
    let signature = match symbol_table.lookup(&callee.name) {
        Some(info) => match info.signature() {
            Some(signature) => Some(signature),
            None => {
                ctx.report(SemanticError::NotCallable {
                    name: callee.clone(),
                    found: info.kind(),
                });
                None
            }
        },
        None => {
            ctx.report(SemanticError::UndeclaredIdentifier(callee.clone()));
            None
        }
    };

    let Some(signature) = signature else {
        // 被调用者有问题时，参数里独立的错误也要报告出来
        for arg in args {
            ctx.resolve_expecting(arg, None);
        }
        return TypeTag::Undefined;
    };

    // 参数个数不对不影响调用的类型，外层表达式可以继续检查
    if args.len() != signature.param_count {
        ctx.report(SemanticError::ArityMismatch {
            callee: callee.name.clone(),
            expected: signature.param_count,
            found: args.len(),
            span: *span,
        });
    }

    let mut has_undefined_arg = false;
    for (index, arg) in args.iter().enumerate() {
        let param_type = signature
            .param_types
            .as_ref()
            .and_then(|types| types.get(index))
            .copied();
        let arg_type = ctx.resolve_expecting(arg, param_type);

        if arg_type == TypeTag::Undefined {
            has_undefined_arg = true;
            continue;
        }
        if let Some(expected) = param_type {
            if !is_compatible(expected, arg_type) {
                ctx.report(SemanticError::ArgumentTypeMismatch {
                    callee: callee.name.clone(),
                    index,
                    expected,
                    found: arg_type,
                    span: arg.span,
                });
            }
        }
    }

    if has_undefined_arg {
        TypeTag::Undefined
    } else {
        signature.return_type
    }
}

fn rule_for(op: OperatorSymbol, span: &Span, ctx: &mut AnalysisContext<'_>) -> Option<&'static OperatorRule> {
    let rule = classify(op);
    if rule.is_none() {
        ctx.internal_error(format!("operator `{}` has no classification rule", op), *span);
    }
    rule
}

fn resolve_unary_op(
    op: UnaryOp,
    operand: &ast::Expression,
    span: &Span,
    ctx: &mut AnalysisContext<'_>,
) -> TypeTag {
    // 操作数没有特定的期望类型
    let operand_type = ctx.resolve_expecting(operand, None);

    let Some(rule) = rule_for(OperatorSymbol::Unary(op), span, ctx) else {
        return TypeTag::Undefined;
    };
    if operand_type == TypeTag::Undefined {
        return TypeTag::Undefined;
    }

    if !rule.accepts(operand_type) {
        ctx.report(SemanticError::OperandTypeMismatch {
            operator: op.symbol(),
            expected: rule.describe_accepted(),
            found: operand_type,
            operand_span: operand.span,
            expression_span: *span,
        });
        return TypeTag::Undefined;
    }

    rule.result_type
}

fn resolve_binary_op(
    op: BinaryOp,
    left: &ast::Expression,
    right: &ast::Expression,
    span: &Span,
    ctx: &mut AnalysisContext<'_>,
) -> TypeTag {
    // 两边都先解析，这样两边各自的错误都能报告
    let left_type = ctx.resolve_expecting(left, None);
    let right_type = ctx.resolve_expecting(right, None);

    let Some(rule) = rule_for(OperatorSymbol::Binary(op), span, ctx) else {
        return TypeTag::Undefined;
    };
    if left_type == TypeTag::Undefined || right_type == TypeTag::Undefined {
        return TypeTag::Undefined;
    }

    // 每个节点最多一条诊断：先报告左边的问题
    let offending = [(left, left_type), (right, right_type)]
        .into_iter()
        .find(|(_, operand_type)| !rule.accepts(*operand_type));
    if let Some((operand, operand_type)) = offending {
        ctx.report(SemanticError::OperandTypeMismatch {
            operator: op.symbol(),
            expected: rule.describe_accepted(),
            found: operand_type,
            operand_span: operand.span,
            expression_span: *span,
        });
        return TypeTag::Undefined;
    }

    if rule.same_operand_type && rule.common_operand_type(left_type, right_type).is_none() {
        // 左边决定期望的类型
        let expected = rule
            .narrow_operand(left_type)
            .map_or_else(|| rule.describe_accepted(), |tag| tag.to_string());
        ctx.report(SemanticError::OperandTypeMismatch {
            operator: op.symbol(),
            expected,
            found: right_type,
            operand_span: right.span,
            expression_span: *span,
        });
        return TypeTag::Undefined;
    }

    rule.result_type
}

fn resolve_conditional(
    condition: &ast::Expression,
    then_branch: &ast::Expression,
    else_branch: &ast::Expression,
    ctx: &mut AnalysisContext<'_>,
) -> TypeTag {
    let expected = ctx.expected_type;

    let condition_type = ctx.resolve_expecting(condition, Some(TypeTag::Bool));
    let condition_ok = is_compatible(TypeTag::Bool, condition_type);
    if !condition_ok {
        ctx.report(SemanticError::NonBooleanCondition {
            found: condition_type,
            span: condition.span,
        });
    }

    // 分支继承外部的期望类型
    let then_type = ctx.resolve_expecting(then_branch, expected);
    let else_type = ctx.resolve_expecting(else_branch, expected);

    if !condition_ok || condition_type == TypeTag::Undefined {
        return TypeTag::Undefined;
    }
    if then_type == TypeTag::Undefined || else_type == TypeTag::Undefined {
        return TypeTag::Undefined;
    }

    match join(then_type, else_type) {
        // 一个分支已经覆盖了另一个
        Some(joined) if joined == then_type || joined == else_type => joined,
        // 只有更宽的联合类型能同时容纳两个分支：需要外部上下文明确允许
        Some(joined) if expected.is_some_and(|context| covers(context, joined)) => joined,
        _ => {
            ctx.report(SemanticError::BranchTypeMismatch {
                then_type,
                else_type,
                then_span: then_branch.span,
                else_span: else_branch.span,
            });
            TypeTag::Undefined
        }
    }
}
