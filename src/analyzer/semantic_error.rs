use super::types::TypeTag;
use crate::diagnostics::{Diagnostic, Label, codes::*};
use crate::parser::ast::Ident;
use crate::utils::Span;

/// 类型检查错误。每一种都能在本地恢复：出错的节点变成 `Undefined`，检查继续。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    UndeclaredIdentifier(Ident),
    DuplicateDeclaration {
        name: Ident,
        previous: Span,
    },
    NotCallable {
        name: Ident,
        found: TypeTag,
    },
    FunctionUsedAsValue(Ident),
    ArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
        span: Span,
    },
    ArgumentTypeMismatch {
        callee: String,
        index: usize,
        expected: TypeTag,
        found: TypeTag,
        span: Span,
    },
    OperandTypeMismatch {
        operator: &'static str,
        expected: String,
        found: TypeTag,
        operand_span: Span,
        expression_span: Span,
    },
    BranchTypeMismatch {
        then_type: TypeTag,
        else_type: TypeTag,
        then_span: Span,
        else_span: Span,
    },
    NonBooleanCondition {
        found: TypeTag,
        span: Span,
    },
    NestingTooDeep {
        limit: usize,
        span: Span,
    },
    InitializerTypeMismatch {
        name: String,
        expected: TypeTag,
        found: TypeTag,
        span: Span,
    },
    UnsupportedUnionType {
        span: Span,
    },
    InternalError {
        message: String,
        span: Option<Span>,
    },
}

impl From<SemanticError> for Diagnostic {
    fn from(error: SemanticError) -> Self {
        match error {
            SemanticError::UndeclaredIdentifier(ident) => Diagnostic::error(
                &E0200_UNDECLARED_IDENTIFIER,
                Label::new(ident.span, format!("Cannot find '{}' in this scope", ident.name)),
            ),

            SemanticError::DuplicateDeclaration { name, previous } => Diagnostic::error(
                &E0201_DUPLICATE_DECLARATION,
                Label::new(name.span, format!("'{}' is declared again here", name.name)),
            )
            .with_secondary_label(Label::new(previous, "previous declaration is here")),

            SemanticError::NotCallable { name, found } => Diagnostic::error(
                &E0202_NOT_CALLABLE,
                Label::new(name.span, format!("'{}' has type `{}` and cannot be called", name.name, found)),
            ),

            SemanticError::FunctionUsedAsValue(ident) => Diagnostic::error(
                &E0203_FUNCTION_USED_AS_VALUE,
                Label::new(ident.span, format!("'{}' is a function; call it with `(...)`", ident.name)),
            ),

            SemanticError::ArityMismatch {
                callee,
                expected,
                found,
                span,
            } => Diagnostic::error(
                &E0204_ARITY_MISMATCH,
                Label::new(
                    span,
                    format!("'{}' expects {} argument(s), but {} were provided", callee, expected, found),
                ),
            ),

            SemanticError::ArgumentTypeMismatch {
                callee,
                index,
                expected,
                found,
                span,
            } => Diagnostic::error(
                &E0205_ARGUMENT_TYPE_MISMATCH,
                Label::new(span, format!("Expected type `{}`, but found type `{}`", expected, found)),
            )
            .with_dynamic_message(format!("Argument {} of '{}' has the wrong type", index + 1, callee)),

            SemanticError::OperandTypeMismatch {
                operator,
                expected,
                found,
                operand_span,
                expression_span,
            } => Diagnostic::error(
                &E0206_OPERAND_TYPE_MISMATCH,
                Label::new(operand_span, format!("Expected `{}`, but found `{}`", expected, found)),
            )
            .with_dynamic_message(format!("Operator `{}` cannot be applied to `{}`", operator, found))
            .with_secondary_label(Label::new(expression_span, format!("in this `{}` expression", operator))),

            SemanticError::BranchTypeMismatch {
                then_type,
                else_type,
                then_span,
                else_span,
            } => Diagnostic::error(
                &E0207_BRANCH_TYPE_MISMATCH,
                Label::new(else_span, format!("this branch has type `{}`", else_type)),
            )
            .with_secondary_label(Label::new(then_span, format!("this branch has type `{}`", then_type)))
            .with_note("declare the target variable with a union type to accept both"),

            SemanticError::NonBooleanCondition { found, span } => Diagnostic::error(
                &E0208_NON_BOOLEAN_CONDITION,
                Label::new(span, format!("Expected `bool`, but found `{}`", found)),
            ),

            SemanticError::NestingTooDeep { limit, span } => Diagnostic::error(
                &E0209_NESTING_TOO_DEEP,
                Label::new(span, format!("nesting exceeds the limit of {}", limit)),
            ),

            SemanticError::InitializerTypeMismatch {
                name,
                expected,
                found,
                span,
            } => Diagnostic::error(
                &E0211_INITIALIZER_TYPE_MISMATCH,
                Label::new(span, format!("Expected type `{}`, but found type `{}`", expected, found)),
            )
            .with_dynamic_message(format!("Cannot initialize '{}' with a value of type `{}`", name, found)),

            SemanticError::UnsupportedUnionType { span } => Diagnostic::error(
                &E0212_UNSUPPORTED_UNION_TYPE,
                Label::new(span, "no type tag covers all of these members"),
            ),

            SemanticError::InternalError { message, span } => {
                let final_span = span.unwrap_or_default();
                let label = Label::new(final_span, &message);

                Diagnostic::error(&E0210_INTERNAL_COMPILER_ERROR, label).with_dynamic_message(message)
            }
        }
    }
}
