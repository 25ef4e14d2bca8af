// In src/analyzer/statement.rs

use super::{Analyzer, semantic_error::SemanticError};
use crate::analyzer::{
    lattice::{is_compatible, join},
    types::{TypeInfo, TypeTag},
};
use crate::diagnostics::{Diagnostic, Label, codes::W0200_SHADOWED_DECLARATION};
use crate::parser::ast;
use crate::utils::Span;

/// 一个表达式语句及其解析出的类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedExpression {
    pub span: Span,
    pub resolved_type: TypeTag,
}

pub(super) fn check_items(analyzer: &mut Analyzer<'_>, items: &[ast::Item], resolved: &mut Vec<ResolvedExpression>) {
    for item in items {
        match item {
            ast::Item::VarDecl(decl) => check_var_decl(analyzer, decl),
            ast::Item::FnDecl(decl) => check_fn_decl(analyzer, decl),
            ast::Item::Block(block) => {
                analyzer.symbol_table.enter_scope();
                check_items(analyzer, &block.items, resolved);
                analyzer.symbol_table.exit_scope();
            }
            ast::Item::Expr(expr) => {
                let resolved_type = analyzer.resolve(expr);
                resolved.push(ResolvedExpression {
                    span: expr.span,
                    resolved_type,
                });
            }
        }
    }
}

fn check_var_decl(analyzer: &mut Analyzer<'_>, decl: &ast::VarDecl) {
    let declared = resolve_type_spec(analyzer, &decl.type_spec);

    if let Some(init) = &decl.init {
        let found = analyzer.resolve_expecting(init, declared);
        if !is_compatible(declared, found) {
            analyzer.report(SemanticError::InitializerTypeMismatch {
                name: decl.name.name.clone(),
                expected: declared,
                found,
                span: init.span,
            });
        }
    }

    // 初始值在声明之前解析，所以 `var x: int = x;` 看到的是外层的 x
    declare(analyzer, &decl.name, TypeInfo::value(declared));
}

fn check_fn_decl(analyzer: &mut Analyzer<'_>, decl: &ast::FnDecl) {
    let return_type = resolve_type_spec(analyzer, &decl.return_type);

    let annotated: Option<Vec<&ast::TypeSpec>> = decl.params.iter().map(|param| param.type_spec.as_ref()).collect();
    let info = match annotated {
        Some(specs) => {
            let param_types = specs
                .into_iter()
                .map(|spec| resolve_type_spec(analyzer, spec))
                .collect();
            TypeInfo::function_with_params(param_types, return_type)
        }
        None => {
            // 部分标注的参数仍然要检查标注本身是否合法
            for spec in decl.params.iter().filter_map(|param| param.type_spec.as_ref()) {
                resolve_type_spec(analyzer, spec);
            }
            TypeInfo::function(decl.params.len(), return_type)
        }
    };

    declare(analyzer, &decl.name, info);
}

fn declare(analyzer: &mut Analyzer<'_>, name: &ast::Ident, info: TypeInfo) {
    let shadowed = analyzer.symbol_table.shadowed_span(&name.name);

    match analyzer.symbol_table.declare(name, info) {
        Ok(()) => {
            if let Some(previous) = shadowed {
                analyzer.diagnostics.report(
                    Diagnostic::warning(
                        &W0200_SHADOWED_DECLARATION,
                        Label::new(name.span, format!("'{}' shadows an outer declaration", name.name)),
                    )
                    .with_secondary_label(Label::new(previous, "outer declaration is here")),
                );
            }
        }
        Err(duplicate) => analyzer.report(SemanticError::DuplicateDeclaration {
            name: name.clone(),
            previous: duplicate.previous,
        }),
    }
}

/// 把类型标注转换成类型标签。无法表示的联合类型报告错误并变成 `Undefined`。
fn resolve_type_spec(analyzer: &mut Analyzer<'_>, spec: &ast::TypeSpec) -> TypeTag {
    let resolved = spec
        .members
        .iter()
        .map(|member| match member {
            ast::BaseType::Int => TypeTag::Int,
            ast::BaseType::Str => TypeTag::Str,
            ast::BaseType::Bool => TypeTag::Bool,
            ast::BaseType::Any => TypeTag::Any,
        })
        .try_fold(None, |acc: Option<TypeTag>, tag| match acc {
            None => Some(Some(tag)),
            Some(previous) => join(previous, tag).map(Some),
        })
        .flatten();

    match resolved {
        Some(tag) => tag,
        None => {
            analyzer.report(SemanticError::UnsupportedUnionType { span: spec.span });
            TypeTag::Undefined
        }
    }
}
