// In src/analyzer/mod.rs

pub mod lattice;
pub mod operators;
mod semantic_error;
pub mod symbols;
pub mod types;
mod expression;
mod statement;


use crate::diagnostics::DiagnosticBag;
use crate::parser::ast;
use crate::utils::Span;
use symbols::SignatureTable;
use types::TypeTag;

pub use semantic_error::SemanticError;
pub use statement::ResolvedExpression;

/// 默认的表达式嵌套上限。
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// 检查器的配置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerOptions {
    /// 超过这个深度的表达式会得到 `NestingTooDeep`，而不是继续递归。
    pub max_depth: usize,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// --- 核心抽象：上下文与 Trait ---

/// 一次表达式解析过程中共享的状态。
pub struct AnalysisContext<'a> {
    pub symbol_table: &'a SignatureTable,
    pub diagnostics: &'a mut DiagnosticBag,
    /// 外部对当前表达式的类型期望（例如变量声明的类型）。
    pub expected_type: Option<TypeTag>,
    pub depth: usize,
    pub max_depth: usize,
    // 同一棵表达式树只报告一次深度超限
    pub depth_exceeded: bool,
}

/// 把一个语法树节点解析成它的类型。总是成功：错误被报告后折叠为 `Undefined`。
pub trait Resolve {
    fn resolve(&self, ctx: &mut AnalysisContext<'_>) -> TypeTag;
}

// --- Analyzer 结构体与实现 ---

pub struct Analyzer<'a> {
    symbol_table: SignatureTable,
    options: CheckerOptions,
    diagnostics: &'a mut DiagnosticBag,
}

impl<'a> Analyzer<'a> {
    pub fn new(diagnostics: &'a mut DiagnosticBag) -> Self {
        Self::with_options(diagnostics, CheckerOptions::default())
    }

    pub fn with_options(diagnostics: &'a mut DiagnosticBag, options: CheckerOptions) -> Self {
        Self {
            symbol_table: SignatureTable::new(),
            options,
            diagnostics,
        }
    }

    pub fn signatures(&self) -> &SignatureTable {
        &self.symbol_table
    }

    pub fn signatures_mut(&mut self) -> &mut SignatureTable {
        &mut self.symbol_table
    }

    fn create_ctx(&mut self, expected_type: Option<TypeTag>) -> AnalysisContext<'_> {
        AnalysisContext {
            symbol_table: &self.symbol_table,
            diagnostics: self.diagnostics,
            expected_type,
            depth: 0,
            max_depth: self.options.max_depth,
            depth_exceeded: false,
        }
    }

    /// 解析一棵表达式树的类型。
    pub fn resolve(&mut self, expr: &ast::Expression) -> TypeTag {
        let mut ctx = self.create_ctx(None);
        expr.resolve(&mut ctx)
    }

    /// 在已知期望类型的上下文中解析，例如变量的初始值。
    pub fn resolve_expecting(&mut self, expr: &ast::Expression, expected: TypeTag) -> TypeTag {
        let mut ctx = self.create_ctx(Some(expected));
        expr.resolve(&mut ctx)
    }

    /// 检查整个程序：声明进入签名表，表达式语句被解析。
    /// 返回每个表达式语句的类型，供下游使用。
    pub fn analyze(&mut self, program: &ast::Program) -> Vec<ResolvedExpression> {
        let mut resolved = Vec::new();
        statement::check_items(self, &program.items, &mut resolved);
        resolved
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    fn report(&mut self, error: SemanticError) {
        self.diagnostics.report(error.into());
    }
}

impl<'a> AnalysisContext<'a> {
    fn report(&mut self, error: SemanticError) {
        self.diagnostics.report(error.into());
    }

    /// “保存-修改-递归-恢复”：在指定的期望类型下解析一个子表达式。
    fn resolve_expecting(&mut self, expr: &ast::Expression, expected: Option<TypeTag>) -> TypeTag {
        let original_expected_type = self.expected_type;
        self.expected_type = expected;
        let resolved = expr.resolve(self);
        self.expected_type = original_expected_type;
        resolved
    }

    fn internal_error(&mut self, message: impl Into<String>, span: Span) -> TypeTag {
        self.report(SemanticError::InternalError {
            message: message.into(),
            span: Some(span),
        });
        TypeTag::Undefined
    }
}
