// src/analyzer/symbols.rs

use crate::analyzer::types::TypeInfo;
use crate::parser::ast::Ident;
use crate::utils::Span;
use std::collections::HashMap;
use thiserror::Error;

/// 在同一个作用域中重复声明。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("symbol '{name}' is already declared in this scope")]
pub struct DuplicateDeclaration {
    pub name: String,
    /// 之前那次声明的位置
    pub previous: Span,
}

/// 符号表里的一项：类型信息加上声明位置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub info: TypeInfo,
    pub span: Span,
}

/// 代表一个独立的作用域
type Scope = HashMap<String, SymbolEntry>;

/// 签名表，使用一个栈来管理嵌套的作用域。
/// 每个检查单元拥有自己的一张表。
#[derive(Debug)]
pub struct SignatureTable {
    scopes: Vec<Scope>,
}

impl Default for SignatureTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureTable {
    /// 创建一个新的签名表，并自动进入全局作用域
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
        log::trace!("enter scope (depth {})", self.scopes.len());
    }

    /// 退出当前作用域。全局作用域永远不会被弹出。
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            log::trace!("exit scope (depth {})", self.scopes.len());
        }
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// 在当前作用域中声明一个符号。外层作用域中的同名符号会被遮蔽，不算重复。
    pub fn declare(&mut self, name: &Ident, info: TypeInfo) -> Result<(), DuplicateDeclaration> {
        let current_scope = self
            .scopes
            .last_mut()
            .expect("SignatureTable should always have at least one scope");

        if let Some(existing) = current_scope.get(&name.name) {
            return Err(DuplicateDeclaration {
                name: name.name.clone(),
                previous: existing.span,
            });
        }

        log::debug!("declare '{}': {}", name.name, info);
        current_scope.insert(name.name.clone(), SymbolEntry { info, span: name.span });
        Ok(())
    }

    /// 查找一个符号（从内到外）
    pub fn lookup(&self, name: &str) -> Option<&TypeInfo> {
        self.lookup_entry(name).map(|entry| &entry.info)
    }

    pub fn lookup_entry(&self, name: &str) -> Option<&SymbolEntry> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// 函数的参数个数；未声明或不是函数时为 `None`。
    pub fn arity_of(&self, name: &str) -> Option<usize> {
        self.lookup(name).and_then(TypeInfo::param_count)
    }

    /// 如果在当前作用域声明 `name` 会遮蔽外层的某个声明，返回那个声明的位置。
    pub fn shadowed_span(&self, name: &str) -> Option<Span> {
        let (_current, outer) = self.scopes.split_last()?;
        outer.iter().rev().find_map(|scope| scope.get(name)).map(|entry| entry.span)
    }
}
