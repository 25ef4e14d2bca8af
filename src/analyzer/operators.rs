// src/analyzer/operators.rs

//! 运算符分类表：每个运算符接受哪些操作数类型、产生什么类型、属于哪一类。
//! 表在第一次使用时构建，之后只读。

use super::lattice::{is_compatible, narrow};
use super::types::{CategoryFlag, TaggedType, TypeTag};
use crate::parser::ast::{BinaryOp, UnaryOp};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorSymbol {
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl OperatorSymbol {
    pub fn symbol(self) -> &'static str {
        match self {
            OperatorSymbol::Unary(op) => op.symbol(),
            OperatorSymbol::Binary(op) => op.symbol(),
        }
    }
}

impl fmt::Display for OperatorSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Arithmetic,
    Logical,
    Relational,
}

impl OperatorCategory {
    /// 对应的结果类别标记。算术运算没有标记。
    pub fn flag(self) -> Option<CategoryFlag> {
        match self {
            OperatorCategory::Arithmetic => None,
            OperatorCategory::Logical => Some(CategoryFlag::Logical),
            OperatorCategory::Relational => Some(CategoryFlag::Relational),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorRule {
    pub accepted_operand_types: &'static [TypeTag],
    pub result_type: TypeTag,
    pub category: OperatorCategory,
    /// 两个操作数必须能收窄到同一个被接受的类型（比较运算）。
    pub same_operand_type: bool,
}

impl OperatorRule {
    pub fn accepts(&self, operand: TypeTag) -> bool {
        self.accepted_operand_types
            .iter()
            .any(|&accepted| is_compatible(accepted, operand))
    }

    /// 把操作数收窄到第一个兼容的被接受类型。
    pub fn narrow_operand(&self, operand: TypeTag) -> Option<TypeTag> {
        self.accepted_operand_types
            .iter()
            .find(|&&accepted| is_compatible(accepted, operand))
            .map(|&accepted| narrow(operand, accepted))
    }

    /// 两个操作数都兼容的第一个被接受类型。
    pub fn common_operand_type(&self, left: TypeTag, right: TypeTag) -> Option<TypeTag> {
        self.accepted_operand_types
            .iter()
            .copied()
            .find(|&accepted| is_compatible(accepted, left) && is_compatible(accepted, right))
    }

    pub fn result(&self) -> TaggedType {
        match self.category.flag() {
            Some(flag) => TaggedType::with_category(self.result_type, flag),
            None => TaggedType::plain(self.result_type),
        }
    }

    /// 用于诊断信息，例如 "int" 或 "int or str"。
    pub fn describe_accepted(&self) -> String {
        self.accepted_operand_types
            .iter()
            .filter(|tag| **tag != TypeTag::Arith)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

const ARITHMETIC: OperatorRule = OperatorRule {
    accepted_operand_types: &[TypeTag::Int, TypeTag::Arith],
    result_type: TypeTag::Int,
    category: OperatorCategory::Arithmetic,
    same_operand_type: false,
};

const LOGICAL: OperatorRule = OperatorRule {
    accepted_operand_types: &[TypeTag::Bool],
    result_type: TypeTag::Bool,
    category: OperatorCategory::Logical,
    same_operand_type: false,
};

const ORDERING: OperatorRule = OperatorRule {
    accepted_operand_types: &[TypeTag::Int, TypeTag::Str],
    result_type: TypeTag::Bool,
    category: OperatorCategory::Relational,
    same_operand_type: true,
};

const EQUALITY: OperatorRule = OperatorRule {
    accepted_operand_types: &[TypeTag::Int, TypeTag::Str, TypeTag::Bool],
    result_type: TypeTag::Bool,
    category: OperatorCategory::Relational,
    same_operand_type: true,
};

const RULES: [(OperatorSymbol, OperatorRule); 15] = [
    (OperatorSymbol::Unary(UnaryOp::Negate), ARITHMETIC),
    (OperatorSymbol::Unary(UnaryOp::Not), LOGICAL),
    (OperatorSymbol::Binary(BinaryOp::Add), ARITHMETIC),
    (OperatorSymbol::Binary(BinaryOp::Subtract), ARITHMETIC),
    (OperatorSymbol::Binary(BinaryOp::Multiply), ARITHMETIC),
    (OperatorSymbol::Binary(BinaryOp::Divide), ARITHMETIC),
    (OperatorSymbol::Binary(BinaryOp::Modulo), ARITHMETIC),
    (OperatorSymbol::Binary(BinaryOp::And), LOGICAL),
    (OperatorSymbol::Binary(BinaryOp::Or), LOGICAL),
    (OperatorSymbol::Binary(BinaryOp::Lt), ORDERING),
    (OperatorSymbol::Binary(BinaryOp::Lte), ORDERING),
    (OperatorSymbol::Binary(BinaryOp::Gt), ORDERING),
    (OperatorSymbol::Binary(BinaryOp::Gte), ORDERING),
    (OperatorSymbol::Binary(BinaryOp::Eq), EQUALITY),
    (OperatorSymbol::Binary(BinaryOp::NotEq), EQUALITY),
];

static OPERATOR_TABLE: Lazy<HashMap<OperatorSymbol, OperatorRule>> = Lazy::new(|| RULES.into_iter().collect());

/// 查询运算符的规则。
pub fn classify(op: OperatorSymbol) -> Option<&'static OperatorRule> {
    OPERATOR_TABLE.get(&op)
}

/// 表中所有的运算符。
pub fn all_operators() -> impl Iterator<Item = OperatorSymbol> {
    RULES.iter().map(|(op, _)| *op)
}
