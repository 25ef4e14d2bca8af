// src/analyzer/lattice.rs

//! 类型格：兼容性判断、联合类型收窄、分支类型合并。
//!
//! 三个函数都是纯函数，不报告诊断；出错时由调用者决定怎么报告。

use super::types::TypeTag;

/// `actual` 能否用在要求 `expected` 的位置。
///
/// - `Any` / `Undefined` 在任意一侧都兼容（`Undefined` 的错误已经报告过了）。
/// - 联合类型（以及 `Arith`）接受它的任何一个成员。
/// - 联合类型可以用在要求其某个成员的位置，使用时再收窄。
pub fn is_compatible(expected: TypeTag, actual: TypeTag) -> bool {
    if matches!(expected, TypeTag::Any | TypeTag::Undefined) || matches!(actual, TypeTag::Any | TypeTag::Undefined) {
        return true;
    }
    if expected == actual {
        return true;
    }
    if (expected.is_union() || expected == TypeTag::Arith) && expected.has_member(actual) {
        return true;
    }
    actual.is_union() && actual.has_member(expected)
}

/// 在 `context` 的要求下把 `union` 收窄为一个成员。
///
/// 没有唯一的公共成员时返回 `Undefined`，由调用者报告类型错误。
pub fn narrow(union: TypeTag, context: TypeTag) -> TypeTag {
    if union == TypeTag::Undefined || context == TypeTag::Undefined {
        return TypeTag::Undefined;
    }
    if context == TypeTag::Any || union == context {
        return union;
    }
    if union == TypeTag::Any {
        return context;
    }

    let mut common = union.members().iter().filter(|member| context.has_member(**member));
    match (common.next(), common.next()) {
        (Some(&member), None) => member,
        _ => TypeTag::Undefined,
    }
}

/// 两个分支类型的最小公共类型。
///
/// 成员集合的并集若能用一个标签表示就返回它，否则返回 `None`（类型不匹配）。
/// 满足交换律与结合律。
pub fn join(a: TypeTag, b: TypeTag) -> Option<TypeTag> {
    if a == TypeTag::Undefined || b == TypeTag::Undefined {
        return Some(TypeTag::Undefined);
    }
    if a == b {
        return Some(a);
    }
    if a == TypeTag::Any || b == TypeTag::Any {
        return Some(TypeTag::Any);
    }

    let members: Vec<TypeTag> = a.members().iter().chain(b.members()).copied().collect();
    TypeTag::from_members(&members)
}

/// `wider` 是否已经覆盖 `narrower` 的所有成员，即 `join(wider, narrower) == wider`。
pub fn covers(wider: TypeTag, narrower: TypeTag) -> bool {
    join(wider, narrower) == Some(wider)
}
