// src/analyzer/types.rs

use std::fmt;
use thiserror::Error;

// 旧的整数编码。只在 `from_legacy` / `to_legacy` 的边界上出现。
const LEGACY_UNDEFINED: i32 = -1;
const LEGACY_FUNCTION: i32 = 0;
const LEGACY_INT: i32 = 1;
const LEGACY_STR: i32 = 2;
const LEGACY_INT_OR_STR: i32 = 3;
const LEGACY_BOOL: i32 = 4;
const LEGACY_INT_OR_BOOL: i32 = 5;
const LEGACY_STR_OR_BOOL: i32 = 6;
const LEGACY_ANY: i32 = 7;
const LEGACY_ARITH: i32 = 8;
const LEGACY_LOGICAL_FLAG: i32 = 0b1_0000;
const LEGACY_RELATIONAL_FLAG: i32 = 0b10_0000;

/// 旧编码里表示“不适用”的哨兵值（非函数的参数个数与返回类型）。
pub const NOT_APPLICABLE: i32 = -1;

/// 封闭的类型标签集合。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// 无法解析或已出错的类型。吸收一切运算，不会再产生新的诊断。
    Undefined,
    Function,
    Int,
    Str,
    IntOrStr,
    Bool,
    IntOrBool,
    StrOrBool,
    /// 与任何类型都兼容。
    Any,
    /// “可做算术的类型”，只用作操作数约束，不会是变量的类型。
    Arith,
}

impl TypeTag {
    /// 标签覆盖的具体成员。联合类型有两个成员，`Arith` 只有 `Int`，其余是自身。
    pub fn members(self) -> &'static [TypeTag] {
        match self {
            TypeTag::IntOrStr => &[TypeTag::Int, TypeTag::Str],
            TypeTag::IntOrBool => &[TypeTag::Int, TypeTag::Bool],
            TypeTag::StrOrBool => &[TypeTag::Str, TypeTag::Bool],
            TypeTag::Arith => &[TypeTag::Int],
            TypeTag::Undefined => &[TypeTag::Undefined],
            TypeTag::Function => &[TypeTag::Function],
            TypeTag::Int => &[TypeTag::Int],
            TypeTag::Str => &[TypeTag::Str],
            TypeTag::Bool => &[TypeTag::Bool],
            TypeTag::Any => &[TypeTag::Any],
        }
    }

    pub fn is_union(self) -> bool {
        matches!(self, TypeTag::IntOrStr | TypeTag::IntOrBool | TypeTag::StrOrBool)
    }

    /// 具体的值类型：`int`、`str`、`bool`。
    pub fn is_concrete(self) -> bool {
        matches!(self, TypeTag::Int | TypeTag::Str | TypeTag::Bool)
    }

    pub fn has_member(self, member: TypeTag) -> bool {
        self.members().contains(&member)
    }

    /// 找到成员集合恰好等于 `members` 的标签。
    /// 重复项被忽略；三个基础类型的并集、或者函数与值的混合都没有对应的标签。
    pub fn from_members(members: &[TypeTag]) -> Option<TypeTag> {
        let has = |tag| members.contains(&tag);
        let (int, str_, bool_) = (has(TypeTag::Int), has(TypeTag::Str), has(TypeTag::Bool));
        if members.iter().any(|m| !m.is_concrete()) {
            // 非具体成员只能单独出现
            return match members.first() {
                Some(&first) if members.iter().all(|&m| m == first) => Some(first),
                _ => None,
            };
        }
        match (int, str_, bool_) {
            (true, false, false) => Some(TypeTag::Int),
            (false, true, false) => Some(TypeTag::Str),
            (false, false, true) => Some(TypeTag::Bool),
            (true, true, false) => Some(TypeTag::IntOrStr),
            (true, false, true) => Some(TypeTag::IntOrBool),
            (false, true, true) => Some(TypeTag::StrOrBool),
            _ => None,
        }
    }

    /// 从旧的整数编码解码出 (值类型, 可选的运算类别)。
    pub fn from_legacy(code: i32) -> Result<TaggedType, TagDecodeError> {
        if code == LEGACY_UNDEFINED {
            return Ok(TaggedType::plain(TypeTag::Undefined));
        }
        if code < 0 {
            return Err(TagDecodeError::UnknownTag(code));
        }

        let logical = code & LEGACY_LOGICAL_FLAG != 0;
        let relational = code & LEGACY_RELATIONAL_FLAG != 0;
        let category = match (logical, relational) {
            (true, true) => return Err(TagDecodeError::ConflictingCategories(code)),
            (true, false) => Some(CategoryFlag::Logical),
            (false, true) => Some(CategoryFlag::Relational),
            (false, false) => None,
        };

        let value = match code & !(LEGACY_LOGICAL_FLAG | LEGACY_RELATIONAL_FLAG) {
            LEGACY_FUNCTION => TypeTag::Function,
            LEGACY_INT => TypeTag::Int,
            LEGACY_STR => TypeTag::Str,
            LEGACY_INT_OR_STR => TypeTag::IntOrStr,
            LEGACY_BOOL => TypeTag::Bool,
            LEGACY_INT_OR_BOOL => TypeTag::IntOrBool,
            LEGACY_STR_OR_BOOL => TypeTag::StrOrBool,
            LEGACY_ANY => TypeTag::Any,
            LEGACY_ARITH => TypeTag::Arith,
            _ => return Err(TagDecodeError::UnknownTag(code)),
        };

        Ok(TaggedType { value, category })
    }

    fn legacy_base(self) -> i32 {
        match self {
            TypeTag::Undefined => LEGACY_UNDEFINED,
            TypeTag::Function => LEGACY_FUNCTION,
            TypeTag::Int => LEGACY_INT,
            TypeTag::Str => LEGACY_STR,
            TypeTag::IntOrStr => LEGACY_INT_OR_STR,
            TypeTag::Bool => LEGACY_BOOL,
            TypeTag::IntOrBool => LEGACY_INT_OR_BOOL,
            TypeTag::StrOrBool => LEGACY_STR_OR_BOOL,
            TypeTag::Any => LEGACY_ANY,
            TypeTag::Arith => LEGACY_ARITH,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Undefined => "undefined",
            TypeTag::Function => "function",
            TypeTag::Int => "int",
            TypeTag::Str => "str",
            TypeTag::IntOrStr => "int|str",
            TypeTag::Bool => "bool",
            TypeTag::IntOrBool => "int|bool",
            TypeTag::StrOrBool => "str|bool",
            TypeTag::Any => "any",
            TypeTag::Arith => "arith",
        };
        f.write_str(name)
    }
}

/// 运算结果的类别标记，与值类型正交。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryFlag {
    Logical,
    Relational,
}

/// 值类型加上可选的类别标记。旧编码把两者按位或在一个整数里，这里拆成两个字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaggedType {
    pub value: TypeTag,
    pub category: Option<CategoryFlag>,
}

impl TaggedType {
    pub fn plain(value: TypeTag) -> Self {
        Self { value, category: None }
    }

    pub fn with_category(value: TypeTag, category: CategoryFlag) -> Self {
        Self {
            value,
            category: Some(category),
        }
    }

    /// 编码回旧的整数表示。`Undefined` 不携带类别。
    pub fn to_legacy(self) -> i32 {
        if self.value == TypeTag::Undefined {
            return LEGACY_UNDEFINED;
        }
        let flag = match self.category {
            Some(CategoryFlag::Logical) => LEGACY_LOGICAL_FLAG,
            Some(CategoryFlag::Relational) => LEGACY_RELATIONAL_FLAG,
            None => 0,
        };
        self.value.legacy_base() | flag
    }
}

impl fmt::Display for TaggedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            Some(CategoryFlag::Logical) => write!(f, "{} (logical)", self.value),
            Some(CategoryFlag::Relational) => write!(f, "{} (relational)", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TagDecodeError {
    #[error("unknown type tag {0}")]
    UnknownTag(i32),
    #[error("type tag {0:#b} carries both the logical and the relational flag")]
    ConflictingCategories(i32),
    #[error("function record has no parameter count")]
    MissingArity,
    #[error("function record has no return type")]
    MissingReturnType,
}

/// 函数的签名：参数个数、返回类型，以及可选的逐参数类型。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub param_count: usize,
    pub return_type: TypeTag,
    /// 只有当每个参数都有类型标注时才存在；否则调用时只检查参数个数。
    pub param_types: Option<Vec<TypeTag>>,
}

/// 一个已声明符号的类型信息。
///
/// `kind == Function` 当且仅当存在签名，参数个数和返回类型不会脱离函数单独出现。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    kind: TypeTag,
    signature: Option<Signature>,
}

impl TypeInfo {
    /// 一个值（变量）。`kind` 不能是 `Function`，函数请用 [`TypeInfo::function`]。
    pub fn value(kind: TypeTag) -> Self {
        debug_assert_ne!(kind, TypeTag::Function, "use TypeInfo::function for callables");
        Self { kind, signature: None }
    }

    /// 只知道参数个数的函数。
    pub fn function(param_count: usize, return_type: TypeTag) -> Self {
        Self {
            kind: TypeTag::Function,
            signature: Some(Signature {
                param_count,
                return_type,
                param_types: None,
            }),
        }
    }

    /// 每个参数都有类型的函数。
    pub fn function_with_params(param_types: Vec<TypeTag>, return_type: TypeTag) -> Self {
        Self {
            kind: TypeTag::Function,
            signature: Some(Signature {
                param_count: param_types.len(),
                return_type,
                param_types: Some(param_types),
            }),
        }
    }

    /// 从旧的三元组记录 `{ type, numParams, returnType }` 构造。
    pub fn from_legacy(type_code: i32, num_params: i32, return_type: i32) -> Result<Self, TagDecodeError> {
        let kind = TypeTag::from_legacy(type_code)?.value;
        if kind != TypeTag::Function {
            // 非函数的 numParams / returnType 没有意义，直接忽略
            return Ok(Self::value(kind));
        }
        if num_params == NOT_APPLICABLE {
            return Err(TagDecodeError::MissingArity);
        }
        let param_count = usize::try_from(num_params).map_err(|_| TagDecodeError::MissingArity)?;
        if return_type == NOT_APPLICABLE {
            return Err(TagDecodeError::MissingReturnType);
        }
        let return_type = TypeTag::from_legacy(return_type)?.value;
        Ok(Self::function(param_count, return_type))
    }

    pub fn kind(&self) -> TypeTag {
        self.kind
    }

    pub fn is_function(&self) -> bool {
        self.signature.is_some()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn param_count(&self) -> Option<usize> {
        self.signature.as_ref().map(|sig| sig.param_count)
    }

    pub fn return_type(&self) -> Option<TypeTag> {
        self.signature.as_ref().map(|sig| sig.return_type)
    }

    pub fn param_types(&self) -> Option<&[TypeTag]> {
        self.signature.as_ref().and_then(|sig| sig.param_types.as_deref())
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.signature {
            Some(Signature {
                param_types: Some(params),
                return_type,
                ..
            }) => {
                let params = params.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
                write!(f, "fn({}) -> {}", params, return_type)
            }
            Some(Signature {
                param_count,
                return_type,
                ..
            }) => write!(f, "fn/{} -> {}", param_count, return_type),
            None => write!(f, "{}", self.kind),
        }
    }
}
