// src/diagnostics/codes.rs

use crate::diagnostics::DiagnosticLevel;

/// Represents a specific error code with its associated information.
/// This struct serves as the single source of truth for all checker diagnostics.
#[derive(Debug, Clone)]
pub struct ErrorCode {
    pub code: &'static str,
    pub level: DiagnosticLevel,
    pub message: &'static str,
    pub explanation: &'static str,
}

/*
E00xx: 词法分析 (Lexical Analysis) 错误。

E01xx: 语法分析 (Parsing / Syntax) 错误。

E02xx: 类型检查 (Type Checking) 错误。

W02xx: 类型检查阶段的警告。
*/
// --- E00xx: Lexical Analysis Errors ---

pub const E0000_UNRECOGNIZED_CHAR: ErrorCode = ErrorCode {
    code: "E0000",
    level: DiagnosticLevel::Error,
    message: "Unrecognized character",
    explanation: "The lexer encountered a character that is not part of the language. \
                  This can happen due to typos or trying to use unsupported symbols.",
};

// --- E01xx: Syntax Analysis (Parsing) Errors ---

pub const E0100_SYNTAX_ERROR: ErrorCode = ErrorCode {
    code: "E0100",
    level: DiagnosticLevel::Error,
    message: "Syntax error",
    explanation: "The arrangement of tokens does not match any grammar rule. \
                  Check for missing semicolons, mismatched brackets, or an `if` without `then`/`else`.",
};

// --- E02xx: Type Checking Errors ---

pub const E0200_UNDECLARED_IDENTIFIER: ErrorCode = ErrorCode {
    code: "E0200",
    level: DiagnosticLevel::Error,
    message: "Undeclared identifier",
    explanation: "The identifier is not declared in the current scope or any enclosing scope. \
                  Declare it with `var` or `fn` before using it.",
};

pub const E0201_DUPLICATE_DECLARATION: ErrorCode = ErrorCode {
    code: "E0201",
    level: DiagnosticLevel::Error,
    message: "Symbol is already declared in this scope",
    explanation: "Each identifier may be declared once per scope. \
                  Declaring the same name inside a nested `{ ... }` block shadows the outer one instead.",
};

pub const E0202_NOT_CALLABLE: ErrorCode = ErrorCode {
    code: "E0202",
    level: DiagnosticLevel::Error,
    message: "Cannot call a non-function",
    explanation: "Only identifiers declared with `fn` can be called with `(...)`.",
};

pub const E0203_FUNCTION_USED_AS_VALUE: ErrorCode = ErrorCode {
    code: "E0203",
    level: DiagnosticLevel::Error,
    message: "Function used as a value",
    explanation: "Functions are not first-class values. A function name must be followed by an argument list.",
};

pub const E0204_ARITY_MISMATCH: ErrorCode = ErrorCode {
    code: "E0204",
    level: DiagnosticLevel::Error,
    message: "Incorrect number of arguments in function call",
    explanation: "The number of arguments does not match the number of parameters in the function's declaration. \
                  The call still has the declared return type, so the surrounding expression keeps being checked.",
};

pub const E0205_ARGUMENT_TYPE_MISMATCH: ErrorCode = ErrorCode {
    code: "E0205",
    level: DiagnosticLevel::Error,
    message: "Argument type mismatch",
    explanation: "The argument's type is not compatible with the type annotated on the corresponding parameter.",
};

pub const E0206_OPERAND_TYPE_MISMATCH: ErrorCode = ErrorCode {
    code: "E0206",
    level: DiagnosticLevel::Error,
    message: "Operand type mismatch",
    explanation: "The operator does not accept an operand of this type. Arithmetic operators take `int`, \
                  logical operators take `bool`, comparisons take two operands of the same type.",
};

pub const E0207_BRANCH_TYPE_MISMATCH: ErrorCode = ErrorCode {
    code: "E0207",
    level: DiagnosticLevel::Error,
    message: "Conditional branches have incompatible types",
    explanation: "Both branches of an `if ... then ... else ...` expression must have a common type. \
                  Branches of different types are accepted only when the expression initializes a variable \
                  whose declared union type covers both, e.g. `var v: int|str = if c then 1 else \"x\";`.",
};

pub const E0208_NON_BOOLEAN_CONDITION: ErrorCode = ErrorCode {
    code: "E0208",
    level: DiagnosticLevel::Error,
    message: "Condition is not a boolean",
    explanation: "The condition of an `if` expression must have type `bool`.",
};

pub const E0209_NESTING_TOO_DEEP: ErrorCode = ErrorCode {
    code: "E0209",
    level: DiagnosticLevel::Error,
    message: "Expression is nested too deeply",
    explanation: "The expression exceeds the configured nesting limit (`--max-depth`). \
                  The checker stops descending at the limit instead of exhausting the stack.",
};

pub const E0210_INTERNAL_COMPILER_ERROR: ErrorCode = ErrorCode {
    code: "E0210",
    level: DiagnosticLevel::Error,
    message: "Internal checker error",
    explanation: "An unexpected error occurred within the checker's internal logic. This indicates a bug in the checker itself. \
                  Please report this issue with the source code that caused it.",
};

pub const E0211_INITIALIZER_TYPE_MISMATCH: ErrorCode = ErrorCode {
    code: "E0211",
    level: DiagnosticLevel::Error,
    message: "Initializer type mismatch",
    explanation: "The type of the initializer is not compatible with the variable's declared type.",
};

pub const E0212_UNSUPPORTED_UNION_TYPE: ErrorCode = ErrorCode {
    code: "E0212",
    level: DiagnosticLevel::Error,
    message: "Unsupported union type",
    explanation: "Only the two-member unions `int|str`, `int|bool` and `str|bool` exist. \
                  A union of all three base types cannot be represented; use `any` instead.",
};

// --- W02xx: Type Checking Warnings ---

pub const W0200_SHADOWED_DECLARATION: ErrorCode = ErrorCode {
    code: "W0200",
    level: DiagnosticLevel::Warning,
    message: "Declaration shadows an outer declaration",
    explanation: "A declaration in a nested block hides a symbol with the same name from an enclosing scope. \
                  This is allowed, but uses of the name inside the block refer to the new declaration.",
};

/// 所有错误码，按编号排列。供 `--explain` 查询。
pub const ALL: &[&ErrorCode] = &[
    &E0000_UNRECOGNIZED_CHAR,
    &E0100_SYNTAX_ERROR,
    &E0200_UNDECLARED_IDENTIFIER,
    &E0201_DUPLICATE_DECLARATION,
    &E0202_NOT_CALLABLE,
    &E0203_FUNCTION_USED_AS_VALUE,
    &E0204_ARITY_MISMATCH,
    &E0205_ARGUMENT_TYPE_MISMATCH,
    &E0206_OPERAND_TYPE_MISMATCH,
    &E0207_BRANCH_TYPE_MISMATCH,
    &E0208_NON_BOOLEAN_CONDITION,
    &E0209_NESTING_TOO_DEEP,
    &E0210_INTERNAL_COMPILER_ERROR,
    &E0211_INITIALIZER_TYPE_MISMATCH,
    &E0212_UNSUPPORTED_UNION_TYPE,
    &W0200_SHADOWED_DECLARATION,
];

/// 按编号查找错误码（大小写不敏感）。
pub fn lookup(code: &str) -> Option<&'static ErrorCode> {
    ALL.iter()
        .copied()
        .find(|error_code| error_code.code.eq_ignore_ascii_case(code))
}
