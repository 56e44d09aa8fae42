use crate::{
    builtin::NoMatchingOverload,
    proc::{constant::Unrepresentable, ConstantEvaluatorError},
};

/// A resolution failure, reported as an error diagnostic at the span of the
/// offending expression, type or declaration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("unresolved identifier '{0}'")]
    UnknownIdent(String),
    #[error("unresolved type '{0}'")]
    UnknownType(String),
    #[error("unresolved call target '{0}'")]
    UnknownFunction(String),
    #[error("redefinition of '{0}'")]
    Redefinition(String),
    #[error("cannot use {kind} '{name}' as a value")]
    NotAValue { kind: &'static str, name: String },
    #[error(transparent)]
    NoMatchingOverload(#[from] NoMatchingOverload),
    #[error(transparent)]
    Evaluation(#[from] ConstantEvaluatorError),
    #[error(transparent)]
    Unrepresentable(#[from] Unrepresentable),
    #[error("type can't be inferred")]
    TypeNotInferable,
    #[error("no matching constructor for {ty}({})", .arguments.join(", "))]
    BadConstructor { ty: String, arguments: Vec<String> },
    #[error("type '{0}' cannot be constructed")]
    NotConstructible(String),
    #[error("cannot index into a value of type '{0}'")]
    BadIndexBase(String),
    #[error("index must be an integer, found '{0}'")]
    BadIndexType(String),
    #[error("struct member '{member}' not found in '{ty}'")]
    UnknownMember { ty: String, member: String },
    #[error("invalid vector swizzle '{0}'")]
    BadSwizzle(String),
    #[error("cannot access member '{member}' of type '{ty}'")]
    BadMemberBase { ty: String, member: String },
    #[error("no operator '{op}' for operand of type '{ty}'")]
    BadUnaryOperand { op: &'static str, ty: String },
    #[error("no operator '{op}' for operands of type '{left}' and '{right}'")]
    BadBinaryOperands {
        op: &'static str,
        left: String,
        right: String,
    },
    #[error("cannot take the address of a value of type '{0}'")]
    NotReference(String),
    #[error("cannot dereference a value of type '{0}'")]
    NotPointer(String),
    #[error("initializer of '{0}' is not a constant expression")]
    NotConstant(String),
    #[error("cannot initialize '{name}' of type '{expected}' with a value of type '{found}'")]
    InitializerMismatch {
        name: String,
        expected: String,
        found: String,
    },
    #[error("'{0}' needs a type or an initializer")]
    MissingType(String),
    #[error("array count must be a positive integer constant or an override expression")]
    BadArrayCount,
    #[error("'{name}' expects {expected} argument(s), found {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("argument {index} of '{name}' expects '{expected}', found '{found}'")]
    ArgumentType {
        name: String,
        index: usize,
        expected: String,
        found: String,
    },
    #[error("cannot assign to a value of type '{0}'")]
    NotAssignable(String),
    #[error("cannot assign a value of type '{found}' to '{expected}'")]
    AssignmentMismatch { expected: String, found: String },
    #[error("return value of type '{found}' does not match the return type '{expected}'")]
    ReturnMismatch { expected: String, found: String },
    #[error("function '{0}' must return a value")]
    MissingReturnValue(String),
    #[error("function '{0}' does not return a value")]
    UnexpectedReturnValue(String),
    #[error("override '{0}' must have a scalar type")]
    BadOverrideType(String),
    #[error("vector element type must be a scalar, found '{0}'")]
    BadVectorElement(String),
    #[error("matrix element type must be f32 or f16, found '{0}'")]
    BadMatrixElement(String),
    #[error("atomic type must be i32 or u32, found '{0}'")]
    BadAtomicElement(String),
    /// A subexpression already failed and was reported.
    #[error("expression depends on an invalid subexpression")]
    Poisoned,
}
