//! Syntax tree consumed by the [`resolver`](crate::resolver).
//!
//! This is what a WGSL parser hands over: names are still unresolved
//! strings, types are still type expressions, and nothing is typed yet.
//! The builder methods on [`Module`] allow constructing trees directly.

use crate::{
    AddressSpace, Arena, Handle, SamplerKind, Scalar, Span, StorageAccess, TexelFormat,
    TextureDimension, VectorSize,
};

#[derive(Debug, Default)]
pub struct Module {
    /// Global declarations, in source order.
    pub decls: Arena<GlobalDecl>,
    pub types: Arena<Type>,
    pub expressions: Arena<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Ident {
            name: name.into(),
            span: Span::default(),
        }
    }
}

#[derive(Debug)]
pub struct GlobalDecl {
    pub kind: GlobalDeclKind,
}

#[derive(Debug)]
pub enum GlobalDeclKind {
    Fn(Function),
    Var(GlobalVariable),
    Const(Const),
    Override(Override),
    Struct(Struct),
}

#[derive(Debug)]
pub struct FunctionArgument {
    pub name: Ident,
    pub ty: Handle<Type>,
}

#[derive(Debug)]
pub struct Function {
    pub name: Ident,
    pub arguments: Vec<FunctionArgument>,
    pub result: Option<Handle<Type>>,
    pub body: Block,
}

#[derive(Debug)]
pub struct GlobalVariable {
    pub name: Ident,
    pub space: AddressSpace,
    /// Explicit access mode, only meaningful for `storage` variables.
    pub access: Option<StorageAccess>,
    pub ty: Option<Handle<Type>>,
    pub init: Option<Handle<Expression>>,
}

#[derive(Debug)]
pub struct StructMember {
    pub name: Ident,
    pub ty: Handle<Type>,
}

#[derive(Debug)]
pub struct Struct {
    pub name: Ident,
    pub members: Vec<StructMember>,
}

#[derive(Debug)]
pub struct Const {
    pub name: Ident,
    pub ty: Option<Handle<Type>>,
    pub init: Handle<Expression>,
}

#[derive(Debug)]
pub struct Override {
    pub name: Ident,
    pub ty: Option<Handle<Type>>,
    pub init: Option<Handle<Expression>>,
}

/// The size of an [`Array`](Type::Array) or binding array.
#[derive(Clone, Copy, Debug)]
pub enum ArraySize {
    /// The length as a constant or override expression.
    Constant(Handle<Expression>),
    Dynamic,
}

/// A type expression, as written in the source.
#[derive(Debug)]
pub enum Type {
    Scalar(Scalar),
    Vector {
        size: VectorSize,
        ty: Handle<Type>,
    },
    Matrix {
        columns: VectorSize,
        rows: VectorSize,
        ty: Handle<Type>,
    },
    Atomic(Scalar),
    Pointer {
        base: Handle<Type>,
        space: AddressSpace,
        access: Option<StorageAccess>,
    },
    Array {
        base: Handle<Type>,
        size: ArraySize,
    },
    Sampler(SamplerKind),
    SampledTexture {
        dim: TextureDimension,
        sample_type: Scalar,
    },
    MultisampledTexture {
        dim: TextureDimension,
        sample_type: Scalar,
    },
    DepthTexture {
        dim: TextureDimension,
    },
    DepthMultisampledTexture {
        dim: TextureDimension,
    },
    StorageTexture {
        dim: TextureDimension,
        format: TexelFormat,
        access: StorageAccess,
    },
    ExternalTexture,
    /// A reference to a user-declared type.
    User(Ident),
}

#[derive(Debug, Default)]
pub struct Block {
    pub stmts: Vec<Statement>,
}

#[derive(Debug)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum StatementKind {
    LocalDecl(LocalDecl),
    Block(Block),
    Assign {
        target: Handle<Expression>,
        value: Handle<Expression>,
    },
    Call {
        function: Ident,
        arguments: Vec<Handle<Expression>>,
    },
    Return {
        value: Option<Handle<Expression>>,
    },
}

#[derive(Debug)]
pub struct LocalVariable {
    pub name: Ident,
    pub ty: Option<Handle<Type>>,
    pub init: Option<Handle<Expression>>,
}

#[derive(Debug)]
pub struct Let {
    pub name: Ident,
    pub ty: Option<Handle<Type>>,
    pub init: Handle<Expression>,
}

#[derive(Debug)]
pub enum LocalDecl {
    Var(LocalVariable),
    Let(Let),
    Const(Const),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// Abstract integer, written without a suffix.
    AbstractInt(i64),
    /// Abstract float, written without a suffix.
    AbstractFloat(f64),
    /// Concrete `i32`
    I32(i32),
    /// Concrete `u32`
    U32(u32),
    /// Concrete `f32`
    F32(f32),
    /// Concrete `f16`
    F16(half::f16),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    Number(Number),
}

/// The type being constructed by a [`Construct`](Expression::Construct)
/// expression.
#[derive(Debug)]
pub enum ConstructorType {
    /// A scalar type or conversion: `f32(1)`.
    Scalar(Scalar),

    /// A vector construction whose component type is inferred from the
    /// argument: `vec3(1.0)`.
    PartialVector { size: VectorSize },

    /// A vector construction whose component type is written out:
    /// `vec3<f32>(1.0)`.
    Vector {
        size: VectorSize,
        ty: Handle<Type>,
    },

    /// A matrix construction whose component type is inferred from the
    /// argument: `mat2x2(1,2,3,4)`.
    PartialMatrix {
        columns: VectorSize,
        rows: VectorSize,
    },

    /// A matrix construction whose component type is written out:
    /// `mat2x2<f32>(1,2,3,4)`.
    Matrix {
        columns: VectorSize,
        rows: VectorSize,
        ty: Handle<Type>,
    },

    /// An array whose component type and size are inferred from the arguments:
    /// `array(3,4,5)`.
    PartialArray,

    /// An array whose component type and size are written out:
    /// `array<u32, 4>(3,4,5,6)`.
    Array {
        base: Handle<Type>,
        size: ArraySize,
    },

    /// Constructing a value of a known type, such as a struct or an alias.
    Type(Handle<Type>),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UnaryOperator {
    Negate,
    LogicalNot,
    BitwiseNot,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    ExclusiveOr,
    InclusiveOr,
    LogicalAnd,
    LogicalOr,
    ShiftLeft,
    /// Right shift carries the sign of signed integers only.
    ShiftRight,
}

#[derive(Debug)]
pub enum Expression {
    Literal(Literal),
    Ident(Ident),
    Construct {
        ty: ConstructorType,
        ty_span: Span,
        components: Vec<Handle<Expression>>,
    },
    Unary {
        op: UnaryOperator,
        expr: Handle<Expression>,
    },
    AddrOf(Handle<Expression>),
    Deref(Handle<Expression>),
    Binary {
        op: BinaryOperator,
        left: Handle<Expression>,
        right: Handle<Expression>,
    },
    /// A call to a builtin, a user function, or a struct constructor.
    Call {
        function: Ident,
        arguments: Vec<Handle<Expression>>,
    },
    Index {
        base: Handle<Expression>,
        index: Handle<Expression>,
    },
    Member {
        base: Handle<Expression>,
        field: Ident,
    },
}

/// Builder methods, for hosts and tests that do not go through a parser.
impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_expression(&mut self, expr: Expression, span: Span) -> Handle<Expression> {
        self.expressions.append(expr, span)
    }

    pub fn append_type(&mut self, ty: Type) -> Handle<Type> {
        self.types.append(ty, Span::default())
    }

    fn expr(&mut self, expr: Expression) -> Handle<Expression> {
        self.append_expression(expr, Span::default())
    }

    pub fn literal(&mut self, literal: Literal) -> Handle<Expression> {
        self.expr(Expression::Literal(literal))
    }

    pub fn number(&mut self, number: Number) -> Handle<Expression> {
        self.literal(Literal::Number(number))
    }

    pub fn abstract_int(&mut self, value: i64) -> Handle<Expression> {
        self.number(Number::AbstractInt(value))
    }

    pub fn abstract_float(&mut self, value: f64) -> Handle<Expression> {
        self.number(Number::AbstractFloat(value))
    }

    pub fn i32(&mut self, value: i32) -> Handle<Expression> {
        self.number(Number::I32(value))
    }

    pub fn u32(&mut self, value: u32) -> Handle<Expression> {
        self.number(Number::U32(value))
    }

    pub fn f32(&mut self, value: f32) -> Handle<Expression> {
        self.number(Number::F32(value))
    }

    pub fn f16(&mut self, value: f32) -> Handle<Expression> {
        self.number(Number::F16(half::f16::from_f32(value)))
    }

    pub fn bool(&mut self, value: bool) -> Handle<Expression> {
        self.literal(Literal::Bool(value))
    }

    pub fn ident(&mut self, name: &str) -> Handle<Expression> {
        self.expr(Expression::Ident(Ident::new(name)))
    }

    pub fn construct(
        &mut self,
        ty: ConstructorType,
        components: Vec<Handle<Expression>>,
    ) -> Handle<Expression> {
        self.expr(Expression::Construct {
            ty,
            ty_span: Span::default(),
            components,
        })
    }

    /// `vecN<scalar>(components...)`
    pub fn vec(
        &mut self,
        size: VectorSize,
        scalar: Scalar,
        components: Vec<Handle<Expression>>,
    ) -> Handle<Expression> {
        let ty = self.append_type(Type::Scalar(scalar));
        self.construct(ConstructorType::Vector { size, ty }, components)
    }

    /// `matCxR<scalar>(components...)`
    pub fn mat(
        &mut self,
        columns: VectorSize,
        rows: VectorSize,
        scalar: Scalar,
        components: Vec<Handle<Expression>>,
    ) -> Handle<Expression> {
        let ty = self.append_type(Type::Scalar(scalar));
        self.construct(ConstructorType::Matrix { columns, rows, ty }, components)
    }

    pub fn call(
        &mut self,
        function: &str,
        arguments: Vec<Handle<Expression>>,
    ) -> Handle<Expression> {
        self.expr(Expression::Call {
            function: Ident::new(function),
            arguments,
        })
    }

    pub fn index(
        &mut self,
        base: Handle<Expression>,
        index: Handle<Expression>,
    ) -> Handle<Expression> {
        self.expr(Expression::Index { base, index })
    }

    pub fn member(&mut self, base: Handle<Expression>, field: &str) -> Handle<Expression> {
        self.expr(Expression::Member {
            base,
            field: Ident::new(field),
        })
    }

    pub fn unary(&mut self, op: UnaryOperator, expr: Handle<Expression>) -> Handle<Expression> {
        self.expr(Expression::Unary { op, expr })
    }

    pub fn addr_of(&mut self, expr: Handle<Expression>) -> Handle<Expression> {
        self.expr(Expression::AddrOf(expr))
    }

    pub fn deref(&mut self, expr: Handle<Expression>) -> Handle<Expression> {
        self.expr(Expression::Deref(expr))
    }

    pub fn binary(
        &mut self,
        op: BinaryOperator,
        left: Handle<Expression>,
        right: Handle<Expression>,
    ) -> Handle<Expression> {
        self.expr(Expression::Binary { op, left, right })
    }

    pub fn add_decl(&mut self, kind: GlobalDeclKind) -> Handle<GlobalDecl> {
        self.decls.append(GlobalDecl { kind }, Span::default())
    }

    pub fn add_const(
        &mut self,
        name: &str,
        ty: Option<Handle<Type>>,
        init: Handle<Expression>,
    ) -> Handle<GlobalDecl> {
        self.add_decl(GlobalDeclKind::Const(Const {
            name: Ident::new(name),
            ty,
            init,
        }))
    }

    pub fn add_override(
        &mut self,
        name: &str,
        ty: Option<Handle<Type>>,
        init: Option<Handle<Expression>>,
    ) -> Handle<GlobalDecl> {
        self.add_decl(GlobalDeclKind::Override(Override {
            name: Ident::new(name),
            ty,
            init,
        }))
    }

    pub fn add_var(
        &mut self,
        name: &str,
        space: AddressSpace,
        ty: Option<Handle<Type>>,
        init: Option<Handle<Expression>>,
    ) -> Handle<GlobalDecl> {
        self.add_decl(GlobalDeclKind::Var(GlobalVariable {
            name: Ident::new(name),
            space,
            access: None,
            ty,
            init,
        }))
    }

    pub fn add_struct(
        &mut self,
        name: &str,
        members: Vec<(&str, Handle<Type>)>,
    ) -> Handle<GlobalDecl> {
        let members = members
            .into_iter()
            .map(|(name, ty)| StructMember {
                name: Ident::new(name),
                ty,
            })
            .collect();
        self.add_decl(GlobalDeclKind::Struct(Struct {
            name: Ident::new(name),
            members,
        }))
    }

    pub fn add_function(
        &mut self,
        name: &str,
        arguments: Vec<(&str, Handle<Type>)>,
        result: Option<Handle<Type>>,
        body: Vec<Statement>,
    ) -> Handle<GlobalDecl> {
        let arguments = arguments
            .into_iter()
            .map(|(name, ty)| FunctionArgument {
                name: Ident::new(name),
                ty,
            })
            .collect();
        self.add_decl(GlobalDeclKind::Fn(Function {
            name: Ident::new(name),
            arguments,
            result,
            body: Block { stmts: body },
        }))
    }
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Statement {
            kind,
            span: Span::default(),
        }
    }

    pub fn let_(name: &str, ty: Option<Handle<Type>>, init: Handle<Expression>) -> Self {
        Self::new(StatementKind::LocalDecl(LocalDecl::Let(Let {
            name: Ident::new(name),
            ty,
            init,
        })))
    }

    pub fn var(name: &str, ty: Option<Handle<Type>>, init: Option<Handle<Expression>>) -> Self {
        Self::new(StatementKind::LocalDecl(LocalDecl::Var(LocalVariable {
            name: Ident::new(name),
            ty,
            init,
        })))
    }

    pub fn const_(name: &str, ty: Option<Handle<Type>>, init: Handle<Expression>) -> Self {
        Self::new(StatementKind::LocalDecl(LocalDecl::Const(Const {
            name: Ident::new(name),
            ty,
            init,
        })))
    }

    pub fn assign(target: Handle<Expression>, value: Handle<Expression>) -> Self {
        Self::new(StatementKind::Assign { target, value })
    }

    pub fn call(function: &str, arguments: Vec<Handle<Expression>>) -> Self {
        Self::new(StatementKind::Call {
            function: Ident::new(function),
            arguments,
        })
    }

    pub fn return_(value: Option<Handle<Expression>>) -> Self {
        Self::new(StatementKind::Return { value })
    }
}
