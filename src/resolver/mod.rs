//! Semantic resolution of an [`ast::Module`].
//!
//! The [`Resolver`] walks global declarations in source order and every
//! expression post-order. Each reached expression gets an
//! [`ExpressionInfo`]: its type, its value when it is a constant expression,
//! and the resolved signature when it calls a builtin. Errors are recorded in
//! the resolver's [`Diagnostics`] and poison the expression they occur in,
//! so enclosing expressions fail silently instead of cascading.

mod construction;
mod error;

pub use error::Error;

use std::num::NonZeroU32;

use arrayvec::ArrayVec;
use num_traits::ToPrimitive as _;
use smallvec::SmallVec;

use crate::{
    ast,
    builtin::{Builtin, BuiltinFunction, Table},
    proc::{clamp_index, constant::Constant, ConstantEvaluator},
    AddressSpace, ArraySize, Diagnostics, FastHashMap, FastHashSet, Handle, ScalarKind, Span,
    StorageAccess, StructMember, Type, TypeInner, UniqueArena, VectorSize,
};

/// Resolver configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "deserialize", derive(serde::Deserialize))]
pub struct Options {
    /// Stop resolving once this many errors have been reported.
    /// `None` never stops.
    pub max_errors: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_errors: Some(25),
        }
    }
}

/// What the resolver knows about one expression.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpressionInfo {
    /// `None` if the expression, or one of its operands, is invalid.
    pub ty: Option<Handle<Type>>,
    /// The value, for constant expressions.
    pub constant: Option<Constant>,
    /// The matched overload, for builtin calls.
    pub builtin: Option<Handle<Builtin>>,
}

/// A successfully resolved expression.
#[derive(Clone, Debug)]
struct Resolved {
    ty: Handle<Type>,
    constant: Option<Constant>,
    builtin: Option<Handle<Builtin>>,
}

impl Resolved {
    const fn value(ty: Handle<Type>, constant: Option<Constant>) -> Self {
        Resolved {
            ty,
            constant,
            builtin: None,
        }
    }
}

/// What a name in scope refers to.
#[derive(Clone, Debug)]
enum Declared {
    Const {
        ty: Handle<Type>,
        value: Constant,
    },
    /// A `let`, a function argument, or a handle-space global.
    Value(Handle<Type>),
    Override {
        decl: Handle<ast::GlobalDecl>,
        ty: Handle<Type>,
    },
    /// A variable; the type is a reference.
    Var(Handle<Type>),
    Function {
        arguments: Vec<Handle<Type>>,
        result: Option<Handle<Type>>,
    },
    Type(Handle<Type>),
    /// A declaration that failed to resolve.
    Poisoned,
}

#[derive(Debug)]
struct FunctionContext {
    name: String,
    result: Option<Handle<Type>>,
}

#[derive(Debug)]
pub struct Resolver {
    types: UniqueArena<Type>,
    table: Table,
    diagnostics: Diagnostics,
    info: Vec<Option<ExpressionInfo>>,
    /// Expressions whose value depends on an `override`.
    override_dependent: FastHashSet<Handle<ast::Expression>>,
    globals: FastHashMap<String, Declared>,
    scopes: Vec<FastHashMap<String, Declared>>,
    function: Option<FunctionContext>,
}

impl Resolver {
    pub fn new(options: Options) -> Self {
        Resolver {
            types: UniqueArena::new(),
            table: Table::new(),
            diagnostics: Diagnostics::new().with_max_errors(options.max_errors),
            info: Vec::new(),
            override_dependent: FastHashSet::default(),
            globals: FastHashMap::default(),
            scopes: Vec::new(),
            function: None,
        }
    }

    /// Attach the source text, so diagnostics print `line:column`.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.diagnostics = std::mem::take(&mut self.diagnostics).with_source(source);
        self
    }

    /// Resolves every declaration of `module`.
    ///
    /// Returns `false` if any error was reported. Warnings do not fail
    /// resolution.
    pub fn resolve(&mut self, module: &ast::Module) -> bool {
        self.info = vec![None; module.expressions.len()];
        self.override_dependent.clear();
        self.globals.clear();

        for (handle, decl) in module.decls.iter() {
            if self.diagnostics.is_full() {
                log::info!(
                    "stopping resolution after {} errors",
                    self.diagnostics.error_count()
                );
                break;
            }
            self.global_decl(module, handle, decl);
        }
        !self.diagnostics.has_errors()
    }

    pub fn info(&self, expr: Handle<ast::Expression>) -> Option<&ExpressionInfo> {
        self.info.get(expr.index()).and_then(Option::as_ref)
    }

    pub fn type_of(&self, expr: Handle<ast::Expression>) -> Option<Handle<Type>> {
        self.info(expr).and_then(|info| info.ty)
    }

    pub fn constant(&self, expr: Handle<ast::Expression>) -> Option<&Constant> {
        self.info(expr).and_then(|info| info.constant.as_ref())
    }

    pub fn builtin(&self, expr: Handle<ast::Expression>) -> Option<&Builtin> {
        let handle = self.info(expr)?.builtin?;
        Some(&self.table[handle])
    }

    pub fn types(&self) -> &UniqueArena<Type> {
        &self.types
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    fn evaluator(&mut self) -> ConstantEvaluator<'_> {
        ConstantEvaluator::new(&mut self.types, &mut self.diagnostics)
    }

    fn report(&mut self, error: Error, span: Span) {
        if error != Error::Poisoned {
            self.diagnostics.add_error(error, span);
        }
    }

    fn type_name(&self, ty: Handle<Type>) -> String {
        self.types.name(ty).to_string()
    }

    fn lookup(&self, name: &str) -> Option<Declared> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.globals.get(name))
            .cloned()
    }

    fn declare(&mut self, name: &ast::Ident, declared: Declared) {
        let scope = match self.scopes.last_mut() {
            Some(scope) => scope,
            None => &mut self.globals,
        };
        if scope.contains_key(&name.name) {
            self.diagnostics
                .add_error(Error::Redefinition(name.name.clone()), name.span);
            return;
        }
        log::trace!("declaring '{}'", name.name);
        scope.insert(name.name.clone(), declared);
    }

    /// Whether a value of type `from` may initialize or be passed as `to`.
    ///
    /// Abstract types convert to the concrete types with the same shape
    /// whose leaf scalar they automatically convert to.
    fn converts(&mut self, from: Handle<Type>, to: Handle<Type>) -> bool {
        if from == to {
            return true;
        }
        let leaves = (
            self.types[from].inner.leaf_scalar(&self.types),
            self.types[to].inner.leaf_scalar(&self.types),
        );
        match leaves {
            (Some(a), Some(b)) if a.is_abstract() && a.automatically_converts_to(b) => {
                self.types.with_leaf_scalar(from, b) == Some(to)
            }
            _ => false,
        }
    }

    fn global_decl(
        &mut self,
        module: &ast::Module,
        handle: Handle<ast::GlobalDecl>,
        decl: &ast::GlobalDecl,
    ) {
        let (name, result) = match decl.kind {
            ast::GlobalDeclKind::Const(ref c) => (&c.name, self.const_decl(module, c)),
            ast::GlobalDeclKind::Override(ref o) => {
                (&o.name, self.override_decl(module, handle, o))
            }
            ast::GlobalDeclKind::Var(ref v) => (&v.name, self.global_var(module, v)),
            ast::GlobalDeclKind::Struct(ref s) => (&s.name, self.struct_decl(module, s)),
            ast::GlobalDeclKind::Fn(ref f) => (&f.name, self.function_decl(module, f)),
        };
        let declared = result.unwrap_or_else(|error| {
            self.report(error, name.span);
            Declared::Poisoned
        });
        self.declare(name, declared);
    }

    fn const_decl(&mut self, module: &ast::Module, c: &ast::Const) -> Result<Declared, Error> {
        let init = self.resolve_expression(module, c.init)?;
        if init.constant.is_none() {
            return Err(Error::NotConstant(c.name.name.clone()));
        }
        let (ty, value) = match c.ty {
            Some(ty) => {
                let ty = self.resolve_type(module, ty)?;
                let value = self.initializer(&c.name, init, ty)?;
                (ty, value)
            }
            None => (init.ty, init.constant),
        };
        match value {
            Some(value) => Ok(Declared::Const { ty, value }),
            None => Err(Error::NotConstant(c.name.name.clone())),
        }
    }

    fn override_decl(
        &mut self,
        module: &ast::Module,
        decl: Handle<ast::GlobalDecl>,
        o: &ast::Override,
    ) -> Result<Declared, Error> {
        let ty = self.declared_type(module, &o.name, o.ty, o.init)?;
        match self.types[ty].inner {
            TypeInner::Scalar(scalar) if !scalar.is_abstract() => {}
            _ => return Err(Error::BadOverrideType(o.name.name.clone())),
        }
        Ok(Declared::Override { decl, ty })
    }

    fn global_var(
        &mut self,
        module: &ast::Module,
        v: &ast::GlobalVariable,
    ) -> Result<Declared, Error> {
        let ty = self.declared_type(module, &v.name, v.ty, v.init)?;
        if v.space == AddressSpace::Handle {
            return Ok(Declared::Value(ty));
        }
        let access = v.access.unwrap_or_else(|| v.space.default_access());
        Ok(Declared::Var(self.types.insert_inner(TypeInner::Reference {
            base: ty,
            space: v.space,
            access,
        })))
    }

    fn struct_decl(&mut self, module: &ast::Module, s: &ast::Struct) -> Result<Declared, Error> {
        let mut members = Vec::with_capacity(s.members.len());
        for member in s.members.iter() {
            members.push(StructMember {
                name: member.name.name.clone(),
                ty: self.resolve_type(module, member.ty)?,
            });
        }
        let ty = self.types.insert(
            Type {
                name: Some(s.name.name.clone()),
                inner: TypeInner::Struct { members },
            },
            s.name.span,
        );
        Ok(Declared::Type(ty))
    }

    fn function_decl(
        &mut self,
        module: &ast::Module,
        f: &ast::Function,
    ) -> Result<Declared, Error> {
        let mut arguments = Vec::with_capacity(f.arguments.len());
        for arg in f.arguments.iter() {
            arguments.push(self.resolve_type(module, arg.ty)?);
        }
        let result = match f.result {
            Some(ty) => Some(self.resolve_type(module, ty)?),
            None => None,
        };

        log::debug!("resolving body of '{}'", f.name.name);
        self.function = Some(FunctionContext {
            name: f.name.name.clone(),
            result,
        });
        self.scopes.push(FastHashMap::default());
        for (arg, &ty) in f.arguments.iter().zip(arguments.iter()) {
            self.declare(&arg.name, Declared::Value(ty));
        }
        self.statements(module, &f.body.stmts);
        self.scopes.pop();
        self.function = None;

        Ok(Declared::Function { arguments, result })
    }

    /// The type of a `var`, `let` or `override`: the annotation if present,
    /// otherwise the concretized type of the initializer.
    fn declared_type(
        &mut self,
        module: &ast::Module,
        name: &ast::Ident,
        ty: Option<Handle<ast::Type>>,
        init: Option<Handle<ast::Expression>>,
    ) -> Result<Handle<Type>, Error> {
        let init = match init {
            Some(init) => Some(self.resolve_expression(module, init)?),
            None => None,
        };
        let ty = match (ty, init.as_ref()) {
            (Some(ty), _) => self.resolve_type(module, ty)?,
            (None, Some(init)) => {
                let loaded = self.types.unwrap_ref(init.ty);
                self.types.concretize(loaded)
            }
            (None, None) => return Err(Error::MissingType(name.name.clone())),
        };
        if let Some(init) = init {
            self.initializer(name, init, ty)?;
        }
        Ok(ty)
    }

    /// Checks that `init` can initialize `name` of type `ty`, converting its
    /// value if it has one.
    fn initializer(
        &mut self,
        name: &ast::Ident,
        init: Resolved,
        ty: Handle<Type>,
    ) -> Result<Option<Constant>, Error> {
        let loaded = self.types.unwrap_ref(init.ty);
        if !self.converts(loaded, ty) {
            return Err(Error::InitializerMismatch {
                name: name.name.clone(),
                expected: self.type_name(ty),
                found: self.type_name(loaded),
            });
        }
        match init.constant {
            Some(ref value) => Ok(self.evaluator().convert(ty, value)?),
            None => Ok(None),
        }
    }

    fn statements(&mut self, module: &ast::Module, stmts: &[ast::Statement]) {
        for stmt in stmts {
            if self.diagnostics.is_full() {
                break;
            }
            self.statement(module, stmt);
        }
    }

    fn statement(&mut self, module: &ast::Module, stmt: &ast::Statement) {
        let result = match stmt.kind {
            ast::StatementKind::LocalDecl(ref decl) => {
                self.local_decl(module, decl);
                Ok(())
            }
            ast::StatementKind::Block(ref block) => {
                self.scopes.push(FastHashMap::default());
                self.statements(module, &block.stmts);
                self.scopes.pop();
                Ok(())
            }
            ast::StatementKind::Assign { target, value } => self.assign(module, target, value),
            ast::StatementKind::Call {
                ref function,
                ref arguments,
            } => self.call(module, function, arguments).map(|_| ()),
            ast::StatementKind::Return { value } => self.return_(module, value),
        };
        if let Err(error) = result {
            self.report(error, stmt.span);
        }
    }

    fn local_decl(&mut self, module: &ast::Module, decl: &ast::LocalDecl) {
        let (name, result) = match *decl {
            ast::LocalDecl::Const(ref c) => (&c.name, self.const_decl(module, c)),
            ast::LocalDecl::Let(ref l) => (
                &l.name,
                self.declared_type(module, &l.name, l.ty, Some(l.init))
                    .map(Declared::Value),
            ),
            ast::LocalDecl::Var(ref v) => (
                &v.name,
                self.declared_type(module, &v.name, v.ty, v.init).map(|ty| {
                    Declared::Var(self.types.insert_inner(TypeInner::Reference {
                        base: ty,
                        space: AddressSpace::Function,
                        access: StorageAccess::READ_WRITE,
                    }))
                }),
            ),
        };
        let declared = result.unwrap_or_else(|error| {
            self.report(error, name.span);
            Declared::Poisoned
        });
        self.declare(name, declared);
    }

    fn assign(
        &mut self,
        module: &ast::Module,
        target: Handle<ast::Expression>,
        value: Handle<ast::Expression>,
    ) -> Result<(), Error> {
        let target = self.resolve_expression(module, target)?;
        let value = self.resolve_expression(module, value)?;
        let base = match self.types[target.ty].inner {
            TypeInner::Reference { base, access, .. } if access.contains(StorageAccess::STORE) => {
                base
            }
            _ => return Err(Error::NotAssignable(self.type_name(target.ty))),
        };
        let loaded = self.types.unwrap_ref(value.ty);
        if !self.converts(loaded, base) {
            return Err(Error::AssignmentMismatch {
                expected: self.type_name(base),
                found: self.type_name(loaded),
            });
        }
        if let Some(ref constant) = value.constant {
            self.evaluator().convert(base, constant)?;
        }
        Ok(())
    }

    fn return_(
        &mut self,
        module: &ast::Module,
        value: Option<Handle<ast::Expression>>,
    ) -> Result<(), Error> {
        let (name, result) = match self.function {
            Some(ref function) => (function.name.clone(), function.result),
            None => return Ok(()),
        };
        match (value, result) {
            (Some(value), Some(expected)) => {
                let value = self.resolve_expression(module, value)?;
                let loaded = self.types.unwrap_ref(value.ty);
                if !self.converts(loaded, expected) {
                    return Err(Error::ReturnMismatch {
                        expected: self.type_name(expected),
                        found: self.type_name(loaded),
                    });
                }
                if let Some(ref constant) = value.constant {
                    self.evaluator().convert(expected, constant)?;
                }
                Ok(())
            }
            (None, Some(_)) => Err(Error::MissingReturnValue(name)),
            (Some(_), None) => Err(Error::UnexpectedReturnValue(name)),
            (None, None) => Ok(()),
        }
    }

    fn resolve_type(
        &mut self,
        module: &ast::Module,
        handle: Handle<ast::Type>,
    ) -> Result<Handle<Type>, Error> {
        let inner = match module.types[handle] {
            ast::Type::Scalar(scalar) => TypeInner::Scalar(scalar),
            ast::Type::Vector { size, ty } => {
                let element = self.resolve_type(module, ty)?;
                match self.types[element].inner {
                    TypeInner::Scalar(scalar) => TypeInner::Vector { size, scalar },
                    _ => return Err(Error::BadVectorElement(self.type_name(element))),
                }
            }
            ast::Type::Matrix { columns, rows, ty } => {
                let element = self.resolve_type(module, ty)?;
                match self.types[element].inner {
                    TypeInner::Scalar(scalar) if scalar.kind == ScalarKind::Float => {
                        TypeInner::Matrix {
                            columns,
                            rows,
                            scalar,
                        }
                    }
                    _ => return Err(Error::BadMatrixElement(self.type_name(element))),
                }
            }
            ast::Type::Atomic(scalar) => match scalar.kind {
                ScalarKind::Sint | ScalarKind::Uint if scalar.width == 4 => {
                    TypeInner::Atomic(scalar)
                }
                _ => return Err(Error::BadAtomicElement(scalar.to_wgsl().to_string())),
            },
            ast::Type::Pointer {
                base,
                space,
                access,
            } => TypeInner::Pointer {
                base: self.resolve_type(module, base)?,
                space,
                access: access.unwrap_or_else(|| space.default_access()),
            },
            ast::Type::Array { base, size } => TypeInner::Array {
                base: self.resolve_type(module, base)?,
                size: self.array_size(module, size)?,
            },
            ast::Type::Sampler(kind) => TypeInner::Sampler(kind),
            ast::Type::SampledTexture { dim, sample_type } => {
                TypeInner::SampledTexture { dim, sample_type }
            }
            ast::Type::MultisampledTexture { dim, sample_type } => {
                TypeInner::MultisampledTexture { dim, sample_type }
            }
            ast::Type::DepthTexture { dim } => TypeInner::DepthTexture { dim },
            ast::Type::DepthMultisampledTexture { dim } => {
                TypeInner::DepthMultisampledTexture { dim }
            }
            ast::Type::StorageTexture {
                dim,
                format,
                access,
            } => TypeInner::StorageTexture {
                dim,
                format,
                access,
            },
            ast::Type::ExternalTexture => TypeInner::ExternalTexture,
            ast::Type::User(ref ident) => {
                return match self.lookup(&ident.name) {
                    Some(Declared::Type(ty)) => Ok(ty),
                    Some(Declared::Poisoned) => Err(Error::Poisoned),
                    _ => Err(Error::UnknownType(ident.name.clone())),
                }
            }
        };
        Ok(self.types.insert_inner(inner))
    }

    fn array_size(
        &mut self,
        module: &ast::Module,
        size: ast::ArraySize,
    ) -> Result<ArraySize, Error> {
        let expr = match size {
            ast::ArraySize::Dynamic => return Ok(ArraySize::Runtime),
            ast::ArraySize::Constant(expr) => expr,
        };
        let count = self.resolve_expression(module, expr)?;
        if let Some(ref constant) = count.constant {
            let is_integer = matches!(
                self.types[count.ty].inner.scalar_kind(),
                Some(ScalarKind::Sint | ScalarKind::Uint | ScalarKind::AbstractInt)
            );
            return constant
                .as_i64()
                .filter(|_| is_integer)
                .and_then(|count| count.to_u32())
                .and_then(NonZeroU32::new)
                .map(ArraySize::Constant)
                .ok_or(Error::BadArrayCount);
        }
        if !self.override_dependent.contains(&expr) {
            return Err(Error::BadArrayCount);
        }
        if let ast::Expression::Ident(ref ident) = module.expressions[expr] {
            if let Some(Declared::Override { decl, .. }) = self.lookup(&ident.name) {
                return Ok(ArraySize::NamedOverride {
                    decl,
                    name: ident.name.clone(),
                });
            }
        }
        Ok(ArraySize::UnnamedOverride(expr))
    }

    /// Resolves `expr` once, recording its [`ExpressionInfo`].
    ///
    /// Returns [`Error::Poisoned`] if it, or one of its operands, failed.
    fn resolve_expression(
        &mut self,
        module: &ast::Module,
        expr: Handle<ast::Expression>,
    ) -> Result<Resolved, Error> {
        if let Some(Some(info)) = self.info.get(expr.index()) {
            return match info.ty {
                Some(ty) => Ok(Resolved {
                    ty,
                    constant: info.constant.clone(),
                    builtin: info.builtin,
                }),
                None => Err(Error::Poisoned),
            };
        }

        let result = self.expression_inner(module, expr);
        let info = match result {
            Ok(ref resolved) => {
                log::trace!(
                    "expression {:?}: {}{}",
                    expr,
                    self.types.name(resolved.ty),
                    if resolved.constant.is_some() {
                        " (constant)"
                    } else {
                        ""
                    }
                );
                ExpressionInfo {
                    ty: Some(resolved.ty),
                    constant: resolved.constant.clone(),
                    builtin: resolved.builtin,
                }
            }
            Err(_) => ExpressionInfo::default(),
        };
        if self.info.len() <= expr.index() {
            self.info.resize(expr.index() + 1, None);
        }
        self.info[expr.index()] = Some(info);

        result.map_err(|error| {
            self.report(error, module.expressions.get_span(expr));
            Error::Poisoned
        })
    }

    /// Resolves every expression of `exprs`, failing if any of them failed.
    fn resolve_all(
        &mut self,
        module: &ast::Module,
        exprs: &[Handle<ast::Expression>],
    ) -> Result<Vec<Resolved>, Error> {
        let results = exprs
            .iter()
            .map(|&expr| self.resolve_expression(module, expr))
            .collect::<Vec<_>>();
        results.into_iter().collect()
    }

    fn expression_inner(
        &mut self,
        module: &ast::Module,
        expr: Handle<ast::Expression>,
    ) -> Result<Resolved, Error> {
        let mut operands = SmallVec::<[Handle<ast::Expression>; 4]>::new();
        let resolved = match module.expressions[expr] {
            ast::Expression::Literal(literal) => {
                let constant = self.evaluator().literal(literal);
                Resolved::value(constant.ty(), Some(constant))
            }
            ast::Expression::Ident(ref ident) => self.ident(expr, ident)?,
            ast::Expression::Construct {
                ref ty,
                ref components,
                ..
            } => {
                operands.extend_from_slice(components);
                let constructor = self.constructor(module, ty)?;
                self.construct(module, constructor, components)?
            }
            ast::Expression::Unary { op, expr: operand } => {
                operands.push(operand);
                self.unary(module, op, operand)?
            }
            ast::Expression::AddrOf(operand) => {
                let operand = self.resolve_expression(module, operand)?;
                match self.types[operand.ty].inner {
                    TypeInner::Reference {
                        base,
                        space,
                        access,
                    } => Resolved::value(
                        self.types.insert_inner(TypeInner::Pointer {
                            base,
                            space,
                            access,
                        }),
                        None,
                    ),
                    _ => return Err(Error::NotReference(self.type_name(operand.ty))),
                }
            }
            ast::Expression::Deref(operand) => {
                let operand = self.resolve_expression(module, operand)?;
                match self.types[operand.ty].inner {
                    TypeInner::Pointer {
                        base,
                        space,
                        access,
                    } => Resolved::value(
                        self.types.insert_inner(TypeInner::Reference {
                            base,
                            space,
                            access,
                        }),
                        None,
                    ),
                    _ => return Err(Error::NotPointer(self.type_name(operand.ty))),
                }
            }
            ast::Expression::Binary { op, left, right } => {
                operands.extend([left, right]);
                self.binary(module, op, left, right)?
            }
            ast::Expression::Call {
                ref function,
                ref arguments,
            } => self.call(module, function, arguments)?,
            ast::Expression::Index { base, index } => {
                operands.extend([base, index]);
                self.index(module, base, index, module.expressions.get_span(expr))?
            }
            ast::Expression::Member { base, ref field } => {
                operands.push(base);
                self.member(module, base, field)?
            }
        };

        if resolved.constant.is_none()
            && operands
                .iter()
                .any(|operand| self.override_dependent.contains(operand))
            && operands.iter().all(|operand| {
                self.override_dependent.contains(operand) || self.constant(*operand).is_some()
            })
        {
            self.override_dependent.insert(expr);
        }
        Ok(resolved)
    }

    fn ident(
        &mut self,
        expr: Handle<ast::Expression>,
        ident: &ast::Ident,
    ) -> Result<Resolved, Error> {
        match self.lookup(&ident.name) {
            Some(Declared::Const { ty, value }) => Ok(Resolved::value(ty, Some(value))),
            Some(Declared::Value(ty)) | Some(Declared::Var(ty)) => Ok(Resolved::value(ty, None)),
            Some(Declared::Override { ty, .. }) => {
                self.override_dependent.insert(expr);
                Ok(Resolved::value(ty, None))
            }
            Some(Declared::Function { .. }) => Err(Error::NotAValue {
                kind: "function",
                name: ident.name.clone(),
            }),
            Some(Declared::Type(_)) => Err(Error::NotAValue {
                kind: "type",
                name: ident.name.clone(),
            }),
            Some(Declared::Poisoned) => Err(Error::Poisoned),
            None => Err(Error::UnknownIdent(ident.name.clone())),
        }
    }

    fn call(
        &mut self,
        module: &ast::Module,
        function: &ast::Ident,
        arguments: &[Handle<ast::Expression>],
    ) -> Result<Resolved, Error> {
        match self.lookup(&function.name) {
            Some(Declared::Type(ty)) => {
                return self.construct(module, construction::Constructor::Type(ty), arguments)
            }
            Some(Declared::Function {
                arguments: params,
                result,
            }) => {
                let args = self.resolve_all(module, arguments)?;
                if args.len() != params.len() {
                    return Err(Error::ArgumentCount {
                        name: function.name.clone(),
                        expected: params.len(),
                        found: args.len(),
                    });
                }
                for (index, (arg, &param)) in args.iter().zip(params.iter()).enumerate() {
                    let loaded = self.types.unwrap_ref(arg.ty);
                    if !self.converts(loaded, param) {
                        return Err(Error::ArgumentType {
                            name: function.name.clone(),
                            index,
                            expected: self.type_name(param),
                            found: self.type_name(loaded),
                        });
                    }
                    if let Some(ref constant) = arg.constant {
                        self.evaluator().convert(param, constant)?;
                    }
                }
                let ty = match result {
                    Some(ty) => ty,
                    None => self.types.void(),
                };
                return Ok(Resolved::value(ty, None));
            }
            Some(Declared::Poisoned) => return Err(Error::Poisoned),
            Some(_) => return Err(Error::UnknownFunction(function.name.clone())),
            None => {}
        }

        let builtin = BuiltinFunction::from_name(&function.name)
            .ok_or_else(|| Error::UnknownFunction(function.name.clone()))?;
        let args = self.resolve_all(module, arguments)?;
        let arg_types = args.iter().map(|arg| arg.ty).collect::<SmallVec<[_; 4]>>();
        let handle = self.table.lookup(builtin, &arg_types, &mut self.types)?;
        let params = self.table[handle]
            .parameters
            .iter()
            .map(|param| param.ty)
            .collect::<SmallVec<[_; 4]>>();
        for (arg, &param) in args.iter().zip(params.iter()) {
            if let Some(ref constant) = arg.constant {
                self.evaluator().convert(param, constant)?;
            }
        }
        let ty = match self.table[handle].return_type {
            Some(ty) => ty,
            None => self.types.void(),
        };
        Ok(Resolved {
            ty,
            constant: None,
            builtin: Some(handle),
        })
    }

    /// Splits a reference type into its pointee and its space and access.
    fn split_reference(
        &self,
        ty: Handle<Type>,
    ) -> (Handle<Type>, Option<(AddressSpace, StorageAccess)>) {
        match self.types[ty].inner {
            TypeInner::Reference {
                base,
                space,
                access,
            } => (base, Some((space, access))),
            _ => (ty, None),
        }
    }

    fn rewrap_reference(
        &mut self,
        base: Handle<Type>,
        reference: Option<(AddressSpace, StorageAccess)>,
    ) -> Handle<Type> {
        match reference {
            Some((space, access)) => self.types.insert_inner(TypeInner::Reference {
                base,
                space,
                access,
            }),
            None => base,
        }
    }

    fn index(
        &mut self,
        module: &ast::Module,
        base: Handle<ast::Expression>,
        index: Handle<ast::Expression>,
        span: Span,
    ) -> Result<Resolved, Error> {
        let base = self.resolve_expression(module, base)?;
        let index = self.resolve_expression(module, index)?;

        let index_ty = self.types.unwrap_ref(index.ty);
        if !matches!(
            self.types[index_ty].inner,
            TypeInner::Scalar(scalar) if matches!(
                scalar.kind,
                ScalarKind::Sint | ScalarKind::Uint | ScalarKind::AbstractInt
            )
        ) {
            return Err(Error::BadIndexType(self.type_name(index_ty)));
        }

        let (value_ty, reference) = self.split_reference(base.ty);
        let (element, count) = match self.types[value_ty].inner {
            TypeInner::Vector { size, scalar } => (self.types.scalar(scalar), Some(size as usize)),
            TypeInner::Matrix {
                columns,
                rows,
                scalar,
            } => (self.types.vector(rows, scalar), Some(columns as usize)),
            TypeInner::Array {
                base,
                size: ArraySize::Constant(count),
            } => (base, Some(count.get() as usize)),
            TypeInner::Array { base, .. } => (base, None),
            _ => return Err(Error::BadIndexBase(self.type_name(value_ty))),
        };
        let ty = self.rewrap_reference(element, reference);

        let constant_index = index.constant.as_ref().and_then(Constant::as_i64);
        let constant = match (base.constant, constant_index) {
            (Some(ref base), Some(i)) => self.evaluator().index(base, i, span),
            (None, Some(i)) => {
                if let Some(count) = count {
                    if let (_, Some(warning)) = clamp_index(i, count) {
                        self.diagnostics.add_warning(warning, span);
                    }
                }
                None
            }
            _ => None,
        };
        Ok(Resolved::value(ty, constant))
    }

    fn member(
        &mut self,
        module: &ast::Module,
        base: Handle<ast::Expression>,
        field: &ast::Ident,
    ) -> Result<Resolved, Error> {
        let base = self.resolve_expression(module, base)?;
        let (value_ty, reference) = self.split_reference(base.ty);

        match self.types[value_ty].inner {
            TypeInner::Struct { ref members } => {
                let (index, member_ty) = members
                    .iter()
                    .enumerate()
                    .find(|&(_, member)| member.name == field.name)
                    .map(|(index, member)| (index, member.ty))
                    .ok_or_else(|| Error::UnknownMember {
                        ty: self.type_name(value_ty),
                        member: field.name.clone(),
                    })?;
                let ty = self.rewrap_reference(member_ty, reference);
                let constant = match base.constant {
                    Some(ref base) => self.evaluator().member(base, index),
                    None => None,
                };
                Ok(Resolved::value(ty, constant))
            }
            TypeInner::Vector { size, scalar } => {
                let pattern = swizzle(&field.name, size)
                    .ok_or_else(|| Error::BadSwizzle(field.name.clone()))?;
                let ty = match VectorSize::from_u32(pattern.len() as u32) {
                    Some(size) => self.types.vector(size, scalar),
                    None => {
                        let element = self.types.scalar(scalar);
                        self.rewrap_reference(element, reference)
                    }
                };
                let constant = match base.constant {
                    Some(ref base) => self.evaluator().swizzle(base, &pattern, ty),
                    None => None,
                };
                Ok(Resolved::value(ty, constant))
            }
            _ => Err(Error::BadMemberBase {
                ty: self.type_name(value_ty),
                member: field.name.clone(),
            }),
        }
    }

    fn unary(
        &mut self,
        module: &ast::Module,
        op: ast::UnaryOperator,
        operand: Handle<ast::Expression>,
    ) -> Result<Resolved, Error> {
        let operand = self.resolve_expression(module, operand)?;
        let ty = self.types.unwrap_ref(operand.ty);
        let kind = match self.types[ty].inner {
            TypeInner::Scalar(scalar) | TypeInner::Vector { scalar, .. } => Some(scalar.kind),
            _ => None,
        };
        let valid = match (op, kind) {
            (ast::UnaryOperator::Negate, Some(kind)) => matches!(
                kind,
                ScalarKind::Sint
                    | ScalarKind::Float
                    | ScalarKind::AbstractInt
                    | ScalarKind::AbstractFloat
            ),
            (ast::UnaryOperator::LogicalNot, Some(kind)) => kind == ScalarKind::Bool,
            (ast::UnaryOperator::BitwiseNot, Some(kind)) => matches!(
                kind,
                ScalarKind::Sint | ScalarKind::Uint | ScalarKind::AbstractInt
            ),
            (_, None) => false,
        };
        if !valid {
            return Err(Error::BadUnaryOperand {
                op: op.to_wgsl(),
                ty: self.type_name(ty),
            });
        }
        let constant = match operand.constant {
            Some(ref constant) => Some(self.evaluator().unary(op, constant)?),
            None => None,
        };
        Ok(Resolved::value(ty, constant))
    }

    fn binary(
        &mut self,
        module: &ast::Module,
        op: ast::BinaryOperator,
        left: Handle<ast::Expression>,
        right: Handle<ast::Expression>,
    ) -> Result<Resolved, Error> {
        use ast::BinaryOperator as Bo;

        let (lhs, rhs) = (
            self.resolve_expression(module, left),
            self.resolve_expression(module, right),
        );
        let (lhs, rhs) = (lhs?, rhs?);
        let lt = self.types.unwrap_ref(lhs.ty);
        let rt = self.types.unwrap_ref(rhs.ty);
        let bad = |this: &Self| Error::BadBinaryOperands {
            op: op.to_wgsl(),
            left: this.type_name(lt),
            right: this.type_name(rt),
        };

        let (ls, rs) = match (
            self.types[lt].inner.element_of(),
            self.types[rt].inner.element_of(),
        ) {
            (Some((ls, _)), Some((rs, _))) => (ls, rs),
            _ => return Err(bad(self)),
        };

        let (lt, rt, result) = if let Bo::ShiftLeft | Bo::ShiftRight = op {
            let lhs_integer = matches!(
                ls.kind,
                ScalarKind::Sint | ScalarKind::Uint | ScalarKind::AbstractInt
            );
            let rhs_unsigned = matches!(rs.kind, ScalarKind::Uint | ScalarKind::AbstractInt);
            let same_shape = match (&self.types[lt].inner, &self.types[rt].inner) {
                (&TypeInner::Scalar(_), &TypeInner::Scalar(_)) => true,
                (&TypeInner::Vector { size: a, .. }, &TypeInner::Vector { size: b, .. }) => a == b,
                _ => false,
            };
            if !(lhs_integer && rhs_unsigned && same_shape) {
                return Err(bad(self));
            }
            let rt = if rs.is_abstract() && !ls.is_abstract() {
                self.types
                    .with_leaf_scalar(rt, crate::Scalar::U32)
                    .unwrap_or(rt)
            } else {
                rt
            };
            (lt, rt, Some(lt))
        } else {
            let combined = match ls.automatic_conversion_combine(rs) {
                Some(combined) => combined,
                None => return Err(bad(self)),
            };
            let lt = match ls == combined {
                true => lt,
                false => self.types.with_leaf_scalar(lt, combined).unwrap_or(lt),
            };
            let rt = match rs == combined {
                true => rt,
                false => self.types.with_leaf_scalar(rt, combined).unwrap_or(rt),
            };
            (lt, rt, self.binary_result(op, lt, rt))
        };
        let result = match result {
            Some(result) => result,
            None => return Err(bad(self)),
        };

        let constant = match (lhs.constant, rhs.constant) {
            (Some(ref l), Some(ref r)) => {
                let mut evaluator = self.evaluator();
                let l = evaluator.convert(lt, l)?;
                let r = evaluator.convert(rt, r)?;
                match (l, r) {
                    (Some(l), Some(r)) => evaluator.binary(op, &l, &r, result)?,
                    _ => None,
                }
            }
            _ => None,
        };
        Ok(Resolved::value(result, constant))
    }

    /// The result type of a non-shift binary operator whose operands have
    /// already been converted to a common leaf scalar.
    fn binary_result(
        &mut self,
        op: ast::BinaryOperator,
        lt: Handle<Type>,
        rt: Handle<Type>,
    ) -> Option<Handle<Type>> {
        use ast::BinaryOperator as Bo;
        use TypeInner as Ti;

        let (left, right) = (self.types[lt].inner.clone(), self.types[rt].inner.clone());
        let scalar = left.scalar()?;
        let numeric = scalar.is_numeric();
        let float = matches!(scalar.kind, ScalarKind::Float | ScalarKind::AbstractFloat);
        let integer = matches!(
            scalar.kind,
            ScalarKind::Sint | ScalarKind::Uint | ScalarKind::AbstractInt
        );

        // Scalar and vector operands of matching size, with broadcasting.
        let componentwise = match (&left, &right) {
            (&Ti::Scalar(_), &Ti::Scalar(_)) => Some(lt),
            (&Ti::Vector { size: a, .. }, &Ti::Vector { size: b, .. }) if a == b => Some(lt),
            (&Ti::Vector { .. }, &Ti::Scalar(_)) => Some(lt),
            (&Ti::Scalar(_), &Ti::Vector { .. }) => Some(rt),
            _ => None,
        };
        let same_shape = match (&left, &right) {
            (&Ti::Scalar(_), &Ti::Scalar(_)) => Some(None),
            (&Ti::Vector { size: a, .. }, &Ti::Vector { size: b, .. }) if a == b => Some(Some(a)),
            _ => None,
        };
        let boolean = |types: &mut UniqueArena<Type>, size: Option<VectorSize>| match size {
            Some(size) => types.vector(size, crate::Scalar::BOOL),
            None => types.scalar(crate::Scalar::BOOL),
        };

        match op {
            Bo::Add | Bo::Subtract => match (&left, &right) {
                (
                    &Ti::Matrix {
                        columns: c1,
                        rows: r1,
                        ..
                    },
                    &Ti::Matrix {
                        columns: c2,
                        rows: r2,
                        ..
                    },
                ) if float && c1 == c2 && r1 == r2 => Some(lt),
                _ if numeric => componentwise,
                _ => None,
            },
            Bo::Multiply => match (left, right) {
                (Ti::Matrix { .. }, Ti::Scalar(_)) if float => Some(lt),
                (Ti::Scalar(_), Ti::Matrix { .. }) if float => Some(rt),
                (
                    Ti::Matrix {
                        columns,
                        rows,
                        scalar,
                    },
                    Ti::Vector { size, .. },
                ) if size == columns => Some(self.types.vector(rows, scalar)),
                (
                    Ti::Vector { size, .. },
                    Ti::Matrix {
                        columns,
                        rows,
                        scalar,
                    },
                ) if size == rows => Some(self.types.vector(columns, scalar)),
                (
                    Ti::Matrix {
                        columns: k,
                        rows,
                        scalar,
                    },
                    Ti::Matrix {
                        columns, rows: k2, ..
                    },
                ) if k == k2 => Some(self.types.matrix(columns, rows, scalar)),
                _ if numeric => componentwise,
                _ => None,
            },
            Bo::Divide | Bo::Modulo if numeric => componentwise,
            Bo::And | Bo::InclusiveOr | Bo::ExclusiveOr if integer || !numeric => {
                same_shape.map(|_| lt)
            }
            Bo::LogicalAnd | Bo::LogicalOr if !numeric => match same_shape {
                Some(None) => Some(lt),
                _ => None,
            },
            Bo::Equal | Bo::NotEqual => same_shape.map(|size| boolean(&mut self.types, size)),
            Bo::Less | Bo::LessEqual | Bo::Greater | Bo::GreaterEqual if numeric => {
                same_shape.map(|size| boolean(&mut self.types, size))
            }
            _ => None,
        }
    }
}

/// Component indices named by a swizzle of a vector of `size`, taken from
/// a single component set.
fn swizzle(name: &str, size: VectorSize) -> Option<ArrayVec<u8, 4>> {
    const SETS: [&str; 2] = ["xyzw", "rgba"];
    if name.is_empty() || name.len() > 4 {
        return None;
    }
    SETS.iter().find_map(|set| {
        name.chars()
            .map(|c| {
                set.find(c)
                    .map(|index| index as u8)
                    .filter(|&index| (index as u32) < size as u32)
            })
            .collect::<Option<ArrayVec<u8, 4>>>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swizzle_sets_do_not_mix() {
        assert_eq!(
            swizzle("gbr", VectorSize::Tri).as_deref(),
            Some(&[1, 2, 0][..])
        );
        assert_eq!(
            swizzle("xx", VectorSize::Bi).as_deref(),
            Some(&[0, 0][..])
        );
        assert_eq!(swizzle("xg", VectorSize::Tri), None);
        assert_eq!(swizzle("z", VectorSize::Bi), None);
        assert_eq!(swizzle("xyzwx", VectorSize::Quad), None);
        assert_eq!(swizzle("", VectorSize::Quad), None);
    }

    #[test]
    fn default_options_stop_after_25_errors() {
        assert_eq!(Options::default().max_errors, Some(25));
    }
}
