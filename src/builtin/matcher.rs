//! Overload patterns and the unification of argument types against them.

use std::fmt::{self, Write as _};

use super::ParameterUsage;
use crate::{
    AddressSpace, ArraySize, Handle, SamplerKind, Scalar, Span, StorageAccess, StructMember,
    TexelFormat, TextureDimension, Type, TypeInner, UniqueArena, VectorSize,
};

/// A value an open number can be bound to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(super) enum Number {
    Size(VectorSize),
    Format(TexelFormat),
    Access(StorageAccess),
    Space(AddressSpace),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Size(size) => write!(f, "{}", size as u32),
            Self::Format(format) => f.write_str(format.to_wgsl()),
            Self::Access(access) => f.write_str(access.to_wgsl()),
            Self::Space(space) => f.write_str(space.to_wgsl()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) enum NumberPattern {
    Fixed(Number),
    Open(usize),
}

/// The set of scalars an open type may be bound to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum TypeConstraint {
    Any,
    Fiu32,
    Iu32,
    Scalar,
}

impl TypeConstraint {
    /// Concrete scalars satisfying the constraint, in the order an
    /// abstract binding prefers them.
    fn scalars(self) -> &'static [Scalar] {
        match self {
            Self::Any => &[],
            Self::Fiu32 => &[Scalar::I32, Scalar::U32, Scalar::F32],
            Self::Iu32 => &[Scalar::I32, Scalar::U32],
            Self::Scalar => &[Scalar::I32, Scalar::U32, Scalar::F32, Scalar::BOOL],
        }
    }

    const fn describe(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Fiu32 => Some("f32, i32 or u32"),
            Self::Iu32 => Some("i32 or u32"),
            Self::Scalar => Some("f32, i32, u32 or bool"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum NumberConstraint {
    Any,
    Write,
    WorkgroupOrStorage,
    F32TexelFormat,
    I32TexelFormat,
    U32TexelFormat,
}

impl NumberConstraint {
    fn accepts(self, number: Number) -> bool {
        match (self, number) {
            (Self::Any, _) => true,
            (Self::Write, Number::Access(access)) => access == StorageAccess::STORE,
            (Self::WorkgroupOrStorage, Number::Space(space)) => {
                matches!(space, AddressSpace::WorkGroup | AddressSpace::Storage)
            }
            (Self::F32TexelFormat, Number::Format(format)) => format.scalar() == Scalar::F32,
            (Self::I32TexelFormat, Number::Format(format)) => format.scalar() == Scalar::I32,
            (Self::U32TexelFormat, Number::Format(format)) => format.scalar() == Scalar::U32,
            _ => false,
        }
    }

    const fn describe(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Write => Some("write"),
            Self::WorkgroupOrStorage => Some("workgroup or storage"),
            Self::F32TexelFormat => {
                Some("rgba8unorm, rgba8snorm, rgba16float, r32float, rg32float or rgba32float")
            }
            Self::I32TexelFormat => Some("rgba8sint, rgba16sint, r32sint, rg32sint or rgba32sint"),
            Self::U32TexelFormat => Some("rgba8uint, rgba16uint, r32uint, rg32uint or rgba32uint"),
        }
    }
}

#[derive(Clone, Debug)]
pub(super) enum TypePattern {
    Scalar(Scalar),
    Open(usize),
    Vector(NumberPattern, Box<TypePattern>),
    Matrix(NumberPattern, NumberPattern, Box<TypePattern>),
    RuntimeArray(Box<TypePattern>),
    Pointer(NumberPattern, Box<TypePattern>, NumberPattern),
    Atomic(Box<TypePattern>),
    Sampler(SamplerKind),
    Texture(TextureDimension, Box<TypePattern>),
    MultisampledTexture(TextureDimension, Box<TypePattern>),
    DepthTexture(TextureDimension),
    DepthMultisampledTexture(TextureDimension),
    StorageTexture(TextureDimension, NumberPattern, NumberPattern),
    ExternalTexture,
    ModfResult(Box<TypePattern>),
    FrexpResult(Box<TypePattern>),
    AtomicCompareExchangeResult(Box<TypePattern>),
}

#[derive(Clone, Debug)]
pub(super) struct OpenType {
    pub name: &'static str,
    pub constraint: TypeConstraint,
}

#[derive(Clone, Debug)]
pub(super) struct OpenNumber {
    pub name: &'static str,
    pub constraint: NumberConstraint,
}

#[derive(Clone, Debug)]
pub(super) struct ParameterPattern {
    pub usage: ParameterUsage,
    pub ty: TypePattern,
}

/// One signature of a builtin function.
#[derive(Clone, Debug, Default)]
pub(super) struct Overload {
    pub open_types: Vec<OpenType>,
    pub open_numbers: Vec<OpenNumber>,
    pub parameters: Vec<ParameterPattern>,
    pub return_type: Option<TypePattern>,
}

/// Bindings of the open types and numbers of one overload.
#[derive(Debug)]
pub(super) struct ClosedState {
    types: Vec<Option<Handle<Type>>>,
    numbers: Vec<Option<Number>>,
}

impl ClosedState {
    pub fn new(overload: &Overload) -> Self {
        ClosedState {
            types: vec![None; overload.open_types.len()],
            numbers: vec![None; overload.open_numbers.len()],
        }
    }

    fn bind_type(&mut self, index: usize, ty: Handle<Type>, types: &mut UniqueArena<Type>) -> bool {
        let bound = match self.types[index] {
            None => {
                self.types[index] = Some(ty);
                return true;
            }
            Some(bound) if bound == ty => return true,
            Some(bound) => bound,
        };
        match (&types[bound].inner, &types[ty].inner) {
            (&TypeInner::Scalar(a), &TypeInner::Scalar(b)) => {
                match a.automatic_conversion_combine(b) {
                    Some(combined) => {
                        self.types[index] = Some(types.scalar(combined));
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    fn bind_number(&mut self, index: usize, number: Number) -> bool {
        match self.numbers[index] {
            None => {
                self.numbers[index] = Some(number);
                true
            }
            Some(bound) => bound == number,
        }
    }
}

impl Overload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_type(mut self, name: &'static str, constraint: TypeConstraint) -> Self {
        self.open_types.push(OpenType { name, constraint });
        self
    }

    pub fn open_number(mut self, name: &'static str, constraint: NumberConstraint) -> Self {
        self.open_numbers.push(OpenNumber { name, constraint });
        self
    }

    pub fn param(mut self, usage: ParameterUsage, ty: TypePattern) -> Self {
        self.parameters.push(ParameterPattern { usage, ty });
        self
    }

    pub fn returns(mut self, ty: TypePattern) -> Self {
        self.return_type = Some(ty);
        self
    }

    /// Number of open types and numbers that carry a constraint.
    fn constrained_count(&self) -> usize {
        self.open_types
            .iter()
            .filter(|open| open.constraint != TypeConstraint::Any)
            .count()
            + self
                .open_numbers
                .iter()
                .filter(|open| open.constraint != NumberConstraint::Any)
                .count()
    }

    /// Scores how well `args` fit this overload. A full match returns the
    /// closed state alongside the score.
    pub fn score(
        &self,
        args: &[Handle<Type>],
        types: &mut UniqueArena<Type>,
    ) -> (i32, Option<ClosedState>) {
        let mut score = 1000;
        let mut state = ClosedState::new(self);
        let mut matched = args.len() == self.parameters.len();
        score -= (self.parameters.len() as i32 - args.len() as i32).abs();

        for (param, &arg) in self.parameters.iter().zip(args) {
            let arg = types.unwrap_ref(arg);
            if self.match_type(&param.ty, arg, &mut state, types) {
                score += 2;
            } else {
                matched = false;
            }
        }

        if !matched {
            return (score, None);
        }
        if !self.close(&mut state, types) {
            return (score, None);
        }
        score += self.constrained_count() as i32;
        (score, Some(state))
    }

    /// Checks constraints and materializes abstract bindings.
    fn close(&self, state: &mut ClosedState, types: &mut UniqueArena<Type>) -> bool {
        for (open, binding) in self.open_types.iter().zip(state.types.iter_mut()) {
            let ty = match *binding {
                Some(ty) => ty,
                None => continue,
            };
            let scalar = match types[ty].inner {
                TypeInner::Scalar(scalar) => scalar,
                _ if open.constraint == TypeConstraint::Any => {
                    *binding = Some(types.concretize(ty));
                    continue;
                }
                _ => return false,
            };
            let concrete = if open.constraint == TypeConstraint::Any {
                scalar.concretize()
            } else {
                let allowed = open.constraint.scalars();
                if scalar.is_abstract() {
                    match allowed
                        .iter()
                        .copied()
                        .find(|&candidate| scalar.automatically_converts_to(candidate))
                    {
                        Some(concrete) => concrete,
                        None => return false,
                    }
                } else if allowed.contains(&scalar) {
                    scalar
                } else {
                    return false;
                }
            };
            *binding = Some(types.scalar(concrete));
        }
        for (open, binding) in self.open_numbers.iter().zip(state.numbers.iter()) {
            if let Some(number) = *binding {
                if !open.constraint.accepts(number) {
                    return false;
                }
            }
        }
        true
    }

    fn match_number(
        &self,
        pattern: NumberPattern,
        number: Number,
        state: &mut ClosedState,
    ) -> bool {
        match pattern {
            NumberPattern::Fixed(fixed) => fixed == number,
            NumberPattern::Open(index) => state.bind_number(index, number),
        }
    }

    fn match_type(
        &self,
        pattern: &TypePattern,
        ty: Handle<Type>,
        state: &mut ClosedState,
        types: &mut UniqueArena<Type>,
    ) -> bool {
        use TypePattern as Tp;

        match (pattern, types[ty].inner.clone()) {
            (&Tp::Scalar(goal), TypeInner::Scalar(scalar)) => {
                scalar.automatically_converts_to(goal)
            }
            (&Tp::Open(index), _) => state.bind_type(index, ty, types),
            (&Tp::Vector(n, ref element), TypeInner::Vector { size, scalar }) => {
                let element_ty = types.scalar(scalar);
                self.match_number(n, Number::Size(size), state)
                    && self.match_type(element, element_ty, state, types)
            }
            (
                &Tp::Matrix(c, r, ref element),
                TypeInner::Matrix {
                    columns,
                    rows,
                    scalar,
                },
            ) => {
                let element_ty = types.scalar(scalar);
                self.match_number(c, Number::Size(columns), state)
                    && self.match_number(r, Number::Size(rows), state)
                    && self.match_type(element, element_ty, state, types)
            }
            (
                &Tp::RuntimeArray(ref element),
                TypeInner::Array {
                    base,
                    size: ArraySize::Runtime,
                },
            ) => self.match_type(element, base, state, types),
            (
                &Tp::Pointer(s, ref base_pattern, a),
                TypeInner::Pointer {
                    base,
                    space,
                    access,
                },
            ) => {
                self.match_number(s, Number::Space(space), state)
                    && self.match_type(base_pattern, base, state, types)
                    && self.match_number(a, Number::Access(access), state)
            }
            (&Tp::Atomic(ref element), TypeInner::Atomic(scalar)) => {
                let element_ty = types.scalar(scalar);
                self.match_type(element, element_ty, state, types)
            }
            (&Tp::Sampler(goal), TypeInner::Sampler(kind)) => goal == kind,
            (&Tp::Texture(goal, ref sampled), TypeInner::SampledTexture { dim, sample_type }) => {
                let sample_ty = types.scalar(sample_type);
                goal == dim && self.match_type(sampled, sample_ty, state, types)
            }
            (
                &Tp::MultisampledTexture(goal, ref sampled),
                TypeInner::MultisampledTexture { dim, sample_type },
            ) => {
                let sample_ty = types.scalar(sample_type);
                goal == dim && self.match_type(sampled, sample_ty, state, types)
            }
            (&Tp::DepthTexture(goal), TypeInner::DepthTexture { dim }) => goal == dim,
            (&Tp::DepthMultisampledTexture(goal), TypeInner::DepthMultisampledTexture { dim }) => {
                goal == dim
            }
            (
                &Tp::StorageTexture(goal, f, a),
                TypeInner::StorageTexture {
                    dim,
                    format,
                    access,
                },
            ) => {
                goal == dim
                    && self.match_number(f, Number::Format(format), state)
                    && self.match_number(a, Number::Access(access), state)
            }
            (&Tp::ExternalTexture, TypeInner::ExternalTexture) => true,
            _ => false,
        }
    }

    /// Builds the concrete type of `pattern` under a closed state.
    pub fn build(
        &self,
        pattern: &TypePattern,
        state: &ClosedState,
        types: &mut UniqueArena<Type>,
    ) -> Option<Handle<Type>> {
        use TypePattern as Tp;

        let number = |n: NumberPattern| match n {
            NumberPattern::Fixed(number) => Some(number),
            NumberPattern::Open(index) => state.numbers[index],
        };
        let size = |n: NumberPattern| match number(n) {
            Some(Number::Size(size)) => Some(size),
            _ => None,
        };
        let element_scalar = |ty: Handle<Type>, types: &UniqueArena<Type>| types[ty].inner.scalar();

        let inner = match *pattern {
            Tp::Scalar(scalar) => return Some(types.scalar(scalar)),
            Tp::Open(index) => return state.types[index],
            Tp::Vector(n, ref element) => {
                let element = self.build(element, state, types)?;
                TypeInner::Vector {
                    size: size(n)?,
                    scalar: element_scalar(element, types)?,
                }
            }
            Tp::Matrix(c, r, ref element) => {
                let element = self.build(element, state, types)?;
                TypeInner::Matrix {
                    columns: size(c)?,
                    rows: size(r)?,
                    scalar: element_scalar(element, types)?,
                }
            }
            Tp::RuntimeArray(ref element) => TypeInner::Array {
                base: self.build(element, state, types)?,
                size: ArraySize::Runtime,
            },
            Tp::Pointer(s, ref base, a) => {
                let base = self.build(base, state, types)?;
                match (number(s)?, number(a)?) {
                    (Number::Space(space), Number::Access(access)) => TypeInner::Pointer {
                        base,
                        space,
                        access,
                    },
                    _ => return None,
                }
            }
            Tp::Atomic(ref element) => {
                let element = self.build(element, state, types)?;
                TypeInner::Atomic(element_scalar(element, types)?)
            }
            Tp::Sampler(kind) => TypeInner::Sampler(kind),
            Tp::Texture(dim, ref sampled) => {
                let sampled = self.build(sampled, state, types)?;
                TypeInner::SampledTexture {
                    dim,
                    sample_type: element_scalar(sampled, types)?,
                }
            }
            Tp::MultisampledTexture(dim, ref sampled) => {
                let sampled = self.build(sampled, state, types)?;
                TypeInner::MultisampledTexture {
                    dim,
                    sample_type: element_scalar(sampled, types)?,
                }
            }
            Tp::DepthTexture(dim) => TypeInner::DepthTexture { dim },
            Tp::DepthMultisampledTexture(dim) => TypeInner::DepthMultisampledTexture { dim },
            Tp::StorageTexture(dim, f, a) => match (number(f)?, number(a)?) {
                (Number::Format(format), Number::Access(access)) => TypeInner::StorageTexture {
                    dim,
                    format,
                    access,
                },
                _ => return None,
            },
            Tp::ExternalTexture => TypeInner::ExternalTexture,
            Tp::ModfResult(ref arg) => {
                let arg = self.build(arg, state, types)?;
                let name = result_name("__modf_result", &types[arg].inner);
                return Some(result_struct(
                    name,
                    &[("fract", arg), ("whole", arg)],
                    types,
                ));
            }
            Tp::FrexpResult(ref arg) => {
                let arg = self.build(arg, state, types)?;
                let exp = match types[arg].inner {
                    TypeInner::Vector { size, .. } => types.vector(size, Scalar::I32),
                    _ => types.scalar(Scalar::I32),
                };
                let name = result_name("__frexp_result", &types[arg].inner);
                return Some(result_struct(name, &[("sig", arg), ("exp", exp)], types));
            }
            Tp::AtomicCompareExchangeResult(ref element) => {
                let element = self.build(element, state, types)?;
                let exchanged = types.scalar(Scalar::BOOL);
                let name = format!(
                    "__atomic_compare_exchange_result<{}>",
                    types[element].to_wgsl(types)
                );
                return Some(result_struct(
                    name,
                    &[("old_value", element), ("exchanged", exchanged)],
                    types,
                ));
            }
        };
        Some(types.insert_inner(inner))
    }

    /// Writes the overload as it appears in candidate listings, e.g.
    /// `clamp(T, T, T) -> T  where: T is f32, i32 or u32`.
    pub fn describe(&self, name: &str) -> String {
        let mut out = String::new();
        let _ = write!(out, "{}(", name);
        for (i, param) in self.parameters.iter().enumerate() {
            if i != 0 {
                out.push_str(", ");
            }
            if let Some(label) = param.usage.label() {
                let _ = write!(out, "{}: ", label);
            }
            self.describe_type(&param.ty, &mut out);
        }
        out.push(')');
        if let Some(ref ret) = self.return_type {
            out.push_str(" -> ");
            self.describe_type(ret, &mut out);
        }

        let mut first = true;
        let constraints = self
            .open_types
            .iter()
            .filter_map(|open| Some((open.name, open.constraint.describe()?)))
            .chain(
                self.open_numbers
                    .iter()
                    .filter_map(|open| Some((open.name, open.constraint.describe()?))),
            );
        for (name, constraint) in constraints {
            out.push_str(if first { "  where: " } else { ", " });
            first = false;
            let _ = write!(out, "{} is {}", name, constraint);
        }
        out
    }

    fn describe_number(&self, pattern: NumberPattern) -> String {
        match pattern {
            NumberPattern::Fixed(number) => number.to_string(),
            NumberPattern::Open(index) => self.open_numbers[index].name.to_string(),
        }
    }

    fn describe_type(&self, pattern: &TypePattern, out: &mut String) {
        use TypePattern as Tp;

        let _ = match *pattern {
            Tp::Scalar(scalar) => write!(out, "{}", scalar.to_wgsl()),
            Tp::Open(index) => write!(out, "{}", self.open_types[index].name),
            Tp::Vector(n, ref element) => {
                let _ = write!(out, "vec{}<", self.describe_number(n));
                self.describe_type(element, out);
                write!(out, ">")
            }
            Tp::Matrix(c, r, ref element) => {
                let _ = write!(
                    out,
                    "mat{}x{}<",
                    self.describe_number(c),
                    self.describe_number(r)
                );
                self.describe_type(element, out);
                write!(out, ">")
            }
            Tp::RuntimeArray(ref element) => {
                out.push_str("array<");
                self.describe_type(element, out);
                write!(out, ">")
            }
            Tp::Pointer(s, ref base, a) => {
                let _ = write!(out, "ptr<{}, ", self.describe_number(s));
                self.describe_type(base, out);
                write!(out, ", {}>", self.describe_number(a))
            }
            Tp::Atomic(ref element) => {
                out.push_str("atomic<");
                self.describe_type(element, out);
                write!(out, ">")
            }
            Tp::Sampler(kind) => write!(out, "{}", kind.to_wgsl()),
            Tp::Texture(dim, ref sampled) => {
                let _ = write!(out, "texture_{}<", dim.to_wgsl());
                self.describe_type(sampled, out);
                write!(out, ">")
            }
            Tp::MultisampledTexture(dim, ref sampled) => {
                let _ = write!(out, "texture_multisampled_{}<", dim.to_wgsl());
                self.describe_type(sampled, out);
                write!(out, ">")
            }
            Tp::DepthTexture(dim) => write!(out, "texture_depth_{}", dim.to_wgsl()),
            Tp::DepthMultisampledTexture(dim) => {
                write!(out, "texture_depth_multisampled_{}", dim.to_wgsl())
            }
            Tp::StorageTexture(dim, f, a) => write!(
                out,
                "texture_storage_{}<{}, {}>",
                dim.to_wgsl(),
                self.describe_number(f),
                self.describe_number(a)
            ),
            Tp::ExternalTexture => write!(out, "texture_external"),
            Tp::ModfResult(ref arg) => self.describe_result("__modf_result", arg, out),
            Tp::FrexpResult(ref arg) => self.describe_result("__frexp_result", arg, out),
            Tp::AtomicCompareExchangeResult(ref element) => {
                out.push_str("__atomic_compare_exchange_result<");
                self.describe_type(element, out);
                write!(out, ">")
            }
        };
    }

    fn describe_result(&self, prefix: &str, arg: &TypePattern, out: &mut String) -> fmt::Result {
        match *arg {
            TypePattern::Vector(n, _) => write!(out, "{}_vec{}", prefix, self.describe_number(n)),
            _ => write!(out, "{}", prefix),
        }
    }
}

fn result_name(prefix: &str, arg: &TypeInner) -> String {
    match *arg {
        TypeInner::Vector { size, .. } => format!("{}_vec{}", prefix, size as u32),
        _ => prefix.to_string(),
    }
}

fn result_struct(
    name: String,
    members: &[(&str, Handle<Type>)],
    types: &mut UniqueArena<Type>,
) -> Handle<Type> {
    let members = members
        .iter()
        .map(|&(name, ty)| StructMember {
            name: name.to_string(),
            ty,
        })
        .collect();
    types.insert(
        Type {
            name: Some(name),
            inner: TypeInner::Struct { members },
        },
        Span::UNDEFINED,
    )
}
