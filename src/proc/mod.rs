//! Type processing functionality.

pub mod constant;
mod constant_evaluator;
mod to_wgsl;

pub use constant_evaluator::{
    clamp_index, ConstantEvaluator, ConstantEvaluatorError, IndexClamped,
};
pub use to_wgsl::TypeName;

use crate::{
    AddressSpace, ArraySize, Handle, Scalar, ScalarKind, Span, StorageAccess, TexelFormat, Type,
    TypeInner, UniqueArena, VectorSize,
};

impl Scalar {
    pub const I32: Self = Self {
        kind: ScalarKind::Sint,
        width: 4,
    };
    pub const U32: Self = Self {
        kind: ScalarKind::Uint,
        width: 4,
    };
    pub const F16: Self = Self {
        kind: ScalarKind::Float,
        width: 2,
    };
    pub const F32: Self = Self {
        kind: ScalarKind::Float,
        width: 4,
    };
    pub const BOOL: Self = Self {
        kind: ScalarKind::Bool,
        width: crate::proc::BOOL_WIDTH,
    };
    pub const ABSTRACT_INT: Self = Self {
        kind: ScalarKind::AbstractInt,
        width: 8,
    };
    pub const ABSTRACT_FLOAT: Self = Self {
        kind: ScalarKind::AbstractFloat,
        width: 8,
    };

    pub const fn is_abstract(self) -> bool {
        match self.kind {
            ScalarKind::AbstractInt | ScalarKind::AbstractFloat => true,
            ScalarKind::Sint | ScalarKind::Uint | ScalarKind::Float | ScalarKind::Bool => false,
        }
    }

    /// `true` for the kinds whose constant leaves are stored as integers.
    pub const fn is_integer_like(self) -> bool {
        match self.kind {
            ScalarKind::Sint | ScalarKind::Uint | ScalarKind::AbstractInt | ScalarKind::Bool => {
                true
            }
            ScalarKind::Float | ScalarKind::AbstractFloat => false,
        }
    }

    pub const fn is_numeric(self) -> bool {
        !matches!(self.kind, ScalarKind::Bool)
    }

    /// Return `true` if `self` can be automatically converted to `goal`.
    pub fn automatically_converts_to(self, goal: Self) -> bool {
        use ScalarKind as Sk;
        if self == goal {
            return true;
        }
        match (self.kind, goal.kind) {
            (Sk::AbstractInt, Sk::Sint | Sk::Uint | Sk::Float | Sk::AbstractFloat) => true,
            (Sk::AbstractFloat, Sk::Float) => true,
            _ => false,
        }
    }

    /// The scalar both `self` and `other` automatically convert to, if any.
    pub fn automatic_conversion_combine(self, other: Self) -> Option<Self> {
        if self.automatically_converts_to(other) {
            Some(other)
        } else if other.automatically_converts_to(self) {
            Some(self)
        } else {
            None
        }
    }

    /// The type an abstract scalar materializes to when nothing else
    /// constrains it.
    pub const fn concretize(self) -> Self {
        match self.kind {
            ScalarKind::AbstractInt => Self::I32,
            ScalarKind::AbstractFloat => Self::F32,
            _ => self,
        }
    }
}

/// Width of a boolean type, in bytes.
pub const BOOL_WIDTH: crate::Bytes = 1;

impl VectorSize {
    pub const fn from_u32(size: u32) -> Option<Self> {
        match size {
            2 => Some(Self::Bi),
            3 => Some(Self::Tri),
            4 => Some(Self::Quad),
            _ => None,
        }
    }
}

impl TexelFormat {
    /// The scalar type texels of this format are read and written as.
    pub const fn scalar(self) -> Scalar {
        use TexelFormat as Tf;
        match self {
            Tf::Rgba8Unorm
            | Tf::Rgba8Snorm
            | Tf::Rgba16Float
            | Tf::R32Float
            | Tf::Rg32Float
            | Tf::Rgba32Float => Scalar::F32,
            Tf::Rgba8Uint | Tf::Rgba16Uint | Tf::R32Uint | Tf::Rg32Uint | Tf::Rgba32Uint => {
                Scalar::U32
            }
            Tf::Rgba8Sint | Tf::Rgba16Sint | Tf::R32Sint | Tf::Rg32Sint | Tf::Rgba32Sint => {
                Scalar::I32
            }
        }
    }
}

impl StorageAccess {
    pub const READ_WRITE: Self = Self::from_bits_truncate(Self::LOAD.bits() | Self::STORE.bits());
}

impl AddressSpace {
    /// The access mode implied for a variable of this address space.
    pub const fn default_access(self) -> StorageAccess {
        match self {
            Self::Function | Self::Private | Self::WorkGroup => StorageAccess::READ_WRITE,
            Self::Uniform | Self::Storage | Self::Handle => StorageAccess::LOAD,
        }
    }
}

impl TypeInner {
    /// The scalar leaf of a scalar, vector, matrix or atomic type.
    pub const fn scalar(&self) -> Option<Scalar> {
        match *self {
            Self::Scalar(scalar)
            | Self::Vector { scalar, .. }
            | Self::Matrix { scalar, .. }
            | Self::Atomic(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        self.scalar().map(|scalar| scalar.kind)
    }

    /// The scalar leaf type and the number of leaves of a scalar, vector or
    /// matrix. Arrays and structs have no single element type.
    pub const fn element_of(&self) -> Option<(Scalar, u32)> {
        match *self {
            Self::Scalar(scalar) => Some((scalar, 1)),
            Self::Vector { size, scalar } => Some((scalar, size as u32)),
            Self::Matrix {
                columns,
                rows,
                scalar,
            } => Some((scalar, columns as u32 * rows as u32)),
            _ => None,
        }
    }

    pub fn is_abstract(&self, types: &UniqueArena<Type>) -> bool {
        match *self {
            Self::Scalar(scalar) | Self::Vector { scalar, .. } | Self::Matrix { scalar, .. } => {
                scalar.is_abstract()
            }
            Self::Array { base, .. } => types[base].inner.is_abstract(types),
            _ => false,
        }
    }

    /// `true` for types that values can be constructed from: scalars,
    /// vectors, matrices, fixed-size arrays and structs.
    pub fn is_constructible(&self, types: &UniqueArena<Type>) -> bool {
        match *self {
            Self::Scalar(_) | Self::Vector { .. } | Self::Matrix { .. } => true,
            Self::Array {
                base,
                size: ArraySize::Constant(_),
            } => types[base].inner.is_constructible(types),
            Self::Struct { ref members } => members
                .iter()
                .all(|member| types[member.ty].inner.is_constructible(types)),
            _ => false,
        }
    }

    /// Number of components of a composite, if known.
    pub fn component_count(&self) -> Option<u32> {
        match *self {
            Self::Vector { size, .. } => Some(size as u32),
            Self::Matrix { columns, .. } => Some(columns as u32),
            Self::Array {
                size: ArraySize::Constant(count),
                ..
            } => Some(count.get()),
            Self::Struct { ref members } => Some(members.len() as u32),
            _ => None,
        }
    }
}

/// Interning shortcuts on the type arena.
impl UniqueArena<Type> {
    pub fn insert_inner(&mut self, inner: TypeInner) -> Handle<Type> {
        self.insert(Type { name: None, inner }, Span::UNDEFINED)
    }

    pub fn scalar(&mut self, scalar: Scalar) -> Handle<Type> {
        self.insert_inner(TypeInner::Scalar(scalar))
    }

    pub fn vector(&mut self, size: VectorSize, scalar: Scalar) -> Handle<Type> {
        self.insert_inner(TypeInner::Vector { size, scalar })
    }

    pub fn matrix(
        &mut self,
        columns: VectorSize,
        rows: VectorSize,
        scalar: Scalar,
    ) -> Handle<Type> {
        self.insert_inner(TypeInner::Matrix {
            columns,
            rows,
            scalar,
        })
    }

    pub fn void(&mut self) -> Handle<Type> {
        self.insert_inner(TypeInner::Void)
    }

    /// Strips a [`Reference`](TypeInner::Reference) wrapper.
    pub fn unwrap_ref(&self, ty: Handle<Type>) -> Handle<Type> {
        match self[ty].inner {
            TypeInner::Reference { base, .. } => base,
            _ => ty,
        }
    }

    /// Strips a [`Reference`](TypeInner::Reference) or
    /// [`Pointer`](TypeInner::Pointer) wrapper.
    pub fn unwrap_ptr_or_ref(&self, ty: Handle<Type>) -> Handle<Type> {
        match self[ty].inner {
            TypeInner::Reference { base, .. } | TypeInner::Pointer { base, .. } => base,
            _ => ty,
        }
    }

    /// Replaces every abstract scalar leaf of `ty` by `scalar`.
    ///
    /// Returns `None` if `ty` has no abstract leaves to replace.
    pub fn with_leaf_scalar(&mut self, ty: Handle<Type>, scalar: Scalar) -> Option<Handle<Type>> {
        let inner = match self[ty].inner {
            TypeInner::Scalar(s) if s.is_abstract() => TypeInner::Scalar(scalar),
            TypeInner::Vector { size, scalar: s } if s.is_abstract() => {
                TypeInner::Vector { size, scalar }
            }
            TypeInner::Matrix {
                columns,
                rows,
                scalar: s,
            } if s.is_abstract() => TypeInner::Matrix {
                columns,
                rows,
                scalar,
            },
            TypeInner::Array { base, ref size } => {
                let size = size.clone();
                let base = self.with_leaf_scalar(base, scalar)?;
                TypeInner::Array { base, size }
            }
            _ => return None,
        };
        Some(self.insert_inner(inner))
    }

    /// The concrete type an abstract type materializes to by default:
    /// `abstract-int` becomes `i32`, `abstract-float` becomes `f32`.
    pub fn concretize(&mut self, ty: Handle<Type>) -> Handle<Type> {
        match self[ty].inner.leaf_scalar(self) {
            Some(scalar) if scalar.is_abstract() => self
                .with_leaf_scalar(ty, scalar.concretize())
                .unwrap_or(ty),
            _ => ty,
        }
    }
}

impl TypeInner {
    /// Like [`scalar`](Self::scalar), but also looks through arrays.
    pub fn leaf_scalar(&self, types: &UniqueArena<Type>) -> Option<Scalar> {
        match *self {
            Self::Array { base, .. } => types[base].inner.leaf_scalar(types),
            _ => self.scalar(),
        }
    }
}
