/*! Semantic core of a WGSL front end.

Given an [`ast::Module`] produced by a parser, the [`resolver`] infers a
[`Type`] for every expression, resolves builtin calls against the overload
catalog in [`builtin`], and folds compile-time constant expressions into
[`Constant`] values.

Types are interned in a [`UniqueArena`], so two structurally equal types
always share the same [`Handle`]. Handle comparison is used wherever the
resolver needs type equality.

Diagnostics are never thrown: they are accumulated into an explicit
[`Diagnostics`] sink. Error-severity records make
[`Resolver::resolve`](resolver::Resolver::resolve) report failure, warnings
do not.
!*/

#![allow(
    clippy::new_without_default,
    clippy::match_like_matches_macro,
    clippy::too_many_arguments
)]
#![warn(
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_qualifications,
    clippy::pattern_type_mismatch
)]
#![deny(clippy::panic)]

mod arena;
pub mod ast;
pub mod builtin;
pub mod diagnostic;
pub mod proc;
pub mod resolver;
mod span;

pub use crate::arena::{Arena, Handle, UniqueArena};
pub use crate::diagnostic::{Diagnostic, Diagnostics, Severity};
pub use crate::proc::constant::{Constant, Element, Elements};
pub use crate::span::{SourceLocation, Span};

use std::{
    collections::{HashMap, HashSet},
    hash::BuildHasherDefault,
    num::NonZeroU32,
};

#[cfg(feature = "deserialize")]
use serde::Deserialize;
#[cfg(feature = "serialize")]
use serde::Serialize;

/// Hash builder that is faster but not resilient to DoS attacks.
pub type FastHasher = BuildHasherDefault<fxhash::FxHasher>;
/// Hash map that is faster but not resilient to DoS attacks.
pub type FastHashMap<K, T> = HashMap<K, T, FastHasher>;
/// Hash set that is faster but not resilient to DoS attacks.
pub type FastHashSet<K> = HashSet<K, FastHasher>;

/// Number of bytes per scalar.
pub type Bytes = u8;

/// Number of components in a vector, or rows/columns in a matrix.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum VectorSize {
    /// 2D vector
    Bi = 2,
    /// 3D vector
    Tri = 3,
    /// 4D vector
    Quad = 4,
}

/// Primitive type for a scalar.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum ScalarKind {
    /// Signed integer type.
    Sint,
    /// Unsigned integer type.
    Uint,
    /// Floating point type.
    Float,
    /// Boolean type.
    Bool,
    /// WGSL abstract integer type.
    ///
    /// Literals without a suffix have this type until they are materialized.
    AbstractInt,
    /// Abstract floating-point type.
    AbstractFloat,
}

/// Characteristics of a scalar type.
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct Scalar {
    /// How the value's bits are to be interpreted.
    pub kind: ScalarKind,

    /// This size of the value in bytes.
    pub width: Bytes,
}

/// Memory region a pointer or reference refers to.
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum AddressSpace {
    /// Function locals.
    Function,
    /// Private data, per invocation, mutable.
    Private,
    /// Workgroup shared data, mutable.
    WorkGroup,
    /// Uniform buffer data.
    Uniform,
    /// Storage buffer data, potentially mutable.
    Storage,
    /// Opaque handles, such as samplers and images.
    Handle,
}

bitflags::bitflags! {
    /// Flags describing an image.
    #[cfg_attr(feature = "serialize", derive(Serialize))]
    #[cfg_attr(feature = "deserialize", derive(Deserialize))]
    #[derive(Default)]
    pub struct StorageAccess: u32 {
        /// Storage can be used as a source for load ops.
        const LOAD = 0x1;
        /// Storage can be used as a target for store ops.
        const STORE = 0x2;
    }
}

/// The number of dimensions a texture has, and whether it is arrayed.
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum TextureDimension {
    /// 1D texture
    D1,
    /// 2D texture
    D2,
    /// Array of 2D textures
    D2Array,
    /// 3D texture
    D3,
    /// Cube map
    Cube,
    /// Array of cube maps
    CubeArray,
}

/// Texel format of a storage texture.
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
#[allow(missing_docs)] // The names are self evident
pub enum TexelFormat {
    Rgba8Unorm,
    Rgba8Snorm,
    Rgba8Uint,
    Rgba8Sint,
    Rgba16Uint,
    Rgba16Sint,
    Rgba16Float,
    R32Uint,
    R32Sint,
    R32Float,
    Rg32Uint,
    Rg32Sint,
    Rg32Float,
    Rgba32Uint,
    Rgba32Sint,
    Rgba32Float,
}

/// Sampler flavor.
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum SamplerKind {
    /// A filtering / non-filtering sampler.
    Sampler,
    /// A depth comparison sampler.
    Comparison,
}

/// Size of an array.
///
/// Override-sized arrays compare by identity of what sized them: the
/// `override` declaration for a named count, or the count expression node
/// itself for any other override-dependent expression. Two textually
/// identical count expressions are distinct sizes.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum ArraySize {
    /// The array size is constant.
    Constant(NonZeroU32),
    /// The array size can change at runtime.
    Runtime,
    /// The array is sized by an `override` declaration.
    NamedOverride {
        decl: Handle<ast::GlobalDecl>,
        name: String,
    },
    /// The array is sized by an override-dependent expression.
    UnnamedOverride(Handle<ast::Expression>),
}

/// Member of a user-defined structure.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct StructMember {
    pub name: String,
    /// Type of the field.
    pub ty: Handle<Type>,
}

/// A data type declared in the module.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct Type {
    /// The name of the type, if any.
    pub name: Option<String>,
    /// Inner structure that depends on the kind of the type.
    pub inner: TypeInner,
}

/// Enum with additional information, depending on the kind of type.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum TypeInner {
    /// Number of integral or floating-point kind.
    Scalar(Scalar),
    /// Vector of numbers.
    Vector { size: VectorSize, scalar: Scalar },
    /// Matrix of floats.
    Matrix {
        columns: VectorSize,
        rows: VectorSize,
        scalar: Scalar,
    },
    /// Homogeneous list of elements.
    Array {
        base: Handle<Type>,
        size: ArraySize,
    },
    /// User-defined structure. The name lives on the owning [`Type`].
    Struct { members: Vec<StructMember> },
    /// Pointer to another type, produced by `&`.
    Pointer {
        base: Handle<Type>,
        space: AddressSpace,
        access: StorageAccess,
    },
    /// Reference to memory, the type of a variable access.
    Reference {
        base: Handle<Type>,
        space: AddressSpace,
        access: StorageAccess,
    },
    /// Atomic scalar.
    Atomic(Scalar),
    /// Sampled texture with a texel scalar type.
    SampledTexture {
        dim: TextureDimension,
        sample_type: Scalar,
    },
    /// Multisampled texture with a texel scalar type.
    MultisampledTexture {
        dim: TextureDimension,
        sample_type: Scalar,
    },
    /// Depth texture.
    DepthTexture { dim: TextureDimension },
    /// Multisampled depth texture.
    DepthMultisampledTexture { dim: TextureDimension },
    /// Storage texture. The texel type is implied by the format,
    /// see [`TexelFormat::scalar`].
    StorageTexture {
        dim: TextureDimension,
        format: TexelFormat,
        access: StorageAccess,
    },
    /// External (video) texture.
    ExternalTexture,
    /// Can be used to sample values from textures.
    Sampler(SamplerKind),
    /// The absence of a value: return type of builtins like `textureStore`.
    Void,
}
