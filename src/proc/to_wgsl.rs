//! WGSL spelling of types, as used in diagnostics.

use std::fmt;

use crate::{
    AddressSpace, ArraySize, Handle, SamplerKind, Scalar, ScalarKind, StorageAccess, TexelFormat,
    TextureDimension, Type, TypeInner, UniqueArena,
};

impl Scalar {
    /// Format a scalar type as it would be written in WGSL.
    pub const fn to_wgsl(self) -> &'static str {
        match self.kind {
            ScalarKind::Sint => "i32",
            ScalarKind::Uint => "u32",
            ScalarKind::Float => match self.width {
                2 => "f16",
                _ => "f32",
            },
            ScalarKind::Bool => "bool",
            ScalarKind::AbstractInt => "abstract-int",
            ScalarKind::AbstractFloat => "abstract-float",
        }
    }
}

impl TextureDimension {
    pub const fn to_wgsl(self) -> &'static str {
        match self {
            Self::D1 => "1d",
            Self::D2 => "2d",
            Self::D2Array => "2d_array",
            Self::D3 => "3d",
            Self::Cube => "cube",
            Self::CubeArray => "cube_array",
        }
    }
}

impl TexelFormat {
    pub const fn to_wgsl(self) -> &'static str {
        match self {
            Self::Rgba8Unorm => "rgba8unorm",
            Self::Rgba8Snorm => "rgba8snorm",
            Self::Rgba8Uint => "rgba8uint",
            Self::Rgba8Sint => "rgba8sint",
            Self::Rgba16Uint => "rgba16uint",
            Self::Rgba16Sint => "rgba16sint",
            Self::Rgba16Float => "rgba16float",
            Self::R32Uint => "r32uint",
            Self::R32Sint => "r32sint",
            Self::R32Float => "r32float",
            Self::Rg32Uint => "rg32uint",
            Self::Rg32Sint => "rg32sint",
            Self::Rg32Float => "rg32float",
            Self::Rgba32Uint => "rgba32uint",
            Self::Rgba32Sint => "rgba32sint",
            Self::Rgba32Float => "rgba32float",
        }
    }
}

impl AddressSpace {
    pub const fn to_wgsl(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Private => "private",
            Self::WorkGroup => "workgroup",
            Self::Uniform => "uniform",
            Self::Storage => "storage",
            Self::Handle => "handle",
        }
    }
}

impl StorageAccess {
    pub fn to_wgsl(self) -> &'static str {
        if self.contains(Self::LOAD | Self::STORE) {
            "read_write"
        } else if self.contains(Self::STORE) {
            "write"
        } else {
            "read"
        }
    }
}

impl SamplerKind {
    pub const fn to_wgsl(self) -> &'static str {
        match self {
            Self::Sampler => "sampler",
            Self::Comparison => "sampler_comparison",
        }
    }
}

impl Type {
    pub fn to_wgsl(&self, types: &UniqueArena<Type>) -> String {
        match (&self.name, &self.inner) {
            (&Some(ref name), &TypeInner::Struct { .. }) => name.clone(),
            (_, inner) => inner.to_wgsl(types),
        }
    }
}

impl TypeInner {
    /// Formats the type as it is written in wgsl.
    ///
    /// For example `vec3<f32>`.
    pub fn to_wgsl(&self, types: &UniqueArena<Type>) -> String {
        let name = |ty: Handle<Type>| types[ty].to_wgsl(types);
        match *self {
            Self::Scalar(scalar) => scalar.to_wgsl().to_string(),
            Self::Vector { size, scalar } => {
                format!("vec{}<{}>", size as u32, scalar.to_wgsl())
            }
            Self::Matrix {
                columns,
                rows,
                scalar,
            } => format!(
                "mat{}x{}<{}>",
                columns as u32,
                rows as u32,
                scalar.to_wgsl()
            ),
            Self::Array { base, ref size } => match *size {
                ArraySize::Constant(count) => format!("array<{}, {}>", name(base), count),
                ArraySize::Runtime => format!("array<{}>", name(base)),
                ArraySize::NamedOverride { name: ref count, .. } => {
                    format!("array<{}, {}>", name(base), count)
                }
                ArraySize::UnnamedOverride(_) => {
                    format!("array<{}, [unnamed override-expression]>", name(base))
                }
            },
            Self::Struct { .. } => "struct".to_string(),
            Self::Pointer {
                base,
                space,
                access,
            } => format!(
                "ptr<{}, {}, {}>",
                space.to_wgsl(),
                name(base),
                access.to_wgsl()
            ),
            Self::Reference {
                base,
                space,
                access,
            } => format!(
                "ref<{}, {}, {}>",
                space.to_wgsl(),
                name(base),
                access.to_wgsl()
            ),
            Self::Atomic(scalar) => format!("atomic<{}>", scalar.to_wgsl()),
            Self::SampledTexture { dim, sample_type } => {
                format!("texture_{}<{}>", dim.to_wgsl(), sample_type.to_wgsl())
            }
            Self::MultisampledTexture { dim, sample_type } => format!(
                "texture_multisampled_{}<{}>",
                dim.to_wgsl(),
                sample_type.to_wgsl()
            ),
            Self::DepthTexture { dim } => format!("texture_depth_{}", dim.to_wgsl()),
            Self::DepthMultisampledTexture { dim } => {
                format!("texture_depth_multisampled_{}", dim.to_wgsl())
            }
            Self::StorageTexture {
                dim,
                format,
                access,
            } => format!(
                "texture_storage_{}<{}, {}>",
                dim.to_wgsl(),
                format.to_wgsl(),
                access.to_wgsl()
            ),
            Self::ExternalTexture => "texture_external".to_string(),
            Self::Sampler(kind) => kind.to_wgsl().to_string(),
            Self::Void => "void".to_string(),
        }
    }
}

/// [`Display`](fmt::Display) adapter for a type handle.
pub struct TypeName<'a> {
    pub ty: Handle<Type>,
    pub types: &'a UniqueArena<Type>,
}

impl fmt::Display for TypeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.types[self.ty].to_wgsl(self.types))
    }
}

impl UniqueArena<Type> {
    pub fn name(&self, ty: Handle<Type>) -> TypeName<'_> {
        TypeName { ty, types: self }
    }
}
