/*!
Tests for builtin overload resolution.
*/

use wgsl_sema::{
    builtin::{BuiltinFunction as Bf, ParameterUsage, Table},
    AddressSpace, ArraySize, Handle, SamplerKind, Scalar, StorageAccess, TexelFormat,
    TextureDimension as Dim, Type, TypeInner, UniqueArena, VectorSize,
};

fn check(output: &str, snapshot: &str) {
    if output != snapshot {
        for diff in diff::lines(output, snapshot) {
            match diff {
                diff::Result::Left(l) => println!("-{}", l),
                diff::Result::Both(l, _) => println!(" {}", l),
                diff::Result::Right(r) => println!("+{}", r),
            }
        }
        panic!("Candidate listing mismatch");
    }
}

struct Fixture {
    table: Table,
    types: UniqueArena<Type>,
}

impl Fixture {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Fixture {
            table: Table::new(),
            types: UniqueArena::new(),
        }
    }

    fn ty(&mut self, inner: TypeInner) -> Handle<Type> {
        self.types.insert_inner(inner)
    }

    fn scalar(&mut self, scalar: Scalar) -> Handle<Type> {
        self.types.scalar(scalar)
    }

    fn vec(&mut self, size: VectorSize, scalar: Scalar) -> Handle<Type> {
        self.types.vector(size, scalar)
    }

    /// Resolves the call and returns the printed return type.
    fn call(&mut self, function: Bf, args: &[Handle<Type>]) -> String {
        let handle = self
            .table
            .lookup(function, args, &mut self.types)
            .unwrap_or_else(|err| panic!("{}", err));
        match self.table[handle].return_type {
            Some(ty) => self.types.name(ty).to_string(),
            None => "void".to_string(),
        }
    }

    fn error(&mut self, function: Bf, args: &[Handle<Type>]) -> String {
        match self.table.lookup(function, args, &mut self.types) {
            Ok(handle) => panic!("unexpected match: {:?}", self.table[handle]),
            Err(err) => err.to_string(),
        }
    }
}

#[test]
fn texture_dimensions_lists_every_candidate() {
    let mut f = Fixture::new();
    let b = f.scalar(Scalar::BOOL);
    check(
        &f.error(Bf::TextureDimensions, &[b, b]),
        "no matching call to textureDimensions(bool, bool)

27 candidate functions:
  textureDimensions(texture: texture_1d<T>, level: i32) -> i32  where: T is f32, i32 or u32
  textureDimensions(texture: texture_2d<T>, level: i32) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_2d_array<T>, level: i32) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_3d<T>, level: i32) -> vec3<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_cube<T>, level: i32) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_cube_array<T>, level: i32) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_depth_2d, level: i32) -> vec2<i32>
  textureDimensions(texture: texture_depth_2d_array, level: i32) -> vec2<i32>
  textureDimensions(texture: texture_depth_cube, level: i32) -> vec2<i32>
  textureDimensions(texture: texture_depth_cube_array, level: i32) -> vec2<i32>
  textureDimensions(texture: texture_1d<T>) -> i32  where: T is f32, i32 or u32
  textureDimensions(texture: texture_2d<T>) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_2d_array<T>) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_3d<T>) -> vec3<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_cube<T>) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_cube_array<T>) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_multisampled_2d<T>) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_depth_2d) -> vec2<i32>
  textureDimensions(texture: texture_depth_2d_array) -> vec2<i32>
  textureDimensions(texture: texture_depth_cube) -> vec2<i32>
  textureDimensions(texture: texture_depth_cube_array) -> vec2<i32>
  textureDimensions(texture: texture_depth_multisampled_2d) -> vec2<i32>
  textureDimensions(texture: texture_storage_1d<F, A>) -> i32  where: A is write
  textureDimensions(texture: texture_storage_2d<F, A>) -> vec2<i32>  where: A is write
  textureDimensions(texture: texture_storage_2d_array<F, A>) -> vec2<i32>  where: A is write
  textureDimensions(texture: texture_storage_3d<F, A>) -> vec3<i32>  where: A is write
  textureDimensions(texture: texture_external) -> vec2<i32>",
    );
}

#[test]
fn texture_dimensions_ranks_partial_matches_first() {
    let mut f = Fixture::new();
    let depth = f.ty(TypeInner::DepthTexture { dim: Dim::D2 });
    let b = f.scalar(Scalar::BOOL);
    check(
        &f.error(Bf::TextureDimensions, &[depth, b]),
        "no matching call to textureDimensions(texture_depth_2d, bool)

27 candidate functions:
  textureDimensions(texture: texture_depth_2d, level: i32) -> vec2<i32>
  textureDimensions(texture: texture_depth_2d) -> vec2<i32>
  textureDimensions(texture: texture_1d<T>, level: i32) -> i32  where: T is f32, i32 or u32
  textureDimensions(texture: texture_2d<T>, level: i32) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_2d_array<T>, level: i32) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_3d<T>, level: i32) -> vec3<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_cube<T>, level: i32) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_cube_array<T>, level: i32) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_depth_2d_array, level: i32) -> vec2<i32>
  textureDimensions(texture: texture_depth_cube, level: i32) -> vec2<i32>
  textureDimensions(texture: texture_depth_cube_array, level: i32) -> vec2<i32>
  textureDimensions(texture: texture_1d<T>) -> i32  where: T is f32, i32 or u32
  textureDimensions(texture: texture_2d<T>) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_2d_array<T>) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_3d<T>) -> vec3<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_cube<T>) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_cube_array<T>) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_multisampled_2d<T>) -> vec2<i32>  where: T is f32, i32 or u32
  textureDimensions(texture: texture_depth_2d_array) -> vec2<i32>
  textureDimensions(texture: texture_depth_cube) -> vec2<i32>
  textureDimensions(texture: texture_depth_cube_array) -> vec2<i32>
  textureDimensions(texture: texture_depth_multisampled_2d) -> vec2<i32>
  textureDimensions(texture: texture_storage_1d<F, A>) -> i32  where: A is write
  textureDimensions(texture: texture_storage_2d<F, A>) -> vec2<i32>  where: A is write
  textureDimensions(texture: texture_storage_2d_array<F, A>) -> vec2<i32>  where: A is write
  textureDimensions(texture: texture_storage_3d<F, A>) -> vec3<i32>  where: A is write
  textureDimensions(texture: texture_external) -> vec2<i32>",
    );
}

#[test]
fn float_builtins() {
    let mut f = Fixture::new();
    let f32 = f.scalar(Scalar::F32);
    let af = f.scalar(Scalar::ABSTRACT_FLOAT);
    let v3 = f.vec(VectorSize::Tri, Scalar::F32);

    assert_eq!(f.call(Bf::Cos, &[f32]), "f32");
    assert_eq!(f.call(Bf::Cos, &[af]), "f32");
    assert_eq!(f.call(Bf::Cos, &[v3]), "vec3<f32>");
    assert_eq!(f.call(Bf::Cross, &[v3, v3]), "vec3<f32>");

    let i32 = f.scalar(Scalar::I32);
    check(
        &f.error(Bf::Cos, &[i32]),
        "no matching call to cos(i32)

2 candidate functions:
  cos(f32) -> f32
  cos(vecN<f32>) -> vecN<f32>",
    );
}

#[test]
fn packing_builtins() {
    let mut f = Fixture::new();
    let u32 = f.scalar(Scalar::U32);
    let i32 = f.scalar(Scalar::I32);

    assert_eq!(f.call(Bf::Unpack2x16Float, &[u32]), "vec2<f32>");
    check(
        &f.error(Bf::Unpack2x16Float, &[i32]),
        "no matching call to unpack2x16float(i32)

1 candidate function:
  unpack2x16float(u32) -> vec2<f32>",
    );
}

#[test]
fn integer_constraint() {
    let mut f = Fixture::new();
    let iv3 = f.vec(VectorSize::Tri, Scalar::I32);
    let u32 = f.scalar(Scalar::U32);
    let ai = f.scalar(Scalar::ABSTRACT_INT);
    let f32 = f.scalar(Scalar::F32);

    assert_eq!(f.call(Bf::CountOneBits, &[iv3]), "vec3<i32>");
    assert_eq!(f.call(Bf::CountOneBits, &[u32]), "u32");
    // Abstract integers prefer i32.
    assert_eq!(f.call(Bf::CountOneBits, &[ai]), "i32");
    check(
        &f.error(Bf::CountOneBits, &[f32]),
        "no matching call to countOneBits(f32)

2 candidate functions:
  countOneBits(T) -> T  where: T is i32 or u32
  countOneBits(vecN<T>) -> vecN<T>  where: T is i32 or u32",
    );
}

#[test]
fn open_type_unifies_abstract_arguments() {
    let mut f = Fixture::new();
    let ai = f.scalar(Scalar::ABSTRACT_INT);
    let af = f.scalar(Scalar::ABSTRACT_FLOAT);
    let u32 = f.scalar(Scalar::U32);
    let i32 = f.scalar(Scalar::I32);

    assert_eq!(f.call(Bf::Clamp, &[ai, af, ai]), "f32");
    assert_eq!(f.call(Bf::Clamp, &[u32, ai, ai]), "u32");
    assert_eq!(f.call(Bf::Max, &[ai, ai]), "i32");

    let err = f.error(Bf::Max, &[u32, i32]);
    assert!(
        err.starts_with("no matching call to max(u32, i32)\n\n2 candidate functions:\n"),
        "{}",
        err
    );
}

#[test]
fn select_forms() {
    let mut f = Fixture::new();
    let f32 = f.scalar(Scalar::F32);
    let b = f.scalar(Scalar::BOOL);
    let v2 = f.vec(VectorSize::Bi, Scalar::F32);
    let bv2 = f.vec(VectorSize::Bi, Scalar::BOOL);
    let bv3 = f.vec(VectorSize::Tri, Scalar::BOOL);

    assert_eq!(f.call(Bf::Select, &[f32, f32, b]), "f32");
    assert_eq!(f.call(Bf::Select, &[v2, v2, b]), "vec2<f32>");
    assert_eq!(f.call(Bf::Select, &[v2, v2, bv2]), "vec2<f32>");
    assert_eq!(f.call(Bf::Select, &[bv2, bv2, bv2]), "vec2<bool>");
    f.error(Bf::Select, &[v2, v2, bv3]);
}

#[test]
fn matrix_builtins() {
    let mut f = Fixture::new();
    let m3 = f.types.matrix(VectorSize::Tri, VectorSize::Tri, Scalar::F32);
    let m23 = f.types.matrix(VectorSize::Bi, VectorSize::Tri, Scalar::F32);

    assert_eq!(f.call(Bf::Determinant, &[m3]), "f32");
    assert_eq!(f.call(Bf::Transpose, &[m23]), "mat3x2<f32>");
    check(
        &f.error(Bf::Determinant, &[m23]),
        "no matching call to determinant(mat2x3<f32>)

1 candidate function:
  determinant(matNxN<f32>) -> f32",
    );
}

#[test]
fn pointer_builtins() {
    let mut f = Fixture::new();
    let i32 = f.scalar(Scalar::I32);
    let f32 = f.scalar(Scalar::F32);
    let atomic = f.ty(TypeInner::Atomic(Scalar::I32));
    let atomic_ptr = f.ty(TypeInner::Pointer {
        base: atomic,
        space: AddressSpace::Storage,
        access: StorageAccess::READ_WRITE,
    });
    assert_eq!(f.call(Bf::AtomicLoad, &[atomic_ptr]), "i32");
    assert_eq!(f.call(Bf::AtomicAdd, &[atomic_ptr, i32]), "i32");

    let private_ptr = f.ty(TypeInner::Pointer {
        base: atomic,
        space: AddressSpace::Private,
        access: StorageAccess::READ_WRITE,
    });
    f.error(Bf::AtomicLoad, &[private_ptr]);

    let array = f.ty(TypeInner::Array {
        base: f32,
        size: ArraySize::Runtime,
    });
    let array_ptr = f.ty(TypeInner::Pointer {
        base: array,
        space: AddressSpace::Storage,
        access: StorageAccess::LOAD,
    });
    assert_eq!(f.call(Bf::ArrayLength, &[array_ptr]), "u32");
}

#[test]
fn references_are_loaded() {
    let mut f = Fixture::new();
    let f32 = f.scalar(Scalar::F32);
    let reference = f.ty(TypeInner::Reference {
        base: f32,
        space: AddressSpace::Function,
        access: StorageAccess::READ_WRITE,
    });
    assert_eq!(f.call(Bf::Sin, &[reference]), "f32");
    let loaded = f.table.lookup(Bf::Cos, &[reference], &mut f.types).unwrap();
    let direct = f.table.lookup(Bf::Cos, &[f32], &mut f.types).unwrap();
    assert_eq!(loaded, direct);

    let err = f.error(Bf::Cross, &[reference]);
    assert!(err.starts_with("no matching call to cross(f32)"), "{}", err);
}

#[test]
fn texture_builtins() {
    let mut f = Fixture::new();
    let texture = f.ty(TypeInner::SampledTexture {
        dim: Dim::D2,
        sample_type: Scalar::U32,
    });
    let float_texture = f.ty(TypeInner::SampledTexture {
        dim: Dim::D2,
        sample_type: Scalar::F32,
    });
    let sampler = f.ty(TypeInner::Sampler(SamplerKind::Sampler));
    let coords = f.vec(VectorSize::Bi, Scalar::I32);
    let uv = f.vec(VectorSize::Bi, Scalar::F32);
    let level = f.scalar(Scalar::I32);
    let ai = f.scalar(Scalar::ABSTRACT_INT);

    assert_eq!(f.call(Bf::TextureLoad, &[texture, coords, level]), "vec4<u32>");
    assert_eq!(f.call(Bf::TextureLoad, &[texture, coords, ai]), "vec4<u32>");
    assert_eq!(f.call(Bf::TextureSample, &[float_texture, sampler, uv]), "vec4<f32>");
    assert_eq!(f.call(Bf::TextureDimensions, &[texture]), "vec2<i32>");

    let handle = f
        .table
        .lookup(Bf::TextureLoad, &[texture, coords, level], &mut f.types)
        .unwrap();
    let usages = f.table[handle]
        .parameters
        .iter()
        .map(|param| param.usage)
        .collect::<Vec<_>>();
    assert_eq!(
        usages,
        [
            ParameterUsage::Texture,
            ParameterUsage::Coords,
            ParameterUsage::Level
        ]
    );

    let texture_1d = f.ty(TypeInner::SampledTexture {
        dim: Dim::D1,
        sample_type: Scalar::F32,
    });
    let handle = f
        .table
        .lookup(Bf::TextureLoad, &[texture_1d, level, level], &mut f.types)
        .unwrap();
    let builtin = &f.table[handle];
    let usages = builtin
        .parameters
        .iter()
        .map(|param| param.usage)
        .collect::<Vec<_>>();
    assert_eq!(
        usages,
        [
            ParameterUsage::Texture,
            ParameterUsage::Coords,
            ParameterUsage::Level
        ]
    );
    assert_eq!(
        f.types.name(builtin.return_type.unwrap()).to_string(),
        "vec4<f32>"
    );

    // Sampling an integer texture is not allowed.
    f.error(Bf::TextureSample, &[texture, sampler, uv]);
}

#[test]
fn texture_store_checks_texel_format() {
    let mut f = Fixture::new();
    let storage = |f: &mut Fixture, format, access| {
        f.ty(TypeInner::StorageTexture {
            dim: Dim::D2,
            format,
            access,
        })
    };
    let rgba8 = storage(&mut f, TexelFormat::Rgba8Unorm, StorageAccess::STORE);
    let r32i = storage(&mut f, TexelFormat::R32Sint, StorageAccess::STORE);
    let read_only = storage(&mut f, TexelFormat::Rgba8Unorm, StorageAccess::LOAD);
    let coords = f.vec(VectorSize::Bi, Scalar::I32);
    let fv4 = f.vec(VectorSize::Quad, Scalar::F32);
    let iv4 = f.vec(VectorSize::Quad, Scalar::I32);

    assert_eq!(f.call(Bf::TextureStore, &[rgba8, coords, fv4]), "void");
    assert_eq!(f.call(Bf::TextureStore, &[r32i, coords, iv4]), "void");
    f.error(Bf::TextureStore, &[rgba8, coords, iv4]);
    f.error(Bf::TextureStore, &[read_only, coords, fv4]);
}

#[test]
fn result_structs() {
    let mut f = Fixture::new();
    let f32 = f.scalar(Scalar::F32);
    let v2 = f.vec(VectorSize::Bi, Scalar::F32);

    assert_eq!(f.call(Bf::Modf, &[f32]), "__modf_result");
    assert_eq!(f.call(Bf::Modf, &[v2]), "__modf_result_vec2");
    assert_eq!(f.call(Bf::Frexp, &[f32]), "__frexp_result");
}

#[test]
fn identical_lookups_are_interned() {
    let mut f = Fixture::new();
    let f32 = f.scalar(Scalar::F32);
    let af = f.scalar(Scalar::ABSTRACT_FLOAT);

    let first = f.table.lookup(Bf::Cos, &[f32], &mut f.types).unwrap();
    let second = f.table.lookup(Bf::Cos, &[f32], &mut f.types).unwrap();
    // The abstract argument materializes to the same signature.
    let third = f.table.lookup(Bf::Cos, &[af], &mut f.types).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, third);
    assert_eq!(f.table.builtins().len(), 1);

    let sin = f.table.lookup(Bf::Sin, &[f32], &mut f.types).unwrap();
    assert_ne!(first, sin);
}

#[test]
fn bound_types_give_distinct_overloads() {
    let mut f = Fixture::new();
    let f32 = f.scalar(Scalar::F32);
    let b = f.scalar(Scalar::BOOL);
    let v2 = f.vec(VectorSize::Bi, Scalar::F32);

    let scalar = f.table.lookup(Bf::Select, &[f32, f32, b], &mut f.types).unwrap();
    let again = f.table.lookup(Bf::Select, &[f32, f32, b], &mut f.types).unwrap();
    let vector = f.table.lookup(Bf::Select, &[v2, v2, b], &mut f.types).unwrap();
    assert_eq!(scalar, again);
    assert_ne!(scalar, vector);
    assert_eq!(f.table.builtins().len(), 2);
}
