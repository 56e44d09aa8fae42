//! Overload declarations for every builtin function.
//!
//! Declaration order matters: it is the order overloads are tried in, and
//! the tie-break order of candidate listings.

use super::{
    matcher::{
        Number, NumberConstraint as Nc, NumberPattern as Np, Overload, TypeConstraint as Tc,
        TypePattern as Tp,
    },
    BuiltinFunction as Bf, ParameterUsage as Pu,
};
use crate::{
    AddressSpace, FastHashMap, SamplerKind, Scalar, StorageAccess, TextureDimension as Dim,
    VectorSize,
};

#[derive(Default)]
struct Catalog {
    overloads: FastHashMap<Bf, Vec<Overload>>,
}

impl Catalog {
    fn add(&mut self, function: Bf, overload: Overload) {
        self.overloads.entry(function).or_default().push(overload);
    }
}

fn f32() -> Tp {
    Tp::Scalar(Scalar::F32)
}
fn i32() -> Tp {
    Tp::Scalar(Scalar::I32)
}
fn u32() -> Tp {
    Tp::Scalar(Scalar::U32)
}
fn bool() -> Tp {
    Tp::Scalar(Scalar::BOOL)
}
/// The first open type, `T`.
fn t() -> Tp {
    Tp::Open(0)
}

fn size(size: VectorSize) -> Np {
    Np::Fixed(Number::Size(size))
}
fn vec(n: Np, element: Tp) -> Tp {
    Tp::Vector(n, Box::new(element))
}
fn vec2(element: Tp) -> Tp {
    vec(size(VectorSize::Bi), element)
}
fn vec3(element: Tp) -> Tp {
    vec(size(VectorSize::Tri), element)
}
fn vec4(element: Tp) -> Tp {
    vec(size(VectorSize::Quad), element)
}
/// `vecN<element>`, where `N` is the first open number.
fn vec_n(element: Tp) -> Tp {
    vec(Np::Open(0), element)
}

fn sampled(dim: Dim, element: Tp) -> Tp {
    Tp::Texture(dim, Box::new(element))
}
fn multisampled(dim: Dim, element: Tp) -> Tp {
    Tp::MultisampledTexture(dim, Box::new(element))
}
/// `texture_storage_<dim><F, A>` with `F` and `A` the first two open
/// numbers.
fn storage(dim: Dim) -> Tp {
    Tp::StorageTexture(dim, Np::Open(0), Np::Open(1))
}
fn write_only_storage(dim: Dim) -> Tp {
    Tp::StorageTexture(
        dim,
        Np::Open(0),
        Np::Fixed(Number::Access(StorageAccess::STORE)),
    )
}
fn sampler() -> Tp {
    Tp::Sampler(SamplerKind::Sampler)
}
fn comparison_sampler() -> Tp {
    Tp::Sampler(SamplerKind::Comparison)
}

/// An overload returning `ret`. Parameters without a role use
/// [`Pu::None`].
fn sig<const N: usize>(ret: Tp, params: [(Pu, Tp); N]) -> Overload {
    params
        .into_iter()
        .fold(Overload::new(), |o, (usage, ty)| o.param(usage, ty))
        .returns(ret)
}
fn sig_void<const N: usize>(params: [(Pu, Tp); N]) -> Overload {
    params
        .into_iter()
        .fold(Overload::new(), |o, (usage, ty)| o.param(usage, ty))
}

fn any_n(overload: Overload) -> Overload {
    overload.open_number("N", Nc::Any)
}

/// `fn(f32) -> f32` and `fn(vecN<f32>) -> vecN<f32>`.
fn float_unary(c: &mut Catalog, f: Bf) {
    c.add(f, sig(f32(), [(Pu::None, f32())]));
    c.add(f, any_n(sig(vec_n(f32()), [(Pu::None, vec_n(f32()))])));
}

fn float_binary(c: &mut Catalog, f: Bf) {
    c.add(f, sig(f32(), [(Pu::None, f32()), (Pu::None, f32())]));
    c.add(
        f,
        any_n(sig(
            vec_n(f32()),
            [(Pu::None, vec_n(f32())), (Pu::None, vec_n(f32()))],
        )),
    );
}

fn float_ternary(c: &mut Catalog, f: Bf) {
    c.add(
        f,
        sig(f32(), [(Pu::None, f32()), (Pu::None, f32()), (Pu::None, f32())]),
    );
    c.add(
        f,
        any_n(sig(
            vec_n(f32()),
            [
                (Pu::None, vec_n(f32())),
                (Pu::None, vec_n(f32())),
                (Pu::None, vec_n(f32())),
            ],
        )),
    );
}

/// `fn<T>(T) -> T` and `fn<N, T>(vecN<T>) -> vecN<T>`.
fn generic_unary(c: &mut Catalog, f: Bf, constraint: Tc) {
    c.add(f, sig(t(), [(Pu::None, t())]).open_type("T", constraint));
    c.add(
        f,
        any_n(sig(vec_n(t()), [(Pu::None, vec_n(t()))])).open_type("T", constraint),
    );
}

fn generic_binary(c: &mut Catalog, f: Bf, constraint: Tc) {
    c.add(
        f,
        sig(t(), [(Pu::None, t()), (Pu::None, t())]).open_type("T", constraint),
    );
    c.add(
        f,
        any_n(sig(
            vec_n(t()),
            [(Pu::None, vec_n(t())), (Pu::None, vec_n(t()))],
        ))
        .open_type("T", constraint),
    );
}

fn generic_ternary(c: &mut Catalog, f: Bf, constraint: Tc) {
    c.add(
        f,
        sig(t(), [(Pu::None, t()), (Pu::None, t()), (Pu::None, t())]).open_type("T", constraint),
    );
    c.add(
        f,
        any_n(sig(
            vec_n(t()),
            [
                (Pu::None, vec_n(t())),
                (Pu::None, vec_n(t())),
                (Pu::None, vec_n(t())),
            ],
        ))
        .open_type("T", constraint),
    );
}

fn numeric(c: &mut Catalog) {
    for f in [
        Bf::Acos,
        Bf::Asin,
        Bf::Atan,
        Bf::Ceil,
        Bf::Cos,
        Bf::Cosh,
        Bf::Degrees,
        Bf::Dpdx,
        Bf::DpdxCoarse,
        Bf::DpdxFine,
        Bf::Dpdy,
        Bf::DpdyCoarse,
        Bf::DpdyFine,
        Bf::Exp,
        Bf::Exp2,
        Bf::Floor,
        Bf::Fract,
        Bf::Fwidth,
        Bf::FwidthCoarse,
        Bf::FwidthFine,
        Bf::InverseSqrt,
        Bf::Log,
        Bf::Log2,
        Bf::Radians,
        Bf::Round,
        Bf::Sign,
        Bf::Sin,
        Bf::Sinh,
        Bf::Sqrt,
        Bf::Tan,
        Bf::Tanh,
        Bf::Trunc,
    ] {
        float_unary(c, f);
    }
    for f in [Bf::Atan2, Bf::Pow, Bf::Step] {
        float_binary(c, f);
    }
    for f in [Bf::Fma, Bf::Smoothstep] {
        float_ternary(c, f);
    }

    generic_unary(c, Bf::Abs, Tc::Fiu32);
    generic_binary(c, Bf::Max, Tc::Fiu32);
    generic_binary(c, Bf::Min, Tc::Fiu32);
    generic_ternary(c, Bf::Clamp, Tc::Fiu32);
    for f in [
        Bf::CountLeadingZeros,
        Bf::CountOneBits,
        Bf::CountTrailingZeros,
        Bf::FirstLeadingBit,
        Bf::FirstTrailingBit,
        Bf::ReverseBits,
    ] {
        generic_unary(c, f, Tc::Iu32);
    }

    c.add(
        Bf::Cross,
        sig(
            vec3(f32()),
            [(Pu::None, vec3(f32())), (Pu::None, vec3(f32()))],
        ),
    );
    c.add(
        Bf::Determinant,
        any_n(sig(
            f32(),
            [(Pu::None, Tp::Matrix(Np::Open(0), Np::Open(0), Box::new(f32())))],
        )),
    );
    c.add(Bf::Distance, sig(f32(), [(Pu::None, f32()), (Pu::None, f32())]));
    c.add(
        Bf::Distance,
        any_n(sig(f32(), [(Pu::None, vec_n(f32())), (Pu::None, vec_n(f32()))])),
    );
    c.add(
        Bf::Dot,
        any_n(sig(t(), [(Pu::None, vec_n(t())), (Pu::None, vec_n(t()))]))
            .open_type("T", Tc::Fiu32),
    );
    c.add(
        Bf::ExtractBits,
        sig(t(), [(Pu::None, t()), (Pu::None, u32()), (Pu::None, u32())])
            .open_type("T", Tc::Iu32),
    );
    c.add(
        Bf::ExtractBits,
        any_n(sig(
            vec_n(t()),
            [(Pu::None, vec_n(t())), (Pu::None, u32()), (Pu::None, u32())],
        ))
        .open_type("T", Tc::Iu32),
    );
    c.add(
        Bf::InsertBits,
        sig(
            t(),
            [
                (Pu::None, t()),
                (Pu::None, t()),
                (Pu::None, u32()),
                (Pu::None, u32()),
            ],
        )
        .open_type("T", Tc::Iu32),
    );
    c.add(
        Bf::InsertBits,
        any_n(sig(
            vec_n(t()),
            [
                (Pu::None, vec_n(t())),
                (Pu::None, vec_n(t())),
                (Pu::None, u32()),
                (Pu::None, u32()),
            ],
        ))
        .open_type("T", Tc::Iu32),
    );
    c.add(
        Bf::FaceForward,
        any_n(sig(
            vec_n(f32()),
            [
                (Pu::None, vec_n(f32())),
                (Pu::None, vec_n(f32())),
                (Pu::None, vec_n(f32())),
            ],
        )),
    );
    c.add(
        Bf::Frexp,
        sig(Tp::FrexpResult(Box::new(f32())), [(Pu::None, f32())]),
    );
    c.add(
        Bf::Frexp,
        any_n(sig(
            Tp::FrexpResult(Box::new(vec_n(f32()))),
            [(Pu::None, vec_n(f32()))],
        )),
    );
    c.add(Bf::Ldexp, sig(f32(), [(Pu::None, f32()), (Pu::None, i32())]));
    c.add(
        Bf::Ldexp,
        any_n(sig(
            vec_n(f32()),
            [(Pu::None, vec_n(f32())), (Pu::None, vec_n(i32()))],
        )),
    );
    c.add(Bf::Length, sig(f32(), [(Pu::None, f32())]));
    c.add(Bf::Length, any_n(sig(f32(), [(Pu::None, vec_n(f32()))])));
    float_ternary(c, Bf::Mix);
    c.add(
        Bf::Mix,
        any_n(sig(
            vec_n(f32()),
            [
                (Pu::None, vec_n(f32())),
                (Pu::None, vec_n(f32())),
                (Pu::None, f32()),
            ],
        )),
    );
    c.add(Bf::Modf, sig(Tp::ModfResult(Box::new(f32())), [(Pu::None, f32())]));
    c.add(
        Bf::Modf,
        any_n(sig(
            Tp::ModfResult(Box::new(vec_n(f32()))),
            [(Pu::None, vec_n(f32()))],
        )),
    );
    c.add(
        Bf::Normalize,
        any_n(sig(vec_n(f32()), [(Pu::None, vec_n(f32()))])),
    );
    c.add(
        Bf::Reflect,
        any_n(sig(
            vec_n(f32()),
            [(Pu::None, vec_n(f32())), (Pu::None, vec_n(f32()))],
        )),
    );
    c.add(
        Bf::Refract,
        any_n(sig(
            vec_n(f32()),
            [
                (Pu::None, vec_n(f32())),
                (Pu::None, vec_n(f32())),
                (Pu::None, f32()),
            ],
        )),
    );
    c.add(
        Bf::Select,
        sig(t(), [(Pu::None, t()), (Pu::None, t()), (Pu::None, bool())])
            .open_type("T", Tc::Scalar),
    );
    c.add(
        Bf::Select,
        any_n(sig(
            vec_n(t()),
            [
                (Pu::None, vec_n(t())),
                (Pu::None, vec_n(t())),
                (Pu::None, bool()),
            ],
        ))
        .open_type("T", Tc::Scalar),
    );
    c.add(
        Bf::Select,
        any_n(sig(
            vec_n(t()),
            [
                (Pu::None, vec_n(t())),
                (Pu::None, vec_n(t())),
                (Pu::None, vec_n(bool())),
            ],
        ))
        .open_type("T", Tc::Scalar),
    );
    c.add(
        Bf::Transpose,
        sig(
            Tp::Matrix(Np::Open(1), Np::Open(0), Box::new(f32())),
            [(
                Pu::None,
                Tp::Matrix(Np::Open(0), Np::Open(1), Box::new(f32())),
            )],
        )
        .open_number("M", Nc::Any)
        .open_number("N", Nc::Any),
    );
}

fn logical(c: &mut Catalog) {
    for f in [Bf::All, Bf::Any] {
        c.add(f, any_n(sig(bool(), [(Pu::None, vec_n(bool()))])));
        c.add(f, sig(bool(), [(Pu::None, bool())]));
    }
}

fn memory(c: &mut Catalog) {
    c.add(
        Bf::ArrayLength,
        sig(
            u32(),
            [(
                Pu::None,
                Tp::Pointer(
                    Np::Fixed(Number::Space(AddressSpace::Storage)),
                    Box::new(Tp::RuntimeArray(Box::new(t()))),
                    Np::Open(0),
                ),
            )],
        )
        .open_type("T", Tc::Any)
        .open_number("A", Nc::Any),
    );

    c.add(Bf::StorageBarrier, sig_void([]));
    c.add(Bf::WorkgroupBarrier, sig_void([]));

    let atomic_ptr = || {
        Tp::Pointer(
            Np::Open(0),
            Box::new(Tp::Atomic(Box::new(t()))),
            Np::Fixed(Number::Access(StorageAccess::READ_WRITE)),
        )
    };
    let atomic = |o: Overload| {
        o.open_type("T", Tc::Iu32)
            .open_number("S", Nc::WorkgroupOrStorage)
    };
    c.add(Bf::AtomicLoad, atomic(sig(t(), [(Pu::None, atomic_ptr())])));
    c.add(
        Bf::AtomicStore,
        atomic(sig_void([(Pu::None, atomic_ptr()), (Pu::None, t())])),
    );
    for f in [
        Bf::AtomicAdd,
        Bf::AtomicSub,
        Bf::AtomicMax,
        Bf::AtomicMin,
        Bf::AtomicAnd,
        Bf::AtomicOr,
        Bf::AtomicXor,
        Bf::AtomicExchange,
    ] {
        c.add(f, atomic(sig(t(), [(Pu::None, atomic_ptr()), (Pu::None, t())])));
    }
    c.add(
        Bf::AtomicCompareExchangeWeak,
        atomic(sig(
            Tp::AtomicCompareExchangeResult(Box::new(t())),
            [(Pu::None, atomic_ptr()), (Pu::None, t()), (Pu::None, t())],
        )),
    );
}

fn packing(c: &mut Catalog) {
    for (f, arg) in [
        (Bf::Pack4x8Snorm, vec4(f32())),
        (Bf::Pack4x8Unorm, vec4(f32())),
        (Bf::Pack2x16Snorm, vec2(f32())),
        (Bf::Pack2x16Unorm, vec2(f32())),
        (Bf::Pack2x16Float, vec2(f32())),
    ] {
        c.add(f, sig(u32(), [(Pu::None, arg)]));
    }
    for (f, ret) in [
        (Bf::Unpack4x8Snorm, vec4(f32())),
        (Bf::Unpack4x8Unorm, vec4(f32())),
        (Bf::Unpack2x16Snorm, vec2(f32())),
        (Bf::Unpack2x16Unorm, vec2(f32())),
        (Bf::Unpack2x16Float, vec2(f32())),
    ] {
        c.add(f, sig(ret, [(Pu::None, u32())]));
    }
}

fn texture_queries(c: &mut Catalog) {
    let fiu32 = |o: Overload| o.open_type("T", Tc::Fiu32);
    let level = || (Pu::Level, i32());

    // Each texture's query is followed by the variant taking a mip level.
    for (dim, ret) in [
        (Dim::D1, i32()),
        (Dim::D2, vec2(i32())),
        (Dim::D2Array, vec2(i32())),
        (Dim::D3, vec3(i32())),
        (Dim::Cube, vec2(i32())),
        (Dim::CubeArray, vec2(i32())),
    ] {
        let texture = || (Pu::Texture, sampled(dim, t()));
        c.add(Bf::TextureDimensions, fiu32(sig(ret.clone(), [texture()])));
        c.add(
            Bf::TextureDimensions,
            fiu32(sig(ret, [texture(), level()])),
        );
    }
    c.add(
        Bf::TextureDimensions,
        fiu32(sig(
            vec2(i32()),
            [(Pu::Texture, multisampled(Dim::D2, t()))],
        )),
    );
    for dim in [Dim::D2, Dim::D2Array, Dim::Cube, Dim::CubeArray] {
        let texture = || (Pu::Texture, Tp::DepthTexture(dim));
        c.add(Bf::TextureDimensions, sig(vec2(i32()), [texture()]));
        c.add(
            Bf::TextureDimensions,
            sig(vec2(i32()), [texture(), level()]),
        );
    }
    c.add(
        Bf::TextureDimensions,
        sig(
            vec2(i32()),
            [(Pu::Texture, Tp::DepthMultisampledTexture(Dim::D2))],
        ),
    );
    for (dim, ret) in [
        (Dim::D1, i32()),
        (Dim::D2, vec2(i32())),
        (Dim::D2Array, vec2(i32())),
        (Dim::D3, vec3(i32())),
    ] {
        c.add(
            Bf::TextureDimensions,
            sig(ret, [(Pu::Texture, storage(dim))])
                .open_number("F", Nc::Any)
                .open_number("A", Nc::Write),
        );
    }
    c.add(
        Bf::TextureDimensions,
        sig(vec2(i32()), [(Pu::Texture, Tp::ExternalTexture)]),
    );

    for dim in [Dim::D2Array, Dim::CubeArray] {
        c.add(
            Bf::TextureNumLayers,
            fiu32(sig(i32(), [(Pu::Texture, sampled(dim, t()))])),
        );
    }
    for dim in [Dim::D2Array, Dim::CubeArray] {
        c.add(
            Bf::TextureNumLayers,
            sig(i32(), [(Pu::Texture, Tp::DepthTexture(dim))]),
        );
    }
    c.add(
        Bf::TextureNumLayers,
        sig(i32(), [(Pu::Texture, storage(Dim::D2Array))])
            .open_number("F", Nc::Any)
            .open_number("A", Nc::Write),
    );

    for dim in [
        Dim::D1,
        Dim::D2,
        Dim::D2Array,
        Dim::D3,
        Dim::Cube,
        Dim::CubeArray,
    ] {
        c.add(
            Bf::TextureNumLevels,
            fiu32(sig(i32(), [(Pu::Texture, sampled(dim, t()))])),
        );
    }
    for dim in [Dim::D2, Dim::D2Array, Dim::Cube, Dim::CubeArray] {
        c.add(
            Bf::TextureNumLevels,
            sig(i32(), [(Pu::Texture, Tp::DepthTexture(dim))]),
        );
    }

    c.add(
        Bf::TextureNumSamples,
        fiu32(sig(i32(), [(Pu::Texture, multisampled(Dim::D2, t()))])),
    );
    c.add(
        Bf::TextureNumSamples,
        sig(
            i32(),
            [(Pu::Texture, Tp::DepthMultisampledTexture(Dim::D2))],
        ),
    );
}

/// Coordinate type and, for arrayed textures, whether an array index
/// follows the coordinates.
fn coords(dim: Dim) -> (Tp, bool) {
    match dim {
        Dim::D1 => (f32(), false),
        Dim::D2 => (vec2(f32()), false),
        Dim::D2Array => (vec2(f32()), true),
        Dim::D3 | Dim::Cube => (vec3(f32()), false),
        Dim::CubeArray => (vec3(f32()), true),
    }
}

/// Offset type, for the dimensions that accept one.
fn offset(dim: Dim) -> Option<Tp> {
    match dim {
        Dim::D2 | Dim::D2Array => Some(vec2(i32())),
        Dim::D3 => Some(vec3(i32())),
        Dim::D1 | Dim::Cube | Dim::CubeArray => None,
    }
}

/// Adds a sampling overload for `texture` at `dim`, followed by its
/// offset variant when the dimension has one.
fn sampling(
    c: &mut Catalog,
    f: Bf,
    dim: Dim,
    lead: &[(Pu, Tp)],
    trail: &[(Pu, Tp)],
    ret: Tp,
    open_t: bool,
) {
    let (coords_ty, arrayed) = coords(dim);
    let mut base = Overload::new();
    for (usage, ty) in lead.iter().cloned() {
        base = base.param(usage, ty);
    }
    base = base.param(Pu::Coords, coords_ty);
    if arrayed {
        base = base.param(Pu::ArrayIndex, i32());
    }
    for (usage, ty) in trail.iter().cloned() {
        base = base.param(usage, ty);
    }
    base = base.returns(ret);
    if open_t {
        base = base.open_type("T", Tc::Fiu32);
    }
    let with_offset = offset(dim).map(|offset| base.clone().param(Pu::Offset, offset));
    c.add(f, base);
    if let Some(overload) = with_offset {
        c.add(f, overload);
    }
}

fn texture_sampling(c: &mut Catalog) {
    let color = |dim| {
        [
            (Pu::Texture, sampled(dim, f32())),
            (Pu::Sampler, sampler()),
        ]
    };
    let depth = |dim| {
        [
            (Pu::Texture, Tp::DepthTexture(dim)),
            (Pu::Sampler, sampler()),
        ]
    };
    let depth_compare = |dim| {
        [
            (Pu::Texture, Tp::DepthTexture(dim)),
            (Pu::Sampler, comparison_sampler()),
        ]
    };
    let color_dims = [
        Dim::D1,
        Dim::D2,
        Dim::D2Array,
        Dim::D3,
        Dim::Cube,
        Dim::CubeArray,
    ];
    let depth_dims = [Dim::D2, Dim::D2Array, Dim::Cube, Dim::CubeArray];

    for dim in color_dims {
        sampling(c, Bf::TextureSample, dim, &color(dim), &[], vec4(f32()), false);
    }
    for dim in depth_dims {
        sampling(c, Bf::TextureSample, dim, &depth(dim), &[], f32(), false);
    }

    for dim in &color_dims[1..] {
        sampling(
            c,
            Bf::TextureSampleBias,
            *dim,
            &color(*dim),
            &[(Pu::Bias, f32())],
            vec4(f32()),
            false,
        );
    }

    for f in [Bf::TextureSampleCompare, Bf::TextureSampleCompareLevel] {
        for dim in depth_dims {
            sampling(
                c,
                f,
                dim,
                &depth_compare(dim),
                &[(Pu::DepthRef, f32())],
                f32(),
                false,
            );
        }
    }

    for dim in &color_dims[1..] {
        let (gradient, _) = coords(*dim);
        sampling(
            c,
            Bf::TextureSampleGrad,
            *dim,
            &color(*dim),
            &[(Pu::Ddx, gradient.clone()), (Pu::Ddy, gradient)],
            vec4(f32()),
            false,
        );
    }

    for dim in &color_dims[1..] {
        sampling(
            c,
            Bf::TextureSampleLevel,
            *dim,
            &color(*dim),
            &[(Pu::Level, f32())],
            vec4(f32()),
            false,
        );
    }
    for dim in depth_dims {
        sampling(
            c,
            Bf::TextureSampleLevel,
            dim,
            &depth(dim),
            &[(Pu::Level, i32())],
            f32(),
            false,
        );
    }
    c.add(
        Bf::TextureSampleLevel,
        sig(
            vec4(f32()),
            [
                (Pu::Texture, Tp::ExternalTexture),
                (Pu::Sampler, sampler()),
                (Pu::Coords, vec2(f32())),
            ],
        ),
    );

    for dim in [Dim::D2, Dim::D2Array, Dim::Cube, Dim::CubeArray] {
        sampling(
            c,
            Bf::TextureGather,
            dim,
            &[
                (Pu::Component, i32()),
                (Pu::Texture, sampled(dim, t())),
                (Pu::Sampler, sampler()),
            ],
            &[],
            vec4(t()),
            true,
        );
    }
    for dim in depth_dims {
        sampling(c, Bf::TextureGather, dim, &depth(dim), &[], vec4(f32()), false);
    }
    for dim in depth_dims {
        sampling(
            c,
            Bf::TextureGatherCompare,
            dim,
            &depth_compare(dim),
            &[(Pu::DepthRef, f32())],
            vec4(f32()),
            false,
        );
    }
}

fn texture_load_store(c: &mut Catalog) {
    let fiu32 = |o: Overload| o.open_type("T", Tc::Fiu32);
    let texture = |dim| (Pu::Texture, sampled(dim, t()));

    c.add(
        Bf::TextureLoad,
        fiu32(sig(
            vec4(t()),
            [texture(Dim::D1), (Pu::Coords, i32()), (Pu::Level, i32())],
        )),
    );
    c.add(
        Bf::TextureLoad,
        fiu32(sig(
            vec4(t()),
            [
                texture(Dim::D2),
                (Pu::Coords, vec2(i32())),
                (Pu::Level, i32()),
            ],
        )),
    );
    c.add(
        Bf::TextureLoad,
        fiu32(sig(
            vec4(t()),
            [
                texture(Dim::D2Array),
                (Pu::Coords, vec2(i32())),
                (Pu::ArrayIndex, i32()),
                (Pu::Level, i32()),
            ],
        )),
    );
    c.add(
        Bf::TextureLoad,
        fiu32(sig(
            vec4(t()),
            [
                texture(Dim::D3),
                (Pu::Coords, vec3(i32())),
                (Pu::Level, i32()),
            ],
        )),
    );
    c.add(
        Bf::TextureLoad,
        fiu32(sig(
            vec4(t()),
            [
                (Pu::Texture, multisampled(Dim::D2, t())),
                (Pu::Coords, vec2(i32())),
                (Pu::SampleIndex, i32()),
            ],
        )),
    );
    c.add(
        Bf::TextureLoad,
        sig(
            f32(),
            [
                (Pu::Texture, Tp::DepthTexture(Dim::D2)),
                (Pu::Coords, vec2(i32())),
                (Pu::Level, i32()),
            ],
        ),
    );
    c.add(
        Bf::TextureLoad,
        sig(
            f32(),
            [
                (Pu::Texture, Tp::DepthTexture(Dim::D2Array)),
                (Pu::Coords, vec2(i32())),
                (Pu::ArrayIndex, i32()),
                (Pu::Level, i32()),
            ],
        ),
    );
    c.add(
        Bf::TextureLoad,
        sig(
            f32(),
            [
                (Pu::Texture, Tp::DepthMultisampledTexture(Dim::D2)),
                (Pu::Coords, vec2(i32())),
                (Pu::SampleIndex, i32()),
            ],
        ),
    );
    c.add(
        Bf::TextureLoad,
        sig(
            vec4(f32()),
            [
                (Pu::Texture, Tp::ExternalTexture),
                (Pu::Coords, vec2(i32())),
            ],
        ),
    );

    for (constraint, texel) in [
        (Nc::F32TexelFormat, f32()),
        (Nc::I32TexelFormat, i32()),
        (Nc::U32TexelFormat, u32()),
    ] {
        for (dim, coords, arrayed) in [
            (Dim::D1, i32(), false),
            (Dim::D2, vec2(i32()), false),
            (Dim::D2Array, vec2(i32()), true),
            (Dim::D3, vec3(i32()), false),
        ] {
            let mut overload = Overload::new()
                .open_number("F", constraint)
                .param(Pu::Texture, write_only_storage(dim))
                .param(Pu::Coords, coords);
            if arrayed {
                overload = overload.param(Pu::ArrayIndex, i32());
            }
            c.add(
                Bf::TextureStore,
                overload.param(Pu::Value, vec4(texel.clone())),
            );
        }
    }
}

/// Builds the overload lists of every builtin function.
pub(super) fn build() -> FastHashMap<Bf, Vec<Overload>> {
    let mut c = Catalog::default();
    numeric(&mut c);
    logical(&mut c);
    memory(&mut c);
    packing(&mut c);
    texture_queries(&mut c);
    texture_sampling(&mut c);
    texture_load_store(&mut c);
    log::debug!(
        "builtin catalog holds {} overloads",
        c.overloads.values().map(Vec::len).sum::<usize>()
    );
    c.overloads
}
