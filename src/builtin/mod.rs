//! The builtin function table.
//!
//! Every builtin is described by a list of overloads in [`catalog`]. A call
//! is resolved by unifying the argument types against each overload in
//! declaration order; the first full match wins. Resolved signatures are
//! interned, so identical lookups yield identical [`Handle`]s.

mod catalog;
mod matcher;

use std::{fmt, ops};

use smallvec::SmallVec;

use crate::{FastHashMap, Handle, Span, Type, UniqueArena};
use matcher::Overload;

macro_rules! builtin_functions {
    ($($variant:ident => $name:literal,)*) => {
        /// A WGSL builtin function.
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[cfg_attr(feature = "serialize", derive(serde::Serialize))]
        #[cfg_attr(feature = "deserialize", derive(serde::Deserialize))]
        pub enum BuiltinFunction {
            $($variant,)*
        }

        impl BuiltinFunction {
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Some(match name {
                    $($name => Self::$variant,)*
                    _ => return None,
                })
            }
        }
    };
}

builtin_functions! {
    Abs => "abs",
    Acos => "acos",
    All => "all",
    Any => "any",
    ArrayLength => "arrayLength",
    Asin => "asin",
    Atan => "atan",
    Atan2 => "atan2",
    Ceil => "ceil",
    Clamp => "clamp",
    Cos => "cos",
    Cosh => "cosh",
    CountLeadingZeros => "countLeadingZeros",
    CountOneBits => "countOneBits",
    CountTrailingZeros => "countTrailingZeros",
    Cross => "cross",
    Degrees => "degrees",
    Determinant => "determinant",
    Distance => "distance",
    Dot => "dot",
    Dpdx => "dpdx",
    DpdxCoarse => "dpdxCoarse",
    DpdxFine => "dpdxFine",
    Dpdy => "dpdy",
    DpdyCoarse => "dpdyCoarse",
    DpdyFine => "dpdyFine",
    Exp => "exp",
    Exp2 => "exp2",
    ExtractBits => "extractBits",
    FaceForward => "faceForward",
    FirstLeadingBit => "firstLeadingBit",
    FirstTrailingBit => "firstTrailingBit",
    Floor => "floor",
    Fma => "fma",
    Fract => "fract",
    Frexp => "frexp",
    Fwidth => "fwidth",
    FwidthCoarse => "fwidthCoarse",
    FwidthFine => "fwidthFine",
    InsertBits => "insertBits",
    InverseSqrt => "inverseSqrt",
    Ldexp => "ldexp",
    Length => "length",
    Log => "log",
    Log2 => "log2",
    Max => "max",
    Min => "min",
    Mix => "mix",
    Modf => "modf",
    Normalize => "normalize",
    Pack2x16Float => "pack2x16float",
    Pack2x16Snorm => "pack2x16snorm",
    Pack2x16Unorm => "pack2x16unorm",
    Pack4x8Snorm => "pack4x8snorm",
    Pack4x8Unorm => "pack4x8unorm",
    Pow => "pow",
    Radians => "radians",
    Reflect => "reflect",
    Refract => "refract",
    ReverseBits => "reverseBits",
    Round => "round",
    Select => "select",
    Sign => "sign",
    Sin => "sin",
    Sinh => "sinh",
    Smoothstep => "smoothstep",
    Sqrt => "sqrt",
    Step => "step",
    StorageBarrier => "storageBarrier",
    Tan => "tan",
    Tanh => "tanh",
    Transpose => "transpose",
    Trunc => "trunc",
    Unpack2x16Float => "unpack2x16float",
    Unpack2x16Snorm => "unpack2x16snorm",
    Unpack2x16Unorm => "unpack2x16unorm",
    Unpack4x8Snorm => "unpack4x8snorm",
    Unpack4x8Unorm => "unpack4x8unorm",
    WorkgroupBarrier => "workgroupBarrier",
    AtomicLoad => "atomicLoad",
    AtomicStore => "atomicStore",
    AtomicAdd => "atomicAdd",
    AtomicSub => "atomicSub",
    AtomicMax => "atomicMax",
    AtomicMin => "atomicMin",
    AtomicAnd => "atomicAnd",
    AtomicOr => "atomicOr",
    AtomicXor => "atomicXor",
    AtomicExchange => "atomicExchange",
    AtomicCompareExchangeWeak => "atomicCompareExchangeWeak",
    TextureDimensions => "textureDimensions",
    TextureGather => "textureGather",
    TextureGatherCompare => "textureGatherCompare",
    TextureLoad => "textureLoad",
    TextureNumLayers => "textureNumLayers",
    TextureNumLevels => "textureNumLevels",
    TextureNumSamples => "textureNumSamples",
    TextureSample => "textureSample",
    TextureSampleBias => "textureSampleBias",
    TextureSampleCompare => "textureSampleCompare",
    TextureSampleCompareLevel => "textureSampleCompareLevel",
    TextureSampleGrad => "textureSampleGrad",
    TextureSampleLevel => "textureSampleLevel",
    TextureStore => "textureStore",
}

impl fmt::Display for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role an argument plays in a builtin call.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "deserialize", derive(serde::Deserialize))]
pub enum ParameterUsage {
    None,
    ArrayIndex,
    Bias,
    Component,
    Coords,
    Ddx,
    Ddy,
    DepthRef,
    Level,
    Offset,
    SampleIndex,
    Sampler,
    Texture,
    Value,
}

impl ParameterUsage {
    /// Name printed before the parameter type in signatures.
    pub const fn label(self) -> Option<&'static str> {
        Some(match self {
            Self::None => return None,
            Self::ArrayIndex => "array_index",
            Self::Bias => "bias",
            Self::Component => "component",
            Self::Coords => "coords",
            Self::Ddx => "ddx",
            Self::Ddy => "ddy",
            Self::DepthRef => "depth_ref",
            Self::Level => "level",
            Self::Offset => "offset",
            Self::SampleIndex => "sample_index",
            Self::Sampler => "sampler",
            Self::Texture => "texture",
            Self::Value => "value",
        })
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Parameter {
    pub ty: Handle<Type>,
    pub usage: ParameterUsage,
}

/// A resolved builtin signature, with every open type closed.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Builtin {
    pub function: BuiltinFunction,
    pub parameters: Vec<Parameter>,
    /// `None` for builtins that return nothing, such as barriers.
    pub return_type: Option<Handle<Type>>,
}

/// No overload of a builtin accepts the given arguments.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("no matching call to {function}({}){}", .arguments.join(", "), CandidateList(.candidates))]
pub struct NoMatchingOverload {
    pub function: BuiltinFunction,
    pub arguments: Vec<String>,
    /// Printed overloads, best candidates first.
    pub candidates: Vec<String>,
}

struct CandidateList<'a>(&'a [String]);

impl fmt::Display for CandidateList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let candidates = self.0;
        if candidates.is_empty() {
            return Ok(());
        }
        write!(
            f,
            "\n\n{} candidate function{}",
            candidates.len(),
            if candidates.len() == 1 { ":" } else { "s:" }
        )?;
        for candidate in candidates {
            write!(f, "\n  {}", candidate)?;
        }
        Ok(())
    }
}

/// Overload catalog plus the interned signatures resolved from it.
#[derive(Debug)]
pub struct Table {
    overloads: FastHashMap<BuiltinFunction, Vec<Overload>>,
    builtins: UniqueArena<Builtin>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    pub fn new() -> Self {
        Table {
            overloads: catalog::build(),
            builtins: UniqueArena::new(),
        }
    }

    /// Resolves a call of `function` with arguments of the given types.
    ///
    /// References are loaded before matching. Abstract arguments unify with
    /// any parameter type they automatically convert to.
    pub fn lookup(
        &mut self,
        function: BuiltinFunction,
        args: &[Handle<Type>],
        types: &mut UniqueArena<Type>,
    ) -> Result<Handle<Builtin>, NoMatchingOverload> {
        let args = args
            .iter()
            .map(|&arg| types.unwrap_ref(arg))
            .collect::<SmallVec<[_; 4]>>();
        let overloads = self
            .overloads
            .get(&function)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut candidates = Vec::new();
        for overload in overloads {
            let (score, state) = overload.score(&args, types);
            log::trace!(
                "{}: score {} for {}",
                function,
                score,
                overload.describe(function.as_str())
            );
            let state = match state {
                Some(state) => state,
                None => {
                    if score > 0 {
                        candidates.push((score, overload));
                    }
                    continue;
                }
            };

            let parameters = overload
                .parameters
                .iter()
                .map(|param| {
                    overload
                        .build(&param.ty, &state, types)
                        .map(|ty| Parameter {
                            ty,
                            usage: param.usage,
                        })
                })
                .collect::<Option<Vec<_>>>();
            let return_type = match overload.return_type {
                Some(ref ret) => overload.build(ret, &state, types).map(Some),
                None => Some(None),
            };
            if let (Some(parameters), Some(return_type)) = (parameters, return_type) {
                let builtin = Builtin {
                    function,
                    parameters,
                    return_type,
                };
                let handle = self.builtins.insert(builtin, Span::UNDEFINED);
                log::debug!("resolved {} to builtin {:?}", function, handle);
                return Ok(handle);
            }
        }

        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        Err(NoMatchingOverload {
            function,
            arguments: args.iter().map(|&arg| types.name(arg).to_string()).collect(),
            candidates: candidates
                .into_iter()
                .map(|(_, overload)| overload.describe(function.as_str()))
                .collect(),
        })
    }

    pub fn builtins(&self) -> &UniqueArena<Builtin> {
        &self.builtins
    }
}

impl ops::Index<Handle<Builtin>> for Table {
    type Output = Builtin;
    fn index(&self, handle: Handle<Builtin>) -> &Builtin {
        &self.builtins[handle]
    }
}
