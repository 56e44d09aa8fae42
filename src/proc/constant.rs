//! Compile-time constant values.

use std::fmt;

use crate::{ArraySize, Handle, Scalar, ScalarKind, Type, TypeInner, UniqueArena};

/// A single scalar leaf of a [`Constant`].
///
/// Booleans and all integer kinds are stored through the signed 64-bit
/// carrier, floats of every width through `f64`.
#[derive(Clone, Copy, Debug)]
pub enum Element {
    Int(i64),
    Float(f64),
}

impl PartialEq for Element {
    /// Bit-exact comparison: `0.0` and `-0.0` differ.
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Element {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Numeric zero; both signs of a float zero count.
    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(v) => v == 0,
            Self::Float(v) => v == 0.0,
        }
    }

    /// Explicit conversion of a leaf to `to`.
    ///
    /// Float to integer saturates, float to narrower float overflows to a
    /// signed infinity, integer to integer goes through the 64-bit carrier.
    pub fn convert(self, to: Scalar) -> Self {
        match to.kind {
            ScalarKind::Bool => Self::Int(!self.is_zero() as i64),
            ScalarKind::Sint => Self::Int(match self {
                Self::Int(v) => v as i32 as i64,
                Self::Float(v) => v as i32 as i64,
            }),
            ScalarKind::Uint => Self::Int(match self {
                Self::Int(v) => v as u32 as i64,
                Self::Float(v) => v as u32 as i64,
            }),
            ScalarKind::AbstractInt => Self::Int(match self {
                Self::Int(v) => v,
                Self::Float(v) => v as i64,
            }),
            ScalarKind::Float => Self::Float(quantize(self.as_f64(), to.width)),
            ScalarKind::AbstractFloat => Self::Float(self.as_f64()),
        }
    }

    /// Implicit conversion of an abstract leaf to the concrete type `to`,
    /// failing if the value cannot be represented.
    pub fn materialize(self, from: Scalar, to: Scalar) -> Result<Self, Unrepresentable> {
        let unrepresentable = || Unrepresentable {
            value: self.to_string(),
            ty: to.to_wgsl(),
        };
        if !from.is_abstract() || from == to {
            return Ok(self.convert(to));
        }
        match to.kind {
            ScalarKind::Sint => match self {
                Self::Int(v) => i32::try_from(v)
                    .map(|v| Self::Int(v as i64))
                    .map_err(|_| unrepresentable()),
                Self::Float(_) => Err(unrepresentable()),
            },
            ScalarKind::Uint => match self {
                Self::Int(v) => u32::try_from(v)
                    .map(|v| Self::Int(v as i64))
                    .map_err(|_| unrepresentable()),
                Self::Float(_) => Err(unrepresentable()),
            },
            ScalarKind::Float => {
                let converted = self.convert(to);
                if self.as_f64().is_finite() && converted.as_f64().is_infinite() {
                    Err(unrepresentable())
                } else {
                    Ok(converted)
                }
            }
            _ => Ok(self.convert(to)),
        }
    }
}

/// Round `value` to the nearest value representable in a float of `width`
/// bytes, or to a signed infinity if it is out of range.
fn quantize(value: f64, width: crate::Bytes) -> f64 {
    match width {
        2 => half::f16::from_f64(value).to_f64(),
        4 => value as f32 as f64,
        _ => value,
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("value {value} cannot be represented as '{ty}'")]
pub struct Unrepresentable {
    pub value: String,
    pub ty: &'static str,
}

/// Formats a float like C's `%g`: six significant digits, scientific
/// notation for very large or small magnitudes.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{value:.5e}");
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    fn trim(digits: &str) -> &str {
        if digits.contains('.') {
            digits.trim_end_matches('0').trim_end_matches('.')
        } else {
            digits
        }
    }

    if !(-4..6).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim(mantissa), sign, exponent.abs())
    } else {
        let decimals = (5 - exponent).max(0) as usize;
        trim(&format!("{value:.decimals$}")).to_string()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&format_float(v)),
        }
    }
}

/// The leaves of a scalar, vector or matrix constant, in column-major order.
#[derive(Clone, Debug, PartialEq)]
pub enum Elements {
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl Elements {
    pub fn len(&self) -> usize {
        match *self {
            Self::Int(ref v) => v.len(),
            Self::Float(ref v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Element> {
        match *self {
            Self::Int(ref v) => v.get(index).copied().map(Element::Int),
            Self::Float(ref v) => v.get(index).copied().map(Element::Float),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Element> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Element-wise explicit conversion, see [`Element::convert`].
    pub fn convert(&self, to: Scalar) -> Self {
        Self::collect(to, self.iter().map(|e| e.convert(to)))
    }

    /// Element-wise materialization, see [`Element::materialize`].
    pub fn materialize(&self, from: Scalar, to: Scalar) -> Result<Self, Unrepresentable> {
        let converted = self
            .iter()
            .map(|e| e.materialize(from, to))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::collect(to, converted.into_iter()))
    }

    fn collect(scalar: Scalar, elements: impl Iterator<Item = Element>) -> Self {
        if scalar.is_integer_like() {
            Self::Int(
                elements
                    .map(|e| match e {
                        Element::Int(v) => v,
                        Element::Float(v) => v as i64,
                    })
                    .collect(),
            )
        } else {
            Self::Float(elements.map(Element::as_f64).collect())
        }
    }
}

/// Zero values of arrays with more leaves than this are not folded.
pub const MAX_ZERO_LEAVES: u64 = 1 << 16;

/// An immutable value paired with its type.
#[derive(Clone, Debug, PartialEq)]
pub struct Constant {
    ty: Handle<Type>,
    value: Value,
}

#[derive(Clone, Debug, PartialEq)]
enum Value {
    Scalar(Element),
    /// One child per vector component, matrix column, array element or
    /// struct member.
    Composite(Vec<Constant>),
}

impl Constant {
    pub fn scalar(ty: Handle<Type>, element: Element) -> Self {
        Constant {
            ty,
            value: Value::Scalar(element),
        }
    }

    pub fn composite(ty: Handle<Type>, components: Vec<Constant>) -> Self {
        Constant {
            ty,
            value: Value::Composite(components),
        }
    }

    pub fn ty(&self) -> Handle<Type> {
        self.ty
    }

    /// The `i`-th child of an aggregate. `None` for scalars.
    pub fn index(&self, i: usize) -> Option<&Constant> {
        match self.value {
            Value::Scalar(_) => None,
            Value::Composite(ref components) => components.get(i),
        }
    }

    pub fn components(&self) -> &[Constant] {
        match self.value {
            Value::Scalar(_) => &[],
            Value::Composite(ref components) => components,
        }
    }

    pub fn element(&self) -> Option<Element> {
        match self.value {
            Value::Scalar(element) => Some(element),
            Value::Composite(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.element()? {
            Element::Int(v) => Some(v),
            Element::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.element()? {
            Element::Float(v) => Some(v),
            Element::Int(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_i64().map(|v| v != 0)
    }

    /// All scalar leaves, depth first.
    pub fn leaves(&self) -> Vec<Element> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<Element>) {
        match self.value {
            Value::Scalar(element) => out.push(element),
            Value::Composite(ref components) => {
                for component in components {
                    component.collect_leaves(out);
                }
            }
        }
    }

    /// `true` if every leaf has the same bit pattern.
    pub fn all_equal(&self) -> bool {
        let leaves = self.leaves();
        leaves.windows(2).all(|pair| pair[0] == pair[1])
    }

    /// `true` if any leaf is numerically zero.
    pub fn any_zero(&self) -> bool {
        self.leaves().into_iter().any(Element::is_zero)
    }

    /// `true` if every leaf is numerically zero.
    pub fn all_zero(&self) -> bool {
        self.leaves().into_iter().all(Element::is_zero)
    }

    /// The leaves of a scalar, vector or matrix constant in their tagged
    /// representation.
    pub fn elements(&self, types: &UniqueArena<Type>) -> Option<Elements> {
        let (scalar, _) = types[self.ty].inner.element_of()?;
        Some(Elements::collect(scalar, self.leaves().into_iter()))
    }

    /// The zero value of `ty`, recursively. `None` for types without one,
    /// such as runtime-sized arrays.
    pub fn zero(ty: Handle<Type>, types: &mut UniqueArena<Type>) -> Option<Self> {
        match types[ty].inner {
            TypeInner::Scalar(scalar) => Some(Self::scalar(ty, Element::Int(0).convert(scalar))),
            TypeInner::Vector { .. } | TypeInner::Matrix { .. } => {
                let (scalar, count) = types[ty].inner.element_of()?;
                let zero = Element::Int(0).convert(scalar);
                Self::from_leaves(ty, &mut std::iter::repeat(zero).take(count as usize), types)
            }
            TypeInner::Array {
                base,
                size: ArraySize::Constant(count),
            } => {
                let leaves = leaf_count(ty, types);
                if leaves > MAX_ZERO_LEAVES {
                    log::debug!(
                        "not folding the zero value of {}: {} leaves",
                        types.name(ty),
                        leaves
                    );
                    return None;
                }
                let element = Self::zero(base, types)?;
                Some(Self::composite(ty, vec![element; count.get() as usize]))
            }
            TypeInner::Struct { ref members } => {
                let member_types = members.iter().map(|m| m.ty).collect::<Vec<_>>();
                let components = member_types
                    .into_iter()
                    .map(|member| Self::zero(member, types))
                    .collect::<Option<Vec<_>>>()?;
                Some(Self::composite(ty, components))
            }
            _ => None,
        }
    }

    /// Builds a scalar, vector or matrix constant of type `ty` from leaves
    /// in column-major order. The leaves must already be of `ty`'s scalar.
    pub fn from_leaves(
        ty: Handle<Type>,
        leaves: &mut impl Iterator<Item = Element>,
        types: &mut UniqueArena<Type>,
    ) -> Option<Self> {
        match types[ty].inner {
            TypeInner::Scalar(_) => leaves.next().map(|leaf| Self::scalar(ty, leaf)),
            TypeInner::Vector { size, scalar } => {
                let scalar_ty = types.scalar(scalar);
                let components = (0..size as usize)
                    .map(|_| leaves.next().map(|leaf| Self::scalar(scalar_ty, leaf)))
                    .collect::<Option<Vec<_>>>()?;
                Some(Self::composite(ty, components))
            }
            TypeInner::Matrix {
                columns,
                rows,
                scalar,
            } => {
                let column_ty = types.vector(rows, scalar);
                let components = (0..columns as usize)
                    .map(|_| Self::from_leaves(column_ty, leaves, types))
                    .collect::<Option<Vec<_>>>()?;
                Some(Self::composite(ty, components))
            }
            _ => None,
        }
    }

    /// Broadcasts a single leaf to every leaf of a vector or matrix type.
    pub fn splat(ty: Handle<Type>, leaf: Element, types: &mut UniqueArena<Type>) -> Option<Self> {
        let (_, count) = types[ty].inner.element_of()?;
        Self::from_leaves(ty, &mut std::iter::repeat(leaf).take(count as usize), types)
    }

    /// Converts every leaf to the scalar of `to`, which must have the same
    /// shape as this constant's type.
    pub fn convert(&self, to: Handle<Type>, types: &mut UniqueArena<Type>) -> Option<Self> {
        self.map_elements(to, types, &mut |elements, _, scalar| Ok(elements.convert(scalar)))
            .ok()
            .flatten()
    }

    /// Materializes abstract leaves to the scalar of `to`, which must have
    /// the same shape as this constant's type.
    pub fn materialize(
        &self,
        to: Handle<Type>,
        types: &mut UniqueArena<Type>,
    ) -> Result<Self, Unrepresentable> {
        let converted = self.map_elements(to, types, &mut |elements, from, scalar| {
            elements.materialize(from, scalar)
        })?;
        Ok(converted.unwrap_or_else(|| self.clone()))
    }

    /// Rebuilds this constant as `to`, passing the leaves of every scalar,
    /// vector or matrix part through `f` in their tagged representation.
    fn map_elements(
        &self,
        to: Handle<Type>,
        types: &mut UniqueArena<Type>,
        f: &mut impl FnMut(&Elements, Scalar, Scalar) -> Result<Elements, Unrepresentable>,
    ) -> Result<Option<Self>, Unrepresentable> {
        if self.ty == to {
            return Ok(Some(self.clone()));
        }
        let shapes = (
            types[self.ty].inner.element_of(),
            types[to].inner.element_of(),
        );
        if let (Some((from, _)), Some((scalar, _))) = shapes {
            let same_shape = match (&types[self.ty].inner, &types[to].inner) {
                (&TypeInner::Scalar(_), &TypeInner::Scalar(_)) => true,
                (&TypeInner::Vector { size: a, .. }, &TypeInner::Vector { size: b, .. }) => a == b,
                (
                    &TypeInner::Matrix {
                        columns: c1,
                        rows: r1,
                        ..
                    },
                    &TypeInner::Matrix {
                        columns: c2,
                        rows: r2,
                        ..
                    },
                ) => c1 == c2 && r1 == r2,
                _ => false,
            };
            if !same_shape {
                return Ok(None);
            }
            let elements = match self.elements(types) {
                Some(elements) => elements,
                None => return Ok(None),
            };
            let converted = f(&elements, from, scalar)?;
            let mut leaves = converted.iter();
            return Ok(Self::from_leaves(to, &mut leaves, types));
        }

        let components = self.components();
        let child_types: Vec<Handle<Type>> = match types[to].inner {
            TypeInner::Array { base, .. } => vec![base; components.len()],
            TypeInner::Struct { ref members } => members.iter().map(|m| m.ty).collect(),
            _ => return Ok(None),
        };
        if child_types.len() != components.len() {
            return Ok(None);
        }
        let mut converted = Vec::with_capacity(components.len());
        for (component, child_ty) in components.iter().zip(child_types) {
            match component.map_elements(child_ty, types, &mut *f)? {
                Some(c) => converted.push(c),
                None => return Ok(None),
            }
        }
        Ok(Some(Self::composite(to, converted)))
    }
}

/// Number of scalar leaves in a value of type `ty`, saturating.
fn leaf_count(ty: Handle<Type>, types: &UniqueArena<Type>) -> u64 {
    match types[ty].inner {
        TypeInner::Array {
            base,
            size: ArraySize::Constant(count),
        } => leaf_count(base, types).saturating_mul(count.get() as u64),
        TypeInner::Struct { ref members } => members
            .iter()
            .fold(0, |sum, m| sum.saturating_add(leaf_count(m.ty, types))),
        ref inner => inner.element_of().map_or(1, |(_, count)| count as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StructMember, VectorSize};
    use std::num::NonZeroU32;

    fn array(base: Handle<Type>, count: u32, types: &mut UniqueArena<Type>) -> Handle<Type> {
        types.insert_inner(TypeInner::Array {
            base,
            size: ArraySize::Constant(NonZeroU32::new(count).unwrap()),
        })
    }

    #[test]
    fn f16_quantization() {
        let quantized = Element::Float(9.9).convert(Scalar::F16);
        assert_eq!(quantized, Element::Float(9.8984375));
    }

    #[test]
    fn float_to_int_saturates() {
        assert_eq!(Element::Float(1e10).convert(Scalar::I32), Element::Int(i32::MAX as i64));
        assert_eq!(Element::Float(-1e20).convert(Scalar::I32), Element::Int(i32::MIN as i64));
        assert_eq!(Element::Float(1e30).convert(Scalar::U32), Element::Int(u32::MAX as i64));
        assert_eq!(Element::Float(-1e20).convert(Scalar::U32), Element::Int(0));
    }

    #[test]
    fn narrowing_float_overflows_to_infinity() {
        assert_eq!(
            Element::Float(1e10).convert(Scalar::F16),
            Element::Float(f64::INFINITY)
        );
        assert_eq!(
            Element::Float(-1e20).convert(Scalar::F16),
            Element::Float(f64::NEG_INFINITY)
        );
        assert_eq!(
            Element::Float(1e300).convert(Scalar::F32),
            Element::Float(f64::INFINITY)
        );
    }

    #[test]
    fn narrowing_rounds_before_overflowing() {
        assert_eq!(
            Element::Float(65519.0).convert(Scalar::F16),
            Element::Float(65504.0)
        );
        assert_eq!(
            Element::Float(65519.0).materialize(Scalar::ABSTRACT_FLOAT, Scalar::F16),
            Ok(Element::Float(65504.0))
        );
        assert_eq!(
            Element::Float(f32::MAX as f64 + 1e30).convert(Scalar::F32),
            Element::Float(f32::MAX as f64)
        );
        assert_eq!(
            Element::Float(70000.0).convert(Scalar::F16),
            Element::Float(f64::INFINITY)
        );
        assert!(Element::Float(70000.0)
            .materialize(Scalar::ABSTRACT_FLOAT, Scalar::F16)
            .is_err());
    }

    #[test]
    fn integer_conversions_go_through_the_carrier() {
        assert_eq!(Element::Int(u32::MAX as i64).convert(Scalar::I32), Element::Int(-1));
        assert_eq!(Element::Int(-1).convert(Scalar::U32), Element::Int(u32::MAX as i64));
        assert_eq!(Element::Int(7).convert(Scalar::BOOL), Element::Int(1));
        assert_eq!(Element::Float(-0.0).convert(Scalar::BOOL), Element::Int(0));
    }

    #[test]
    fn materialize_rejects_out_of_range() {
        let err = Element::Int(1 << 40)
            .materialize(Scalar::ABSTRACT_INT, Scalar::I32)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "value 1099511627776 cannot be represented as 'i32'"
        );
        let err = Element::Float(1e39)
            .materialize(Scalar::ABSTRACT_FLOAT, Scalar::F32)
            .unwrap_err();
        assert_eq!(err.to_string(), "value 1e+39 cannot be represented as 'f32'");
        assert_eq!(
            Element::Int(-3).materialize(Scalar::ABSTRACT_INT, Scalar::F32),
            Ok(Element::Float(-3.0))
        );
    }

    #[test]
    fn format_like_printf_g() {
        assert_eq!(format_float(f64::MAX), "1.79769e+308");
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(100000.0), "100000");
        assert_eq!(format_float(1000000.0), "1e+06");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(-2.25), "-2.25");
    }

    #[test]
    fn zero_signs_and_equality() {
        let mut types = UniqueArena::new();
        let vec3 = types.vector(VectorSize::Tri, Scalar::F32);
        let leaves = [0.0, -0.0, 0.0].map(Element::Float);
        let constant = Constant::from_leaves(vec3, &mut leaves.into_iter(), &mut types).unwrap();
        assert!(constant.any_zero());
        assert!(constant.all_zero());
        assert!(!constant.all_equal());
    }

    #[test]
    fn zero_value_of_struct() {
        let mut types = UniqueArena::new();
        let i32 = types.scalar(Scalar::I32);
        let vec2 = types.vector(VectorSize::Bi, Scalar::F32);
        let s = types.insert(
            Type {
                name: Some("S".to_string()),
                inner: TypeInner::Struct {
                    members: vec![
                        crate::StructMember {
                            name: "a".to_string(),
                            ty: i32,
                        },
                        crate::StructMember {
                            name: "b".to_string(),
                            ty: vec2,
                        },
                    ],
                },
            },
            Default::default(),
        );
        let zero = Constant::zero(s, &mut types).unwrap();
        assert!(zero.all_zero());
        assert_eq!(zero.index(0).unwrap().as_i64(), Some(0));
        assert_eq!(zero.index(1).unwrap().ty(), vec2);
        assert_eq!(zero.index(1).unwrap().index(1).unwrap().as_f64(), Some(0.0));
    }

    #[test]
    fn elements_are_tagged_by_scalar() {
        let mut types = UniqueArena::new();
        let vec2 = types.vector(VectorSize::Bi, Scalar::U32);
        let constant = Constant::splat(vec2, Element::Int(5), &mut types).unwrap();
        assert_eq!(constant.elements(&types), Some(Elements::Int(vec![5, 5])));
        assert_eq!(
            constant.elements(&types).unwrap().convert(Scalar::F32),
            Elements::Float(vec![5.0, 5.0])
        );
    }

    #[test]
    fn conversion_keeps_matrix_shape() {
        let mut types = UniqueArena::new();
        let mat2x3 = types.matrix(VectorSize::Bi, VectorSize::Tri, Scalar::ABSTRACT_FLOAT);
        let mat3x2 = types.matrix(VectorSize::Tri, VectorSize::Bi, Scalar::F32);
        let mat2x3_f32 = types.matrix(VectorSize::Bi, VectorSize::Tri, Scalar::F32);
        let leaves = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0].map(Element::Float);
        let constant = Constant::from_leaves(mat2x3, &mut leaves.into_iter(), &mut types).unwrap();

        assert_eq!(constant.convert(mat3x2, &mut types), None);
        let converted = constant.convert(mat2x3_f32, &mut types).unwrap();
        assert_eq!(converted.ty(), mat2x3_f32);
        assert_eq!(converted.leaves(), leaves);
        let column_ty = types.vector(VectorSize::Tri, Scalar::F32);
        assert_eq!(converted.index(1).unwrap().ty(), column_ty);
    }

    #[test]
    fn large_zero_values_are_not_folded() {
        let mut types = UniqueArena::new();
        let f32 = types.scalar(Scalar::F32);
        let i32 = types.scalar(Scalar::I32);
        let vec2 = types.vector(VectorSize::Bi, Scalar::F32);

        let big = array(f32, 1 << 20, &mut types);
        let s = types.insert(
            Type {
                name: Some("Big".to_string()),
                inner: TypeInner::Struct {
                    members: vec![
                        StructMember {
                            name: "a".to_string(),
                            ty: i32,
                        },
                        StructMember {
                            name: "b".to_string(),
                            ty: big,
                        },
                    ],
                },
            },
            Default::default(),
        );
        assert_eq!(Constant::zero(s, &mut types), None);

        let row = array(i32, 1024, &mut types);
        let grid = array(row, 1024, &mut types);
        assert_eq!(leaf_count(grid, &types), 1 << 20);
        assert_eq!(Constant::zero(grid, &mut types), None);
        assert!(Constant::zero(row, &mut types).unwrap().all_zero());

        let pairs = array(vec2, 3, &mut types);
        let zero = Constant::zero(pairs, &mut types).unwrap();
        assert_eq!(zero.leaves(), [Element::Float(0.0); 6]);
    }
}
