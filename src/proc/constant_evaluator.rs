use crate::{
    ast::{BinaryOperator, Literal, Number, UnaryOperator},
    proc::constant::{Constant, Element, Unrepresentable},
    Diagnostics, Handle, Scalar, ScalarKind, Span, Type, TypeInner, UniqueArena,
};

/// Folds expressions whose operands are all constants.
///
/// Operands arrive already typed and validated by the resolver: shapes
/// match, and abstract operands of a binary operator have been
/// materialized to the other side's type. The evaluator only computes.
#[derive(Debug)]
pub struct ConstantEvaluator<'a> {
    types: &'a mut UniqueArena<Type>,
    diagnostics: &'a mut Diagnostics,
}

#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum ConstantEvaluatorError {
    #[error("'{lhs} {op} {rhs}' cannot be represented as '{ty}'")]
    Overflow {
        lhs: String,
        op: &'static str,
        rhs: String,
        ty: &'static str,
    },
    #[error("'-({value})' cannot be represented as '{ty}'")]
    NegationOverflow { value: String, ty: &'static str },
    #[error("integer division by zero is invalid")]
    DivisionByZero,
    #[error("cannot shift {direction} by a negative value")]
    NegativeShift { direction: &'static str },
    #[error(
        "shift {direction} value must be less than the bit width of the lhs, which is {width}"
    )]
    ShiftTooLarge { direction: &'static str, width: u32 },
    #[error(transparent)]
    Unrepresentable(#[from] Unrepresentable),
}

/// Warning emitted when a constant index is clamped into range.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[error("index {index} out of bounds [0..{max}]. Clamping index to {clamped}")]
pub struct IndexClamped {
    pub index: i64,
    pub max: usize,
    pub clamped: usize,
}

/// Clamps `index` into `[0, count - 1]`, reporting whether it had to.
pub fn clamp_index(index: i64, count: usize) -> (usize, Option<IndexClamped>) {
    let max = count.saturating_sub(1);
    if index < 0 {
        (
            0,
            Some(IndexClamped {
                index,
                max,
                clamped: 0,
            }),
        )
    } else if index as u64 > max as u64 {
        (
            max,
            Some(IndexClamped {
                index,
                max,
                clamped: max,
            }),
        )
    } else {
        (index as usize, None)
    }
}

impl UnaryOperator {
    pub const fn to_wgsl(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::LogicalNot => "!",
            Self::BitwiseNot => "~",
        }
    }
}

impl BinaryOperator {
    pub const fn to_wgsl(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::And => "&",
            Self::ExclusiveOr => "^",
            Self::InclusiveOr => "|",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
        }
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::Less
                | Self::LessEqual
                | Self::Greater
                | Self::GreaterEqual
        )
    }
}

impl<'a> ConstantEvaluator<'a> {
    pub fn new(types: &'a mut UniqueArena<Type>, diagnostics: &'a mut Diagnostics) -> Self {
        ConstantEvaluator { types, diagnostics }
    }

    /// The constant of a literal, of the literal's natural type.
    pub fn literal(&mut self, literal: Literal) -> Constant {
        let (scalar, element) = match literal {
            Literal::Bool(value) => (Scalar::BOOL, Element::Int(value as i64)),
            Literal::Number(Number::AbstractInt(v)) => (Scalar::ABSTRACT_INT, Element::Int(v)),
            Literal::Number(Number::AbstractFloat(v)) => {
                (Scalar::ABSTRACT_FLOAT, Element::Float(v))
            }
            Literal::Number(Number::I32(v)) => (Scalar::I32, Element::Int(v as i64)),
            Literal::Number(Number::U32(v)) => (Scalar::U32, Element::Int(v as i64)),
            Literal::Number(Number::F32(v)) => (Scalar::F32, Element::Float(v as f64)),
            Literal::Number(Number::F16(v)) => (Scalar::F16, Element::Float(v.to_f64())),
        };
        let ty = self.types.scalar(scalar);
        Constant::scalar(ty, element)
    }

    /// Evaluates a constructor or conversion call of type `ty`.
    ///
    /// Handles the zero-value, splat, identity, conversion, full and mixed
    /// (scalars and vectors flattened left to right) forms. Returns `None`
    /// if the arguments do not fit `ty`.
    pub fn construct(
        &mut self,
        ty: Handle<Type>,
        args: &[Constant],
    ) -> Result<Option<Constant>, ConstantEvaluatorError> {
        log::trace!("constructing {} from {} argument(s)", self.types.name(ty), args.len());
        if args.is_empty() {
            return Ok(Constant::zero(ty, self.types));
        }

        match self.types[ty].inner {
            TypeInner::Scalar(_) => match *args {
                [ref arg] => self.convert(ty, arg),
                _ => Ok(None),
            },
            TypeInner::Vector { .. } | TypeInner::Matrix { .. } => {
                let (target, count) = match self.types[ty].inner.element_of() {
                    Some(element) => element,
                    None => return Ok(None),
                };
                if let [ref arg] = *args {
                    let (same_shape, from) = {
                        let arg_inner = &self.types[arg.ty()].inner;
                        let same_shape = match (arg_inner, &self.types[ty].inner) {
                            (
                                &TypeInner::Vector { size: a, .. },
                                &TypeInner::Vector { size: b, .. },
                            ) => a == b,
                            (
                                &TypeInner::Matrix {
                                    columns: ac,
                                    rows: ar,
                                    ..
                                },
                                &TypeInner::Matrix {
                                    columns: bc, rows: br, ..
                                },
                            ) => ac == bc && ar == br,
                            _ => false,
                        };
                        (same_shape, arg_inner.scalar())
                    };
                    if same_shape {
                        return self.convert(ty, arg);
                    }
                    if let (Some(leaf), Some(from)) = (arg.element(), from) {
                        let leaf = convert_leaf(leaf, from, target)?;
                        return Ok(Constant::splat(ty, leaf, self.types));
                    }
                }

                let mut leaves = Vec::with_capacity(count as usize);
                for arg in args {
                    let from = match self.types[arg.ty()].inner.scalar() {
                        Some(from) => from,
                        None => return Ok(None),
                    };
                    for leaf in arg.leaves() {
                        leaves.push(convert_leaf(leaf, from, target)?);
                    }
                }
                if leaves.len() != count as usize {
                    log::debug!(
                        "constructor of {} got {} leaves, expected {}",
                        self.types.name(ty),
                        leaves.len(),
                        count
                    );
                    return Ok(None);
                }
                Ok(Constant::from_leaves(ty, &mut leaves.into_iter(), self.types))
            }
            TypeInner::Array { base, .. } => {
                if let Some(count) = self.types[ty].inner.component_count() {
                    if count as usize != args.len() {
                        return Ok(None);
                    }
                }
                let mut components = Vec::with_capacity(args.len());
                for arg in args {
                    match self.convert(base, arg)? {
                        Some(component) => components.push(component),
                        None => return Ok(None),
                    }
                }
                Ok(Some(Constant::composite(ty, components)))
            }
            TypeInner::Struct { ref members } => {
                if members.len() != args.len() {
                    return Ok(None);
                }
                let member_types = members.iter().map(|m| m.ty).collect::<Vec<_>>();
                let mut components = Vec::with_capacity(args.len());
                for (arg, member_ty) in args.iter().zip(member_types) {
                    match self.convert(member_ty, arg)? {
                        Some(component) => components.push(component),
                        None => return Ok(None),
                    }
                }
                Ok(Some(Constant::composite(ty, components)))
            }
            _ => Ok(None),
        }
    }

    /// Converts `value` to `ty`, which must have the same shape.
    ///
    /// Abstract leaves are materialized when `ty`'s scalar is one they
    /// automatically convert to; anything else is an explicit conversion.
    pub fn convert(
        &mut self,
        ty: Handle<Type>,
        value: &Constant,
    ) -> Result<Option<Constant>, ConstantEvaluatorError> {
        if value.ty() == ty {
            return Ok(Some(value.clone()));
        }
        let from = self.types[value.ty()].inner.leaf_scalar(self.types);
        let to = self.types[ty].inner.leaf_scalar(self.types);
        match (from, to) {
            (Some(from), Some(to)) if from.is_abstract() && from.automatically_converts_to(to) => {
                Ok(Some(value.materialize(ty, self.types)?))
            }
            _ => Ok(value.convert(ty, self.types)),
        }
    }

    /// Indexes a vector, matrix or array constant, clamping an out of
    /// bounds index and warning about it.
    pub fn index(&mut self, base: &Constant, index: i64, span: Span) -> Option<Constant> {
        let count = base.components().len();
        if count == 0 {
            return None;
        }
        let (index, clamped) = clamp_index(index, count);
        if let Some(warning) = clamped {
            self.diagnostics.add_warning(warning, span);
        }
        base.index(index).cloned()
    }

    /// Gathers the components of a vector constant named by `pattern`.
    ///
    /// A single component yields a scalar, several a vector of type `ty`.
    pub fn swizzle(
        &mut self,
        base: &Constant,
        pattern: &[u8],
        ty: Handle<Type>,
    ) -> Option<Constant> {
        match *pattern {
            [component] => base.index(component as usize).cloned(),
            _ => {
                let components = pattern
                    .iter()
                    .map(|&component| base.index(component as usize).cloned())
                    .collect::<Option<Vec<_>>>()?;
                Some(Constant::composite(ty, components))
            }
        }
    }

    /// The `index`-th member of a struct constant.
    pub fn member(&mut self, base: &Constant, index: usize) -> Option<Constant> {
        base.index(index).cloned()
    }

    pub fn unary(
        &mut self,
        op: UnaryOperator,
        arg: &Constant,
    ) -> Result<Constant, ConstantEvaluatorError> {
        log::trace!("folding unary {:?} on {}", op, self.types.name(arg.ty()));
        let scalar = match self.types[arg.ty()].inner.leaf_scalar(self.types) {
            Some(scalar) => scalar,
            None => return Ok(arg.clone()),
        };
        map_leaves(arg, &mut |leaf| unary_op(op, leaf, scalar))
    }

    /// Folds a binary operator whose result has type `ty`.
    pub fn binary(
        &mut self,
        op: BinaryOperator,
        lhs: &Constant,
        rhs: &Constant,
        ty: Handle<Type>,
    ) -> Result<Option<Constant>, ConstantEvaluatorError> {
        log::trace!(
            "folding {} {} {}",
            self.types.name(lhs.ty()),
            op.to_wgsl(),
            self.types.name(rhs.ty())
        );
        let scalar = match self.types[lhs.ty()].inner.scalar() {
            Some(scalar) => scalar,
            None => return Ok(None),
        };

        if op == BinaryOperator::Multiply {
            if let Some(product) = self.linear_algebra_product(lhs, rhs, ty, scalar)? {
                return Ok(Some(product));
            }
        }

        let left = lhs.leaves();
        let right = rhs.leaves();
        let count = left.len().max(right.len());
        let broadcast = |leaves: &[Element], i: usize| match *leaves {
            [single] => Some(single),
            _ => leaves.get(i).copied(),
        };
        let mut leaves = Vec::with_capacity(count);
        for i in 0..count {
            let (a, b) = match (broadcast(&left, i), broadcast(&right, i)) {
                (Some(a), Some(b)) => (a, b),
                _ => return Ok(None),
            };
            leaves.push(binary_op(op, a, b, scalar)?);
        }
        Ok(Constant::from_leaves(ty, &mut leaves.into_iter(), self.types))
    }

    /// `mat * vec`, `vec * mat` and `mat * mat`.
    fn linear_algebra_product(
        &mut self,
        lhs: &Constant,
        rhs: &Constant,
        ty: Handle<Type>,
        scalar: Scalar,
    ) -> Result<Option<Constant>, ConstantEvaluatorError> {
        let column = |c: &Constant, i: usize| -> Vec<Element> {
            c.index(i).map(Constant::leaves).unwrap_or_default()
        };
        let dot = |a: &[Element], b: &[Element]| -> Result<Element, ConstantEvaluatorError> {
            let mut sum = Element::Int(0).convert(scalar);
            for (&x, &y) in a.iter().zip(b) {
                let product = binary_op(BinaryOperator::Multiply, x, y, scalar)?;
                sum = binary_op(BinaryOperator::Add, sum, product, scalar)?;
            }
            Ok(sum)
        };

        let leaves = match (&self.types[lhs.ty()].inner, &self.types[rhs.ty()].inner) {
            (&TypeInner::Matrix { columns, rows, .. }, &TypeInner::Vector { .. }) => {
                let v = rhs.leaves();
                let mut out = Vec::with_capacity(rows as usize);
                for r in 0..rows as usize {
                    let row = (0..columns as usize)
                        .map(|c| column(lhs, c)[r])
                        .collect::<Vec<_>>();
                    out.push(dot(&row, &v)?);
                }
                out
            }
            (&TypeInner::Vector { .. }, &TypeInner::Matrix { columns, .. }) => {
                let v = lhs.leaves();
                let mut out = Vec::with_capacity(columns as usize);
                for c in 0..columns as usize {
                    out.push(dot(&v, &column(rhs, c))?);
                }
                out
            }
            (
                &TypeInner::Matrix {
                    columns: k, rows, ..
                },
                &TypeInner::Matrix { columns, .. },
            ) => {
                let mut out = Vec::with_capacity(columns as usize * rows as usize);
                for c in 0..columns as usize {
                    let b = column(rhs, c);
                    for r in 0..rows as usize {
                        let row = (0..k as usize)
                            .map(|i| column(lhs, i)[r])
                            .collect::<Vec<_>>();
                        out.push(dot(&row, &b)?);
                    }
                }
                out
            }
            _ => return Ok(None),
        };
        Ok(Constant::from_leaves(ty, &mut leaves.into_iter(), self.types))
    }
}

/// Rebuilds `value` with every leaf replaced by `f(leaf)`, keeping types.
fn map_leaves(
    value: &Constant,
    f: &mut impl FnMut(Element) -> Result<Element, ConstantEvaluatorError>,
) -> Result<Constant, ConstantEvaluatorError> {
    match value.element() {
        Some(leaf) => Ok(Constant::scalar(value.ty(), f(leaf)?)),
        None => {
            let components = value
                .components()
                .iter()
                .map(|component| map_leaves(component, &mut *f))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Constant::composite(value.ty(), components))
        }
    }
}

/// Converts a constructor argument's leaf to the constructed scalar.
fn convert_leaf(leaf: Element, from: Scalar, to: Scalar) -> Result<Element, Unrepresentable> {
    if from.is_abstract() && from.automatically_converts_to(to) {
        leaf.materialize(from, to)
    } else {
        Ok(leaf.convert(to))
    }
}

fn unary_op(
    op: UnaryOperator,
    leaf: Element,
    scalar: Scalar,
) -> Result<Element, ConstantEvaluatorError> {
    Ok(match (op, leaf) {
        (UnaryOperator::Negate, Element::Int(v)) => match scalar.kind {
            ScalarKind::AbstractInt => match v.checked_neg() {
                Some(v) => Element::Int(v),
                None => {
                    return Err(ConstantEvaluatorError::NegationOverflow {
                        value: v.to_string(),
                        ty: scalar.to_wgsl(),
                    })
                }
            },
            ScalarKind::Uint => Element::Int((v as u32).wrapping_neg() as i64),
            _ => {
                if v == i32::MIN as i64 {
                    log::warn!("negation of {v} wraps in '{}'", scalar.to_wgsl());
                }
                Element::Int((v as i32).wrapping_neg() as i64)
            }
        },
        (UnaryOperator::Negate, Element::Float(v)) => Element::Float(-v),
        (UnaryOperator::LogicalNot, leaf) => Element::Int(leaf.is_zero() as i64),
        (UnaryOperator::BitwiseNot, Element::Int(v)) => Element::Int(match scalar.kind {
            ScalarKind::Sint => !(v as i32) as i64,
            ScalarKind::Uint => !(v as u32) as i64,
            _ => !v,
        }),
        (UnaryOperator::BitwiseNot, Element::Float(_)) => leaf,
    })
}

fn binary_op(
    op: BinaryOperator,
    a: Element,
    b: Element,
    scalar: Scalar,
) -> Result<Element, ConstantEvaluatorError> {
    use BinaryOperator as Bo;

    if op.is_comparison() {
        let result = match (a, b) {
            (Element::Int(a), Element::Int(b)) => compare(op, a, b),
            _ => compare(op, a.as_f64(), b.as_f64()),
        };
        return Ok(Element::Int(result as i64));
    }
    if let Bo::LogicalAnd | Bo::LogicalOr = op {
        let result = match op {
            Bo::LogicalAnd => !a.is_zero() && !b.is_zero(),
            _ => !a.is_zero() || !b.is_zero(),
        };
        return Ok(Element::Int(result as i64));
    }

    let overflow = || ConstantEvaluatorError::Overflow {
        lhs: a.to_string(),
        op: op.to_wgsl(),
        rhs: b.to_string(),
        ty: scalar.to_wgsl(),
    };

    match scalar.kind {
        ScalarKind::AbstractInt => {
            let (a, b) = (int(a), int(b));
            let result = match op {
                Bo::Add => a.checked_add(b),
                Bo::Subtract => a.checked_sub(b),
                Bo::Multiply => a.checked_mul(b),
                Bo::Divide | Bo::Modulo if b == 0 => {
                    return Err(ConstantEvaluatorError::DivisionByZero)
                }
                Bo::Divide => a.checked_div(b),
                Bo::Modulo => a.checked_rem(b),
                Bo::And => Some(a & b),
                Bo::InclusiveOr => Some(a | b),
                Bo::ExclusiveOr => Some(a ^ b),
                Bo::ShiftLeft | Bo::ShiftRight if b < 0 => {
                    return Err(ConstantEvaluatorError::NegativeShift {
                        direction: shift_direction(op),
                    })
                }
                Bo::ShiftLeft => u32::try_from(b)
                    .ok()
                    .and_then(|b| a.checked_shl(b))
                    .filter(|&shifted| shifted >> b == a),
                Bo::ShiftRight => Some(a >> b.min(63)),
                _ => Some(a),
            };
            result.map(Element::Int).ok_or_else(overflow)
        }
        ScalarKind::Sint | ScalarKind::Uint => {
            let width = 32;
            if let Bo::ShiftLeft | Bo::ShiftRight = op {
                if int(b) >= width as i64 {
                    return Err(ConstantEvaluatorError::ShiftTooLarge {
                        direction: shift_direction(op),
                        width,
                    });
                }
            }
            if let Bo::Divide | Bo::Modulo = op {
                if int(b) == 0 {
                    return Err(ConstantEvaluatorError::DivisionByZero);
                }
            }
            if scalar.kind == ScalarKind::Sint {
                let (a, b) = (int(a) as i32, int(b) as i32);
                let (result, wrapped) = match op {
                    Bo::Add => a.overflowing_add(b),
                    Bo::Subtract => a.overflowing_sub(b),
                    Bo::Multiply => a.overflowing_mul(b),
                    Bo::Divide => a.overflowing_div(b),
                    Bo::Modulo => a.overflowing_rem(b),
                    Bo::And => (a & b, false),
                    Bo::InclusiveOr => (a | b, false),
                    Bo::ExclusiveOr => (a ^ b, false),
                    Bo::ShiftLeft => (a.wrapping_shl(b as u32), false),
                    Bo::ShiftRight => (a.wrapping_shr(b as u32), false),
                    _ => (a, false),
                };
                if wrapped {
                    log::warn!("{}", overflow());
                }
                Ok(Element::Int(result as i64))
            } else {
                let (a, b) = (int(a) as u32, int(b) as u32);
                let (result, wrapped) = match op {
                    Bo::Add => a.overflowing_add(b),
                    Bo::Subtract => a.overflowing_sub(b),
                    Bo::Multiply => a.overflowing_mul(b),
                    Bo::Divide => a.overflowing_div(b),
                    Bo::Modulo => a.overflowing_rem(b),
                    Bo::And => (a & b, false),
                    Bo::InclusiveOr => (a | b, false),
                    Bo::ExclusiveOr => (a ^ b, false),
                    Bo::ShiftLeft => (a.wrapping_shl(b), false),
                    Bo::ShiftRight => (a.wrapping_shr(b), false),
                    _ => (a, false),
                };
                if wrapped {
                    log::warn!("{}", overflow());
                }
                Ok(Element::Int(result as i64))
            }
        }
        ScalarKind::Float | ScalarKind::AbstractFloat => {
            let (x, y) = (a.as_f64(), b.as_f64());
            let result = match op {
                Bo::Add => x + y,
                Bo::Subtract => x - y,
                Bo::Multiply => x * y,
                Bo::Divide => x / y,
                Bo::Modulo => x % y,
                _ => x,
            };
            let overflowed = x.is_finite() && y.is_finite() && !result.is_finite();
            if scalar.kind == ScalarKind::AbstractFloat {
                if overflowed {
                    return Err(overflow());
                }
                return Ok(Element::Float(result));
            }
            let quantized = Element::Float(result).convert(scalar);
            if overflowed || (result.is_finite() && !quantized.as_f64().is_finite()) {
                log::warn!("{}", overflow());
            }
            Ok(quantized)
        }
        ScalarKind::Bool => {
            let (a, b) = (!a.is_zero(), !b.is_zero());
            let result = match op {
                Bo::And => a & b,
                Bo::InclusiveOr => a | b,
                Bo::ExclusiveOr => a ^ b,
                _ => a,
            };
            Ok(Element::Int(result as i64))
        }
    }
}

fn int(e: Element) -> i64 {
    match e {
        Element::Int(v) => v,
        Element::Float(v) => v as i64,
    }
}

fn shift_direction(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::ShiftLeft => "left",
        _ => "right",
    }
}

fn compare<T: PartialOrd>(op: BinaryOperator, a: T, b: T) -> bool {
    match op {
        BinaryOperator::Equal => a == b,
        BinaryOperator::NotEqual => a != b,
        BinaryOperator::Less => a < b,
        BinaryOperator::LessEqual => a <= b,
        BinaryOperator::Greater => a > b,
        BinaryOperator::GreaterEqual => a >= b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VectorSize;

    fn vec3_i32(types: &mut UniqueArena<Type>, values: [i64; 3]) -> Constant {
        let ty = types.vector(VectorSize::Tri, Scalar::I32);
        Constant::from_leaves(ty, &mut values.map(Element::Int).into_iter(), types).unwrap()
    }

    #[test]
    fn splat_matches_full_construction() {
        let mut types = UniqueArena::new();
        let mut diagnostics = Diagnostics::new();
        let mut eval = ConstantEvaluator::new(&mut types, &mut diagnostics);
        for size in [VectorSize::Bi, VectorSize::Tri, VectorSize::Quad] {
            let ty = eval.types.vector(size, Scalar::F32);
            let x = eval.literal(Literal::Number(Number::AbstractFloat(2.5)));
            let splat = eval.construct(ty, &[x.clone()]).unwrap();
            let full = eval.construct(ty, &vec![x; size as usize]).unwrap();
            assert_eq!(splat, full);
            assert!(splat.unwrap().all_equal());
        }
    }

    #[test]
    fn mixed_construction_flattens() {
        let mut types = UniqueArena::new();
        let mut diagnostics = Diagnostics::new();
        let mut eval = ConstantEvaluator::new(&mut types, &mut diagnostics);
        let vec3 = eval.types.vector(VectorSize::Tri, Scalar::F32);
        let vec2 = eval.types.vector(VectorSize::Bi, Scalar::F32);
        let one = eval.literal(Literal::Number(Number::AbstractInt(1)));
        let two = eval.literal(Literal::Number(Number::F32(2.0)));
        let three = eval.literal(Literal::Number(Number::F32(3.0)));
        let tail = eval
            .construct(vec2, &[two, three])
            .unwrap()
            .unwrap();
        let value = eval
            .construct(vec3, &[one, tail])
            .unwrap()
            .unwrap();
        let leaves = value.leaves();
        assert_eq!(
            leaves,
            vec![Element::Float(1.0), Element::Float(2.0), Element::Float(3.0)]
        );
        assert_eq!(value.index(0).unwrap().ty(), eval.types.scalar(Scalar::F32));
    }

    #[test]
    fn index_clamps_with_warning() {
        let mut types = UniqueArena::new();
        let mut diagnostics = Diagnostics::new();
        let v = vec3_i32(&mut types, [1, 2, 3]);
        {
            let mut eval = ConstantEvaluator::new(&mut types, &mut diagnostics);
            assert_eq!(eval.index(&v, 3, Span::default()).unwrap().as_i64(), Some(3));
            assert_eq!(eval.index(&v, -3, Span::default()).unwrap().as_i64(), Some(1));
            assert_eq!(eval.index(&v, 1, Span::default()).unwrap().as_i64(), Some(2));
        }
        assert_eq!(
            diagnostics.str(),
            "warning: index 3 out of bounds [0..2]. Clamping index to 2\n\
             warning: index -3 out of bounds [0..2]. Clamping index to 0\n"
        );
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn swizzle_chain_reindexes() {
        let mut types = UniqueArena::new();
        let mut diagnostics = Diagnostics::new();
        let v = vec3_i32(&mut types, [1, 2, 3]);
        let vec3 = types.vector(VectorSize::Tri, Scalar::I32);
        let vec2 = types.vector(VectorSize::Bi, Scalar::I32);
        let mut eval = ConstantEvaluator::new(&mut types, &mut diagnostics);
        let gbr = eval.swizzle(&v, &[1, 2, 0], vec3).unwrap();
        let yx = eval.swizzle(&gbr, &[1, 0], vec2).unwrap();
        let y = eval.swizzle(&yx, &[1], vec2).unwrap();
        assert_eq!(y.as_i64(), Some(2));
    }

    #[test]
    fn abstract_int_overflow_is_an_error() {
        let mut types = UniqueArena::new();
        let mut diagnostics = Diagnostics::new();
        let mut eval = ConstantEvaluator::new(&mut types, &mut diagnostics);
        let max = eval.literal(Literal::Number(Number::AbstractInt(i64::MAX)));
        let one = eval.literal(Literal::Number(Number::AbstractInt(1)));
        let ty = max.ty();
        let err = eval
            .binary(BinaryOperator::Add, &max, &one, ty)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'9223372036854775807 + 1' cannot be represented as 'abstract-int'"
        );

        let min = eval.literal(Literal::Number(Number::AbstractInt(i64::MIN)));
        let minus_one = eval.literal(Literal::Number(Number::AbstractInt(-1)));
        let err = eval
            .binary(BinaryOperator::Add, &min, &minus_one, ty)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'-9223372036854775808 + -1' cannot be represented as 'abstract-int'"
        );
    }

    #[test]
    fn abstract_float_overflow_is_an_error() {
        let mut types = UniqueArena::new();
        let mut diagnostics = Diagnostics::new();
        let mut eval = ConstantEvaluator::new(&mut types, &mut diagnostics);
        let max = eval.literal(Literal::Number(Number::AbstractFloat(f64::MAX)));
        let ty = max.ty();
        let err = eval
            .binary(BinaryOperator::Add, &max, &max, ty)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'1.79769e+308 + 1.79769e+308' cannot be represented as 'abstract-float'"
        );
    }

    #[test]
    fn concrete_overflow_wraps() {
        let mut types = UniqueArena::new();
        let mut diagnostics = Diagnostics::new();
        let mut eval = ConstantEvaluator::new(&mut types, &mut diagnostics);
        let max = eval.literal(Literal::Number(Number::I32(i32::MAX)));
        let one = eval.literal(Literal::Number(Number::I32(1)));
        let ty = max.ty();
        let sum = eval
            .binary(BinaryOperator::Add, &max, &one, ty)
            .unwrap()
            .unwrap();
        assert_eq!(sum.as_i64(), Some(i32::MIN as i64));

        let big = eval.literal(Literal::Number(Number::F32(f32::MAX)));
        let f32_ty = big.ty();
        let sum = eval
            .binary(BinaryOperator::Add, &big, &big, f32_ty)
            .unwrap()
            .unwrap();
        assert_eq!(sum.as_f64(), Some(f64::INFINITY));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn division_and_shift_errors() {
        let mut types = UniqueArena::new();
        let mut diagnostics = Diagnostics::new();
        let mut eval = ConstantEvaluator::new(&mut types, &mut diagnostics);
        let one = eval.literal(Literal::Number(Number::I32(1)));
        let zero = eval.literal(Literal::Number(Number::I32(0)));
        let ty = one.ty();
        assert_eq!(
            eval.binary(BinaryOperator::Divide, &one, &zero, ty),
            Err(ConstantEvaluatorError::DivisionByZero)
        );

        let thirty_two = eval.literal(Literal::Number(Number::U32(32)));
        let err = eval
            .binary(BinaryOperator::ShiftLeft, &one, &thirty_two, ty)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "shift left value must be less than the bit width of the lhs, which is 32"
        );

        let a = eval.literal(Literal::Number(Number::AbstractInt(1)));
        let negative = eval.literal(Literal::Number(Number::AbstractInt(-1)));
        let abstract_ty = a.ty();
        let err = eval
            .binary(BinaryOperator::ShiftLeft, &a, &negative, abstract_ty)
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot shift left by a negative value");
    }

    #[test]
    fn matrix_vector_product() {
        let mut types = UniqueArena::new();
        let mut diagnostics = Diagnostics::new();
        let mat = types.matrix(VectorSize::Bi, VectorSize::Bi, Scalar::F32);
        let vec2 = types.vector(VectorSize::Bi, Scalar::F32);
        // columns (1, 2) and (3, 4)
        let m = Constant::from_leaves(
            mat,
            &mut [1.0, 2.0, 3.0, 4.0].map(Element::Float).into_iter(),
            &mut types,
        )
        .unwrap();
        let v = Constant::from_leaves(
            vec2,
            &mut [1.0, 1.0].map(Element::Float).into_iter(),
            &mut types,
        )
        .unwrap();
        let mut eval = ConstantEvaluator::new(&mut types, &mut diagnostics);
        let mv = eval
            .binary(BinaryOperator::Multiply, &m, &v, vec2)
            .unwrap()
            .unwrap();
        assert_eq!(mv.leaves(), vec![Element::Float(4.0), Element::Float(6.0)]);
        let vm = eval
            .binary(BinaryOperator::Multiply, &v, &m, vec2)
            .unwrap()
            .unwrap();
        assert_eq!(vm.leaves(), vec![Element::Float(3.0), Element::Float(7.0)]);
    }

    #[test]
    fn unary_operators() {
        let mut types = UniqueArena::new();
        let mut diagnostics = Diagnostics::new();
        let v = vec3_i32(&mut types, [1, -2, 0]);
        let mut eval = ConstantEvaluator::new(&mut types, &mut diagnostics);
        let negated = eval.unary(UnaryOperator::Negate, &v).unwrap();
        assert_eq!(
            negated.leaves(),
            vec![Element::Int(-1), Element::Int(2), Element::Int(0)]
        );
        let complement = eval.unary(UnaryOperator::BitwiseNot, &v).unwrap();
        assert_eq!(
            complement.leaves(),
            vec![Element::Int(-2), Element::Int(1), Element::Int(-1)]
        );
        let min = eval.literal(Literal::Number(Number::AbstractInt(i64::MIN)));
        assert_eq!(
            eval.unary(UnaryOperator::Negate, &min).unwrap_err().to_string(),
            "'-(-9223372036854775808)' cannot be represented as 'abstract-int'"
        );
    }
}
