use crate::{ast, ArraySize, Handle, Scalar, ScalarKind, Type, TypeInner, VectorSize};

use super::{Error, Resolved, Resolver};

/// The type a construction expression builds, before arguments are
/// considered.
///
/// Partial forms leave out the component type, and for arrays the length;
/// both are inferred from the arguments.
#[derive(Debug)]
pub(super) enum Constructor {
    PartialVector { size: VectorSize },
    PartialMatrix { columns: VectorSize, rows: VectorSize },
    PartialArray,
    Type(Handle<Type>),
}

impl Resolver {
    pub(super) fn constructor(
        &mut self,
        module: &ast::Module,
        ty: &ast::ConstructorType,
    ) -> Result<Constructor, Error> {
        Ok(match *ty {
            ast::ConstructorType::Scalar(scalar) => Constructor::Type(self.types.scalar(scalar)),
            ast::ConstructorType::PartialVector { size } => Constructor::PartialVector { size },
            ast::ConstructorType::Vector { size, ty } => {
                let element = self.resolve_type(module, ty)?;
                match self.types[element].inner {
                    TypeInner::Scalar(scalar) => Constructor::Type(self.types.vector(size, scalar)),
                    _ => return Err(Error::BadVectorElement(self.type_name(element))),
                }
            }
            ast::ConstructorType::PartialMatrix { columns, rows } => {
                Constructor::PartialMatrix { columns, rows }
            }
            ast::ConstructorType::Matrix { columns, rows, ty } => {
                let element = self.resolve_type(module, ty)?;
                match self.types[element].inner {
                    TypeInner::Scalar(scalar) if scalar.kind == ScalarKind::Float => {
                        Constructor::Type(self.types.matrix(columns, rows, scalar))
                    }
                    _ => return Err(Error::BadMatrixElement(self.type_name(element))),
                }
            }
            ast::ConstructorType::PartialArray => Constructor::PartialArray,
            ast::ConstructorType::Array { base, size } => {
                let base = self.resolve_type(module, base)?;
                let size = self.array_size(module, size)?;
                Constructor::Type(self.types.insert_inner(TypeInner::Array { base, size }))
            }
            ast::ConstructorType::Type(ty) => Constructor::Type(self.resolve_type(module, ty)?),
        })
    }

    /// Types a construction and, when every argument is constant, folds it.
    pub(super) fn construct(
        &mut self,
        module: &ast::Module,
        constructor: Constructor,
        components: &[Handle<ast::Expression>],
    ) -> Result<Resolved, Error> {
        let args = self.resolve_all(module, components)?;
        let arg_types = args
            .iter()
            .map(|arg| self.types.unwrap_ref(arg.ty))
            .collect::<Vec<_>>();

        let ty = match constructor {
            Constructor::Type(ty) => {
                if !self.types[ty].inner.is_constructible(&self.types) {
                    return Err(Error::NotConstructible(self.type_name(ty)));
                }
                Some(ty).filter(|&ty| self.accepts(ty, &arg_types))
            }
            _ if arg_types.is_empty() => return Err(Error::TypeNotInferable),
            Constructor::PartialVector { size } => self.infer_vector(size, &arg_types),
            Constructor::PartialMatrix { columns, rows } => {
                self.infer_matrix(columns, rows, &arg_types)
            }
            Constructor::PartialArray => self.infer_array(&arg_types),
        };
        let ty = match ty {
            Some(ty) => ty,
            None => {
                return Err(Error::BadConstructor {
                    ty: self.describe(&constructor),
                    arguments: arg_types.iter().map(|&ty| self.type_name(ty)).collect(),
                })
            }
        };

        let constants = args
            .into_iter()
            .map(|arg| arg.constant)
            .collect::<Option<Vec<_>>>();
        let constant = match constants {
            Some(constants) => self.evaluator().construct(ty, &constants)?,
            None => None,
        };
        Ok(Resolved::value(ty, constant))
    }

    fn describe(&self, constructor: &Constructor) -> String {
        match *constructor {
            Constructor::PartialVector { size } => format!("vec{}", size as u8),
            Constructor::PartialMatrix { columns, rows } => {
                format!("mat{}x{}", columns as u8, rows as u8)
            }
            Constructor::PartialArray => "array".to_string(),
            Constructor::Type(ty) => self.type_name(ty),
        }
    }

    /// Whether `ty(args)` is a valid construction or conversion.
    fn accepts(&mut self, ty: Handle<Type>, args: &[Handle<Type>]) -> bool {
        if args.is_empty() {
            return true;
        }
        match self.types[ty].inner.clone() {
            TypeInner::Scalar(_) => {
                matches!(*args, [arg] if matches!(self.types[arg].inner, TypeInner::Scalar(_)))
            }
            TypeInner::Vector { size, scalar } => {
                if let [arg] = *args {
                    match self.types[arg].inner {
                        TypeInner::Vector { size: from, .. } if from == size => return true,
                        TypeInner::Scalar(from) => return from.automatically_converts_to(scalar),
                        _ => {}
                    }
                }
                self.leaf_count(args, scalar) == Some(size as u32)
            }
            TypeInner::Matrix {
                columns,
                rows,
                scalar,
            } => {
                if let [arg] = *args {
                    if let TypeInner::Matrix {
                        columns: c,
                        rows: r,
                        scalar: from,
                    } = self.types[arg].inner
                    {
                        return c == columns
                            && r == rows
                            && matches!(from.kind, ScalarKind::Float | ScalarKind::AbstractFloat);
                    }
                }
                let leaves = columns as usize * rows as usize;
                let all_scalars = args.len() == leaves
                    && args.iter().all(|&arg| match self.types[arg].inner {
                        TypeInner::Scalar(from) => from.automatically_converts_to(scalar),
                        _ => false,
                    });
                let all_columns = args.len() == columns as usize
                    && args.iter().all(|&arg| match self.types[arg].inner {
                        TypeInner::Vector { size, scalar: from } => {
                            size == rows && from.automatically_converts_to(scalar)
                        }
                        _ => false,
                    });
                all_scalars || all_columns
            }
            TypeInner::Array {
                base,
                size: ArraySize::Constant(count),
            } => {
                args.len() == count.get() as usize
                    && args.iter().all(|&arg| self.converts(arg, base))
            }
            TypeInner::Struct { members } => {
                args.len() == members.len()
                    && args
                        .iter()
                        .zip(members.iter())
                        .all(|(&arg, member)| self.converts(arg, member.ty))
            }
            _ => false,
        }
    }

    /// Total number of scalar components in `args`, if each is a scalar or
    /// vector whose scalar converts to `target`.
    fn leaf_count(&self, args: &[Handle<Type>], target: Scalar) -> Option<u32> {
        args.iter().try_fold(0, |count, &arg| match self.types[arg].inner {
            TypeInner::Scalar(from) if from.automatically_converts_to(target) => Some(count + 1),
            TypeInner::Vector { size, scalar } if scalar.automatically_converts_to(target) => {
                Some(count + size as u32)
            }
            _ => None,
        })
    }

    /// The scalar every argument's scalar converts to.
    fn common_scalar(&self, args: &[Handle<Type>]) -> Option<Scalar> {
        let mut scalars = args.iter().map(|&arg| match self.types[arg].inner {
            TypeInner::Scalar(scalar)
            | TypeInner::Vector { scalar, .. }
            | TypeInner::Matrix { scalar, .. } => Some(scalar),
            _ => None,
        });
        let first = scalars.next()??;
        scalars.try_fold(first, |common, scalar| {
            common.automatic_conversion_combine(scalar?)
        })
    }

    fn infer_vector(&mut self, size: VectorSize, args: &[Handle<Type>]) -> Option<Handle<Type>> {
        if let [arg] = *args {
            if let TypeInner::Vector { size: from, .. } = self.types[arg].inner {
                return Some(arg).filter(|_| from == size);
            }
        }
        let scalar = self.common_scalar(args)?;
        let ty = self.types.vector(size, scalar);
        Some(ty).filter(|&ty| self.accepts(ty, args))
    }

    fn infer_matrix(
        &mut self,
        columns: VectorSize,
        rows: VectorSize,
        args: &[Handle<Type>],
    ) -> Option<Handle<Type>> {
        if let [arg] = *args {
            if let TypeInner::Matrix {
                columns: c,
                rows: r,
                ..
            } = self.types[arg].inner
            {
                return Some(arg).filter(|_| c == columns && r == rows);
            }
        }
        let scalar = match self.common_scalar(args)? {
            Scalar::ABSTRACT_INT => Scalar::ABSTRACT_FLOAT,
            scalar if matches!(scalar.kind, ScalarKind::Float | ScalarKind::AbstractFloat) => {
                scalar
            }
            _ => return None,
        };
        let ty = self.types.matrix(columns, rows, scalar);
        Some(ty).filter(|&ty| self.accepts(ty, args))
    }

    /// Infers `array<T, N>` where `T` is the type every argument converts
    /// to and `N` the argument count.
    fn infer_array(&mut self, args: &[Handle<Type>]) -> Option<Handle<Type>> {
        let (&first, rest) = args.split_first()?;
        let mut base = first;
        for &arg in rest {
            if self.converts(arg, base) {
                continue;
            }
            if self.converts(base, arg) {
                base = arg;
                continue;
            }
            // Two abstract shapes may still meet in a third, wider type.
            let scalar = self.common_scalar(&[base, arg])?;
            let widened = self.types.with_leaf_scalar(base, scalar)?;
            if !(self.converts(base, widened) && self.converts(arg, widened)) {
                return None;
            }
            base = widened;
        }
        let size = ArraySize::Constant(std::num::NonZeroU32::new(args.len() as u32)?);
        Some(self.types.insert_inner(TypeInner::Array { base, size }))
    }
}
