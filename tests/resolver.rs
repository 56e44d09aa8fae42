/*!
Tests for declaration and expression resolution.
*/

use wgsl_sema::{
    ast::{self, BinaryOperator as Bo, Statement},
    builtin::BuiltinFunction,
    resolver::{Options, Resolver},
    AddressSpace, Handle, Scalar, VectorSize,
};

fn resolve(module: &ast::Module) -> (Resolver, bool) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut resolver = Resolver::new(Options::default());
    let ok = resolver.resolve(module);
    (resolver, ok)
}

fn type_name(resolver: &Resolver, expr: Handle<ast::Expression>) -> String {
    let ty = resolver
        .type_of(expr)
        .unwrap_or_else(|| panic!("{:?} has no type", expr));
    resolver.types().name(ty).to_string()
}

fn scalar_type(module: &mut ast::Module, scalar: Scalar) -> Handle<ast::Type> {
    module.append_type(ast::Type::Scalar(scalar))
}

#[test]
fn function_body() {
    let mut module = ast::Module::new();
    let f32_ty = scalar_type(&mut module, Scalar::F32);
    let a = module.ident("a");
    let two = module.abstract_float(2.0);
    let doubled = module.binary(Bo::Multiply, a, two);
    let b = module.ident("b");
    let cos = module.call("cos", vec![b]);
    module.add_function(
        "f",
        vec![("a", f32_ty)],
        Some(f32_ty),
        vec![
            Statement::let_("b", None, doubled),
            Statement::return_(Some(cos)),
        ],
    );

    let (resolver, ok) = resolve(&module);
    assert!(ok, "{}", resolver.diagnostics().str());
    assert_eq!(type_name(&resolver, doubled), "f32");
    assert_eq!(type_name(&resolver, cos), "f32");
    let builtin = resolver.builtin(cos).unwrap();
    assert_eq!(builtin.function, BuiltinFunction::Cos);
    assert!(resolver.builtin(doubled).is_none());
}

#[test]
fn name_errors() {
    let mut module = ast::Module::new();
    let nope = module.ident("nope");
    module.add_const("a", None, nope);
    let one = module.abstract_int(1);
    module.add_const("x", None, one);
    let two = module.abstract_int(2);
    module.add_const("x", None, two);
    let frobnicate = module.call("frobnicate", vec![]);
    module.add_const("c", None, frobnicate);

    let (resolver, ok) = resolve(&module);
    assert!(!ok);
    assert_eq!(
        resolver.diagnostics().str(),
        "error: unresolved identifier 'nope'\n\
         error: redefinition of 'x'\n\
         error: unresolved call target 'frobnicate'\n"
    );
}

#[test]
fn locals_are_scoped() {
    let mut module = ast::Module::new();
    let one = module.abstract_int(1);
    let two = module.abstract_int(2);
    let x = module.ident("x");
    let inner = ast::Block {
        stmts: vec![Statement::let_("x", None, two)],
    };
    module.add_function(
        "f",
        vec![],
        None,
        vec![
            Statement::let_("x", None, one),
            Statement::new(ast::StatementKind::Block(inner)),
            Statement::let_("y", None, x),
        ],
    );

    let (resolver, ok) = resolve(&module);
    assert!(ok, "{}", resolver.diagnostics().str());
    assert_eq!(type_name(&resolver, x), "i32");

    // The same name twice in one scope.
    let mut module = ast::Module::new();
    let one = module.abstract_int(1);
    let two = module.abstract_int(2);
    module.add_function(
        "f",
        vec![],
        None,
        vec![
            Statement::let_("x", None, one),
            Statement::let_("x", None, two),
        ],
    );
    let (resolver, ok) = resolve(&module);
    assert!(!ok);
    assert_eq!(resolver.diagnostics().str(), "error: redefinition of 'x'\n");
}

#[test]
fn structs() {
    let mut module = ast::Module::new();
    let f32_ty = scalar_type(&mut module, Scalar::F32);
    let i32_ty = scalar_type(&mut module, Scalar::I32);
    let vec_ty = module.append_type(ast::Type::Vector {
        size: VectorSize::Bi,
        ty: i32_ty,
    });
    module.add_struct("S", vec![("a", f32_ty), ("b", vec_ty)]);

    let a = module.abstract_int(1);
    let components = [1, 2].map(|v| module.abstract_int(v)).to_vec();
    let b = module.vec(VectorSize::Bi, Scalar::I32, components);
    let s = module.call("S", vec![a, b]);
    module.add_const("s", None, s);
    let base = module.ident("s");
    let member = module.member(base, "b");
    let y = module.member(member, "y");
    module.add_const("t", None, y);
    let base = module.ident("s");
    let missing = module.member(base, "c");
    module.add_const("u", None, missing);

    let (resolver, ok) = resolve(&module);
    assert!(!ok);
    assert_eq!(type_name(&resolver, s), "S");
    assert_eq!(
        resolver.constant(y).and_then(|c| c.as_i64()),
        Some(2)
    );
    assert_eq!(
        resolver.diagnostics().str(),
        "error: struct member 'c' not found in 'S'\n"
    );
}

#[test]
fn override_sized_arrays() {
    let mut module = ast::Module::new();
    let u32_ty = scalar_type(&mut module, Scalar::U32);
    let f32_ty = scalar_type(&mut module, Scalar::F32);
    let four = module.abstract_int(4);
    module.add_override("n", Some(u32_ty), Some(four));

    let n = module.ident("n");
    let named = module.append_type(ast::Type::Array {
        base: f32_ty,
        size: ast::ArraySize::Constant(n),
    });
    module.add_var("a", AddressSpace::WorkGroup, Some(named), None);

    let n = module.ident("n");
    let two = module.abstract_int(2);
    let doubled = module.binary(Bo::Multiply, n, two);
    let unnamed = module.append_type(ast::Type::Array {
        base: f32_ty,
        size: ast::ArraySize::Constant(doubled),
    });
    module.add_var("b", AddressSpace::WorkGroup, Some(unnamed), None);

    let a = module.ident("a");
    let one = module.abstract_int(1);
    let first = module.index(a, one);
    let b = module.ident("b");
    let nine = module.abstract_int(9);
    let second = module.index(b, nine);
    module.add_function(
        "f",
        vec![],
        None,
        vec![
            Statement::let_("x", None, first),
            Statement::let_("y", None, second),
        ],
    );

    let (resolver, ok) = resolve(&module);
    assert!(ok, "{}", resolver.diagnostics().str());
    assert_eq!(
        type_name(&resolver, a),
        "ref<workgroup, array<f32, n>, read_write>"
    );
    assert_eq!(
        type_name(&resolver, b),
        "ref<workgroup, array<f32, [unnamed override-expression]>, read_write>"
    );
    // Override-sized arrays are never clamped.
    assert!(resolver.diagnostics().is_empty());
    assert_eq!(type_name(&resolver, second), "ref<workgroup, f32, read_write>");
}

#[test]
fn bad_array_count() {
    let mut module = ast::Module::new();
    let f32_ty = scalar_type(&mut module, Scalar::F32);
    let zero = module.abstract_int(0);
    let array = module.append_type(ast::Type::Array {
        base: f32_ty,
        size: ast::ArraySize::Constant(zero),
    });
    module.add_var("a", AddressSpace::Private, Some(array), None);

    let (resolver, ok) = resolve(&module);
    assert!(!ok);
    assert_eq!(
        resolver.diagnostics().str(),
        "error: array count must be a positive integer constant or an override expression\n"
    );
}

#[test]
fn constants_need_constant_initializers() {
    let mut module = ast::Module::new();
    let f32_ty = scalar_type(&mut module, Scalar::F32);
    module.add_var("p", AddressSpace::Private, Some(f32_ty), None);
    let p = module.ident("p");
    module.add_const("c", None, p);

    let (resolver, ok) = resolve(&module);
    assert!(!ok);
    assert_eq!(type_name(&resolver, p), "ref<private, f32, read_write>");
    assert_eq!(
        resolver.diagnostics().str(),
        "error: initializer of 'c' is not a constant expression\n"
    );
}

#[test]
fn assignments() {
    let mut module = ast::Module::new();
    let f32_ty = scalar_type(&mut module, Scalar::F32);
    let one = module.abstract_int(1);
    let v = module.ident("v");
    let two = module.abstract_int(2);
    let v_again = module.ident("v");
    let yes = module.bool(true);
    let l = module.ident("l");
    let three = module.abstract_int(3);
    let four = module.abstract_int(4);
    module.add_function(
        "f",
        vec![],
        None,
        vec![
            Statement::var("v", Some(f32_ty), Some(one)),
            Statement::assign(v, two),
            Statement::assign(v_again, yes),
            Statement::let_("l", None, three),
            Statement::assign(l, four),
        ],
    );

    let (resolver, ok) = resolve(&module);
    assert!(!ok);
    assert_eq!(type_name(&resolver, v), "ref<function, f32, read_write>");
    assert_eq!(
        resolver.diagnostics().str(),
        "error: cannot assign a value of type 'bool' to 'f32'\n\
         error: cannot assign to a value of type 'i32'\n"
    );
}

#[test]
fn pointers() {
    let mut module = ast::Module::new();
    let i32_ty = scalar_type(&mut module, Scalar::I32);
    let v = module.ident("v");
    let address = module.addr_of(v);
    let p = module.ident("p");
    let deref = module.deref(p);
    let not_a_reference = module.abstract_int(1);
    let bad = module.addr_of(not_a_reference);
    module.add_function(
        "f",
        vec![],
        None,
        vec![
            Statement::var("v", Some(i32_ty), None),
            Statement::let_("p", None, address),
            Statement::let_("w", None, deref),
            Statement::let_("bad", None, bad),
        ],
    );

    let (resolver, ok) = resolve(&module);
    assert!(!ok);
    assert_eq!(type_name(&resolver, address), "ptr<function, i32, read_write>");
    assert_eq!(type_name(&resolver, deref), "ref<function, i32, read_write>");
    assert_eq!(
        resolver.diagnostics().str(),
        "error: cannot take the address of a value of type 'abstract-int'\n"
    );
}

#[test]
fn runtime_index_is_clamped() {
    let mut module = ast::Module::new();
    let f32_ty = scalar_type(&mut module, Scalar::F32);
    let vec_ty = module.append_type(ast::Type::Vector {
        size: VectorSize::Tri,
        ty: f32_ty,
    });
    let v = module.ident("v");
    let three = module.abstract_int(3);
    let index = module.index(v, three);
    module.add_function(
        "f",
        vec![],
        None,
        vec![
            Statement::var("v", Some(vec_ty), None),
            Statement::let_("x", None, index),
        ],
    );

    let (resolver, ok) = resolve(&module);
    assert!(ok);
    assert_eq!(type_name(&resolver, index), "ref<function, f32, read_write>");
    assert_eq!(resolver.constant(index), None);
    assert_eq!(
        resolver.diagnostics().str(),
        "warning: index 3 out of bounds [0..2]. Clamping index to 2\n"
    );
}

#[test]
fn calls_and_returns() {
    let mut module = ast::Module::new();
    let i32_ty = scalar_type(&mut module, Scalar::I32);
    let x = module.ident("x");
    module.add_function(
        "id",
        vec![("x", i32_ty)],
        Some(i32_ty),
        vec![Statement::return_(Some(x))],
    );

    let one = module.abstract_int(1);
    let two = module.abstract_int(2);
    let too_many = module.call("id", vec![one, two]);
    let half = module.abstract_float(0.5);
    let wrong_type = module.call("id", vec![half]);
    let fine = module.abstract_int(3);
    let call = module.call("id", vec![fine]);
    let mismatch = module.abstract_float(1.5);
    module.add_function(
        "g",
        vec![],
        Some(i32_ty),
        vec![
            Statement::let_("a", None, too_many),
            Statement::let_("b", None, wrong_type),
            Statement::let_("c", None, call),
            Statement::return_(Some(mismatch)),
        ],
    );
    module.add_function("h", vec![], Some(i32_ty), vec![Statement::return_(None)]);

    let (resolver, ok) = resolve(&module);
    assert!(!ok);
    assert_eq!(type_name(&resolver, call), "i32");
    assert_eq!(
        resolver.diagnostics().str(),
        "error: 'id' expects 1 argument(s), found 2\n\
         error: argument 0 of 'id' expects 'i32', found 'abstract-float'\n\
         error: return value of type 'abstract-float' does not match the return type 'i32'\n\
         error: function 'h' must return a value\n"
    );
}

#[test]
fn operator_errors() {
    let mut module = ast::Module::new();
    let a = module.i32(1);
    let b = module.u32(1);
    let sum = module.binary(Bo::Add, a, b);
    module.add_const("s", None, sum);
    let t = module.bool(true);
    let negated = module.unary(ast::UnaryOperator::Negate, t);
    module.add_const("n", None, negated);
    let builtin = module.bool(true);
    let cos = module.call("cos", vec![builtin]);
    module.add_const("c", None, cos);

    let (resolver, ok) = resolve(&module);
    assert!(!ok);
    assert_eq!(
        resolver.diagnostics().str(),
        "error: no operator '+' for operands of type 'i32' and 'u32'\n\
         error: no operator '-' for operand of type 'bool'\n\
         error: no matching call to cos(bool)\n\
         \n\
         2 candidate functions:\n  \
         cos(f32) -> f32\n  \
         cos(vecN<f32>) -> vecN<f32>\n"
    );
}

#[test]
fn error_cutoff() {
    let mut module = ast::Module::new();
    let inits = (0..5)
        .map(|i| {
            let init = module.ident("missing");
            module.add_const(&format!("c{}", i), None, init);
            init
        })
        .collect::<Vec<_>>();

    let mut resolver = Resolver::new(Options {
        max_errors: Some(2),
    });
    assert!(!resolver.resolve(&module));
    assert_eq!(resolver.diagnostics().error_count(), 2);
    assert_eq!(resolver.diagnostics().len(), 2);
    assert!(resolver.info(inits[1]).is_some());
    assert!(resolver.info(inits[2]).is_none());

    let mut unlimited = Resolver::new(Options { max_errors: None });
    assert!(!unlimited.resolve(&module));
    assert_eq!(unlimited.diagnostics().error_count(), 5);
}
