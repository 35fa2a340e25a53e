use crate::scope::Scope;
use crate::typesystem::{ParameterKind, TypeId, TypeSystem};

/// Fills the outermost scope with the predefined routines before any user
/// declaration is checked.
pub trait PredefinedSymbols {
    fn fill_table(&self, scope: &mut Scope, type_system: &mut TypeSystem);
}

/// The required procedures and functions of Pascal that fit the supported
/// types.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequiredRoutines;

// These take any number of arguments of any type, so they get no formals.
const REQUIRED_PROCEDURES: &[&str] = &[
    "write", "writeln", "read", "readln", "page", "rewrite", "reset", "put", "get",
];

#[derive(Clone, Copy)]
enum Ty {
    Integer,
    Real,
    Char,
    Bool,
}

// name, alternatives of (formals, result)
const REQUIRED_FUNCTIONS: &[(&str, &[(&[Ty], Ty)])] = &[
    ("abs", &[(&[Ty::Integer], Ty::Integer), (&[Ty::Real], Ty::Real)]),
    ("sqr", &[(&[Ty::Integer], Ty::Integer), (&[Ty::Real], Ty::Real)]),
    ("sin", &[(&[Ty::Real], Ty::Real), (&[Ty::Integer], Ty::Real)]),
    ("cos", &[(&[Ty::Real], Ty::Real), (&[Ty::Integer], Ty::Real)]),
    ("exp", &[(&[Ty::Real], Ty::Real), (&[Ty::Integer], Ty::Real)]),
    ("ln", &[(&[Ty::Real], Ty::Real), (&[Ty::Integer], Ty::Real)]),
    ("sqrt", &[(&[Ty::Real], Ty::Real), (&[Ty::Integer], Ty::Real)]),
    ("arctan", &[(&[Ty::Real], Ty::Real), (&[Ty::Integer], Ty::Real)]),
    ("trunc", &[(&[Ty::Real], Ty::Integer)]),
    ("round", &[(&[Ty::Real], Ty::Integer)]),
    (
        "ord",
        &[
            (&[Ty::Integer], Ty::Integer),
            (&[Ty::Char], Ty::Integer),
            (&[Ty::Bool], Ty::Integer),
        ],
    ),
    ("chr", &[(&[Ty::Integer], Ty::Char)]),
    (
        "succ",
        &[
            (&[Ty::Integer], Ty::Integer),
            (&[Ty::Char], Ty::Char),
            (&[Ty::Bool], Ty::Bool),
        ],
    ),
    (
        "pred",
        &[
            (&[Ty::Integer], Ty::Integer),
            (&[Ty::Char], Ty::Char),
            (&[Ty::Bool], Ty::Bool),
        ],
    ),
    ("odd", &[(&[Ty::Integer], Ty::Bool)]),
    ("eof", &[(&[], Ty::Bool)]),
    ("eoln", &[(&[], Ty::Bool)]),
];

fn resolve(type_system: &TypeSystem, ty: Ty) -> TypeId {
    match ty {
        Ty::Integer => type_system.get_integer_type(),
        Ty::Real => type_system.get_real_type(),
        Ty::Char => type_system.get_char_type(),
        Ty::Bool => type_system.get_bool_type(),
    }
}

impl PredefinedSymbols for RequiredRoutines {
    fn fill_table(&self, scope: &mut Scope, type_system: &mut TypeSystem) {
        for name in REQUIRED_PROCEDURES {
            let proc_ty = type_system.new_procedure_type(vec![]);
            scope.define(name, proc_ty, None);
        }

        for (name, alternatives) in REQUIRED_FUNCTIONS {
            let mut function_types: Vec<TypeId> = alternatives
                .iter()
                .map(|(formals, result)| {
                    let parameters = formals
                        .iter()
                        .map(|formal| {
                            let ty = resolve(type_system, *formal);
                            type_system.new_formal_parameter(ty, ParameterKind::Value)
                        })
                        .collect();
                    let result = resolve(type_system, *result);
                    type_system.new_function_type(parameters, result)
                })
                .collect();

            let func_ty = if function_types.len() == 1 {
                function_types.remove(0)
            } else {
                type_system.new_overload_set(function_types)
            };
            scope.define(name, func_ty, None);
        }
    }
}
