use crate::limits;
use crate::utils;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub struct TypeId(utils::Identifier);

impl TypeId {
    fn fresh() -> TypeId {
        TypeId(utils::new_id())
    }

    // Use this only for debugging purposes.
    pub fn get_number(&self) -> usize {
        self.0.get_number()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ParameterKind {
    Value,
    Variable,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::Value => write!(f, "value"),
            ParameterKind::Variable => write!(f, "var"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TypeKind {
    Integer,
    Real,
    Char,
    Bool,
    StringLiteral,
    File(TypeId),
    FormalParameter {
        ty: TypeId,
        kind: ParameterKind,
    },
    ActualParameter {
        ty: TypeId,
        kind: ParameterKind,
    },
    // Parameter lists hold FormalParameter types.
    Procedure(Vec<TypeId>),
    Function {
        parameters: Vec<TypeId>,
        result: TypeId,
    },
    // Fixed-arity alternatives of a required routine, each a Procedure or a Function.
    OverloadSet(Vec<TypeId>),
    // Identifier not found.
    Undefined,
    // A type error that has already been diagnosed.
    Error,
    // A constant rejected by its range or its form.
    InvalidConstant,
}

#[derive(Debug)]
pub struct Type {
    id: TypeId,
    kind: TypeKind,
}

impl Type {
    fn new(kind: TypeKind) -> Type {
        Type {
            id: TypeId::fresh(),
            kind,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn get_kind(&self) -> &TypeKind {
        &self.kind
    }
}

/// Owns every type descriptor created during a check. Primitive types and
/// sentinels are unique, all other descriptors are created on demand.
#[derive(Debug)]
pub struct TypeSystem {
    types: HashMap<TypeId, Type>,

    integer_type_id: TypeId,
    real_type_id: TypeId,
    char_type_id: TypeId,
    bool_type_id: TypeId,
    string_literal_type_id: TypeId,
    undefined_type_id: TypeId,
    error_type_id: TypeId,
    invalid_constant_type_id: TypeId,
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSystem {
    pub fn new() -> TypeSystem {
        let mut types = HashMap::new();
        let mut register = |kind: TypeKind| {
            let ty = Type::new(kind);
            let id = ty.id();
            types.insert(id, ty);
            id
        };

        let integer_type_id = register(TypeKind::Integer);
        let real_type_id = register(TypeKind::Real);
        let char_type_id = register(TypeKind::Char);
        let bool_type_id = register(TypeKind::Bool);
        let string_literal_type_id = register(TypeKind::StringLiteral);
        let undefined_type_id = register(TypeKind::Undefined);
        let error_type_id = register(TypeKind::Error);
        let invalid_constant_type_id = register(TypeKind::InvalidConstant);

        TypeSystem {
            types,
            integer_type_id,
            real_type_id,
            char_type_id,
            bool_type_id,
            string_literal_type_id,
            undefined_type_id,
            error_type_id,
            invalid_constant_type_id,
        }
    }

    fn new_type(&mut self, kind: TypeKind) -> TypeId {
        let ty = Type::new(kind);
        let id = ty.id();
        self.types.insert(id, ty);
        id
    }

    pub fn get_kind(&self, ty: TypeId) -> &TypeKind {
        // Ids only come from this type system.
        self.types[&ty].get_kind()
    }

    pub fn get_integer_type(&self) -> TypeId {
        self.integer_type_id
    }

    pub fn get_real_type(&self) -> TypeId {
        self.real_type_id
    }

    pub fn get_char_type(&self) -> TypeId {
        self.char_type_id
    }

    pub fn get_bool_type(&self) -> TypeId {
        self.bool_type_id
    }

    pub fn get_string_literal_type(&self) -> TypeId {
        self.string_literal_type_id
    }

    pub fn get_undefined_type(&self) -> TypeId {
        self.undefined_type_id
    }

    pub fn get_error_type(&self) -> TypeId {
        self.error_type_id
    }

    pub fn get_invalid_constant_type(&self) -> TypeId {
        self.invalid_constant_type_id
    }

    pub fn new_file_type(&mut self, component: TypeId) -> TypeId {
        self.new_type(TypeKind::File(component))
    }

    pub fn new_formal_parameter(&mut self, ty: TypeId, kind: ParameterKind) -> TypeId {
        self.new_type(TypeKind::FormalParameter { ty, kind })
    }

    pub fn new_actual_parameter(&mut self, ty: TypeId, kind: ParameterKind) -> TypeId {
        self.new_type(TypeKind::ActualParameter { ty, kind })
    }

    pub fn new_procedure_type(&mut self, parameters: Vec<TypeId>) -> TypeId {
        self.new_type(TypeKind::Procedure(parameters))
    }

    pub fn new_function_type(&mut self, parameters: Vec<TypeId>, result: TypeId) -> TypeId {
        self.new_type(TypeKind::Function { parameters, result })
    }

    pub fn new_overload_set(&mut self, alternatives: Vec<TypeId>) -> TypeId {
        assert!(!alternatives.is_empty());
        self.new_type(TypeKind::OverloadSet(alternatives))
    }

    /// Undefined and Error. Checks that see one of these stay silent.
    pub fn is_error_type(&self, ty: TypeId) -> bool {
        matches!(self.get_kind(ty), TypeKind::Undefined | TypeKind::Error)
    }

    pub fn is_undefined_type(&self, ty: TypeId) -> bool {
        matches!(self.get_kind(ty), TypeKind::Undefined)
    }

    pub fn is_invalid_constant_type(&self, ty: TypeId) -> bool {
        matches!(self.get_kind(ty), TypeKind::InvalidConstant)
    }

    pub fn is_procedure_type(&self, ty: TypeId) -> bool {
        matches!(self.get_kind(ty), TypeKind::Procedure(_))
    }

    pub fn is_function_type(&self, ty: TypeId) -> bool {
        matches!(self.get_kind(ty), TypeKind::Function { .. })
    }

    pub fn is_file_type(&self, ty: TypeId) -> bool {
        matches!(self.get_kind(ty), TypeKind::File(_))
    }

    /// The wrapped type and kind of a formal or actual parameter.
    pub fn parameter(&self, ty: TypeId) -> Option<(TypeId, ParameterKind)> {
        match self.get_kind(ty) {
            TypeKind::FormalParameter { ty, kind } | TypeKind::ActualParameter { ty, kind } => {
                Some((*ty, *kind))
            }
            _ => None,
        }
    }

    pub fn formal_parameters(&self, ty: TypeId) -> &[TypeId] {
        match self.get_kind(ty) {
            TypeKind::Procedure(parameters) | TypeKind::Function { parameters, .. } => parameters,
            _ => &[],
        }
    }

    pub fn function_result_type(&self, ty: TypeId) -> Option<TypeId> {
        match self.get_kind(ty) {
            TypeKind::Function { result, .. } => Some(*result),
            _ => None,
        }
    }

    pub fn overload_alternatives(&self, ty: TypeId) -> Option<&[TypeId]> {
        match self.get_kind(ty) {
            TypeKind::OverloadSet(alternatives) => Some(alternatives),
            _ => None,
        }
    }

    pub fn integer_bounds(&self, ty: TypeId) -> Option<(i64, i64)> {
        match self.get_kind(ty) {
            TypeKind::Integer => Some((limits::MININT, limits::MAXINT)),
            _ => None,
        }
    }

    /// Type equivalence as seen from `ty`. The relation is not symmetric:
    /// a parameter wrapper is looked through only when it is `ty` itself.
    pub fn equiv(&self, ty: TypeId, other: TypeId) -> bool {
        let other_kind = self.get_kind(other);
        match self.get_kind(ty) {
            TypeKind::Integer => matches!(other_kind, TypeKind::Integer),
            TypeKind::Real => matches!(other_kind, TypeKind::Real),
            TypeKind::Char => matches!(other_kind, TypeKind::Char),
            TypeKind::Bool => matches!(other_kind, TypeKind::Bool),
            TypeKind::StringLiteral => matches!(other_kind, TypeKind::StringLiteral),
            TypeKind::File(component) => match other_kind {
                TypeKind::File(other_component) => self.equiv(*component, *other_component),
                _ => false,
            },
            TypeKind::FormalParameter { ty, .. } | TypeKind::ActualParameter { ty, .. } => {
                self.equiv(*ty, other)
            }
            TypeKind::Procedure(parameters) => match other_kind {
                TypeKind::Procedure(other_parameters) => {
                    self.same_parameter_lists(parameters, other_parameters)
                }
                _ => false,
            },
            TypeKind::Function { parameters, .. } => match other_kind {
                TypeKind::Function {
                    parameters: other_parameters,
                    ..
                } => self.same_parameter_lists(parameters, other_parameters),
                _ => false,
            },
            TypeKind::OverloadSet(_) => false,
            TypeKind::Undefined => matches!(other_kind, TypeKind::Undefined),
            TypeKind::Error => matches!(other_kind, TypeKind::Error),
            TypeKind::InvalidConstant => matches!(other_kind, TypeKind::InvalidConstant),
        }
    }

    fn same_parameter_lists(&self, a: &[TypeId], b: &[TypeId]) -> bool {
        a.len() == b.len()
            && a.iter().zip(b).all(|(pa, pb)| {
                match (self.parameter(*pa), self.parameter(*pb)) {
                    (Some((ty_a, kind_a)), Some((ty_b, kind_b))) => {
                        kind_a == kind_b && self.equiv(ty_a, ty_b)
                    }
                    _ => false,
                }
            })
    }

    pub fn is_ordinal_type(&self, ty: TypeId) -> bool {
        self.equiv(ty, self.integer_type_id)
            || self.equiv(ty, self.char_type_id)
            || self.equiv(ty, self.bool_type_id)
    }

    pub fn is_simple_type(&self, ty: TypeId) -> bool {
        self.is_ordinal_type(ty) || self.equiv(ty, self.real_type_id)
    }

    pub fn is_numeric_type(&self, ty: TypeId) -> bool {
        self.equiv(ty, self.integer_type_id) || self.equiv(ty, self.real_type_id)
    }

    pub fn get_type_name(&self, ty: TypeId) -> String {
        match self.get_kind(ty) {
            TypeKind::Integer => "integer".to_string(),
            TypeKind::Real => "real".to_string(),
            TypeKind::Char => "char".to_string(),
            TypeKind::Bool => "boolean".to_string(),
            TypeKind::StringLiteral => "string".to_string(),
            TypeKind::File(component) => format!("file of {}", self.get_type_name(*component)),
            TypeKind::FormalParameter { ty, kind } | TypeKind::ActualParameter { ty, kind } => {
                match kind {
                    ParameterKind::Value => self.get_type_name(*ty),
                    ParameterKind::Variable => format!("var {}", self.get_type_name(*ty)),
                }
            }
            TypeKind::Procedure(parameters) => {
                format!("procedure{}", self.parameter_list_name(parameters))
            }
            TypeKind::Function { parameters, result } => format!(
                "function{}: {}",
                self.parameter_list_name(parameters),
                self.get_type_name(*result)
            ),
            TypeKind::OverloadSet(alternatives) => alternatives
                .iter()
                .map(|alt| self.get_type_name(*alt))
                .collect::<Vec<_>>()
                .join(" | "),
            TypeKind::Undefined => "<undefined>".to_string(),
            TypeKind::Error => "<error>".to_string(),
            TypeKind::InvalidConstant => "<invalid constant>".to_string(),
        }
    }

    fn parameter_list_name(&self, parameters: &[TypeId]) -> String {
        if parameters.is_empty() {
            return String::new();
        }
        format!(
            "({})",
            parameters
                .iter()
                .map(|p| self.get_type_name(*p))
                .collect::<Vec<_>>()
                .join("; ")
        )
    }
}
