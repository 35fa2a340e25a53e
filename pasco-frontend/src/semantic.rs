use crate::ast::{self, BinOperand, Const, Expr, OperatorLevel, Stmt, UnaryOp};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::limits;
use crate::required::{PredefinedSymbols, RequiredRoutines};
use crate::scope::Scope;
use crate::span::{SpanId, SpanLoc, Spanned, SpannedBox};
use crate::typesystem::{ParameterKind, TypeId, TypeSystem};
use crate::utils::canonical_name;
use log::{debug, trace};
use std::collections::HashMap;
use std::fmt;

/// State produced by a check that outlives it: the type system and the
/// type recorded for each annotated tree node.
pub struct SemanticContext {
    pub type_system: TypeSystem,
    ast_types: HashMap<SpanId, TypeId>,
}

impl Default for SemanticContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticContext {
    pub fn new() -> SemanticContext {
        SemanticContext {
            type_system: TypeSystem::new(),
            ast_types: HashMap::new(),
        }
    }

    pub fn get_ast_type(&self, id: SpanId) -> Option<TypeId> {
        self.ast_types.get(&id).copied()
    }

    pub fn set_ast_type(&mut self, id: SpanId, ty: TypeId) {
        self.ast_types.insert(id, ty);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoutineKind {
    Procedure,
    Function,
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutineKind::Procedure => write!(f, "procedure"),
            RoutineKind::Function => write!(f, "function"),
        }
    }
}

enum ArgumentMismatch {
    NotAVariable,
    Type,
}

struct SemanticChecker<'a> {
    ctx: &'a mut SemanticContext,
    diagnostics: &'a mut Diagnostics,
    scope: &'a mut Scope,
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, plural)
    }
}

impl<'a> SemanticChecker<'a> {
    fn error(&mut self, locus: SpanLoc, message: String) {
        self.diagnostics.add(DiagnosticKind::Error, locus, message);
    }

    fn type_name(&self, ty: TypeId) -> String {
        self.ctx.type_system.get_type_name(ty)
    }

    fn equiv(&self, ty: TypeId, other: TypeId) -> bool {
        self.ctx.type_system.equiv(ty, other)
    }

    fn is_error_type(&self, ty: TypeId) -> bool {
        self.ctx.type_system.is_error_type(ty)
    }

    fn is_invalid_constant(&self, ty: TypeId) -> bool {
        self.ctx.type_system.is_invalid_constant_type(ty)
    }

    fn is_bool(&self, ty: TypeId) -> bool {
        self.equiv(ty, self.ctx.type_system.get_bool_type())
    }

    fn is_integer(&self, ty: TypeId) -> bool {
        self.equiv(ty, self.ctx.type_system.get_integer_type())
    }

    fn is_real(&self, ty: TypeId) -> bool {
        self.equiv(ty, self.ctx.type_system.get_real_type())
    }

    fn is_char(&self, ty: TypeId) -> bool {
        self.equiv(ty, self.ctx.type_system.get_char_type())
    }

    fn is_string_literal(&self, ty: TypeId) -> bool {
        self.equiv(ty, self.ctx.type_system.get_string_literal_type())
    }

    fn with_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scope.push_scope();
        let result = f(self);
        self.scope.pop_scope();
        result
    }

    fn trace_current_scope(&self, owner: &str) {
        if log::log_enabled!(log::Level::Trace) {
            let entries = self
                .scope
                .current_scope_entries()
                .into_iter()
                .map(|(name, ty)| format!("{}: {}", name, self.type_name(ty)))
                .collect::<Vec<_>>()
                .join(", ");
            trace!("scope of '{}' = [{}]", owner, entries);
        }
    }

    fn define(&mut self, name: &Spanned<String>, ty: TypeId) -> bool {
        if self.scope.define(name.get(), ty, Some(*name.loc())) {
            trace!(
                "defined '{}' as {} at depth {}",
                name.get(),
                self.type_name(ty),
                self.scope.depth()
            );
            return true;
        }

        let previous = self
            .scope
            .lookup_current_scope(name.get())
            .and_then(|entry| entry.defining_point());
        let (extra_locus, extra_diagnostics) = match previous {
            Some(loc) => (
                vec![loc],
                vec![Diagnostic::new(
                    DiagnosticKind::Info,
                    loc,
                    "location of previous declaration".to_string(),
                )],
            ),
            None => (vec![], vec![]),
        };
        self.diagnostics.add_with_extra(
            DiagnosticKind::Error,
            *name.loc(),
            format!(
                "identifier '{}' has already been declared in this scope",
                name.get()
            ),
            extra_locus,
            extra_diagnostics,
        );
        false
    }

    fn lookup_identifier(&mut self, name: &Spanned<String>) -> TypeId {
        match self.scope.lookup(name.get()) {
            Some(ty) => ty,
            None => {
                self.error(
                    *name.loc(),
                    format!("identifier '{}' not found in this scope", name.get()),
                );
                self.ctx.type_system.get_undefined_type()
            }
        }
    }

    fn maxint_bounds(&self) -> (i64, i64) {
        self.scope
            .lookup("maxint")
            .and_then(|ty| self.ctx.type_system.integer_bounds(ty))
            .unwrap_or((limits::MININT, limits::MAXINT))
    }

    fn diagnose_invalid_constant(&mut self, locus: SpanLoc, context: &str) {
        let (min, max) = self.maxint_bounds();
        self.error(
            locus,
            format!(
                "integer constant in '{}' is out of range, it must be between {} and {}",
                context, min, max
            ),
        );
    }

    // Program

    fn predefine(&mut self, predefined: &dyn PredefinedSymbols) {
        let integer = self.ctx.type_system.get_integer_type();
        self.scope.define("maxint", integer, None);
        predefined.fill_table(&mut *self.scope, &mut self.ctx.type_system);
        debug!(
            "predefined {} symbols",
            self.scope.current_scope_entries().len()
        );
    }

    fn check_program(&mut self, program: &SpannedBox<ast::Program>) {
        let program = program.get();
        self.check_program_heading(&program.0);
        self.check_block(&program.1);
    }

    fn check_program_heading(&mut self, heading: &SpannedBox<ast::ProgramHeading>) {
        let heading = heading.get();
        debug!("checking program '{}'", heading.0.get());
        for param in &heading.1 {
            match canonical_name(param.get()).as_str() {
                "input" | "output" => {
                    let char_type = self.ctx.type_system.get_char_type();
                    let text_type = self.ctx.type_system.new_file_type(char_type);
                    self.define(param, text_type);
                }
                _ => {
                    self.lookup_identifier(param);
                }
            }
        }
    }

    fn check_block(&mut self, block: &SpannedBox<ast::Block>) {
        let block = block.get();
        if let Some(constants) = &block.0 {
            for constant in &constants.get().0 {
                self.check_constant_definition(constant);
            }
        }
        if let Some(variables) = &block.1 {
            for variable in &variables.get().0 {
                self.check_variable_declaration(variable);
            }
        }
        if let Some(routines) = &block.2 {
            for routine in &routines.get().0 {
                match routine.get() {
                    ast::ProcedureAndFunctionDeclaration::Procedure(p) => {
                        self.check_procedure_definition(p)
                    }
                    ast::ProcedureAndFunctionDeclaration::Function(f) => {
                        self.check_function_definition(f)
                    }
                }
            }
        }
        self.check_stmt(&block.3.get().0);
    }

    // Constants

    fn check_constant_definition(&mut self, n: &SpannedBox<ast::ConstantDefinition>) {
        let definition = n.get();
        let const_type = self.check_const(&definition.1);
        if self.is_invalid_constant(const_type) {
            return;
        }
        self.define(&definition.0, const_type);
    }

    // Zero coming from more than one digit means the lexeme did not fit.
    fn check_unsigned_integer(&self, lexeme: &str) -> TypeId {
        let value = lexeme.parse::<i32>().unwrap_or(0);
        if value == 0 && lexeme.len() != 1 {
            self.ctx.type_system.get_invalid_constant_type()
        } else {
            self.ctx.type_system.get_integer_type()
        }
    }

    fn check_const(&mut self, n: &SpannedBox<Const>) -> TypeId {
        let ty = match n.get() {
            Const::Integer(c) => self.check_unsigned_integer(c.0.get()),
            Const::Real(_) => self.ctx.type_system.get_real_type(),
            Const::Signed(c) => self.check_const_signed(c, *n.loc()),
            Const::Named(c) => self.lookup_identifier(&c.0),
            Const::SignedNamed(c) => {
                let ty = self.lookup_identifier(&c.1);
                if self.is_error_type(ty) || self.ctx.type_system.is_numeric_type(ty) {
                    ty
                } else {
                    self.error(
                        *n.loc(),
                        format!(
                            "sign '{}' cannot be applied to constant '{}' of type {}",
                            c.0.get(),
                            c.1.get(),
                            self.type_name(ty)
                        ),
                    );
                    self.ctx.type_system.get_error_type()
                }
            }
            Const::StringLiteral(_) => self.ctx.type_system.get_string_literal_type(),
            Const::Chr(c) => {
                let ordinal = self.check_unsigned_integer(c.0.get());
                if self.is_invalid_constant(ordinal) {
                    ordinal
                } else {
                    self.ctx.type_system.get_char_type()
                }
            }
            Const::Bool(_) => self.ctx.type_system.get_bool_type(),
        };
        self.ctx.set_ast_type(n.id(), ty);
        ty
    }

    fn check_const_signed(&mut self, n: &ast::ConstSigned, loc: SpanLoc) -> TypeId {
        let unsigned_type = self.check_const(&n.1);
        match n.1.get() {
            Const::Integer(lexeme) => {
                // The magnitude is what gets compared, for both signs.
                let (min, max) = self.maxint_bounds();
                let magnitude = lexeme.0.get().parse::<f64>().unwrap_or(f64::INFINITY);
                if magnitude >= min as f64 && magnitude <= max as f64 {
                    // In range but rejected as a lexeme, like '00'.
                    if self.is_invalid_constant(unsigned_type) {
                        unsigned_type
                    } else {
                        self.ctx.type_system.get_integer_type()
                    }
                } else {
                    self.error(
                        loc,
                        format!(
                            "constant '{}{}' is out of range, it must be between {} and {}",
                            n.0.get(),
                            lexeme.0.get(),
                            min,
                            max
                        ),
                    );
                    self.ctx.type_system.get_invalid_constant_type()
                }
            }
            _ if self.is_error_type(unsigned_type) || self.is_invalid_constant(unsigned_type) => {
                unsigned_type
            }
            _ if self.ctx.type_system.is_numeric_type(unsigned_type) => unsigned_type,
            other => {
                self.error(
                    loc,
                    format!(
                        "sign '{}' cannot be applied to constant '{}' of type {}",
                        n.0.get(),
                        other,
                        self.type_name(unsigned_type)
                    ),
                );
                self.ctx.type_system.get_error_type()
            }
        }
    }

    // Types and variables

    fn check_type_identifier(&mut self, n: &SpannedBox<ast::TypeIdentifier>) -> TypeId {
        let ty = self.primitive_type(*n.get().0.get());
        self.ctx.set_ast_type(n.id(), ty);
        ty
    }

    fn primitive_type(&self, primitive: ast::PrimitiveType) -> TypeId {
        let type_system = &self.ctx.type_system;
        match primitive {
            ast::PrimitiveType::Integer => type_system.get_integer_type(),
            ast::PrimitiveType::Real => type_system.get_real_type(),
            ast::PrimitiveType::Char => type_system.get_char_type(),
            ast::PrimitiveType::Boolean => type_system.get_bool_type(),
            ast::PrimitiveType::String => type_system.get_string_literal_type(),
        }
    }

    fn check_type_denoter(&mut self, n: &SpannedBox<ast::TypeDenoter>) -> TypeId {
        let ty = match n.get() {
            ast::TypeDenoter::TypeIdentifier(t) => self.primitive_type(*t.0.get()),
            ast::TypeDenoter::FileType(f) => {
                let component = self.check_type_denoter(&f.0);
                self.ctx.type_system.new_file_type(component)
            }
        };
        self.ctx.set_ast_type(n.id(), ty);
        ty
    }

    fn check_variable_declaration(&mut self, n: &SpannedBox<ast::VariableDeclaration>) {
        let declaration = n.get();
        let ty = self.check_type_denoter(&declaration.1);
        for name in &declaration.0 {
            self.define(name, ty);
        }
    }

    // Procedures and functions

    fn check_formal_parameters(
        &mut self,
        groups: &Option<Vec<SpannedBox<ast::FormalParameter>>>,
    ) -> Vec<TypeId> {
        for group in groups.iter().flatten() {
            let (names, type_identifier, kind) = match group.get() {
                ast::FormalParameter::Value(p) => (&p.0, &p.1, ParameterKind::Value),
                ast::FormalParameter::Variable(p) => (&p.0, &p.1, ParameterKind::Variable),
            };
            let ty = self.check_type_identifier(type_identifier);
            let param_type = self.ctx.type_system.new_formal_parameter(ty, kind);
            self.ctx.set_ast_type(group.id(), param_type);
            for name in names {
                self.define(name, param_type);
            }
        }
        self.scope
            .current_scope_entries()
            .into_iter()
            .map(|(_, ty)| ty)
            .collect()
    }

    fn check_procedure_definition(&mut self, n: &ast::ProcedureDefinition) {
        let name = &n.0;
        debug!("entering procedure '{}'", name.get());
        let parameters = self.with_scope(|checker| {
            let parameters = checker.check_formal_parameters(&n.1);
            let proc_type = checker
                .ctx
                .type_system
                .new_procedure_type(parameters.clone());
            checker.define(name, proc_type);
            checker.check_block(&n.2);
            checker.trace_current_scope(name.get());
            parameters
        });
        debug!("leaving procedure '{}'", name.get());

        let proc_type = self.ctx.type_system.new_procedure_type(parameters);
        self.ctx.set_ast_type(name.id(), proc_type);
        self.define(name, proc_type);
    }

    fn check_function_definition(&mut self, n: &ast::FunctionDefinition) {
        let name = &n.0;
        debug!("entering function '{}'", name.get());
        let result_type = self.check_type_identifier(&n.2);
        let parameters = self.with_scope(|checker| {
            let parameters = checker.check_formal_parameters(&n.1);
            let func_type = checker
                .ctx
                .type_system
                .new_function_type(parameters.clone(), result_type);
            checker.define(name, func_type);
            checker.check_block(&n.3);
            if !checker.has_result_assignment(n.3.get(), func_type) {
                checker.error(
                    *name.loc(),
                    format!(
                        "function '{}' does not assign its result in the top level of its body",
                        name.get()
                    ),
                );
            }
            checker.trace_current_scope(name.get());
            parameters
        });
        debug!("leaving function '{}'", name.get());

        let func_type = self
            .ctx
            .type_system
            .new_function_type(parameters, result_type);
        self.ctx.set_ast_type(name.id(), func_type);
        self.define(name, func_type);
    }

    // Only the top-level statements of the body are inspected.
    fn has_result_assignment(&self, body: &ast::Block, func_type: TypeId) -> bool {
        body.top_level_statements()
            .iter()
            .any(|stmt| self.ctx.get_ast_type(stmt.id()) == Some(func_type))
    }

    // Statements

    fn check_stmt(&mut self, n: &SpannedBox<Stmt>) {
        let loc = *n.loc();
        let checked_type = match n.get() {
            Stmt::Assignment(s) => self.check_stmt_assignment(s, loc),
            Stmt::ProcedureCall(s) => {
                self.check_stmt_procedure_call(s, loc);
                None
            }
            Stmt::Compound(s) => {
                for stmt in &s.0 {
                    self.check_stmt(stmt);
                }
                None
            }
            Stmt::If(s) => {
                self.check_condition(&s.0, "an if-statement");
                self.check_stmt(&s.1);
                if let Some(else_stmt) = &s.2 {
                    self.check_stmt(else_stmt);
                }
                None
            }
            Stmt::RepeatUntil(s) => {
                for stmt in &s.0 {
                    self.check_stmt(stmt);
                }
                self.check_condition(&s.1, "a repeat-statement");
                None
            }
            Stmt::WhileDo(s) => {
                self.check_condition(&s.0, "a while-statement");
                self.check_stmt(&s.1);
                None
            }
            Stmt::For(s) => {
                self.check_stmt_for(s);
                None
            }
            Stmt::Empty(_) => None,
        };
        if let Some(ty) = checked_type {
            self.ctx.set_ast_type(n.id(), ty);
        }
    }

    fn check_condition(&mut self, condition: &SpannedBox<Expr>, statement: &str) {
        let ty = self.check_expr(condition);
        if self.is_invalid_constant(ty) {
            self.diagnose_invalid_constant(*condition.loc(), &condition.get().to_string());
        } else if !self.is_error_type(ty) && !self.is_bool(ty) {
            self.error(
                *condition.loc(),
                format!(
                    "the condition of {} must be of boolean type but '{}' has type {}",
                    statement,
                    condition.get(),
                    self.type_name(ty)
                ),
            );
        }
    }

    // Integer into real, and a one-character string literal into char.
    fn is_assignable_by_conversion(
        &self,
        target: TypeId,
        source: TypeId,
        source_expr: &Expr,
    ) -> bool {
        if self.is_real(target) && self.is_integer(source) {
            return true;
        }
        self.is_char(target)
            && self.is_string_literal(source)
            && source_expr.is_single_character_literal()
    }

    /// Returns the function type when the target is the result of a function.
    fn check_stmt_assignment(&mut self, n: &ast::StmtAssignment, loc: SpanLoc) -> Option<TypeId> {
        let rhs = &n.1;
        let rhs_type = self.check_expr(rhs);
        let lhs_name = &n.0.get().0;
        let lhs_type = self.lookup_identifier(lhs_name);
        self.ctx.set_ast_type(n.0.id(), lhs_type);

        // Even a faulty right-hand side counts as the result assignment.
        let result_target = self
            .ctx
            .type_system
            .function_result_type(lhs_type)
            .map(|_| lhs_type);

        if self.is_invalid_constant(rhs_type) {
            self.diagnose_invalid_constant(loc, &n.to_string());
            return result_target;
        }
        if self.is_error_type(lhs_type) || self.is_error_type(rhs_type) {
            return result_target;
        }
        if self.equiv(lhs_type, rhs_type)
            || self.is_assignable_by_conversion(lhs_type, rhs_type, rhs.get())
        {
            return None;
        }

        let lhs_result_type = self.ctx.type_system.function_result_type(lhs_type);
        let rhs_result_type = self.ctx.type_system.function_result_type(rhs_type);
        if self.ctx.type_system.is_procedure_type(lhs_type) {
            self.error(
                loc,
                format!("cannot assign to procedure '{}' in '{}'", lhs_name.get(), n),
            );
            return None;
        }
        if let Some(result_type) = lhs_result_type {
            if !self.equiv(rhs_type, result_type)
                && !self.is_assignable_by_conversion(result_type, rhs_type, rhs.get())
            {
                self.error(
                    loc,
                    format!(
                        "right-hand side of '{}' has type {} that cannot be assigned to the result of function '{}' of type {}",
                        n,
                        self.type_name(rhs_type),
                        lhs_name.get(),
                        self.type_name(result_type)
                    ),
                );
            }
            return Some(lhs_type);
        }
        if let Some(result_type) = rhs_result_type {
            if !self.equiv(lhs_type, result_type)
                && !self.is_assignable_by_conversion(lhs_type, result_type, rhs.get())
            {
                self.error(
                    loc,
                    format!(
                        "result of function '{}' has type {} that cannot be assigned to '{}' of type {}",
                        rhs.get(),
                        self.type_name(result_type),
                        lhs_name.get(),
                        self.type_name(lhs_type)
                    ),
                );
            }
            return None;
        }

        self.error(
            loc,
            format!(
                "types are incompatible in assignment '{}', left-hand side has type {} but right-hand side has type {}",
                n,
                self.type_name(lhs_type),
                self.type_name(rhs_type)
            ),
        );
        None
    }

    fn check_stmt_for(&mut self, n: &ast::StmtFor) {
        let control = &n.1.get().0;
        let control_type = self.lookup_identifier(control);
        self.ctx.set_ast_type(n.1.id(), control_type);

        if !self.is_error_type(control_type) {
            if self.ctx.type_system.is_ordinal_type(control_type) {
                self.check_for_limit("initial", &n.2, control, control_type);
                self.check_for_limit("final", &n.3, control, control_type);
            } else {
                self.error(
                    *n.1.loc(),
                    format!(
                        "the control-variable '{}' of a for-statement must be of ordinal type but it has type {}",
                        control.get(),
                        self.type_name(control_type)
                    ),
                );
            }
        }

        self.check_stmt(&n.4);
    }

    fn check_for_limit(
        &mut self,
        which: &str,
        limit: &SpannedBox<Expr>,
        control: &Spanned<String>,
        control_type: TypeId,
    ) {
        let ty = self.check_expr(limit);
        if self.is_invalid_constant(ty) {
            self.diagnose_invalid_constant(*limit.loc(), &limit.get().to_string());
        } else if !self.is_error_type(ty) && !self.equiv(ty, control_type) {
            self.error(
                *limit.loc(),
                format!(
                    "the {} value '{}' of a for-statement has type {} but the control-variable '{}' has type {}",
                    which,
                    limit.get(),
                    self.type_name(ty),
                    control.get(),
                    self.type_name(control_type)
                ),
            );
        }
    }

    // Calls

    fn routine_kind(&self, ty: TypeId) -> Option<RoutineKind> {
        let type_system = &self.ctx.type_system;
        let ty = match type_system.overload_alternatives(ty) {
            Some(alternatives) => alternatives[0],
            None => ty,
        };
        if type_system.is_procedure_type(ty) {
            Some(RoutineKind::Procedure)
        } else if type_system.is_function_type(ty) {
            Some(RoutineKind::Function)
        } else {
            None
        }
    }

    fn check_stmt_procedure_call(&mut self, n: &ast::StmtProcedureCall, loc: SpanLoc) {
        let callee_type = self.lookup_identifier(&n.0);
        if self.is_error_type(callee_type) {
            return;
        }
        if self.routine_kind(callee_type) != Some(RoutineKind::Procedure) {
            self.error(loc, format!("'{}' is not a procedure", n.0.get()));
            return;
        }
        let args = n.1.as_deref().unwrap_or(&[]);
        self.check_call(RoutineKind::Procedure, &n.0, callee_type, args, loc);
    }

    fn check_expr_function_call(&mut self, n: &ast::ExprFunctionCall, loc: SpanLoc) -> TypeId {
        let callee_type = self.lookup_identifier(&n.0);
        if self.is_error_type(callee_type) {
            return self.ctx.type_system.get_error_type();
        }
        if self.routine_kind(callee_type) != Some(RoutineKind::Function) {
            self.error(loc, format!("'{}' is not a function", n.0.get()));
            return self.ctx.type_system.get_error_type();
        }
        let resolved = self.check_call(RoutineKind::Function, &n.0, callee_type, &n.1, loc);
        resolved
            .and_then(|ty| self.ctx.type_system.function_result_type(ty))
            .unwrap_or_else(|| self.ctx.type_system.get_error_type())
    }

    fn check_actual_parameter(&mut self, arg: &SpannedBox<Expr>) -> TypeId {
        let ty = self.check_expr(arg);
        // Any operator or parenthesis makes it a value.
        let kind = match arg.get() {
            Expr::Variable(_) => ParameterKind::Variable,
            _ => ParameterKind::Value,
        };
        self.ctx.type_system.new_actual_parameter(ty, kind)
    }

    fn match_formal_and_actual(
        &self,
        formal: TypeId,
        actual: TypeId,
    ) -> Result<(), ArgumentMismatch> {
        let type_system = &self.ctx.type_system;
        let (Some((formal_type, formal_kind)), Some((actual_type, actual_kind))) =
            (type_system.parameter(formal), type_system.parameter(actual))
        else {
            return Err(ArgumentMismatch::Type);
        };
        if formal_kind == ParameterKind::Variable && actual_kind != ParameterKind::Variable {
            return Err(ArgumentMismatch::NotAVariable);
        }
        if !type_system.equiv(formal_type, actual_type) {
            return Err(ArgumentMismatch::Type);
        }
        Ok(())
    }

    fn actual_parameter_type(&self, actual: TypeId) -> TypeId {
        self.ctx
            .type_system
            .parameter(actual)
            .map(|(ty, _)| ty)
            .unwrap_or(actual)
    }

    // False if the argument already carries an error.
    fn check_argument_is_sound(&mut self, arg: &SpannedBox<Expr>, actual: TypeId) -> bool {
        let ty = self.actual_parameter_type(actual);
        if self.is_invalid_constant(ty) {
            self.diagnose_invalid_constant(*arg.loc(), &arg.get().to_string());
            return false;
        }
        !self.is_error_type(ty)
    }

    /// Checks the arguments of a call and returns the routine type the call
    /// resolved to.
    fn check_call(
        &mut self,
        kind: RoutineKind,
        name: &Spanned<String>,
        callee_type: TypeId,
        args: &[SpannedBox<Expr>],
        loc: SpanLoc,
    ) -> Option<TypeId> {
        if let Some(alternatives) = self.ctx.type_system.overload_alternatives(callee_type) {
            let alternatives = alternatives.to_vec();
            return self.check_overloaded_call(kind, name, &alternatives, args, loc);
        }

        let formals = self.ctx.type_system.formal_parameters(callee_type).to_vec();
        if args.len() < formals.len() {
            self.error(
                loc,
                format!(
                    "{} '{}' expects {} but {} {} passed",
                    kind,
                    name.get(),
                    plural(formals.len(), "parameter", "parameters"),
                    plural(args.len(), "argument", "arguments"),
                    if args.len() == 1 { "was" } else { "were" }
                ),
            );
            return Some(callee_type);
        }

        for (position, (arg, formal)) in args.iter().zip(formals.iter().copied()).enumerate() {
            let actual = self.check_actual_parameter(arg);
            if !self.check_argument_is_sound(arg, actual) {
                continue;
            }
            match self.match_formal_and_actual(formal, actual) {
                Ok(()) => {}
                Err(ArgumentMismatch::NotAVariable) => {
                    self.error(
                        *arg.loc(),
                        format!(
                            "argument '{}' is not a variable, as required by variable parameter {} of {} '{}'",
                            arg.get(),
                            position + 1,
                            kind,
                            name.get()
                        ),
                    );
                }
                Err(ArgumentMismatch::Type) => {
                    let arg_type = self.actual_parameter_type(actual);
                    self.error(
                        *arg.loc(),
                        format!(
                            "argument '{}' has type {} but parameter {} of {} '{}' has type {}",
                            arg.get(),
                            self.type_name(arg_type),
                            position + 1,
                            kind,
                            name.get(),
                            self.type_name(formal)
                        ),
                    );
                }
            }
        }

        // Arguments beyond the last formal are checked but matched against nothing.
        for arg in args.iter().skip(formals.len()) {
            let actual = self.check_actual_parameter(arg);
            self.check_argument_is_sound(arg, actual);
        }
        Some(callee_type)
    }

    fn check_overloaded_call(
        &mut self,
        kind: RoutineKind,
        name: &Spanned<String>,
        alternatives: &[TypeId],
        args: &[SpannedBox<Expr>],
        loc: SpanLoc,
    ) -> Option<TypeId> {
        let mut actuals = vec![];
        let mut sound = true;
        for arg in args {
            let actual = self.check_actual_parameter(arg);
            sound &= self.check_argument_is_sound(arg, actual);
            actuals.push(actual);
        }
        if !sound {
            return None;
        }

        let found = alternatives.iter().copied().find(|alternative| {
            let formals = self.ctx.type_system.formal_parameters(*alternative);
            formals.len() == actuals.len()
                && formals
                    .iter()
                    .zip(&actuals)
                    .all(|(formal, actual)| self.match_formal_and_actual(*formal, *actual).is_ok())
        });
        if found.is_none() {
            let arg_types = actuals
                .iter()
                .map(|actual| self.type_name(self.actual_parameter_type(*actual)))
                .collect::<Vec<_>>()
                .join(", ");
            self.error(
                loc,
                format!(
                    "no alternative of {} '{}' accepts arguments of type ({})",
                    kind,
                    name.get(),
                    arg_types
                ),
            );
        }
        found
    }

    // Expressions

    fn check_expr(&mut self, n: &SpannedBox<Expr>) -> TypeId {
        let loc = *n.loc();
        let ty = match n.get() {
            Expr::Const(c) => self.check_const(&c.0),
            Expr::Variable(v) => self.lookup_identifier(&v.0),
            Expr::FunctionCall(c) => self.check_expr_function_call(c, loc),
            Expr::Parentheses(p) => self.check_expr(&p.0),
            Expr::UnOp(u) => self.check_expr_un_op(u, loc),
            Expr::BinOp(b) => self.check_expr_bin_op(b, loc),
        };
        self.ctx.set_ast_type(n.id(), ty);
        ty
    }

    fn check_expr_un_op(&mut self, n: &ast::ExprUnOp, loc: SpanLoc) -> TypeId {
        let operand_type = self.check_expr(&n.1);
        if self.is_error_type(operand_type) || self.is_invalid_constant(operand_type) {
            return operand_type;
        }
        let op = *n.0.get();
        let valid = match op {
            UnaryOp::Plus | UnaryOp::Negation => {
                self.ctx.type_system.is_numeric_type(operand_type)
            }
            UnaryOp::LogicalNot => self.is_bool(operand_type),
        };
        if valid {
            return operand_type;
        }
        self.error(
            loc,
            format!(
                "operator '{}' cannot be applied to operand '{}' of type {}",
                op,
                n.1.get(),
                self.type_name(operand_type)
            ),
        );
        self.ctx.type_system.get_error_type()
    }

    fn check_expr_bin_op(&mut self, n: &ast::ExprBinOp, loc: SpanLoc) -> TypeId {
        let lhs_type = self.check_expr(&n.1);
        let rhs_type = self.check_expr(&n.2);

        if self.is_invalid_constant(lhs_type) || self.is_invalid_constant(rhs_type) {
            return self.ctx.type_system.get_invalid_constant_type();
        }
        if self.is_error_type(lhs_type) || self.is_error_type(rhs_type) {
            return self.ctx.type_system.get_error_type();
        }

        let op = *n.0.get();
        match (op, op.level()) {
            (BinOperand::LogicalOr, _) | (BinOperand::LogicalAnd, _) => {
                self.check_logical_operands(n, lhs_type, rhs_type)
            }
            (_, OperatorLevel::Relational) => self.check_relational(n, lhs_type, rhs_type, loc),
            (_, OperatorLevel::Additive) | (_, OperatorLevel::Multiplicative) => {
                self.check_arithmetic(n, lhs_type, rhs_type, loc)
            }
        }
    }

    fn is_relational_operand(&self, ty: TypeId, other: TypeId) -> bool {
        self.ctx.type_system.is_simple_type(ty)
            || (self.is_string_literal(ty) && self.is_char(other))
    }

    fn check_relational(
        &mut self,
        n: &ast::ExprBinOp,
        lhs_type: TypeId,
        rhs_type: TypeId,
        loc: SpanLoc,
    ) -> TypeId {
        let op = n.0.get();
        for (side, operand, ty, other) in [
            ("left", &n.1, lhs_type, rhs_type),
            ("right", &n.2, rhs_type, lhs_type),
        ] {
            if !self.is_relational_operand(ty, other) {
                self.error(
                    loc,
                    format!(
                        "relational operator '{}' cannot be applied to {} operand '{}' of type {}",
                        op,
                        side,
                        operand.get(),
                        self.type_name(ty)
                    ),
                );
                return self.ctx.type_system.get_error_type();
            }
        }

        let real_and_integer = (self.is_real(lhs_type) && self.is_integer(rhs_type))
            || (self.is_integer(lhs_type) && self.is_real(rhs_type));
        let char_and_literal = (self.is_char(lhs_type) && self.is_string_literal(rhs_type))
            || (self.is_string_literal(lhs_type) && self.is_char(rhs_type));
        if self.equiv(lhs_type, rhs_type) || real_and_integer || char_and_literal {
            return self.ctx.type_system.get_bool_type();
        }

        self.error(
            loc,
            format!(
                "operator '{}' cannot be applied to operands of type {} and {}",
                op,
                self.type_name(lhs_type),
                self.type_name(rhs_type)
            ),
        );
        self.ctx.type_system.get_error_type()
    }

    // Both sides are diagnosed.
    fn check_logical_operands(
        &mut self,
        n: &ast::ExprBinOp,
        lhs_type: TypeId,
        rhs_type: TypeId,
    ) -> TypeId {
        let op = n.0.get();
        let mut valid = true;
        for (side, operand, ty) in [("left", &n.1, lhs_type), ("right", &n.2, rhs_type)] {
            if !self.is_bool(ty) {
                self.error(
                    *operand.loc(),
                    format!(
                        "logical operator '{}' cannot be applied to {} operand '{}' of type {}",
                        op,
                        side,
                        operand.get(),
                        self.type_name(ty)
                    ),
                );
                valid = false;
            }
        }
        if valid {
            self.ctx.type_system.get_bool_type()
        } else {
            self.ctx.type_system.get_error_type()
        }
    }

    fn check_arithmetic(
        &mut self,
        n: &ast::ExprBinOp,
        lhs_type: TypeId,
        rhs_type: TypeId,
        loc: SpanLoc,
    ) -> TypeId {
        let op = *n.0.get();
        for (side, operand, ty) in [("left", &n.1, lhs_type), ("right", &n.2, rhs_type)] {
            if !self.ctx.type_system.is_numeric_type(ty) {
                self.error(
                    loc,
                    format!(
                        "operator '{}' cannot be applied to {} operand '{}' of type {}",
                        op,
                        side,
                        operand.get(),
                        self.type_name(ty)
                    ),
                );
                return self.ctx.type_system.get_error_type();
            }
        }

        match op {
            BinOperand::IntegerDivision | BinOperand::Modulo => {
                if !self.is_integer(lhs_type) || !self.is_integer(rhs_type) {
                    self.error(
                        loc,
                        format!(
                            "operands of '{}' must be of integer type but they have type {} and {}",
                            op,
                            self.type_name(lhs_type),
                            self.type_name(rhs_type)
                        ),
                    );
                }
                self.ctx.type_system.get_integer_type()
            }
            BinOperand::RealDivision => self.ctx.type_system.get_real_type(),
            _ if self.is_real(lhs_type) || self.is_real(rhs_type) => {
                self.ctx.type_system.get_real_type()
            }
            _ => self.ctx.type_system.get_integer_type(),
        }
    }
}

/// Checks `program` using the required routines of the language as the
/// predefined symbols.
pub fn check_program(
    program: &SpannedBox<ast::Program>,
    semantic_context: &mut SemanticContext,
    diagnostics: &mut Diagnostics,
    scope: &mut Scope,
) {
    check_program_with(
        program,
        semantic_context,
        diagnostics,
        scope,
        &RequiredRoutines,
    );
}

/// Checks `program` after filling the outermost scope with `maxint` and the
/// symbols of `predefined`. Problems are added to `diagnostics`, and when this
/// returns `scope` holds every program-level binding.
pub fn check_program_with(
    program: &SpannedBox<ast::Program>,
    semantic_context: &mut SemanticContext,
    diagnostics: &mut Diagnostics,
    scope: &mut Scope,
    predefined: &dyn PredefinedSymbols,
) {
    let mut checker = SemanticChecker {
        ctx: semantic_context,
        diagnostics,
        scope,
    };
    checker.predefine(predefined);
    checker.check_program(program);
    debug!(
        "semantic check finished with {}",
        plural(checker.diagnostics.num_error(), "error", "errors")
    );
}
