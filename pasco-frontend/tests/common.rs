#![allow(dead_code)]

use pasco_frontend::ast::*;
use pasco_frontend::diagnostics;
use pasco_frontend::scope::Scope;
use pasco_frontend::semantic::{self, SemanticContext};
use pasco_frontend::span::{SpanLoc, Spanned, SpannedBox};
use pasco_frontend::span_loc;
use std::cell::Cell;

pub struct CheckDiagnostics {
    checks: Vec<(diagnostics::DiagnosticKind, String)>,
    idx: Cell<usize>,
}

impl CheckDiagnostics {
    pub fn new() -> CheckDiagnostics {
        CheckDiagnostics {
            checks: vec![],
            idx: Cell::new(0),
        }
    }

    pub fn check_error(&mut self, s: &str) {
        self.checks
            .push((diagnostics::DiagnosticKind::Error, s.to_string()));
    }

    pub fn num_diagnostics_seen(&self) -> usize {
        self.idx.get()
    }
}

impl diagnostics::DiagnosticEmitter for CheckDiagnostics {
    fn emit(&self, diag: &diagnostics::Diagnostic) {
        let current_idx = self.idx.get();
        self.idx.set(current_idx + 1);

        assert!(
            current_idx < self.checks.len(),
            "more diagnostics emitted than checked, unexpected {:?}",
            diag.message
        );
        assert_eq!(
            self.checks[current_idx].0, diag.kind,
            "unexpected kind of diagnostic"
        );
        assert!(
            diag.message.starts_with(&self.checks[current_idx].1),
            "diagnostic message {:?} does not start with {:?}",
            diag.message,
            self.checks[current_idx].1
        );
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn check(program: &SpannedBox<Program>) -> (SemanticContext, diagnostics::Diagnostics, Scope) {
    init_logging();
    let mut semantic_context = SemanticContext::new();
    let mut diags = diagnostics::Diagnostics::new();
    let mut scope = Scope::new();
    semantic::check_program(program, &mut semantic_context, &mut diags, &mut scope);
    (semantic_context, diags, scope)
}

pub fn messages(diags: &diagnostics::Diagnostics) -> Vec<String> {
    diags.iter().map(|d| d.message.clone()).collect()
}

pub fn semantic_check_diags(program: &SpannedBox<Program>, errors: Vec<&str>) {
    let (_, diags, _) = check(program);

    let mut check_diags = CheckDiagnostics::new();
    errors.iter().for_each(|s| check_diags.check_error(s));

    diags.report(&check_diags);
    assert_eq!(
        errors.len(),
        check_diags.num_diagnostics_seen(),
        "fewer diagnostics emitted than checked for"
    );
    assert_eq!(errors.len(), diags.num_error());
}

// Tree builders. Every node gets the same location unless built with `at`.

pub fn loc() -> SpanLoc {
    span_loc!(1, 1, 1, 1)
}

pub fn at(line: usize, column: usize) -> SpanLoc {
    span_loc!(line, column, line, column)
}

fn boxed<T>(t: T) -> SpannedBox<T> {
    SpannedBox::new(loc(), t)
}

pub fn name(s: &str) -> Spanned<String> {
    Spanned::new(loc(), s.to_string())
}

pub fn names(v: &[&str]) -> Vec<Spanned<String>> {
    v.iter().map(|s| name(s)).collect()
}

// Constants

pub fn const_int(lexeme: &str) -> SpannedBox<Const> {
    boxed(Const::Integer(ConstInteger(name(lexeme))))
}

pub fn const_real(lexeme: &str) -> SpannedBox<Const> {
    boxed(Const::Real(ConstReal(name(lexeme))))
}

pub fn const_signed(sign: Sign, unsigned: SpannedBox<Const>) -> SpannedBox<Const> {
    boxed(Const::Signed(ConstSigned(Spanned::new(loc(), sign), unsigned)))
}

pub fn const_named(n: &str) -> SpannedBox<Const> {
    boxed(Const::Named(ConstNamed(name(n))))
}

pub fn const_signed_named(sign: Sign, n: &str) -> SpannedBox<Const> {
    boxed(Const::SignedNamed(ConstSignedNamed(
        Spanned::new(loc(), sign),
        name(n),
    )))
}

pub fn const_string(s: &str) -> SpannedBox<Const> {
    boxed(Const::StringLiteral(ConstStringLiteral(name(s))))
}

pub fn const_chr(lexeme: &str) -> SpannedBox<Const> {
    boxed(Const::Chr(ConstChr(name(lexeme))))
}

pub fn const_bool(b: bool) -> SpannedBox<Const> {
    boxed(Const::Bool(ConstBool(Spanned::new(loc(), b))))
}

pub fn const_def(n: &str, c: SpannedBox<Const>) -> SpannedBox<ConstantDefinition> {
    boxed(ConstantDefinition(name(n), c))
}

// Expressions

pub fn constant(c: SpannedBox<Const>) -> SpannedBox<Expr> {
    boxed(Expr::Const(ExprConst(c)))
}

pub fn int(lexeme: &str) -> SpannedBox<Expr> {
    constant(const_int(lexeme))
}

pub fn real(lexeme: &str) -> SpannedBox<Expr> {
    constant(const_real(lexeme))
}

pub fn string(s: &str) -> SpannedBox<Expr> {
    constant(const_string(s))
}

pub fn boolean(b: bool) -> SpannedBox<Expr> {
    constant(const_bool(b))
}

pub fn var(n: &str) -> SpannedBox<Expr> {
    boxed(Expr::Variable(ExprVariable(name(n))))
}

pub fn call(n: &str, args: Vec<SpannedBox<Expr>>) -> SpannedBox<Expr> {
    boxed(Expr::FunctionCall(ExprFunctionCall(name(n), args)))
}

pub fn paren(e: SpannedBox<Expr>) -> SpannedBox<Expr> {
    boxed(Expr::Parentheses(ExprParentheses(e)))
}

pub fn unary(op: UnaryOp, e: SpannedBox<Expr>) -> SpannedBox<Expr> {
    boxed(Expr::UnOp(ExprUnOp(Spanned::new(loc(), op), e)))
}

pub fn bin(op: BinOperand, lhs: SpannedBox<Expr>, rhs: SpannedBox<Expr>) -> SpannedBox<Expr> {
    boxed(Expr::BinOp(ExprBinOp(Spanned::new(loc(), op), lhs, rhs)))
}

// Statements

pub fn assign(target: &str, e: SpannedBox<Expr>) -> SpannedBox<Stmt> {
    boxed(Stmt::Assignment(StmtAssignment(
        boxed(AssigVariable(name(target))),
        e,
    )))
}

pub fn assign_at(locus: SpanLoc, target: &str, e: SpannedBox<Expr>) -> SpannedBox<Stmt> {
    SpannedBox::new(
        locus,
        Stmt::Assignment(StmtAssignment(boxed(AssigVariable(name(target))), e)),
    )
}

pub fn pcall(n: &str, args: Option<Vec<SpannedBox<Expr>>>) -> SpannedBox<Stmt> {
    boxed(Stmt::ProcedureCall(StmtProcedureCall(name(n), args)))
}

pub fn compound(stmts: Vec<SpannedBox<Stmt>>) -> SpannedBox<Stmt> {
    boxed(Stmt::Compound(StmtCompound(stmts)))
}

pub fn if_then(
    cond: SpannedBox<Expr>,
    then: SpannedBox<Stmt>,
    otherwise: Option<SpannedBox<Stmt>>,
) -> SpannedBox<Stmt> {
    boxed(Stmt::If(StmtIf(cond, then, otherwise)))
}

pub fn while_do(cond: SpannedBox<Expr>, body: SpannedBox<Stmt>) -> SpannedBox<Stmt> {
    boxed(Stmt::WhileDo(StmtWhileDo(cond, body)))
}

pub fn repeat_until(stmts: Vec<SpannedBox<Stmt>>, cond: SpannedBox<Expr>) -> SpannedBox<Stmt> {
    boxed(Stmt::RepeatUntil(StmtRepeatUntil(stmts, cond)))
}

pub fn for_to(
    control: &str,
    initial: SpannedBox<Expr>,
    last: SpannedBox<Expr>,
    body: SpannedBox<Stmt>,
) -> SpannedBox<Stmt> {
    boxed(Stmt::For(StmtFor(
        ForKind::To,
        boxed(AssigVariable(name(control))),
        initial,
        last,
        body,
    )))
}

pub fn empty() -> SpannedBox<Stmt> {
    boxed(Stmt::Empty(StmtEmpty))
}

// Declarations

pub fn ty(p: PrimitiveType) -> SpannedBox<TypeDenoter> {
    boxed(TypeDenoter::TypeIdentifier(TypeIdentifier(Spanned::new(
        loc(),
        p,
    ))))
}

pub fn file_of(component: SpannedBox<TypeDenoter>) -> SpannedBox<TypeDenoter> {
    boxed(TypeDenoter::FileType(FileType(component)))
}

pub fn var_decl(v: &[&str], t: SpannedBox<TypeDenoter>) -> SpannedBox<VariableDeclaration> {
    boxed(VariableDeclaration(names(v), t))
}

pub fn var_decl_at(
    n: &str,
    locus: SpanLoc,
    t: SpannedBox<TypeDenoter>,
) -> SpannedBox<VariableDeclaration> {
    SpannedBox::new(
        locus,
        VariableDeclaration(vec![Spanned::new(locus, n.to_string())], t),
    )
}

fn type_identifier(p: PrimitiveType) -> SpannedBox<TypeIdentifier> {
    boxed(TypeIdentifier(Spanned::new(loc(), p)))
}

pub fn value_params(v: &[&str], p: PrimitiveType) -> SpannedBox<FormalParameter> {
    boxed(FormalParameter::Value(FormalParameterValue(
        names(v),
        type_identifier(p),
    )))
}

pub fn var_params(v: &[&str], p: PrimitiveType) -> SpannedBox<FormalParameter> {
    boxed(FormalParameter::Variable(FormalParameterVariable(
        names(v),
        type_identifier(p),
    )))
}

pub fn procedure(
    n: &str,
    params: Option<Vec<SpannedBox<FormalParameter>>>,
    body: SpannedBox<Block>,
) -> SpannedBox<ProcedureAndFunctionDeclaration> {
    boxed(ProcedureAndFunctionDeclaration::Procedure(
        ProcedureDefinition(name(n), params, body),
    ))
}

pub fn function(
    n: &str,
    params: Option<Vec<SpannedBox<FormalParameter>>>,
    result: PrimitiveType,
    body: SpannedBox<Block>,
) -> SpannedBox<ProcedureAndFunctionDeclaration> {
    boxed(ProcedureAndFunctionDeclaration::Function(FunctionDefinition(
        name(n),
        params,
        type_identifier(result),
        body,
    )))
}

pub fn block(
    constants: Vec<SpannedBox<ConstantDefinition>>,
    variables: Vec<SpannedBox<VariableDeclaration>>,
    routines: Vec<SpannedBox<ProcedureAndFunctionDeclaration>>,
    stmts: Vec<SpannedBox<Stmt>>,
) -> SpannedBox<Block> {
    let constants = (!constants.is_empty()).then(|| boxed(ConstantDefinitionPart(constants)));
    let variables = (!variables.is_empty()).then(|| boxed(VariableDeclarationPart(variables)));
    let routines =
        (!routines.is_empty()).then(|| boxed(ProcedureAndFunctionDeclarationPart(routines)));
    boxed(Block(
        constants,
        variables,
        routines,
        boxed(StatementPart(compound(stmts))),
    ))
}

pub fn program_with_params(params: &[&str], b: SpannedBox<Block>) -> SpannedBox<Program> {
    boxed(Program(boxed(ProgramHeading(name("test"), names(params))), b))
}

pub fn program(b: SpannedBox<Block>) -> SpannedBox<Program> {
    program_with_params(&[], b)
}
