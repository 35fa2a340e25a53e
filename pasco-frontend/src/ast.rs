// ASTs
use crate::span::{Spanned, SpannedBox};
use std::fmt;

#[derive(Debug)]
pub struct Program(pub SpannedBox<ProgramHeading>, pub SpannedBox<Block>);

#[derive(Debug)]
pub struct ProgramHeading(pub Spanned<String>, pub Vec<Spanned<String>>);

#[derive(Debug)]
pub struct Block(
    pub Option<SpannedBox<ConstantDefinitionPart>>,
    pub Option<SpannedBox<VariableDeclarationPart>>,
    pub Option<SpannedBox<ProcedureAndFunctionDeclarationPart>>,
    pub SpannedBox<StatementPart>,
);

impl Block {
    /// The statements directly under the statement part.
    pub fn top_level_statements(&self) -> Vec<&SpannedBox<Stmt>> {
        let stmt = &self.3.get().0;
        match stmt.get() {
            Stmt::Compound(compound) => compound.0.iter().collect(),
            _ => vec![stmt],
        }
    }
}

#[derive(Debug)]
pub struct StatementPart(pub SpannedBox<Stmt>);

// Constants

#[derive(Debug)]
pub struct ConstantDefinitionPart(pub Vec<SpannedBox<ConstantDefinition>>);

#[derive(Debug)]
pub struct ConstantDefinition(pub Spanned<String>, pub SpannedBox<Const>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Plus => write!(f, "+"),
            Sign::Minus => write!(f, "-"),
        }
    }
}

// Numbers keep their lexeme, the checker decides whether they are representable.
#[derive(Debug)]
pub struct ConstInteger(pub Spanned<String>);
#[derive(Debug)]
pub struct ConstReal(pub Spanned<String>);
#[derive(Debug)]
pub struct ConstSigned(pub Spanned<Sign>, pub SpannedBox<Const>);
#[derive(Debug)]
pub struct ConstNamed(pub Spanned<String>);
#[derive(Debug)]
pub struct ConstSignedNamed(pub Spanned<Sign>, pub Spanned<String>);
#[derive(Debug)]
pub struct ConstStringLiteral(pub Spanned<String>);
#[derive(Debug)]
pub struct ConstChr(pub Spanned<String>);
#[derive(Debug)]
pub struct ConstBool(pub Spanned<bool>);

#[derive(Debug)]
pub enum Const {
    Integer(ConstInteger),
    Real(ConstReal),
    Signed(ConstSigned),
    Named(ConstNamed),
    SignedNamed(ConstSignedNamed),
    StringLiteral(ConstStringLiteral),
    Chr(ConstChr),
    Bool(ConstBool),
}

fn quote_string_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Const::Integer(n) => write!(f, "{}", n.0.get()),
            Const::Real(n) => write!(f, "{}", n.0.get()),
            Const::Signed(n) => write!(f, "{}{}", n.0.get(), n.1.get()),
            Const::Named(n) => write!(f, "{}", n.0.get()),
            Const::SignedNamed(n) => write!(f, "{}{}", n.0.get(), n.1.get()),
            Const::StringLiteral(n) => write!(f, "{}", quote_string_literal(n.0.get())),
            Const::Chr(n) => write!(f, "chr({})", n.0.get()),
            Const::Bool(n) => write!(f, "{}", n.0.get()),
        }
    }
}

// Types

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Integer,
    Real,
    Char,
    Boolean,
    String,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PrimitiveType::Integer => "integer",
                PrimitiveType::Real => "real",
                PrimitiveType::Char => "char",
                PrimitiveType::Boolean => "boolean",
                PrimitiveType::String => "string",
            }
        )
    }
}

#[derive(Debug)]
pub struct TypeIdentifier(pub Spanned<PrimitiveType>);

#[derive(Debug)]
pub struct FileType(pub SpannedBox<TypeDenoter>);

#[derive(Debug)]
pub enum TypeDenoter {
    TypeIdentifier(TypeIdentifier),
    FileType(FileType),
}

// Variables

#[derive(Debug)]
pub struct VariableDeclarationPart(pub Vec<SpannedBox<VariableDeclaration>>);

#[derive(Debug)]
pub struct VariableDeclaration(pub Vec<Spanned<String>>, pub SpannedBox<TypeDenoter>);

// Procedures and functions

#[derive(Debug)]
pub struct ProcedureAndFunctionDeclarationPart(
    pub Vec<SpannedBox<ProcedureAndFunctionDeclaration>>,
);

#[derive(Debug)]
pub enum ProcedureAndFunctionDeclaration {
    Procedure(ProcedureDefinition),
    Function(FunctionDefinition),
}

#[derive(Debug)]
pub struct ProcedureDefinition(
    pub Spanned<String>,
    pub Option<Vec<SpannedBox<FormalParameter>>>,
    pub SpannedBox<Block>,
);

#[derive(Debug)]
pub struct FunctionDefinition(
    pub Spanned<String>,
    pub Option<Vec<SpannedBox<FormalParameter>>>,
    pub SpannedBox<TypeIdentifier>,
    pub SpannedBox<Block>,
);

#[derive(Debug)]
pub struct FormalParameterValue(pub Vec<Spanned<String>>, pub SpannedBox<TypeIdentifier>);
#[derive(Debug)]
pub struct FormalParameterVariable(pub Vec<Spanned<String>>, pub SpannedBox<TypeIdentifier>);

#[derive(Debug)]
pub enum FormalParameter {
    Value(FormalParameterValue),
    Variable(FormalParameterVariable),
}

// Statements

#[derive(Debug)]
pub struct AssigVariable(pub Spanned<String>);

#[derive(Debug)]
pub struct StmtAssignment(pub SpannedBox<AssigVariable>, pub SpannedBox<Expr>);
#[derive(Debug)]
pub struct StmtProcedureCall(pub Spanned<String>, pub Option<Vec<SpannedBox<Expr>>>);
#[derive(Debug)]
pub struct StmtCompound(pub Vec<SpannedBox<Stmt>>);
#[derive(Debug)]
pub struct StmtIf(
    pub SpannedBox<Expr>,
    pub SpannedBox<Stmt>,
    pub Option<SpannedBox<Stmt>>,
);
#[derive(Debug)]
pub struct StmtRepeatUntil(pub Vec<SpannedBox<Stmt>>, pub SpannedBox<Expr>);
#[derive(Debug)]
pub struct StmtWhileDo(pub SpannedBox<Expr>, pub SpannedBox<Stmt>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForKind {
    To,
    DownTo,
}

impl fmt::Display for ForKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForKind::To => write!(f, "to"),
            ForKind::DownTo => write!(f, "downto"),
        }
    }
}

#[derive(Debug)]
pub struct StmtFor(
    pub ForKind,
    pub SpannedBox<AssigVariable>,
    pub SpannedBox<Expr>,
    pub SpannedBox<Expr>,
    pub SpannedBox<Stmt>,
);
#[derive(Debug)]
pub struct StmtEmpty;

#[derive(Debug)]
pub enum Stmt {
    Assignment(StmtAssignment),
    ProcedureCall(StmtProcedureCall),
    Compound(StmtCompound),
    If(StmtIf),
    RepeatUntil(StmtRepeatUntil),
    WhileDo(StmtWhileDo),
    For(StmtFor),
    Empty(StmtEmpty),
}

impl fmt::Display for StmtAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} := {}", self.0.get().0.get(), self.1.get())
    }
}

// Expressions

#[derive(Debug)]
pub struct ExprConst(pub SpannedBox<Const>);
#[derive(Debug)]
pub struct ExprVariable(pub Spanned<String>);
#[derive(Debug)]
pub struct ExprFunctionCall(pub Spanned<String>, pub Vec<SpannedBox<Expr>>);
#[derive(Debug)]
pub struct ExprParentheses(pub SpannedBox<Expr>);
#[derive(Debug)]
pub struct ExprUnOp(pub Spanned<UnaryOp>, pub SpannedBox<Expr>);
#[derive(Debug)]
pub struct ExprBinOp(
    pub Spanned<BinOperand>,
    pub SpannedBox<Expr>,
    pub SpannedBox<Expr>,
);

#[derive(Debug)]
pub enum Expr {
    Const(ExprConst),
    Variable(ExprVariable),
    FunctionCall(ExprFunctionCall),
    Parentheses(ExprParentheses),
    UnOp(ExprUnOp),
    BinOp(ExprBinOp),
}

impl Expr {
    /// A string literal of exactly one character, possibly parenthesised.
    pub fn is_single_character_literal(&self) -> bool {
        match self {
            Expr::Const(c) => match c.0.get() {
                Const::StringLiteral(s) => s.0.get().chars().count() == 1,
                _ => false,
            },
            Expr::Parentheses(p) => p.0.get().is_single_character_literal(),
            _ => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(c) => write!(f, "{}", c.0.get()),
            Expr::Variable(v) => write!(f, "{}", v.0.get()),
            Expr::FunctionCall(call) => {
                let args = call
                    .1
                    .iter()
                    .map(|arg| arg.get().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}({})", call.0.get(), args)
            }
            Expr::Parentheses(p) => write!(f, "({})", p.0.get()),
            Expr::UnOp(u) => match u.0.get() {
                UnaryOp::LogicalNot => write!(f, "not {}", u.1.get()),
                op => write!(f, "{}{}", op, u.1.get()),
            },
            Expr::BinOp(b) => write!(f, "{} {} {}", b.1.get(), b.0.get(), b.2.get()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorLevel {
    Relational,
    Additive,
    Multiplicative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOperand {
    // Relationals
    GreaterThan,
    GreaterOrEqualThan,
    LowerThan,
    LowerOrEqualThan,
    Equal,
    Different,
    // Additive
    Addition,
    Subtraction,
    LogicalOr,
    // Multiplicative
    Multiplication,
    RealDivision,
    IntegerDivision,
    Modulo,
    LogicalAnd,
}

impl BinOperand {
    pub fn level(&self) -> OperatorLevel {
        match self {
            BinOperand::GreaterThan
            | BinOperand::GreaterOrEqualThan
            | BinOperand::LowerThan
            | BinOperand::LowerOrEqualThan
            | BinOperand::Equal
            | BinOperand::Different => OperatorLevel::Relational,
            BinOperand::Addition | BinOperand::Subtraction | BinOperand::LogicalOr => {
                OperatorLevel::Additive
            }
            BinOperand::Multiplication
            | BinOperand::RealDivision
            | BinOperand::IntegerDivision
            | BinOperand::Modulo
            | BinOperand::LogicalAnd => OperatorLevel::Multiplicative,
        }
    }
}

impl fmt::Display for BinOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BinOperand::GreaterThan => ">",
                BinOperand::GreaterOrEqualThan => ">=",
                BinOperand::LowerThan => "<",
                BinOperand::LowerOrEqualThan => "<=",
                BinOperand::Equal => "=",
                BinOperand::Different => "<>",
                BinOperand::Addition => "+",
                BinOperand::Subtraction => "-",
                BinOperand::LogicalOr => "or",
                BinOperand::Multiplication => "*",
                BinOperand::RealDivision => "/",
                BinOperand::IntegerDivision => "div",
                BinOperand::Modulo => "mod",
                BinOperand::LogicalAnd => "and",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Negation,
    LogicalNot,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                UnaryOp::Plus => "+",
                UnaryOp::Negation => "-",
                UnaryOp::LogicalNot => "not",
            }
        )
    }
}
