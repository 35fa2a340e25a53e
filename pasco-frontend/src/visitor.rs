use crate::ast;
use crate::span;

use paste::paste;

// Visitors keep their own state but never modify the AST.
macro_rules! define_visitor {
    ($class:ident) => {
        paste! {
          fn [<visit_pre_ $class:snake>](&mut self, _n: &ast::$class, span: &span::SpanLoc, id: span::SpanId) -> bool {
            self.unhandled_node_pre(stringify!($class), span, id);
            true
          }
          fn [<visit_post_ $class:snake>](&mut self, _n: &ast::$class, span: &span::SpanLoc, id: span::SpanId)  {
            self.unhandled_node_post(stringify!($class), span, id);
          }
        }
    };
}

macro_rules! define_visitor_leaf {
    ($class:ident) => {
        paste! {
          fn [<visit_ $class:snake>](&mut self, _n: &ast::$class, span: &span::SpanLoc, id: span::SpanId) {
            self.unhandled_node_leaf(stringify!($class), span, id);
          }
        }
    };
}

pub trait Visitor {
    fn unhandled_node_pre(&self, _class: &str, _span: &span::SpanLoc, _id: span::SpanId) {}
    fn unhandled_node_post(&self, _class: &str, _span: &span::SpanLoc, _id: span::SpanId) {}
    fn unhandled_node_leaf(&self, _class: &str, _span: &span::SpanLoc, _id: span::SpanId) {}
    define_visitor!(Program);
    define_visitor_leaf!(ProgramHeading);
    define_visitor!(Block);
    define_visitor!(StatementPart);
    define_visitor!(ConstantDefinitionPart);
    define_visitor!(ConstantDefinition);
    define_visitor!(Const);
    define_visitor_leaf!(ConstInteger);
    define_visitor_leaf!(ConstReal);
    define_visitor!(ConstSigned);
    define_visitor_leaf!(ConstNamed);
    define_visitor_leaf!(ConstSignedNamed);
    define_visitor_leaf!(ConstStringLiteral);
    define_visitor_leaf!(ConstChr);
    define_visitor_leaf!(ConstBool);
    define_visitor!(TypeDenoter);
    define_visitor_leaf!(TypeIdentifier);
    define_visitor!(FileType);
    define_visitor!(VariableDeclarationPart);
    define_visitor!(VariableDeclaration);
    define_visitor!(ProcedureAndFunctionDeclarationPart);
    define_visitor!(ProcedureAndFunctionDeclaration);
    define_visitor!(ProcedureDefinition);
    define_visitor!(FunctionDefinition);
    define_visitor!(FormalParameter);
    define_visitor!(FormalParameterValue);
    define_visitor!(FormalParameterVariable);
    define_visitor!(Stmt);
    define_visitor_leaf!(AssigVariable);
    define_visitor!(StmtAssignment);
    define_visitor!(StmtProcedureCall);
    define_visitor!(StmtCompound);
    define_visitor!(StmtIf);
    define_visitor!(StmtRepeatUntil);
    define_visitor!(StmtWhileDo);
    define_visitor!(StmtFor);
    define_visitor_leaf!(StmtEmpty);
    define_visitor!(Expr);
    define_visitor!(ExprConst);
    define_visitor_leaf!(ExprVariable);
    define_visitor!(ExprFunctionCall);
    define_visitor!(ExprParentheses);
    define_visitor!(ExprUnOp);
    define_visitor!(ExprBinOp);
}

pub trait Visitable {
    fn walk(&self, v: &mut dyn Visitor, span: &span::SpanLoc, id: span::SpanId);
}

macro_rules! define_visitable_leaf {
    ($class:ident) => {
        impl Visitable for ast::$class {
            fn walk(&self, v: &mut dyn Visitor, span: &span::SpanLoc, id: span::SpanId) {
                paste! { v. [<visit_ $class:snake>](self, span, id); }
            }
        }
    };
}

macro_rules! visit_child {
    ($self_:ident, $x:tt, $visitor:expr) => {
        $self_
            .$x
            .get()
            .walk($visitor, $self_.$x.loc(), $self_.$x.id());
    };
}

macro_rules! visit_optional_child {
    ($self_:ident, $x:tt, $visitor:expr) => {
        if let Some(w) = &$self_.$x {
            w.get().walk($visitor, w.loc(), w.id());
        }
    };
}

macro_rules! visit_vector_child {
    ($self_:ident, $x:tt, $visitor:expr) => {
        for e in $self_.$x.iter() {
            e.get().walk($visitor, e.loc(), e.id());
        }
    };
}

macro_rules! visit_optional_vector_child {
    ($self_:ident, $x:tt, $visitor:expr) => {
        if let Some(w) = &$self_.$x {
            for e in w.iter() {
                e.get().walk($visitor, e.loc(), e.id());
            }
        }
    };
}

macro_rules! define_visitable {
    ($class:ident, $self_:ident, $visitor:ident, $body:block) => {
        impl Visitable for ast::$class {
            fn walk(&$self_, $visitor: &mut dyn Visitor, span: &span::SpanLoc, id: span::SpanId) {
                paste! {
                    if $visitor. [<visit_pre_ $class:snake>]($self_, span, id) {
                        $body
                        $visitor. [<visit_post_ $class:snake>]($self_, span, id);
                    }
                }
            }
        }
    };
}

// Enum nodes share the span and id of the variant they wrap.
macro_rules! define_visitable_enum {
  ($class:ident, { $($variant:path),+} ) => {
        impl Visitable for ast::$class {
            fn walk(&self, v: &mut dyn Visitor, span: &span::SpanLoc, id: span::SpanId) {
                paste! {
                    if v. [<visit_pre_ $class:snake>](self, span, id) {
                        match self {
                            $(
                            $variant(x) => { x.walk(v, span, id) },
                            )+
                        }
                        v. [<visit_post_ $class:snake>](self, span, id);
                    }
                }
            }
        }
  };
}

/* Visitables */

define_visitable!(Program, self, v, {
    visit_child!(self, 0, v);
    visit_child!(self, 1, v);
});

define_visitable_leaf!(ProgramHeading);

define_visitable!(Block, self, v, {
    visit_optional_child!(self, 0, v);
    visit_optional_child!(self, 1, v);
    visit_optional_child!(self, 2, v);
    visit_child!(self, 3, v);
});

define_visitable!(StatementPart, self, v, {
    visit_child!(self, 0, v);
});

// Constants
define_visitable!(ConstantDefinitionPart, self, v, {
    visit_vector_child!(self, 0, v);
});

define_visitable!(ConstantDefinition, self, v, {
    visit_child!(self, 1, v);
});

define_visitable_enum!(Const, {
    ast::Const::Integer,
    ast::Const::Real,
    ast::Const::Signed,
    ast::Const::Named,
    ast::Const::SignedNamed,
    ast::Const::StringLiteral,
    ast::Const::Chr,
    ast::Const::Bool
});

define_visitable_leaf!(ConstInteger);
define_visitable_leaf!(ConstReal);
define_visitable!(ConstSigned, self, v, {
    visit_child!(self, 1, v);
});
define_visitable_leaf!(ConstNamed);
define_visitable_leaf!(ConstSignedNamed);
define_visitable_leaf!(ConstStringLiteral);
define_visitable_leaf!(ConstChr);
define_visitable_leaf!(ConstBool);

// Types
define_visitable_enum!(TypeDenoter, {
    ast::TypeDenoter::TypeIdentifier,
    ast::TypeDenoter::FileType
});

define_visitable_leaf!(TypeIdentifier);

define_visitable!(FileType, self, v, {
    visit_child!(self, 0, v);
});

// Variables
define_visitable!(VariableDeclarationPart, self, v, {
    visit_vector_child!(self, 0, v);
});

define_visitable!(VariableDeclaration, self, v, {
    visit_child!(self, 1, v);
});

// Procedures and functions
define_visitable!(ProcedureAndFunctionDeclarationPart, self, v, {
    visit_vector_child!(self, 0, v);
});

define_visitable_enum!(ProcedureAndFunctionDeclaration, {
    ast::ProcedureAndFunctionDeclaration::Procedure,
    ast::ProcedureAndFunctionDeclaration::Function
});

define_visitable!(ProcedureDefinition, self, v, {
    visit_optional_vector_child!(self, 1, v);
    visit_child!(self, 2, v);
});

define_visitable!(FunctionDefinition, self, v, {
    visit_optional_vector_child!(self, 1, v);
    visit_child!(self, 2, v);
    visit_child!(self, 3, v);
});

define_visitable_enum!(FormalParameter, {
    ast::FormalParameter::Value,
    ast::FormalParameter::Variable
});

define_visitable!(FormalParameterValue, self, v, {
    visit_child!(self, 1, v);
});

define_visitable!(FormalParameterVariable, self, v, {
    visit_child!(self, 1, v);
});

// Statements
define_visitable_enum!(Stmt, {
    ast::Stmt::Assignment,
    ast::Stmt::ProcedureCall,
    ast::Stmt::Compound,
    ast::Stmt::If,
    ast::Stmt::RepeatUntil,
    ast::Stmt::WhileDo,
    ast::Stmt::For,
    ast::Stmt::Empty
});

define_visitable_leaf!(AssigVariable);

define_visitable!(StmtAssignment, self, v, {
    visit_child!(self, 0, v);
    visit_child!(self, 1, v);
});

define_visitable!(StmtProcedureCall, self, v, {
    visit_optional_vector_child!(self, 1, v);
});

define_visitable!(StmtCompound, self, v, {
    visit_vector_child!(self, 0, v);
});

define_visitable!(StmtIf, self, v, {
    visit_child!(self, 0, v);
    visit_child!(self, 1, v);
    visit_optional_child!(self, 2, v);
});

define_visitable!(StmtRepeatUntil, self, v, {
    visit_vector_child!(self, 0, v);
    visit_child!(self, 1, v);
});

define_visitable!(StmtWhileDo, self, v, {
    visit_child!(self, 0, v);
    visit_child!(self, 1, v);
});

define_visitable!(StmtFor, self, v, {
    visit_child!(self, 1, v);
    visit_child!(self, 2, v);
    visit_child!(self, 3, v);
    visit_child!(self, 4, v);
});

define_visitable_leaf!(StmtEmpty);

// Expressions
define_visitable_enum!(Expr, {
    ast::Expr::Const,
    ast::Expr::Variable,
    ast::Expr::FunctionCall,
    ast::Expr::Parentheses,
    ast::Expr::UnOp,
    ast::Expr::BinOp
});

define_visitable!(ExprConst, self, v, {
    visit_child!(self, 0, v);
});

define_visitable_leaf!(ExprVariable);

define_visitable!(ExprFunctionCall, self, v, {
    visit_vector_child!(self, 1, v);
});

define_visitable!(ExprParentheses, self, v, {
    visit_child!(self, 0, v);
});

define_visitable!(ExprUnOp, self, v, {
    visit_child!(self, 1, v);
});

define_visitable!(ExprBinOp, self, v, {
    visit_child!(self, 1, v);
    visit_child!(self, 2, v);
});
